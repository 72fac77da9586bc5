// sonoscript -- a small language for writing down melodies
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Recursive descent parser turning the token stream into a syntax tree.

use std::fmt;

use super::ast::*;
use super::lexer::{Lexer, Token, TokenKind};
use super::span::Pos;
use crate::error::Error;
use crate::note;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorInfo {
    InvalidInt(std::num::ParseIntError),
    /// The text of a note token is not of the form `<letter><accidental><octave>`.
    InvalidNote(String),
    Unexpected {
        /// One of these tokens was expected
        expected: Vec<TokenKind>,
        /// But this was the actual next token
        actual: TokenKind,
    },
}

impl fmt::Display for ParseErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorInfo::InvalidInt(err) => write!(f, "invalid integer literal: {}", err),
            ParseErrorInfo::InvalidNote(note) => write!(f, "invalid note {:?}", note),
            ParseErrorInfo::Unexpected { expected, actual } => {
                if let [single] = &expected[..] {
                    write!(f, "expected {}, but found {}", single, actual)
                } else {
                    f.write_str("expected one of ")?;
                    for (i, kind) in expected.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", kind)?;
                    }
                    write!(f, ", but found {}", actual)
                }
            }
        }
    }
}

type ParseResult<T> = Result<T, Error>;

/// Token kinds that may begin a statement.
const STATEMENT_START: [TokenKind; 5] = [
    TokenKind::Tempo,
    TokenKind::Volume,
    TokenKind::Sequence,
    TokenKind::Repeat,
    TokenKind::Note,
];

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    /// Single token of lookahead, filled on demand.
    lookahead: Option<Token<'a>>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            lookahead: None,
        }
    }

    /// Parse a whole program, up to the end of the input.
    pub fn parse(&mut self) -> ParseResult<Program> {
        let statements = self.parse_statement_list()?;
        self.expect_token(TokenKind::End)?;
        Ok(Program {
            pos: Pos::START,
            statements,
        })
    }

    // Parse rules

    /// Statements, optionally separated by commas, up to a `}` or the end of input.
    fn parse_statement_list(&mut self) -> ParseResult<Vec<Statement>> {
        let mut statements = Vec::new();
        while !self.is_terminated()? {
            statements.push(self.parse_statement()?);
            if self.peek()?.kind == TokenKind::Comma {
                self.advance()?;
            }
        }
        Ok(statements)
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        let token = self.peek()?;
        match token.kind {
            TokenKind::Tempo => self.parse_tempo().map(Statement::Tempo),
            TokenKind::Volume => self.parse_volume().map(Statement::Volume),
            TokenKind::Sequence => self.parse_sequence().map(Statement::Sequence),
            TokenKind::Repeat => self.parse_repeat().map(Statement::Repeat),
            TokenKind::Note => self.parse_note().map(Statement::Note),
            actual => Err(unexpected(&token, STATEMENT_START.to_vec(), actual)),
        }
    }

    fn parse_tempo(&mut self) -> ParseResult<Tempo> {
        let keyword = self.expect_token(TokenKind::Tempo)?;
        let bpm = self.parse_int()?;
        Ok(Tempo {
            pos: keyword.pos,
            bpm,
        })
    }

    fn parse_volume(&mut self) -> ParseResult<Volume> {
        let keyword = self.expect_token(TokenKind::Volume)?;
        let percent = self.parse_int()?;
        Ok(Volume {
            pos: keyword.pos,
            percent,
        })
    }

    fn parse_sequence(&mut self) -> ParseResult<Sequence> {
        let keyword = self.expect_token(TokenKind::Sequence)?;
        let name = self.expect_token(TokenKind::Ident)?;
        let body = self.parse_block()?;
        Ok(Sequence {
            pos: keyword.pos,
            name: name.text.to_owned(),
            body,
        })
    }

    fn parse_repeat(&mut self) -> ParseResult<Repeat> {
        let keyword = self.expect_token(TokenKind::Repeat)?;
        self.expect_token(TokenKind::ParenOpen)?;
        let count = self.parse_int()?;
        self.expect_token(TokenKind::ParenClose)?;
        let body = self.parse_block()?;
        Ok(Repeat {
            pos: keyword.pos,
            count,
            body,
        })
    }

    fn parse_block(&mut self) -> ParseResult<Vec<Statement>> {
        self.expect_token(TokenKind::BraceOpen)?;
        let body = self.parse_statement_list()?;
        self.expect_token(TokenKind::BraceClose)?;
        Ok(body)
    }

    fn parse_note(&mut self) -> ParseResult<NoteExpr> {
        let token = self.expect_token(TokenKind::Note)?;
        // The lexer accepts lower case pitch letters, notes need upper case ones.
        let (name, accidental, octave) = note::split_note(token.text).ok_or_else(|| {
            syntax_error(&token, ParseErrorInfo::InvalidNote(token.text.to_owned()))
        })?;
        // Octaves are plain digits, so parsing can only overflow. Such notes are unplayable,
        // which is reported when the frequency is computed.
        let octave = octave.parse().unwrap_or(u32::MAX);
        let duration = self.expect_token(TokenKind::Number)?;
        Ok(NoteExpr {
            pos: token.pos,
            name,
            accidental,
            octave,
            duration: duration.text.to_owned(),
        })
    }

    // Parsers for turning single tokens into values

    fn parse_int(&mut self) -> ParseResult<u32> {
        let token = self.expect_token(TokenKind::Number)?;
        token
            .text
            .parse()
            .map_err(|err| syntax_error(&token, ParseErrorInfo::InvalidInt(err)))
    }

    // Manipulating/Inspecting the token stream

    fn peek(&mut self) -> ParseResult<Token<'a>> {
        match self.lookahead {
            Some(token) => Ok(token),
            None => {
                let token = self.lexer.next_token()?;
                self.lookahead = Some(token);
                Ok(token)
            }
        }
    }

    fn advance(&mut self) -> ParseResult<Token<'a>> {
        let token = self.peek()?;
        self.lookahead = None;
        Ok(token)
    }

    fn expect_token(&mut self, expected: TokenKind) -> ParseResult<Token<'a>> {
        let token = self.peek()?;
        if token.kind == expected {
            self.advance()
        } else {
            Err(unexpected(&token, vec![expected], token.kind))
        }
    }

    /// Check if the next token closes a block or ends the input.
    fn is_terminated(&mut self) -> ParseResult<bool> {
        let kind = self.peek()?.kind;
        Ok(kind == TokenKind::BraceClose || kind == TokenKind::End)
    }
}

fn syntax_error(token: &Token, info: ParseErrorInfo) -> Error {
    Error::Syntax {
        pos: token.pos,
        info,
    }
}

fn unexpected(token: &Token, expected: Vec<TokenKind>, actual: TokenKind) -> Error {
    syntax_error(token, ParseErrorInfo::Unexpected { expected, actual })
}

/// Parse a complete source text.
pub fn parse(source: &str) -> Result<Program, Error> {
    Parser::new(source).parse()
}
