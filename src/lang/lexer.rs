// sonoscript -- a small language for writing down melodies
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Implements the lexer for the melody language.

use std::fmt;

use super::span::Pos;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LexerError {
    pos: Pos,
    kind: LexerErrorKind,
}

impl LexerError {
    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn kind(&self) -> LexerErrorKind {
        self.kind
    }
}

impl fmt::Display for LexerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.pos)
    }
}

/// The types of lexer errors.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LexerErrorKind {
    UnrecognizedChar(char),
    /// A note name was started, but no octave number followed.
    MissingOctave,
}

impl fmt::Display for LexerErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexerErrorKind::UnrecognizedChar(ch) => write!(f, "unrecognized character {:?}", ch),
            LexerErrorKind::MissingOctave => write!(f, "note is missing its octave"),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TokenKind {
    /// Pitch letter, optional accidental and octave, e.g. `C#4`
    Note,
    /// Integers and duration literals such as `1/4`
    Number,
    Ident,

    // Keywords
    Tempo,
    Volume,
    Repeat,
    Sequence,

    // Symbols
    ParenOpen,
    ParenClose,
    BraceOpen,
    BraceClose,
    Comma,

    End,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Note => "note",
            TokenKind::Number => "number",
            TokenKind::Ident => "identifier",
            TokenKind::Tempo => "`tempo`",
            TokenKind::Volume => "`volume`",
            TokenKind::Repeat => "`repeat`",
            TokenKind::Sequence => "`sequence`",
            TokenKind::ParenOpen => "`(`",
            TokenKind::ParenClose => "`)`",
            TokenKind::BraceOpen => "`{`",
            TokenKind::BraceClose => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::End => "end of input",
        };
        f.write_str(name)
    }
}

/// A single token together with the text it was read from.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub pos: Pos,
}

pub struct Lexer<'a> {
    input: &'a str,
    stream: std::str::CharIndices<'a>,
    /// Line and column of the next character that would be read.
    line: usize,
    column: usize,
    /// Byte-offset where the current token started
    token_start: usize,
    token_pos: Pos,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let stream = input.char_indices();
        Self {
            input,
            stream,
            line: 1,
            column: 1,
            token_start: 0,
            token_pos: Pos::START,
        }
    }

    /// Return the byte-offset of the next character that would be read.
    fn current_offset(&self) -> usize {
        self.peek_char().map_or(self.input.len(), |(pos, _)| pos)
    }

    /// Return the line and column of the next character that would be read.
    fn current_pos(&self) -> Pos {
        Pos::new(self.line, self.column)
    }

    fn peek_char(&self) -> Option<(usize, char)> {
        self.stream.clone().next()
    }

    fn peek_char_skip(&self, skip: usize) -> Option<(usize, char)> {
        self.stream.clone().nth(skip)
    }

    fn next_char(&mut self) -> Option<(usize, char)> {
        let next = self.stream.next();
        if let Some((_, ch)) = next {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        next
    }

    fn skip_to_next_line(&mut self) {
        while let Some((_, ch)) = self.next_char() {
            if ch == '\n' {
                break;
            }
        }
    }

    fn skip_while<P: Fn(char) -> bool>(&mut self, predicate: P) {
        while let Some((_, ch)) = self.peek_char() {
            if predicate(ch) {
                self.next_char();
            } else {
                break;
            }
        }
    }

    /// Identify the next token.
    /// Once the input is exhausted, every call returns an `End` token.
    pub fn next_token(&mut self) -> Result<Token<'a>, LexerError> {
        while let Some((pos, ch)) = self.peek_char() {
            self.token_start = pos;
            self.token_pos = self.current_pos();

            // Ignore whitespace between tokens
            if ch.is_whitespace() {
                self.next_char();
                continue;
            }

            // Line comments
            if ch == '/' && self.peek_char_skip(1).map(|(_, c)| c) == Some('/') {
                self.skip_to_next_line();
                continue;
            }

            let note_follows = self
                .peek_char_skip(1)
                .map_or(false, |(_, c)| charsets::is_note_cont(c));
            if charsets::is_note_start(ch) && note_follows {
                return self.lex_note();
            }

            self.next_char();
            let token = match ch {
                '(' => self.pack_token(TokenKind::ParenOpen),
                ')' => self.pack_token(TokenKind::ParenClose),
                '{' => self.pack_token(TokenKind::BraceOpen),
                '}' => self.pack_token(TokenKind::BraceClose),
                ',' => self.pack_token(TokenKind::Comma),
                _ if charsets::is_ident(ch) => self.lex_ident(),
                _ if ch.is_ascii_digit() => self.lex_number(),
                _ => return Err(self.pack_error(LexerErrorKind::UnrecognizedChar(ch))),
            };
            return Ok(token);
        }

        self.token_start = self.input.len();
        self.token_pos = self.current_pos();
        Ok(self.pack_token(TokenKind::End))
    }

    fn lex_note(&mut self) -> Result<Token<'a>, LexerError> {
        // pitch letter
        self.next_char();
        if let Some((_, '#')) | Some((_, 'b')) = self.peek_char() {
            self.next_char();
        }
        if !self.peek_char().map_or(false, |(_, ch)| ch.is_ascii_digit()) {
            return Err(self.pack_error(LexerErrorKind::MissingOctave));
        }
        self.skip_while(|c| c.is_ascii_digit());
        Ok(self.pack_token(TokenKind::Note))
    }

    fn lex_ident(&mut self) -> Token<'a> {
        self.skip_while(charsets::is_ident);
        let text = &self.input[self.token_start..self.current_offset()];
        let kind = match text.to_ascii_lowercase().as_str() {
            "tempo" | "bpm" => TokenKind::Tempo,
            "volume" => TokenKind::Volume,
            "repeat" => TokenKind::Repeat,
            "sequence" => TokenKind::Sequence,
            _ => TokenKind::Ident,
        };
        self.pack_token(kind)
    }

    fn lex_number(&mut self) -> Token<'a> {
        self.skip_while(charsets::is_number);
        self.pack_token(TokenKind::Number)
    }

    fn pack_token(&self, kind: TokenKind) -> Token<'a> {
        Token {
            kind,
            text: &self.input[self.token_start..self.current_offset()],
            pos: self.token_pos,
        }
    }

    fn pack_error(&self, kind: LexerErrorKind) -> LexerError {
        LexerError {
            pos: self.token_pos,
            kind,
        }
    }
}

/// Scan the whole input, including the final `End` token.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexerError> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        tokens.push(token);
        if token.kind == TokenKind::End {
            return Ok(tokens);
        }
    }
}

/// Defines the charsets of various things that can be lexed
mod charsets {

    pub fn is_note_start(ch: char) -> bool {
        matches!(ch.to_ascii_uppercase(), 'A'..='G')
    }

    /// Characters that turn a pitch letter into a note rather than an identifier.
    pub fn is_note_cont(ch: char) -> bool {
        ch == '#' || ch == 'b' || ch.is_ascii_digit()
    }

    pub fn is_ident(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    pub fn is_number(ch: char) -> bool {
        ch.is_ascii_digit() || ch == '/' || ch == '.'
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::{expect, Expect};

    fn check(input: &str, output: Expect) {
        let tokens = tokenize(input).map(|tokens| {
            tokens
                .iter()
                .map(|tok| format!("{:?}({:?})@{}", tok.kind, tok.text, tok.pos))
                .collect::<Vec<_>>()
                .join(" ")
        });
        let token_str = match tokens {
            Ok(s) => s,
            Err(err) => format!("error: {}", err),
        };
        output.assert_eq(&token_str);
    }

    #[test]
    fn notes_and_durations() {
        check(
            "C4 1/4, D#5 1/8 Eb3 1",
            expect![[r#"Note("C4")@1:1 Number("1/4")@1:4 Comma(",")@1:7 Note("D#5")@1:9 Number("1/8")@1:13 Note("Eb3")@1:17 Number("1")@1:21 End("")@1:22"#]],
        );
    }

    #[test]
    fn lowercase_notes() {
        check(
            "c4 bb2",
            expect![[r#"Note("c4")@1:1 Note("bb2")@1:4 End("")@1:7"#]],
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        check(
            "Tempo 90 VOLUME 50 bpm repeat(2) sequence melody_a",
            expect![[r#"Tempo("Tempo")@1:1 Number("90")@1:7 Volume("VOLUME")@1:10 Number("50")@1:17 Tempo("bpm")@1:20 Repeat("repeat")@1:24 ParenOpen("(")@1:30 Number("2")@1:31 ParenClose(")")@1:32 Sequence("sequence")@1:34 Ident("melody_a")@1:43 End("")@1:51"#]],
        );
    }

    #[test]
    fn bare_pitch_letter_is_an_identifier() {
        check(
            "C 1/4",
            expect![[r#"Ident("C")@1:1 Number("1/4")@1:3 End("")@1:6"#]],
        );
    }

    #[test]
    fn comments_and_lines() {
        check(
            "// intro\ntempo 100 // slow\n\n  { C4 1/2 }",
            expect![[r#"Tempo("tempo")@2:1 Number("100")@2:7 BraceOpen("{")@4:3 Note("C4")@4:5 Number("1/2")@4:8 BraceClose("}")@4:12 End("")@4:13"#]],
        );
    }

    #[test]
    fn missing_octave() {
        check("x Eb 1/4", expect![[r#"error: note is missing its octave at 1:3"#]]);
        check("\n  C#", expect![[r#"error: note is missing its octave at 2:3"#]]);
    }

    #[test]
    fn unrecognized_char() {
        check("C4 1/4 ; D4", expect![[r#"error: unrecognized character ';' at 1:8"#]]);
    }

    #[test]
    fn end_is_sticky() {
        let mut lexer = Lexer::new("A4");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Note);
        for _ in 0..3 {
            let token = lexer.next_token().unwrap();
            assert_eq!(token.kind, TokenKind::End);
            assert_eq!(token.pos, Pos::new(1, 3));
        }
    }

    #[test]
    fn empty_input() {
        check("", expect![[r#"End("")@1:1"#]]);
        check("  \n// nothing\n", expect![[r#"End("")@3:1"#]]);
    }
}
