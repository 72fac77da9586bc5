// sonoscript -- a small language for writing down melodies
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Diagnostics shared by all stages of the pipeline.

use std::fmt;

use snafu::Snafu;

use crate::lang::lexer::{LexerError, LexerErrorKind};
use crate::lang::parser::ParseErrorInfo;
use crate::lang::span::Pos;
use crate::note::{Accidental, NoteName};

/// Errors that abort compiling a program.
/// Every error points at the source location that caused it.
#[derive(Debug, Clone, PartialEq, Snafu)]
pub enum Error {
    #[snafu(display("lexical error at {}: {}", pos, kind))]
    Lexical { pos: Pos, kind: LexerErrorKind },
    #[snafu(display("syntax error at {}: {}", pos, info))]
    Syntax { pos: Pos, info: ParseErrorInfo },
    #[snafu(display("semantic error at {}: {}", pos, kind))]
    Semantic { pos: Pos, kind: SemanticErrorKind },
}

/// The stage of the pipeline that rejected the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Semantic,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Lexical { .. } => ErrorKind::Lexical,
            Error::Syntax { .. } => ErrorKind::Syntax,
            Error::Semantic { .. } => ErrorKind::Semantic,
        }
    }

    /// Line and column of the offending token.
    pub fn pos(&self) -> Pos {
        match self {
            Error::Lexical { pos, .. } => *pos,
            Error::Syntax { pos, .. } => *pos,
            Error::Semantic { pos, .. } => *pos,
        }
    }
}

impl From<LexerError> for Error {
    fn from(err: LexerError) -> Self {
        Error::Lexical {
            pos: err.pos(),
            kind: err.kind(),
        }
    }
}

/// Things that are syntactically fine but cannot be played.
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticErrorKind {
    /// There is no such key, e.g. `Cb` or `E#`.
    UnknownPitch(NoteName, Accidental),
    NonFiniteFrequency { octave: u32 },
    UnknownDuration(String),
    InvalidTempo(u32),
    VolumeOutOfRange(u32),
}

impl fmt::Display for SemanticErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticErrorKind::UnknownPitch(name, accidental) => {
                write!(f, "unknown pitch {}{}", name, accidental)
            }
            SemanticErrorKind::NonFiniteFrequency { octave } => {
                write!(f, "octave {} is too high to be played", octave)
            }
            SemanticErrorKind::UnknownDuration(literal) => write!(
                f,
                "unknown duration {:?}, expected one of 1, 1/2, 1/4, 1/8, 1/16",
                literal
            ),
            SemanticErrorKind::InvalidTempo(bpm) => {
                write!(f, "tempo must be positive, got {}", bpm)
            }
            SemanticErrorKind::VolumeOutOfRange(percent) => {
                write!(f, "volume must be between 0 and 100, got {}", percent)
            }
        }
    }
}
