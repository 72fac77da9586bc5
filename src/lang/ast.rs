// sonoscript -- a small language for writing down melodies
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

use super::span::Pos;
use crate::note::{Accidental, NoteName};

/// A whole source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub pos: Pos,
    pub statements: Vec<Statement>,
}

/// Anything that may appear at the top level or inside a block.
/// Statements are executed in the order in which they appear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Tempo(Tempo),
    Volume(Volume),
    Sequence(Sequence),
    Repeat(Repeat),
    Note(NoteExpr),
}

/// `tempo 120`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tempo {
    pub pos: Pos,
    /// Beats per minute
    pub bpm: u32,
}

/// `volume 80`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    pub pos: Pos,
    /// Not range checked when parsing.
    pub percent: u32,
}

/// `sequence name { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub pos: Pos,
    pub name: String,
    pub body: Vec<Statement>,
}

/// `repeat(count) { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repeat {
    pub pos: Pos,
    pub count: u32,
    pub body: Vec<Statement>,
}

/// `C#4 1/8`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteExpr {
    pub pos: Pos,
    pub name: NoteName,
    pub accidental: Accidental,
    pub octave: u32,
    /// The duration literal exactly as written, e.g. `1/4`.
    pub duration: String,
}
