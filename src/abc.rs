// sonoscript -- a small language for writing down melodies
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Export of programs to ABC notation, for rendering them as sheet music.

use crate::lang::ast::*;
use crate::lang::interp::DEFAULT_TEMPO;
use crate::note::Accidental;

/// A bar line is drawn after this many notes.
const NOTES_PER_BAR: usize = 8;

struct AbcWriter {
    notes: Vec<String>,
}

impl AbcWriter {
    fn new() -> Self {
        Self { notes: Vec::new() }
    }

    fn write_block(&mut self, statements: &[Statement]) {
        for statement in statements {
            match statement {
                // Only the tempo of the header matters, and volume is not notated.
                Statement::Tempo(_) | Statement::Volume(_) => {}
                Statement::Sequence(sequence) => self.write_block(&sequence.body),
                Statement::Repeat(repeat) => {
                    for _ in 0..repeat.count {
                        self.write_block(&repeat.body);
                    }
                }
                Statement::Note(note) => self.notes.push(note_to_abc(note)),
            }
        }
    }
}

/// Spell a single note, e.g. `C#5 1/8` becomes `^c/2`.
///
/// Octave 4 is written in upper case and octave 5 in lower case,
/// lower octaves add commas and higher octaves add apostrophes.
pub fn note_to_abc(note: &NoteExpr) -> String {
    let mut out = String::new();
    match note.accidental {
        Accidental::Sharp => out.push('^'),
        Accidental::Flat => out.push('_'),
        Accidental::Natural => {}
    }

    let letter = note.name.letter();
    if note.octave <= 4 {
        out.push(letter);
        for _ in note.octave..4 {
            out.push(',');
        }
    } else {
        out.push(letter.to_ascii_lowercase());
        for _ in 5..note.octave {
            out.push('\'');
        }
    }

    out.push_str(match note.duration.as_str() {
        "1" => "4",
        "1/2" => "2",
        "1/8" => "/2",
        "1/16" => "/4",
        // quarter notes are the default length
        _ => "",
    });
    out
}

/// Convert a whole program into an ABC tune.
///
/// The tempo in the header is the last tempo set at the top level.
/// Repeats are written out and sequences are flattened.
pub fn to_abc(program: &Program) -> String {
    let bpm = program
        .statements
        .iter()
        .filter_map(|statement| match statement {
            Statement::Tempo(tempo) => Some(tempo.bpm),
            _ => None,
        })
        .last()
        .unwrap_or(DEFAULT_TEMPO);

    let mut writer = AbcWriter::new();
    writer.write_block(&program.statements);

    let mut out = format!("X:1\nT:Score\nM:4/4\nL:1/4\nQ:1/4={}\nK:C\n", bpm);
    for (i, note) in writer.notes.iter().enumerate() {
        out.push_str(note);
        out.push(' ');
        if (i + 1) % NOTES_PER_BAR == 0 && i + 1 < writer.notes.len() {
            out.push_str("|\n");
        }
    }
    out.push_str("|]");
    out
}
