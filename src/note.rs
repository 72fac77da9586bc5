// sonoscript -- a small language for writing down melodies
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Definitions of what a note is.

use std::fmt;

/// The name of a note in standard notation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NoteName {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

/// Any offset applied to a note in standard notation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Accidental {
    /// The note is a half-tone lower then indicated by its name.
    Flat,
    /// The note is left unchanged.
    Natural,
    /// The note is a half-tone higher then indicated by its name.
    Sharp,
}

impl NoteName {
    /// Parse a pitch letter. Only upper case letters name notes.
    pub fn from_char(ch: char) -> Option<NoteName> {
        let name = match ch {
            'A' => NoteName::A,
            'B' => NoteName::B,
            'C' => NoteName::C,
            'D' => NoteName::D,
            'E' => NoteName::E,
            'F' => NoteName::F,
            'G' => NoteName::G,
            _ => return None,
        };
        Some(name)
    }

    pub fn letter(self) -> char {
        match self {
            NoteName::A => 'A',
            NoteName::B => 'B',
            NoteName::C => 'C',
            NoteName::D => 'D',
            NoteName::E => 'E',
            NoteName::F => 'F',
            NoteName::G => 'G',
        }
    }
}

impl Accidental {
    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::Flat => "b",
            Accidental::Natural => "",
            Accidental::Sharp => "#",
        }
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl fmt::Display for Accidental {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Split a note of the format `<letter><accidental><octave>` into its parts.
/// The octave is returned as the unparsed string of digits.
///
/// # Examples
///
/// ```
/// use sonoscript::note::*;
///
/// assert_eq!(split_note("A4"), Some((NoteName::A, Accidental::Natural, "4")));
/// assert_eq!(split_note("C#10"), Some((NoteName::C, Accidental::Sharp, "10")));
/// assert_eq!(split_note("c#10"), None);
/// assert_eq!(split_note("Gb2"), Some((NoteName::G, Accidental::Flat, "2")));
/// assert_eq!(split_note("H2"), None);
/// assert_eq!(split_note("Eb"), None);
/// assert_eq!(split_note("E4b"), None);
/// ```
pub fn split_note(note: &str) -> Option<(NoteName, Accidental, &str)> {
    let mut chars = note.chars();
    let name = NoteName::from_char(chars.next()?)?;

    let rest = chars.as_str();
    let (accidental, octave) = if let Some(octave) = rest.strip_prefix('#') {
        (Accidental::Sharp, octave)
    } else if let Some(octave) = rest.strip_prefix('b') {
        (Accidental::Flat, octave)
    } else {
        (Accidental::Natural, rest)
    };

    if octave.is_empty() || !octave.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    Some((name, accidental, octave))
}

/// Length of a note duration literal in beats, where one beat is a quarter note.
///
/// # Examples
///
/// ```
/// use sonoscript::note::duration_beats;
///
/// assert_eq!(duration_beats("1"), Some(4.0));
/// assert_eq!(duration_beats("1/4"), Some(1.0));
/// assert_eq!(duration_beats("1/16"), Some(0.25));
/// assert_eq!(duration_beats("1/3"), None);
/// ```
pub fn duration_beats(literal: &str) -> Option<f64> {
    let beats = match literal {
        "1" => 4.0,
        "1/2" => 2.0,
        "1/4" => 1.0,
        "1/8" => 0.5,
        "1/16" => 0.25,
        _ => return None,
    };
    Some(beats)
}
