// sonoscript -- a small language for writing down melodies
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

use crate::note::*;

/// Frequency in Hz of a key in octave 0.
/// Enharmonic spellings, e.g. C♯ and D♭, share the same key.
/// Returns `None` for spellings without a key of their own, like C♭.
///
/// # Examples
///
/// ```
/// use sonoscript::note::*;
/// use sonoscript::synth::tuning::*;
/// assert_eq!(base_frequency(NoteName::A, Accidental::Natural), Some(27.5));
/// let c_sharp = base_frequency(NoteName::C, Accidental::Sharp);
/// assert_eq!(c_sharp, base_frequency(NoteName::D, Accidental::Flat));
/// assert_eq!(base_frequency(NoteName::E, Accidental::Sharp), None);
/// ```
pub fn base_frequency(name: NoteName, accidental: Accidental) -> Option<f64> {
    use Accidental::*;
    use NoteName::*;
    let frequency = match (name, accidental) {
        (C, Natural) => 16.35,
        (C, Sharp) | (D, Flat) => 17.32,
        (D, Natural) => 18.35,
        (D, Sharp) | (E, Flat) => 19.45,
        (E, Natural) => 20.6,
        (F, Natural) => 21.83,
        (F, Sharp) | (G, Flat) => 23.12,
        (G, Natural) => 24.5,
        (G, Sharp) | (A, Flat) => 25.96,
        (A, Natural) => 27.5,
        (A, Sharp) | (B, Flat) => 29.14,
        (B, Natural) => 30.87,
        _ => return None,
    };
    Some(frequency)
}

/// Frequency of a key in the given octave, doubling with every octave.
/// Returns `None` if the key does not exist or the result is not a finite number.
///
/// # Examples
///
/// ```
/// use sonoscript::note::*;
/// use sonoscript::synth::tuning::*;
/// assert_eq!(frequency(NoteName::A, Accidental::Natural, 4), Some(440.0));
/// assert_eq!(frequency(NoteName::C, Accidental::Natural, 4), Some(16.35 * 16.0));
/// assert_eq!(frequency(NoteName::C, Accidental::Natural, 5000), None);
/// ```
pub fn frequency(name: NoteName, accidental: Accidental, octave: u32) -> Option<f64> {
    let base = base_frequency(name, accidental)?;
    let octave = octave.min(i32::MAX as u32) as i32;
    let frequency = base * 2.0f64.powi(octave);
    if frequency.is_finite() {
        Some(frequency)
    } else {
        None
    }
}
