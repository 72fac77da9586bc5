// sonoscript -- a small language for writing down melodies
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! What the interpreter hands to a synthesizer.

use std::fmt;

use super::WaveShape;

/// A single note on the timeline. All times are absolute, in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteEvent {
    /// Pitch in Hz
    pub frequency: f64,
    pub start: f64,
    pub duration: f64,
    /// Peak amplitude between 0.0 and 1.0 inclusive
    pub amplitude: f64,
}

impl NoteEvent {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// The gain of a note at an absolute point in time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Breakpoint {
    pub time: f64,
    pub gain: f64,
}

impl Breakpoint {
    pub fn new(time: f64, gain: f64) -> Self {
        Breakpoint { time, gain }
    }
}

/// Low-pass filter whose cutoff moves linearly over the length of a note.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterSweep {
    pub cutoff_start: f64,
    pub cutoff_end: f64,
    pub resonance: f64,
}

/// Everything a synthesizer needs to know for playing one note.
#[derive(Clone, Debug, PartialEq)]
pub struct Voice {
    pub event: NoteEvent,
    /// Human readable name of the note for notifications.
    pub label: String,
    pub shape: WaveShape,
    /// Gain automation, to be connected by linear ramps.
    pub envelope: [Breakpoint; 5],
    pub filter: Option<FilterSweep>,
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:9.4} {:9.4} {:10.2} {:5.2} {}",
            self.event.start,
            self.event.duration,
            self.event.frequency,
            self.event.amplitude,
            self.shape
        )?;
        if let Some(filter) = &self.filter {
            write!(
                f,
                " lowpass {:.0}->{:.0} q={}",
                filter.cutoff_start, filter.cutoff_end, filter.resonance
            )?;
        }
        Ok(())
    }
}
