// sonoscript -- a small language for writing down melodies
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! This namespace contains the description of how notes should sound.
//! Producing the actual waveforms is left to the playback backend.

pub mod envelope;
pub mod event;
pub mod tuning;

pub use event::*;

use std::fmt;
use std::str::FromStr;

use envelope::ADSR;

/// Basic oscillator wave forms.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WaveShape {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

impl FromStr for WaveShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sine" => Ok(WaveShape::Sine),
            "square" => Ok(WaveShape::Square),
            "triangle" => Ok(WaveShape::Triangle),
            "sawtooth" | "saw" => Ok(WaveShape::Sawtooth),
            other => Err(format!("unknown wave shape {:?}", other)),
        }
    }
}

impl fmt::Display for WaveShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WaveShape::Sine => "sine",
            WaveShape::Square => "square",
            WaveShape::Triangle => "triangle",
            WaveShape::Sawtooth => "sawtooth",
        };
        f.write_str(name)
    }
}

/// A resonant low-pass filter applied to every note.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LowPass {
    /// Cutoff frequency in Hz at the start of a note.
    pub cutoff: f64,
    /// Quality factor of the filter.
    pub resonance: f64,
}

impl LowPass {
    /// Over the course of a note, the cutoff drops to this fraction.
    pub const SWEEP_FACTOR: f64 = 0.8;

    pub fn sweep(&self) -> FilterSweep {
        FilterSweep {
            cutoff_start: self.cutoff,
            cutoff_end: self.cutoff * Self::SWEEP_FACTOR,
            resonance: self.resonance,
        }
    }
}

/// Synthesis parameters that are not part of the program itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthOptions {
    pub shape: WaveShape,
    pub envelope: ADSR,
    pub filter: Option<LowPass>,
}

impl Default for SynthOptions {
    fn default() -> Self {
        SynthOptions {
            shape: WaveShape::Triangle,
            envelope: ADSR::default(),
            filter: Some(LowPass {
                cutoff: 2000.0,
                resonance: 1.0,
            }),
        }
    }
}
