// sonoscript -- a small language for writing down melodies
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Implementation of the melody compiler (sonoc).

pub mod eval;
pub mod output;

use std::io;
use std::path::PathBuf;

use structopt::StructOpt;

use crate::synth::{envelope::ADSR, LowPass, SynthOptions, WaveShape};

#[derive(Debug, StructOpt)]
#[structopt(name = "sonoc", about = "Compiling melodies into timelines of notes")]
pub struct Opt {
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: usize,

    /// The source code of the melody.
    #[structopt(parse(from_os_str))]
    source: PathBuf,

    /// Output file for the timeline. Printed to stdout if not given.
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Also write the melody as ABC notation to this file.
    #[structopt(long, parse(from_os_str))]
    abc: Option<PathBuf>,

    /// Print the tokens of the source code.
    #[structopt(long)]
    dump_tokens: bool,

    /// Print the syntax tree of the source code.
    #[structopt(long)]
    dump_ast: bool,

    /// Start time of the first note in seconds.
    #[structopt(long, default_value = "0")]
    start: f64,

    /// Wave shape of the oscillator (sine, square, triangle, sawtooth).
    #[structopt(long)]
    wave: Option<WaveShape>,

    /// Attack time of the envelope in seconds.
    #[structopt(long)]
    attack: Option<f64>,

    /// Decay time of the envelope in seconds.
    #[structopt(long)]
    decay: Option<f64>,

    /// Sustain level of the envelope, relative to the peak.
    #[structopt(long)]
    sustain: Option<f64>,

    /// Release time of the envelope in seconds.
    #[structopt(long)]
    release: Option<f64>,

    /// Cutoff frequency of the low-pass filter in Hz.
    #[structopt(long)]
    cutoff: Option<f64>,

    /// Resonance of the low-pass filter.
    #[structopt(long)]
    resonance: Option<f64>,

    /// Play the notes without low-pass filter.
    #[structopt(long, conflicts_with_all = &["cutoff", "resonance"])]
    no_filter: bool,
}

impl Opt {
    /// The default synthesizer settings, overridden by the given flags.
    pub fn synth_options(&self) -> SynthOptions {
        let defaults = SynthOptions::default();
        let default_filter = defaults.filter.unwrap_or(LowPass {
            cutoff: 2000.0,
            resonance: 1.0,
        });
        SynthOptions {
            shape: self.wave.unwrap_or(defaults.shape),
            envelope: ADSR {
                attack: self.attack.unwrap_or(defaults.envelope.attack),
                decay: self.decay.unwrap_or(defaults.envelope.decay),
                sustain: self.sustain.unwrap_or(defaults.envelope.sustain),
                release: self.release.unwrap_or(defaults.envelope.release),
            },
            filter: if self.no_filter {
                None
            } else {
                Some(LowPass {
                    cutoff: self.cutoff.unwrap_or(default_filter.cutoff),
                    resonance: self.resonance.unwrap_or(default_filter.resonance),
                })
            },
        }
    }
}

pub fn main() -> io::Result<()> {
    let opt = Opt::from_args();

    let level = match opt.verbose {
        0 => log::Level::Info,
        1 => log::Level::Debug,
        _ => log::Level::Trace,
    };
    simple_logger::init_with_level(level)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;

    let source = std::fs::read_to_string(&opt.source)?;
    let input_name = opt.source.to_string_lossy();

    if opt.dump_tokens {
        eval::dump_tokens(&input_name, &source)?;
    }
    let program = eval::parse(&input_name, &source)?;
    if opt.dump_ast {
        println!("{:#?}", program);
    }
    if let Some(abc_path) = &opt.abc {
        output::write_abc(&program, abc_path)?;
    }

    let voices = eval::perform(&input_name, &source, &program, opt.start, opt.synth_options())?;
    output::write_timeline(&voices, opt.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synth_flags_override_defaults() {
        let opt = Opt::from_iter(&["sonoc", "song.sono", "--wave", "sine", "--attack", "0.5"]);
        let options = opt.synth_options();
        assert_eq!(options.shape, WaveShape::Sine);
        assert_eq!(options.envelope.attack, 0.5);
        assert_eq!(options.envelope.decay, 0.1);
        assert_eq!(options.filter, SynthOptions::default().filter);
    }

    #[test]
    fn filter_can_be_disabled() {
        let opt = Opt::from_iter(&["sonoc", "song.sono", "--no-filter"]);
        assert_eq!(opt.synth_options().filter, None);

        let opt = Opt::from_iter(&["sonoc", "song.sono", "--cutoff", "500"]);
        assert_eq!(
            opt.synth_options().filter,
            Some(LowPass {
                cutoff: 500.0,
                resonance: 1.0
            })
        );
    }
}
