// sonoscript -- a small language for writing down melodies
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Running the language pipeline on a source file, reporting errors with their source location.

use log::{debug, error, info};
use std::io::{self, Write};

use crate::error::Error;
use crate::lang::ast::Program;
use crate::lang::interp::{Interpreter, Listener};
use crate::lang::lexer::{self, TokenKind};
use crate::lang::parser;
use crate::lang::span::LineMap;
use crate::synth::{SynthOptions, Voice};

/// Logs the structure of the melody while it is performed.
struct LogListener;

impl Listener for LogListener {
    fn on_sequence_start(&mut self, name: &str, time: f64) {
        info!("{:8.3}s sequence {}", time, name);
    }

    fn on_sequence_end(&mut self, name: &str, time: f64) {
        debug!("{:8.3}s end of sequence {}", time, name);
    }
}

/// Print the tokens of the source to stdout, one per line.
pub fn dump_tokens(input_name: &str, input: &str) -> io::Result<()> {
    let tokens = lexer::tokenize(input).map_err(|err| report(input_name, input, err.into()))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for token in tokens.iter().filter(|token| token.kind != TokenKind::End) {
        writeln!(out, "{}\t{}\t{}", token.pos, token.kind, token.text)?;
    }
    Ok(())
}

pub fn parse(input_name: &str, input: &str) -> io::Result<Program> {
    debug!("parsing {}", input_name);
    parser::parse(input).map_err(|err| report(input_name, input, err))
}

/// Execute an already parsed program.
pub fn perform(
    input_name: &str,
    input: &str,
    program: &Program,
    now: f64,
    options: SynthOptions,
) -> io::Result<Vec<Voice>> {
    info!("performing {}", input_name);
    let mut interp = Interpreter::new(options);
    let voices = interp
        .execute(program, now, &mut LogListener)
        .map_err(|err| report(input_name, input, err))?;
    info!(
        "{} notes, ending at {:.3}s (tempo {}, volume {})",
        voices.len(),
        interp.cursor(),
        interp.tempo(),
        interp.volume()
    );
    Ok(voices)
}

fn report(input_name: &str, input: &str, err: Error) -> io::Error {
    let lines = LineMap::new(input);
    error!(
        "{} ({}:{})\n{}",
        err,
        input_name,
        err.pos(),
        lines.highlight(err.pos(), true)
    );
    io::Error::new(io::ErrorKind::InvalidData, err)
}
