// sonoscript -- a small language for writing down melodies
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Writing the results of a performance to files.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::info;

use crate::abc;
use crate::lang::ast::Program;
use crate::synth::Voice;

/// Write one line per voice, to stdout if no file is given.
pub fn write_timeline(voices: &[Voice], outfile: Option<&Path>) -> io::Result<()> {
    match outfile {
        Some(path) => {
            info!("writing timeline to {}", path.display());
            let mut out = BufWriter::new(File::create(path)?);
            render_timeline(voices, &mut out)?;
            out.flush()
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            render_timeline(voices, &mut out)
        }
    }
}

pub fn render_timeline<W: Write>(voices: &[Voice], out: &mut W) -> io::Result<()> {
    writeln!(out, "#   start  duration  frequency  gain wave")?;
    for voice in voices {
        writeln!(out, "{}", voice)?;
    }
    Ok(())
}

pub fn write_abc(program: &Program, path: &Path) -> io::Result<()> {
    info!("writing ABC notation to {}", path.display());
    let mut file = File::create(path)?;
    writeln!(file, "{}", abc::to_abc(program))
}
