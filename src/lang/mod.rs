// sonoscript -- a small language for writing down melodies
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

pub mod ast;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod span;

pub use interp::{Interpreter, Listener};
pub use parser::{parse, Parser};
