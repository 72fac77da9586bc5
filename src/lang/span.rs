// sonoscript -- a small language for writing down melodies
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Bits and pieces for locating things in a source text.

use std::fmt;

/// Position inside a text in a form that's useful for human readers.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Pos {
    /// Line number, starting at 1
    pub line: usize,
    /// Position within the line, in characters, starting at 1
    pub column: usize,
}

impl Pos {
    pub const START: Pos = Pos { line: 1, column: 1 };

    pub fn new(line: usize, column: usize) -> Self {
        Pos { line, column }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Splits a source text into lines for printing diagnostics.
pub struct LineMap<'a> {
    /// Ordered vector of the position of line breaks (`\n`)
    line_offsets: Vec<usize>,
    /// The whole source string, needed for extracting the lines.
    source: &'a str,
}

impl<'a> LineMap<'a> {
    pub fn new(s: &'a str) -> Self {
        Self {
            line_offsets: s
                .char_indices()
                .filter_map(|(pos, ch)| if ch == '\n' { Some(pos) } else { None })
                .collect(),
            source: s,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_offsets.len() + 1
    }

    /// Return the text of the given line (starting at 1), without the line break.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sonoscript::lang::span::LineMap;
    /// let m = LineMap::new("tempo 90\nC4 1/4\n");
    /// assert_eq!(m.line(1), "tempo 90");
    /// assert_eq!(m.line(2), "C4 1/4");
    /// assert_eq!(m.line(3), "");
    /// assert_eq!(m.line(7), "");
    /// ```
    pub fn line(&self, line: usize) -> &'a str {
        if line == 0 || line > self.line_count() {
            return "";
        }
        let begin = if line == 1 {
            0
        } else {
            self.line_offsets[line - 2] + 1
        };
        let end = self
            .line_offsets
            .get(line - 1)
            .copied()
            .unwrap_or_else(|| self.source.len());
        &self.source[begin..end]
    }

    /// Prints the line containing `pos`, plus one before and one after,
    /// with line numbers, and marks the column of `pos` with a `^`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sonoscript::lang::span::*;
    /// let m = LineMap::new("tempo 90\nC4 1/3\nD4 1/4");
    /// assert_eq!(
    ///   m.highlight(Pos { line: 2, column: 4 }, false),
    /// r#"   1|tempo 90
    ///    2|C4 1/3
    ///         ^
    ///    3|D4 1/4
    /// "#
    /// )
    /// ```
    pub fn highlight(&self, pos: Pos, colored: bool) -> String {
        let red = "\x1b[31;1m";
        let reset = "\x1b[0m";

        let mut out = String::new();
        let display_start = 1.max(pos.line.saturating_sub(1));
        let display_end = self.line_count().min(pos.line + 1);
        for line in display_start..=display_end {
            let marked = line == pos.line;
            if marked && colored {
                out.push_str(&format!("{}{:4}|{}", red, line, reset));
            } else {
                out.push_str(&format!("{:4}|", line));
            }
            out.push_str(self.line(line));
            out.push('\n');

            if marked {
                out.push_str("     ");
                for _ in 1..pos.column {
                    out.push(' ');
                }
                if colored {
                    out.push_str(red);
                    out.push('^');
                    out.push_str(reset);
                } else {
                    out.push('^');
                }
                out.push('\n');
            }
        }
        out
    }
}
