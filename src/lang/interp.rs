// sonoscript -- a small language for writing down melodies
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Turns a syntax tree into a timeline of notes.

use log::{debug, trace};

use super::ast::*;
use super::span::Pos;
use crate::error::{Error, SemanticErrorKind};
use crate::note;
use crate::synth::{tuning, NoteEvent, SynthOptions, Voice};

pub const DEFAULT_TEMPO: u32 = 120;
pub const DEFAULT_VOLUME: u32 = 80;

/// Notifications about the progress of a performance.
/// All times are absolute seconds on the same clock as the produced notes.
///
/// The callbacks are invoked while the program is executed, in program order,
/// not when the notes are actually audible.
pub trait Listener {
    fn on_note_start(&mut self, _label: &str, _time: f64) {}
    fn on_note_end(&mut self, _label: &str, _time: f64) {}
    fn on_sequence_start(&mut self, _name: &str, _time: f64) {}
    fn on_sequence_end(&mut self, _name: &str, _time: f64) {}
}

/// Ignores all notifications.
impl Listener for () {}

impl<L: Listener + ?Sized> Listener for &mut L {
    fn on_note_start(&mut self, label: &str, time: f64) {
        (**self).on_note_start(label, time)
    }

    fn on_note_end(&mut self, label: &str, time: f64) {
        (**self).on_note_end(label, time)
    }

    fn on_sequence_start(&mut self, name: &str, time: f64) {
        (**self).on_sequence_start(name, time)
    }

    fn on_sequence_end(&mut self, name: &str, time: f64) {
        (**self).on_sequence_end(name, time)
    }
}

/// The mutable part of a performance.
#[derive(Debug, Clone, PartialEq)]
struct Performance {
    /// Beats per minute
    tempo: u32,
    /// Percent of the full amplitude
    volume: u32,
    /// Start time of the next note in seconds
    cursor: f64,
}

impl Performance {
    fn new(now: f64) -> Self {
        Performance {
            tempo: DEFAULT_TEMPO,
            volume: DEFAULT_VOLUME,
            cursor: now,
        }
    }
}

pub struct Interpreter {
    options: SynthOptions,
    state: Performance,
}

impl Interpreter {
    pub fn new(options: SynthOptions) -> Self {
        Self {
            options,
            state: Performance::new(0.0),
        }
    }

    pub fn options(&self) -> &SynthOptions {
        &self.options
    }

    /// Change the synthesis options used for all subsequently executed programs.
    pub fn update_options<F: FnOnce(&mut SynthOptions)>(&mut self, update: F) {
        update(&mut self.options)
    }

    pub fn tempo(&self) -> u32 {
        self.state.tempo
    }

    pub fn volume(&self) -> u32 {
        self.state.volume
    }

    /// Time at which the next note would start.
    pub fn cursor(&self) -> f64 {
        self.state.cursor
    }

    /// Run a whole program, starting the first note at `now`.
    ///
    /// Tempo and volume are reset to their defaults first,
    /// so the same interpreter can execute any number of programs.
    /// The voices are returned in the order of their start times.
    pub fn execute<L: Listener + ?Sized>(
        &mut self,
        program: &Program,
        now: f64,
        listener: &mut L,
    ) -> Result<Vec<Voice>, Error> {
        self.state = Performance::new(now);
        let mut voices = Vec::new();
        self.exec_block(&program.statements, listener, &mut voices)?;
        debug!(
            "scheduled {} notes from {:.3}s to {:.3}s",
            voices.len(),
            now,
            self.state.cursor
        );
        Ok(voices)
    }

    fn exec_block<L: Listener + ?Sized>(
        &mut self,
        statements: &[Statement],
        listener: &mut L,
        voices: &mut Vec<Voice>,
    ) -> Result<(), Error> {
        for statement in statements {
            self.exec_statement(statement, listener, voices)?;
        }
        Ok(())
    }

    fn exec_statement<L: Listener + ?Sized>(
        &mut self,
        statement: &Statement,
        listener: &mut L,
        voices: &mut Vec<Voice>,
    ) -> Result<(), Error> {
        match statement {
            Statement::Tempo(tempo) => {
                if tempo.bpm == 0 {
                    return Err(semantic_error(
                        tempo.pos,
                        SemanticErrorKind::InvalidTempo(tempo.bpm),
                    ));
                }
                debug!("tempo {} at {:.3}s", tempo.bpm, self.state.cursor);
                self.state.tempo = tempo.bpm;
            }
            Statement::Volume(volume) => {
                if volume.percent > 100 {
                    return Err(semantic_error(
                        volume.pos,
                        SemanticErrorKind::VolumeOutOfRange(volume.percent),
                    ));
                }
                debug!("volume {} at {:.3}s", volume.percent, self.state.cursor);
                self.state.volume = volume.percent;
            }
            Statement::Sequence(sequence) => {
                debug!("sequence {} starts at {:.3}s", sequence.name, self.state.cursor);
                listener.on_sequence_start(&sequence.name, self.state.cursor);
                self.exec_block(&sequence.body, listener, voices)?;
                listener.on_sequence_end(&sequence.name, self.state.cursor);
                debug!("sequence {} ends at {:.3}s", sequence.name, self.state.cursor);
            }
            Statement::Repeat(repeat) => {
                for _ in 0..repeat.count {
                    self.exec_block(&repeat.body, listener, voices)?;
                }
            }
            Statement::Note(note) => {
                let voice = self.play_note(note)?;
                let event = voice.event;
                self.state.cursor += event.duration;
                listener.on_note_start(&voice.label, event.start);
                listener.on_note_end(&voice.label, event.end());
                voices.push(voice);
            }
        }
        Ok(())
    }

    /// Schedule a note at the current cursor position.
    fn play_note(&self, note: &NoteExpr) -> Result<Voice, Error> {
        if tuning::base_frequency(note.name, note.accidental).is_none() {
            return Err(semantic_error(
                note.pos,
                SemanticErrorKind::UnknownPitch(note.name, note.accidental),
            ));
        }
        let frequency = tuning::frequency(note.name, note.accidental, note.octave).ok_or_else(|| {
            semantic_error(
                note.pos,
                SemanticErrorKind::NonFiniteFrequency { octave: note.octave },
            )
        })?;
        let beats = note::duration_beats(&note.duration).ok_or_else(|| {
            semantic_error(note.pos, SemanticErrorKind::UnknownDuration(note.duration.clone()))
        })?;

        let event = NoteEvent {
            frequency,
            start: self.state.cursor,
            duration: beats * 60.0 / self.state.tempo as f64,
            amplitude: self.state.volume as f64 / 100.0,
        };
        trace!(
            "{}{}{} {} -> {:.2} Hz at {:.3}s for {:.3}s",
            note.name,
            note.accidental,
            note.octave,
            note.duration,
            event.frequency,
            event.start,
            event.duration
        );

        Ok(Voice {
            event,
            label: format!("{:.2} Hz", frequency),
            shape: self.options.shape,
            envelope: self
                .options
                .envelope
                .breakpoints(event.start, event.duration, event.amplitude),
            filter: self.options.filter.map(|filter| filter.sweep()),
        })
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new(SynthOptions::default())
    }
}

fn semantic_error(pos: Pos, kind: SemanticErrorKind) -> Error {
    Error::Semantic { pos, kind }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::lang::parser::parse;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        NoteStart(String, f64),
        NoteEnd(String, f64),
        SequenceStart(String, f64),
        SequenceEnd(String, f64),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Listener for Recorder {
        fn on_note_start(&mut self, label: &str, time: f64) {
            self.calls.push(Call::NoteStart(label.to_owned(), time));
        }

        fn on_note_end(&mut self, label: &str, time: f64) {
            self.calls.push(Call::NoteEnd(label.to_owned(), time));
        }

        fn on_sequence_start(&mut self, name: &str, time: f64) {
            self.calls.push(Call::SequenceStart(name.to_owned(), time));
        }

        fn on_sequence_end(&mut self, name: &str, time: f64) {
            self.calls.push(Call::SequenceEnd(name.to_owned(), time));
        }
    }

    fn run(source: &str) -> Vec<NoteEvent> {
        let program = parse(source).unwrap();
        Interpreter::default()
            .execute(&program, 0.0, &mut ())
            .unwrap()
            .into_iter()
            .map(|voice| voice.event)
            .collect()
    }

    fn run_err(source: &str) -> Error {
        let program = parse(source).unwrap();
        Interpreter::default()
            .execute(&program, 0.0, &mut ())
            .unwrap_err()
    }

    fn starts(events: &[NoteEvent]) -> Vec<f64> {
        events.iter().map(|e| e.start).collect()
    }

    fn durations(events: &[NoteEvent]) -> Vec<f64> {
        events.iter().map(|e| e.duration).collect()
    }

    #[test]
    fn notes_follow_each_other() {
        let events = run("C4 1/4, D4 1/8, E4 1/2, F4 1/16, G4 1");
        assert_eq!(durations(&events), vec![0.5, 0.25, 1.0, 0.125, 2.0]);
        for pair in events.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start);
        }
    }

    #[test]
    fn tempo_affects_only_later_notes() {
        let events = run("C4 1/4 tempo 60 C4 1/4 C4 1/8");
        assert_eq!(durations(&events), vec![0.5, 1.0, 0.5]);
        assert_eq!(starts(&events), vec![0.0, 0.5, 1.5]);
    }

    #[test]
    fn volume_sets_amplitude() {
        let events = run("C4 1/4 volume 50 C4 1/4 volume 0 C4 1/4 volume 100 C4 1/4");
        let amplitudes: Vec<f64> = events.iter().map(|e| e.amplitude).collect();
        assert_eq!(amplitudes, vec![0.8, 0.5, 0.0, 1.0]);
    }

    #[test]
    fn frequencies() {
        let events = run("C0 1/4 C4 1/4 C#4 1/4 Db4 1/4 A4 1/4 Bb2 1/4");
        assert_eq!(events[0].frequency, 16.35);
        assert_eq!(events[1].frequency, 16.35 * 16.0);
        assert_eq!(events[2].frequency, events[3].frequency);
        assert_eq!(events[4].frequency, 440.0);
        assert_eq!(events[5].frequency, 29.14 * 4.0);
    }

    #[test]
    fn repeat_zero_is_silent() {
        let program = parse("repeat(0) { A4 1/4 }").unwrap();
        let mut interpreter = Interpreter::default();
        let mut recorder = Recorder::default();
        let voices = interpreter.execute(&program, 2.0, &mut recorder).unwrap();
        assert!(voices.is_empty());
        assert!(recorder.calls.is_empty());
        assert_eq!(interpreter.cursor(), 2.0);
    }

    #[test]
    fn repeat_plays_body_count_times() {
        let events = run("repeat(3) { C4 1/4 }");
        assert_eq!(starts(&events), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn repeat_keeps_state_changes() {
        let events = run("repeat(2) { C4 1/4 tempo 60 } C4 1/4");
        assert_eq!(durations(&events), vec![0.5, 1.0, 1.0]);

        let program = parse("repeat(2) { volume 40 } tempo 90").unwrap();
        let mut interpreter = Interpreter::default();
        interpreter.execute(&program, 0.0, &mut ()).unwrap();
        assert_eq!(interpreter.volume(), 40);
        assert_eq!(interpreter.tempo(), 90);
    }

    #[test]
    fn sequence_notifications() {
        let program = parse("tempo 120\nvolume 80\nsequence s { C4 1/4, D4 1/4 }").unwrap();
        let mut recorder = Recorder::default();
        let voices = Interpreter::default()
            .execute(&program, 0.0, &mut recorder)
            .unwrap();
        assert_eq!(voices.len(), 2);
        assert_eq!(
            recorder.calls,
            vec![
                Call::SequenceStart("s".to_owned(), 0.0),
                Call::NoteStart("261.60 Hz".to_owned(), 0.0),
                Call::NoteEnd("261.60 Hz".to_owned(), 0.5),
                Call::NoteStart("293.60 Hz".to_owned(), 0.5),
                Call::NoteEnd("293.60 Hz".to_owned(), 1.0),
                Call::SequenceEnd("s".to_owned(), 1.0),
            ]
        );
    }

    #[test]
    fn nested_sequences_share_the_clock() {
        let program = parse("C4 1/2 sequence outer { sequence inner { C4 1/4 } D4 1/4 }").unwrap();
        let mut recorder = Recorder::default();
        Interpreter::default()
            .execute(&program, 0.0, &mut recorder)
            .unwrap();
        let boundaries: Vec<Call> = recorder
            .calls
            .into_iter()
            .filter(|call| matches!(call, Call::SequenceStart(..) | Call::SequenceEnd(..)))
            .collect();
        assert_eq!(
            boundaries,
            vec![
                Call::SequenceStart("outer".to_owned(), 1.0),
                Call::SequenceStart("inner".to_owned(), 1.0),
                Call::SequenceEnd("inner".to_owned(), 1.5),
                Call::SequenceEnd("outer".to_owned(), 2.0),
            ]
        );
    }

    #[test]
    fn starts_at_now() {
        let program = parse("C4 1/4 D4 1/4").unwrap();
        let voices = Interpreter::default()
            .execute(&program, 10.0, &mut ())
            .unwrap();
        assert_eq!(voices[0].event.start, 10.0);
        assert_eq!(voices[1].event.start, 10.5);
    }

    #[test]
    fn interpreter_is_reusable() {
        let mut interpreter = Interpreter::default();
        let first = parse("tempo 60 volume 10 C4 1/4").unwrap();
        let second = parse("C4 1/4").unwrap();
        interpreter.execute(&first, 0.0, &mut ()).unwrap();
        let voices = interpreter.execute(&second, 0.0, &mut ()).unwrap();
        assert_eq!(voices[0].event.duration, 0.5);
        assert_eq!(voices[0].event.amplitude, 0.8);
        assert_eq!(voices[0].event.start, 0.0);
    }

    #[test]
    fn voices_carry_synth_parameters() {
        let program = parse("C4 1/4").unwrap();
        let mut interpreter = Interpreter::default();
        let voice = interpreter.execute(&program, 1.0, &mut ()).unwrap().remove(0);
        assert_eq!(voice.envelope[0].time, 1.0);
        assert_eq!(voice.envelope[1].gain, 0.8);
        assert_eq!(voice.envelope[4].time, 1.5);
        assert_eq!(voice.envelope[4].gain, 0.0);
        assert!(voice.filter.is_some());

        interpreter.update_options(|options| {
            options.filter = None;
            options.shape = crate::synth::WaveShape::Sine;
        });
        let voice = interpreter.execute(&program, 0.0, &mut ()).unwrap().remove(0);
        assert_eq!(voice.filter, None);
        assert_eq!(voice.shape, crate::synth::WaveShape::Sine);
        assert_eq!(interpreter.options().filter, None);
    }

    #[test]
    fn semantic_errors() {
        let err = run_err("C4 1/4\n  Cb4 1/4");
        assert_eq!(err.kind(), ErrorKind::Semantic);
        assert_eq!(err.pos(), Pos::new(2, 3));
        assert_eq!(err.to_string(), "semantic error at 2:3: unknown pitch Cb");

        assert_eq!(
            run_err("E#2 1/4").to_string(),
            "semantic error at 1:1: unknown pitch E#"
        );
        assert_eq!(
            run_err("C4 1/3").to_string(),
            "semantic error at 1:1: unknown duration \"1/3\", expected one of 1, 1/2, 1/4, 1/8, 1/16"
        );
        assert_eq!(
            run_err("C2000 1/4").to_string(),
            "semantic error at 1:1: octave 2000 is too high to be played"
        );
        let err = run_err("C4 1/4 C99999999999 1/4");
        assert_eq!(err.kind(), ErrorKind::Semantic);
        assert_eq!(err.pos(), Pos::new(1, 8));
        assert_eq!(
            err.to_string(),
            "semantic error at 1:8: octave 4294967295 is too high to be played"
        );
        assert_eq!(
            run_err("tempo 0").to_string(),
            "semantic error at 1:1: tempo must be positive, got 0"
        );
        assert_eq!(
            run_err("volume 101").to_string(),
            "semantic error at 1:1: volume must be between 0 and 100, got 101"
        );
    }

    #[test]
    fn errors_abort_the_whole_run() {
        let program = parse("sequence s { C4 1/4 C4 1/5 D4 1/4 }").unwrap();
        let mut recorder = Recorder::default();
        let result = Interpreter::default().execute(&program, 0.0, &mut recorder);
        assert!(result.is_err());
        // the sequence never ends
        assert_eq!(recorder.calls.len(), 3);
    }
}
