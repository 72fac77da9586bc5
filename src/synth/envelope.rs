// sonoscript -- a small language for writing down melodies
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

use super::event::Breakpoint;

/// An Attack-Decay-Sustain-Release envelope.
/// When a note starts, the amplitude first rises from zero to the peak over `attack` seconds,
/// then decays over an additional `decay` seconds to the `sustain` level where it is held.
/// The last `release` seconds of the note fall back to zero.
///
/// When the three phases do not fit into a note, they are shrunk proportionally,
/// see [`ADSR::fit`].
///
/// # Example
///
/// ```
/// use sonoscript::synth::envelope::*;
/// let e = ADSR {
///     attack: 0.25,
///     decay: 0.5,
///     sustain: 0.75,
///     release: 1.0,
/// };
/// // a note of four seconds at full volume
/// assert_eq!(e.gain_at(0.0, 4.0, 1.0), 0.0);
/// assert_eq!(e.gain_at(0.25, 4.0, 1.0), 1.0);
/// assert_eq!(e.gain_at(0.5, 4.0, 1.0), 0.875);
/// assert_eq!(e.gain_at(0.75, 4.0, 1.0), 0.75);
/// assert_eq!(e.gain_at(2.0, 4.0, 1.0), 0.75);
/// assert_eq!(e.gain_at(3.5, 4.0, 1.0), 0.375);
/// assert_eq!(e.gain_at(4.0, 4.0, 1.0), 0.0);
///
/// // This time the note is too short for the envelope
/// assert_eq!(e.gain_at(0.125, 0.875, 1.0), 1.0);
/// assert_eq!(e.gain_at(0.375, 0.875, 1.0), 0.75);
/// assert_eq!(e.gain_at(0.625, 0.875, 1.0), 0.375);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ADSR {
    /// Time in seconds to go from 0.0 to the peak
    pub attack: f64,
    /// Time in seconds to go from the peak to `sustain`.
    pub decay: f64,
    /// Fraction of the peak held after the decay.
    pub sustain: f64,
    /// Time in seconds to go from `sustain` to 0.0.
    pub release: f64,
}

impl Default for ADSR {
    fn default() -> Self {
        ADSR {
            attack: 0.02,
            decay: 0.1,
            sustain: 0.7,
            release: 0.15,
        }
    }
}

impl ADSR {
    /// The envelope adjusted to a note of `duration` seconds.
    /// If attack, decay and release together are longer than the note,
    /// all three are scaled down by the same factor so that they fill the note exactly.
    pub fn fit(&self, duration: f64) -> ADSR {
        let total = self.attack + self.decay + self.release;
        if total <= duration || total <= 0.0 {
            return self.clone();
        }
        let scale = duration / total;
        ADSR {
            attack: self.attack * scale,
            decay: self.decay * scale,
            sustain: self.sustain,
            release: self.release * scale,
        }
    }

    /// The gain curve of a note as absolute points in time,
    /// to be connected by linear ramps.
    /// The times never decrease.
    pub fn breakpoints(&self, start: f64, duration: f64, peak: f64) -> [Breakpoint; 5] {
        let env = self.fit(duration);
        let sustain_level = peak * env.sustain;
        let end = start + duration;
        let decay_end = (start + env.attack + env.decay).min(end);
        // rounding after scaling must not swap decay end and release start
        let release_start = (end - env.release).max(decay_end);
        [
            Breakpoint::new(start, 0.0),
            Breakpoint::new(start + env.attack, peak),
            Breakpoint::new(decay_end, sustain_level),
            Breakpoint::new(release_start, sustain_level),
            Breakpoint::new(end, 0.0),
        ]
    }

    /// Evaluate the envelope `time` seconds after the start of a note.
    pub fn gain_at(&self, time: f64, duration: f64, peak: f64) -> f64 {
        let env = self.fit(duration);
        let sustain_level = peak * env.sustain;
        let release_start = duration - env.release;
        if time < 0.0 || time >= duration {
            0.0
        } else if time < env.attack {
            peak * time / env.attack
        } else if time < env.attack + env.decay {
            let progress = (time - env.attack) / env.decay;
            peak - progress * (peak - sustain_level)
        } else if time < release_start {
            sustain_level
        } else {
            sustain_level * (duration - time) / env.release
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(points: &[Breakpoint]) -> Vec<f64> {
        points.iter().map(|p| p.time).collect()
    }

    #[test]
    fn breakpoints_of_long_note() {
        let e = ADSR {
            attack: 0.25,
            decay: 0.5,
            sustain: 0.75,
            release: 1.0,
        };
        let points = e.breakpoints(10.0, 4.0, 0.5);
        assert_eq!(times(&points), vec![10.0, 10.25, 10.75, 13.0, 14.0]);
        let gains: Vec<f64> = points.iter().map(|p| p.gain).collect();
        assert_eq!(gains, vec![0.0, 0.5, 0.375, 0.375, 0.0]);
    }

    #[test]
    fn short_notes_are_scaled_proportionally() {
        let e = ADSR {
            attack: 0.5,
            decay: 0.5,
            sustain: 0.5,
            release: 1.0,
        };
        let fitted = e.fit(1.0);
        assert_eq!(fitted.attack, 0.25);
        assert_eq!(fitted.decay, 0.25);
        assert_eq!(fitted.release, 0.5);
        assert_eq!(fitted.sustain, 0.5);

        let points = e.breakpoints(2.0, 1.0, 1.0);
        assert_eq!(times(&points), vec![2.0, 2.25, 2.5, 2.5, 3.0]);
        for pair in points.windows(2) {
            assert!(pair[0].time <= pair[1].time);
        }
    }

    #[test]
    fn fitting_envelope_is_unchanged() {
        let e = ADSR::default();
        assert_eq!(e.fit(0.5), e);
        assert_eq!(e.fit(0.3), e);
    }

    #[test]
    fn zero_length_phases() {
        let e = ADSR {
            attack: 0.0,
            decay: 0.0,
            sustain: 1.0,
            release: 0.0,
        };
        assert_eq!(e.gain_at(0.0, 1.0, 0.5), 0.5);
        assert_eq!(e.gain_at(0.999, 1.0, 0.5), 0.5);
        assert_eq!(e.gain_at(1.0, 1.0, 0.5), 0.0);
    }
}
