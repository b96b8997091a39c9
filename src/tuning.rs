//! Tuning
//!
//! Open-string pitch classes of a six-string instrument.

use crate::notes::{ChordError, PitchClass};
use std::{fmt::Display, str::FromStr};

/// Number of strings of the instrument model
pub const STRING_COUNT: usize = 6;

/// Standard guitar tuning, string 1 first
pub const STANDARD: [&str; STRING_COUNT] = ["E", "A", "D", "G", "B", "E"];

/// Pitch class of every open string; index 0 is string 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tuning {
    strings: [PitchClass; STRING_COUNT],
}

impl Tuning {
    /// Resolve one note name per string.
    ///
    /// An entry is a note letter, an optional `#` and an optional octave
    /// number, which is ignored (`"E2"`). Unlike chord names, any other
    /// trailing text is rejected, so `"Ab"` is an error rather than `A`.
    ///
    /// Returns:
    /// - `Err(TuningLength)` if `names.len() != 6`.
    /// - `Err(InvalidTuning)` for the first entry that is not a note name.
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Self, ChordError> {
        if names.len() != STRING_COUNT {
            return Err(ChordError::TuningLength {
                expected: STRING_COUNT,
                got: names.len(),
            });
        }
        let mut strings = [PitchClass::default(); STRING_COUNT];
        for (i, (slot, name)) in strings.iter_mut().zip(names).enumerate() {
            let name = name.as_ref();
            *slot = parse_open_string(name).ok_or_else(|| ChordError::InvalidTuning {
                string: i + 1,
                name: name.to_string(),
            })?;
        }
        Ok(Tuning { strings })
    }

    /// Build a tuning from already resolved pitch classes.
    pub const fn from_pitches(strings: [PitchClass; STRING_COUNT]) -> Self {
        Tuning { strings }
    }

    /// E A D G B E
    pub fn standard() -> Self {
        Tuning::from_pitches(STANDARD_PITCHES)
    }

    /// Open-string pitch classes, string 1 first.
    pub fn pitches(&self) -> &[PitchClass; STRING_COUNT] {
        &self.strings
    }

    /// Open-string pitch class of the 1-based `string`, if it exists.
    pub fn open(&self, string: usize) -> Option<PitchClass> {
        string
            .checked_sub(1)
            .and_then(|i| self.strings.get(i))
            .copied()
    }

    /// Pitch class sounded on the 0-based `index` string at `fret`.
    pub(crate) fn sound(&self, index: usize, fret: u8) -> PitchClass {
        self.strings[index].transpose(fret)
    }
}

const STANDARD_PITCHES: [PitchClass; STRING_COUNT] = [
    PitchClass::new(4),
    PitchClass::new(9),
    PitchClass::new(2),
    PitchClass::new(7),
    PitchClass::new(11),
    PitchClass::new(4),
];

impl Default for Tuning {
    fn default() -> Self {
        Tuning::standard()
    }
}

impl FromStr for Tuning {
    type Err = ChordError;

    /// Parse a whitespace separated list such as `"E A D G B E"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let names: Vec<&str> = s.split_whitespace().collect();
        Tuning::new(&names)
    }
}

impl Display for Tuning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, p) in self.strings.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(p.name())?;
        }
        Ok(())
    }
}

/// Note letter, optional `#`, optional octave number.
fn parse_open_string(name: &str) -> Option<PitchClass> {
    let pitch = PitchClass::parse(name)?;
    let rest = name[1..].strip_prefix('#').unwrap_or(&name[1..]);
    rest.bytes().all(|b| b.is_ascii_digit()).then_some(pitch)
}
