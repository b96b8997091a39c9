//! Note Theory
//!
//! Pitch-class arithmetic and chord-name parsing.

use std::{fmt::Display, str::FromStr};
use thiserror::Error;

pub(crate) const SEMITONES: u8 = 12;

const MINOR_THIRD_INTERVAL: u8 = 3;
const MAJOR_THIRD_INTERVAL: u8 = 4;
const FIFTH_INTERVAL: u8 = 7;
const SIXTH_INTERVAL: u8 = 9;
const SEVENTH_INTERVAL: u8 = 10;
const MAJOR_SEVENTH_INTERVAL: u8 = 11;

/// Natural note letters and their height above C, in ascending order
const HEIGHTS: [(char, u8); 7] = [
    ('C', 0),
    ('D', 2),
    ('E', 4),
    ('F', 5),
    ('G', 7),
    ('A', 9),
    ('B', 11),
];

/// Sharp spelling of every pitch class, indexed by height
const NAMES: [&str; SEMITONES as usize] = make_names();

/// Errors raised while turning names into chords and diagrams
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChordError {
    /// The chord name is empty or does not start with a note letter.
    #[error("invalid chord name `{name}`")]
    InvalidChordName {
        /// The rejected chord name.
        name: String,
    },

    /// A tuning entry does not name a note.
    #[error("invalid note `{name}` for string {string}")]
    InvalidTuning {
        /// 1-based index of the offending string.
        string: usize,
        /// The rejected note name.
        name: String,
    },

    /// The tuning did not have one entry per string.
    #[error("expected a {expected}-string tuning, got {got}")]
    TuningLength {
        /// The number of strings of the instrument model (6).
        expected: usize,
        /// The number of tuning entries provided.
        got: usize,
    },

    /// An error occurred during the configuration of the fingering search.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A pitch class height outside `0..12`.
    #[error("pitch class {0} is outside 0..12")]
    InvalidPitch(u8),

    /// A finger that cannot be placed on the instrument.
    #[error("invalid finger: {0}")]
    InvalidFinger(String),
}

/// A note identity modulo the octave, 0 (C) through 11 (B).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct PitchClass(u8);

impl PitchClass {
    /// Build a pitch class, reducing `height` modulo the octave.
    pub const fn new(height: u8) -> Self {
        PitchClass(height % SEMITONES)
    }

    /// Semitones above C, always in `0..12`.
    pub const fn height(self) -> u8 {
        self.0
    }

    /// The pitch class `semitones` above this one.
    pub const fn transpose(self, semitones: u8) -> Self {
        PitchClass::new(self.0 + semitones % SEMITONES)
    }

    /// Name of the pitch class, spelling accidentals as sharps.
    pub const fn name(self) -> &'static str {
        NAMES[self.0 as usize]
    }

    /// Resolve a note name such as `"E"` or `"a#"`.
    ///
    /// Only the leading letter and an optional `#` are read; returns `None`
    /// if the first character is not a note letter.
    pub fn parse(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let base = base_height(chars.next()?)?;
        match chars.next() {
            Some('#') => Some(PitchClass::new(base + 1)),
            _ => Some(PitchClass(base)),
        }
    }
}

impl TryFrom<u8> for PitchClass {
    type Error = ChordError;

    /// Accept a height in `0..12` as is; unlike [`PitchClass::new`] nothing is reduced.
    fn try_from(height: u8) -> Result<Self, Self::Error> {
        if height < SEMITONES {
            Ok(PitchClass(height))
        } else {
            Err(ChordError::InvalidPitch(height))
        }
    }
}

impl From<PitchClass> for u8 {
    fn from(pitch: PitchClass) -> u8 {
        pitch.0
    }
}

impl Display for PitchClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The optional tone added on top of the triad
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extension {
    /// Major sixth (e.g., C-E-G-A)
    Sixth,
    /// Minor seventh (e.g., C-E-G-Bb)
    Seventh,
    /// Major seventh (e.g., C-E-G-B)
    MajorSeventh,
}

impl Extension {
    const fn interval(self) -> u8 {
        match self {
            Extension::Sixth => SIXTH_INTERVAL,
            Extension::Seventh => SEVENTH_INTERVAL,
            Extension::MajorSeventh => MAJOR_SEVENTH_INTERVAL,
        }
    }
}

/// A parsed chord name: root, third quality and optional extension.
///
/// Grammar: root letter (A–G, any case), optional `#`, optional `m`, then
/// optionally one of `6`, `7` or `M7`. Anything after that is ignored.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChordName {
    /// Root note, sharp included.
    pub root: PitchClass,
    /// Minor third instead of major third.
    pub minor: bool,
    /// Sixth or seventh added to the triad.
    pub extension: Option<Extension>,
}

impl ChordName {
    /// Parse a chord name, returning `None` when the root is not a note letter.
    pub fn parse(name: &str) -> Option<Self> {
        let rest = name.get(1..)?;
        let mut root = PitchClass(base_height(name.chars().next()?)?);
        let mut rest = rest.as_bytes();

        if let [b'#', tail @ ..] = rest {
            root = root.transpose(1);
            rest = tail;
        }
        let minor = matches!(rest, [b'm', ..]);
        if minor {
            rest = &rest[1..];
        }
        let extension = match rest {
            [b'6', ..] => Some(Extension::Sixth),
            [b'7', ..] => Some(Extension::Seventh),
            [b'M', b'7', ..] => Some(Extension::MajorSeventh),
            _ => None,
        };

        Some(ChordName {
            root,
            minor,
            extension,
        })
    }

    /// Chord tones in root, third, fifth, extension order.
    pub fn tones(&self) -> Vec<PitchClass> {
        let third = if self.minor {
            MINOR_THIRD_INTERVAL
        } else {
            MAJOR_THIRD_INTERVAL
        };
        let mut tones = vec![
            self.root,
            self.root.transpose(third),
            self.root.transpose(FIFTH_INTERVAL),
        ];
        if let Some(ext) = self.extension {
            tones.push(self.root.transpose(ext.interval()));
        }
        tones
    }
}

impl FromStr for ChordName {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChordName::parse(s).ok_or_else(|| ChordError::InvalidChordName { name: s.to_string() })
    }
}

impl Display for ChordName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.root.name())?;
        if self.minor {
            f.write_str("m")?;
        }
        match self.extension {
            Some(Extension::Sixth) => f.write_str("6"),
            Some(Extension::Seventh) => f.write_str("7"),
            Some(Extension::MajorSeventh) => f.write_str("M7"),
            None => Ok(()),
        }
    }
}

/// Names of the notes making up `chord_name`.
///
/// Returns an empty vector for an empty name or an unknown root letter.
pub fn compute_notes(chord_name: &str) -> Vec<&'static str> {
    ChordName::parse(chord_name)
        .map(|chord| chord.tones().into_iter().map(PitchClass::name).collect())
        .unwrap_or_default()
}

fn base_height(letter: char) -> Option<u8> {
    let upper = letter.to_ascii_uppercase();
    HEIGHTS
        .iter()
        .find(|&&(l, _)| l == upper)
        .map(|&(_, h)| h)
}

/// Exact natural when one matches, otherwise the preceding natural plus `#`.
const fn make_names() -> [&'static str; SEMITONES as usize] {
    const SHARPS: [&str; 7] = ["C#", "D#", "E#", "F#", "G#", "A#", "B#"];
    const NATURALS: [&str; 7] = ["C", "D", "E", "F", "G", "A", "B"];
    let mut names = [""; SEMITONES as usize];
    let mut height = 0;
    while height < SEMITONES as usize {
        let mut prev = 0;
        let mut i = 0;
        let mut exact = false;
        while i < HEIGHTS.len() {
            let h = HEIGHTS[i].1 as usize;
            if h == height {
                exact = true;
                prev = i;
                break;
            }
            if h > height {
                break;
            }
            prev = i;
            i += 1;
        }
        names[height] = if exact { NATURALS[prev] } else { SHARPS[prev] };
        height += 1;
    }
    names
}
