//! Chord diagrams
//!
//! Value types describing one fretting of a chord.

use crate::notes::{ChordError, PitchClass};
use crate::tuning::{Tuning, STRING_COUNT};
use std::{collections::BTreeSet, fmt::Display, ops::RangeInclusive};

/// What happens above the nut for one string
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StringState {
    /// The string is not played.
    Muted,
    /// The string is played without a finger.
    Open,
    /// The string is fretted by a finger.
    #[default]
    None,
}

impl Display for StringState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            StringState::Muted => "x",
            StringState::Open => "o",
            StringState::None => "",
        })
    }
}

/// A finger pressing one string, or a barre pressing a range of strings.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "FingerFields"))]
pub struct Finger {
    /// Finger number, 1 for the first finger placed.
    pub number: u8,
    /// Fret pressed, always at least 1.
    pub fret: u8,
    /// First string covered, 1-based.
    pub from: u8,
    /// Last string covered for a barre.
    pub to: Option<u8>,
}

impl Finger {
    /// A finger on a single string.
    pub const fn plain(fret: u8, string: u8) -> Self {
        Finger {
            number: 0,
            fret,
            from: string,
            to: None,
        }
    }

    /// A finger laid across `from..=to`.
    pub const fn barre(fret: u8, from: u8, to: u8) -> Self {
        Finger {
            number: 0,
            fret,
            from,
            to: Some(to),
        }
    }

    /// True when the finger covers more than its first string.
    pub const fn is_barre(&self) -> bool {
        self.to.is_some()
    }

    /// 1-based strings under the finger.
    pub fn strings(&self) -> RangeInclusive<u8> {
        self.from..=self.to.unwrap_or(self.from)
    }

    /// Whether the 1-based `string` is under the finger.
    pub fn covers(&self, string: u8) -> bool {
        self.strings().contains(&string)
    }

    /// Check the finger fits the instrument.
    ///
    /// Returns `Err(InvalidFinger)` if the fret is 0 or the strings covered
    /// are not an ascending range within `1..=6`.
    pub fn validate(self) -> Result<Self, ChordError> {
        let last = STRING_COUNT as u8;
        if self.fret == 0 {
            return Err(ChordError::InvalidFinger(
                "fret 0 is an open string, not a finger".into(),
            ));
        }
        if !(1..=last).contains(&self.from) {
            return Err(ChordError::InvalidFinger(format!(
                "string {} outside 1..={last}",
                self.from
            )));
        }
        if let Some(to) = self.to {
            if !(self.from..=last).contains(&to) {
                return Err(ChordError::InvalidFinger(format!(
                    "barre {}..={to} outside {}..={last}",
                    self.from, self.from
                )));
            }
        }
        Ok(self)
    }
}

/// Unchecked wire form of a [`Finger`]
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct FingerFields {
    number: u8,
    fret: u8,
    from: u8,
    to: Option<u8>,
}

#[cfg(feature = "serde")]
impl TryFrom<FingerFields> for Finger {
    type Error = ChordError;

    fn try_from(f: FingerFields) -> Result<Self, Self::Error> {
        Finger {
            number: f.number,
            fret: f.fret,
            from: f.from,
            to: f.to,
        }
        .validate()
    }
}

/// One fretting diagram.
///
/// Every string that is neither muted nor open is covered by at least one
/// finger; where several cover it, the highest fret sounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chord {
    /// Chord name the diagram was computed for.
    pub name: String,
    /// State of each string, string 1 first.
    pub string_top: [StringState; STRING_COUNT],
    /// Fingers, numbered after finger assignment.
    pub fingers: Vec<Finger>,
}

impl Chord {
    /// Diagram with every string marked fretted and no fingers yet.
    pub fn new(name: impl Into<String>) -> Self {
        Chord {
            name: name.into(),
            string_top: [StringState::None; STRING_COUNT],
            fingers: Vec::new(),
        }
    }

    /// Lowest fret pressed, `None` when every sounded string is open.
    pub fn min_fret(&self) -> Option<u8> {
        self.fingers.iter().map(|f| f.fret).min()
    }

    /// Highest fret pressed.
    pub fn max_fret(&self) -> Option<u8> {
        self.fingers.iter().map(|f| f.fret).max()
    }

    /// Number of frets the hand spans, 0 without fingers.
    pub fn span(&self) -> u8 {
        match (self.min_fret(), self.max_fret()) {
            (Some(lo), Some(hi)) => hi - lo + 1,
            _ => 0,
        }
    }

    /// Fret sounding on each string: `None` if muted, `Some(0)` if open.
    pub fn frets(&self) -> [Option<u8>; STRING_COUNT] {
        let mut frets = [None; STRING_COUNT];
        for (i, (slot, state)) in frets.iter_mut().zip(&self.string_top).enumerate() {
            *slot = match state {
                StringState::Muted => None,
                StringState::Open => Some(0),
                StringState::None => {
                    let string = (i + 1) as u8;
                    self.fingers
                        .iter()
                        .filter(|f| f.covers(string))
                        .map(|f| f.fret)
                        .max()
                }
            };
        }
        frets
    }

    /// Distinct pitch classes the diagram sounds with `tuning`.
    pub fn sounded(&self, tuning: &Tuning) -> BTreeSet<PitchClass> {
        self.frets()
            .iter()
            .enumerate()
            .filter_map(|(i, fret)| fret.map(|f| tuning.sound(i, f)))
            .collect()
    }
}
