//! Fingering search
//!
//! Exhaustive search of the fretboard for every playable diagram of a chord,
//! followed by span and note filters, barre collapsing, finger numbering and
//! ranking.

use crate::diagram::{Chord, Finger, StringState};
use crate::notes::{ChordError, ChordName, PitchClass};
use crate::tuning::{Tuning, STRING_COUNT};
use std::{collections::BTreeMap, fmt::Display};

/// Frets searched on each string, open string included
const DEFAULT_FRETS: u8 = 24;

/// Widest hand position, in frets
const DEFAULT_MAX_SPAN: u8 = 5;

/// Fretting fingers of a hand
const DEFAULT_MAX_FINGERS: usize = 4;

/// Diagrams kept after ranking
const DEFAULT_MAX_CHORDS: usize = 200;

/// Upper bound on `frets`: three octaves per string. The search tree grows
/// with the sixth power of the frets matching per string, so past this the
/// frontier no longer fits in memory.
const MAX_FRETS: u8 = 36;

/// Pipeline checkpoints reported to a [`StageObserver`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Every completed fret assignment.
    Enumerated,
    /// Candidates within the maximal hand span.
    SpanFiltered,
    /// Candidates sounding exactly the chord tones.
    CoverageFiltered,
    /// Candidates playable with the available fingers once barres are formed.
    FingerLimited,
    /// Final ranked and truncated diagrams.
    Ranked,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Receives candidate counts as the search progresses.
pub trait StageObserver {
    /// Called once per stage with the number of surviving candidates.
    fn stage(&mut self, stage: Stage, candidates: usize);
}

impl<F: FnMut(Stage, usize)> StageObserver for F {
    fn stage(&mut self, stage: Stage, candidates: usize) {
        self(stage, candidates)
    }
}

/// Builder for `Fingering` to customize the search limits
pub struct FingeringBuilder {
    frets: u8,
    max_span: u8,
    max_fingers: usize,
    max_chords: usize,
}

impl FingeringBuilder {
    /// Start with default parameters:
    /// frets = 24, max_span = 5, max_fingers = 4, max_chords = 200.
    pub fn new() -> Self {
        FingeringBuilder {
            frets: DEFAULT_FRETS,
            max_span: DEFAULT_MAX_SPAN,
            max_fingers: DEFAULT_MAX_FINGERS,
            max_chords: DEFAULT_MAX_CHORDS,
        }
    }

    /// Set the number of frets searched per string, counting the open string.
    ///
    /// `build` accepts 1 to 36. Every extra octave multiplies the candidate
    /// count by up to 64, so values above 24 are slow and memory hungry.
    pub fn frets(mut self, n: u8) -> Self {
        self.frets = n;
        self
    }

    /// Set the widest allowed span between lowest and highest fret.
    pub fn max_span(mut self, n: u8) -> Self {
        self.max_span = n;
        self
    }

    /// Set the number of fingers available after barres are formed.
    pub fn max_fingers(mut self, n: usize) -> Self {
        self.max_fingers = n;
        self
    }

    /// Set the number of diagrams returned.
    pub fn max_chords(mut self, n: usize) -> Self {
        self.max_chords = n;
        self
    }

    /// Finalize and create the `Fingering`.
    pub fn build(self) -> Result<Fingering, ChordError> {
        if self.frets == 0 || self.frets > MAX_FRETS {
            return Err(ChordError::Configuration(format!(
                "frets must be within 1..={MAX_FRETS}, got {}",
                self.frets
            )));
        }
        if self.max_span == 0 {
            return Err(ChordError::Configuration("max_span cannot be zero".into()));
        }
        if self.max_fingers == 0 {
            return Err(ChordError::Configuration("max_fingers cannot be zero".into()));
        }

        Ok(Fingering {
            frets: self.frets,
            max_span: self.max_span,
            max_fingers: self.max_fingers,
            max_chords: self.max_chords,
        })
    }
}

impl Default for FingeringBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Chord diagram search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingering {
    frets: u8,
    max_span: u8,
    max_fingers: usize,
    max_chords: usize,
}

/// Search frontier node: a chord decided up to `next` (0-based string).
struct PendingChord {
    chord: Chord,
    next: usize,
}

impl PendingChord {
    /// Fresh chord with `fret` played on the next string.
    fn branch(&self, fret: u8) -> PendingChord {
        let mut chord = self.chord.clone();
        place(&mut chord, self.next, fret);
        PendingChord {
            chord,
            next: self.next + 1,
        }
    }
}

impl Fingering {
    /// Start customizing with a builder.
    pub fn builder() -> FingeringBuilder {
        FingeringBuilder::new()
    }

    /// Create a search with the default limits.
    pub fn new() -> Self {
        Fingering {
            frets: DEFAULT_FRETS,
            max_span: DEFAULT_MAX_SPAN,
            max_fingers: DEFAULT_MAX_FINGERS,
            max_chords: DEFAULT_MAX_CHORDS,
        }
    }

    /// Every playable diagram of `chord_name` on `tuning`, best ranked first.
    ///
    /// Returns `Err(InvalidChordName)` if the name does not parse.
    pub fn compute(&self, chord_name: &str, tuning: &Tuning) -> Result<Vec<Chord>, ChordError> {
        self.compute_observed(chord_name, tuning, &mut |_: Stage, _: usize| {})
    }

    /// Same as [`Fingering::compute`], reporting candidate counts to `observer`.
    pub fn compute_observed(
        &self,
        chord_name: &str,
        tuning: &Tuning,
        observer: &mut dyn StageObserver,
    ) -> Result<Vec<Chord>, ChordError> {
        let tones = chord_name.parse::<ChordName>()?.tones();

        // 1) enumerate fret assignments
        let mut chords = self.enumerate(chord_name, &tones, tuning);
        report(observer, Stage::Enumerated, chords.len());

        // 2) filter by maximal span
        chords.retain(|c| within_span(c, self.max_span));
        report(observer, Stage::SpanFiltered, chords.len());

        // 3) filter by note content
        chords.retain(|c| c.sounded(tuning).len() == tones.len());
        report(observer, Stage::CoverageFiltered, chords.len());

        // 4) collapse barres, filter by available fingers
        let mut chords: Vec<Chord> = chords
            .into_iter()
            .map(optimize_barres)
            .filter(|c| c.fingers.len() <= self.max_fingers)
            .collect();
        report(observer, Stage::FingerLimited, chords.len());

        // 5) number fingers, rank, truncate
        chords.iter_mut().for_each(assign_fingers);
        rank(&mut chords, self.max_chords);
        report(observer, Stage::Ranked, chords.len());

        Ok(chords)
    }

    /// Breadth-first search over the strings, one layer per string.
    ///
    /// Completed chords come out most recent first.
    fn enumerate(&self, name: &str, tones: &[PitchClass], tuning: &Tuning) -> Vec<Chord> {
        let mut work = self.seed(name, tones[0], tuning);
        let mut completed = Vec::new();

        while !work.is_empty() {
            let mut layer = Vec::with_capacity(work.len());
            for pending in work {
                if pending.next < STRING_COUNT {
                    let open = tuning.pitches()[pending.next];
                    layer.extend(
                        self.frets_sounding(open, tones)
                            .map(|fret| pending.branch(fret)),
                    );
                } else {
                    completed.push(pending.chord);
                }
            }
            work = layer;
        }

        completed.reverse();
        completed
    }

    /// One partial chord per position of the root, strings below it muted.
    fn seed(&self, name: &str, root: PitchClass, tuning: &Tuning) -> Vec<PendingChord> {
        let mut seeds = Vec::new();
        for (i, &open) in tuning.pitches().iter().enumerate() {
            for fret in self.frets_sounding(open, &[root]) {
                log::trace!("seed {name}: string {} fret {fret}", i + 1);
                let mut chord = Chord::new(name);
                chord.string_top[..i].fill(StringState::Muted);
                place(&mut chord, i, fret);
                seeds.push(PendingChord { chord, next: i + 1 });
            }
        }
        seeds
    }

    /// Ascending frets at which `open` sounds one of `targets`.
    fn frets_sounding<'a>(
        &self,
        open: PitchClass,
        targets: &'a [PitchClass],
    ) -> impl Iterator<Item = u8> + 'a {
        (0..self.frets).filter(move |&fret| targets.contains(&open.transpose(fret)))
    }
}

impl Default for Fingering {
    fn default() -> Self {
        Fingering::new()
    }
}

fn report(observer: &mut dyn StageObserver, stage: Stage, candidates: usize) {
    log::debug!("{stage}: {candidates} candidates");
    observer.stage(stage, candidates);
}

/// Play `fret` on the 0-based string `index`: open string or a new finger.
fn place(chord: &mut Chord, index: usize, fret: u8) {
    if fret == 0 {
        chord.string_top[index] = StringState::Open;
    } else {
        let mut finger = Finger::plain(fret, (index + 1) as u8);
        finger.number = chord.fingers.len() as u8 + 1;
        chord.fingers.push(finger);
    }
}

fn within_span(chord: &Chord, max_span: u8) -> bool {
    chord.span() <= max_span
}

/// Replace same-fret fingers by barres where the strings allow it.
fn optimize_barres(chord: Chord) -> Chord {
    let barres: Vec<Finger> = {
        let mut by_fret: BTreeMap<u8, Vec<&Finger>> = BTreeMap::new();
        for finger in &chord.fingers {
            by_fret.entry(finger.fret).or_default().push(finger);
        }
        by_fret
            .iter()
            .filter(|(_, group)| group.len() > 1)
            .filter_map(|(&fret, group)| barre_for(&chord.fingers, fret, group))
            .collect()
    };

    let mut fingers = barres.clone();
    fingers.extend(
        chord
            .fingers
            .iter()
            .filter(|f| !barres.iter().any(|b| b.fret == f.fret && b.covers(f.from)))
            .copied(),
    );
    Chord { fingers, ..chord }
}

/// Barre at `fret` reaching string 6, if one can be laid.
///
/// Strings are scanned from 6 downwards; the barre extends while the string
/// holds a finger at `fret` or one at a higher fret.
fn barre_for(all: &[Finger], fret: u8, group: &[&Finger]) -> Option<Finger> {
    let last = STRING_COUNT as u8;
    let top = (1..=last)
        .rev()
        .take_while(|&s| {
            group.iter().any(|f| f.from == s) || all.iter().any(|f| f.from == s && f.fret > fret)
        })
        .last()?;

    (top < last && group.iter().any(|f| f.from >= top)).then(|| Finger::barre(fret, top, last))
}

/// Number fingers 1..N by fret, then by first string.
fn assign_fingers(chord: &mut Chord) {
    chord.fingers.sort_by_key(|f| (f.fret, f.from));
    for (n, finger) in chord.fingers.iter_mut().enumerate() {
        finger.number = n as u8 + 1;
    }
}

/// Stable sort by lowest fret, open chords first, then truncate.
fn rank(chords: &mut Vec<Chord>, max_chords: usize) {
    chords.sort_by_key(Chord::min_fret);
    chords.truncate(max_chords);
}
