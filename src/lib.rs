//! # chordinator
//!
//! Turn a chord name into its notes and into every playable fretting diagram
//! on a six-string instrument.
//!
//! ## Example
//! ```rust
//! use chordinator::{compute_chords, compute_notes, Fingering, Tuning};
//!
//! fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1) Notes of a chord
//!     assert_eq!(compute_notes("D#m7"), ["D#", "F#", "A#", "C#"]);
//!
//!     // 2) Diagrams with the default limits
//!     let chords = compute_chords("E", &["E", "A", "D", "G", "B", "E"])?;
//!     for chord in chords.iter().take(3) {
//!         println!("{:?} {:?}", chord.string_top, chord.fingers);
//!     }
//!
//!     // 3) Or tune the search
//!     let search = Fingering::builder()
//!         .frets(13)
//!         .max_chords(20)
//!         .build()?;
//!     let tuning: Tuning = "D A D G B E".parse()?;
//!     let chords = search.compute("D", &tuning)?;
//!     assert!(chords.len() <= 20);
//!
//!     Ok(())
//! }
//! # run().unwrap();
//! ```
//!
//! ## Features
//! - `serde`: derives `Serialize`/`Deserialize` on the data model

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rust_2018_idioms)]
#![deny(clippy::all)]

/// Chord diagram value types.
pub use diagram::{Chord, Finger, StringState};

/// Diagram search pipeline.
pub use fingering::{Fingering, FingeringBuilder, Stage, StageObserver};

/// Pitch classes and chord names.
pub use notes::{compute_notes, ChordError, ChordName, Extension, PitchClass};

/// Open-string model.
pub use tuning::{Tuning, STANDARD, STRING_COUNT};

/// Chord diagram module.
pub mod diagram;

/// Fingering search module.
pub mod fingering;

/// Note theory module.
pub mod notes;

/// Tuning module.
pub mod tuning;

/// Every playable diagram of `chord_name` on `tuning`, with default limits.
///
/// Returns:
/// - `Err(InvalidChordName)` if `chord_name` has no recognizable root.
/// - `Err(TuningLength)` or `Err(InvalidTuning)` if `tuning` is not six note names.
pub fn compute_chords<S: AsRef<str>>(
    chord_name: &str,
    tuning: &[S],
) -> Result<Vec<Chord>, ChordError> {
    let tuning = Tuning::new(tuning)?;
    Fingering::new().compute(chord_name, &tuning)
}
