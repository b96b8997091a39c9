//! End-to-end diagram search tests on real tunings.

use chordinator::{
    compute_chords, Chord, ChordError, ChordName, Fingering, PitchClass, Stage, StringState,
    Tuning, STANDARD,
};
use lazy_static::lazy_static;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::collections::BTreeSet;

/// Every chord name shape the parser understands, over a few roots
const CHORD_NAMES: &[&str] = &[
    "C", "Cm", "C6", "C7", "CM7", "C#m7", "D", "Dm", "D7", "E", "Em", "E7", "EM7", "F", "Fm",
    "F#", "F#m", "G", "G6", "G7", "G#m", "A", "Am", "Am7", "A6", "A#", "B", "Bm", "BM7",
];

lazy_static! {
    static ref TUNINGS: Vec<Tuning> = vec![
        Tuning::standard(),
        "D A D G B E".parse().unwrap(),
        "E B E G# B E".parse().unwrap(),
        "D A D G A D".parse().unwrap(),
    ];
}

fn tones(name: &str) -> BTreeSet<PitchClass> {
    ChordName::parse(name).unwrap().tones().into_iter().collect()
}

/// Check every documented property of one search result.
fn check_invariants(name: &str, tuning: &Tuning, chords: &[Chord]) -> Result<(), String> {
    let expected = tones(name);
    let root = ChordName::parse(name).unwrap().root;

    if chords.len() > 200 {
        return Err(format!("{name}: {} chords above the cap", chords.len()));
    }
    for (i, chord) in chords.iter().enumerate() {
        let ctx = format!("{name} on {tuning} #{i}: {chord:?}");

        if chord.name != name {
            return Err(format!("{ctx}: wrong name"));
        }
        if chord.sounded(tuning) != expected {
            return Err(format!("{ctx}: sounds {:?}", chord.sounded(tuning)));
        }
        if chord.fingers.len() > 4 {
            return Err(format!("{ctx}: too many fingers"));
        }
        if chord.span() > 5 {
            return Err(format!("{ctx}: span {}", chord.span()));
        }
        if chord.fingers.iter().any(|f| f.fret == 0) {
            return Err(format!("{ctx}: finger on fret 0"));
        }

        let numbers: Vec<u8> = chord.fingers.iter().map(|f| f.number).collect();
        let sequential: Vec<u8> = (1..=chord.fingers.len() as u8).collect();
        if numbers != sequential {
            return Err(format!("{ctx}: finger numbers {numbers:?}"));
        }

        let frets = chord.frets();
        for (s, state) in chord.string_top.iter().enumerate() {
            let covered = chord.fingers.iter().any(|f| f.covers(s as u8 + 1));
            let ok = match state {
                StringState::None => covered,
                StringState::Open | StringState::Muted => !covered,
            };
            if !ok {
                return Err(format!("{ctx}: string {} is {state:?}", s + 1));
            }
        }

        // the lowest sounded string plays the root
        let bass = frets
            .iter()
            .enumerate()
            .find_map(|(s, fret)| fret.map(|f| tuning.pitches()[s].transpose(f)));
        if bass != Some(root) {
            return Err(format!("{ctx}: bass {bass:?}"));
        }
    }

    for pair in chords.windows(2) {
        if pair[0].min_fret() > pair[1].min_fret() {
            return Err(format!("{name} on {tuning}: ranking broken at {pair:?}"));
        }
    }
    Ok(())
}

#[test]
fn invariants_hold_for_all_chords() {
    let search = Fingering::new();
    let cases: Vec<(&str, &Tuning)> = CHORD_NAMES
        .iter()
        .flat_map(|&name| TUNINGS.iter().map(move |t| (name, t)))
        .collect();

    let failures: Vec<String> = cases
        .par_iter()
        .filter_map(|&(name, tuning)| {
            let chords = search.compute(name, tuning).unwrap();
            check_invariants(name, tuning, &chords).err()
        })
        .collect();

    if !failures.is_empty() {
        panic!("{} cases failed:\n{}", failures.len(), failures.join("\n"));
    }
}

#[test]
fn open_e_major_ranks_first_among_its_peers() {
    let chords = compute_chords("E", &STANDARD).unwrap();
    let open_e = chords
        .iter()
        .position(|c| {
            c.string_top
                == [
                    StringState::Open,
                    StringState::None,
                    StringState::None,
                    StringState::None,
                    StringState::Open,
                    StringState::Open,
                ]
                && c.fingers.iter().map(|f| (f.number, f.fret, f.from)).collect::<Vec<_>>()
                    == [(1, 1, 4), (2, 2, 2), (3, 2, 3)]
        })
        .expect("open E shape missing");

    assert_eq!(chords[open_e].min_fret(), Some(1));
    assert_eq!(chords[0].min_fret(), Some(1));
    assert!(open_e < 5);
}

#[test]
fn e_major_stage_counts() {
    let mut stages = Vec::new();
    let chords = Fingering::new()
        .compute_observed("E", &Tuning::standard(), &mut |s: Stage, n: usize| {
            stages.push((s, n))
        })
        .unwrap();

    assert_eq!(
        stages,
        vec![
            (Stage::Enumerated, 18662),
            (Stage::SpanFiltered, 202),
            (Stage::CoverageFiltered, 134),
            (Stage::FingerLimited, 99),
            (Stage::Ranked, 99),
        ]
    );
    assert_eq!(chords.len(), 99);
}

#[test]
fn open_tuning_is_capped_with_open_chords_first() {
    let tuning: Tuning = "E B E G# B E".parse().unwrap();
    let mut last = 0;
    let chords = Fingering::new()
        .compute_observed("E", &tuning, &mut |s: Stage, n: usize| {
            if s == Stage::FingerLimited {
                last = n;
            }
        })
        .unwrap();

    assert_eq!(last, 542);
    assert_eq!(chords.len(), 200);
    assert_eq!(chords[0].string_top, [StringState::Open; 6]);
    assert!(chords[0].fingers.is_empty());
    assert!(chords[1].fingers.is_empty());
    assert!(chords[2..].iter().all(|c| !c.fingers.is_empty()));
}

#[test]
fn f_major_full_barre() {
    let chords = compute_chords("F", &STANDARD).unwrap();
    let first = &chords[0];
    assert_eq!(first.string_top, [StringState::None; 6]);
    let got: Vec<_> = first
        .fingers
        .iter()
        .map(|f| (f.number, f.fret, f.from, f.to))
        .collect();
    assert_eq!(
        got,
        vec![(1, 1, 1, Some(6)), (2, 2, 4, None), (3, 3, 2, None), (4, 3, 3, None)]
    );
}

#[test]
fn max_chords_truncates_in_rank_order() {
    let full = Fingering::new().compute("G6", &Tuning::standard()).unwrap();
    let short = Fingering::builder()
        .max_chords(10)
        .build()
        .unwrap()
        .compute("G6", &Tuning::standard())
        .unwrap();
    assert_eq!(short.len(), 10);
    assert_eq!(short[..], full[..10]);
}

#[test]
fn results_are_deterministic() {
    for name in ["D#m7", "FM7", "Am"] {
        let a = compute_chords(name, &STANDARD).unwrap();
        let b = compute_chords(name, &STANDARD).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn invalid_chord_name_is_reported() {
    assert_eq!(
        compute_chords("", &STANDARD).unwrap_err(),
        ChordError::InvalidChordName {
            name: String::new()
        }
    );
    assert!(matches!(
        compute_chords("T", &STANDARD),
        Err(ChordError::InvalidChordName { .. })
    ));
}

#[test]
fn invalid_tuning_is_reported() {
    assert_eq!(
        compute_chords("E", &["E", "A", "D", "G", "B", "X"]).unwrap_err(),
        ChordError::InvalidTuning {
            string: 6,
            name: "X".into()
        }
    );
    assert_eq!(
        compute_chords("E", &["E", "A", "D"]).unwrap_err(),
        ChordError::TuningLength {
            expected: 6,
            got: 3
        }
    );
}
