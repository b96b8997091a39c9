//! Serialized diagrams, checked against the data model invariants on the way in.
#![cfg(feature = "serde")]

use chordinator::{compute_chords, Chord, Finger, PitchClass, Tuning, STANDARD};

#[test]
fn pitch_class_out_of_range_is_rejected() {
    assert_eq!(serde_json::from_str::<PitchClass>("11").unwrap(), PitchClass::new(11));
    assert!(serde_json::from_str::<PitchClass>("12").is_err());

    let err = serde_json::from_str::<PitchClass>("200").unwrap_err();
    assert!(err.to_string().contains("outside 0..12"), "{err}");
}

#[test]
fn tuning_rejects_bad_pitches() {
    let ok: Tuning = serde_json::from_str(r#"{"strings":[4,9,2,7,11,4]}"#).unwrap();
    assert_eq!(ok, Tuning::standard());
    assert!(serde_json::from_str::<Tuning>(r#"{"strings":[4,9,2,7,11,245]}"#).is_err());
}

#[test]
fn finger_rejects_unplayable_positions() {
    let ok: Finger =
        serde_json::from_str(r#"{"number":1,"fret":1,"from":1,"to":6}"#).unwrap();
    assert_eq!(ok.to, Some(6));

    for bad in [
        r#"{"number":1,"fret":0,"from":2,"to":null}"#,
        r#"{"number":1,"fret":2,"from":0,"to":null}"#,
        r#"{"number":1,"fret":2,"from":9,"to":null}"#,
        r#"{"number":1,"fret":2,"from":5,"to":2}"#,
    ] {
        let err = serde_json::from_str::<Finger>(bad).unwrap_err();
        assert!(err.to_string().contains("invalid finger"), "{bad}: {err}");
    }
}

#[test]
fn computed_chords_survive_a_round_trip() {
    let chords = compute_chords("F", &STANDARD).unwrap();
    let json = serde_json::to_string(&chords).unwrap();
    let back: Vec<Chord> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, chords);
}
