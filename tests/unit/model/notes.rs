use super::*;

#[test]
fn parses_tuple_and_object_forms_in_order() {
    let json = r#"[[60, 0.0, 1.0], {"note_id": 64, "start": 1.0, "end": 3.0}, {"note": 67, "start": 2, "end": 2.5}]"#;
    let notes = NoteList::from_reader(json.as_bytes()).unwrap();
    assert_eq!(
        notes.events(),
        &[
            NoteEvent::new(60, 0.0, 1.0),
            NoteEvent::new(64, 1.0, 3.0),
            NoteEvent::new(67, 2.0, 2.5),
        ]
    );
    assert_eq!(notes.end_time(), 3.0);
}

#[test]
fn rejects_reversed_or_negative_times() {
    assert!(NoteList::new(vec![NoteEvent::new(60, 2.0, 1.0)]).is_err());
    assert!(NoteList::new(vec![NoteEvent::new(60, -1.0, 1.0)]).is_err());
    assert!(NoteList::new(vec![NoteEvent::new(60, 0.0, f32::INFINITY)]).is_err());
}

#[test]
fn sounding_window_is_half_open() {
    let n = NoteEvent::new(60, 1.0, 2.0);
    assert!(!n.is_sounding(0.99));
    assert!(n.is_sounding(1.0));
    assert!(!n.is_sounding(2.0));
    assert_eq!(n.duration(), 1.0);
}

#[test]
fn empty_list_ends_at_zero() {
    let notes = NoteList::default();
    assert!(notes.is_empty());
    assert_eq!(notes.end_time(), 0.0);
}
