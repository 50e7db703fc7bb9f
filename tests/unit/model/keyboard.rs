use super::*;

#[test]
fn layout_spans_the_full_width() {
    let layout = PianoLayout::new(520.0);
    let lowest = layout.key_span(LOWEST_NOTE).unwrap();
    let highest = layout.key_span(HIGHEST_NOTE).unwrap();
    assert_eq!(lowest.x, 0.0);
    assert_eq!(lowest.width, 10.0);
    assert!((highest.x + highest.width - 520.0).abs() < 1e-9);
}

#[test]
fn middle_c_sits_after_23_white_keys() {
    let layout = PianoLayout::new(520.0);
    let c4 = layout.key_span(60).unwrap();
    assert!((c4.x - 230.0).abs() < 1e-9);
    assert!((c4.center() - 235.0).abs() < 1e-9);
}

#[test]
fn black_keys_straddle_the_white_boundary() {
    let layout = PianoLayout::new(520.0);
    let a_sharp0 = layout.key_span(22).unwrap();
    assert!(is_black(22));
    assert!((a_sharp0.width - 6.0).abs() < 1e-9);
    assert!((a_sharp0.center() - 10.0).abs() < 1e-9);
}

#[test]
fn notes_off_the_keyboard_have_no_span() {
    let layout = PianoLayout::new(520.0);
    assert!(layout.key_span(20).is_none());
    assert!(layout.key_span(109).is_none());
    assert_eq!(PianoLayout::notes().count(), 88);
    assert_eq!(PianoLayout::notes().filter(|n| !is_black(*n)).count(), 52);
}
