use super::*;

const MINIMAL: &str = r#"{ "output": { "resolution": { "width": 64, "height": 32 }, "fps": 30 } }"#;

#[test]
fn minimal_settings_take_defaults() {
    let s = RenderSettings::from_reader(MINIMAL.as_bytes()).unwrap();
    assert_eq!(s.output.resolution, Resolution::new(64, 32).unwrap());
    assert_eq!(s.fps().unwrap(), Fps::new(30, 1).unwrap());
    assert!(!s.effects.smoke.dots);
    assert_eq!(s.effects.smoke.dot_rounding, Rounding::Floor);
    assert_eq!(s.timeline.frame_rounding, Rounding::TowardZero);
    assert_eq!(s.keyboard_top_px(), 16.0);
}

#[test]
fn missing_resolution_is_a_configuration_error() {
    let err = RenderSettings::from_reader(r#"{ "output": { "fps": 30 } }"#.as_bytes()).unwrap_err();
    assert!(matches!(err, ReelError::Config(_)));
}

#[test]
fn invalid_values_are_rejected() {
    let mut s = RenderSettings::new(Resolution::new(8, 8).unwrap(), 30);
    s.output.fps = 0;
    assert!(s.validate().is_err());

    let mut s = RenderSettings::new(Resolution::new(8, 8).unwrap(), 30);
    s.effects.smoke.dps = -1.0;
    assert!(s.validate().is_err());

    let mut s = RenderSettings::new(Resolution::new(8, 8).unwrap(), 30);
    s.keyboard.top = 1.5;
    assert!(s.validate().is_err());

    let mut s = RenderSettings::new(Resolution::new(8, 8).unwrap(), 30);
    s.timeline.pause_start = f64::NAN;
    assert!(s.validate().is_err());

    for air_resist in [0.0, 1.5, f64::NAN] {
        let mut s = RenderSettings::new(Resolution::new(8, 8).unwrap(), 30);
        s.effects.smoke.air_resist = air_resist;
        assert!(s.validate().is_err(), "{air_resist}");
    }
    let mut s = RenderSettings::new(Resolution::new(8, 8).unwrap(), 30);
    s.effects.smoke.air_resist = 1.0;
    s.validate().unwrap();
}

#[test]
fn unknown_keys_are_rejected() {
    let json = r#"{ "output": { "resolution": { "width": 8, "height": 8 }, "fps": 30, "fsp": 2 } }"#;
    assert!(RenderSettings::from_reader(json.as_bytes()).is_err());
}

#[test]
fn smoke_keys_follow_dotted_names() {
    let json = r#"{
        "output": { "resolution": { "width": 8, "height": 8 }, "fps": 30 },
        "effects": { "smoke": { "dots": true, "dps": 10, "dot_rounding": "nearest" } }
    }"#;
    let s = RenderSettings::from_reader(json.as_bytes()).unwrap();
    assert!(s.effects.smoke.dots);
    assert_eq!(s.effects.smoke.dps, 10.0);
    assert_eq!(s.effects.smoke.dot_rounding, Rounding::Nearest);
}

#[test]
fn addon_lookup_resolves_dotted_keys() {
    let json = r#"{
        "output": { "resolution": { "width": 8, "height": 8 }, "fps": 30 },
        "addons": { "glow": { "radius": 3, "tint": [1, 2, 3] } }
    }"#;
    let s = RenderSettings::from_reader(json.as_bytes()).unwrap();
    assert_eq!(s.lookup("glow.radius"), Some(&serde_json::json!(3)));
    assert!(s.lookup("glow.missing").is_none());
    assert!(s.lookup("nope").is_none());
}
