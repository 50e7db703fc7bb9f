use super::*;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::new(30, 1).unwrap(),
    }
}

#[test]
fn even_non_zero_sizes_are_accepted() {
    validate_config(&cfg(1280, 720)).unwrap();
    validate_config(&cfg(2, 2)).unwrap();
}

#[test]
fn odd_or_zero_sizes_are_rejected() {
    for (w, h) in [(0, 2), (2, 0), (3, 2), (2, 5)] {
        let err = validate_config(&cfg(w, h)).unwrap_err();
        assert!(matches!(err, ReelError::Config(_)), "{w}x{h}: {err}");
    }
}

#[test]
fn zero_fps_is_rejected() {
    let mut c = cfg(2, 2);
    c.fps = Fps { num: 0, den: 1 };
    assert!(validate_config(&c).is_err());
}

#[test]
fn frames_before_begin_are_refused() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("never/written.mp4"));
    let err = sink
        .push_frame(FrameIndex(0), &FrameRGB::blank(2, 2))
        .unwrap_err();
    assert!(err.to_string().contains("not started"));
    assert!(sink.end().is_err());
}

#[test]
fn invalid_config_fails_before_spawning() {
    let dir = std::env::temp_dir().join(format!("pianoreel_ffmpeg_cfg_{}", std::process::id()));
    let out = dir.join("out.mp4");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out));
    assert!(sink.begin(cfg(3, 3)).is_err());
    assert!(!out.exists());
}

#[test]
fn parent_dir_is_created() {
    let dir = std::env::temp_dir().join(format!(
        "pianoreel_ffmpeg_parent_{}",
        std::process::id()
    ));
    let out = dir.join("nested").join("out.mp4");
    ensure_parent_dir(&out).unwrap();
    assert!(dir.join("nested").is_dir());
    ensure_parent_dir(Path::new("bare.mp4")).unwrap();
    let _ = std::fs::remove_dir_all(&dir);
}
