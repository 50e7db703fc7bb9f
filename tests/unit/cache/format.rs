use super::*;
use std::io::Cursor;

fn sample() -> CacheRecord {
    CacheRecord {
        note_id: 60,
        start: 1.0,
        end: 3.0,
        dots: vec![
            DotRecord {
                time: 1.0,
                x: 10.5,
                y: 20.0,
                vx: -2.0,
                vy: -100.0,
            },
            DotRecord {
                time: 2.0,
                x: 11.0,
                y: 20.0,
                vx: 0.0,
                vy: -100.0,
            },
        ],
    }
}

#[test]
fn record_layout_is_little_endian_and_packed() {
    let rec = sample();
    let mut buf = Vec::new();
    rec.write_to(&mut buf).unwrap();

    assert_eq!(buf.len(), rec.encoded_len());
    assert_eq!(buf.len(), 13 + 2 * 20);
    assert_eq!(buf[0], 60);
    assert_eq!(&buf[1..5], &1.0f32.to_le_bytes());
    assert_eq!(&buf[5..9], &3.0f32.to_le_bytes());
    assert_eq!(&buf[9..13], &2u32.to_le_bytes());
    assert_eq!(&buf[13..17], &1.0f32.to_le_bytes());
    assert_eq!(&buf[17..21], &10.5f32.to_le_bytes());
    assert_eq!(&buf[29..33], &(-100.0f32).to_le_bytes());
    assert_eq!(&buf[33..37], &2.0f32.to_le_bytes());
}

#[test]
fn empty_record_is_header_only() {
    let rec = CacheRecord {
        note_id: 21,
        start: 0.0,
        end: 0.0,
        dots: Vec::new(),
    };
    let mut buf = Vec::new();
    rec.write_to(&mut buf).unwrap();
    assert_eq!(buf.len(), RECORD_HEADER_LEN);
    assert_eq!(&buf[9..13], &[0, 0, 0, 0]);

    let back = CacheRecord::read_from(&mut Cursor::new(buf)).unwrap();
    assert_eq!(back, rec);
}

#[test]
fn decoding_preserves_float_bits() {
    let mut rec = sample();
    rec.start = 0.1;
    rec.dots[0].x = f32::MIN_POSITIVE;
    let mut buf = Vec::new();
    rec.write_to(&mut buf).unwrap();

    let back = CacheRecord::read_from(&mut Cursor::new(buf)).unwrap();
    assert_eq!(back.start.to_bits(), 0.1f32.to_bits());
    assert_eq!(back.dots[0].x.to_bits(), f32::MIN_POSITIVE.to_bits());
    assert_eq!(back, rec);
}

#[test]
fn truncated_record_is_an_eof_error() {
    let mut buf = Vec::new();
    sample().write_to(&mut buf).unwrap();
    buf.truncate(buf.len() - 3);
    let err = CacheRecord::read_from(&mut Cursor::new(buf)).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
}

#[test]
fn huge_declared_count_does_not_preallocate() {
    let mut buf = vec![60];
    buf.extend_from_slice(&0.0f32.to_le_bytes());
    buf.extend_from_slice(&1.0f32.to_le_bytes());
    buf.extend_from_slice(&u32::MAX.to_le_bytes());
    let err = CacheRecord::read_from(&mut Cursor::new(buf)).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
}

#[test]
fn file_names() {
    let dir = Path::new("cache/smoke.dots");
    assert_eq!(record_path(dir, 0), dir.join("0.bin"));
    assert_eq!(record_path(dir, 12), dir.join("12.bin"));
    assert_eq!(index_path(dir), dir.join("info.bin"));
}
