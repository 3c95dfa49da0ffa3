use psamp_core::format::snapshot::{decode, encode, snapshot_id_hex, HEADER_LEN};
use psamp_core::{defaults, PsampError, RECORD_SIZE};

#[test]
fn encode_decode_preserves_header_and_records() {
    let src = defaults::lattice_snapshot(4, defaults::default_cosmology());
    let bytes = encode(&src);
    assert_eq!(bytes.len(), HEADER_LEN + 64 * RECORD_SIZE + 4 + 16);

    let back = decode(&bytes).unwrap();
    assert_eq!(back, src);
}

#[test]
fn subsample_and_full_snapshots_share_the_layout() {
    let mut sub = defaults::lattice_snapshot(2, defaults::default_cosmology());
    sub.nc = 0;
    sub.particles.truncate(3);
    sub.np_local = 3;
    sub.np_total = 3;
    sub.np_average = 3.0;
    let back = decode(&encode(&sub)).unwrap();
    assert_eq!(back.nc, 0);
    assert_eq!(back.particles.len(), 3);
    assert_eq!(back, sub);
}

#[test]
fn corrupted_record_fails_crc() {
    let src = defaults::lattice_snapshot(3, defaults::default_cosmology());
    let mut bytes = encode(&src);
    bytes[HEADER_LEN + 5] ^= 0x40;
    match decode(&bytes) {
        Err(PsampError::Format(msg)) => assert!(msg.contains("crc32"), "{msg}"),
        other => panic!("expected crc failure, got {other:?}"),
    }
}

#[test]
fn truncated_or_foreign_bytes_are_rejected() {
    let bytes = encode(&defaults::lattice_snapshot(2, defaults::default_cosmology()));
    assert!(decode(&bytes[..bytes.len() - 1]).is_err());
    assert!(decode(&bytes[..10]).is_err());
    match decode(b"GIF89a not a snapshot at all, just some other file") {
        Err(PsampError::Format(msg)) => assert_eq!(msg, "bad magic"),
        other => panic!("expected bad magic, got {other:?}"),
    }
}

#[test]
fn snapshot_id_is_stable_hex() {
    let bytes = encode(&defaults::lattice_snapshot(2, defaults::default_cosmology()));
    let a = snapshot_id_hex(&bytes).unwrap();
    let b = snapshot_id_hex(&encode(&decode(&bytes).unwrap())).unwrap();
    assert_eq!(a.len(), 32);
    assert_eq!(a, b);
}
