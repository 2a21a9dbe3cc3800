use std::io::Cursor;

use crate::tests::patterned;
use crate::{CipherError, CipherMode, Des, Padding, SymmetricContext};

const ALL_MODES: [CipherMode; 7] = [
    CipherMode::Ecb,
    CipherMode::Cbc,
    CipherMode::Pcbc,
    CipherMode::Cfb,
    CipherMode::Ofb,
    CipherMode::Ctr,
    CipherMode::RandomDelta,
];

const ALL_PADDINGS: [Padding; 4] = [
    Padding::Zeros,
    Padding::Pkcs7,
    Padding::AnsiX923,
    Padding::Iso10126,
];

// Block size 8 for DES: exercises 0, 1, B-1, B, B+1, 2B+1.
const BOUNDARY_LENGTHS: [usize; 6] = [0, 1, 7, 8, 9, 17];

fn des_context(
    mode: CipherMode,
    padding: Padding,
    iv: Option<Vec<u8>>,
) -> SymmetricContext<Des> {
    SymmetricContext::new(Des::new(), b"SecretK1", mode, padding, iv, Some(4)).unwrap()
}

#[test]
fn every_mode_and_padding_round_trips_boundary_lengths() {
    for mode in ALL_MODES {
        for padding in ALL_PADDINGS {
            let context = des_context(mode, padding, None);
            for len in BOUNDARY_LENGTHS {
                let data = patterned(len);
                let ciphertext = context.encrypt_bytes(&data).unwrap();
                let recovered = context.decrypt_bytes(&ciphertext).unwrap();
                assert_eq!(recovered, data, "{mode}/{padding}/len {len}");
            }
        }
    }
}

#[test]
fn ciphertext_layouts() {
    let data = patterned(13); // 13 -> padded to 16 where padding applies

    let ecb = des_context(CipherMode::Ecb, Padding::Pkcs7, None);
    assert_eq!(ecb.encrypt_bytes(&data).unwrap().len(), 16);

    let cbc = des_context(CipherMode::Cbc, Padding::Pkcs7, None);
    assert_eq!(cbc.encrypt_bytes(&data).unwrap().len(), 8 + 16);

    let cfb = des_context(CipherMode::Cfb, Padding::Pkcs7, None);
    assert_eq!(cfb.encrypt_bytes(&data).unwrap().len(), 8 + 13);

    let ofb = des_context(CipherMode::Ofb, Padding::Pkcs7, None);
    assert_eq!(ofb.encrypt_bytes(&data).unwrap().len(), 8 + 13);

    let ctr = des_context(CipherMode::Ctr, Padding::Pkcs7, None);
    assert_eq!(ctr.encrypt_bytes(&data).unwrap().len(), 4 + 13);

    let rd = des_context(CipherMode::RandomDelta, Padding::Pkcs7, None);
    assert_eq!(rd.encrypt_bytes(&data).unwrap().len(), 16 + 16);
}

#[test]
fn explicit_iv_makes_encryption_deterministic() {
    let data = patterned(29);

    for (mode, iv_len) in [
        (CipherMode::Cbc, 8usize),
        (CipherMode::Pcbc, 8),
        (CipherMode::Cfb, 8),
        (CipherMode::Ofb, 8),
        (CipherMode::Ctr, 4),
    ] {
        let iv = patterned(iv_len);
        let context = des_context(mode, Padding::Pkcs7, Some(iv.clone()));
        let first = context.encrypt_bytes(&data).unwrap();
        let second = context.encrypt_bytes(&data).unwrap();
        assert_eq!(first, second, "{mode}");
        assert_eq!(&first[..iv_len], iv.as_slice(), "{mode} header");
    }

    // Two independently built contexts agree as well.
    let iv = vec![0xA5u8; 8];
    let one = des_context(CipherMode::Cbc, Padding::Pkcs7, Some(iv.clone()));
    let two = des_context(CipherMode::Cbc, Padding::Pkcs7, Some(iv));
    assert_eq!(
        one.encrypt_bytes(&data).unwrap(),
        two.encrypt_bytes(&data).unwrap()
    );
}

#[test]
fn random_delta_header_is_fresh_per_message() {
    let context = des_context(CipherMode::RandomDelta, Padding::Pkcs7, None);
    let data = patterned(24);
    let first = context.encrypt_bytes(&data).unwrap();
    let second = context.encrypt_bytes(&data).unwrap();
    // 16 bytes of IV + delta drawn from the CSPRNG.
    assert_ne!(first[..16], second[..16]);
    assert_eq!(context.decrypt_bytes(&first).unwrap(), data);
    assert_eq!(context.decrypt_bytes(&second).unwrap(), data);
}

#[test]
fn short_ciphertexts_are_rejected() {
    for (mode, header) in [
        (CipherMode::Cbc, 8usize),
        (CipherMode::Pcbc, 8),
        (CipherMode::Cfb, 8),
        (CipherMode::Ofb, 8),
        (CipherMode::Ctr, 4),
        (CipherMode::RandomDelta, 16),
    ] {
        let context = des_context(mode, Padding::Pkcs7, None);
        let result = context.decrypt_bytes(&vec![0u8; header - 1]);
        assert!(
            matches!(result, Err(CipherError::CiphertextTooShort(_))),
            "{mode}"
        );
    }
}

#[test]
fn ragged_bodies_are_rejected() {
    let ecb = des_context(CipherMode::Ecb, Padding::Pkcs7, None);
    assert!(matches!(
        ecb.decrypt_bytes(&[0u8; 13]),
        Err(CipherError::InvalidCiphertextLength(8))
    ));

    let pcbc = des_context(CipherMode::Pcbc, Padding::Pkcs7, None);
    assert!(matches!(
        pcbc.decrypt_bytes(&[0u8; 8 + 5]),
        Err(CipherError::InvalidCiphertextLength(8))
    ));

    let rd = des_context(CipherMode::RandomDelta, Padding::Pkcs7, None);
    assert!(matches!(
        rd.decrypt_bytes(&[0u8; 16 + 11]),
        Err(CipherError::InvalidCiphertextLength(8))
    ));
}

#[test]
fn wrong_iv_lengths_are_rejected_at_construction() {
    let result = SymmetricContext::new(
        Des::new(),
        b"SecretK1",
        CipherMode::Cbc,
        Padding::Pkcs7,
        Some(vec![0u8; 5]),
        Some(2),
    );
    assert!(matches!(
        result,
        Err(CipherError::InvalidIv {
            got: 5,
            expected: 8
        })
    ));

    // CTR wants a half-block nonce, not a full block.
    let result = SymmetricContext::new(
        Des::new(),
        b"SecretK1",
        CipherMode::Ctr,
        Padding::Pkcs7,
        Some(vec![0u8; 8]),
        Some(2),
    );
    assert!(matches!(
        result,
        Err(CipherError::InvalidIv {
            got: 8,
            expected: 4
        })
    ));
}

#[test]
fn stream_and_bytes_entry_points_agree() {
    // Deterministic parameter sets produce byte-identical output on both
    // entry points; a deliberately small chunk size exercises the carry.
    let data = patterned(53);
    let cases = [
        (CipherMode::Ecb, None),
        (CipherMode::Cbc, Some(patterned(8))),
        (CipherMode::Pcbc, Some(patterned(8))),
        (CipherMode::Cfb, Some(patterned(8))),
        (CipherMode::Ofb, Some(patterned(8))),
        (CipherMode::Ctr, Some(patterned(4))),
    ];

    for (mode, iv) in cases {
        let context = des_context(mode, Padding::Pkcs7, iv);

        let from_bytes = context.encrypt_bytes(&data).unwrap();
        let mut from_stream = Vec::new();
        context
            .encrypt_stream(&mut Cursor::new(&data), &mut from_stream, 10)
            .unwrap();
        assert_eq!(from_bytes, from_stream, "{mode} encrypt");

        // Cross-check the decrypt paths on each other's output.
        let mut decrypted_stream = Vec::new();
        context
            .decrypt_stream(&mut Cursor::new(&from_bytes), &mut decrypted_stream, 10)
            .unwrap();
        assert_eq!(decrypted_stream, data, "{mode} stream decrypt");
        assert_eq!(
            context.decrypt_bytes(&from_stream).unwrap(),
            data,
            "{mode} bytes decrypt"
        );
    }
}

#[test]
fn random_delta_streams_round_trip() {
    let context = des_context(CipherMode::RandomDelta, Padding::AnsiX923, None);
    let data = patterned(41);

    let mut encrypted = Vec::new();
    context
        .encrypt_stream(&mut Cursor::new(&data), &mut encrypted, 10)
        .unwrap();
    assert_eq!(encrypted.len(), 16 + 48);

    let mut decrypted = Vec::new();
    context
        .decrypt_stream(&mut Cursor::new(&encrypted), &mut decrypted, 7)
        .unwrap();
    assert_eq!(decrypted, data);

    // Stream output decrypts through the bytes path too.
    assert_eq!(context.decrypt_bytes(&encrypted).unwrap(), data);
}

#[test]
fn empty_input_round_trips_through_streams() {
    for mode in ALL_MODES {
        let context = des_context(mode, Padding::Pkcs7, None);
        let mut encrypted = Vec::new();
        context
            .encrypt_stream(&mut Cursor::new(&[] as &[u8]), &mut encrypted, 16)
            .unwrap();

        let mut decrypted = Vec::new();
        context
            .decrypt_stream(&mut Cursor::new(&encrypted), &mut decrypted, 16)
            .unwrap();
        assert!(decrypted.is_empty(), "{mode}");
    }
}

#[test]
fn unknown_tags_fail_to_parse() {
    assert!(matches!(
        "xts".parse::<CipherMode>(),
        Err(CipherError::UnknownMode(_))
    ));
    assert!(matches!(
        "pkcs5".parse::<Padding>(),
        Err(CipherError::UnknownPadding(_))
    ));
    assert_eq!("random-delta".parse::<CipherMode>().unwrap(), CipherMode::RandomDelta);
    assert_eq!("PKCS7".parse::<Padding>().unwrap(), Padding::Pkcs7);
}
