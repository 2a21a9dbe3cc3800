use crate::{BlockCipher, CipherError, Des, TdesVariant, TripleDes};

#[test]
fn ede_two_key_round_trip() -> Result<(), CipherError> {
    let mut key = vec![0x01u8; 8];
    key.extend_from_slice(&[0x02u8; 8]);

    let mut tdes = TripleDes::new(TdesVariant::Ede);
    tdes.set_keys(&key)?;

    let plain = b"ABCDEFGH";
    let cipher = tdes.encrypt_block(plain)?;
    assert_eq!(cipher.len(), 8);
    assert_ne!(cipher, plain.to_vec());
    assert_eq!(tdes.decrypt_block(&cipher)?, plain);

    Ok(())
}

#[test]
fn identity_for_all_key_lengths_and_variants() -> Result<(), CipherError> {
    let block = [0xC7u8, 0x01, 0x88, 0x3F, 0x52, 0xAA, 0x0E, 0x64];
    for variant in [TdesVariant::Ede, TdesVariant::Eee] {
        for key_len in [14usize, 16, 21, 24] {
            let key: Vec<u8> = (0..key_len as u8).map(|i| i.wrapping_mul(37) | 1).collect();
            let mut tdes = TripleDes::new(variant);
            tdes.set_keys(&key)?;

            let cipher = tdes.encrypt_block(&block)?;
            assert_eq!(tdes.decrypt_block(&cipher)?, block, "{variant:?}/{key_len}");
        }
    }
    Ok(())
}

#[test]
fn ede_with_equal_keys_degenerates_to_single_des() -> Result<(), CipherError> {
    let single = b"SecretK1";
    let mut triple_key = Vec::new();
    for _ in 0..3 {
        triple_key.extend_from_slice(single);
    }

    let mut tdes = TripleDes::new(TdesVariant::Ede);
    tdes.set_keys(&triple_key)?;
    let mut des = Des::new();
    des.set_keys(single)?;

    let plain = b"degener8";
    assert_eq!(tdes.encrypt_block(plain)?, des.encrypt_block(plain)?);

    Ok(())
}

#[test]
fn wrong_key_sizes_are_rejected() {
    let mut tdes = TripleDes::new(TdesVariant::Ede);
    for bad in [0usize, 8, 15, 20, 23, 25] {
        assert!(
            matches!(
                tdes.set_keys(&vec![0x5Au8; bad]),
                Err(CipherError::InvalidKeySize { got, .. }) if got == bad
            ),
            "key length {bad}"
        );
    }
}
