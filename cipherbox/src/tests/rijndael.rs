use crate::{BlockCipher, CipherError, Rijndael, gf256};

macro_rules! aes_block_vectors {
    ($( $fn_name:ident: ( $key:expr , $plain:expr , $exp_cipher:expr ) ),*$(,)?) => {
        $(
            #[test]
            fn $fn_name() -> Result<(), CipherError> {
                let key = hex::decode($key).unwrap();
                let plain = hex::decode($plain).unwrap();

                let mut aes = Rijndael::aes(key.len())?;
                aes.set_keys(&key)?;

                let cipher = aes.encrypt_block(&plain)?;
                assert_eq!($exp_cipher, hex::encode(&cipher));
                assert_eq!(aes.decrypt_block(&cipher)?, plain);

                Ok(())
            }
        )*
    };
}

// FIPS-197 appendix C example vectors.
aes_block_vectors! {
    aes_128_fips_vector: (
        "000102030405060708090a0b0c0d0e0f",
        "00112233445566778899aabbccddeeff",
        "69c4e0d86a7b0430d8cdb78070b4c55a"
    ),
    aes_192_fips_vector: (
        "000102030405060708090a0b0c0d0e0f1011121314151617",
        "00112233445566778899aabbccddeeff",
        "dda97ca4864cdfe06eaf70a0ec0d7191"
    ),
    aes_256_fips_vector: (
        "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
        "00112233445566778899aabbccddeeff",
        "8ea2b7ca516745bfeafc49904b496089"
    ),
}

#[test]
fn identity_for_every_block_and_key_size() -> Result<(), CipherError> {
    for block_size in [16usize, 24, 32] {
        for key_size in [16usize, 24, 32] {
            let key: Vec<u8> = (0..key_size).map(|i| (i as u8).wrapping_mul(7) ^ 0x3D).collect();
            let plain: Vec<u8> = (0..block_size).map(|i| (i as u8) ^ 0xA7).collect();

            let mut cipher = Rijndael::new(block_size, key_size, gf256::AES_POLY)?;
            cipher.set_keys(&key)?;

            let encrypted = cipher.encrypt_block(&plain)?;
            assert_ne!(encrypted, plain);
            assert_eq!(
                cipher.decrypt_block(&encrypted)?,
                plain,
                "Nb={}, Nk={}",
                block_size / 4,
                key_size / 4
            );
        }
    }
    Ok(())
}

#[test]
fn alternative_modulus_round_trips() -> Result<(), CipherError> {
    let mut cipher = Rijndael::new(16, 16, 0x11D)?;
    cipher.set_keys(&[0x55u8; 16])?;

    let plain = b"non-standard gf!";
    let encrypted = cipher.encrypt_block(plain)?;
    assert_eq!(cipher.decrypt_block(&encrypted)?, plain);

    // A different field must not agree with the AES field.
    let mut aes = Rijndael::aes(16)?;
    aes.set_keys(&[0x55u8; 16])?;
    assert_ne!(encrypted, aes.encrypt_block(plain)?);

    Ok(())
}

#[test]
fn reducible_modulus_is_rejected_at_construction() {
    assert!(matches!(
        Rijndael::new(16, 16, 0x100),
        Err(CipherError::ReducibleModulus(0x100))
    ));
}

#[test]
fn invalid_sizes_are_rejected() {
    assert!(matches!(
        Rijndael::new(20, 16, gf256::AES_POLY),
        Err(CipherError::InvalidArgument(_))
    ));
    assert!(matches!(
        Rijndael::new(16, 8, gf256::AES_POLY),
        Err(CipherError::InvalidArgument(_))
    ));

    let mut cipher = Rijndael::new(24, 16, gf256::AES_POLY).unwrap();
    assert!(matches!(
        cipher.set_keys(&[0u8; 24]),
        Err(CipherError::InvalidKeySize { got: 24, .. })
    ));
    cipher.set_keys(&[0u8; 16]).unwrap();
    assert!(matches!(
        cipher.encrypt_block(&[0u8; 16]),
        Err(CipherError::InvalidBlockSize {
            got: 16,
            expected: 24
        })
    ));
}

#[test]
fn unkeyed_cipher_reports_keys_not_set() {
    let cipher = Rijndael::aes(16).unwrap();
    assert!(matches!(
        cipher.encrypt_block(&[0u8; 16]),
        Err(CipherError::KeysNotSet)
    ));
}
