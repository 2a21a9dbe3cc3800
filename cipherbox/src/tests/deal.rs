use crate::deal::DealKeySchedule;
use crate::{BlockCipher, CipherError, Deal, KeySchedule};

#[test]
fn deal_128_round_trip() -> Result<(), CipherError> {
    let key: Vec<u8> = (0..16u8).map(|i| i * 3 + 1).collect();
    let mut deal = Deal::new(128)?;
    deal.set_keys(&key)?;

    let plain = hex::decode("00112233445566778899aabbccddeeff").unwrap();
    let cipher = deal.encrypt_block(&plain)?;
    assert_eq!(cipher.len(), 16);
    assert_ne!(cipher, plain);
    assert_eq!(deal.decrypt_block(&cipher)?, plain);

    Ok(())
}

#[test]
fn identity_for_all_key_sizes() -> Result<(), CipherError> {
    let block: Vec<u8> = (0..16u8).map(|i| i.wrapping_mul(0x11) ^ 0x5A).collect();
    for key_bits in [128usize, 192, 256] {
        let key: Vec<u8> = (0..key_bits / 8).map(|i| (i as u8) ^ 0xC3).collect();
        let mut deal = Deal::new(key_bits)?;
        deal.set_keys(&key)?;

        let cipher = deal.encrypt_block(&block)?;
        assert_eq!(deal.decrypt_block(&cipher)?, block, "DEAL-{key_bits}");
    }
    Ok(())
}

#[test]
fn schedule_round_key_counts() -> Result<(), CipherError> {
    for (key_bits, expected_rounds) in [(128usize, 6usize), (192, 6), (256, 8)] {
        let schedule = DealKeySchedule::new(key_bits)?;
        let keys = schedule.expand_key(&vec![0x42u8; key_bits / 8])?;
        assert_eq!(keys.len(), expected_rounds, "DEAL-{key_bits}");
        assert!(keys.iter().all(|k| k.len() == 8));
    }
    Ok(())
}

#[test]
fn round_keys_differ_between_rounds() -> Result<(), CipherError> {
    // The chained feed-forward must not collapse even for an all-zero key.
    let schedule = DealKeySchedule::new(128)?;
    let keys = schedule.expand_key(&[0u8; 16])?;
    for i in 0..keys.len() {
        for j in i + 1..keys.len() {
            assert_ne!(keys[i], keys[j], "round keys {i} and {j} collide");
        }
    }
    Ok(())
}

#[test]
fn invalid_key_sizes_are_rejected() {
    assert!(matches!(
        Deal::new(64),
        Err(CipherError::InvalidArgument(_))
    ));

    let mut deal = Deal::new(128).unwrap();
    assert!(matches!(
        deal.set_keys(&[0u8; 24]),
        Err(CipherError::InvalidKeySize { got: 24, .. })
    ));
}
