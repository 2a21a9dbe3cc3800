//! Triple-DES over three independently keyed DES instances.

use crate::{BlockCipher, CipherError, bail, des::Des};

/// Chaining order of the three DES passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TdesVariant {
    /// Encrypt-decrypt-encrypt; the common form, backward compatible with
    /// single DES when all three keys match.
    Ede,
    /// Encrypt-encrypt-encrypt.
    Eee,
}

/// Triple-DES with 2-key (14/16-byte) or 3-key (21/24-byte) material.
/// The 7-byte-per-key forms go through DES parity expansion; the 2-key
/// forms reuse K1 as K3.
pub struct TripleDes {
    variant: TdesVariant,
    des1: Des,
    des2: Des,
    des3: Des,
}

impl TripleDes {
    pub fn new(variant: TdesVariant) -> Self {
        Self {
            variant,
            des1: Des::new(),
            des2: Des::new(),
            des3: Des::new(),
        }
    }
}

impl BlockCipher for TripleDes {
    fn block_size(&self) -> usize {
        8
    }

    fn set_keys(&mut self, key: &[u8]) -> Result<(), CipherError> {
        let (k1, k2, k3): (&[u8], &[u8], &[u8]) = match key.len() {
            24 => (&key[..8], &key[8..16], &key[16..24]),
            21 => (&key[..7], &key[7..14], &key[14..21]),
            16 => (&key[..8], &key[8..16], &key[..8]),
            14 => (&key[..7], &key[7..14], &key[..7]),
            n => {
                return Err(CipherError::InvalidKeySize {
                    got: n,
                    expected: "14, 16, 21, or 24 bytes",
                });
            }
        };

        self.des1.set_keys(k1)?;
        self.des2.set_keys(k2)?;
        self.des3.set_keys(k3)
    }

    fn encrypt_block(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        bail!(
            block.len() != 8,
            CipherError::InvalidBlockSize {
                got: block.len(),
                expected: 8
            }
        );
        let first = self.des1.encrypt_block(block)?;
        let second = match self.variant {
            TdesVariant::Ede => self.des2.decrypt_block(&first)?,
            TdesVariant::Eee => self.des2.encrypt_block(&first)?,
        };
        self.des3.encrypt_block(&second)
    }

    fn decrypt_block(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        bail!(
            block.len() != 8,
            CipherError::InvalidBlockSize {
                got: block.len(),
                expected: 8
            }
        );
        let first = self.des3.decrypt_block(block)?;
        let second = match self.variant {
            TdesVariant::Ede => self.des2.encrypt_block(&first)?,
            TdesVariant::Eee => self.des2.decrypt_block(&first)?,
        };
        self.des1.decrypt_block(&second)
    }
}
