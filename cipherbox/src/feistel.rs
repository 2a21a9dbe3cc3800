//! Generic Feistel network.
//!
//! The engine is parameterised by a [`KeySchedule`] and a [`RoundFunction`];
//! DES and DEAL both run on it, differing only in those two plug-ins (and in
//! the outer permutations DES adds around the round loop).

use crate::{CipherError, KeySchedule, RoundFunction, bail, utils::xor_bytes};

pub struct Feistel<S, F> {
    key_schedule: S,
    round_function: F,
    block_size: usize,
    num_rounds: usize,
    round_keys: Vec<Vec<u8>>,
}

impl<S: KeySchedule, F: RoundFunction> Feistel<S, F> {
    /// `block_size` must be even so the block splits into equal halves.
    pub fn new(key_schedule: S, round_function: F, block_size: usize, num_rounds: usize) -> Self {
        debug_assert!(block_size % 2 == 0, "Feistel block size must be even");
        Self {
            key_schedule,
            round_function,
            block_size,
            num_rounds,
            round_keys: Vec::new(),
        }
    }

    /// Run the key schedule and retain the first `num_rounds` round keys.
    pub fn set_keys(&mut self, key: &[u8]) -> Result<(), CipherError> {
        let keys = self.key_schedule.expand_key(key)?;
        bail!(
            keys.len() < self.num_rounds,
            CipherError::ShortKeySchedule {
                produced: keys.len(),
                rounds: self.num_rounds,
            }
        );
        self.round_keys = keys;
        Ok(())
    }

    /// `(L, R) ← (R, L ⊕ F(R, K_i))` for each round. No final half-swap is
    /// applied here; primitives that need one (DES) add it outside.
    pub fn encrypt_block(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        let (mut left, mut right) = self.halves(block)?;

        for i in 0..self.num_rounds {
            let f = self.round_function.apply(&right, &self.round_keys[i])?;
            let next_right = xor_bytes(&left, &f);
            left = right;
            right = next_right;
        }

        left.extend_from_slice(&right);
        Ok(left)
    }

    /// The same loop with round keys consumed in reverse:
    /// `(L, R) ← (R ⊕ F(L, K_i), L)`.
    pub fn decrypt_block(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        let (mut left, mut right) = self.halves(block)?;

        for i in (0..self.num_rounds).rev() {
            let f = self.round_function.apply(&left, &self.round_keys[i])?;
            let next_left = xor_bytes(&right, &f);
            right = left;
            left = next_left;
        }

        left.extend_from_slice(&right);
        Ok(left)
    }

    fn halves(&self, block: &[u8]) -> Result<(Vec<u8>, Vec<u8>), CipherError> {
        bail!(
            self.round_keys.is_empty(),
            CipherError::KeysNotSet,
            block.len() != self.block_size,
            CipherError::InvalidBlockSize {
                got: block.len(),
                expected: self.block_size,
            },
        );
        let half = self.block_size / 2;
        Ok((block[..half].to_vec(), block[half..].to_vec()))
    }
}
