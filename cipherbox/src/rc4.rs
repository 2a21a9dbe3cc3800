//! The RC4 stream cipher.
//!
//! RC4 mutates its 256-byte state on every keystream byte, so unlike the
//! block primitives an instance is bound to a single sequential caller: it
//! does not implement [`BlockCipher`](crate::BlockCipher) and must never be
//! fanned out over the worker pool within one message.

use crate::{CipherError, bail};

pub struct Rc4 {
    s: [u8; 256],
    i: u8,
    j: u8,
}

impl Rc4 {
    /// Run the key-scheduling algorithm. Keys are 1 to 256 bytes.
    pub fn new(key: &[u8]) -> Result<Self, CipherError> {
        bail!(
            key.is_empty() || key.len() > 256,
            CipherError::InvalidKeySize {
                got: key.len(),
                expected: "1 to 256 bytes",
            }
        );

        let mut s = [0u8; 256];
        for (index, slot) in s.iter_mut().enumerate() {
            *slot = index as u8;
        }

        let mut j: u8 = 0;
        for i in 0..256usize {
            j = j.wrapping_add(s[i]).wrapping_add(key[i % key.len()]);
            s.swap(i, j as usize);
        }

        Ok(Self { s, i: 0, j: 0 })
    }

    /// XOR `data` against the next `data.len()` keystream bytes, advancing
    /// the generator. Encryption and decryption are the same operation.
    pub fn crypt(&mut self, data: &[u8]) -> Vec<u8> {
        data.iter().map(|&byte| byte ^ self.next_byte()).collect()
    }

    pub fn encrypt(&mut self, plaintext: &[u8]) -> Vec<u8> {
        self.crypt(plaintext)
    }

    pub fn decrypt(&mut self, ciphertext: &[u8]) -> Vec<u8> {
        self.crypt(ciphertext)
    }

    // One PRGA step.
    fn next_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.s[self.i as usize]);
        self.s.swap(self.i as usize, self.j as usize);
        let index = self.s[self.i as usize].wrapping_add(self.s[self.j as usize]);
        self.s[index as usize]
    }
}
