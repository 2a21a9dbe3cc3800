//! Rijndael with a configurable block size and GF(2⁸) modulus.
//!
//! `Nb` (block) and `Nk` (key) each range over {4, 6, 8} words; the round
//! count is `max(Nb, Nk) + 6`. With `Nb = 4` and the AES polynomial this is
//! exactly AES. The S-box pair is derived from the configured modulus at
//! construction rather than baked in, so a non-standard field changes every
//! byte of the substitution layer consistently.

use crate::{BlockCipher, CipherError, bail, gf256};

/// Cipher state: four rows by up to eight columns, column-major from the
/// byte stream (`state[row][col] = input[col*4 + row]`).
type State = [[u8; 8]; 4];

const MIX_FORWARD: [[u8; 4]; 4] = [
    [0x02, 0x03, 0x01, 0x01],
    [0x01, 0x02, 0x03, 0x01],
    [0x01, 0x01, 0x02, 0x03],
    [0x03, 0x01, 0x01, 0x02],
];

const MIX_INVERSE: [[u8; 4]; 4] = [
    [0x0E, 0x0B, 0x0D, 0x09],
    [0x09, 0x0E, 0x0B, 0x0D],
    [0x0D, 0x09, 0x0E, 0x0B],
    [0x0B, 0x0D, 0x09, 0x0E],
];

fn row_shifts(nb: usize) -> [usize; 4] {
    // The wide 256-bit block spreads rows further apart.
    if nb == 8 { [0, 1, 3, 4] } else { [0, 1, 2, 3] }
}

/// Substitution box derived from a field modulus: `S(x) = aff(x⁻¹) ⊕ 0x63`
/// with the five-rotation affine map, and its inverse built symmetrically.
pub struct SBox {
    forward: [u8; 256],
    inverse: [u8; 256],
}

impl SBox {
    pub fn new(mod_poly: u16) -> Result<Self, CipherError> {
        gf256::ensure_irreducible(mod_poly)?;
        let tail = mod_poly as u8;

        let mut forward = [0u8; 256];
        for i in 0..256usize {
            let b = if i == 0 {
                0
            } else {
                gf256::inverse_reduced(i as u8, tail)
            };
            let s = b ^ b.rotate_left(1) ^ b.rotate_left(2) ^ b.rotate_left(3) ^ b.rotate_left(4);
            forward[i] = s ^ 0x63;
        }

        let mut inverse = [0u8; 256];
        for (s, slot) in inverse.iter_mut().enumerate() {
            let v = s as u8;
            let b = v.rotate_left(1) ^ v.rotate_left(3) ^ v.rotate_left(6) ^ 0x05;
            *slot = if b == 0 {
                0
            } else {
                gf256::inverse_reduced(b, tail)
            };
        }

        Ok(Self { forward, inverse })
    }

    pub fn sub(&self, value: u8) -> u8 {
        self.forward[value as usize]
    }

    pub fn inv_sub(&self, value: u8) -> u8 {
        self.inverse[value as usize]
    }
}

fn sub_bytes(state: &mut State, nb: usize, sbox: &SBox, inverse: bool) {
    for row in state.iter_mut() {
        for value in row.iter_mut().take(nb) {
            *value = if inverse {
                sbox.inv_sub(*value)
            } else {
                sbox.sub(*value)
            };
        }
    }
}

fn shift_rows(state: &mut State, nb: usize, inverse: bool) {
    let shifts = row_shifts(nb);
    for (r, row) in state.iter_mut().enumerate() {
        let mut shifted = [0u8; 8];
        for c in 0..nb {
            let source = if inverse {
                (c + shifts[r]) % nb
            } else {
                (c + nb - shifts[r]) % nb
            };
            shifted[c] = row[source];
        }
        *row = shifted;
    }
}

fn mix_columns(state: &mut State, nb: usize, tail: u8, inverse: bool) {
    let matrix = if inverse { &MIX_INVERSE } else { &MIX_FORWARD };
    for c in 0..nb {
        let column = [state[0][c], state[1][c], state[2][c], state[3][c]];
        for r in 0..4 {
            let mut acc = 0u8;
            for k in 0..4 {
                acc ^= gf256::mul_reduced(matrix[r][k], column[k], tail);
            }
            state[r][c] = acc;
        }
    }
}

fn add_round_key(state: &mut State, nb: usize, round_key: &[u8]) {
    for r in 0..4 {
        for c in 0..nb {
            state[r][c] ^= round_key[c * 4 + r];
        }
    }
}

fn rot_word(word: [u8; 4]) -> [u8; 4] {
    [word[1], word[2], word[3], word[0]]
}

fn sub_word(word: [u8; 4], sbox: &SBox) -> [u8; 4] {
    [
        sbox.sub(word[0]),
        sbox.sub(word[1]),
        sbox.sub(word[2]),
        sbox.sub(word[3]),
    ]
}

fn rcon(i: usize, tail: u8) -> u8 {
    let mut value = 1u8;
    for _ in 1..i {
        value = gf256::mul_reduced(value, 0x02, tail);
    }
    value
}

/// Word-oriented key expansion into `nr + 1` round keys of `nb * 4` bytes.
fn expand_key(key: &[u8], nb: usize, nk: usize, nr: usize, tail: u8, sbox: &SBox) -> Vec<Vec<u8>> {
    let total_words = nb * (nr + 1);
    let mut w: Vec<[u8; 4]> = Vec::with_capacity(total_words);
    for i in 0..nk {
        w.push([key[4 * i], key[4 * i + 1], key[4 * i + 2], key[4 * i + 3]]);
    }

    for i in nk..total_words {
        let mut temp = w[i - 1];
        if i % nk == 0 {
            temp = sub_word(rot_word(temp), sbox);
            temp[0] ^= rcon(i / nk, tail);
        } else if nk > 6 && i % nk == 4 {
            temp = sub_word(temp, sbox);
        }
        let prev = w[i - nk];
        w.push([
            prev[0] ^ temp[0],
            prev[1] ^ temp[1],
            prev[2] ^ temp[2],
            prev[3] ^ temp[3],
        ]);
    }

    (0..=nr)
        .map(|r| {
            let mut rk = vec![0u8; nb * 4];
            for c in 0..nb {
                rk[c * 4..c * 4 + 4].copy_from_slice(&w[r * nb + c]);
            }
            rk
        })
        .collect()
}

/// The Rijndael block cipher.
pub struct Rijndael {
    block_size: usize,
    key_size: usize,
    mod_poly: u16,
    num_rounds: usize,
    sbox: SBox,
    round_keys: Vec<Vec<u8>>,
}

impl Rijndael {
    /// Block and key sizes are in bytes, each one of 16, 24 or 32. The
    /// modulus must be an irreducible degree-8 polynomial
    /// ([`CipherError::ReducibleModulus`] otherwise).
    pub fn new(block_size: usize, key_size: usize, mod_poly: u16) -> Result<Self, CipherError> {
        bail!(
            !matches!(block_size, 16 | 24 | 32),
            CipherError::InvalidArgument("Rijndael block size must be 16, 24, or 32 bytes"),
            !matches!(key_size, 16 | 24 | 32),
            CipherError::InvalidArgument("Rijndael key size must be 16, 24, or 32 bytes"),
        );
        let sbox = SBox::new(mod_poly)?;
        let num_rounds = (block_size / 4).max(key_size / 4) + 6;
        Ok(Self {
            block_size,
            key_size,
            mod_poly,
            num_rounds,
            sbox,
            round_keys: Vec::new(),
        })
    }

    /// Standard AES: 16-byte blocks under the AES polynomial.
    pub fn aes(key_size: usize) -> Result<Self, CipherError> {
        Self::new(16, key_size, gf256::AES_POLY)
    }

    fn load_state(&self, block: &[u8]) -> State {
        let nb = self.block_size / 4;
        let mut state = [[0u8; 8]; 4];
        for (r, row) in state.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate().take(nb) {
                *value = block[c * 4 + r];
            }
        }
        state
    }

    fn store_state(&self, state: &State) -> Vec<u8> {
        let nb = self.block_size / 4;
        let mut out = vec![0u8; self.block_size];
        for r in 0..4 {
            for c in 0..nb {
                out[c * 4 + r] = state[r][c];
            }
        }
        out
    }

    fn check_block(&self, block: &[u8]) -> Result<(), CipherError> {
        bail!(
            self.round_keys.is_empty(),
            CipherError::KeysNotSet,
            block.len() != self.block_size,
            CipherError::InvalidBlockSize {
                got: block.len(),
                expected: self.block_size,
            },
        );
        Ok(())
    }
}

impl BlockCipher for Rijndael {
    fn block_size(&self) -> usize {
        self.block_size
    }

    fn set_keys(&mut self, key: &[u8]) -> Result<(), CipherError> {
        bail!(
            key.len() != self.key_size,
            CipherError::InvalidKeySize {
                got: key.len(),
                expected: "the configured Rijndael key size",
            }
        );
        self.round_keys = expand_key(
            key,
            self.block_size / 4,
            self.key_size / 4,
            self.num_rounds,
            self.mod_poly as u8,
            &self.sbox,
        );
        Ok(())
    }

    fn encrypt_block(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.check_block(block)?;
        let nb = self.block_size / 4;
        let tail = self.mod_poly as u8;

        let mut state = self.load_state(block);
        add_round_key(&mut state, nb, &self.round_keys[0]);

        for r in 1..self.num_rounds {
            sub_bytes(&mut state, nb, &self.sbox, false);
            shift_rows(&mut state, nb, false);
            mix_columns(&mut state, nb, tail, false);
            add_round_key(&mut state, nb, &self.round_keys[r]);
        }

        // The final round omits MixColumns.
        sub_bytes(&mut state, nb, &self.sbox, false);
        shift_rows(&mut state, nb, false);
        add_round_key(&mut state, nb, &self.round_keys[self.num_rounds]);

        Ok(self.store_state(&state))
    }

    fn decrypt_block(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.check_block(block)?;
        let nb = self.block_size / 4;
        let tail = self.mod_poly as u8;

        let mut state = self.load_state(block);
        add_round_key(&mut state, nb, &self.round_keys[self.num_rounds]);

        for r in (1..self.num_rounds).rev() {
            shift_rows(&mut state, nb, true);
            sub_bytes(&mut state, nb, &self.sbox, true);
            add_round_key(&mut state, nb, &self.round_keys[r]);
            mix_columns(&mut state, nb, tail, true);
        }

        shift_rows(&mut state, nb, true);
        sub_bytes(&mut state, nb, &self.sbox, true);
        add_round_key(&mut state, nb, &self.round_keys[0]);

        Ok(self.store_state(&state))
    }
}
