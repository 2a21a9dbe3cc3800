//! The Data Encryption Standard.
//!
//! 8-byte blocks, 16 Feistel rounds. The key is either 8 bytes used as is,
//! or 7 bytes expanded with odd-parity bits per 7-bit group. Every
//! permutation below runs through [`bits::permute`], which owns the
//! one-based MSB-first bit numbering the published tables assume.

use crate::{
    BlockCipher, CipherError, KeySchedule, RoundFunction, bail, bits,
    feistel::Feistel,
    utils::xor_bytes,
};

const MASK_28_BITS: u32 = (1 << 28) - 1;

#[rustfmt::skip]
const IP: [usize; 64] = [
    58, 50, 42, 34, 26, 18, 10,  2,
    60, 52, 44, 36, 28, 20, 12,  4,
    62, 54, 46, 38, 30, 22, 14,  6,
    64, 56, 48, 40, 32, 24, 16,  8,
    57, 49, 41, 33, 25, 17,  9,  1,
    59, 51, 43, 35, 27, 19, 11,  3,
    61, 53, 45, 37, 29, 21, 13,  5,
    63, 55, 47, 39, 31, 23, 15,  7,
];

// Inverse of IP.
#[rustfmt::skip]
const FP: [usize; 64] = [
    40,  8, 48, 16, 56, 24, 64, 32,
    39,  7, 47, 15, 55, 23, 63, 31,
    38,  6, 46, 14, 54, 22, 62, 30,
    37,  5, 45, 13, 53, 21, 61, 29,
    36,  4, 44, 12, 52, 20, 60, 28,
    35,  3, 43, 11, 51, 19, 59, 27,
    34,  2, 42, 10, 50, 18, 58, 26,
    33,  1, 41,  9, 49, 17, 57, 25,
];

#[rustfmt::skip]
const PC1: [usize; 56] = [
    57, 49, 41, 33, 25, 17,  9,
     1, 58, 50, 42, 34, 26, 18,
    10,  2, 59, 51, 43, 35, 27,
    19, 11,  3, 60, 52, 44, 36,
    63, 55, 47, 39, 31, 23, 15,
     7, 62, 54, 46, 38, 30, 22,
    14,  6, 61, 53, 45, 37, 29,
    21, 13,  5, 28, 20, 12,  4,
];

#[rustfmt::skip]
const PC2: [usize; 48] = [
    14, 17, 11, 24,  1,  5,
     3, 28, 15,  6, 21, 10,
    23, 19, 12,  4, 26,  8,
    16,  7, 27, 20, 13,  2,
    41, 52, 31, 37, 47, 55,
    30, 40, 51, 45, 33, 48,
    44, 49, 39, 56, 34, 53,
    46, 42, 50, 36, 29, 32,
];

const SHIFTS: [u32; 16] = [1, 1, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 1];

// Expansion of the 32-bit half to 48 bits.
#[rustfmt::skip]
const E: [usize; 48] = [
    32,  1,  2,  3,  4,  5,
     4,  5,  6,  7,  8,  9,
     8,  9, 10, 11, 12, 13,
    12, 13, 14, 15, 16, 17,
    16, 17, 18, 19, 20, 21,
    20, 21, 22, 23, 24, 25,
    24, 25, 26, 27, 28, 29,
    28, 29, 30, 31, 32,  1,
];

// P-box over the concatenated S-box outputs.
#[rustfmt::skip]
const P: [usize; 32] = [
    16,  7, 20, 21,
    29, 12, 28, 17,
     1, 15, 23, 26,
     5, 18, 31, 10,
     2,  8, 24, 14,
    32, 27,  3,  9,
    19, 13, 30,  6,
    22, 11,  4, 25,
];

// The eight S-boxes, each four rows of sixteen 4-bit entries. The row is
// selected by the outer two bits of the 6-bit group, the column by the
// inner four.
#[rustfmt::skip]
const SBOXES: [[u8; 64]; 8] = [
    [
        14,  4, 13,  1,  2, 15, 11,  8,  3, 10,  6, 12,  5,  9,  0,  7,
         0, 15,  7,  4, 14,  2, 13,  1, 10,  6, 12, 11,  9,  5,  3,  8,
         4,  1, 14,  8, 13,  6,  2, 11, 15, 12,  9,  7,  3, 10,  5,  0,
        15, 12,  8,  2,  4,  9,  1,  7,  5, 11,  3, 14, 10,  0,  6, 13,
    ],
    [
        15,  1,  8, 14,  6, 11,  3,  4,  9,  7,  2, 13, 12,  0,  5, 10,
         3, 13,  4,  7, 15,  2,  8, 14, 12,  0,  1, 10,  6,  9, 11,  5,
         0, 14,  7, 11, 10,  4, 13,  1,  5,  8, 12,  6,  9,  3,  2, 15,
        13,  8, 10,  1,  3, 15,  4,  2, 11,  6,  7, 12,  0,  5, 14,  9,
    ],
    [
        10,  0,  9, 14,  6,  3, 15,  5,  1, 13, 12,  7, 11,  4,  2,  8,
        13,  7,  0,  9,  3,  4,  6, 10,  2,  8,  5, 14, 12, 11, 15,  1,
        13,  6,  4,  9,  8, 15,  3,  0, 11,  1,  2, 12,  5, 10, 14,  7,
         1, 10, 13,  0,  6,  9,  8,  7,  4, 15, 14,  3, 11,  5,  2, 12,
    ],
    [
         7, 13, 14,  3,  0,  6,  9, 10,  1,  2,  8,  5, 11, 12,  4, 15,
        13,  8, 11,  5,  6, 15,  0,  3,  4,  7,  2, 12,  1, 10, 14,  9,
        10,  6,  9,  0, 12, 11,  7, 13, 15,  1,  3, 14,  5,  2,  8,  4,
         3, 15,  0,  6, 10,  1, 13,  8,  9,  4,  5, 11, 12,  7,  2, 14,
    ],
    [
         2, 12,  4,  1,  7, 10, 11,  6,  8,  5,  3, 15, 13,  0, 14,  9,
        14, 11,  2, 12,  4,  7, 13,  1,  5,  0, 15, 10,  3,  9,  8,  6,
         4,  2,  1, 11, 10, 13,  7,  8, 15,  9, 12,  5,  6,  3,  0, 14,
        11,  8, 12,  7,  1, 14,  2, 13,  6, 15,  0,  9, 10,  4,  5,  3,
    ],
    [
        12,  1, 10, 15,  9,  2,  6,  8,  0, 13,  3,  4, 14,  7,  5, 11,
        10, 15,  4,  2,  7, 12,  9,  5,  6,  1, 13, 14,  0, 11,  3,  8,
         9, 14, 15,  5,  2,  8, 12,  3,  7,  0,  4, 10,  1, 13, 11,  6,
         4,  3,  2, 12,  9,  5, 15, 10, 11, 14,  1,  7,  6,  0,  8, 13,
    ],
    [
         4, 11,  2, 14, 15,  0,  8, 13,  3, 12,  9,  7,  5, 10,  6,  1,
        13,  0, 11,  7,  4,  9,  1, 10, 14,  3,  5, 12,  2, 15,  8,  6,
         1,  4, 11, 13, 12,  3,  7, 14, 10, 15,  6,  8,  0,  5,  9,  2,
         6, 11, 13,  8,  1,  4, 10,  7,  9,  5,  0, 15, 14,  2,  3, 12,
    ],
    [
        13,  2,  8,  4,  6, 15, 11,  1, 10,  9,  3, 14,  5,  0, 12,  7,
         1, 15, 13,  8, 10,  3,  7,  4, 12,  5,  6, 11,  0, 14,  9,  2,
         7, 11,  4,  1,  9, 12, 14,  2,  0,  6, 10, 13, 15,  3,  5,  8,
         2,  1, 14,  7,  4, 10,  8, 13, 15, 12,  9,  0,  3,  5,  6, 11,
    ],
];

/// PC-1 / rotate / PC-2 schedule producing sixteen 48-bit round keys packed
/// into 6-byte sequences.
pub struct DesKeySchedule;

impl KeySchedule for DesKeySchedule {
    fn expand_key(&self, master_key: &[u8]) -> Result<Vec<Vec<u8>>, CipherError> {
        let key = match master_key.len() {
            7 => add_parity_bits(master_key),
            8 => master_key.to_vec(),
            n => {
                return Err(CipherError::InvalidKeySize {
                    got: n,
                    expected: "7 or 8 bytes",
                });
            }
        };

        let permuted = bits::permute(&key, &PC1)?;
        let mut key56: u64 = 0;
        for &b in &permuted {
            key56 = (key56 << 8) | b as u64;
        }

        let mut c = ((key56 >> 28) & MASK_28_BITS as u64) as u32;
        let mut d = (key56 & MASK_28_BITS as u64) as u32;

        let mut round_keys = Vec::with_capacity(16);
        for shift in SHIFTS {
            c = rotate_left_28(c, shift);
            d = rotate_left_28(d, shift);
            // Repack C || D into 7 bytes so PC-2 sees one 56-bit string.
            let cd = ((c as u64) << 28) | d as u64;
            let cd_bytes = &cd.to_be_bytes()[1..];
            round_keys.push(bits::permute(cd_bytes, &PC2)?);
        }
        Ok(round_keys)
    }
}

fn rotate_left_28(value: u32, shift: u32) -> u32 {
    ((value << shift) | (value >> (28 - shift))) & MASK_28_BITS
}

/// Expand a 7-byte key to 8 bytes: each 7-bit group gains an odd-parity bit
/// in the byte's least significant position.
pub(crate) fn add_parity_bits(key56: &[u8]) -> Vec<u8> {
    let mut v: u64 = 0;
    for &b in key56 {
        v = (v << 8) | b as u64;
    }

    (0..8)
        .map(|i| {
            let seven = ((v >> (56 - (i + 1) * 7)) & 0x7F) as u8;
            let parity = u8::from(seven.count_ones() % 2 == 0);
            (seven << 1) | parity
        })
        .collect()
}

/// The DES F-function: E-expansion, round-key XOR, eight S-box lookups,
/// P-box.
pub struct DesRoundFunction;

impl RoundFunction for DesRoundFunction {
    fn apply(&self, half_block: &[u8], round_key: &[u8]) -> Result<Vec<u8>, CipherError> {
        let expanded = bits::permute(half_block, &E)?;
        let mixed = xor_bytes(&expanded, round_key);

        let mut v: u64 = 0;
        for &b in &mixed {
            v = (v << 8) | b as u64;
        }

        let mut substituted: u32 = 0;
        for (box_index, sbox) in SBOXES.iter().enumerate() {
            let group = ((v >> (42 - 6 * box_index)) & 0x3F) as usize;
            let row = ((group >> 4) & 0b10) | (group & 1);
            let col = (group >> 1) & 0xF;
            substituted = (substituted << 4) | sbox[row * 16 + col] as u32;
        }

        bits::permute(&substituted.to_be_bytes(), &P)
    }
}

/// The DES block cipher.
pub struct Des {
    engine: Feistel<DesKeySchedule, DesRoundFunction>,
}

impl Des {
    pub fn new() -> Self {
        Self {
            engine: Feistel::new(DesKeySchedule, DesRoundFunction, 8, 16),
        }
    }
}

impl Default for Des {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockCipher for Des {
    fn block_size(&self) -> usize {
        8
    }

    fn set_keys(&mut self, key: &[u8]) -> Result<(), CipherError> {
        self.engine.set_keys(key)
    }

    /// IP, sixteen rounds, swap of the halves, FP.
    fn encrypt_block(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        bail!(
            block.len() != 8,
            CipherError::InvalidBlockSize {
                got: block.len(),
                expected: 8
            }
        );
        let permuted = bits::permute(block, &IP)?;
        let core = self.engine.encrypt_block(&permuted)?;
        let preoutput = [&core[4..], &core[..4]].concat();
        bits::permute(&preoutput, &FP)
    }

    /// IP, mirror pre-swap, the round loop in reverse, FP.
    fn decrypt_block(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        bail!(
            block.len() != 8,
            CipherError::InvalidBlockSize {
                got: block.len(),
                expected: 8
            }
        );
        let permuted = bits::permute(block, &IP)?;
        let swapped = [&permuted[4..], &permuted[..4]].concat();
        let core = self.engine.decrypt_block(&swapped)?;
        bits::permute(&core, &FP)
    }
}
