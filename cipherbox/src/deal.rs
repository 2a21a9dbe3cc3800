//! DEAL: a 128-bit-block Feistel cipher whose round function is DES.
//!
//! Round keys come from chaining DES encryptions under the fixed key
//! `0x1234567890abcdef`, feeding each output forward and flipping a single
//! marked bit of selected key blocks along the way.

use crate::{
    BlockCipher, CipherError, KeySchedule, RoundFunction, bail,
    des::Des,
    feistel::Feistel,
    utils::xor_bytes,
};

const DEAL_KEY_CONSTANT: [u8; 8] = [0x12, 0x34, 0x56, 0x78, 0x90, 0xAB, 0xCD, 0xEF];

/// 64-bit mask with only bit `position` set, counting the MSB as bit 1.
fn bit_mask(position: u32) -> [u8; 8] {
    (1u64 << (64 - position)).to_be_bytes()
}

/// Derives 6 round keys for 128/192-bit master keys, 8 for 256-bit.
pub struct DealKeySchedule {
    key_size_bytes: usize,
}

impl DealKeySchedule {
    pub fn new(key_size_bits: usize) -> Result<Self, CipherError> {
        bail!(
            !matches!(key_size_bits, 128 | 192 | 256),
            CipherError::InvalidArgument("DEAL key size must be 128, 192, or 256 bits")
        );
        Ok(Self {
            key_size_bytes: key_size_bits / 8,
        })
    }

    pub fn num_rounds(&self) -> usize {
        if self.key_size_bytes == 32 { 8 } else { 6 }
    }
}

impl KeySchedule for DealKeySchedule {
    fn expand_key(&self, master_key: &[u8]) -> Result<Vec<Vec<u8>>, CipherError> {
        bail!(
            master_key.len() != self.key_size_bytes,
            CipherError::InvalidKeySize {
                got: master_key.len(),
                expected: "the 16, 24, or 32 bytes the schedule was configured for",
            }
        );

        let key_blocks: Vec<&[u8]> = master_key.chunks(8).collect();

        let mut des = Des::new();
        des.set_keys(&DEAL_KEY_CONSTANT)?;

        // Which key block feeds each round, and which bit (if any) is
        // flipped in it before the chained encryption.
        let plan: &[(usize, Option<u32>)] = match self.key_size_bytes {
            16 => &[
                (0, None),
                (1, None),
                (0, Some(1)),
                (1, Some(2)),
                (0, Some(4)),
                (1, Some(8)),
            ],
            24 => &[
                (0, None),
                (1, None),
                (0, Some(1)),
                (1, Some(1)),
                (0, Some(2)),
                (2, Some(4)),
            ],
            32 => &[
                (0, None),
                (1, None),
                (2, None),
                (3, None),
                (0, Some(1)),
                (1, Some(2)),
                (2, Some(4)),
                (3, Some(8)),
            ],
            _ => unreachable!("key size validated at construction"),
        };

        let mut round_keys: Vec<Vec<u8>> = Vec::with_capacity(plan.len());
        for &(block_index, mask_bit) in plan {
            let mut input = key_blocks[block_index].to_vec();
            if let Some(position) = mask_bit {
                input = xor_bytes(&input, &bit_mask(position));
            }
            if let Some(previous) = round_keys.last() {
                input = xor_bytes(&input, previous);
            }
            round_keys.push(des.encrypt_block(&input)?);
        }
        Ok(round_keys)
    }
}

/// DEAL's F-function: DES in the encrypt direction over the 8-byte half,
/// keyed by the round key.
pub struct DealRoundFunction;

impl RoundFunction for DealRoundFunction {
    fn apply(&self, half_block: &[u8], round_key: &[u8]) -> Result<Vec<u8>, CipherError> {
        bail!(
            half_block.len() != 8,
            CipherError::InvalidBlockSize {
                got: half_block.len(),
                expected: 8
            }
        );
        let mut des = Des::new();
        des.set_keys(round_key)?;
        des.encrypt_block(half_block)
    }
}

/// The DEAL block cipher: 16-byte blocks, 6 or 8 rounds by key size.
/// Unlike DES there are no outer permutations; the Feistel output is the
/// ciphertext.
pub struct Deal {
    engine: Feistel<DealKeySchedule, DealRoundFunction>,
}

impl Deal {
    pub fn new(key_size_bits: usize) -> Result<Self, CipherError> {
        let schedule = DealKeySchedule::new(key_size_bits)?;
        let rounds = schedule.num_rounds();
        Ok(Self {
            engine: Feistel::new(schedule, DealRoundFunction, 16, rounds),
        })
    }
}

impl BlockCipher for Deal {
    fn block_size(&self) -> usize {
        16
    }

    fn set_keys(&mut self, key: &[u8]) -> Result<(), CipherError> {
        self.engine.set_keys(key)
    }

    fn encrypt_block(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.engine.encrypt_block(block)
    }

    fn decrypt_block(&self, block: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.engine.decrypt_block(block)
    }
}
