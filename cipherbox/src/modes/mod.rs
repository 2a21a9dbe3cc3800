//! Block-cipher modes of operation.
//!
//! Each mode module exposes the same four entry points — `encrypt_bytes`,
//! `decrypt_bytes`, `encrypt_stream`, `decrypt_stream` — over a keyed
//! [`BlockCipher`](crate::BlockCipher) plus whatever header material the
//! mode prepends (IV, nonce, or IV‖delta). The
//! [context](crate::SymmetricContext) dispatches on [`CipherMode`].
//!
//! Parallelism follows the data dependencies: ECB and CTR fan out in both
//! directions, CBC/PCBC/CFB/RANDOM_DELTA only on decrypt (where every
//! primitive input is known up front), OFB never.

pub mod cbc;
pub mod cfb;
pub mod ctr;
pub mod ecb;
pub mod ofb;
pub mod pcbc;
pub mod random_delta;

use std::fmt;
use std::io::{ErrorKind, Read};
use std::str::FromStr;

use crate::CipherError;

/// Mode-of-operation selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CipherMode {
    /// Electronic codebook: blocks transformed independently. No IV.
    Ecb,
    /// Cipher block chaining.
    Cbc,
    /// Propagating CBC: the chain mixes in the previous plaintext too.
    Pcbc,
    /// Cipher feedback: keystream from encrypting the previous ciphertext.
    Cfb,
    /// Output feedback: self-contained keystream chain.
    Ofb,
    /// Counter mode with a half-block nonce.
    Ctr,
    /// CBC-like construction whose per-block IV advances by a random delta.
    RandomDelta,
}

impl CipherMode {
    /// Expected IV length for this mode, `None` when no IV applies.
    pub fn iv_len(&self, block_size: usize) -> Option<usize> {
        match self {
            CipherMode::Ecb => None,
            CipherMode::Ctr => Some(block_size / 2),
            _ => Some(block_size),
        }
    }
}

impl FromStr for CipherMode {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ecb" => Ok(CipherMode::Ecb),
            "cbc" => Ok(CipherMode::Cbc),
            "pcbc" => Ok(CipherMode::Pcbc),
            "cfb" => Ok(CipherMode::Cfb),
            "ofb" => Ok(CipherMode::Ofb),
            "ctr" => Ok(CipherMode::Ctr),
            "random-delta" | "random_delta" => Ok(CipherMode::RandomDelta),
            other => Err(CipherError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CipherMode::Ecb => "ecb",
            CipherMode::Cbc => "cbc",
            CipherMode::Pcbc => "pcbc",
            CipherMode::Cfb => "cfb",
            CipherMode::Ofb => "ofb",
            CipherMode::Ctr => "ctr",
            CipherMode::RandomDelta => "random-delta",
        };
        f.write_str(name)
    }
}

/// Read up to `chunk_size` bytes from the source. An empty result means
/// end of stream.
pub(crate) fn read_chunk<R: Read>(src: &mut R, chunk_size: usize) -> Result<Vec<u8>, CipherError> {
    let mut buf = Vec::new();
    src.by_ref().take(chunk_size as u64).read_to_end(&mut buf)?;
    Ok(buf)
}

/// Read an exactly `len`-byte mode header, failing with
/// [`CipherError::CiphertextTooShort`] when the stream runs out first.
pub(crate) fn read_header<R: Read>(src: &mut R, len: usize) -> Result<Vec<u8>, CipherError> {
    let mut buf = vec![0u8; len];
    match src.read_exact(&mut buf) {
        Ok(()) => Ok(buf),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(CipherError::CiphertextTooShort(len)),
        Err(e) => Err(e.into()),
    }
}
