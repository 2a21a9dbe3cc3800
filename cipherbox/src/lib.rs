//! # Cipherbox
//!
//! A pluggable symmetric-cryptography engine built from classical block
//! ciphers (DES, Triple-DES, DEAL, Rijndael with configurable block size),
//! the RC4 stream cipher, seven block-cipher modes of operation
//! (ECB, CBC, PCBC, CFB, OFB, CTR and the project-specific RANDOM_DELTA)
//! and four padding schemes (Zeros, PKCS#7, ANSI X.923, ISO 10126).
//!
//! The pieces compose through a [`SymmetricContext`]: a block primitive is
//! keyed once, wired to a mode engine and a padding scheme, and driven over
//! whole byte buffers or chunked streams. Independent block operations are
//! fanned out over a fixed-size worker pool while preserving output order.
//!
//! ## Example
//!
//! ```rust
//! use cipherbox::{CipherMode, Des, Padding, SymmetricContext};
//!
//! let context = SymmetricContext::new(
//!     Des::new(),
//!     b"SecretK1",
//!     CipherMode::Cbc,
//!     Padding::Pkcs7,
//!     None, // IV: drawn from the system RNG at encrypt time
//!     None, // workers: 2 x available parallelism
//! )
//! .unwrap();
//!
//! let ciphertext = context.encrypt_bytes(b"attack at dawn").unwrap();
//! let recovered = context.decrypt_bytes(&ciphertext).unwrap();
//! assert_eq!(recovered, b"attack at dawn");
//! ```
//!
//! ## Stream ciphers
//!
//! [`Rc4`] mutates its keystream state on every call, so it deliberately does
//! not implement [`BlockCipher`] and cannot be dispatched through the worker
//! pool. Drive it directly:
//!
//! ```rust
//! use cipherbox::Rc4;
//!
//! let mut rc4 = Rc4::new(b"Key").unwrap();
//! let ciphertext = rc4.crypt(b"Plaintext");
//! assert_eq!(hex::encode(&ciphertext), "bbf316e8d940af0ad3");
//! ```
use hex::FromHexError;
use thiserror::Error;

pub use crate::{
    context::{DEFAULT_CHUNK_SIZE, SymmetricContext},
    deal::Deal,
    des::Des,
    modes::CipherMode,
    padding::Padding,
    pool::WorkerPool,
    rc4::Rc4,
    rijndael::Rijndael,
    tdes::{TdesVariant, TripleDes},
};

pub mod bits;
mod context;
mod deal;
mod des;
pub mod dh;
mod feistel;
pub mod gf256;
mod modes;
pub mod number;
mod padding;
mod pool;
pub mod primality;
mod rc4;
mod rijndael;
mod tdes;
mod utils;

#[cfg(test)]
mod tests;

/// Errors surfaced by cipher primitives, mode engines and the context.
///
/// Error kinds are the contract; the attached messages are informational
/// only and may change between releases.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("invalid key size: got {got} bytes, expected {expected}")]
    InvalidKeySize { got: usize, expected: &'static str },
    #[error("invalid block size: got {got} bytes, expected {expected}")]
    InvalidBlockSize { got: usize, expected: usize },
    #[error("IV must be {expected} bytes for this mode, got {got}")]
    InvalidIv { got: usize, expected: usize },
    #[error("no keys set, call set_keys before transforming blocks")]
    KeysNotSet,
    #[error("key schedule produced {produced} round keys, {rounds} rounds need one each")]
    ShortKeySchedule { produced: usize, rounds: usize },
    #[error("ciphertext shorter than the {0}-byte mode header")]
    CiphertextTooShort(usize),
    #[error("ciphertext body length must be a multiple of {0} bytes")]
    InvalidCiphertextLength(usize),
    #[error("padding bytes do not satisfy the scheme")]
    InvalidPadding,
    #[error("padded data length is not a multiple of the block size")]
    InvalidPaddingLength,
    #[error("modulus {0:#05x} is not an irreducible polynomial of degree 8")]
    ReducibleModulus(u16),
    #[error("zero has no multiplicative inverse in GF(2^8)")]
    NoInverse,
    #[error("bit index {index} out of range for a {bits}-bit source")]
    BitIndexOutOfRange { index: usize, bits: usize },
    #[error("unknown cipher mode `{0}`")]
    UnknownMode(String),
    #[error("unknown padding scheme `{0}`")]
    UnknownPadding(String),
    #[error("{0}")]
    InvalidArgument(&'static str),
    #[error("unable to parse hex string")]
    ParseHex(#[from] FromHexError),
    #[error("i/o failure")]
    Io(#[from] std::io::Error),
    #[error("worker pool construction failed")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A keyed block primitive: a fixed-width permutation over byte blocks.
///
/// After [`set_keys`](BlockCipher::set_keys) succeeds the round-key state is
/// read-only, which is what allows a single instance to be shared across the
/// worker pool. Implementations must uphold
/// `decrypt_block(encrypt_block(x)) == x` for every block `x` of exactly
/// [`block_size`](BlockCipher::block_size) bytes.
pub trait BlockCipher: Send + Sync {
    /// Width in bytes of the blocks this primitive transforms.
    fn block_size(&self) -> usize;

    /// Expand the master key into round-key state.
    fn set_keys(&mut self, key: &[u8]) -> Result<(), CipherError>;

    /// Encrypt a single block of exactly `block_size` bytes.
    fn encrypt_block(&self, block: &[u8]) -> Result<Vec<u8>, CipherError>;

    /// Decrypt a single block of exactly `block_size` bytes.
    fn decrypt_block(&self, block: &[u8]) -> Result<Vec<u8>, CipherError>;
}

/// Expands a master key into an ordered list of per-round keys.
pub trait KeySchedule {
    fn expand_key(&self, master_key: &[u8]) -> Result<Vec<Vec<u8>>, CipherError>;
}

/// The F-function of a Feistel network.
///
/// Must be pure over its two inputs: the same `(half_block, round_key)` pair
/// always yields the same output.
pub trait RoundFunction {
    fn apply(&self, half_block: &[u8], round_key: &[u8]) -> Result<Vec<u8>, CipherError>;
}

/// Helper macro to bail out early with a [`CipherError`]
/// if any condition is true.
#[macro_export]
macro_rules! bail {
    ($expression:expr, $err:expr) => {
        if $expression {
            return Err($err);
        }
    };
    ( $( $cond:expr , $err:expr ),+ $(,)? ) => {
        $(
            if $cond {
                return Err($err);
            }
        )+
    };
}
