//! Diffie–Hellman key agreement over a freshly generated prime field.
//!
//! One party generates `(p, g)` and shares them; both parties then generate
//! key pairs and arrive at the same shared secret, which
//! [`derive_key`] compresses into a fixed-width symmetric key.

use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;

use crate::{
    CipherError, bail,
    primality::{MillerRabinTest, PrimalityTest},
};

const PRIME_CONFIDENCE: f64 = 0.99;

pub struct DiffieHellman {
    bit_length: u64,
    p: BigUint,
    g: BigUint,
    private_key: BigUint,
    public_key: BigUint,
}

impl DiffieHellman {
    pub fn new(bit_length: u64) -> Self {
        Self {
            bit_length,
            p: BigUint::zero(),
            g: BigUint::zero(),
            private_key: BigUint::zero(),
            public_key: BigUint::zero(),
        }
    }

    /// Generate the group: a `bit_length`-bit prime `p` (Miller–Rabin) and
    /// a random generator candidate `g ∈ [2, p)`.
    pub fn generate_parameters(&mut self) -> Result<(BigUint, BigUint), CipherError> {
        let p = generate_prime(self.bit_length, &MillerRabinTest)?;

        let mut rng = rand::thread_rng();
        let g = loop {
            let candidate = rng.gen_biguint(self.bit_length - 1);
            if candidate >= BigUint::from(2u32) && candidate < p {
                break candidate;
            }
        };

        self.p = p.clone();
        self.g = g.clone();
        Ok((p, g))
    }

    /// Adopt parameters received from the other party.
    pub fn set_parameters(&mut self, p: BigUint, g: BigUint) {
        self.p = p;
        self.g = g;
    }

    /// Draw a private key and publish `g^private mod p`.
    pub fn generate_keys(&mut self) -> Result<BigUint, CipherError> {
        bail!(
            self.p.is_zero(),
            CipherError::InvalidArgument("Diffie-Hellman parameters are not set")
        );
        self.private_key = rand::thread_rng().gen_biguint(self.bit_length - 1);
        self.public_key = self.g.modpow(&self.private_key, &self.p);
        Ok(self.public_key.clone())
    }

    pub fn public_key(&self) -> &BigUint {
        &self.public_key
    }

    pub fn compute_shared_secret(&self, other_public: &BigUint) -> Result<BigUint, CipherError> {
        bail!(
            self.p.is_zero(),
            CipherError::InvalidArgument("Diffie-Hellman parameters are not set")
        );
        Ok(other_public.modpow(&self.private_key, &self.p))
    }
}

/// Random prime of exactly `bits` bits: candidates get their top and bottom
/// bits pinned, then face Miller–Rabin (or whichever test is supplied).
pub fn generate_prime(bits: u64, test: &impl PrimalityTest) -> Result<BigUint, CipherError> {
    bail!(
        bits < 2,
        CipherError::InvalidArgument("prime bit length must be at least 2")
    );
    let mut rng = rand::thread_rng();
    loop {
        let mut candidate = rng.gen_biguint(bits);
        candidate.set_bit(0, true);
        candidate.set_bit(bits - 1, true);
        if test.is_prime(&candidate, PRIME_CONFIDENCE)? {
            return Ok(candidate);
        }
    }
}

/// Fixed-width symmetric key from a shared secret: the secret's big-endian
/// bytes, left-padded with zeros or truncated to the low-order `len` bytes.
pub fn derive_key(secret: &BigUint, len: usize) -> Vec<u8> {
    let bytes = secret.to_bytes_be();
    if bytes.len() >= len {
        bytes[bytes.len() - len..].to_vec()
    } else {
        let mut out = vec![0u8; len - bytes.len()];
        out.extend_from_slice(&bytes);
        out
    }
}
