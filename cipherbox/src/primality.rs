//! Probabilistic primality tests.
//!
//! Each test draws independent random witnesses until the requested
//! confidence is met: a composite verdict is certain, a prime verdict is
//! wrong with probability at most `1 − min_probability`.

use num_bigint::{BigUint, RandBigInt};
use num_traits::One;

use crate::{CipherError, bail, number};

pub trait PrimalityTest {
    /// Witness rounds needed to push the error below `1 − min_probability`.
    fn required_rounds(&self, min_probability: f64) -> usize;

    /// One witness round; `false` proves `n` composite.
    fn test_iteration(&self, n: &BigUint) -> Result<bool, CipherError>;

    fn is_prime(&self, n: &BigUint, min_probability: f64) -> Result<bool, CipherError> {
        bail!(
            *n < BigUint::from(2u32),
            CipherError::InvalidArgument("primality candidate must be at least 2"),
            !(0.5..1.0).contains(&min_probability),
            CipherError::InvalidArgument("min_probability must lie in [0.5, 1)"),
        );

        if *n == BigUint::from(2u32) || *n == BigUint::from(3u32) {
            return Ok(true);
        }
        if !n.bit(0) {
            return Ok(false);
        }

        for _ in 0..self.required_rounds(min_probability) {
            if !self.test_iteration(n)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Uniform random witness in `[2, n − largest_gap]`.
fn random_witness(n: &BigUint, largest_gap: u32) -> BigUint {
    let upper = n - largest_gap;
    let bits = (n - 1u32).bits();
    let mut rng = rand::thread_rng();
    loop {
        let a = rng.gen_biguint(bits);
        if a >= BigUint::from(2u32) && a <= upper {
            return a;
        }
    }
}

/// Fermat's little theorem: a prime passes `a^(n−1) ≡ 1 (mod n)` for every
/// coprime witness. Carmichael numbers fool this test for all coprime
/// witnesses; use Miller–Rabin when that matters.
pub struct FermatTest;

impl PrimalityTest for FermatTest {
    fn required_rounds(&self, min_probability: f64) -> usize {
        // Each round halves the error at worst.
        (-(1.0 - min_probability).log2()).ceil().max(1.0) as usize
    }

    fn test_iteration(&self, n: &BigUint) -> Result<bool, CipherError> {
        let a = random_witness(n, 1);
        if number::gcd(&a, n) != BigUint::one() {
            return Ok(false);
        }
        Ok(a.modpow(&(n - 1u32), n).is_one())
    }
}

/// Solovay–Strassen: checks Euler's criterion
/// `a^((n−1)/2) ≡ (a/n) (mod n)` against the Jacobi symbol.
pub struct SolovayStrassenTest;

impl PrimalityTest for SolovayStrassenTest {
    fn required_rounds(&self, min_probability: f64) -> usize {
        (-(1.0 - min_probability).log2()).ceil().max(1.0) as usize
    }

    fn test_iteration(&self, n: &BigUint) -> Result<bool, CipherError> {
        let a = random_witness(n, 2);
        let symbol = number::jacobi_symbol(&a, n)?;
        if symbol == 0 {
            return Ok(false);
        }
        let exp = (n - 1u32) >> 1usize;
        let residue = a.modpow(&exp, n);
        let expected = if symbol == 1 {
            BigUint::one()
        } else {
            n - 1u32
        };
        Ok(residue == expected)
    }
}

/// Miller–Rabin: factors `n − 1 = 2^s · t` and walks the square chain of
/// `a^t`. At most a quarter of witnesses lie for a composite `n`.
pub struct MillerRabinTest;

impl PrimalityTest for MillerRabinTest {
    fn required_rounds(&self, min_probability: f64) -> usize {
        (-(1.0 - min_probability).log(4.0)).ceil().max(1.0) as usize
    }

    fn test_iteration(&self, n: &BigUint) -> Result<bool, CipherError> {
        let n_minus_1 = n - 1u32;
        let s = n_minus_1.trailing_zeros().unwrap_or(0);
        let t = &n_minus_1 >> (s as usize);

        let a = random_witness(n, 2);
        let mut x = a.modpow(&t, n);
        if x.is_one() || x == n_minus_1 {
            return Ok(true);
        }

        let two = BigUint::from(2u32);
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_1 {
                return Ok(true);
            }
            if x.is_one() {
                return Ok(false);
            }
        }
        Ok(false)
    }
}
