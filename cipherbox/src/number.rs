//! Number-theory helpers over arbitrary-precision integers.
//!
//! `num-bigint` supplies the integer type, modular exponentiation and GCD;
//! this module adds the quadratic-residue symbols and small validation
//! wrappers the primality tests and Diffie–Hellman build on.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::{CipherError, bail};

/// `base^exp mod modulus`; the modulus must be positive.
pub fn mod_pow(
    base: &BigUint,
    exp: &BigUint,
    modulus: &BigUint,
) -> Result<BigUint, CipherError> {
    bail!(
        modulus.is_zero(),
        CipherError::InvalidArgument("modulus must be positive")
    );
    Ok(base.modpow(exp, modulus))
}

pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    a.gcd(b)
}

/// Bézout coefficients: returns `(g, x, y)` with `a·x + b·y = g = gcd(a, b)`.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let result = a.extended_gcd(b);
    (result.gcd, result.x, result.y)
}

/// The Jacobi symbol `(a/n)` for positive odd `n`.
pub fn jacobi_symbol(a: &BigUint, n: &BigUint) -> Result<i8, CipherError> {
    bail!(
        n.is_zero() || !n.bit(0),
        CipherError::InvalidArgument("Jacobi symbol requires a positive odd n")
    );

    let mut a = a % n;
    let mut n = n.clone();
    let mut result: i8 = 1;

    while !a.is_zero() {
        while !a.bit(0) {
            a >>= 1usize;
            let n_mod_8 = low_bits(&n, 3);
            if n_mod_8 == 3 || n_mod_8 == 5 {
                result = -result;
            }
        }
        std::mem::swap(&mut a, &mut n);
        if low_bits(&a, 2) == 3 && low_bits(&n, 2) == 3 {
            result = -result;
        }
        a %= &n;
    }

    if n.is_one() { Ok(result) } else { Ok(0) }
}

/// The Legendre symbol `(a/p)` for an odd prime `p`, via Euler's criterion.
pub fn legendre_symbol(a: &BigUint, p: &BigUint) -> Result<i8, CipherError> {
    bail!(
        *p < BigUint::from(3u32) || !p.bit(0),
        CipherError::InvalidArgument("Legendre symbol requires an odd prime p")
    );

    if (a % p).is_zero() {
        return Ok(0);
    }
    let exp = (p - BigUint::one()) >> 1usize;
    let residue = a.modpow(&exp, p);
    Ok(if residue.is_one() { 1 } else { -1 })
}

fn low_bits(value: &BigUint, bits: u64) -> u32 {
    (0..bits).fold(0u32, |acc, i| acc | (u32::from(value.bit(i)) << i))
}
