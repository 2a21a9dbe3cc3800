use num_bigint::{BigInt, BigUint};

use crate::number::{extended_gcd, gcd, jacobi_symbol, legendre_symbol, mod_pow};
use crate::primality::{FermatTest, MillerRabinTest, PrimalityTest, SolovayStrassenTest};
use crate::{CipherError, dh};

fn big(n: u64) -> BigUint {
    BigUint::from(n)
}

#[test]
fn mod_pow_known_value() {
    // 4^13 mod 497 = 445, the classic worked example.
    assert_eq!(mod_pow(&big(4), &big(13), &big(497)).unwrap(), big(445));
    assert!(matches!(
        mod_pow(&big(4), &big(13), &big(0)),
        Err(CipherError::InvalidArgument(_))
    ));
}

#[test]
fn gcd_and_bezout() {
    assert_eq!(gcd(&big(240), &big(46)), big(2));
    assert_eq!(gcd(&big(17), &big(31)), big(1));

    let a = BigInt::from(240);
    let b = BigInt::from(46);
    let (g, x, y) = extended_gcd(&a, &b);
    assert_eq!(g, BigInt::from(2));
    assert_eq!(&a * &x + &b * &y, g);
}

#[test]
fn jacobi_known_values() {
    // (2/15) = 1 because 15 ≡ 7 (mod 8).
    assert_eq!(jacobi_symbol(&big(2), &big(15)).unwrap(), 1);
    // (3/5) = -1: the squares mod 5 are 1 and 4.
    assert_eq!(jacobi_symbol(&big(3), &big(5)).unwrap(), -1);
    // (5/21) = 1 by reciprocity.
    assert_eq!(jacobi_symbol(&big(5), &big(21)).unwrap(), 1);
    // Shared factor collapses the symbol to zero.
    assert_eq!(jacobi_symbol(&big(6), &big(9)).unwrap(), 0);

    assert!(matches!(
        jacobi_symbol(&big(3), &big(10)),
        Err(CipherError::InvalidArgument(_))
    ));
}

#[test]
fn legendre_matches_jacobi_on_primes() {
    for (a, p) in [(2u64, 7u64), (3, 5), (4, 5), (10, 13), (11, 13)] {
        assert_eq!(
            legendre_symbol(&big(a), &big(p)).unwrap(),
            jacobi_symbol(&big(a), &big(p)).unwrap(),
            "({a}/{p})"
        );
    }
    assert_eq!(legendre_symbol(&big(0), &big(7)).unwrap(), 0);
    assert!(matches!(
        legendre_symbol(&big(3), &big(8)),
        Err(CipherError::InvalidArgument(_))
    ));
}

#[test]
fn primality_verdicts() {
    let tests: [&dyn PrimalityTest; 3] = [&FermatTest, &SolovayStrassenTest, &MillerRabinTest];
    let primes = [2u64, 3, 5, 104_729, 2_147_483_647];
    let composites = [4u64, 91, 100_000, 104_730];

    for test in tests {
        for p in primes {
            assert!(test.is_prime(&big(p), 0.999).unwrap(), "{p} is prime");
        }
        for c in composites {
            assert!(!test.is_prime(&big(c), 0.999).unwrap(), "{c} is composite");
        }
    }
}

#[test]
fn carmichael_numbers_fool_fermat_but_not_miller_rabin() {
    // 561 = 3 * 11 * 17 passes Fermat for every coprime witness; the
    // stronger tests reject it with overwhelming probability.
    let carmichael = big(561);
    assert!(
        !MillerRabinTest
            .is_prime(&carmichael, 0.999_999)
            .unwrap()
    );
    assert!(
        !SolovayStrassenTest
            .is_prime(&carmichael, 0.999_999)
            .unwrap()
    );
}

#[test]
fn primality_input_validation() {
    assert!(matches!(
        MillerRabinTest.is_prime(&big(1), 0.99),
        Err(CipherError::InvalidArgument(_))
    ));
    assert!(matches!(
        MillerRabinTest.is_prime(&big(7), 1.0),
        Err(CipherError::InvalidArgument(_))
    ));
}

#[test]
fn generated_primes_have_the_requested_width() {
    let prime = dh::generate_prime(64, &MillerRabinTest).unwrap();
    assert_eq!(prime.bits(), 64);
    assert!(prime.bit(0));
}

#[test]
fn dh_parties_agree() {
    let mut alice = dh::DiffieHellman::new(128);
    let (p, g) = alice.generate_parameters().unwrap();
    let alice_public = alice.generate_keys().unwrap();

    let mut bob = dh::DiffieHellman::new(128);
    bob.set_parameters(p, g);
    let bob_public = bob.generate_keys().unwrap();

    assert_eq!(
        alice.compute_shared_secret(&bob_public).unwrap(),
        bob.compute_shared_secret(&alice_public).unwrap()
    );
}

#[test]
fn dh_requires_parameters() {
    let mut party = dh::DiffieHellman::new(64);
    assert!(matches!(
        party.generate_keys(),
        Err(CipherError::InvalidArgument(_))
    ));
}

#[test]
fn derive_key_pads_and_truncates() {
    let short = BigUint::from(0xABCDu32);
    let key = dh::derive_key(&short, 8);
    assert_eq!(key, [0, 0, 0, 0, 0, 0, 0xAB, 0xCD]);

    let wide = BigUint::parse_bytes(b"0102030405060708090a", 16).unwrap();
    assert_eq!(dh::derive_key(&wide, 4), [0x07, 0x08, 0x09, 0x0A]);
}
