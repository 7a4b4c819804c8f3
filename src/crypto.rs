//! A toy RSA signature scheme.
//!
//! Do not use this for anything real. Keys are built from primes below
//! [`MAX_KEY_VAL`], so every key can be cracked by brute force, and the message
//! digest is the standard library's non-cryptographic hasher truncated to
//! 32 bits. It follows Rivest, Shamir and Adleman's construction:
//!
//! 1. Choose two distinct primes `p` and `q`.
//! 2. Compute the modulus `m = p * q`.
//! 3. Compute Carmichael's totient `c = lcm(p - 1, q - 1)`.
//! 4. Choose `e` with `1 < e < c` and `gcd(e, c) == 1`.
//! 5. Compute `d`, the inverse of `e` modulo `c`.
//!
//! The private key is `(m, e)`, the public key is `(m, d)`. A signature is
//! `hash(msg)^e mod m`; it verifies when `sig^d mod m == hash(msg) mod m`.

use crate::error::{ChainError, Result};
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rand::Rng;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Exclusive upper bound for generated primes, so that `p * q` fits in a u32.
pub const MAX_KEY_VAL: u32 = 65536;

/// A key pair sharing one modulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPair {
    pub modulus: u32,
    pub private_exponent: u32,
    pub public_exponent: u32,
}

impl KeyPair {
    pub fn private_key(&self) -> (u32, u32) {
        (self.modulus, self.private_exponent)
    }

    pub fn public_key(&self) -> (u32, u32) {
        (self.modulus, self.public_exponent)
    }

    pub fn sign(&self, message: &str) -> Result<u32> {
        sign_message(message, self.modulus, self.private_exponent)
    }

    pub fn verify(&self, message: &str, signature: u32) -> Result<bool> {
        verify_signature(message, signature, self.modulus, self.public_exponent)
    }
}

impl fmt::Display for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Private key: {}, {}", self.modulus, self.private_exponent)?;
        write!(f, "Public key: {}, {}", self.modulus, self.public_exponent)
    }
}

/// `6k +/- 1` trial division.
pub fn is_prime(n: u32) -> bool {
    if n <= 3 {
        return n > 1;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    let n = n as u64;
    let mut i: u64 = 5;
    while i * i <= n {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Draw from `3..max` until a prime comes up.
pub fn random_prime<R: Rng + ?Sized>(rng: &mut R, max: u32) -> Result<u32> {
    if max < 4 {
        return Err(ChainError::CryptoError(format!(
            "No prime to draw from 3..{}",
            max
        )));
    }
    loop {
        let p = rng.gen_range(3..max);
        if is_prime(p) {
            return Ok(p);
        }
    }
}

pub fn is_coprime(x: u32, y: u32) -> bool {
    num_integer::gcd(x, y) == 1
}

/// `lcm(p - 1, q - 1)`. Neither factor may be zero.
pub fn carmichael_totient(p: u32, q: u32) -> Result<u32> {
    match (p.checked_sub(1), q.checked_sub(1)) {
        (Some(p1), Some(q1)) => Ok(num_integer::lcm(p1, q1)),
        _ => Err(ChainError::CryptoError(format!(
            "Totient is undefined for factors {} and {}",
            p, q
        ))),
    }
}

/// Modular multiplicative inverse of `a` modulo `m` by the extended Euclidean
/// algorithm.
pub fn modular_inverse(a: u32, m: u32) -> Result<u32> {
    if m < 2 || !is_coprime(a, m) {
        return Err(ChainError::CryptoError(format!(
            "{} has no inverse modulo {}",
            a, m
        )));
    }

    let m = m as i64;
    let (mut old_r, mut r) = (m, a as i64);
    let (mut old_t, mut t) = (0i64, 1i64);
    while r != 0 {
        let quotient = old_r / r;
        (old_r, r) = (r, old_r - quotient * r);
        (old_t, t) = (t, old_t - quotient * t);
    }

    Ok(old_t.rem_euclid(m) as u32)
}

/// 32-bit message digest: the std `DefaultHasher` value, truncated.
pub fn message_hash<T: Hash + ?Sized>(t: &T) -> u32 {
    let mut hasher = DefaultHasher::new();
    t.hash(&mut hasher);
    hasher.finish() as u32
}

/// `x^y mod z`.
pub fn raise_power_modulo(x: u32, y: u32, z: u32) -> Result<u32> {
    if z == 0 {
        return Err(ChainError::CryptoError("Modulus must be non-zero".to_string()));
    }
    let r = BigUint::from(x).modpow(&BigUint::from(y), &BigUint::from(z));
    // r < z, so it always fits
    r.to_u32()
        .ok_or_else(|| ChainError::CryptoError("Modular power overflowed u32".to_string()))
}

// ****************************************************************
// Key generation, signing, verification
// ****************************************************************

/// Two distinct random primes below `max`.
///
/// `max` must lie in `6..=MAX_KEY_VAL`: below 6 there is only one prime in
/// `3..max`, above it `p * q` no longer fits in a u32.
pub fn generate_two_primes<R: Rng + ?Sized>(rng: &mut R, max: u32) -> Result<(u32, u32)> {
    if !(6..=MAX_KEY_VAL).contains(&max) {
        return Err(ChainError::CryptoError(format!(
            "Prime bound must be between 6 and {}, got {}",
            MAX_KEY_VAL, max
        )));
    }
    loop {
        let p = random_prime(rng, max)?;
        let q = random_prime(rng, max)?;
        if p != q {
            return Ok((p, q));
        }
    }
}

/// A random exponent in `2..c` that is coprime to `c`.
pub fn choose_private_exponent<R: Rng + ?Sized>(c: u32, rng: &mut R) -> Result<u32> {
    if c < 3 {
        return Err(ChainError::CryptoError(format!(
            "No private exponent exists below {}",
            c
        )));
    }
    loop {
        let e = rng.gen_range(2..c);
        if is_coprime(e, c) {
            return Ok(e);
        }
    }
}

/// The public exponent is the inverse of the private exponent modulo the totient.
pub fn compute_public_exponent(e: u32, c: u32) -> Result<u32> {
    modular_inverse(e, c)
}

/// A fresh key pair with primes below [`MAX_KEY_VAL`].
pub fn generate_key_pair<R: Rng + ?Sized>(rng: &mut R) -> Result<KeyPair> {
    generate_key_pair_below(rng, MAX_KEY_VAL)
}

/// A fresh key pair with primes below `max`.
pub fn generate_key_pair_below<R: Rng + ?Sized>(rng: &mut R, max: u32) -> Result<KeyPair> {
    let (p, q) = generate_two_primes(rng, max)?;
    let modulus = p * q;
    let c = carmichael_totient(p, q)?;
    let private_exponent = choose_private_exponent(c, rng)?;
    let public_exponent = compute_public_exponent(private_exponent, c)?;

    tracing::debug!(p, q, modulus, totient = c, "generated key pair");

    Ok(KeyPair {
        modulus,
        private_exponent,
        public_exponent,
    })
}

/// Sign `message` with the private key `(modulus, private_exponent)`.
pub fn sign_message(message: &str, modulus: u32, private_exponent: u32) -> Result<u32> {
    let h = message_hash(message);
    raise_power_modulo(h, private_exponent, modulus)
}

/// Check `signature` over `message` against the public key `(modulus, public_exponent)`.
pub fn verify_signature(
    message: &str,
    signature: u32,
    modulus: u32,
    public_exponent: u32,
) -> Result<bool> {
    let h = message_hash(message);
    let r = raise_power_modulo(signature, public_exponent, modulus)?;
    Ok(r == h % modulus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_is_prime() {
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(is_prime(3));
        assert!(is_prime(5));
        assert!(!is_prime(6));
        assert!(!is_prime(1000));
        assert!(is_prime(1223));
        assert!(is_prime(65521));
        assert!(is_prime(4_294_967_291));
        assert!(!is_prime(4_294_967_295));
    }

    #[test]
    fn test_random_prime_is_prime() {
        let mut rng = rand::thread_rng();
        for _ in 0..10 {
            let p = random_prime(&mut rng, MAX_KEY_VAL).unwrap();
            assert!(is_prime(p));
            assert!(p < MAX_KEY_VAL);
        }
        assert_eq!(random_prime(&mut rng, 4).unwrap(), 3);
    }

    #[test]
    fn test_random_prime_rejects_empty_range() {
        let mut rng = rand::thread_rng();
        for max in [0, 1, 2, 3] {
            assert!(random_prime(&mut rng, max).is_err());
        }
    }

    #[test]
    fn test_coprime() {
        assert!(is_coprime(8, 5));
        assert!(!is_coprime(8, 6));
    }

    #[test]
    fn test_carmichael_totient() {
        assert_eq!(carmichael_totient(3, 5).unwrap(), 4);
        assert_eq!(carmichael_totient(61, 53).unwrap(), 780);
        assert!(carmichael_totient(0, 5).is_err());
        assert!(carmichael_totient(5, 0).is_err());
    }

    #[test]
    fn test_generate_two_primes_distinct() {
        let mut rng = rand::thread_rng();
        for _ in 0..10 {
            let (p, q) = generate_two_primes(&mut rng, MAX_KEY_VAL).unwrap();
            assert_ne!(p, q);
            assert!(is_prime(p));
            assert!(is_prime(q));
        }
    }

    #[test]
    fn test_generate_two_primes_rejects_bounds_with_one_prime() {
        let mut rng = StdRng::seed_from_u64(1);
        for max in [0, 3, 4, 5, MAX_KEY_VAL + 1] {
            assert!(generate_two_primes(&mut rng, max).is_err());
        }
        let (p, q) = generate_two_primes(&mut rng, 6).unwrap();
        assert_eq!(p * q, 15);
    }

    #[test]
    fn test_choose_private_exponent() {
        let c = 70429;
        let mut rng = rand::thread_rng();
        for _ in 0..10 {
            let e = choose_private_exponent(c, &mut rng).unwrap();
            assert!(is_coprime(e, c));
            assert!(e > 1);
            assert!(e < c);
        }
        assert!(choose_private_exponent(2, &mut rng).is_err());
    }

    #[test]
    fn test_compute_public_exponent_known_values() {
        assert_eq!(compute_public_exponent(600010331, 654955584).unwrap(), 4070099);
        assert_eq!(compute_public_exponent(54741371, 314700540).unwrap(), 151583711);
    }

    #[test]
    fn test_modular_inverse_requires_coprime() {
        assert_eq!(modular_inverse(3, 7).unwrap(), 5);
        assert!(modular_inverse(4, 8).is_err());
        assert!(modular_inverse(0, 7).is_err());
    }

    #[test]
    fn test_key_pair_round_trips_hash_values() {
        let mut rng = StdRng::seed_from_u64(42);
        for h in [500u32, 99_999_999] {
            for _ in 0..10 {
                let kp = generate_key_pair(&mut rng).unwrap();
                let signed = raise_power_modulo(h, kp.private_exponent, kp.modulus).unwrap();
                let recovered = raise_power_modulo(signed, kp.public_exponent, kp.modulus).unwrap();
                assert_eq!(recovered, h % kp.modulus);
            }
        }
    }

    #[test]
    fn test_small_bound_still_produces_keys() {
        let mut rng = StdRng::seed_from_u64(7);
        let kp = generate_key_pair_below(&mut rng, 6).unwrap();
        assert_eq!(kp.modulus, 15);
        assert!(generate_key_pair_below(&mut rng, 5).is_err());
    }

    #[test]
    fn test_sign_message_known_values() {
        assert_eq!(sign_message("foo", 262373123, 120571543).unwrap(), 111862601);
        assert_eq!(sign_message("bar", 3360057163, 423721031).unwrap(), 2318946848);
        assert_eq!(sign_message("meow", 1240214083, 97643729).unwrap(), 866459596);
    }

    #[test]
    fn test_verify_signature_known_values() {
        assert!(verify_signature("dog", 11318728, 4228098967, 26379711).unwrap());
        assert!(!verify_signature("dog", 0, 4228098967, 26379711).unwrap());
    }

    #[test]
    fn test_sign_then_verify() {
        let mut rng = StdRng::seed_from_u64(2024);
        let kp = generate_key_pair(&mut rng).unwrap();
        let sig = kp.sign("meow").unwrap();
        assert!(kp.verify("meow", sig).unwrap());
    }

    #[test]
    fn test_zero_modulus_is_rejected() {
        assert!(sign_message("meow", 0, 3).is_err());
    }

    #[test]
    fn test_display_matches_cli_output() {
        let kp = KeyPair {
            modulus: 902962279,
            private_exponent: 278653459,
            public_exponent: 291642999,
        };
        assert_eq!(
            kp.to_string(),
            "Private key: 902962279, 278653459\nPublic key: 902962279, 291642999"
        );
    }
}
