//! Paillier additively-homomorphic encryption over a modulus of two large
//! primes.
//!
//! Key generation streams candidate primes from a worker pool and accepts
//! the first pair whose members are far enough apart
//! (`|p − q| >= 2^(modulus_bits/2 − 100)`); close pairs are rejected and
//! resampled. Decryption and the homomorphic operations validate every
//! ciphertext against `[0, N²)` and coprimality with `N²` before touching it.

use crate::arithmetic::{self, is_in_interval, ModInt, SamplingError};
use crate::cancel::CancellationToken;
use crate::primes::{small_factor_free, random_odd_candidate, PRIMALITY_ROUNDS};
use curv::arithmetic::traits::*;
use curv::BigInt;
use serde::{Deserialize, Serialize};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const SUPERVISOR_POLL: Duration = Duration::from_millis(250);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaillierError {
	#[error("key generation was cancelled or timed out")]
	Cancelled,
	#[error("modulus bit length must be even and leave room for the prime-distance check, got {0}")]
	InvalidBitLength(usize),
	#[error("plaintext is not in [0, N)")]
	InvalidPlaintext,
	#[error("ciphertext is not a unit modulo N^2")]
	InvalidCiphertext,
	#[error("sampling failed: {0}")]
	Sampling(#[from] SamplingError),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PublicKey {
	pub n: BigInt,
}

impl PublicKey {
	pub fn n_square(&self) -> BigInt {
		&self.n * &self.n
	}

	/// Γ = N + 1, the plaintext-group generator.
	pub fn gamma(&self) -> BigInt {
		&self.n + BigInt::one()
	}

	/// The key as an ordered scalar tuple `[N, Γ]`, as hashed into challenges.
	pub fn as_ints(&self) -> Vec<BigInt> {
		vec![self.n.clone(), self.gamma()]
	}

	pub fn validate_ciphertext(&self, c: &BigInt) -> bool {
		let nn = self.n_square();
		is_in_interval(c, &nn) && c.gcd(&nn) == BigInt::one()
	}

	/// `c = Γ^m · r^N mod N²` for the given unit `r`.
	pub fn encrypt_with_randomness(&self, m: &BigInt, r: &BigInt) -> Result<BigInt, PaillierError> {
		if !is_in_interval(m, &self.n) {
			return Err(PaillierError::InvalidPlaintext);
		}
		let nn = self.n_square();
		let ring = ModInt::new(&nn);
		Ok(ring.mul(&ring.exp(&self.gamma(), m), &ring.exp(r, &self.n)))
	}

	/// Encrypts `m` and also returns the randomness used, which range proofs
	/// over the ciphertext need as part of their witness.
	pub fn encrypt_and_return_randomness(
		&self,
		m: &BigInt,
	) -> Result<(BigInt, BigInt), PaillierError> {
		let r = arithmetic::random_coprime(&self.n)?;
		let c = self.encrypt_with_randomness(m, &r)?;
		Ok((c, r))
	}

	pub fn encrypt(&self, m: &BigInt) -> Result<BigInt, PaillierError> {
		self.encrypt_and_return_randomness(m).map(|(c, _)| c)
	}

	/// `Enc(m1) ⊕ Enc(m2) = c1·c2 mod N²`.
	pub fn homo_add(&self, c1: &BigInt, c2: &BigInt) -> Result<BigInt, PaillierError> {
		if !self.validate_ciphertext(c1) || !self.validate_ciphertext(c2) {
			return Err(PaillierError::InvalidCiphertext);
		}
		Ok(BigInt::mod_mul(c1, c2, &self.n_square()))
	}

	/// `k ⊙ Enc(m) = c^k mod N²`, requiring `k ∈ [0, N)`.
	pub fn homo_mult(&self, k: &BigInt, c: &BigInt) -> Result<BigInt, PaillierError> {
		if !is_in_interval(k, &self.n) {
			return Err(PaillierError::InvalidPlaintext);
		}
		if !self.validate_ciphertext(c) {
			return Err(PaillierError::InvalidCiphertext);
		}
		Ok(BigInt::mod_pow(c, k, &self.n_square()))
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrivateKey {
	pub public_key: PublicKey,
	/// λ = lcm(p−1, q−1)
	pub lambda: BigInt,
	/// μ = λ⁻¹ mod N
	pub mu: BigInt,
	// The factor pair is the witness of the no-small-factor proof; it stays
	// on the secret side and is never part of the public view.
	pub p: BigInt,
	pub q: BigInt,
}

impl PrivateKey {
	/// Recovers `m ∈ [0, N)` from a valid ciphertext.
	pub fn decrypt(&self, c: &BigInt) -> Result<BigInt, PaillierError> {
		if !self.public_key.validate_ciphertext(c) {
			return Err(PaillierError::InvalidCiphertext);
		}
		let n = &self.public_key.n;
		let nn = self.public_key.n_square();
		// L(c^λ mod N²) · μ mod N, with L(u) = (u − 1) / N
		let l = (BigInt::mod_pow(c, &self.lambda, &nn) - BigInt::one()) / n;
		Ok(BigInt::mod_mul(&l, &self.mu, n))
	}
}

/// `p != q` and `|p − q|` at least `2^(modulus_bits/2 − 100)` bits' worth of
/// separation, so the modulus cannot be factored by Fermat-style methods.
pub(crate) fn acceptable_prime_pair(p: &BigInt, q: &BigInt, modulus_bits: usize) -> bool {
	if p == q {
		return false;
	}
	(p - q).abs().bit_length() >= modulus_bits / 2 - 100
}

fn assemble(p: &BigInt, q: &BigInt) -> Option<PrivateKey> {
	let n = p * q;
	let p_minus = p - BigInt::one();
	let q_minus = q - BigInt::one();
	let phi = &p_minus * &q_minus;
	let lambda = &phi / &p_minus.gcd(&q_minus);
	// gcd(λ, N) != 1 only for degenerate prime pairs; callers resample
	let mu = BigInt::mod_inv(&lambda, &n)?;
	Some(PrivateKey {
		public_key: PublicKey { n },
		lambda,
		mu,
		p: p.clone(),
		q: q.clone(),
	})
}

fn prime_worker(token: &CancellationToken, prime_bits: usize, found: &mpsc::Sender<BigInt>) {
	while !token.is_cancelled() {
		let candidate = random_odd_candidate(prime_bits);
		if !small_factor_free(&candidate) {
			continue;
		}
		if !candidate.is_probable_prime(PRIMALITY_ROUNDS) {
			continue;
		}
		if found.send(candidate).is_err() {
			return;
		}
	}
}

/// Generates a Paillier key with an exactly `modulus_bits`-bit modulus,
/// using `concurrency` prime-search workers.
pub fn generate_keypair(
	token: &CancellationToken,
	modulus_bits: usize,
	concurrency: usize,
) -> Result<PrivateKey, PaillierError> {
	if modulus_bits % 2 != 0 || modulus_bits / 2 <= 100 {
		return Err(PaillierError::InvalidBitLength(modulus_bits));
	}
	let prime_bits = modulus_bits / 2;
	let workers = concurrency.max(1);
	let local = token.child();
	thread::scope(|s| {
		let (tx, rx) = mpsc::channel();
		for _ in 0..workers {
			let tx = tx.clone();
			let local = local.clone();
			s.spawn(move || prime_worker(&local, prime_bits, &tx));
		}
		drop(tx);

		let mut held: Option<BigInt> = None;
		loop {
			let prime = match rx.recv_timeout(SUPERVISOR_POLL) {
				Ok(prime) => prime,
				Err(mpsc::RecvTimeoutError::Timeout) => {
					if local.is_cancelled() {
						return Err(PaillierError::Cancelled);
					}
					continue;
				}
				Err(mpsc::RecvTimeoutError::Disconnected) => {
					local.cancel();
					return Err(PaillierError::Cancelled);
				}
			};
			match held.take() {
				None => held = Some(prime),
				Some(previous) => {
					if acceptable_prime_pair(&previous, &prime, modulus_bits) {
						if let Some(key) = assemble(&previous, &prime) {
							local.cancel();
							return Ok(key);
						}
					} else {
						debug!("paillier primes too close, resampling");
					}
					held = Some(prime);
				}
			}
		}
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn test_key() -> PrivateKey {
		let token = CancellationToken::new();
		generate_keypair(&token, 512, 2).unwrap()
	}

	#[test]
	fn encrypt_decrypt_round_trips() {
		let sk = test_key();
		let m = BigInt::sample(128);
		let (c, r) = sk.public_key.encrypt_and_return_randomness(&m).unwrap();
		assert_eq!(sk.decrypt(&c).unwrap(), m);
		// the returned randomness reproduces the ciphertext
		assert_eq!(sk.public_key.encrypt_with_randomness(&m, &r).unwrap(), c);
	}

	#[test]
	fn homomorphic_addition() {
		let sk = test_key();
		let pk = &sk.public_key;
		let m1 = BigInt::sample(128);
		let m2 = BigInt::sample(128);
		let sum = pk.homo_add(&pk.encrypt(&m1).unwrap(), &pk.encrypt(&m2).unwrap()).unwrap();
		assert_eq!(sk.decrypt(&sum).unwrap(), &m1 + &m2);
	}

	#[test]
	fn homomorphic_scalar_multiplication() {
		let sk = test_key();
		let pk = &sk.public_key;
		let m = BigInt::sample(100);
		let k = BigInt::sample(100);
		let scaled = pk.homo_mult(&k, &pk.encrypt(&m).unwrap()).unwrap();
		assert_eq!(sk.decrypt(&scaled).unwrap(), &k * &m);
	}

	#[test]
	fn rejects_out_of_range_plaintext() {
		let sk = test_key();
		let n = sk.public_key.n.clone();
		assert_eq!(sk.public_key.encrypt(&n), Err(PaillierError::InvalidPlaintext));
		assert_eq!(
			sk.public_key.encrypt(&BigInt::from(-1)),
			Err(PaillierError::InvalidPlaintext)
		);
	}

	#[test]
	fn rejects_malformed_ciphertexts() {
		let sk = test_key();
		let pk = &sk.public_key;
		// 0 and N share a factor with N²
		assert_eq!(sk.decrypt(&BigInt::zero()), Err(PaillierError::InvalidCiphertext));
		assert_eq!(sk.decrypt(&pk.n), Err(PaillierError::InvalidCiphertext));
		assert_eq!(
			sk.decrypt(&pk.n_square()),
			Err(PaillierError::InvalidCiphertext)
		);
		let c = pk.encrypt(&BigInt::from(42)).unwrap();
		assert_eq!(pk.homo_add(&c, &pk.n), Err(PaillierError::InvalidCiphertext));
	}

	#[test]
	fn close_primes_are_rejected() {
		// synthetic seam: two primes of equal size whose difference is tiny
		let p = BigInt::from(1_000_003);
		let close = BigInt::from(1_000_033);
		assert!(!acceptable_prime_pair(&p, &close, 512));
		assert!(!acceptable_prime_pair(&p, &p, 512));
		let far = &p + BigInt::pow(&BigInt::from(2), 200);
		assert!(acceptable_prime_pair(&p, &far, 512));
	}

	#[test]
	fn keygen_produces_exact_modulus_size_and_consistent_lambda() {
		let sk = test_key();
		assert_eq!(sk.public_key.n.bit_length(), 512);
		assert_eq!(&sk.p * &sk.q, sk.public_key.n);
		let one = BigInt::one();
		let phi = (&sk.p - &one) * (&sk.q - &one);
		assert_eq!(phi.mod_floor(&sk.lambda), BigInt::zero());
		assert_eq!(
			BigInt::mod_mul(&sk.lambda, &sk.mu, &sk.public_key.n),
			one
		);
	}

	#[test]
	fn keygen_rejects_bad_bit_lengths() {
		let token = CancellationToken::new();
		assert_eq!(
			generate_keypair(&token, 513, 1),
			Err(PaillierError::InvalidBitLength(513))
		);
		assert_eq!(
			generate_keypair(&token, 128, 1),
			Err(PaillierError::InvalidBitLength(128))
		);
	}

	#[test]
	fn keygen_honours_cancellation() {
		let token = CancellationToken::new();
		token.cancel();
		assert_eq!(
			generate_keypair(&token, 2048, 2),
			Err(PaillierError::Cancelled)
		);
	}
}
