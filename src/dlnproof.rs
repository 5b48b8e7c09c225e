//! Discrete-log proof for the ring-Pedersen parameters: given
//! `(h1, h2, NTilde)` the prover knows `x` with `h2 = h1^x mod NTilde`,
//! working in the order-`p·q` subgroup generated by `h1`.
//!
//! A single Schnorr round has soundness 1/2, so the proof iterates
//! [`ITERATIONS`] independent rounds and draws one challenge bit per round
//! from the digest of the full commitment list.

use crate::arithmetic::ModInt;
use crate::hashing::sha512_256i;
use curv::arithmetic::traits::*;
use curv::BigInt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ITERATIONS: usize = 128;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DlnProofError {
	#[error("expected {expected} scalars to reconstruct a DLN proof, got {got}")]
	WrongLength { expected: usize, got: usize },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DlnProof {
	/// Round commitments `A_i = h1^{a_i} mod NTilde`.
	alpha: Vec<BigInt>,
	/// Round responses `t_i = a_i + c_i·x mod p·q`.
	t: Vec<BigInt>,
}

fn challenge_bits(h1: &BigInt, h2: &BigInt, n_tilde: &BigInt, commitments: &[BigInt]) -> Vec<bool> {
	let mut items: Vec<&BigInt> = Vec::with_capacity(3 + commitments.len());
	items.push(h1);
	items.push(h2);
	items.push(n_tilde);
	items.extend(commitments.iter());
	let digest = sha512_256i(&items);
	(0..ITERATIONS).map(|i| digest.test_bit(i)).collect()
}

impl DlnProof {
	pub fn new(
		h1: &BigInt,
		h2: &BigInt,
		x: &BigInt,
		p: &BigInt,
		q: &BigInt,
		n_tilde: &BigInt,
	) -> DlnProof {
		let p_mul_q = p * q;
		let ring = ModInt::new(n_tilde);
		let mut randomness = Vec::with_capacity(ITERATIONS);
		let mut alpha = Vec::with_capacity(ITERATIONS);
		for _ in 0..ITERATIONS {
			let a_i = BigInt::sample_below(&p_mul_q);
			alpha.push(ring.exp(h1, &a_i));
			randomness.push(a_i);
		}

		let bits = challenge_bits(h1, h2, n_tilde, &alpha);
		let subgroup = ModInt::new(&p_mul_q);
		let t = bits
			.iter()
			.zip(randomness)
			.map(|(bit, a_i)| if *bit { subgroup.add(&a_i, x) } else { a_i })
			.collect();

		DlnProof { alpha, t }
	}

	/// Checks all [`ITERATIONS`] relations `h1^{t_i} = A_i · h2^{c_i}`.
	pub fn verify(&self, h1: &BigInt, h2: &BigInt, n_tilde: &BigInt) -> bool {
		if self.alpha.len() != ITERATIONS || self.t.len() != ITERATIONS {
			return false;
		}
		let one = BigInt::one();
		if h1 <= &one || h1 >= n_tilde || h2 <= &one || h2 >= n_tilde || h1 == h2 {
			return false;
		}
		for t in &self.t {
			let reduced = t.mod_floor(n_tilde);
			if reduced <= one || reduced >= *n_tilde {
				return false;
			}
		}
		for alpha in &self.alpha {
			let reduced = alpha.mod_floor(n_tilde);
			if reduced <= one || reduced >= *n_tilde {
				return false;
			}
		}

		let bits = challenge_bits(h1, h2, n_tilde, &self.alpha);
		let ring = ModInt::new(n_tilde);
		for ((alpha, t), bit) in self.alpha.iter().zip(&self.t).zip(&bits) {
			let lhs = match ring.exp_signed(h1, t) {
				Some(v) => v,
				None => return false,
			};
			let rhs = if *bit {
				ring.mul(alpha, h2)
			} else {
				alpha.mod_floor(n_tilde)
			};
			if lhs != rhs {
				return false;
			}
		}
		true
	}

	/// Flat wire form: the commitments followed by the responses.
	pub fn serialize(&self) -> Vec<BigInt> {
		self.alpha.iter().chain(self.t.iter()).cloned().collect()
	}

	pub fn deserialize(flat: &[BigInt]) -> Result<DlnProof, DlnProofError> {
		if flat.len() != 2 * ITERATIONS {
			return Err(DlnProofError::WrongLength {
				expected: 2 * ITERATIONS,
				got: flat.len(),
			});
		}
		Ok(DlnProof {
			alpha: flat[..ITERATIONS].to_vec(),
			t: flat[ITERATIONS..].to_vec(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::arithmetic::random_coprime;
	use crate::cancel::CancellationToken;
	use crate::primes::safe_primes_concurrent;

	// small honest (NTilde, h1, h2, x, x_inv, p, q) fixture
	fn setup() -> (BigInt, BigInt, BigInt, BigInt, BigInt, BigInt, BigInt) {
		let token = CancellationToken::new();
		let sgps = safe_primes_concurrent(&token, 128, 2, 2).unwrap();
		let n_tilde = sgps[0].safe_prime() * sgps[1].safe_prime();
		let p = sgps[0].prime().clone();
		let q = sgps[1].prime().clone();
		let p_mul_q = &p * &q;
		let ring = ModInt::new(&n_tilde);
		loop {
			let f = random_coprime(&n_tilde).unwrap();
			let x = random_coprime(&n_tilde).unwrap();
			let h1 = ring.mul(&f, &f);
			let h2 = ring.exp(&h1, &x);
			if let Some(x_inv) = BigInt::mod_inv(&x, &p_mul_q) {
				return (n_tilde, h1, h2, x, x_inv, p, q);
			}
		}
	}

	#[test]
	fn honest_proof_verifies_in_both_directions() {
		let (n_tilde, h1, h2, x, x_inv, p, q) = setup();
		let proof = DlnProof::new(&h1, &h2, &x, &p, &q, &n_tilde);
		assert!(proof.verify(&h1, &h2, &n_tilde));
		let mirror = DlnProof::new(&h2, &h1, &x_inv, &p, &q, &n_tilde);
		assert!(mirror.verify(&h2, &h1, &n_tilde));
	}

	#[test]
	fn wrong_witness_fails() {
		let (n_tilde, h1, h2, x, _, p, q) = setup();
		let bad = &x + BigInt::one();
		let proof = DlnProof::new(&h1, &h2, &bad, &p, &q, &n_tilde);
		assert!(!proof.verify(&h1, &h2, &n_tilde));
	}

	#[test]
	fn tampered_scalar_fails() {
		let (n_tilde, h1, h2, x, _, p, q) = setup();
		let proof = DlnProof::new(&h1, &h2, &x, &p, &q, &n_tilde);
		let mut flat = proof.serialize();
		for index in [0, ITERATIONS, 2 * ITERATIONS - 1] {
			let mut tampered = flat.clone();
			tampered[index] = &tampered[index] + BigInt::one();
			let tampered = DlnProof::deserialize(&tampered).unwrap();
			assert!(!tampered.verify(&h1, &h2, &n_tilde));
		}
		// untouched round trip still verifies
		let same = DlnProof::deserialize(&flat).unwrap();
		assert!(same.verify(&h1, &h2, &n_tilde));
		flat.truncate(7);
		assert_eq!(
			DlnProof::deserialize(&flat),
			Err(DlnProofError::WrongLength { expected: 2 * ITERATIONS, got: 7 })
		);
	}

	#[test]
	fn identical_generators_are_rejected() {
		let (n_tilde, h1, _, x, _, p, q) = setup();
		let proof = DlnProof::new(&h1, &h1, &x, &p, &q, &n_tilde);
		assert!(!proof.verify(&h1, &h1, &n_tilde));
	}
}
