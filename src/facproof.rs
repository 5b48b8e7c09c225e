#![allow(non_snake_case)]

//! No-small-factor proof: the prover's Paillier modulus `N0` is a product of
//! two factors, each on the order of `√N0` (neither can be smaller than
//! `√N0 / 2^ℓ` for the range bounds used here), ruling out adversarially
//! lopsided moduli. The commitments live in the verifier's ring-Pedersen
//! group `(NCap, s, t)`.

use crate::arithmetic::{random_coprime, random_less_than, ModInt, SamplingError};
use crate::hashing::challenge;
use curv::arithmetic::traits::*;
use curv::elliptic::curves::{Curve, Scalar};
use curv::BigInt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PROOF_FAC_PARTS: usize = 11;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FacProofError {
	#[error("expected {expected} scalars to reconstruct a factorisation proof, got {got}")]
	WrongLength { expected: usize, got: usize },
	#[error("sampling failed: {0}")]
	Sampling(#[from] SamplingError),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProofFac {
	pub P: BigInt,
	pub Q: BigInt,
	pub A: BigInt,
	pub B: BigInt,
	pub T: BigInt,
	pub sigma: BigInt,
	pub z1: BigInt,
	pub z2: BigInt,
	pub w1: BigInt,
	pub w2: BigInt,
	pub v: BigInt,
}

impl ProofFac {
	/// Proves `N0 = p·q` with both factors near `√N0`, under the verifier's
	/// ring-Pedersen parameters `(n_cap, s, t)`.
	pub fn new<E: Curve>(
		n0: &BigInt,
		n_cap: &BigInt,
		s: &BigInt,
		t: &BigInt,
		p: &BigInt,
		q: &BigInt,
	) -> Result<ProofFac, FacProofError> {
		let curve_q = Scalar::<E>::group_order();
		let q3 = curve_q.pow(3);
		let q_n_cap = curve_q * n_cap;
		let q_n0_n_cap = &q_n_cap * n0;
		let q3_n_cap = &q3 * n_cap;
		let q3_n0_n_cap = &q3_n_cap * n0;
		let sqrt_n0 = n0.sqrt();
		let q3_sqrt_n0 = &q3 * &sqrt_n0;

		let alpha = random_less_than(&q3_sqrt_n0)?;
		let beta = random_less_than(&q3_sqrt_n0)?;
		let mu = random_less_than(&q_n_cap)?;
		let nu = random_less_than(&q_n_cap)?;
		let sigma = random_less_than(&q_n0_n_cap)?;
		let r = random_coprime(&q3_n0_n_cap)?;
		let x = random_less_than(&q3_n_cap)?;
		let y = random_less_than(&q3_n_cap)?;

		let ring = ModInt::new(n_cap);
		let P = ring.mul(&ring.exp(s, p), &ring.exp(t, &mu));
		let Q = ring.mul(&ring.exp(s, q), &ring.exp(t, &nu));
		let A = ring.mul(&ring.exp(s, &alpha), &ring.exp(t, &x));
		let B = ring.mul(&ring.exp(s, &beta), &ring.exp(t, &y));
		let T = ring.mul(&ring.exp(&Q, &alpha), &ring.exp(t, &r));

		let e = challenge(curve_q, &[n0, n_cap, s, t, &P, &Q, &A, &B, &T, &sigma]);

		// σ̂ = σ − ν·p folds the ν commitment into the aggregate response
		let sigma_hat = &sigma - &(&nu * p);
		let z1 = &alpha + &(&e * p);
		let z2 = &beta + &(&e * q);
		let w1 = &x + &(&e * &mu);
		let w2 = &y + &(&e * &nu);
		let v = &r + &(&e * &sigma_hat);

		Ok(ProofFac { P, Q, A, B, T, sigma, z1, z2, w1, w2, v })
	}

	pub fn verify<E: Curve>(&self, n0: &BigInt, n_cap: &BigInt, s: &BigInt, t: &BigInt) -> bool {
		let curve_q = Scalar::<E>::group_order();
		let q3 = curve_q.pow(3);
		let q3_sqrt_n0 = &q3 * &n0.sqrt();

		// commitments and σ are canonical residues; only v may be negative
		for value in [&self.P, &self.Q, &self.A, &self.B, &self.T, &self.sigma] {
			if BigInt::is_negative(value) {
				return false;
			}
		}

		let e = challenge(
			curve_q,
			&[n0, n_cap, s, t, &self.P, &self.Q, &self.A, &self.B, &self.T, &self.sigma],
		);
		let ring = ModInt::new(n_cap);

		// s^z1 · t^w1 == A · P^e
		let lhs = match (ring.exp_signed(s, &self.z1), ring.exp_signed(t, &self.w1)) {
			(Some(a), Some(b)) => ring.mul(&a, &b),
			_ => return false,
		};
		let rhs = ring.mul(&self.A, &ring.exp(&self.P, &e));
		if lhs != rhs {
			return false;
		}

		// s^z2 · t^w2 == B · Q^e
		let lhs = match (ring.exp_signed(s, &self.z2), ring.exp_signed(t, &self.w2)) {
			(Some(a), Some(b)) => ring.mul(&a, &b),
			_ => return false,
		};
		let rhs = ring.mul(&self.B, &ring.exp(&self.Q, &e));
		if lhs != rhs {
			return false;
		}

		// Q^z1 · t^v == T · R^e with R = s^N0 · t^σ
		let R = ring.mul(&ring.exp(s, n0), &ring.exp(t, &self.sigma));
		let lhs = match (ring.exp_signed(&self.Q, &self.z1), ring.exp_signed(t, &self.v)) {
			(Some(a), Some(b)) => ring.mul(&a, &b),
			_ => return false,
		};
		let rhs = ring.mul(&self.T, &ring.exp(&R, &e));
		if lhs != rhs {
			return false;
		}

		// response range binds both factors to ~√N0
		if self.z1 > q3_sqrt_n0 || self.z2 > q3_sqrt_n0 {
			return false;
		}
		true
	}

	pub fn flatten(&self) -> Vec<BigInt> {
		vec![
			self.P.clone(),
			self.Q.clone(),
			self.A.clone(),
			self.B.clone(),
			self.T.clone(),
			self.sigma.clone(),
			self.z1.clone(),
			self.z2.clone(),
			self.w1.clone(),
			self.w2.clone(),
			self.v.clone(),
		]
	}

	pub fn unflatten(flat: &[BigInt]) -> Result<ProofFac, FacProofError> {
		if flat.len() != PROOF_FAC_PARTS {
			return Err(FacProofError::WrongLength {
				expected: PROOF_FAC_PARTS,
				got: flat.len(),
			});
		}
		Ok(ProofFac {
			P: flat[0].clone(),
			Q: flat[1].clone(),
			A: flat[2].clone(),
			B: flat[3].clone(),
			T: flat[4].clone(),
			sigma: flat[5].clone(),
			z1: flat[6].clone(),
			z2: flat[7].clone(),
			w1: flat[8].clone(),
			w2: flat[9].clone(),
			v: flat[10].clone(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cancel::CancellationToken;
	use crate::paillier;
	use crate::preparams::PreParams;
	use curv::elliptic::curves::secp256_k1::Secp256k1;

	fn small_setup() -> (paillier::PrivateKey, PreParams) {
		let token = CancellationToken::new();
		let prover_sk = paillier::generate_keypair(&token, 1024, 2).unwrap();
		let verifier = PreParams::generate_with_sizes(&token, Some(2), 512, 256).unwrap();
		(prover_sk, verifier)
	}

	#[test]
	fn honest_proof_verifies_and_survives_the_wire() {
		let (sk, verifier) = small_setup();
		let n0 = &sk.public_key.n;
		let proof = ProofFac::new::<Secp256k1>(
			n0,
			&verifier.n_tilde,
			&verifier.h1,
			&verifier.h2,
			&sk.p,
			&sk.q,
		)
		.unwrap();
		assert!(proof.verify::<Secp256k1>(n0, &verifier.n_tilde, &verifier.h1, &verifier.h2));

		let flat = proof.flatten();
		assert_eq!(flat.len(), PROOF_FAC_PARTS);
		let back = ProofFac::unflatten(&flat).unwrap();
		assert_eq!(back, proof);
		assert!(back.verify::<Secp256k1>(n0, &verifier.n_tilde, &verifier.h1, &verifier.h2));
	}

	#[test]
	fn tampered_scalars_are_rejected() {
		let (sk, verifier) = small_setup();
		let n0 = &sk.public_key.n;
		let proof = ProofFac::new::<Secp256k1>(
			n0,
			&verifier.n_tilde,
			&verifier.h1,
			&verifier.h2,
			&sk.p,
			&sk.q,
		)
		.unwrap();
		let flat = proof.flatten();
		for index in 0..PROOF_FAC_PARTS {
			let mut tampered = flat.clone();
			tampered[index] = &tampered[index] + BigInt::one();
			let tampered = ProofFac::unflatten(&tampered).unwrap();
			assert!(
				!tampered.verify::<Secp256k1>(n0, &verifier.n_tilde, &verifier.h1, &verifier.h2),
				"tampering scalar {index} went unnoticed"
			);
		}
		assert_eq!(
			ProofFac::unflatten(&flat[..5]),
			Err(FacProofError::WrongLength { expected: PROOF_FAC_PARTS, got: 5 })
		);
	}
}
