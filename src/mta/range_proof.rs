//! Alice's range proof for the MtA and MtAwc protocols (GG18 Fig. 9): the
//! plaintext of her Paillier ciphertext lies in `[-q³, q³]`, committed under
//! the verifier's ring-Pedersen parameters.

use super::MtaError;
use crate::arithmetic::{is_in_interval, random_coprime, random_less_than, ModInt};
use crate::hashing::challenge;
use crate::paillier::PublicKey;
use curv::arithmetic::traits::*;
use curv::elliptic::curves::{Curve, Scalar};
use curv::BigInt;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const RANGE_PROOF_ALICE_PARTS: usize = 6;

/// First-move state of the interactive proof; scrubbed on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
struct AliceRound1 {
	alpha: BigInt,
	beta: BigInt,
	gamma: BigInt,
	rho: BigInt,
	z: BigInt,
	u: BigInt,
	w: BigInt,
}

impl AliceRound1 {
	fn sample<E: Curve>(
		pk: &PublicKey,
		n_tilde: &BigInt,
		h1: &BigInt,
		h2: &BigInt,
		m: &BigInt,
	) -> Result<Self, MtaError> {
		let q = Scalar::<E>::group_order();
		let q3 = q.pow(3);
		let q_n_tilde = q * n_tilde;
		let q3_n_tilde = &q3 * n_tilde;

		let alpha = random_less_than(&q3)?;
		let beta = random_coprime(&pk.n)?;
		let gamma = random_less_than(&q3_n_tilde)?;
		let rho = random_less_than(&q_n_tilde)?;

		let pedersen = ModInt::new(n_tilde);
		let z = pedersen.mul(&pedersen.exp(h1, m), &pedersen.exp(h2, &rho));
		let w = pedersen.mul(&pedersen.exp(h1, &alpha), &pedersen.exp(h2, &gamma));
		let nn = pk.n_square();
		let ciphertexts = ModInt::new(&nn);
		let u = ciphertexts.mul(&ciphertexts.exp(&pk.gamma(), &alpha), &ciphertexts.exp(&beta, &pk.n));

		Ok(AliceRound1 { alpha, beta, gamma, rho, z, u, w })
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeProofAlice {
	pub z: BigInt,
	pub u: BigInt,
	pub w: BigInt,
	pub s: BigInt,
	pub s1: BigInt,
	pub s2: BigInt,
}

impl RangeProofAlice {
	/// Proves that `c = Enc_pk(m; r)` hides a plaintext in range. The caller
	/// supplies the encryption randomness `r` returned alongside `c`.
	pub fn prove<E: Curve>(
		pk: &PublicKey,
		c: &BigInt,
		n_tilde: &BigInt,
		h1: &BigInt,
		h2: &BigInt,
		m: &BigInt,
		r: &BigInt,
	) -> Result<RangeProofAlice, MtaError> {
		let q = Scalar::<E>::group_order();
		let round1 = AliceRound1::sample::<E>(pk, n_tilde, h1, h2, m)?;

		let gamma_pk = pk.gamma();
		let e = challenge(q, &[&pk.n, &gamma_pk, c, &round1.z, &round1.u, &round1.w]);

		let plain = ModInt::new(&pk.n);
		let s = plain.mul(&plain.exp(r, &e), &round1.beta);
		let s1 = &(&e * m) + &round1.alpha;
		let s2 = &(&e * &round1.rho) + &round1.gamma;

		Ok(RangeProofAlice {
			z: round1.z.clone(),
			u: round1.u.clone(),
			w: round1.w.clone(),
			s,
			s1,
			s2,
		})
	}

	pub fn verify<E: Curve>(
		&self,
		pk: &PublicKey,
		n_tilde: &BigInt,
		h1: &BigInt,
		h2: &BigInt,
		c: &BigInt,
	) -> bool {
		let q = Scalar::<E>::group_order();
		let q3 = q.pow(3);
		let nn = pk.n_square();

		if BigInt::is_negative(&self.s1) || BigInt::is_negative(&self.s2) {
			return false;
		}
		if !is_in_interval(&self.z, n_tilde)
			|| !is_in_interval(&self.w, n_tilde)
			|| !is_in_interval(&self.u, &nn)
			|| !is_in_interval(&self.s, &pk.n)
		{
			return false;
		}
		let one = BigInt::one();
		if self.z.gcd(n_tilde) != one || self.w.gcd(n_tilde) != one || self.u.gcd(&nn) != one {
			return false;
		}
		if self.s1 > q3 {
			return false;
		}

		let gamma_pk = pk.gamma();
		let e = challenge(q, &[&pk.n, &gamma_pk, c, &self.z, &self.u, &self.w]);
		let minus_e = BigInt::zero() - &e;

		// u == Γ^s1 · s^N · c^{-e} mod N²
		let ciphertexts = ModInt::new(&nn);
		let c_minus_e = match ciphertexts.exp_signed(c, &minus_e) {
			Some(v) => v,
			None => return false,
		};
		let u = ciphertexts.mul(
			&ciphertexts.mul(&ciphertexts.exp(&gamma_pk, &self.s1), &ciphertexts.exp(&self.s, &pk.n)),
			&c_minus_e,
		);
		if self.u != u {
			return false;
		}

		// w == h1^s1 · h2^s2 · z^{-e} mod NTilde
		let pedersen = ModInt::new(n_tilde);
		let z_minus_e = match pedersen.exp_signed(&self.z, &minus_e) {
			Some(v) => v,
			None => return false,
		};
		let w = pedersen.mul(
			&pedersen.mul(&pedersen.exp(h1, &self.s1), &pedersen.exp(h2, &self.s2)),
			&z_minus_e,
		);
		if self.w != w {
			return false;
		}
		true
	}

	/// Fixed wire order `[Z, U, W, S, S1, S2]`.
	pub fn flatten(&self) -> Vec<BigInt> {
		vec![
			self.z.clone(),
			self.u.clone(),
			self.w.clone(),
			self.s.clone(),
			self.s1.clone(),
			self.s2.clone(),
		]
	}

	pub fn unflatten(flat: &[BigInt]) -> Result<RangeProofAlice, MtaError> {
		if flat.len() != RANGE_PROOF_ALICE_PARTS {
			return Err(MtaError::WrongLength {
				expected: RANGE_PROOF_ALICE_PARTS,
				got: flat.len(),
			});
		}
		Ok(RangeProofAlice {
			z: flat[0].clone(),
			u: flat[1].clone(),
			w: flat[2].clone(),
			s: flat[3].clone(),
			s1: flat[4].clone(),
			s2: flat[5].clone(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cancel::CancellationToken;
	use crate::preparams::PreParams;
	use curv::elliptic::curves::secp256_k1::Secp256k1;

	fn setup() -> (PreParams, PreParams) {
		let token = CancellationToken::new();
		let alice = PreParams::generate_with_sizes(&token, Some(3), 1024, 256).unwrap();
		let bob = PreParams::generate_with_sizes(&token, Some(3), 512, 256).unwrap();
		(alice, bob)
	}

	#[test]
	fn honest_proof_verifies_and_tampered_scalars_fail() {
		let (alice, bob) = setup();
		let pk = &alice.paillier_sk.public_key;
		let m = Scalar::<Secp256k1>::random().to_bigint();
		let (c, r) = pk.encrypt_and_return_randomness(&m).unwrap();
		let proof =
			RangeProofAlice::prove::<Secp256k1>(pk, &c, &bob.n_tilde, &bob.h1, &bob.h2, &m, &r)
				.unwrap();
		assert!(proof.verify::<Secp256k1>(pk, &bob.n_tilde, &bob.h1, &bob.h2, &c));

		let flat = proof.flatten();
		assert_eq!(flat.len(), RANGE_PROOF_ALICE_PARTS);
		let back = RangeProofAlice::unflatten(&flat).unwrap();
		assert_eq!(back, proof);

		for index in 0..RANGE_PROOF_ALICE_PARTS {
			let mut tampered = flat.clone();
			tampered[index] = &tampered[index] + BigInt::one();
			let tampered = RangeProofAlice::unflatten(&tampered).unwrap();
			assert!(
				!tampered.verify::<Secp256k1>(pk, &bob.n_tilde, &bob.h1, &bob.h2, &c),
				"tampering scalar {index} went unnoticed"
			);
		}
	}

	#[test]
	fn proof_is_bound_to_the_ciphertext() {
		let (alice, bob) = setup();
		let pk = &alice.paillier_sk.public_key;
		let m = Scalar::<Secp256k1>::random().to_bigint();
		let (c, r) = pk.encrypt_and_return_randomness(&m).unwrap();
		let proof =
			RangeProofAlice::prove::<Secp256k1>(pk, &c, &bob.n_tilde, &bob.h1, &bob.h2, &m, &r)
				.unwrap();
		let other = pk.encrypt(&BigInt::from(99)).unwrap();
		assert!(!proof.verify::<Secp256k1>(pk, &bob.n_tilde, &bob.h1, &bob.h2, &other));
	}

	#[test]
	fn wrong_arity_is_rejected_before_any_arithmetic() {
		let flat = vec![BigInt::one(); 5];
		assert!(matches!(
			RangeProofAlice::unflatten(&flat),
			Err(MtaError::WrongLength { expected: RANGE_PROOF_ALICE_PARTS, got: 5 })
		));
	}
}
