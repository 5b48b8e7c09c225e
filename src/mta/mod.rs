//! The MtA (multiplicative-to-additive) share-conversion protocol.
//!
//! Alice holds `a`, Bob holds `b`; after three messages Alice learns `α` and
//! Bob keeps `β` with `α + β ≡ a·b (mod q)`. Each hop verifies the
//! counterparty's zero-knowledge proof and aborts the conversation on the
//! first refusal — there is no retry at this layer. The per-side state is
//! exactly the values each function returns; sessions are independent.

pub mod proofs;
pub mod range_proof;

pub use proofs::{ProofBob, ProofBobWC, PROOF_BOB_PARTS, PROOF_BOB_WC_PARTS};
pub use range_proof::{RangeProofAlice, RANGE_PROOF_ALICE_PARTS};

use crate::arithmetic::{random_less_than, ModInt, SamplingError};
use crate::ecpoint::PointError;
use crate::paillier::{PaillierError, PrivateKey, PublicKey};
use curv::arithmetic::traits::*;
use curv::elliptic::curves::{Curve, Point, Scalar};
use curv::BigInt;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MtaError {
	#[error("range proof for Alice's ciphertext was rejected")]
	AliceProofRejected,
	#[error("Bob's response proof was rejected")]
	BobProofRejected,
	#[error("expected {expected} scalars, got {got}")]
	WrongLength { expected: usize, got: usize },
	#[error("invalid curve point: {0}")]
	Point(#[from] PointError),
	#[error("sampling failed: {0}")]
	Sampling(#[from] SamplingError),
	#[error("paillier operation failed: {0}")]
	Paillier(#[from] PaillierError),
}

/// Bob's half of the conversion: the additive share `β`, the response
/// ciphertext `cB` for Alice, the mask `β′` behind it, and the proof Alice
/// will check.
#[derive(Clone, Debug)]
pub struct BobOutput {
	pub beta: BigInt,
	pub c_b: BigInt,
	pub beta_prm: BigInt,
	pub proof: ProofBob,
}

#[derive(Clone, Debug)]
pub struct BobOutputWC<E: Curve> {
	pub beta: BigInt,
	pub c_b: BigInt,
	pub beta_prm: BigInt,
	pub proof: ProofBobWC<E>,
}

/// Alice encrypts her share under her own Paillier key and proves it in
/// range against Bob's ring-Pedersen parameters.
pub fn alice_init<E: Curve>(
	pk_a: &PublicKey,
	a: &BigInt,
	n_tilde_b: &BigInt,
	h1_b: &BigInt,
	h2_b: &BigInt,
) -> Result<(BigInt, RangeProofAlice), MtaError> {
	let (c_a, r_a) = pk_a.encrypt_and_return_randomness(a)?;
	let proof = RangeProofAlice::prove::<E>(pk_a, &c_a, n_tilde_b, h1_b, h2_b, a, &r_a)?;
	Ok((c_a, proof))
}

// Verifies Alice's proof, builds cB = (b ⊙ cA) ⊕ Enc(β′) and β = −β′ mod q.
fn bob_respond<E: Curve>(
	pk_a: &PublicKey,
	range_proof: &RangeProofAlice,
	b: &BigInt,
	c_a: &BigInt,
	n_tilde_b: &BigInt,
	h1_b: &BigInt,
	h2_b: &BigInt,
) -> Result<(BigInt, BigInt, BigInt, BigInt), MtaError> {
	if !range_proof.verify::<E>(pk_a, n_tilde_b, h1_b, h2_b, c_a) {
		error!("RangeProofAlice verification failed");
		return Err(MtaError::AliceProofRejected);
	}
	let q = Scalar::<E>::group_order();
	let beta_prm = random_less_than(&pk_a.n)?;
	let (c_beta_prm, c_rand) = pk_a.encrypt_and_return_randomness(&beta_prm)?;
	let c_b = pk_a.homo_add(&pk_a.homo_mult(b, c_a)?, &c_beta_prm)?;
	let beta = ModInt::new(q).sub(&BigInt::zero(), &beta_prm);
	Ok((beta, c_b, beta_prm, c_rand))
}

pub fn bob_mid<E: Curve>(
	pk_a: &PublicKey,
	range_proof: &RangeProofAlice,
	b: &BigInt,
	c_a: &BigInt,
	n_tilde_a: &BigInt,
	h1_a: &BigInt,
	h2_a: &BigInt,
	n_tilde_b: &BigInt,
	h1_b: &BigInt,
	h2_b: &BigInt,
) -> Result<BobOutput, MtaError> {
	let (beta, c_b, beta_prm, c_rand) =
		bob_respond::<E>(pk_a, range_proof, b, c_a, n_tilde_b, h1_b, h2_b)?;
	let proof =
		ProofBob::prove::<E>(pk_a, n_tilde_a, h1_a, h2_a, c_a, &c_b, b, &beta_prm, &c_rand)?;
	Ok(BobOutput { beta, c_b, beta_prm, proof })
}

/// Like [`bob_mid`], additionally binding `b_point = b·G` into the proof.
pub fn bob_mid_wc<E: Curve>(
	pk_a: &PublicKey,
	range_proof: &RangeProofAlice,
	b: &BigInt,
	c_a: &BigInt,
	n_tilde_a: &BigInt,
	h1_a: &BigInt,
	h2_a: &BigInt,
	n_tilde_b: &BigInt,
	h1_b: &BigInt,
	h2_b: &BigInt,
	b_point: &Point<E>,
) -> Result<BobOutputWC<E>, MtaError> {
	let (beta, c_b, beta_prm, c_rand) =
		bob_respond::<E>(pk_a, range_proof, b, c_a, n_tilde_b, h1_b, h2_b)?;
	let proof = ProofBobWC::prove(
		pk_a, n_tilde_a, h1_a, h2_a, c_a, &c_b, b, &beta_prm, &c_rand, b_point,
	)?;
	Ok(BobOutputWC { beta, c_b, beta_prm, proof })
}

/// Alice verifies Bob's proof, decrypts `cB` and reduces into `Z_q`.
pub fn alice_end<E: Curve>(
	pk_a: &PublicKey,
	proof: &ProofBob,
	h1_a: &BigInt,
	h2_a: &BigInt,
	c_a: &BigInt,
	c_b: &BigInt,
	n_tilde_a: &BigInt,
	sk_a: &PrivateKey,
) -> Result<BigInt, MtaError> {
	if !proof.verify::<E>(pk_a, n_tilde_a, h1_a, h2_a, c_a, c_b) {
		error!("ProofBob verification failed");
		return Err(MtaError::BobProofRejected);
	}
	let alpha_prm = sk_a.decrypt(c_b)?;
	Ok(alpha_prm.mod_floor(Scalar::<E>::group_order()))
}

pub fn alice_end_wc<E: Curve>(
	pk_a: &PublicKey,
	proof: &ProofBobWC<E>,
	b_point: &Point<E>,
	c_a: &BigInt,
	c_b: &BigInt,
	n_tilde_a: &BigInt,
	h1_a: &BigInt,
	h2_a: &BigInt,
	sk_a: &PrivateKey,
) -> Result<BigInt, MtaError> {
	if !proof.verify(pk_a, n_tilde_a, h1_a, h2_a, c_a, c_b, b_point) {
		error!("ProofBobWC verification failed");
		return Err(MtaError::BobProofRejected);
	}
	let alpha_prm = sk_a.decrypt(c_b)?;
	Ok(alpha_prm.mod_floor(Scalar::<E>::group_order()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::arithmetic::random_bits;
	use crate::cancel::CancellationToken;
	use crate::ecpoint::scalar_base_mult;
	use crate::preparams::PreParams;
	use curv::elliptic::curves::p256::Secp256r1;
	use curv::elliptic::curves::secp256_k1::Secp256k1;

	// Alice gets a 1024-bit Paillier modulus so a·b + β′ cannot wrap mod N;
	// ring-Pedersen moduli stay small for speed.
	fn setup() -> (PreParams, PreParams) {
		let token = CancellationToken::new();
		let alice = PreParams::generate_with_sizes(&token, Some(3), 1024, 256).unwrap();
		let bob = PreParams::generate_with_sizes(&token, Some(3), 512, 256).unwrap();
		(alice, bob)
	}

	#[test]
	fn shares_convert_on_p256() {
		let (alice, bob) = setup();
		let q = Scalar::<Secp256r1>::group_order();
		let pk_a = &alice.paillier_sk.public_key;
		let a = random_bits(q.bit_length()).unwrap();
		let b = random_bits(q.bit_length()).unwrap();

		let (c_a, alice_proof) =
			alice_init::<Secp256r1>(pk_a, &a, &bob.n_tilde, &bob.h1, &bob.h2).unwrap();

		let out = bob_mid::<Secp256r1>(
			pk_a,
			&alice_proof,
			&b,
			&c_a,
			&alice.n_tilde,
			&alice.h1,
			&alice.h2,
			&bob.n_tilde,
			&bob.h1,
			&bob.h2,
		)
		.unwrap();

		// Dec(cB) = a·b + β′ before the reduction into Z_q
		let decrypted = alice.paillier_sk.decrypt(&out.c_b).unwrap();
		assert_eq!(
			decrypted.mod_floor(q),
			(&a * &b + &out.beta_prm).mod_floor(q)
		);

		let alpha = alice_end::<Secp256r1>(
			pk_a,
			&out.proof,
			&alice.h1,
			&alice.h2,
			&c_a,
			&out.c_b,
			&alice.n_tilde,
			&alice.paillier_sk,
		)
		.unwrap();

		// α + β ≡ a·b (mod q)
		let ring = ModInt::new(q);
		assert_eq!(
			ring.add(&alpha, &out.beta.mod_floor(q)),
			(&a * &b).mod_floor(q)
		);
	}

	#[test]
	fn shares_convert_with_check_on_secp256k1() {
		let (alice, bob) = setup();
		let q = Scalar::<Secp256k1>::group_order();
		let pk_a = &alice.paillier_sk.public_key;
		let a = random_bits(q.bit_length()).unwrap();
		let b = Scalar::<Secp256k1>::random().to_bigint();
		let b_point = scalar_base_mult::<Secp256k1>(&b);

		let (c_a, alice_proof) =
			alice_init::<Secp256k1>(pk_a, &a, &bob.n_tilde, &bob.h1, &bob.h2).unwrap();

		let out = bob_mid_wc::<Secp256k1>(
			pk_a,
			&alice_proof,
			&b,
			&c_a,
			&alice.n_tilde,
			&alice.h1,
			&alice.h2,
			&bob.n_tilde,
			&bob.h1,
			&bob.h2,
			&b_point,
		)
		.unwrap();

		// the WC proof survives its wire format
		let flat = out.proof.flatten().unwrap();
		assert_eq!(flat.len(), PROOF_BOB_WC_PARTS);
		let proof = ProofBobWC::<Secp256k1>::unflatten(&flat).unwrap();
		assert_eq!(proof, out.proof);

		let alpha = alice_end_wc::<Secp256k1>(
			pk_a,
			&proof,
			&b_point,
			&c_a,
			&out.c_b,
			&alice.n_tilde,
			&alice.h1,
			&alice.h2,
			&alice.paillier_sk,
		)
		.unwrap();

		let ring = ModInt::new(q);
		assert_eq!(
			ring.add(&alpha, &out.beta.mod_floor(q)),
			(&a * &b).mod_floor(q)
		);
	}

	#[test]
	fn tampered_alice_proof_stops_bob() {
		let (alice, bob) = setup();
		let pk_a = &alice.paillier_sk.public_key;
		let a = Scalar::<Secp256k1>::random().to_bigint();
		let b = Scalar::<Secp256k1>::random().to_bigint();

		let (c_a, alice_proof) =
			alice_init::<Secp256k1>(pk_a, &a, &bob.n_tilde, &bob.h1, &bob.h2).unwrap();

		let mut flat = alice_proof.flatten();
		flat[2] = &flat[2] + BigInt::one();
		let tampered = RangeProofAlice::unflatten(&flat).unwrap();

		let result = bob_mid::<Secp256k1>(
			pk_a,
			&tampered,
			&b,
			&c_a,
			&alice.n_tilde,
			&alice.h1,
			&alice.h2,
			&bob.n_tilde,
			&bob.h1,
			&bob.h2,
		);
		assert_eq!(result.unwrap_err(), MtaError::AliceProofRejected);
	}

	#[test]
	fn substituted_response_ciphertext_stops_alice() {
		let (alice, bob) = setup();
		let pk_a = &alice.paillier_sk.public_key;
		let a = Scalar::<Secp256k1>::random().to_bigint();
		let b = Scalar::<Secp256k1>::random().to_bigint();

		let (c_a, alice_proof) =
			alice_init::<Secp256k1>(pk_a, &a, &bob.n_tilde, &bob.h1, &bob.h2).unwrap();
		let out = bob_mid::<Secp256k1>(
			pk_a,
			&alice_proof,
			&b,
			&c_a,
			&alice.n_tilde,
			&alice.h1,
			&alice.h2,
			&bob.n_tilde,
			&bob.h1,
			&bob.h2,
		)
		.unwrap();

		let unrelated = pk_a.encrypt(&BigInt::from(123_456)).unwrap();
		let result = alice_end::<Secp256k1>(
			pk_a,
			&out.proof,
			&alice.h1,
			&alice.h2,
			&c_a,
			&unrelated,
			&alice.n_tilde,
			&alice.paillier_sk,
		);
		assert_eq!(result.unwrap_err(), MtaError::BobProofRejected);
	}

	#[test]
	fn bob_proof_flattening_round_trips_and_checks_arity() {
		let (alice, bob) = setup();
		let pk_a = &alice.paillier_sk.public_key;
		let a = Scalar::<Secp256k1>::random().to_bigint();
		let b = Scalar::<Secp256k1>::random().to_bigint();
		let (c_a, alice_proof) =
			alice_init::<Secp256k1>(pk_a, &a, &bob.n_tilde, &bob.h1, &bob.h2).unwrap();
		let out = bob_mid::<Secp256k1>(
			pk_a,
			&alice_proof,
			&b,
			&c_a,
			&alice.n_tilde,
			&alice.h1,
			&alice.h2,
			&bob.n_tilde,
			&bob.h1,
			&bob.h2,
		)
		.unwrap();

		let flat = out.proof.flatten();
		assert_eq!(flat.len(), PROOF_BOB_PARTS);
		assert_eq!(ProofBob::unflatten(&flat).unwrap(), out.proof);
		assert!(matches!(
			ProofBob::unflatten(&flat[..9]),
			Err(MtaError::WrongLength { expected: PROOF_BOB_PARTS, got: 9 })
		));
		assert!(matches!(
			ProofBobWC::<Secp256k1>::unflatten(&flat),
			Err(MtaError::WrongLength { expected: PROOF_BOB_WC_PARTS, got: PROOF_BOB_PARTS })
		));

		// every single-scalar perturbation is caught by Alice
		for index in 0..PROOF_BOB_PARTS {
			let mut tampered = flat.clone();
			tampered[index] = &tampered[index] + BigInt::one();
			let tampered = ProofBob::unflatten(&tampered).unwrap();
			assert!(
				!tampered.verify::<Secp256k1>(
					pk_a,
					&alice.n_tilde,
					&alice.h1,
					&alice.h2,
					&c_a,
					&out.c_b
				),
				"tampering scalar {index} went unnoticed"
			);
		}
	}
}
