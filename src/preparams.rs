//! Pre-parameter bundle for the MtA proofs: a Paillier key and the
//! ring-Pedersen tuple `(NTilde, h1, h2)` derived from two Germain safe
//! primes, with the discrete-log witnesses `α` and `β = α⁻¹ mod p·q`.
//!
//! Generation runs the Paillier keygen and the safe-prime search
//! concurrently; this can take minutes at production sizes, so it honours a
//! cancellation token and emits a heartbeat log while working.

use crate::arithmetic::{random_coprime, random_qr_generator, ModInt, SamplingError};
use crate::cancel::CancellationToken;
use crate::dlnproof::{DlnProof, DlnProofError};
use crate::paillier::{self, PaillierError, PrivateKey, PublicKey};
use crate::primes::{self, GermainSafePrime, PrimeError};
use curv::arithmetic::traits::*;
use curv::BigInt;
use serde::{Deserialize, Serialize};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Modulus length recommended in the GG18 spec, for both N and NTilde.
pub const PAILLIER_MODULUS_BITS: usize = 2048;
/// Two safe primes of this size produce NTilde.
pub const SAFE_PRIME_BITS: usize = 1024;

const LOG_PROGRESS_TICK: Duration = Duration::from_secs(8);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreParamsError {
	#[error("pre-parameter generation was cancelled or timed out")]
	Cancelled,
	#[error("paillier key generation failed: {0}")]
	Paillier(#[from] PaillierError),
	#[error("safe prime generation failed: {0}")]
	SafePrimes(#[from] PrimeError),
	#[error("sampling failed: {0}")]
	Sampling(#[from] SamplingError),
	#[error("expected {expected} scalars for the public pre-parameter view, got {got}")]
	WrongLength { expected: usize, got: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DlnVerifyError {
	#[error("h1 and h2 must differ")]
	IdenticalGenerators,
	#[error("modulus must be exactly {expected} bits, got {got}")]
	ModulusBitLength { expected: usize, got: usize },
	#[error("malformed DLN proof: {0}")]
	Malformed(#[from] DlnProofError),
	#[error("DLN proof {0} failed to verify")]
	Rejected(u8),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PreParams {
	pub paillier_sk: PrivateKey,
	pub n_tilde: BigInt,
	pub h1: BigInt,
	pub h2: BigInt,
	pub alpha: BigInt,
	pub beta: BigInt,
	/// Germain prime behind the safe prime P = 2p+1.
	pub p: BigInt,
	/// Germain prime behind the safe prime Q = 2q+1.
	pub q: BigInt,
}

/// What a party publishes to its peers: everything needed to verify proofs
/// against it, and nothing else.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PublicPreParams {
	pub paillier_pk: PublicKey,
	pub n_tilde: BigInt,
	pub h1: BigInt,
	pub h2: BigInt,
}

enum Generated {
	Paillier(Result<PrivateKey, PaillierError>),
	SafePrimes(Result<Vec<GermainSafePrime>, PrimeError>),
}

fn default_concurrency() -> usize {
	thread::available_parallelism().map(usize::from).unwrap_or(1)
}

impl PreParams {
	/// Generates pre-parameters within `timeout`. A third of the given
	/// concurrency (default: the CPU count) goes to the safe-prime search;
	/// the Paillier keygen gets twice that share.
	pub fn generate(timeout: Duration, concurrency: Option<usize>) -> Result<PreParams, PreParamsError> {
		let token = CancellationToken::with_timeout(timeout);
		PreParams::generate_with_cancel(&token, concurrency)
	}

	pub fn generate_with_cancel(
		token: &CancellationToken,
		concurrency: Option<usize>,
	) -> Result<PreParams, PreParamsError> {
		PreParams::generate_with_sizes(token, concurrency, PAILLIER_MODULUS_BITS, SAFE_PRIME_BITS)
	}

	// Size seam so tests can exercise the full pipeline on small moduli.
	pub(crate) fn generate_with_sizes(
		token: &CancellationToken,
		concurrency: Option<usize>,
		modulus_bits: usize,
		safe_prime_bits: usize,
	) -> Result<PreParams, PreParamsError> {
		let concurrency = (concurrency.unwrap_or_else(default_concurrency) / 3).max(1);
		let local = token.child();

		let (paillier_sk, safe_primes) = thread::scope(|s| {
			let (tx, rx) = mpsc::channel();
			{
				let tx = tx.clone();
				let local = local.clone();
				// larger weight: the paillier primes must also satisfy the
				// large |p - q| requirement
				s.spawn(move || {
					info!("generating the Paillier modulus, please wait...");
					let started = Instant::now();
					let result = paillier::generate_keypair(&local, modulus_bits, concurrency * 2);
					if result.is_ok() {
						debug!(elapsed = ?started.elapsed(), "paillier modulus generated");
					}
					let _ = tx.send(Generated::Paillier(result));
				});
			}
			{
				let tx = tx.clone();
				let local = local.clone();
				s.spawn(move || {
					info!("generating the safe primes for the signing proofs, please wait...");
					let started = Instant::now();
					let result = primes::safe_primes_concurrent(&local, safe_prime_bits, 2, concurrency);
					if result.is_ok() {
						debug!(elapsed = ?started.elapsed(), "safe primes generated");
					}
					let _ = tx.send(Generated::SafePrimes(result));
				});
			}
			drop(tx);

			let mut paillier_sk = None;
			let mut safe_primes = None;
			while paillier_sk.is_none() || safe_primes.is_none() {
				match rx.recv_timeout(LOG_PROGRESS_TICK) {
					Ok(Generated::Paillier(result)) => paillier_sk = Some(result),
					Ok(Generated::SafePrimes(result)) => safe_primes = Some(result),
					Err(mpsc::RecvTimeoutError::Timeout) => {
						info!("still generating pre-parameters...");
					}
					Err(mpsc::RecvTimeoutError::Disconnected) => break,
				}
			}
			local.cancel();
			match (paillier_sk, safe_primes) {
				(Some(sk), Some(sgps)) => Ok((sk?, sgps?)),
				_ => Err(PreParamsError::Cancelled),
			}
		})?;

		let p = safe_primes[0].prime().clone();
		let q = safe_primes[1].prime().clone();
		let n_tilde = safe_primes[0].safe_prime() * safe_primes[1].safe_prime();
		let p_mul_q = &p * &q;
		let ring = ModInt::new(&n_tilde);
		let (h1, h2, alpha, beta) = loop {
			let h1 = random_qr_generator(&n_tilde)?;
			let alpha = random_coprime(&n_tilde)?;
			let h2 = ring.exp(&h1, &alpha);
			// coprime to NTilde does not guarantee a unit mod p·q
			match BigInt::mod_inv(&alpha, &p_mul_q) {
				Some(beta) => break (h1, h2, alpha, beta),
				None => continue,
			}
		};

		Ok(PreParams { paillier_sk, n_tilde, h1, h2, alpha, beta, p, q })
	}

	pub fn public(&self) -> PublicPreParams {
		PublicPreParams {
			paillier_pk: self.paillier_sk.public_key.clone(),
			n_tilde: self.n_tilde.clone(),
			h1: self.h1.clone(),
			h2: self.h2.clone(),
		}
	}

	/// The mirror pair of DLN proofs peers expect: h1→h2 under α and h2→h1
	/// under β.
	pub fn dln_proofs(&self) -> (DlnProof, DlnProof) {
		(
			DlnProof::new(&self.h1, &self.h2, &self.alpha, &self.p, &self.q, &self.n_tilde),
			DlnProof::new(&self.h2, &self.h1, &self.beta, &self.p, &self.q, &self.n_tilde),
		)
	}
}

impl PublicPreParams {
	pub const FLAT_PARTS: usize = 4;

	/// Ordered as `[N, NTilde, H1, H2]`.
	pub fn flatten(&self) -> Vec<BigInt> {
		vec![
			self.paillier_pk.n.clone(),
			self.n_tilde.clone(),
			self.h1.clone(),
			self.h2.clone(),
		]
	}

	pub fn unflatten(flat: &[BigInt]) -> Result<PublicPreParams, PreParamsError> {
		if flat.len() != Self::FLAT_PARTS {
			return Err(PreParamsError::WrongLength {
				expected: Self::FLAT_PARTS,
				got: flat.len(),
			});
		}
		Ok(PublicPreParams {
			paillier_pk: PublicKey { n: flat[0].clone() },
			n_tilde: flat[1].clone(),
			h1: flat[2].clone(),
			h2: flat[3].clone(),
		})
	}

	/// Verifies the serialised mirror DLN pair against this party's
	/// parameters. Guards first: distinct generators and exactly
	/// [`PAILLIER_MODULUS_BITS`]-bit moduli, then both proofs in parallel,
	/// failing as soon as either side refuses.
	pub fn verify_dln(&self, dln1: &[BigInt], dln2: &[BigInt]) -> Result<(), DlnVerifyError> {
		if self.h1 == self.h2 {
			return Err(DlnVerifyError::IdenticalGenerators);
		}
		for modulus in [&self.n_tilde, &self.paillier_pk.n] {
			if modulus.bit_length() != PAILLIER_MODULUS_BITS {
				return Err(DlnVerifyError::ModulusBitLength {
					expected: PAILLIER_MODULUS_BITS,
					got: modulus.bit_length(),
				});
			}
		}
		self.verify_dln_unguarded(dln1, dln2)
	}

	pub(crate) fn verify_dln_unguarded(
		&self,
		dln1: &[BigInt],
		dln2: &[BigInt],
	) -> Result<(), DlnVerifyError> {
		thread::scope(|s| {
			let (tx, rx) = mpsc::channel();
			let jobs: [(&[BigInt], &BigInt, &BigInt, u8); 2] =
				[(dln1, &self.h1, &self.h2, 1), (dln2, &self.h2, &self.h1, 2)];
			for (flat, base, value, index) in jobs {
				let tx = tx.clone();
				let n_tilde = &self.n_tilde;
				s.spawn(move || {
					let result = match DlnProof::deserialize(flat) {
						Ok(proof) if proof.verify(base, value, n_tilde) => Ok(()),
						Ok(_) => Err(DlnVerifyError::Rejected(index)),
						Err(err) => Err(DlnVerifyError::Malformed(err)),
					};
					// the channel is unbounded, a late send never blocks
					let _ = tx.send(result);
				});
			}
			drop(tx);
			for result in rx {
				result?;
			}
			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn small() -> PreParams {
		let token = CancellationToken::new();
		PreParams::generate_with_sizes(&token, Some(3), 512, 256).unwrap()
	}

	#[test]
	fn generated_parameters_satisfy_the_invariants() {
		let params = small();
		assert_ne!(params.h1, params.h2);
		assert_eq!(params.n_tilde.bit_length(), 512);
		assert_eq!(params.paillier_sk.public_key.n.bit_length(), 512);
		// NTilde = (2p+1)(2q+1)
		let two = BigInt::from(2);
		let big_p = &two * &params.p + BigInt::one();
		let big_q = &two * &params.q + BigInt::one();
		assert_eq!(&big_p * &big_q, params.n_tilde);
		// h2 = h1^alpha and beta inverts alpha in the exponent group
		assert_eq!(
			BigInt::mod_pow(&params.h1, &params.alpha, &params.n_tilde),
			params.h2
		);
		let p_mul_q = &params.p * &params.q;
		assert_eq!(
			BigInt::mod_mul(&params.alpha, &params.beta, &p_mul_q),
			BigInt::one()
		);
		assert_eq!(
			BigInt::mod_pow(&params.h2, &params.beta, &params.n_tilde),
			params.h1
		);
	}

	#[test]
	fn dln_pair_verifies_after_serialisation() {
		let params = small();
		let (dln1, dln2) = params.dln_proofs();
		let public = params.public();
		assert!(public
			.verify_dln_unguarded(&dln1.serialize(), &dln2.serialize())
			.is_ok());
		// swapped proofs must not verify; either mirror may report first
		let swapped = public.verify_dln_unguarded(&dln2.serialize(), &dln1.serialize());
		assert!(matches!(swapped, Err(DlnVerifyError::Rejected(_))));
	}

	#[test]
	fn verify_dln_short_circuits_on_malformed_input() {
		let params = small();
		let (dln1, _) = params.dln_proofs();
		let public = params.public();
		let result = public.verify_dln_unguarded(&dln1.serialize(), &[BigInt::one()]);
		assert!(matches!(result, Err(DlnVerifyError::Malformed(_))));
	}

	#[test]
	fn guarded_verify_checks_the_modulus_contract() {
		let params = small();
		let (dln1, dln2) = params.dln_proofs();
		let public = params.public();
		// 512-bit test moduli violate the production 2048-bit contract
		assert_eq!(
			public.verify_dln(&dln1.serialize(), &dln2.serialize()),
			Err(DlnVerifyError::ModulusBitLength { expected: PAILLIER_MODULUS_BITS, got: 512 })
		);
		let mut degenerate = public.clone();
		degenerate.h2 = degenerate.h1.clone();
		assert_eq!(
			degenerate.verify_dln(&dln1.serialize(), &dln2.serialize()),
			Err(DlnVerifyError::IdenticalGenerators)
		);
	}

	#[test]
	fn public_view_flattens_and_reparses() {
		let params = small();
		let public = params.public();
		let flat = public.flatten();
		assert_eq!(flat.len(), PublicPreParams::FLAT_PARTS);
		assert_eq!(PublicPreParams::unflatten(&flat).unwrap(), public);
		assert_eq!(
			PublicPreParams::unflatten(&flat[..3]),
			Err(PreParamsError::WrongLength { expected: 4, got: 3 })
		);
	}

	#[test]
	fn pre_params_survive_json() {
		let params = small();
		let encoded = serde_json::to_string(&params).unwrap();
		let decoded: PreParams = serde_json::from_str(&encoded).unwrap();
		assert_eq!(decoded.n_tilde, params.n_tilde);
		assert_eq!(decoded.alpha, params.alpha);
		assert_eq!(decoded.paillier_sk, params.paillier_sk);
		// proofs produced after a round trip still verify
		let (dln1, dln2) = decoded.dln_proofs();
		assert!(decoded
			.public()
			.verify_dln_unguarded(&dln1.serialize(), &dln2.serialize())
			.is_ok());
	}

	#[test]
	fn generation_respects_the_timeout() {
		let result = PreParams::generate(Duration::from_millis(50), Some(2));
		assert!(matches!(result, Err(_)));
	}

	// Production-size run of scenario "generate, serialise, re-verify".
	// Takes minutes without GMP; run explicitly with --ignored.
	#[test]
	#[ignore]
	fn full_size_generation_and_dln_round_trip() {
		let params = PreParams::generate(Duration::from_secs(600), None).unwrap();
		assert_eq!(params.n_tilde.bit_length(), PAILLIER_MODULUS_BITS);
		assert_eq!(params.paillier_sk.public_key.n.bit_length(), PAILLIER_MODULUS_BITS);
		let encoded = serde_json::to_string(&params).unwrap();
		let decoded: PreParams = serde_json::from_str(&encoded).unwrap();
		let (dln1, dln2) = decoded.dln_proofs();
		assert!(decoded
			.public()
			.verify_dln(&dln1.serialize(), &dln2.serialize())
			.is_ok());
	}
}
