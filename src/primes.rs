//! Concurrent search for Germain safe primes.
//!
//! A Germain prime `p` is one where `2p+1` is also prime; `2p+1` is the safe
//! prime. Workers rejection-sample candidates (top two bits forced so the
//! product of two safe primes has exactly double the bit length), sieve both
//! `p` and `2p+1` against small primes, then run Miller-Rabin with
//! [`PRIMALITY_ROUNDS`] rounds. The supervisor collects the requested number
//! of primes, cancels the remaining workers through a child token and joins
//! them before returning.

use crate::cancel::CancellationToken;
use curv::arithmetic::traits::*;
use curv::BigInt;
use serde::{Deserialize, Serialize};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Miller-Rabin round count used for every primality decision in this crate.
pub const PRIMALITY_ROUNDS: u32 = 30;

const SUPERVISOR_POLL: Duration = Duration::from_millis(250);

pub(crate) const SMALL_PRIMES: [u64; 53] = [
	3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
	101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
	197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrimeError {
	#[error("safe prime generation was cancelled or timed out")]
	Cancelled,
	#[error("safe prime bit length must be at least 16, got {0}")]
	BitLengthTooSmall(usize),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GermainSafePrime {
	prime: BigInt,
	safe_prime: BigInt,
}

impl GermainSafePrime {
	/// The Germain prime `p`.
	pub fn prime(&self) -> &BigInt {
		&self.prime
	}

	/// The safe prime `2p+1`.
	pub fn safe_prime(&self) -> &BigInt {
		&self.safe_prime
	}

	pub fn validate(&self) -> bool {
		self.safe_prime == BigInt::from(2) * &self.prime + BigInt::one()
			&& self.prime.is_probable_prime(PRIMALITY_ROUNDS)
			&& self.safe_prime.is_probable_prime(PRIMALITY_ROUNDS)
	}
}

/// Trial division by [`SMALL_PRIMES`]; assumes `x` is larger than all of them.
pub(crate) fn small_factor_free(x: &BigInt) -> bool {
	let zero = BigInt::zero();
	for &small in SMALL_PRIMES.iter() {
		if x.mod_floor(&BigInt::from(small)) == zero {
			return false;
		}
	}
	true
}

/// Odd candidate of `bits` bits with the two top bits set.
pub(crate) fn random_odd_candidate(bits: usize) -> BigInt {
	let two = BigInt::from(2);
	let mut candidate = BigInt::pow(&two, (bits - 1) as u32)
		+ BigInt::pow(&two, (bits - 2) as u32)
		+ BigInt::sample(bits - 2);
	if !candidate.test_bit(0) {
		candidate = candidate + BigInt::one();
	}
	candidate
}

fn germain_candidate(safe_prime_bits: usize) -> BigInt {
	random_odd_candidate(safe_prime_bits - 1)
}

fn search_worker(token: &CancellationToken, safe_prime_bits: usize, found: &mpsc::Sender<GermainSafePrime>) {
	while !token.is_cancelled() {
		let prime = germain_candidate(safe_prime_bits);
		if !small_sieve_passes(&prime) {
			continue;
		}
		if !prime.is_probable_prime(PRIMALITY_ROUNDS) {
			continue;
		}
		let safe_prime = BigInt::from(2) * &prime + BigInt::one();
		if !safe_prime.is_probable_prime(PRIMALITY_ROUNDS) {
			continue;
		}
		if found.send(GermainSafePrime { prime, safe_prime }).is_err() {
			return;
		}
	}
}

// Sieves p and 2p+1 together: 2p+1 ≡ 0 (mod l) iff 2·(p mod l)+1 ≡ 0.
fn small_sieve_passes(p: &BigInt) -> bool {
	let zero = BigInt::zero();
	for &small in SMALL_PRIMES.iter() {
		let small = BigInt::from(small);
		let r = p.mod_floor(&small);
		if r == zero {
			return false;
		}
		if (BigInt::from(2) * &r + BigInt::one()).mod_floor(&small) == zero {
			return false;
		}
	}
	true
}

/// Collects `count` independent Germain safe primes whose safe primes have
/// exactly `safe_prime_bits` bits, using `concurrency` parallel workers.
pub fn safe_primes_concurrent(
	token: &CancellationToken,
	safe_prime_bits: usize,
	count: usize,
	concurrency: usize,
) -> Result<Vec<GermainSafePrime>, PrimeError> {
	// candidates must clear the small-prime sieve bound
	if safe_prime_bits < 16 {
		return Err(PrimeError::BitLengthTooSmall(safe_prime_bits));
	}
	let workers = concurrency.max(1);
	let local = token.child();
	thread::scope(|s| {
		let (tx, rx) = mpsc::channel();
		for _ in 0..workers {
			let tx = tx.clone();
			let local = local.clone();
			s.spawn(move || search_worker(&local, safe_prime_bits, &tx));
		}
		drop(tx);

		let mut out: Vec<GermainSafePrime> = Vec::with_capacity(count);
		while out.len() < count {
			match rx.recv_timeout(SUPERVISOR_POLL) {
				Ok(sp) => {
					if sp.safe_prime.bit_length() == safe_prime_bits && sp.validate() {
						out.push(sp);
					}
				}
				Err(mpsc::RecvTimeoutError::Timeout) => {
					if local.is_cancelled() {
						break;
					}
				}
				Err(mpsc::RecvTimeoutError::Disconnected) => break,
			}
		}
		local.cancel();
		if out.len() == count {
			Ok(out)
		} else {
			Err(PrimeError::Cancelled)
		}
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn finds_valid_germain_pairs() {
		let token = CancellationToken::new();
		let primes = safe_primes_concurrent(&token, 64, 2, 2).unwrap();
		assert_eq!(primes.len(), 2);
		for sp in &primes {
			assert!(sp.validate());
			assert_eq!(sp.safe_prime().bit_length(), 64);
			assert_eq!(sp.prime().bit_length(), 63);
		}
	}

	#[test]
	fn rejects_tiny_bit_lengths() {
		let token = CancellationToken::new();
		assert_eq!(
			safe_primes_concurrent(&token, 4, 2, 1),
			Err(PrimeError::BitLengthTooSmall(4))
		);
	}

	#[test]
	fn cancelled_token_aborts_the_search() {
		let token = CancellationToken::new();
		token.cancel();
		assert_eq!(
			safe_primes_concurrent(&token, 1024, 2, 2),
			Err(PrimeError::Cancelled)
		);
	}

	#[test]
	fn sieve_agrees_with_trial_division() {
		// 1019 is a Germain prime (2039 is prime), both above the sieve bound
		assert!(small_sieve_passes(&BigInt::from(1019)));
		// 1023 = 3·341
		assert!(!small_sieve_passes(&BigInt::from(1023)));
		// 9409 = 97² has no small factor, but 2·9409+1 is divisible by 3
		assert!(!small_sieve_passes(&BigInt::from(9409)));
	}
}
