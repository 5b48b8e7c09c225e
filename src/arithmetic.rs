//! Sampling and modular-arithmetic helpers shared by every proof module.
//!
//! All outputs of [`ModInt`] are canonicalised to `[0, N)`. Sampling
//! functions check their preconditions before drawing any entropy; entropy
//! exhaustion itself is fatal inside the bignum backend and is not reported
//! as a recoverable error.

use curv::arithmetic::traits::*;
use curv::BigInt;
use thiserror::Error;

/// Largest bit count a single uniform draw may request.
pub const MAX_RANDOM_BITS: usize = 5000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SamplingError {
	#[error("bit count must be in 1..=5000, got {0}")]
	InvalidBitLength(usize),
	#[error("sampling bound must be positive")]
	NonPositiveBound,
}

/// Uniform draw from `[0, 2^bits)`.
pub fn random_bits(bits: usize) -> Result<BigInt, SamplingError> {
	if bits == 0 || bits > MAX_RANDOM_BITS {
		return Err(SamplingError::InvalidBitLength(bits));
	}
	Ok(BigInt::sample(bits))
}

/// Rejection-samples `random_bits(bitlen(m))` until the draw lands in `[0, m)`.
pub fn random_less_than(m: &BigInt) -> Result<BigInt, SamplingError> {
	if m <= &BigInt::zero() {
		return Err(SamplingError::NonPositiveBound);
	}
	let bits = m.bit_length();
	loop {
		let draw = random_bits(bits)?;
		if draw < *m {
			return Ok(draw);
		}
	}
}

/// Uniform element of the multiplicative group `Z*_m`, i.e. a draw in
/// `[1, m)` coprime to `m`.
pub fn random_coprime(m: &BigInt) -> Result<BigInt, SamplingError> {
	if m <= &BigInt::zero() {
		return Err(SamplingError::NonPositiveBound);
	}
	let one = BigInt::one();
	loop {
		let draw = random_bits(m.bit_length())?;
		if draw >= one && draw < *m && draw.gcd(m) == one {
			return Ok(draw);
		}
	}
}

/// Returns `f² mod n` for a random unit `f`. When `n` is the product of two
/// safe primes this generates the quadratic-residue subgroup with
/// overwhelming probability.
pub fn random_qr_generator(n: &BigInt) -> Result<BigInt, SamplingError> {
	let f = random_coprime(n)?;
	Ok(BigInt::mod_mul(&f, &f, n))
}

/// `0 <= x < bound`.
pub fn is_in_interval(x: &BigInt, bound: &BigInt) -> bool {
	!BigInt::is_negative(x) && x < bound
}

/// Big-endian magnitude of each scalar, for `[][]byte`-shaped transports.
/// Signs are not carried; callers only ship canonical non-negative scalars.
pub fn bigints_to_bytes(ints: &[BigInt]) -> Vec<Vec<u8>> {
	ints.iter().map(|i| i.to_bytes()).collect()
}

pub fn multi_bytes_to_bigints(bzs: &[Vec<u8>]) -> Vec<BigInt> {
	bzs.iter().map(|bz| BigInt::from_bytes(bz)).collect()
}

/// Ring of integers modulo a borrowed `N`.
pub struct ModInt<'m> {
	modulus: &'m BigInt,
}

impl<'m> ModInt<'m> {
	pub fn new(modulus: &'m BigInt) -> Self {
		ModInt { modulus }
	}

	pub fn add(&self, a: &BigInt, b: &BigInt) -> BigInt {
		BigInt::mod_add(a, b, self.modulus)
	}

	pub fn sub(&self, a: &BigInt, b: &BigInt) -> BigInt {
		BigInt::mod_sub(a, b, self.modulus)
	}

	pub fn mul(&self, a: &BigInt, b: &BigInt) -> BigInt {
		BigInt::mod_mul(a, b, self.modulus)
	}

	/// `base^exponent mod N` for a non-negative exponent.
	pub fn exp(&self, base: &BigInt, exponent: &BigInt) -> BigInt {
		BigInt::mod_pow(base, exponent, self.modulus)
	}

	/// `base^exponent mod N`, inverting the base first when the exponent is
	/// negative. `None` when the required inverse does not exist; verifiers
	/// treat that as a refused proof.
	pub fn exp_signed(&self, base: &BigInt, exponent: &BigInt) -> Option<BigInt> {
		if BigInt::is_negative(exponent) {
			let inv = BigInt::mod_inv(base, self.modulus)?;
			Some(BigInt::mod_pow(&inv, &exponent.abs(), self.modulus))
		} else {
			Some(BigInt::mod_pow(base, exponent, self.modulus))
		}
	}

	/// `None` when `gcd(a, N) != 1`.
	pub fn inverse(&self, a: &BigInt) -> Option<BigInt> {
		BigInt::mod_inv(a, self.modulus)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn random_bits_rejects_bad_bit_counts() {
		assert_eq!(random_bits(0), Err(SamplingError::InvalidBitLength(0)));
		assert_eq!(
			random_bits(MAX_RANDOM_BITS + 1),
			Err(SamplingError::InvalidBitLength(MAX_RANDOM_BITS + 1))
		);
		assert!(random_bits(MAX_RANDOM_BITS).is_ok());
	}

	#[test]
	fn random_less_than_rejects_non_positive_bounds() {
		assert_eq!(
			random_less_than(&BigInt::zero()),
			Err(SamplingError::NonPositiveBound)
		);
		assert_eq!(
			random_less_than(&BigInt::from(-5)),
			Err(SamplingError::NonPositiveBound)
		);
	}

	#[test]
	fn random_less_than_stays_in_interval() {
		let bound = BigInt::from(97);
		for _ in 0..200 {
			let draw = random_less_than(&bound).unwrap();
			assert!(is_in_interval(&draw, &bound));
		}
	}

	#[test]
	fn random_coprime_is_a_unit() {
		let m = BigInt::from(3 * 5 * 7 * 11);
		for _ in 0..100 {
			let draw = random_coprime(&m).unwrap();
			assert!(draw >= BigInt::one() && draw < m);
			assert_eq!(draw.gcd(&m), BigInt::one());
		}
	}

	#[test]
	fn qr_generator_is_a_square_residue() {
		let n = BigInt::from(7 * 11);
		let g = random_qr_generator(&n).unwrap();
		assert!(is_in_interval(&g, &n));
	}

	#[test]
	fn mod_int_canonicalises() {
		let n = BigInt::from(17);
		let ring = ModInt::new(&n);
		assert_eq!(ring.sub(&BigInt::from(3), &BigInt::from(5)), BigInt::from(15));
		assert_eq!(ring.add(&BigInt::from(16), &BigInt::from(2)), BigInt::from(1));
		assert_eq!(ring.mul(&BigInt::from(4), &BigInt::from(5)), BigInt::from(3));
	}

	#[test]
	fn exp_signed_inverts_for_negative_exponents() {
		let n = BigInt::from(17);
		let ring = ModInt::new(&n);
		let x = BigInt::from(3);
		let e = BigInt::from(-4);
		let direct = ring.exp(&x, &BigInt::from(4));
		let inverted = ring.exp_signed(&x, &e).unwrap();
		assert_eq!(ring.mul(&direct, &inverted), BigInt::one());
		// 17 | 34, no inverse
		assert_eq!(ring.exp_signed(&BigInt::from(34), &e), None);
	}

	#[test]
	fn inverse_requires_coprimality() {
		let n = BigInt::from(15);
		let ring = ModInt::new(&n);
		assert_eq!(ring.inverse(&BigInt::from(5)), None);
		let inv = ring.inverse(&BigInt::from(7)).unwrap();
		assert_eq!(ring.mul(&BigInt::from(7), &inv), BigInt::one());
	}

	#[test]
	fn byte_helpers_round_trip() {
		let ints = vec![BigInt::from(0), BigInt::from(1), BigInt::sample(256)];
		let bytes = bigints_to_bytes(&ints);
		assert_eq!(multi_bytes_to_bigints(&bytes), ints);
	}
}
