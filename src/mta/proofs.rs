//! Bob's MtA response proofs (GG18 Figs. 10 and 11): the ciphertext
//! `c2 = (b ⊙ c1) ⊕ Enc(β′)` was formed from a `b` in `[-q³, q³]` and a
//! `β′ ∈ Z_N`. The "with check" variant additionally binds the curve point
//! `B = b·G` and carries the commitment point `U = α·G`.

use super::MtaError;
use crate::arithmetic::{is_in_interval, random_coprime, random_less_than, ModInt};
use crate::ecpoint::{scalar_base_mult, PointError};
use crate::hashing::challenge;
use crate::paillier::PublicKey;
use curv::arithmetic::traits::*;
use curv::elliptic::curves::{Curve, Point, Scalar};
use curv::BigInt;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const PROOF_BOB_PARTS: usize = 10;
pub const PROOF_BOB_WC_PARTS: usize = 12;

/// First-move state of the interactive proof; scrubbed on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
struct BobRound1 {
	alpha: BigInt,
	beta: BigInt,
	gamma: BigInt,
	rho: BigInt,
	rho_prm: BigInt,
	sigma: BigInt,
	tau: BigInt,
	z: BigInt,
	z_prm: BigInt,
	t: BigInt,
	v: BigInt,
	w: BigInt,
}

impl BobRound1 {
	/// `x` is Bob's multiplicative share `b`, `y` the additive mask `β′`,
	/// `c1` Alice's ciphertext.
	fn sample<E: Curve>(
		pk: &PublicKey,
		n_tilde: &BigInt,
		h1: &BigInt,
		h2: &BigInt,
		c1: &BigInt,
		x: &BigInt,
		y: &BigInt,
	) -> Result<Self, MtaError> {
		let q = Scalar::<E>::group_order();
		let q3 = q.pow(3);
		let q7 = q.pow(7);
		let q_n_tilde = q * n_tilde;
		let q3_n_tilde = &q3 * n_tilde;

		let alpha = random_less_than(&q3)?;
		let rho = random_less_than(&q_n_tilde)?;
		let sigma = random_less_than(&q_n_tilde)?;
		let tau = random_less_than(&q3_n_tilde)?;
		let rho_prm = random_less_than(&q3_n_tilde)?;
		let beta = random_coprime(&pk.n)?;
		let gamma = random_less_than(&q7)?;

		let pedersen = ModInt::new(n_tilde);
		let z = pedersen.mul(&pedersen.exp(h1, x), &pedersen.exp(h2, &rho));
		let z_prm = pedersen.mul(&pedersen.exp(h1, &alpha), &pedersen.exp(h2, &rho_prm));
		let t = pedersen.mul(&pedersen.exp(h1, y), &pedersen.exp(h2, &sigma));
		let w = pedersen.mul(&pedersen.exp(h1, &gamma), &pedersen.exp(h2, &tau));

		let nn = pk.n_square();
		let ciphertexts = ModInt::new(&nn);
		let v = ciphertexts.mul(
			&ciphertexts.mul(&ciphertexts.exp(c1, &alpha), &ciphertexts.exp(&pk.gamma(), &gamma)),
			&ciphertexts.exp(&beta, &pk.n),
		);

		Ok(BobRound1 { alpha, beta, gamma, rho, rho_prm, sigma, tau, z, z_prm, t, v, w })
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProofBob {
	pub z: BigInt,
	pub z_prm: BigInt,
	pub t: BigInt,
	pub v: BigInt,
	pub w: BigInt,
	pub s: BigInt,
	pub s1: BigInt,
	pub s2: BigInt,
	pub t1: BigInt,
	pub t2: BigInt,
}

/// ProofBob plus the commitment point for the discrete-log binding.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = ""))]
pub struct ProofBobWC<E: Curve> {
	pub proof: ProofBob,
	pub u: Point<E>,
}

impl<E: Curve> PartialEq for ProofBobWC<E> {
	fn eq(&self, other: &Self) -> bool {
		self.proof == other.proof && self.u == other.u
	}
}

#[allow(clippy::too_many_arguments)]
fn prove_inner<E: Curve>(
	pk: &PublicKey,
	n_tilde: &BigInt,
	h1: &BigInt,
	h2: &BigInt,
	c1: &BigInt,
	c2: &BigInt,
	x: &BigInt,
	y: &BigInt,
	r: &BigInt,
	x_pub: Option<&Point<E>>,
) -> Result<(ProofBob, Option<Point<E>>), MtaError> {
	let q = Scalar::<E>::group_order();
	let round1 = BobRound1::sample::<E>(pk, n_tilde, h1, h2, c1, x, y)?;
	let u = x_pub.map(|_| scalar_base_mult::<E>(&round1.alpha));

	let gamma_pk = pk.gamma();
	let e = match (x_pub, &u) {
		(Some(x_point), Some(u_point)) => {
			let xx = x_point.x_coord().ok_or(PointError::NoCoords)?;
			let xy = x_point.y_coord().ok_or(PointError::NoCoords)?;
			let ux = u_point.x_coord().ok_or(PointError::NoCoords)?;
			let uy = u_point.y_coord().ok_or(PointError::NoCoords)?;
			challenge(
				q,
				&[
					&pk.n, &gamma_pk, &xx, &xy, c1, c2, &ux, &uy, &round1.z, &round1.z_prm,
					&round1.t, &round1.v, &round1.w,
				],
			)
		}
		_ => challenge(
			q,
			&[&pk.n, &gamma_pk, c1, c2, &round1.z, &round1.z_prm, &round1.t, &round1.v, &round1.w],
		),
	};

	let plain = ModInt::new(&pk.n);
	let s = plain.mul(&plain.exp(r, &e), &round1.beta);
	let s1 = &(&e * x) + &round1.alpha;
	let s2 = &(&e * &round1.rho) + &round1.rho_prm;
	let t1 = &(&e * y) + &round1.gamma;
	let t2 = &(&e * &round1.sigma) + &round1.tau;

	let proof = ProofBob {
		z: round1.z.clone(),
		z_prm: round1.z_prm.clone(),
		t: round1.t.clone(),
		v: round1.v.clone(),
		w: round1.w.clone(),
		s,
		s1,
		s2,
		t1,
		t2,
	};
	Ok((proof, u))
}

impl ProofBob {
	/// Proves `c2 = (x ⊙ c1) ⊕ Enc_pk(y; r)` without the curve binding
	/// (GG18 Fig. 11).
	#[allow(clippy::too_many_arguments)]
	pub fn prove<E: Curve>(
		pk: &PublicKey,
		n_tilde: &BigInt,
		h1: &BigInt,
		h2: &BigInt,
		c1: &BigInt,
		c2: &BigInt,
		x: &BigInt,
		y: &BigInt,
		r: &BigInt,
	) -> Result<ProofBob, MtaError> {
		prove_inner::<E>(pk, n_tilde, h1, h2, c1, c2, x, y, r, None).map(|(proof, _)| proof)
	}

	#[allow(clippy::too_many_arguments)]
	pub fn verify<E: Curve>(
		&self,
		pk: &PublicKey,
		n_tilde: &BigInt,
		h1: &BigInt,
		h2: &BigInt,
		c1: &BigInt,
		c2: &BigInt,
	) -> bool {
		self.verify_inner::<E>(pk, n_tilde, h1, h2, c1, c2, None).is_some()
	}

	/// Shared verification core. Returns the recomputed challenge on
	/// success so the WC wrapper can run its curve check with it.
	#[allow(clippy::too_many_arguments)]
	fn verify_inner<E: Curve>(
		&self,
		pk: &PublicKey,
		n_tilde: &BigInt,
		h1: &BigInt,
		h2: &BigInt,
		c1: &BigInt,
		c2: &BigInt,
		points: Option<(&Point<E>, &Point<E>)>,
	) -> Option<BigInt> {
		let q = Scalar::<E>::group_order();
		let q3 = q.pow(3);
		let nn = pk.n_square();

		for response in [&self.s1, &self.s2, &self.t1, &self.t2] {
			if BigInt::is_negative(response) {
				return None;
			}
		}
		if !is_in_interval(&self.z, n_tilde)
			|| !is_in_interval(&self.z_prm, n_tilde)
			|| !is_in_interval(&self.t, n_tilde)
			|| !is_in_interval(&self.w, n_tilde)
			|| !is_in_interval(&self.v, &nn)
			|| !is_in_interval(&self.s, &pk.n)
		{
			return None;
		}
		let one = BigInt::one();
		if self.z.gcd(n_tilde) != one
			|| self.z_prm.gcd(n_tilde) != one
			|| self.t.gcd(n_tilde) != one
			|| self.w.gcd(n_tilde) != one
			|| self.v.gcd(&nn) != one
			|| self.s.gcd(&pk.n) != one
		{
			return None;
		}
		if self.s1 > q3 {
			return None;
		}

		let gamma_pk = pk.gamma();
		let e = match points {
			Some((x_point, u_point)) => {
				let xx = x_point.x_coord()?;
				let xy = x_point.y_coord()?;
				let ux = u_point.x_coord()?;
				let uy = u_point.y_coord()?;
				challenge(
					q,
					&[
						&pk.n, &gamma_pk, &xx, &xy, c1, c2, &ux, &uy, &self.z, &self.z_prm,
						&self.t, &self.v, &self.w,
					],
				)
			}
			None => challenge(
				q,
				&[&pk.n, &gamma_pk, c1, c2, &self.z, &self.z_prm, &self.t, &self.v, &self.w],
			),
		};

		// h1^s1 · h2^s2 == z′ · z^e mod NTilde
		let pedersen = ModInt::new(n_tilde);
		let lhs = pedersen.mul(&pedersen.exp(h1, &self.s1), &pedersen.exp(h2, &self.s2));
		let rhs = pedersen.mul(&self.z_prm, &pedersen.exp(&self.z, &e));
		if lhs != rhs {
			return None;
		}

		// h1^t1 · h2^t2 == w · t^e mod NTilde
		let lhs = pedersen.mul(&pedersen.exp(h1, &self.t1), &pedersen.exp(h2, &self.t2));
		let rhs = pedersen.mul(&self.w, &pedersen.exp(&self.t, &e));
		if lhs != rhs {
			return None;
		}

		// c1^s1 · Γ^t1 · s^N == v · c2^e mod N²
		let ciphertexts = ModInt::new(&nn);
		let lhs = ciphertexts.mul(
			&ciphertexts.mul(&ciphertexts.exp(c1, &self.s1), &ciphertexts.exp(&gamma_pk, &self.t1)),
			&ciphertexts.exp(&self.s, &pk.n),
		);
		let rhs = ciphertexts.mul(&self.v, &ciphertexts.exp(c2, &e));
		if lhs != rhs {
			return None;
		}

		Some(e)
	}

	/// Fixed wire order `[Z, Z′, T, V, W, S, S1, S2, T1, T2]`.
	pub fn flatten(&self) -> Vec<BigInt> {
		vec![
			self.z.clone(),
			self.z_prm.clone(),
			self.t.clone(),
			self.v.clone(),
			self.w.clone(),
			self.s.clone(),
			self.s1.clone(),
			self.s2.clone(),
			self.t1.clone(),
			self.t2.clone(),
		]
	}

	pub fn unflatten(flat: &[BigInt]) -> Result<ProofBob, MtaError> {
		if flat.len() != PROOF_BOB_PARTS {
			return Err(MtaError::WrongLength { expected: PROOF_BOB_PARTS, got: flat.len() });
		}
		Ok(ProofBob {
			z: flat[0].clone(),
			z_prm: flat[1].clone(),
			t: flat[2].clone(),
			v: flat[3].clone(),
			w: flat[4].clone(),
			s: flat[5].clone(),
			s1: flat[6].clone(),
			s2: flat[7].clone(),
			t1: flat[8].clone(),
			t2: flat[9].clone(),
		})
	}
}

impl<E: Curve> ProofBobWC<E> {
	/// Proof with the additional binding `B = x·G` (GG18 Fig. 10).
	#[allow(clippy::too_many_arguments)]
	pub fn prove(
		pk: &PublicKey,
		n_tilde: &BigInt,
		h1: &BigInt,
		h2: &BigInt,
		c1: &BigInt,
		c2: &BigInt,
		x: &BigInt,
		y: &BigInt,
		r: &BigInt,
		x_pub: &Point<E>,
	) -> Result<ProofBobWC<E>, MtaError> {
		let (proof, u) = prove_inner::<E>(pk, n_tilde, h1, h2, c1, c2, x, y, r, Some(x_pub))?;
		let u = u.ok_or(PointError::NoCoords)?;
		Ok(ProofBobWC { proof, u })
	}

	#[allow(clippy::too_many_arguments)]
	pub fn verify(
		&self,
		pk: &PublicKey,
		n_tilde: &BigInt,
		h1: &BigInt,
		h2: &BigInt,
		c1: &BigInt,
		c2: &BigInt,
		x_pub: &Point<E>,
	) -> bool {
		let e = match self.proof.verify_inner::<E>(
			pk,
			n_tilde,
			h1,
			h2,
			c1,
			c2,
			Some((x_pub, &self.u)),
		) {
			Some(e) => e,
			None => return false,
		};
		// s1·G == U + e·X on the curve
		let lhs = scalar_base_mult::<E>(&self.proof.s1);
		let rhs = &self.u + &(x_pub * &Scalar::<E>::from_bigint(&e));
		lhs == rhs
	}

	/// ProofBob's scalars followed by U's affine coordinates.
	pub fn flatten(&self) -> Result<Vec<BigInt>, MtaError> {
		let mut flat = self.proof.flatten();
		flat.push(self.u.x_coord().ok_or(PointError::NoCoords)?);
		flat.push(self.u.y_coord().ok_or(PointError::NoCoords)?);
		Ok(flat)
	}

	pub fn unflatten(flat: &[BigInt]) -> Result<ProofBobWC<E>, MtaError> {
		if flat.len() != PROOF_BOB_WC_PARTS {
			return Err(MtaError::WrongLength { expected: PROOF_BOB_WC_PARTS, got: flat.len() });
		}
		let proof = ProofBob::unflatten(&flat[..PROOF_BOB_PARTS])?;
		let u = Point::from_coords(&flat[10], &flat[11]).map_err(|_| PointError::NotOnCurve)?;
		Ok(ProofBobWC { proof, u })
	}
}
