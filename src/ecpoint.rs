//! Curve-point helpers: base-point multiplication from raw scalars,
//! flattening point sequences to scalar lists for the wire, and Edwards
//! cofactor clearing.
//!
//! Points are `curv::elliptic::curves::Point<E>`; the curve is a type
//! parameter, so an unknown curve is a compile-time error and an off-curve
//! pair can only be rejected at construction, never carried around.

use curv::elliptic::curves::ed25519::Ed25519;
use curv::elliptic::curves::{Curve, Point, Scalar};
use curv::BigInt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PointError {
	#[error("the given coordinates are not on the elliptic curve")]
	NotOnCurve,
	#[error("flat point sequence length must be divisible by 2, got {0}")]
	OddLength(usize),
	#[error("point has no affine coordinates")]
	NoCoords,
}

lazy_static::lazy_static! {
	static ref EIGHT: Scalar<Ed25519> = Scalar::from_bigint(&BigInt::from(8));
	static ref EIGHT_INV: Scalar<Ed25519> =
		EIGHT.invert().expect("8 is a unit modulo the Ed25519 group order");
}

/// `(k mod q)·G` for the curve's base point G.
pub fn scalar_base_mult<E: Curve>(k: &BigInt) -> Point<E> {
	Point::generator() * &Scalar::from_bigint(k)
}

/// Affine coordinates of each point, in order, as a flat scalar list.
pub fn flatten_points<E: Curve>(points: &[Point<E>]) -> Result<Vec<BigInt>, PointError> {
	let mut flat = Vec::with_capacity(points.len() * 2);
	for point in points {
		flat.push(point.x_coord().ok_or(PointError::NoCoords)?);
		flat.push(point.y_coord().ok_or(PointError::NoCoords)?);
	}
	Ok(flat)
}

/// Inverse of [`flatten_points`]. Every coordinate pair is validated against
/// the curve equation; the input length must be divisible by 2.
pub fn unflatten_points<E: Curve>(flat: &[BigInt]) -> Result<Vec<Point<E>>, PointError> {
	if flat.len() % 2 != 0 {
		return Err(PointError::OddLength(flat.len()));
	}
	flat.chunks(2)
		.map(|pair| Point::from_coords(&pair[0], &pair[1]).map_err(|_| PointError::NotOnCurve))
		.collect()
}

/// Multiplies by 8 and then by 8⁻¹ mod the group order, mapping an Ed25519
/// point into the prime-order subgroup.
pub fn eight_inv_eight(point: &Point<Ed25519>) -> Point<Ed25519> {
	let cleared = point * &*EIGHT;
	&cleared * &*EIGHT_INV
}
