//! Zero-knowledge proof primitives for GG18/GG20-style threshold-ECDSA
//! share conversion.
//!
//! Two mutually distrustful parties run the MtA protocol in [`mta`]: Alice
//! holds `a`, Bob holds `b`, and they end up with additive shares
//! `α + β ≡ a·b (mod q)` without revealing their inputs. The proofs that
//! keep each other honest sit on top of:
//!
//! * [`paillier`] — additively homomorphic encryption with safe modulus
//!   generation,
//! * [`preparams`] — the ring-Pedersen auxiliary parameters
//!   `(NTilde, h1, h2)` derived from two Germain safe primes, together with
//!   the [`dlnproof`] pair showing `h1` and `h2` generate the same subgroup,
//! * [`facproof`] — a no-small-factor attestation for a Paillier modulus,
//! * [`mta::range_proof`] and [`mta::proofs`] — the range proofs exchanged
//!   during the conversion itself.
//!
//! Proofs serialise to ordered scalar tuples (`flatten`/`unflatten`) so they
//! can traverse a network; message routing and session management belong to
//! the caller.

pub mod arithmetic;
pub mod cancel;
pub mod dlnproof;
pub mod ecpoint;
pub mod facproof;
pub mod hashing;
pub mod mta;
pub mod paillier;
pub mod preparams;
pub mod primes;

pub use cancel::CancellationToken;
pub use dlnproof::DlnProof;
pub use facproof::ProofFac;
pub use mta::{ProofBob, ProofBobWC, RangeProofAlice};
pub use preparams::{PreParams, PublicPreParams};
