//! Cooperative cancellation for long-running generation work.
//!
//! A token carries an optional deadline and a flag that can be raised by the
//! owner. Workers poll [`CancellationToken::is_cancelled`] between primality
//! rounds; nothing is interrupted mid-round. Child tokens observe their
//! parent, so a supervisor can stop its own workers without cancelling the
//! caller's budget.

use std::sync::{
	atomic::{AtomicBool, Ordering},
	Arc,
};
use std::time::{Duration, Instant};

#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
	inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
	cancelled: AtomicBool,
	deadline: Option<Instant>,
	parent: Option<Arc<Inner>>,
}

impl Inner {
	fn is_cancelled(&self) -> bool {
		if self.cancelled.load(Ordering::Relaxed) {
			return true;
		}
		if let Some(deadline) = self.deadline {
			if Instant::now() >= deadline {
				return true;
			}
		}
		match &self.parent {
			Some(parent) => parent.is_cancelled(),
			None => false,
		}
	}
}

impl CancellationToken {
	/// A token that never expires on its own.
	pub fn new() -> Self {
		Self::default()
	}

	/// A token that reports cancellation once `timeout` has elapsed.
	pub fn with_timeout(timeout: Duration) -> Self {
		CancellationToken {
			inner: Arc::new(Inner {
				cancelled: AtomicBool::new(false),
				deadline: Some(Instant::now() + timeout),
				parent: None,
			}),
		}
	}

	/// A token that is cancelled whenever `self` is, but can also be
	/// cancelled on its own without affecting `self`.
	pub fn child(&self) -> Self {
		CancellationToken {
			inner: Arc::new(Inner {
				cancelled: AtomicBool::new(false),
				deadline: None,
				parent: Some(self.inner.clone()),
			}),
		}
	}

	pub fn cancel(&self) {
		self.inner.cancelled.store(true, Ordering::Relaxed);
	}

	pub fn is_cancelled(&self) -> bool {
		self.inner.is_cancelled()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cancel_is_sticky() {
		let token = CancellationToken::new();
		assert!(!token.is_cancelled());
		token.cancel();
		assert!(token.is_cancelled());
	}

	#[test]
	fn deadline_expires() {
		let token = CancellationToken::with_timeout(Duration::from_millis(0));
		assert!(token.is_cancelled());
	}

	#[test]
	fn child_observes_parent_but_not_vice_versa() {
		let parent = CancellationToken::new();
		let child = parent.child();
		child.cancel();
		assert!(child.is_cancelled());
		assert!(!parent.is_cancelled());

		let parent = CancellationToken::new();
		let child = parent.child();
		parent.cancel();
		assert!(child.is_cancelled());
	}
}
