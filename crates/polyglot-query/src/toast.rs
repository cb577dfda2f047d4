//! Transient user notifications raised by mutations

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Kind of notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
	/// The operation succeeded
	Success,
	/// The operation failed
	Error,
}

/// A transient notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
	/// Success or failure
	pub kind: ToastKind,
	/// Text shown to the user
	pub message: String,
}

impl Toast {
	/// Success notification
	pub fn success(message: impl Into<String>) -> Self {
		Self {
			kind: ToastKind::Success,
			message: message.into(),
		}
	}

	/// Failure notification
	pub fn error(message: impl Into<String>) -> Self {
		Self {
			kind: ToastKind::Error,
			message: message.into(),
		}
	}
}

/// Sink for notifications; the UI decides how to render them
pub trait Toaster: Send + Sync {
	/// Display `toast`
	fn show(&self, toast: Toast);
}

/// Queue the UI drains on its own schedule
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
	pending: Arc<Mutex<VecDeque<Toast>>>,
}

impl ToastQueue {
	/// Empty queue
	pub fn new() -> Self {
		Self::default()
	}

	/// Take every pending toast, oldest first
	pub fn drain(&self) -> Vec<Toast> {
		self.pending.lock().drain(..).collect()
	}

	/// Number of pending toasts
	pub fn len(&self) -> usize {
		self.pending.lock().len()
	}

	/// Whether nothing is pending
	pub fn is_empty(&self) -> bool {
		self.pending.lock().is_empty()
	}
}

impl Toaster for ToastQueue {
	fn show(&self, toast: Toast) {
		self.pending.lock().push_back(toast);
	}
}

/// Writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingToaster;

impl Toaster for TracingToaster {
	fn show(&self, toast: Toast) {
		match toast.kind {
			ToastKind::Success => tracing::info!(message = %toast.message, "Toast"),
			ToastKind::Error => tracing::warn!(message = %toast.message, "Toast"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_queue_drains_in_order() {
		let queue = ToastQueue::new();
		let toaster: &dyn Toaster = &queue;
		toaster.show(Toast::success("Saved"));
		toaster.show(Toast::error("Failed"));

		assert_eq!(queue.len(), 2);
		assert_eq!(
			queue.drain(),
			vec![Toast::success("Saved"), Toast::error("Failed")]
		);
		assert!(queue.is_empty());
	}

	#[rstest]
	fn test_clones_share_the_queue() {
		let queue = ToastQueue::new();
		queue.clone().show(Toast::success("x"));
		assert_eq!(queue.len(), 1);
	}
}
