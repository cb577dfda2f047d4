//! Session lifecycle notifications

/// Broadcast whenever the session changes.
///
/// Subscribe with [`ApiClient::session_events`](crate::ApiClient::session_events).
/// A screen typically listens for [`Expired`](SessionEvent::Expired) and
/// navigates to the sign-in page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
	/// A sign-in succeeded
	SignedIn {
		/// Display name of the signed-in user
		user_name: String,
	},
	/// The user signed out
	SignedOut,
	/// The server rejected the token; storage has been cleared
	Expired,
}
