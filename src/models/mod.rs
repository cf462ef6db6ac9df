mod error;

pub use self::error::*;

use serde::Serialize;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// An account as seen by this service. Accounts are owned by the upstream
/// identity system; only the email field is ever written here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub id: Uuid,
	pub username: String,
	pub email: String,
	pub site: Option<String>,
}

/// A pending email address change request. Immutable once created, except
/// for deletion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequest {
	pub id: Uuid,
	pub user_id: Uuid,
	/// The new email address that still needs to be confirmed
	pub new_email: String,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	pub site: Option<String>,
}

impl ChangeRequest {
	pub fn expires_at(&self, timeout: Duration) -> OffsetDateTime {
		self.created_at + timeout
	}

	/// A request is expired from the exact moment its timeout elapses, and
	/// must be treated as non-existent by confirmation logic even if the
	/// row has not been swept yet
	pub fn has_expired(&self, timeout: Duration, now: OffsetDateTime) -> bool {
		now >= self.expires_at(timeout)
	}
}
