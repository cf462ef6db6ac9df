mod smtp;

pub use self::smtp::SmtpNotifier;

use async_trait::async_trait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::models::ErrorType;

/// Everything the confirmation message template can reference. Serialized
/// as-is into the template context.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationContext {
	pub username: String,
	pub new_email: String,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub expires_at: OffsetDateTime,
	pub credential: String,
	pub site: Option<String>,
}

/// Capability for delivering the confirmation message. The workflow makes
/// exactly one attempt per create; retry policy belongs to implementations.
#[async_trait]
pub trait Notifier: Send + Sync {
	async fn notify(
		&self,
		new_email: &str,
		context: &NotificationContext,
	) -> Result<(), ErrorType>;
}
