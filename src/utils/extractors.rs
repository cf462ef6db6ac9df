use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::{
	app::AppState,
	models::{ErrorType, User},
	utils::constants,
};

/// The caller, as identified by the upstream authentication layer through
/// the `x-user-id` header. Extraction fails with 401 if the header is
/// missing, malformed, or names an unknown account.
pub struct AuthenticatedUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
	type Rejection = ErrorType;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let user_id = parts
			.headers
			.get(constants::USER_ID_HEADER)
			.and_then(|value| value.to_str().ok())
			.and_then(|value| Uuid::parse_str(value).ok())
			.ok_or(ErrorType::Unauthorized)?;

		let user = state
			.store
			.get_user(user_id)
			.await?
			.ok_or(ErrorType::Unauthorized)?;

		Ok(Self(user))
	}
}
