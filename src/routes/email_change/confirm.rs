use axum::{
	extract::{Path, State},
	Json,
};
use serde_json::json;
use time::OffsetDateTime;

use crate::{
	app::AppState,
	models::ErrorType,
	service,
	utils::{constants::request_keys, extractors::AuthenticatedUser},
};

/// Confirms the caller's pending request with the credential from the
/// mailed link. Always answers 200 with a `confirmed` flag; an invalid,
/// expired or missing request gives `false` with no further detail.
pub async fn confirm(
	State(state): State<AppState>,
	AuthenticatedUser(user): AuthenticatedUser,
	Path(credential): Path<String>,
) -> Result<Json<serde_json::Value>, ErrorType> {
	let confirmed = service::email_change::confirm_request(
		&state,
		&user,
		&credential,
		OffsetDateTime::now_utc(),
	)
	.await?;

	Ok(Json(json!({ (request_keys::CONFIRMED): confirmed })))
}
