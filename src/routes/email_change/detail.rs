use axum::{
	extract::{Path, State},
	response::{IntoResponse, Redirect, Response},
	Json,
};
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use super::create_path;
use crate::{
	app::AppState,
	models::ErrorType,
	service,
	utils::{constants::request_keys, extractors::AuthenticatedUser},
};

/// Shows the caller's pending request. The signed credential is never part
/// of this view; it only ever travels through the confirmation mail.
pub async fn detail(
	State(state): State<AppState>,
	AuthenticatedUser(user): AuthenticatedUser,
	Path(request_id): Path<Uuid>,
) -> Result<Response, ErrorType> {
	let Some(request) = service::email_change::get_request_for_user(&state, &user).await? else {
		return Ok(Redirect::to(&create_path(&state.config)).into_response());
	};
	if request.id != request_id {
		return Ok(Redirect::to(&create_path(&state.config)).into_response());
	}

	let expires_at = request.expires_at(state.config.email_change.timeout_duration());
	Ok(Json(json!({
		"id": request.id,
		(request_keys::NEW_EMAIL): request.new_email,
		"createdAt": request.created_at.format(&Rfc3339)?,
		"expiresAt": expires_at.format(&Rfc3339)?,
	}))
	.into_response())
}
