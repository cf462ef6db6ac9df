use axum::{
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Redirect, Response},
	Json,
};
use serde::Deserialize;
use serde_json::json;
use time::OffsetDateTime;

use super::detail_path;
use crate::{
	app::AppState,
	models::ErrorType,
	service,
	utils::{constants::request_keys, extractors::AuthenticatedUser},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmailChangeRequest {
	pub new_email: String,
}

/// Describes the create form: the caller's current address and the field
/// the submission expects
pub async fn create_form(
	State(_): State<AppState>,
	AuthenticatedUser(user): AuthenticatedUser,
) -> Json<serde_json::Value> {
	Json(json!({
		(request_keys::CURRENT_EMAIL): user.email,
		"fields": [request_keys::NEW_EMAIL],
	}))
}

/// Submits a new change request. A taken or malformed address is a field
/// error on the form, not a failed request; an already-pending request
/// resolves to that request's detail view.
pub async fn create_submit(
	State(state): State<AppState>,
	AuthenticatedUser(user): AuthenticatedUser,
	Json(body): Json<CreateEmailChangeRequest>,
) -> Result<Response, ErrorType> {
	let now = OffsetDateTime::now_utc();
	match service::email_change::create_request(&state, &user, &body.new_email, now).await
	{
		Ok(outcome) => Ok(
			Redirect::to(&detail_path(&state.config, outcome.request())).into_response()
		),
		Err(error @ (ErrorType::InvalidEmail | ErrorType::EmailUnavailable)) => {
			let message: String = error.message().into();
			Ok((
				StatusCode::OK,
				Json(json!({
					(request_keys::SUCCESS): false,
					(request_keys::ERRORS): {
						(request_keys::NEW_EMAIL): message
					},
				})),
			)
				.into_response())
		}
		Err(error) => Err(error),
	}
}
