use axum::{
	extract::{Path, State},
	response::Redirect,
};
use uuid::Uuid;

use super::create_path;
use crate::{
	app::AppState,
	models::ErrorType,
	service,
	utils::extractors::AuthenticatedUser,
};

/// Abandons the caller's pending request. Redirects to the configured
/// success target, or back to the create form if there is nothing to delete.
pub async fn delete_request(
	State(state): State<AppState>,
	AuthenticatedUser(user): AuthenticatedUser,
	Path(request_id): Path<Uuid>,
) -> Result<Redirect, ErrorType> {
	match service::email_change::delete_request(&state, &user, request_id).await {
		Ok(()) => Ok(Redirect::to(
			&state.config.email_change.delete_success_redirect,
		)),
		Err(ErrorType::RequestNotFound) => Ok(Redirect::to(&create_path(&state.config))),
		Err(error) => Err(error),
	}
}
