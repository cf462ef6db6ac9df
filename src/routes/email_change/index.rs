use axum::{extract::State, response::Redirect};

use super::{create_path, detail_path};
use crate::{
	app::AppState,
	models::ErrorType,
	service,
	utils::extractors::AuthenticatedUser,
};

/// Dispatches to the detail view if a request is pending, and to the create
/// form otherwise
pub async fn index(
	State(state): State<AppState>,
	AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Redirect, ErrorType> {
	match service::email_change::get_request_for_user(&state, &user).await? {
		Some(request) => Ok(Redirect::to(&detail_path(&state.config, &request))),
		None => Ok(Redirect::to(&create_path(&state.config))),
	}
}
