mod confirm;
mod create;
mod delete;
mod detail;
mod index;
#[cfg(test)]
mod tests;

use axum::{routing::get, Router};

pub use self::{confirm::*, create::*, delete::*, detail::*, index::*};
use crate::{app::AppState, models::ChangeRequest, routes, utils::config::AppConfig};

pub async fn setup_routes(state: &AppState) -> Router {
	Router::new()
		.route("/email/change/", get(index))
		.route("/email/change/create/", get(create_form).post(create_submit))
		.route("/email/change/confirm/:credential/", get(confirm))
		.route(
			"/email/change/delete/:request_id/",
			get(delete_request).post(delete_request),
		)
		.route("/email/change/:request_id/", get(detail))
		.with_state(state.clone())
}

fn create_path(config: &AppConfig) -> String {
	routes::prefixed_path(config, "/email/change/create/")
}

fn detail_path(config: &AppConfig, request: &ChangeRequest) -> String {
	routes::prefixed_path(config, &format!("/email/change/{}/", request.id))
}
