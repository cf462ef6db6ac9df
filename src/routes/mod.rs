mod email_change;

use axum::Router;

use crate::{app::AppState, utils::config::AppConfig};

pub async fn setup_routes(state: &AppState) -> Router {
	let routes = email_change::setup_routes(state).await;
	if state.config.base_path == "/" {
		Router::new().merge(routes)
	} else {
		Router::new().nest(&state.config.base_path, routes)
	}
}

/// Builds a redirect target under the configured base path
pub fn prefixed_path(config: &AppConfig, path: &str) -> String {
	if config.base_path == "/" {
		path.to_string()
	} else {
		format!("{}{}", config.base_path, path)
	}
}
