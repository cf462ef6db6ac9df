use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{
	db::{ChangeRequestStore, UserStore},
	routes,
	service::{events::EventBus, notifier::Notifier},
	utils::{config::AppConfig, constants},
};

/// The full persistence capability the workflow needs
pub trait DataStore: UserStore + ChangeRequestStore {}

impl<TStore> DataStore for TStore where TStore: UserStore + ChangeRequestStore {}

/// The global state of the application, read-only after initialization
#[derive(Clone)]
pub struct AppState {
	pub config: AppConfig,
	pub store: Arc<dyn DataStore>,
	pub notifier: Arc<dyn Notifier>,
	pub events: EventBus,
}

pub async fn start_server(state: AppState) -> Result<(), anyhow::Error> {
	let listener = TcpListener::bind(state.config.bind_address).await?;
	info!(
		"Starting {} {} in {} mode",
		constants::APP_NAME,
		constants::APP_VERSION,
		state.config.environment
	);
	info!(
		"Listening for connections on http://{}",
		listener.local_addr()?
	);

	axum::serve(
		listener,
		routes::setup_routes(&state).await.into_make_service(),
	)
	.with_graceful_shutdown(exit_signal())
	.await?;

	Ok(())
}

async fn exit_signal() {
	if tokio::signal::ctrl_c().await.is_err() {
		warn!("Failed to listen for the exit signal, shutting down");
	}
	warn!("Exit signal received. Stopping server");
}
