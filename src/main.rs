use std::sync::Arc;

use tracing::{Dispatch, Level};
use tracing_subscriber::{
	filter::LevelFilter,
	fmt::{format::FmtSpan, Layer as FmtLayer},
	layer::SubscriberExt,
	prelude::*,
};

/// The state and startup of the HTTP server.
mod app;
/// The persistence layer for users and pending change requests.
mod db;
/// The domain types and the error type of every fallible operation.
mod models;
/// One handler per endpoint, grouped by resource.
mod routes;
/// Background jobs, currently only the expired-request sweep.
mod scheduler;
/// The email change workflow, credential signing, events and notifications.
mod service;
/// Configuration, constants, extractors and validators.
mod utils;

#[cfg(test)]
mod test;

use crate::{
	app::AppState,
	db::InMemoryStore,
	service::{events, events::EventBus, notifier::SmtpNotifier},
	utils::config::{self, RunningEnvironment},
};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
	let config = config::parse_config();

	tracing::dispatcher::set_global_default(Dispatch::new(
		tracing_subscriber::registry().with(
			FmtLayer::new()
				.with_span_events(FmtSpan::NONE)
				.event_format(
					tracing_subscriber::fmt::format()
						.with_ansi(true)
						.with_file(false)
						.without_time()
						.compact(),
				)
				.with_filter(
					tracing_subscriber::filter::Targets::new()
						.with_target(env!("CARGO_CRATE_NAME"), LevelFilter::TRACE),
				)
				.with_filter(LevelFilter::from_level(
					if config.environment == RunningEnvironment::Development {
						Level::TRACE
					} else {
						Level::DEBUG
					},
				)),
		),
	))
	.expect("Failed to set global default subscriber");

	let notifier = SmtpNotifier::new(&config.smtp, &config.email_change)?;
	let events = EventBus::new(64);
	events::spawn_logging_subscriber(&events);

	let state = AppState {
		config,
		store: Arc::new(InMemoryStore::new()),
		notifier: Arc::new(notifier),
		events,
	};

	scheduler::initialize_jobs(&state);
	app::start_server(state).await
}
