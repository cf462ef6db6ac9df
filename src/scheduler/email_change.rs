use std::time::Duration;

use time::OffsetDateTime;
use tracing::error;

use crate::{app::AppState, service};

/// Periodically removes change requests whose timeout has elapsed. An
/// unconfirmed request is already treated as expired by the confirmation
/// logic; this job only reclaims the rows.
pub(super) fn spawn_sweep_job(state: AppState) {
	let period = Duration::from_secs(state.config.email_change.sweep_interval);
	tokio::spawn(async move {
		let mut interval = tokio::time::interval(period);
		// The first tick fires immediately and sweeps whatever expired
		// while the process was down
		loop {
			interval.tick().await;
			if let Err(err) = service::email_change::sweep_expired_requests(
				&state,
				OffsetDateTime::now_utc(),
			)
			.await
			{
				error!("Failed to sweep expired email change requests: {}", err);
			}
		}
	});
}
