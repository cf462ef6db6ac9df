mod email_change;

use crate::app::AppState;

/// Spawns every background job of the application. Each job runs on its own
/// interval until the process exits.
pub fn initialize_jobs(state: &AppState) {
	email_change::spawn_sweep_job(state.clone());
}
