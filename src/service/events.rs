use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

/// Lifecycle events published by the confirmation workflow. Subscribers
/// register independently through [`EventBus::subscribe`]; there is no
/// global dispatcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmailChangeEvent {
	RequestCreated {
		request_id: Uuid,
		user_id: Uuid,
		new_email: String,
	},
	RequestConfirmed {
		request_id: Uuid,
		user_id: Uuid,
		new_email: String,
	},
	RequestDeleted {
		request_id: Uuid,
		user_id: Uuid,
	},
}

#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<EmailChangeEvent>,
}

impl EventBus {
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Publishing with no live subscribers is not an error
	pub fn publish(&self, event: EmailChangeEvent) {
		let _ = self.sender.send(event);
	}

	pub fn subscribe(&self) -> broadcast::Receiver<EmailChangeEvent> {
		self.sender.subscribe()
	}
}

/// Logs every lifecycle event. Registered at startup like any other
/// subscriber would be.
pub fn spawn_logging_subscriber(events: &EventBus) {
	let mut receiver = events.subscribe();
	tokio::spawn(async move {
		while let Ok(event) = receiver.recv().await {
			match event {
				EmailChangeEvent::RequestCreated {
					request_id,
					user_id,
					..
				} => {
					info!(
						"Email change request `{}` created for user `{}`",
						request_id, user_id
					);
				}
				EmailChangeEvent::RequestConfirmed {
					request_id,
					user_id,
					..
				} => {
					info!(
						"Email change request `{}` confirmed for user `{}`",
						request_id, user_id
					);
				}
				EmailChangeEvent::RequestDeleted {
					request_id,
					user_id,
				} => {
					info!(
						"Email change request `{}` deleted for user `{}`",
						request_id, user_id
					);
				}
			}
		}
	});
}
