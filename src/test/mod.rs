use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
	app::AppState,
	db::{InMemoryStore, UserStore},
	models::{ErrorType, User},
	service::{
		events::EventBus,
		notifier::{NotificationContext, Notifier},
	},
	utils::config::AppConfig,
};

pub fn test_config() -> AppConfig {
	serde_json::from_value(serde_json::json!({
		"bindAddress": "127.0.0.1:0",
		"secret": "a-very-secret-signing-key",
		"environment": "development",
		"emailChange": {
			"fromAddress": "Accounts <no-reply@example.com>"
		},
		"smtp": {
			"host": "localhost",
			"port": 587,
			"username": "mailer",
			"password": "hunter2"
		}
	}))
	.expect("test config should deserialize")
}

/// Captures every notification instead of sending it
#[derive(Default)]
pub struct RecordingNotifier {
	pub sent: Mutex<Vec<(String, NotificationContext)>>,
}

impl RecordingNotifier {
	pub fn sent_to(&self) -> Vec<String> {
		self.sent
			.lock()
			.unwrap()
			.iter()
			.map(|(new_email, _)| new_email.clone())
			.collect()
	}

	pub fn last_context(&self) -> Option<NotificationContext> {
		self.sent
			.lock()
			.unwrap()
			.last()
			.map(|(_, context)| context.clone())
	}
}

#[async_trait]
impl Notifier for RecordingNotifier {
	async fn notify(
		&self,
		new_email: &str,
		context: &NotificationContext,
	) -> Result<(), ErrorType> {
		self.sent
			.lock()
			.unwrap()
			.push((new_email.to_string(), context.clone()));
		Ok(())
	}
}

/// Fails every notification, for exercising the create rollback
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
	async fn notify(
		&self,
		_new_email: &str,
		_context: &NotificationContext,
	) -> Result<(), ErrorType> {
		Err(ErrorType::NotificationFailed)
	}
}

pub fn test_state() -> (AppState, Arc<RecordingNotifier>) {
	let notifier = Arc::new(RecordingNotifier::default());
	let state = AppState {
		config: test_config(),
		store: Arc::new(InMemoryStore::new()),
		notifier: notifier.clone(),
		events: EventBus::new(16),
	};
	(state, notifier)
}

pub async fn seed_user(state: &AppState, username: &str, email: &str) -> User {
	let user = User {
		id: Uuid::new_v4(),
		username: username.to_string(),
		email: email.to_string(),
		site: None,
	};
	state
		.store
		.create_user(user.clone())
		.await
		.expect("seeding a user should succeed");
	user
}
