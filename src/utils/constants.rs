pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default validity of an email change request, in seconds (7 days)
pub const DEFAULT_EMAIL_CHANGE_TIMEOUT: u64 = 60 * 60 * 24 * 7;

/// Default delay between two sweeps of expired requests, in seconds
pub const DEFAULT_SWEEP_INTERVAL: u64 = 60 * 60;

/// Header set by the upstream authentication layer to identify the caller
pub const USER_ID_HEADER: &str = "x-user-id";

pub mod request_keys {
	pub const SUCCESS: &str = "success";
	pub const ERROR: &str = "error";
	pub const ERRORS: &str = "errors";
	pub const MESSAGE: &str = "message";
	pub const CONFIRMED: &str = "confirmed";
	pub const NEW_EMAIL: &str = "newEmail";
	pub const CURRENT_EMAIL: &str = "currentEmail";
}

pub mod default_templates {
	pub const SUBJECT: &str = "Confirm your new email address";

	pub const TEXT: &str = concat!(
		"Hi {{username}},\n",
		"\n",
		"A request was made to change the email address of your account ",
		"to {{newEmail}}.\n",
		"\n",
		"To confirm the change, open the link below before {{expiresAt}}:\n",
		"\n",
		"/email/change/confirm/{{credential}}/\n",
		"\n",
		"If you did not request this change, you can safely ignore this ",
		"message.\n",
	);

	pub const HTML: &str = concat!(
		"<p>Hi {{username}},</p>",
		"<p>A request was made to change the email address of your account ",
		"to <strong>{{newEmail}}</strong>.</p>",
		"<p>To confirm the change, open ",
		"<a href=\"/email/change/confirm/{{credential}}/\">this link</a> ",
		"before {{expiresAt}}.</p>",
		"<p>If you did not request this change, you can safely ignore this ",
		"message.</p>",
	);
}
