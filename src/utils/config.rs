use std::{
	env,
	fmt::{Display, Formatter},
	net::SocketAddr,
};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::utils::constants;

/// Reads the configuration for the current running environment, from
/// `config/<env>.json` merged with `APP_*` environment variables. Panics on
/// a malformed configuration, since there is nothing useful the server can
/// do without one.
pub fn parse_config() -> AppConfig {
	let env = if cfg!(debug_assertions) {
		"dev".to_string()
	} else {
		env::var("APP_ENV").unwrap_or_else(|_| "prod".into())
	};

	match env.as_ref() {
		"prod" | "production" => Config::builder()
			.add_source(File::with_name("config/prod").required(false))
			.set_default("environment", "production")
			.expect("unable to set environment to production"),
		"dev" | "development" => Config::builder()
			.add_source(File::with_name("config/dev").required(false))
			.set_default("environment", "development")
			.expect("unable to set environment to development"),
		_ => {
			panic!("Unknown running environment found!");
		}
	}
	.add_source(Environment::with_prefix("APP").separator("_"))
	.build()
	.expect("unable to merge with environment variables")
	.try_deserialize()
	.expect("unable to parse settings")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
	pub bind_address: SocketAddr,
	#[serde(default = "default_base_path")]
	pub base_path: String,
	/// Server-side key used to sign confirmation credentials. Rotating it
	/// invalidates every outstanding credential.
	pub secret: String,
	pub environment: RunningEnvironment,
	pub email_change: EmailChangeConfig,
	pub smtp: SmtpConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunningEnvironment {
	Development,
	Production,
}

impl Display for RunningEnvironment {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			formatter,
			"{}",
			match self {
				RunningEnvironment::Development => "Development",
				RunningEnvironment::Production => "Production",
			}
		)
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailChangeConfig {
	/// Validity of a change request and its credential, in seconds
	#[serde(default = "default_timeout")]
	pub timeout: u64,
	/// Address confirmation mails are sent from, e.g. `Accounts <no-reply@example.com>`
	pub from_address: String,
	#[serde(default)]
	pub html_email_enabled: bool,
	#[serde(default = "default_subject_template")]
	pub subject_template: String,
	#[serde(default = "default_text_template")]
	pub text_template: String,
	#[serde(default = "default_html_template")]
	pub html_template: String,
	/// Scope the email uniqueness check to requests and accounts of the
	/// same site, instead of globally
	#[serde(default)]
	pub validate_per_site: bool,
	/// Identifier of the site this deployment serves, if any
	#[serde(default)]
	pub site: Option<String>,
	#[serde(default = "default_delete_success_redirect")]
	pub delete_success_redirect: String,
	/// Delay between two sweeps of expired requests, in seconds
	#[serde(default = "default_sweep_interval")]
	pub sweep_interval: u64,
}

impl EmailChangeConfig {
	pub fn timeout_duration(&self) -> Duration {
		Duration::seconds(self.timeout as i64)
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmtpConfig {
	pub host: String,
	pub port: u16,
	pub username: String,
	pub password: String,
}

fn default_base_path() -> String {
	"/".to_string()
}

fn default_timeout() -> u64 {
	constants::DEFAULT_EMAIL_CHANGE_TIMEOUT
}

fn default_subject_template() -> String {
	constants::default_templates::SUBJECT.to_string()
}

fn default_text_template() -> String {
	constants::default_templates::TEXT.to_string()
}

fn default_html_template() -> String {
	constants::default_templates::HTML.to_string()
}

fn default_delete_success_redirect() -> String {
	"/email/change/".to_string()
}

fn default_sweep_interval() -> u64 {
	constants::DEFAULT_SWEEP_INTERVAL
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::AppConfig;

	#[test]
	fn minimal_config_fills_defaults() {
		let config = serde_json::from_value::<AppConfig>(json!({
			"bindAddress": "127.0.0.1:3000",
			"secret": "a-signing-secret",
			"environment": "development",
			"emailChange": {
				"fromAddress": "Accounts <no-reply@example.com>"
			},
			"smtp": {
				"host": "smtp.example.com",
				"port": 587,
				"username": "mailer",
				"password": "hunter2"
			}
		}))
		.expect("minimal config should deserialize");

		assert_eq!(config.base_path, "/");
		assert_eq!(config.email_change.timeout, 604800);
		assert_eq!(config.email_change.sweep_interval, 3600);
		assert!(!config.email_change.html_email_enabled);
		assert!(!config.email_change.validate_per_site);
		assert_eq!(config.email_change.delete_success_redirect, "/email/change/");
	}
}
