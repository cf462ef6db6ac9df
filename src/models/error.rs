use std::{
	error::Error as StdError,
	fmt::{Display, Formatter},
	mem,
};

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::Serialize;
use serde_json::json;

use crate::utils::constants::request_keys;

/// A list of all the possible errors that can be returned by the service
#[derive(Debug)]
pub enum ErrorType {
	/// The email provided is not a valid address
	InvalidEmail,
	/// The email provided is already used by an account or by another
	/// pending change request
	EmailUnavailable,
	/// A pending change request already exists for this user
	RequestAlreadyExists,
	/// No pending change request exists for this user, or the referenced
	/// request does not belong to them
	RequestNotFound,
	/// The caller could not be identified as an authenticated user
	Unauthorized,
	/// The confirmation mail could not be handed to the mail transport
	NotificationFailed,
	/// An internal server error occurred. This should not happen unless
	/// there is a bug in the server
	InternalServerError(anyhow::Error),
}

impl ErrorType {
	/// Returns the status code that should be used for this error. Note that
	/// this is only the default status code and specific endpoints can
	/// override this if needed
	pub fn default_status_code(&self) -> StatusCode {
		match self {
			Self::InvalidEmail => StatusCode::BAD_REQUEST,
			Self::EmailUnavailable => StatusCode::CONFLICT,
			Self::RequestAlreadyExists => StatusCode::CONFLICT,
			Self::RequestNotFound => StatusCode::NOT_FOUND,
			Self::Unauthorized => StatusCode::UNAUTHORIZED,
			Self::NotificationFailed => StatusCode::INTERNAL_SERVER_ERROR,
			Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Returns the message that should be used for this error. This is the
	/// message that is user-friendly and can be shown to the user
	pub fn message(&self) -> impl Into<String> {
		match self {
			Self::InvalidEmail => "That doesn't seem to be a valid email address",
			Self::EmailUnavailable => {
				"This email address is already in use. Please supply a different email address"
			}
			Self::RequestAlreadyExists => concat!(
				"An email address change request was found. It must be ",
				"deleted before a new one can be requested"
			),
			Self::RequestNotFound => concat!(
				"No email address change request was found. Either an old ",
				"one has expired or a new one has not been requested"
			),
			Self::Unauthorized => "You are not authorized to perform that action",
			Self::NotificationFailed => {
				"The confirmation mail could not be sent. Please try again later"
			}
			Self::InternalServerError(_) => "An internal server error has occured",
		}
	}

	/// Creates an [`ErrorType::InternalServerError`] with the given message
	pub fn server_error(message: impl Display) -> Self {
		Self::InternalServerError(anyhow::anyhow!(message.to_string()))
	}
}

impl PartialEq for ErrorType {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::InternalServerError(_), Self::InternalServerError(_)) => true,
			_ => mem::discriminant(self) == mem::discriminant(other),
		}
	}
}

impl Eq for ErrorType {}

impl<Error> From<Error> for ErrorType
where
	Error: StdError + Send + Sync + 'static,
{
	fn from(error: Error) -> Self {
		Self::InternalServerError(error.into())
	}
}

impl From<ErrorType> for anyhow::Error {
	fn from(error: ErrorType) -> Self {
		match error {
			ErrorType::InternalServerError(error) => error,
			other => anyhow::anyhow!("{}", other),
		}
	}
}

impl Display for ErrorType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.message().into())
	}
}

impl Serialize for ErrorType {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		match self {
			Self::InvalidEmail => serializer.serialize_str("invalidEmail"),
			Self::EmailUnavailable => serializer.serialize_str("emailUnavailable"),
			Self::RequestAlreadyExists => serializer.serialize_str("requestAlreadyExists"),
			Self::RequestNotFound => serializer.serialize_str("requestNotFound"),
			Self::Unauthorized => serializer.serialize_str("unauthorized"),
			Self::NotificationFailed => serializer.serialize_str("notificationFailed"),
			Self::InternalServerError(_) => serializer.serialize_str("internalServerError"),
		}
	}
}

impl IntoResponse for ErrorType {
	fn into_response(self) -> Response {
		if let Self::InternalServerError(error) = &self {
			tracing::error!("Internal server error: {:?}", error);
		}
		let status_code = self.default_status_code();
		let message: String = self.message().into();
		(
			status_code,
			Json(json!({
				(request_keys::SUCCESS): false,
				(request_keys::ERROR): self,
				(request_keys::MESSAGE): message,
			})),
		)
			.into_response()
	}
}
