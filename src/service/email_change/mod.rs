
use time::OffsetDateTime;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
	app::AppState,
	db::NewChangeRequest,
	models::{ChangeRequest, ErrorType, User},
	service::{
		events::EmailChangeEvent,
		notifier::NotificationContext,
		signature,
	},
	utils::validator,
};

#[derive(Debug)]
pub enum CreateOutcome {
	Created(ChangeRequest),
	/// A request was already pending; a second create resolves to it
	/// instead of failing
	AlreadyPending(ChangeRequest),
}

impl CreateOutcome {
	pub fn request(&self) -> &ChangeRequest {
		match self {
			Self::Created(request) => request,
			Self::AlreadyPending(request) => request,
		}
	}
}

/// Requests a change of `user`'s email address to `new_email`: validates
/// the address, persists the pending request, and dispatches the
/// confirmation mail carrying the signed credential. If the notifier fails,
/// the request is removed again so no pending request outlives a failed
/// confirmation attempt.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn create_request(
	state: &AppState,
	user: &User,
	new_email: &str,
	now: OffsetDateTime,
) -> Result<CreateOutcome, ErrorType> {
	if !validator::is_email_valid(new_email) {
		return Err(ErrorType::InvalidEmail);
	}

	if let Some(existing) = state.store.get_request_for_user(user.id).await? {
		info!(
			"User `{}` already has a pending email change request `{}`",
			user.id, existing.id
		);
		return Ok(CreateOutcome::AlreadyPending(existing));
	}

	let new_request = NewChangeRequest {
		user_id: user.id,
		new_email: new_email.to_string(),
		site: state.config.email_change.site.clone(),
	};
	let request = match state
		.store
		.create_request(
			new_request,
			state.config.email_change.validate_per_site,
			now,
		)
		.await
	{
		Ok(request) => request,
		// Lost a race against a concurrent create by the same user
		Err(ErrorType::RequestAlreadyExists) => {
			return match state.store.get_request_for_user(user.id).await? {
				Some(existing) => Ok(CreateOutcome::AlreadyPending(existing)),
				None => Err(ErrorType::RequestAlreadyExists),
			};
		}
		Err(error) => return Err(error),
	};

	let credential = signature::make_signature(&state.config.secret, &request)?;
	let context = NotificationContext {
		username: user.username.clone(),
		new_email: request.new_email.clone(),
		created_at: request.created_at,
		expires_at: request.expires_at(state.config.email_change.timeout_duration()),
		credential,
		site: request.site.clone(),
	};

	if let Err(error) = state.notifier.notify(&request.new_email, &context).await {
		// A pending request without an outbound confirmation attempt must
		// not survive the failed create
		if let Err(cleanup_error) = state.store.delete_request(request.id).await {
			debug!(
				"Failed to roll back request `{}` after notifier failure: {}",
				request.id, cleanup_error
			);
		}
		return Err(error);
	}

	state.events.publish(EmailChangeEvent::RequestCreated {
		request_id: request.id,
		user_id: user.id,
		new_email: request.new_email.clone(),
	});

	Ok(CreateOutcome::Created(request))
}

/// Confirms the pending request of `user` with the presented credential.
/// Fails closed: a missing request, an invalid or expired credential, and a
/// request swept mid-flight all yield `Ok(false)` with no further detail.
#[instrument(skip(state, user, credential), fields(user_id = %user.id))]
pub async fn confirm_request(
	state: &AppState,
	user: &User,
	credential: &str,
	now: OffsetDateTime,
) -> Result<bool, ErrorType> {
	let Some(request) = state.store.get_request_for_user(user.id).await? else {
		debug!("No email change request found for user `{}`", user.id);
		return Ok(false);
	};
	if request.user_id != user.id {
		return Err(ErrorType::Unauthorized);
	}

	if !signature::check_signature(
		&state.config.secret,
		&request,
		credential,
		state.config.email_change.timeout_duration(),
		now,
	) {
		debug!(
			"Credential for request `{}` failed verification",
			request.id
		);
		return Ok(false);
	}

	match state.store.commit_email_change(request.id, user.id).await {
		Ok(request) => {
			state.events.publish(EmailChangeEvent::RequestConfirmed {
				request_id: request.id,
				user_id: user.id,
				new_email: request.new_email,
			});
			Ok(true)
		}
		// A concurrent sweep got to the row first
		Err(ErrorType::RequestNotFound) => {
			debug!("Request `{}` was swept before the commit", request.id);
			Ok(false)
		}
		Err(error) => Err(error),
	}
}

/// Abandons the pending request without altering the user's email address
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_request(
	state: &AppState,
	user: &User,
	request_id: Uuid,
) -> Result<(), ErrorType> {
	let Some(request) = state.store.get_request_for_user(user.id).await? else {
		return Err(ErrorType::RequestNotFound);
	};
	if request.id != request_id || request.user_id != user.id {
		return Err(ErrorType::RequestNotFound);
	}

	state.store.delete_request(request.id).await?;
	state.events.publish(EmailChangeEvent::RequestDeleted {
		request_id: request.id,
		user_id: user.id,
	});

	Ok(())
}

pub async fn get_request_for_user(
	state: &AppState,
	user: &User,
) -> Result<Option<ChangeRequest>, ErrorType> {
	state.store.get_request_for_user(user.id).await
}

/// Removes every request whose timeout has elapsed. Invoked periodically by
/// the scheduler, and callable directly by an external cron. No notification
/// is sent for expired requests.
#[instrument(skip(state))]
pub async fn sweep_expired_requests(
	state: &AppState,
	now: OffsetDateTime,
) -> Result<u64, ErrorType> {
	let deleted = state
		.store
		.delete_expired_requests(state.config.email_change.timeout_duration(), now)
		.await?;
	if deleted > 0 {
		info!("Swept {deleted} expired email change requests");
	}
	Ok(deleted)
}
