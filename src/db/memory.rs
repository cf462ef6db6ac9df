use std::collections::HashMap;

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ChangeRequestStore, NewChangeRequest, UserStore};
use crate::models::{ChangeRequest, ErrorType, User};

#[derive(Default)]
struct StoreInner {
	users: HashMap<Uuid, User>,
	requests: HashMap<Uuid, ChangeRequest>,
}

/// In-process implementation of the store traits. A single lock over both
/// maps is the transaction boundary: uniqueness checks, inserts and the
/// confirm commit all happen under one write guard, so concurrent creates
/// for the same user or email cannot both succeed, and a confirm racing a
/// sweep observes either the full row or none of it.
#[derive(Default)]
pub struct InMemoryStore {
	inner: RwLock<StoreInner>,
}

impl InMemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

fn same_scope(per_site: bool, a: &Option<String>, b: &Option<String>) -> bool {
	!per_site || a == b
}

#[async_trait]
impl UserStore for InMemoryStore {
	async fn create_user(&self, user: User) -> Result<(), ErrorType> {
		let mut inner = self.inner.write().await;
		let email = user.email.to_lowercase();
		if inner
			.users
			.values()
			.any(|existing| existing.email.to_lowercase() == email)
		{
			return Err(ErrorType::EmailUnavailable);
		}
		inner.users.insert(user.id, user);
		Ok(())
	}

	async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, ErrorType> {
		let inner = self.inner.read().await;
		Ok(inner.users.get(&user_id).cloned())
	}
}

#[async_trait]
impl ChangeRequestStore for InMemoryStore {
	async fn create_request(
		&self,
		new_request: NewChangeRequest,
		per_site: bool,
		now: OffsetDateTime,
	) -> Result<ChangeRequest, ErrorType> {
		let mut inner = self.inner.write().await;

		if inner
			.requests
			.values()
			.any(|request| request.user_id == new_request.user_id)
		{
			return Err(ErrorType::RequestAlreadyExists);
		}

		let email = new_request.new_email.to_lowercase();
		let email_taken = inner.users.values().any(|user| {
			user.email.to_lowercase() == email &&
				same_scope(per_site, &user.site, &new_request.site)
		}) || inner.requests.values().any(|request| {
			request.new_email.to_lowercase() == email &&
				same_scope(per_site, &request.site, &new_request.site)
		});
		if email_taken {
			return Err(ErrorType::EmailUnavailable);
		}

		let request = ChangeRequest {
			id: Uuid::new_v4(),
			user_id: new_request.user_id,
			new_email: new_request.new_email,
			created_at: now,
			site: new_request.site,
		};
		inner.requests.insert(request.id, request.clone());
		Ok(request)
	}

	async fn get_request_for_user(
		&self,
		user_id: Uuid,
	) -> Result<Option<ChangeRequest>, ErrorType> {
		let inner = self.inner.read().await;
		Ok(inner
			.requests
			.values()
			.find(|request| request.user_id == user_id)
			.cloned())
	}

	async fn get_request(
		&self,
		request_id: Uuid,
	) -> Result<Option<ChangeRequest>, ErrorType> {
		let inner = self.inner.read().await;
		Ok(inner.requests.get(&request_id).cloned())
	}

	async fn delete_request(&self, request_id: Uuid) -> Result<(), ErrorType> {
		let mut inner = self.inner.write().await;
		inner
			.requests
			.remove(&request_id)
			.map(|_| ())
			.ok_or(ErrorType::RequestNotFound)
	}

	async fn list_expired_requests(
		&self,
		timeout: Duration,
		now: OffsetDateTime,
	) -> Result<Vec<ChangeRequest>, ErrorType> {
		let inner = self.inner.read().await;
		Ok(inner
			.requests
			.values()
			.filter(|request| request.created_at <= now - timeout)
			.cloned()
			.collect())
	}

	async fn list_pending_requests(
		&self,
		timeout: Duration,
		now: OffsetDateTime,
	) -> Result<Vec<ChangeRequest>, ErrorType> {
		let inner = self.inner.read().await;
		Ok(inner
			.requests
			.values()
			.filter(|request| request.created_at > now - timeout)
			.cloned()
			.collect())
	}

	async fn delete_expired_requests(
		&self,
		timeout: Duration,
		now: OffsetDateTime,
	) -> Result<u64, ErrorType> {
		let mut inner = self.inner.write().await;
		let before = inner.requests.len();
		inner
			.requests
			.retain(|_, request| request.created_at > now - timeout);
		Ok((before - inner.requests.len()) as u64)
	}

	async fn commit_email_change(
		&self,
		request_id: Uuid,
		user_id: Uuid,
	) -> Result<ChangeRequest, ErrorType> {
		let mut inner = self.inner.write().await;

		let owned = inner
			.requests
			.get(&request_id)
			.map(|request| request.user_id == user_id)
			.unwrap_or(false);
		if !owned || !inner.users.contains_key(&user_id) {
			return Err(ErrorType::RequestNotFound);
		}

		// Both lookups succeeded under this guard, so the commit below
		// cannot partially apply
		let request = inner
			.requests
			.remove(&request_id)
			.ok_or(ErrorType::RequestNotFound)?;
		let user = inner
			.users
			.get_mut(&user_id)
			.ok_or(ErrorType::RequestNotFound)?;
		user.email = request.new_email.clone();
		Ok(request)
	}
}
