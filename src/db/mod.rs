mod memory;

pub use self::memory::InMemoryStore;

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::models::{ChangeRequest, ErrorType, User};

/// Input for [`ChangeRequestStore::create_request`]. The id and creation
/// timestamp are assigned by the store.
#[derive(Clone, Debug)]
pub struct NewChangeRequest {
	pub user_id: Uuid,
	pub new_email: String,
	pub site: Option<String>,
}

/// Read access to the accounts this service commits email changes to.
#[async_trait]
pub trait UserStore: Send + Sync {
	async fn create_user(&self, user: User) -> Result<(), ErrorType>;

	async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, ErrorType>;
}

/// Persistence boundary for pending change requests. Implementations must
/// make every mutating operation atomic: `create_request` is a transactional
/// check-then-insert, and `commit_email_change` either fully applies (email
/// written, row deleted) or fails without touching anything.
#[async_trait]
pub trait ChangeRequestStore: Send + Sync {
	/// Fails with [`ErrorType::RequestAlreadyExists`] if a request already
	/// exists for the user, and with [`ErrorType::EmailUnavailable`] if the
	/// address is used (case-insensitively) by any account or by another
	/// pending request. When `per_site` is set, the uniqueness check only
	/// considers accounts and requests of the same site.
	async fn create_request(
		&self,
		new_request: NewChangeRequest,
		per_site: bool,
		now: OffsetDateTime,
	) -> Result<ChangeRequest, ErrorType>;

	async fn get_request_for_user(
		&self,
		user_id: Uuid,
	) -> Result<Option<ChangeRequest>, ErrorType>;

	async fn get_request(
		&self,
		request_id: Uuid,
	) -> Result<Option<ChangeRequest>, ErrorType>;

	/// Fails with [`ErrorType::RequestNotFound`] if the row is already gone.
	/// Callers are expected to check existence first.
	async fn delete_request(&self, request_id: Uuid) -> Result<(), ErrorType>;

	/// All requests with `created_at <= now - timeout`
	async fn list_expired_requests(
		&self,
		timeout: Duration,
		now: OffsetDateTime,
	) -> Result<Vec<ChangeRequest>, ErrorType>;

	/// All requests with `created_at > now - timeout`
	async fn list_pending_requests(
		&self,
		timeout: Duration,
		now: OffsetDateTime,
	) -> Result<Vec<ChangeRequest>, ErrorType>;

	/// Removes every expired request, returning how many were deleted
	async fn delete_expired_requests(
		&self,
		timeout: Duration,
		now: OffsetDateTime,
	) -> Result<u64, ErrorType>;

	/// Atomically writes the request's `new_email` to the owning user and
	/// deletes the request. Fails with [`ErrorType::RequestNotFound`] if the
	/// row no longer exists (for example, a concurrent sweep removed it) or
	/// does not belong to `user_id`; in that case nothing is modified.
	async fn commit_email_change(
		&self,
		request_id: Uuid,
		user_id: Uuid,
	) -> Result<ChangeRequest, ErrorType>;
}
