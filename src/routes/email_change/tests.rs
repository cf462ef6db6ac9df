use axum::{
	body::Body,
	http::{header, Method, Request, Response, StatusCode},
	Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
	app::AppState,
	db::UserStore,
	models::User,
	routes,
	service,
	test::{seed_user, test_state},
	utils::constants::USER_ID_HEADER,
};

async fn send(
	state: &AppState,
	method: Method,
	uri: &str,
	user: Option<&User>,
	body: Option<Value>,
) -> Response<Body> {
	let router: Router = routes::setup_routes(state).await;
	let mut builder = Request::builder().method(method).uri(uri);
	if let Some(user) = user {
		builder = builder.header(USER_ID_HEADER, user.id.to_string());
	}
	let request = match body {
		Some(body) => builder
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from(body.to_string())),
		None => builder.body(Body::empty()),
	}
	.expect("request should build");
	router
		.oneshot(request)
		.await
		.expect("router should not fail")
}

async fn json_body(response: Response<Body>) -> Value {
	let bytes = response
		.into_body()
		.collect()
		.await
		.expect("body should collect")
		.to_bytes();
	serde_json::from_slice(&bytes).expect("body should be JSON")
}

fn location(response: &Response<Body>) -> &str {
	response
		.headers()
		.get(header::LOCATION)
		.expect("redirect should carry a location")
		.to_str()
		.expect("location should be ascii")
}

#[tokio::test]
async fn unauthenticated_requests_are_rejected() {
	let (state, _) = test_state();
	let response = send(&state, Method::GET, "/email/change/", None, None).await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn index_redirects_to_create_without_pending_request() {
	let (state, _) = test_state();
	let bob = seed_user(&state, "bob", "bob@example.com").await;

	let response = send(&state, Method::GET, "/email/change/", Some(&bob), None).await;

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
	assert_eq!(location(&response), "/email/change/create/");
}

#[tokio::test]
async fn index_redirects_to_detail_with_pending_request() {
	let (state, _) = test_state();
	let bob = seed_user(&state, "bob", "bob@example.com").await;
	let outcome = service::email_change::create_request(
		&state,
		&bob,
		"bob2@example.com",
		OffsetDateTime::now_utc(),
	)
	.await
	.expect("create should succeed");

	let response = send(&state, Method::GET, "/email/change/", Some(&bob), None).await;

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
	assert_eq!(
		location(&response),
		format!("/email/change/{}/", outcome.request().id)
	);
}

#[tokio::test]
async fn create_redirects_to_detail_and_notifies() {
	let (state, notifier) = test_state();
	let bob = seed_user(&state, "bob", "bob@example.com").await;

	let response = send(
		&state,
		Method::POST,
		"/email/change/create/",
		Some(&bob),
		Some(json!({ "newEmail": "bob2@example.com" })),
	)
	.await;

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
	let pending = service::email_change::get_request_for_user(&state, &bob)
		.await
		.expect("lookup should succeed")
		.expect("a request should be pending");
	assert_eq!(
		location(&response),
		format!("/email/change/{}/", pending.id)
	);
	assert_eq!(notifier.sent_to(), vec!["bob2@example.com".to_string()]);
}

#[tokio::test]
async fn create_with_taken_address_returns_field_error() {
	let (state, notifier) = test_state();
	let bob = seed_user(&state, "bob", "bob@example.com").await;
	seed_user(&state, "alice", "alice@example.com").await;

	let response = send(
		&state,
		Method::POST,
		"/email/change/create/",
		Some(&bob),
		Some(json!({ "newEmail": "Alice@example.com" })),
	)
	.await;

	assert_eq!(response.status(), StatusCode::OK);
	let body = json_body(response).await;
	assert_eq!(body["success"], json!(false));
	assert!(body["errors"]["newEmail"].is_string());
	assert!(notifier.sent_to().is_empty());
}

#[tokio::test]
async fn confirm_with_garbage_credential_fails_closed() {
	let (state, _) = test_state();
	let bob = seed_user(&state, "bob", "bob@example.com").await;
	service::email_change::create_request(
		&state,
		&bob,
		"bob2@example.com",
		OffsetDateTime::now_utc(),
	)
	.await
	.expect("create should succeed");

	let response = send(
		&state,
		Method::GET,
		"/email/change/confirm/foo/",
		Some(&bob),
		None,
	)
	.await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await, json!({ "confirmed": false }));
	let bob = state
		.store
		.get_user(bob.id)
		.await
		.expect("lookup should succeed")
		.expect("bob should still exist");
	assert_eq!(bob.email, "bob@example.com");
}

#[tokio::test]
async fn confirm_with_mailed_credential_commits_the_change() {
	let (state, notifier) = test_state();
	let bob = seed_user(&state, "bob", "bob@example.com").await;
	send(
		&state,
		Method::POST,
		"/email/change/create/",
		Some(&bob),
		Some(json!({ "newEmail": "bob2@example.com" })),
	)
	.await;
	let credential = notifier
		.last_context()
		.expect("a confirmation mail should have been sent")
		.credential;

	let response = send(
		&state,
		Method::GET,
		&format!("/email/change/confirm/{credential}/"),
		Some(&bob),
		None,
	)
	.await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await, json!({ "confirmed": true }));
	let bob = state
		.store
		.get_user(bob.id)
		.await
		.expect("lookup should succeed")
		.expect("bob should still exist");
	assert_eq!(bob.email, "bob2@example.com");
	assert!(service::email_change::get_request_for_user(&state, &bob)
		.await
		.expect("lookup should succeed")
		.is_none());
}

#[tokio::test]
async fn delete_redirects_and_abandons_the_request() {
	let (state, _) = test_state();
	let bob = seed_user(&state, "bob", "bob@example.com").await;
	let outcome = service::email_change::create_request(
		&state,
		&bob,
		"bob2@example.com",
		OffsetDateTime::now_utc(),
	)
	.await
	.expect("create should succeed");

	let response = send(
		&state,
		Method::POST,
		&format!("/email/change/delete/{}/", outcome.request().id),
		Some(&bob),
		None,
	)
	.await;

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
	assert_eq!(location(&response), "/email/change/");
	assert!(service::email_change::get_request_for_user(&state, &bob)
		.await
		.expect("lookup should succeed")
		.is_none());
}

#[tokio::test]
async fn delete_of_unknown_request_redirects_to_create() {
	let (state, _) = test_state();
	let bob = seed_user(&state, "bob", "bob@example.com").await;

	let response = send(
		&state,
		Method::POST,
		&format!("/email/change/delete/{}/", Uuid::new_v4()),
		Some(&bob),
		None,
	)
	.await;

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
	assert_eq!(location(&response), "/email/change/create/");
}

#[tokio::test]
async fn detail_never_exposes_the_credential() {
	let (state, _) = test_state();
	let bob = seed_user(&state, "bob", "bob@example.com").await;
	let outcome = service::email_change::create_request(
		&state,
		&bob,
		"bob2@example.com",
		OffsetDateTime::now_utc(),
	)
	.await
	.expect("create should succeed");

	let response = send(
		&state,
		Method::GET,
		&format!("/email/change/{}/", outcome.request().id),
		Some(&bob),
		None,
	)
	.await;

	assert_eq!(response.status(), StatusCode::OK);
	let body = json_body(response).await;
	assert_eq!(body["newEmail"], json!("bob2@example.com"));
	assert!(body["createdAt"].is_string());
	assert!(body["expiresAt"].is_string());
	assert!(body.get("credential").is_none());
}

#[tokio::test]
async fn detail_of_unknown_request_redirects_to_create() {
	let (state, _) = test_state();
	let bob = seed_user(&state, "bob", "bob@example.com").await;

	let response = send(
		&state,
		Method::GET,
		&format!("/email/change/{}/", Uuid::new_v4()),
		Some(&bob),
		None,
	)
	.await;

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
	assert_eq!(location(&response), "/email/change/create/");
}
