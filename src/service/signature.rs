use hmac::{Hmac, Mac};
use sha2::Sha256;
use time::{Duration, OffsetDateTime};

use crate::models::{ChangeRequest, ErrorType};

type HmacSha256 = Hmac<Sha256>;

/// Generates the hex-encoded credential for a change request: an HMAC-SHA256
/// over the requested address, keyed with the server secret. Deterministic
/// for the same request and secret, so a credential can be re-verified
/// without ever being stored.
pub fn make_signature(
	secret: &str,
	request: &ChangeRequest,
) -> Result<String, ErrorType> {
	let mut mac = HmacSha256::new_from_slice(secret.as_bytes())?;
	mac.update(request.new_email.as_bytes());
	Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Checks that a credential is valid for a change request.
///
/// Two-phase: the expiry check runs first on row data alone, then the MAC is
/// verified in constant time. The result is only a boolean; a malformed
/// credential (bad hex, wrong length) fails verification the same way a
/// tampered one does.
pub fn check_signature(
	secret: &str,
	request: &ChangeRequest,
	signature: &str,
	timeout: Duration,
	now: OffsetDateTime,
) -> bool {
	if request.has_expired(timeout, now) {
		return false;
	}
	verify_signature(secret, request, signature)
}

fn verify_signature(secret: &str, request: &ChangeRequest, signature: &str) -> bool {
	let Ok(signature) = hex::decode(signature) else {
		return false;
	};
	let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
		return false;
	};
	mac.update(request.new_email.as_bytes());
	mac.verify_slice(&signature).is_ok()
}
