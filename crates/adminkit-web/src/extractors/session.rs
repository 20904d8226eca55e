//! Visitor session cookie handling.
//!
//! Flash messages need an identity that survives the redirect after a
//! mutation; a UUID session cookie provides one without any server-side
//! login state.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use uuid::Uuid;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "adminkit_session";

/// Return the visitor's session id, minting a new cookie when absent.
pub fn ensure_session(jar: CookieJar) -> (CookieJar, Uuid) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Ok(id) = Uuid::parse_str(cookie.value()) {
            return (jar, id);
        }
    }

    let id = Uuid::new_v4();
    let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .build();
    (jar.add(cookie), id)
}
