//! Session cookie carrying the bearer token for browser clients

use axum_extra::extract::cookie::{Cookie, SameSite};

/// Name of the cookie holding the token
pub const SESSION_COOKIE: &str = "token";

/// Cookie set on login
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build()
}

/// Expired cookie sent on logout, whether or not the client had one
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build();
    cookie.make_removal();
    cookie
}
