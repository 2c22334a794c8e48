//! Cookie header helpers

/// Cookie carrying the short-lived access credential
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Cookie carrying the refresh credential
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Extract a cookie value by name from a raw `Cookie` header value
#[must_use]
pub fn find_cookie<'a>(cookie_header: &'a str, cookie_name: &str) -> Option<&'a str> {
    cookie_header.split(';').find_map(|cookie| {
        let mut parts = cookie.trim().splitn(2, '=');
        let name = parts.next()?.trim();
        let value = parts.next()?.trim();
        (name == cookie_name).then_some(value)
    })
}

/// Whether the header carries a non-empty access token
#[must_use]
pub fn has_access_token(cookie_header: Option<&str>) -> bool {
    cookie_header
        .and_then(|header| find_cookie(header, ACCESS_TOKEN_COOKIE))
        .is_some_and(|value| !value.is_empty())
}
