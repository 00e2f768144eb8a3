//! Session cookie codec: parsing the raw `Cookie` header and producing
//! `Set-Cookie` values for the `sid` cookie.

use axum::http::{HeaderMap, HeaderValue};

pub const SESSION_COOKIE: &str = "sid";

/// Extract a named cookie from the raw header. Pairs are split on `;`, the
/// first `=` splits key from value, and the value is URL-decoded. Malformed
/// pairs are skipped.
pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie = headers.get("cookie")?;
    let s = cookie.to_str().ok()?;
    for part in s.split(';') {
        let p = part.trim();
        if let Some(eq) = p.find('=') {
            let (k, v) = p.split_at(eq);
            if k == name {
                let raw = &v[1..];
                return Some(
                    urlencoding::decode(raw)
                        .map(|c| c.into_owned())
                        .unwrap_or_else(|_| raw.to_string()),
                );
            }
        }
    }
    None
}

pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    parse_cookie(headers, SESSION_COOKIE)
}

/// `Set-Cookie` value binding the session id. Session cookie: no expiry
/// attribute, so it lives until browser exit or explicit clear.
pub fn session_cookie(session_id: &str) -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax",
        SESSION_COOKIE,
        urlencoding::encode(session_id)
    ))
    .unwrap()
}

/// `Set-Cookie` value that clears the session cookie.
pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    ))
    .unwrap()
}
