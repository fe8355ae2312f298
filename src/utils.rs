use reqwest::header::{HeaderMap, SET_COOKIE};
use uuid::Uuid;

/// Generates a fresh device identifier: an upper-case v4 UUID, the same
/// layout as the app's built-in id `EFF75587-5CB7-432B-BB59-639820DFD2DD`.
///
/// A new identifier looks like an unknown device to the server and will
/// usually trigger a two-factor challenge on the first login.
pub fn generate_device_id() -> String {
    Uuid::new_v4().to_string().to_uppercase()
}

/// Finds the value of cookie `name` across all `Set-Cookie` headers.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|set_cookie| cookie_value(set_cookie, name))
}

/// Returns the value of one `Set-Cookie` line if the cookie it sets is
/// `name`.
///
/// Only the leading `name=value` pair is considered; attributes such as
/// `Path` or `Expires` never match. Surrounding quotes are stripped and an
/// empty value counts as absent.
pub fn cookie_value(set_cookie: &str, name: &str) -> Option<String> {
    let pair = set_cookie.split(';').next()?;
    let (key, value) = pair.split_once('=')?;
    if key.trim() != name {
        return None;
    }
    let value = value.trim().trim_matches('"');
    (!value.is_empty()).then(|| value.to_string())
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
