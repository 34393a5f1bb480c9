pub const REFRESH_COOKIE_NAME: &str = "refresh_token";

pub fn build_refresh_cookie(
    raw_token: &str,
    max_age_secs: u64,
    cookie_domain: &Option<String>,
    secure: bool,
) -> String {
    let secure_flag = if secure { "; Secure" } else { "" };
    let same_site = if secure { "Strict" } else { "Lax" };

    let mut cookie = format!(
        "{}={}; HttpOnly{}; SameSite={}; Path=/auth; Max-Age={}",
        REFRESH_COOKIE_NAME, raw_token, secure_flag, same_site, max_age_secs
    );

    if let Some(domain) = cookie_domain {
        cookie.push_str(&format!("; Domain={}", domain));
    }

    cookie
}

pub fn build_clear_cookie(cookie_domain: &Option<String>, secure: bool) -> String {
    build_refresh_cookie("", 0, cookie_domain, secure)
}

pub fn extract_refresh_token(cookie_header: &str) -> Option<String> {
    let prefix = format!("{}=", REFRESH_COOKIE_NAME);
    cookie_header
        .split(';')
        .filter_map(|part| part.trim().strip_prefix(prefix.as_str()))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}
