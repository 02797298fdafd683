use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

/// Name of the cookie that carries the session token.
pub const SESSION_COOKIE: &str = "jwt";

/// Value written over the session cookie on logout. Never verifies as a token.
pub const LOGGED_OUT: &str = "loggedout";

const LOGOUT_LIFETIME_SECONDS: i64 = 10;

/// Attributes of the session cookie.
#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    pub lifetime: Duration,
    pub secure: bool,
}

impl CookieSettings {
    pub fn new(lifetime: Duration, secure: bool) -> Self {
        Self { lifetime, secure }
    }

    /// `Set-Cookie` value carrying a freshly issued token.
    pub fn session_cookie(&self, token: &str) -> String {
        build_cookie(token, Utc::now(), self.lifetime, self.secure)
    }

    /// `Set-Cookie` value that overwrites the token with a short-lived placeholder.
    pub fn logout_cookie(&self) -> String {
        build_cookie(
            LOGGED_OUT,
            Utc::now(),
            Duration::seconds(LOGOUT_LIFETIME_SECONDS),
            self.secure,
        )
    }
}

fn build_cookie(value: &str, now: DateTime<Utc>, lifetime: Duration, secure: bool) -> String {
    let expires = now + lifetime;
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; Expires={}; Max-Age={}",
        SESSION_COOKIE,
        value,
        expires.format("%a, %d %b %Y %H:%M:%S GMT"),
        lifetime.num_seconds().max(0),
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Find a cookie value in a `Cookie` request header.
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}
