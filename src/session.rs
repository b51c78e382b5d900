//! Session store
//!
//! The session is an explicit value handed to the API client. Between
//! requests it lives in two browser cookies, `access_token` and `user_id`,
//! set on login and expired on logout.

use crate::config::Config;
use crate::types::LoginResponse;

pub const TOKEN_KEY: &str = "access_token";
pub const USER_ID_KEY: &str = "user_id";

/// Authenticated user session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub user_id: Option<String>,
}

impl Session {
    pub fn new(access_token: impl Into<String>, user_id: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            user_id: user_id.filter(|id| !id.is_empty()),
        }
    }

    /// Build a session from a login response; `None` without an access token
    pub fn from_login(response: &LoginResponse) -> Option<Self> {
        let token = response.access_token.as_deref().filter(|t| !t.is_empty())?;
        let user_id = response.data.as_ref().and_then(|d| d.user_id.clone());
        Some(Self::new(token, user_id))
    }

    /// Read the session from a `Cookie` request header
    pub fn from_cookie_header(header: &str) -> Option<Self> {
        let mut token = None;
        let mut user_id = None;

        for pair in header.split(';') {
            let Some((name, value)) = pair.trim().split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"');
            match name.trim() {
                TOKEN_KEY => token = Some(value.to_string()),
                USER_ID_KEY => user_id = Some(value.to_string()),
                _ => {}
            }
        }

        token
            .filter(|t| !t.is_empty())
            .map(|t| Self::new(t, user_id))
    }

    /// `Set-Cookie` values persisting this session
    pub fn set_cookie_headers(&self, config: &Config) -> Vec<String> {
        let max_age = config.session_max_age_seconds;
        let mut headers = vec![cookie(TOKEN_KEY, &self.access_token, max_age, config.secure_cookies)];
        match &self.user_id {
            Some(id) => headers.push(cookie(USER_ID_KEY, id, max_age, config.secure_cookies)),
            None => headers.push(cookie(USER_ID_KEY, "", 0, config.secure_cookies)),
        }
        headers
    }

    /// `Set-Cookie` values removing both session keys
    pub fn clear_cookie_headers(config: &Config) -> Vec<String> {
        vec![
            cookie(TOKEN_KEY, "", 0, config.secure_cookies),
            cookie(USER_ID_KEY, "", 0, config.secure_cookies),
        ]
    }
}

fn cookie(name: &str, value: &str, max_age: u64, secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!("{name}={value}; Path=/; Max-Age={max_age}; HttpOnly; SameSite=Lax{secure}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LoginUser;

    #[test]
    fn test_parse_cookie_header() {
        let session = Session::from_cookie_header("theme=dark; access_token=abc.def; user_id=42").unwrap();
        assert_eq!(session.access_token, "abc.def");
        assert_eq!(session.user_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_missing_or_empty_token_is_logged_out() {
        assert!(Session::from_cookie_header("").is_none());
        assert!(Session::from_cookie_header("user_id=42").is_none());
        assert!(Session::from_cookie_header("access_token=; user_id=42").is_none());
    }

    #[test]
    fn test_empty_user_id_dropped() {
        let session = Session::from_cookie_header("access_token=tok; user_id=").unwrap();
        assert!(session.user_id.is_none());
    }

    #[test]
    fn test_from_login() {
        let response = LoginResponse {
            access_token: Some("tok".to_string()),
            data: Some(LoginUser { user_id: Some("u-1".to_string()) }),
        };
        let session = Session::from_login(&response).unwrap();
        assert_eq!(session, Session::new("tok", Some("u-1".to_string())));

        let no_token = LoginResponse { access_token: None, data: None };
        assert!(Session::from_login(&no_token).is_none());
    }

    #[test]
    fn test_cookie_round_trip_and_clear() {
        let config = Config { secure_cookies: false, ..Config::default() };
        let session = Session::new("tok", Some("9".to_string()));

        let set = session.set_cookie_headers(&config);
        assert_eq!(set.len(), 2);
        assert!(set[0].starts_with("access_token=tok;"));
        assert!(set[0].contains("Max-Age=86400"));
        assert!(!set[0].contains("Secure"));

        let header: Vec<&str> = set.iter().filter_map(|c| c.split(';').next()).collect();
        assert_eq!(Session::from_cookie_header(&header.join("; ")), Some(session));

        let cleared = Session::clear_cookie_headers(&Config::default());
        assert!(cleared.iter().all(|c| c.contains("Max-Age=0") && c.contains("Secure")));
    }
}
