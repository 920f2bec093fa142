use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::config::SessionConfig;

/// Random bytes behind a session token.
const TOKEN_BYTES: usize = 32;

/// Generate an unguessable opaque session token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Record a new session for the account and return its token.
pub async fn create(db: &PgPool, user_id: Uuid) -> sqlx::Result<String> {
    let token = generate_token();
    sqlx::query("INSERT INTO sessions (token, user_id) VALUES ($1, $2)")
        .bind(&token)
        .bind(user_id)
        .execute(db)
        .await?;
    debug!(user_id = %user_id, "session created");
    Ok(token)
}

/// Look up the account a token belongs to. Unknown tokens resolve to `None`.
pub async fn resolve(db: &PgPool, token: &str) -> sqlx::Result<Option<Uuid>> {
    let row: Option<(Uuid,)> = sqlx::query_as("SELECT user_id FROM sessions WHERE token = $1")
        .bind(token)
        .fetch_optional(db)
        .await?;
    Ok(row.map(|(user_id,)| user_id))
}

/// Remove a session. Removing an absent token is not an error.
pub async fn destroy(db: &PgPool, token: &str) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(db)
        .await?;
    Ok(())
}

/// Build the `Set-Cookie` value carrying a session token.
pub fn session_cookie(cfg: &SessionConfig, token: &str) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        cfg.cookie_name, token
    );
    if cfg.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the `Set-Cookie` value that clears the session cookie.
pub fn clear_session_cookie(cfg: &SessionConfig) -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        cfg.cookie_name
    )
}

/// Pull the session token out of a `Cookie` header value.
pub fn token_from_cookie_header<'a>(header: &'a str, cookie_name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == cookie_name && !value.is_empty()).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(secure: bool) -> SessionConfig {
        SessionConfig {
            cookie_name: "qr_session".into(),
            cookie_secure: secure,
        }
    }

    #[test]
    fn tokens_are_long_and_distinct() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        // 32 bytes of entropy, base64url without padding
        assert_eq!(a.len(), 43);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn cookie_carries_token_and_attributes() {
        let cookie = session_cookie(&test_config(false), "tok123");
        assert!(cookie.starts_with("qr_session=tok123;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(!cookie.contains("Secure"));

        let secure = session_cookie(&test_config(true), "tok123");
        assert!(secure.ends_with("Secure"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cookie = clear_session_cookie(&test_config(false));
        assert!(cookie.starts_with("qr_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn token_round_trips_through_cookie_header() {
        let cfg = test_config(false);
        let token = generate_token();
        let header = session_cookie(&cfg, &token);
        // A client echoes back only the name=value pair
        let pair = header.split(';').next().unwrap();
        assert_eq!(token_from_cookie_header(pair, "qr_session"), Some(token.as_str()));
    }

    #[test]
    fn token_is_found_among_other_cookies() {
        let header = "theme=dark; qr_session=abc123; lang=en";
        assert_eq!(token_from_cookie_header(header, "qr_session"), Some("abc123"));
    }

    #[test]
    fn missing_or_empty_cookie_yields_none() {
        assert_eq!(token_from_cookie_header("theme=dark", "qr_session"), None);
        assert_eq!(token_from_cookie_header("qr_session=", "qr_session"), None);
        assert_eq!(token_from_cookie_header("", "qr_session"), None);
    }
}
