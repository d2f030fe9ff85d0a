//! HTTP Basic-auth guard for the admin endpoints.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use makan_core::store::DirectoryStore;

use crate::{AppState, error::Error};

/// The single administrator account.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Zero-size marker: present in the handler means the request was authenticated.
pub struct Admin;

/// Check `Authorization: Basic` credentials against `config`.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<(), Error> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  if username != config.username {
    return Err(Error::Unauthorized);
  }

  let parsed_hash =
    PasswordHash::new(&config.password_hash).map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)?;

  Ok(())
}

impl<S> FromRequestParts<AppState<S>> for Admin
where
  S: DirectoryStore + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_auth(&parts.headers, &state.auth)?;
    Ok(Admin)
  }
}

#[cfg(test)]
mod tests {
  use axum::http::{HeaderValue, header};

  use super::*;
  use crate::tests::{basic, hash};

  fn config() -> AuthConfig {
    AuthConfig {
      username:      "admin".to_string(),
      password_hash: hash("secret"),
    }
  }

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    h
  }

  #[test]
  fn correct_credentials() {
    assert!(verify_auth(&headers(&basic("admin", "secret")), &config()).is_ok());
  }

  #[test]
  fn wrong_password() {
    assert!(matches!(
      verify_auth(&headers(&basic("admin", "wrong")), &config()),
      Err(Error::Unauthorized)
    ));
  }

  #[test]
  fn wrong_username() {
    assert!(matches!(
      verify_auth(&headers(&basic("root", "secret")), &config()),
      Err(Error::Unauthorized)
    ));
  }

  #[test]
  fn missing_header() {
    assert!(matches!(
      verify_auth(&HeaderMap::new(), &config()),
      Err(Error::Unauthorized)
    ));
  }

  #[test]
  fn invalid_base64() {
    assert!(matches!(
      verify_auth(&headers("Basic !!!not-base64!!!"), &config()),
      Err(Error::Unauthorized)
    ));
  }
}
