//! Credential management
//!
//! Username/password sessions log in over HTTP, cache the access token with its
//! server-reported TTL, and refresh it lazily before the next request.
//! Access-key sessions hold no token at all; each request is signed instead.

use std::time::{Duration, Instant};

use parking_lot::RwLock;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::constants::{TOKEN_REFRESH_MARGIN_SECS, api_path};
use crate::error::{ClientError, Result};
use crate::model::LoginResponse;
use crate::negotiate::{ApiGeneration, VersionNegotiator};
use crate::sign::{self, SignedHeaders};

/// Credential material, one variant per auth scheme
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    UsernamePassword { username: String, password: String },
    AccessKey { access_key: String, secret_key: String },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UsernamePassword { username, .. } => f
                .debug_struct("UsernamePassword")
                .field("username", username)
                .finish_non_exhaustive(),
            Self::AccessKey { access_key, .. } => f
                .debug_struct("AccessKey")
                .field("access_key", access_key)
                .finish_non_exhaustive(),
        }
    }
}

/// Cached token info
#[derive(Clone, Debug)]
struct TokenInfo {
    access_token: String,
    /// `None` when the server reported no positive TTL
    expires_at: Option<Instant>,
}

impl TokenInfo {
    fn is_fresh(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires_at) => now + Duration::from_secs(TOKEN_REFRESH_MARGIN_SECS) < expires_at,
            None => true,
        }
    }
}

/// Token-based authentication state
pub struct TokenAuth {
    username: String,
    password: String,
    token: RwLock<Option<TokenInfo>>,
}

/// Access-key pair used for request signing
pub struct KeyPairAuth {
    access_key: String,
    secret_key: String,
}

/// Authentication attached to one outgoing request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestAuth {
    None,
    Token(String),
    Signed(SignedHeaders),
}

/// Owns the authentication state of a client session
pub enum CredentialManager {
    Token(TokenAuth),
    KeyPair(KeyPairAuth),
}

impl CredentialManager {
    pub fn new(credentials: Credentials) -> Self {
        match credentials {
            Credentials::UsernamePassword { username, password } => Self::Token(TokenAuth {
                username,
                password,
                token: RwLock::new(None),
            }),
            Credentials::AccessKey {
                access_key,
                secret_key,
            } => Self::KeyPair(KeyPairAuth {
                access_key,
                secret_key,
            }),
        }
    }

    pub fn is_key_pair(&self) -> bool {
        matches!(self, Self::KeyPair(_))
    }

    /// Make sure a usable credential exists before a request goes out.
    ///
    /// Key-pair sessions always pass. Token sessions log in when no token is
    /// held or when the recorded expiry falls within the refresh margin.
    /// Concurrent callers may both log in; the last token stored wins.
    pub async fn ensure_valid(
        &self,
        http: &Client,
        base_url: &str,
        negotiator: &VersionNegotiator,
    ) -> Result<()> {
        match self {
            Self::KeyPair(_) => Ok(()),
            Self::Token(auth) => {
                if auth.current_token().is_some() {
                    return Ok(());
                }
                debug!("No valid token held, logging in");
                auth.login(http, base_url, negotiator).await
            }
        }
    }

    /// Authentication for a request scoped to `tenant` and `group`.
    ///
    /// Attaches whatever token is held; freshness is `ensure_valid`'s job.
    pub fn request_auth(&self, tenant: &str, group: &str) -> RequestAuth {
        match self {
            Self::Token(_) => self
                .access_token()
                .map(RequestAuth::Token)
                .unwrap_or(RequestAuth::None),
            Self::KeyPair(pair) => {
                if pair.access_key.is_empty() || pair.secret_key.is_empty() {
                    return RequestAuth::None;
                }
                RequestAuth::Signed(sign::signed_headers(
                    &pair.access_key,
                    &pair.secret_key,
                    tenant,
                    group,
                    chrono::Utc::now().timestamp_millis(),
                ))
            }
        }
    }

    /// The cached access token, if any (token sessions only)
    pub fn access_token(&self) -> Option<String> {
        match self {
            Self::Token(auth) => auth.token.read().as_ref().map(|t| t.access_token.clone()),
            Self::KeyPair(_) => None,
        }
    }

    /// Time left until the cached token expires, if an expiry is tracked
    pub fn token_expires_in(&self) -> Option<Duration> {
        match self {
            Self::Token(auth) => auth
                .token
                .read()
                .as_ref()
                .and_then(|t| t.expires_at)
                .map(|at| at.saturating_duration_since(Instant::now())),
            Self::KeyPair(_) => None,
        }
    }
}

impl TokenAuth {
    fn current_token(&self) -> Option<String> {
        let now = Instant::now();
        self.token
            .read()
            .as_ref()
            .filter(|t| t.is_fresh(now))
            .map(|t| t.access_token.clone())
    }

    /// Log in, trying v3 first unless the generation is already fixed to v1.
    ///
    /// Any v3 failure falls back to v1 while the generation is unresolved;
    /// once fixed, failures surface without fallback.
    async fn login(
        &self,
        http: &Client,
        base_url: &str,
        negotiator: &VersionNegotiator,
    ) -> Result<()> {
        let fixed = negotiator.resolved_generation();

        if fixed != ApiGeneration::Legacy {
            let url = format!("{}{}", base_url, api_path::AUTH_LOGIN_V3);
            match self.try_login(http, &url).await {
                Ok(info) => {
                    self.store(info);
                    negotiator.resolve(ApiGeneration::Modern);
                    return Ok(());
                }
                Err(e) if fixed == ApiGeneration::Modern => return Err(e),
                Err(e) => warn!("v3 login failed, falling back to v1: {}", e),
            }
        }

        let url = format!("{}{}", base_url, api_path::AUTH_LOGIN_V1);
        let info = self.try_login(http, &url).await?;
        self.store(info);
        negotiator.resolve(ApiGeneration::Legacy);
        Ok(())
    }

    async fn try_login(&self, http: &Client, url: &str) -> Result<TokenInfo> {
        debug!("Authenticating with server: {}", url);

        let response = http
            .post(url)
            .form(&[
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ClientError::AuthFailed(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::AuthFailed(format!("failed to read login response: {}", e)))?;

        if status != StatusCode::OK {
            return Err(ClientError::AuthFailed(format!(
                "login failed: status={}, body={}",
                status.as_u16(),
                body
            )));
        }

        let login: LoginResponse = serde_json::from_str(&body).unwrap_or_default();
        let ttl = login.ttl_secs();
        let access_token = login
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ClientError::AuthFailed("accessToken not found in login response".to_string())
            })?;

        let expires_at = ttl.and_then(expiry_from_ttl);

        debug!("Authentication successful, token ttl: {:?}", ttl);
        Ok(TokenInfo {
            access_token,
            expires_at,
        })
    }

    fn store(&self, info: TokenInfo) {
        *self.token.write() = Some(info);
    }
}

/// Whole seconds from now; `None` for a TTL under one second or one too
/// large to represent, both of which mean the token never expires.
fn expiry_from_ttl(ttl_secs: f64) -> Option<Instant> {
    if ttl_secs.is_nan() || ttl_secs < 1.0 {
        return None;
    }
    let ttl = Duration::try_from_secs_f64(ttl_secs.trunc()).ok()?;
    Instant::now().checked_add(ttl)
}
