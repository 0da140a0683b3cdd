//! Client configuration
//!
//! Connection, namespace, and credential settings for [`NacosClient`](crate::NacosClient).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::auth::Credentials;

/// Authentication scheme spoken to the server
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// Username/password login yielding a short-lived access token
    Nacos,
    /// Long-lived access key / secret key, every request signed
    Aliyun,
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nacos => f.write_str("nacos"),
            Self::Aliyun => f.write_str("aliyun"),
        }
    }
}

impl FromStr for AuthType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nacos" => Ok(Self::Nacos),
            "aliyun" => Ok(Self::Aliyun),
            other => Err(format!("unknown auth type '{}', expected nacos or aliyun", other)),
        }
    }
}

/// Configuration for the Nacos client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Server address, `host:port` or a full `http(s)://` URL
    pub server_addr: String,
    /// Namespace ID; empty means the default namespace
    pub namespace: String,
    /// Explicit auth scheme; inferred from the credentials when unset
    pub auth_type: Option<AuthType>,
    pub username: String,
    pub password: String,
    pub access_key: String,
    pub secret_key: String,
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Read timeout in milliseconds
    pub read_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:8848".to_string(),
            namespace: String::new(),
            auth_type: None,
            username: String::new(),
            password: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            connect_timeout_ms: 5000,
            read_timeout_ms: 30000,
        }
    }
}

impl ClientConfig {
    /// Create a new config for a single server address
    pub fn new(server_addr: &str) -> Self {
        Self {
            server_addr: server_addr.to_string(),
            ..Default::default()
        }
    }

    /// Set the namespace
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    /// Set username/password credentials
    pub fn with_auth(mut self, username: &str, password: &str) -> Self {
        self.username = username.to_string();
        self.password = password.to_string();
        self
    }

    /// Set access key / secret key credentials
    pub fn with_access_key(mut self, access_key: &str, secret_key: &str) -> Self {
        self.access_key = access_key.to_string();
        self.secret_key = secret_key.to_string();
        self
    }

    /// Force an auth scheme instead of inferring it
    pub fn with_auth_type(mut self, auth_type: AuthType) -> Self {
        self.auth_type = Some(auth_type);
        self
    }

    /// Set timeouts
    pub fn with_timeouts(mut self, connect_ms: u64, read_ms: u64) -> Self {
        self.connect_timeout_ms = connect_ms;
        self.read_timeout_ms = read_ms;
        self
    }

    /// The auth scheme in effect: the explicit one, or `Aliyun` when both keys
    /// are present, otherwise `Nacos`.
    pub fn effective_auth_type(&self) -> AuthType {
        match self.auth_type {
            Some(auth_type) => auth_type,
            None if !self.access_key.is_empty() && !self.secret_key.is_empty() => {
                AuthType::Aliyun
            }
            None => AuthType::Nacos,
        }
    }

    pub(crate) fn credentials(&self) -> Credentials {
        match self.effective_auth_type() {
            AuthType::Nacos => Credentials::UsernamePassword {
                username: self.username.clone(),
                password: self.password.clone(),
            },
            AuthType::Aliyun => Credentials::AccessKey {
                access_key: self.access_key.clone(),
                secret_key: self.secret_key.clone(),
            },
        }
    }

    /// Base URL with scheme and without a trailing slash
    pub(crate) fn base_url(&self) -> String {
        let addr = self.server_addr.trim().trim_end_matches('/');
        if addr.starts_with("http://") || addr.starts_with("https://") {
            addr.to_string()
        } else {
            format!("http://{}", addr)
        }
    }
}
