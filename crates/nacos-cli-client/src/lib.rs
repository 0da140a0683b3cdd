//! Nacos CLI client - HTTP protocol adapter for the Nacos config center
//!
//! This crate provides:
//! - Username/password login with lazy token refresh
//! - Access-key/secret-key request signing (SPAS)
//! - Sticky negotiation between the v3 and v1 HTTP APIs
//! - Config list, get, and publish with normalized responses
//! - A polling watcher that reports config changes

pub mod auth;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod negotiate;
pub mod sign;
pub mod watch;

pub use auth::Credentials;
pub use client::NacosClient;
pub use config::{AuthType, ClientConfig};
pub use error::{ClientError, ErrorKind, Result};
pub use model::{ConfigItem, ConfigPage, SearchMode};
pub use negotiate::ApiGeneration;
pub use watch::{ConfigChange, ConfigChangeListener, ConfigWatcher};
