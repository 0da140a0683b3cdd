//! Layered CLI settings
//!
//! Precedence, lowest first: built-in defaults, the settings file, `NACOS_CLI_*`
//! environment variables, command line flags.

use std::path::PathBuf;

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use nacos_cli_client::{AuthType, ClientConfig};
use serde::Deserialize;

use crate::cli::Cli;

const ENV_PREFIX: &str = "NACOS_CLI";

#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub server_addr: String,
    pub namespace: String,
    pub auth_type: Option<AuthType>,
    pub username: String,
    pub password: String,
    pub access_key: String,
    pub secret_key: String,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
}

impl Settings {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let defaults = ClientConfig::default();
        let mut builder = Config::builder()
            .set_default("server_addr", defaults.server_addr)?
            .set_default("namespace", defaults.namespace)?
            .set_default("username", "nacos")?
            .set_default("password", "nacos")?
            .set_default("access_key", "")?
            .set_default("secret_key", "")?
            .set_default("connect_timeout_ms", defaults.connect_timeout_ms)?
            .set_default("read_timeout_ms", defaults.read_timeout_ms)?;

        // An explicit --config must exist; the default location is optional.
        // Always TOML, whatever the file is named.
        match &cli.config_file {
            Some(path) => builder = builder.add_source(settings_file(path.clone()).required(true)),
            None => {
                if let Some(path) = default_settings_path() {
                    builder = builder.add_source(settings_file(path).required(false));
                }
            }
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .set_override_option("server_addr", cli.server_addr.clone())?
            .set_override_option("namespace", cli.namespace.clone())?
            .set_override_option("username", cli.username.clone())?
            .set_override_option("password", cli.password.clone())?
            .set_override_option("access_key", cli.access_key.clone())?
            .set_override_option("secret_key", cli.secret_key.clone())?
            .set_override_option("auth_type", cli.auth_type.map(|t| t.to_string()))?
            .build()
            .context("failed to load settings")?;

        settings
            .try_deserialize()
            .context("invalid settings")
    }

    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(&self.server_addr)
            .with_namespace(&self.namespace)
            .with_auth(&self.username, &self.password)
            .with_access_key(&self.access_key, &self.secret_key)
            .with_timeouts(self.connect_timeout_ms, self.read_timeout_ms);
        match self.auth_type {
            Some(auth_type) => config.with_auth_type(auth_type),
            None => config,
        }
    }
}

fn settings_file(path: PathBuf) -> File<config::FileSourceFile, FileFormat> {
    File::from(path).format(FileFormat::Toml)
}

fn default_settings_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".nacos-cli").join("config.toml"))
}
