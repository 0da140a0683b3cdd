//! Command line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nacos_cli_client::AuthType;
use nacos_cli_client::constants::DEFAULT_GROUP;

/// Nacos CLI - manage Nacos configurations from the command line
#[derive(Debug, Parser)]
#[command(name = "nacos-cli", version)]
pub struct Cli {
    /// Nacos server address (host:port or URL)
    #[arg(short = 's', long = "server")]
    pub server_addr: Option<String>,
    /// Namespace ID
    #[arg(short = 'n', long = "namespace")]
    pub namespace: Option<String>,
    #[arg(short = 'u', long)]
    pub username: Option<String>,
    #[arg(short = 'p', long)]
    pub password: Option<String>,
    /// Access key for signed (aliyun) authentication
    #[arg(long)]
    pub access_key: Option<String>,
    #[arg(long)]
    pub secret_key: Option<String>,
    /// Authentication scheme: nacos or aliyun (inferred when omitted)
    #[arg(long)]
    pub auth_type: Option<AuthType>,
    /// Settings file (default: ~/.nacos-cli/config.toml)
    #[arg(short = 'c', long = "config")]
    pub config_file: Option<PathBuf>,
    /// Log filter directive, e.g. `debug` or `nacos_cli_client=trace`
    #[arg(long, env = "NACOS_CLI_LOG", default_value = "warn")]
    pub log_level: String,
    /// Also write daily-rotated logs into this directory
    #[arg(long, env = "NACOS_CLI_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List configurations; `*` in a pattern enables fuzzy search
    List {
        #[arg(short = 'd', long, default_value = "")]
        data_id: String,
        #[arg(short = 'g', long, default_value = "")]
        group: String,
        /// Namespace to list instead of the session namespace
        #[arg(long = "namespace", default_value = "")]
        namespace: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        size: u32,
        /// Print the raw page as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the content of a configuration
    Get {
        data_id: String,
        #[arg(short = 'g', long, default_value = DEFAULT_GROUP)]
        group: String,
    },
    /// Publish a configuration from a string or a file
    Publish {
        data_id: String,
        #[arg(short = 'g', long, default_value = DEFAULT_GROUP)]
        group: String,
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        content: Option<String>,
        #[arg(short = 'f', long)]
        file: Option<PathBuf>,
    },
    /// Poll a configuration and print it whenever it changes
    Watch {
        data_id: String,
        #[arg(short = 'g', long, default_value = DEFAULT_GROUP)]
        group: String,
        /// Poll interval in seconds
        #[arg(long, default_value_t = 5)]
        interval: u64,
    },
}
