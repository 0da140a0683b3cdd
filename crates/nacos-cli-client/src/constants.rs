// Nacos open API paths and wire-level names

pub mod api_path {
    // Auth
    pub const AUTH_LOGIN_V3: &str = "/nacos/v3/auth/login";
    pub const AUTH_LOGIN_V1: &str = "/nacos/v1/auth/login";

    // Config
    pub const CONFIG_LIST_V3: &str = "/nacos/v3/admin/cs/config/list";
    pub const CONFIGS_V3: &str = "/nacos/v3/cs/configs";
    pub const CONFIGS_V1: &str = "/nacos/v1/cs/configs";
}

pub mod header {
    pub const TIMESTAMP: &str = "timeStamp";
    pub const SPAS_ACCESS_KEY: &str = "Spas-AccessKey";
    pub const SPAS_SIGNATURE: &str = "Spas-Signature";
}

/// Namespace used when none is configured
pub const DEFAULT_NAMESPACE: &str = "public";

/// Group used by the CLI when none is given
pub const DEFAULT_GROUP: &str = "DEFAULT_GROUP";

/// Query parameter / form field carrying the token on legacy calls
pub const ACCESS_TOKEN_PARAM: &str = "accessToken";

/// Refresh the token when it expires within this many seconds
pub const TOKEN_REFRESH_MARGIN_SECS: u64 = 5;

/// Pattern character that switches listing into fuzzy search
pub const WILDCARD: char = '*';

/// Exact body the server answers a successful publish with
pub const PUBLISH_OK_BODY: &str = "true";
