//! Client model types
//!
//! Wire shapes shared by both API generations, plus the modern response envelope.

use serde::{Deserialize, Serialize};

/// A single configuration entry as returned by listing
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigItem {
    pub data_id: String,
    pub group: String,
    /// Modern servers report the group under this name instead
    pub group_name: String,
    #[serde(alias = "namespaceId")]
    pub tenant: String,
    pub content: String,
    pub r#type: String,
}

impl ConfigItem {
    /// The group, whichever field name the server used
    pub fn group(&self) -> &str {
        if self.group.is_empty() {
            &self.group_name
        } else {
            &self.group
        }
    }
}

/// Paginated config listing, in server order
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPage {
    pub total_count: u64,
    pub page_number: u64,
    pub pages_available: u64,
    pub page_items: Vec<ConfigItem>,
}

/// Modern API response wrapper; `code == 0` means success
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// Login response body, identical for both generations
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct LoginResponse {
    pub access_token: Option<String>,
    /// Kept raw: a malformed TTL must not reject an otherwise valid token
    pub token_ttl: Option<serde_json::Value>,
}

impl LoginResponse {
    /// TTL in seconds, when the server sent a number
    pub fn ttl_secs(&self) -> Option<f64> {
        self.token_ttl.as_ref().and_then(serde_json::Value::as_f64)
    }
}

/// Listing match mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchMode {
    /// Server-side wildcard matching
    Blur,
    Accurate,
}

impl SearchMode {
    /// Fuzzy when either pattern carries a wildcard
    pub fn for_patterns(data_id: &str, group: &str) -> Self {
        if data_id.contains(crate::constants::WILDCARD) || group.contains(crate::constants::WILDCARD)
        {
            Self::Blur
        } else {
            Self::Accurate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blur => "blur",
            Self::Accurate => "accurate",
        }
    }
}
