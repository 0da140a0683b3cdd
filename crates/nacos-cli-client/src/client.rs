//! Nacos config client
//!
//! The single call surface used by the CLI and the watcher: list, get, and
//! publish. Each call validates credentials first, then targets whichever API
//! generation the session has committed to, and normalizes the response into
//! [`ConfigPage`] / `String` / `()`.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use crate::auth::{CredentialManager, RequestAuth};
use crate::config::{AuthType, ClientConfig};
use crate::constants::{ACCESS_TOKEN_PARAM, DEFAULT_NAMESPACE, PUBLISH_OK_BODY, api_path, header};
use crate::error::{ClientError, Result};
use crate::model::{ApiResponse, ConfigPage, SearchMode};
use crate::negotiate::{ApiGeneration, VersionNegotiator};

/// HTTP client session for one Nacos server and namespace
pub struct NacosClient {
    http: Client,
    base_url: String,
    namespace: String,
    auth_type: AuthType,
    credentials: CredentialManager,
    negotiator: VersionNegotiator,
}

impl NacosClient {
    /// Create a client without logging in. The first call logs in on demand.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.base_url();
        url::Url::parse(&base_url)
            .map_err(|e| ClientError::InvalidConfig(format!("server address '{}': {}", base_url, e)))?;

        let http = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        let namespace = if config.namespace.is_empty() {
            DEFAULT_NAMESPACE.to_string()
        } else {
            config.namespace.clone()
        };

        Ok(Self {
            http,
            base_url,
            namespace,
            auth_type: config.effective_auth_type(),
            credentials: CredentialManager::new(config.credentials()),
            negotiator: VersionNegotiator::new(),
        })
    }

    /// Create a client and try to log in right away.
    ///
    /// A failed login is only logged: the server may not be reachable yet, and
    /// every call retries the login before it proceeds.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let client = Self::new(config)?;
        if let Err(e) = client.ensure_authenticated().await {
            warn!("Initial login failed (will retry on demand): {}", e);
        }
        Ok(client)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn auth_type(&self) -> AuthType {
        self.auth_type
    }

    pub fn resolved_generation(&self) -> ApiGeneration {
        self.negotiator.resolved_generation()
    }

    pub fn access_token(&self) -> Option<String> {
        self.credentials.access_token()
    }

    pub fn token_expires_in(&self) -> Option<Duration> {
        self.credentials.token_expires_in()
    }

    /// Log in if the session holds no usable token. No-op for key-pair sessions.
    pub async fn ensure_authenticated(&self) -> Result<()> {
        self.credentials
            .ensure_valid(&self.http, &self.base_url, &self.negotiator)
            .await
    }

    /// List configs matching `data_id` / `group`. A `*` in either pattern
    /// switches to fuzzy search. An empty `namespace` means the session's own.
    pub async fn list_configs(
        &self,
        data_id: &str,
        group: &str,
        namespace: &str,
        page_no: u32,
        page_size: u32,
    ) -> Result<ConfigPage> {
        self.ensure_authenticated().await?;

        let namespace = if namespace.is_empty() {
            self.namespace.as_str()
        } else {
            namespace
        };
        let search = SearchMode::for_patterns(data_id, group);
        let query = ListQuery {
            data_id,
            group,
            namespace,
            page_no,
            page_size,
            search,
        };

        self.negotiated(
            || self.list_configs_v3(&query),
            || self.list_configs_v1(&query),
        )
        .await
    }

    /// Fetch the raw content of one config. Always uses the v1 endpoint; its
    /// shape is the same on every server generation.
    pub async fn get_config(&self, data_id: &str, group: &str) -> Result<String> {
        self.ensure_authenticated().await?;

        let auth = self.credentials.request_auth(&self.namespace, group);
        let mut params = vec![
            ("dataId", data_id.to_string()),
            ("group", group.to_string()),
            ("tenant", self.namespace.clone()),
        ];
        push_token(&mut params, &auth);

        let url = self.url(api_path::CONFIGS_V1);
        debug!("GET {} dataId={} group={}", url, data_id, group);
        let request = apply_signature(self.http.get(&url).query(&params), &auth);
        let (status, body) = read_body(request.send().await?).await?;

        if status != StatusCode::OK {
            return Err(ClientError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    /// Publish `content`. Succeeds only on HTTP 200 with a body of exactly `true`.
    pub async fn publish_config(&self, data_id: &str, group: &str, content: &str) -> Result<()> {
        self.ensure_authenticated().await?;

        self.negotiated(
            || self.publish_to(api_path::CONFIGS_V3, data_id, group, content),
            || self.publish_to(api_path::CONFIGS_V1, data_id, group, content),
        )
        .await
    }

    /// Run `modern` or `legacy` according to the resolved generation.
    ///
    /// While unresolved (key-pair sessions before their first success), try
    /// modern and fall back to legacy only when the endpoint does not exist.
    /// The first success fixes the generation.
    async fn negotiated<T, M, MF, L, LF>(&self, modern: M, legacy: L) -> Result<T>
    where
        M: FnOnce() -> MF,
        MF: Future<Output = Result<T>>,
        L: FnOnce() -> LF,
        LF: Future<Output = Result<T>>,
    {
        match self.negotiator.resolved_generation() {
            ApiGeneration::Modern => modern().await,
            ApiGeneration::Legacy => legacy().await,
            ApiGeneration::Unresolved => match modern().await {
                Ok(value) => {
                    self.negotiator.resolve(ApiGeneration::Modern);
                    Ok(value)
                }
                Err(e) if e.is_not_found() => {
                    warn!("v3 endpoint not found, falling back to v1");
                    let value = legacy().await?;
                    self.negotiator.resolve(ApiGeneration::Legacy);
                    Ok(value)
                }
                Err(e) => Err(e),
            },
        }
    }

    async fn list_configs_v3(&self, query: &ListQuery<'_>) -> Result<ConfigPage> {
        let auth = self.credentials.request_auth(query.namespace, query.group);
        let params = [
            ("dataId", query.data_id.to_string()),
            ("groupName", query.group.to_string()),
            ("namespaceId", query.namespace.to_string()),
            ("pageNo", query.page_no.to_string()),
            ("pageSize", query.page_size.to_string()),
            ("search", query.search.as_str().to_string()),
        ];

        let url = self.url(api_path::CONFIG_LIST_V3);
        debug!("GET {} {:?}", url, params);
        let mut request = self.http.get(&url).query(&params);
        if let RequestAuth::Token(token) = &auth {
            request = request.bearer_auth(token);
        }
        let request = apply_signature(request, &auth);
        let (status, body) = read_body(request.send().await?).await?;

        if status != StatusCode::OK {
            return Err(ClientError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let response: ApiResponse<ConfigPage> = serde_json::from_str(&body)
            .map_err(|e| ClientError::ProtocolMismatch(format!("v3 config list: {}", e)))?;
        if response.code != 0 {
            return Err(ClientError::ServerError {
                code: response.code,
                message: response.message,
            });
        }
        response
            .data
            .ok_or_else(|| ClientError::ProtocolMismatch("v3 config list: missing data".to_string()))
    }

    async fn list_configs_v1(&self, query: &ListQuery<'_>) -> Result<ConfigPage> {
        let auth = self.credentials.request_auth(query.namespace, query.group);
        let mut params = vec![
            ("dataId", query.data_id.to_string()),
            ("group", query.group.to_string()),
            ("tenant", query.namespace.to_string()),
            ("pageNo", query.page_no.to_string()),
            ("pageSize", query.page_size.to_string()),
            ("search", query.search.as_str().to_string()),
        ];
        push_token(&mut params, &auth);

        let url = self.url(api_path::CONFIGS_V1);
        debug!("GET {} dataId={} group={}", url, query.data_id, query.group);
        let request = apply_signature(self.http.get(&url).query(&params), &auth);
        let (status, body) = read_body(request.send().await?).await?;

        if status != StatusCode::OK {
            return Err(ClientError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| ClientError::ProtocolMismatch(format!("v1 config list: {}", e)))
    }

    async fn publish_to(&self, path: &str, data_id: &str, group: &str, content: &str) -> Result<()> {
        let auth = self.credentials.request_auth(&self.namespace, group);
        let mut form = vec![
            ("dataId", data_id.to_string()),
            ("group", group.to_string()),
            ("content", content.to_string()),
            ("tenant", self.namespace.clone()),
        ];
        push_token(&mut form, &auth);

        let url = self.url(path);
        debug!("POST {} dataId={} group={}", url, data_id, group);
        let request = apply_signature(self.http.post(&url).form(&form), &auth);
        let (status, body) = read_body(request.send().await?).await?;

        if status != StatusCode::OK || body != PUBLISH_OK_BODY {
            return Err(ClientError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Parameters of one listing call, after namespace defaulting
struct ListQuery<'a> {
    data_id: &'a str,
    group: &'a str,
    namespace: &'a str,
    page_no: u32,
    page_size: u32,
    search: SearchMode,
}

/// Legacy calls carry the token as a parameter rather than a header
fn push_token(params: &mut Vec<(&'static str, String)>, auth: &RequestAuth) {
    if let RequestAuth::Token(token) = auth {
        params.push((ACCESS_TOKEN_PARAM, token.clone()));
    }
}

fn apply_signature(request: RequestBuilder, auth: &RequestAuth) -> RequestBuilder {
    match auth {
        RequestAuth::Signed(headers) => request
            .header(header::TIMESTAMP, &headers.timestamp)
            .header(header::SPAS_ACCESS_KEY, &headers.access_key)
            .header(header::SPAS_SIGNATURE, &headers.signature),
        RequestAuth::Token(_) | RequestAuth::None => request,
    }
}

async fn read_body(response: Response) -> Result<(StatusCode, String)> {
    let status = response.status();
    let body = response.text().await?;
    Ok((status, body))
}
