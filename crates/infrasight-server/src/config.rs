use infrasight_common::id::{WorkerId, WorkerIdError};
use infrasight_notify::manager::ChannelSpec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// CORS 允许的 origins 列表，为空时允许所有来源（开发模式）
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub id: IdConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            cors_allowed_origins: Vec::new(),
            database: DatabaseConfig::default(),
            identity: IdentityConfig::default(),
            notify: NotifyConfig::default(),
            id: IdConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// 完整连接 URL；未设置时使用 `<data_dir>/infrasight.db`
    #[serde(default)]
    pub url: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            url: None,
        }
    }
}

impl DatabaseConfig {
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) if !url.trim().is_empty() => url.clone(),
            _ => {
                let path = std::path::Path::new(&self.data_dir).join("infrasight.db");
                format!("sqlite://{}?mode=rwc", path.display())
            }
        }
    }

    /// The connection URL with any password replaced by `***`, for logging.
    pub fn redacted_url(&self) -> String {
        let url = self.connection_url();
        let Some(scheme_end) = url.find("://") else {
            return url;
        };
        let rest = &url[scheme_end + 3..];
        let Some(at) = rest.find('@') else {
            return url;
        };
        let userinfo = &rest[..at];
        match userinfo.find(':') {
            Some(colon) => format!(
                "{}://{}:***{}",
                &url[..scheme_end],
                &userinfo[..colon],
                &rest[at..]
            ),
            None => url,
        }
    }
}

/// Where the requester identity comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// 携带请求者身份（通常为邮箱）的请求头
    #[serde(default = "default_identity_header")]
    pub header: String,
    /// 为 true 时缺少身份头的请求返回 401
    #[serde(default = "default_identity_require")]
    pub require: bool,
    /// 不强制身份时使用的默认请求者
    #[serde(default = "default_anonymous_requester")]
    pub anonymous: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            header: default_identity_header(),
            require: default_identity_require(),
            anonymous: default_anonymous_requester(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default = "default_notify_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub channels: Vec<ChannelSpec>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: default_notify_enabled(),
            channels: Vec::new(),
        }
    }
}

/// Snowflake worker bits for maintenance record ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdConfig {
    /// 机器标识（0-31）
    #[serde(default = "default_worker_id")]
    pub machine_id: i32,
    /// 节点标识（0-31）
    #[serde(default = "default_worker_id")]
    pub node_id: i32,
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            machine_id: default_worker_id(),
            node_id: default_worker_id(),
        }
    }
}

impl IdConfig {
    pub fn worker(&self) -> Result<WorkerId, WorkerIdError> {
        WorkerId::new(self.machine_id, self.node_id)
    }
}

fn default_worker_id() -> i32 {
    1
}

fn default_http_port() -> u16 {
    8080
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_identity_header() -> String {
    "x-requester".to_string()
}

fn default_identity_require() -> bool {
    true
}

fn default_anonymous_requester() -> String {
    "anonymous".to_string()
}

fn default_notify_enabled() -> bool {
    true
}

impl ServerConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config '{path}': {e}"))?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}
