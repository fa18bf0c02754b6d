use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// 用户名环境变量
pub const ENV_USERNAME: &str = "BIGIP_USERNAME";
/// 密码环境变量
pub const ENV_PASSWORD: &str = "BIGIP_PASSWORD";
/// 管理地址环境变量
pub const ENV_BASE_URL: &str = "BIGIP_BASE_URL";

/// 凭据来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialsSource {
    /// 从配置文件中的 username / password 读取
    Config,
    /// 从 BIGIP_USERNAME / BIGIP_PASSWORD 读取
    Env,
}

/// 设备连接配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// 管理接口地址，例如 https://bigip.example.com
    pub base_url: String,

    /// 是否校验 TLS 证书
    pub verify_tls: bool,

    pub credentials_source: CredentialsSource,

    pub username: Option<String>,

    pub password: Option<String>,

    /// 从 destination 中剥离的分区名
    pub partition: String,

    /// 请求超时（秒），为空时使用 reqwest 默认值
    pub timeout_secs: Option<u64>,

    /// VIP 导出文件路径
    pub output_path: PathBuf,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://bigip.f5.com".to_string(),
            verify_tls: true,
            credentials_source: CredentialsSource::Env,
            username: None,
            password: None,
            partition: "Common".to_string(),
            timeout_secs: None,
            output_path: PathBuf::from("vip-details.txt"),
        }
    }
}

/// 登录凭据
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl DeviceConfig {
    /// 从 TOML 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.as_ref().display(), e)))?;

        Self::from_toml_str(&content)
    }

    /// 从 TOML 文本解析配置
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从文件加载，并使用环境变量覆盖
    pub fn from_file_with_env<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// 有配置文件时读取文件，否则使用默认值；两种情况都应用环境变量覆盖
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file_with_env(path),
            None => {
                let mut config = Self::default();
                config.apply_env_overrides(|key| std::env::var(key).ok());
                Ok(config)
            }
        }
    }

    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }
    }

    /// 按 credentials_source 解析登录凭据
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        self.credentials_from(|key| std::env::var(key).ok())
    }

    fn credentials_from<F>(&self, lookup: F) -> Result<Credentials, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (username, password) = match self.credentials_source {
            CredentialsSource::Config => (
                self.username
                    .clone()
                    .ok_or_else(|| ConfigError::MissingCredential("username".to_string()))?,
                self.password
                    .clone()
                    .ok_or_else(|| ConfigError::MissingCredential("password".to_string()))?,
            ),
            CredentialsSource::Env => (
                lookup(ENV_USERNAME)
                    .ok_or_else(|| ConfigError::MissingCredential(ENV_USERNAME.to_string()))?,
                lookup(ENV_PASSWORD)
                    .ok_or_else(|| ConfigError::MissingCredential(ENV_PASSWORD.to_string()))?,
            ),
        };

        Ok(Credentials::new(username, password))
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "base_url 必须以 http:// 或 https:// 开头，当前为 '{}'",
                self.base_url
            )));
        }

        if self.partition.is_empty() || self.partition.contains('/') {
            return Err(ConfigError::ValidationError(format!(
                "partition 只能是分区名，不能包含 '/'，当前为 '{}'",
                self.partition
            )));
        }

        if self.timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "timeout_secs 必须大于 0，不设置则使用默认超时".to_string(),
            ));
        }

        Ok(())
    }

    /// 去掉末尾斜杠的管理地址
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// 配置错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO 错误: {0}")]
    IoError(String),

    #[error("解析错误: {0}")]
    ParseError(String),

    #[error("缺少凭据: {0}")]
    MissingCredential(String),

    #[error("验证错误: {0}")]
    ValidationError(String),
}
