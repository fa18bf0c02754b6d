use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// 应用程序统一错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// 登录接口返回非 2xx
    #[error("认证失败: 设备返回 {status}: {body}")]
    Authentication { status: u16, body: String },

    /// 连接、TLS 或超时等传输层错误，消息包含完整的错误链
    #[error("网络错误: {0}")]
    Network(String),

    /// 数据接口返回非 2xx
    #[error("请求 {endpoint} 失败，状态码 {status}: {body}")]
    HttpStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// 响应结构不符合预期
    #[error("设备响应格式错误: {0}")]
    Parse(String),

    /// 输出文件写入失败
    #[error("无法写入 '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// AppError 的 Result 类型别名
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// 错误分类标签，用于结构化日志字段
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Authentication { .. } => "auth",
            AppError::Network(_) => "network",
            AppError::HttpStatus { .. } => "http",
            AppError::Parse(_) => "parse",
            AppError::Write { .. } => "write",
            AppError::Config(_) => "config",
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AppError::Parse(error_chain(&e))
        } else {
            AppError::Network(error_chain(&e))
        }
    }
}

/// 把错误及其所有 source 拼成一行，重复的相邻消息只保留一次
pub fn error_chain(e: &dyn StdError) -> String {
    let mut parts = vec![e.to_string()];
    let mut current = e.source();
    while let Some(cause) = current {
        let msg = cause.to_string();
        if parts.last() != Some(&msg) {
            parts.push(msg);
        }
        current = cause.source();
    }
    parts.join(": ")
}
