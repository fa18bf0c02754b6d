use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::bigip::types::{Collection, LoginResponse, Member, Pool};
use crate::config::{Credentials, DeviceConfig};
use crate::error::{AppError, Result, error_chain};
use crate::logger::redact_token;

pub const LOGIN_PATH: &str = "/mgmt/shared/authn/login";
pub const VIRTUAL_PATH: &str = "/mgmt/tm/ltm/virtual";
pub const POOL_PATH: &str = "/mgmt/tm/ltm/pool";

const AUTH_HEADER: &str = "X-F5-Auth-Token";

/// BigIP iControl REST 客户端
pub struct BigIpClient {
    client: Client,
    base_url: String,
}

impl BigIpClient {
    /// 根据设备配置创建客户端
    pub fn new(config: &DeviceConfig) -> Result<Self> {
        if !config.verify_tls {
            warn!("TLS 证书校验已关闭: {}", config.base_url());
        }

        let mut builder = Client::builder().danger_accept_invalid_certs(!config.verify_tls);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        // 本机地址（如 ssh 隧道）不走系统代理
        if is_loopback(config.base_url()) {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| AppError::Network(format!("创建 HTTP 客户端失败: {}", error_chain(&e))))?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 登录并返回 token
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<String> {
        let url = self.url(LOGIN_PATH);
        debug!("登录设备: {} 用户: {}", url, credentials.username);

        let response = self.client.post(&url).json(credentials).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("登录失败: {} - {}", status, body);
            return Err(AppError::Authentication {
                status: status.as_u16(),
                body,
            });
        }

        let login: LoginResponse = response.json().await.map_err(|e| {
            AppError::Parse(format!("登录响应缺少 token.token: {}", error_chain(&e)))
        })?;

        info!("登录成功，token: {}", redact_token(&login.token.token));
        Ok(login.token.token)
    }

    /// 获取 virtual server 集合的原始 JSON
    pub async fn retrieve_virtual_servers(&self, token: &str) -> Result<serde_json::Value> {
        let response = self.get(VIRTUAL_PATH, token).await?;
        let body: serde_json::Value = response.json().await?;
        Ok(body)
    }

    /// 获取所有池
    pub async fn get_pools(&self, token: &str) -> Result<Vec<Pool>> {
        let pools: Collection<Pool> = self.get_json(POOL_PATH, token).await?;
        debug!("获取到 {} 个池", pools.items.len());
        Ok(pools.items)
    }

    /// 获取池成员
    pub async fn get_pool_members(&self, token: &str, pool: &Pool) -> Result<Vec<Member>> {
        let path = format!("{}/{}/members", POOL_PATH, pool.resource_id());
        let members: Collection<Member> = self.get_json(&path, token).await?;
        debug!("池 {} 有 {} 个成员", pool.name, members.items.len());
        Ok(members.items)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T> {
        let response = self.get(path, token).await?;
        response
            .json()
            .await
            .map_err(|e| AppError::Parse(format!("{}: {}", path, error_chain(&e))))
    }

    /// 带 token 的 GET，非 2xx 转为 HttpStatus 错误
    async fn get(&self, path: &str, token: &str) -> Result<Response> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(AUTH_HEADER, token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("请求失败: {} {} - {}", path, status, body);
            return Err(AppError::HttpStatus {
                endpoint: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

fn is_loopback(base_url: &str) -> bool {
    reqwest::Url::parse(base_url)
        .ok()
        .and_then(|url| url.host_str().map(|h| matches!(h, "localhost" | "127.0.0.1" | "[::1]")))
        .unwrap_or(false)
}
