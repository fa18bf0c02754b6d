//! 测试用的进程内 BigIP 管理接口

use axum::{
    Json, Router,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

use crate::bigip::client::LOGIN_PATH;
use crate::config::{CredentialsSource, DeviceConfig};

pub const TOKEN: &str = "5BX4CJ2TMNYCQDNPGTIE4DTRZW";
pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "password";

pub struct MockDevice {
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl MockDevice {
    /// 启动设备；`routes` 中的路由都要求 X-F5-Auth-Token，登录接口由这里提供
    pub async fn spawn(routes: Router) -> Self {
        let app = routes
            .layer(middleware::from_fn(require_token))
            .route(LOGIN_PATH, post(login));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{}", addr),
            handle,
        }
    }

    /// 指向本设备、使用正确凭据的配置
    pub fn config(&self) -> DeviceConfig {
        DeviceConfig {
            base_url: self.base_url.clone(),
            credentials_source: CredentialsSource::Config,
            username: Some(USERNAME.to_string()),
            password: Some(PASSWORD.to_string()),
            ..Default::default()
        }
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["username"] == USERNAME && body["password"] == PASSWORD {
        Json(json!({
            "username": USERNAME,
            "loginProviderName": "tmos",
            "token": {"token": TOKEN, "timeout": 1200}
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"code": 401, "message": "Authentication failed."})),
        )
            .into_response()
    }
}

async fn require_token(req: Request, next: Next) -> Response {
    match req.headers().get("X-F5-Auth-Token").and_then(|v| v.to_str().ok()) {
        Some(TOKEN) => next.run(req).await,
        _ => (StatusCode::UNAUTHORIZED, "X-F5-Auth-Token does not exist.").into_response(),
    }
}
