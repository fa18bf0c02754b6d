use serde::Deserialize;

/// 登录响应 `{"token": {"token": "..."}}`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: TokenBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenBody {
    pub token: String,
}

/// iControl REST 集合响应；集合为空时设备不返回 items 字段
#[derive(Debug, Clone, Deserialize)]
pub struct Collection<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// 负载均衡池
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub name: String,

    #[serde(default)]
    pub partition: Option<String>,

    /// 例如 /Common/web_pool
    #[serde(default)]
    pub full_path: Option<String>,
}

impl Pool {
    /// URL 路径中使用的池标识，`/Common/web_pool` -> `~Common~web_pool`
    pub fn resource_id(&self) -> String {
        match (&self.full_path, &self.partition) {
            (Some(full_path), _) => full_path.replace('/', "~"),
            (None, Some(partition)) => format!("~{}~{}", partition, self.name),
            (None, None) => self.name.clone(),
        }
    }
}

/// 池成员
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Member {
    pub name: String,
}

/// 从 virtual server 提取出的名称和地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VipRecord {
    pub name: String,
    pub address: String,
}
