//! 列出设备上的所有池及其成员

use std::io::Write;
use tracing::info;

use crate::bigip::BigIpClient;
use crate::config::DeviceConfig;
use crate::error::{AppError, Result};

/// 逐个池输出：先写池名，再获取并写出成员名
///
/// 某个池的成员获取失败时，之前的池和该池的池名已经写出。返回输出的池数量。
pub async fn list_pools<W: Write>(
    client: &BigIpClient,
    token: &str,
    out: &mut W,
) -> Result<usize> {
    let pools = client.get_pools(token).await?;

    for pool in &pools {
        writeln!(out, "{}", pool.name).map_err(stdout_err)?;
        out.flush().map_err(stdout_err)?;

        let members = client.get_pool_members(token, pool).await?;
        for member in &members {
            writeln!(out, "{}", member.name).map_err(stdout_err)?;
        }
        out.flush().map_err(stdout_err)?;
    }

    Ok(pools.len())
}

fn stdout_err(source: std::io::Error) -> AppError {
    AppError::Write {
        path: "<stdout>".into(),
        source,
    }
}

/// 登录后把池列表输出到 `out`
pub async fn run<W: Write>(config: &DeviceConfig, out: &mut W) -> Result<()> {
    let credentials = config.credentials()?;
    let client = BigIpClient::new(config)?;

    let token = client.authenticate(&credentials).await?;
    let count = list_pools(&client, &token, out).await?;
    info!("共 {} 个池", count);
    Ok(())
}
