//! 导出 virtual server 的名称和地址到文本文件

use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::bigip::{BigIpClient, VipRecord};
use crate::config::DeviceConfig;
use crate::error::{AppError, Result};

/// 导出结果
#[derive(Debug)]
pub enum ExportOutcome {
    Saved { path: PathBuf, records: usize },
    Failed(AppError),
}

/// 把 virtual server 集合转换为 VIP 记录，保持设备返回顺序
///
/// destination 中所有 `/<partition>/` 都会被去掉；不含该前缀的值原样保留。
pub fn process_virtual_servers(data: &Value, partition: &str) -> Result<Vec<VipRecord>> {
    let items = match data.get("items") {
        None => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(AppError::Parse(format!("items 不是数组: {}", other)));
        }
    };

    let prefix = format!("/{}/", partition);

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let name = string_field(item, "name", idx)?;
            let destination = string_field(item, "destination", idx)?;
            Ok(VipRecord {
                name: name.to_string(),
                address: destination.replace(&prefix, ""),
            })
        })
        .collect()
}

fn string_field<'a>(item: &'a Value, field: &str, idx: usize) -> Result<&'a str> {
    item.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            AppError::Parse(format!("第 {} 个 virtual server 缺少字符串字段 '{}'", idx, field))
        })
}

/// 覆盖写入文件，每条记录三行：Name、Address、空行；完成后向 `out` 输出确认信息
pub fn save_vip_details_to_file<W: Write>(
    records: &[VipRecord],
    path: &Path,
    out: &mut W,
) -> Result<()> {
    let to_write_err = |source| AppError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(to_write_err)?;
    let mut writer = BufWriter::new(file);
    for vip in records {
        writeln!(writer, "Name: {}", vip.name).map_err(to_write_err)?;
        writeln!(writer, "Address: {}", vip.address).map_err(to_write_err)?;
        writeln!(writer).map_err(to_write_err)?;
    }
    writer.flush().map_err(to_write_err)?;

    writeln!(out, "VIP details saved to '{}'.", path.display()).map_err(stdout_err)?;
    Ok(())
}

fn stdout_err(source: std::io::Error) -> AppError {
    AppError::Write {
        path: "<stdout>".into(),
        source,
    }
}

/// 登录、获取、转换、保存；任一步失败都不会生成输出文件
pub async fn export_vips<W: Write>(
    config: &DeviceConfig,
    output: &Path,
    out: &mut W,
) -> Result<usize> {
    let credentials = config.credentials()?;
    let client = BigIpClient::new(config)?;

    let token = client.authenticate(&credentials).await?;
    let data = client.retrieve_virtual_servers(&token).await?;
    let records = process_virtual_servers(&data, &config.partition)?;
    info!("获取到 {} 个 virtual server", records.len());

    save_vip_details_to_file(&records, output, out)?;
    Ok(records.len())
}

/// 唯一的错误边界：失败时向 `out` 输出错误并正常返回
pub async fn run<W: Write>(config: &DeviceConfig, output: &Path, out: &mut W) -> ExportOutcome {
    match export_vips(config, output, out).await {
        Ok(records) => ExportOutcome::Saved {
            path: output.to_path_buf(),
            records,
        },
        Err(e) => {
            error!(kind = e.kind(), "导出 VIP 失败: {}", e);
            if let Err(write_err) = writeln!(out, "An error occurred: {}", e) {
                error!("输出错误信息失败: {}", write_err);
            }
            ExportOutcome::Failed(e)
        }
    }
}
