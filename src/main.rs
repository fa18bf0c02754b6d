mod bigip;
mod config;
mod error;
mod logger;
mod pools;
mod vips;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};

use config::DeviceConfig;

/// 查询 F5 BigIP 设备上的池和 virtual server
#[derive(Parser, Debug)]
#[command(name = "bigip-rs", version, about)]
struct Cli {
    /// TOML 配置文件
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 覆盖配置中的管理地址
    #[arg(long, global = true)]
    host: Option<String>,

    /// 不校验设备 TLS 证书
    #[arg(long, global = true)]
    insecure: bool,

    /// 额外把日志写入该目录
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 打印所有池及其成员
    Pools,

    /// 把 virtual server 名称和地址导出到文本文件
    Vips {
        /// 输出文件，默认使用配置中的 output_path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = logger::init(cli.log_dir.as_deref());

    let mut config = match DeviceConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("加载配置失败: {}", e);
            return ExitCode::from(2);
        }
    };
    if let Some(host) = cli.host {
        config.base_url = host;
    }
    if cli.insecure {
        config.verify_tls = false;
    }
    if let Err(e) = config.validate() {
        error!("配置无效: {}", e);
        return ExitCode::from(2);
    }

    info!("设备: {}", config.base_url());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Pools => match pools::run(&config, &mut out).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(kind = e.kind(), "列出池失败: {}", e);
                ExitCode::FAILURE
            }
        },
        Command::Vips { output } => {
            let output = output.unwrap_or_else(|| config.output_path.clone());
            match vips::run(&config, &output, &mut out).await {
                vips::ExportOutcome::Saved { path, records } => {
                    info!("已导出 {} 条 VIP 到 {}", records, path.display());
                }
                vips::ExportOutcome::Failed(e) => debug!(kind = e.kind(), "导出已中止"),
            }
            ExitCode::SUCCESS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_vips_with_global_flags() {
        let cli = Cli::parse_from([
            "bigip-rs",
            "vips",
            "--output",
            "out.txt",
            "--insecure",
            "--host",
            "https://10.1.1.245",
        ]);
        assert!(cli.insecure);
        assert_eq!(cli.host.as_deref(), Some("https://10.1.1.245"));
        match cli.command {
            Command::Vips { output } => assert_eq!(output, Some(PathBuf::from("out.txt"))),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_pools() {
        let cli = Cli::parse_from(["bigip-rs", "--config", "bigip.toml", "pools"]);
        assert_eq!(cli.config, Some(PathBuf::from("bigip.toml")));
        assert!(matches!(cli.command, Command::Pools));
    }
}
