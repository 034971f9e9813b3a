use clap::Parser;
use tracing::Level;

use permonitor_dpi::cli::{self, CliArgs, Command};
use permonitor_dpi::config::{DpiConfig, GLOBAL_CONFIG};

fn init_logging(verbose: bool) {
    let level = if verbose {
        Level::DEBUG
    } else {
        DpiConfig::load()
            .ok()
            .and_then(|config| config.log_level.parse().ok())
            .unwrap_or(Level::INFO)
    };

    // 日志写 stderr，stdout 只留 JSON
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    // 订阅者就绪后再加载全局配置，失败告警才能输出
    once_cell::sync::Lazy::force(&GLOBAL_CONFIG);
}

#[cfg(target_os = "windows")]
fn run_native(args: &CliArgs) -> anyhow::Result<serde_json::Value> {
    use permonitor_dpi::capability::process_probe;
    use permonitor_dpi::dpi;
    use permonitor_dpi::win32::Win32Api;

    // 必须在任何窗口创建之前调用
    let awareness = if args.no_awareness {
        None
    } else {
        Some(dpi::enable_dpi_awareness()?)
    };

    cli::run_cli(args.command, &Win32Api, process_probe(), awareness)
}

#[cfg(not(target_os = "windows"))]
fn run_native(_args: &CliArgs) -> anyhow::Result<serde_json::Value> {
    anyhow::bail!("仅支持 Windows 平台")
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    let output = match args.command {
        Command::Config => cli::config_output()?,
        _ => run_native(&args)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
