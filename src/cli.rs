use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use crate::capability::CapabilityProbe;
use crate::config::{config_path, DpiConfig};
use crate::dpi::{ratio_for_monitor_dpi, system_ratio, AwarenessMode, LAYOUT_DPI};
use crate::error::DpiResult;
use crate::native::NativeApi;
use crate::types::{MonitorReport, ProbeReport};

#[derive(Parser, Debug)]
#[command(author, version, about = "Per-Monitor DPI 探测工具", long_about = None)]
pub struct CliArgs {
    /// 输出调试日志
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// 不切换进程 DPI 感知模式（查询结果会被系统虚拟化）
    #[arg(long = "no-awareness")]
    pub no_awareness: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 是否支持 Per-Monitor DPI 以及系统 DPI
    Probe,
    /// 各显示器的有效 DPI 与缩放比
    Monitors,
    /// 当前生效的配置
    Config,
}

/// 没有 UI 框架时，以系统 DPI 作为框架的设备缩放
fn system_device_scale(api: &dyn NativeApi) -> f64 {
    f64::from(api.system_dpi()) / LAYOUT_DPI
}

pub fn build_probe_report(
    api: &dyn NativeApi,
    probe: &CapabilityProbe,
    awareness: Option<AwarenessMode>,
) -> ProbeReport {
    ProbeReport {
        supported: probe.is_supported(api),
        awareness,
        system_dpi: api.system_dpi(),
        system_scale: system_device_scale(api),
    }
}

pub fn build_monitor_reports(
    api: &dyn NativeApi,
    probe: &CapabilityProbe,
) -> DpiResult<Vec<MonitorReport>> {
    let supported = probe.is_supported(api);
    let device_scale = system_device_scale(api);

    api.enumerate_monitors()?
        .into_iter()
        .map(|monitor| -> DpiResult<MonitorReport> {
            let ratio = if supported {
                ratio_for_monitor_dpi(monitor.dpi_x, device_scale)?
            } else {
                system_ratio(device_scale)?
            };
            Ok(MonitorReport {
                bounds: monitor.bounds,
                primary: monitor.primary,
                dpi_x: monitor.dpi_x,
                dpi_y: monitor.dpi_y,
                scale_ratio: ratio.value(),
            })
        })
        .collect()
}

fn envelope(command: &str, data: Value) -> Value {
    json!({
        "code": 0,
        "msg": "success",
        "command": command,
        "data": data
    })
}

/// 执行需要系统接口的子命令，返回 JSON（便于脚本解析）
pub fn run_cli(
    command: Command,
    api: &dyn NativeApi,
    probe: &CapabilityProbe,
    awareness: Option<AwarenessMode>,
) -> anyhow::Result<Value> {
    let output = match command {
        Command::Probe => {
            envelope("probe", serde_json::to_value(build_probe_report(api, probe, awareness))?)
        }
        Command::Monitors => {
            envelope("monitors", serde_json::to_value(build_monitor_reports(api, probe)?)?)
        }
        Command::Config => config_output()?,
    };
    Ok(output)
}

pub fn config_output() -> anyhow::Result<Value> {
    let path = config_path();
    let config = DpiConfig::load_from(&path)?;
    Ok(envelope(
        "config",
        json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        }),
    ))
}
