use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::native::{WM_COPYDATA, WM_COPYGLOBALDATA, WM_DROPFILES};

/// 导出 Per-Monitor DPI 接口的系统模块
pub const DEFAULT_PROBE_LIBRARY: &str = "shcore.dll";

/// 该导出存在即认为系统支持 Per-Monitor DPI
pub const DEFAULT_PROBE_SYMBOL: &str = "SetProcessDpiAwareness";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DpiConfig {
    pub probe_library: String,
    pub probe_symbol: String,
    /// 加载时放开低权限进程（如浏览器沙箱）发来的拖放消息
    pub allow_low_privilege_drag_drop: bool,
    pub low_privilege_messages: Vec<u32>,
    pub log_level: String,
}

impl Default for DpiConfig {
    fn default() -> Self {
        Self {
            probe_library: DEFAULT_PROBE_LIBRARY.to_string(),
            probe_symbol: DEFAULT_PROBE_SYMBOL.to_string(),
            allow_low_privilege_drag_drop: true,
            low_privilege_messages: vec![WM_DROPFILES, WM_COPYDATA, WM_COPYGLOBALDATA],
            log_level: "info".to_string(),
        }
    }
}

impl DpiConfig {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("配置文件格式错误")
    }

    /// 文件不存在时返回默认配置
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("读取配置失败: {}", path.display()))?;
        Self::from_json(&text)
    }

    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path())
    }

    /// 读取或解析失败时记录告警并返回默认配置
    pub fn load_or_default_from(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            tracing::warn!("配置加载失败，使用默认配置: {:#}", e);
            Self::default()
        })
    }
}

/// 首次访问时加载。需要看到加载失败告警的进程应先安装日志订阅者
pub static GLOBAL_CONFIG: once_cell::sync::Lazy<DpiConfig> =
    once_cell::sync::Lazy::new(|| DpiConfig::load_or_default_from(&config_path()));

/// 配置目录
pub fn config_dir() -> PathBuf {
    let mut p = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    p.push("PerMonitorDpi");
    p
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}
