use serde::Serialize;

use crate::dpi::AwarenessMode;
use crate::native::WindowRect;

#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub supported: bool,
    /// 未切换感知模式时为 `None`
    pub awareness: Option<AwarenessMode>,
    pub system_dpi: u32,
    pub system_scale: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonitorReport {
    pub bounds: WindowRect,
    pub primary: bool,
    pub dpi_x: u32,
    pub dpi_y: u32,
    /// 该显示器上窗口内容需要的额外缩放
    pub scale_ratio: f64,
}
