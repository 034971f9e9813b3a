use thiserror::Error;

use crate::native::WindowHandle;

/// DPI 行为相关错误
#[derive(Debug, Error)]
pub enum DpiError {
    /// 行为挂在了没有可视子元素的元素上
    #[error("元素没有可视子元素，无法应用缩放")]
    NoVisualChild,

    #[error("框架基准 DPI 无效: {0}")]
    InvalidBaseline(f64),

    #[error("缩放比无效: {0}")]
    InvalidRatio(f64),

    #[error("找不到窗口 {0:?} 所在的显示器")]
    MonitorNotFound(WindowHandle),

    #[error("消息缺少负载: {0}")]
    MissingPayload(&'static str),

    #[error("系统调用 {call} 失败 (0x{code:08X})")]
    Native { call: &'static str, code: i32 },
}

impl DpiError {
    pub fn native(call: &'static str, code: i32) -> Self {
        DpiError::Native { call, code }
    }
}

pub type DpiResult<T> = Result<T, DpiError>;
