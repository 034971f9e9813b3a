//! 窗口级 Per-Monitor DPI 感知
//!
//! 探测系统是否支持 Per-Monitor DPI，进程启动时切换感知模式，窗口收到
//! `WM_DPICHANGED` 后按系统建议矩形重新定位，并把内容缩放到新显示器的 DPI。
//! 宿主 UI 框架通过 [`HostElement`] 接入。

pub mod behavior;
pub mod capability;
pub mod cli;
pub mod config;
pub mod dpi;
pub mod element;
pub mod error;
pub mod message;
pub mod native;
pub mod rescale;
pub mod types;

#[cfg(target_os = "windows")]
pub mod win32;

#[cfg(test)]
mod testing;

pub use behavior::{ListenerState, PerMonitorDpiBehavior};
pub use capability::{is_high_dpi_supported, CapabilityProbe};
pub use dpi::{apply_dpi_awareness, scale_ratio_for_window, AwarenessMode, ScaleRatio};
pub use element::{HostElement, ScaleTransform};
pub use error::{DpiError, DpiResult};
pub use message::{HookResult, MessageKind, MessagePayload, SyntheticMessage};
pub use native::{NativeApi, WindowHandle, WindowRect};
pub use rescale::apply_scale;

#[cfg(target_os = "windows")]
pub use dpi::enable_dpi_awareness;
