//! 原生窗口消息的窄接口：消息种类 + 负载访问器 -> 是否已处理

use crate::native::{WindowRect, WM_DPICHANGED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    DpiChanged,
    Other(u32),
}

impl MessageKind {
    pub fn from_raw(message: u32) -> Self {
        match message {
            WM_DPICHANGED => MessageKind::DpiChanged,
            other => MessageKind::Other(other),
        }
    }
}

/// 消息负载
pub trait MessagePayload {
    /// `WM_DPICHANGED` 的 lParam：系统建议的新窗口矩形
    fn suggested_rect(&self) -> Option<WindowRect>;

    /// `WM_DPICHANGED` 的 wParam：新的 (dpi_x, dpi_y)
    fn new_dpi(&self) -> Option<(u32, u32)>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookResult {
    Handled,
    /// 交给框架默认处理
    NotHandled,
}

/// 手工构造的消息负载，宿主也可以用它转发已解码的消息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyntheticMessage {
    pub rect: Option<WindowRect>,
    pub dpi: Option<(u32, u32)>,
}

impl SyntheticMessage {
    pub fn dpi_changed(dpi: u32, rect: WindowRect) -> Self {
        Self {
            rect: Some(rect),
            dpi: Some((dpi, dpi)),
        }
    }
}

impl MessagePayload for SyntheticMessage {
    fn suggested_rect(&self) -> Option<WindowRect> {
        self.rect
    }

    fn new_dpi(&self) -> Option<(u32, u32)> {
        self.dpi
    }
}

/// 拆分 `WM_DPICHANGED` 的 wParam
pub fn split_dpi_wparam(wparam: usize) -> (u32, u32) {
    let wp = wparam as u32;
    (wp & 0xFFFF, (wp >> 16) & 0xFFFF)
}
