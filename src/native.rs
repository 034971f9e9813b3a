//! 系统窗口 / DPI 接口的 ABI 镜像与调用边界
//!
//! 所有对操作系统的调用都经过 [`NativeApi`]，Windows 下由 `win32::Win32Api`
//! 实现，测试里用假实现替换。

use std::fmt;
use std::ops::BitOr;

use serde::Serialize;

use crate::error::DpiResult;

pub const WM_COPYGLOBALDATA: u32 = 0x0049;
pub const WM_COPYDATA: u32 = 0x004A;
pub const WM_DROPFILES: u32 = 0x0233;
pub const WM_DPICHANGED: u32 = 0x02E0;

/// 原生窗口句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonitorHandle(pub isize);

/// 动态加载的模块句柄，只在能力探测期间短暂存在
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryHandle(pub isize);

/// 与 Win32 `RECT` 布局一致
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WindowRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl WindowRect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        // 从右到左布局的系统上 left 可能大于 right
        (self.right - self.left).abs()
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }
}

impl fmt::Display for WindowRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == WindowRect::default() {
            return write!(f, "RECT {{Empty}}");
        }
        write!(
            f,
            "RECT {{ left: {} / top: {} / right: {} / bottom: {} }}",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// `SetWindowPos` 的 `SWP_*` 标志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetWindowPosFlags(pub u32);

impl SetWindowPosFlags {
    pub const NO_SIZE: Self = Self(0x0001);
    pub const NO_MOVE: Self = Self(0x0002);
    pub const NO_Z_ORDER: Self = Self(0x0004);
    pub const NO_ACTIVATE: Self = Self(0x0010);
    pub const NO_OWNER_Z_ORDER: Self = Self(0x0200);

    /// DPI 变化时重新定位窗口所用的组合：不改 Z 序、不激活
    pub const DPI_REPOSITION: Self =
        Self(Self::NO_OWNER_Z_ORDER.0 | Self::NO_ACTIVATE.0 | Self::NO_Z_ORDER.0);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SetWindowPosFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessDpiAwareness {
    Unaware = 0,
    SystemAware = 1,
    PerMonitorAware = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorDpiType {
    Effective = 0,
    Angular = 1,
    Raw = 2,
}

/// `MonitorFromWindow` 找不到显示器时的回退方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorFallback {
    Null = 0,
    Primary = 1,
    Nearest = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFilterAction {
    Add = 1,
    Remove = 2,
}

/// 枚举显示器得到的信息
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorInfo {
    pub handle: MonitorHandle,
    pub bounds: WindowRect,
    pub primary: bool,
    pub dpi_x: u32,
    pub dpi_y: u32,
}

/// 本 crate 用到的全部系统调用
pub trait NativeApi {
    /// 加载失败返回 `None`，不视为错误
    fn load_library(&self, name: &str) -> Option<LibraryHandle>;

    /// 只检查导出是否存在，不调用它
    fn has_export(&self, library: LibraryHandle, symbol: &str) -> bool;

    fn free_library(&self, library: LibraryHandle);

    fn set_process_dpi_awareness(&self, awareness: ProcessDpiAwareness) -> DpiResult<()>;

    fn system_dpi(&self) -> u32;

    fn monitor_from_window(
        &self,
        window: WindowHandle,
        fallback: MonitorFallback,
    ) -> Option<MonitorHandle>;

    /// 返回 (dpi_x, dpi_y)
    fn dpi_for_monitor(
        &self,
        monitor: MonitorHandle,
        kind: MonitorDpiType,
    ) -> DpiResult<(u32, u32)>;

    fn set_window_pos(
        &self,
        window: WindowHandle,
        rect: WindowRect,
        flags: SetWindowPosFlags,
    ) -> DpiResult<()>;

    fn change_window_message_filter(
        &self,
        message: u32,
        action: MessageFilterAction,
    ) -> DpiResult<()>;

    fn enumerate_monitors(&self) -> DpiResult<Vec<MonitorInfo>>;
}
