//! 单元测试用的假系统接口与假框架元素

use std::cell::{Cell, RefCell};

use crate::element::{HostElement, ScaleTransform};
use crate::error::{DpiError, DpiResult};
use crate::native::{
    LibraryHandle, MessageFilterAction, MonitorDpiType, MonitorFallback, MonitorHandle,
    MonitorInfo, NativeApi, ProcessDpiAwareness, SetWindowPosFlags, WindowHandle, WindowRect,
};

pub const E_ACCESSDENIED: i32 = 0x8007_0005_u32 as i32;

pub struct FakeNative {
    pub library_present: bool,
    pub export_present: bool,
    pub system_dpi: u32,
    pub monitor_dpi: Cell<u32>,
    pub monitor_missing: bool,
    pub dpi_query_error: Option<i32>,
    pub awareness_error: Option<i32>,
    pub filter_error: Option<i32>,
    pub monitors: Vec<MonitorInfo>,

    pub loads: Cell<usize>,
    pub frees: Cell<usize>,
    pub export_lookups: RefCell<Vec<String>>,
    pub awareness_calls: RefCell<Vec<ProcessDpiAwareness>>,
    pub positions: RefCell<Vec<(WindowHandle, WindowRect, SetWindowPosFlags)>>,
    pub filters: RefCell<Vec<(u32, MessageFilterAction)>>,
    pub dpi_queries: Cell<usize>,
}

impl FakeNative {
    /// 系统支持 Per-Monitor DPI，窗口所在显示器报告 `monitor_dpi`
    pub fn supported(monitor_dpi: u32) -> Self {
        Self {
            library_present: true,
            export_present: true,
            system_dpi: 96,
            monitor_dpi: Cell::new(monitor_dpi),
            monitor_missing: false,
            dpi_query_error: None,
            awareness_error: None,
            filter_error: None,
            monitors: Vec::new(),
            loads: Cell::new(0),
            frees: Cell::new(0),
            export_lookups: RefCell::new(Vec::new()),
            awareness_calls: RefCell::new(Vec::new()),
            positions: RefCell::new(Vec::new()),
            filters: RefCell::new(Vec::new()),
            dpi_queries: Cell::new(0),
        }
    }

    /// shcore.dll 不存在（Windows 8.1 之前）
    pub fn unsupported() -> Self {
        Self {
            library_present: false,
            export_present: false,
            ..Self::supported(96)
        }
    }
}

impl NativeApi for FakeNative {
    fn load_library(&self, _name: &str) -> Option<LibraryHandle> {
        self.loads.set(self.loads.get() + 1);
        self.library_present.then_some(LibraryHandle(0x1000))
    }

    fn has_export(&self, _library: LibraryHandle, symbol: &str) -> bool {
        self.export_lookups.borrow_mut().push(symbol.to_string());
        self.export_present
    }

    fn free_library(&self, _library: LibraryHandle) {
        self.frees.set(self.frees.get() + 1);
    }

    fn set_process_dpi_awareness(&self, awareness: ProcessDpiAwareness) -> DpiResult<()> {
        self.awareness_calls.borrow_mut().push(awareness);
        match self.awareness_error {
            Some(code) => Err(DpiError::native("SetProcessDpiAwareness", code)),
            None => Ok(()),
        }
    }

    fn system_dpi(&self) -> u32 {
        self.system_dpi
    }

    fn monitor_from_window(
        &self,
        _window: WindowHandle,
        _fallback: MonitorFallback,
    ) -> Option<MonitorHandle> {
        (!self.monitor_missing).then_some(MonitorHandle(0x2000))
    }

    fn dpi_for_monitor(
        &self,
        _monitor: MonitorHandle,
        _kind: MonitorDpiType,
    ) -> DpiResult<(u32, u32)> {
        self.dpi_queries.set(self.dpi_queries.get() + 1);
        match self.dpi_query_error {
            Some(code) => Err(DpiError::native("GetDpiForMonitor", code)),
            None => Ok((self.monitor_dpi.get(), self.monitor_dpi.get())),
        }
    }

    fn set_window_pos(
        &self,
        window: WindowHandle,
        rect: WindowRect,
        flags: SetWindowPosFlags,
    ) -> DpiResult<()> {
        self.positions.borrow_mut().push((window, rect, flags));
        Ok(())
    }

    fn change_window_message_filter(
        &self,
        message: u32,
        action: MessageFilterAction,
    ) -> DpiResult<()> {
        self.filters.borrow_mut().push((message, action));
        match self.filter_error {
            Some(code) => Err(DpiError::native("ChangeWindowMessageFilter", code)),
            None => Ok(()),
        }
    }

    fn enumerate_monitors(&self) -> DpiResult<Vec<MonitorInfo>> {
        Ok(self.monitors.clone())
    }
}

pub struct FakeElement {
    pub window: Option<WindowHandle>,
    pub device_scale: f64,
    pub children: usize,
    pub transforms: Vec<(usize, ScaleTransform)>,
    pub surface_subscribed: bool,
    pub surface_subscriptions: usize,
    pub hooks_added: Vec<WindowHandle>,
    pub hooks_removed: Vec<WindowHandle>,
}

impl FakeElement {
    pub fn new(window: Option<WindowHandle>) -> Self {
        Self {
            window,
            device_scale: 1.0,
            children: 1,
            transforms: Vec::new(),
            surface_subscribed: false,
            surface_subscriptions: 0,
            hooks_added: Vec::new(),
            hooks_removed: Vec::new(),
        }
    }

    /// 当前仍挂着的消息钩子数
    pub fn active_hooks(&self) -> usize {
        self.hooks_added.len() - self.hooks_removed.len()
    }
}

impl HostElement for FakeElement {
    fn native_window(&self) -> Option<WindowHandle> {
        self.window
    }

    fn device_scale(&self) -> f64 {
        self.device_scale
    }

    fn visual_child_count(&self) -> usize {
        self.children
    }

    fn set_child_scale(&mut self, index: usize, transform: ScaleTransform) {
        self.transforms.push((index, transform));
    }

    fn subscribe_surface_initialized(&mut self) {
        self.surface_subscribed = true;
        self.surface_subscriptions += 1;
    }

    fn unsubscribe_surface_initialized(&mut self) {
        self.surface_subscribed = false;
    }

    fn add_message_hook(&mut self, window: WindowHandle) {
        self.hooks_added.push(window);
    }

    fn remove_message_hook(&mut self, window: WindowHandle) {
        self.hooks_removed.push(window);
    }
}
