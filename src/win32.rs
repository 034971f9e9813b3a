//! Win32 实现：`NativeApi` 与窗口子类化消息钩子

use std::cell::RefCell;
use std::ffi::{c_void, CString};

use tracing::debug;
use windows::core::{HSTRING, PCSTR};
use windows::Win32::Foundation::{BOOL, HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, MonitorFromWindow, HDC, HMONITOR, MONITORINFO,
    MONITOR_FROM_FLAGS,
};
use windows::Win32::System::LibraryLoader::{FreeLibrary, GetProcAddress, LoadLibraryW};
use windows::Win32::UI::HiDpi::{
    GetDpiForMonitor, GetDpiForSystem, SetProcessDpiAwareness, MONITOR_DPI_TYPE,
    PROCESS_DPI_AWARENESS,
};
use windows::Win32::UI::Shell::{DefSubclassProc, RemoveWindowSubclass, SetWindowSubclass};
use windows::Win32::UI::WindowsAndMessaging::{
    ChangeWindowMessageFilter, SetWindowPos, CHANGE_WINDOW_MESSAGE_FILTER_FLAGS,
    SET_WINDOW_POS_FLAGS,
};

use crate::error::{DpiError, DpiResult};
use crate::message::{split_dpi_wparam, HookResult, MessageKind, MessagePayload};
use crate::native::{
    LibraryHandle, MessageFilterAction, MonitorDpiType, MonitorFallback, MonitorHandle,
    MonitorInfo, NativeApi, ProcessDpiAwareness, SetWindowPosFlags, WindowHandle, WindowRect,
    WM_DPICHANGED,
};

const MONITORINFOF_PRIMARY: u32 = 0x0000_0001;

fn to_hwnd(window: WindowHandle) -> HWND {
    HWND(window.0 as *mut c_void)
}

fn to_rect(rect: &RECT) -> WindowRect {
    WindowRect::new(rect.left, rect.top, rect.right, rect.bottom)
}

fn native_error(call: &'static str) -> impl FnOnce(windows::core::Error) -> DpiError {
    move |e| DpiError::native(call, e.code().0)
}

/// 直接调用系统 API
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Api;

impl NativeApi for Win32Api {
    fn load_library(&self, name: &str) -> Option<LibraryHandle> {
        let module = unsafe { LoadLibraryW(&HSTRING::from(name)) }.ok()?;
        if module.is_invalid() {
            return None;
        }
        Some(LibraryHandle(module.0 as isize))
    }

    fn has_export(&self, library: LibraryHandle, symbol: &str) -> bool {
        let Ok(symbol) = CString::new(symbol) else {
            return false;
        };
        let module = windows::Win32::Foundation::HMODULE(library.0 as _);
        unsafe { GetProcAddress(module, PCSTR::from_raw(symbol.as_ptr() as *const u8)) }.is_some()
    }

    fn free_library(&self, library: LibraryHandle) {
        let module = windows::Win32::Foundation::HMODULE(library.0 as _);
        if let Err(e) = unsafe { FreeLibrary(module) } {
            debug!("FreeLibrary 失败: {}", e);
        }
    }

    fn set_process_dpi_awareness(&self, awareness: ProcessDpiAwareness) -> DpiResult<()> {
        unsafe { SetProcessDpiAwareness(PROCESS_DPI_AWARENESS(awareness as i32)) }
            .map_err(native_error("SetProcessDpiAwareness"))
    }

    fn system_dpi(&self) -> u32 {
        unsafe { GetDpiForSystem() }
    }

    fn monitor_from_window(
        &self,
        window: WindowHandle,
        fallback: MonitorFallback,
    ) -> Option<MonitorHandle> {
        let monitor =
            unsafe { MonitorFromWindow(to_hwnd(window), MONITOR_FROM_FLAGS(fallback as u32)) };
        if monitor.is_invalid() {
            return None;
        }
        Some(MonitorHandle(monitor.0 as isize))
    }

    fn dpi_for_monitor(
        &self,
        monitor: MonitorHandle,
        kind: MonitorDpiType,
    ) -> DpiResult<(u32, u32)> {
        let mut dpi_x = 0;
        let mut dpi_y = 0;
        unsafe {
            GetDpiForMonitor(
                HMONITOR(monitor.0 as _),
                MONITOR_DPI_TYPE(kind as i32),
                &mut dpi_x,
                &mut dpi_y,
            )
        }
        .map_err(native_error("GetDpiForMonitor"))?;
        Ok((dpi_x, dpi_y))
    }

    fn set_window_pos(
        &self,
        window: WindowHandle,
        rect: WindowRect,
        flags: SetWindowPosFlags,
    ) -> DpiResult<()> {
        unsafe {
            SetWindowPos(
                to_hwnd(window),
                HWND::default(),
                rect.left,
                rect.top,
                rect.right - rect.left,
                rect.bottom - rect.top,
                SET_WINDOW_POS_FLAGS(flags.0),
            )
        }
        .map_err(native_error("SetWindowPos"))
    }

    fn change_window_message_filter(
        &self,
        message: u32,
        action: MessageFilterAction,
    ) -> DpiResult<()> {
        unsafe {
            ChangeWindowMessageFilter(message, CHANGE_WINDOW_MESSAGE_FILTER_FLAGS(action as u32))
        }
        .map_err(native_error("ChangeWindowMessageFilter"))
    }

    fn enumerate_monitors(&self) -> DpiResult<Vec<MonitorInfo>> {
        let mut handles: Vec<HMONITOR> = Vec::new();
        let ok = unsafe {
            EnumDisplayMonitors(
                HDC::default(),
                None,
                Some(collect_monitor),
                LPARAM(&mut handles as *mut Vec<HMONITOR> as isize),
            )
        };
        if !ok.as_bool() {
            return Err(DpiError::native(
                "EnumDisplayMonitors",
                windows::core::Error::from_win32().code().0,
            ));
        }

        let mut monitors = Vec::with_capacity(handles.len());
        for monitor in handles {
            let mut info = MONITORINFO {
                cbSize: std::mem::size_of::<MONITORINFO>() as u32,
                ..Default::default()
            };
            if !unsafe { GetMonitorInfoW(monitor, &mut info) }.as_bool() {
                debug!("GetMonitorInfoW 失败，跳过显示器 {:?}", monitor);
                continue;
            }

            let handle = MonitorHandle(monitor.0 as isize);
            let (dpi_x, dpi_y) = self.dpi_for_monitor(handle, MonitorDpiType::Effective)?;
            monitors.push(MonitorInfo {
                handle,
                bounds: to_rect(&info.rcMonitor),
                primary: info.dwFlags & MONITORINFOF_PRIMARY != 0,
                dpi_x,
                dpi_y,
            });
        }
        Ok(monitors)
    }
}

unsafe extern "system" fn collect_monitor(
    monitor: HMONITOR,
    _hdc: HDC,
    _rect: *mut RECT,
    data: LPARAM,
) -> BOOL {
    let handles = &mut *(data.0 as *mut Vec<HMONITOR>);
    handles.push(monitor);
    BOOL(1)
}

/// 从窗口过程参数解码的消息负载
pub struct Win32Payload {
    pub message: u32,
    pub wparam: WPARAM,
    pub lparam: LPARAM,
}

impl MessagePayload for Win32Payload {
    fn suggested_rect(&self) -> Option<WindowRect> {
        if self.message != WM_DPICHANGED || self.lparam.0 == 0 {
            return None;
        }
        // WM_DPICHANGED 的 lParam 指向系统建议的 RECT
        let rect = unsafe { &*(self.lparam.0 as *const RECT) };
        Some(to_rect(rect))
    }

    fn new_dpi(&self) -> Option<(u32, u32)> {
        (self.message == WM_DPICHANGED).then(|| split_dpi_wparam(self.wparam.0))
    }
}

type Handler = dyn FnMut(MessageKind, &dyn MessagePayload) -> HookResult;

struct HookState {
    handler: RefCell<Box<Handler>>,
}

/// 子类化窗口得到的消息钩子，drop 时摘除。
///
/// 只能在创建窗口的线程上使用，也不要在回调里释放自身。
pub struct MessageHook {
    window: HWND,
    state: *mut HookState,
}

/// 把窗口的消息转给 `handler`。回调返回 `NotHandled` 或者消息在回调执行期间
/// 重入（例如回调里的 `SetWindowPos` 同步发出的消息）时走默认处理。
pub fn install_message_hook<F>(window: WindowHandle, handler: F) -> DpiResult<MessageHook>
where
    F: FnMut(MessageKind, &dyn MessagePayload) -> HookResult + 'static,
{
    let hwnd = to_hwnd(window);
    let state = Box::into_raw(Box::new(HookState {
        handler: RefCell::new(Box::new(handler)),
    }));

    let ok =
        unsafe { SetWindowSubclass(hwnd, Some(subclass_proc), state as usize, state as usize) };
    if !ok.as_bool() {
        drop(unsafe { Box::from_raw(state) });
        return Err(DpiError::native(
            "SetWindowSubclass",
            windows::core::Error::from_win32().code().0,
        ));
    }

    debug!("已子类化窗口 {:?}", window);
    Ok(MessageHook {
        window: hwnd,
        state,
    })
}

impl Drop for MessageHook {
    fn drop(&mut self) {
        unsafe {
            let removed =
                RemoveWindowSubclass(self.window, Some(subclass_proc), self.state as usize);
            if !removed.as_bool() {
                debug!("RemoveWindowSubclass 失败，窗口可能已销毁");
            }
            drop(Box::from_raw(self.state));
        }
    }
}

unsafe extern "system" fn subclass_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
    _id: usize,
    data: usize,
) -> LRESULT {
    let state = &*(data as *const HookState);

    if let Ok(mut handler) = state.handler.try_borrow_mut() {
        let payload = Win32Payload {
            message: msg,
            wparam,
            lparam,
        };
        if (&mut **handler)(MessageKind::from_raw(msg), &payload) == HookResult::Handled {
            return LRESULT(0);
        }
    }

    DefSubclassProc(hwnd, msg, wparam, lparam)
}
