//! 挂在框架元素上的 Per-Monitor DPI 行为
//!
//! 状态流转：`Detached -> Attached -> Hooked -> Unhooked`。元素加载时窗口表面
//! 可能已经存在（立即挂钩），也可能稍后才初始化（等待通知后挂钩），两种顺序都
//! 只挂一次钩子；元素卸载时摘除钩子和尚未触发的初始化订阅。

use tracing::{debug, error, trace, warn};

use crate::capability::is_high_dpi_supported;
use crate::config::{DpiConfig, GLOBAL_CONFIG};
use crate::dpi::{scale_ratio_for_window, ScaleRatio};
use crate::element::HostElement;
use crate::error::{DpiError, DpiResult};
use crate::message::{HookResult, MessageKind, MessagePayload};
use crate::native::{MessageFilterAction, NativeApi, SetWindowPosFlags, WindowHandle};
use crate::rescale::apply_scale;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    /// 元素尚未加载
    Detached,
    /// 已加载但未挂钩；`awaiting_surface` 表示仍在等待窗口表面初始化
    Attached { awaiting_surface: bool },
    Hooked(WindowHandle),
    Unhooked,
}

pub struct PerMonitorDpiBehavior<E: HostElement, N: NativeApi> {
    element: E,
    native: N,
    high_dpi_supported: bool,
    drag_drop_messages: Vec<u32>,
    current_ratio: ScaleRatio,
    state: ListenerState,
}

impl<E: HostElement, N: NativeApi> PerMonitorDpiBehavior<E, N> {
    pub fn new(element: E, native: N, high_dpi_supported: bool, config: &DpiConfig) -> Self {
        let drag_drop_messages = if config.allow_low_privilege_drag_drop {
            config.low_privilege_messages.clone()
        } else {
            Vec::new()
        };

        Self {
            element,
            native,
            high_dpi_supported,
            drag_drop_messages,
            current_ratio: ScaleRatio::IDENTITY,
            state: ListenerState::Detached,
        }
    }

    /// 使用进程级能力探测结果和全局配置
    pub fn attach(element: E, native: N) -> Self {
        let supported = is_high_dpi_supported(&native);
        Self::new(element, native, supported, &GLOBAL_CONFIG)
    }

    pub fn state(&self) -> ListenerState {
        self.state
    }

    pub fn current_ratio(&self) -> ScaleRatio {
        self.current_ratio
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    pub fn native(&self) -> &N {
        &self.native
    }

    /// 元素加载进渲染树
    pub fn on_loaded(&mut self) {
        match self.state {
            ListenerState::Detached | ListenerState::Unhooked => {}
            state => {
                debug!("重复的加载通知，忽略 ({:?})", state);
                return;
            }
        }

        match self.element.native_window() {
            Some(window) => self.hook(window),
            None => {
                self.element.subscribe_surface_initialized();
                self.state = ListenerState::Attached {
                    awaiting_surface: true,
                };
                debug!("窗口表面尚未创建，等待初始化通知");
            }
        }

        self.enable_drag_drop_from_low_privilege();
    }

    /// 窗口表面初始化完成。挂钩后立即按当前显示器做一次缩放，
    /// 处理窗口直接在高 DPI 显示器上打开的情况。
    pub fn on_surface_initialized(&mut self) -> DpiResult<()> {
        let awaiting = ListenerState::Attached {
            awaiting_surface: true,
        };
        if self.state != awaiting {
            trace!("忽略表面初始化通知 ({:?})", self.state);
            return Ok(());
        }
        self.element.unsubscribe_surface_initialized();

        let Some(window) = self.element.native_window() else {
            warn!("窗口表面初始化后仍没有原生句柄，该窗口不做 DPI 自适应");
            self.state = ListenerState::Attached {
                awaiting_surface: false,
            };
            return Ok(());
        };

        self.hook(window);
        let ratio = self.compute_ratio(window)?;
        self.rescale(ratio)
    }

    /// 元素从渲染树卸载
    pub fn on_unloaded(&mut self) {
        match self.state {
            ListenerState::Attached { awaiting_surface } => {
                if awaiting_surface {
                    self.element.unsubscribe_surface_initialized();
                }
            }
            ListenerState::Hooked(window) => {
                self.element.remove_message_hook(window);
                debug!("已摘除窗口 {:?} 的消息钩子", window);
            }
            ListenerState::Detached | ListenerState::Unhooked => return,
        }
        self.state = ListenerState::Unhooked;
    }

    /// 原生消息入口。只处理 DPI 变化，其余消息交给框架默认处理。
    pub fn handle_message(
        &mut self,
        kind: MessageKind,
        payload: &dyn MessagePayload,
    ) -> DpiResult<HookResult> {
        let ListenerState::Hooked(window) = self.state else {
            return Ok(HookResult::NotHandled);
        };

        match kind {
            MessageKind::DpiChanged => {
                self.on_dpi_changed(window, payload)?;
                Ok(HookResult::Handled)
            }
            MessageKind::Other(_) => Ok(HookResult::NotHandled),
        }
    }

    /// 同 [`handle_message`](Self::handle_message)，错误只记录日志。
    /// 供无法向上传播错误的窗口过程使用。
    pub fn dispatch(&mut self, kind: MessageKind, payload: &dyn MessagePayload) -> HookResult {
        match self.handle_message(kind, payload) {
            Ok(result) => result,
            Err(e) => {
                error!("处理窗口消息失败: {}", e);
                HookResult::NotHandled
            }
        }
    }

    fn on_dpi_changed(
        &mut self,
        window: WindowHandle,
        payload: &dyn MessagePayload,
    ) -> DpiResult<()> {
        let rect = payload
            .suggested_rect()
            .ok_or(DpiError::MissingPayload("WM_DPICHANGED 建议矩形"))?;
        debug!("DPI 变化 {:?}，建议窗口位置 {}", payload.new_dpi(), rect);

        self.native
            .set_window_pos(window, rect, SetWindowPosFlags::DPI_REPOSITION)?;

        let ratio = self.compute_ratio(window)?;
        if ratio != self.current_ratio {
            self.rescale(ratio)?;
        } else {
            trace!("缩放比未变化 ({})", ratio);
        }
        Ok(())
    }

    fn hook(&mut self, window: WindowHandle) {
        self.element.add_message_hook(window);
        self.state = ListenerState::Hooked(window);
        debug!("已挂接窗口 {:?} 的消息钩子", window);
    }

    fn compute_ratio(&self, window: WindowHandle) -> DpiResult<ScaleRatio> {
        scale_ratio_for_window(
            &self.native,
            self.high_dpi_supported,
            window,
            self.element.device_scale(),
        )
    }

    fn rescale(&mut self, ratio: ScaleRatio) -> DpiResult<()> {
        apply_scale(&mut self.element, ratio)?;
        self.current_ratio = ratio;
        Ok(())
    }

    // 让中低完整性级别的进程（浏览器沙箱等）也能把文件 / URL 拖进来
    fn enable_drag_drop_from_low_privilege(&self) {
        for &message in &self.drag_drop_messages {
            if let Err(e) = self
                .native
                .change_window_message_filter(message, MessageFilterAction::Add)
            {
                warn!("放开消息 0x{:04X} 失败: {}", message, e);
            }
        }
    }
}
