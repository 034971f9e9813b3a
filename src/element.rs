//! 宿主 UI 框架的边界
//!
//! 本 crate 不创建窗口、不管理可视树，只通过 [`HostElement`] 读取框架的
//! 设备变换、写入缩放变换，并请求框架挂接 / 摘除原生消息钩子。

use crate::native::WindowHandle;

/// 均匀缩放变换，写到元素第一个可视子元素的布局变换上
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTransform {
    pub scale_x: f64,
    pub scale_y: f64,
}

impl ScaleTransform {
    pub fn uniform(scale: f64) -> Self {
        Self {
            scale_x: scale,
            scale_y: scale,
        }
    }
}

/// 挂载 DPI 行为的框架元素
pub trait HostElement {
    /// 元素所在的原生窗口；窗口表面尚未创建时为 `None`
    fn native_window(&self) -> Option<WindowHandle>;

    /// 框架当前的设备无关像素到设备像素的缩放（96 DPI 下为 1.0）
    fn device_scale(&self) -> f64;

    fn visual_child_count(&self) -> usize;

    fn set_child_scale(&mut self, index: usize, transform: ScaleTransform);

    /// 订阅 / 取消订阅“窗口表面已初始化”通知
    fn subscribe_surface_initialized(&mut self);
    fn unsubscribe_surface_initialized(&mut self);

    /// 让框架把该窗口的原生消息转发给行为的 `handle_message`
    fn add_message_hook(&mut self, window: WindowHandle);
    fn remove_message_hook(&mut self, window: WindowHandle);
}
