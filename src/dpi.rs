//! DPI 感知模块：进程感知模式初始化与缩放比计算
use std::fmt;

use tracing::{info, warn};

use crate::error::{DpiError, DpiResult};
use crate::native::{MonitorDpiType, MonitorFallback, NativeApi, ProcessDpiAwareness, WindowHandle};

/// 框架布局使用的基准 DPI（100% 缩放）
pub const LAYOUT_DPI: f64 = 96.0;

const E_ACCESSDENIED: i32 = 0x8007_0005_u32 as i32;

/// 进程最终所处的 DPI 感知模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AwarenessMode {
    /// 已切换到每显示器感知
    PerMonitor,
    /// 系统不支持，沿用系统 DPI
    SystemOnly,
    /// 模式已被清单或更早的调用固定
    AlreadySet,
}

/// 系统支持时把进程切换到 Per-Monitor DPI 感知。
///
/// 必须在创建任何窗口之前调用，之后再切换不会生效。
pub fn apply_dpi_awareness(api: &dyn NativeApi, supported: bool) -> DpiResult<AwarenessMode> {
    if !supported {
        info!("系统不支持 Per-Monitor DPI，使用系统 DPI");
        return Ok(AwarenessMode::SystemOnly);
    }

    match api.set_process_dpi_awareness(ProcessDpiAwareness::PerMonitorAware) {
        Ok(()) => {
            info!("已启用 Per-Monitor DPI 感知");
            Ok(AwarenessMode::PerMonitor)
        }
        Err(DpiError::Native { code, .. }) if code == E_ACCESSDENIED => {
            warn!("DPI 感知模式已被设置，保持现状");
            Ok(AwarenessMode::AlreadySet)
        }
        Err(e) => Err(e),
    }
}

/// 进程启动时调用一次，重复调用返回第一次的结果
#[cfg(target_os = "windows")]
pub fn enable_dpi_awareness() -> DpiResult<AwarenessMode> {
    use crate::capability::is_high_dpi_supported;
    use crate::win32::Win32Api;

    static MODE: once_cell::sync::OnceCell<AwarenessMode> = once_cell::sync::OnceCell::new();

    MODE.get_or_try_init(|| {
        let api = Win32Api;
        apply_dpi_awareness(&api, is_high_dpi_supported(&api))
    })
    .copied()
}

/// 当前 DPI 与框架基准 DPI 之比，恒为正
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ScaleRatio(f64);

impl ScaleRatio {
    /// 100% 缩放
    pub const IDENTITY: ScaleRatio = ScaleRatio(1.0);

    pub fn new(value: f64) -> DpiResult<Self> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(DpiError::InvalidRatio(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for ScaleRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}%", self.0 * 100.0)
    }
}

/// 框架当前理解的 DPI：`96 * 设备缩放`
pub fn baseline_dpi(device_scale: f64) -> DpiResult<f64> {
    let baseline = LAYOUT_DPI * device_scale;
    if baseline.is_finite() && baseline > 0.0 {
        Ok(baseline)
    } else {
        Err(DpiError::InvalidBaseline(baseline))
    }
}

/// 计算窗口的缩放比。
///
/// 不支持 Per-Monitor DPI 时直接沿用框架已应用的系统 DPI；
/// 支持时取窗口最近显示器的有效 DPI（X 轴）除以框架基准 DPI。
/// 调用方需保证窗口表面已经创建。
pub fn scale_ratio_for_window(
    api: &dyn NativeApi,
    supported: bool,
    window: WindowHandle,
    device_scale: f64,
) -> DpiResult<ScaleRatio> {
    if !supported {
        return system_ratio(device_scale);
    }

    baseline_dpi(device_scale)?;

    let monitor = api
        .monitor_from_window(window, MonitorFallback::Nearest)
        .ok_or(DpiError::MonitorNotFound(window))?;
    let (dpi_x, _) = api.dpi_for_monitor(monitor, MonitorDpiType::Effective)?;

    ratio_for_monitor_dpi(dpi_x, device_scale)
}

/// 不区分显示器时的缩放比：框架已应用的系统 DPI
pub fn system_ratio(device_scale: f64) -> DpiResult<ScaleRatio> {
    ScaleRatio::new(baseline_dpi(device_scale)? / LAYOUT_DPI)
}

pub fn ratio_for_monitor_dpi(monitor_dpi: u32, device_scale: f64) -> DpiResult<ScaleRatio> {
    ScaleRatio::new(f64::from(monitor_dpi) / baseline_dpi(device_scale)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeNative, E_ACCESSDENIED};

    const WINDOW: WindowHandle = WindowHandle(0x42);

    #[test]
    fn unsupported_uses_framework_scale() {
        let api = FakeNative::unsupported();
        for monitor_dpi in [96, 144, 192] {
            api.monitor_dpi.set(monitor_dpi);
            let ratio = scale_ratio_for_window(&api, false, WINDOW, 1.25).unwrap();
            assert_eq!(ratio.value(), 1.25);
        }
        assert_eq!(api.dpi_queries.get(), 0);
    }

    #[test]
    fn supported_divides_monitor_dpi_by_baseline() {
        let api = FakeNative::supported(192);
        let ratio = scale_ratio_for_window(&api, true, WINDOW, 1.0).unwrap();
        assert_eq!(ratio.value(), 2.0);

        // 框架已经按 144 DPI 缩放时只需补足剩余部分
        let ratio = scale_ratio_for_window(&api, true, WINDOW, 1.5).unwrap();
        assert!((ratio.value() - 192.0 / 144.0).abs() < 1e-12);
    }

    #[test]
    fn ratio_is_positive_for_common_settings() {
        let api = FakeNative::supported(96);
        for dpi in [72, 96, 120, 144, 168, 192, 288, 384, 500] {
            api.monitor_dpi.set(dpi);
            for scale in [1.0, 1.25, 1.5, 2.0] {
                let ratio = scale_ratio_for_window(&api, true, WINDOW, scale).unwrap();
                assert!(ratio.value() > 0.0);
            }
        }
    }

    #[test]
    fn zero_baseline_fails_loudly() {
        let api = FakeNative::supported(96);
        let err = scale_ratio_for_window(&api, true, WINDOW, 0.0).unwrap_err();
        assert!(matches!(err, DpiError::InvalidBaseline(_)));

        let err = scale_ratio_for_window(&api, false, WINDOW, f64::NAN).unwrap_err();
        assert!(matches!(err, DpiError::InvalidBaseline(_)));
    }

    #[test]
    fn zero_monitor_dpi_is_rejected() {
        let api = FakeNative::supported(0);
        let err = scale_ratio_for_window(&api, true, WINDOW, 1.0).unwrap_err();
        assert!(matches!(err, DpiError::InvalidRatio(_)));
    }

    #[test]
    fn dpi_query_failure_surfaces() {
        let mut api = FakeNative::supported(96);
        api.dpi_query_error = Some(0x8007_0057_u32 as i32);
        let err = scale_ratio_for_window(&api, true, WINDOW, 1.0).unwrap_err();
        assert!(matches!(err, DpiError::Native { call: "GetDpiForMonitor", .. }));

        let mut api = FakeNative::supported(96);
        api.monitor_missing = true;
        let err = scale_ratio_for_window(&api, true, WINDOW, 1.0).unwrap_err();
        assert!(matches!(err, DpiError::MonitorNotFound(WINDOW)));
    }

    #[test]
    fn awareness_set_only_when_supported() {
        let api = FakeNative::unsupported();
        assert_eq!(apply_dpi_awareness(&api, false).unwrap(), AwarenessMode::SystemOnly);
        assert!(api.awareness_calls.borrow().is_empty());

        let api = FakeNative::supported(96);
        assert_eq!(apply_dpi_awareness(&api, true).unwrap(), AwarenessMode::PerMonitor);
        assert_eq!(
            *api.awareness_calls.borrow(),
            vec![ProcessDpiAwareness::PerMonitorAware]
        );
    }

    #[test]
    fn awareness_already_fixed_degrades() {
        let mut api = FakeNative::supported(96);
        api.awareness_error = Some(E_ACCESSDENIED);
        assert_eq!(apply_dpi_awareness(&api, true).unwrap(), AwarenessMode::AlreadySet);

        api.awareness_error = Some(0x8000_4005_u32 as i32);
        assert!(apply_dpi_awareness(&api, true).is_err());
    }

    #[test]
    fn ratio_display_as_percent() {
        assert_eq!(ScaleRatio::new(1.5).unwrap().to_string(), "150%");
        assert!(ScaleRatio::new(-1.0).is_err());
        assert!(ScaleRatio::new(f64::INFINITY).is_err());
    }
}
