//! 系统能力探测：是否存在 Per-Monitor DPI 接口

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::config::{DEFAULT_PROBE_LIBRARY, DEFAULT_PROBE_SYMBOL, GLOBAL_CONFIG};
use crate::native::NativeApi;

/// 进程内只探测一次，结果之后不再变化
pub struct CapabilityProbe {
    library: String,
    symbol: String,
    supported: OnceCell<bool>,
}

impl CapabilityProbe {
    pub fn new(library: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            symbol: symbol.into(),
            supported: OnceCell::new(),
        }
    }

    /// 首次调用时加载模块并查找导出，之后直接返回缓存值。
    /// 并发的首次调用可能各自探测一次，结果相同，只有一个会被缓存。
    pub fn is_supported(&self, api: &dyn NativeApi) -> bool {
        *self.supported.get_or_init(|| self.probe(api))
    }

    /// 已缓存的结果，尚未探测时为 `None`
    pub fn cached(&self) -> Option<bool> {
        self.supported.get().copied()
    }

    fn probe(&self, api: &dyn NativeApi) -> bool {
        let Some(library) = api.load_library(&self.library) else {
            debug!("无法加载 {}，不支持 Per-Monitor DPI", self.library);
            return false;
        };

        let found = api.has_export(library, &self.symbol);
        api.free_library(library);

        debug!("{}!{} 存在: {}", self.library, self.symbol, found);
        found
    }
}

impl Default for CapabilityProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_LIBRARY, DEFAULT_PROBE_SYMBOL)
    }
}

static PROCESS_PROBE: once_cell::sync::Lazy<CapabilityProbe> = once_cell::sync::Lazy::new(|| {
    CapabilityProbe::new(
        GLOBAL_CONFIG.probe_library.clone(),
        GLOBAL_CONFIG.probe_symbol.clone(),
    )
});

/// 进程级探测器，名称取自全局配置
pub fn process_probe() -> &'static CapabilityProbe {
    &PROCESS_PROBE
}

/// 进程级探测结果
pub fn is_high_dpi_supported(api: &dyn NativeApi) -> bool {
    PROCESS_PROBE.is_supported(api)
}
