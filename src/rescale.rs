use tracing::info;

use crate::dpi::ScaleRatio;
use crate::element::{HostElement, ScaleTransform};
use crate::error::{DpiError, DpiResult};

/// 把均匀缩放写到元素的第一个可视子元素上。
///
/// 元素没有子元素说明行为挂错了地方，返回 [`DpiError::NoVisualChild`]。
pub fn apply_scale<E: HostElement + ?Sized>(element: &mut E, ratio: ScaleRatio) -> DpiResult<()> {
    if element.visual_child_count() == 0 {
        return Err(DpiError::NoVisualChild);
    }

    element.set_child_scale(0, ScaleTransform::uniform(ratio.value()));
    info!("内容缩放更新为 {}", ratio);
    Ok(())
}
