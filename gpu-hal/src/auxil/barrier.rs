//! Layout/barrier semantics shared by every backend's barrier tracker
//! (§4.6). The actual native `(layout, sync stage, access mask)` triple is
//! backend-specific (Vulkan and D3D12 disagree on representation), but
//! which layouts are *legal on a compute queue* and whether a transition
//! is a no-op or a same-layout UAV barrier is pure semantics this table
//! settles once, for all backends.

use gpu_types::TextureLayout;

/// §4.6: "Transitions recorded on a compute queue are validated to lie
/// within the `{UnorderedAccess, ShaderResource, CopySource, CopyDest}`
/// subset".
pub fn is_valid_on_compute_queue(layout: TextureLayout) -> bool {
    matches!(
        layout,
        TextureLayout::UnorderedAccess
            | TextureLayout::ShaderResource
            | TextureLayout::CopySource
            | TextureLayout::CopyDest
    )
}

/// Whether `(old, new)` needs a transition at all, and if not, whether the
/// same-layout case still needs a UAV/execution barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// `old == new` and it isn't `UnorderedAccess`; nothing to emit.
    NoOp,
    /// `old == new == UnorderedAccess`; emit a UAV/execution barrier
    /// instead of a layout transition (§4.6).
    UavBarrier,
    /// A real layout transition from `old` to `new`.
    Transition,
}

pub fn classify(old: TextureLayout, new: TextureLayout) -> TransitionKind {
    if old == new {
        if old == TextureLayout::UnorderedAccess {
            TransitionKind::UavBarrier
        } else {
            TransitionKind::NoOp
        }
    } else {
        TransitionKind::Transition
    }
}

/// Default load/store actions for an attachment that doesn't specify them
/// (§4.7 step 3): `Load`/`Store` for color, `Clear`/`Discard` for depth.
pub fn default_color_load_store() -> (gpu_types::LoadAction, gpu_types::StoreAction) {
    (gpu_types::LoadAction::Load, gpu_types::StoreAction::Store)
}

pub fn default_depth_load_store() -> (gpu_types::LoadAction, gpu_types::StoreAction) {
    (gpu_types::LoadAction::Clear, gpu_types::StoreAction::Discard)
}

/// The layout a color/depth/shading-rate attachment must be transitioned
/// to before a render pass begins (§4.7 step 2).
pub fn attachment_entry_layout(is_depth: bool, depth_read_only: bool) -> TextureLayout {
    if is_depth {
        if depth_read_only {
            TextureLayout::DepthRead
        } else {
            TextureLayout::DepthWrite
        }
    } else {
        TextureLayout::RenderTarget
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_layout_is_noop_unless_uav() {
        assert_eq!(
            classify(TextureLayout::ShaderResource, TextureLayout::ShaderResource),
            TransitionKind::NoOp
        );
        assert_eq!(
            classify(TextureLayout::UnorderedAccess, TextureLayout::UnorderedAccess),
            TransitionKind::UavBarrier
        );
        assert_eq!(
            classify(TextureLayout::Undefined, TextureLayout::ShaderResource),
            TransitionKind::Transition
        );
    }

    #[test]
    fn compute_queue_subset_is_closed() {
        assert!(is_valid_on_compute_queue(TextureLayout::UnorderedAccess));
        assert!(is_valid_on_compute_queue(TextureLayout::CopyDest));
        assert!(!is_valid_on_compute_queue(TextureLayout::RenderTarget));
        assert!(!is_valid_on_compute_queue(TextureLayout::Present));
    }
}
