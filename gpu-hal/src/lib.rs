/*!
# gpu-hal

Backend-agnostic rendering hardware interface.

`gpu-hal` defines one [`Api`] trait and implements it three times: once for
a Vulkan-class native API (behind the `vulkan` feature), once for a
D3D12-class native API (behind the `dx12` feature), and once for a
conformant `null` backend used by headless tooling and tests. Application
code never names a backend directly — it picks one dynamically at
[`Instance::new`] time and programs against the trait.

## Resource transitions

Every backend tracks, per subresource, a [`TextureLayout`](gpu_types::TextureLayout)
and computes transitions by looking up `(old, new)` in a static table
(`auxil::barrier`). The table, not the call site, is the single source of
truth for which native layout/sync-stage/access-mask triple a transition
needs — this is what keeps the two real backends' barrier behaviour in
lockstep.

## Memory

Buffers and textures are allocated through each backend's native allocator
(`gpu-alloc`/`gpu-descriptor` on Vulkan, committed resources on D3D12).
`initial_data` passed to `create_buffer`/`create_texture` for `Private`-memory
resources is staged and uploaded through a one-shot, backend-owned queue
submission (see `vulkan::device`/`dx12::device`) rather than a generic
cross-backend path, since each native API already owns the queue/fence type
the upload has to submit and wait on.

## Resource binding

Pipeline layouts carry only push-constant ranges end to end (§9's first
Open Question: bind-group layouts are declared but never wired to native
descriptor bindings by any backend here).
!*/

mod api;
pub mod auxil;

#[cfg(feature = "dx12")]
pub mod dx12;
pub mod null;
#[cfg(feature = "vulkan")]
pub mod vulkan;

pub use api::*;

/// Limited by D3D12's root signature size of 64 DWORDs; shared so the
/// enhanced (Vulkan) and legacy (D3D12) barrier paths agree on one ceiling.
pub const MAX_ROOT_ELEMENTS: usize = 64;
/// §4.6: the legacy D3D12-class barrier ring auto-flushes once full.
pub const MAX_BARRIER_COUNT: usize = 16;
pub const MAX_VERTEX_BUFFERS: usize = gpu_types::MAX_VERTEX_BUFFER_BINDINGS;
pub const MAX_COLOR_TARGETS: usize = gpu_types::MAX_COLOR_ATTACHMENTS;
pub const MAX_BIND_GROUPS: usize = 4;
