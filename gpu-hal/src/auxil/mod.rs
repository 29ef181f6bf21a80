//! Shared logic every backend consults instead of reimplementing (§4.1–§4.4):
//! the PCI vendor-ID table, the layout/barrier semantics table, and the
//! D3D12-class descriptor allocator. `initial_data` staging (§4.4) is not
//! here — each native backend stages and submits through its own queue and
//! fence type directly (see `vulkan::Device::upload_buffer_initial_data`/
//! `dx12::Device::upload_buffer_initial_data`), which needed no generic
//! cross-backend layer once both were wired up (see `DESIGN.md`).

pub mod barrier;
pub mod descriptor;
pub mod vendor;
