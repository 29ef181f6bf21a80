//! Shared, backend-agnostic types for the `gpu` rendering hardware
//! interface: the pixel-format registry (§4.1), closed enumerations, ABI
//! structs and adapter limits (§3, §6).
//!
//! This crate carries no logic beyond pure functions over these types; the
//! `gpu-hal` crate consumes it to implement the per-backend `Api` trait,
//! and `gpu` re-exports most of it as the public surface.

mod enums;
mod features;
mod format;
mod limits;
mod structs;
mod usage;

pub use enums::*;
pub use features::Features;
pub use format::{
    bits_per_pixel, bytes_per_block, info, is_compressed, is_compressed_astc, is_compressed_bc,
    is_depth, is_depth_only, is_depth_stencil, is_integer, is_srgb, is_stencil, kind,
    linear_to_srgb, srgb_to_linear, surface_info, CompressionClass, FormatAspects, FormatKind,
    PixelFormat, PixelFormatInfo, SurfaceInfo, ALL_FORMATS,
};
pub use limits::{AdapterInfo, Alignments, DriverVersion, Limits, ShadingRateTier};
pub use structs::{
    Color, DispatchIndirectCommand, DrawIndexedIndirectCommand, DrawIndirectCommand, Extent3d,
    PushConstant, ScissorRect, Viewport, LOD_CLAMP_NONE, MAX_COLOR_ATTACHMENTS,
    MAX_INFLIGHT_FRAMES, MAX_VERTEX_BUFFER_BINDINGS, WHOLE_SIZE,
};
pub use usage::{BufferUsages, ColorWrites, TextureUsages};
