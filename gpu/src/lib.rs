//! Safe, refcounted, frame-pipelined GPU rendering hardware interface.
//!
//! Generic over any backend implementing [`gpu_hal::Api`]; application code
//! picks one by naming its marker type, e.g. [`gpu_hal::null::Null`] or,
//! behind the matching Cargo feature, `gpu_hal::vulkan::Api` /
//! `gpu_hal::dx12::Api`. Everything above the backend boundary —
//! refcounting and deferred destruction (§4.2), frame pacing (§4.11),
//! barrier tracking (§4.6), and the render/compute-pass encoders (§4.7,
//! §4.8) — lives here and is shared by every backend.
//!
//! ```no_run
//! use gpu::{Factory, FactoryDescriptor, RequestAdapterOptions};
//! use gpu_hal::null::Null;
//!
//! # fn main() -> Result<(), gpu::GpuError> {
//! let factory = unsafe { Factory::<Null>::new(&FactoryDescriptor::default())? };
//! let adapter = unsafe { factory.request_adapter(&RequestAdapterOptions::default()) }
//!     .expect("at least one adapter");
//! let device = unsafe { adapter.request_device(adapter.features(), adapter.limits())? };
//!
//! let queue = device.queue(gpu_types::CommandQueueType::Graphics).unwrap();
//! let mut cmd = queue.acquire_command_buffer(&device, Some("frame"))?;
//! cmd.begin_render_pass(&gpu::RenderPassDescriptor::default()).end();
//! queue.submit(&device, vec![cmd])?;
//! assert_eq!(device.commit_frame()?, 1);
//! # Ok(())
//! # }
//! ```

mod adapter;
mod command;
mod deferred;
mod device;
mod error;
mod factory;
mod handle;
mod pass;
mod queue;
mod resources;
mod surface;

pub use adapter::Adapter;
pub use command::{CommandBuffer, TextureBarrierRange};
pub use device::{
    BufferDescriptor, ComputePipelineDescriptor, Device, PipelineLayoutDescriptor,
    RenderPipelineDescriptor, TextureDescriptor,
};
pub use error::{AcquireSurfaceResult, GpuError, SurfaceError};
pub use factory::{Factory, FactoryDescriptor, RequestAdapterOptions};
pub use pass::{
    ColorAttachment, ComputePassDescriptor, ComputePassEncoder, DepthStencilAttachment,
    RenderPassDescriptor, RenderPassEncoder, ShadingRateAttachment,
};
pub use queue::Queue;
pub use resources::{
    BindGroupLayout, Buffer, ComputePipeline, PipelineLayout, QueryHeap, RenderPipeline, Sampler,
    ShaderModule, Texture,
};
pub use surface::{Surface, SurfaceConfiguration};

/// Re-exported hal descriptor types with no dependency on a backend's
/// associated types — reused verbatim as this crate's public surface for
/// the resources they describe (§3).
pub use gpu_hal::{
    AddressMode, BindGroupLayoutDescriptor, BindGroupLayoutEntry, ColorTargetState,
    DepthStencilState, FilterMode, MultisampleState, PushConstantRange, QueryHeapDescriptor,
    QueryType, RasterizerState, SamplerDescriptor, ShaderModuleDescriptor, StencilFaceState,
    VertexAttribute, VertexBufferLayout, VertexFormat, VertexState, VertexStepMode,
};

pub use gpu_hal::null;
#[cfg(feature = "vulkan")]
pub use gpu_hal::vulkan;
#[cfg(feature = "dx12")]
pub use gpu_hal::dx12;

pub use gpu_types::{MAX_COLOR_ATTACHMENTS, MAX_INFLIGHT_FRAMES, MAX_VERTEX_BUFFER_BINDINGS};
