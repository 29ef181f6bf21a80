//! The `Api` trait and the descriptor/error types every backend shares.
//!
//! Grounded on `wgpu-hal::Api` and its associated-type backend selection
//! (`wgpu-hal/src/dx12/mod.rs`'s `impl crate::Api for Api`), generalized to
//! the resource model of spec §3/§4.

use std::{fmt, sync::Arc};

use gpu_types::{
    AcquireSurfaceResult, AdapterInfo, Alignments, BufferUsages, Color, Extent3d, Features,
    IndexFormat, Limits, LoadAction, MemoryType, PixelFormat, PresentMode, PrimitiveTopology,
    PushConstant, StoreAction, TextureDimension, TextureLayout, TextureUsages, Viewport,
};

/// One native graphics API behind the RHI. Never constructed directly by
/// application code; selected via [`crate::Instance::new`].
pub trait Api: Clone + fmt::Debug + Sized + Send + Sync + 'static {
    type Instance: Instance<Self>;
    type Surface: Surface<Self>;
    type Adapter: Adapter<Self>;
    type Device: Device<Self>;
    type Queue: Queue<Self>;
    type CommandBuffer: CommandBuffer<Self>;

    type Buffer: fmt::Debug + Send + Sync + 'static;
    type Texture: fmt::Debug + Send + Sync + 'static;
    type Sampler: fmt::Debug + Send + Sync + 'static;
    type QueryHeap: fmt::Debug + Send + Sync + 'static;
    type BindGroupLayout: fmt::Debug + Send + Sync + 'static;
    type PipelineLayout: fmt::Debug + Send + Sync + 'static;
    type ShaderModule: fmt::Debug + Send + Sync + 'static;
    type RenderPipeline: fmt::Debug + Send + Sync + 'static;
    type ComputePipeline: fmt::Debug + Send + Sync + 'static;
}

bitflags::bitflags! {
    /// Validation/debug behaviour requested of the backend at instance
    /// creation (§4.11's `validationMode`, generalized to a bitset so a
    /// backend can combine "validation on" with "also request GPU-based
    /// validation").
    #[derive(Default)]
    pub struct InstanceFlags: u32 {
        const VALIDATION = 1 << 0;
        const DEBUG = 1 << 1;
        const GPU_BASED_VALIDATION = 1 << 2;
    }
}

impl InstanceFlags {
    pub fn from_validation_mode(mode: gpu_types::ValidationMode) -> Self {
        match mode {
            gpu_types::ValidationMode::Disabled => InstanceFlags::empty(),
            gpu_types::ValidationMode::Enabled => InstanceFlags::VALIDATION,
            gpu_types::ValidationMode::Verbose => InstanceFlags::VALIDATION | InstanceFlags::DEBUG,
            gpu_types::ValidationMode::Gpu => {
                InstanceFlags::VALIDATION | InstanceFlags::GPU_BASED_VALIDATION
            }
            gpu_types::ValidationMode::_Force32 => InstanceFlags::empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InstanceDescriptor {
    pub flags: InstanceFlags,
}

/// Errors a native resource constructor or non-creating operation may
/// surface (§7). Constructors that fail return `Err` and the caller (the
/// `gpu` crate) logs the underlying native error verbatim at category GPU.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("out of memory")]
    OutOfMemory,
    #[error("device lost")]
    Lost,
}

/// Outcomes of acquire/present (§4.6, §4.10, §7).
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("surface timed out")]
    Timeout,
    #[error("surface outdated, needs reconfiguration")]
    Outdated,
    #[error("surface lost")]
    Lost,
    #[error("out of memory")]
    OutOfMemory,
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    #[error("no suitable backend adapter found")]
    NotFound,
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Capabilities {
    pub limits: Limits,
    pub alignments: Alignments,
}

/// An adapter plus the info/limits/features the instance already had to
/// query in order to expose it (§4.11's `expose`).
pub struct ExposedAdapter<A: Api> {
    pub adapter: A::Adapter,
    pub info: AdapterInfo,
    pub features: Features,
    pub capabilities: Capabilities,
}

/// A freshly opened device and the one queue per type the adapter exposes
/// (§3 "Device owns: one queue per type the adapter exposes").
pub struct OpenDevice<A: Api> {
    pub device: A::Device,
    pub queues: QueueSet<A>,
}

/// Sparse per-`CommandQueueType` queue table; `None` where the adapter
/// doesn't expose that queue type (e.g. no video-decode queue).
pub struct QueueSet<A: Api> {
    queues: [Option<A::Queue>; gpu_types::COMMAND_QUEUE_TYPE_COUNT],
}

impl<A: Api> QueueSet<A> {
    pub fn new(queues: [Option<A::Queue>; gpu_types::COMMAND_QUEUE_TYPE_COUNT]) -> Self {
        QueueSet { queues }
    }

    pub fn get(&self, ty: gpu_types::CommandQueueType) -> Option<&A::Queue> {
        self.queues[ty as usize].as_ref()
    }

    pub fn take(&mut self, ty: gpu_types::CommandQueueType) -> Option<A::Queue> {
        self.queues[ty as usize].take()
    }
}

bitflags::bitflags! {
    #[derive(Default)]
    pub struct TextureFormatCapabilities: u32 {
        const COPY_SRC = 1 << 0;
        const COPY_DST = 1 << 1;
        const SAMPLED = 1 << 2;
        const SAMPLED_LINEAR = 1 << 3;
        const COLOR_ATTACHMENT = 1 << 4;
        const COLOR_ATTACHMENT_BLEND = 1 << 5;
        const DEPTH_STENCIL_ATTACHMENT = 1 << 6;
        const STORAGE = 1 << 7;
        const STORAGE_READ_WRITE = 1 << 8;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeAlphaMode {
    Opaque,
    PreMultiplied,
    PostMultiplied,
}

#[derive(Debug, Clone)]
pub struct SurfaceCapabilities {
    pub formats: Vec<PixelFormat>,
    pub min_image_count: u32,
    pub max_image_count: u32,
    pub current_extent: Option<Extent3d>,
    pub usage: TextureUsages,
    pub present_modes: Vec<PresentMode>,
    pub composite_alpha_modes: Vec<CompositeAlphaMode>,
}

#[derive(Debug, Clone)]
pub struct SurfaceConfiguration {
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub present_mode: PresentMode,
    pub usage: TextureUsages,
}

// ---- resource descriptors (§3) -------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct BufferDescriptor<'a> {
    pub label: Option<&'a str>,
    pub size: u64,
    pub usage: BufferUsages,
    pub memory_type: MemoryTypeOrDefault,
}

/// `Default` can't be derived for `gpu_types::MemoryType`, so this mirrors
/// it with a `Private` default (the common case: GPU-private resources).
#[derive(Debug, Clone, Copy)]
pub enum MemoryTypeOrDefault {
    Private,
    Upload,
    Readback,
}

impl Default for MemoryTypeOrDefault {
    fn default() -> Self {
        MemoryTypeOrDefault::Private
    }
}

impl From<MemoryTypeOrDefault> for MemoryType {
    fn from(m: MemoryTypeOrDefault) -> Self {
        match m {
            MemoryTypeOrDefault::Private => MemoryType::Private,
            MemoryTypeOrDefault::Upload => MemoryType::Upload,
            MemoryTypeOrDefault::Readback => MemoryType::Readback,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TextureDescriptor<'a> {
    pub label: Option<&'a str>,
    pub dimension: TextureDimension,
    pub format: PixelFormat,
    pub usage: TextureUsages,
    pub size: Extent3d,
    pub mip_level_count: u32,
    pub sample_count: u32,
}

impl<'a> TextureDescriptor<'a> {
    /// `numSubResources = mipLevelCount * depthOrArrayLayers`, with cube
    /// textures counting cubes (§9's resolved Open Question): the ×6
    /// expansion happens here, once, for every backend.
    pub fn array_layer_count(&self) -> u32 {
        match self.dimension {
            TextureDimension::Cube => self.size.depth_or_array_layers * 6,
            _ => self.size.depth_or_array_layers,
        }
    }

    pub fn num_subresources(&self) -> u32 {
        self.mip_level_count * self.array_layer_count()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SamplerDescriptor<'a> {
    pub label: Option<&'a str>,
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
    pub mipmap_filter: FilterMode,
    pub address_mode_u: AddressMode,
    pub address_mode_v: AddressMode,
    pub address_mode_w: AddressMode,
    pub lod_min_clamp: f32,
    pub lod_max_clamp: f32,
    pub compare: Option<gpu_types::CompareFunction>,
    pub anisotropy_clamp: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    ClampToEdge,
    Repeat,
    MirrorRepeat,
    ClampToBorder,
}

/// Reserved surface: declared per §9's first Open Question but never wired
/// to native descriptor-set/root-table bindings by any backend.
#[derive(Debug, Clone, Default)]
pub struct BindGroupLayoutDescriptor<'a> {
    pub label: Option<&'a str>,
    pub entries: &'a [BindGroupLayoutEntry],
}

#[derive(Debug, Clone, Copy)]
pub struct BindGroupLayoutEntry {
    pub binding: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct PushConstantRange {
    pub offset: u32,
    pub size: u32,
}

impl PushConstantRange {
    pub fn to_push_constant(&self, range_index: u32) -> PushConstant {
        PushConstant {
            range_index,
            offset: self.offset,
            size: self.size,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PipelineLayoutDescriptor<'a> {
    pub label: Option<&'a str>,
    pub bind_group_layouts: &'a [Arc<()>],
    pub push_constant_ranges: &'a [PushConstantRange],
}

#[derive(Debug, Clone)]
pub struct ShaderModuleDescriptor<'a> {
    pub label: Option<&'a str>,
    /// Raw backend-native shader bytecode (SPIR-V words / DXIL bytes).
    /// Compiling source shading languages into this form is out of scope
    /// (§1 Non-goals: no shader compiler).
    pub source: &'a [u8],
    pub entry_point: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendComponent {
    pub src_factor: BlendFactor,
    pub dst_factor: BlendFactor,
    pub operation: BlendOperation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    Src,
    OneMinusSrc,
    SrcAlpha,
    OneMinusSrcAlpha,
    Dst,
    OneMinusDst,
    DstAlpha,
    OneMinusDstAlpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendOperation {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendState {
    pub color: BlendComponent,
    pub alpha: BlendComponent,
}

#[derive(Debug, Clone, Copy)]
pub struct ColorTargetState {
    pub format: PixelFormat,
    pub blend: Option<BlendState>,
    pub write_mask: gpu_types::ColorWrites,
}

#[derive(Debug, Clone, Copy)]
pub struct StencilFaceState {
    pub compare: gpu_types::CompareFunction,
    pub fail_op: gpu_types::StencilOperation,
    pub depth_fail_op: gpu_types::StencilOperation,
    pub pass_op: gpu_types::StencilOperation,
}

impl Default for StencilFaceState {
    fn default() -> Self {
        StencilFaceState {
            compare: gpu_types::CompareFunction::Always,
            fail_op: gpu_types::StencilOperation::Keep,
            depth_fail_op: gpu_types::StencilOperation::Keep,
            pass_op: gpu_types::StencilOperation::Keep,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DepthStencilState {
    pub format: PixelFormat,
    pub depth_write_enabled: bool,
    pub depth_compare: gpu_types::CompareFunction,
    pub stencil_front: StencilFaceState,
    pub stencil_back: StencilFaceState,
    pub stencil_read_mask: u32,
    pub stencil_write_mask: u32,
    pub depth_bias: i32,
    pub depth_bias_slope_scale: f32,
    pub depth_bias_clamp: f32,
    pub depth_bounds_enabled: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MultisampleState {
    pub count: u32,
    pub mask: u64,
    pub alpha_to_coverage_enabled: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct RasterizerState {
    pub fill_mode: gpu_types::FillMode,
    pub cull_mode: gpu_types::CullMode,
    pub front_face: gpu_types::FrontFace,
    pub depth_clip_enabled: bool,
    pub conservative_raster: bool,
}

impl Default for RasterizerState {
    fn default() -> Self {
        RasterizerState {
            fill_mode: gpu_types::FillMode::Fill,
            cull_mode: gpu_types::CullMode::None,
            front_face: gpu_types::FrontFace::Ccw,
            depth_clip_enabled: true,
            conservative_raster: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexStepMode {
    Vertex,
    Instance,
}

#[derive(Debug, Clone, Copy)]
pub struct VertexAttribute {
    pub format: VertexFormat,
    pub offset: u32,
    pub shader_location: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    Float32,
    Float32x2,
    Float32x3,
    Float32x4,
    Uint32,
    Uint32x2,
    Uint32x3,
    Uint32x4,
    Sint32,
    Unorm8x4,
}

impl VertexFormat {
    pub fn size(&self) -> u32 {
        match self {
            VertexFormat::Float32 | VertexFormat::Uint32 | VertexFormat::Sint32 => 4,
            VertexFormat::Unorm8x4 => 4,
            VertexFormat::Float32x2 | VertexFormat::Uint32x2 => 8,
            VertexFormat::Float32x3 | VertexFormat::Uint32x3 => 12,
            VertexFormat::Float32x4 | VertexFormat::Uint32x4 => 16,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VertexBufferLayout<'a> {
    pub array_stride: u64,
    pub step_mode: VertexStepMode,
    pub attributes: &'a [VertexAttribute],
}

#[derive(Debug, Clone, Default)]
pub struct VertexState<'a> {
    pub buffers: &'a [VertexBufferLayout<'a>],
}

#[derive(Debug, Clone)]
pub struct RenderPipelineDescriptor<'a, A: Api> {
    pub label: Option<&'a str>,
    pub layout: &'a A::PipelineLayout,
    pub vertex_shader: &'a A::ShaderModule,
    pub fragment_shader: Option<&'a A::ShaderModule>,
    pub vertex: VertexState<'a>,
    pub color_targets: &'a [ColorTargetState],
    pub depth_stencil: Option<DepthStencilState>,
    pub rasterizer: RasterizerState,
    pub multisample: MultisampleState,
    pub primitive_topology: PrimitiveTopology,
    pub patch_control_points: u32,
}

#[derive(Debug, Clone)]
pub struct ComputePipelineDescriptor<'a, A: Api> {
    pub label: Option<&'a str>,
    pub layout: &'a A::PipelineLayout,
    pub shader: &'a A::ShaderModule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Occlusion,
    Timestamp,
}

#[derive(Debug, Clone, Copy)]
pub struct QueryHeapDescriptor<'a> {
    pub label: Option<&'a str>,
    pub ty: QueryType,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandBufferDescriptor<'a> {
    pub label: Option<&'a str>,
}

// ---- pass descriptors (§4.7/§4.8) -----------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct ColorAttachment<'a, A: Api> {
    pub target: &'a A::Texture,
    pub mip_level: u32,
    pub array_layer: u32,
    pub load_op: LoadAction,
    pub store_op: StoreAction,
    pub clear_value: Color,
    pub resolve_target: Option<&'a A::Texture>,
}

#[derive(Debug, Clone, Copy)]
pub struct DepthStencilAttachment<'a, A: Api> {
    pub target: &'a A::Texture,
    pub mip_level: u32,
    pub array_layer: u32,
    pub depth_load_op: LoadAction,
    pub depth_store_op: StoreAction,
    pub depth_clear_value: f32,
    pub depth_read_only: bool,
    pub stencil_load_op: LoadAction,
    pub stencil_store_op: StoreAction,
    pub stencil_clear_value: u32,
    pub stencil_read_only: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ShadingRateAttachment<'a, A: Api> {
    pub target: &'a A::Texture,
    pub tile_size: u32,
}

#[derive(Clone)]
pub struct RenderPassDescriptor<'a, A: Api> {
    pub label: Option<&'a str>,
    pub color_attachments: &'a [Option<ColorAttachment<'a, A>>],
    pub depth_stencil_attachment: Option<DepthStencilAttachment<'a, A>>,
    pub shading_rate_attachment: Option<ShadingRateAttachment<'a, A>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ComputePassDescriptor<'a> {
    pub label: Option<&'a str>,
}

// ---- barriers (§4.6) -------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct TextureBarrierRange {
    pub base_mip: u32,
    pub level_count: u32,
    pub base_layer: u32,
    pub layer_count: u32,
    pub aspects: gpu_types::FormatAspects,
}

/// Re-exports to keep backend modules' `use` lists short.
pub use gpu_types::{FormatAspects as Aspects, TextureLayout as Layout};

// ---- traits ------------------------------------------------------------------------

/// Platform instance: backend entry point, adapter enumeration, surface
/// creation from an opaque native-surface handle (§6).
pub unsafe trait Instance<A: Api>: Sized + Send + Sync {
    unsafe fn init(desc: &InstanceDescriptor) -> Result<Self, InstanceError>;
    unsafe fn enumerate_adapters(&self) -> Vec<ExposedAdapter<A>>;
    unsafe fn create_surface(
        &self,
        handle: &dyn raw_window_handle::HasRawWindowHandle,
    ) -> Result<A::Surface, InstanceError>;
    unsafe fn destroy_surface(&self, surface: A::Surface);
}

/// A native swapchain bound to a platform window (§4.10). Reconfiguration
/// is idempotent: calling `configure` again with an unchanged descriptor
/// must not recreate backing images.
pub unsafe trait Surface<A: Api>: Send + Sync {
    unsafe fn configure(
        &mut self,
        device: &A::Device,
        config: &SurfaceConfiguration,
    ) -> Result<(), SurfaceError>;
    unsafe fn unconfigure(&mut self, device: &A::Device);

    /// Returns the outcome alongside the acquired texture on either success
    /// variant; `None` on `Timeout`/`Outdated`/`Lost`/`OutOfMemory`/`Other`.
    unsafe fn acquire_texture(
        &mut self,
        timeout_ms: Option<u32>,
    ) -> (AcquireSurfaceResult, Option<A::Texture>);
}

/// A discoverable physical or virtual GPU (§3 "Adapter").
pub unsafe trait Adapter<A: Api>: Send + Sync {
    unsafe fn open(
        &self,
        features: Features,
        limits: &Limits,
    ) -> Result<OpenDevice<A>, DeviceError>;
    unsafe fn texture_format_capabilities(&self, format: PixelFormat) -> TextureFormatCapabilities;
    unsafe fn surface_capabilities(&self, surface: &A::Surface) -> Option<SurfaceCapabilities>;
}

/// Resource factory + per-frame bookkeeping hooks a `Device` must provide
/// (§4.11). Frame pipelining itself (the `frameCount`/`frameIndex` state
/// machine and the deferred-destruction sweep) lives one layer up, in the
/// `gpu` crate, generically over any `Device<A>`.
pub unsafe trait Device<A: Api>: Send + Sync {
    unsafe fn create_buffer(
        &self,
        desc: &BufferDescriptor,
        initial_data: Option<&[u8]>,
    ) -> Result<A::Buffer, DeviceError>;
    unsafe fn destroy_buffer(&self, buffer: A::Buffer);
    /// Returns the persistent mapped pointer for `Upload`/`Readback`
    /// buffers; `None` for `Private` memory (§3 invariant).
    unsafe fn buffer_mapped_ptr(&self, buffer: &A::Buffer) -> Option<*mut u8>;

    unsafe fn create_texture(
        &self,
        desc: &TextureDescriptor,
        initial_data: Option<&[u8]>,
    ) -> Result<A::Texture, DeviceError>;
    unsafe fn destroy_texture(&self, texture: A::Texture);

    unsafe fn create_sampler(&self, desc: &SamplerDescriptor) -> Result<A::Sampler, DeviceError>;
    unsafe fn destroy_sampler(&self, sampler: A::Sampler);

    unsafe fn create_bind_group_layout(
        &self,
        desc: &BindGroupLayoutDescriptor,
    ) -> Result<A::BindGroupLayout, DeviceError>;
    unsafe fn destroy_bind_group_layout(&self, layout: A::BindGroupLayout);

    unsafe fn create_pipeline_layout(
        &self,
        desc: &PipelineLayoutDescriptor,
    ) -> Result<A::PipelineLayout, DeviceError>;
    unsafe fn destroy_pipeline_layout(&self, layout: A::PipelineLayout);

    unsafe fn create_shader_module(
        &self,
        desc: &ShaderModuleDescriptor,
    ) -> Result<A::ShaderModule, DeviceError>;
    unsafe fn destroy_shader_module(&self, module: A::ShaderModule);

    unsafe fn create_render_pipeline(
        &self,
        desc: &RenderPipelineDescriptor<A>,
    ) -> Result<A::RenderPipeline, DeviceError>;
    unsafe fn destroy_render_pipeline(&self, pipeline: A::RenderPipeline);

    unsafe fn create_compute_pipeline(
        &self,
        desc: &ComputePipelineDescriptor<A>,
    ) -> Result<A::ComputePipeline, DeviceError>;
    unsafe fn destroy_compute_pipeline(&self, pipeline: A::ComputePipeline);

    unsafe fn create_query_heap(&self, desc: &QueryHeapDescriptor) -> Result<A::QueryHeap, DeviceError>;
    unsafe fn destroy_query_heap(&self, heap: A::QueryHeap);

    unsafe fn create_command_buffer(
        &self,
        desc: &CommandBufferDescriptor,
    ) -> Result<A::CommandBuffer, DeviceError>;

    unsafe fn wait_idle(&self) -> Result<(), DeviceError>;
    fn timestamp_frequency(&self) -> u64;
}

/// Per-type command submission (§4.5).
pub unsafe trait Queue<A: Api>: Send + Sync {
    unsafe fn submit(&self, command_buffers: &[&A::CommandBuffer]) -> Result<(), DeviceError>;
    unsafe fn present(&self, surface: &mut A::Surface) -> Result<(), SurfaceError>;
    unsafe fn wait_idle(&self) -> Result<(), DeviceError>;
}

/// Records commands and tracks barriers (§4.6); also plays the role of
/// both `RenderPassEncoder` and `ComputePassEncoder` host, matching the
/// original's single-object-does-recording model (§3 "CommandBuffer").
pub unsafe trait CommandBuffer<A: Api>: Send + Sync {
    unsafe fn begin(&mut self);
    unsafe fn end(&mut self);

    unsafe fn texture_barrier(
        &mut self,
        texture: &A::Texture,
        new_layout: Layout,
        range: TextureBarrierRange,
    );
    unsafe fn buffer_barrier(&mut self, buffer: &A::Buffer);
    unsafe fn global_barrier(&mut self);
    unsafe fn flush_barriers(&mut self);

    unsafe fn copy_buffer_to_buffer(
        &mut self,
        src: &A::Buffer,
        src_offset: u64,
        dst: &A::Buffer,
        dst_offset: u64,
        size: u64,
    );
    unsafe fn copy_buffer_to_texture(&mut self, src: &A::Buffer, dst: &A::Texture, mip: u32, layer: u32);
    unsafe fn copy_texture_to_buffer(&mut self, src: &A::Texture, mip: u32, layer: u32, dst: &A::Buffer);

    unsafe fn begin_render_pass(&mut self, desc: &RenderPassDescriptor<A>);
    unsafe fn end_render_pass(&mut self);
    unsafe fn begin_compute_pass(&mut self, desc: &ComputePassDescriptor);
    unsafe fn end_compute_pass(&mut self);

    unsafe fn set_viewports(&mut self, viewports: &[Viewport]);
    unsafe fn set_scissor_rects(&mut self, rects: &[gpu_types::ScissorRect]);
    unsafe fn set_blend_color(&mut self, color: Color);
    unsafe fn set_stencil_reference(&mut self, reference: u32);
    unsafe fn set_vertex_buffer(&mut self, slot: u32, buffer: &A::Buffer, offset: u64);
    unsafe fn set_index_buffer(&mut self, buffer: &A::Buffer, format: IndexFormat, offset: u64);
    unsafe fn set_render_pipeline(&mut self, pipeline: &A::RenderPipeline);
    unsafe fn set_compute_pipeline(&mut self, pipeline: &A::ComputePipeline);
    unsafe fn set_push_constants(&mut self, layout: &A::PipelineLayout, range_index: u32, data: &[u8]);
    unsafe fn set_shading_rate(&mut self, rate: gpu_types::ShadingRate);

    unsafe fn draw(&mut self, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32);
    unsafe fn draw_indexed(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        base_vertex: i32,
        first_instance: u32,
    );
    unsafe fn draw_indirect(&mut self, indirect_buffer: &A::Buffer, offset: u64);
    unsafe fn draw_indexed_indirect(&mut self, indirect_buffer: &A::Buffer, offset: u64);
    unsafe fn multi_draw_indirect(
        &mut self,
        indirect_buffer: &A::Buffer,
        offset: u64,
        max_count: u32,
        count_buffer: Option<(&A::Buffer, u64)>,
    );
    unsafe fn multi_draw_indexed_indirect(
        &mut self,
        indirect_buffer: &A::Buffer,
        offset: u64,
        max_count: u32,
        count_buffer: Option<(&A::Buffer, u64)>,
    );

    unsafe fn dispatch(&mut self, x: u32, y: u32, z: u32);
    unsafe fn dispatch_indirect(&mut self, indirect_buffer: &A::Buffer, offset: u64);

    unsafe fn push_debug_group(&mut self, label: &str);
    unsafe fn pop_debug_group(&mut self);
    unsafe fn insert_debug_marker(&mut self, label: &str);
}
