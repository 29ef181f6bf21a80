//! Closed enumerations shared by every backend and the public `gpu` crate.

/// Which native graphics API a [`Factory`](crate) multiplexes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum BackendType {
    Undefined = 0,
    Null,
    Vulkan,
    D3D12,
    Metal,
    WebGPU,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ValidationMode {
    Disabled = 0,
    Enabled,
    Verbose,
    Gpu,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PowerPreference {
    None = 0,
    LowPower,
    HighPerformance,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

impl Default for PowerPreference {
    fn default() -> Self {
        PowerPreference::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AdapterType {
    Discrete = 0,
    Integrated,
    Cpu,
    Virtual,
    Other,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

/// PCI-vendor-derived adapter vendor, looked up from the raw `vendorID` a
/// backend reports. See `gpu_hal::auxil::vendor::vendor_from_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AdapterVendor {
    Unknown = 0,
    Amd,
    Apple,
    Arm,
    Intel,
    Microsoft,
    Nvidia,
    Qualcomm,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PresentMode {
    Fifo = 0,
    FifoRelaxed,
    Immediate,
    Mailbox,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

/// Closed set of GPU-visible-resource layouts; every subresource of every
/// texture tracks exactly one of these at a time (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TextureLayout {
    Undefined = 0,
    CopySource,
    CopyDest,
    ResolveSource,
    ResolveDest,
    ShaderResource,
    UnorderedAccess,
    RenderTarget,
    DepthWrite,
    DepthRead,
    Present,
    ShadingRateSurface,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TextureDimension {
    D1 = 0,
    D2,
    D3,
    Cube,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MemoryType {
    Private = 0,
    Upload,
    Readback,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum LoadAction {
    Discard = 0,
    Load,
    Clear,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum StoreAction {
    Discard = 0,
    Store,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum IndexFormat {
    Uint16 = 0,
    Uint32,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PrimitiveTopology {
    PointList = 0,
    LineList,
    LineStrip,
    TriangleList,
    TriangleStrip,
    PatchList,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FillMode {
    Fill = 0,
    Line,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CullMode {
    None = 0,
    Front,
    Back,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FrontFace {
    Ccw = 0,
    Cw,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CompareFunction {
    Never = 0,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum StencilOperation {
    Keep = 0,
    Zero,
    Replace,
    Invert,
    IncrementClamp,
    DecrementClamp,
    IncrementWrap,
    DecrementWrap,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ShadingRate {
    Rate1x1 = 0,
    Rate1x2,
    Rate2x1,
    Rate2x2,
    Rate2x4,
    Rate4x2,
    Rate4x4,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CommandQueueType {
    Graphics = 0,
    Compute,
    Copy,
    VideoDecode,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

pub const COMMAND_QUEUE_TYPE_COUNT: usize = 4;

/// Closed set of outcomes from `acquireSurfaceTexture` / `present` (§4.6, §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AcquireSurfaceResult {
    SuccessOptimal = 0,
    SuccessSuboptimal,
    Timeout,
    Outdated,
    Lost,
    OutOfMemory,
    Other,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

/// The closed set of GPU features backends may expose, gated behind
/// `Adapter::has_feature` / `Device` creation (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum GpuFeature {
    DepthClamping = 0,
    MappablePrimaryBuffers,
    IndirectFirstInstance,
    MultiDrawIndirect,
    MultiDrawIndirectCount,
    AddressModeClampToBorder,
    PolygonModeLine,
    PolygonModePoint,
    VertexWritableStorage,
    TimestampQuery,
    PipelineStatisticsQuery,
    TextureCompressionBc,
    TextureCompressionEtc2,
    TextureCompressionAstc,
    TextureCompressionAstcHdr,
    ConservativeRasterization,
    MeshShader,
    RayTracing,
    VariableRateShading,
    ClearCommands,
    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}
