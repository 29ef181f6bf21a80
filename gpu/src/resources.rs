//! The resource types §3 describes as "immutable after creation;
//! destruction deferred": `Buffer`, `Texture`, `Sampler`, `PipelineLayout`,
//! `BindGroupLayout`, `ShaderModule`, `ComputePipeline`, `RenderPipeline`,
//! `QueryHeap`. Each is a `Handle<...Shared<A>>`; dropping the last handle
//! doesn't free the native object, it hands it to the owning device's
//! [`crate::deferred::DeferredDestructionQueue`] tagged with the frame it
//! was released on (§4.2).

use std::sync::atomic::Ordering;

use gpu_hal::Api;
use gpu_types::{BufferUsages, Extent3d, MemoryType, PixelFormat, TextureDimension, TextureUsages};

use crate::deferred::Retired;
use crate::device::DeviceShared;
use crate::handle::{Handle, Label};

/// Runs on every resource's shared inner struct: retire `raw` into the
/// owning device's deferred-destruction queue instead of freeing it here.
macro_rules! impl_resource {
    ($shared:ident, $raw_ty:ty, $variant:ident) => {
        impl<A: Api> Drop for $shared<A> {
            fn drop(&mut self) {
                if let Some(raw) = self.raw.take() {
                    let frame = self.device.frame_count.load(Ordering::Acquire);
                    self.device.deferred.retire(frame, Retired::$variant(raw));
                }
            }
        }
    };
}

// ---- Buffer ------------------------------------------------------------------

pub struct BufferShared<A: Api> {
    pub(crate) raw: Option<A::Buffer>,
    pub(crate) device: Handle<DeviceShared<A>>,
    pub(crate) size: u64,
    pub(crate) usage: BufferUsages,
    pub(crate) memory_type: MemoryType,
    pub(crate) label: Label,
}
impl_resource!(BufferShared, A::Buffer, Buffer);

/// `addRef`/`release` base (§3, §4.2): a strong-counted handle to a
/// backend-native buffer whose memory type determines whether it carries
/// a persistent mapped pointer (§3 invariant: `mapped != null ⇔ memoryType
/// ∈ {upload, readback}`).
pub struct Buffer<A: Api>(pub(crate) Handle<BufferShared<A>>);

impl<A: Api> Clone for Buffer<A> {
    fn clone(&self) -> Self {
        Buffer(self.0.clone())
    }
}

impl<A: Api> Buffer<A> {
    pub fn add_ref(&self) -> usize {
        self.0.add_ref()
    }
    pub fn release(self) -> usize {
        self.0.release()
    }
    pub fn size(&self) -> u64 {
        self.0.size
    }
    pub fn usage(&self) -> BufferUsages {
        self.0.usage
    }
    pub fn memory_type(&self) -> MemoryType {
        self.0.memory_type
    }
    pub fn label(&self) -> String {
        self.0.label.get()
    }
    pub fn set_label(&self, label: &str) {
        self.0.label.set(label)
    }

    pub(crate) fn raw(&self) -> &A::Buffer {
        self.0.raw.as_ref().expect("use of a buffer after release")
    }

    /// `mapped != null ⇔ memoryType ∈ {Upload, Readback}` (§3). Returns
    /// `None` for `Private` memory.
    ///
    /// # Safety
    /// The returned pointer is valid for `size()` bytes for as long as
    /// this handle (or a clone of it) is alive; writes to an `Upload`
    /// buffer and reads from a `Readback` buffer race with any command
    /// buffer that touches it unless externally synchronized (e.g. with
    /// `Device::wait_idle`).
    pub unsafe fn mapped_ptr(&self) -> Option<*mut u8> {
        use gpu_hal::Device as _;
        self.0.device.raw.buffer_mapped_ptr(self.raw())
    }
}

// ---- Texture ------------------------------------------------------------------

pub struct TextureShared<A: Api> {
    pub(crate) raw: Option<A::Texture>,
    pub(crate) device: Handle<DeviceShared<A>>,
    pub(crate) dimension: TextureDimension,
    pub(crate) format: PixelFormat,
    pub(crate) usage: TextureUsages,
    pub(crate) size: Extent3d,
    pub(crate) mip_level_count: u32,
    pub(crate) array_layer_count: u32,
    pub(crate) sample_count: u32,
    pub(crate) label: Label,
}
impl_resource!(TextureShared, A::Texture, Texture);

/// §3 "Texture": `numSubResources = mipLevelCount * depthOrArrayLayers`,
/// with `Cube` textures counting cubes publicly and ×6 internally (§9's
/// resolved Open Question — the expansion already happened once, in
/// `gpu_hal::TextureDescriptor::array_layer_count`, when this was created).
pub struct Texture<A: Api>(pub(crate) Handle<TextureShared<A>>);

impl<A: Api> Clone for Texture<A> {
    fn clone(&self) -> Self {
        Texture(self.0.clone())
    }
}

impl<A: Api> Texture<A> {
    pub fn add_ref(&self) -> usize {
        self.0.add_ref()
    }
    pub fn release(self) -> usize {
        self.0.release()
    }
    pub fn width(&self) -> u32 {
        self.0.size.width
    }
    pub fn height(&self) -> u32 {
        self.0.size.height
    }
    pub fn depth_or_array_layers(&self) -> u32 {
        self.0.size.depth_or_array_layers
    }
    pub fn dimension(&self) -> TextureDimension {
        self.0.dimension
    }
    pub fn format(&self) -> PixelFormat {
        self.0.format
    }
    pub fn usage(&self) -> TextureUsages {
        self.0.usage
    }
    pub fn mip_level_count(&self) -> u32 {
        self.0.mip_level_count
    }
    pub fn sample_count(&self) -> u32 {
        self.0.sample_count
    }
    pub fn num_subresources(&self) -> u32 {
        self.0.mip_level_count * self.0.array_layer_count
    }
    pub fn label(&self) -> String {
        self.0.label.get()
    }
    pub fn set_label(&self, label: &str) {
        self.0.label.set(label)
    }

    pub(crate) fn raw(&self) -> &A::Texture {
        self.0.raw.as_ref().expect("use of a texture after release")
    }
}

// ---- Sampler ------------------------------------------------------------------

pub struct SamplerShared<A: Api> {
    pub(crate) raw: Option<A::Sampler>,
    pub(crate) device: Handle<DeviceShared<A>>,
    pub(crate) label: Label,
}
impl_resource!(SamplerShared, A::Sampler, Sampler);

pub struct Sampler<A: Api>(pub(crate) Handle<SamplerShared<A>>);

impl<A: Api> Clone for Sampler<A> {
    fn clone(&self) -> Self {
        Sampler(self.0.clone())
    }
}

impl<A: Api> Sampler<A> {
    pub fn add_ref(&self) -> usize {
        self.0.add_ref()
    }
    pub fn release(self) -> usize {
        self.0.release()
    }
    pub fn label(&self) -> String {
        self.0.label.get()
    }
    pub(crate) fn raw(&self) -> &A::Sampler {
        self.0.raw.as_ref().expect("use of a sampler after release")
    }
}

// ---- BindGroupLayout ----------------------------------------------------------

pub struct BindGroupLayoutShared<A: Api> {
    pub(crate) raw: Option<A::BindGroupLayout>,
    pub(crate) device: Handle<DeviceShared<A>>,
    pub(crate) label: Label,
}
impl_resource!(BindGroupLayoutShared, A::BindGroupLayout, BindGroupLayout);

/// §9's first Open Question: declared, never wired to native descriptor
/// bindings by any backend here. Kept as a typed, constructible handle so
/// the surface exists for forward compatibility.
pub struct BindGroupLayout<A: Api>(pub(crate) Handle<BindGroupLayoutShared<A>>);

impl<A: Api> Clone for BindGroupLayout<A> {
    fn clone(&self) -> Self {
        BindGroupLayout(self.0.clone())
    }
}

impl<A: Api> BindGroupLayout<A> {
    pub fn add_ref(&self) -> usize {
        self.0.add_ref()
    }
    pub fn release(self) -> usize {
        self.0.release()
    }
    pub(crate) fn raw(&self) -> &A::BindGroupLayout {
        self.0.raw.as_ref().expect("use of a bind group layout after release")
    }
}

// ---- PipelineLayout -------------------------------------------------------------

pub struct PipelineLayoutShared<A: Api> {
    pub(crate) raw: Option<A::PipelineLayout>,
    pub(crate) device: Handle<DeviceShared<A>>,
    /// Prefix-sum offsets per declared push-constant range (§4.9): the
    /// layout, not the command buffer, is the source of truth for
    /// `(rangeIndex, offset, size)`.
    pub(crate) push_constant_ranges: Vec<gpu_types::PushConstant>,
    pub(crate) label: Label,
}
impl_resource!(PipelineLayoutShared, A::PipelineLayout, PipelineLayout);

pub struct PipelineLayout<A: Api>(pub(crate) Handle<PipelineLayoutShared<A>>);

impl<A: Api> Clone for PipelineLayout<A> {
    fn clone(&self) -> Self {
        PipelineLayout(self.0.clone())
    }
}

impl<A: Api> PipelineLayout<A> {
    pub fn add_ref(&self) -> usize {
        self.0.add_ref()
    }
    pub fn release(self) -> usize {
        self.0.release()
    }
    pub fn push_constant_ranges(&self) -> &[gpu_types::PushConstant] {
        &self.0.push_constant_ranges
    }
    pub(crate) fn raw(&self) -> &A::PipelineLayout {
        self.0.raw.as_ref().expect("use of a pipeline layout after release")
    }
}

// ---- ShaderModule ---------------------------------------------------------------

pub struct ShaderModuleShared<A: Api> {
    pub(crate) raw: Option<A::ShaderModule>,
    pub(crate) device: Handle<DeviceShared<A>>,
    pub(crate) label: Label,
}
impl_resource!(ShaderModuleShared, A::ShaderModule, ShaderModule);

pub struct ShaderModule<A: Api>(pub(crate) Handle<ShaderModuleShared<A>>);

impl<A: Api> Clone for ShaderModule<A> {
    fn clone(&self) -> Self {
        ShaderModule(self.0.clone())
    }
}

impl<A: Api> ShaderModule<A> {
    pub fn add_ref(&self) -> usize {
        self.0.add_ref()
    }
    pub fn release(self) -> usize {
        self.0.release()
    }
    pub(crate) fn raw(&self) -> &A::ShaderModule {
        self.0.raw.as_ref().expect("use of a shader module after release")
    }
}

// ---- RenderPipeline ---------------------------------------------------------------

pub struct RenderPipelineShared<A: Api> {
    pub(crate) raw: Option<A::RenderPipeline>,
    pub(crate) device: Handle<DeviceShared<A>>,
    /// Pipelines hold a strong reference to their layout (§4.9):
    /// destruction releases it only once this `Drop` runs.
    pub(crate) layout: PipelineLayout<A>,
    pub(crate) label: Label,
}
impl_resource!(RenderPipelineShared, A::RenderPipeline, RenderPipeline);

pub struct RenderPipeline<A: Api>(pub(crate) Handle<RenderPipelineShared<A>>);

impl<A: Api> Clone for RenderPipeline<A> {
    fn clone(&self) -> Self {
        RenderPipeline(self.0.clone())
    }
}

impl<A: Api> RenderPipeline<A> {
    pub fn add_ref(&self) -> usize {
        self.0.add_ref()
    }
    pub fn release(self) -> usize {
        self.0.release()
    }
    pub fn layout(&self) -> &PipelineLayout<A> {
        &self.0.layout
    }
    pub(crate) fn raw(&self) -> &A::RenderPipeline {
        self.0.raw.as_ref().expect("use of a render pipeline after release")
    }
}

// ---- ComputePipeline ---------------------------------------------------------------

pub struct ComputePipelineShared<A: Api> {
    pub(crate) raw: Option<A::ComputePipeline>,
    pub(crate) device: Handle<DeviceShared<A>>,
    pub(crate) layout: PipelineLayout<A>,
    pub(crate) label: Label,
}
impl_resource!(ComputePipelineShared, A::ComputePipeline, ComputePipeline);

pub struct ComputePipeline<A: Api>(pub(crate) Handle<ComputePipelineShared<A>>);

impl<A: Api> Clone for ComputePipeline<A> {
    fn clone(&self) -> Self {
        ComputePipeline(self.0.clone())
    }
}

impl<A: Api> ComputePipeline<A> {
    pub fn add_ref(&self) -> usize {
        self.0.add_ref()
    }
    pub fn release(self) -> usize {
        self.0.release()
    }
    pub fn layout(&self) -> &PipelineLayout<A> {
        &self.0.layout
    }
    pub(crate) fn raw(&self) -> &A::ComputePipeline {
        self.0.raw.as_ref().expect("use of a compute pipeline after release")
    }
}

// ---- QueryHeap ---------------------------------------------------------------

pub struct QueryHeapShared<A: Api> {
    pub(crate) raw: Option<A::QueryHeap>,
    pub(crate) device: Handle<DeviceShared<A>>,
    pub(crate) ty: gpu_hal::QueryType,
    pub(crate) count: u32,
    pub(crate) label: Label,
}
impl_resource!(QueryHeapShared, A::QueryHeap, QueryHeap);

pub struct QueryHeap<A: Api>(pub(crate) Handle<QueryHeapShared<A>>);

impl<A: Api> Clone for QueryHeap<A> {
    fn clone(&self) -> Self {
        QueryHeap(self.0.clone())
    }
}

impl<A: Api> QueryHeap<A> {
    pub fn add_ref(&self) -> usize {
        self.0.add_ref()
    }
    pub fn release(self) -> usize {
        self.0.release()
    }
    pub fn ty(&self) -> gpu_hal::QueryType {
        self.0.ty
    }
    pub fn count(&self) -> u32 {
        self.0.count
    }
    pub(crate) fn raw(&self) -> &A::QueryHeap {
        self.0.raw.as_ref().expect("use of a query heap after release")
    }
}
