//! Conformant headless backend (§3 "Null backend"). Every `Api` operation
//! succeeds and, where it would move bytes on a real GPU, moves the same
//! bytes through plain host memory instead: no native graphics API is ever
//! touched. Grounded on `alimer_gpu_null.cpp`'s `NullInstance`/`NullAdapter`/
//! `NullDevice`/`NullQueue`/`NullCommandBuffer`, generalized so copies
//! actually execute rather than being pure no-ops, since the testable
//! properties (§8) need observable data flow even with no GPU underneath.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use gpu_types::{
    AcquireSurfaceResult, AdapterInfo, AdapterType, BackendType, DriverVersion, Extent3d, Features,
    FormatAspects, MemoryType, PixelFormat, PresentMode, TextureDimension, TextureLayout,
    TextureUsages,
};

use crate::{
    Adapter as AdapterTrait, BindGroupLayoutDescriptor, BufferDescriptor, Capabilities,
    CommandBuffer as CommandBufferTrait, CommandBufferDescriptor, ComputePassDescriptor,
    ComputePipelineDescriptor, Device as DeviceTrait, DeviceError, ExposedAdapter,
    Instance as InstanceTrait, InstanceDescriptor, InstanceError, OpenDevice,
    PipelineLayoutDescriptor, QueryHeapDescriptor, Queue as QueueTrait, QueueSet,
    RenderPassDescriptor, RenderPipelineDescriptor, SamplerDescriptor, ShaderModuleDescriptor,
    Surface as SurfaceTrait, SurfaceCapabilities, SurfaceConfiguration, SurfaceError,
    TextureBarrierRange, TextureDescriptor, TextureFormatCapabilities,
};

#[derive(Clone, Debug)]
pub struct Null;

impl crate::Api for Null {
    type Instance = Instance;
    type Surface = Surface;
    type Adapter = Adapter;
    type Device = Device;
    type Queue = Queue;
    type CommandBuffer = CommandBuffer;

    type Buffer = Buffer;
    type Texture = Texture;
    type Sampler = Sampler;
    type QueryHeap = QueryHeap;
    type BindGroupLayout = BindGroupLayout;
    type PipelineLayout = PipelineLayout;
    type ShaderModule = ShaderModule;
    type RenderPipeline = RenderPipeline;
    type ComputePipeline = ComputePipeline;
}

// ---- resources --------------------------------------------------------------

/// Backing storage sized at creation and never reallocated, so a raw
/// pointer handed out by `buffer_mapped_ptr` stays valid for the buffer's
/// lifetime without holding a lock.
#[derive(Debug)]
pub struct Buffer {
    storage: Mutex<Box<[u8]>>,
    size: u64,
    memory_type: MemoryType,
}

impl Buffer {
    fn mapped_ptr(&self) -> Option<*mut u8> {
        match self.memory_type {
            MemoryType::Upload | MemoryType::Readback => {
                Some(self.storage.lock().as_mut_ptr())
            }
            MemoryType::Private => None,
            MemoryType::_Force32 => None,
        }
    }
}

#[derive(Debug)]
pub struct Texture {
    desc_size: Extent3d,
    format: PixelFormat,
    dimension: TextureDimension,
    mip_level_count: u32,
    array_layer_count: u32,
    /// One flat byte buffer per subresource, indexed `mip * array_layer_count + layer`.
    subresources: Vec<Mutex<Box<[u8]>>>,
    layouts: Mutex<Vec<TextureLayout>>,
}

impl Texture {
    fn subresource_index(&self, mip: u32, layer: u32) -> usize {
        (mip * self.array_layer_count + layer) as usize
    }

    fn mip_extent(&self, mip: u32) -> (u32, u32) {
        (
            (self.desc_size.width >> mip).max(1),
            (self.desc_size.height >> mip).max(1),
        )
    }
}

#[derive(Debug)]
pub struct Sampler;

#[derive(Debug)]
pub struct QueryHeap {
    count: u32,
}

#[derive(Debug)]
pub struct BindGroupLayout;

#[derive(Debug)]
pub struct PipelineLayout {
    push_constant_ranges: Vec<crate::PushConstantRange>,
}

#[derive(Debug)]
pub struct ShaderModule;

#[derive(Debug)]
pub struct RenderPipeline;

#[derive(Debug)]
pub struct ComputePipeline;

// ---- instance / adapter -----------------------------------------------------

pub struct Instance;

unsafe impl InstanceTrait<Null> for Instance {
    unsafe fn init(_desc: &InstanceDescriptor) -> Result<Self, InstanceError> {
        Ok(Instance)
    }

    unsafe fn enumerate_adapters(&self) -> Vec<ExposedAdapter<Null>> {
        vec![ExposedAdapter {
            adapter: Adapter,
            info: AdapterInfo {
                name: "Null Adapter".to_string(),
                vendor: gpu_types::AdapterVendor::Unknown,
                vendor_id: 0,
                device_id: 0,
                driver_version: DriverVersion {
                    major: 1,
                    minor: 0,
                    subminor: 0,
                    build: 0,
                },
                adapter_type: AdapterType::Cpu,
                backend: BackendType::Null,
            },
            features: Features::empty(),
            capabilities: Capabilities::default(),
        }]
    }

    unsafe fn create_surface(
        &self,
        _handle: &dyn raw_window_handle::HasRawWindowHandle,
    ) -> Result<Surface, InstanceError> {
        Ok(Surface {
            configured: Mutex::new(None),
        })
    }

    unsafe fn destroy_surface(&self, _surface: Surface) {}
}

pub struct Surface {
    configured: Mutex<Option<SurfaceConfiguration>>,
}

unsafe impl SurfaceTrait<Null> for Surface {
    unsafe fn configure(
        &mut self,
        _device: &Device,
        config: &SurfaceConfiguration,
    ) -> Result<(), SurfaceError> {
        *self.configured.lock() = Some(config.clone());
        Ok(())
    }

    unsafe fn unconfigure(&mut self, _device: &Device) {
        *self.configured.lock() = None;
    }

    unsafe fn acquire_texture(
        &mut self,
        _timeout_ms: Option<u32>,
    ) -> (AcquireSurfaceResult, Option<Texture>) {
        let configured = self.configured.lock();
        let config = match configured.as_ref() {
            Some(config) => config,
            None => return (AcquireSurfaceResult::Outdated, None),
        };
        let texture = new_texture(&TextureDescriptor {
            label: Some("null surface backbuffer"),
            dimension: TextureDimension::D2,
            format: config.format,
            usage: config.usage,
            size: Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
        });
        (AcquireSurfaceResult::SuccessOptimal, Some(texture))
    }
}

pub struct Adapter;

unsafe impl AdapterTrait<Null> for Adapter {
    unsafe fn open(
        &self,
        _features: Features,
        _limits: &gpu_types::Limits,
    ) -> Result<OpenDevice<Null>, DeviceError> {
        let mut queues: [Option<Queue>; gpu_types::COMMAND_QUEUE_TYPE_COUNT] = Default::default();
        queues[gpu_types::CommandQueueType::Graphics as usize] = Some(Queue);
        queues[gpu_types::CommandQueueType::Compute as usize] = Some(Queue);
        queues[gpu_types::CommandQueueType::Copy as usize] = Some(Queue);
        Ok(OpenDevice {
            device: Device {
                timestamp_frequency: AtomicU64::new(1_000_000_000),
            },
            queues: QueueSet::new(queues),
        })
    }

    unsafe fn texture_format_capabilities(&self, _format: PixelFormat) -> TextureFormatCapabilities {
        TextureFormatCapabilities::COPY_SRC
            | TextureFormatCapabilities::COPY_DST
            | TextureFormatCapabilities::SAMPLED
            | TextureFormatCapabilities::SAMPLED_LINEAR
            | TextureFormatCapabilities::COLOR_ATTACHMENT
            | TextureFormatCapabilities::COLOR_ATTACHMENT_BLEND
            | TextureFormatCapabilities::DEPTH_STENCIL_ATTACHMENT
            | TextureFormatCapabilities::STORAGE
            | TextureFormatCapabilities::STORAGE_READ_WRITE
    }

    unsafe fn surface_capabilities(&self, _surface: &Surface) -> Option<SurfaceCapabilities> {
        Some(SurfaceCapabilities {
            formats: vec![PixelFormat::Bgra8Unorm],
            min_image_count: 2,
            max_image_count: 3,
            current_extent: None,
            usage: TextureUsages::RENDER_TARGET | TextureUsages::COPY_SRC,
            present_modes: vec![PresentMode::Fifo, PresentMode::Immediate],
            composite_alpha_modes: vec![crate::CompositeAlphaMode::Opaque],
        })
    }
}

// ---- device -------------------------------------------------------------------

pub struct Device {
    timestamp_frequency: AtomicU64,
}

fn new_buffer(desc: &BufferDescriptor, initial_data: Option<&[u8]>) -> Buffer {
    let mut storage = vec![0u8; desc.size as usize].into_boxed_slice();
    if let Some(data) = initial_data {
        storage[..data.len().min(storage.len())].copy_from_slice(&data[..data.len().min(storage.len())]);
    }
    Buffer {
        storage: Mutex::new(storage),
        size: desc.size,
        memory_type: desc.memory_type.into(),
    }
}

fn new_texture(desc: &TextureDescriptor) -> Texture {
    let array_layer_count = desc.array_layer_count();
    let mut subresources = Vec::with_capacity((desc.mip_level_count * array_layer_count) as usize);
    for mip in 0..desc.mip_level_count {
        let w = (desc.size.width >> mip).max(1);
        let h = (desc.size.height >> mip).max(1);
        let info = gpu_types::surface_info(desc.format, w, h);
        let level_bytes = info.slice_pitch as usize;
        for _layer in 0..array_layer_count {
            subresources.push(Mutex::new(vec![0u8; level_bytes].into_boxed_slice()));
        }
    }
    let layout_count = (desc.mip_level_count * array_layer_count) as usize;
    Texture {
        desc_size: desc.size,
        format: desc.format,
        dimension: desc.dimension,
        mip_level_count: desc.mip_level_count,
        array_layer_count,
        subresources,
        layouts: Mutex::new(vec![TextureLayout::Undefined; layout_count]),
    }
}

unsafe impl DeviceTrait<Null> for Device {
    unsafe fn create_buffer(
        &self,
        desc: &BufferDescriptor,
        initial_data: Option<&[u8]>,
    ) -> Result<Buffer, DeviceError> {
        Ok(new_buffer(desc, initial_data))
    }

    unsafe fn destroy_buffer(&self, _buffer: Buffer) {}

    unsafe fn buffer_mapped_ptr(&self, buffer: &Buffer) -> Option<*mut u8> {
        buffer.mapped_ptr()
    }

    unsafe fn create_texture(
        &self,
        desc: &TextureDescriptor,
        initial_data: Option<&[u8]>,
    ) -> Result<Texture, DeviceError> {
        let texture = new_texture(desc);
        if let Some(data) = initial_data {
            let mut offset = 0usize;
            for subresource in &texture.subresources {
                let mut storage = subresource.lock();
                let len = storage.len().min(data.len().saturating_sub(offset));
                storage[..len].copy_from_slice(&data[offset..offset + len]);
                offset += storage.len();
            }
        }
        Ok(texture)
    }

    unsafe fn destroy_texture(&self, _texture: Texture) {}

    unsafe fn create_sampler(&self, _desc: &SamplerDescriptor) -> Result<Sampler, DeviceError> {
        Ok(Sampler)
    }

    unsafe fn destroy_sampler(&self, _sampler: Sampler) {}

    unsafe fn create_bind_group_layout(
        &self,
        _desc: &BindGroupLayoutDescriptor,
    ) -> Result<BindGroupLayout, DeviceError> {
        Ok(BindGroupLayout)
    }

    unsafe fn destroy_bind_group_layout(&self, _layout: BindGroupLayout) {}

    unsafe fn create_pipeline_layout(
        &self,
        desc: &PipelineLayoutDescriptor,
    ) -> Result<PipelineLayout, DeviceError> {
        Ok(PipelineLayout {
            push_constant_ranges: desc.push_constant_ranges.to_vec(),
        })
    }

    unsafe fn destroy_pipeline_layout(&self, _layout: PipelineLayout) {}

    unsafe fn create_shader_module(
        &self,
        _desc: &ShaderModuleDescriptor,
    ) -> Result<ShaderModule, DeviceError> {
        Ok(ShaderModule)
    }

    unsafe fn destroy_shader_module(&self, _module: ShaderModule) {}

    unsafe fn create_render_pipeline(
        &self,
        _desc: &RenderPipelineDescriptor<Null>,
    ) -> Result<RenderPipeline, DeviceError> {
        Ok(RenderPipeline)
    }

    unsafe fn destroy_render_pipeline(&self, _pipeline: RenderPipeline) {}

    unsafe fn create_compute_pipeline(
        &self,
        _desc: &ComputePipelineDescriptor<Null>,
    ) -> Result<ComputePipeline, DeviceError> {
        Ok(ComputePipeline)
    }

    unsafe fn destroy_compute_pipeline(&self, _pipeline: ComputePipeline) {}

    unsafe fn create_query_heap(&self, desc: &QueryHeapDescriptor) -> Result<QueryHeap, DeviceError> {
        Ok(QueryHeap { count: desc.count })
    }

    unsafe fn destroy_query_heap(&self, _heap: QueryHeap) {}

    unsafe fn create_command_buffer(
        &self,
        _desc: &CommandBufferDescriptor,
    ) -> Result<CommandBuffer, DeviceError> {
        Ok(CommandBuffer {
            recording: false,
            encoder_active: false,
        })
    }

    unsafe fn wait_idle(&self) -> Result<(), DeviceError> {
        Ok(())
    }

    fn timestamp_frequency(&self) -> u64 {
        self.timestamp_frequency.load(Ordering::Relaxed)
    }
}

// ---- queue ----------------------------------------------------------------------

pub struct Queue;

unsafe impl QueueTrait<Null> for Queue {
    unsafe fn submit(&self, _command_buffers: &[&CommandBuffer]) -> Result<(), DeviceError> {
        Ok(())
    }

    unsafe fn present(&self, _surface: &mut Surface) -> Result<(), SurfaceError> {
        Ok(())
    }

    unsafe fn wait_idle(&self) -> Result<(), DeviceError> {
        Ok(())
    }
}

// ---- command buffer ---------------------------------------------------------------

/// Every side effect (copies, barrier bookkeeping) executes eagerly at
/// record time: the null backend has no device timeline to defer onto, so
/// `submit` stays a no-op and `CommandBuffer` does the work directly. This
/// is observably equivalent to deferred execution for the single-threaded,
/// synchronous recording this backend is built for.
pub struct CommandBuffer {
    recording: bool,
    encoder_active: bool,
}

unsafe impl CommandBufferTrait<Null> for CommandBuffer {
    unsafe fn begin(&mut self) {
        debug_assert!(!self.recording, "begin() called on an already-recording command buffer");
        self.recording = true;
    }

    unsafe fn end(&mut self) {
        debug_assert!(!self.encoder_active, "end() called with a pass still open");
        self.recording = false;
    }

    unsafe fn texture_barrier(
        &mut self,
        texture: &Texture,
        new_layout: TextureLayout,
        range: TextureBarrierRange,
    ) {
        let mut layouts = texture.layouts.lock();
        for mip in range.base_mip..range.base_mip + range.level_count {
            for layer in range.base_layer..range.base_layer + range.layer_count {
                let index = texture.subresource_index(mip, layer);
                if index < layouts.len() {
                    layouts[index] = new_layout;
                }
            }
        }
    }

    unsafe fn buffer_barrier(&mut self, _buffer: &Buffer) {}
    unsafe fn global_barrier(&mut self) {}
    unsafe fn flush_barriers(&mut self) {}

    unsafe fn copy_buffer_to_buffer(
        &mut self,
        src: &Buffer,
        src_offset: u64,
        dst: &Buffer,
        dst_offset: u64,
        size: u64,
    ) {
        let src_storage = src.storage.lock();
        let mut dst_storage = dst.storage.lock();
        let size = size as usize;
        let src_offset = src_offset as usize;
        let dst_offset = dst_offset as usize;
        dst_storage[dst_offset..dst_offset + size]
            .copy_from_slice(&src_storage[src_offset..src_offset + size]);
    }

    unsafe fn copy_buffer_to_texture(&mut self, src: &Buffer, dst: &Texture, mip: u32, layer: u32) {
        let index = dst.subresource_index(mip, layer);
        let src_storage = src.storage.lock();
        let mut dst_storage = dst.subresources[index].lock();
        let len = dst_storage.len().min(src_storage.len());
        dst_storage[..len].copy_from_slice(&src_storage[..len]);
    }

    unsafe fn copy_texture_to_buffer(&mut self, src: &Texture, mip: u32, layer: u32, dst: &Buffer) {
        let index = src.subresource_index(mip, layer);
        let src_storage = src.subresources[index].lock();
        let mut dst_storage = dst.storage.lock();
        let len = dst_storage.len().min(src_storage.len());
        dst_storage[..len].copy_from_slice(&src_storage[..len]);
    }

    unsafe fn begin_render_pass(&mut self, _desc: &RenderPassDescriptor<Null>) {
        debug_assert!(!self.encoder_active, "a pass is already open on this command buffer");
        self.encoder_active = true;
    }

    unsafe fn end_render_pass(&mut self) {
        debug_assert!(self.encoder_active, "end_render_pass() with no open pass");
        self.encoder_active = false;
    }

    unsafe fn begin_compute_pass(&mut self, _desc: &ComputePassDescriptor) {
        debug_assert!(!self.encoder_active, "a pass is already open on this command buffer");
        self.encoder_active = true;
    }

    unsafe fn end_compute_pass(&mut self) {
        debug_assert!(self.encoder_active, "end_compute_pass() with no open pass");
        self.encoder_active = false;
    }

    unsafe fn set_viewports(&mut self, _viewports: &[gpu_types::Viewport]) {}
    unsafe fn set_scissor_rects(&mut self, _rects: &[gpu_types::ScissorRect]) {}
    unsafe fn set_blend_color(&mut self, _color: gpu_types::Color) {}
    unsafe fn set_stencil_reference(&mut self, _reference: u32) {}
    unsafe fn set_vertex_buffer(&mut self, _slot: u32, _buffer: &Buffer, _offset: u64) {}
    unsafe fn set_index_buffer(&mut self, _buffer: &Buffer, _format: gpu_types::IndexFormat, _offset: u64) {}
    unsafe fn set_render_pipeline(&mut self, _pipeline: &RenderPipeline) {}
    unsafe fn set_compute_pipeline(&mut self, _pipeline: &ComputePipeline) {}

    unsafe fn set_push_constants(&mut self, layout: &PipelineLayout, range_index: u32, data: &[u8]) {
        debug_assert!(
            (range_index as usize) < layout.push_constant_ranges.len(),
            "range_index out of bounds for this pipeline layout"
        );
        let _ = data;
    }

    unsafe fn set_shading_rate(&mut self, _rate: gpu_types::ShadingRate) {}

    unsafe fn draw(&mut self, _vertex_count: u32, _instance_count: u32, _first_vertex: u32, _first_instance: u32) {}
    unsafe fn draw_indexed(
        &mut self,
        _index_count: u32,
        _instance_count: u32,
        _first_index: u32,
        _base_vertex: i32,
        _first_instance: u32,
    ) {
    }
    unsafe fn draw_indirect(&mut self, _indirect_buffer: &Buffer, _offset: u64) {}
    unsafe fn draw_indexed_indirect(&mut self, _indirect_buffer: &Buffer, _offset: u64) {}
    unsafe fn multi_draw_indirect(
        &mut self,
        _indirect_buffer: &Buffer,
        _offset: u64,
        _max_count: u32,
        _count_buffer: Option<(&Buffer, u64)>,
    ) {
    }
    unsafe fn multi_draw_indexed_indirect(
        &mut self,
        _indirect_buffer: &Buffer,
        _offset: u64,
        _max_count: u32,
        _count_buffer: Option<(&Buffer, u64)>,
    ) {
    }

    unsafe fn dispatch(&mut self, _x: u32, _y: u32, _z: u32) {}
    unsafe fn dispatch_indirect(&mut self, _indirect_buffer: &Buffer, _offset: u64) {}

    unsafe fn push_debug_group(&mut self, label: &str) {
        log::trace!("null: push debug group {label:?}");
    }
    unsafe fn pop_debug_group(&mut self) {}
    unsafe fn insert_debug_marker(&mut self, label: &str) {
        log::trace!("null: debug marker {label:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Adapter as _, Device as _, Instance as _};

    fn open_device() -> (Instance, OpenDevice<Null>) {
        let instance = unsafe { Instance::init(&InstanceDescriptor::default_for_test()) }.unwrap();
        let adapters = unsafe { instance.enumerate_adapters() };
        let open = unsafe { adapters[0].adapter.open(Features::empty(), &gpu_types::Limits::default()) }
            .unwrap();
        (instance, open)
    }

    trait TestInstanceDescriptor {
        fn default_for_test() -> InstanceDescriptor;
    }

    impl TestInstanceDescriptor for InstanceDescriptor {
        fn default_for_test() -> InstanceDescriptor {
            InstanceDescriptor {
                flags: Default::default(),
            }
        }
    }

    #[test]
    fn buffer_upload_and_copy_move_real_bytes() {
        let (_instance, open) = open_device();
        unsafe {
            let src = open
                .device
                .create_buffer(
                    &BufferDescriptor {
                        label: None,
                        size: 4,
                        usage: gpu_types::BufferUsages::COPY_SRC,
                        memory_type: crate::MemoryTypeOrDefault::Upload,
                    },
                    Some(&[1, 2, 3, 4]),
                )
                .unwrap();
            let dst = open
                .device
                .create_buffer(
                    &BufferDescriptor {
                        label: None,
                        size: 4,
                        usage: gpu_types::BufferUsages::COPY_DST,
                        memory_type: crate::MemoryTypeOrDefault::Readback,
                    },
                    None,
                )
                .unwrap();

            let mut cmd = open.device.create_command_buffer(&CommandBufferDescriptor::default()).unwrap();
            cmd.begin();
            cmd.copy_buffer_to_buffer(&src, 0, &dst, 0, 4);
            cmd.end();

            let ptr = open.device.buffer_mapped_ptr(&dst).unwrap();
            let bytes = std::slice::from_raw_parts(ptr, 4);
            assert_eq!(bytes, &[1, 2, 3, 4]);
        }
    }

    #[test]
    fn private_memory_has_no_mapped_pointer() {
        let (_instance, open) = open_device();
        unsafe {
            let buffer = open
                .device
                .create_buffer(
                    &BufferDescriptor {
                        label: None,
                        size: 16,
                        usage: gpu_types::BufferUsages::STORAGE,
                        memory_type: crate::MemoryTypeOrDefault::Private,
                    },
                    None,
                )
                .unwrap();
            assert!(open.device.buffer_mapped_ptr(&buffer).is_none());
        }
    }

    #[test]
    fn texture_round_trip_preserves_first_pixel() {
        let (_instance, open) = open_device();
        unsafe {
            let red_pixel = [255u8, 0, 0, 255];
            let texture = open
                .device
                .create_texture(
                    &TextureDescriptor {
                        label: None,
                        dimension: TextureDimension::D2,
                        format: PixelFormat::Rgba8Unorm,
                        usage: TextureUsages::COPY_SRC | TextureUsages::COPY_DST,
                        size: Extent3d {
                            width: 1,
                            height: 1,
                            depth_or_array_layers: 1,
                        },
                        mip_level_count: 1,
                        sample_count: 1,
                    },
                    Some(&red_pixel),
                )
                .unwrap();

            let readback = open
                .device
                .create_buffer(
                    &BufferDescriptor {
                        label: None,
                        size: 4,
                        usage: gpu_types::BufferUsages::COPY_DST,
                        memory_type: crate::MemoryTypeOrDefault::Readback,
                    },
                    None,
                )
                .unwrap();

            let mut cmd = open.device.create_command_buffer(&CommandBufferDescriptor::default()).unwrap();
            cmd.begin();
            cmd.copy_texture_to_buffer(&texture, 0, 0, &readback);
            cmd.end();

            let ptr = open.device.buffer_mapped_ptr(&readback).unwrap();
            let bytes = std::slice::from_raw_parts(ptr, 4);
            assert_eq!(bytes, &red_pixel);
        }
    }

    #[test]
    fn same_layout_uav_barrier_does_not_panic() {
        let (_instance, open) = open_device();
        unsafe {
            let texture = open
                .device
                .create_texture(
                    &TextureDescriptor {
                        label: None,
                        dimension: TextureDimension::D2,
                        format: PixelFormat::Rgba8Unorm,
                        usage: TextureUsages::STORAGE,
                        size: Extent3d {
                            width: 4,
                            height: 4,
                            depth_or_array_layers: 1,
                        },
                        mip_level_count: 1,
                        sample_count: 1,
                    },
                    None,
                )
                .unwrap();
            let mut cmd = open.device.create_command_buffer(&CommandBufferDescriptor::default()).unwrap();
            let range = TextureBarrierRange {
                base_mip: 0,
                level_count: 1,
                base_layer: 0,
                layer_count: 1,
                aspects: FormatAspects::COLOR,
            };
            cmd.begin();
            cmd.texture_barrier(&texture, TextureLayout::UnorderedAccess, range);
            cmd.texture_barrier(&texture, TextureLayout::UnorderedAccess, range);
            cmd.end();
        }
    }

    #[test]
    fn encoder_active_flag_toggles_through_a_pass() {
        let (_instance, open) = open_device();
        unsafe {
            let mut cmd = open.device.create_command_buffer(&CommandBufferDescriptor::default()).unwrap();
            cmd.begin();
            cmd.begin_compute_pass(&ComputePassDescriptor::default());
            assert!(cmd.encoder_active);
            cmd.end_compute_pass();
            assert!(!cmd.encoder_active);
            cmd.end();
        }
    }
}
