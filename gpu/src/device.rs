//! `Device` — the resource factory and per-frame pacing authority (§3, §4.11).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use gpu_hal::{Api, Device as _, OpenDevice, Queue as _};
use gpu_types::{
    BackendType, BufferUsages, CommandQueueType, Extent3d, Features, Limits, MemoryType,
    PixelFormat, TextureDimension, TextureUsages, COMMAND_QUEUE_TYPE_COUNT, MAX_INFLIGHT_FRAMES,
};

use crate::deferred::DeferredDestructionQueue;
use crate::error::GpuError;
use crate::handle::{Handle, Label};
use crate::queue::Queue;
use crate::resources::{
    Buffer, BufferShared, ComputePipeline, ComputePipelineShared, PipelineLayout,
    PipelineLayoutShared, QueryHeap, QueryHeapShared, RenderPipeline, RenderPipelineShared,
    Sampler, SamplerShared, ShaderModule, ShaderModuleShared, Texture, TextureShared,
};

fn memory_type_or_default(memory_type: MemoryType) -> gpu_hal::MemoryTypeOrDefault {
    match memory_type {
        MemoryType::Upload => gpu_hal::MemoryTypeOrDefault::Upload,
        MemoryType::Readback => gpu_hal::MemoryTypeOrDefault::Readback,
        MemoryType::Private | MemoryType::_Force32 => gpu_hal::MemoryTypeOrDefault::Private,
    }
}

pub struct BufferDescriptor<'a> {
    pub label: Option<&'a str>,
    pub size: u64,
    pub usage: BufferUsages,
    pub memory_type: MemoryType,
}

pub struct TextureDescriptor<'a> {
    pub label: Option<&'a str>,
    pub dimension: TextureDimension,
    pub format: PixelFormat,
    pub usage: TextureUsages,
    pub size: Extent3d,
    pub mip_level_count: u32,
    pub sample_count: u32,
}

/// §4.9: carries only push-constant ranges; offsets are derived here by
/// prefix-summing the caller's declared sizes, not supplied by the caller.
pub struct PipelineLayoutDescriptor<'a> {
    pub label: Option<&'a str>,
    pub push_constant_sizes: &'a [u32],
}

pub struct RenderPipelineDescriptor<'a, A: Api> {
    pub label: Option<&'a str>,
    pub layout: &'a PipelineLayout<A>,
    pub vertex_shader: &'a ShaderModule<A>,
    pub fragment_shader: Option<&'a ShaderModule<A>>,
    pub vertex: gpu_hal::VertexState<'a>,
    pub color_targets: &'a [gpu_hal::ColorTargetState],
    pub depth_stencil: Option<gpu_hal::DepthStencilState>,
    pub rasterizer: gpu_hal::RasterizerState,
    pub multisample: gpu_hal::MultisampleState,
    pub primitive_topology: gpu_types::PrimitiveTopology,
    pub patch_control_points: u32,
}

pub struct ComputePipelineDescriptor<'a, A: Api> {
    pub label: Option<&'a str>,
    pub layout: &'a PipelineLayout<A>,
    pub shader: &'a ShaderModule<A>,
}

pub(crate) struct DeviceShared<A: Api> {
    pub(crate) raw: A::Device,
    backend: BackendType,
    features: Features,
    limits: Limits,
    pub(crate) frame_count: AtomicU64,
    max_frames_in_flight: u32,
    pub(crate) deferred: DeferredDestructionQueue<A>,
    queues: [Option<Queue<A>>; COMMAND_QUEUE_TYPE_COUNT],
    poisoned: AtomicBool,
    label: Label,
}

/// A device with its queues (§3 "Device"). `maxFramesInFlight` defaults to
/// [`gpu_types::MAX_INFLIGHT_FRAMES`]; use [`Device::with_max_frames_in_flight`]
/// to match a seed scenario's explicit value (e.g. S1's 2, S4's 3).
pub struct Device<A: Api>(pub(crate) Handle<DeviceShared<A>>);

impl<A: Api> Clone for Device<A> {
    fn clone(&self) -> Self {
        Device(self.0.clone())
    }
}

impl<A: Api> Device<A> {
    pub(crate) fn new(open: OpenDevice<A>, backend: BackendType, features: Features, limits: Limits) -> Self {
        Self::with_max_frames_in_flight(open, backend, features, limits, MAX_INFLIGHT_FRAMES)
    }

    pub(crate) fn with_max_frames_in_flight(
        mut open: OpenDevice<A>,
        backend: BackendType,
        features: Features,
        limits: Limits,
        max_frames_in_flight: u32,
    ) -> Self {
        let mut queues: [Option<Queue<A>>; COMMAND_QUEUE_TYPE_COUNT] = [None, None, None, None];
        for ty in [CommandQueueType::Graphics, CommandQueueType::Compute, CommandQueueType::Copy, CommandQueueType::VideoDecode] {
            if let Some(raw) = open.queues.take(ty) {
                queues[ty as usize] = Some(Queue::new(raw, ty));
            }
        }
        Device(Handle::new(DeviceShared {
            raw: open.device,
            backend,
            features,
            limits,
            frame_count: AtomicU64::new(0),
            max_frames_in_flight,
            deferred: DeferredDestructionQueue::default(),
            queues,
            poisoned: AtomicBool::new(false),
            label: Label::new(None),
        }))
    }

    pub fn backend(&self) -> BackendType {
        self.0.backend
    }

    pub fn features(&self) -> Features {
        self.0.features
    }

    pub fn limits(&self) -> &Limits {
        &self.0.limits
    }

    pub fn frame_count(&self) -> u64 {
        self.0.frame_count.load(Ordering::Acquire)
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_count() % self.0.max_frames_in_flight as u64
    }

    pub fn max_frames_in_flight(&self) -> u32 {
        self.0.max_frames_in_flight
    }

    pub fn is_poisoned(&self) -> bool {
        self.0.poisoned.load(Ordering::Acquire)
    }

    pub(crate) fn mark_poisoned(&self) {
        self.0.poisoned.store(true, Ordering::Release);
        log::error!(target: "GPU", "device marked poisoned after a present failure (§4.10)");
    }

    fn check_alive(&self) -> Result<(), GpuError> {
        if self.is_poisoned() {
            Err(GpuError::DeviceLost)
        } else {
            Ok(())
        }
    }

    pub fn queue(&self, ty: CommandQueueType) -> Option<&Queue<A>> {
        self.0.queues[ty as usize].as_ref()
    }

    pub(crate) fn raw(&self) -> &A::Device {
        &self.0.raw
    }

    pub fn timestamp_frequency(&self) -> u64 {
        self.0.raw.timestamp_frequency()
    }

    pub fn create_buffer(&self, desc: &BufferDescriptor, initial_data: Option<&[u8]>) -> Result<Buffer<A>, GpuError> {
        self.check_alive()?;
        let hal_desc = gpu_hal::BufferDescriptor {
            label: desc.label,
            size: desc.size,
            usage: desc.usage,
            memory_type: memory_type_or_default(desc.memory_type),
        };
        let raw = unsafe { self.0.raw.create_buffer(&hal_desc, initial_data)? };
        Ok(Buffer(Handle::new(BufferShared {
            raw: Some(raw),
            device: self.0.clone(),
            size: desc.size,
            usage: desc.usage,
            memory_type: desc.memory_type,
            label: Label::new(desc.label),
        })))
    }

    pub fn create_texture(&self, desc: &TextureDescriptor, initial_data: Option<&[u8]>) -> Result<Texture<A>, GpuError> {
        self.check_alive()?;
        let hal_desc = gpu_hal::TextureDescriptor {
            label: desc.label,
            dimension: desc.dimension,
            format: desc.format,
            usage: desc.usage,
            size: desc.size,
            mip_level_count: desc.mip_level_count,
            sample_count: desc.sample_count,
        };
        let array_layer_count = hal_desc.array_layer_count();
        let raw = unsafe { self.0.raw.create_texture(&hal_desc, initial_data)? };
        Ok(Texture(Handle::new(TextureShared {
            raw: Some(raw),
            device: self.0.clone(),
            dimension: desc.dimension,
            format: desc.format,
            usage: desc.usage,
            size: desc.size,
            mip_level_count: desc.mip_level_count,
            array_layer_count,
            sample_count: desc.sample_count,
            label: Label::new(desc.label),
        })))
    }

    pub fn create_sampler(&self, desc: &gpu_hal::SamplerDescriptor) -> Result<Sampler<A>, GpuError> {
        self.check_alive()?;
        let raw = unsafe { self.0.raw.create_sampler(desc)? };
        Ok(Sampler(Handle::new(SamplerShared { raw: Some(raw), device: self.0.clone(), label: Label::new(desc.label) })))
    }

    pub fn create_bind_group_layout(
        &self,
        desc: &gpu_hal::BindGroupLayoutDescriptor,
    ) -> Result<crate::resources::BindGroupLayout<A>, GpuError> {
        self.check_alive()?;
        let raw = unsafe { self.0.raw.create_bind_group_layout(desc)? };
        Ok(crate::resources::BindGroupLayout(Handle::new(crate::resources::BindGroupLayoutShared {
            raw: Some(raw),
            device: self.0.clone(),
            label: Label::new(desc.label),
        })))
    }

    pub fn create_pipeline_layout(&self, desc: &PipelineLayoutDescriptor) -> Result<PipelineLayout<A>, GpuError> {
        self.check_alive()?;
        let mut offset = 0u32;
        let mut hal_ranges = Vec::with_capacity(desc.push_constant_sizes.len());
        let mut push_constants = Vec::with_capacity(desc.push_constant_sizes.len());
        for (index, &size) in desc.push_constant_sizes.iter().enumerate() {
            hal_ranges.push(gpu_hal::PushConstantRange { offset, size });
            push_constants.push(gpu_hal::PushConstantRange { offset, size }.to_push_constant(index as u32));
            offset += size;
        }
        let hal_desc = gpu_hal::PipelineLayoutDescriptor {
            label: desc.label,
            bind_group_layouts: &[],
            push_constant_ranges: &hal_ranges,
        };
        let raw = unsafe { self.0.raw.create_pipeline_layout(&hal_desc)? };
        Ok(PipelineLayout(Handle::new(PipelineLayoutShared {
            raw: Some(raw),
            device: self.0.clone(),
            push_constant_ranges: push_constants,
            label: Label::new(desc.label),
        })))
    }

    pub fn create_shader_module(&self, desc: &gpu_hal::ShaderModuleDescriptor) -> Result<ShaderModule<A>, GpuError> {
        self.check_alive()?;
        let raw = unsafe { self.0.raw.create_shader_module(desc)? };
        Ok(ShaderModule(Handle::new(ShaderModuleShared { raw: Some(raw), device: self.0.clone(), label: Label::new(desc.label) })))
    }

    pub fn create_render_pipeline(&self, desc: &RenderPipelineDescriptor<A>) -> Result<RenderPipeline<A>, GpuError> {
        self.check_alive()?;
        let hal_desc = gpu_hal::RenderPipelineDescriptor {
            label: desc.label,
            layout: desc.layout.raw(),
            vertex_shader: desc.vertex_shader.raw(),
            fragment_shader: desc.fragment_shader.map(ShaderModule::raw),
            vertex: desc.vertex.clone(),
            color_targets: desc.color_targets,
            depth_stencil: desc.depth_stencil,
            rasterizer: desc.rasterizer,
            multisample: desc.multisample,
            primitive_topology: desc.primitive_topology,
            patch_control_points: desc.patch_control_points,
        };
        let raw = unsafe { self.0.raw.create_render_pipeline(&hal_desc)? };
        Ok(RenderPipeline(Handle::new(RenderPipelineShared {
            raw: Some(raw),
            device: self.0.clone(),
            layout: desc.layout.clone(),
            label: Label::new(desc.label),
        })))
    }

    pub fn create_compute_pipeline(&self, desc: &ComputePipelineDescriptor<A>) -> Result<ComputePipeline<A>, GpuError> {
        self.check_alive()?;
        let hal_desc = gpu_hal::ComputePipelineDescriptor {
            label: desc.label,
            layout: desc.layout.raw(),
            shader: desc.shader.raw(),
        };
        let raw = unsafe { self.0.raw.create_compute_pipeline(&hal_desc)? };
        Ok(ComputePipeline(Handle::new(ComputePipelineShared {
            raw: Some(raw),
            device: self.0.clone(),
            layout: desc.layout.clone(),
            label: Label::new(desc.label),
        })))
    }

    pub fn create_query_heap(&self, desc: &gpu_hal::QueryHeapDescriptor) -> Result<QueryHeap<A>, GpuError> {
        self.check_alive()?;
        let raw = unsafe { self.0.raw.create_query_heap(desc)? };
        Ok(QueryHeap(Handle::new(QueryHeapShared {
            raw: Some(raw),
            device: self.0.clone(),
            ty: desc.ty,
            count: desc.count,
            label: Label::new(desc.label),
        })))
    }

    /// §4.11 `commitFrame`. The literal per-queue fence signal/reset (steps
    /// 1, 2, 5) is internal to each backend's `Queue::submit`/`wait_idle`;
    /// this layer implements the externally observable contract: advance
    /// `frameCount`, wait all queues idle once the pipeline has wrapped,
    /// then sweep the deferred-destruction queue (§4.2, tested by S4).
    pub fn commit_frame(&self) -> Result<u64, GpuError> {
        profiling::scope!("Device::commit_frame");
        self.check_alive()?;
        let new_frame = self.0.frame_count.fetch_add(1, Ordering::AcqRel) + 1;
        if new_frame >= self.0.max_frames_in_flight as u64 {
            for queue in self.0.queues.iter().flatten() {
                queue.wait_idle()?;
            }
        }
        self.0.deferred.sweep(&self.0.raw, new_frame, self.0.max_frames_in_flight, false);
        Ok(new_frame)
    }

    /// §4.11 `waitIdle`: waits all queues, then force-sweeps every
    /// deferred-destruction entry regardless of its release frame.
    pub fn wait_idle(&self) -> Result<(), GpuError> {
        for queue in self.0.queues.iter().flatten() {
            queue.wait_idle()?;
        }
        unsafe { self.0.raw.wait_idle()? };
        let current = self.frame_count();
        self.0.deferred.sweep(&self.0.raw, current, self.0.max_frames_in_flight, true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use gpu_hal::null::Null;
    use gpu_hal::Instance as _;
    use gpu_types::{BufferUsages, MemoryType};

    use super::*;
    use crate::adapter::Adapter;

    fn open_device(max_frames_in_flight: u32) -> Device<Null> {
        unsafe {
            let instance = <Null as Api>::Instance::init(&gpu_hal::InstanceDescriptor { flags: Default::default() }).unwrap();
            let exposed = instance.enumerate_adapters().into_iter().next().unwrap();
            let adapter = Adapter::new(exposed);
            adapter
                .request_device_with_max_frames_in_flight(adapter.features(), adapter.limits(), max_frames_in_flight)
                .unwrap()
        }
    }

    /// S4: `maxFramesInFlight = 3`; a released buffer survives two
    /// `commit_frame`s and is freed by the third (§4.2, §4.11).
    #[test]
    fn s4_deferred_buffer_frees_on_third_commit() {
        let device = open_device(3);
        let buffer = device
            .create_buffer(
                &BufferDescriptor {
                    label: None,
                    size: 1024 * 1024,
                    usage: BufferUsages::STORAGE,
                    memory_type: MemoryType::Private,
                },
                None,
            )
            .unwrap();
        assert_eq!(device.0.deferred.len(), 0);

        buffer.release();
        assert_eq!(device.0.deferred.len(), 1, "release must retire rather than free immediately");

        assert_eq!(device.commit_frame().unwrap(), 1);
        assert_eq!(device.0.deferred.len(), 1, "still within maxFramesInFlight");

        assert_eq!(device.commit_frame().unwrap(), 2);
        assert_eq!(device.0.deferred.len(), 1, "still within maxFramesInFlight");

        assert_eq!(device.commit_frame().unwrap(), 3);
        assert!(device.0.deferred.is_empty(), "third commit must sweep the entry");
    }

    #[test]
    fn commit_frame_rejects_once_poisoned() {
        let device = open_device(2);
        device.mark_poisoned();
        assert!(matches!(device.commit_frame(), Err(GpuError::DeviceLost)));
    }
}
