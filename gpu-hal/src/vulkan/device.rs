//! Resource factory for the Vulkan-class backend (§4.11). Memory comes from
//! a `gpu_alloc::GpuAllocator`; render passes are rebuilt per
//! `begin_render_pass` call rather than cached, since ash 0.33 predates
//! `VK_KHR_dynamic_rendering` (see the pipeline's throwaway compatibility
//! pass below and `command::CommandBuffer::begin_render_pass`).

use std::ptr::NonNull;

use ash::version::{DeviceV1_0, InstanceV1_0};
use ash::vk;
use parking_lot::Mutex;

use gpu_types::{Extent3d, Limits, PixelFormat, TextureDimension, TextureLayout};

use crate::{
    BindGroupLayoutDescriptor, BufferDescriptor, CommandBufferDescriptor, ComputePipelineDescriptor,
    DeviceError, MemoryTypeOrDefault, PipelineLayoutDescriptor, PushConstantRange,
    QueryHeapDescriptor, RenderPipelineDescriptor, SamplerDescriptor, ShaderModuleDescriptor,
};

use super::VkResult as _;

/// Bridges `ash::Device` into `gpu_alloc::MemoryDevice`: `gpu-alloc` is
/// backend-agnostic and expects its host application to supply this, the
/// way `wgpu-hal`'s Vulkan backend did before a dedicated `gpu-alloc-ash`
/// crate existed.
struct AllocDevice<'a>(&'a ash::Device);

impl<'a> gpu_alloc::MemoryDevice<vk::DeviceMemory> for AllocDevice<'a> {
    unsafe fn allocate_memory(
        &self,
        size: u64,
        memory_type: u32,
        flags: gpu_alloc::AllocationFlags,
    ) -> Result<vk::DeviceMemory, gpu_alloc::OutOfMemory> {
        let _ = flags;
        let alloc_info = vk::MemoryAllocateInfo::builder()
            .allocation_size(size)
            .memory_type_index(memory_type);
        self.0.allocate_memory(&alloc_info, None).map_err(|err| match err {
            vk::Result::ERROR_OUT_OF_DEVICE_MEMORY => gpu_alloc::OutOfMemory::OutOfDeviceMemory,
            _ => gpu_alloc::OutOfMemory::OutOfHostMemory,
        })
    }

    unsafe fn deallocate_memory(&self, memory: vk::DeviceMemory) {
        self.0.free_memory(memory, None);
    }

    unsafe fn map_memory(
        &self,
        memory: &mut vk::DeviceMemory,
        offset: u64,
        size: u64,
    ) -> Result<NonNull<u8>, gpu_alloc::DeviceMapError> {
        let ptr = self
            .0
            .map_memory(*memory, offset, size, vk::MemoryMapFlags::empty())
            .map_err(|_| gpu_alloc::DeviceMapError::Map)?;
        NonNull::new(ptr as *mut u8).ok_or(gpu_alloc::DeviceMapError::Map)
    }

    unsafe fn unmap_memory(&self, memory: &mut vk::DeviceMemory) {
        self.0.unmap_memory(*memory);
    }

    unsafe fn invalidate_memory_ranges(
        &self,
        _ranges: &[gpu_alloc::MappedMemoryRange<'_, vk::DeviceMemory>],
    ) -> Result<(), gpu_alloc::OutOfMemory> {
        Ok(())
    }

    unsafe fn flush_memory_ranges(
        &self,
        _ranges: &[gpu_alloc::MappedMemoryRange<'_, vk::DeviceMemory>],
    ) -> Result<(), gpu_alloc::OutOfMemory> {
        Ok(())
    }
}

fn memory_properties_for(props: vk::PhysicalDeviceMemoryProperties) -> gpu_alloc::DeviceProperties<'static> {
    let memory_types = props.memory_types[..props.memory_type_count as usize]
        .iter()
        .map(|ty| gpu_alloc::MemoryType {
            heap: ty.heap_index,
            props: gpu_alloc::MemoryPropertyFlags::from_bits_truncate(ty.property_flags.as_raw()),
        })
        .collect::<Vec<_>>();
    let memory_heaps = props.memory_heaps[..props.memory_heap_count as usize]
        .iter()
        .map(|heap| gpu_alloc::MemoryHeap { size: heap.size })
        .collect::<Vec<_>>();
    gpu_alloc::DeviceProperties {
        memory_types: memory_types.into(),
        memory_heaps: memory_heaps.into(),
        max_memory_allocation_count: 4096,
        max_memory_allocation_size: u64::MAX,
        non_coherent_atom_size: 256,
        buffer_device_address: false,
    }
}

pub struct Device {
    pub(super) raw: ash::Device,
    pub(super) instance: ash::Instance,
    pub(super) physical_device: vk::PhysicalDevice,
    allocator: Mutex<gpu_alloc::GpuAllocator<vk::DeviceMemory>>,
    limits: Limits,
    /// The same queue handle `Queue::new` is given (§3's single-queue-family
    /// assumption): used internally for the one-shot staging uploads §4.4
    /// needs to honour `initial_data` on memory with no persistent mapping.
    upload_queue: vk::Queue,
    upload_queue_family_index: u32,
}

unsafe impl Send for Device {}
unsafe impl Sync for Device {}

impl Device {
    pub(super) fn new(
        raw: ash::Device,
        instance: ash::Instance,
        physical_device: vk::PhysicalDevice,
        memory_properties: vk::PhysicalDeviceMemoryProperties,
        limits: Limits,
        upload_queue: vk::Queue,
        upload_queue_family_index: u32,
    ) -> Result<Self, DeviceError> {
        let allocator = gpu_alloc::GpuAllocator::new(
            gpu_alloc::Config::i_am_prototyping(),
            memory_properties_for(memory_properties),
        );
        Ok(Device {
            raw,
            instance,
            physical_device,
            allocator: Mutex::new(allocator),
            limits,
            upload_queue,
            upload_queue_family_index,
        })
    }

    unsafe fn create_staging_buffer(
        &self,
        size: u64,
    ) -> Result<(vk::Buffer, gpu_alloc::MemoryBlock<vk::DeviceMemory>), DeviceError> {
        let create_info = vk::BufferCreateInfo::builder()
            .size(size.max(1))
            .usage(vk::BufferUsageFlags::TRANSFER_SRC)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);
        let raw = self.raw.create_buffer(&create_info, None).into_device_result("vkCreateBuffer (staging)")?;
        let requirements = self.raw.get_buffer_memory_requirements(raw);
        let request = gpu_alloc::Request {
            size: requirements.size,
            align_mask: requirements.alignment - 1,
            usage: Self::usage_flags_for(MemoryTypeOrDefault::Upload),
            memory_types: self.memory_type_bits(&requirements, MemoryTypeOrDefault::Upload),
        };
        let block = self.allocator.lock().alloc(&AllocDevice(&self.raw), request).map_err(|_| {
            self.raw.destroy_buffer(raw, None);
            DeviceError::OutOfMemory
        })?;
        self.raw
            .bind_buffer_memory(raw, *block.memory(), block.offset())
            .map_err(|_| DeviceError::OutOfMemory)?;
        Ok((raw, block))
    }

    /// Records `body` into a transient, one-shot command buffer and blocks
    /// until it has executed on `upload_queue` (§4.4's upload allocator,
    /// collapsed to an immediate-submit since this `Device` has no recycling
    /// pool of its own transfer command buffers).
    unsafe fn immediate_submit(&self, body: impl FnOnce(vk::CommandBuffer)) -> Result<(), DeviceError> {
        let pool_info = vk::CommandPoolCreateInfo::builder()
            .queue_family_index(self.upload_queue_family_index)
            .flags(vk::CommandPoolCreateFlags::TRANSIENT);
        let pool = self.raw.create_command_pool(&pool_info, None).into_device_result("vkCreateCommandPool (upload)")?;
        let alloc_info = vk::CommandBufferAllocateInfo::builder()
            .command_pool(pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(1);
        let cmd = self.raw.allocate_command_buffers(&alloc_info).into_device_result("vkAllocateCommandBuffers (upload)")?[0];

        let begin_info = vk::CommandBufferBeginInfo::builder().flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);
        self.raw.begin_command_buffer(cmd, &begin_info).into_device_result("vkBeginCommandBuffer (upload)")?;
        body(cmd);
        self.raw.end_command_buffer(cmd).into_device_result("vkEndCommandBuffer (upload)")?;

        let fence = self.raw.create_fence(&vk::FenceCreateInfo::builder(), None).into_device_result("vkCreateFence (upload)")?;
        let submit_info = vk::SubmitInfo::builder().command_buffers(std::slice::from_ref(&cmd));
        let result = self
            .raw
            .queue_submit(self.upload_queue, &[submit_info.build()], fence)
            .into_device_result("vkQueueSubmit (upload)")
            .and_then(|_| {
                self.raw.wait_for_fences(&[fence], true, u64::MAX).into_device_result("vkWaitForFences (upload)")
            });

        self.raw.destroy_fence(fence, None);
        self.raw.destroy_command_pool(pool, None);
        result
    }

    /// §4.4: `Private`-memory buffers have no persistent mapping, so
    /// `createBuffer` stages `data` through a transient upload buffer and a
    /// one-shot `vkCmdCopyBuffer` instead of a direct `memcpy`.
    unsafe fn upload_buffer_initial_data(&self, dst: vk::Buffer, data: &[u8]) -> Result<(), DeviceError> {
        let (staging, mut block) = self.create_staging_buffer(data.len() as u64)?;
        let ptr = block
            .map(&AllocDevice(&self.raw), 0, data.len().max(1))
            .map_err(|_| DeviceError::OutOfMemory)?;
        std::ptr::copy_nonoverlapping(data.as_ptr(), ptr.as_ptr(), data.len());
        block.unmap(&AllocDevice(&self.raw));

        let result = self.immediate_submit(|cmd| {
            let region = vk::BufferCopy { src_offset: 0, dst_offset: 0, size: data.len() as u64 };
            self.raw.cmd_copy_buffer(cmd, staging, dst, &[region]);
        });

        self.raw.destroy_buffer(staging, None);
        self.allocator.lock().dealloc(&AllocDevice(&self.raw), block);
        result
    }

    /// Same staging path as [`Self::upload_buffer_initial_data`], split per
    /// subresource the way `gpu_hal::null`'s `new_texture` lays `initial_data`
    /// out (mip-major, then array layer): an optimally tiled image has no
    /// host-visible mapping either. Returns which subresources were written
    /// so the caller can seed their tracked layout as `CopyDest` rather than
    /// `Undefined`.
    unsafe fn upload_texture_initial_data(
        &self,
        image: vk::Image,
        desc: &crate::TextureDescriptor,
        array_layer_count: u32,
        data: &[u8],
    ) -> Result<Vec<bool>, DeviceError> {
        let (staging, mut block) = self.create_staging_buffer(data.len() as u64)?;
        let ptr = block
            .map(&AllocDevice(&self.raw), 0, data.len().max(1))
            .map_err(|_| DeviceError::OutOfMemory)?;
        std::ptr::copy_nonoverlapping(data.as_ptr(), ptr.as_ptr(), data.len());
        block.unmap(&AllocDevice(&self.raw));

        let aspect_mask = if gpu_types::is_depth(desc.format) && gpu_types::is_stencil(desc.format) {
            vk::ImageAspectFlags::DEPTH | vk::ImageAspectFlags::STENCIL
        } else if gpu_types::is_depth(desc.format) {
            vk::ImageAspectFlags::DEPTH
        } else if gpu_types::is_stencil(desc.format) {
            vk::ImageAspectFlags::STENCIL
        } else {
            vk::ImageAspectFlags::COLOR
        };

        let subresource_count = (desc.mip_level_count * array_layer_count) as usize;
        let mut touched = vec![false; subresource_count];
        let mut regions = Vec::with_capacity(subresource_count);
        let mut offset = 0u64;
        'outer: for mip in 0..desc.mip_level_count {
            let width = (desc.size.width >> mip).max(1);
            let height = (desc.size.height >> mip).max(1);
            let info = gpu_types::surface_info(desc.format, width, height);
            for layer in 0..array_layer_count {
                if offset >= data.len() as u64 {
                    break 'outer;
                }
                touched[(layer * desc.mip_level_count + mip) as usize] = true;
                regions.push(vk::BufferImageCopy {
                    buffer_offset: offset,
                    buffer_row_length: 0,
                    buffer_image_height: 0,
                    image_subresource: vk::ImageSubresourceLayers {
                        aspect_mask,
                        mip_level: mip,
                        base_array_layer: layer,
                        layer_count: 1,
                    },
                    image_offset: vk::Offset3D::default(),
                    image_extent: vk::Extent3D { width, height, depth: 1 },
                });
                offset += info.slice_pitch;
            }
        }

        let result = self.immediate_submit(|cmd| {
            let to_transfer_dst = vk::ImageMemoryBarrier::builder()
                .old_layout(vk::ImageLayout::UNDEFINED)
                .new_layout(vk::ImageLayout::TRANSFER_DST_OPTIMAL)
                .src_access_mask(vk::AccessFlags::empty())
                .dst_access_mask(vk::AccessFlags::TRANSFER_WRITE)
                .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                .image(image)
                .subresource_range(vk::ImageSubresourceRange {
                    aspect_mask,
                    base_mip_level: 0,
                    level_count: desc.mip_level_count,
                    base_array_layer: 0,
                    layer_count: array_layer_count,
                })
                .build();
            self.raw.cmd_pipeline_barrier(
                cmd,
                vk::PipelineStageFlags::TOP_OF_PIPE,
                vk::PipelineStageFlags::TRANSFER,
                vk::DependencyFlags::empty(),
                &[],
                &[],
                &[to_transfer_dst],
            );
            self.raw.cmd_copy_buffer_to_image(cmd, staging, image, vk::ImageLayout::TRANSFER_DST_OPTIMAL, &regions);
        });

        self.raw.destroy_buffer(staging, None);
        self.allocator.lock().dealloc(&AllocDevice(&self.raw), block);
        result.map(|_| touched)
    }

    fn memory_type_bits(&self, requirements: &vk::MemoryRequirements, memory_type: MemoryTypeOrDefault) -> u32 {
        let wanted_props = match memory_type {
            MemoryTypeOrDefault::Private => vk::MemoryPropertyFlags::DEVICE_LOCAL,
            MemoryTypeOrDefault::Upload => {
                vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT
            }
            MemoryTypeOrDefault::Readback => {
                vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_CACHED
            }
        };
        let all_props = unsafe { self.instance.get_physical_device_memory_properties(self.physical_device) };
        let mut bits = 0u32;
        for i in 0..all_props.memory_type_count {
            if requirements.memory_type_bits & (1 << i) != 0
                && all_props.memory_types[i as usize].property_flags.contains(wanted_props)
            {
                bits |= 1 << i;
            }
        }
        if bits == 0 {
            requirements.memory_type_bits
        } else {
            bits
        }
    }

    fn usage_flags_for(memory_type: MemoryTypeOrDefault) -> gpu_alloc::UsageFlags {
        match memory_type {
            MemoryTypeOrDefault::Private => gpu_alloc::UsageFlags::FAST_DEVICE_ACCESS,
            MemoryTypeOrDefault::Upload => gpu_alloc::UsageFlags::UPLOAD | gpu_alloc::UsageFlags::HOST_ACCESS,
            MemoryTypeOrDefault::Readback => {
                gpu_alloc::UsageFlags::DOWNLOAD | gpu_alloc::UsageFlags::HOST_ACCESS
            }
        }
    }
}

// ---- resources -------------------------------------------------------------------

pub struct Buffer {
    pub(super) raw: vk::Buffer,
    pub(super) block: Mutex<Option<gpu_alloc::MemoryBlock<vk::DeviceMemory>>>,
    pub(super) size: u64,
    pub(super) mapped_ptr: Option<*mut u8>,
}

unsafe impl Send for Buffer {}
unsafe impl Sync for Buffer {}

pub struct Texture {
    pub(super) image: vk::Image,
    /// `false` for swapchain-owned images: these are destroyed by
    /// `vkDestroySwapchainKHR`, never by `destroy_texture` (§4.10).
    pub(super) owns_image: bool,
    pub(super) format: PixelFormat,
    pub(super) dimension: TextureDimension,
    pub(super) size: Extent3d,
    pub(super) mip_level_count: u32,
    pub(super) array_layer_count: u32,
    pub(super) allocation: Option<Mutex<gpu_alloc::MemoryBlock<vk::DeviceMemory>>>,
    /// Current layout per subresource, indexed `mip + layer * mipLevelCount`
    /// (§4.6's per-subresource tracking).
    pub(super) layouts: Mutex<Vec<TextureLayout>>,
}

unsafe impl Send for Texture {}
unsafe impl Sync for Texture {}

impl Texture {
    pub(super) fn subresource_index(&self, mip: u32, layer: u32) -> u32 {
        layer * self.mip_level_count + mip
    }

    pub(super) fn subresource_count(&self) -> u32 {
        self.mip_level_count * self.array_layer_count
    }

    pub(super) fn aspect_mask(&self) -> vk::ImageAspectFlags {
        if gpu_types::is_depth(self.format) && gpu_types::is_stencil(self.format) {
            vk::ImageAspectFlags::DEPTH | vk::ImageAspectFlags::STENCIL
        } else if gpu_types::is_depth(self.format) {
            vk::ImageAspectFlags::DEPTH
        } else if gpu_types::is_stencil(self.format) {
            vk::ImageAspectFlags::STENCIL
        } else {
            vk::ImageAspectFlags::COLOR
        }
    }

    pub(super) fn view_type(&self) -> vk::ImageViewType {
        match self.dimension {
            TextureDimension::D1 => vk::ImageViewType::TYPE_1D,
            TextureDimension::D2 => vk::ImageViewType::TYPE_2D,
            TextureDimension::D3 => vk::ImageViewType::TYPE_3D,
            TextureDimension::Cube => vk::ImageViewType::CUBE,
            TextureDimension::_Force32 => vk::ImageViewType::TYPE_2D,
        }
    }
}

#[derive(Debug)]
pub struct Sampler {
    pub(super) raw: vk::Sampler,
}

#[derive(Debug)]
pub struct QueryHeap {
    pub(super) raw: vk::QueryPool,
    pub(super) ty: crate::QueryType,
    pub(super) count: u32,
}

/// Reserved surface (§9's resolved Open Question): declared but never
/// consulted by resource binding, since no backend wires descriptor sets
/// to a `BindGroupLayout` yet.
#[derive(Debug)]
pub struct BindGroupLayout;

#[derive(Debug)]
pub struct PipelineLayout {
    pub(super) raw: vk::PipelineLayout,
    pub(super) push_constant_ranges: Vec<PushConstantRange>,
}

#[derive(Debug)]
pub struct ShaderModule {
    pub(super) raw: vk::ShaderModule,
    pub(super) entry_point: String,
}

#[derive(Debug)]
pub struct RenderPipeline {
    pub(super) raw: vk::Pipeline,
    pub(super) topology: vk::PrimitiveTopology,
}

#[derive(Debug)]
pub struct ComputePipeline {
    pub(super) raw: vk::Pipeline,
}

/// Builds a render pass describing only attachment formats/sample counts
/// (used both as the throwaway compatibility pass a pipeline is created
/// against, and as the real encode-time pass `command.rs` begins —
/// Vulkan only requires the two to be *compatible*, not identical).
pub(super) fn build_render_pass(
    device: &ash::Device,
    color_formats: &[vk::Format],
    depth_format: Option<vk::Format>,
    sample_count: u32,
    color_ops: Option<&[(vk::AttachmentLoadOp, vk::AttachmentStoreOp)]>,
    depth_ops: Option<(vk::AttachmentLoadOp, vk::AttachmentStoreOp)>,
) -> Result<vk::RenderPass, DeviceError> {
    let samples = vk::SampleCountFlags::from_raw(sample_count.max(1));
    let mut attachments = Vec::with_capacity(color_formats.len() + 1);
    let mut color_refs = Vec::with_capacity(color_formats.len());

    for (index, &format) in color_formats.iter().enumerate() {
        let (load, store) = color_ops
            .and_then(|ops| ops.get(index))
            .copied()
            .unwrap_or((vk::AttachmentLoadOp::LOAD, vk::AttachmentStoreOp::STORE));
        attachments.push(
            vk::AttachmentDescription::builder()
                .format(format)
                .samples(samples)
                .load_op(load)
                .store_op(store)
                .stencil_load_op(vk::AttachmentLoadOp::DONT_CARE)
                .stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
                .initial_layout(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL)
                .final_layout(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL)
                .build(),
        );
        color_refs.push(vk::AttachmentReference {
            attachment: index as u32,
            layout: vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
        });
    }

    let depth_ref = depth_format.map(|format| {
        let (load, store) = depth_ops.unwrap_or((vk::AttachmentLoadOp::LOAD, vk::AttachmentStoreOp::STORE));
        attachments.push(
            vk::AttachmentDescription::builder()
                .format(format)
                .samples(samples)
                .load_op(load)
                .store_op(store)
                .stencil_load_op(load)
                .stencil_store_op(store)
                .initial_layout(vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL)
                .final_layout(vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL)
                .build(),
        );
        vk::AttachmentReference {
            attachment: (attachments.len() - 1) as u32,
            layout: vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
        }
    });

    let mut subpass = vk::SubpassDescription::builder()
        .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
        .color_attachments(&color_refs);
    if let Some(depth_ref) = depth_ref.as_ref() {
        subpass = subpass.depth_stencil_attachment(depth_ref);
    }
    let subpasses = [subpass.build()];

    let create_info = vk::RenderPassCreateInfo::builder()
        .attachments(&attachments)
        .subpasses(&subpasses);

    unsafe { device.create_render_pass(&create_info, None) }.into_device_result("vkCreateRenderPass")
}

unsafe impl crate::Device<super::Api> for Device {
    unsafe fn create_buffer(
        &self,
        desc: &BufferDescriptor,
        initial_data: Option<&[u8]>,
    ) -> Result<Buffer, DeviceError> {
        let size = desc.size.max(1);
        let mut usage = vk::BufferUsageFlags::TRANSFER_SRC | vk::BufferUsageFlags::TRANSFER_DST;
        if desc.usage.contains(gpu_types::BufferUsages::VERTEX) {
            usage |= vk::BufferUsageFlags::VERTEX_BUFFER;
        }
        if desc.usage.contains(gpu_types::BufferUsages::INDEX) {
            usage |= vk::BufferUsageFlags::INDEX_BUFFER;
        }
        if desc.usage.contains(gpu_types::BufferUsages::UNIFORM) {
            usage |= vk::BufferUsageFlags::UNIFORM_BUFFER;
        }
        if desc.usage.contains(gpu_types::BufferUsages::STORAGE) {
            usage |= vk::BufferUsageFlags::STORAGE_BUFFER;
        }
        if desc.usage.contains(gpu_types::BufferUsages::INDIRECT) {
            usage |= vk::BufferUsageFlags::INDIRECT_BUFFER;
        }

        let create_info = vk::BufferCreateInfo::builder()
            .size(size)
            .usage(usage)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);

        let raw = self.raw.create_buffer(&create_info, None).into_device_result("vkCreateBuffer")?;
        let requirements = self.raw.get_buffer_memory_requirements(raw);

        let request = gpu_alloc::Request {
            size: requirements.size,
            align_mask: requirements.alignment - 1,
            usage: Self::usage_flags_for(desc.memory_type),
            memory_types: self.memory_type_bits(&requirements, desc.memory_type),
        };

        let mut block = self
            .allocator
            .lock()
            .alloc(&AllocDevice(&self.raw), request)
            .map_err(|_| {
                self.raw.destroy_buffer(raw, None);
                DeviceError::OutOfMemory
            })?;

        self.raw
            .bind_buffer_memory(raw, *block.memory(), block.offset())
            .map_err(|_| DeviceError::OutOfMemory)?;

        let mapped_ptr = match desc.memory_type {
            MemoryTypeOrDefault::Private => None,
            _ => Some(
                block
                    .map(&AllocDevice(&self.raw), 0, size as usize)
                    .map_err(|_| DeviceError::OutOfMemory)?
                    .as_ptr(),
            ),
        };

        match (mapped_ptr, initial_data) {
            (Some(ptr), Some(data)) => {
                std::ptr::copy_nonoverlapping(data.as_ptr(), ptr, data.len().min(size as usize));
            }
            (None, Some(data)) => {
                let len = data.len().min(size as usize);
                self.upload_buffer_initial_data(raw, &data[..len])?;
            }
            (_, None) => {}
        }

        Ok(Buffer { raw, block: Mutex::new(Some(block)), size, mapped_ptr })
    }

    unsafe fn destroy_buffer(&self, buffer: Buffer) {
        self.raw.destroy_buffer(buffer.raw, None);
        if let Some(mut block) = buffer.block.into_inner() {
            if buffer.mapped_ptr.is_some() {
                block.unmap(&AllocDevice(&self.raw));
            }
            self.allocator.lock().dealloc(&AllocDevice(&self.raw), block);
        }
    }

    unsafe fn buffer_mapped_ptr(&self, buffer: &Buffer) -> Option<*mut u8> {
        buffer.mapped_ptr
    }

    unsafe fn create_texture(
        &self,
        desc: &crate::TextureDescriptor,
        initial_data: Option<&[u8]>,
    ) -> Result<Texture, DeviceError> {
        let array_layer_count = desc.array_layer_count();
        let image_type = match desc.dimension {
            TextureDimension::D1 => vk::ImageType::TYPE_1D,
            TextureDimension::D3 => vk::ImageType::TYPE_3D,
            _ => vk::ImageType::TYPE_2D,
        };
        let depth = if desc.dimension == TextureDimension::D3 { desc.size.depth_or_array_layers } else { 1 };

        let mut usage = vk::ImageUsageFlags::TRANSFER_SRC | vk::ImageUsageFlags::TRANSFER_DST;
        if desc.usage.contains(gpu_types::TextureUsages::SAMPLED) {
            usage |= vk::ImageUsageFlags::SAMPLED;
        }
        if desc.usage.contains(gpu_types::TextureUsages::STORAGE) {
            usage |= vk::ImageUsageFlags::STORAGE;
        }
        if desc.usage.contains(gpu_types::TextureUsages::RENDER_TARGET) {
            if gpu_types::is_depth_stencil(desc.format) {
                usage |= vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT;
            } else {
                usage |= vk::ImageUsageFlags::COLOR_ATTACHMENT;
            }
        }

        let mut flags = vk::ImageCreateFlags::empty();
        if desc.dimension == TextureDimension::Cube {
            flags |= vk::ImageCreateFlags::CUBE_COMPATIBLE;
        }

        let create_info = vk::ImageCreateInfo::builder()
            .image_type(image_type)
            .format(super::conv::map_texture_format(desc.format))
            .extent(vk::Extent3D { width: desc.size.width, height: desc.size.height, depth })
            .mip_levels(desc.mip_level_count)
            .array_layers(array_layer_count)
            .samples(vk::SampleCountFlags::from_raw(desc.sample_count.max(1)))
            .tiling(vk::ImageTiling::OPTIMAL)
            .usage(usage)
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
            .initial_layout(vk::ImageLayout::UNDEFINED)
            .flags(flags);

        let image = self.raw.create_image(&create_info, None).into_device_result("vkCreateImage")?;
        let requirements = self.raw.get_image_memory_requirements(image);

        let request = gpu_alloc::Request {
            size: requirements.size,
            align_mask: requirements.alignment - 1,
            usage: gpu_alloc::UsageFlags::FAST_DEVICE_ACCESS,
            memory_types: self.memory_type_bits(&requirements, MemoryTypeOrDefault::Private),
        };

        let block = self.allocator.lock().alloc(&AllocDevice(&self.raw), request).map_err(|_| {
            self.raw.destroy_image(image, None);
            DeviceError::OutOfMemory
        })?;

        self.raw
            .bind_image_memory(image, *block.memory(), block.offset())
            .map_err(|_| DeviceError::OutOfMemory)?;

        let subresource_count = desc.mip_level_count * array_layer_count;
        let mut layouts = vec![TextureLayout::Undefined; subresource_count as usize];
        if let Some(data) = initial_data {
            let touched = self.upload_texture_initial_data(image, desc, array_layer_count, data)?;
            for (index, was_touched) in touched.into_iter().enumerate() {
                if was_touched {
                    layouts[index] = TextureLayout::CopyDest;
                }
            }
        }

        Ok(Texture {
            image,
            owns_image: true,
            format: desc.format,
            dimension: desc.dimension,
            size: desc.size,
            mip_level_count: desc.mip_level_count,
            array_layer_count,
            allocation: Some(Mutex::new(block)),
            layouts: Mutex::new(layouts),
        })
    }

    unsafe fn destroy_texture(&self, texture: Texture) {
        if texture.owns_image {
            self.raw.destroy_image(texture.image, None);
        }
        if let Some(allocation) = texture.allocation {
            self.allocator.lock().dealloc(&AllocDevice(&self.raw), allocation.into_inner());
        }
    }

    unsafe fn create_sampler(&self, desc: &SamplerDescriptor) -> Result<Sampler, DeviceError> {
        let create_info = vk::SamplerCreateInfo::builder()
            .mag_filter(super::conv::map_filter(desc.mag_filter))
            .min_filter(super::conv::map_filter(desc.min_filter))
            .mipmap_mode(super::conv::map_mipmap_filter(desc.mipmap_filter))
            .address_mode_u(super::conv::map_address_mode(desc.address_mode_u))
            .address_mode_v(super::conv::map_address_mode(desc.address_mode_v))
            .address_mode_w(super::conv::map_address_mode(desc.address_mode_w))
            .anisotropy_enable(desc.anisotropy_clamp > 1)
            .max_anisotropy(desc.anisotropy_clamp.max(1) as f32)
            .compare_enable(desc.compare.is_some())
            .compare_op(desc.compare.map(super::conv::map_compare_function).unwrap_or(vk::CompareOp::NEVER))
            .min_lod(desc.lod_min_clamp)
            .max_lod(desc.lod_max_clamp)
            .border_color(vk::BorderColor::FLOAT_TRANSPARENT_BLACK);

        let raw = self.raw.create_sampler(&create_info, None).into_device_result("vkCreateSampler")?;
        Ok(Sampler { raw })
    }

    unsafe fn destroy_sampler(&self, sampler: Sampler) {
        self.raw.destroy_sampler(sampler.raw, None);
    }

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
        let push_constant_ranges: Vec<vk::PushConstantRange> = desc
            .push_constant_ranges
            .iter()
            .map(|range| vk::PushConstantRange {
                stage_flags: vk::ShaderStageFlags::ALL,
                offset: range.offset,
                size: range.size,
            })
            .collect();

        let create_info = vk::PipelineLayoutCreateInfo::builder().push_constant_ranges(&push_constant_ranges);

        let raw = self
            .raw
            .create_pipeline_layout(&create_info, None)
            .into_device_result("vkCreatePipelineLayout")?;

        Ok(PipelineLayout { raw, push_constant_ranges: desc.push_constant_ranges.to_vec() })
    }

    unsafe fn destroy_pipeline_layout(&self, layout: PipelineLayout) {
        self.raw.destroy_pipeline_layout(layout.raw, None);
    }

    unsafe fn create_shader_module(
        &self,
        desc: &ShaderModuleDescriptor,
    ) -> Result<ShaderModule, DeviceError> {
        if desc.source.len() % 4 != 0 {
            log::error!(target: "GPU", "SPIR-V source length {} is not a multiple of 4", desc.source.len());
            return Err(DeviceError::Lost);
        }
        let words: Vec<u32> = desc
            .source
            .chunks_exact(4)
            .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        let create_info = vk::ShaderModuleCreateInfo::builder().code(&words);
        let raw = self
            .raw
            .create_shader_module(&create_info, None)
            .into_device_result("vkCreateShaderModule")?;
        Ok(ShaderModule { raw, entry_point: desc.entry_point.to_string() })
    }

    unsafe fn destroy_shader_module(&self, module: ShaderModule) {
        self.raw.destroy_shader_module(module.raw, None);
    }

    unsafe fn create_render_pipeline(
        &self,
        desc: &RenderPipelineDescriptor<super::Api>,
    ) -> Result<RenderPipeline, DeviceError> {
        let entry_point = std::ffi::CString::new(desc.vertex_shader.entry_point.as_str()).unwrap();
        let fragment_entry_point = desc
            .fragment_shader
            .map(|module| std::ffi::CString::new(module.entry_point.as_str()).unwrap());

        let mut stages = vec![vk::PipelineShaderStageCreateInfo::builder()
            .stage(vk::ShaderStageFlags::VERTEX)
            .module(desc.vertex_shader.raw)
            .name(&entry_point)
            .build()];
        if let (Some(module), Some(name)) = (desc.fragment_shader, &fragment_entry_point) {
            stages.push(
                vk::PipelineShaderStageCreateInfo::builder()
                    .stage(vk::ShaderStageFlags::FRAGMENT)
                    .module(module.raw)
                    .name(name)
                    .build(),
            );
        }

        let bindings: Vec<vk::VertexInputBindingDescription> = desc
            .vertex
            .buffers
            .iter()
            .enumerate()
            .map(|(slot, layout)| vk::VertexInputBindingDescription {
                binding: slot as u32,
                stride: layout.array_stride as u32,
                input_rate: match layout.step_mode {
                    crate::VertexStepMode::Vertex => vk::VertexInputRate::VERTEX,
                    crate::VertexStepMode::Instance => vk::VertexInputRate::INSTANCE,
                },
            })
            .collect();
        let attributes: Vec<vk::VertexInputAttributeDescription> = desc
            .vertex
            .buffers
            .iter()
            .enumerate()
            .flat_map(|(slot, layout)| {
                layout.attributes.iter().map(move |attr| vk::VertexInputAttributeDescription {
                    location: attr.shader_location,
                    binding: slot as u32,
                    format: super::conv::map_vertex_format(attr.format),
                    offset: attr.offset,
                })
            })
            .collect();

        let vertex_input = vk::PipelineVertexInputStateCreateInfo::builder()
            .vertex_binding_descriptions(&bindings)
            .vertex_attribute_descriptions(&attributes);

        let input_assembly = vk::PipelineInputAssemblyStateCreateInfo::builder()
            .topology(super::conv::map_primitive_topology(desc.primitive_topology));

        let viewport_state = vk::PipelineViewportStateCreateInfo::builder()
            .viewport_count(1)
            .scissor_count(1);

        let rasterization = super::conv::map_rasterizer_state(&desc.rasterizer);

        let multisample = vk::PipelineMultisampleStateCreateInfo::builder()
            .rasterization_samples(vk::SampleCountFlags::from_raw(desc.multisample.count.max(1)));

        let blend_attachments = super::conv::map_blend_attachments(desc.color_targets);
        let color_blend = vk::PipelineColorBlendStateCreateInfo::builder().attachments(&blend_attachments);

        let dynamic_states = [vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR];
        let dynamic_state = vk::PipelineDynamicStateCreateInfo::builder().dynamic_states(&dynamic_states);

        let depth_stencil = desc.depth_stencil.map(super::conv::map_depth_stencil_state);

        let color_formats: Vec<_> =
            desc.color_targets.iter().map(|target| super::conv::map_texture_format(target.format)).collect();
        let depth_format = desc.depth_stencil.map(|ds| super::conv::map_texture_format(ds.format));

        let render_pass = build_render_pass(
            &self.raw,
            &color_formats,
            depth_format,
            desc.multisample.count.max(1),
            None,
            None,
        )?;

        let mut builder = vk::GraphicsPipelineCreateInfo::builder()
            .stages(&stages)
            .vertex_input_state(&vertex_input)
            .input_assembly_state(&input_assembly)
            .viewport_state(&viewport_state)
            .rasterization_state(&rasterization)
            .multisample_state(&multisample)
            .color_blend_state(&color_blend)
            .dynamic_state(&dynamic_state)
            .layout(desc.layout.raw)
            .render_pass(render_pass)
            .subpass(0);
        if let Some(depth_stencil) = depth_stencil.as_ref() {
            builder = builder.depth_stencil_state(depth_stencil);
        }
        let create_infos = [builder.build()];

        let result = self.raw.create_graphics_pipelines(vk::PipelineCache::null(), &create_infos, None);
        self.raw.destroy_render_pass(render_pass, None);

        let pipelines = result.map_err(|(_, err)| err).into_device_result("vkCreateGraphicsPipelines")?;

        Ok(RenderPipeline {
            raw: pipelines[0],
            topology: super::conv::map_primitive_topology(desc.primitive_topology),
        })
    }

    unsafe fn destroy_render_pipeline(&self, pipeline: RenderPipeline) {
        self.raw.destroy_pipeline(pipeline.raw, None);
    }

    unsafe fn create_compute_pipeline(
        &self,
        desc: &ComputePipelineDescriptor<super::Api>,
    ) -> Result<ComputePipeline, DeviceError> {
        let entry_point = std::ffi::CString::new(desc.shader.entry_point.as_str()).unwrap();
        let stage = vk::PipelineShaderStageCreateInfo::builder()
            .stage(vk::ShaderStageFlags::COMPUTE)
            .module(desc.shader.raw)
            .name(&entry_point);

        let create_infos = [vk::ComputePipelineCreateInfo::builder()
            .stage(stage.build())
            .layout(desc.layout.raw)
            .build()];

        let pipelines = self
            .raw
            .create_compute_pipelines(vk::PipelineCache::null(), &create_infos, None)
            .map_err(|(_, err)| err)
            .into_device_result("vkCreateComputePipelines")?;

        Ok(ComputePipeline { raw: pipelines[0] })
    }

    unsafe fn destroy_compute_pipeline(&self, pipeline: ComputePipeline) {
        self.raw.destroy_pipeline(pipeline.raw, None);
    }

    unsafe fn create_query_heap(&self, desc: &QueryHeapDescriptor) -> Result<QueryHeap, DeviceError> {
        let query_type = match desc.ty {
            crate::QueryType::Occlusion => vk::QueryType::OCCLUSION,
            crate::QueryType::Timestamp => vk::QueryType::TIMESTAMP,
        };
        let create_info = vk::QueryPoolCreateInfo::builder().query_type(query_type).query_count(desc.count);
        let raw = self
            .raw
            .create_query_pool(&create_info, None)
            .into_device_result("vkCreateQueryPool")?;
        Ok(QueryHeap { raw, ty: desc.ty, count: desc.count })
    }

    unsafe fn destroy_query_heap(&self, heap: QueryHeap) {
        self.raw.destroy_query_pool(heap.raw, None);
    }

    unsafe fn create_command_buffer(
        &self,
        desc: &CommandBufferDescriptor,
    ) -> Result<super::command::CommandBuffer, DeviceError> {
        super::command::CommandBuffer::new(&self.raw, desc)
    }

    unsafe fn wait_idle(&self) -> Result<(), DeviceError> {
        self.raw.device_wait_idle().into_device_result("vkDeviceWaitIdle")
    }

    fn timestamp_frequency(&self) -> u64 {
        let properties = unsafe { self.instance.get_physical_device_properties(self.physical_device) };
        (1_000_000_000.0 / properties.limits.timestamp_period as f64) as u64
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer").field("size", &self.size).finish()
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("format", &self.format)
            .field("mip_level_count", &self.mip_level_count)
            .field("array_layer_count", &self.array_layer_count)
            .finish()
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device").field("limits", &self.limits).finish()
    }
}
