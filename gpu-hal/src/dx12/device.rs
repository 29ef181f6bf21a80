//! Resource factory for the D3D12-class backend (§4.11). Every resource is
//! created as a committed resource; no placed/sub-allocated heap strategy.

use std::mem;

use parking_lot::Mutex;
use windows::Win32::Graphics::Direct3D12;

use gpu_types::{Extent3d, Limits, PixelFormat, TextureDimension, TextureLayout};

use crate::auxil::descriptor::DescriptorAllocator;
use crate::{
    BindGroupLayoutDescriptor, BufferDescriptor, CommandBufferDescriptor, ComputePipelineDescriptor,
    DeviceError, MemoryTypeOrDefault, PipelineLayoutDescriptor, PushConstantRange,
    QueryHeapDescriptor, RenderPipelineDescriptor, SamplerDescriptor, ShaderModuleDescriptor,
};

use super::descriptor::{CbvSrvUavHeap, DsvHeap, RtvHeap, SamplerHeap};
use super::HResult as _;

const INITIAL_RTV_CAPACITY: u32 = 32;
const INITIAL_DSV_CAPACITY: u32 = 16;
const INITIAL_SRV_UAV_CAPACITY: u32 = 1024;
const INITIAL_SAMPLER_CAPACITY: u32 = 256;

pub struct Device {
    pub(super) raw: native::Device,
    /// The Direct queue handle swapchain creation needs (`CreateSwapChainForHwnd`
    /// takes a command queue, not a device); stashed here since `Surface::configure`
    /// only receives `&Device` (§4.10). Also the queue `upload` submits on for
    /// §4.4's immediate-upload path, since this device otherwise has no queue
    /// reference of its own to draw on.
    pub(super) present_queue: native::CommandQueue,
    pub(super) rtv_pool: DescriptorAllocator<RtvHeap>,
    pub(super) dsv_pool: DescriptorAllocator<DsvHeap>,
    pub(super) srv_uav_pool: DescriptorAllocator<CbvSrvUavHeap>,
    pub(super) sampler_pool: DescriptorAllocator<SamplerHeap>,
    limits: Limits,
    upload: Mutex<UploadContext>,
}

unsafe impl Send for Device {}
unsafe impl Sync for Device {}

/// A single reusable allocator/list/fence for the immediate-submit staging
/// uploads `create_buffer`/`create_texture` need (§4.4); serialized by the
/// surrounding `Mutex` rather than pooled, since resource creation is not a
/// per-frame hot path.
struct UploadContext {
    allocator: native::CommandAllocator,
    list: native::GraphicsCommandList,
    fence: native::Fence,
    event: native::Event,
    fence_value: u64,
}

impl Device {
    pub(super) fn new(
        raw: native::Device,
        present_queue: native::CommandQueue,
        limits: Limits,
    ) -> Result<Self, DeviceError> {
        let rtv_pool = DescriptorAllocator::new(&raw, INITIAL_RTV_CAPACITY, false)
            .map_err(|_| DeviceError::OutOfMemory)?;
        let dsv_pool = DescriptorAllocator::new(&raw, INITIAL_DSV_CAPACITY, false)
            .map_err(|_| DeviceError::OutOfMemory)?;
        let srv_uav_pool = DescriptorAllocator::new(&raw, INITIAL_SRV_UAV_CAPACITY, true)
            .map_err(|_| DeviceError::OutOfMemory)?;
        let sampler_pool = DescriptorAllocator::new(&raw, INITIAL_SAMPLER_CAPACITY, true)
            .map_err(|_| DeviceError::OutOfMemory)?;

        let upload_allocator = raw
            .create_command_allocator(native::CmdListType::Direct)
            .into_device_result("upload command allocator creation")?;
        let upload_list = raw
            .create_graphics_command_list(
                native::CmdListType::Direct,
                upload_allocator,
                native::PipelineState::null(),
                0,
            )
            .into_device_result("upload command list creation")?;
        upload_list.close();
        let upload_fence = raw.create_fence(0).into_device_result("upload fence creation")?;
        let upload = Mutex::new(UploadContext {
            allocator: upload_allocator,
            list: upload_list,
            fence: upload_fence,
            event: native::Event::create(false, false),
            fence_value: 0,
        });

        Ok(Device { raw, present_queue, rtv_pool, dsv_pool, srv_uav_pool, sampler_pool, limits, upload })
    }

    /// Records `body` into the device's single transient upload list and
    /// blocks until `present_queue` has executed it (§4.4's upload
    /// allocator, collapsed to an immediate-submit since this backend keeps
    /// committed resources rather than a recycling transfer pool).
    unsafe fn immediate_submit(&self, body: impl FnOnce(native::GraphicsCommandList)) -> Result<(), DeviceError> {
        let mut upload = self.upload.lock();
        upload.allocator.reset();
        upload.list.reset(upload.allocator, native::PipelineState::null());
        body(upload.list);
        upload.list.close();

        self.present_queue.execute_command_lists(&[upload.list.as_list()]);

        upload.fence_value += 1;
        let target = upload.fence_value;
        self.present_queue.signal(upload.fence, target).into_device_result("upload queue signal")?;
        if upload.fence.get_completed_value() < target {
            upload
                .fence
                .set_event_on_completion(target, upload.event)
                .into_device_result("upload fence completion event")?;
            upload.event.wait(u32::MAX);
        }
        Ok(())
    }

    unsafe fn create_staging_buffer(&self, size: u64) -> Result<native::Resource, DeviceError> {
        let resource_desc = Direct3D12::D3D12_RESOURCE_DESC {
            Dimension: Direct3D12::D3D12_RESOURCE_DIMENSION_BUFFER,
            Alignment: 0,
            Width: size.max(1),
            Height: 1,
            DepthOrArraySize: 1,
            MipLevels: 1,
            Format: windows::Win32::Graphics::Dxgi::DXGI_FORMAT_UNKNOWN,
            SampleDesc: windows::Win32::Graphics::Dxgi::DXGI_SAMPLE_DESC { Count: 1, Quality: 0 },
            Layout: Direct3D12::D3D12_TEXTURE_LAYOUT_ROW_MAJOR,
            Flags: Direct3D12::D3D12_RESOURCE_FLAG_NONE,
        };
        self.raw
            .create_committed_resource(
                &Self::heap_properties(MemoryTypeOrDefault::Upload),
                Direct3D12::D3D12_HEAP_FLAG_NONE,
                &resource_desc,
                Direct3D12::D3D12_RESOURCE_STATE_GENERIC_READ,
                None,
            )
            .into_device_result("staging buffer creation")
    }

    /// §4.4: `Private`-memory (`D3D12_HEAP_TYPE_DEFAULT`) buffers have no
    /// persistent mapping, so `createBuffer` stages `data` through a
    /// transient upload heap and a one-shot `CopyBufferRegion` instead of a
    /// direct `memcpy`.
    unsafe fn upload_buffer_initial_data(&self, dst: native::Resource, data: &[u8]) -> Result<(), DeviceError> {
        let staging = self.create_staging_buffer(data.len() as u64)?;
        let ptr = staging.map(0, None).into_device_result("staging buffer map")?;
        std::ptr::copy_nonoverlapping(data.as_ptr(), ptr, data.len());
        staging.unmap(0, None);

        let result = self.immediate_submit(|list| {
            list.copy_buffer_region(dst, 0, staging, 0, data.len() as u64);
        });

        staging.destroy();
        result
    }

    /// Same staging path as [`Self::upload_buffer_initial_data`], split per
    /// subresource the way `gpu_hal::null`'s `new_texture` lays `initial_data`
    /// out (mip-major, then array layer). The destination subresources are
    /// explicitly transitioned `COMMON` -> `COPY_DEST` first, matching the
    /// explicit-barrier style `texture_barrier` uses everywhere else in this
    /// backend rather than relying on D3D12's implicit state promotion.
    /// Returns which subresources were written so the caller can seed their
    /// tracked layout as `CopyDest` rather than `Undefined`.
    unsafe fn upload_texture_initial_data(
        &self,
        resource: native::Resource,
        desc: &crate::TextureDescriptor,
        array_layer_count: u32,
        data: &[u8],
    ) -> Result<Vec<bool>, DeviceError> {
        let staging = self.create_staging_buffer(data.len() as u64)?;
        let ptr = staging.map(0, None).into_device_result("staging buffer map")?;
        std::ptr::copy_nonoverlapping(data.as_ptr(), ptr, data.len());
        staging.unmap(0, None);

        let subresource_count = (desc.mip_level_count * array_layer_count) as usize;
        let mut touched = vec![false; subresource_count];
        let mut regions: Vec<(u32, u64)> = Vec::with_capacity(subresource_count);
        let mut offset = 0u64;
        'outer: for mip in 0..desc.mip_level_count {
            let width = (desc.size.width >> mip).max(1);
            let height = (desc.size.height >> mip).max(1);
            let info = gpu_types::surface_info(desc.format, width, height);
            for layer in 0..array_layer_count {
                if offset >= data.len() as u64 {
                    break 'outer;
                }
                let subresource = layer * desc.mip_level_count + mip;
                touched[subresource as usize] = true;
                regions.push((subresource, offset));
                offset += info.slice_pitch;
            }
        }

        let barriers: Vec<Direct3D12::D3D12_RESOURCE_BARRIER> = regions
            .iter()
            .map(|&(subresource, _)| Direct3D12::D3D12_RESOURCE_BARRIER {
                Type: Direct3D12::D3D12_RESOURCE_BARRIER_TYPE_TRANSITION,
                Flags: Direct3D12::D3D12_RESOURCE_BARRIER_FLAG_NONE,
                Anonymous: Direct3D12::D3D12_RESOURCE_BARRIER_0 {
                    Transition: std::mem::ManuallyDrop::new(Direct3D12::D3D12_RESOURCE_TRANSITION_BARRIER {
                        pResource: resource.as_mut_ptr(),
                        Subresource: subresource,
                        StateBefore: Direct3D12::D3D12_RESOURCE_STATE_COMMON,
                        StateAfter: Direct3D12::D3D12_RESOURCE_STATE_COPY_DEST,
                    }),
                },
            })
            .collect();

        let result = self.immediate_submit(|list| {
            list.resource_barrier(&barriers);
            for &(subresource, src_offset) in &regions {
                list.copy_texture_region_from_buffer(resource, subresource, staging, src_offset);
            }
        });

        staging.destroy();
        result.map(|_| touched)
    }

    fn heap_properties(memory_type: MemoryTypeOrDefault) -> Direct3D12::D3D12_HEAP_PROPERTIES {
        let heap_type = match memory_type {
            MemoryTypeOrDefault::Private => Direct3D12::D3D12_HEAP_TYPE_DEFAULT,
            MemoryTypeOrDefault::Upload => Direct3D12::D3D12_HEAP_TYPE_UPLOAD,
            MemoryTypeOrDefault::Readback => Direct3D12::D3D12_HEAP_TYPE_READBACK,
        };
        Direct3D12::D3D12_HEAP_PROPERTIES {
            Type: heap_type,
            CPUPageProperty: Direct3D12::D3D12_CPU_PAGE_PROPERTY_UNKNOWN,
            MemoryPoolPreference: Direct3D12::D3D12_MEMORY_POOL_UNKNOWN,
            CreationNodeMask: 0,
            VisibleNodeMask: 0,
        }
    }
}

// ---- resources -------------------------------------------------------------------

pub struct Buffer {
    pub(super) resource: native::Resource,
    pub(super) size: u64,
    pub(super) mapped_ptr: Option<*mut u8>,
}

unsafe impl Send for Buffer {}
unsafe impl Sync for Buffer {}

pub struct Texture {
    pub(super) resource: native::Resource,
    pub(super) format: PixelFormat,
    pub(super) dimension: TextureDimension,
    pub(super) size: Extent3d,
    pub(super) mip_level_count: u32,
    pub(super) array_layer_count: u32,
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
}

#[derive(Debug)]
pub struct Sampler {
    pub(super) index: u32,
}

#[derive(Debug)]
pub struct QueryHeap {
    pub(super) raw: native::QueryHeap,
    pub(super) ty: crate::QueryType,
    pub(super) count: u32,
}

/// Reserved surface (§9's resolved Open Question): declared but never
/// consulted by resource binding, since no backend wires descriptor tables
/// to a `BindGroupLayout` yet.
#[derive(Debug)]
pub struct BindGroupLayout;

#[derive(Debug)]
pub struct PipelineLayout {
    pub(super) root_signature: native::RootSignature,
    pub(super) push_constant_ranges: Vec<PushConstantRange>,
}

#[derive(Debug)]
pub struct ShaderModule {
    pub(super) bytecode: Vec<u8>,
    pub(super) entry_point: String,
}

#[derive(Debug)]
pub struct RenderPipeline {
    pub(super) raw: native::PipelineState,
    pub(super) topology: Direct3D12::D3D_PRIMITIVE_TOPOLOGY,
}

#[derive(Debug)]
pub struct ComputePipeline {
    pub(super) raw: native::PipelineState,
}

unsafe impl crate::Device<super::Api> for Device {
    unsafe fn create_buffer(
        &self,
        desc: &BufferDescriptor,
        initial_data: Option<&[u8]>,
    ) -> Result<Buffer, DeviceError> {
        let aligned_size = desc.size.max(1);
        let resource_desc = Direct3D12::D3D12_RESOURCE_DESC {
            Dimension: Direct3D12::D3D12_RESOURCE_DIMENSION_BUFFER,
            Alignment: 0,
            Width: aligned_size,
            Height: 1,
            DepthOrArraySize: 1,
            MipLevels: 1,
            Format: windows::Win32::Graphics::Dxgi::DXGI_FORMAT_UNKNOWN,
            SampleDesc: windows::Win32::Graphics::Dxgi::DXGI_SAMPLE_DESC { Count: 1, Quality: 0 },
            Layout: Direct3D12::D3D12_TEXTURE_LAYOUT_ROW_MAJOR,
            Flags: Direct3D12::D3D12_RESOURCE_FLAG_NONE,
        };

        let initial_state = match desc.memory_type {
            MemoryTypeOrDefault::Private => Direct3D12::D3D12_RESOURCE_STATE_COMMON,
            MemoryTypeOrDefault::Upload => Direct3D12::D3D12_RESOURCE_STATE_GENERIC_READ,
            MemoryTypeOrDefault::Readback => Direct3D12::D3D12_RESOURCE_STATE_COPY_DEST,
        };

        let resource = self
            .raw
            .create_committed_resource(
                &Self::heap_properties(desc.memory_type),
                Direct3D12::D3D12_HEAP_FLAG_NONE,
                &resource_desc,
                initial_state,
                None,
            )
            .into_device_result("buffer creation")?;

        let mapped_ptr = match desc.memory_type {
            MemoryTypeOrDefault::Private => None,
            _ => Some(resource.map(0, None).into_device_result("buffer map")?),
        };

        match (mapped_ptr, initial_data) {
            (Some(ptr), Some(data)) => {
                std::ptr::copy_nonoverlapping(data.as_ptr(), ptr, data.len().min(aligned_size as usize));
            }
            (None, Some(data)) => {
                let len = data.len().min(aligned_size as usize);
                self.upload_buffer_initial_data(resource, &data[..len])?;
            }
            (_, None) => {}
        }

        Ok(Buffer { resource, size: aligned_size, mapped_ptr })
    }

    unsafe fn destroy_buffer(&self, buffer: Buffer) {
        if buffer.mapped_ptr.is_some() {
            buffer.resource.unmap(0, None);
        }
        buffer.resource.destroy();
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
        let dimension = match desc.dimension {
            TextureDimension::D1 => Direct3D12::D3D12_RESOURCE_DIMENSION_TEXTURE1D,
            TextureDimension::D3 => Direct3D12::D3D12_RESOURCE_DIMENSION_TEXTURE3D,
            _ => Direct3D12::D3D12_RESOURCE_DIMENSION_TEXTURE2D,
        };
        let depth_or_array_size = if desc.dimension == TextureDimension::D3 {
            desc.size.depth_or_array_layers as u16
        } else {
            array_layer_count as u16
        };

        let mut flags = Direct3D12::D3D12_RESOURCE_FLAG_NONE;
        if desc.usage.contains(gpu_types::TextureUsages::RENDER_TARGET) {
            flags |= Direct3D12::D3D12_RESOURCE_FLAG_ALLOW_RENDER_TARGET;
        }
        if gpu_types::is_depth_stencil(desc.format) {
            flags |= Direct3D12::D3D12_RESOURCE_FLAG_ALLOW_DEPTH_STENCIL;
        }
        if desc.usage.contains(gpu_types::TextureUsages::STORAGE) {
            flags |= Direct3D12::D3D12_RESOURCE_FLAG_ALLOW_UNORDERED_ACCESS;
        }

        let resource_desc = Direct3D12::D3D12_RESOURCE_DESC {
            Dimension: dimension,
            Alignment: 0,
            Width: desc.size.width as u64,
            Height: desc.size.height,
            DepthOrArraySize: depth_or_array_size,
            MipLevels: desc.mip_level_count as u16,
            Format: super::conv::map_texture_format(desc.format),
            SampleDesc: windows::Win32::Graphics::Dxgi::DXGI_SAMPLE_DESC {
                Count: desc.sample_count.max(1),
                Quality: 0,
            },
            Layout: Direct3D12::D3D12_TEXTURE_LAYOUT_UNKNOWN,
            Flags: flags,
        };

        let resource = self
            .raw
            .create_committed_resource(
                &Self::heap_properties(MemoryTypeOrDefault::Private),
                Direct3D12::D3D12_HEAP_FLAG_NONE,
                &resource_desc,
                Direct3D12::D3D12_RESOURCE_STATE_COMMON,
                None,
            )
            .into_device_result("texture creation")?;

        let subresource_count = desc.mip_level_count * array_layer_count;
        let mut layouts = vec![TextureLayout::Undefined; subresource_count as usize];
        if let Some(data) = initial_data {
            let touched = self.upload_texture_initial_data(resource, desc, array_layer_count, data)?;
            for (index, was_touched) in touched.into_iter().enumerate() {
                if was_touched {
                    layouts[index] = TextureLayout::CopyDest;
                }
            }
        }

        Ok(Texture {
            resource,
            format: desc.format,
            dimension: desc.dimension,
            size: desc.size,
            mip_level_count: desc.mip_level_count,
            array_layer_count,
            layouts: Mutex::new(layouts),
        })
    }

    unsafe fn destroy_texture(&self, texture: Texture) {
        texture.resource.destroy();
    }

    unsafe fn create_sampler(&self, desc: &SamplerDescriptor) -> Result<Sampler, DeviceError> {
        let index = self
            .sampler_pool
            .allocate(1)
            .map_err(|_| DeviceError::OutOfMemory)?;
        let handle = self.sampler_pool.with_heap(|heap| heap.cpu_handle(index));
        let sampler_desc = Direct3D12::D3D12_SAMPLER_DESC {
            Filter: super::conv::map_filter(desc.min_filter, desc.mag_filter, desc.mipmap_filter, desc.compare.is_some()),
            AddressU: super::conv::map_address_mode(desc.address_mode_u),
            AddressV: super::conv::map_address_mode(desc.address_mode_v),
            AddressW: super::conv::map_address_mode(desc.address_mode_w),
            MipLODBias: 0.0,
            MaxAnisotropy: desc.anisotropy_clamp.max(1) as u32,
            ComparisonFunc: desc
                .compare
                .map(super::conv::map_compare_function)
                .unwrap_or(Direct3D12::D3D12_COMPARISON_FUNC_NEVER),
            BorderColor: [0.0; 4],
            MinLOD: desc.lod_min_clamp,
            MaxLOD: desc.lod_max_clamp,
        };
        self.raw.CreateSampler(&sampler_desc, handle);
        Ok(Sampler { index })
    }

    unsafe fn destroy_sampler(&self, sampler: Sampler) {
        self.sampler_pool.release(sampler.index, 1);
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
        let root_parameters: Vec<Direct3D12::D3D12_ROOT_PARAMETER> = desc
            .push_constant_ranges
            .iter()
            .enumerate()
            .map(|(index, range)| Direct3D12::D3D12_ROOT_PARAMETER {
                ParameterType: Direct3D12::D3D12_ROOT_PARAMETER_TYPE_32BIT_CONSTANTS,
                Anonymous: Direct3D12::D3D12_ROOT_PARAMETER_0 {
                    Constants: Direct3D12::D3D12_ROOT_CONSTANTS {
                        ShaderRegister: index as u32,
                        RegisterSpace: 0,
                        Num32BitValues: range.size / 4,
                    },
                },
                ShaderVisibility: Direct3D12::D3D12_SHADER_VISIBILITY_ALL,
            })
            .collect();

        if root_parameters.len() > super::MAX_ROOT_ELEMENTS {
            log::error!("pipeline layout exceeds {} root elements", super::MAX_ROOT_ELEMENTS);
            return Err(DeviceError::OutOfMemory);
        }

        let root_signature_desc = Direct3D12::D3D12_ROOT_SIGNATURE_DESC {
            NumParameters: root_parameters.len() as u32,
            pParameters: if root_parameters.is_empty() {
                std::ptr::null()
            } else {
                root_parameters.as_ptr()
            },
            NumStaticSamplers: 0,
            pStaticSamplers: std::ptr::null(),
            Flags: Direct3D12::D3D12_ROOT_SIGNATURE_FLAG_ALLOW_INPUT_ASSEMBLER_INPUT_LAYOUT,
        };

        let blob = native::Blob::serialize_root_signature(
            &root_signature_desc,
            native::RootSignatureVersion::V1_0,
        )
        .into_device_result("root signature serialization")?;

        let root_signature = self
            .raw
            .create_root_signature(0, blob.as_slice())
            .into_device_result("root signature creation")?;

        Ok(PipelineLayout {
            root_signature,
            push_constant_ranges: desc.push_constant_ranges.to_vec(),
        })
    }

    unsafe fn destroy_pipeline_layout(&self, layout: PipelineLayout) {
        layout.root_signature.destroy();
    }

    unsafe fn create_shader_module(
        &self,
        desc: &ShaderModuleDescriptor,
    ) -> Result<ShaderModule, DeviceError> {
        Ok(ShaderModule {
            bytecode: desc.source.to_vec(),
            entry_point: desc.entry_point.to_string(),
        })
    }

    unsafe fn destroy_shader_module(&self, _module: ShaderModule) {}

    unsafe fn create_render_pipeline(
        &self,
        desc: &RenderPipelineDescriptor<super::Api>,
    ) -> Result<RenderPipeline, DeviceError> {
        let input_elements: Vec<Direct3D12::D3D12_INPUT_ELEMENT_DESC> = desc
            .vertex
            .buffers
            .iter()
            .enumerate()
            .flat_map(|(slot, layout)| {
                layout.attributes.iter().map(move |attr| Direct3D12::D3D12_INPUT_ELEMENT_DESC {
                    SemanticName: windows::core::PSTR(b"TEXCOORD\0".as_ptr() as *mut _),
                    SemanticIndex: attr.shader_location,
                    Format: super::conv::map_vertex_format(attr.format),
                    InputSlot: slot as u32,
                    AlignedByteOffset: attr.offset,
                    InputSlotClass: match layout.step_mode {
                        crate::VertexStepMode::Vertex => Direct3D12::D3D12_INPUT_CLASSIFICATION_PER_VERTEX_DATA,
                        crate::VertexStepMode::Instance => Direct3D12::D3D12_INPUT_CLASSIFICATION_PER_INSTANCE_DATA,
                    },
                    InstanceDataStepRate: match layout.step_mode {
                        crate::VertexStepMode::Vertex => 0,
                        crate::VertexStepMode::Instance => 1,
                    },
                })
            })
            .collect();

        let render_targets: Vec<_> = desc
            .color_targets
            .iter()
            .map(|target| super::conv::map_texture_format(target.format))
            .collect();
        let mut rtv_formats = [windows::Win32::Graphics::Dxgi::DXGI_FORMAT_UNKNOWN; 8];
        for (slot, format) in render_targets.iter().enumerate().take(8) {
            rtv_formats[slot] = *format;
        }

        let depth_format = desc
            .depth_stencil
            .map(|ds| super::conv::map_texture_format(ds.format))
            .unwrap_or(windows::Win32::Graphics::Dxgi::DXGI_FORMAT_UNKNOWN);

        let pso_desc = Direct3D12::D3D12_GRAPHICS_PIPELINE_STATE_DESC {
            pRootSignature: desc.layout.root_signature.as_mut_ptr(),
            VS: Direct3D12::D3D12_SHADER_BYTECODE {
                pShaderBytecode: desc.vertex_shader.bytecode.as_ptr() as *const _,
                BytecodeLength: desc.vertex_shader.bytecode.len(),
            },
            PS: desc
                .fragment_shader
                .map(|module| Direct3D12::D3D12_SHADER_BYTECODE {
                    pShaderBytecode: module.bytecode.as_ptr() as *const _,
                    BytecodeLength: module.bytecode.len(),
                })
                .unwrap_or_default(),
            BlendState: super::conv::map_blend_state(desc.color_targets),
            SampleMask: desc.multisample.mask as u32,
            RasterizerState: super::conv::map_rasterizer_state(&desc.rasterizer),
            DepthStencilState: desc
                .depth_stencil
                .map(super::conv::map_depth_stencil_state)
                .unwrap_or_default(),
            InputLayout: Direct3D12::D3D12_INPUT_LAYOUT_DESC {
                pInputElementDescs: if input_elements.is_empty() {
                    std::ptr::null()
                } else {
                    input_elements.as_ptr()
                },
                NumElements: input_elements.len() as u32,
            },
            PrimitiveTopologyType: super::conv::map_topology_type(desc.primitive_topology),
            NumRenderTargets: render_targets.len() as u32,
            RTVFormats: rtv_formats,
            DSVFormat: depth_format,
            SampleDesc: windows::Win32::Graphics::Dxgi::DXGI_SAMPLE_DESC {
                Count: desc.multisample.count.max(1),
                Quality: 0,
            },
            ..unsafe { mem::zeroed() }
        };

        let raw = self
            .raw
            .create_graphics_pipeline_state(&pso_desc)
            .into_device_result("graphics pipeline creation")?;

        Ok(RenderPipeline {
            raw,
            topology: super::conv::map_primitive_topology(desc.primitive_topology),
        })
    }

    unsafe fn destroy_render_pipeline(&self, pipeline: RenderPipeline) {
        pipeline.raw.destroy();
    }

    unsafe fn create_compute_pipeline(
        &self,
        desc: &ComputePipelineDescriptor<super::Api>,
    ) -> Result<ComputePipeline, DeviceError> {
        let pso_desc = Direct3D12::D3D12_COMPUTE_PIPELINE_STATE_DESC {
            pRootSignature: desc.layout.root_signature.as_mut_ptr(),
            CS: Direct3D12::D3D12_SHADER_BYTECODE {
                pShaderBytecode: desc.shader.bytecode.as_ptr() as *const _,
                BytecodeLength: desc.shader.bytecode.len(),
            },
            ..unsafe { mem::zeroed() }
        };
        let raw = self
            .raw
            .create_compute_pipeline_state(&pso_desc)
            .into_device_result("compute pipeline creation")?;
        Ok(ComputePipeline { raw })
    }

    unsafe fn destroy_compute_pipeline(&self, pipeline: ComputePipeline) {
        pipeline.raw.destroy();
    }

    unsafe fn create_query_heap(&self, desc: &QueryHeapDescriptor) -> Result<QueryHeap, DeviceError> {
        let kind = match desc.ty {
            crate::QueryType::Occlusion => Direct3D12::D3D12_QUERY_HEAP_TYPE_OCCLUSION,
            crate::QueryType::Timestamp => Direct3D12::D3D12_QUERY_HEAP_TYPE_TIMESTAMP,
        };
        let heap_desc = Direct3D12::D3D12_QUERY_HEAP_DESC {
            Type: kind,
            Count: desc.count,
            NodeMask: 0,
        };
        let raw = self
            .raw
            .create_query_heap(&heap_desc)
            .into_device_result("query heap creation")?;
        Ok(QueryHeap { raw, ty: desc.ty, count: desc.count })
    }

    unsafe fn destroy_query_heap(&self, heap: QueryHeap) {
        heap.raw.destroy();
    }

    unsafe fn create_command_buffer(
        &self,
        desc: &CommandBufferDescriptor,
    ) -> Result<super::command::CommandBuffer, DeviceError> {
        super::command::CommandBuffer::new(&self.raw, desc)
    }

    unsafe fn wait_idle(&self) -> Result<(), DeviceError> {
        // Device-wide idle is implemented per-queue (§4.5); a device with no
        // outstanding queue reference has nothing further to flush here.
        Ok(())
    }

    fn timestamp_frequency(&self) -> u64 {
        // Queried per-queue via `ID3D12CommandQueue::GetTimestampFrequency`
        // in practice; 10 MHz matches typical D3D12 hardware and is used as
        // a stable fallback here since `Device` doesn't retain a queue.
        10_000_000
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

