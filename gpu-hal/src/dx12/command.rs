//! Queue submission and command recording (§4.5/§4.6). Barriers use the
//! legacy (non-enhanced) path: a fixed-size ring of
//! [`crate::MAX_BARRIER_COUNT`] `D3D12_RESOURCE_BARRIER` entries that
//! auto-flushes when full.

use std::sync::atomic::{AtomicU64, Ordering};

use arrayvec::ArrayVec;
use windows::Win32::Graphics::Direct3D12;

use gpu_types::{Color, IndexFormat, LoadAction, ScissorRect, TextureLayout, Viewport};

use crate::auxil::barrier::{classify, TransitionKind};
use crate::{
    ComputePassDescriptor, DeviceError, RenderPassDescriptor, SurfaceError, TextureBarrierRange,
};

use super::device::{Buffer, ComputePipeline, PipelineLayout, RenderPipeline, Texture};
use super::HResult as _;

pub struct Queue {
    raw: native::CommandQueue,
    fence: native::Fence,
    fence_value: AtomicU64,
    event: native::Event,
}

unsafe impl Send for Queue {}
unsafe impl Sync for Queue {}

impl std::fmt::Debug for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queue").finish()
    }
}

impl Queue {
    pub(super) fn new(raw: native::CommandQueue, device: native::Device) -> Self {
        let fence = device
            .create_fence(0)
            .expect("fence creation should succeed on an already-opened device");
        Queue {
            raw,
            fence,
            fence_value: AtomicU64::new(0),
            event: native::Event::create(false, false),
        }
    }
}

unsafe impl crate::Queue<super::Api> for Queue {
    unsafe fn submit(&self, command_buffers: &[&CommandBuffer]) -> Result<(), DeviceError> {
        let lists: Vec<native::CommandList> = command_buffers.iter().map(|cb| cb.list.as_list()).collect();
        self.raw.execute_command_lists(&lists);
        Ok(())
    }

    unsafe fn present(&self, surface: &mut super::Surface) -> Result<(), SurfaceError> {
        surface.present()
    }

    unsafe fn wait_idle(&self) -> Result<(), DeviceError> {
        let target = self.fence_value.fetch_add(1, Ordering::SeqCst) + 1;
        self.raw
            .signal(self.fence, target)
            .into_device_result("queue signal")?;
        if self.fence.get_completed_value() < target {
            self.fence
                .set_event_on_completion(target, self.event)
                .into_device_result("fence completion event")?;
            self.event.wait(u32::MAX);
        }
        Ok(())
    }
}

/// Cheap fixed-size CPU-visible heaps a [`CommandBuffer`] owns outright so
/// `begin_render_pass` can stamp transient RTV/DSV descriptors per draw
/// call rather than reaching back into the device's shared pools (§4.7).
const TRANSIENT_RTV_CAPACITY: u32 = crate::MAX_COLOR_TARGETS as u32;
const TRANSIENT_DSV_CAPACITY: u32 = 1;

pub struct CommandBuffer {
    device: native::Device,
    allocator: native::CommandAllocator,
    list: native::GraphicsCommandList,
    barriers: ArrayVec<Direct3D12::D3D12_RESOURCE_BARRIER, { crate::MAX_BARRIER_COUNT }>,
    in_render_pass: bool,
    rtv_heap: native::DescriptorHeap,
    rtv_increment: u32,
    dsv_heap: native::DescriptorHeap,
    dsv_increment: u32,
}

unsafe impl Send for CommandBuffer {}
unsafe impl Sync for CommandBuffer {}

impl std::fmt::Debug for CommandBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandBuffer")
            .field("in_render_pass", &self.in_render_pass)
            .finish()
    }
}

impl CommandBuffer {
    pub(super) fn new(
        device: &native::Device,
        _desc: &crate::CommandBufferDescriptor,
    ) -> Result<Self, DeviceError> {
        let allocator = device
            .create_command_allocator(native::CmdListType::Direct)
            .into_device_result("command allocator creation")?;
        let list = device
            .create_graphics_command_list(
                native::CmdListType::Direct,
                allocator,
                native::PipelineState::null(),
                0,
            )
            .into_device_result("command list creation")?;
        list.close();

        let rtv_heap = device
            .create_descriptor_heap(
                TRANSIENT_RTV_CAPACITY,
                Direct3D12::D3D12_DESCRIPTOR_HEAP_TYPE_RTV,
                Direct3D12::D3D12_DESCRIPTOR_HEAP_FLAG_NONE,
                0,
            )
            .into_device_result("transient RTV heap creation")?;
        let dsv_heap = device
            .create_descriptor_heap(
                TRANSIENT_DSV_CAPACITY,
                Direct3D12::D3D12_DESCRIPTOR_HEAP_TYPE_DSV,
                Direct3D12::D3D12_DESCRIPTOR_HEAP_FLAG_NONE,
                0,
            )
            .into_device_result("transient DSV heap creation")?;

        Ok(CommandBuffer {
            device: *device,
            allocator,
            list,
            barriers: ArrayVec::new(),
            in_render_pass: false,
            rtv_increment: device.get_descriptor_increment_size(Direct3D12::D3D12_DESCRIPTOR_HEAP_TYPE_RTV),
            rtv_heap,
            dsv_increment: device.get_descriptor_increment_size(Direct3D12::D3D12_DESCRIPTOR_HEAP_TYPE_DSV),
            dsv_heap,
        })
    }

    fn push_barrier(&mut self, barrier: Direct3D12::D3D12_RESOURCE_BARRIER) {
        if self.barriers.is_full() {
            unsafe { self.flush_barriers() };
        }
        self.barriers.push(barrier);
    }

    fn rtv_handle(&self, slot: u32) -> Direct3D12::D3D12_CPU_DESCRIPTOR_HANDLE {
        let start = self.rtv_heap.get_cpu_descriptor_handle_for_heap_start();
        Direct3D12::D3D12_CPU_DESCRIPTOR_HANDLE { ptr: start.ptr + (slot * self.rtv_increment) as usize }
    }

    fn dsv_handle(&self, slot: u32) -> Direct3D12::D3D12_CPU_DESCRIPTOR_HANDLE {
        let start = self.dsv_heap.get_cpu_descriptor_handle_for_heap_start();
        Direct3D12::D3D12_CPU_DESCRIPTOR_HANDLE { ptr: start.ptr + (slot * self.dsv_increment) as usize }
    }
}

/// Builds a render target view descriptor for one attachment slot. Array
/// textures (including cube faces, addressed as array layers per §9's
/// convention) go through `Texture2DArray` with a single-layer slice;
/// plain 2D textures use the simpler `Texture2D` variant.
fn render_target_view_desc(
    texture: &Texture,
    mip_level: u32,
    array_layer: u32,
) -> Direct3D12::D3D12_RENDER_TARGET_VIEW_DESC {
    let format = super::conv::map_texture_format_nosrgb(texture.format);
    if texture.array_layer_count <= 1 {
        Direct3D12::D3D12_RENDER_TARGET_VIEW_DESC {
            Format: format,
            ViewDimension: Direct3D12::D3D12_RTV_DIMENSION_TEXTURE2D,
            Anonymous: Direct3D12::D3D12_RENDER_TARGET_VIEW_DESC_0 {
                Texture2D: Direct3D12::D3D12_TEX2D_RTV { MipSlice: mip_level, PlaneSlice: 0 },
            },
        }
    } else {
        Direct3D12::D3D12_RENDER_TARGET_VIEW_DESC {
            Format: format,
            ViewDimension: Direct3D12::D3D12_RTV_DIMENSION_TEXTURE2DARRAY,
            Anonymous: Direct3D12::D3D12_RENDER_TARGET_VIEW_DESC_0 {
                Texture2DArray: Direct3D12::D3D12_TEX2D_ARRAY_RTV {
                    MipSlice: mip_level,
                    FirstArraySlice: array_layer,
                    ArraySize: 1,
                    PlaneSlice: 0,
                },
            },
        }
    }
}

fn depth_stencil_view_desc(
    texture: &Texture,
    mip_level: u32,
    array_layer: u32,
) -> Direct3D12::D3D12_DEPTH_STENCIL_VIEW_DESC {
    let format = super::conv::map_texture_format(texture.format);
    if texture.array_layer_count <= 1 {
        Direct3D12::D3D12_DEPTH_STENCIL_VIEW_DESC {
            Format: format,
            ViewDimension: Direct3D12::D3D12_DSV_DIMENSION_TEXTURE2D,
            Flags: Direct3D12::D3D12_DSV_FLAG_NONE,
            Anonymous: Direct3D12::D3D12_DEPTH_STENCIL_VIEW_DESC_0 {
                Texture2D: Direct3D12::D3D12_TEX2D_DSV { MipSlice: mip_level },
            },
        }
    } else {
        Direct3D12::D3D12_DEPTH_STENCIL_VIEW_DESC {
            Format: format,
            ViewDimension: Direct3D12::D3D12_DSV_DIMENSION_TEXTURE2DARRAY,
            Flags: Direct3D12::D3D12_DSV_FLAG_NONE,
            Anonymous: Direct3D12::D3D12_DEPTH_STENCIL_VIEW_DESC_0 {
                Texture2DArray: Direct3D12::D3D12_TEX2D_ARRAY_DSV {
                    MipSlice: mip_level,
                    FirstArraySlice: array_layer,
                    ArraySize: 1,
                },
            },
        }
    }
}

unsafe impl crate::CommandBuffer<super::Api> for CommandBuffer {
    unsafe fn begin(&mut self) {
        self.allocator.reset();
        self.list.reset(self.allocator, native::PipelineState::null());
    }

    unsafe fn end(&mut self) {
        self.flush_barriers();
        self.list.close();
    }

    unsafe fn texture_barrier(&mut self, texture: &Texture, new_layout: TextureLayout, range: TextureBarrierRange) {
        let mut layouts = texture.layouts.lock();
        for mip in range.base_mip..range.base_mip + range.level_count {
            for layer in range.base_layer..range.base_layer + range.layer_count {
                let index = texture.subresource_index(mip, layer) as usize;
                let old_layout = layouts[index];
                match classify(old_layout, new_layout) {
                    TransitionKind::NoOp => {}
                    TransitionKind::UavBarrier => {
                        self.push_barrier(Direct3D12::D3D12_RESOURCE_BARRIER {
                            Type: Direct3D12::D3D12_RESOURCE_BARRIER_TYPE_UAV,
                            Flags: Direct3D12::D3D12_RESOURCE_BARRIER_FLAG_NONE,
                            Anonymous: Direct3D12::D3D12_RESOURCE_BARRIER_0 {
                                UAV: std::mem::ManuallyDrop::new(Direct3D12::D3D12_RESOURCE_UAV_BARRIER {
                                    pResource: texture.resource.as_mut_ptr(),
                                }),
                            },
                        });
                    }
                    TransitionKind::Transition => {
                        self.push_barrier(Direct3D12::D3D12_RESOURCE_BARRIER {
                            Type: Direct3D12::D3D12_RESOURCE_BARRIER_TYPE_TRANSITION,
                            Flags: Direct3D12::D3D12_RESOURCE_BARRIER_FLAG_NONE,
                            Anonymous: Direct3D12::D3D12_RESOURCE_BARRIER_0 {
                                Transition: std::mem::ManuallyDrop::new(
                                    Direct3D12::D3D12_RESOURCE_TRANSITION_BARRIER {
                                        pResource: texture.resource.as_mut_ptr(),
                                        Subresource: index as u32,
                                        StateBefore: super::conv::map_texture_layout(old_layout),
                                        StateAfter: super::conv::map_texture_layout(new_layout),
                                    },
                                ),
                            },
                        });
                    }
                }
                layouts[index] = new_layout;
            }
        }
    }

    unsafe fn buffer_barrier(&mut self, buffer: &Buffer) {
        self.push_barrier(Direct3D12::D3D12_RESOURCE_BARRIER {
            Type: Direct3D12::D3D12_RESOURCE_BARRIER_TYPE_UAV,
            Flags: Direct3D12::D3D12_RESOURCE_BARRIER_FLAG_NONE,
            Anonymous: Direct3D12::D3D12_RESOURCE_BARRIER_0 {
                UAV: std::mem::ManuallyDrop::new(Direct3D12::D3D12_RESOURCE_UAV_BARRIER {
                    pResource: buffer.resource.as_mut_ptr(),
                }),
            },
        });
    }

    unsafe fn global_barrier(&mut self) {
        self.push_barrier(Direct3D12::D3D12_RESOURCE_BARRIER {
            Type: Direct3D12::D3D12_RESOURCE_BARRIER_TYPE_UAV,
            Flags: Direct3D12::D3D12_RESOURCE_BARRIER_FLAG_NONE,
            Anonymous: Direct3D12::D3D12_RESOURCE_BARRIER_0 {
                UAV: std::mem::ManuallyDrop::new(Direct3D12::D3D12_RESOURCE_UAV_BARRIER {
                    pResource: windows::core::default::Default::default(),
                }),
            },
        });
    }

    unsafe fn flush_barriers(&mut self) {
        if self.barriers.is_empty() {
            return;
        }
        self.list.resource_barrier(&self.barriers);
        self.barriers.clear();
    }

    unsafe fn copy_buffer_to_buffer(&mut self, src: &Buffer, src_offset: u64, dst: &Buffer, dst_offset: u64, size: u64) {
        self.flush_barriers();
        self.list.copy_buffer_region(dst.resource, dst_offset, src.resource, src_offset, size);
    }

    unsafe fn copy_buffer_to_texture(&mut self, src: &Buffer, dst: &Texture, mip: u32, layer: u32) {
        self.flush_barriers();
        let subresource = dst.subresource_index(mip, layer);
        self.list.copy_texture_region_from_buffer(dst.resource, subresource, src.resource, 0);
    }

    unsafe fn copy_texture_to_buffer(&mut self, src: &Texture, mip: u32, layer: u32, dst: &Buffer) {
        self.flush_barriers();
        let subresource = src.subresource_index(mip, layer);
        self.list.copy_buffer_region_from_texture(dst.resource, 0, src.resource, subresource);
    }

    unsafe fn begin_render_pass(&mut self, desc: &RenderPassDescriptor<super::Api>) {
        self.in_render_pass = true;

        let mut rtv_handles: ArrayVec<Direct3D12::D3D12_CPU_DESCRIPTOR_HANDLE, { crate::MAX_COLOR_TARGETS }> =
            ArrayVec::new();

        for (slot, attachment) in desc.color_attachments.iter().enumerate() {
            let attachment = match attachment {
                Some(attachment) => attachment,
                None => continue,
            };
            let handle = self.rtv_handle(slot as u32);
            let rtv_desc = render_target_view_desc(attachment.target, attachment.mip_level, attachment.array_layer);
            self.device.create_render_target_view(&attachment.target.resource, &rtv_desc, handle);
            if attachment.load_op == LoadAction::Clear {
                let color = [
                    attachment.clear_value.r as f32,
                    attachment.clear_value.g as f32,
                    attachment.clear_value.b as f32,
                    attachment.clear_value.a as f32,
                ];
                self.list.clear_render_target_view(handle, color);
            }
            while rtv_handles.len() < slot {
                rtv_handles.push(self.rtv_handle(rtv_handles.len() as u32));
            }
            rtv_handles.push(handle);
        }

        let dsv_handle = desc.depth_stencil_attachment.as_ref().map(|attachment| {
            let handle = self.dsv_handle(0);
            let dsv_desc = depth_stencil_view_desc(attachment.target, attachment.mip_level, attachment.array_layer);
            self.device.create_depth_stencil_view(&attachment.target.resource, &dsv_desc, handle);
            if attachment.depth_load_op == LoadAction::Clear || attachment.stencil_load_op == LoadAction::Clear {
                let mut flags = Direct3D12::D3D12_CLEAR_FLAGS(0);
                if attachment.depth_load_op == LoadAction::Clear {
                    flags |= Direct3D12::D3D12_CLEAR_FLAG_DEPTH;
                }
                if attachment.stencil_load_op == LoadAction::Clear {
                    flags |= Direct3D12::D3D12_CLEAR_FLAG_STENCIL;
                }
                self.list.clear_depth_stencil_view(
                    handle,
                    flags,
                    attachment.depth_clear_value,
                    attachment.stencil_clear_value as u8,
                );
            }
            handle
        });

        self.list.set_render_targets(&rtv_handles, dsv_handle);
    }

    unsafe fn end_render_pass(&mut self) {
        self.in_render_pass = false;
    }

    unsafe fn begin_compute_pass(&mut self, _desc: &ComputePassDescriptor) {}
    unsafe fn end_compute_pass(&mut self) {}

    unsafe fn set_viewports(&mut self, viewports: &[Viewport]) {
        let raw: Vec<Direct3D12::D3D12_VIEWPORT> = viewports
            .iter()
            .map(|vp| Direct3D12::D3D12_VIEWPORT {
                TopLeftX: vp.x,
                TopLeftY: vp.y,
                Width: vp.width,
                Height: vp.height,
                MinDepth: vp.min_depth,
                MaxDepth: vp.max_depth,
            })
            .collect();
        self.list.set_viewports(&raw);
    }

    unsafe fn set_scissor_rects(&mut self, rects: &[ScissorRect]) {
        let raw: Vec<Direct3D12::D3D12_RECT> = rects
            .iter()
            .map(|r| Direct3D12::D3D12_RECT {
                left: r.x,
                top: r.y,
                right: r.x + r.width as i32,
                bottom: r.y + r.height as i32,
            })
            .collect();
        self.list.set_scissor_rects(&raw);
    }

    unsafe fn set_blend_color(&mut self, color: Color) {
        self.list.set_blend_factor([color.r as f32, color.g as f32, color.b as f32, color.a as f32]);
    }

    unsafe fn set_stencil_reference(&mut self, reference: u32) {
        self.list.set_stencil_reference(reference);
    }

    unsafe fn set_vertex_buffer(&mut self, slot: u32, buffer: &Buffer, offset: u64) {
        let view = Direct3D12::D3D12_VERTEX_BUFFER_VIEW {
            BufferLocation: buffer.resource.gpu_virtual_address() + offset,
            SizeInBytes: (buffer.size - offset) as u32,
            StrideInBytes: 0,
        };
        self.list.set_vertex_buffers(slot, &[view]);
    }

    unsafe fn set_index_buffer(&mut self, buffer: &Buffer, format: IndexFormat, offset: u64) {
        let view = Direct3D12::D3D12_INDEX_BUFFER_VIEW {
            BufferLocation: buffer.resource.gpu_virtual_address() + offset,
            SizeInBytes: (buffer.size - offset) as u32,
            Format: super::conv::map_index_format(format),
        };
        self.list.set_index_buffer(view);
    }

    unsafe fn set_render_pipeline(&mut self, pipeline: &RenderPipeline) {
        self.list.set_pipeline_state(pipeline.raw);
        self.list.set_primitive_topology(pipeline.topology);
    }

    unsafe fn set_compute_pipeline(&mut self, pipeline: &ComputePipeline) {
        self.list.set_pipeline_state(pipeline.raw);
    }

    unsafe fn set_push_constants(&mut self, layout: &PipelineLayout, range_index: u32, data: &[u8]) {
        let range = layout.push_constant_ranges[range_index as usize];
        let count = range.size / 4;
        self.list.set_graphics_root_signature(layout.root_signature);
        self.list
            .set_graphics_root_32bit_constants(range_index, count, data.as_ptr() as *const _, 0);
    }

    unsafe fn set_shading_rate(&mut self, _rate: gpu_types::ShadingRate) {}

    unsafe fn draw(&mut self, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32) {
        self.list.draw(vertex_count, instance_count, first_vertex, first_instance);
    }

    unsafe fn draw_indexed(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        base_vertex: i32,
        first_instance: u32,
    ) {
        self.list
            .draw_indexed(index_count, instance_count, first_index, base_vertex, first_instance);
    }

    unsafe fn draw_indirect(&mut self, indirect_buffer: &Buffer, offset: u64) {
        self.list.execute_indirect_draw(indirect_buffer.resource, offset, 1, None);
    }

    unsafe fn draw_indexed_indirect(&mut self, indirect_buffer: &Buffer, offset: u64) {
        self.list.execute_indirect_draw_indexed(indirect_buffer.resource, offset, 1, None);
    }

    unsafe fn multi_draw_indirect(
        &mut self,
        indirect_buffer: &Buffer,
        offset: u64,
        max_count: u32,
        count_buffer: Option<(&Buffer, u64)>,
    ) {
        let count = count_buffer.map(|(buf, off)| (buf.resource, off));
        self.list.execute_indirect_draw(indirect_buffer.resource, offset, max_count, count);
    }

    unsafe fn multi_draw_indexed_indirect(
        &mut self,
        indirect_buffer: &Buffer,
        offset: u64,
        max_count: u32,
        count_buffer: Option<(&Buffer, u64)>,
    ) {
        let count = count_buffer.map(|(buf, off)| (buf.resource, off));
        self.list
            .execute_indirect_draw_indexed(indirect_buffer.resource, offset, max_count, count);
    }

    unsafe fn dispatch(&mut self, x: u32, y: u32, z: u32) {
        self.list.dispatch(x, y, z);
    }

    unsafe fn dispatch_indirect(&mut self, indirect_buffer: &Buffer, offset: u64) {
        self.list.execute_indirect_dispatch(indirect_buffer.resource, offset);
    }

    unsafe fn push_debug_group(&mut self, label: &str) {
        self.list.begin_event(label);
    }

    unsafe fn pop_debug_group(&mut self) {
        self.list.end_event();
    }

    unsafe fn insert_debug_marker(&mut self, label: &str) {
        self.list.set_marker(label);
    }
}
