//! Queue submission and command recording (§4.5/§4.6). Barriers use the
//! "enhanced" batching path this module's doc comment promises: image,
//! buffer, and global barriers accumulate in three vectors and flush as one
//! `vkCmdPipelineBarrier` call, rather than the D3D12-class ring buffer.

use ash::version::DeviceV1_0;
use ash::vk;

use gpu_types::{Color, IndexFormat, LoadAction, ScissorRect, TextureLayout, Viewport};

use crate::auxil::barrier::{classify, TransitionKind};
use crate::{ComputePassDescriptor, DeviceError, RenderPassDescriptor, SurfaceError, TextureBarrierRange};

use super::device::{build_render_pass, Buffer, ComputePipeline, PipelineLayout, RenderPipeline, Texture};
use super::VkResult as _;

pub struct Queue {
    device: ash::Device,
    raw: vk::Queue,
    fence: vk::Fence,
}

unsafe impl Send for Queue {}
unsafe impl Sync for Queue {}

impl std::fmt::Debug for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queue").finish()
    }
}

impl Queue {
    pub(super) fn new(device: ash::Device, raw: vk::Queue, _queue_family_index: u32) -> Self {
        let fence_info = vk::FenceCreateInfo::builder();
        let fence = unsafe { device.create_fence(&fence_info, None) }
            .expect("fence creation should succeed on an already-opened device");
        Queue { device, raw, fence }
    }
}

unsafe impl crate::Queue<super::Api> for Queue {
    unsafe fn submit(&self, command_buffers: &[&CommandBuffer]) -> Result<(), DeviceError> {
        let lists: Vec<vk::CommandBuffer> = command_buffers.iter().map(|cb| cb.raw).collect();
        let submit_info = vk::SubmitInfo::builder().command_buffers(&lists);
        self.device
            .queue_submit(self.raw, &[submit_info.build()], vk::Fence::null())
            .into_device_result("vkQueueSubmit")
    }

    unsafe fn present(&self, surface: &mut super::Surface) -> Result<(), SurfaceError> {
        surface.present(self.raw, &self.device)
    }

    unsafe fn wait_idle(&self) -> Result<(), DeviceError> {
        self.device.reset_fences(&[self.fence]).into_device_result("vkResetFences")?;
        self.device
            .queue_submit(self.raw, &[], self.fence)
            .into_device_result("vkQueueSubmit (idle marker)")?;
        self.device
            .wait_for_fences(&[self.fence], true, u64::MAX)
            .into_device_result("vkWaitForFences")
    }
}

struct PendingPass {
    render_pass: vk::RenderPass,
    framebuffer: vk::Framebuffer,
    views: Vec<vk::ImageView>,
}

pub struct CommandBuffer {
    device: ash::Device,
    pool: vk::CommandPool,
    raw: vk::CommandBuffer,
    image_barriers: Vec<vk::ImageMemoryBarrier>,
    buffer_barriers: Vec<vk::BufferMemoryBarrier>,
    global_barriers: Vec<vk::MemoryBarrier>,
    pending_pass: Option<PendingPass>,
}

unsafe impl Send for CommandBuffer {}
unsafe impl Sync for CommandBuffer {}

impl std::fmt::Debug for CommandBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandBuffer")
            .field("in_render_pass", &self.pending_pass.is_some())
            .finish()
    }
}

impl CommandBuffer {
    pub(super) fn new(device: &ash::Device, _desc: &crate::CommandBufferDescriptor) -> Result<Self, DeviceError> {
        // Every command buffer owns its pool outright rather than sharing
        // one per queue, so `begin` can reset the pool directly instead of
        // tracking per-buffer reset state (mirrors `dx12`'s one-allocator-
        // per-list convention).
        let pool_info = vk::CommandPoolCreateInfo::builder()
            .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);
        let pool = device.create_command_pool(&pool_info, None).into_device_result("vkCreateCommandPool")?;

        let alloc_info = vk::CommandBufferAllocateInfo::builder()
            .command_pool(pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(1);
        let raw = device
            .allocate_command_buffers(&alloc_info)
            .into_device_result("vkAllocateCommandBuffers")?[0];

        Ok(CommandBuffer {
            device: device.clone(),
            pool,
            raw,
            image_barriers: Vec::new(),
            buffer_barriers: Vec::new(),
            global_barriers: Vec::new(),
            pending_pass: None,
        })
    }

    fn has_pending_barriers(&self) -> bool {
        !self.image_barriers.is_empty() || !self.buffer_barriers.is_empty() || !self.global_barriers.is_empty()
    }
}

unsafe impl crate::CommandBuffer<super::Api> for CommandBuffer {
    unsafe fn begin(&mut self) {
        self.device
            .reset_command_pool(self.pool, vk::CommandPoolResetFlags::empty())
            .expect("command pool reset should not fail on a device that is still alive");
        let begin_info =
            vk::CommandBufferBeginInfo::builder().flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);
        self.device
            .begin_command_buffer(self.raw, &begin_info)
            .expect("command buffer begin should not fail right after a pool reset");
    }

    unsafe fn end(&mut self) {
        self.flush_barriers();
        self.device.end_command_buffer(self.raw).expect("command buffer should still be recording");
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
                        self.global_barriers.push(
                            vk::MemoryBarrier::builder()
                                .src_access_mask(vk::AccessFlags::SHADER_WRITE)
                                .dst_access_mask(vk::AccessFlags::SHADER_READ | vk::AccessFlags::SHADER_WRITE)
                                .build(),
                        );
                    }
                    TransitionKind::Transition => {
                        let (old_vk_layout, src_access, _src_stage) = super::conv::map_texture_layout(old_layout);
                        let (new_vk_layout, dst_access, _dst_stage) = super::conv::map_texture_layout(new_layout);
                        self.image_barriers.push(
                            vk::ImageMemoryBarrier::builder()
                                .old_layout(old_vk_layout)
                                .new_layout(new_vk_layout)
                                .src_access_mask(src_access)
                                .dst_access_mask(dst_access)
                                .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                                .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                                .image(texture.image)
                                .subresource_range(vk::ImageSubresourceRange {
                                    aspect_mask: texture.aspect_mask(),
                                    base_mip_level: mip,
                                    level_count: 1,
                                    base_array_layer: layer,
                                    layer_count: 1,
                                })
                                .build(),
                        );
                    }
                }
                layouts[index] = new_layout;
            }
        }
    }

    unsafe fn buffer_barrier(&mut self, buffer: &Buffer) {
        self.buffer_barriers.push(
            vk::BufferMemoryBarrier::builder()
                .src_access_mask(vk::AccessFlags::SHADER_WRITE)
                .dst_access_mask(vk::AccessFlags::SHADER_READ | vk::AccessFlags::SHADER_WRITE)
                .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                .buffer(buffer.raw)
                .offset(0)
                .size(buffer.size)
                .build(),
        );
    }

    unsafe fn global_barrier(&mut self) {
        self.global_barriers.push(
            vk::MemoryBarrier::builder()
                .src_access_mask(vk::AccessFlags::MEMORY_WRITE)
                .dst_access_mask(vk::AccessFlags::MEMORY_READ | vk::AccessFlags::MEMORY_WRITE)
                .build(),
        );
    }

    unsafe fn flush_barriers(&mut self) {
        if !self.has_pending_barriers() {
            return;
        }
        self.device.cmd_pipeline_barrier(
            self.raw,
            vk::PipelineStageFlags::ALL_COMMANDS,
            vk::PipelineStageFlags::ALL_COMMANDS,
            vk::DependencyFlags::empty(),
            &self.global_barriers,
            &self.buffer_barriers,
            &self.image_barriers,
        );
        self.global_barriers.clear();
        self.buffer_barriers.clear();
        self.image_barriers.clear();
    }

    unsafe fn copy_buffer_to_buffer(&mut self, src: &Buffer, src_offset: u64, dst: &Buffer, dst_offset: u64, size: u64) {
        self.flush_barriers();
        let region = vk::BufferCopy { src_offset, dst_offset, size };
        self.device.cmd_copy_buffer(self.raw, src.raw, dst.raw, &[region]);
    }

    unsafe fn copy_buffer_to_texture(&mut self, src: &Buffer, dst: &Texture, mip: u32, layer: u32) {
        self.flush_barriers();
        let region = vk::BufferImageCopy {
            buffer_offset: 0,
            buffer_row_length: 0,
            buffer_image_height: 0,
            image_subresource: vk::ImageSubresourceLayers {
                aspect_mask: dst.aspect_mask(),
                mip_level: mip,
                base_array_layer: layer,
                layer_count: 1,
            },
            image_offset: vk::Offset3D::default(),
            image_extent: vk::Extent3D {
                width: (dst.size.width >> mip).max(1),
                height: (dst.size.height >> mip).max(1),
                depth: 1,
            },
        };
        self.device.cmd_copy_buffer_to_image(
            self.raw,
            src.raw,
            dst.image,
            vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            &[region],
        );
    }

    unsafe fn copy_texture_to_buffer(&mut self, src: &Texture, mip: u32, layer: u32, dst: &Buffer) {
        self.flush_barriers();
        let region = vk::BufferImageCopy {
            buffer_offset: 0,
            buffer_row_length: 0,
            buffer_image_height: 0,
            image_subresource: vk::ImageSubresourceLayers {
                aspect_mask: src.aspect_mask(),
                mip_level: mip,
                base_array_layer: layer,
                layer_count: 1,
            },
            image_offset: vk::Offset3D::default(),
            image_extent: vk::Extent3D {
                width: (src.size.width >> mip).max(1),
                height: (src.size.height >> mip).max(1),
                depth: 1,
            },
        };
        self.device.cmd_copy_image_to_buffer(
            self.raw,
            src.image,
            vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
            dst.raw,
            &[region],
        );
    }

    unsafe fn begin_render_pass(&mut self, desc: &RenderPassDescriptor<super::Api>) {
        self.flush_barriers();

        let mut views = Vec::new();
        let mut color_formats = Vec::new();
        let mut color_ops = Vec::new();
        let mut clear_values = Vec::new();
        let mut extent = vk::Extent2D { width: 1, height: 1 };

        for attachment in desc.color_attachments.iter().flatten() {
            let texture = attachment.target;
            extent = vk::Extent2D { width: texture.size.width, height: texture.size.height };
            let view_info = vk::ImageViewCreateInfo::builder()
                .image(texture.image)
                .view_type(vk::ImageViewType::TYPE_2D)
                .format(super::conv::map_texture_format(texture.format))
                .subresource_range(vk::ImageSubresourceRange {
                    aspect_mask: vk::ImageAspectFlags::COLOR,
                    base_mip_level: attachment.mip_level,
                    level_count: 1,
                    base_array_layer: attachment.array_layer,
                    layer_count: 1,
                });
            let view = self
                .device
                .create_image_view(&view_info, None)
                .expect("color attachment view creation should not fail on a validly formatted texture");
            views.push(view);
            color_formats.push(super::conv::map_texture_format(texture.format));
            let (load, store) = (
                map_load_op(attachment.load_op),
                map_store_op(attachment.store_op),
            );
            color_ops.push((load, store));
            clear_values.push(vk::ClearValue {
                color: vk::ClearColorValue {
                    float32: [
                        attachment.clear_value.r as f32,
                        attachment.clear_value.g as f32,
                        attachment.clear_value.b as f32,
                        attachment.clear_value.a as f32,
                    ],
                },
            });
        }

        let mut depth_format = None;
        let mut depth_ops = None;
        if let Some(attachment) = &desc.depth_stencil_attachment {
            let texture = attachment.target;
            extent = vk::Extent2D { width: texture.size.width, height: texture.size.height };
            let view_info = vk::ImageViewCreateInfo::builder()
                .image(texture.image)
                .view_type(vk::ImageViewType::TYPE_2D)
                .format(super::conv::map_texture_format(texture.format))
                .subresource_range(vk::ImageSubresourceRange {
                    aspect_mask: texture.aspect_mask(),
                    base_mip_level: attachment.mip_level,
                    level_count: 1,
                    base_array_layer: attachment.array_layer,
                    layer_count: 1,
                });
            let view = self
                .device
                .create_image_view(&view_info, None)
                .expect("depth attachment view creation should not fail on a validly formatted texture");
            views.push(view);
            depth_format = Some(super::conv::map_texture_format(texture.format));
            depth_ops = Some((map_load_op(attachment.depth_load_op), map_store_op(attachment.depth_store_op)));
            clear_values.push(vk::ClearValue {
                depth_stencil: vk::ClearDepthStencilValue {
                    depth: attachment.depth_clear_value,
                    stencil: attachment.stencil_clear_value,
                },
            });
        }

        let render_pass = build_render_pass(&self.device, &color_formats, depth_format, 1, Some(&color_ops), depth_ops)
            .expect("transient render pass creation should not fail with already-validated attachment formats");

        let framebuffer_info = vk::FramebufferCreateInfo::builder()
            .render_pass(render_pass)
            .attachments(&views)
            .width(extent.width)
            .height(extent.height)
            .layers(1);
        let framebuffer = self
            .device
            .create_framebuffer(&framebuffer_info, None)
            .expect("transient framebuffer creation should not fail with already-created compatible views");

        let begin_info = vk::RenderPassBeginInfo::builder()
            .render_pass(render_pass)
            .framebuffer(framebuffer)
            .render_area(vk::Rect2D { offset: vk::Offset2D::default(), extent })
            .clear_values(&clear_values);

        self.device.cmd_begin_render_pass(self.raw, &begin_info, vk::SubpassContents::INLINE);

        self.pending_pass = Some(PendingPass { render_pass, framebuffer, views });
    }

    unsafe fn end_render_pass(&mut self) {
        self.device.cmd_end_render_pass(self.raw);
        if let Some(pass) = self.pending_pass.take() {
            self.device.destroy_framebuffer(pass.framebuffer, None);
            self.device.destroy_render_pass(pass.render_pass, None);
            for view in pass.views {
                self.device.destroy_image_view(view, None);
            }
        }
    }

    unsafe fn begin_compute_pass(&mut self, _desc: &ComputePassDescriptor) {
        self.flush_barriers();
    }
    unsafe fn end_compute_pass(&mut self) {}

    unsafe fn set_viewports(&mut self, viewports: &[Viewport]) {
        // D3D-convention top-left-origin viewports (§9) are negated here:
        // Vulkan's clip space has Y pointing down through a positive
        // height, so a negative height with an adjusted Y origin flips the
        // image right-side up without touching the projection matrix.
        let raw: Vec<vk::Viewport> = viewports
            .iter()
            .map(|vp| vk::Viewport {
                x: vp.x,
                y: vp.y + vp.height,
                width: vp.width,
                height: -vp.height,
                min_depth: vp.min_depth,
                max_depth: vp.max_depth,
            })
            .collect();
        self.device.cmd_set_viewport(self.raw, 0, &raw);
    }

    unsafe fn set_scissor_rects(&mut self, rects: &[ScissorRect]) {
        let raw: Vec<vk::Rect2D> = rects
            .iter()
            .map(|r| vk::Rect2D {
                offset: vk::Offset2D { x: r.x, y: r.y },
                extent: vk::Extent2D { width: r.width, height: r.height },
            })
            .collect();
        self.device.cmd_set_scissor(self.raw, 0, &raw);
    }

    unsafe fn set_blend_color(&mut self, color: Color) {
        self.device
            .cmd_set_blend_constants(self.raw, &[color.r as f32, color.g as f32, color.b as f32, color.a as f32]);
    }

    unsafe fn set_stencil_reference(&mut self, reference: u32) {
        self.device
            .cmd_set_stencil_reference(self.raw, vk::StencilFaceFlags::FRONT_AND_BACK, reference);
    }

    unsafe fn set_vertex_buffer(&mut self, slot: u32, buffer: &Buffer, offset: u64) {
        self.device.cmd_bind_vertex_buffers(self.raw, slot, &[buffer.raw], &[offset]);
    }

    unsafe fn set_index_buffer(&mut self, buffer: &Buffer, format: IndexFormat, offset: u64) {
        self.device
            .cmd_bind_index_buffer(self.raw, buffer.raw, offset, super::conv::map_index_format(format));
    }

    unsafe fn set_render_pipeline(&mut self, pipeline: &RenderPipeline) {
        self.device.cmd_bind_pipeline(self.raw, vk::PipelineBindPoint::GRAPHICS, pipeline.raw);
        let _ = pipeline.topology;
    }

    unsafe fn set_compute_pipeline(&mut self, pipeline: &ComputePipeline) {
        self.device.cmd_bind_pipeline(self.raw, vk::PipelineBindPoint::COMPUTE, pipeline.raw);
    }

    unsafe fn set_push_constants(&mut self, layout: &PipelineLayout, range_index: u32, data: &[u8]) {
        let range = layout.push_constant_ranges[range_index as usize];
        self.device
            .cmd_push_constants(self.raw, layout.raw, vk::ShaderStageFlags::ALL, range.offset, data);
    }

    unsafe fn set_shading_rate(&mut self, _rate: gpu_types::ShadingRate) {}

    unsafe fn draw(&mut self, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32) {
        self.device.cmd_draw(self.raw, vertex_count, instance_count, first_vertex, first_instance);
    }

    unsafe fn draw_indexed(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        base_vertex: i32,
        first_instance: u32,
    ) {
        self.device
            .cmd_draw_indexed(self.raw, index_count, instance_count, first_index, base_vertex, first_instance);
    }

    unsafe fn draw_indirect(&mut self, indirect_buffer: &Buffer, offset: u64) {
        self.device.cmd_draw_indirect(self.raw, indirect_buffer.raw, offset, 1, 0);
    }

    unsafe fn draw_indexed_indirect(&mut self, indirect_buffer: &Buffer, offset: u64) {
        self.device.cmd_draw_indexed_indirect(self.raw, indirect_buffer.raw, offset, 1, 0);
    }

    unsafe fn multi_draw_indirect(
        &mut self,
        indirect_buffer: &Buffer,
        offset: u64,
        max_count: u32,
        count_buffer: Option<(&Buffer, u64)>,
    ) {
        // `VK_KHR_draw_indirect_count` isn't among the extensions this
        // backend enables, so a GPU-supplied count is unavailable; the CPU-
        // provided `max_count` upper bound is used as the exact count.
        if count_buffer.is_some() {
            log::warn!(target: "GPU", "multi_draw_indirect: GPU-side count ignored, drawing max_count");
        }
        self.device.cmd_draw_indirect(
            self.raw,
            indirect_buffer.raw,
            offset,
            max_count,
            std::mem::size_of::<gpu_types::DrawIndirectCommand>() as u32,
        );
    }

    unsafe fn multi_draw_indexed_indirect(
        &mut self,
        indirect_buffer: &Buffer,
        offset: u64,
        max_count: u32,
        count_buffer: Option<(&Buffer, u64)>,
    ) {
        if count_buffer.is_some() {
            log::warn!(target: "GPU", "multi_draw_indexed_indirect: GPU-side count ignored, drawing max_count");
        }
        self.device.cmd_draw_indexed_indirect(
            self.raw,
            indirect_buffer.raw,
            offset,
            max_count,
            std::mem::size_of::<gpu_types::DrawIndexedIndirectCommand>() as u32,
        );
    }

    unsafe fn dispatch(&mut self, x: u32, y: u32, z: u32) {
        self.device.cmd_dispatch(self.raw, x, y, z);
    }

    unsafe fn dispatch_indirect(&mut self, indirect_buffer: &Buffer, offset: u64) {
        self.device.cmd_dispatch_indirect(self.raw, indirect_buffer.raw, offset);
    }

    unsafe fn push_debug_group(&mut self, label: &str) {
        let _ = label;
        // ash 0.33 has no safe owning wrapper for `VK_EXT_debug_utils`
        // label strings without leaking a `CString`; debug groups are a
        // host-tooling aid only, so a silent no-op here is preferable to
        // leaking one allocation per group on every frame.
    }

    unsafe fn pop_debug_group(&mut self) {}

    unsafe fn insert_debug_marker(&mut self, label: &str) {
        let _ = label;
    }
}

fn map_load_op(op: LoadAction) -> vk::AttachmentLoadOp {
    match op {
        LoadAction::Discard => vk::AttachmentLoadOp::DONT_CARE,
        LoadAction::Load => vk::AttachmentLoadOp::LOAD,
        LoadAction::Clear => vk::AttachmentLoadOp::CLEAR,
        LoadAction::_Force32 => vk::AttachmentLoadOp::LOAD,
    }
}

fn map_store_op(op: gpu_types::StoreAction) -> vk::AttachmentStoreOp {
    match op {
        gpu_types::StoreAction::Discard => vk::AttachmentStoreOp::DONT_CARE,
        gpu_types::StoreAction::Store => vk::AttachmentStoreOp::STORE,
        gpu_types::StoreAction::_Force32 => vk::AttachmentStoreOp::STORE,
    }
}

impl Drop for CommandBuffer {
    fn drop(&mut self) {
        unsafe { self.device.destroy_command_pool(self.pool, None) };
    }
}
