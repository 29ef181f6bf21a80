//! Render- and compute-pass encoders (§4.7, §4.8). Both borrow the
//! recording [`CommandBuffer`] mutably for the pass's lifetime; `end`
//! consumes the encoder and gives the borrow back.

use gpu_hal::{Api, CommandBuffer as HalCommandBuffer};
use gpu_types::{
    Color, FormatAspects, IndexFormat, LoadAction, ShadingRate, StoreAction, TextureLayout,
    Viewport,
};

use crate::command::CommandBuffer;
use crate::error::GpuError;
use crate::resources::{Buffer, ComputePipeline, RenderPipeline, Texture};

#[derive(Clone)]
pub struct ColorAttachment<'a, A: Api> {
    pub target: &'a Texture<A>,
    pub mip_level: u32,
    pub array_layer: u32,
    /// `None` takes the §4.7 default of `Load`.
    pub load_op: Option<LoadAction>,
    /// `None` takes the §4.7 default of `Store`.
    pub store_op: Option<StoreAction>,
    pub clear_value: Color,
    pub resolve_target: Option<&'a Texture<A>>,
}

#[derive(Clone)]
pub struct DepthStencilAttachment<'a, A: Api> {
    pub target: &'a Texture<A>,
    pub mip_level: u32,
    pub array_layer: u32,
    /// `None` takes the §4.7 default of `Clear`.
    pub depth_load_op: Option<LoadAction>,
    /// `None` takes the §4.7 default of `Discard`.
    pub depth_store_op: Option<StoreAction>,
    pub depth_clear_value: f32,
    pub depth_read_only: bool,
    pub stencil_load_op: Option<LoadAction>,
    pub stencil_store_op: Option<StoreAction>,
    pub stencil_clear_value: u32,
    pub stencil_read_only: bool,
}

#[derive(Clone)]
pub struct ShadingRateAttachment<'a, A: Api> {
    pub target: &'a Texture<A>,
    pub tile_size: u32,
}

#[derive(Clone)]
pub struct RenderPassDescriptor<'a, A: Api> {
    pub label: Option<&'a str>,
    pub color_attachments: &'a [Option<ColorAttachment<'a, A>>],
    pub depth_stencil_attachment: Option<DepthStencilAttachment<'a, A>>,
    pub shading_rate_attachment: Option<ShadingRateAttachment<'a, A>>,
}

impl<'a, A: Api> Default for RenderPassDescriptor<'a, A> {
    fn default() -> Self {
        RenderPassDescriptor {
            label: None,
            color_attachments: &[],
            depth_stencil_attachment: None,
            shading_rate_attachment: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ComputePassDescriptor<'a> {
    pub label: Option<&'a str>,
}

fn mip_extent(full: u32, mip: u32) -> u32 {
    (full >> mip).max(1)
}

/// §4.7 steps 1-5: computed once at `begin`, shared by the viewport default
/// and the hal-level descriptor this builds.
struct PassGeometry {
    width: u32,
    height: u32,
    layer_count: u32,
}

impl PassGeometry {
    fn fold(&mut self, width: u32, height: u32, layers: u32) {
        self.width = self.width.min(width);
        self.height = self.height.min(height);
        self.layer_count = self.layer_count.min(layers);
    }
}

pub struct RenderPassEncoder<'a, A: Api> {
    cmd: &'a mut CommandBuffer<A>,
}

impl<'a, A: Api> RenderPassEncoder<'a, A> {
    pub(crate) fn begin(cmd: &'a mut CommandBuffer<A>, desc: &RenderPassDescriptor<'a, A>) -> Self {
        let mut geometry = PassGeometry { width: u32::MAX, height: u32::MAX, layer_count: u32::MAX };

        for attachment in desc.color_attachments.iter().flatten() {
            geometry.fold(
                mip_extent(attachment.target.width(), attachment.mip_level),
                mip_extent(attachment.target.height(), attachment.mip_level),
                attachment.target.depth_or_array_layers(),
            );
        }
        if let Some(ds) = &desc.depth_stencil_attachment {
            geometry.fold(
                mip_extent(ds.target.width(), ds.mip_level),
                mip_extent(ds.target.height(), ds.mip_level),
                ds.target.depth_or_array_layers(),
            );
        }
        if let Some(sr) = &desc.shading_rate_attachment {
            geometry.fold(sr.target.width(), sr.target.height(), sr.target.depth_or_array_layers());
        }

        // Step 2: barrier each attachment to its pass-use layout.
        let whole = |t: &Texture<A>| gpu_hal::TextureBarrierRange {
            base_mip: 0,
            level_count: t.mip_level_count(),
            base_layer: 0,
            layer_count: t.num_subresources() / t.mip_level_count().max(1),
            aspects: FormatAspects::COLOR,
        };
        for attachment in desc.color_attachments.iter().flatten() {
            unsafe { cmd.raw.texture_barrier(attachment.target.raw(), TextureLayout::RenderTarget, whole(attachment.target)) };
            if let Some(resolve) = attachment.resolve_target {
                unsafe { cmd.raw.texture_barrier(resolve.raw(), TextureLayout::RenderTarget, whole(resolve)) };
            }
        }
        if let Some(ds) = &desc.depth_stencil_attachment {
            let layout = if ds.depth_read_only { TextureLayout::DepthRead } else { TextureLayout::DepthWrite };
            let range = gpu_hal::TextureBarrierRange {
                base_mip: 0,
                level_count: ds.target.mip_level_count(),
                base_layer: 0,
                layer_count: ds.target.num_subresources() / ds.target.mip_level_count().max(1),
                aspects: FormatAspects::DEPTH | FormatAspects::STENCIL,
            };
            unsafe { cmd.raw.texture_barrier(ds.target.raw(), layout, range) };
        }
        if let Some(sr) = &desc.shading_rate_attachment {
            unsafe { cmd.raw.texture_barrier(sr.target.raw(), TextureLayout::ShadingRateSurface, whole(sr.target)) };
        }
        unsafe { cmd.raw.flush_barriers() };

        // Step 3: hal-level descriptor with §4.7 defaults applied.
        let hal_colors: arrayvec::ArrayVec<Option<gpu_hal::ColorAttachment<A>>, { gpu_hal::MAX_COLOR_TARGETS }> =
            desc.color_attachments
                .iter()
                .map(|maybe| {
                    maybe.as_ref().map(|a| gpu_hal::ColorAttachment {
                        target: a.target.raw(),
                        mip_level: a.mip_level,
                        array_layer: a.array_layer,
                        load_op: a.load_op.unwrap_or(LoadAction::Load),
                        store_op: a.store_op.unwrap_or(StoreAction::Store),
                        clear_value: a.clear_value,
                        resolve_target: a.resolve_target.map(Texture::raw),
                    })
                })
                .collect();
        let hal_depth_stencil = desc.depth_stencil_attachment.as_ref().map(|ds| gpu_hal::DepthStencilAttachment {
            target: ds.target.raw(),
            mip_level: ds.mip_level,
            array_layer: ds.array_layer,
            depth_load_op: ds.depth_load_op.unwrap_or(LoadAction::Clear),
            depth_store_op: ds.depth_store_op.unwrap_or(StoreAction::Discard),
            depth_clear_value: ds.depth_clear_value,
            depth_read_only: ds.depth_read_only,
            stencil_load_op: ds.stencil_load_op.unwrap_or(LoadAction::Clear),
            stencil_store_op: ds.stencil_store_op.unwrap_or(StoreAction::Discard),
            stencil_clear_value: ds.stencil_clear_value,
            stencil_read_only: ds.stencil_read_only,
        });
        let hal_shading_rate = desc
            .shading_rate_attachment
            .as_ref()
            .map(|sr| gpu_hal::ShadingRateAttachment { target: sr.target.raw(), tile_size: sr.tile_size });

        let hal_desc = gpu_hal::RenderPassDescriptor {
            label: desc.label,
            color_attachments: &hal_colors,
            depth_stencil_attachment: hal_depth_stencil,
            shading_rate_attachment: hal_shading_rate,
        };

        // Step 4: open the pass.
        unsafe { cmd.raw.begin_render_pass(&hal_desc) };

        // Step 5: default viewport, D3D top-left convention; the backend
        // negates y/height itself on the Vulkan-class path (§4.7).
        let width = if geometry.width == u32::MAX { 0 } else { geometry.width };
        let height = if geometry.height == u32::MAX { 0 } else { geometry.height };
        unsafe {
            cmd.raw.set_viewports(&[Viewport { x: 0.0, y: 0.0, width: width as f32, height: height as f32, min_depth: 0.0, max_depth: 1.0 }]);
        }

        RenderPassEncoder { cmd }
    }

    pub fn set_viewports(&mut self, viewports: &[Viewport]) {
        unsafe { self.cmd.raw.set_viewports(viewports) };
    }

    pub fn set_scissor_rects(&mut self, rects: &[gpu_types::ScissorRect]) {
        unsafe { self.cmd.raw.set_scissor_rects(rects) };
    }

    pub fn set_blend_color(&mut self, color: Color) {
        unsafe { self.cmd.raw.set_blend_color(color) };
    }

    pub fn set_stencil_reference(&mut self, reference: u32) {
        unsafe { self.cmd.raw.set_stencil_reference(reference) };
    }

    pub fn set_vertex_buffer(&mut self, slot: u32, buffer: &Buffer<A>, offset: u64) {
        unsafe { self.cmd.raw.set_vertex_buffer(slot, buffer.raw(), offset) };
    }

    pub fn set_index_buffer(&mut self, buffer: &Buffer<A>, format: IndexFormat, offset: u64) {
        unsafe { self.cmd.raw.set_index_buffer(buffer.raw(), format, offset) };
    }

    pub fn set_pipeline(&mut self, pipeline: &RenderPipeline<A>) {
        unsafe { self.cmd.raw.set_render_pipeline(pipeline.raw()) };
        self.cmd.bound_layout = Some(pipeline.layout().clone());
    }

    pub fn set_push_constants(&mut self, range_index: u32, data: &[u8]) -> Result<(), GpuError> {
        self.cmd.set_push_constants_checked(range_index, data)
    }

    pub fn set_shading_rate(&mut self, rate: ShadingRate) {
        unsafe { self.cmd.raw.set_shading_rate(rate) };
    }

    pub fn draw(&mut self, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32) {
        unsafe { self.cmd.raw.draw(vertex_count, instance_count, first_vertex, first_instance) };
    }

    pub fn draw_indexed(&mut self, index_count: u32, instance_count: u32, first_index: u32, base_vertex: i32, first_instance: u32) {
        unsafe { self.cmd.raw.draw_indexed(index_count, instance_count, first_index, base_vertex, first_instance) };
    }

    pub fn draw_indirect(&mut self, indirect_buffer: &Buffer<A>, offset: u64) {
        unsafe { self.cmd.raw.draw_indirect(indirect_buffer.raw(), offset) };
    }

    pub fn draw_indexed_indirect(&mut self, indirect_buffer: &Buffer<A>, offset: u64) {
        unsafe { self.cmd.raw.draw_indexed_indirect(indirect_buffer.raw(), offset) };
    }

    pub fn multi_draw_indirect(&mut self, indirect_buffer: &Buffer<A>, offset: u64, max_count: u32, count_buffer: Option<(&Buffer<A>, u64)>) {
        let count = count_buffer.map(|(b, o)| (b.raw(), o));
        unsafe { self.cmd.raw.multi_draw_indirect(indirect_buffer.raw(), offset, max_count, count) };
    }

    pub fn multi_draw_indexed_indirect(&mut self, indirect_buffer: &Buffer<A>, offset: u64, max_count: u32, count_buffer: Option<(&Buffer<A>, u64)>) {
        let count = count_buffer.map(|(b, o)| (b.raw(), o));
        unsafe { self.cmd.raw.multi_draw_indexed_indirect(indirect_buffer.raw(), offset, max_count, count) };
    }

    /// §4.7 `end`: closes the pass and releases the pipeline/layout hold.
    pub fn end(self) {
        unsafe { self.cmd.raw.end_render_pass() };
        self.cmd.bound_layout = None;
        self.cmd.close_pass();
    }
}

pub struct ComputePassEncoder<'a, A: Api> {
    cmd: &'a mut CommandBuffer<A>,
}

impl<'a, A: Api> ComputePassEncoder<'a, A> {
    pub(crate) fn begin(cmd: &'a mut CommandBuffer<A>, desc: &ComputePassDescriptor<'a>) -> Self {
        unsafe { cmd.raw.begin_compute_pass(&gpu_hal::ComputePassDescriptor { label: desc.label }) };
        ComputePassEncoder { cmd }
    }

    pub fn set_pipeline(&mut self, pipeline: &ComputePipeline<A>) {
        unsafe { self.cmd.raw.set_compute_pipeline(pipeline.raw()) };
        self.cmd.bound_layout = Some(pipeline.layout().clone());
    }

    pub fn set_push_constants(&mut self, range_index: u32, data: &[u8]) -> Result<(), GpuError> {
        self.cmd.set_push_constants_checked(range_index, data)
    }

    /// Dispatch-indirect's command signature (stride = three `u32`s, §4.8)
    /// is cached device-side by the backend; nothing to thread through here.
    pub fn dispatch(&mut self, x: u32, y: u32, z: u32) {
        unsafe { self.cmd.raw.dispatch(x, y, z) };
    }

    pub fn dispatch_indirect(&mut self, indirect_buffer: &Buffer<A>, offset: u64) {
        unsafe { self.cmd.raw.dispatch_indirect(indirect_buffer.raw(), offset) };
    }

    pub fn end(self) {
        unsafe { self.cmd.raw.end_compute_pass() };
        self.cmd.bound_layout = None;
        self.cmd.close_pass();
    }
}
