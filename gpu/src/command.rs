//! `CommandBuffer` — records commands and tracks barriers (§3, §4.6).
//! Also the host both pass encoders borrow from, mirroring the spec's
//! single-object-does-recording model.

use gpu_hal::{Api, CommandBuffer as HalCommandBuffer};
use gpu_types::{CommandQueueType, FormatAspects, TextureLayout};

use crate::error::GpuError;
use crate::pass::{ComputePassDescriptor, ComputePassEncoder, RenderPassDescriptor, RenderPassEncoder};
use crate::resources::{Buffer, PipelineLayout, Texture};
use crate::surface::Surface;

pub struct CommandBuffer<A: Api> {
    pub(crate) raw: A::CommandBuffer,
    ty: CommandQueueType,
    /// Surfaces `acquire_surface_texture` marked for presentation on
    /// submit (§4.6), paired with the backbuffer texture so `finish` can
    /// transition it to `Present` before ending the recording.
    pending_present: Vec<(Surface<A>, Texture<A>)>,
    pub(crate) bound_layout: Option<PipelineLayout<A>>,
    debug_group_depth: u32,
    pass_open: bool,
}

impl<A: Api> CommandBuffer<A> {
    pub(crate) fn new(raw: A::CommandBuffer, ty: CommandQueueType) -> Self {
        CommandBuffer {
            raw,
            ty,
            pending_present: Vec::new(),
            bound_layout: None,
            debug_group_depth: 0,
            pass_open: false,
        }
    }

    pub fn queue_type(&self) -> CommandQueueType {
        self.ty
    }

    pub(crate) fn raw_ref(&self) -> &A::CommandBuffer {
        &self.raw
    }

    pub(crate) fn into_raw(self) -> A::CommandBuffer {
        self.raw
    }

    pub fn texture_barrier(&mut self, texture: &Texture<A>, new_layout: TextureLayout, range: TextureBarrierRange) {
        if self.ty == CommandQueueType::Compute
            && !gpu_hal::auxil::barrier::is_valid_on_compute_queue(new_layout)
        {
            debug_assert!(
                false,
                "layout {new_layout:?} is not valid on a compute queue (§4.6)"
            );
        }
        unsafe {
            self.raw.texture_barrier(
                texture.raw(),
                new_layout,
                gpu_hal::TextureBarrierRange {
                    base_mip: range.base_mip,
                    level_count: range.level_count,
                    base_layer: range.base_layer,
                    layer_count: range.layer_count,
                    aspects: range.aspects,
                },
            );
        }
    }

    pub fn buffer_barrier(&mut self, buffer: &Buffer<A>) {
        unsafe { self.raw.buffer_barrier(buffer.raw()) };
    }

    pub fn global_barrier(&mut self) {
        unsafe { self.raw.global_barrier() };
    }

    pub fn flush_barriers(&mut self) {
        unsafe { self.raw.flush_barriers() };
    }

    pub fn copy_buffer_to_buffer(&mut self, src: &Buffer<A>, src_offset: u64, dst: &Buffer<A>, dst_offset: u64, size: u64) {
        unsafe { self.raw.copy_buffer_to_buffer(src.raw(), src_offset, dst.raw(), dst_offset, size) };
    }

    pub fn copy_buffer_to_texture(&mut self, src: &Buffer<A>, dst: &Texture<A>, mip: u32, layer: u32) {
        unsafe { self.raw.copy_buffer_to_texture(src.raw(), dst.raw(), mip, layer) };
    }

    pub fn copy_texture_to_buffer(&mut self, src: &Texture<A>, mip: u32, layer: u32, dst: &Buffer<A>) {
        unsafe { self.raw.copy_texture_to_buffer(src.raw(), mip, layer, dst.raw()) };
    }

    pub fn begin_render_pass<'a>(&'a mut self, desc: &RenderPassDescriptor<'a, A>) -> RenderPassEncoder<'a, A> {
        debug_assert!(!self.pass_open, "a pass is already open on this command buffer (§4.6)");
        self.pass_open = true;
        RenderPassEncoder::begin(self, desc)
    }

    pub(crate) fn close_pass(&mut self) {
        self.pass_open = false;
    }

    pub fn begin_compute_pass<'a>(&'a mut self, desc: &ComputePassDescriptor<'a>) -> ComputePassEncoder<'a, A> {
        debug_assert!(!self.pass_open, "a pass is already open on this command buffer (§4.6)");
        self.pass_open = true;
        ComputePassEncoder::begin(self, desc)
    }

    /// §4.6 `acquireSurfaceTexture`: waits on the surface's acquire
    /// primitive (bounded by a 1s timeout, enforced one layer down by the
    /// backend), marks the surface for presentation on this buffer's
    /// submit, and returns the backing texture.
    pub fn acquire_surface_texture(
        &mut self,
        surface: &Surface<A>,
        timeout_ms: Option<u32>,
    ) -> (gpu_types::AcquireSurfaceResult, Option<Texture<A>>) {
        let (result, texture) = surface.acquire_texture(timeout_ms);
        if let Some(texture) = &texture {
            self.pending_present.push((surface.clone(), texture.clone()));
        }
        (result, texture)
    }

    pub fn push_debug_group(&mut self, label: &str) {
        unsafe { self.raw.push_debug_group(label) };
        self.debug_group_depth += 1;
    }

    pub fn pop_debug_group(&mut self) {
        if self.debug_group_depth == 0 {
            log::warn!(target: "GPU", "pop_debug_group with no open group");
            return;
        }
        unsafe { self.raw.pop_debug_group() };
        self.debug_group_depth -= 1;
    }

    pub fn insert_debug_marker(&mut self, label: &str) {
        unsafe { self.raw.insert_debug_marker(label) };
    }

    pub(crate) fn set_push_constants_checked(&mut self, range_index: u32, data: &[u8]) -> Result<(), GpuError> {
        let layout = self
            .bound_layout
            .clone()
            .ok_or_else(|| GpuError::InvalidOperation("set_push_constants with no bound pipeline".into()))?;
        let range = layout
            .push_constant_ranges()
            .get(range_index as usize)
            .ok_or_else(|| GpuError::InvalidOperation("range_index out of bounds for the bound layout".into()))?;
        if data.len() as u32 != range.size {
            return Err(GpuError::InvalidOperation("push constant data length doesn't match the range size".into()));
        }
        unsafe { self.raw.set_push_constants(layout.raw(), range_index, data) };
        Ok(())
    }

    /// §4.5 `submit` calling `end()` on each buffer: emits the trailing
    /// `→Present` transition for every surface this buffer acquired from,
    /// flushes barriers, asserts any debug group left open gets closed,
    /// and ends recording. Returns the surfaces to present, in order.
    pub(crate) fn finish(&mut self) -> Vec<(Surface<A>, Texture<A>)> {
        let pending = std::mem::take(&mut self.pending_present);
        for (_, texture) in &pending {
            let range = gpu_hal::TextureBarrierRange {
                base_mip: 0,
                level_count: texture.mip_level_count(),
                base_layer: 0,
                layer_count: texture.num_subresources() / texture.mip_level_count().max(1),
                aspects: FormatAspects::COLOR,
            };
            unsafe { self.raw.texture_barrier(texture.raw(), TextureLayout::Present, range) };
        }
        unsafe { self.raw.flush_barriers() };
        while self.debug_group_depth > 0 {
            unsafe { self.raw.pop_debug_group() };
            self.debug_group_depth -= 1;
        }
        unsafe { self.raw.end() };
        self.bound_layout = None;
        pending
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TextureBarrierRange {
    pub base_mip: u32,
    pub level_count: u32,
    pub base_layer: u32,
    pub layer_count: u32,
    pub aspects: FormatAspects,
}

impl TextureBarrierRange {
    pub fn whole(texture: &Texture<impl Api>) -> Self {
        TextureBarrierRange {
            base_mip: 0,
            level_count: texture.mip_level_count(),
            base_layer: 0,
            layer_count: texture.num_subresources() / texture.mip_level_count().max(1),
            aspects: if gpu_types::is_depth_stencil(texture.format()) {
                FormatAspects::DEPTH | FormatAspects::STENCIL
            } else {
                FormatAspects::COLOR
            },
        }
    }
}
