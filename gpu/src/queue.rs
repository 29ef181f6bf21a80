//! Per-type command submission (§4.5 "Command queue"). One [`Queue<A>`]
//! exists per `CommandQueueType` the adapter exposes; command buffers are
//! pooled and recycled rather than recreated every frame.

use parking_lot::Mutex;

use gpu_hal::{Api, CommandBufferDescriptor, Device as _, Queue as _};
use gpu_types::CommandQueueType;

use crate::command::CommandBuffer;
use crate::device::Device;
use crate::error::GpuError;

pub struct Queue<A: Api> {
    pub(crate) raw: A::Queue,
    ty: CommandQueueType,
    /// Idle, previously-`end()`ed native command buffers ready for reuse.
    /// §4.5: "command-buffer recycling".
    pool: Mutex<Vec<A::CommandBuffer>>,
}

impl<A: Api> Queue<A> {
    pub(crate) fn new(raw: A::Queue, ty: CommandQueueType) -> Self {
        Queue { raw, ty, pool: Mutex::new(Vec::new()) }
    }

    pub fn queue_type(&self) -> CommandQueueType {
        self.ty
    }

    /// §4.5 `acquireCommandBuffer`: returns the next buffer from the
    /// per-queue pool (allocated on demand), resets it, and begins
    /// recording.
    pub fn acquire_command_buffer(
        &self,
        device: &Device<A>,
        label: Option<&str>,
    ) -> Result<CommandBuffer<A>, GpuError> {
        let pooled = self.pool.lock().pop();
        let mut raw = match pooled {
            Some(raw) => raw,
            None => unsafe { device.raw().create_command_buffer(&CommandBufferDescriptor { label })? },
        };
        unsafe { raw.begin() };
        Ok(CommandBuffer::new(raw, self.ty))
    }

    /// §4.5 `submit`: ends every buffer (flushing pending barriers and the
    /// trailing `→Present` transition for any acquired surface), submits
    /// them to the native queue in array order, then presents every
    /// surface the submitted buffers acquired from, in the order they were
    /// acquired. On `Outdated`/`Suboptimal` the surface reconfigures
    /// in-place (§4.10) rather than failing the whole submit.
    pub fn submit(&self, device: &Device<A>, mut buffers: Vec<CommandBuffer<A>>) -> Result<(), GpuError> {
        profiling::scope!("Queue::submit");
        let mut pending_presents = Vec::new();
        for cmd in &mut buffers {
            pending_presents.extend(cmd.finish());
        }

        let raw_refs: Vec<&A::CommandBuffer> = buffers.iter().map(CommandBuffer::raw_ref).collect();
        unsafe { self.raw.submit(&raw_refs)? };

        for surface in pending_presents {
            surface.present(device, &self.raw)?;
        }

        let mut pool = self.pool.lock();
        pool.extend(buffers.into_iter().map(CommandBuffer::into_raw));
        Ok(())
    }

    /// Supplements §4.11's device-level `waitIdle` with a per-queue
    /// variant (`GPUCommandQueue::WaitIdle` in the original source).
    pub fn wait_idle(&self) -> Result<(), GpuError> {
        unsafe { self.raw.wait_idle()? };
        Ok(())
    }
}
