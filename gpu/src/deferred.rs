//! Deferred-destruction queue (§4.2, §4.3/§9 "Deferred-destruction queue").
//!
//! Releasing the last reference to a GPU object never frees the native
//! handle immediately: it's appended to this device-owned, mutex-protected
//! deque tagged with the `frameCount` at which it was released.
//! `Device::commit_frame` scans from the front and frees every entry whose
//! `releaseFrame + maxFramesInFlight < frameCount`, or all entries at
//! once when the device is shutting down (`force = true`).

use std::collections::VecDeque;

use parking_lot::Mutex;

use gpu_hal::Api;

/// One released native resource, still alive until its retirement frame
/// is old enough to guarantee no in-flight command buffer references it.
pub enum Retired<A: Api> {
    Buffer(A::Buffer),
    Texture(A::Texture),
    Sampler(A::Sampler),
    BindGroupLayout(A::BindGroupLayout),
    PipelineLayout(A::PipelineLayout),
    ShaderModule(A::ShaderModule),
    RenderPipeline(A::RenderPipeline),
    ComputePipeline(A::ComputePipeline),
    QueryHeap(A::QueryHeap),
}

pub struct DeferredDestructionQueue<A: Api> {
    entries: Mutex<VecDeque<(u64, Retired<A>)>>,
}

impl<A: Api> Default for DeferredDestructionQueue<A> {
    fn default() -> Self {
        DeferredDestructionQueue {
            entries: Mutex::new(VecDeque::new()),
        }
    }
}

impl<A: Api> DeferredDestructionQueue<A> {
    pub fn retire(&self, release_frame: u64, entry: Retired<A>) {
        self.entries.lock().push_back((release_frame, entry));
    }

    /// Frees every entry old enough to be safe (`force` frees all of
    /// them, used by `waitIdle` and device shutdown per §4.2/§4.11).
    pub fn sweep(&self, hal_device: &A::Device, current_frame: u64, max_frames_in_flight: u32, force: bool) {
        let mut entries = self.entries.lock();
        while let Some((release_frame, _)) = entries.front() {
            let expired = force || *release_frame + max_frames_in_flight as u64 <= current_frame;
            if !expired {
                break;
            }
            let (_, entry) = entries.pop_front().unwrap();
            // SAFETY: the resource was released by its last owner and has
            // sat in this queue at least `maxFramesInFlight` commits, so
            // no command buffer still in flight can reference it.
            unsafe { destroy_one::<A>(hal_device, entry) };
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

unsafe fn destroy_one<A: Api>(hal_device: &A::Device, entry: Retired<A>) {
    use gpu_hal::Device as _;
    match entry {
        Retired::Buffer(b) => hal_device.destroy_buffer(b),
        Retired::Texture(t) => hal_device.destroy_texture(t),
        Retired::Sampler(s) => hal_device.destroy_sampler(s),
        Retired::BindGroupLayout(l) => hal_device.destroy_bind_group_layout(l),
        Retired::PipelineLayout(l) => hal_device.destroy_pipeline_layout(l),
        Retired::ShaderModule(m) => hal_device.destroy_shader_module(m),
        Retired::RenderPipeline(p) => hal_device.destroy_render_pipeline(p),
        Retired::ComputePipeline(p) => hal_device.destroy_compute_pipeline(p),
        Retired::QueryHeap(h) => hal_device.destroy_query_heap(h),
    }
}
