/*!
# Vulkan-class backend.

Grounded on `ash` + the enhanced-barrier-batching description of §4.6: every
backend here accumulates image/buffer/global barriers in three vectors and
flushes them as a single `vkCmdPipelineBarrier` call, rather than the
D3D12-class ring buffer the `dx12` module uses. `auxil::barrier::classify`
still decides no-op/UAV-barrier/transition once the call site computes a
`(old, new)` pair; `conv::map_texture_layout` supplies the native
`(VkImageLayout, VkAccessFlags, VkPipelineStageFlags)` triple the table at
§4.6 demands.

## Memory

Allocation goes through `gpu-alloc`'s `GpuAllocator`, matching the
teacher's choice of allocator crate for the Vulkan-class path (the
D3D12-class backend instead uses committed resources, per its own module
doc).

## Descriptors

Vulkan's native binding model (descriptor sets) isn't wired up: per §9's
first Open Question, `BindGroupLayout`/`PipelineLayout` only carry
push-constant ranges end to end, same as every other backend.
!*/

mod adapter;
mod command;
mod conv;
mod device;
mod instance;

pub use adapter::Adapter;
pub use command::{CommandBuffer, Queue};
pub use device::{
    BindGroupLayout, Buffer, ComputePipeline, Device, PipelineLayout, QueryHeap, RenderPipeline,
    Sampler, ShaderModule, Texture,
};
pub use instance::{Instance, Surface};

#[derive(Clone, Debug)]
pub struct Api;

impl crate::Api for Api {
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

/// Logs the underlying native error verbatim at category GPU (§7) and maps
/// `ash::vk::Result` onto [`crate::DeviceError`], matching `dx12::HResult`.
pub(crate) trait VkResult<T> {
    fn into_device_result(self, what: &str) -> Result<T, crate::DeviceError>;
}

impl<T> VkResult<T> for Result<T, ash::vk::Result> {
    fn into_device_result(self, what: &str) -> Result<T, crate::DeviceError> {
        self.map_err(|err| {
            log::error!(target: "GPU", "{what} failed: {err}");
            match err {
                ash::vk::Result::ERROR_OUT_OF_HOST_MEMORY
                | ash::vk::Result::ERROR_OUT_OF_DEVICE_MEMORY => crate::DeviceError::OutOfMemory,
                ash::vk::Result::ERROR_DEVICE_LOST => crate::DeviceError::Lost,
                _ => crate::DeviceError::Lost,
            }
        })
    }
}
