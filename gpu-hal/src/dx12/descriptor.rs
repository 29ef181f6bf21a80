//! `HeapPair` impl backing the four descriptor allocators a [`super::Device`]
//! owns (RTV, DSV, CBV/SRV/UAV, sampler); see `auxil::descriptor` for the
//! generic growth/free-list bookkeeping this only supplies native calls for.

use windows::Win32::Graphics::Direct3D12;

use crate::auxil::descriptor::HeapPair;

use super::HResult as _;

/// One `ID3D12DescriptorHeap` plus the fixed stride D3D12 reports for its
/// type, needed to offset CPU/GPU handles by index.
pub struct NativeHeap {
    pub(super) device: native::Device,
    pub(super) heap: native::DescriptorHeap,
    pub(super) kind: Direct3D12::D3D12_DESCRIPTOR_HEAP_TYPE,
    pub(super) increment: u32,
}

impl NativeHeap {
    pub(super) fn cpu_handle(&self, index: u32) -> Direct3D12::D3D12_CPU_DESCRIPTOR_HANDLE {
        let start = self.heap.get_cpu_descriptor_handle_for_heap_start();
        Direct3D12::D3D12_CPU_DESCRIPTOR_HANDLE {
            ptr: start.ptr + (index * self.increment) as usize,
        }
    }

    pub(super) fn gpu_handle(&self, index: u32) -> Direct3D12::D3D12_GPU_DESCRIPTOR_HANDLE {
        let start = self.heap.get_gpu_descriptor_handle_for_heap_start();
        Direct3D12::D3D12_GPU_DESCRIPTOR_HANDLE {
            ptr: start.ptr + (index * self.increment) as u64,
        }
    }
}

fn create_heap(
    device: &native::Device,
    kind: Direct3D12::D3D12_DESCRIPTOR_HEAP_TYPE,
    capacity: u32,
    shader_visible: bool,
) -> Result<NativeHeap, crate::DeviceError> {
    let flags = if shader_visible {
        Direct3D12::D3D12_DESCRIPTOR_HEAP_FLAG_SHADER_VISIBLE
    } else {
        Direct3D12::D3D12_DESCRIPTOR_HEAP_FLAG_NONE
    };
    let heap = device
        .create_descriptor_heap(capacity, kind, flags, 0)
        .into_device_result("descriptor heap creation")?;
    let increment = device.get_descriptor_increment_size(kind);
    Ok(NativeHeap { device: *device, heap, kind, increment })
}

/// One typed `HeapPair` per descriptor category; the D3D12 heap type is
/// carried in the handle rather than at the type level, since all four
/// categories share this same growth strategy.
pub struct RtvHeap(NativeHeap);
pub struct DsvHeap(NativeHeap);
pub struct CbvSrvUavHeap(NativeHeap);
pub struct SamplerHeap(NativeHeap);

macro_rules! impl_heap_pair {
    ($ty:ident, $kind:expr) => {
        impl HeapPair for $ty {
            type Device = native::Device;
            type Error = crate::DeviceError;

            fn create(device: &native::Device, capacity: u32, shader_visible: bool) -> Result<Self, Self::Error> {
                create_heap(device, $kind, capacity, shader_visible).map($ty)
            }

            fn copy_from(&mut self, old: &Self, src_index: u32, count: u32) {
                if count == 0 {
                    return;
                }
                let device = self.0.device;
                unsafe {
                    device.CopyDescriptorsSimple(
                        count,
                        self.0.cpu_handle(0),
                        old.0.cpu_handle(src_index),
                        self.0.kind,
                    );
                }
            }
        }

        impl std::ops::Deref for $ty {
            type Target = NativeHeap;
            fn deref(&self) -> &NativeHeap {
                &self.0
            }
        }
    };
}

impl_heap_pair!(RtvHeap, Direct3D12::D3D12_DESCRIPTOR_HEAP_TYPE_RTV);
impl_heap_pair!(DsvHeap, Direct3D12::D3D12_DESCRIPTOR_HEAP_TYPE_DSV);
impl_heap_pair!(CbvSrvUavHeap, Direct3D12::D3D12_DESCRIPTOR_HEAP_TYPE_CBV_SRV_UAV);
impl_heap_pair!(SamplerHeap, Direct3D12::D3D12_DESCRIPTOR_HEAP_TYPE_SAMPLER);
