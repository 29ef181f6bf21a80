//! CPU-visible + GPU-visible paired descriptor heap allocator (§4.3,
//! D3D12-class backend only). The growth/free-list bookkeeping is generic
//! over the native heap pair; `gpu-hal::dx12::descriptor` supplies the
//! `HeapPair` impl that actually calls `ID3D12Device::CreateDescriptorHeap`
//! and copies descriptors between heaps.

use parking_lot::Mutex;

/// Backend hook: create/grow a CPU (+ optionally GPU-visible) descriptor
/// heap pair and copy descriptors across a resize.
pub trait HeapPair: Sized {
    /// Whatever native device handle `create` needs; kept generic so this
    /// allocator never holds backend state of its own (§9 "no global
    /// mutable state").
    type Device;
    type Error;

    fn create(device: &Self::Device, capacity: u32, shader_visible: bool) -> Result<Self, Self::Error>;
    /// Copy `count` descriptors starting at `src_index` in `old` to index 0
    /// of `self` (used when growing).
    fn copy_from(&mut self, old: &Self, src_index: u32, count: u32);
}

struct Inner<H> {
    heap: H,
    capacity: u32,
    occupied: Vec<bool>,
    search_start: u32,
    allocated_count: u32,
    shader_visible: bool,
}

/// One allocator per descriptor type (RTV, DSV, CBV/SRV/UAV, Sampler).
pub struct DescriptorAllocator<H: HeapPair> {
    device: H::Device,
    inner: Mutex<Inner<H>>,
}

#[derive(Debug, thiserror::Error)]
pub enum DescriptorAllocError<E> {
    #[error("descriptor heap allocation failed")]
    OutOfMemory,
    #[error("heap backend error: {0}")]
    Backend(E),
}

impl<H: HeapPair> DescriptorAllocator<H>
where
    H::Device: Clone,
{
    pub fn new(
        device: &H::Device,
        initial_capacity: u32,
        shader_visible: bool,
    ) -> Result<Self, DescriptorAllocError<H::Error>> {
        let heap = H::create(device, initial_capacity.max(1), shader_visible)
            .map_err(DescriptorAllocError::Backend)?;
        Ok(DescriptorAllocator {
            device: device.clone(),
            inner: Mutex::new(Inner {
                heap,
                capacity: initial_capacity.max(1),
                occupied: vec![false; initial_capacity.max(1) as usize],
                search_start: 0,
                allocated_count: 0,
                shader_visible,
            }),
        })
    }

    /// Linear scan from `searchStart` for a run of `count` free slots; on
    /// failure, doubles capacity to the next power of two covering the
    /// request and retries once.
    pub fn allocate(&self, count: u32) -> Result<u32, DescriptorAllocError<H::Error>> {
        let mut inner = self.inner.lock();
        if let Some(index) = find_free_run(&inner.occupied, inner.search_start, count) {
            mark(&mut inner.occupied, index, count, true);
            inner.allocated_count += count;
            if index == inner.search_start {
                inner.search_start = index + count;
            }
            return Ok(index);
        }

        grow(&self.device, &mut inner, inner.capacity + count)?;

        let index = find_free_run(&inner.occupied, inner.search_start, count)
            .ok_or(DescriptorAllocError::OutOfMemory)?;
        mark(&mut inner.occupied, index, count, true);
        inner.allocated_count += count;
        Ok(index)
    }

    pub fn release(&self, base: u32, count: u32) {
        let mut inner = self.inner.lock();
        mark(&mut inner.occupied, base, count, false);
        inner.allocated_count = inner.allocated_count.saturating_sub(count);
        if base < inner.search_start {
            inner.search_start = base;
        }
    }

    pub fn allocated_count(&self) -> u32 {
        self.inner.lock().allocated_count
    }

    pub fn is_shader_visible(&self) -> bool {
        self.inner.lock().shader_visible
    }

    pub fn with_heap<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        let inner = self.inner.lock();
        f(&inner.heap)
    }
}

fn find_free_run(occupied: &[bool], start: u32, count: u32) -> Option<u32> {
    if count == 0 || occupied.is_empty() {
        return None;
    }
    let len = occupied.len() as u32;
    let mut i = start.min(len);
    while i + count <= len {
        if occupied[i as usize..(i + count) as usize].iter().all(|&b| !b) {
            return Some(i);
        }
        // advance past the first occupied slot in the window
        let mut j = i;
        while j < i + count && !occupied[j as usize] {
            j += 1;
        }
        i = j + 1;
    }
    None
}

fn mark(occupied: &mut [bool], base: u32, count: u32, value: bool) {
    for slot in occupied[base as usize..(base + count) as usize].iter_mut() {
        *slot = value;
    }
}

fn grow<H: HeapPair>(
    device: &H::Device,
    inner: &mut Inner<H>,
    min_capacity: u32,
) -> Result<(), DescriptorAllocError<H::Error>> {
    let new_capacity = min_capacity.next_power_of_two();
    let mut new_heap =
        H::create(device, new_capacity, inner.shader_visible).map_err(DescriptorAllocError::Backend)?;
    new_heap.copy_from(&inner.heap, 0, inner.capacity);
    inner.heap = new_heap;
    let mut occupied = vec![false; new_capacity as usize];
    occupied[..inner.occupied.len()].copy_from_slice(&inner.occupied);
    inner.occupied = occupied;
    inner.capacity = new_capacity;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeHeap {
        capacity: u32,
        copied_from: Option<u32>,
    }

    impl HeapPair for FakeHeap {
        type Device = ();
        type Error = std::convert::Infallible;

        fn create(_device: &(), capacity: u32, _shader_visible: bool) -> Result<Self, Self::Error> {
            Ok(FakeHeap { capacity, copied_from: None })
        }

        fn copy_from(&mut self, _old: &Self, src_index: u32, _count: u32) {
            self.copied_from = Some(src_index);
        }
    }

    #[test]
    fn allocate_and_release_reuses_slots() {
        let alloc = DescriptorAllocator::<FakeHeap>::new(&(), 4, false).unwrap();
        let a = alloc.allocate(2).unwrap();
        let b = alloc.allocate(2).unwrap();
        assert_ne!(a, b);
        alloc.release(a, 2);
        let c = alloc.allocate(2).unwrap();
        assert_eq!(c, a, "released slots should be reused via search_start rewind");
    }

    #[test]
    fn grows_geometrically_when_exhausted() {
        let alloc = DescriptorAllocator::<FakeHeap>::new(&(), 2, false).unwrap();
        let _a = alloc.allocate(2).unwrap();
        let b = alloc.allocate(2).unwrap();
        assert_eq!(b, 2);
        assert_eq!(alloc.inner.lock().capacity, 4);
    }
}
