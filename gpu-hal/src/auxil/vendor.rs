//! Adapter vendor-ID → vendor-enum mapping, supplementing §3's Adapter info
//! (grounded on `alimer_gpu.cpp`'s `agpuGPUAdapterVendorFromID`). This is
//! the only place PCI vendor IDs are special-cased; it must never feed
//! into feature negotiation or limits.

use gpu_types::AdapterVendor;

const VENDOR_ID_AMD: u32 = 0x1002;
const VENDOR_ID_APPLE: u32 = 0x106b;
const VENDOR_ID_ARM: u32 = 0x13B5;
const VENDOR_ID_INTEL: u32 = 0x8086;
const VENDOR_ID_MICROSOFT: u32 = 0x1414;
const VENDOR_ID_NVIDIA: u32 = 0x10DE;
const VENDOR_ID_QUALCOMM: u32 = 0x5143;

pub fn vendor_from_id(vendor_id: u32) -> AdapterVendor {
    match vendor_id {
        VENDOR_ID_AMD => AdapterVendor::Amd,
        VENDOR_ID_APPLE => AdapterVendor::Apple,
        VENDOR_ID_ARM => AdapterVendor::Arm,
        VENDOR_ID_INTEL => AdapterVendor::Intel,
        VENDOR_ID_MICROSOFT => AdapterVendor::Microsoft,
        VENDOR_ID_NVIDIA => AdapterVendor::Nvidia,
        VENDOR_ID_QUALCOMM => AdapterVendor::Qualcomm,
        _ => AdapterVendor::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_map_correctly() {
        assert_eq!(vendor_from_id(0x10DE), AdapterVendor::Nvidia);
        assert_eq!(vendor_from_id(0x1002), AdapterVendor::Amd);
        assert_eq!(vendor_from_id(0xDEAD), AdapterVendor::Unknown);
    }
}
