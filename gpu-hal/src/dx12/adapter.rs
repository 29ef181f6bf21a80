use std::{mem, sync::Arc};

use windows::Win32::Graphics::{Direct3D12, Dxgi};

use gpu_types::{AdapterInfo, AdapterType, BackendType, DriverVersion, Features, Limits};

use crate::auxil::vendor::vendor_from_id;

use super::device::Device;
use super::HResult as _;

/// A physical adapter plus the D3D12 loader used to re-open a device on it
/// (§3 "Adapter"/§4.11 `expose`).
#[derive(Debug)]
pub struct Adapter {
    pub(super) raw: native::WeakPtr<Dxgi::IDXGIAdapter2>,
    pub(super) library: Arc<native::D3D12Lib>,
}

unsafe impl Send for Adapter {}
unsafe impl Sync for Adapter {}

impl Drop for Adapter {
    fn drop(&mut self) {
        unsafe { self.raw.destroy() };
    }
}

impl Adapter {
    /// Opens a throwaway device just long enough to read back feature data,
    /// mirroring the teacher's `expose`: adapter enumeration and device
    /// opening both go through `D3D12CreateDevice`, so the cheapest way to
    /// describe an adapter is to briefly create one.
    pub(super) fn expose(
        raw: native::WeakPtr<Dxgi::IDXGIAdapter2>,
        library: &Arc<native::D3D12Lib>,
    ) -> Option<crate::ExposedAdapter<super::Api>> {
        let device = match library.create_device(raw, native::FeatureLevel::L11_0) {
            Ok(Ok(device)) => device,
            Ok(Err(err)) => {
                log::warn!("device creation failed: {err}");
                return None;
            }
            Err(err) => {
                log::warn!("D3D12CreateDevice not found: {err:?}");
                return None;
            }
        };

        let desc = unsafe { raw.GetDesc2().ok()? };
        let name = {
            use std::{ffi::OsString, os::windows::ffi::OsStringExt};
            let len = desc.Description.iter().take_while(|&&c| c != 0).count();
            OsString::from_wide(&desc.Description[..len])
                .to_string_lossy()
                .into_owned()
        };

        let is_software = (desc.Flags & Dxgi::DXGI_ADAPTER_FLAG_SOFTWARE.0) != 0;
        let mut architecture: Direct3D12::D3D12_FEATURE_DATA_ARCHITECTURE = unsafe { mem::zeroed() };
        let has_uma = unsafe {
            device
                .CheckFeatureSupport(
                    Direct3D12::D3D12_FEATURE_ARCHITECTURE,
                    &mut architecture as *mut _ as *mut _,
                    mem::size_of_val(&architecture) as u32,
                )
                .is_ok()
                && architecture.CacheCoherentUMA.0 != 0
        };

        let adapter_type = if is_software {
            AdapterType::Cpu
        } else if has_uma {
            AdapterType::Integrated
        } else {
            AdapterType::Discrete
        };

        unsafe { device.destroy() };

        let info = AdapterInfo {
            name,
            vendor: vendor_from_id(desc.VendorId),
            vendor_id: desc.VendorId,
            device_id: desc.DeviceId,
            driver_version: DriverVersion::default(),
            adapter_type,
            backend: BackendType::D3D12,
        };

        Some(crate::ExposedAdapter {
            adapter: Adapter { raw, library: Arc::clone(library) },
            info,
            features: Features::empty(),
            capabilities: crate::Capabilities { limits: Limits::default(), alignments: Default::default() },
        })
    }
}

unsafe impl crate::Adapter<super::Api> for Adapter {
    unsafe fn open(
        &self,
        _features: Features,
        limits: &Limits,
    ) -> Result<crate::OpenDevice<super::Api>, crate::DeviceError> {
        let raw_device = self
            .library
            .create_device(self.raw, native::FeatureLevel::L11_0)
            .map_err(|err| {
                log::error!("D3D12CreateDevice entry point missing: {err:?}");
                crate::DeviceError::Lost
            })?
            .map_err(|err| {
                log::error!("device creation failed: {err}");
                crate::DeviceError::Lost
            })?;

        let direct_queue = raw_device
            .create_command_queue(
                native::CmdListType::Direct,
                native::Priority::Normal,
                native::CommandQueueFlags::empty(),
                0,
            )
            .into_device_result("queue creation")?;

        let device = Device::new(raw_device, direct_queue, *limits)?;
        let queue = super::command::Queue::new(direct_queue, raw_device);

        let mut queues = [None, None, None, None];
        queues[gpu_types::CommandQueueType::Graphics as usize] = Some(queue);

        Ok(crate::OpenDevice {
            device,
            queues: crate::QueueSet::new(queues),
        })
    }

    unsafe fn texture_format_capabilities(
        &self,
        format: gpu_types::PixelFormat,
    ) -> crate::TextureFormatCapabilities {
        use crate::TextureFormatCapabilities as Caps;
        let dxgi_format = super::conv::map_texture_format(format);
        if dxgi_format == Dxgi::DXGI_FORMAT_UNKNOWN {
            return Caps::empty();
        }
        // Conservative: every mapped format supports copy + sampling; the
        // attachment bits are narrowed to what `PixelFormatInfo` reports.
        let mut caps = Caps::COPY_SRC | Caps::COPY_DST | Caps::SAMPLED;
        let compressed = gpu_types::is_compressed(format);
        if !compressed {
            caps |= Caps::SAMPLED_LINEAR;
        }
        if gpu_types::is_depth(format) || gpu_types::is_stencil(format) {
            caps |= Caps::DEPTH_STENCIL_ATTACHMENT;
        } else if !compressed {
            caps |= Caps::COLOR_ATTACHMENT | Caps::COLOR_ATTACHMENT_BLEND | Caps::STORAGE;
        }
        caps
    }

    unsafe fn surface_capabilities(
        &self,
        _surface: &super::Surface,
    ) -> Option<crate::SurfaceCapabilities> {
        Some(crate::SurfaceCapabilities {
            formats: vec![
                gpu_types::PixelFormat::Bgra8UnormSrgb,
                gpu_types::PixelFormat::Bgra8Unorm,
                gpu_types::PixelFormat::Rgba8Unorm,
            ],
            min_image_count: 2,
            max_image_count: gpu_types::MAX_INFLIGHT_FRAMES as u32,
            current_extent: None,
            usage: gpu_types::TextureUsages::RENDER_TARGET | gpu_types::TextureUsages::COPY_DST,
            present_modes: vec![gpu_types::PresentMode::Fifo, gpu_types::PresentMode::Immediate],
            composite_alpha_modes: vec![crate::CompositeAlphaMode::Opaque],
        })
    }
}
