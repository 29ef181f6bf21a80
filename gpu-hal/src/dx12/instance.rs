//! Backend entry point, adapter enumeration, and the D3D12 swapchain
//! backing a [`Surface`] (§6/§4.10).
//!
//! Swapchain lifetime mirrors the D3D12-class reference this backend is
//! modeled on: a frame-latency waitable object caps how far the CPU can
//! run ahead of the GPU, `acquire_texture` waits on it with a one-second
//! timeout (mapping a wait timeout to `Timeout` with no texture acquired,
//! never to an error), and `present` is deferred to `Queue::present` so a
//! submit and its surface present share one `ExecuteCommandLists` boundary.

use std::sync::Arc;

use parking_lot::Mutex;
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::{Direct3D12, Dxgi};
use windows::Win32::System::Threading;

use gpu_types::{AcquireSurfaceResult, Extent3d, PixelFormat, PresentMode, TextureDimension, TextureLayout};

use crate::{InstanceDescriptor, InstanceError, SurfaceConfiguration, SurfaceError};

use super::device::Texture;
use super::HResult as _;

/// Matches the one-second timeout the original engine waits on its
/// frame-latency handle before treating a missed frame as `Timeout` rather
/// than `Lost`.
const DEFAULT_ACQUIRE_TIMEOUT_MS: u32 = 1000;

pub struct Instance {
    pub(super) factory: native::WeakPtr<Dxgi::IDXGIFactory4>,
    pub(super) library: Arc<native::D3D12Lib>,
    flags: crate::InstanceFlags,
}

unsafe impl Send for Instance {}
unsafe impl Sync for Instance {}

unsafe impl crate::Instance<super::Api> for Instance {
    unsafe fn init(desc: &InstanceDescriptor) -> Result<Self, InstanceError> {
        let library = native::D3D12Lib::new().map_err(|err| {
            log::error!("failed to load d3d12.dll: {err:?}");
            InstanceError::NotFound
        })?;

        if desc.flags.contains(crate::InstanceFlags::VALIDATION) {
            match library.get_debug_interface() {
                Ok(Ok(debug)) => {
                    debug.enable_layer();
                    debug.destroy();
                }
                Ok(Err(err)) => log::warn!("debug layer unavailable: {err}"),
                Err(err) => log::warn!("ID3D12Debug entry point missing: {err:?}"),
            }
        }

        let lib_dxgi = native::DxgiLib::new().map_err(|err| {
            log::error!("failed to load dxgi.dll: {err:?}");
            InstanceError::NotFound
        })?;

        let factory_flags = if desc.flags.contains(crate::InstanceFlags::VALIDATION) {
            native::FactoryCreationFlags::DEBUG
        } else {
            native::FactoryCreationFlags::empty()
        };

        let factory = match lib_dxgi.create_factory4(factory_flags) {
            Ok(Ok(factory)) => factory,
            Ok(Err(err)) => return Err(InstanceError::Other(format!("CreateDXGIFactory2 failed: {err}"))),
            Err(err) => return Err(InstanceError::Other(format!("CreateDXGIFactory2 not found: {err:?}"))),
        };

        Ok(Instance { factory, library: Arc::new(library), flags: desc.flags })
    }

    unsafe fn enumerate_adapters(&self) -> Vec<crate::ExposedAdapter<super::Api>> {
        let mut adapters = Vec::new();
        for index in 0.. {
            let adapter1: Dxgi::IDXGIAdapter1 = match self.factory.EnumAdapters1(index) {
                Ok(adapter) => adapter,
                Err(_) => break,
            };
            let adapter2: Dxgi::IDXGIAdapter2 = match adapter1.cast() {
                Ok(adapter) => adapter,
                Err(err) => {
                    log::warn!("adapter {index} has no IDXGIAdapter2: {err}");
                    continue;
                }
            };
            let raw = native::WeakPtr::from_raw(windows::core::Interface::into_raw(adapter2) as *mut _);
            if let Some(exposed) = super::adapter::Adapter::expose(raw, &self.library) {
                adapters.push(exposed);
            }
        }
        adapters
    }

    unsafe fn create_surface(
        &self,
        handle: &dyn raw_window_handle::HasRawWindowHandle,
    ) -> Result<Surface, InstanceError> {
        match handle.raw_window_handle() {
            raw_window_handle::RawWindowHandle::Windows(handle) => Ok(Surface {
                factory: self.factory,
                wnd_handle: HWND(handle.hwnd as isize),
                swap_chain: None,
            }),
            other => Err(InstanceError::Other(format!("unsupported window handle: {other:?}"))),
        }
    }

    unsafe fn destroy_surface(&self, surface: Surface) {
        drop(surface.swap_chain);
    }
}

struct SwapChain {
    raw: native::WeakPtr<Dxgi::IDXGISwapChain3>,
    resources: Vec<native::Resource>,
    waitable: windows::Win32::Foundation::HANDLE,
    present_mode: PresentMode,
    format: PixelFormat,
    size: Extent3d,
    acquired_index: Option<u32>,
}

impl Drop for SwapChain {
    fn drop(&mut self) {
        unsafe {
            for resource in self.resources.drain(..) {
                resource.destroy();
            }
            windows::Win32::Foundation::CloseHandle(self.waitable);
            self.raw.destroy();
        }
    }
}

pub struct Surface {
    pub(super) factory: native::WeakPtr<Dxgi::IDXGIFactory4>,
    wnd_handle: HWND,
    swap_chain: Option<SwapChain>,
}

unsafe impl Send for Surface {}
unsafe impl Sync for Surface {}

impl Surface {
    /// Called by `Queue::present` once the owning command buffer's submit
    /// has been issued; a surface only ever presents the texture most
    /// recently returned from `acquire_texture`.
    pub(super) unsafe fn present(&mut self) -> Result<(), SurfaceError> {
        let swap_chain = self.swap_chain.as_mut().ok_or(SurfaceError::Lost)?;
        swap_chain
            .acquired_index
            .take()
            .ok_or_else(|| SurfaceError::Other("present with no prior acquire_texture".into()))?;

        let (sync_interval, flags) = super::conv::map_present_mode(swap_chain.present_mode);
        if let Err(err) = swap_chain.raw.Present(sync_interval, flags) {
            let code = err.code().0;
            if code == Dxgi::DXGI_ERROR_DEVICE_REMOVED.0 || code == Dxgi::DXGI_ERROR_DEVICE_RESET.0 {
                return Err(SurfaceError::Lost);
            }
            return Err(SurfaceError::Other(err.to_string()));
        }
        Ok(())
    }
}

unsafe impl crate::Surface<super::Api> for Surface {
    unsafe fn configure(
        &mut self,
        device: &super::Device,
        config: &SurfaceConfiguration,
    ) -> Result<(), SurfaceError> {
        if let Some(existing) = &self.swap_chain {
            if existing.format == config.format
                && existing.size.width == config.width
                && existing.size.height == config.height
                && existing.present_mode == config.present_mode
            {
                return Ok(());
            }
        }
        self.unconfigure(device);

        // One extra image beyond the pipelined-frame count, matching the
        // original's `min(maxFramesInFlight + 1, 16)` buffer-count policy.
        let buffer_count = (gpu_types::MAX_INFLIGHT_FRAMES + 1).min(16);

        let swap_chain_desc = Dxgi::DXGI_SWAP_CHAIN_DESC1 {
            Width: config.width,
            Height: config.height,
            Format: super::conv::map_texture_format_nosrgb(config.format),
            Stereo: false.into(),
            SampleDesc: Dxgi::Common::DXGI_SAMPLE_DESC { Count: 1, Quality: 0 },
            BufferUsage: Dxgi::DXGI_USAGE_RENDER_TARGET_OUTPUT,
            BufferCount: buffer_count,
            Scaling: Dxgi::DXGI_SCALING_STRETCH,
            SwapEffect: Dxgi::DXGI_SWAP_EFFECT_FLIP_DISCARD,
            AlphaMode: Dxgi::DXGI_ALPHA_MODE_IGNORE,
            Flags: Dxgi::DXGI_SWAP_CHAIN_FLAG_FRAME_LATENCY_WAITABLE_OBJECT.0 as u32,
        };
        let fullscreen_desc = Dxgi::DXGI_SWAP_CHAIN_FULLSCREEN_DESC {
            Windowed: true.into(),
            ..Default::default()
        };

        let swap_chain1: Dxgi::IDXGISwapChain1 = self
            .factory
            .CreateSwapChainForHwnd(
                device.present_queue,
                self.wnd_handle,
                &swap_chain_desc,
                &fullscreen_desc,
                None,
            )
            .map_err(|err| SurfaceError::Other(format!("CreateSwapChainForHwnd failed: {err}")))?;

        // Best-effort: failing to suppress the default Alt+Enter/DPI window
        // message handling shouldn't fail configuration.
        let _ = self.factory.MakeWindowAssociation(
            self.wnd_handle,
            Dxgi::DXGI_MWA_NO_WINDOW_CHANGES | Dxgi::DXGI_MWA_NO_ALT_ENTER,
        );

        let swap_chain3: Dxgi::IDXGISwapChain3 = swap_chain1
            .cast()
            .map_err(|err| SurfaceError::Other(format!("IDXGISwapChain3 unsupported: {err}")))?;

        let _ = swap_chain3.SetMaximumFrameLatency(gpu_types::MAX_INFLIGHT_FRAMES);
        let waitable = swap_chain3.GetFrameLatencyWaitableObject();

        let mut resources = Vec::with_capacity(buffer_count as usize);
        for i in 0..buffer_count {
            let resource: Direct3D12::ID3D12Resource = swap_chain3
                .GetBuffer(i)
                .map_err(|err| SurfaceError::Other(format!("GetBuffer({i}) failed: {err}")))?;
            resources.push(native::WeakPtr::from_raw(windows::core::Interface::into_raw(resource) as *mut _));
        }

        self.swap_chain = Some(SwapChain {
            raw: native::WeakPtr::from_raw(windows::core::Interface::into_raw(swap_chain3) as *mut _),
            resources,
            waitable,
            present_mode: config.present_mode,
            format: config.format,
            size: Extent3d { width: config.width, height: config.height, depth_or_array_layers: 1 },
            acquired_index: None,
        });

        Ok(())
    }

    unsafe fn unconfigure(&mut self, device: &super::Device) {
        if self.swap_chain.is_some() {
            let _ = crate::Device::wait_idle(device);
            self.swap_chain = None;
        }
    }

    unsafe fn acquire_texture(
        &mut self,
        timeout_ms: Option<u32>,
    ) -> (AcquireSurfaceResult, Option<Texture>) {
        let swap_chain = match &mut self.swap_chain {
            Some(swap_chain) => swap_chain,
            None => return (AcquireSurfaceResult::Lost, None),
        };

        let timeout = timeout_ms.unwrap_or(DEFAULT_ACQUIRE_TIMEOUT_MS);
        match Threading::WaitForSingleObjectEx(swap_chain.waitable, timeout, true) {
            Threading::WAIT_OBJECT_0 => {}
            Threading::WAIT_TIMEOUT => return (AcquireSurfaceResult::Timeout, None),
            _ => return (AcquireSurfaceResult::Lost, None),
        }

        let index = swap_chain.raw.GetCurrentBackBufferIndex();
        swap_chain.acquired_index = Some(index);

        let texture = Texture {
            resource: swap_chain.resources[index as usize],
            format: swap_chain.format,
            dimension: TextureDimension::D2,
            size: swap_chain.size,
            mip_level_count: 1,
            array_layer_count: 1,
            layouts: Mutex::new(vec![TextureLayout::Present]),
        };

        (AcquireSurfaceResult::SuccessOptimal, Some(texture))
    }
}
