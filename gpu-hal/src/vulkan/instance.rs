//! Backend entry point, adapter enumeration, and the `VK_KHR_swapchain`
//! backing a [`Surface`] (§6/§4.10). Mirrors `dx12::instance`'s acquire/
//! present split: `acquire_texture` only calls `vkAcquireNextImageKHR`
//! (bounded by a one-second timeout per §4.6), while the actual
//! `vkQueuePresentKHR` is deferred to `Queue::present` so a submit and its
//! surface present share one queue operation.

use std::ffi::CString;

use ash::extensions::khr;
use ash::version::{DeviceV1_0, EntryV1_0, InstanceV1_0};
use ash::vk;
use parking_lot::Mutex;

use gpu_types::{AcquireSurfaceResult, Extent3d, PresentMode, TextureDimension, TextureLayout};

use crate::{InstanceDescriptor, InstanceError, SurfaceConfiguration, SurfaceError};

use super::device::Texture;

const DEFAULT_ACQUIRE_TIMEOUT_NS: u64 = 1_000_000_000;

pub struct Instance {
    pub(super) entry: ash::Entry,
    pub(super) raw: ash::Instance,
    pub(super) surface_ext: khr::Surface,
    flags: crate::InstanceFlags,
}

unsafe impl Send for Instance {}
unsafe impl Sync for Instance {}

unsafe impl crate::Instance<super::Api> for Instance {
    unsafe fn init(desc: &InstanceDescriptor) -> Result<Self, InstanceError> {
        let entry = ash::Entry::new().map_err(|err| {
            log::error!("failed to load the Vulkan loader: {err}");
            InstanceError::NotFound
        })?;

        let app_name = CString::new("gpu").unwrap();
        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name)
            .application_version(0)
            .engine_name(&app_name)
            .engine_version(0)
            .api_version(vk::make_version(1, 1, 0));

        let mut extension_names = vec![khr::Surface::name().as_ptr()];
        #[cfg(target_os = "windows")]
        extension_names.push(khr::Win32Surface::name().as_ptr());
        #[cfg(all(unix, not(target_os = "android"), not(target_os = "macos")))]
        {
            extension_names.push(khr::XlibSurface::name().as_ptr());
            extension_names.push(khr::WaylandSurface::name().as_ptr());
        }

        let mut layer_names: Vec<CString> = Vec::new();
        if desc.flags.contains(crate::InstanceFlags::VALIDATION) {
            layer_names.push(CString::new("VK_LAYER_KHRONOS_validation").unwrap());
        }
        let layer_name_ptrs: Vec<*const i8> = layer_names.iter().map(|n| n.as_ptr()).collect();

        let create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_extension_names(&extension_names)
            .enabled_layer_names(&layer_name_ptrs);

        let raw = entry.create_instance(&create_info, None).map_err(|err| {
            log::error!("vkCreateInstance failed: {err}");
            InstanceError::Other(err.to_string())
        })?;

        let surface_ext = khr::Surface::new(&entry, &raw);

        Ok(Instance { entry, raw, surface_ext, flags: desc.flags })
    }

    unsafe fn enumerate_adapters(&self) -> Vec<crate::ExposedAdapter<super::Api>> {
        let physical_devices = match self.raw.enumerate_physical_devices() {
            Ok(devices) => devices,
            Err(err) => {
                log::warn!("vkEnumeratePhysicalDevices failed: {err}");
                return Vec::new();
            }
        };
        physical_devices
            .into_iter()
            .filter_map(|physical_device| super::adapter::Adapter::expose(&self.raw, physical_device))
            .collect()
    }

    unsafe fn create_surface(
        &self,
        handle: &dyn raw_window_handle::HasRawWindowHandle,
    ) -> Result<Surface, InstanceError> {
        let raw = match handle.raw_window_handle() {
            #[cfg(target_os = "windows")]
            raw_window_handle::RawWindowHandle::Windows(h) => {
                let win32_ext = khr::Win32Surface::new(&self.entry, &self.raw);
                let create_info = vk::Win32SurfaceCreateInfoKHR::builder()
                    .hinstance(h.hinstance)
                    .hwnd(h.hwnd);
                win32_ext
                    .create_win32_surface(&create_info, None)
                    .map_err(|err| InstanceError::Other(format!("vkCreateWin32SurfaceKHR failed: {err}")))?
            }
            #[cfg(all(unix, not(target_os = "android"), not(target_os = "macos")))]
            raw_window_handle::RawWindowHandle::Xlib(h) => {
                let xlib_ext = khr::XlibSurface::new(&self.entry, &self.raw);
                let create_info = vk::XlibSurfaceCreateInfoKHR::builder()
                    .dpy(h.display as *mut _)
                    .window(h.window);
                xlib_ext
                    .create_xlib_surface(&create_info, None)
                    .map_err(|err| InstanceError::Other(format!("vkCreateXlibSurfaceKHR failed: {err}")))?
            }
            #[cfg(all(unix, not(target_os = "android"), not(target_os = "macos")))]
            raw_window_handle::RawWindowHandle::Wayland(h) => {
                let wayland_ext = khr::WaylandSurface::new(&self.entry, &self.raw);
                let create_info = vk::WaylandSurfaceCreateInfoKHR::builder()
                    .display(h.display)
                    .surface(h.surface);
                wayland_ext
                    .create_wayland_surface(&create_info, None)
                    .map_err(|err| InstanceError::Other(format!("vkCreateWaylandSurfaceKHR failed: {err}")))?
            }
            other => return Err(InstanceError::Other(format!("unsupported window handle: {other:?}"))),
        };

        Ok(Surface {
            raw,
            surface_ext: self.surface_ext.clone(),
            swapchain: Mutex::new(None),
        })
    }

    unsafe fn destroy_surface(&self, surface: Surface) {
        self.surface_ext.destroy_surface(surface.raw, None);
    }
}

struct SwapChain {
    ext: khr::Swapchain,
    raw: vk::SwapchainKHR,
    images: Vec<vk::Image>,
    /// A single reusable acquire fence: acquisition is synced on the CPU
    /// (mirrors `dx12`'s `WaitForSingleObjectEx` on its waitable object)
    /// rather than via a semaphore threaded through `Queue::submit`, which
    /// the trait's `submit` signature has no surface to carry.
    acquire_fence: vk::Fence,
    format: gpu_types::PixelFormat,
    size: Extent3d,
    present_mode: PresentMode,
    device: ash::Device,
    acquired_index: Option<u32>,
}

impl Drop for SwapChain {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_fence(self.acquire_fence, None);
            self.ext.destroy_swapchain(self.raw, None);
        }
    }
}

pub struct Surface {
    pub(super) raw: vk::SurfaceKHR,
    pub(super) surface_ext: khr::Surface,
    swapchain: Mutex<Option<SwapChain>>,
}

unsafe impl Send for Surface {}
unsafe impl Sync for Surface {}

impl Surface {
    /// Called by `Queue::present` once the owning command buffer's submit
    /// has been issued (§4.5/§4.10): one `vkQueuePresentKHR` per present,
    /// waiting on the frame's release semaphore.
    pub(super) unsafe fn present(&self, queue: vk::Queue, ext: &ash::Device) -> Result<(), SurfaceError> {
        let _ = ext;
        let mut guard = self.swapchain.lock();
        let swapchain = guard.as_mut().ok_or(SurfaceError::Lost)?;
        let index = swapchain
            .acquired_index
            .take()
            .ok_or_else(|| SurfaceError::Other("present with no prior acquire_texture".into()))?;

        let swapchains = [swapchain.raw];
        let indices = [index];
        let present_info = vk::PresentInfoKHR::builder().swapchains(&swapchains).image_indices(&indices);

        match swapchain.ext.queue_present(queue, &present_info) {
            Ok(_suboptimal) => Ok(()),
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Err(SurfaceError::Outdated),
            Err(vk::Result::SUBOPTIMAL_KHR) => Ok(()),
            Err(vk::Result::ERROR_DEVICE_LOST) => Err(SurfaceError::Lost),
            Err(err) => Err(SurfaceError::Other(err.to_string())),
        }
    }
}

unsafe impl crate::Surface<super::Api> for Surface {
    unsafe fn configure(
        &mut self,
        device: &super::Device,
        config: &SurfaceConfiguration,
    ) -> Result<(), SurfaceError> {
        {
            let guard = self.swapchain.lock();
            if let Some(existing) = guard.as_ref() {
                if existing.format == config.format
                    && existing.size.width == config.width
                    && existing.size.height == config.height
                    && existing.present_mode == config.present_mode
                {
                    return Ok(());
                }
            }
        }
        self.unconfigure(device);

        let caps = self
            .surface_ext
            .get_physical_device_surface_capabilities(device.physical_device, self.raw)
            .map_err(|err| SurfaceError::Other(format!("vkGetPhysicalDeviceSurfaceCapabilitiesKHR failed: {err}")))?;

        let image_count =
            (gpu_types::MAX_INFLIGHT_FRAMES).clamp(caps.min_image_count, if caps.max_image_count == 0 {
                u32::MAX
            } else {
                caps.max_image_count
            });

        let swapchain_ext = khr::Swapchain::new(&device.instance, &device.raw);
        let create_info = vk::SwapchainCreateInfoKHR::builder()
            .surface(self.raw)
            .min_image_count(image_count)
            .image_format(super::conv::map_texture_format_nosrgb(config.format))
            .image_color_space(vk::ColorSpaceKHR::SRGB_NONLINEAR)
            .image_extent(vk::Extent2D { width: config.width, height: config.height })
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT | vk::ImageUsageFlags::TRANSFER_DST)
            .image_sharing_mode(vk::SharingMode::EXCLUSIVE)
            .pre_transform(caps.current_transform)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(super::conv::map_present_mode(config.present_mode))
            .clipped(true);

        let raw = swapchain_ext
            .create_swapchain(&create_info, None)
            .map_err(|err| SurfaceError::Other(format!("vkCreateSwapchainKHR failed: {err}")))?;

        let images = swapchain_ext
            .get_swapchain_images(raw)
            .map_err(|err| SurfaceError::Other(format!("vkGetSwapchainImagesKHR failed: {err}")))?;

        let fence_info = vk::FenceCreateInfo::builder();
        let acquire_fence = device
            .raw
            .create_fence(&fence_info, None)
            .map_err(|err| SurfaceError::Other(format!("vkCreateFence failed: {err}")))?;

        *self.swapchain.lock() = Some(SwapChain {
            ext: swapchain_ext,
            raw,
            images,
            acquire_fence,
            format: config.format,
            size: Extent3d { width: config.width, height: config.height, depth_or_array_layers: 1 },
            present_mode: config.present_mode,
            device: device.raw.clone(),
            acquired_index: None,
        });

        Ok(())
    }

    unsafe fn unconfigure(&mut self, device: &super::Device) {
        let mut guard = self.swapchain.lock();
        if guard.is_some() {
            let _ = crate::Device::wait_idle(device);
            *guard = None;
        }
    }

    unsafe fn acquire_texture(
        &mut self,
        timeout_ms: Option<u32>,
    ) -> (AcquireSurfaceResult, Option<Texture>) {
        let mut guard = self.swapchain.lock();
        let swapchain = match guard.as_mut() {
            Some(swapchain) => swapchain,
            None => return (AcquireSurfaceResult::Lost, None),
        };

        let timeout_ns = timeout_ms
            .map(|ms| ms as u64 * 1_000_000)
            .unwrap_or(DEFAULT_ACQUIRE_TIMEOUT_NS);

        let result = swapchain.ext.acquire_next_image(
            swapchain.raw,
            timeout_ns,
            vk::Semaphore::null(),
            swapchain.acquire_fence,
        );

        let (index, suboptimal) = match result {
            Ok(pair) => pair,
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => return (AcquireSurfaceResult::Outdated, None),
            Err(vk::Result::TIMEOUT) => return (AcquireSurfaceResult::Timeout, None),
            Err(vk::Result::ERROR_DEVICE_LOST) => return (AcquireSurfaceResult::Lost, None),
            Err(err) => return (AcquireSurfaceResult::Other, {
                log::error!(target: "GPU", "vkAcquireNextImageKHR failed: {err}");
                None
            }),
        };

        if swapchain.device.wait_for_fences(&[swapchain.acquire_fence], true, timeout_ns).is_err() {
            return (AcquireSurfaceResult::Lost, None);
        }
        let _ = swapchain.device.reset_fences(&[swapchain.acquire_fence]);

        swapchain.acquired_index = Some(index);

        let texture = Texture {
            image: swapchain.images[index as usize],
            owns_image: false,
            format: swapchain.format,
            dimension: TextureDimension::D2,
            size: swapchain.size,
            mip_level_count: 1,
            array_layer_count: 1,
            allocation: None,
            layouts: Mutex::new(vec![TextureLayout::Undefined]),
        };

        if suboptimal {
            (AcquireSurfaceResult::SuccessSuboptimal, Some(texture))
        } else {
            (AcquireSurfaceResult::SuccessOptimal, Some(texture))
        }
    }
}
