use std::ffi::CStr;

use ash::version::{DeviceV1_0, InstanceV1_0};
use ash::vk;

use gpu_types::{AdapterInfo, AdapterType, BackendType, CommandQueueType, DriverVersion, Features, Limits};

use crate::auxil::vendor::vendor_from_id;

use super::device::Device;
use super::VkResult as _;

/// A physical device plus the `ash::Instance` used to re-open a logical
/// device on it (§3 "Adapter"/§4.11 `expose`).
pub struct Adapter {
    pub(super) raw: vk::PhysicalDevice,
    pub(super) instance: ash::Instance,
    pub(super) queue_family_index: u32,
}

impl std::fmt::Debug for Adapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adapter").field("raw", &self.raw).finish()
    }
}

unsafe impl Send for Adapter {}
unsafe impl Sync for Adapter {}

impl Adapter {
    /// Describes an adapter without opening a device, unlike the D3D12-class
    /// backend: `vkGetPhysicalDeviceProperties`/`vkGetPhysicalDeviceQueueFamilyProperties`
    /// are free of the "create device to query" cost D3D12 pays.
    pub(super) fn expose(
        instance: &ash::Instance,
        raw: vk::PhysicalDevice,
    ) -> Option<crate::ExposedAdapter<super::Api>> {
        let properties = unsafe { instance.get_physical_device_properties(raw) };
        let queue_families = unsafe { instance.get_physical_device_queue_family_properties(raw) };

        let queue_family_index = queue_families.iter().position(|family| {
            family.queue_flags.contains(vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE)
        })? as u32;

        let name = unsafe { CStr::from_ptr(properties.device_name.as_ptr()) }
            .to_string_lossy()
            .into_owned();

        let adapter_type = match properties.device_type {
            vk::PhysicalDeviceType::DISCRETE_GPU => AdapterType::Discrete,
            vk::PhysicalDeviceType::INTEGRATED_GPU => AdapterType::Integrated,
            vk::PhysicalDeviceType::VIRTUAL_GPU => AdapterType::Virtual,
            vk::PhysicalDeviceType::CPU => AdapterType::Cpu,
            _ => AdapterType::Unknown,
        };

        let info = AdapterInfo {
            name,
            vendor: vendor_from_id(properties.vendor_id),
            vendor_id: properties.vendor_id,
            device_id: properties.device_id,
            driver_version: DriverVersion {
                major: vk::version_major(properties.driver_version) as u16,
                minor: vk::version_minor(properties.driver_version) as u16,
                subminor: vk::version_patch(properties.driver_version) as u16,
                build: 0,
            },
            adapter_type,
            backend: BackendType::Vulkan,
        };

        Some(crate::ExposedAdapter {
            adapter: Adapter { raw, instance: instance.clone(), queue_family_index },
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
        let priorities = [1.0f32];
        let queue_create_info = vk::DeviceQueueCreateInfo::builder()
            .queue_family_index(self.queue_family_index)
            .queue_priorities(&priorities);
        let queue_create_infos = [queue_create_info.build()];

        let extension_names = [ash::extensions::khr::Swapchain::name().as_ptr()];
        let device_features = vk::PhysicalDeviceFeatures::builder();

        let create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(&queue_create_infos)
            .enabled_extension_names(&extension_names)
            .enabled_features(&device_features);

        let raw_device = self
            .instance
            .create_device(self.raw, &create_info, None)
            .into_device_result("vkCreateDevice")?;

        let queue_raw = raw_device.get_device_queue(self.queue_family_index, 0);

        let memory_properties = self.instance.get_physical_device_memory_properties(self.raw);

        let device = Device::new(
            raw_device.clone(),
            self.instance.clone(),
            self.raw,
            memory_properties,
            *limits,
            queue_raw,
            self.queue_family_index,
        )?;
        let queue = super::command::Queue::new(raw_device, queue_raw, self.queue_family_index);

        let mut queues = [None, None, None, None];
        queues[CommandQueueType::Graphics as usize] = Some(queue);

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
        let vk_format = super::conv::map_texture_format(format);
        if vk_format == vk::Format::UNDEFINED {
            return Caps::empty();
        }
        let properties = self.instance.get_physical_device_format_properties(self.raw, vk_format);
        let linear = properties.optimal_tiling_features;

        let mut caps = Caps::empty();
        if linear.contains(vk::FormatFeatureFlags::TRANSFER_SRC) {
            caps |= Caps::COPY_SRC;
        }
        if linear.contains(vk::FormatFeatureFlags::TRANSFER_DST) {
            caps |= Caps::COPY_DST;
        }
        if linear.contains(vk::FormatFeatureFlags::SAMPLED_IMAGE) {
            caps |= Caps::SAMPLED;
        }
        if linear.contains(vk::FormatFeatureFlags::SAMPLED_IMAGE_FILTER_LINEAR) {
            caps |= Caps::SAMPLED_LINEAR;
        }
        if linear.contains(vk::FormatFeatureFlags::COLOR_ATTACHMENT) {
            caps |= Caps::COLOR_ATTACHMENT;
        }
        if linear.contains(vk::FormatFeatureFlags::COLOR_ATTACHMENT_BLEND) {
            caps |= Caps::COLOR_ATTACHMENT_BLEND;
        }
        if linear.contains(vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT) {
            caps |= Caps::DEPTH_STENCIL_ATTACHMENT;
        }
        if linear.contains(vk::FormatFeatureFlags::STORAGE_IMAGE) {
            caps |= Caps::STORAGE;
        }
        caps
    }

    unsafe fn surface_capabilities(
        &self,
        surface: &super::Surface,
    ) -> Option<crate::SurfaceCapabilities> {
        let caps = surface
            .surface_ext
            .get_physical_device_surface_capabilities(self.raw, surface.raw)
            .ok()?;
        let formats = surface
            .surface_ext
            .get_physical_device_surface_formats(self.raw, surface.raw)
            .ok()?;
        let present_modes = surface
            .surface_ext
            .get_physical_device_surface_present_modes(self.raw, surface.raw)
            .ok()?;

        Some(crate::SurfaceCapabilities {
            formats: formats
                .iter()
                .filter_map(|f| super::conv::unmap_texture_format(f.format))
                .collect(),
            min_image_count: caps.min_image_count,
            max_image_count: if caps.max_image_count == 0 { u32::MAX } else { caps.max_image_count },
            current_extent: if caps.current_extent.width == u32::MAX {
                None
            } else {
                Some(gpu_types::Extent3d {
                    width: caps.current_extent.width,
                    height: caps.current_extent.height,
                    depth_or_array_layers: 1,
                })
            },
            usage: gpu_types::TextureUsages::RENDER_TARGET | gpu_types::TextureUsages::COPY_DST,
            present_modes: present_modes
                .iter()
                .map(|&mode| super::conv::unmap_present_mode(mode))
                .collect(),
            composite_alpha_modes: vec![crate::CompositeAlphaMode::Opaque],
        })
    }
}
