//! Adapter limits and capability structs (§3 "Adapter").

/// Dimension maxima, push-constant size, workgroup limits, viewport bounds
/// and shading-rate tiers an adapter exposes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub max_texture_dimension_1d: u32,
    pub max_texture_dimension_2d: u32,
    pub max_texture_dimension_3d: u32,
    pub max_texture_array_layers: u32,
    pub max_color_attachments: u32,
    pub max_vertex_buffers: u32,
    pub max_vertex_attributes: u32,
    pub max_push_constant_size: u32,
    pub max_viewports: u32,
    pub viewport_bounds_min: f32,
    pub viewport_bounds_max: f32,
    pub max_compute_workgroup_size_x: u32,
    pub max_compute_workgroup_size_y: u32,
    pub max_compute_workgroup_size_z: u32,
    pub max_compute_workgroups_per_dimension: u32,
    pub min_uniform_buffer_offset_alignment: u32,
    pub min_storage_buffer_offset_alignment: u32,
    pub shading_rate_tier: ShadingRateTier,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_texture_dimension_1d: 8192,
            max_texture_dimension_2d: 8192,
            max_texture_dimension_3d: 2048,
            max_texture_array_layers: 2048,
            max_color_attachments: 8,
            max_vertex_buffers: 8,
            max_vertex_attributes: 16,
            max_push_constant_size: 128,
            max_viewports: 16,
            viewport_bounds_min: -32768.0,
            viewport_bounds_max: 32767.0,
            max_compute_workgroup_size_x: 1024,
            max_compute_workgroup_size_y: 1024,
            max_compute_workgroup_size_z: 64,
            max_compute_workgroups_per_dimension: 65535,
            min_uniform_buffer_offset_alignment: 256,
            min_storage_buffer_offset_alignment: 32,
            shading_rate_tier: ShadingRateTier::NotSupported,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingRateTier {
    NotSupported,
    Tier1,
    Tier2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignments {
    pub buffer_copy_offset: u64,
    pub buffer_copy_pitch: u64,
}

impl Default for Alignments {
    fn default() -> Self {
        Alignments {
            buffer_copy_offset: 512,
            buffer_copy_pitch: 256,
        }
    }
}

/// Adapter driver version, `{major, minor, subminor, build}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverVersion {
    pub major: u16,
    pub minor: u16,
    pub subminor: u16,
    pub build: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdapterInfo {
    pub name: String,
    pub vendor: crate::AdapterVendor,
    pub vendor_id: u32,
    pub device_id: u32,
    pub driver_version: DriverVersion,
    pub adapter_type: crate::AdapterType,
    pub backend: crate::BackendType,
}
