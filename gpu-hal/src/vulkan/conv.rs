//! `gpu_types`/`crate` <-> Vulkan enum conversions (mirrors `dx12::conv`).

use ash::vk;

use crate::{AddressMode, BlendFactor, BlendOperation, FilterMode, VertexFormat};
use gpu_types::{
    CompareFunction, CullMode, FillMode, FrontFace, IndexFormat, PixelFormat, PresentMode,
    PrimitiveTopology, StencilOperation,
};

/// Unlike DXGI, Vulkan natively supports ETC2 and ASTC, so this mapping
/// covers the whole compressed range instead of falling back to an
/// "unknown" sentinel the way `dx12::conv::map_texture_format` does.
pub(super) fn map_texture_format(format: PixelFormat) -> vk::Format {
    use PixelFormat::*;
    match format {
        Undefined => vk::Format::UNDEFINED,
        R8Unorm => vk::Format::R8_UNORM,
        R8Snorm => vk::Format::R8_SNORM,
        R8Uint => vk::Format::R8_UINT,
        R8Sint => vk::Format::R8_SINT,
        R16Unorm => vk::Format::R16_UNORM,
        R16Snorm => vk::Format::R16_SNORM,
        R16Uint => vk::Format::R16_UINT,
        R16Sint => vk::Format::R16_SINT,
        R16Float => vk::Format::R16_SFLOAT,
        Rg8Unorm => vk::Format::R8G8_UNORM,
        Rg8Snorm => vk::Format::R8G8_SNORM,
        Rg8Uint => vk::Format::R8G8_UINT,
        Rg8Sint => vk::Format::R8G8_SINT,
        B5g6r5Unorm => vk::Format::R5G6B5_UNORM_PACK16,
        Bgra4Unorm => vk::Format::A4B4G4R4_UNORM_PACK16_EXT,
        Bgr5a1Unorm => vk::Format::A1R5G5B5_UNORM_PACK16,
        R32Uint => vk::Format::R32_UINT,
        R32Sint => vk::Format::R32_SINT,
        R32Float => vk::Format::R32_SFLOAT,
        Rg16Unorm => vk::Format::R16G16_UNORM,
        Rg16Snorm => vk::Format::R16G16_SNORM,
        Rg16Uint => vk::Format::R16G16_UINT,
        Rg16Sint => vk::Format::R16G16_SINT,
        Rg16Float => vk::Format::R16G16_SFLOAT,
        Rgba8Unorm => vk::Format::R8G8B8A8_UNORM,
        Rgba8UnormSrgb => vk::Format::R8G8B8A8_SRGB,
        Rgba8Snorm => vk::Format::R8G8B8A8_SNORM,
        Rgba8Uint => vk::Format::R8G8B8A8_UINT,
        Rgba8Sint => vk::Format::R8G8B8A8_SINT,
        Bgra8Unorm => vk::Format::B8G8R8A8_UNORM,
        Bgra8UnormSrgb => vk::Format::B8G8R8A8_SRGB,
        Rgb9e5Ufloat => vk::Format::E5B9G9R9_UFLOAT_PACK32,
        Rgb10a2Unorm => vk::Format::A2B10G10R10_UNORM_PACK32,
        Rgb10a2Uint => vk::Format::A2B10G10R10_UINT_PACK32,
        Rg11b10Ufloat => vk::Format::B10G11R11_UFLOAT_PACK32,
        Rg32Uint => vk::Format::R32G32_UINT,
        Rg32Sint => vk::Format::R32G32_SINT,
        Rg32Float => vk::Format::R32G32_SFLOAT,
        Rgba16Unorm => vk::Format::R16G16B16A16_UNORM,
        Rgba16Snorm => vk::Format::R16G16B16A16_SNORM,
        Rgba16Uint => vk::Format::R16G16B16A16_UINT,
        Rgba16Sint => vk::Format::R16G16B16A16_SINT,
        Rgba16Float => vk::Format::R16G16B16A16_SFLOAT,
        Rgba32Uint => vk::Format::R32G32B32A32_UINT,
        Rgba32Sint => vk::Format::R32G32B32A32_SINT,
        Rgba32Float => vk::Format::R32G32B32A32_SFLOAT,
        Stencil8 => vk::Format::S8_UINT,
        Depth16Unorm => vk::Format::D16_UNORM,
        Depth24Plus => vk::Format::X8_D24_UNORM_PACK32,
        Depth24PlusStencil8 => vk::Format::D24_UNORM_S8_UINT,
        Depth32Float => vk::Format::D32_SFLOAT,
        Depth32FloatStencil8 => vk::Format::D32_SFLOAT_S8_UINT,
        Bc1RgbaUnorm => vk::Format::BC1_RGBA_UNORM_BLOCK,
        Bc1RgbaUnormSrgb => vk::Format::BC1_RGBA_SRGB_BLOCK,
        Bc2RgbaUnorm => vk::Format::BC2_UNORM_BLOCK,
        Bc2RgbaUnormSrgb => vk::Format::BC2_SRGB_BLOCK,
        Bc3RgbaUnorm => vk::Format::BC3_UNORM_BLOCK,
        Bc3RgbaUnormSrgb => vk::Format::BC3_SRGB_BLOCK,
        Bc4RUnorm => vk::Format::BC4_UNORM_BLOCK,
        Bc4RSnorm => vk::Format::BC4_SNORM_BLOCK,
        Bc5RgUnorm => vk::Format::BC5_UNORM_BLOCK,
        Bc5RgSnorm => vk::Format::BC5_SNORM_BLOCK,
        Bc6hRgbUfloat => vk::Format::BC6H_UFLOAT_BLOCK,
        Bc6hRgbFloat => vk::Format::BC6H_SFLOAT_BLOCK,
        Bc7RgbaUnorm => vk::Format::BC7_UNORM_BLOCK,
        Bc7RgbaUnormSrgb => vk::Format::BC7_SRGB_BLOCK,
        Etc2Rgb8Unorm => vk::Format::ETC2_R8G8B8_UNORM_BLOCK,
        Etc2Rgb8UnormSrgb => vk::Format::ETC2_R8G8B8_SRGB_BLOCK,
        Etc2Rgb8A1Unorm => vk::Format::ETC2_R8G8B8A1_UNORM_BLOCK,
        Etc2Rgb8A1UnormSrgb => vk::Format::ETC2_R8G8B8A1_SRGB_BLOCK,
        Etc2Rgba8Unorm => vk::Format::ETC2_R8G8B8A8_UNORM_BLOCK,
        Etc2Rgba8UnormSrgb => vk::Format::ETC2_R8G8B8A8_SRGB_BLOCK,
        EacR11Unorm => vk::Format::EAC_R11_UNORM_BLOCK,
        EacR11Snorm => vk::Format::EAC_R11_SNORM_BLOCK,
        EacRg11Unorm => vk::Format::EAC_R11G11_UNORM_BLOCK,
        EacRg11Snorm => vk::Format::EAC_R11G11_SNORM_BLOCK,
        Astc4x4Unorm => vk::Format::ASTC_4X4_UNORM_BLOCK,
        Astc4x4UnormSrgb => vk::Format::ASTC_4X4_SRGB_BLOCK,
        Astc5x4Unorm => vk::Format::ASTC_5X4_UNORM_BLOCK,
        Astc5x4UnormSrgb => vk::Format::ASTC_5X4_SRGB_BLOCK,
        Astc5x5Unorm => vk::Format::ASTC_5X5_UNORM_BLOCK,
        Astc5x5UnormSrgb => vk::Format::ASTC_5X5_SRGB_BLOCK,
        Astc6x5Unorm => vk::Format::ASTC_6X5_UNORM_BLOCK,
        Astc6x5UnormSrgb => vk::Format::ASTC_6X5_SRGB_BLOCK,
        Astc6x6Unorm => vk::Format::ASTC_6X6_UNORM_BLOCK,
        Astc6x6UnormSrgb => vk::Format::ASTC_6X6_SRGB_BLOCK,
        Astc8x5Unorm => vk::Format::ASTC_8X5_UNORM_BLOCK,
        Astc8x5UnormSrgb => vk::Format::ASTC_8X5_SRGB_BLOCK,
        Astc8x6Unorm => vk::Format::ASTC_8X6_UNORM_BLOCK,
        Astc8x6UnormSrgb => vk::Format::ASTC_8X6_SRGB_BLOCK,
        Astc8x8Unorm => vk::Format::ASTC_8X8_UNORM_BLOCK,
        Astc8x8UnormSrgb => vk::Format::ASTC_8X8_SRGB_BLOCK,
        Astc10x5Unorm => vk::Format::ASTC_10X5_UNORM_BLOCK,
        Astc10x5UnormSrgb => vk::Format::ASTC_10X5_SRGB_BLOCK,
        Astc10x6Unorm => vk::Format::ASTC_10X6_UNORM_BLOCK,
        Astc10x6UnormSrgb => vk::Format::ASTC_10X6_SRGB_BLOCK,
        Astc10x8Unorm => vk::Format::ASTC_10X8_UNORM_BLOCK,
        Astc10x8UnormSrgb => vk::Format::ASTC_10X8_SRGB_BLOCK,
        Astc10x10Unorm => vk::Format::ASTC_10X10_UNORM_BLOCK,
        Astc10x10UnormSrgb => vk::Format::ASTC_10X10_SRGB_BLOCK,
        Astc12x10Unorm => vk::Format::ASTC_12X10_UNORM_BLOCK,
        Astc12x10UnormSrgb => vk::Format::ASTC_12X10_SRGB_BLOCK,
        Astc12x12Unorm => vk::Format::ASTC_12X12_UNORM_BLOCK,
        Astc12x12UnormSrgb => vk::Format::ASTC_12X12_SRGB_BLOCK,
        // HDR ASTC decode needs `VK_EXT_texture_compression_astc_hdr`, which
        // ash 0.33 has no constants for.
        Astc4x4Hdr | Astc8x8Hdr => vk::Format::UNDEFINED,
        _Force32 => vk::Format::UNDEFINED,
    }
}

/// The typeless-cast "no sRGB" format used for swapchain buffers, matching
/// `dx12::conv::map_texture_format_nosrgb`'s rationale.
pub(super) fn map_texture_format_nosrgb(format: PixelFormat) -> vk::Format {
    map_texture_format(gpu_types::srgb_to_linear(format))
}

pub(super) fn map_index_format(format: IndexFormat) -> vk::IndexType {
    match format {
        IndexFormat::Uint16 => vk::IndexType::UINT16,
        IndexFormat::Uint32 => vk::IndexType::UINT32,
        IndexFormat::_Force32 => vk::IndexType::UINT32,
    }
}

pub(super) fn map_primitive_topology(topology: PrimitiveTopology) -> vk::PrimitiveTopology {
    match topology {
        PrimitiveTopology::PointList => vk::PrimitiveTopology::POINT_LIST,
        PrimitiveTopology::LineList => vk::PrimitiveTopology::LINE_LIST,
        PrimitiveTopology::LineStrip => vk::PrimitiveTopology::LINE_STRIP,
        PrimitiveTopology::TriangleList => vk::PrimitiveTopology::TRIANGLE_LIST,
        PrimitiveTopology::TriangleStrip => vk::PrimitiveTopology::TRIANGLE_STRIP,
        PrimitiveTopology::PatchList => vk::PrimitiveTopology::PATCH_LIST,
        PrimitiveTopology::_Force32 => vk::PrimitiveTopology::TRIANGLE_LIST,
    }
}

pub(super) fn map_polygon_mode(mode: FillMode) -> vk::PolygonMode {
    match mode {
        FillMode::Fill => vk::PolygonMode::FILL,
        FillMode::Line => vk::PolygonMode::LINE,
        FillMode::_Force32 => vk::PolygonMode::FILL,
    }
}

pub(super) fn map_cull_mode(mode: CullMode) -> vk::CullModeFlags {
    match mode {
        CullMode::None => vk::CullModeFlags::NONE,
        CullMode::Front => vk::CullModeFlags::FRONT,
        CullMode::Back => vk::CullModeFlags::BACK,
        CullMode::_Force32 => vk::CullModeFlags::NONE,
    }
}

pub(super) fn map_front_face(face: FrontFace) -> vk::FrontFace {
    match face {
        FrontFace::Ccw => vk::FrontFace::COUNTER_CLOCKWISE,
        FrontFace::Cw => vk::FrontFace::CLOCKWISE,
        FrontFace::_Force32 => vk::FrontFace::COUNTER_CLOCKWISE,
    }
}

pub(super) fn map_compare_function(func: CompareFunction) -> vk::CompareOp {
    match func {
        CompareFunction::Never => vk::CompareOp::NEVER,
        CompareFunction::Less => vk::CompareOp::LESS,
        CompareFunction::Equal => vk::CompareOp::EQUAL,
        CompareFunction::LessEqual => vk::CompareOp::LESS_OR_EQUAL,
        CompareFunction::Greater => vk::CompareOp::GREATER,
        CompareFunction::NotEqual => vk::CompareOp::NOT_EQUAL,
        CompareFunction::GreaterEqual => vk::CompareOp::GREATER_OR_EQUAL,
        CompareFunction::Always => vk::CompareOp::ALWAYS,
        CompareFunction::_Force32 => vk::CompareOp::ALWAYS,
    }
}

pub(super) fn map_stencil_op(op: StencilOperation) -> vk::StencilOp {
    match op {
        StencilOperation::Keep => vk::StencilOp::KEEP,
        StencilOperation::Zero => vk::StencilOp::ZERO,
        StencilOperation::Replace => vk::StencilOp::REPLACE,
        StencilOperation::Invert => vk::StencilOp::INVERT,
        StencilOperation::IncrementClamp => vk::StencilOp::INCREMENT_AND_CLAMP,
        StencilOperation::DecrementClamp => vk::StencilOp::DECREMENT_AND_CLAMP,
        StencilOperation::IncrementWrap => vk::StencilOp::INCREMENT_AND_WRAP,
        StencilOperation::DecrementWrap => vk::StencilOp::DECREMENT_AND_WRAP,
        StencilOperation::_Force32 => vk::StencilOp::KEEP,
    }
}

pub(super) fn map_blend_factor(factor: BlendFactor) -> vk::BlendFactor {
    match factor {
        BlendFactor::Zero => vk::BlendFactor::ZERO,
        BlendFactor::One => vk::BlendFactor::ONE,
        BlendFactor::Src => vk::BlendFactor::SRC_COLOR,
        BlendFactor::OneMinusSrc => vk::BlendFactor::ONE_MINUS_SRC_COLOR,
        BlendFactor::SrcAlpha => vk::BlendFactor::SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => vk::BlendFactor::ONE_MINUS_SRC_ALPHA,
        BlendFactor::Dst => vk::BlendFactor::DST_COLOR,
        BlendFactor::OneMinusDst => vk::BlendFactor::ONE_MINUS_DST_COLOR,
        BlendFactor::DstAlpha => vk::BlendFactor::DST_ALPHA,
        BlendFactor::OneMinusDstAlpha => vk::BlendFactor::ONE_MINUS_DST_ALPHA,
    }
}

pub(super) fn map_blend_op(op: BlendOperation) -> vk::BlendOp {
    match op {
        BlendOperation::Add => vk::BlendOp::ADD,
        BlendOperation::Subtract => vk::BlendOp::SUBTRACT,
        BlendOperation::ReverseSubtract => vk::BlendOp::REVERSE_SUBTRACT,
        BlendOperation::Min => vk::BlendOp::MIN,
        BlendOperation::Max => vk::BlendOp::MAX,
    }
}

pub(super) fn map_blend_component(
    component: crate::BlendComponent,
) -> (vk::BlendFactor, vk::BlendFactor, vk::BlendOp) {
    (
        map_blend_factor(component.src_factor),
        map_blend_factor(component.dst_factor),
        map_blend_op(component.operation),
    )
}

pub(super) fn map_blend_attachments(
    targets: &[crate::ColorTargetState],
) -> Vec<vk::PipelineColorBlendAttachmentState> {
    targets
        .iter()
        .map(|target| match target.blend {
            Some(blend) => {
                let (src_color, dst_color, op_color) = map_blend_component(blend.color);
                let (src_alpha, dst_alpha, op_alpha) = map_blend_component(blend.alpha);
                vk::PipelineColorBlendAttachmentState::builder()
                    .blend_enable(true)
                    .src_color_blend_factor(src_color)
                    .dst_color_blend_factor(dst_color)
                    .color_blend_op(op_color)
                    .src_alpha_blend_factor(src_alpha)
                    .dst_alpha_blend_factor(dst_alpha)
                    .alpha_blend_op(op_alpha)
                    .color_write_mask(vk::ColorComponentFlags::from_raw(target.write_mask.bits() as u32))
                    .build()
            }
            None => vk::PipelineColorBlendAttachmentState::builder()
                .blend_enable(false)
                .color_write_mask(vk::ColorComponentFlags::from_raw(target.write_mask.bits() as u32))
                .build(),
        })
        .collect()
}

pub(super) fn map_rasterizer_state(
    state: &crate::RasterizerState,
) -> vk::PipelineRasterizationStateCreateInfo {
    vk::PipelineRasterizationStateCreateInfo::builder()
        .depth_clamp_enable(!state.depth_clip_enabled)
        .rasterizer_discard_enable(false)
        .polygon_mode(map_polygon_mode(state.fill_mode))
        .cull_mode(map_cull_mode(state.cull_mode))
        .front_face(map_front_face(state.front_face))
        .depth_bias_enable(false)
        .line_width(1.0)
        .build()
}

fn map_stencil_face(face: crate::StencilFaceState) -> vk::StencilOpState {
    vk::StencilOpState::builder()
        .fail_op(map_stencil_op(face.fail_op))
        .depth_fail_op(map_stencil_op(face.depth_fail_op))
        .pass_op(map_stencil_op(face.pass_op))
        .compare_op(map_compare_function(face.compare))
        .build()
}

pub(super) fn map_depth_stencil_state(
    state: crate::DepthStencilState,
) -> vk::PipelineDepthStencilStateCreateInfo {
    vk::PipelineDepthStencilStateCreateInfo::builder()
        .depth_test_enable(true)
        .depth_write_enable(state.depth_write_enabled)
        .depth_compare_op(map_compare_function(state.depth_compare))
        .stencil_test_enable(state.stencil_read_mask != 0 || state.stencil_write_mask != 0)
        .front(vk::StencilOpState {
            compare_mask: state.stencil_read_mask,
            write_mask: state.stencil_write_mask,
            ..map_stencil_face(state.stencil_front)
        })
        .back(vk::StencilOpState {
            compare_mask: state.stencil_read_mask,
            write_mask: state.stencil_write_mask,
            ..map_stencil_face(state.stencil_back)
        })
        .build()
}

pub(super) fn map_present_mode(mode: PresentMode) -> vk::PresentModeKHR {
    match mode {
        PresentMode::Fifo => vk::PresentModeKHR::FIFO,
        PresentMode::FifoRelaxed => vk::PresentModeKHR::FIFO_RELAXED,
        PresentMode::Immediate => vk::PresentModeKHR::IMMEDIATE,
        PresentMode::Mailbox => vk::PresentModeKHR::MAILBOX,
        PresentMode::_Force32 => vk::PresentModeKHR::FIFO,
    }
}

pub(super) fn map_composite_alpha_mode(mode: crate::CompositeAlphaMode) -> vk::CompositeAlphaFlagsKHR {
    match mode {
        crate::CompositeAlphaMode::Opaque => vk::CompositeAlphaFlagsKHR::OPAQUE,
        crate::CompositeAlphaMode::PreMultiplied => vk::CompositeAlphaFlagsKHR::PRE_MULTIPLIED,
        crate::CompositeAlphaMode::PostMultiplied => vk::CompositeAlphaFlagsKHR::POST_MULTIPLIED,
    }
}

/// Every legal `TextureLayout` (§4.6) to its Vulkan image layout plus the
/// access/stage pair `auxil::barrier` needs to build a full
/// `vk::ImageMemoryBarrier`.
pub(super) fn map_texture_layout(
    layout: gpu_types::TextureLayout,
) -> (vk::ImageLayout, vk::AccessFlags, vk::PipelineStageFlags) {
    use gpu_types::TextureLayout::*;
    match layout {
        Undefined => (
            vk::ImageLayout::UNDEFINED,
            vk::AccessFlags::empty(),
            vk::PipelineStageFlags::TOP_OF_PIPE,
        ),
        CopySource => (
            vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
            vk::AccessFlags::TRANSFER_READ,
            vk::PipelineStageFlags::TRANSFER,
        ),
        CopyDest => (
            vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            vk::AccessFlags::TRANSFER_WRITE,
            vk::PipelineStageFlags::TRANSFER,
        ),
        ResolveSource => (
            vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
            vk::AccessFlags::TRANSFER_READ,
            vk::PipelineStageFlags::TRANSFER,
        ),
        ResolveDest => (
            vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            vk::AccessFlags::TRANSFER_WRITE,
            vk::PipelineStageFlags::TRANSFER,
        ),
        ShaderResource => (
            vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
            vk::AccessFlags::SHADER_READ,
            vk::PipelineStageFlags::FRAGMENT_SHADER | vk::PipelineStageFlags::COMPUTE_SHADER,
        ),
        UnorderedAccess => (
            vk::ImageLayout::GENERAL,
            vk::AccessFlags::SHADER_READ | vk::AccessFlags::SHADER_WRITE,
            vk::PipelineStageFlags::FRAGMENT_SHADER | vk::PipelineStageFlags::COMPUTE_SHADER,
        ),
        RenderTarget => (
            vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
            vk::AccessFlags::COLOR_ATTACHMENT_READ | vk::AccessFlags::COLOR_ATTACHMENT_WRITE,
            vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
        ),
        DepthWrite => (
            vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
            vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ
                | vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE,
            vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS | vk::PipelineStageFlags::LATE_FRAGMENT_TESTS,
        ),
        DepthRead => (
            vk::ImageLayout::DEPTH_STENCIL_READ_ONLY_OPTIMAL,
            vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ,
            vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS,
        ),
        Present => (
            vk::ImageLayout::PRESENT_SRC_KHR,
            vk::AccessFlags::empty(),
            vk::PipelineStageFlags::BOTTOM_OF_PIPE,
        ),
        ShadingRateSurface => (
            vk::ImageLayout::GENERAL,
            vk::AccessFlags::empty(),
            vk::PipelineStageFlags::TOP_OF_PIPE,
        ),
        _Force32 => (
            vk::ImageLayout::UNDEFINED,
            vk::AccessFlags::empty(),
            vk::PipelineStageFlags::TOP_OF_PIPE,
        ),
    }
}

pub(super) fn map_vertex_format(format: VertexFormat) -> vk::Format {
    match format {
        VertexFormat::Float32 => vk::Format::R32_SFLOAT,
        VertexFormat::Float32x2 => vk::Format::R32G32_SFLOAT,
        VertexFormat::Float32x3 => vk::Format::R32G32B32_SFLOAT,
        VertexFormat::Float32x4 => vk::Format::R32G32B32A32_SFLOAT,
        VertexFormat::Uint32 => vk::Format::R32_UINT,
        VertexFormat::Uint32x2 => vk::Format::R32G32_UINT,
        VertexFormat::Uint32x3 => vk::Format::R32G32B32_UINT,
        VertexFormat::Uint32x4 => vk::Format::R32G32B32A32_UINT,
        VertexFormat::Sint32 => vk::Format::R32_SINT,
        VertexFormat::Unorm8x4 => vk::Format::R8G8B8A8_UNORM,
    }
}

pub(super) fn map_address_mode(mode: AddressMode) -> vk::SamplerAddressMode {
    match mode {
        AddressMode::ClampToEdge => vk::SamplerAddressMode::CLAMP_TO_EDGE,
        AddressMode::Repeat => vk::SamplerAddressMode::REPEAT,
        AddressMode::MirrorRepeat => vk::SamplerAddressMode::MIRRORED_REPEAT,
        AddressMode::ClampToBorder => vk::SamplerAddressMode::CLAMP_TO_BORDER,
    }
}

/// Vulkan has distinct min/mag/mip filter enums rather than D3D12's single
/// baked `D3D12_FILTER`; anisotropic filtering is still not represented as
/// its own [`FilterMode`] here.
pub(super) fn map_filter(mode: FilterMode) -> vk::Filter {
    match mode {
        FilterMode::Nearest => vk::Filter::NEAREST,
        FilterMode::Linear => vk::Filter::LINEAR,
    }
}

pub(super) fn map_mipmap_filter(mode: FilterMode) -> vk::SamplerMipmapMode {
    match mode {
        FilterMode::Nearest => vk::SamplerMipmapMode::NEAREST,
        FilterMode::Linear => vk::SamplerMipmapMode::LINEAR,
    }
}

/// The inverse of [`map_texture_format`], used when reporting the surface
/// formats a physical device actually offers (§4.10): only the small set of
/// swapchain-legal formats needs covering here.
pub(super) fn unmap_texture_format(format: vk::Format) -> Option<PixelFormat> {
    match format {
        vk::Format::B8G8R8A8_UNORM => Some(PixelFormat::Bgra8Unorm),
        vk::Format::B8G8R8A8_SRGB => Some(PixelFormat::Bgra8UnormSrgb),
        vk::Format::R8G8B8A8_UNORM => Some(PixelFormat::Rgba8Unorm),
        vk::Format::R8G8B8A8_SRGB => Some(PixelFormat::Rgba8UnormSrgb),
        vk::Format::A2B10G10R10_UNORM_PACK32 => Some(PixelFormat::Rgb10a2Unorm),
        _ => None,
    }
}

pub(super) fn unmap_present_mode(mode: vk::PresentModeKHR) -> PresentMode {
    match mode {
        vk::PresentModeKHR::FIFO => PresentMode::Fifo,
        vk::PresentModeKHR::FIFO_RELAXED => PresentMode::FifoRelaxed,
        vk::PresentModeKHR::IMMEDIATE => PresentMode::Immediate,
        vk::PresentModeKHR::MAILBOX => PresentMode::Mailbox,
        _ => PresentMode::Fifo,
    }
}
