//! `gpu_types` <-> D3D12/DXGI native enum conversions.

use windows::Win32::Graphics::{Direct3D12, Dxgi};

use crate::{AddressMode, BlendFactor, BlendOperation, FilterMode, VertexFormat};
use gpu_types::{
    CompareFunction, CullMode, FillMode, FrontFace, IndexFormat, PixelFormat, PresentMode,
    PrimitiveTopology, StencilOperation,
};

/// DXGI has no ETC2/ASTC; mapping those yields `DXGI_FORMAT_UNKNOWN` and the
/// adapter reports empty [`crate::TextureFormatCapabilities`] for them, same
/// as this class of hardware genuinely does.
pub(super) fn map_texture_format(format: PixelFormat) -> Dxgi::DXGI_FORMAT {
    use PixelFormat::*;
    match format {
        R8Unorm => Dxgi::DXGI_FORMAT_R8_UNORM,
        R8Snorm => Dxgi::DXGI_FORMAT_R8_SNORM,
        R8Uint => Dxgi::DXGI_FORMAT_R8_UINT,
        R8Sint => Dxgi::DXGI_FORMAT_R8_SINT,
        R16Unorm => Dxgi::DXGI_FORMAT_R16_UNORM,
        R16Snorm => Dxgi::DXGI_FORMAT_R16_SNORM,
        R16Uint => Dxgi::DXGI_FORMAT_R16_UINT,
        R16Sint => Dxgi::DXGI_FORMAT_R16_SINT,
        R16Float => Dxgi::DXGI_FORMAT_R16_FLOAT,
        Rg8Unorm => Dxgi::DXGI_FORMAT_R8G8_UNORM,
        Rg8Snorm => Dxgi::DXGI_FORMAT_R8G8_SNORM,
        Rg8Uint => Dxgi::DXGI_FORMAT_R8G8_UINT,
        Rg8Sint => Dxgi::DXGI_FORMAT_R8G8_SINT,
        B5g6r5Unorm => Dxgi::DXGI_FORMAT_B5G6R5_UNORM,
        Bgr5a1Unorm => Dxgi::DXGI_FORMAT_B5G5R5A1_UNORM,
        R32Uint => Dxgi::DXGI_FORMAT_R32_UINT,
        R32Sint => Dxgi::DXGI_FORMAT_R32_SINT,
        R32Float => Dxgi::DXGI_FORMAT_R32_FLOAT,
        Rg16Unorm => Dxgi::DXGI_FORMAT_R16G16_UNORM,
        Rg16Snorm => Dxgi::DXGI_FORMAT_R16G16_SNORM,
        Rg16Uint => Dxgi::DXGI_FORMAT_R16G16_UINT,
        Rg16Sint => Dxgi::DXGI_FORMAT_R16G16_SINT,
        Rg16Float => Dxgi::DXGI_FORMAT_R16G16_FLOAT,
        Rgba8Unorm => Dxgi::DXGI_FORMAT_R8G8B8A8_UNORM,
        Rgba8UnormSrgb => Dxgi::DXGI_FORMAT_R8G8B8A8_UNORM_SRGB,
        Rgba8Snorm => Dxgi::DXGI_FORMAT_R8G8B8A8_SNORM,
        Rgba8Uint => Dxgi::DXGI_FORMAT_R8G8B8A8_UINT,
        Rgba8Sint => Dxgi::DXGI_FORMAT_R8G8B8A8_SINT,
        Bgra8Unorm => Dxgi::DXGI_FORMAT_B8G8R8A8_UNORM,
        Bgra8UnormSrgb => Dxgi::DXGI_FORMAT_B8G8R8A8_UNORM_SRGB,
        Rgb9e5Ufloat => Dxgi::DXGI_FORMAT_R9G9B9E5_SHAREDEXP,
        Rgb10a2Unorm => Dxgi::DXGI_FORMAT_R10G10B10A2_UNORM,
        Rgb10a2Uint => Dxgi::DXGI_FORMAT_R10G10B10A2_UINT,
        Rg11b10Ufloat => Dxgi::DXGI_FORMAT_R11G11B10_FLOAT,
        Rg32Uint => Dxgi::DXGI_FORMAT_R32G32_UINT,
        Rg32Sint => Dxgi::DXGI_FORMAT_R32G32_SINT,
        Rg32Float => Dxgi::DXGI_FORMAT_R32G32_FLOAT,
        Rgba16Unorm => Dxgi::DXGI_FORMAT_R16G16B16A16_UNORM,
        Rgba16Snorm => Dxgi::DXGI_FORMAT_R16G16B16A16_SNORM,
        Rgba16Uint => Dxgi::DXGI_FORMAT_R16G16B16A16_UINT,
        Rgba16Sint => Dxgi::DXGI_FORMAT_R16G16B16A16_SINT,
        Rgba16Float => Dxgi::DXGI_FORMAT_R16G16B16A16_FLOAT,
        Rgba32Uint => Dxgi::DXGI_FORMAT_R32G32B32A32_UINT,
        Rgba32Sint => Dxgi::DXGI_FORMAT_R32G32B32A32_SINT,
        Rgba32Float => Dxgi::DXGI_FORMAT_R32G32B32A32_FLOAT,
        Stencil8 => Dxgi::DXGI_FORMAT_D24_UNORM_S8_UINT,
        Depth16Unorm => Dxgi::DXGI_FORMAT_D16_UNORM,
        Depth24Plus => Dxgi::DXGI_FORMAT_D24_UNORM_S8_UINT,
        Depth24PlusStencil8 => Dxgi::DXGI_FORMAT_D24_UNORM_S8_UINT,
        Depth32Float => Dxgi::DXGI_FORMAT_D32_FLOAT,
        Depth32FloatStencil8 => Dxgi::DXGI_FORMAT_D32_FLOAT_S8X24_UINT,
        Bc1RgbaUnorm => Dxgi::DXGI_FORMAT_BC1_UNORM,
        Bc1RgbaUnormSrgb => Dxgi::DXGI_FORMAT_BC1_UNORM_SRGB,
        Bc2RgbaUnorm => Dxgi::DXGI_FORMAT_BC2_UNORM,
        Bc2RgbaUnormSrgb => Dxgi::DXGI_FORMAT_BC2_UNORM_SRGB,
        Bc3RgbaUnorm => Dxgi::DXGI_FORMAT_BC3_UNORM,
        Bc3RgbaUnormSrgb => Dxgi::DXGI_FORMAT_BC3_UNORM_SRGB,
        Bc4RUnorm => Dxgi::DXGI_FORMAT_BC4_UNORM,
        Bc4RSnorm => Dxgi::DXGI_FORMAT_BC4_SNORM,
        Bc5RgUnorm => Dxgi::DXGI_FORMAT_BC5_UNORM,
        Bc5RgSnorm => Dxgi::DXGI_FORMAT_BC5_SNORM,
        Bc6hRgbUfloat => Dxgi::DXGI_FORMAT_BC6H_UF16,
        Bc6hRgbFloat => Dxgi::DXGI_FORMAT_BC6H_SF16,
        Bc7RgbaUnorm => Dxgi::DXGI_FORMAT_BC7_UNORM,
        Bc7RgbaUnormSrgb => Dxgi::DXGI_FORMAT_BC7_UNORM_SRGB,
        Bgra4Unorm | Undefined | _Force32 => Dxgi::DXGI_FORMAT_UNKNOWN,
        _ => Dxgi::DXGI_FORMAT_UNKNOWN,
    }
}

/// The typeless-cast "no sRGB" format used for swapchain buffers so the
/// presentation engine always sees a linear format (§4.10).
pub(super) fn map_texture_format_nosrgb(format: PixelFormat) -> Dxgi::DXGI_FORMAT {
    map_texture_format(gpu_types::srgb_to_linear(format))
}

pub(super) fn map_index_format(format: IndexFormat) -> Dxgi::DXGI_FORMAT {
    match format {
        IndexFormat::Uint16 => Dxgi::DXGI_FORMAT_R16_UINT,
        IndexFormat::Uint32 => Dxgi::DXGI_FORMAT_R32_UINT,
        IndexFormat::_Force32 => Dxgi::DXGI_FORMAT_R32_UINT,
    }
}

pub(super) fn map_primitive_topology(topology: PrimitiveTopology) -> Direct3D12::D3D_PRIMITIVE_TOPOLOGY {
    match topology {
        PrimitiveTopology::PointList => Direct3D12::D3D_PRIMITIVE_TOPOLOGY_POINTLIST,
        PrimitiveTopology::LineList => Direct3D12::D3D_PRIMITIVE_TOPOLOGY_LINELIST,
        PrimitiveTopology::LineStrip => Direct3D12::D3D_PRIMITIVE_TOPOLOGY_LINESTRIP,
        PrimitiveTopology::TriangleList => Direct3D12::D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST,
        PrimitiveTopology::TriangleStrip => Direct3D12::D3D_PRIMITIVE_TOPOLOGY_TRIANGLESTRIP,
        PrimitiveTopology::PatchList => Direct3D12::D3D_PRIMITIVE_TOPOLOGY_1_CONTROL_POINT_PATCHLIST,
        PrimitiveTopology::_Force32 => Direct3D12::D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST,
    }
}

pub(super) fn map_topology_type(topology: PrimitiveTopology) -> Direct3D12::D3D12_PRIMITIVE_TOPOLOGY_TYPE {
    match topology {
        PrimitiveTopology::PointList => Direct3D12::D3D12_PRIMITIVE_TOPOLOGY_TYPE_POINT,
        PrimitiveTopology::LineList | PrimitiveTopology::LineStrip => {
            Direct3D12::D3D12_PRIMITIVE_TOPOLOGY_TYPE_LINE
        }
        PrimitiveTopology::TriangleList | PrimitiveTopology::TriangleStrip => {
            Direct3D12::D3D12_PRIMITIVE_TOPOLOGY_TYPE_TRIANGLE
        }
        PrimitiveTopology::PatchList => Direct3D12::D3D12_PRIMITIVE_TOPOLOGY_TYPE_PATCH,
        PrimitiveTopology::_Force32 => Direct3D12::D3D12_PRIMITIVE_TOPOLOGY_TYPE_TRIANGLE,
    }
}

pub(super) fn map_fill_mode(mode: FillMode) -> Direct3D12::D3D12_FILL_MODE {
    match mode {
        FillMode::Fill => Direct3D12::D3D12_FILL_MODE_SOLID,
        FillMode::Line => Direct3D12::D3D12_FILL_MODE_WIREFRAME,
        FillMode::_Force32 => Direct3D12::D3D12_FILL_MODE_SOLID,
    }
}

pub(super) fn map_cull_mode(mode: CullMode) -> Direct3D12::D3D12_CULL_MODE {
    match mode {
        CullMode::None => Direct3D12::D3D12_CULL_MODE_NONE,
        CullMode::Front => Direct3D12::D3D12_CULL_MODE_FRONT,
        CullMode::Back => Direct3D12::D3D12_CULL_MODE_BACK,
        CullMode::_Force32 => Direct3D12::D3D12_CULL_MODE_NONE,
    }
}

pub(super) fn map_front_face(face: FrontFace) -> bool {
    // `true` means counter-clockwise, matching D3D12_RASTERIZER_DESC::FrontCounterClockwise.
    matches!(face, FrontFace::Ccw)
}

pub(super) fn map_compare_function(func: CompareFunction) -> Direct3D12::D3D12_COMPARISON_FUNC {
    match func {
        CompareFunction::Never => Direct3D12::D3D12_COMPARISON_FUNC_NEVER,
        CompareFunction::Less => Direct3D12::D3D12_COMPARISON_FUNC_LESS,
        CompareFunction::Equal => Direct3D12::D3D12_COMPARISON_FUNC_EQUAL,
        CompareFunction::LessEqual => Direct3D12::D3D12_COMPARISON_FUNC_LESS_EQUAL,
        CompareFunction::Greater => Direct3D12::D3D12_COMPARISON_FUNC_GREATER,
        CompareFunction::NotEqual => Direct3D12::D3D12_COMPARISON_FUNC_NOT_EQUAL,
        CompareFunction::GreaterEqual => Direct3D12::D3D12_COMPARISON_FUNC_GREATER_EQUAL,
        CompareFunction::Always => Direct3D12::D3D12_COMPARISON_FUNC_ALWAYS,
        CompareFunction::_Force32 => Direct3D12::D3D12_COMPARISON_FUNC_ALWAYS,
    }
}

pub(super) fn map_stencil_op(op: StencilOperation) -> Direct3D12::D3D12_STENCIL_OP {
    match op {
        StencilOperation::Keep => Direct3D12::D3D12_STENCIL_OP_KEEP,
        StencilOperation::Zero => Direct3D12::D3D12_STENCIL_OP_ZERO,
        StencilOperation::Replace => Direct3D12::D3D12_STENCIL_OP_REPLACE,
        StencilOperation::Invert => Direct3D12::D3D12_STENCIL_OP_INVERT,
        StencilOperation::IncrementClamp => Direct3D12::D3D12_STENCIL_OP_INCR_SAT,
        StencilOperation::DecrementClamp => Direct3D12::D3D12_STENCIL_OP_DECR_SAT,
        StencilOperation::IncrementWrap => Direct3D12::D3D12_STENCIL_OP_INCR,
        StencilOperation::DecrementWrap => Direct3D12::D3D12_STENCIL_OP_DECR,
        StencilOperation::_Force32 => Direct3D12::D3D12_STENCIL_OP_KEEP,
    }
}

pub(super) fn map_blend_factor(factor: BlendFactor) -> Direct3D12::D3D12_BLEND {
    match factor {
        BlendFactor::Zero => Direct3D12::D3D12_BLEND_ZERO,
        BlendFactor::One => Direct3D12::D3D12_BLEND_ONE,
        BlendFactor::Src => Direct3D12::D3D12_BLEND_SRC_COLOR,
        BlendFactor::OneMinusSrc => Direct3D12::D3D12_BLEND_INV_SRC_COLOR,
        BlendFactor::SrcAlpha => Direct3D12::D3D12_BLEND_SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => Direct3D12::D3D12_BLEND_INV_SRC_ALPHA,
        BlendFactor::Dst => Direct3D12::D3D12_BLEND_DEST_COLOR,
        BlendFactor::OneMinusDst => Direct3D12::D3D12_BLEND_INV_DEST_COLOR,
        BlendFactor::DstAlpha => Direct3D12::D3D12_BLEND_DEST_ALPHA,
        BlendFactor::OneMinusDstAlpha => Direct3D12::D3D12_BLEND_INV_DEST_ALPHA,
    }
}

pub(super) fn map_blend_op(op: BlendOperation) -> Direct3D12::D3D12_BLEND_OP {
    match op {
        BlendOperation::Add => Direct3D12::D3D12_BLEND_OP_ADD,
        BlendOperation::Subtract => Direct3D12::D3D12_BLEND_OP_SUBTRACT,
        BlendOperation::ReverseSubtract => Direct3D12::D3D12_BLEND_OP_REV_SUBTRACT,
        BlendOperation::Min => Direct3D12::D3D12_BLEND_OP_MIN,
        BlendOperation::Max => Direct3D12::D3D12_BLEND_OP_MAX,
    }
}

pub(super) fn map_present_mode(mode: PresentMode) -> (u32, u32) {
    match mode {
        PresentMode::Immediate => (0, Dxgi::DXGI_PRESENT_ALLOW_TEARING),
        PresentMode::Fifo | PresentMode::FifoRelaxed => (1, 0),
        PresentMode::Mailbox => (1, 0),
        PresentMode::_Force32 => (1, 0),
    }
}

pub(super) fn map_composite_alpha_mode(mode: crate::CompositeAlphaMode) -> Dxgi::DXGI_ALPHA_MODE {
    match mode {
        crate::CompositeAlphaMode::Opaque => Dxgi::DXGI_ALPHA_MODE_IGNORE,
        crate::CompositeAlphaMode::PreMultiplied => Dxgi::DXGI_ALPHA_MODE_PREMULTIPLIED,
        crate::CompositeAlphaMode::PostMultiplied => Dxgi::DXGI_ALPHA_MODE_STRAIGHT,
    }
}

/// Every legal `TextureLayout` (§4.6) to its D3D12 resource-states bitmask.
/// `UnorderedAccess` maps to the state that also triggers the same-layout
/// UAV-barrier special case handled one level up in `auxil::barrier`.
pub(super) fn map_texture_layout(layout: gpu_types::TextureLayout) -> Direct3D12::D3D12_RESOURCE_STATES {
    use gpu_types::TextureLayout::*;
    match layout {
        Undefined => Direct3D12::D3D12_RESOURCE_STATE_COMMON,
        CopySource => Direct3D12::D3D12_RESOURCE_STATE_COPY_SOURCE,
        CopyDest => Direct3D12::D3D12_RESOURCE_STATE_COPY_DEST,
        ResolveSource => Direct3D12::D3D12_RESOURCE_STATE_RESOLVE_SOURCE,
        ResolveDest => Direct3D12::D3D12_RESOURCE_STATE_RESOLVE_DEST,
        ShaderResource => Direct3D12::D3D12_RESOURCE_STATE_PIXEL_SHADER_RESOURCE
            | Direct3D12::D3D12_RESOURCE_STATE_NON_PIXEL_SHADER_RESOURCE,
        UnorderedAccess => Direct3D12::D3D12_RESOURCE_STATE_UNORDERED_ACCESS,
        RenderTarget => Direct3D12::D3D12_RESOURCE_STATE_RENDER_TARGET,
        DepthWrite => Direct3D12::D3D12_RESOURCE_STATE_DEPTH_WRITE,
        DepthRead => Direct3D12::D3D12_RESOURCE_STATE_DEPTH_READ,
        Present => Direct3D12::D3D12_RESOURCE_STATE_PRESENT,
        ShadingRateSurface => Direct3D12::D3D12_RESOURCE_STATE_SHADING_RATE_SOURCE,
        _Force32 => Direct3D12::D3D12_RESOURCE_STATE_COMMON,
    }
}

pub(super) fn map_vertex_format(format: VertexFormat) -> Dxgi::DXGI_FORMAT {
    match format {
        VertexFormat::Float32 => Dxgi::DXGI_FORMAT_R32_FLOAT,
        VertexFormat::Float32x2 => Dxgi::DXGI_FORMAT_R32G32_FLOAT,
        VertexFormat::Float32x3 => Dxgi::DXGI_FORMAT_R32G32B32_FLOAT,
        VertexFormat::Float32x4 => Dxgi::DXGI_FORMAT_R32G32B32A32_FLOAT,
        VertexFormat::Uint32 => Dxgi::DXGI_FORMAT_R32_UINT,
        VertexFormat::Uint32x2 => Dxgi::DXGI_FORMAT_R32G32_UINT,
        VertexFormat::Uint32x3 => Dxgi::DXGI_FORMAT_R32G32B32_UINT,
        VertexFormat::Uint32x4 => Dxgi::DXGI_FORMAT_R32G32B32A32_UINT,
        VertexFormat::Sint32 => Dxgi::DXGI_FORMAT_R32_SINT,
        VertexFormat::Unorm8x4 => Dxgi::DXGI_FORMAT_R8G8B8A8_UNORM,
    }
}

pub(super) fn map_address_mode(mode: AddressMode) -> Direct3D12::D3D12_TEXTURE_ADDRESS_MODE {
    match mode {
        AddressMode::ClampToEdge => Direct3D12::D3D12_TEXTURE_ADDRESS_MODE_CLAMP,
        AddressMode::Repeat => Direct3D12::D3D12_TEXTURE_ADDRESS_MODE_WRAP,
        AddressMode::MirrorRepeat => Direct3D12::D3D12_TEXTURE_ADDRESS_MODE_MIRROR,
        AddressMode::ClampToBorder => Direct3D12::D3D12_TEXTURE_ADDRESS_MODE_BORDER,
    }
}

/// D3D12 bakes min/mag/mip filtering and comparison into a single enum;
/// only the nearest/linear/comparison combinations spec §4.11 exposes are
/// represented (anisotropic filtering is not a distinct [`FilterMode`]).
pub(super) fn map_filter(
    min: FilterMode,
    mag: FilterMode,
    mip: FilterMode,
    comparison: bool,
) -> Direct3D12::D3D12_FILTER {
    let all_linear = min == FilterMode::Linear && mag == FilterMode::Linear && mip == FilterMode::Linear;
    match (all_linear, comparison) {
        (true, false) => Direct3D12::D3D12_FILTER_MIN_MAG_MIP_LINEAR,
        (true, true) => Direct3D12::D3D12_FILTER_COMPARISON_MIN_MAG_MIP_LINEAR,
        (false, false) => Direct3D12::D3D12_FILTER_MIN_MAG_MIP_POINT,
        (false, true) => Direct3D12::D3D12_FILTER_COMPARISON_MIN_MAG_MIP_POINT,
    }
}

pub(super) fn map_blend_component(component: crate::BlendComponent) -> (Direct3D12::D3D12_BLEND, Direct3D12::D3D12_BLEND, Direct3D12::D3D12_BLEND_OP) {
    (
        map_blend_factor(component.src_factor),
        map_blend_factor(component.dst_factor),
        map_blend_op(component.operation),
    )
}

pub(super) fn map_blend_state(targets: &[crate::ColorTargetState]) -> Direct3D12::D3D12_BLEND_DESC {
    let mut render_target = [Direct3D12::D3D12_RENDER_TARGET_BLEND_DESC::default(); 8];
    for (slot, target) in targets.iter().enumerate().take(8) {
        render_target[slot] = match target.blend {
            Some(blend) => {
                let (src_color, dst_color, op_color) = map_blend_component(blend.color);
                let (src_alpha, dst_alpha, op_alpha) = map_blend_component(blend.alpha);
                Direct3D12::D3D12_RENDER_TARGET_BLEND_DESC {
                    BlendEnable: true.into(),
                    LogicOpEnable: false.into(),
                    SrcBlend: src_color,
                    DestBlend: dst_color,
                    BlendOp: op_color,
                    SrcBlendAlpha: src_alpha,
                    DestBlendAlpha: dst_alpha,
                    BlendOpAlpha: op_alpha,
                    LogicOp: Direct3D12::D3D12_LOGIC_OP_NOOP,
                    RenderTargetWriteMask: target.write_mask.bits(),
                }
            }
            None => Direct3D12::D3D12_RENDER_TARGET_BLEND_DESC {
                BlendEnable: false.into(),
                LogicOpEnable: false.into(),
                SrcBlend: Direct3D12::D3D12_BLEND_ONE,
                DestBlend: Direct3D12::D3D12_BLEND_ZERO,
                BlendOp: Direct3D12::D3D12_BLEND_OP_ADD,
                SrcBlendAlpha: Direct3D12::D3D12_BLEND_ONE,
                DestBlendAlpha: Direct3D12::D3D12_BLEND_ZERO,
                BlendOpAlpha: Direct3D12::D3D12_BLEND_OP_ADD,
                LogicOp: Direct3D12::D3D12_LOGIC_OP_NOOP,
                RenderTargetWriteMask: target.write_mask.bits(),
            },
        };
    }
    Direct3D12::D3D12_BLEND_DESC {
        AlphaToCoverageEnable: false.into(),
        IndependentBlendEnable: true.into(),
        RenderTarget: render_target,
    }
}

pub(super) fn map_rasterizer_state(state: &crate::RasterizerState) -> Direct3D12::D3D12_RASTERIZER_DESC {
    Direct3D12::D3D12_RASTERIZER_DESC {
        FillMode: map_fill_mode(state.fill_mode),
        CullMode: map_cull_mode(state.cull_mode),
        FrontCounterClockwise: map_front_face(state.front_face).into(),
        DepthBias: 0,
        DepthBiasClamp: 0.0,
        SlopeScaledDepthBias: 0.0,
        DepthClipEnable: state.depth_clip_enabled.into(),
        MultisampleEnable: false.into(),
        AntialiasedLineEnable: false.into(),
        ForcedSampleCount: 0,
        ConservativeRaster: if state.conservative_raster {
            Direct3D12::D3D12_CONSERVATIVE_RASTERIZATION_MODE_ON
        } else {
            Direct3D12::D3D12_CONSERVATIVE_RASTERIZATION_MODE_OFF
        },
    }
}

fn map_stencil_face(face: crate::StencilFaceState) -> Direct3D12::D3D12_DEPTH_STENCILOP_DESC {
    Direct3D12::D3D12_DEPTH_STENCILOP_DESC {
        StencilFailOp: map_stencil_op(face.fail_op),
        StencilDepthFailOp: map_stencil_op(face.depth_fail_op),
        StencilPassOp: map_stencil_op(face.pass_op),
        StencilFunc: map_compare_function(face.compare),
    }
}

pub(super) fn map_depth_stencil_state(state: crate::DepthStencilState) -> Direct3D12::D3D12_DEPTH_STENCIL_DESC {
    Direct3D12::D3D12_DEPTH_STENCIL_DESC {
        DepthEnable: true.into(),
        DepthWriteMask: if state.depth_write_enabled {
            Direct3D12::D3D12_DEPTH_WRITE_MASK_ALL
        } else {
            Direct3D12::D3D12_DEPTH_WRITE_MASK_ZERO
        },
        DepthFunc: map_compare_function(state.depth_compare),
        StencilEnable: (state.stencil_read_mask != 0 || state.stencil_write_mask != 0).into(),
        StencilReadMask: state.stencil_read_mask as u8,
        StencilWriteMask: state.stencil_write_mask as u8,
        FrontFace: map_stencil_face(state.stencil_front),
        BackFace: map_stencil_face(state.stencil_back),
    }
}
