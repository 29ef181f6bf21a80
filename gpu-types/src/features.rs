use crate::GpuFeature;
use bitflags::bitflags;

bitflags! {
    /// Bitset form of [`GpuFeature`], used wherever adapters/devices need
    /// to combine or intersect feature sets (mirrors the teacher's
    /// `wgt::Features`).
    #[derive(Default)]
    pub struct Features: u32 {
        const DEPTH_CLAMPING = 1 << 0;
        const MAPPABLE_PRIMARY_BUFFERS = 1 << 1;
        const INDIRECT_FIRST_INSTANCE = 1 << 2;
        const MULTI_DRAW_INDIRECT = 1 << 3;
        const MULTI_DRAW_INDIRECT_COUNT = 1 << 4;
        const ADDRESS_MODE_CLAMP_TO_BORDER = 1 << 5;
        const POLYGON_MODE_LINE = 1 << 6;
        const POLYGON_MODE_POINT = 1 << 7;
        const VERTEX_WRITABLE_STORAGE = 1 << 8;
        const TIMESTAMP_QUERY = 1 << 9;
        const PIPELINE_STATISTICS_QUERY = 1 << 10;
        const TEXTURE_COMPRESSION_BC = 1 << 11;
        const TEXTURE_COMPRESSION_ETC2 = 1 << 12;
        const TEXTURE_COMPRESSION_ASTC = 1 << 13;
        const TEXTURE_COMPRESSION_ASTC_HDR = 1 << 14;
        const CONSERVATIVE_RASTERIZATION = 1 << 15;
        const MESH_SHADER = 1 << 16;
        const RAY_TRACING = 1 << 17;
        const VARIABLE_RATE_SHADING = 1 << 18;
        const CLEAR_COMMANDS = 1 << 19;
    }
}

impl Features {
    pub fn from_feature(feature: GpuFeature) -> Self {
        match feature {
            GpuFeature::DepthClamping => Features::DEPTH_CLAMPING,
            GpuFeature::MappablePrimaryBuffers => Features::MAPPABLE_PRIMARY_BUFFERS,
            GpuFeature::IndirectFirstInstance => Features::INDIRECT_FIRST_INSTANCE,
            GpuFeature::MultiDrawIndirect => Features::MULTI_DRAW_INDIRECT,
            GpuFeature::MultiDrawIndirectCount => Features::MULTI_DRAW_INDIRECT_COUNT,
            GpuFeature::AddressModeClampToBorder => Features::ADDRESS_MODE_CLAMP_TO_BORDER,
            GpuFeature::PolygonModeLine => Features::POLYGON_MODE_LINE,
            GpuFeature::PolygonModePoint => Features::POLYGON_MODE_POINT,
            GpuFeature::VertexWritableStorage => Features::VERTEX_WRITABLE_STORAGE,
            GpuFeature::TimestampQuery => Features::TIMESTAMP_QUERY,
            GpuFeature::PipelineStatisticsQuery => Features::PIPELINE_STATISTICS_QUERY,
            GpuFeature::TextureCompressionBc => Features::TEXTURE_COMPRESSION_BC,
            GpuFeature::TextureCompressionEtc2 => Features::TEXTURE_COMPRESSION_ETC2,
            GpuFeature::TextureCompressionAstc => Features::TEXTURE_COMPRESSION_ASTC,
            GpuFeature::TextureCompressionAstcHdr => Features::TEXTURE_COMPRESSION_ASTC_HDR,
            GpuFeature::ConservativeRasterization => Features::CONSERVATIVE_RASTERIZATION,
            GpuFeature::MeshShader => Features::MESH_SHADER,
            GpuFeature::RayTracing => Features::RAY_TRACING,
            GpuFeature::VariableRateShading => Features::VARIABLE_RATE_SHADING,
            GpuFeature::ClearCommands => Features::CLEAR_COMMANDS,
            GpuFeature::_Force32 => Features::empty(),
        }
    }

    pub fn supports(&self, feature: GpuFeature) -> bool {
        self.contains(Self::from_feature(feature))
    }
}
