//! Pixel-format registry: bit-exact metadata for every [`PixelFormat`].
//!
//! This is a pure function table: no format carries any mutable state, and
//! every query here is derivable from the closed `PixelFormat` enum alone.
//! Backend-specific format↔native-enum mappings live in `gpu-hal`, not here.

use bitflags::bitflags;

/// Closed set of pixel formats the RHI understands. `_Force32` is never
/// constructed; it only pins the enum's underlying representation to 32
/// bits for backends that serialize it as a plain integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum PixelFormat {
    Undefined = 0,

    // 8-bit
    R8Unorm,
    R8Snorm,
    R8Uint,
    R8Sint,

    // 16-bit
    R16Unorm,
    R16Snorm,
    R16Uint,
    R16Sint,
    R16Float,
    Rg8Unorm,
    Rg8Snorm,
    Rg8Uint,
    Rg8Sint,

    // packed 32-bit
    Bgra4Unorm,
    B5g6r5Unorm,
    Bgr5a1Unorm,

    // 32-bit
    R32Uint,
    R32Sint,
    R32Float,
    Rg16Unorm,
    Rg16Snorm,
    Rg16Uint,
    Rg16Sint,
    Rg16Float,
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Rgba8Snorm,
    Rgba8Uint,
    Rgba8Sint,
    Bgra8Unorm,
    Bgra8UnormSrgb,

    // packed 32-bit
    Rgb9e5Ufloat,
    Rgb10a2Unorm,
    Rgb10a2Uint,
    Rg11b10Ufloat,

    // 64-bit
    Rg32Uint,
    Rg32Sint,
    Rg32Float,
    Rgba16Unorm,
    Rgba16Snorm,
    Rgba16Uint,
    Rgba16Sint,
    Rgba16Float,

    // 128-bit
    Rgba32Uint,
    Rgba32Sint,
    Rgba32Float,

    // depth/stencil
    Stencil8,
    Depth16Unorm,
    Depth24Plus,
    Depth24PlusStencil8,
    Depth32Float,
    Depth32FloatStencil8,

    // BC (block-compressed, 4x4)
    Bc1RgbaUnorm,
    Bc1RgbaUnormSrgb,
    Bc2RgbaUnorm,
    Bc2RgbaUnormSrgb,
    Bc3RgbaUnorm,
    Bc3RgbaUnormSrgb,
    Bc4RUnorm,
    Bc4RSnorm,
    Bc5RgUnorm,
    Bc5RgSnorm,
    Bc6hRgbUfloat,
    Bc6hRgbFloat,
    Bc7RgbaUnorm,
    Bc7RgbaUnormSrgb,

    // ETC2 (4x4)
    Etc2Rgb8Unorm,
    Etc2Rgb8UnormSrgb,
    Etc2Rgb8A1Unorm,
    Etc2Rgb8A1UnormSrgb,
    Etc2Rgba8Unorm,
    Etc2Rgba8UnormSrgb,
    EacR11Unorm,
    EacR11Snorm,
    EacRg11Unorm,
    EacRg11Snorm,

    // ASTC LDR
    Astc4x4Unorm,
    Astc4x4UnormSrgb,
    Astc5x4Unorm,
    Astc5x4UnormSrgb,
    Astc5x5Unorm,
    Astc5x5UnormSrgb,
    Astc6x5Unorm,
    Astc6x5UnormSrgb,
    Astc6x6Unorm,
    Astc6x6UnormSrgb,
    Astc8x5Unorm,
    Astc8x5UnormSrgb,
    Astc8x6Unorm,
    Astc8x6UnormSrgb,
    Astc8x8Unorm,
    Astc8x8UnormSrgb,
    Astc10x5Unorm,
    Astc10x5UnormSrgb,
    Astc10x6Unorm,
    Astc10x6UnormSrgb,
    Astc10x8Unorm,
    Astc10x8UnormSrgb,
    Astc10x10Unorm,
    Astc10x10UnormSrgb,
    Astc12x10Unorm,
    Astc12x10UnormSrgb,
    Astc12x12Unorm,
    Astc12x12UnormSrgb,

    // ASTC HDR (same block geometry, float decode)
    Astc4x4Hdr,
    Astc8x8Hdr,

    #[doc(hidden)]
    _Force32 = 0x7fff_ffff,
}

/// `unorm`/`unorm-srgb`/`snorm`/`uint`/`sint`/`float` classification, used by
/// backends to pick blend/clear-value interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    Unorm,
    UnormSrgb,
    Snorm,
    Uint,
    Sint,
    Float,
}

/// Block-compression family, `None` for linear formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionClass {
    None,
    Bc,
    Etc2,
    Astc,
    AstcHdr,
}

bitflags! {
    /// Which aspects a format exposes; non-depth-stencil formats are
    /// always exactly `COLOR`.
    #[derive(Default)]
    pub struct FormatAspects: u8 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

/// Immutable, bit-exact metadata for one [`PixelFormat`].
#[derive(Debug, Clone, Copy)]
pub struct PixelFormatInfo {
    pub format: PixelFormat,
    pub block_width: u8,
    pub block_height: u8,
    pub bytes_per_block: u8,
    pub kind: FormatKind,
    pub aspects: FormatAspects,
    pub compression: CompressionClass,
    /// `Some(other)` for formats with a defined sRGB<->linear counterpart.
    pub srgb_pair: Option<PixelFormat>,
}

const fn linear(
    format: PixelFormat,
    block: u8,
    bytes_per_block: u8,
    kind: FormatKind,
) -> PixelFormatInfo {
    PixelFormatInfo {
        format,
        block_width: block,
        block_height: block,
        bytes_per_block,
        kind,
        aspects: FormatAspects::COLOR,
        compression: CompressionClass::None,
        srgb_pair: None,
    }
}

const fn block(
    format: PixelFormat,
    w: u8,
    h: u8,
    bytes_per_block: u8,
    kind: FormatKind,
    compression: CompressionClass,
) -> PixelFormatInfo {
    PixelFormatInfo {
        format,
        block_width: w,
        block_height: h,
        bytes_per_block,
        kind,
        aspects: FormatAspects::COLOR,
        compression,
        srgb_pair: None,
    }
}

const fn depth(format: PixelFormat, bytes: u8, aspects: FormatAspects) -> PixelFormatInfo {
    PixelFormatInfo {
        format,
        block_width: 1,
        block_height: 1,
        bytes_per_block: bytes,
        kind: FormatKind::Float,
        aspects,
        compression: CompressionClass::None,
        srgb_pair: None,
    }
}

/// Look up bit-exact metadata for `format`. Panics on [`PixelFormat::Undefined`]
/// and `_Force32`, neither of which describe a real resource.
pub fn info(format: PixelFormat) -> PixelFormatInfo {
    use FormatKind::*;
    use PixelFormat::*;

    let mut info = match format {
        Undefined | _Force32 => panic!("PixelFormat::{:?} has no metadata", format),

        R8Unorm => linear(format, 1, 1, Unorm),
        R8Snorm => linear(format, 1, 1, Snorm),
        R8Uint => linear(format, 1, 1, Uint),
        R8Sint => linear(format, 1, 1, Sint),

        R16Unorm => linear(format, 1, 2, Unorm),
        R16Snorm => linear(format, 1, 2, Snorm),
        R16Uint => linear(format, 1, 2, Uint),
        R16Sint => linear(format, 1, 2, Sint),
        R16Float => linear(format, 1, 2, Float),
        Rg8Unorm => linear(format, 1, 2, Unorm),
        Rg8Snorm => linear(format, 1, 2, Snorm),
        Rg8Uint => linear(format, 1, 2, Uint),
        Rg8Sint => linear(format, 1, 2, Sint),

        Bgra4Unorm => linear(format, 1, 2, Unorm),
        B5g6r5Unorm => linear(format, 1, 2, Unorm),
        Bgr5a1Unorm => linear(format, 1, 2, Unorm),

        R32Uint => linear(format, 1, 4, Uint),
        R32Sint => linear(format, 1, 4, Sint),
        R32Float => linear(format, 1, 4, Float),
        Rg16Unorm => linear(format, 1, 4, Unorm),
        Rg16Snorm => linear(format, 1, 4, Snorm),
        Rg16Uint => linear(format, 1, 4, Uint),
        Rg16Sint => linear(format, 1, 4, Sint),
        Rg16Float => linear(format, 1, 4, Float),
        Rgba8Unorm => linear(format, 1, 4, Unorm),
        Rgba8UnormSrgb => linear(format, 1, 4, UnormSrgb),
        Rgba8Snorm => linear(format, 1, 4, Snorm),
        Rgba8Uint => linear(format, 1, 4, Uint),
        Rgba8Sint => linear(format, 1, 4, Sint),
        Bgra8Unorm => linear(format, 1, 4, Unorm),
        Bgra8UnormSrgb => linear(format, 1, 4, UnormSrgb),

        Rgb9e5Ufloat => linear(format, 1, 4, Float),
        Rgb10a2Unorm => linear(format, 1, 4, Unorm),
        Rgb10a2Uint => linear(format, 1, 4, Uint),
        Rg11b10Ufloat => linear(format, 1, 4, Float),

        Rg32Uint => linear(format, 1, 8, Uint),
        Rg32Sint => linear(format, 1, 8, Sint),
        Rg32Float => linear(format, 1, 8, Float),
        Rgba16Unorm => linear(format, 1, 8, Unorm),
        Rgba16Snorm => linear(format, 1, 8, Snorm),
        Rgba16Uint => linear(format, 1, 8, Uint),
        Rgba16Sint => linear(format, 1, 8, Sint),
        Rgba16Float => linear(format, 1, 8, Float),

        Rgba32Uint => linear(format, 1, 16, Uint),
        Rgba32Sint => linear(format, 1, 16, Sint),
        Rgba32Float => linear(format, 1, 16, Float),

        Stencil8 => depth(format, 1, FormatAspects::STENCIL),
        Depth16Unorm => depth(format, 2, FormatAspects::DEPTH),
        Depth24Plus => depth(format, 4, FormatAspects::DEPTH),
        Depth24PlusStencil8 => {
            depth(format, 4, FormatAspects::from_bits_truncate(0b110))
        }
        Depth32Float => depth(format, 4, FormatAspects::DEPTH),
        Depth32FloatStencil8 => {
            depth(format, 5, FormatAspects::from_bits_truncate(0b110))
        }

        Bc1RgbaUnorm => block(format, 4, 4, 8, Unorm, CompressionClass::Bc),
        Bc1RgbaUnormSrgb => block(format, 4, 4, 8, UnormSrgb, CompressionClass::Bc),
        Bc2RgbaUnorm => block(format, 4, 4, 16, Unorm, CompressionClass::Bc),
        Bc2RgbaUnormSrgb => block(format, 4, 4, 16, UnormSrgb, CompressionClass::Bc),
        Bc3RgbaUnorm => block(format, 4, 4, 16, Unorm, CompressionClass::Bc),
        Bc3RgbaUnormSrgb => block(format, 4, 4, 16, UnormSrgb, CompressionClass::Bc),
        Bc4RUnorm => block(format, 4, 4, 8, Unorm, CompressionClass::Bc),
        Bc4RSnorm => block(format, 4, 4, 8, Snorm, CompressionClass::Bc),
        Bc5RgUnorm => block(format, 4, 4, 16, Unorm, CompressionClass::Bc),
        Bc5RgSnorm => block(format, 4, 4, 16, Snorm, CompressionClass::Bc),
        Bc6hRgbUfloat => block(format, 4, 4, 16, Float, CompressionClass::Bc),
        Bc6hRgbFloat => block(format, 4, 4, 16, Float, CompressionClass::Bc),
        Bc7RgbaUnorm => block(format, 4, 4, 16, Unorm, CompressionClass::Bc),
        Bc7RgbaUnormSrgb => block(format, 4, 4, 16, UnormSrgb, CompressionClass::Bc),

        Etc2Rgb8Unorm => block(format, 4, 4, 8, Unorm, CompressionClass::Etc2),
        Etc2Rgb8UnormSrgb => block(format, 4, 4, 8, UnormSrgb, CompressionClass::Etc2),
        Etc2Rgb8A1Unorm => block(format, 4, 4, 8, Unorm, CompressionClass::Etc2),
        Etc2Rgb8A1UnormSrgb => block(format, 4, 4, 8, UnormSrgb, CompressionClass::Etc2),
        Etc2Rgba8Unorm => block(format, 4, 4, 16, Unorm, CompressionClass::Etc2),
        Etc2Rgba8UnormSrgb => block(format, 4, 4, 16, UnormSrgb, CompressionClass::Etc2),
        EacR11Unorm => block(format, 4, 4, 8, Unorm, CompressionClass::Etc2),
        EacR11Snorm => block(format, 4, 4, 8, Snorm, CompressionClass::Etc2),
        EacRg11Unorm => block(format, 4, 4, 16, Unorm, CompressionClass::Etc2),
        EacRg11Snorm => block(format, 4, 4, 16, Snorm, CompressionClass::Etc2),

        Astc4x4Unorm => block(format, 4, 4, 16, Unorm, CompressionClass::Astc),
        Astc4x4UnormSrgb => block(format, 4, 4, 16, UnormSrgb, CompressionClass::Astc),
        Astc5x4Unorm => block(format, 5, 4, 16, Unorm, CompressionClass::Astc),
        Astc5x4UnormSrgb => block(format, 5, 4, 16, UnormSrgb, CompressionClass::Astc),
        Astc5x5Unorm => block(format, 5, 5, 16, Unorm, CompressionClass::Astc),
        Astc5x5UnormSrgb => block(format, 5, 5, 16, UnormSrgb, CompressionClass::Astc),
        Astc6x5Unorm => block(format, 6, 5, 16, Unorm, CompressionClass::Astc),
        Astc6x5UnormSrgb => block(format, 6, 5, 16, UnormSrgb, CompressionClass::Astc),
        Astc6x6Unorm => block(format, 6, 6, 16, Unorm, CompressionClass::Astc),
        Astc6x6UnormSrgb => block(format, 6, 6, 16, UnormSrgb, CompressionClass::Astc),
        Astc8x5Unorm => block(format, 8, 5, 16, Unorm, CompressionClass::Astc),
        Astc8x5UnormSrgb => block(format, 8, 5, 16, UnormSrgb, CompressionClass::Astc),
        Astc8x6Unorm => block(format, 8, 6, 16, Unorm, CompressionClass::Astc),
        Astc8x6UnormSrgb => block(format, 8, 6, 16, UnormSrgb, CompressionClass::Astc),
        Astc8x8Unorm => block(format, 8, 8, 16, Unorm, CompressionClass::Astc),
        Astc8x8UnormSrgb => block(format, 8, 8, 16, UnormSrgb, CompressionClass::Astc),
        Astc10x5Unorm => block(format, 10, 5, 16, Unorm, CompressionClass::Astc),
        Astc10x5UnormSrgb => block(format, 10, 5, 16, UnormSrgb, CompressionClass::Astc),
        Astc10x6Unorm => block(format, 10, 6, 16, Unorm, CompressionClass::Astc),
        Astc10x6UnormSrgb => block(format, 10, 6, 16, UnormSrgb, CompressionClass::Astc),
        Astc10x8Unorm => block(format, 10, 8, 16, Unorm, CompressionClass::Astc),
        Astc10x8UnormSrgb => block(format, 10, 8, 16, UnormSrgb, CompressionClass::Astc),
        Astc10x10Unorm => block(format, 10, 10, 16, Unorm, CompressionClass::Astc),
        Astc10x10UnormSrgb => block(format, 10, 10, 16, UnormSrgb, CompressionClass::Astc),
        Astc12x10Unorm => block(format, 12, 10, 16, Unorm, CompressionClass::Astc),
        Astc12x10UnormSrgb => block(format, 12, 10, 16, UnormSrgb, CompressionClass::Astc),
        Astc12x12Unorm => block(format, 12, 12, 16, Unorm, CompressionClass::Astc),
        Astc12x12UnormSrgb => block(format, 12, 12, 16, UnormSrgb, CompressionClass::Astc),

        Astc4x4Hdr => block(format, 4, 4, 16, Float, CompressionClass::AstcHdr),
        Astc8x8Hdr => block(format, 8, 8, 16, Float, CompressionClass::AstcHdr),
    };

    info.srgb_pair = srgb_pair_of(format);
    info
}

/// sRGB<->linear involution table: for every format with an sRGB sibling,
/// `srgb_pair_of(f)` returns the other half of the pair.
fn srgb_pair_of(format: PixelFormat) -> Option<PixelFormat> {
    use PixelFormat::*;
    Some(match format {
        Rgba8Unorm => Rgba8UnormSrgb,
        Rgba8UnormSrgb => Rgba8Unorm,
        Bgra8Unorm => Bgra8UnormSrgb,
        Bgra8UnormSrgb => Bgra8Unorm,
        Bc1RgbaUnorm => Bc1RgbaUnormSrgb,
        Bc1RgbaUnormSrgb => Bc1RgbaUnorm,
        Bc2RgbaUnorm => Bc2RgbaUnormSrgb,
        Bc2RgbaUnormSrgb => Bc2RgbaUnorm,
        Bc3RgbaUnorm => Bc3RgbaUnormSrgb,
        Bc3RgbaUnormSrgb => Bc3RgbaUnorm,
        Bc7RgbaUnorm => Bc7RgbaUnormSrgb,
        Bc7RgbaUnormSrgb => Bc7RgbaUnorm,
        Etc2Rgb8Unorm => Etc2Rgb8UnormSrgb,
        Etc2Rgb8UnormSrgb => Etc2Rgb8Unorm,
        Etc2Rgb8A1Unorm => Etc2Rgb8A1UnormSrgb,
        Etc2Rgb8A1UnormSrgb => Etc2Rgb8A1Unorm,
        Etc2Rgba8Unorm => Etc2Rgba8UnormSrgb,
        Etc2Rgba8UnormSrgb => Etc2Rgba8Unorm,
        Astc4x4Unorm => Astc4x4UnormSrgb,
        Astc4x4UnormSrgb => Astc4x4Unorm,
        Astc5x4Unorm => Astc5x4UnormSrgb,
        Astc5x4UnormSrgb => Astc5x4Unorm,
        Astc5x5Unorm => Astc5x5UnormSrgb,
        Astc5x5UnormSrgb => Astc5x5Unorm,
        Astc6x5Unorm => Astc6x5UnormSrgb,
        Astc6x5UnormSrgb => Astc6x5Unorm,
        Astc6x6Unorm => Astc6x6UnormSrgb,
        Astc6x6UnormSrgb => Astc6x6Unorm,
        Astc8x5Unorm => Astc8x5UnormSrgb,
        Astc8x5UnormSrgb => Astc8x5Unorm,
        Astc8x6Unorm => Astc8x6UnormSrgb,
        Astc8x6UnormSrgb => Astc8x6Unorm,
        Astc8x8Unorm => Astc8x8UnormSrgb,
        Astc8x8UnormSrgb => Astc8x8Unorm,
        Astc10x5Unorm => Astc10x5UnormSrgb,
        Astc10x5UnormSrgb => Astc10x5Unorm,
        Astc10x6Unorm => Astc10x6UnormSrgb,
        Astc10x6UnormSrgb => Astc10x6Unorm,
        Astc10x8Unorm => Astc10x8UnormSrgb,
        Astc10x8UnormSrgb => Astc10x8Unorm,
        Astc10x10Unorm => Astc10x10UnormSrgb,
        Astc10x10UnormSrgb => Astc10x10Unorm,
        Astc12x10Unorm => Astc12x10UnormSrgb,
        Astc12x10UnormSrgb => Astc12x10Unorm,
        Astc12x12Unorm => Astc12x12UnormSrgb,
        Astc12x12UnormSrgb => Astc12x12Unorm,
        _ => return None,
    })
}

pub fn kind(format: PixelFormat) -> FormatKind {
    info(format).kind
}

pub fn bytes_per_block(format: PixelFormat) -> u8 {
    info(format).bytes_per_block
}

pub fn is_srgb(format: PixelFormat) -> bool {
    matches!(info(format).kind, FormatKind::UnormSrgb)
}

/// `srgbToLinear`: the non-sRGB member of the pair, or `format` unchanged
/// if it has no sRGB sibling.
pub fn srgb_to_linear(format: PixelFormat) -> PixelFormat {
    if is_srgb(format) {
        info(format).srgb_pair.unwrap_or(format)
    } else {
        format
    }
}

/// `linearToSrgb`: the sRGB member of the pair, or `format` unchanged if it
/// has none.
pub fn linear_to_srgb(format: PixelFormat) -> PixelFormat {
    if !is_srgb(format) {
        info(format).srgb_pair.unwrap_or(format)
    } else {
        format
    }
}

pub fn is_compressed(format: PixelFormat) -> bool {
    !matches!(info(format).compression, CompressionClass::None)
}

pub fn is_compressed_bc(format: PixelFormat) -> bool {
    matches!(info(format).compression, CompressionClass::Bc)
}

pub fn is_compressed_astc(format: PixelFormat) -> bool {
    matches!(
        info(format).compression,
        CompressionClass::Astc | CompressionClass::AstcHdr
    )
}

pub fn is_integer(format: PixelFormat) -> bool {
    matches!(info(format).kind, FormatKind::Uint | FormatKind::Sint)
}

pub fn is_depth(format: PixelFormat) -> bool {
    info(format).aspects.contains(FormatAspects::DEPTH)
}

pub fn is_stencil(format: PixelFormat) -> bool {
    info(format).aspects.contains(FormatAspects::STENCIL)
}

pub fn is_depth_stencil(format: PixelFormat) -> bool {
    is_depth(format) || is_stencil(format)
}

pub fn is_depth_only(format: PixelFormat) -> bool {
    is_depth(format) && !is_stencil(format)
}

/// `bitsPerPixel(f) = bytesPerBlock(f)*8 / (blockWidth*blockHeight)`.
pub fn bits_per_pixel(format: PixelFormat) -> u32 {
    let i = info(format);
    (i.bytes_per_block as u32 * 8) / (i.block_width as u32 * i.block_height as u32)
}

/// Row pitch / slice pitch / row count for a `width x height` image of
/// `format`, per §4.1:
/// `numBlocksWide = max(1, (w+bw-1)/bw)`, `numBlocksHigh = max(1, (h+bh-1)/bh)`,
/// `rowPitch = numBlocksWide * bytesPerBlock`, `slicePitch = rowPitch * numBlocksHigh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceInfo {
    pub row_pitch: u32,
    pub slice_pitch: u32,
    pub row_count: u32,
}

pub fn surface_info(format: PixelFormat, width: u32, height: u32) -> SurfaceInfo {
    let i = info(format);
    let bw = i.block_width as u32;
    let bh = i.block_height as u32;
    let num_blocks_wide = ((width + bw - 1) / bw).max(1);
    let num_blocks_high = ((height + bh - 1) / bh).max(1);
    let row_pitch = num_blocks_wide * i.bytes_per_block as u32;
    let slice_pitch = row_pitch * num_blocks_high;
    SurfaceInfo {
        row_pitch,
        slice_pitch,
        row_count: num_blocks_high,
    }
}

/// Every format this registry covers, for exhaustive property tests and for
/// surface/capability enumeration.
pub const ALL_FORMATS: &[PixelFormat] = &{
    use PixelFormat::*;
    [
        R8Unorm, R8Snorm, R8Uint, R8Sint, R16Unorm, R16Snorm, R16Uint, R16Sint, R16Float,
        Rg8Unorm, Rg8Snorm, Rg8Uint, Rg8Sint, Bgra4Unorm, B5g6r5Unorm, Bgr5a1Unorm, R32Uint,
        R32Sint, R32Float, Rg16Unorm, Rg16Snorm, Rg16Uint, Rg16Sint, Rg16Float, Rgba8Unorm,
        Rgba8UnormSrgb, Rgba8Snorm, Rgba8Uint, Rgba8Sint, Bgra8Unorm, Bgra8UnormSrgb,
        Rgb9e5Ufloat, Rgb10a2Unorm, Rgb10a2Uint, Rg11b10Ufloat, Rg32Uint, Rg32Sint, Rg32Float,
        Rgba16Unorm, Rgba16Snorm, Rgba16Uint, Rgba16Sint, Rgba16Float, Rgba32Uint, Rgba32Sint,
        Rgba32Float, Stencil8, Depth16Unorm, Depth24Plus, Depth24PlusStencil8, Depth32Float,
        Depth32FloatStencil8, Bc1RgbaUnorm, Bc1RgbaUnormSrgb, Bc2RgbaUnorm, Bc2RgbaUnormSrgb,
        Bc3RgbaUnorm, Bc3RgbaUnormSrgb, Bc4RUnorm, Bc4RSnorm, Bc5RgUnorm, Bc5RgSnorm,
        Bc6hRgbUfloat, Bc6hRgbFloat, Bc7RgbaUnorm, Bc7RgbaUnormSrgb, Etc2Rgb8Unorm,
        Etc2Rgb8UnormSrgb, Etc2Rgb8A1Unorm, Etc2Rgb8A1UnormSrgb, Etc2Rgba8Unorm,
        Etc2Rgba8UnormSrgb, EacR11Unorm, EacR11Snorm, EacRg11Unorm, EacRg11Snorm, Astc4x4Unorm,
        Astc4x4UnormSrgb, Astc5x4Unorm, Astc5x4UnormSrgb, Astc5x5Unorm, Astc5x5UnormSrgb,
        Astc6x5Unorm, Astc6x5UnormSrgb, Astc6x6Unorm, Astc6x6UnormSrgb, Astc8x5Unorm,
        Astc8x5UnormSrgb, Astc8x6Unorm, Astc8x6UnormSrgb, Astc8x8Unorm, Astc8x8UnormSrgb,
        Astc10x5Unorm, Astc10x5UnormSrgb, Astc10x6Unorm, Astc10x6UnormSrgb, Astc10x8Unorm,
        Astc10x8UnormSrgb, Astc10x10Unorm, Astc10x10UnormSrgb, Astc12x10Unorm,
        Astc12x10UnormSrgb, Astc12x12Unorm, Astc12x12UnormSrgb, Astc4x4Hdr, Astc8x8Hdr,
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_per_pixel_matches_block_math() {
        for &f in ALL_FORMATS {
            let i = info(f);
            let expected =
                (i.bytes_per_block as u32 * 8) / (i.block_width as u32 * i.block_height as u32);
            assert_eq!(bits_per_pixel(f), expected, "{:?}", f);
        }
    }

    #[test]
    fn srgb_roundtrip_is_involution() {
        for &f in ALL_FORMATS {
            if is_srgb(f) {
                let linear = srgb_to_linear(f);
                assert!(!is_srgb(linear), "{:?} -> {:?}", f, linear);
                assert_eq!(linear_to_srgb(linear), f);
            }
        }
    }

    #[test]
    fn depth_stencil_invariants_hold() {
        for &f in ALL_FORMATS {
            assert_eq!(is_depth_stencil(f), is_depth(f) || is_stencil(f), "{:?}", f);
            if is_depth_only(f) {
                assert!(is_depth(f) && !is_stencil(f), "{:?}", f);
            }
        }
    }

    #[test]
    fn surface_info_pitch_is_consistent() {
        for &f in ALL_FORMATS {
            for &(w, h) in &[(1u32, 1u32), (3, 5), (512, 512), (17, 33)] {
                let s = surface_info(f, w, h);
                assert_eq!(s.slice_pitch, s.row_pitch * s.row_count, "{:?} {}x{}", f, w, h);
                assert_eq!(
                    s.row_pitch % bytes_per_block(f) as u32,
                    0,
                    "{:?} {}x{}",
                    f,
                    w,
                    h
                );
            }
        }
    }

    #[test]
    fn depth24_plus_stencil8_exposes_both_aspects() {
        assert!(is_depth(PixelFormat::Depth24PlusStencil8));
        assert!(is_stencil(PixelFormat::Depth24PlusStencil8));
        assert!(!is_depth_only(PixelFormat::Depth24PlusStencil8));
    }
}
