//! Texture resource header and the native pixel format knowledge base.

use binrw::{BinRead, BinWrite};

/// Native pixel format of a texture resource
#[derive(BinRead, BinWrite, Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[brw(repr = u8)]
#[allow(non_camel_case_types)]
pub enum PixelFormat {
    #[default]
    R8_UNORM = 0,
    R8_SNORM = 1,
    R8_UINT = 2,
    R8_SINT = 3,
    A8_UNORM = 4,
    L8 = 5,
    R16_FLOAT = 6,
    R16_UNORM = 7,
    R16_SNORM = 8,
    R16_UINT = 9,
    R16_SINT = 10,
    L16 = 11,
    R32_FLOAT = 12,
    R32_UINT = 13,
    R32_SINT = 14,
    R8G8_UNORM = 15,
    R8G8_SNORM = 16,
    R8G8_UINT = 17,
    R8G8_SINT = 18,
    R16G16_FLOAT = 19,
    R16G16_UNORM = 20,
    R16G16_SNORM = 21,
    R16G16_UINT = 22,
    R16G16_SINT = 23,
    R32G32_FLOAT = 24,
    R32G32_UINT = 25,
    R32G32_SINT = 26,
    R5G6B5 = 27,
    R8G8B8 = 28,
    B8G8R8 = 29,
    R11G11B10_FLOAT = 30,
    B32G32R32F = 31,
    A8R8G8B8 = 32,
    A8R8G8B8_GAMMA = 33,
    X8R8G8B8 = 34,
    B8G8R8A8 = 35,
    B8G8R8X8 = 36,
    X8B8G8R8 = 37,
    R8G8B8A8_UNORM = 38,
    R8G8B8A8_SNORM = 39,
    R8G8B8A8_UINT = 40,
    R8G8B8A8_SINT = 41,
    A2R10G10B10 = 42,
    A2R10G10B10_GAMMA = 43,
    R10G10B10A2_UNORM = 44,
    R10G10B10A2_UINT = 45,
    R16G16B16A16_FLOAT = 46,
    R16G16B16A16_UNORM = 47,
    R16G16B16A16_SNORM = 48,
    R16G16B16A16_UINT = 49,
    R16G16B16A16_SINT = 50,
    R32G32B32A32_FLOAT = 51,
    R32G32B32A32_UINT = 52,
    R32G32B32A32_SINT = 53,
    D16_UNORM = 54,
    D24_UNORM_S8_UINT = 55,
    D32_FLOAT = 56,
    D24FS8 = 57,
    D32_FLOAT_S8X24_UINT = 58,
    BC1_UNORM = 59,
    BC2_UNORM = 60,
    BC3_UNORM = 61,
    BC4_SNORM = 62,
    BC4_UNORM = 63,
    BC5_SNORM = 64,
    BC5_UNORM = 65,
    BC6H_UF16 = 66,
    BC6H_SF16 = 67,
    BC7_UNORM = 68,
    R8_UNORM_NO_TYPELESS = 69,
}

/// How pixels of a [`PixelFormat`] are laid out in memory
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PixelLayout {
    Uncompressed { bytes_per_pixel: u32 },

    /// Compressed in 4x4 pixel blocks
    BlockCompressed { block_size: u32 },
}

impl PixelLayout {
    pub fn is_block_compressed(&self) -> bool {
        matches!(self, PixelLayout::BlockCompressed { .. })
    }

    /// Row pitch of an uncompressed surface or linear size of a block compressed one.
    pub fn pitch_or_linear_size(&self, width: u32, height: u32) -> u32 {
        let size = match *self {
            PixelLayout::Uncompressed { bytes_per_pixel } => {
                (width as u64 * bytes_per_pixel as u64 + 3) & !3
            }
            PixelLayout::BlockCompressed { block_size } => {
                width.div_ceil(4) as u64 * height.div_ceil(4) as u64 * block_size as u64
            }
        };
        u32::try_from(size).unwrap_or(u32::MAX)
    }
}

/// DXGI formats textures can be converted to
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u32)]
#[allow(non_camel_case_types)]
pub enum DxgiFormat {
    R32G32B32A32_FLOAT = 2,
    R32G32B32A32_UINT = 3,
    R32G32B32A32_SINT = 4,
    R32G32B32_FLOAT = 6,
    R16G16B16A16_FLOAT = 10,
    R16G16B16A16_UNORM = 11,
    R16G16B16A16_UINT = 12,
    R16G16B16A16_SNORM = 13,
    R16G16B16A16_SINT = 14,
    R32G32_FLOAT = 16,
    R32G32_UINT = 17,
    R32G32_SINT = 18,
    D32_FLOAT_S8X24_UINT = 20,
    R10G10B10A2_UNORM = 24,
    R10G10B10A2_UINT = 25,
    R11G11B10_FLOAT = 26,
    R8G8B8A8_UNORM = 28,
    R8G8B8A8_UINT = 30,
    R8G8B8A8_SNORM = 31,
    R8G8B8A8_SINT = 32,
    R16G16_FLOAT = 34,
    R16G16_UNORM = 35,
    R16G16_UINT = 36,
    R16G16_SNORM = 37,
    R16G16_SINT = 38,
    D32_FLOAT = 40,
    R32_FLOAT = 41,
    R32_UINT = 42,
    R32_SINT = 43,
    D24_UNORM_S8_UINT = 45,
    R24_UNORM_X8_TYPELESS = 46,
    R8G8_UNORM = 49,
    R8G8_UINT = 50,
    R8G8_SNORM = 51,
    R8G8_SINT = 52,
    R16_FLOAT = 54,
    D16_UNORM = 55,
    R16_UNORM = 56,
    R16_UINT = 57,
    R16_SNORM = 58,
    R16_SINT = 59,
    R8_UNORM = 61,
    R8_UINT = 62,
    R8_SNORM = 63,
    R8_SINT = 64,
    A8_UNORM = 65,
    BC1_UNORM = 71,
    BC2_UNORM = 74,
    BC3_UNORM = 77,
    BC4_UNORM = 80,
    BC4_SNORM = 81,
    BC5_UNORM = 83,
    BC5_SNORM = 84,
    BC6H_UF16 = 95,
    BC6H_SF16 = 96,
    BC7_UNORM = 98,
}

impl PixelFormat {
    pub fn layout(self) -> PixelLayout {
        use PixelFormat::*;

        let bytes_per_pixel = match self {
            BC1_UNORM | BC4_SNORM | BC4_UNORM => {
                return PixelLayout::BlockCompressed { block_size: 8 }
            }
            BC2_UNORM | BC3_UNORM | BC5_SNORM | BC5_UNORM | BC6H_UF16 | BC6H_SF16 | BC7_UNORM => {
                return PixelLayout::BlockCompressed { block_size: 16 }
            }

            R8_UNORM | R8_SNORM | R8_UINT | R8_SINT | A8_UNORM | L8 | R8_UNORM_NO_TYPELESS => 1,

            R16_FLOAT | R16_UNORM | R16_SNORM | R16_UINT | R16_SINT | L16 | R8G8_UNORM
            | R8G8_SNORM | R8G8_UINT | R8G8_SINT | R5G6B5 | D16_UNORM => 2,

            R8G8B8 | B8G8R8 => 3,

            R32_FLOAT | R32_UINT | R32_SINT | R16G16_FLOAT | R16G16_UNORM | R16G16_SNORM
            | R16G16_UINT | R16G16_SINT | R11G11B10_FLOAT | A8R8G8B8 | A8R8G8B8_GAMMA
            | X8R8G8B8 | B8G8R8A8 | B8G8R8X8 | X8B8G8R8 | R8G8B8A8_UNORM | R8G8B8A8_SNORM
            | R8G8B8A8_UINT | R8G8B8A8_SINT | A2R10G10B10 | A2R10G10B10_GAMMA
            | R10G10B10A2_UNORM | R10G10B10A2_UINT | D24_UNORM_S8_UINT | D24FS8 | D32_FLOAT => 4,

            R32G32_FLOAT | R32G32_UINT | R32G32_SINT | R16G16B16A16_FLOAT
            | R16G16B16A16_UNORM | R16G16B16A16_SNORM | R16G16B16A16_UINT
            | R16G16B16A16_SINT | D32_FLOAT_S8X24_UINT => 8,

            B32G32R32F => 12,

            R32G32B32A32_FLOAT | R32G32B32A32_UINT | R32G32B32A32_SINT => 16,
        };

        PixelLayout::Uncompressed { bytes_per_pixel }
    }

    /// The DXGI format used when the texture needs an extended header.
    ///
    /// `None` for the legacy formats which only have a bitmask description.
    pub fn dxgi_format(self) -> Option<DxgiFormat> {
        use PixelFormat as P;

        Some(match self {
            P::R8_UNORM | P::L8 | P::R8_UNORM_NO_TYPELESS => DxgiFormat::R8_UNORM,
            P::R8_SNORM => DxgiFormat::R8_SNORM,
            P::R8_UINT => DxgiFormat::R8_UINT,
            P::R8_SINT => DxgiFormat::R8_SINT,
            P::A8_UNORM => DxgiFormat::A8_UNORM,
            P::R16_FLOAT => DxgiFormat::R16_FLOAT,
            P::R16_UNORM | P::L16 => DxgiFormat::R16_UNORM,
            P::R16_SNORM => DxgiFormat::R16_SNORM,
            P::R16_UINT => DxgiFormat::R16_UINT,
            P::R16_SINT => DxgiFormat::R16_SINT,
            P::R32_FLOAT => DxgiFormat::R32_FLOAT,
            P::R32_UINT => DxgiFormat::R32_UINT,
            P::R32_SINT => DxgiFormat::R32_SINT,
            P::R8G8_UNORM => DxgiFormat::R8G8_UNORM,
            P::R8G8_SNORM => DxgiFormat::R8G8_SNORM,
            P::R8G8_UINT => DxgiFormat::R8G8_UINT,
            P::R8G8_SINT => DxgiFormat::R8G8_SINT,
            P::R16G16_FLOAT => DxgiFormat::R16G16_FLOAT,
            P::R16G16_UNORM => DxgiFormat::R16G16_UNORM,
            P::R16G16_SNORM => DxgiFormat::R16G16_SNORM,
            P::R16G16_UINT => DxgiFormat::R16G16_UINT,
            P::R16G16_SINT => DxgiFormat::R16G16_SINT,
            P::R32G32_FLOAT => DxgiFormat::R32G32_FLOAT,
            P::R32G32_UINT => DxgiFormat::R32G32_UINT,
            P::R32G32_SINT => DxgiFormat::R32G32_SINT,
            P::R11G11B10_FLOAT => DxgiFormat::R11G11B10_FLOAT,
            // channel order differs, consumers have to swizzle
            P::B32G32R32F => DxgiFormat::R32G32B32_FLOAT,
            P::R8G8B8A8_UNORM => DxgiFormat::R8G8B8A8_UNORM,
            P::R8G8B8A8_SNORM => DxgiFormat::R8G8B8A8_SNORM,
            P::R8G8B8A8_UINT => DxgiFormat::R8G8B8A8_UINT,
            P::R8G8B8A8_SINT => DxgiFormat::R8G8B8A8_SINT,
            // DXGI has no sRGB variant, gamma is left to the consumer
            P::A2R10G10B10 | P::A2R10G10B10_GAMMA | P::R10G10B10A2_UNORM => {
                DxgiFormat::R10G10B10A2_UNORM
            }
            P::R10G10B10A2_UINT => DxgiFormat::R10G10B10A2_UINT,
            P::R16G16B16A16_FLOAT => DxgiFormat::R16G16B16A16_FLOAT,
            P::R16G16B16A16_UNORM => DxgiFormat::R16G16B16A16_UNORM,
            P::R16G16B16A16_SNORM => DxgiFormat::R16G16B16A16_SNORM,
            P::R16G16B16A16_UINT => DxgiFormat::R16G16B16A16_UINT,
            P::R16G16B16A16_SINT => DxgiFormat::R16G16B16A16_SINT,
            P::R32G32B32A32_FLOAT => DxgiFormat::R32G32B32A32_FLOAT,
            P::R32G32B32A32_UINT => DxgiFormat::R32G32B32A32_UINT,
            P::R32G32B32A32_SINT => DxgiFormat::R32G32B32A32_SINT,
            P::D16_UNORM => DxgiFormat::D16_UNORM,
            P::D24_UNORM_S8_UINT => DxgiFormat::D24_UNORM_S8_UINT,
            P::D32_FLOAT => DxgiFormat::D32_FLOAT,
            P::D24FS8 => DxgiFormat::R24_UNORM_X8_TYPELESS,
            P::D32_FLOAT_S8X24_UINT => DxgiFormat::D32_FLOAT_S8X24_UINT,
            P::BC1_UNORM => DxgiFormat::BC1_UNORM,
            P::BC2_UNORM => DxgiFormat::BC2_UNORM,
            P::BC3_UNORM => DxgiFormat::BC3_UNORM,
            P::BC4_SNORM => DxgiFormat::BC4_SNORM,
            P::BC4_UNORM => DxgiFormat::BC4_UNORM,
            P::BC5_SNORM => DxgiFormat::BC5_SNORM,
            P::BC5_UNORM => DxgiFormat::BC5_UNORM,
            P::BC6H_UF16 => DxgiFormat::BC6H_UF16,
            P::BC6H_SF16 => DxgiFormat::BC6H_SF16,
            P::BC7_UNORM => DxgiFormat::BC7_UNORM,
            P::R5G6B5
            | P::R8G8B8
            | P::B8G8R8
            | P::A8R8G8B8
            | P::A8R8G8B8_GAMMA
            | P::X8R8G8B8
            | P::B8G8R8A8
            | P::B8G8R8X8
            | P::X8B8G8R8 => return None,
        })
    }
}

/// Shape of a texture, stored in the low two bits of [`TextureHeader::kind_and_mips`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureKind {
    Plain,
    Cubemap,
    Volume,
}

#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Header stored as the first part of every texture resource
///
/// The second part holds the pixel data for all mip levels.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct TextureHeader {
    /// Usually `IMGC`, not validated
    pub magic: [u8; 4],

    pub id: u32,

    pub header_size: u32,

    #[allow(dead_code)]
    pub unknown: u32,

    pub color_min: Color,

    pub color_max: Color,

    pub color_average: Color,

    pub width: u16,

    pub height: u16,

    pub depth: u16,

    pub format: PixelFormat,

    /// Texture kind in bits 0..2, mip level count in bits 2..8
    pub kind_and_mips: u8,

    #[allow(dead_code)]
    pub reserved: [u16; 4],
}

impl TextureHeader {
    /// Size of the header on disk
    pub const SIZE: usize = 80;

    pub fn kind(&self) -> TextureKind {
        match self.kind_and_mips & 0x03 {
            1 => TextureKind::Cubemap,
            2 => TextureKind::Volume,
            _ => TextureKind::Plain,
        }
    }

    /// Mip levels as declared, may be zero
    pub fn mip_levels(&self) -> u8 {
        (self.kind_and_mips >> 2) & 0x3F
    }

    pub fn pack_kind_and_mips(kind: TextureKind, mip_levels: u8) -> u8 {
        let kind = match kind {
            TextureKind::Plain => 0,
            TextureKind::Cubemap => 1,
            TextureKind::Volume => 2,
        };
        ((mip_levels & 0x3F) << 2) | kind
    }
}
