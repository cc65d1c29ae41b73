//! DirectDraw Surface header synthesis.
//!
//! A texture resource only carries its own [`TextureHeader`], so a standard `DDS ` header is
//! built from it. Formats DirectX 9 can describe with channel bitmasks use the legacy pixel
//! format, everything else gets the `DX10` FourCC and an extended header carrying a
//! [`DxgiFormat`].

use std::io::{Cursor, Write};

use binrw::{BinRead, BinWrite};
use tracing::trace;

use crate::{
    error::{Error, Result},
    texture::{DxgiFormat, PixelFormat, TextureHeader, TextureKind},
};

pub const DDS_HEADER_SIZE: u32 = 124;
pub const DDS_PIXELFORMAT_SIZE: u32 = 32;

pub const DDSD_CAPS: u32 = 0x1;
pub const DDSD_HEIGHT: u32 = 0x2;
pub const DDSD_WIDTH: u32 = 0x4;
pub const DDSD_PITCH: u32 = 0x8;
pub const DDSD_PIXELFORMAT: u32 = 0x1000;
pub const DDSD_MIPMAPCOUNT: u32 = 0x20000;
pub const DDSD_LINEARSIZE: u32 = 0x80000;
pub const DDSD_DEPTH: u32 = 0x800000;

pub const DDPF_ALPHAPIXELS: u32 = 0x1;
pub const DDPF_FOURCC: u32 = 0x4;
pub const DDPF_RGB: u32 = 0x40;
pub const DDPF_RGBA: u32 = DDPF_RGB | DDPF_ALPHAPIXELS;
pub const DDPF_LUMINANCE: u32 = 0x20000;

pub const DDSCAPS_COMPLEX: u32 = 0x8;
pub const DDSCAPS_TEXTURE: u32 = 0x1000;
pub const DDSCAPS_MIPMAP: u32 = 0x400000;

pub const DDSCAPS2_CUBEMAP: u32 = 0x200;
pub const DDSCAPS2_CUBEMAP_ALLFACES: u32 = 0xFC00;
pub const DDSCAPS2_VOLUME: u32 = 0x200000;

pub const D3D10_RESOURCE_DIMENSION_TEXTURE2D: u32 = 3;
pub const D3D10_RESOURCE_DIMENSION_TEXTURE3D: u32 = 4;
pub const D3D10_RESOURCE_MISC_TEXTURECUBE: u32 = 0x4;

/// FourCC announcing a [`DdsHeaderDx10`] after the main header
pub const FOURCC_DX10: u32 = u32::from_le_bytes(*b"DX10");

#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct DdsPixelFormat {
    pub size: u32,
    pub flags: u32,
    pub four_cc: u32,
    pub rgb_bit_count: u32,
    pub r_bit_mask: u32,
    pub g_bit_mask: u32,
    pub b_bit_mask: u32,
    pub a_bit_mask: u32,
}

impl DdsPixelFormat {
    fn bitmask(flags: u32, rgb_bit_count: u32, r: u32, g: u32, b: u32, a: u32) -> Self {
        Self {
            size: DDS_PIXELFORMAT_SIZE,
            flags,
            four_cc: 0,
            rgb_bit_count,
            r_bit_mask: r,
            g_bit_mask: g,
            b_bit_mask: b,
            a_bit_mask: a,
        }
    }

    fn four_cc(four_cc: u32) -> Self {
        Self {
            size: DDS_PIXELFORMAT_SIZE,
            flags: DDPF_FOURCC,
            four_cc,
            ..Default::default()
        }
    }

    /// Describe a native format, falling back to the `DX10` FourCC.
    pub fn for_format(format: PixelFormat) -> Self {
        use PixelFormat as P;

        match format {
            P::R5G6B5 => Self::bitmask(DDPF_RGB, 16, 0xF800, 0x07E0, 0x001F, 0),
            P::R8G8B8 => Self::bitmask(DDPF_RGB, 24, 0x00FF0000, 0x0000FF00, 0x000000FF, 0),
            P::B8G8R8 => Self::bitmask(DDPF_RGB, 24, 0x000000FF, 0x0000FF00, 0x00FF0000, 0),
            P::A8R8G8B8 | P::A8R8G8B8_GAMMA => {
                Self::bitmask(DDPF_RGBA, 32, 0x00FF0000, 0x0000FF00, 0x000000FF, 0xFF000000)
            }
            P::X8B8G8R8 => Self::bitmask(DDPF_RGB, 32, 0x0000FF00, 0x00FF0000, 0xFF000000, 0),
            P::B8G8R8A8 | P::B8G8R8X8 => {
                Self::bitmask(DDPF_RGBA, 32, 0x000000FF, 0x0000FF00, 0x00FF0000, 0xFF000000)
            }
            P::X8R8G8B8 => Self::bitmask(DDPF_RGB, 32, 0x00FF0000, 0x0000FF00, 0x000000FF, 0),
            P::D24FS8 => Self::bitmask(DDPF_LUMINANCE, 32, 0xFFFFFF00, 0, 0, 0x000000FF),
            _ => Self::four_cc(FOURCC_DX10),
        }
    }

    pub fn is_dx10(&self) -> bool {
        self.flags & DDPF_FOURCC != 0 && self.four_cc == FOURCC_DX10
    }
}

/// The 124 byte `DDS_HEADER`, preceded by the `DDS ` magic
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little, magic = b"DDS ")]
pub struct DdsHeader {
    pub size: u32,
    pub flags: u32,
    pub height: u32,
    pub width: u32,
    pub pitch_or_linear_size: u32,
    pub depth: u32,
    pub mip_map_count: u32,
    pub reserved1: [u32; 11],
    pub pixel_format: DdsPixelFormat,
    pub caps: u32,
    pub caps2: u32,
    pub caps3: u32,
    pub caps4: u32,
    pub reserved2: u32,
}

/// The 20 byte `DDS_HEADER_DXT10` extension
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct DdsHeaderDx10 {
    pub dxgi_format: u32,
    pub resource_dimension: u32,
    pub misc_flag: u32,
    pub array_size: u32,
    pub misc_flags2: u32,
}

/// Everything a DDS file holds before its pixel data
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DdsPrelude {
    pub header: DdsHeader,
    pub dx10: Option<DdsHeaderDx10>,
}

impl DdsPrelude {
    /// Build the headers describing the surface of `texture`.
    ///
    /// Fails with [`Error::MissingDxgiFormat`] when the format needs an extended header but
    /// has no DXGI equivalent.
    pub fn from_texture(texture: &TextureHeader) -> Result<Self> {
        let layout = texture.format.layout();
        let kind = texture.kind();
        let mip_levels = texture.mip_levels();

        let mut flags = DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT;
        flags |= if layout.is_block_compressed() {
            DDSD_LINEARSIZE
        } else {
            DDSD_PITCH
        };
        if mip_levels > 1 {
            flags |= DDSD_MIPMAPCOUNT;
        }
        if kind == TextureKind::Volume {
            flags |= DDSD_DEPTH;
        }

        let mut caps = DDSCAPS_TEXTURE;
        if mip_levels > 1 {
            caps |= DDSCAPS_MIPMAP | DDSCAPS_COMPLEX;
        }
        let caps2 = match kind {
            TextureKind::Plain => 0,
            TextureKind::Cubemap => {
                caps |= DDSCAPS_COMPLEX;
                DDSCAPS2_CUBEMAP | DDSCAPS2_CUBEMAP_ALLFACES
            }
            TextureKind::Volume => {
                caps |= DDSCAPS_COMPLEX;
                DDSCAPS2_VOLUME
            }
        };

        let pixel_format = DdsPixelFormat::for_format(texture.format);
        let header = DdsHeader {
            size: DDS_HEADER_SIZE,
            flags,
            height: texture.height as u32,
            width: texture.width as u32,
            pitch_or_linear_size: layout
                .pitch_or_linear_size(texture.width as u32, texture.height as u32),
            depth: texture.depth as u32,
            mip_map_count: mip_levels.max(1) as u32,
            pixel_format,
            caps,
            caps2,
            ..Default::default()
        };

        let dx10 = if pixel_format.is_dx10() {
            let dxgi = texture
                .format
                .dxgi_format()
                .ok_or(Error::MissingDxgiFormat(texture.format))?;
            Some(DdsHeaderDx10::new(dxgi, kind))
        } else {
            trace!(format = ?texture.format, "format has a legacy pixel format description");
            None
        };

        Ok(Self { header, dx10 })
    }

    /// Size in bytes of the serialized prelude
    pub fn encoded_len(&self) -> usize {
        4 + DDS_HEADER_SIZE as usize + if self.dx10.is_some() { 20 } else { 0 }
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut buffer = Cursor::new(Vec::with_capacity(self.encoded_len()));
        self.header.write(&mut buffer)?;
        if let Some(dx10) = &self.dx10 {
            dx10.write(&mut buffer)?;
        }
        writer.write_all(buffer.get_ref())?;
        Ok(())
    }
}

impl DdsHeaderDx10 {
    pub fn new(format: DxgiFormat, kind: TextureKind) -> Self {
        Self {
            dxgi_format: format as u32,
            resource_dimension: match kind {
                TextureKind::Volume => D3D10_RESOURCE_DIMENSION_TEXTURE3D,
                _ => D3D10_RESOURCE_DIMENSION_TEXTURE2D,
            },
            misc_flag: match kind {
                TextureKind::Cubemap => D3D10_RESOURCE_MISC_TEXTURECUBE,
                _ => 0,
            },
            array_size: 1,
            misc_flags2: 0,
        }
    }
}

/// Produce a complete DDS file for a texture and its pixel data.
pub fn build_dds(texture: &TextureHeader, pixels: &[u8]) -> Result<Vec<u8>> {
    let prelude = DdsPrelude::from_texture(texture)?;
    let mut output = Vec::with_capacity(prelude.encoded_len() + pixels.len());
    prelude.write_to(&mut output)?;
    output.extend_from_slice(pixels);
    Ok(output)
}
