
//! Contains the fixed size dds header and its optional extension.

use crate::io::{Write, Data};
use crate::error::{Result, UnitResult, Error, usize_to_u32};
use crate::math::Vec2;
use crate::compression::Compression;
use crate::meta::layout::RawPixelLayout;


/// The first four bytes of every dds file.
pub const MAGIC: [u8; 4] = *b"DDS ";

/// The byte size of the header, excluding the magic number.
pub const HEADER_BYTE_SIZE: u32 = 124;

/// The byte size of the pixel format, which is part of the header.
pub const PIXEL_FORMAT_BYTE_SIZE: u32 = 32;

/// The byte size of the extension header that follows a `DX10` pixel format.
pub const DX10_HEADER_BYTE_SIZE: usize = 20;

/// The four character code that announces the extension header.
pub const DX10_FOUR_CC: [u8; 4] = *b"DX10";


/// Bits of `Header::flags`. Marks which header fields contain valid data.
pub mod flags {

    /// The capability fields are valid. Always set.
    pub const CAPS: u32 = 0x1;

    /// The height is valid. Always set.
    pub const HEIGHT: u32 = 0x2;

    /// The width is valid. Always set.
    pub const WIDTH: u32 = 0x4;

    /// The pitch field contains the bytes per row of an uncompressed image.
    pub const PITCH: u32 = 0x8;

    /// The pixel format is valid. Always set.
    pub const PIXEL_FORMAT: u32 = 0x1000;

    /// The mip map count is valid.
    pub const MIPMAP_COUNT: u32 = 0x20000;

    /// The pitch field contains the total byte size of the compressed top level.
    pub const LINEAR_SIZE: u32 = 0x80000;

    /// The depth field is valid.
    pub const DEPTH: u32 = 0x800000;

    /// The flags set on every header written by this crate.
    pub const REQUIRED: u32 = CAPS | HEIGHT | WIDTH | PIXEL_FORMAT;
}

/// Bits of `PixelFormat::flags`.
pub mod pixel_format_flags {

    /// The alpha mask is valid.
    pub const ALPHA_PIXELS: u32 = 0x1;

    /// The four character code is valid, the pixels are compressed.
    pub const FOUR_CC: u32 = 0x4;

    /// The bit count and color masks are valid, the pixels are uncompressed.
    pub const RGB: u32 = 0x40;
}

/// Bits of the first capability field.
pub mod caps {

    /// Required on every texture.
    pub const TEXTURE: u32 = 0x1000;
}


/// Describes how the pixels are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelFormat {

    /// See `pixel_format_flags`.
    pub flags: u32,

    /// Names the block compression, if any.
    pub four_cc: [u8; 4],

    /// The bits per raw pixel, or zero.
    pub rgb_bit_count: u32,

    /// The bits of a raw pixel that store each channel, in `r, g, b, a` order.
    pub masks: [u32; 4],
}

/// Additional information about the pixel format, following the main header.
/// Only present if the four character code is `DX10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dx10Header {

    /// A `DXGI_FORMAT` value.
    pub dxgi_format: u32,

    /// A `D3D10_RESOURCE_DIMENSION` value.
    pub resource_dimension: u32,

    /// Miscellaneous resource flags, such as cube maps.
    pub misc_flag: u32,

    /// The number of array layers.
    pub array_size: u32,

    /// Additional flags, such as alpha modes.
    pub misc_flags2: u32,
}

/// The meta data of a dds file. Contains everything
/// that precedes the pixel data, except the magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {

    /// See `flags`.
    pub flags: u32,

    /// The number of pixel rows.
    pub height: u32,

    /// The number of pixels per row.
    pub width: u32,

    /// Bytes per row for raw pixels, total byte size for compressed pixels.
    pub pitch_or_linear_size: u32,

    /// The depth of a volume texture. Zero for flat textures.
    pub depth: u32,

    /// The number of stored resolution levels.
    pub mipmap_count: u32,

    /// How pixels are encoded.
    pub pixel_format: PixelFormat,

    /// Capability fields. See `caps`.
    pub caps: [u32; 4],

    /// Present if the pixel format is described by a `DX10` extension.
    pub dx10: Option<Dx10Header>,
}


/// The four character code written for a block compression,
/// or none if the compression can not be written.
pub fn four_cc(compression: Compression) -> Option<[u8; 4]> {
    match compression {
        Compression::DXT1 => Some(*b"DXT1"),
        Compression::DXT2 => Some(*b"DXT2"),
        Compression::DXT3 => Some(*b"DXT3"),
        Compression::DXT4 => Some(*b"DXT4"),
        Compression::DXT5 => Some(*b"DXT5"),
        Compression::BC4 => Some(*b"ATI1"),
        _ => None,
    }
}


impl Header {

    fn with_size(size: Vec2<usize>, flags: u32, pixel_format: PixelFormat) -> Result<Self> {
        Ok(Header {
            flags: flags::REQUIRED | flags,
            width: usize_to_u32(size.width(), "image width too large")?,
            height: usize_to_u32(size.height(), "image height too large")?,
            pitch_or_linear_size: 0,
            depth: 0,
            mipmap_count: 1,
            pixel_format,
            caps: [ caps::TEXTURE, 0, 0, 0 ],
            dx10: None,
        })
    }

    /// The header of a block compressed image.
    /// Fails for compressions without a four character code.
    pub fn for_compressed_pixels(size: Vec2<usize>, compression: Compression) -> Result<Self> {
        let four_cc = four_cc(compression).ok_or_else(||
            Error::unsupported(format!("writing {}", compression))
        )?;

        let mut header = Self::with_size(size, flags::LINEAR_SIZE, PixelFormat {
            flags: pixel_format_flags::FOUR_CC,
            four_cc,
            .. PixelFormat::default()
        })?;

        header.pitch_or_linear_size = usize_to_u32(compression.storage_byte_size(size), "compressed image too large")?;
        Ok(header)
    }

    /// The header of an uncompressed image.
    pub fn for_raw_pixels(size: Vec2<usize>, layout: &RawPixelLayout) -> Result<Self> {
        let alpha_flag = if layout.has_alpha() { pixel_format_flags::ALPHA_PIXELS } else { 0 };

        let mut header = Self::with_size(size, flags::PITCH, PixelFormat {
            flags: pixel_format_flags::RGB | alpha_flag,
            four_cc: [0; 4],
            rgb_bit_count: layout.bits_per_pixel,
            masks: layout.masks(),
        })?;

        header.pitch_or_linear_size = usize_to_u32(layout.pitch(size.width()), "image row too large")?;
        Ok(header)
    }

    /// Describe the pixel format with an extension header instead.
    pub fn with_dx10_extension(mut self, extension: Dx10Header) -> Self {
        self.pixel_format.flags |= pixel_format_flags::FOUR_CC;
        self.pixel_format.four_cc = DX10_FOUR_CC;
        self.dx10 = Some(extension);
        self
    }

    /// The number of bytes before the pixel data, including the magic number.
    pub fn byte_size(&self) -> usize {
        let extension = if self.dx10.is_some() { DX10_HEADER_BYTE_SIZE } else { 0 };
        MAGIC.len() + HEADER_BYTE_SIZE as usize + extension
    }

    /// Write the magic number, the header, and the extension if present.
    /// Sizes and dimensions are little endian. Flags and masks
    /// keep the byte order of the writing machine.
    pub fn write(&self, write: &mut impl Write) -> UnitResult {
        u8::write_slice(write, &MAGIC)?;

        HEADER_BYTE_SIZE.write(write)?;
        self.flags.write_native(write)?;
        self.height.write(write)?;
        self.width.write(write)?;
        self.pitch_or_linear_size.write(write)?;
        self.depth.write(write)?;
        self.mipmap_count.write(write)?;
        u32::write_slice(write, &[0; 11])?;

        self.pixel_format.write(write)?;

        for &capability in &self.caps {
            capability.write_native(write)?;
        }

        0_u32.write(write)?;

        if let Some(extension) = &self.dx10 {
            extension.write(write)?;
        }

        Ok(())
    }
}

impl PixelFormat {

    /// Write the 32 bytes of this pixel format.
    pub fn write(&self, write: &mut impl Write) -> UnitResult {
        PIXEL_FORMAT_BYTE_SIZE.write(write)?;
        self.flags.write_native(write)?;
        u8::write_slice(write, &self.four_cc)?;
        self.rgb_bit_count.write(write)?;

        for &mask in &self.masks {
            mask.write_native(write)?;
        }

        Ok(())
    }
}

impl Dx10Header {

    /// Write the 20 bytes of this extension.
    pub fn write(&self, write: &mut impl Write) -> UnitResult {
        self.dxgi_format.write(write)?;
        self.resource_dimension.write(write)?;
        self.misc_flag.write(write)?;
        self.array_size.write(write)?;
        self.misc_flags2.write(write)?;
        Ok(())
    }
}
