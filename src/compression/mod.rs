
//! Contains the compression kind definition
//! and the table of block encoders that implement it.

mod bc1;
mod bc2;
mod bc3;
mod bc4;

use std::sync::atomic::{AtomicU32, Ordering};
use crate::math::{Vec2, Vec4, RoundingMode};
use crate::meta::attribute::SampleType;


/// A byte vector.
pub type ByteVec = Vec<u8>;

/// The number of pixels along each side of a compressed block.
pub const BLOCK_SIZE: usize = 4;

/// The number of pixels in a compressed block.
pub const BLOCK_PIXEL_COUNT: usize = BLOCK_SIZE * BLOCK_SIZE;

/// The pixels of one block, in row major order, one lane per channel.
/// Pixels outside the image and lanes without a channel are zero.
pub type PixelBlock = [Vec4; BLOCK_PIXEL_COUNT];

/// Encodes one pixel block into exactly `block_byte_size` bytes.
pub(crate) type BlockEncoder = fn(&PixelBlock, &BlockParameters, &mut [u8]);


/// Specifies how the pixels are stored in the file.
/// All compressed kinds encode 4x4 pixel blocks into a fixed number of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {

    /// Store bit-packed pixels without block compression.
    None,

    /// Four color block, with an optional single bit of alpha. 8 bytes per block.
    DXT1,

    /// Like `DXT3`, but the color is premultiplied by alpha.
    DXT2,

    /// Color block plus explicit 4-bit alpha. 16 bytes per block.
    DXT3,

    /// Like `DXT5`, but the color is premultiplied by alpha.
    DXT4,

    /// Color block plus interpolated 8-bit alpha. 16 bytes per block.
    DXT5,

    /// A single interpolated unsigned channel. 8 bytes per block.
    BC4,

    /// Two interpolated channels.
    /// __This compression is not yet supported by this implementation.__
    BC5,

    /// Unsigned high dynamic range color.
    /// __This compression is not yet supported by this implementation.__
    BC6HUnsigned,

    /// Signed high dynamic range color.
    /// __This compression is not yet supported by this implementation.__
    BC6HSigned,

    /// High quality color and alpha.
    /// __This compression is not yet supported by this implementation.__
    BC7,
}

impl Default for Compression {
    fn default() -> Self { Compression::None }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compression::None => write!(formatter, "no compression"),
            compression => write!(formatter, "{} compression", compression.name()),
        }
    }
}


impl Compression {

    /// All compression kinds, in declaration order.
    pub const ALL: [Compression; 11] = [
        Compression::None,
        Compression::DXT1, Compression::DXT2, Compression::DXT3, Compression::DXT4, Compression::DXT5,
        Compression::BC4, Compression::BC5,
        Compression::BC6HUnsigned, Compression::BC6HSigned,
        Compression::BC7,
    ];

    /// The canonical short name, as used in the `compression` attribute.
    /// Returns an empty string for `None`.
    pub fn name(self) -> &'static str {
        use self::Compression::*;
        match self {
            None => "",
            DXT1 => "DXT1",
            DXT2 => "DXT2",
            DXT3 => "DXT3",
            DXT4 => "DXT4",
            DXT5 => "DXT5",
            BC4 => "BC4",
            BC5 => "BC5",
            BC6HUnsigned => "BC6HU",
            BC6HSigned => "BC6HS",
            BC7 => "BC7",
        }
    }

    /// Parse the canonical short name. Unknown names are not an error,
    /// they simply request no compression.
    pub fn from_name(name: &str) -> Self {
        Compression::ALL.iter().copied()
            .find(|compression| *compression != Compression::None && compression.name() == name)
            .unwrap_or(Compression::None)
    }

    /// Whether pixels are stored in 4x4 blocks.
    pub fn is_block_compressed(self) -> bool {
        self != Compression::None
    }

    /// The number of bytes that one 4x4 block occupies in the file.
    /// Only meaningful for block compressed kinds.
    pub fn block_byte_size(self) -> usize {
        match self {
            Compression::DXT1 | Compression::BC4 => 8,
            _ => 16,
        }
    }

    /// The number of channels the encoder consumes per pixel.
    /// Normal maps store a reconstructable third channel in some kinds.
    pub fn channel_count(self, is_normal_map: bool) -> usize {
        use self::Compression::*;
        match self {
            DXT5 => if is_normal_map { 3 } else { 4 },
            BC5 => if is_normal_map { 3 } else { 2 },
            BC4 => 1,
            BC6HUnsigned | BC6HSigned => 3,
            _ => 4,
        }
    }

    /// The sample type of the decoded pixels.
    pub fn base_sample_type(self) -> SampleType {
        match self {
            Compression::BC6HUnsigned | Compression::BC6HSigned => SampleType::F16,
            _ => SampleType::U8,
        }
    }

    /// The number of blocks needed to cover an image,
    /// including partial blocks at the right and bottom edge.
    pub fn block_count(size: Vec2<usize>) -> Vec2<usize> {
        size.map(|pixels| RoundingMode::Up.divide(pixels, BLOCK_SIZE))
    }

    /// The number of bytes of compressed pixel data for an image of this size.
    pub fn storage_byte_size(self, size: Vec2<usize>) -> usize {
        Self::block_count(size).area() * self.block_byte_size()
    }

    /// The function that encodes a single block, if this kind can be encoded.
    pub(crate) fn block_encoder(self) -> Option<BlockEncoder> {
        use self::Compression::*;
        match self {
            DXT1 => Some(bc1::compress_block),
            DXT2 | DXT3 => Some(bc2::compress_block),
            DXT4 | DXT5 => Some(bc3::compress_block),
            BC4 => Some(bc4::compress_block),
            None | BC5 | BC6HUnsigned | BC6HSigned | BC7 => Option::None,
        }
    }

    /// Whether this encoder can produce blocks of this kind.
    pub fn is_supported(self) -> bool {
        self == Compression::None || self.block_encoder().is_some()
    }
}


/// Settings shared by all blocks of one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockParameters {

    /// In `DXT1` blocks, pixels with alpha below this value become fully transparent.
    pub alpha_cutoff: f32,
}

impl Default for BlockParameters {
    fn default() -> Self {
        BlockParameters { alpha_cutoff: default_alpha_cutoff() }
    }
}


/// The bits of `0.5_f32`.
static DEFAULT_ALPHA_CUTOFF: AtomicU32 = AtomicU32::new(0x3F00_0000);

/// The alpha cutoff used by images that do not specify one.
/// Each image reads this value once, when it is opened.
pub fn default_alpha_cutoff() -> f32 {
    f32::from_bits(DEFAULT_ALPHA_CUTOFF.load(Ordering::Relaxed))
}

/// Replace the alpha cutoff used by images that do not specify one.
/// Images that are already open keep the value they started with.
pub fn set_default_alpha_cutoff(alpha_cutoff: f32) {
    DEFAULT_ALPHA_CUTOFF.store(alpha_cutoff.to_bits(), Ordering::Relaxed);
}


/// Quantize a unit interval value to an integer in `0 ..= max`.
#[inline]
pub(crate) fn quantize(value: f32, max: u32) -> u32 {
    let scaled = (value * max as f32 + 0.5).floor();
    if scaled.is_nan() || scaled <= 0.0 { 0 }
    else { (scaled as u32).min(max) }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for &compression in Compression::ALL.iter() {
            assert_eq!(Compression::from_name(compression.name()), compression);
        }

        for name in &["DXT1", "DXT2", "DXT3", "DXT4", "DXT5", "BC4", "BC5", "BC6HU", "BC6HS", "BC7"] {
            assert_eq!(Compression::from_name(name).name(), *name);
        }
    }

    #[test]
    fn unknown_names_request_no_compression() {
        assert_eq!(Compression::from_name("dxt1"), Compression::None);
        assert_eq!(Compression::from_name("zip"), Compression::None);
        assert_eq!(Compression::from_name(""), Compression::None);
    }

    #[test]
    fn block_sizes() {
        assert_eq!(Compression::DXT1.block_byte_size(), 8);
        assert_eq!(Compression::BC4.block_byte_size(), 8);

        for &compression in &[
            Compression::DXT2, Compression::DXT3, Compression::DXT4, Compression::DXT5,
            Compression::BC5, Compression::BC6HUnsigned, Compression::BC6HSigned, Compression::BC7
        ] {
            assert_eq!(compression.block_byte_size(), 16, "{}", compression);
        }
    }

    #[test]
    fn channel_counts() {
        assert_eq!(Compression::DXT5.channel_count(false), 4);
        assert_eq!(Compression::DXT5.channel_count(true), 3);
        assert_eq!(Compression::BC5.channel_count(false), 2);
        assert_eq!(Compression::BC5.channel_count(true), 3);
        assert_eq!(Compression::BC4.channel_count(true), 1);
        assert_eq!(Compression::BC6HSigned.channel_count(false), 3);
        assert_eq!(Compression::DXT1.channel_count(true), 4);
        assert_eq!(Compression::BC7.channel_count(false), 4);
    }

    #[test]
    fn only_bc6h_uses_half_floats() {
        for &compression in Compression::ALL.iter() {
            let expected = match compression {
                Compression::BC6HUnsigned | Compression::BC6HSigned => SampleType::F16,
                _ => SampleType::U8,
            };

            assert_eq!(compression.base_sample_type(), expected);
        }
    }

    #[test]
    fn storage_rounds_partial_blocks_up() {
        for width in 1 .. 20 {
            for height in 1 .. 20 {
                let blocks = Compression::block_count(Vec2(width, height));
                assert_eq!(blocks, Vec2((width + 3) / 4, (height + 3) / 4));

                assert_eq!(
                    Compression::DXT5.storage_byte_size(Vec2(width, height)),
                    blocks.area() * 16
                );

                assert_eq!(
                    Compression::DXT1.storage_byte_size(Vec2(width, height)),
                    blocks.area() * 8
                );
            }
        }
    }

    #[test]
    fn unimplemented_kinds_have_no_encoder() {
        assert!(Compression::DXT1.is_supported());
        assert!(Compression::BC4.is_supported());
        assert!(Compression::None.is_supported());

        assert!(!Compression::BC5.is_supported());
        assert!(!Compression::BC6HUnsigned.is_supported());
        assert!(!Compression::BC6HSigned.is_supported());
        assert!(!Compression::BC7.is_supported());
    }

    #[test]
    fn quantize_boundaries() {
        assert_eq!(quantize(0.0, 31), 0);
        assert_eq!(quantize(1.0, 31), 31);
        assert_eq!(quantize(2.0, 63), 63);
        assert_eq!(quantize(-1.0, 63), 0);
        assert_eq!(quantize(f32::NAN, 255), 0);
        assert_eq!(quantize(0.5, 255), 128);
    }
}
