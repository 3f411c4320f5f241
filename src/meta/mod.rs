
//! Describes all meta data of a dds image,
//! both as requested by the caller and as written to the file.

pub mod attribute;
pub mod layout;
pub mod header;


use crate::math::Vec2;
use crate::error::{UnitResult, Error};
use crate::compression::Compression;
use self::attribute::{Attributes, AttributeValue, SampleType, ChannelIndices, name};


/// The largest width or height a dds header can describe.
pub const MAX_IMAGE_SIZE: usize = 65535;


/// Describes the image that the caller intends to write.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDescriptor {

    /// Width and height of the image in pixels.
    pub size: Vec2<usize>,

    /// The number of slices of a volume. Only flat images, with a depth of one, can be written.
    pub depth: usize,

    /// The y coordinate of the first row. Scanlines are addressed relative to this.
    pub y_origin: i32,

    /// The number of interleaved samples per pixel.
    pub channel_count: usize,

    /// The sample type that the caller prefers to provide.
    /// Pixels are always quantized to 8 bits before encoding.
    pub sample_type: SampleType,

    /// Which interleaved channel carries which color.
    pub channels: ChannelIndices,

    /// Additional settings, see `attribute::name`.
    pub attributes: Attributes,
}

impl ImageDescriptor {

    /// A flat image with the conventional channel layout and no attributes.
    pub fn new(size: impl Into<Vec2<usize>>, channel_count: usize, sample_type: SampleType) -> Self {
        ImageDescriptor {
            size: size.into(),
            depth: 1,
            y_origin: 0,
            channel_count,
            sample_type,
            channels: ChannelIndices::for_channel_count(channel_count),
            attributes: Attributes::new(),
        }
    }

    /// Set the depth.
    pub fn with_depth(self, depth: usize) -> Self {
        ImageDescriptor { depth, ..self }
    }

    /// Set the y coordinate of the first row.
    pub fn with_y_origin(self, y_origin: i32) -> Self {
        ImageDescriptor { y_origin, ..self }
    }

    /// Replace the channel layout.
    pub fn with_channels(self, channels: ChannelIndices) -> Self {
        ImageDescriptor { channels, ..self }
    }

    /// Add or replace an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    /// Request a block compression.
    pub fn with_compression(self, compression: Compression) -> Self {
        self.with_attribute(name::COMPRESSION, compression.name())
    }

    /// The requested compression. Absent or unknown names request raw pixels.
    pub fn compression(&self) -> Compression {
        self.attributes.text(name::COMPRESSION)
            .map(Compression::from_name)
            .unwrap_or(Compression::None)
    }

    /// Whether the caller asked for dithering before quantization.
    pub fn dither(&self) -> bool {
        self.attributes.i32_or(name::DITHER, 0) != 0
    }

    /// The number of samples in one full row.
    pub fn row_sample_count(&self) -> usize {
        self.size.width() * self.channel_count
    }

    /// Check whether this image can be described by a dds header.
    pub fn validate(&self) -> UnitResult {
        if self.depth > 1 {
            return Err(Error::unsupported("volume textures"));
        }

        let in_range = |extent: usize| extent >= 1 && extent <= MAX_IMAGE_SIZE;
        if !in_range(self.size.width()) || !in_range(self.size.height()) {
            return Err(Error::invalid("image size must be between 1 and 65535 pixels"));
        }

        if self.channel_count < 1 || self.channel_count > 4 {
            return Err(Error::invalid("channel count must be between 1 and 4"));
        }

        let out_of_range = self.channels.to_array().iter()
            .flatten().any(|&index| index >= self.channel_count);

        if out_of_range {
            return Err(Error::invalid("channel index exceeds channel count"));
        }

        Ok(())
    }
}
