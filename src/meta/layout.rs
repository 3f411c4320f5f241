
//! Describes how the channels of an uncompressed pixel
//! are packed into the bits of a little endian word.

use bit_field::BitField;
use crate::error::{Result, Error};
use crate::meta::attribute::{ChannelIndices, Attributes, name};


/// The raw pixel widths that can be described by a dds header.
pub const SUPPORTED_BITS_PER_PIXEL: [u32; 4] = [ 8, 16, 24, 32 ];


/// Where the bits of one color channel are stored in a raw pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedChannel {

    /// The index of the interleaved input channel that provides this color.
    pub source_index: usize,

    /// How many bits of the pixel store this channel.
    pub bit_count: u32,

    /// The position of the lowest bit of this channel.
    pub shift: u32,
}

impl PackedChannel {

    /// The bits of the pixel that store this channel.
    pub fn mask(&self) -> u32 {
        let mut mask = 0_u32;
        let fits = self.shift.checked_add(self.bit_count).map_or(false, |end| end <= 32);
        if self.bit_count > 0 && fits { mask.set_bits(self.bit_range(), self.max_value()); }
        mask
    }

    /// The largest value this channel can hold.
    pub fn max_value(&self) -> u32 {
        u32::MAX.checked_shr(32 - self.bit_count.min(32)).unwrap_or(0)
    }

    /// The bits of the pixel that store this channel, as a range.
    pub fn bit_range(&self) -> std::ops::Range<usize> {
        self.shift as usize .. self.shift.saturating_add(self.bit_count) as usize
    }
}


/// The layout of one uncompressed pixel.
/// Channels are stacked from the lowest bit upwards, in `r, g, b, a` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPixelLayout {

    /// The width of one pixel in bits.
    pub bits_per_pixel: u32,

    /// The packed channels, in `r, g, b, a` order.
    /// Absent channels and channels without bits are `None`.
    pub channels: [Option<PackedChannel>; 4],
}

impl RawPixelLayout {

    /// Stack the channels with the given bit counts.
    /// A bit count is ignored if its channel is absent.
    pub fn new(bits_per_pixel: u32, indices: ChannelIndices, bit_counts: [u32; 4]) -> Result<Self> {
        if !SUPPORTED_BITS_PER_PIXEL.contains(&bits_per_pixel) {
            return Err(Error::invalid("raw pixel bit count must be 8, 16, 24 or 32"));
        }

        let mut channels = [None; 4];
        let mut shift = 0_u32;

        for ((channel, source_index), &bit_count) in channels.iter_mut().zip(indices.to_array().iter()).zip(bit_counts.iter()) {
            if let Some(source_index) = *source_index {
                if bit_count > bits_per_pixel || shift + bit_count > bits_per_pixel {
                    return Err(Error::invalid("channel bit counts exceed the raw pixel bit count"));
                }

                if bit_count != 0 {
                    *channel = Some(PackedChannel { source_index, bit_count, shift });
                    shift += bit_count;
                }
            }
        }

        Ok(RawPixelLayout { bits_per_pixel, channels })
    }

    /// Read the pixel width and channel bit counts from the attributes.
    /// Without attributes, every channel gets 8 bits.
    pub fn from_attributes(attributes: &Attributes, channel_count: usize, indices: ChannelIndices) -> Result<Self> {
        let default_bits_per_pixel = (8 * channel_count) as i32;
        let bits_per_pixel = attributes.i32_or(name::BITS_PER_SAMPLE, default_bits_per_pixel);

        if bits_per_pixel <= 0 {
            return Err(Error::invalid("raw pixel bit count must be positive"));
        }

        let bits_per_pixel = bits_per_pixel as u32;
        let default_bit_count = (bits_per_pixel as usize / channel_count.max(1)) as i32;

        let mut bit_counts = [0_u32; 4];
        for (bit_count, &attribute) in bit_counts.iter_mut().zip(name::BIT_COUNTS.iter()) {
            let value = attributes.i32_or(attribute, default_bit_count);
            if value < 0 { return Err(Error::invalid("channel bit count must not be negative")); }
            *bit_count = value as u32;
        }

        Self::new(bits_per_pixel, indices, bit_counts)
    }

    /// The width of one pixel in bytes.
    pub fn bytes_per_pixel(&self) -> usize {
        self.bits_per_pixel as usize / 8
    }

    /// The bytes of one row of pixels.
    pub fn pitch(&self, width: usize) -> usize {
        self.bytes_per_pixel() * width
    }

    /// The bit masks of all channels, in `r, g, b, a` order. Absent channels are zero.
    pub fn masks(&self) -> [u32; 4] {
        let mut masks = [0; 4];
        for (mask, channel) in masks.iter_mut().zip(self.channels.iter()) {
            *mask = channel.map_or(0, |channel| channel.mask());
        }

        masks
    }

    /// Whether any bits store alpha.
    pub fn has_alpha(&self) -> bool {
        self.channels[3].is_some()
    }

    /// Whether the interleaved 8-bit input is already the raw pixel,
    /// so that rows can be copied without repacking.
    pub fn is_byte_identical(&self, channel_count: usize) -> bool {
        self.bytes_per_pixel() == channel_count
            && self.channels.iter().flatten().all(|channel| channel.bit_count == 8)
    }
}
