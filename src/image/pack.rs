
//! Pack 8-bit channels into raw pixels of arbitrary bit layout.

use bit_field::BitField;
use crate::io::Data;
use crate::error::{UnitResult, Error};
use crate::meta::layout::RawPixelLayout;


/// Rescale an 8-bit value to a channel of the specified bit count, rounding to nearest.
/// Zero stays zero and `255` becomes the largest value of the channel.
pub(crate) fn bit_range_convert(value: u8, bit_count: u32) -> u32 {
    debug_assert!(bit_count >= 1 && bit_count <= 32, "bit count bug");

    let max = u64::from(u32::MAX >> (32 - bit_count));
    ((u64::from(value) * max + 127) / 255) as u32
}

/// Whether pixels of this layout can be assembled in a machine word.
pub(crate) fn validate_packable(layout: &RawPixelLayout) -> UnitResult {
    match layout.bytes_per_pixel() {
        1 | 2 | 4 => Ok(()),
        byte_count => Err(Error::unsupported(format!(
            "packing channels into {}-byte pixels", byte_count
        ))),
    }
}

/// Replace the contents of `packed` with the raw pixels of one scanline.
/// Each pixel is written in little endian byte order.
pub(crate) fn pack_scanline(
    layout: &RawPixelLayout, samples: &[u8], channel_count: usize,
    packed: &mut Vec<u8>
) -> UnitResult
{
    validate_packable(layout)?;
    packed.clear();

    for pixel in samples.chunks_exact(channel_count) {
        let mut word = 0_u32;

        for channel in layout.channels.iter().flatten() {
            let value = bit_range_convert(pixel[channel.source_index], channel.bit_count);
            word.set_bits(channel.bit_range(), value);
        }

        match layout.bytes_per_pixel() {
            1 => (word as u8).write(packed)?,
            2 => (word as u16).write(packed)?,
            _ => word.write(packed)?,
        }
    }

    Ok(())
}
