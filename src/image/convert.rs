
//! Quantize incoming samples of any type to 8 bits,
//! optionally adding a small deterministic noise first.

use half::f16;
use crate::error::{Result, Error};
use crate::meta::attribute::SampleType;


/// Where the samples of a scanline are located, used to seed the dither noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DitherPosition {
    pub y: i32,
    pub z: i32,
    pub channel_count: usize,
}


/// Return the first `sample_count` samples as 8-bit values.
/// Already 8-bit samples are returned without copying.
/// Other types are converted into the `converted` buffer.
pub(crate) fn quantize_samples<'s>(
    sample_type: SampleType, data: &'s [u8], sample_count: usize,
    dither: Option<DitherPosition>, converted: &'s mut Vec<u8>
) -> Result<&'s [u8]>
{
    let byte_count = sample_count * sample_type.bytes_per_sample();
    if data.len() < byte_count {
        return Err(Error::invalid("scanline contains fewer samples than the image is wide"));
    }

    let data = &data[.. byte_count];

    match sample_type {
        SampleType::U8 => return Ok(data),

        SampleType::U16 => fill_quantized(converted, dither, data.chunks_exact(2).map(|bytes| {
            f32::from(u16::from_ne_bytes([bytes[0], bytes[1]])) / f32::from(u16::MAX)
        })),

        SampleType::F16 => fill_quantized(converted, dither, data.chunks_exact(2).map(|bytes| {
            f16::from_bits(u16::from_ne_bytes([bytes[0], bytes[1]])).to_f32()
        })),

        SampleType::F32 => fill_quantized(converted, dither, data.chunks_exact(4).map(|bytes| {
            f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
        })),
    }

    Ok(converted.as_slice())
}

fn fill_quantized(converted: &mut Vec<u8>, dither: Option<DitherPosition>, values: impl Iterator<Item = f32>) {
    converted.clear();

    converted.extend(values.enumerate().map(|(index, value)| {
        let noise = dither.map_or(0.0, |position| {
            let channel_count = position.channel_count.max(1);
            dither_noise(index / channel_count, position.y, position.z, index % channel_count)
        });

        quantize_u8(value, noise)
    }));
}

/// Map the unit interval to `0 ..= 255`, rounding to nearest.
/// The noise shifts the rounding threshold by up to half a step.
pub(crate) fn quantize_u8(value: f32, noise: f32) -> u8 {
    let scaled = (value * 255.0 + 0.5 + noise).floor();
    if scaled.is_nan() || scaled <= 0.0 { 0 }
    else if scaled >= 255.0 { 255 }
    else { scaled as u8 }
}

/// A pseudo random value in `-0.5 .. 0.5`, always the same for the same sample.
pub(crate) fn dither_noise(x: usize, y: i32, z: i32, channel: usize) -> f32 {
    let mut hash = (x as u32).wrapping_mul(0x9E37_79B1)
        ^ (y as u32).wrapping_mul(0x85EB_CA77)
        ^ (z as u32).wrapping_mul(0xC2B2_AE3D)
        ^ (channel as u32).wrapping_mul(0x27D4_EB2F);

    hash ^= hash >> 15;
    hash = hash.wrapping_mul(0x2C1B_3C6D);
    hash ^= hash >> 12;
    hash = hash.wrapping_mul(0x297A_2D39);
    hash ^= hash >> 15;

    (hash >> 8) as f32 / (1_u32 << 24) as f32 - 0.5
}
