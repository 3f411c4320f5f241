
//! Interpolated single channel blocks.
//! Used directly by `BC4`, and as the alpha half of `DXT4` and `DXT5`.

use super::{PixelBlock, BlockParameters, BLOCK_PIXEL_COUNT, quantize};


pub(super) fn compress_block(block: &PixelBlock, _parameters: &BlockParameters, out: &mut [u8]) {
    encode_interpolated(&lane_values(block, 0), out);
}

/// Collect one lane of every pixel.
pub(super) fn lane_values(block: &PixelBlock, lane: usize) -> [f32; BLOCK_PIXEL_COUNT] {
    let mut values = [0.0; BLOCK_PIXEL_COUNT];
    for (value, pixel) in values.iter_mut().zip(block.iter()) {
        *value = pixel.0[lane];
    }

    values
}

/// Writes 8 bytes: two 8-bit endpoints and sixteen 3-bit indices.
/// Always uses the eight value mode, with the larger endpoint first.
pub(super) fn encode_interpolated(values: &[f32; BLOCK_PIXEL_COUNT], out: &mut [u8]) {
    debug_assert_eq!(out.len(), 8, "interpolated block size bug");

    let values = values.map(|value| quantize(value, 255) as f32);

    let max = values.iter().copied().fold(0.0_f32, f32::max);
    let min = values.iter().copied().fold(255.0_f32, f32::min);

    out[0] = max as u8;
    out[1] = min as u8;

    if max <= min {
        out[2 ..].iter_mut().for_each(|byte| *byte = 0);
        return;
    }

    let mut palette = [max, min, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    for step in 1 ..= 6 {
        palette[step + 1] = ((7 - step) as f32 * max + step as f32 * min) / 7.0;
    }

    let mut indices = 0_u64;
    for (pixel, &value) in values.iter().enumerate() {
        let index = palette.iter()
            .map(|&entry| (entry - value).abs())
            .enumerate()
            .fold((0, f32::INFINITY), |best, (index, distance)| {
                if distance < best.1 { (index, distance) } else { best }
            }).0;

        indices |= (index as u64) << (3 * pixel);
    }

    out[2 ..].copy_from_slice(&indices.to_le_bytes()[.. 6]);
}
