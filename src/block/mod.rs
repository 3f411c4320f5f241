
//! Handle the image as a grid of 4x4 pixel blocks.
//! Extracts blocks from the accumulated float pixels
//! and compresses rows of blocks, possibly on multiple threads.

pub mod compressor;


use crate::math::{Vec2, Vec4};
use crate::compression::{PixelBlock, BLOCK_SIZE, BLOCK_PIXEL_COUNT};


/// Copy the pixels of one block out of an interleaved float image.
/// Pixels beyond the right or bottom edge, and lanes beyond
/// the channel count, are zero.
pub fn extract_block(
    pixels: &[f32], image_size: Vec2<usize>, channel_count: usize,
    block_index: Vec2<usize>
) -> PixelBlock
{
    debug_assert!(channel_count >= 1 && channel_count <= 4, "channel count bug");
    debug_assert_eq!(pixels.len(), image_size.area() * channel_count, "pixel buffer size bug");

    let mut block = [Vec4::ZERO; BLOCK_PIXEL_COUNT];

    let start = block_index.map(|index| index * BLOCK_SIZE);
    let end = Vec2(
        (start.x() + BLOCK_SIZE).min(image_size.width()),
        (start.y() + BLOCK_SIZE).min(image_size.height())
    );

    for y in start.y() .. end.y() {
        for x in start.x() .. end.x() {
            let first_sample = (y * image_size.width() + x) * channel_count;
            let samples = &pixels[first_sample .. first_sample + channel_count];

            let mut lanes = [0.0; 4];
            lanes[.. channel_count].copy_from_slice(samples);

            block[(y - start.y()) * BLOCK_SIZE + (x - start.x())] = Vec4(lanes);
        }
    }

    block
}
