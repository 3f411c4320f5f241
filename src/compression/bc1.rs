
//! Four color blocks, optionally with a single bit of alpha.
//! Used directly by `DXT1`, and as the color half of `DXT2` to `DXT5`.

use crate::math::Vec4;
use super::{PixelBlock, BlockParameters, BLOCK_PIXEL_COUNT, quantize};

/// Ignore the alpha lane when comparing colors.
const RGB: Vec4 = Vec4::new(1.0, 1.0, 1.0, 0.0);

const POWER_ITERATIONS: usize = 8;
const EPSILON: f32 = 1.0 / 4096.0;

/// Index `3` of a three color block.
const TRANSPARENT_INDEX: u32 = 3;


pub(super) fn compress_block(block: &PixelBlock, parameters: &BlockParameters, out: &mut [u8]) {
    encode_color_block(block, Some(parameters.alpha_cutoff), out);
}

/// Writes 8 bytes: two 565 endpoints and sixteen 2-bit indices.
/// Without a cutoff, the block always uses four color mode, as required
/// when the block is followed by separate alpha data.
pub(super) fn encode_color_block(block: &PixelBlock, alpha_cutoff: Option<f32>, out: &mut [u8]) {
    debug_assert_eq!(out.len(), 8, "color block size bug");

    let mut colors = [Vec4::ZERO; BLOCK_PIXEL_COUNT];
    let mut transparent = [false; BLOCK_PIXEL_COUNT];

    for ((color, is_transparent), pixel) in colors.iter_mut().zip(transparent.iter_mut()).zip(block.iter()) {
        let pixel = pixel.saturate();
        *color = pixel.multiply(RGB);
        *is_transparent = alpha_cutoff.map_or(false, |cutoff| pixel.w() < cutoff);
    }

    if transparent.iter().all(|&is_transparent| is_transparent) {
        write_block(out, 0, 0, u32::MAX);
        return;
    }

    let (start, end) = principal_endpoints(&colors, &transparent);
    let mut color0 = pack_565(start);
    let mut color1 = pack_565(end);

    let indices = if transparent.contains(&true) {
        // three color mode is selected by `color0 <= color1`
        if color0 > color1 { std::mem::swap(&mut color0, &mut color1); }

        let (first, last) = (unpack_565(color0), unpack_565(color1));
        let palette = [ first, last, first.lerp(last, 0.5) ];

        pack_indices(colors.iter().zip(transparent.iter()).map(|(&color, &is_transparent)| {
            if is_transparent { TRANSPARENT_INDEX } else { nearest_index(&palette, color) }
        }))
    }
    else if color0 == color1 {
        0
    }
    else {
        // four color mode is selected by `color0 > color1`
        if color0 < color1 { std::mem::swap(&mut color0, &mut color1); }

        let (first, last) = (unpack_565(color0), unpack_565(color1));
        let palette = [ first, last, first.lerp(last, 1.0 / 3.0), first.lerp(last, 2.0 / 3.0) ];
        pack_indices(colors.iter().map(|&color| nearest_index(&palette, color)))
    };

    write_block(out, color0, color1, indices);
}

/// Fit a line through the colors that are not ignored,
/// and return the extreme points of their projection onto it.
fn principal_endpoints(colors: &[Vec4; BLOCK_PIXEL_COUNT], ignored: &[bool; BLOCK_PIXEL_COUNT]) -> (Vec4, Vec4) {
    let used = || colors.iter().zip(ignored.iter())
        .filter(|&(_, &is_ignored)| !is_ignored)
        .map(|(&color, _)| color);

    let count = used().count().max(1) as f32;
    let mean = used().fold(Vec4::ZERO, |sum, color| sum + color) * (1.0 / count);

    let (min, max) = used().fold(
        (Vec4::splat(1.0).multiply(RGB), Vec4::ZERO),
        |(min, max), color| (min.min(color), max.max(color))
    );

    let mut covariance = [[0.0_f32; 3]; 3];
    for color in used() {
        let offset = color - mean;

        for (row, &row_offset) in covariance.iter_mut().zip(offset.0.iter()) {
            for (entry, &column_offset) in row.iter_mut().zip(offset.0.iter()) {
                *entry += row_offset * column_offset;
            }
        }
    }

    let extent = max - min;
    if extent.dot(extent).sqrt() < EPSILON { return (mean, mean); }

    // the row of the most varying channel is never orthogonal to the principal axis
    let row = |index: usize| Vec4::new(covariance[index][0], covariance[index][1], covariance[index][2], 0.0);
    let widest = (1 .. 3).fold(0, |widest, index| {
        if covariance[index][index] > covariance[widest][widest] { index } else { widest }
    });

    let seed = row(widest);
    let seed_length = seed.dot(seed).sqrt();
    if seed_length <= f32::MIN_POSITIVE {
        return most_distant_pair(colors, ignored);
    }

    let mut axis = seed * (1.0 / seed_length);
    for _ in 0 .. POWER_ITERATIONS {
        let next = Vec4::new(row(0).dot(axis), row(1).dot(axis), row(2).dot(axis), 0.0);

        let length = next.dot(next).sqrt();
        if length <= f32::MIN_POSITIVE { break; }
        axis = next * (1.0 / length);
    }

    let (min_projection, max_projection) = used()
        .map(|color| (color - mean).dot(axis))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), projection| {
            (min.min(projection), max.max(projection))
        });

    (
        (mean + axis * max_projection).saturate(),
        (mean + axis * min_projection).saturate(),
    )
}

/// The two used colors that are furthest apart.
fn most_distant_pair(colors: &[Vec4; BLOCK_PIXEL_COUNT], ignored: &[bool; BLOCK_PIXEL_COUNT]) -> (Vec4, Vec4) {
    let mut best = (Vec4::ZERO, Vec4::ZERO);
    let mut best_distance = -1.0;

    for (first_index, &first) in colors.iter().enumerate().filter(|&(index, _)| !ignored[index]) {
        for &second in colors[first_index ..].iter().zip(&ignored[first_index ..])
            .filter(|&(_, &is_ignored)| !is_ignored).map(|(color, _)| color)
        {
            let difference = first - second;
            let distance = difference.dot(difference);

            if distance > best_distance {
                best_distance = distance;
                best = (first, second);
            }
        }
    }

    best
}

fn nearest_index(palette: &[Vec4], color: Vec4) -> u32 {
    let mut best_index = 0;
    let mut best_distance = f32::INFINITY;

    for (index, &entry) in palette.iter().enumerate() {
        let difference = color - entry;
        let distance = difference.dot(difference);

        if distance < best_distance {
            best_distance = distance;
            best_index = index as u32;
        }
    }

    best_index
}

/// Pixel `i` occupies bits `2i .. 2i+2`.
fn pack_indices(indices: impl Iterator<Item = u32>) -> u32 {
    indices.enumerate().fold(0, |packed, (pixel, index)| packed | (index << (2 * pixel)))
}

pub(super) fn pack_565(color: Vec4) -> u16 {
    let red = quantize(color.x(), 31);
    let green = quantize(color.y(), 63);
    let blue = quantize(color.z(), 31);
    ((red << 11) | (green << 5) | blue) as u16
}

pub(super) fn unpack_565(color: u16) -> Vec4 {
    let color = u32::from(color);
    Vec4::new(
        (color >> 11) as f32 / 31.0,
        ((color >> 5) & 63) as f32 / 63.0,
        (color & 31) as f32 / 31.0,
        0.0
    )
}

fn write_block(out: &mut [u8], color0: u16, color1: u16, indices: u32) {
    out[0 .. 2].copy_from_slice(&color0.to_le_bytes());
    out[2 .. 4].copy_from_slice(&color1.to_le_bytes());
    out[4 .. 8].copy_from_slice(&indices.to_le_bytes());
}
