
//! Compress a whole float image into its sequence of blocks.
//! The image is split into horizontal strips of block rows,
//! which are compressed independently, possibly on multiple threads.

use crate::math::{Vec2, RoundingMode};
use crate::error::{Result, Error};
use crate::compression::{Compression, BlockParameters, BlockEncoder, ByteVec};
use super::extract_block;


/// Strips should contain at least this many blocks,
/// to keep the scheduling overhead small compared to the work.
pub const MIN_BLOCKS_PER_STRIP: usize = 64;


/// Compresses an image on one or more threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockCompressor {

    /// Which block encoding to produce.
    pub compression: Compression,

    /// Settings shared by all blocks.
    pub parameters: BlockParameters,

    /// The number of threads to use. Zero chooses automatically, one disables threading.
    pub thread_count: usize,
}

impl BlockCompressor {

    /// Compress interleaved float pixels, with as many channels as the compression consumes.
    /// The blocks are returned in row major order. The output does not depend on the thread count.
    pub fn compress_image(&self, pixels: &[f32], size: Vec2<usize>) -> Result<ByteVec> {
        let encoder = self.compression.block_encoder().ok_or_else(||
            Error::unsupported(format!("writing {}", self.compression))
        )?;

        let channel_count = self.compression.channel_count(false);
        if pixels.len() != size.area() * channel_count {
            return Err(Error::invalid("pixel buffer does not match the image size"));
        }

        if size.area() == 0 {
            return Ok(ByteVec::new());
        }

        let mut output = vec![0_u8; self.compression.storage_byte_size(size)];
        let strips = StripWriter {
            pixels, size, channel_count, encoder,
            parameters: self.parameters,
            block_byte_size: self.compression.block_byte_size(),
            block_count: Compression::block_count(size),
        };

        #[cfg(feature = "rayon")]
        {
            if self.thread_count != 1 {
                if let Some(pool) = build_thread_pool(self.thread_count) {
                    let rows_per_strip = strips.rows_per_strip(pool.current_num_threads());

                    if rows_per_strip < strips.block_count.height() {
                        strips.compress_parallel(&pool, &mut output, rows_per_strip);
                        return Ok(output);
                    }
                }
            }
        }

        let rows_per_strip = strips.rows_per_strip(1);
        strips.compress_sequential(&mut output, rows_per_strip);
        Ok(output)
    }
}

#[cfg(feature = "rayon")]
fn build_thread_pool(thread_count: usize) -> Option<rayon_core::ThreadPool> {
    let maybe_pool = rayon_core::ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .thread_name(|index| format!("DDS Block Compressor Thread #{}", index))
        .build();

    // in case thread pool creation fails (for example on WASM currently),
    // we revert to sequential compression
    match maybe_pool {
        Ok(pool) => Some(pool),
        Err(error) => {
            tracing::warn!(%error, "could not create thread pool, compressing sequentially");
            None
        }
    }
}


/// Everything needed to compress any strip of the image.
#[derive(Clone, Copy)]
struct StripWriter<'p> {
    pixels: &'p [f32],
    size: Vec2<usize>,
    channel_count: usize,
    encoder: BlockEncoder,
    parameters: BlockParameters,
    block_byte_size: usize,
    block_count: Vec2<usize>,
}

impl StripWriter<'_> {

    /// Balance the rows across the threads, but keep strips large enough to be worth a task.
    fn rows_per_strip(&self, thread_count: usize) -> usize {
        let blocks_high = self.block_count.height();

        let balanced = RoundingMode::Up.divide(blocks_high, thread_count.max(1));
        let large_enough = RoundingMode::Up.divide(MIN_BLOCKS_PER_STRIP, self.block_count.width());

        balanced.max(large_enough).max(1).min(blocks_high)
    }

    fn strip_byte_size(&self, rows_per_strip: usize) -> usize {
        rows_per_strip * self.block_count.width() * self.block_byte_size
    }

    fn compress_sequential(&self, output: &mut [u8], rows_per_strip: usize) {
        for (strip_index, strip) in output.chunks_mut(self.strip_byte_size(rows_per_strip)).enumerate() {
            self.compress_strip(strip_index * rows_per_strip, strip);
        }
    }

    #[cfg(feature = "rayon")]
    fn compress_parallel(&self, pool: &rayon_core::ThreadPool, output: &mut [u8], rows_per_strip: usize) {
        let strip_byte_size = self.strip_byte_size(rows_per_strip);

        pool.scope(|scope| {
            for (strip_index, strip) in output.chunks_mut(strip_byte_size).enumerate() {
                let strips = *self;
                scope.spawn(move |_| strips.compress_strip(strip_index * rows_per_strip, strip));
            }
        });
    }

    /// Fill the strip, which starts at the specified block row, with encoded blocks.
    fn compress_strip(&self, first_block_row: usize, strip: &mut [u8]) {
        tracing::trace!(first_block_row, byte_size = strip.len(), "compressing strip");

        let blocks_wide = self.block_count.width();
        for (index, block_bytes) in strip.chunks_exact_mut(self.block_byte_size).enumerate() {
            let block_index = Vec2(index % blocks_wide, first_block_row + index / blocks_wide);
            let block = extract_block(self.pixels, self.size, self.channel_count, block_index);
            (self.encoder)(&block, &self.parameters, block_bytes);
        }
    }
}
