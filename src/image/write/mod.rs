
//! Write a dds image to a seekable byte stream, one scanline at a time.
//!
//! Uncompressed images are written as soon as each scanline arrives.
//! Block compressed images are accumulated in memory and compressed when closing,
//! because a block spans four scanlines.

pub mod options;


use std::convert::TryFrom;
use smallvec::SmallVec;
use crate::io::{Tracking, Write, Seek};
use crate::error::{Result, UnitResult, Error};
use crate::math::Vec2;
use crate::compression::{BlockParameters, default_alpha_cutoff};
use crate::block::compressor::BlockCompressor;
use crate::meta::ImageDescriptor;
use crate::meta::attribute::{SampleType, ChannelIndices, name};
use crate::meta::header::Header;
use crate::meta::layout::RawPixelLayout;
use crate::image::{convert, pack};
use self::options::WriteOptions;


/// The name of the file format written by `DdsWriter`.
pub const FORMAT_NAME: &str = "dds";

/// The file extensions of the file format written by `DdsWriter`.
pub const EXTENSIONS: &[&str] = &["dds"];


/// Writes dds images to a seekable byte stream.
///
/// Call `open` with a description of the image, then `write_scanline`
/// for each row, in any order, and finally `close`.
/// Closing is required to complete the file.
/// After closing, the same writer can write another image,
/// which will be appended to the stream.
#[derive(Debug)]
pub struct DdsWriter<W> {
    write: Tracking<W>,
    options: WriteOptions,
    session: Option<Session>,
}

/// The state of one open image.
#[derive(Debug)]
struct Session {
    header: Header,
    size: Vec2<usize>,
    y_origin: i32,
    channel_count: usize,

    /// Only raw pixels are dithered.
    dither: bool,

    /// The byte position of the first pixel.
    pixel_start: usize,

    /// Reused for each scanline that is not already 8-bit.
    converted: Vec<u8>,

    target: Target,
}

#[derive(Debug)]
enum Target {
    Raw {
        layout: RawPixelLayout,

        /// The input scanline can be copied to the file without repacking.
        byte_identical: bool,

        /// Reused for each packed scanline.
        packed: Vec<u8>,
    },

    Compressed {
        compressor: BlockCompressor,
        sources: SmallVec<[ChannelSource; 4]>,

        /// One float per channel of the compression, for every pixel of the image.
        pixels: Vec<f32>,
    },
}

/// Where a channel of the compressed pixels comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ChannelSource {

    /// The index of the interleaved input sample.
    index: Option<usize>,

    /// Used if the input has no such channel.
    default: f32,
}


impl<W: Write + Seek> DdsWriter<W> {

    /// Write images to the stream, starting at its current position.
    pub fn new(write: W) -> Result<Self> {
        Self::with_options(write, WriteOptions::default())
    }

    /// Write images to the stream, starting at its current position.
    pub fn with_options(write: W, options: WriteOptions) -> Result<Self> {
        Ok(DdsWriter {
            write: Tracking::at_current_position(write)?,
            options,
            session: None,
        })
    }

    /// Whether this writer supports a named feature.
    /// Writes to arbitrary streams, with or without alpha.
    pub fn supports(feature: &str) -> bool {
        matches!(feature, "ioproxy" | "alpha" | "mipmap")
    }

    /// Validate the image description and write the file header.
    /// Fails if an image is already open.
    /// If opening fails, the writer remains closed.
    pub fn open(&mut self, descriptor: &ImageDescriptor) -> UnitResult {
        if self.session.is_some() {
            return Err(Error::invalid("an image is already open"));
        }

        descriptor.validate()?;

        let compression = descriptor.compression();
        let (header, target) = if compression.is_block_compressed() {
            let header = Header::for_compressed_pixels(descriptor.size, compression)?;

            let alpha_cutoff = descriptor.attributes.f32_or(name::ALPHA_CUTOFF, default_alpha_cutoff());
            let compressor = BlockCompressor {
                compression,
                parameters: BlockParameters { alpha_cutoff },
                thread_count: self.options.thread_count,
            };

            let sources = channel_sources(descriptor.channels, compression.channel_count(false));
            let pixels = vec![0.0; descriptor.size.area() * sources.len()];

            (header, Target::Compressed { compressor, sources, pixels })
        }
        else {
            let layout = RawPixelLayout::from_attributes(
                &descriptor.attributes, descriptor.channel_count, descriptor.channels
            )?;

            let byte_identical = layout.is_byte_identical(descriptor.channel_count);
            if !byte_identical { pack::validate_packable(&layout)?; }

            let header = Header::for_raw_pixels(descriptor.size, &layout)?;
            (header, Target::Raw { layout, byte_identical, packed: Vec::new() })
        };

        header.write(&mut self.write)?;
        let pixel_start = self.write.byte_position();

        tracing::debug!(
            width = descriptor.size.width(), height = descriptor.size.height(),
            channels = descriptor.channel_count, %compression, pixel_start,
            "opened dds image"
        );

        self.session = Some(Session {
            header,
            size: descriptor.size,
            y_origin: descriptor.y_origin,
            channel_count: descriptor.channel_count,
            dither: descriptor.dither() && !compression.is_block_compressed(),
            pixel_start,
            converted: Vec::new(),
            target,
        });

        Ok(())
    }

    /// Write one row of interleaved samples.
    /// The row `y` is absolute, it is offset by the y origin of the image.
    /// Only the slice `z = 0` exists.
    /// If writing fails, the image is closed without completing the file.
    pub fn write_scanline(&mut self, y: i32, z: i32, sample_type: SampleType, data: &[u8]) -> UnitResult {
        let mut session = self.session.take()
            .ok_or_else(|| Error::invalid("no image is open"))?;

        let result = session.write_scanline(&mut self.write, y, z, sample_type, data);

        match result {
            Ok(()) => self.session = Some(session),
            Err(ref error) => tracing::debug!(%error, y, "discarding dds image after failed scanline"),
        }

        result
    }

    /// Write consecutive rows, starting at row `y`.
    /// The data must contain a whole number of rows.
    pub fn write_scanlines(&mut self, y: i32, z: i32, sample_type: SampleType, data: &[u8]) -> UnitResult {
        let row_byte_size = match &self.session {
            Some(session) => session.size.width() * session.channel_count * sample_type.bytes_per_sample(),
            None => return Err(Error::invalid("no image is open")),
        };

        if data.len() % row_byte_size != 0 {
            return Err(Error::invalid("data does not contain a whole number of scanlines"));
        }

        for (row, scanline) in data.chunks_exact(row_byte_size).enumerate() {
            let y = i32::try_from(row).ok().and_then(|row| y.checked_add(row))
                .ok_or_else(|| Error::invalid("too many scanlines"))?;

            self.write_scanline(y, z, sample_type, scanline)?;
        }

        Ok(())
    }

    /// Complete the file. Compressed images are compressed now.
    /// Closing a writer without an open image does nothing.
    pub fn close(&mut self) -> UnitResult {
        let session = match self.session.take() {
            Some(session) => session,
            None => return Ok(()),
        };

        session.finish(&mut self.write)?;
        tracing::debug!(byte_position = self.write.byte_position(), "closed dds image");
        Ok(())
    }
}

impl<W> DdsWriter<W> {

    /// Whether an image is open and accepts scanlines.
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// The header of the open image, if any.
    pub fn header(&self) -> Option<&Header> {
        self.session.as_ref().map(|session| &session.header)
    }

    /// The current byte position in the stream.
    pub fn byte_position(&self) -> usize {
        self.write.byte_position()
    }

    /// Release the stream. Any open image is discarded.
    pub fn into_inner(self) -> W {
        self.write.into_inner()
    }
}


impl Session {

    fn write_scanline<W: Write + Seek>(
        &mut self, write: &mut Tracking<W>,
        y: i32, z: i32, sample_type: SampleType, data: &[u8]
    ) -> UnitResult
    {
        if z != 0 {
            return Err(Error::unsupported("array textures and volume slices"));
        }

        let row = i64::from(y) - i64::from(self.y_origin);
        if row < 0 || row >= self.size.height() as i64 {
            return Err(Error::invalid("scanline outside of the image"));
        }

        let row = row as usize;
        let width = self.size.width();
        let sample_count = width * self.channel_count;

        let dither = if self.dither {
            Some(convert::DitherPosition { y, z, channel_count: self.channel_count })
        } else { None };

        let samples = convert::quantize_samples(sample_type, data, sample_count, dither, &mut self.converted)?;

        match &mut self.target {
            Target::Raw { layout, byte_identical, packed } => {
                let pitch = layout.pitch(width);
                write.seek_write_to(self.pixel_start + row * pitch)?;

                if *byte_identical {
                    write.write_all(&samples[.. pitch])?;
                }
                else {
                    pack::pack_scanline(layout, samples, self.channel_count, packed)?;
                    write.write_all(packed)?;
                }
            },

            Target::Compressed { sources, pixels, .. } => {
                let row_size = width * sources.len();
                let row_pixels = &mut pixels[row * row_size .. (row + 1) * row_size];

                let pixels_and_inputs = row_pixels.chunks_exact_mut(sources.len())
                    .zip(samples.chunks_exact(self.channel_count));

                for (pixel, input) in pixels_and_inputs {
                    for (value, source) in pixel.iter_mut().zip(sources.iter()) {
                        *value = source.index.map_or(source.default, |index| f32::from(input[index]) / 255.0);
                    }
                }
            },
        }

        Ok(())
    }

    fn finish<W: Write + Seek>(self, write: &mut Tracking<W>) -> UnitResult {
        match self.target {
            Target::Raw { layout, .. } => {
                // rows that were never written are zero
                let pixel_end = self.pixel_start + layout.pitch(self.size.width()) * self.size.height();
                write.seek_write_to(pixel_end)?;
            },

            Target::Compressed { compressor, pixels, .. } => {
                let blocks = compressor.compress_image(&pixels, self.size)?;
                write.seek_write_to(self.pixel_start)?;
                write.write_all(&blocks)?;
            },
        }

        write.flush()?;
        Ok(())
    }
}


/// Map each channel of the compression to an input channel.
/// Missing colors are zero and missing alpha is opaque.
/// A single channel compression reads red, or the first channel if there is no red.
fn channel_sources(channels: ChannelIndices, channel_count: usize) -> SmallVec<[ChannelSource; 4]> {
    if channel_count == 1 {
        let index = channels.red.or(Some(0));
        return std::iter::once(ChannelSource { index, default: 0.0 }).collect();
    }

    channels.to_array().iter().zip([0.0, 0.0, 0.0, 1.0].iter())
        .take(channel_count)
        .map(|(&index, &default)| ChannelSource { index, default })
        .collect()
}
