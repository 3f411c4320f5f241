extern crate dds_encode;

use dds_encode::prelude::*;
use dds_encode::meta::header::{pixel_format_flags, HEADER_BYTE_SIZE};
use std::io::{Cursor, Write};
use rand::Rng;


const HEADER_SIZE: usize = 4 + HEADER_BYTE_SIZE as usize;

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}

fn write_image(descriptor: &ImageDescriptor, options: WriteOptions, samples: &[u8]) -> Vec<u8> {
    let mut writer = DdsWriter::with_options(Cursor::new(Vec::new()), options).unwrap();
    writer.open(descriptor).unwrap();
    writer.write_scanlines(descriptor.y_origin, 0, SampleType::U8, samples).unwrap();
    writer.close().unwrap();
    writer.into_inner().into_inner()
}

fn random_samples(count: usize) -> Vec<u8> {
    let mut random = rand::rng();
    (0 .. count).map(|_| random.random::<u8>()).collect()
}


#[test]
fn raw_rgb_565() {
    let descriptor = ImageDescriptor::new((8, 2), 3, SampleType::U8)
        .with_attribute(attribute_name::BITS_PER_SAMPLE, 16)
        .with_attribute(attribute_name::BIT_COUNT_RED, 5)
        .with_attribute(attribute_name::BIT_COUNT_GREEN, 6)
        .with_attribute(attribute_name::BIT_COUNT_BLUE, 5);

    let mut samples = Vec::new();
    for _ in 0 .. 8 { samples.extend_from_slice(&[255, 0, 0]); }
    for _ in 0 .. 8 { samples.extend_from_slice(&[0, 0, 255]); }

    let file = write_image(&descriptor, WriteOptions::sequential(), &samples);
    assert_eq!(file.len(), HEADER_SIZE + 2 * 16);

    assert_eq!(u32_at(&file, 20), 16, "pitch");
    assert_eq!(u32_at(&file, 88), 16, "bits per pixel");

    if cfg!(target_endian = "little") {
        assert_eq!(u32_at(&file, 80), pixel_format_flags::RGB);
        assert_eq!([u32_at(&file, 92), u32_at(&file, 96), u32_at(&file, 100), u32_at(&file, 104)], [0x1F, 0x7E0, 0xF800, 0]);
    }

    let pixels = &file[HEADER_SIZE ..];
    assert!(pixels[.. 16].chunks_exact(2).all(|pixel| pixel == [0x1F, 0x00]));
    assert!(pixels[16 ..].chunks_exact(2).all(|pixel| pixel == [0x00, 0xF8]));
}

#[test]
fn raw_rgba_without_alpha_bits() {
    let descriptor = ImageDescriptor::new((8, 8), 4, SampleType::U8)
        .with_attribute(attribute_name::BITS_PER_SAMPLE, 16)
        .with_attribute(attribute_name::BIT_COUNT_RED, 5)
        .with_attribute(attribute_name::BIT_COUNT_GREEN, 6)
        .with_attribute(attribute_name::BIT_COUNT_BLUE, 5)
        .with_attribute(attribute_name::BIT_COUNT_ALPHA, 0);

    let file = write_image(&descriptor, WriteOptions::default(), &random_samples(8 * 8 * 4));
    assert_eq!(file.len(), HEADER_SIZE + 8 * 16);
    assert_eq!(u32_at(&file, 20), 16, "pitch");

    if cfg!(target_endian = "little") {
        assert_eq!([u32_at(&file, 92), u32_at(&file, 96), u32_at(&file, 100), u32_at(&file, 104)], [0x1F, 0x7E0, 0xF800, 0]);
    }
}

#[test]
fn raw_dither_stays_within_one_step() {
    let descriptor = ImageDescriptor::new((16, 4), 1, SampleType::F32)
        .with_attribute(attribute_name::DITHER, 1);

    let values: Vec<f32> = (0 .. 64).map(|index| (index * 4) as f32 / 255.0).collect();
    let data: Vec<u8> = values.iter().flat_map(|value| value.to_ne_bytes()).collect();

    let mut writer = DdsWriter::new(Cursor::new(Vec::new())).unwrap();
    writer.open(&descriptor).unwrap();
    writer.write_scanlines(0, 0, SampleType::F32, &data).unwrap();
    writer.close().unwrap();

    let file = writer.into_inner().into_inner();
    for (index, &byte) in file[HEADER_SIZE ..].iter().enumerate() {
        assert!((i32::from(byte) - index as i32 * 4).abs() <= 1);
    }
}

#[test]
fn raw_rgba_is_copied_verbatim() {
    let descriptor = ImageDescriptor::new((3, 2), 4, SampleType::U8);
    let samples: Vec<u8> = (0 .. 24).collect();

    let file = write_image(&descriptor, WriteOptions::default(), &samples);
    assert_eq!(&file[0 .. 4], b"DDS ");
    assert_eq!(&file[HEADER_SIZE ..], samples.as_slice());

    if cfg!(target_endian = "little") {
        assert_eq!(u32_at(&file, 80), pixel_format_flags::RGB | pixel_format_flags::ALPHA_PIXELS);
    }
}

#[test]
fn dxt1_uniform_red() {
    let descriptor = ImageDescriptor::new((4, 4), 4, SampleType::U8)
        .with_compression(Compression::DXT1);

    let samples: Vec<u8> = std::iter::repeat([255, 0, 0, 255]).take(16).flatten().collect();
    let file = write_image(&descriptor, WriteOptions::default(), &samples);

    assert_eq!(file.len(), HEADER_SIZE + 8);
    assert_eq!(u32_at(&file, 20), 8, "linear size");
    assert_eq!(&file[84 .. 88], b"DXT1");
    assert_eq!(&file[HEADER_SIZE ..], &[0x00, 0xF8, 0x00, 0xF8, 0, 0, 0, 0]);
}

/// The sixteen 8-bit colors of a 565 color block, as a gpu would decode them.
fn decode_color_block(bytes: &[u8], force_four_colors: bool) -> Vec<[i32; 3]> {
    let color0 = u16::from_le_bytes([bytes[0], bytes[1]]);
    let color1 = u16::from_le_bytes([bytes[2], bytes[3]]);
    let indices = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

    let unpack = |color: u16| {
        let color = i32::from(color);
        [(color >> 11) * 255 / 31, ((color >> 5) & 63) * 255 / 63, (color & 31) * 255 / 31]
    };

    let (first, last) = (unpack(color0), unpack(color1));
    let mix = |first_weight: i32, last_weight: i32| {
        let total = first_weight + last_weight;
        [0, 1, 2].map(|lane| (first[lane] * first_weight + last[lane] * last_weight) / total)
    };

    let palette = if force_four_colors || color0 > color1 {
        [first, last, mix(2, 1), mix(1, 2)]
    } else {
        [first, last, mix(1, 1), [0, 0, 0]]
    };

    (0 .. 16).map(|pixel| palette[((indices >> (2 * pixel)) & 3) as usize]).collect()
}

/// Left half red, right half green.
fn red_and_green() -> Vec<u8> {
    (0 .. 16).flat_map(|pixel| if pixel % 4 < 2 { [255, 0, 0, 255] } else { [0, 255, 0, 255] }).collect()
}

fn assert_colors_match(samples: &[u8], decoded: &[[i32; 3]]) {
    for (pixel, (original, decoded)) in samples.chunks_exact(4).zip(decoded).enumerate() {
        for lane in 0 .. 3 {
            let difference = (i32::from(original[lane]) - decoded[lane]).abs();
            assert!(difference <= 8, "pixel {}: {:?} vs {:?}", pixel, &original[.. 3], decoded);
        }
    }
}

#[test]
fn dxt1_two_colors() {
    let descriptor = ImageDescriptor::new((4, 4), 4, SampleType::U8)
        .with_compression(Compression::DXT1);

    let samples = red_and_green();
    let file = write_image(&descriptor, WriteOptions::default(), &samples);
    assert_eq!(file.len(), HEADER_SIZE + 8);

    let block = &file[HEADER_SIZE ..];
    assert_colors_match(&samples, &decode_color_block(block, false));
}

#[test]
fn dxt5_two_colors() {
    let descriptor = ImageDescriptor::new((4, 4), 4, SampleType::U8)
        .with_compression(Compression::DXT5);

    let samples = red_and_green();
    let file = write_image(&descriptor, WriteOptions::default(), &samples);
    assert_eq!(file.len(), HEADER_SIZE + 16);

    let block = &file[HEADER_SIZE ..];
    assert_eq!(&block[.. 8], &[255, 255, 0, 0, 0, 0, 0, 0], "opaque alpha");
    assert_colors_match(&samples, &decode_color_block(&block[8 ..], true));
}

#[test]
fn dxt1_blue_and_yellow_gradient() {
    let descriptor = ImageDescriptor::new((4, 4), 4, SampleType::U8)
        .with_compression(Compression::DXT1);

    // blue falls while red and green rise
    let samples: Vec<u8> = (0 .. 16_u8)
        .flat_map(|pixel| { let value = pixel * 17; [value, value, 255 - value, 255] })
        .collect();

    let file = write_image(&descriptor, WriteOptions::default(), &samples);
    let decoded = decode_color_block(&file[HEADER_SIZE ..], false);

    let (first, last) = (decoded[0], decoded[15]);
    assert!(first[2] > 230 && first[0] < 25, "{:?}", first);
    assert!(last[2] < 25 && last[0] > 230, "{:?}", last);
}

#[test]
fn bc4_reads_a_single_channel() {
    let descriptor = ImageDescriptor::new((4, 4), 1, SampleType::U8)
        .with_compression(Compression::BC4);

    let file = write_image(&descriptor, WriteOptions::default(), &[77; 16]);

    assert_eq!(&file[84 .. 88], b"ATI1");
    assert_eq!(&file[HEADER_SIZE ..], &[77, 77, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn missing_alpha_is_opaque() {
    let descriptor = ImageDescriptor::new((4, 4), 3, SampleType::U8)
        .with_compression(Compression::DXT5);

    let file = write_image(&descriptor, WriteOptions::default(), &[0; 4 * 4 * 3]);
    assert_eq!(&file[HEADER_SIZE .. HEADER_SIZE + 2], &[255, 255]);
}

#[test]
fn alpha_cutoff_attribute() {
    let samples: Vec<u8> = std::iter::repeat([10, 200, 30, 102]).take(16).flatten().collect();

    let with_cutoff = |cutoff: f32| {
        let descriptor = ImageDescriptor::new((4, 4), 4, SampleType::U8)
            .with_compression(Compression::DXT1)
            .with_attribute(attribute_name::ALPHA_CUTOFF, cutoff);

        write_image(&descriptor, WriteOptions::default(), &samples)
    };

    assert_eq!(&with_cutoff(0.5)[HEADER_SIZE ..], &[0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(&with_cutoff(0.3)[HEADER_SIZE + 4 ..], &[0, 0, 0, 0]);
}

#[test]
fn odd_sizes_round_up_to_whole_blocks() {
    for &(width, height) in &[(1, 1), (5, 7), (4, 9), (13, 3)] {
        let descriptor = ImageDescriptor::new((width, height), 4, SampleType::U8)
            .with_compression(Compression::DXT5);

        let file = write_image(&descriptor, WriteOptions::default(), &random_samples(width * height * 4));
        let blocks = ((width + 3) / 4) * ((height + 3) / 4);
        assert_eq!(file.len(), HEADER_SIZE + blocks * 16, "{}x{}", width, height);
    }
}

#[test]
fn unknown_compression_writes_raw_pixels() {
    let descriptor = ImageDescriptor::new((2, 2), 4, SampleType::U8)
        .with_attribute(attribute_name::COMPRESSION, "ZIP");

    let file = write_image(&descriptor, WriteOptions::default(), &[9; 16]);
    assert_eq!(file.len(), HEADER_SIZE + 16);
    assert_eq!(&file[84 .. 88], &[0, 0, 0, 0]);
}

#[test]
fn unimplemented_compressions_fail_to_open() {
    for &compression in &[Compression::BC5, Compression::BC6HUnsigned, Compression::BC6HSigned, Compression::BC7] {
        let mut writer = DdsWriter::new(Cursor::new(Vec::new())).unwrap();
        let descriptor = ImageDescriptor::new((4, 4), 4, SampleType::U8).with_compression(compression);

        assert!(matches!(writer.open(&descriptor), Err(Error::NotSupported(_))), "{}", compression);
        assert!(!writer.is_open());
    }
}

#[test]
fn volumes_and_slices_are_unsupported() {
    let mut writer = DdsWriter::new(Cursor::new(Vec::new())).unwrap();

    let volume = ImageDescriptor::new((4, 4), 4, SampleType::U8).with_depth(2);
    assert!(matches!(writer.open(&volume), Err(Error::NotSupported(_))));
    assert_eq!(writer.byte_position(), 0);

    writer.open(&ImageDescriptor::new((4, 4), 4, SampleType::U8)).unwrap();
    assert!(matches!(writer.write_scanline(0, 1, SampleType::U8, &[0; 16]), Err(Error::NotSupported(_))));
}

#[test]
fn failed_write_discards_the_image() {
    let mut writer = DdsWriter::new(Cursor::new(Vec::new())).unwrap();
    writer.open(&ImageDescriptor::new((4, 4), 4, SampleType::U8)).unwrap();

    assert!(matches!(writer.write_scanline(0, 0, SampleType::U8, &[0; 15]), Err(Error::Invalid(_))));
    assert!(!writer.is_open());

    assert!(matches!(writer.write_scanline(1, 0, SampleType::U8, &[0; 16]), Err(Error::Invalid(_))));
    assert!(writer.close().is_ok());
}

#[test]
fn closing_twice_does_nothing() {
    let mut writer = DdsWriter::new(Cursor::new(Vec::new())).unwrap();
    writer.open(&ImageDescriptor::new((4, 4), 4, SampleType::U8).with_compression(Compression::DXT3)).unwrap();

    writer.close().unwrap();
    let length = writer.byte_position();
    assert_eq!(length, HEADER_SIZE + 16);

    writer.close().unwrap();
    assert_eq!(writer.byte_position(), length);
}

#[test]
fn thread_count_does_not_change_the_file() {
    let descriptor = ImageDescriptor::new((67, 245), 4, SampleType::U8)
        .with_compression(Compression::DXT5);

    let samples = random_samples(67 * 245 * 4);

    let sequential = write_image(&descriptor, WriteOptions::sequential(), &samples);
    let parallel = write_image(&descriptor, WriteOptions::with_thread_count(4), &samples);
    let automatic = write_image(&descriptor, WriteOptions::default(), &samples);

    assert_eq!(sequential, parallel);
    assert_eq!(sequential, automatic);
}

#[test]
fn rows_may_arrive_in_any_order() {
    let descriptor = ImageDescriptor::new((5, 4), 2, SampleType::U8)
        .with_y_origin(-2)
        .with_attribute(attribute_name::BITS_PER_SAMPLE, 8)
        .with_attribute(attribute_name::BIT_COUNT_RED, 3)
        .with_attribute(attribute_name::BIT_COUNT_GREEN, 5);

    let samples = random_samples(5 * 4 * 2);
    let in_order = write_image(&descriptor, WriteOptions::default(), &samples);

    let mut writer = DdsWriter::new(Cursor::new(Vec::new())).unwrap();
    writer.open(&descriptor).unwrap();

    for &row in &[3, 0, 2, 1] {
        let scanline = &samples[row * 10 .. (row + 1) * 10];
        writer.write_scanline(row as i32 - 2, 0, SampleType::U8, scanline).unwrap();
    }

    writer.close().unwrap();
    assert_eq!(writer.into_inner().into_inner(), in_order);
}

#[test]
fn missing_rows_are_zero() {
    let mut writer = DdsWriter::new(Cursor::new(Vec::new())).unwrap();
    writer.open(&ImageDescriptor::new((2, 3), 1, SampleType::U8)).unwrap();
    writer.write_scanline(1, 0, SampleType::U8, &[5, 6]).unwrap();
    writer.close().unwrap();

    let file = writer.into_inner().into_inner();
    assert_eq!(&file[HEADER_SIZE ..], &[0, 0, 5, 6, 0, 0]);
}

#[test]
fn wide_samples_match_byte_samples() {
    let bytes = random_samples(6 * 5 * 4);
    let descriptor = ImageDescriptor::new((6, 5), 4, SampleType::F32)
        .with_compression(Compression::DXT5);

    let floats: Vec<u8> = bytes.iter()
        .flat_map(|&value| (f32::from(value) / 255.0).to_ne_bytes())
        .collect();

    let shorts: Vec<u8> = bytes.iter()
        .flat_map(|&value| u16::from(value).wrapping_mul(257).to_ne_bytes())
        .collect();

    let from_bytes = write_image(&descriptor, WriteOptions::default(), &bytes);

    let mut writer = DdsWriter::new(Cursor::new(Vec::new())).unwrap();
    writer.open(&descriptor).unwrap();
    writer.write_scanlines(0, 0, SampleType::F32, &floats).unwrap();
    writer.close().unwrap();
    assert_eq!(writer.into_inner().into_inner(), from_bytes);

    let mut writer = DdsWriter::new(Cursor::new(Vec::new())).unwrap();
    writer.open(&descriptor).unwrap();
    writer.write_scanlines(0, 0, SampleType::U16, &shorts).unwrap();
    writer.close().unwrap();
    assert_eq!(writer.into_inner().into_inner(), from_bytes);
}

#[test]
fn writes_after_existing_bytes() {
    let mut cursor = Cursor::new(Vec::new());
    cursor.write_all(b"prefix").unwrap();

    let mut writer = DdsWriter::new(cursor).unwrap();
    assert_eq!(writer.byte_position(), 6);

    writer.open(&ImageDescriptor::new((1, 1), 4, SampleType::U8).with_compression(Compression::DXT1)).unwrap();
    writer.write_scanline(0, 0, SampleType::U8, &[0, 0, 255, 255]).unwrap();
    writer.close().unwrap();

    let file = writer.into_inner().into_inner();
    assert_eq!(&file[.. 6], b"prefix");
    assert_eq!(&file[6 .. 10], b"DDS ");
    assert_eq!(file.len(), 6 + HEADER_SIZE + 8);
}

#[test]
fn writer_can_be_reused_after_closing() {
    let mut writer = DdsWriter::new(Cursor::new(Vec::new())).unwrap();

    for _ in 0 .. 2 {
        writer.open(&ImageDescriptor::new((2, 1), 1, SampleType::U8)).unwrap();
        writer.write_scanline(0, 0, SampleType::U8, &[1, 2]).unwrap();
        writer.close().unwrap();
    }

    let file = writer.into_inner().into_inner();
    assert_eq!(file.len(), 2 * (HEADER_SIZE + 2));
    assert_eq!(&file[HEADER_SIZE + 2 .. HEADER_SIZE + 6], b"DDS ");
}
