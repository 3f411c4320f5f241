
//! Explicit 4-bit alpha followed by a four color block, as used by `DXT2` and `DXT3`.

use super::{PixelBlock, BlockParameters, quantize, bc1};


pub(super) fn compress_block(block: &PixelBlock, _parameters: &BlockParameters, out: &mut [u8]) {
    let (alpha, color) = out.split_at_mut(8);
    encode_explicit_alpha(block, alpha);
    bc1::encode_color_block(block, None, color);
}

/// Two pixels per byte, the earlier pixel in the low nibble.
fn encode_explicit_alpha(block: &PixelBlock, out: &mut [u8]) {
    for (byte, pixels) in out.iter_mut().zip(block.chunks_exact(2)) {
        let low = quantize(pixels[0].saturate().w(), 15);
        let high = quantize(pixels[1].saturate().w(), 15);
        *byte = (low | (high << 4)) as u8;
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Vec4;
    use crate::compression::BLOCK_PIXEL_COUNT;

    #[test]
    fn alpha_nibbles_in_pixel_order() {
        let mut block = [Vec4::new(1.0, 0.0, 0.0, 1.0); BLOCK_PIXEL_COUNT];
        block[0] = block[0].with_w(0.0);
        block[1] = block[1].with_w(1.0);
        block[2] = block[2].with_w(7.0 / 15.0);
        block[3] = block[3].with_w(2.0);

        let mut bytes = [0_u8; 16];
        compress_block(&block, &BlockParameters { alpha_cutoff: 0.5 }, &mut bytes);

        assert_eq!(bytes[0], 0xF0);
        assert_eq!(bytes[1], 0xF7);
        assert!(bytes[2 .. 8].iter().all(|&byte| byte == 0xFF));

        // the color block ignores alpha entirely
        assert_eq!(&bytes[8 ..], &[0x00, 0xF8, 0x00, 0xF8, 0, 0, 0, 0]);
    }
}
