
//! Interpolated alpha followed by a four color block, as used by `DXT4` and `DXT5`.

use super::{PixelBlock, BlockParameters, bc1, bc4};


pub(super) fn compress_block(block: &PixelBlock, _parameters: &BlockParameters, out: &mut [u8]) {
    let (alpha, color) = out.split_at_mut(8);
    bc4::encode_interpolated(&bc4::lane_values(block, 3), alpha);
    bc1::encode_color_block(block, None, color);
}
