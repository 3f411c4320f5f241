
//! Write complete dds images from scanlines of samples.
//! Quantizes incoming samples to 8 bits, then either packs them
//! into raw pixels or accumulates them for block compression.

pub mod write;

mod convert;
mod pack;
