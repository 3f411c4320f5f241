
//! Write DirectDraw Surface (dds) textures, uncompressed or block compressed.
//!
//! Describe the image with an `ImageDescriptor`, then hand its scanlines
//! to a `DdsWriter`. Uncompressed pixels may use any bit layout of up to 32 bits.
//! Block compressed pixels use `DXT1` to `DXT5` or `BC4`,
//! selected with the `compression` attribute.
//!
//! ```
//! use dds_encode::prelude::*;
//!
//! let mut writer = DdsWriter::new(std::io::Cursor::new(Vec::new()))?;
//!
//! let descriptor = ImageDescriptor::new((4, 4), 4, SampleType::U8)
//!     .with_compression(Compression::DXT5);
//!
//! writer.open(&descriptor)?;
//! writer.write_scanlines(0, 0, SampleType::U8, &[255; 4 * 4 * 4])?;
//! writer.close()?;
//!
//! assert_eq!(writer.into_inner().into_inner().len(), 128 + 16);
//! # Ok::<(), dds_encode::error::Error>(())
//! ```

#![forbid(unsafe_code)]

#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused_extern_crates,
    unused_import_braces,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    clippy::all,
)]

#![deny(
    unused_variables,
    unused_assignments,
    dead_code,
    unused_must_use,
    trivial_numeric_casts,
    redundant_semicolons,
)]


pub mod io;
pub mod math;
pub mod compression;
pub mod meta;
pub mod block;
pub mod image;
pub mod error;


/// Export the most important items from `dds_encode`.
/// _Note: This includes a type called `Result`, possibly overwriting the default `std::Result` type usage._
pub mod prelude {

    // main exports
    pub use crate::image::write::{DdsWriter, FORMAT_NAME, EXTENSIONS};
    pub use crate::image::write::options::WriteOptions;
    pub use crate::meta::ImageDescriptor;

    // secondary data types
    pub use crate::meta::attribute::{SampleType, ChannelIndices, Attributes, AttributeValue, name as attribute_name};
    pub use crate::compression::{Compression, default_alpha_cutoff, set_default_alpha_cutoff};
    pub use crate::math::Vec2;
    pub use crate::meta;
    pub use crate::error::{Result, Error};

    // re-export external stuff
    pub use half::f16;
}
