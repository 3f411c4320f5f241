//! Specialized binary output.
//! Uses the error handling for this crate.

pub use ::std::io::{Write, Seek};
use lebe::prelude::*;
use crate::error::{Result, UnitResult, IoResult, u64_to_usize};
use std::io::{Read, SeekFrom};


/// Keep track of what byte we are at.
/// Used to skip back to a previous place after writing some information.
#[derive(Debug)]
pub struct Tracking<T> {

    /// Do not expose to prevent seeking without updating position
    inner: T,

    position: usize,

    /// The furthest position that has been written so far.
    end: usize,
}

impl<T: Write> Write for Tracking<T> {
    fn write(&mut self, buffer: &[u8]) -> IoResult<usize> {
        let count = self.inner.write(buffer)?;
        self.position += count;
        self.end = self.end.max(self.position);
        Ok(count)
    }

    fn flush(&mut self) -> IoResult<()> {
        self.inner.flush()
    }
}

impl<T> Tracking<T> {

    /// If `inner` is a reference, if must never be seeked directly,
    /// but only through this `Tracking` instance.
    pub fn new(inner: T) -> Self {
        Tracking { inner, position: 0, end: 0 }
    }

    /// Current number of bytes between the start of the stream and the cursor.
    pub fn byte_position(&self) -> usize {
        self.position
    }

    /// Release the inner writer. Its cursor is wherever the last write or seek left it.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Write + Seek> Tracking<T> {

    /// Start tracking at the current cursor of the inner writer,
    /// which may already contain some bytes.
    pub fn at_current_position(mut inner: T) -> Result<Self> {
        let position = inner.stream_position()?;
        let position = u64_to_usize(position, "stream position too large")?;
        Ok(Tracking { inner, position, end: position })
    }

    /// Move the writing cursor to the specified target byte index.
    /// If seeking beyond the bytes written so far, this will write zeroes.
    pub fn seek_write_to(&mut self, target_position: usize) -> IoResult<()> {
        if target_position <= self.end {
            if target_position != self.position {
                self.inner.seek(SeekFrom::Start(target_position as u64))?;
            }
        }
        else {
            if self.position != self.end {
                self.inner.seek(SeekFrom::Start(self.end as u64))?;
                self.position = self.end;
            }

            std::io::copy(
                &mut std::io::repeat(0).take((target_position - self.end) as u64),
                self
            )?;
        }

        self.position = target_position;
        Ok(())
    }
}

/// Generic trait that defines common binary operations such as writing for this type.
pub trait Data: Sized + Default + Clone {

    /// Write this value to the writer, in little endian byte order.
    fn write(self, write: &mut impl Write) -> UnitResult;

    /// Write this value to the writer without reordering its bytes.
    /// Only used for values that describe bit layouts instead of quantities.
    fn write_native(self, write: &mut impl Write) -> UnitResult;

    /// Write all values of that slice to the writer, in little endian byte order.
    fn write_slice(write: &mut impl Write, slice: &[Self]) -> UnitResult;
}


macro_rules! implement_data_for_primitive {
    ($kind: ident) => {
        impl Data for $kind {
            #[inline]
            fn write(self, write: &mut impl Write) -> Result<()> {
                write.write_as_little_endian(&self)?;
                Ok(())
            }

            #[inline]
            fn write_native(self, write: &mut impl Write) -> Result<()> {
                write.write_as_native_endian(&self)?;
                Ok(())
            }

            #[inline]
            fn write_slice(write: &mut impl Write, slice: &[Self]) -> Result<()> {
                write.write_as_little_endian(slice)?;
                Ok(())
            }
        }
    };
}

implement_data_for_primitive!(u8);
implement_data_for_primitive!(u16);
implement_data_for_primitive!(u32);
