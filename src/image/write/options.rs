
//! How to write an image, independent of the image itself.


/// Settings that apply to every image written by one writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {

    /// The number of threads that compress blocks.
    /// Zero chooses automatically, one compresses on the calling thread.
    pub thread_count: usize,
}

impl WriteOptions {

    /// Compress on the calling thread only.
    pub fn sequential() -> Self {
        WriteOptions { thread_count: 1 }
    }

    /// Compress on the specified number of threads. Zero chooses automatically.
    pub fn with_thread_count(thread_count: usize) -> Self {
        WriteOptions { thread_count }
    }
}
