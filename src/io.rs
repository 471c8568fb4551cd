/*! Provides utilities for IO.

In bytestream, io operations are associated with a *handle* (like an open file), and an *adapter* that owns it.
Each adapter performs one blocking call on the handle per operation, on a worker thread, and suspends the caller
exactly once while that call runs.

|              | [stream] read adapter | [stream] write adapter |
|--------------|-----------------------|------------------------|
| Unit of work | one chunk, at most `buffer_size` bytes | the whole buffer, or an error |
| Terminal     | end-of-stream (`None`) | explicit close |

Note that a file opened for reading and writing gets two handles, one per direction, whose positions are independent.
*/
#[cfg(feature="io_stream")]
pub mod stream {
    pub use ::stream::*;
}
