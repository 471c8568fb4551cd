/*! Provides streaming IO over blocking handles.  See `bytestream::io` for an overview.

A [Handle] is a blocking, status-reporting stream: it has to be opened, it signals failure with a negative count, and
it keeps the cause for later.  This crate wraps handles into adapters with an async surface:

* [Read] pulls one chunk per call, `None` at end-of-stream.
* [Write] pushes one whole buffer per call, or fails.
* [ByteStream] composes up to one of each and knows how to build them from files.

Each call performs exactly one blocking native operation on a `block_party` worker and suspends the caller once.
Calls on one adapter are serialized; calls on different adapters are independent.

```
# fn main() -> Result<(), stream::Error> {
use stream::{ByteStream, Options};
let dir = std::env::temp_dir().join(format!("stream-doc-{}", std::process::id()));
std::fs::create_dir_all(&dir).unwrap();
let path = dir.join("hello.txt");
bytestream::sync::block(std::time::Duration::from_secs(5), async {
    let writer = ByteStream::for_writing(&path, false, Options::default())?;
    writer.write(b"Hello, World!").await?;
    writer.close().await;

    let reader = ByteStream::for_reading(&path, Options::default())?;
    assert_eq!(reader.read_to_end().await?, b"Hello, World!");
    reader.close().await;
    Ok::<(), stream::Error>(())
}).unwrap()
# }
```
*/
use std::future::Future;

mod error;
mod handle;
mod options;
mod read;
mod write;
mod byte_stream;

pub use error::{Error, OSError};
pub use handle::{Handle, Status, FileHandle, ReadHandle, WriteHandle};
pub use options::{Options, DEFAULT_BUFFER_SIZE};
pub use read::{Read, Chunks};
pub use write::Write;
pub use byte_stream::ByteStream;
pub use priority::Priority;

///Buffer type.
///
/// One chunk, as returned by a single read.  It holds exactly the bytes the native call produced.
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct Buffer(Vec<u8>);
impl Buffer {
    pub(crate) fn copy_from(slice: &[u8]) -> Self {
        Buffer(slice.to_vec())
    }
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}
impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/**
Something that produces chunks until end-of-stream.
*/
pub trait Readable: Send + Sync {
    ///The next chunk, or `None` at end-of-stream.
    fn read(&self) -> impl Future<Output=Result<Option<Buffer>,Error>> + Send;
    ///Releases the source.  Never fails; later reads report end-of-stream.
    fn close(&self) -> impl Future<Output=()> + Send;

    /**
    Reads chunks until end-of-stream and concatenates them.

    There is no size limit.  For untrusted or unbounded sources, bound memory yourself with [Readable::chunks].
    */
    fn read_to_end(&self) -> impl Future<Output=Result<Vec<u8>,Error>> + Send {
        async move {
            let mut all = Vec::new();
            while let Some(chunk) = self.read().await? {
                all.extend_from_slice(chunk.as_slice());
            }
            Ok(all)
        }
    }

    ///A single-pass sequence over the remaining chunks.
    fn chunks(&self) -> Chunks<'_, Self> where Self: Sized {
        Chunks::new(self)
    }
}

/**
Something that accepts whole buffers.
*/
pub trait Writable: Send + Sync {
    ///Delivers all of `buffer`, or fails.
    fn write(&self, buffer: &[u8]) -> impl Future<Output=Result<(),Error>> + Send;
    ///Releases the sink.  Never fails.
    fn close(&self) -> impl Future<Output=()> + Send;
}
