use std::sync::Arc;
use async_lock::{Mutex, MutexGuardArc};
use block_party::Pool;
use priority::Priority;
use crate::{Buffer, Error, Options, Readable};
use crate::handle::{Handle, Status};

struct Inner<H> {
    handle: H,
    //reused by every read; chunks are copied out of it
    buffer: Box<[u8]>,
}

impl<H: Handle> Inner<H> {
    ///Performs a single read.  Blocks.
    fn read_once(&mut self) -> Result<Option<Buffer>, Error> {
        match self.handle.status() {
            Status::Closed => return Ok(None),
            Status::NotOpen => {
                log::debug!("opening handle for reading");
                self.handle.open();
            }
            Status::Open | Status::Error => {}
        }
        let count = self.handle.read_into(&mut self.buffer);
        match usize::try_from(count) {
            Ok(0) => {
                log::debug!("end of stream, closing handle");
                self.handle.close();
                Ok(None)
            }
            Ok(count) => {
                let count = count.min(self.buffer.len());
                Ok(Some(Buffer::copy_from(&self.buffer[..count])))
            }
            Err(_) => {
                let cause = self.handle.last_error();
                log::debug!("read failed ({count}): {cause:?}");
                self.handle.close();
                Err(Error::ReadError(cause))
            }
        }
    }
}

///One read, as performed on a block_party worker.  Holding the guard keeps the next read queued until this one is done.
struct ReadOnce<H>(MutexGuardArc<Inner<H>>);
impl<H: Handle> block_party::Task for ReadOnce<H> {
    type Output = Result<Option<Buffer>, Error>;
    fn run(mut self) -> Self::Output {
        self.0.read_once()
    }
}

///Closes the handle on a block_party worker.
struct CloseRead<H>(MutexGuardArc<Inner<H>>);
impl<H: Handle> block_party::Task for CloseRead<H> {
    type Output = ();
    fn run(mut self) {
        log::debug!("closing read handle");
        self.0.handle.close();
    }
}

/**
Reads from a [Handle], one chunk at a time.

Reads are serialized: a read issued while another is outstanding waits for it.  Clones share the handle and the
serialization.

Once the handle reports end-of-stream or an error, the adapter closes it; every later read reports end-of-stream.
*/
pub struct Read<H> {
    inner: Arc<Mutex<Inner<H>>>,
    priority: Priority,
    buffer_size: usize,
}

impl<H> Clone for Read<H> {
    fn clone(&self) -> Self {
        Read { inner: self.inner.clone(), priority: self.priority, buffer_size: self.buffer_size }
    }
}

impl<H: Handle> Read<H> {
    pub fn new(handle: H) -> Self {
        Self::with_options(handle, Options::default())
    }
    pub fn with_options<O: Into<Options>>(handle: H, options: O) -> Self {
        let options = options.into();
        let buffer_size = options.buffer_size_value();
        Read {
            inner: Arc::new(Mutex::new(Inner { handle, buffer: vec![0; buffer_size].into_boxed_slice() })),
            priority: options.priority_value(),
            buffer_size,
        }
    }
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /**
    Reads the next chunk: at most [Self::buffer_size] bytes, exactly as many as the handle produced.

    Returns `None` at end-of-stream, and for every read after that.  A handle that was never opened is opened first.
    If the handle fails, it is closed and the cause is returned in [Error::ReadError].
    */
    pub async fn read(&self) -> Result<Option<Buffer>, Error> {
        let guard = self.inner.lock_arc().await;
        if guard.handle.status() == Status::Closed {
            return Ok(None);
        }
        let pool = Pool::global(self.priority);
        let future = block_party::Future::new(pool, ReadOnce(guard)).map_err(|e| Error::ReadError(Some(e.into())))?;
        future.await
    }

    ///See [Readable::read_to_end].
    pub async fn read_to_end(&self) -> Result<Vec<u8>, Error> {
        Readable::read_to_end(self).await
    }

    ///See [Readable::chunks].
    pub fn chunks(&self) -> Chunks<'_, Self> {
        Chunks::new(self)
    }

    /**
    Closes the handle, if it is still open.  Waits for an outstanding read to finish first.

    The native close runs on a worker like any other call.  If no worker can be launched, the handle is closed on the
    calling thread instead, since closing never fails.
    */
    pub async fn close(&self) {
        let guard = self.inner.lock_arc().await;
        if guard.handle.status() == Status::Closed {
            return;
        }
        match block_party::Future::new(Pool::global(self.priority), CloseRead(guard)) {
            Ok(future) => future.await,
            Err(e) => {
                log::warn!("closing read handle inline: {e}");
                let mut guard = self.inner.lock().await;
                if guard.handle.status() != Status::Closed {
                    guard.handle.close();
                }
            }
        }
    }
}

impl<H: Handle> Readable for Read<H> {
    fn read(&self) -> impl std::future::Future<Output=Result<Option<Buffer>,Error>> + Send {
        Read::read(self)
    }
    fn close(&self) -> impl std::future::Future<Output=()> + Send {
        Read::close(self)
    }
}

/**
A lazy, single-pass sequence of chunks.

Ends at end-of-stream, and right after yielding an error.  It cannot be restarted; asking the source for a new sequence
after it is exhausted yields an empty one, because the handle is closed by then.
*/
pub struct Chunks<'a, R> {
    source: &'a R,
    finished: bool,
}

impl<'a, R: Readable> Chunks<'a, R> {
    pub(crate) fn new(source: &'a R) -> Self {
        Chunks { source, finished: false }
    }

    pub async fn next(&mut self) -> Option<Result<Buffer, Error>> {
        if self.finished {
            return None;
        }
        match self.source.read().await {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
