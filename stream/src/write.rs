use std::sync::Arc;
use async_lock::{Mutex, MutexGuardArc};
use block_party::Pool;
use priority::Priority;
use crate::{Error, Options, Writable};
use crate::handle::{Handle, Status};

///One write, as performed on a block_party worker.
struct WriteOnce<H> {
    handle: MutexGuardArc<H>,
    buffer: Box<[u8]>,
}
impl<H: Handle> block_party::Task for WriteOnce<H> {
    type Output = Result<(), Error>;
    fn run(mut self) -> Self::Output {
        let handle = &mut *self.handle;
        match handle.status() {
            Status::Closed => return Ok(()),
            Status::NotOpen => {
                log::debug!("opening handle for writing");
                handle.open();
            }
            Status::Open | Status::Error => {}
        }
        let expected = self.buffer.len();
        let count = handle.write_from(&self.buffer);
        match usize::try_from(count) {
            Err(_) => {
                let cause = handle.last_error();
                log::debug!("write failed ({count}): {cause:?}");
                Err(Error::WriteError(cause))
            }
            Ok(written) if written < expected => {
                log::debug!("incomplete write: {written} of {expected} bytes");
                Err(Error::IncompleteWrite { written, expected })
            }
            Ok(_) => Ok(()),
        }
    }
}

struct CloseWrite<H>(MutexGuardArc<H>);
impl<H: Handle> block_party::Task for CloseWrite<H> {
    type Output = ();
    fn run(mut self) {
        log::debug!("closing write handle");
        self.0.close();
    }
}

/**
Writes to a [Handle], one whole buffer per call.

Writes are serialized like [crate::Read]'s reads.  Clones share the handle.

A failed write does not close the handle; keep writing or [Write::close] it, as you see fit.
*/
pub struct Write<H> {
    handle: Arc<Mutex<H>>,
    priority: Priority,
}

impl<H> Clone for Write<H> {
    fn clone(&self) -> Self {
        Write { handle: self.handle.clone(), priority: self.priority }
    }
}

impl<H: Handle> Write<H> {
    pub fn new(handle: H) -> Self {
        Self::with_options(handle, Options::default())
    }
    ///Only the priority of `options` applies to writes.
    pub fn with_options<O: Into<Options>>(handle: H, options: O) -> Self {
        Write { handle: Arc::new(Mutex::new(handle)), priority: options.into().priority_value() }
    }

    /**
    Writes all of `buffer` with a single native call.

    * A handle that was never opened is opened first.
    * On a closed handle this does nothing and succeeds.  Closing is how you stop writing; there is no separate
      "closed" error.
    * If the handle accepts only part of the buffer, this fails with [Error::IncompleteWrite] and does not retry.
      Re-issue the rest yourself if partial delivery is recoverable for your endpoint.
    */
    pub async fn write(&self, buffer: &[u8]) -> Result<(), Error> {
        self.write_boxed(buffer.into()).await
    }

    ///A path that writes heap-allocated data without copying it.
    pub async fn write_boxed(&self, buffer: Box<[u8]>) -> Result<(), Error> {
        let guard = self.handle.lock_arc().await;
        if guard.status() == Status::Closed {
            log::debug!("ignoring write of {} bytes to a closed handle", buffer.len());
            return Ok(());
        }
        let pool = Pool::global(self.priority);
        let future = block_party::Future::new(pool, WriteOnce { handle: guard, buffer }).map_err(|e| Error::WriteError(Some(e.into())))?;
        future.await
    }

    /**
    Closes the handle, if it is still open.  Waits for an outstanding write to finish first.

    Closing may flush or sync, so it runs on a worker.  Without a worker, the handle is closed on the calling thread.
    */
    pub async fn close(&self) {
        let guard = self.handle.lock_arc().await;
        if guard.status() == Status::Closed {
            return;
        }
        match block_party::Future::new(Pool::global(self.priority), CloseWrite(guard)) {
            Ok(future) => future.await,
            Err(e) => {
                log::warn!("closing write handle inline: {e}");
                let mut guard = self.handle.lock().await;
                if guard.status() != Status::Closed {
                    guard.close();
                }
            }
        }
    }
}

impl<H: Handle> Writable for Write<H> {
    fn write(&self, buffer: &[u8]) -> impl std::future::Future<Output=Result<(),Error>> + Send {
        Write::write(self, buffer)
    }
    fn close(&self) -> impl std::future::Future<Output=()> + Send {
        Write::close(self)
    }
}
