/*!
The native side: blocking handles, reported through status codes.

A [Handle] is the legacy capability the adapters consume.  It blocks, it signals failure with a negative count, and it
keeps the cause around for [Handle::last_error].  The adapters never call it from an async context directly.
*/
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read as _, Write as _};
use std::path::Path;
use crate::error::OSError;

///Observable states of a [Handle].
#[derive(Copy,Clone,Debug,PartialEq,Eq)]
pub enum Status {
    NotOpen,
    Open,
    Closed,
    ///The last operation failed; see [Handle::last_error].
    Error,
}

/**
A blocking, status-reporting stream handle.

Implementations may block in any method.  [crate::Read] and [crate::Write] only call them from block_party workers.
*/
pub trait Handle: Send + 'static {
    fn status(&self) -> Status;
    ///Transitions [Status::NotOpen] to [Status::Open], or to [Status::Error] on failure.
    fn open(&mut self);
    ///Reads at most `buffer.len()` bytes.  Returns the count, `0` at end-of-stream, or a negative value on failure.
    fn read_into(&mut self, buffer: &mut [u8]) -> isize;
    ///Writes at most `buffer.len()` bytes.  Returns the count accepted, or a negative value on failure.
    fn write_from(&mut self, buffer: &[u8]) -> isize;
    ///Releases the native resource.  Must be safe to call in any state.
    fn close(&mut self);
    ///Takes the cause of the most recent failure.
    fn last_error(&mut self) -> Option<OSError>;
}

///Status and last error, shared by the handles in this module.
#[derive(Debug)]
struct Bookkeeping {
    status: Status,
    last_error: Option<std::io::Error>,
}
impl Bookkeeping {
    fn new() -> Self {
        Bookkeeping { status: Status::NotOpen, last_error: None }
    }
    ///Translates one native call into the count-or-negative convention.
    fn record(&mut self, result: std::io::Result<usize>) -> isize {
        match result {
            Ok(count) => isize::try_from(count).unwrap_or(isize::MAX),
            Err(e) => {
                self.last_error = Some(e);
                -1
            }
        }
    }
    ///Refuses an operation on a handle that is not open.
    fn refuse(&mut self, kind: ErrorKind, message: &'static str) -> isize {
        if self.last_error.is_none() {
            self.last_error = Some(std::io::Error::new(kind, message));
        }
        -1
    }
    fn open(&mut self) {
        if self.status == Status::NotOpen {
            self.status = Status::Open;
        }
    }
    fn take_error(&mut self) -> Option<OSError> {
        self.last_error.take().map(OSError::from)
    }
}

///Retries a call interrupted by a signal; any other outcome is final.
fn uninterrupted<T>(mut f: impl FnMut() -> std::io::Result<T>) -> std::io::Result<T> {
    loop {
        match f() {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

#[derive(Debug,Copy,Clone,PartialEq,Eq)]
enum Mode {
    Read,
    Write { append: bool },
}

/**
A file on the local filesystem, in one direction.

The file descriptor is created by [FileHandle::reading] or [FileHandle::writing], so a missing or forbidden file is
reported right away.  Truncation of a non-appending writer is deferred to [Handle::open], i.e. to the first write.
*/
#[derive(Debug)]
pub struct FileHandle {
    file: Option<File>,
    mode: Mode,
    bookkeeping: Bookkeeping,
}

impl FileHandle {
    pub fn reading<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file, Mode::Read))
    }
    ///Creates the file if it does not exist.
    pub fn writing<P: AsRef<Path>>(path: P, append: bool) -> std::io::Result<Self> {
        let mut options = OpenOptions::new();
        options.create(true);
        if append {
            options.append(true);
        } else {
            options.write(true);
        }
        let file = options.open(path)?;
        Ok(Self::new(file, Mode::Write { append }))
    }
    fn new(file: File, mode: Mode) -> Self {
        FileHandle { file: Some(file), mode, bookkeeping: Bookkeeping::new() }
    }
}

impl Handle for FileHandle {
    fn status(&self) -> Status {
        self.bookkeeping.status
    }

    fn open(&mut self) {
        if self.bookkeeping.status != Status::NotOpen {
            return;
        }
        if let (Mode::Write { append: false }, Some(file)) = (self.mode, self.file.as_ref()) {
            if let Err(e) = file.set_len(0) {
                self.bookkeeping.last_error = Some(e);
                self.bookkeeping.status = Status::Error;
                return;
            }
        }
        self.bookkeeping.open();
    }

    fn read_into(&mut self, buffer: &mut [u8]) -> isize {
        match (self.bookkeeping.status, self.file.as_mut()) {
            (Status::Open, Some(file)) => {
                let result = uninterrupted(|| file.read(buffer));
                self.bookkeeping.record(result)
            }
            _ => self.bookkeeping.refuse(ErrorKind::NotConnected, "file handle is not open"),
        }
    }

    fn write_from(&mut self, buffer: &[u8]) -> isize {
        match (self.bookkeeping.status, self.file.as_mut()) {
            (Status::Open, Some(file)) => {
                let result = uninterrupted(|| file.write(buffer));
                self.bookkeeping.record(result)
            }
            _ => self.bookkeeping.refuse(ErrorKind::NotConnected, "file handle is not open"),
        }
    }

    fn close(&mut self) {
        if let Some(file) = self.file.take() {
            if matches!(self.mode, Mode::Write { .. }) {
                //File's destructor ignores flush failures; this one at least gets logged
                if let Err(e) = file.sync_data() {
                    log::debug!("sync_data before close failed: {e}");
                }
            }
        }
        self.bookkeeping.status = Status::Closed;
    }

    fn last_error(&mut self) -> Option<OSError> {
        self.bookkeeping.take_error()
    }
}

/**
Wraps a pre-existing readable endpoint: a pipe, a socket, a child's stdout, an in-memory cursor.

The endpoint is already open at the OS level; [Handle::open] only flips the status.  Writing is unsupported.
*/
#[derive(Debug)]
pub struct ReadHandle<T> {
    endpoint: Option<T>,
    bookkeeping: Bookkeeping,
}
impl<T: std::io::Read + Send + 'static> ReadHandle<T> {
    pub fn new(endpoint: T) -> Self {
        ReadHandle { endpoint: Some(endpoint), bookkeeping: Bookkeeping::new() }
    }
}
impl<T: std::io::Read + Send + 'static> Handle for ReadHandle<T> {
    fn status(&self) -> Status {
        self.bookkeeping.status
    }
    fn open(&mut self) {
        self.bookkeeping.open()
    }
    fn read_into(&mut self, buffer: &mut [u8]) -> isize {
        match (self.bookkeeping.status, self.endpoint.as_mut()) {
            (Status::Open, Some(endpoint)) => {
                let result = uninterrupted(|| endpoint.read(buffer));
                self.bookkeeping.record(result)
            }
            _ => self.bookkeeping.refuse(ErrorKind::NotConnected, "read handle is not open"),
        }
    }
    fn write_from(&mut self, _buffer: &[u8]) -> isize {
        self.bookkeeping.refuse(ErrorKind::Unsupported, "read handle cannot write")
    }
    fn close(&mut self) {
        self.endpoint = None;
        self.bookkeeping.status = Status::Closed;
    }
    fn last_error(&mut self) -> Option<OSError> {
        self.bookkeeping.take_error()
    }
}

/**
Wraps a pre-existing writable endpoint.  Reading is unsupported.

[Handle::close] flushes the endpoint before dropping it.
*/
#[derive(Debug)]
pub struct WriteHandle<T> {
    endpoint: Option<T>,
    bookkeeping: Bookkeeping,
}
impl<T: std::io::Write + Send + 'static> WriteHandle<T> {
    pub fn new(endpoint: T) -> Self {
        WriteHandle { endpoint: Some(endpoint), bookkeeping: Bookkeeping::new() }
    }
}
impl<T: std::io::Write + Send + 'static> Handle for WriteHandle<T> {
    fn status(&self) -> Status {
        self.bookkeeping.status
    }
    fn open(&mut self) {
        self.bookkeeping.open()
    }
    fn read_into(&mut self, _buffer: &mut [u8]) -> isize {
        self.bookkeeping.refuse(ErrorKind::Unsupported, "write handle cannot read")
    }
    fn write_from(&mut self, buffer: &[u8]) -> isize {
        match (self.bookkeeping.status, self.endpoint.as_mut()) {
            (Status::Open, Some(endpoint)) => {
                let result = uninterrupted(|| endpoint.write(buffer));
                self.bookkeeping.record(result)
            }
            _ => self.bookkeeping.refuse(ErrorKind::NotConnected, "write handle is not open"),
        }
    }
    fn close(&mut self) {
        if let Some(mut endpoint) = self.endpoint.take() {
            if let Err(e) = endpoint.flush() {
                log::debug!("flush before close failed: {e}");
            }
        }
        self.bookkeeping.status = Status::Closed;
    }
    fn last_error(&mut self) -> Option<OSError> {
        self.bookkeeping.take_error()
    }
}
