use std::fmt::Formatter;

///An os-specific error type
///
/// This is the cause a [crate::Handle] reports through [crate::Handle::last_error].
#[derive(Debug)]
pub struct OSError(std::io::Error);
impl OSError {
    pub fn kind(&self) -> std::io::ErrorKind {
        self.0.kind()
    }
    ///The platform error code, when there is one.
    pub fn raw_os_error(&self) -> Option<i32> {
        self.0.raw_os_error()
    }
    pub fn into_inner(self) -> std::io::Error {
        self.0
    }
}
impl std::fmt::Display for OSError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("<OSError {}>",self.0))
    }
}
impl std::error::Error for OSError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}
impl From<std::io::Error> for OSError {
    fn from(e: std::io::Error) -> Self {
        OSError(e)
    }
}

/**
Every way a stream operation can fail.

Reads on a closed handle and writes on a closed handle are not errors; see [crate::Read::read] and [crate::Write::write].
*/
#[derive(Debug,thiserror::Error)]
pub enum Error {
    ///There is no adapter for the requested direction, or the handle could not be created.
    #[error("stream not available")]
    StreamNotAvailable(#[source] Option<OSError>),
    ///The native read call failed.  The adapter closed its handle.
    #[error("read error")]
    ReadError(#[source] Option<OSError>),
    ///The native write call failed.
    #[error("write error")]
    WriteError(#[source] Option<OSError>),
    ///The native write call accepted only part of the buffer.  Nothing was retried.
    #[error("incomplete write: {written} of {expected} bytes accepted")]
    IncompleteWrite {
        written: usize,
        expected: usize,
    },
}

impl Error {
    ///The underlying native cause, if any.
    pub fn cause(&self) -> Option<&OSError> {
        match self {
            Error::StreamNotAvailable(cause) | Error::ReadError(cause) | Error::WriteError(cause) => cause.as_ref(),
            Error::IncompleteWrite { .. } => None,
        }
    }
}

#[test] fn display() {
    let e = Error::IncompleteWrite { written: 3, expected: 10 };
    assert_eq!(e.to_string(), "incomplete write: 3 of 10 bytes accepted");
    assert!(e.cause().is_none());
}

#[test] fn source_chain() {
    use std::error::Error as _;
    let cause = OSError::from(std::io::Error::from(std::io::ErrorKind::NotFound));
    let e = Error::StreamNotAvailable(Some(cause));
    assert_eq!(e.cause().map(OSError::kind), Some(std::io::ErrorKind::NotFound));
    assert!(e.source().is_some());
    assert!(Error::ReadError(None).source().is_none());
}
