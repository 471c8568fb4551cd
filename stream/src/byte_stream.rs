use std::path::Path;
use crate::{Buffer, Chunks, Error, Options, Read, Readable, Writable, Write};
use crate::handle::FileHandle;

/**
One read/write/close surface over up to one [Readable] and one [Writable].

Which operations work depends on how the stream was built: [ByteStream::read] needs an input,
[ByteStream::write] needs an output, and both fail with [Error::StreamNotAvailable] otherwise.

The input and the output are independent.  A read and a write may be in flight at the same time; they do not wait for
each other.  Once constructed, the stream's own state never changes, so sharing it between tasks is fine.

# Read-write files

[ByteStream::for_reading_and_writing] opens *two* handles on the same file.  Their positions are not synchronized: the
read side starts at the beginning and advances on its own, whatever the write side does.  Once the read side reaches
end-of-stream it is done for good, even if more is written afterwards.  To read back what you wrote, close the stream
and open a new one for reading.
*/
pub struct ByteStream<I = Read<FileHandle>, O = Write<FileHandle>> {
    input: Option<I>,
    output: Option<O>,
    options: Options,
    owns_handles: bool,
}

impl<I: Readable, O: Writable> ByteStream<I, O> {
    /**
    Composes adapters you built yourself.

    The stream does not consider itself the owner of their handles; keep a clone of an adapter to go on using it
    after the stream is gone.  Both may be `None`, in which case every read and write fails.
    */
    pub fn new(input: Option<I>, output: Option<O>) -> Self {
        Self::with_options(input, output, Options::default())
    }
    pub fn with_options<Opt: Into<Options>>(input: Option<I>, output: Option<O>, options: Opt) -> Self {
        ByteStream { input, output, options: options.into(), owns_handles: false }
    }

    fn input(&self) -> Result<&I, Error> {
        self.input.as_ref().ok_or(Error::StreamNotAvailable(None))
    }
    fn output(&self) -> Result<&O, Error> {
        self.output.as_ref().ok_or(Error::StreamNotAvailable(None))
    }

    ///The next chunk, or `None` at end-of-stream.  See [Read::read].
    pub async fn read(&self) -> Result<Option<Buffer>, Error> {
        self.input()?.read().await
    }

    ///Everything up to end-of-stream.  See [Readable::read_to_end] about memory use.
    pub async fn read_to_end(&self) -> Result<Vec<u8>, Error> {
        self.input()?.read_to_end().await
    }

    ///The remaining chunks, lazily.
    pub fn chunks(&self) -> Result<Chunks<'_, I>, Error> {
        Ok(self.input()?.chunks())
    }

    ///All of `buffer`, or an error.  See [Write::write].
    pub async fn write(&self, buffer: &[u8]) -> Result<(), Error> {
        self.output()?.write(buffer).await
    }

    /**
    Closes the input and the output, whichever exist, whoever owns them.

    Never fails, and may be called any number of times.  Afterwards reads report end-of-stream and writes do nothing.
    */
    pub async fn close(&self) {
        if let Some(input) = &self.input {
            input.close().await;
        }
        if let Some(output) = &self.output {
            output.close().await;
        }
    }

    pub fn options(&self) -> Options {
        self.options
    }
    ///Whether the stream opened its handles itself, as the file constructors do.
    pub fn owns_handles(&self) -> bool {
        self.owns_handles
    }
    pub fn is_readable(&self) -> bool {
        self.input.is_some()
    }
    pub fn is_writable(&self) -> bool {
        self.output.is_some()
    }
}

fn not_available(path: &Path, e: std::io::Error) -> Error {
    log::debug!("cannot open {}: {e}", path.display());
    Error::StreamNotAvailable(Some(e.into()))
}

impl ByteStream<Read<FileHandle>, Write<FileHandle>> {
    fn owned(input: Option<Read<FileHandle>>, output: Option<Write<FileHandle>>, options: Options) -> Self {
        ByteStream { input, output, options, owns_handles: true }
    }

    /**
    Opens `path` for reading.

    A missing or unreadable file fails here, with [Error::StreamNotAvailable], rather than on the first read.
    */
    pub fn for_reading<P: AsRef<Path>, Opt: Into<Options>>(path: P, options: Opt) -> Result<Self, Error> {
        let path = path.as_ref();
        let options = options.into();
        let handle = FileHandle::reading(path).map_err(|e| not_available(path, e))?;
        Ok(Self::owned(Some(Read::with_options(handle, options)), None, options))
    }

    /**
    Opens `path` for writing, creating it if needed.

    Without `append`, the existing content is discarded when the first write happens, not before.
    */
    pub fn for_writing<P: AsRef<Path>, Opt: Into<Options>>(path: P, append: bool, options: Opt) -> Result<Self, Error> {
        let path = path.as_ref();
        let options = options.into();
        let handle = FileHandle::writing(path, append).map_err(|e| not_available(path, e))?;
        Ok(Self::owned(None, Some(Write::with_options(handle, options)), options))
    }

    ///Opens `path` twice, once per direction.  See the type-level documentation for what that implies.
    pub fn for_reading_and_writing<P: AsRef<Path>, Opt: Into<Options>>(path: P, append: bool, options: Opt) -> Result<Self, Error> {
        let path = path.as_ref();
        let options = options.into();
        //the writer goes first so that a missing file gets created
        let write_handle = FileHandle::writing(path, append).map_err(|e| not_available(path, e))?;
        let read_handle = FileHandle::reading(path).map_err(|e| not_available(path, e))?;
        Ok(Self::owned(Some(Read::with_options(read_handle, options)), Some(Write::with_options(write_handle, options)), options))
    }
}
