use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use bytestream::test::test_await;
use stream::{ByteStream, Error, Options, Priority};

const TIMEOUT: Duration = Duration::from_secs(30);

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn options(buffer_size: usize) -> Options {
    Options::from(Priority::Testing).buffer_size(buffer_size)
}

fn random_payload(len: usize) -> Vec<u8> {
    (0..len).map(|_| rand::random::<u8>()).collect()
}

fn write_file(path: &Path, payload: &[u8], append: bool) {
    let stream = ByteStream::for_writing(path, append, Priority::Testing).unwrap();
    test_await(async {
        stream.write(payload).await.unwrap();
        stream.close().await;
    }, TIMEOUT);
}

fn read_file(path: &Path, buffer_size: usize) -> Vec<u8> {
    let stream = ByteStream::for_reading(path, options(buffer_size)).unwrap();
    test_await(async {
        let all = stream.read_to_end().await.unwrap();
        stream.close().await;
        all
    }, TIMEOUT)
}

#[test] fn round_trip() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    for len in [0, 1, 4095, 4096, 4097, 1 << 20] {
        let payload = random_payload(len);
        let path = dir.path().join(format!("payload-{len}"));
        write_file(&path, &payload, false);
        for buffer_size in [1, 7, 4096, 65536] {
            //a byte per worker hop is too slow for the big one
            if len / buffer_size > 100_000 {
                continue;
            }
            assert_eq!(read_file(&path, buffer_size), payload, "len {len}, buffer {buffer_size}");
        }
    }
}

#[test] fn chunks_respect_buffer_size() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chunks");
    let payload = random_payload(10_000);
    write_file(&path, &payload, false);
    for buffer_size in [1, 3, 4096, 20_000] {
        let stream = ByteStream::for_reading(&path, options(buffer_size)).unwrap();
        let chunks = test_await(async {
            let mut chunks = Vec::new();
            let mut sequence = stream.chunks().unwrap();
            while let Some(chunk) = sequence.next().await {
                chunks.push(chunk.unwrap());
            }
            chunks
        }, TIMEOUT);
        assert!(chunks.iter().all(|c| !c.is_empty() && c.len() <= buffer_size));
        let joined: Vec<u8> = chunks.iter().flat_map(|c| c.as_slice().iter().copied()).collect();
        assert_eq!(joined, payload);
    }
}

#[test] fn end_of_stream_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short");
    write_file(&path, b"abc", false);
    let stream = ByteStream::for_reading(&path, options(2)).unwrap();
    test_await(async {
        assert_eq!(stream.read().await.unwrap().unwrap().as_slice(), b"ab");
        assert_eq!(stream.read().await.unwrap().unwrap().as_slice(), b"c");
        for _ in 0..3 {
            assert!(stream.read().await.unwrap().is_none());
        }
        assert!(stream.read_to_end().await.unwrap().is_empty());
    }, TIMEOUT);
}

#[test] fn empty_file_ends_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty");
    write_file(&path, b"", false);
    let stream = ByteStream::for_reading(&path, Priority::Testing).unwrap();
    assert!(test_await(stream.read(), TIMEOUT).unwrap().is_none());
}

#[test] fn close_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("close");
    write_file(&path, b"unread", false);
    for closes in [0, 1, 3] {
        let stream = ByteStream::for_reading_and_writing(&path, true, Priority::Testing).unwrap();
        test_await(async {
            for _ in 0..closes {
                stream.close().await;
            }
            if closes > 0 {
                assert!(stream.read().await.unwrap().is_none());
                //ignored
                stream.write(b"late").await.unwrap();
            }
        }, TIMEOUT);
        drop(stream);
    }
    assert_eq!(read_file(&path, 4096), b"unread");
}

#[test] fn append_extends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("greeting");
    write_file(&path, b"Hello, ", false);
    write_file(&path, b"World!", true);
    assert_eq!(read_file(&path, 4096), b"Hello, World!");
}

#[test] fn overwrite_replaces() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("greeting");
    write_file(&path, b"Hello, World!", false);
    write_file(&path, b"Bye", false);
    assert_eq!(read_file(&path, 4096), b"Bye");
}

#[test] fn truncation_waits_for_first_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kept");
    write_file(&path, b"still here", false);
    let stream = ByteStream::for_writing(&path, false, Priority::Testing).unwrap();
    assert_eq!(read_file(&path, 4096), b"still here");
    test_await(stream.close(), TIMEOUT);
    drop(stream);
    assert_eq!(read_file(&path, 4096), b"still here");
}

#[test] fn missing_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    match ByteStream::for_reading(dir.path().join("nope"), Options::default()) {
        Err(Error::StreamNotAvailable(Some(cause))) => assert_eq!(cause.kind(), ErrorKind::NotFound),
        Err(other) => panic!("unexpected {other:?}"),
        Ok(_) => panic!("opened a missing file"),
    }
    match ByteStream::for_writing(dir.path().join("no/such/dir"), false, Options::default()) {
        Err(Error::StreamNotAvailable(Some(cause))) => assert_eq!(cause.kind(), ErrorKind::NotFound),
        Err(other) => panic!("unexpected {other:?}"),
        Ok(_) => panic!("opened a file in a missing directory"),
    }
}

#[test] fn file_streams_report_their_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shape");
    let writer = ByteStream::for_writing(&path, false, options(10)).unwrap();
    assert!(writer.owns_handles());
    assert!(writer.is_writable() && !writer.is_readable());
    assert_eq!(writer.options().buffer_size_value(), 10);
    assert!(matches!(test_await(writer.read(), TIMEOUT), Err(Error::StreamNotAvailable(None))));

    let reader = ByteStream::for_reading(&path, Priority::Testing).unwrap();
    assert!(reader.is_readable() && !reader.is_writable());
    assert!(matches!(test_await(reader.write(b"x"), TIMEOUT), Err(Error::StreamNotAvailable(None))));
}

#[test] fn read_write_positions_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("both");
    write_file(&path, b"original", false);
    let stream = ByteStream::for_reading_and_writing(&path, false, Priority::Testing).unwrap();
    test_await(async {
        assert_eq!(stream.read_to_end().await.unwrap(), b"original");
        stream.write(b"replacement").await.unwrap();
        //the read side is done for good
        assert!(stream.read().await.unwrap().is_none());
        stream.close().await;
    }, TIMEOUT);
    assert_eq!(read_file(&path, 4096), b"replacement");
}

#[test] fn read_write_creates_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh");
    let stream = ByteStream::for_reading_and_writing(&path, true, Priority::Testing).unwrap();
    assert!(path.exists());
    assert!(test_await(stream.read(), TIMEOUT).unwrap().is_none());
}

#[test] fn concurrent_read_and_write() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("busy");
    let original = random_payload(64 * 1024);
    write_file(&path, &original, false);
    let stream = Arc::new(ByteStream::for_reading_and_writing(&path, true, options(1024)).unwrap());
    let reader = {
        let stream = stream.clone();
        std::thread::spawn(move || test_await(stream.read_to_end(), TIMEOUT).unwrap())
    };
    let writer = {
        let stream = stream.clone();
        std::thread::spawn(move || test_await(async {
            for _ in 0..16 {
                stream.write(&[7; 512]).await.unwrap();
            }
        }, TIMEOUT))
    };
    let read = reader.join().unwrap();
    writer.join().unwrap();
    test_await(stream.close(), TIMEOUT);
    //the reader may or may not have seen some of the appended bytes
    assert!(read.starts_with(&original));
    let all = read_file(&path, 4096);
    assert_eq!(all.len(), original.len() + 16 * 512);
    assert!(all.starts_with(&original));
    assert!(all[original.len()..].iter().all(|b| *b == 7));
}

#[test] fn blocking_with_a_deadline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sync");
    write_file(&path, b"synchronously", false);
    let stream = ByteStream::for_reading(&path, Priority::Testing).unwrap();
    let all = bytestream::sync::block(TIMEOUT, stream.read_to_end()).unwrap().unwrap();
    assert_eq!(all, b"synchronously");
}
