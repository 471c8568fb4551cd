/*! Drives futures from synchronous code. */
use std::future::Future;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use crate::waker::ThreadWaker;

#[derive(Debug,thiserror::Error)]
pub enum TimeoutError {
    #[error("bytestream::sync::block timed out after {0:?}")]
    TimedOut(Duration)
}

///A (potentially dumb) way to block on a future.  Returns the future's output.
///
/// There are a lot of reasons why this might be a bad idea.  For starters,
/// if two futures somehow block on each other, they can deadlock.  However,
/// this is a reasonable way to put a deadline on a stream operation from synchronous code.
///
/// When the deadline passes, the future is dropped.  An in-flight blocking call is not interrupted; it completes on
/// its worker and the result is discarded.
///
/// Compare this approach with [crate::test::test_await], a similar approach for tests.  The primary difference is that one panics
/// while this one returns a Result.
pub fn block<F: Future>(timeout: Duration, future: F) -> Result<F::Output,TimeoutError> {
    let as_waker = ThreadWaker::current();
    let mut as_context = Context::from_waker(&as_waker);
    let instant = Instant::now();
    let mut pinned = Box::pin(future);
    loop {
        if let Poll::Ready(output) = pinned.as_mut().poll(&mut as_context) {
            return Ok(output)
        }
        let elapsed = instant.elapsed();
        if elapsed >= timeout {
            return Err(TimeoutError::TimedOut(timeout))
        }
        std::thread::park_timeout(timeout - elapsed);
    }
}

#[test] fn test_block() {
    let m = async {
        "my test string"
    };
    let result = block(Duration::new(1,0), m).unwrap();
    assert_eq!(result,"my test string");
}
#[test] fn test_block_timeout() {
    //some future that never returns
    let result = block(Duration::from_millis(100), std::future::pending::<()>());
    assert!(matches!(result, Err(TimeoutError::TimedOut(_))));
}
#[test] fn test_block_woken_from_elsewhere() {
    use std::sync::{Arc, Mutex};
    use std::task::Waker;
    struct Shared { done: bool, waker: Option<Waker> }
    let shared = Arc::new(Mutex::new(Shared { done: false, waker: None }));
    let move_shared = shared.clone();
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        let mut lock = move_shared.lock().unwrap();
        lock.done = true;
        if let Some(waker) = lock.waker.take() {
            waker.wake();
        }
    });
    let future = std::future::poll_fn(|cx| {
        let mut lock = shared.lock().unwrap();
        if lock.done {
            Poll::Ready(5)
        } else {
            lock.waker = Some(cx.waker().clone());
            Poll::Pending
        }
    });
    assert_eq!(block(Duration::from_secs(2), future).unwrap(), 5);
}
