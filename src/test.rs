use std::task::{Poll, Context};
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};
use crate::waker::ThreadWaker;

///A very silly single poll designed for tests
pub fn test_poll<F: Future>(future: F) -> Poll<F::Output> {
    let mut pinned = Box::pin(future);
    test_poll_pin(pinned.as_mut())
}

///Polls a pinned future once, so it can be polled again later.
pub fn test_poll_pin<F: Future + ?Sized>(future: Pin<&mut F>) -> Poll<F::Output> {
    let as_waker = ThreadWaker::current();
    let mut as_context = Context::from_waker(&as_waker);
    future.poll(&mut as_context)
}

///A very silly executor designed for tests.
///
/// Compare this with [crate::sync::block], which is similar, but doesn't panic.
/// I am leaving these implementations separate for now as I suspect they might
/// diverge in the future.
pub fn test_await<F: Future>(future: F, timeout: Duration) -> F::Output {
    let as_waker = ThreadWaker::current();
    let mut as_context = Context::from_waker(&as_waker);
    let instant = Instant::now();
    let mut pinned = Box::pin(future);
    loop {
        if let Poll::Ready(output) = pinned.as_mut().poll(&mut as_context) {
            return output;
        }
        let elapsed = instant.elapsed();
        if elapsed >= timeout {
            break;
        }
        std::thread::park_timeout(timeout - elapsed);
    }
    panic!("Future never arrived!");
}

#[test] fn ready_immediately() {
    assert_eq!(test_poll(async { 3 }), Poll::Ready(3));
}

#[test] #[should_panic(expected = "Future never arrived!")] fn never_arrives() {
    test_await(std::future::pending::<()>(), Duration::from_millis(50));
}
