/*!
A microthreadpool for blocking IO.

block_party solves a common problem in async Rust, which is:
1.  You have to call a blocking function, like `read(2)` on a file.
2.  You can't block; you need to suspend/await instead.
3.  So you need to write a future with all its boilerplate that you don't remember.  Also you need to spawn a thread to perform the call.  But maybe not 50 threads if you do this 50 times back to back?  That seems bad?

This is where block_party comes in, it makes your "just block as a future" problem easy.  To solve this problem, you implement
the [Task] trait, and then call [Future::new()] with a [Pool].

The returned [Future] has exactly one suspension point: it is pending while a worker performs [Task::run], and ready with
its output afterwards.

Workers are launched on demand.  Each submitted task either claims a worker that is currently idle, or launches a new one,
so tasks never queue behind an unrelated blocking call.  Idle workers shut down after a short grace period.

If the [Future] is dropped before the task completes, the task still runs to completion on the worker; its output is
discarded.
*/
mod pool;
mod future;

pub use future::Future;
pub use pool::Pool;

/**
Implement this type to describe your problem.
*/
pub trait Task: Sized + Send + 'static {
    /**
    The output we will produce from this Task.  the result of our file IO, etc.  May be unit.
    */
    type Output: Send + 'static;
    /**
    Performs the blocking work.  This is called on a worker thread.
    */
    fn run(self) -> Self::Output;
}

#[cfg(test)] mod tests {
    use std::pin::Pin;
    use std::task::Poll;
    use std::time::Duration;
    use crossbeam_channel::{Receiver, Sender};
    use priority::Priority;
    use crate::Pool;

    /* Test equipment */
    ///Blocks until a value arrives on the channel, then returns it plus one.
    struct WaitFor(Receiver<u8>);
    impl super::Task for WaitFor {
        type Output = u8;
        fn run(self) -> u8 {
            self.0.recv().unwrap() + 1
        }
    }
    struct Explode;
    impl super::Task for Explode {
        type Output = ();
        fn run(self) {
            panic!("explode")
        }
    }
    fn channel() -> (Sender<u8>, Receiver<u8>) {
        crossbeam_channel::bounded(1)
    }

    #[test] fn test_future() {
        let pool = Pool::new(Priority::Testing);
        let (sender, receiver) = channel();
        let future = crate::Future::new(&pool, WaitFor(receiver)).unwrap();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(100));
            sender.send(22).unwrap();
        });
        let r = bytestream::test::test_await(future, Duration::from_secs(1));
        assert_eq!(r, 23);
    }

    #[test] fn test_two_futures() {
        let pool = Pool::new(Priority::Testing);
        let (sender1, receiver1) = channel();
        let (sender2, receiver2) = channel();
        let mut future = crate::Future::new(&pool, WaitFor(receiver1)).unwrap();
        let mut future2 = crate::Future::new(&pool, WaitFor(receiver2)).unwrap();

        let r = bytestream::test::test_poll_pin(Pin::new(&mut future));
        assert_eq!(r, Poll::Pending);
        let r2 = bytestream::test::test_poll_pin(Pin::new(&mut future2));
        assert_eq!(r2, Poll::Pending);

        //the second task must not wait behind the first one
        sender2.send(1).unwrap();
        let r2 = bytestream::test::test_await(future2, Duration::from_secs(1));
        assert_eq!(r2, 2);
        let r = bytestream::test::test_poll_pin(Pin::new(&mut future));
        assert_eq!(r, Poll::Pending);

        sender1.send(4).unwrap();
        let r = bytestream::test::test_await(future, Duration::from_secs(1));
        assert_eq!(r, 5);
        assert!(pool.workers() >= 2);
    }

    #[test] fn dropped_future_still_runs() {
        let pool = Pool::new(Priority::Testing);
        let (sender, receiver) = channel();
        let (done_sender, done_receiver) = channel();
        struct Forward(Receiver<u8>, Sender<u8>);
        impl crate::Task for Forward {
            type Output = ();
            fn run(self) {
                let value = self.0.recv().unwrap();
                self.1.send(value).unwrap();
            }
        }
        let future = crate::Future::new(&pool, Forward(receiver, done_sender)).unwrap();
        drop(future);
        sender.send(7).unwrap();
        assert_eq!(done_receiver.recv_timeout(Duration::from_secs(1)).unwrap(), 7);
    }

    #[test] fn workers_are_reused() {
        let pool = Pool::new(Priority::Testing);
        for value in 0..5 {
            let (sender, receiver) = channel();
            sender.send(value).unwrap();
            let future = crate::Future::new(&pool, WaitFor(receiver)).unwrap();
            let r = bytestream::test::test_await(future, Duration::from_secs(1));
            assert_eq!(r, value + 1);
        }
        //a worker reports idle just after delivering its output, so one extra launch is possible
        assert!(pool.workers() <= 2);
    }

    #[test] fn global_pool() {
        let pool = Pool::global(Priority::Testing);
        assert_eq!(pool.priority(), Priority::Testing);
        assert!(std::ptr::eq(pool, Pool::global(Priority::Testing)));
    }

    #[test] #[should_panic(expected = "explode")] fn panics_propagate() {
        let pool = Pool::new(Priority::Testing);
        let future = crate::Future::new(&pool, Explode).unwrap();
        bytestream::test::test_await(future, Duration::from_secs(1));
    }
}
