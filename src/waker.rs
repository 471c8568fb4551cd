use std::sync::Arc;
use std::task::{Wake, Waker};
use std::thread::Thread;

///Wakes a thread parked in one of our blocking executors.
pub(crate) struct ThreadWaker(Thread);
impl Wake for ThreadWaker {
    fn wake(self: Arc<Self>) {
        self.0.unpark()
    }
    fn wake_by_ref(self: &Arc<Self>) {
        self.0.unpark()
    }
}
impl ThreadWaker {
    ///A waker for the current thread.
    pub(crate) fn current() -> Waker {
        Arc::new(ThreadWaker(std::thread::current())).into()
    }
}
