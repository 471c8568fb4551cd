use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use atomic_waker::AtomicWaker;
use crate::pool::Pool;

///Where the worker leaves the output of [crate::Task::run].
struct Mailbox<Output> {
    //Err holds the panic payload of a task that panicked
    output: Mutex<Option<std::thread::Result<Output>>>,
    waker: AtomicWaker,
}
impl<Output> Mailbox<Output> {
    fn send_mail(&self, output: std::thread::Result<Output>) {
        *self.output.lock().unwrap_or_else(PoisonError::into_inner) = Some(output);
        self.waker.wake();
    }
    fn take_mail(&self) -> Option<std::thread::Result<Output>> {
        self.output.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

/**
Resolves to the output of one [crate::Task], once a worker has run it.

If the task panicked, polling the future resumes the panic on the polling thread.
*/
pub struct Future<Output> {
    mailbox: Arc<Mailbox<Output>>,
    gone: bool,
}
impl<Output: Send + 'static> Future<Output> {
    /**
    Submits `task` to `pool` and returns a future for its output.

    The task is handed to a worker immediately, not on first poll.  Fails only if a new worker was needed and could not be
    launched.
     */
    pub fn new<Task: crate::Task<Output=Output>>(pool: &Pool, task: Task) -> std::io::Result<Self> {
        let mailbox = Arc::new(Mailbox{output: Mutex::new(None), waker: AtomicWaker::new()});
        let move_mailbox = mailbox.clone();
        pool.launch(Box::new(move || {
            let output = catch_unwind(AssertUnwindSafe(move || task.run()));
            move_mailbox.send_mail(output);
        }))?;
        Ok(Self{mailbox, gone: false})
    }
}

impl<Output> std::future::Future for Future<Output> {
    type Output = Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let unpin = self.get_mut();
        if unpin.gone {
            panic!("block_party::Future polled after completion")
        }
        let mail = match unpin.mailbox.take_mail() {
            Some(mail) => mail,
            None => {
                unpin.mailbox.waker.register(cx.waker());
                //try one more time, the worker may have finished before we registered
                match unpin.mailbox.take_mail() {
                    Some(mail) => mail,
                    None => return Poll::Pending,
                }
            }
        };
        unpin.gone = true; //never allow us to do this again
        match mail {
            Ok(output) => Poll::Ready(output),
            Err(payload) => resume_unwind(payload),
        }
    }
}
