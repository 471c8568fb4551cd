use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use once_cell::sync::OnceCell;
use priority::Priority;
use spawn::{MicroPriority, spawn_thread};

///How long an idle worker waits for new work before shutting down.
const IDLE_GRACE: Duration = Duration::from_secs(1);

pub(crate) type Job = Box<dyn FnOnce() + Send>;

pub(crate) struct PoolInner {
    receiver: Receiver<Job>,
    priority: Priority,
    ///Workers that are waiting for a job and have not been claimed by a sender.
    idle: AtomicUsize,
    ///Workers that are alive, busy or not.
    workers: AtomicUsize,
}
impl Debug for PoolInner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let priority = &self.priority;
        let idle = self.idle.load(Ordering::Relaxed);
        let workers = self.workers.load(Ordering::Relaxed);
        f.write_fmt(format_args!("<PoolInner{{priority: {priority:?} idle: {idle} workers: {workers}, ..}}>"))
    }
}
impl PoolInner {
    ///Takes one idle credit, if there is one.
    fn claim_idle(&self) -> bool {
        self.idle.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1)).is_ok()
    }
}

/**
A scope for [crate::Task]s.

All workers of a pool run at the pool's [Priority].  Usually you want one pool per priority, placed into a global static
so that it is reused across [crate::Future]s; [Pool::global] provides exactly that.
*/
#[derive(Debug)]
pub struct Pool {
    sender: Sender<Job>,
    inner: Arc<PoolInner>,
}

impl Pool {
    /**
    Creates a new pool.  No worker is launched until the first task arrives.
    */
    pub fn new(priority: Priority) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Pool {
            sender,
            inner: Arc::new(PoolInner {
                receiver,
                priority,
                idle: AtomicUsize::new(0),
                workers: AtomicUsize::new(0),
            }),
        }
    }

    ///The process-wide pool for `priority`.
    pub fn global(priority: Priority) -> &'static Pool {
        static USER_WAITING: OnceCell<Pool> = OnceCell::new();
        static BACKGROUND: OnceCell<Pool> = OnceCell::new();
        static TESTING: OnceCell<Pool> = OnceCell::new();
        let cell = match priority {
            Priority::Background => &BACKGROUND,
            Priority::Testing => &TESTING,
            _ => &USER_WAITING,
        };
        cell.get_or_init(|| Pool::new(priority))
    }

    pub fn priority(&self) -> Priority {
        self.inner.priority
    }

    ///Number of live workers.
    pub fn workers(&self) -> usize {
        self.inner.workers.load(Ordering::Acquire)
    }

    /**
    Hands the job to a worker, launching one if every existing worker is busy.

    The worker is secured before the job is queued, so a failed launch never leaves an orphaned job behind.
    */
    pub(crate) fn launch(&self, job: Job) -> std::io::Result<()> {
        if !self.inner.claim_idle() {
            self.inner.workers.fetch_add(1, Ordering::AcqRel);
            let move_inner = self.inner.clone();
            let name = format!("bytestream block_party {}", self.inner.priority);
            if let Err(e) = spawn_thread(self.inner.priority, MicroPriority::NEW, &name, move || worker_fn(move_inner)) {
                self.inner.workers.fetch_sub(1, Ordering::AcqRel);
                log::warn!("could not launch {name}: {e}");
                return Err(e);
            }
            log::trace!("launched {name}");
        }
        //the receiver lives as long as self.inner, so this cannot disconnect
        self.sender.send(job).map_err(|_| std::io::Error::new(std::io::ErrorKind::BrokenPipe, "block_party pool is gone"))
    }
}

fn worker_fn(pool_inner: Arc<PoolInner>) {
    loop {
        match pool_inner.receiver.recv_timeout(IDLE_GRACE) {
            Ok(job) => {
                job();
                pool_inner.idle.fetch_add(1, Ordering::AcqRel);
            }
            Err(RecvTimeoutError::Timeout) => {
                //if no credit is left, a sender claimed us and its job is on the way
                if pool_inner.claim_idle() {
                    break;
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    pool_inner.workers.fetch_sub(1, Ordering::AcqRel);
    log::trace!("block_party {} worker retired", pool_inner.priority);
}
