/*!
Spawns the named worker threads that perform blocking IO.

Threads are created with [std::thread::Builder] so they carry a debug name.  The [Priority] is applied from
inside the new thread, on platforms where that can be done without extra privileges.
*/
use priority::Priority;

mod platform;

/**
A finer adjustment within one [Priority].

Positive values make the thread less important than its peers of the same [Priority].
*/
#[derive(Copy,Clone,Debug,PartialEq,Eq)]
pub struct MicroPriority(i8);

impl MicroPriority {
    ///The adjustment we use for freshly launched worker threads.
    pub const NEW: MicroPriority = MicroPriority(0);

    pub fn offset(&self) -> i8 {
        self.0
    }
}

/**
Spawns a thread that executes the closure specified.

This sets the appropriate priority on the thread before running `f`.  Failure to apply the priority is
logged and otherwise ignored; failure to create the thread is returned.
 */
pub fn spawn_thread<F: FnOnce() + Send + 'static>(priority: Priority, micro_priority: MicroPriority, debug_name: &str, f: F) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name(debug_name.to_owned())
        .spawn(move || {
            platform::apply(priority, micro_priority);
            f()
        })?;
    Ok(())
}

#[test] fn runs_closure() {
    let (sender, receiver) = std::sync::mpsc::channel();
    spawn_thread(Priority::Testing, MicroPriority::NEW, "spawn runs_closure", move || {
        let name = std::thread::current().name().map(|n| n.to_owned());
        sender.send(name).unwrap();
    }).unwrap();
    let name = receiver.recv_timeout(std::time::Duration::from_secs(1)).unwrap();
    assert_eq!(name.as_deref(), Some("spawn runs_closure"));
}

#[test] fn background_thread_runs() {
    let (sender, receiver) = std::sync::mpsc::channel();
    spawn_thread(Priority::Background, MicroPriority::NEW, "spawn background", move || {
        sender.send(23).unwrap();
    }).unwrap();
    assert_eq!(receiver.recv_timeout(std::time::Duration::from_secs(1)).unwrap(), 23);
}
