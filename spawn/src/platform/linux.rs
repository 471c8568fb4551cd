use priority::Priority;
use crate::MicroPriority;

///Linux nice values are per-thread, so `who = 0` adjusts only the calling thread.
fn nice_for(priority: Priority, micro_priority: MicroPriority) -> i32 {
    let base = match priority {
        Priority::UserWaiting | Priority::Testing => 0,
        Priority::Background => 10,
        _ => 0,
    };
    base + i32::from(micro_priority.offset())
}

pub(crate) fn apply(priority: Priority, micro_priority: MicroPriority) {
    let nice = nice_for(priority, micro_priority);
    //raising priority needs CAP_SYS_NICE; we only ever lower it
    if nice <= 0 {
        return;
    }
    let r = unsafe { libc::setpriority(libc::PRIO_PROCESS, 0, nice) };
    if r != 0 {
        log::debug!("setpriority({nice}) failed: {}", std::io::Error::last_os_error());
    }
}

#[test] fn nice_values() {
    assert_eq!(nice_for(Priority::UserWaiting, MicroPriority::NEW), 0);
    assert_eq!(nice_for(Priority::Background, MicroPriority::NEW), 10);
    assert_eq!(nice_for(Priority::Background, MicroPriority(2)), 12);
}
