///Models the priority of blocking IO work.
///
/// This normally ought to be set by the top level application,
/// as e.g. streaming a large log file in the background is a lot different than loading the document
/// the user just opened, and this is normally not possible to distinguish in a library.  Therefore,
/// libraries ought to be careful to expose the right information to their callers,
/// potentially a good way up the stack.
///
/// This type maps to the priority of the worker threads that perform the blocking native calls.
/// Work of different priorities never shares a worker.
#[non_exhaustive]
#[derive(Copy,Clone,Debug,PartialEq,Eq,Hash)]
pub enum Priority {
    ///The user is actively blocked waiting for the result.  This is a high-priority task, but not realtime.
    UserWaiting,
    ///Nobody is waiting on the result right now, e.g. prefetching or housekeeping.
    Background,
    ///This priority is used for most unit tests that don't especially care what priority they use.
    Testing
}

impl Priority {
    ///A short name, suitable for thread names and log records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::UserWaiting => "user_waiting",
            Priority::Background => "background",
            Priority::Testing => "testing",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::UserWaiting
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[test] fn names() {
    assert_eq!(Priority::default(), Priority::UserWaiting);
    assert_eq!(Priority::Background.to_string(), "background");
}
