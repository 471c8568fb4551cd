use priority::Priority;

///Buffer size used when none is configured.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/**
Configuration for adapters and the streams that build them.

For cases where only the priority matters, it may be more convenient to use [Priority] instead, which
is convertible (often, implicitly) to this type.

```
use stream::{Options, Priority};
let options = Options::new().buffer_size(512).priority(Priority::Background);
assert_eq!(options.buffer_size_value(), 512);
```
*/
#[derive(Copy,Clone,Debug,PartialEq,Eq)]
pub struct Options {
    buffer_size: usize,
    priority: Priority,
}

impl Options {
    pub fn new() -> Self {
        Options { buffer_size: DEFAULT_BUFFER_SIZE, priority: Priority::UserWaiting }
    }
    /**
    The most bytes a single read returns.

    # Panics
    If `buffer_size` is zero.
    */
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        assert!(buffer_size > 0, "buffer_size must be positive");
        self.buffer_size = buffer_size;
        self
    }
    ///Priority of the workers that perform the blocking calls.
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
    pub fn buffer_size_value(&self) -> usize {
        self.buffer_size
    }
    pub fn priority_value(&self) -> Priority {
        self.priority
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Priority> for Options {
    fn from(priority: Priority) -> Self {
        Options::new().priority(priority)
    }
}

#[test] fn defaults() {
    let options = Options::default();
    assert_eq!(options.buffer_size_value(), 4096);
    assert_eq!(options.priority_value(), Priority::UserWaiting);
    let options: Options = Priority::Testing.into();
    assert_eq!(options.priority_value(), Priority::Testing);
    assert_eq!(options.buffer_size_value(), DEFAULT_BUFFER_SIZE);
}

#[test] #[should_panic(expected = "buffer_size must be positive")] fn zero_buffer() {
    let _ = Options::new().buffer_size(0);
}
