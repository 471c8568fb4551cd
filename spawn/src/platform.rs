#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub(crate) use linux::apply;

#[cfg(not(target_os = "linux"))]
pub(crate) fn apply(_priority: priority::Priority, _micro_priority: crate::MicroPriority) {
    //todo: map Priority onto QoS classes / thread priorities on macOS and windows.
}
