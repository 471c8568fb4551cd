/*!
Cooperative byte streams over blocking handles.

The interesting parts live in the `stream` crate, re-exported here as [io::stream] behind the `io_stream` feature.
This crate adds a few ways to drive those futures from synchronous code.
*/
#[cfg(feature="sync")]
pub mod sync;

#[cfg(any(test,feature="test",feature="sync"))]
mod waker;

#[cfg(any(test,feature="test"))]
pub mod test;

pub mod io;

pub use priority::Priority;
