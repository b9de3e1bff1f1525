//! Platform abstraction for the paging runtime.
//!
//! The runtime never drives itself. Hosts implement [`RuntimeScheduler`] so
//! the runtime can ask for another UI pass whenever a fetch future wakes or
//! new work is queued, and then call `RuntimeHandle::drain_ui` from their
//! event loop.

/// Requests UI passes on behalf of the paging runtime.
///
/// Wakers created by the runtime may be invoked from any thread (an HTTP
/// client completing on a worker pool, for example), so implementations must
/// be `Send + Sync`.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame and drain pending UI work.
    fn schedule_frame(&self);
}
