//! Setup and teardown bookkeeping for a mounted field, independent of the
//! browser so the register/unregister sequence can be driven natively.

use std::cell::Cell;
use std::fmt::Debug;
use std::rc::Rc;

/// Events a mounted field listens to, with whether the listener is passive.
pub const LISTENED_EVENTS: [(&str, bool); 3] = [("resize", false), ("mousemove", true), ("touchmove", true)];

/// Where listeners and animation frames are registered.
pub trait HostEvents {
    type Error: Debug;

    fn listen(&mut self, event: &'static str, passive: bool) -> Result<(), Self::Error>;
    fn unlisten(&mut self, event: &'static str) -> Result<(), Self::Error>;
    /// Schedules the frame callback and returns its handle.
    fn request_frame(&mut self) -> Result<i32, Self::Error>;
    /// Cancels `pending` if set and stops any further rescheduling.
    fn cancel_frame(&mut self, pending: Option<i32>) -> Result<(), Self::Error>;
}

/// Listeners and the frame loop registered on a [`HostEvents`]. Detaches on
/// drop unless already detached.
pub struct Bindings<H: HostEvents> {
    host: H,
    frame_handle: Rc<Cell<Option<i32>>>,
    listening: Vec<&'static str>,
    attached: bool,
}

impl<H: HostEvents> Bindings<H> {
    pub fn new(host: H) -> Self {
        Self::with_frame_handle(host, Rc::new(Cell::new(None)))
    }

    /// Shares `frame_handle` with a frame callback that reschedules itself.
    pub fn with_frame_handle(host: H, frame_handle: Rc<Cell<Option<i32>>>) -> Self {
        Self {
            host,
            frame_handle,
            listening: Vec::with_capacity(LISTENED_EVENTS.len()),
            attached: false,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn pending_frame(&self) -> Option<i32> {
        self.frame_handle.get()
    }

    /// Registers every listener, then the first frame. Calling it again while
    /// attached does nothing. On error whatever was registered stays tracked
    /// and is removed by [`detach`](Self::detach).
    pub fn attach(&mut self) -> Result<(), H::Error> {
        if self.attached {
            return Ok(());
        }
        self.attached = true;

        for (event, passive) in LISTENED_EVENTS {
            self.host.listen(event, passive)?;
            self.listening.push(event);
        }
        let id = self.host.request_frame()?;
        self.frame_handle.set(Some(id));
        Ok(())
    }

    /// Cancels the pending frame and removes every listener. Returns `false`
    /// if there was nothing to tear down.
    pub fn detach(&mut self) -> bool {
        if !self.attached {
            return false;
        }
        self.attached = false;

        if let Err(err) = self.host.cancel_frame(self.frame_handle.take()) {
            log::warn!("failed to cancel animation frame: {err:?}");
        }
        for event in self.listening.drain(..) {
            if let Err(err) = self.host.unlisten(event) {
                log::warn!("failed to remove {event} listener: {err:?}");
            }
        }
        true
    }
}

impl<H: HostEvents> Drop for Bindings<H> {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Mounts on `target` when the page has one. A missing target is not an
/// error: it is logged and nothing gets wired.
pub fn mount_if_present<T, M, E>(
    id: &str,
    target: Option<T>,
    mount: impl FnOnce(T) -> Result<M, E>,
) -> Result<Option<M>, E> {
    match target {
        Some(target) => mount(target).map(Some),
        None => {
            log::warn!("#{id} not found; particle field not mounted");
            Ok(None)
        }
    }
}
