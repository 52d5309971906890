//! Self-rescheduling frame loop
//!
//! The host owns the actual scheduling primitive (a redraw request, an
//! animation-frame callback). The loop keeps at most one request in flight and
//! reschedules only after a frame rendered successfully.

/// Handle for one scheduled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// The host's frame scheduling primitive.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameRequest;
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Result of one frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Drawn; schedule the next frame.
    Rendered,
    /// Required resources were missing; do not reschedule.
    Stalled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stalled,
    Cancelled,
}

pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<FrameRequest>,
    state: LoopState,
    frames: u64,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            state: LoopState::Idle,
            frames: 0,
        }
    }

    /// Schedule the first frame. No-op unless idle.
    pub fn start(&mut self) {
        if self.state != LoopState::Idle {
            return;
        }
        self.pending = Some(self.scheduler.request_frame());
        self.state = LoopState::Running;
    }

    /// Run `frame` if a frame is pending. Returns whether it ran.
    pub fn dispatch(&mut self, frame: impl FnOnce() -> FrameStatus) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        let Some(_request) = self.pending.take() else {
            return false;
        };

        self.frames += 1;
        match frame() {
            FrameStatus::Rendered => {
                self.pending = Some(self.scheduler.request_frame());
            }
            FrameStatus::Stalled => {
                log::warn!("Frame loop stalled after {} frames", self.frames);
                self.state = LoopState::Stalled;
            }
        }
        true
    }

    /// Stop for good: the pending request is cancelled and nothing is
    /// scheduled afterwards. A frame already executing is not interrupted.
    pub fn cancel(&mut self) {
        if let Some(request) = self.pending.take() {
            self.scheduler.cancel_frame(request);
        }
        self.state = LoopState::Cancelled;
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    #[cfg(test)]
    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Frames dispatched so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[cfg(test)]
    fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingScheduler {
        next: u64,
        requested: u64,
        cancelled: Vec<FrameRequest>,
    }

    impl FrameScheduler for CountingScheduler {
        fn request_frame(&mut self) -> FrameRequest {
            self.next += 1;
            self.requested += 1;
            FrameRequest(self.next)
        }

        fn cancel_frame(&mut self, request: FrameRequest) {
            self.cancelled.push(request);
        }
    }

    #[test]
    fn test_rendered_frames_reschedule() {
        let mut frame_loop = FrameLoop::new(CountingScheduler::default());
        assert!(!frame_loop.dispatch(|| FrameStatus::Rendered));

        frame_loop.start();
        for _ in 0..3 {
            assert!(frame_loop.dispatch(|| FrameStatus::Rendered));
        }

        assert_eq!(frame_loop.frames(), 3);
        assert_eq!(frame_loop.scheduler().requested, 4);
        assert!(frame_loop.is_pending());
    }

    #[test]
    fn test_no_frames_after_cancel() {
        let mut frame_loop = FrameLoop::new(CountingScheduler::default());
        frame_loop.start();
        frame_loop.dispatch(|| FrameStatus::Rendered);

        frame_loop.cancel();
        let requested = frame_loop.scheduler().requested;

        let mut ran = false;
        assert!(!frame_loop.dispatch(|| {
            ran = true;
            FrameStatus::Rendered
        }));
        frame_loop.start();

        assert!(!ran);
        assert_eq!(frame_loop.scheduler().requested, requested);
        assert_eq!(frame_loop.scheduler().cancelled, vec![FrameRequest(2)]);
        assert_eq!(frame_loop.state(), LoopState::Cancelled);
    }

    #[test]
    fn test_stall_stops_rescheduling() {
        let mut frame_loop = FrameLoop::new(CountingScheduler::default());
        frame_loop.start();

        assert!(frame_loop.dispatch(|| FrameStatus::Stalled));
        assert_eq!(frame_loop.state(), LoopState::Stalled);
        assert!(!frame_loop.is_pending());
        assert!(!frame_loop.dispatch(|| FrameStatus::Rendered));
        assert_eq!(frame_loop.scheduler().requested, 1);

        // Nothing pending, so nothing to cancel
        frame_loop.cancel();
        assert!(frame_loop.scheduler().cancelled.is_empty());
    }
}
