//! Redraw coalescing

/// Collapses any number of redraw requests into a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    requested: bool,
}

impl FrameScheduler {
    pub fn request(&mut self) {
        self.requested = true;
    }

    /// Consume the pending request. True at most once per batch of requests.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.requested)
    }

    /// Drop a pending request without drawing
    pub fn cancel(&mut self) {
        self.requested = false;
    }

    pub fn is_pending(&self) -> bool {
        self.requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_collapse() {
        let mut frame = FrameScheduler::default();
        assert!(!frame.take());
        frame.request();
        frame.request();
        frame.request();
        assert!(frame.is_pending());
        assert!(frame.take());
        assert!(!frame.take());
    }

    #[test]
    fn test_cancel_drops_request() {
        let mut frame = FrameScheduler::default();
        frame.request();
        frame.cancel();
        assert!(!frame.take());
    }
}
