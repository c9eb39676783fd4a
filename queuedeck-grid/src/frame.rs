//! Frame coalescing for high-frequency geometry events.
//!
//! Scroll, resize and measurement events can arrive many times per rendered
//! frame. They are recorded here and the pipeline recomputes the visible
//! window at most once per frame. Later values overwrite earlier ones, and a
//! discrete mutation takes the pending job over so it is never applied twice.

/// Geometry changes waiting for the next frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PendingFrame {
    /// Generation at which the job was last updated.
    pub generation: u64,
    /// Latest requested scroll offset.
    pub scroll_offset: Option<f64>,
    /// Latest requested container size.
    pub container_size: Option<f64>,
    /// Whether item sizes were corrected since the last frame.
    pub measured: bool,
    /// Number of events folded into this job.
    pub events: usize,
}

/// Collects geometry events until the next frame.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    generation: u64,
    pending: Option<PendingFrame>,
}

impl FrameScheduler {
    /// Create an idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    fn pending_mut(&mut self) -> &mut PendingFrame {
        self.generation += 1;
        let generation = self.generation;
        let pending = self.pending.get_or_insert_with(PendingFrame::default);
        pending.generation = generation;
        pending.events += 1;
        pending
    }

    /// Record a scroll offset. The latest one wins.
    pub fn schedule_scroll(&mut self, offset: f64) {
        self.pending_mut().scroll_offset = Some(offset);
    }

    /// Record a container size. The latest one wins.
    pub fn schedule_resize(&mut self, size: f64) {
        self.pending_mut().container_size = Some(size);
    }

    /// Record that item sizes changed.
    pub fn schedule_measure(&mut self) {
        self.pending_mut().measured = true;
    }

    /// Whether a job is waiting for the next frame.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Latest scroll offset waiting to be applied.
    pub fn pending_scroll(&self) -> Option<f64> {
        self.pending.and_then(|p| p.scroll_offset)
    }

    /// Counter bumped on every scheduled event.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Take the pending job, leaving the scheduler idle.
    ///
    /// Called both at frame time and when a discrete mutation supersedes
    /// the job.
    pub fn take(&mut self) -> Option<PendingFrame> {
        let pending = self.pending.take();
        if let Some(p) = &pending
            && p.events > 1
        {
            log::debug!("Frame coalesced {} geometry events", p.events);
        }
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_scroll_wins() {
        let mut frames = FrameScheduler::new();
        frames.schedule_scroll(10.0);
        frames.schedule_scroll(30.0);
        frames.schedule_resize(400.0);
        let job = frames.take().unwrap();
        assert_eq!(job.scroll_offset, Some(30.0));
        assert_eq!(job.container_size, Some(400.0));
        assert_eq!(job.events, 3);
        assert_eq!(job.generation, 3);
        assert!(frames.take().is_none());
    }
}
