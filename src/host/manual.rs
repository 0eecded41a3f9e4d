//! Deterministic host driven by explicit time steps.

use super::{FrameHandle, FrameScheduler, HostEvent, Router, TimerHandle, TimerHost};
use std::time::Duration;

/// Host whose clock only moves when [`advance`](ManualHost::advance) is called.
///
/// Frames requested before an `advance` all fire at the end of that step.
/// Timers fire at their due time, in due order, before the step's frames.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use themewipe::host::{FrameScheduler, HostEvent, ManualHost, TimerHost};
///
/// let mut host = ManualHost::new();
/// let frame = host.request_frame();
/// let timer = host.set_timeout(Duration::from_millis(5));
///
/// let events = host.advance(Duration::from_millis(16));
/// assert_eq!(
///     events,
///     vec![
///         HostEvent::Timer { handle: timer, now: Duration::from_millis(5) },
///         HostEvent::Frame { handle: frame, now: Duration::from_millis(16) },
///     ]
/// );
/// ```
#[derive(Debug, Default)]
pub struct ManualHost {
    now: Duration,
    next_handle: u64,
    frames: Vec<FrameHandle>,
    timers: Vec<(TimerHandle, Duration)>,
    frames_requested: usize,
    timers_set: usize,
    navigations: Vec<String>,
}

impl ManualHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current host time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward by `dt` and return the events that became due.
    pub fn advance(&mut self, dt: Duration) -> Vec<HostEvent> {
        let target = self.now + dt;

        let mut due: Vec<(TimerHandle, Duration)> = Vec::new();
        self.timers.retain(|&(handle, at)| {
            if at <= target {
                due.push((handle, at));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(handle, at)| (at, handle.0));

        let mut events: Vec<HostEvent> = due
            .into_iter()
            .map(|(handle, at)| HostEvent::Timer { handle, now: at })
            .collect();

        self.now = target;
        events.extend(
            self.frames
                .drain(..)
                .map(|handle| HostEvent::Frame { handle, now: target }),
        );
        events
    }

    /// Total frames ever requested.
    pub fn frames_requested(&self) -> usize {
        self.frames_requested
    }

    /// Frames requested and neither fired nor cancelled.
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Total timeouts ever scheduled.
    pub fn timers_set(&self) -> usize {
        self.timers_set
    }

    /// Timeouts scheduled and neither fired nor cleared.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Every href passed to [`Router::navigate`], in order.
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    fn next(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl FrameScheduler for ManualHost {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next());
        self.frames.push(handle);
        self.frames_requested += 1;
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.retain(|h| *h != handle);
    }
}

impl TimerHost for ManualHost {
    fn set_timeout(&mut self, delay: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next());
        self.timers.push((handle, self.now + delay));
        self.timers_set += 1;
        handle
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.timers.retain(|(h, _)| *h != handle);
    }
}

impl Router for ManualHost {
    fn navigate(&mut self, href: &str) {
        self.navigations.push(href.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_frame_does_not_fire() {
        let mut host = ManualHost::new();
        let a = host.request_frame();
        let b = host.request_frame();
        host.cancel_frame(a);

        let events = host.advance(Duration::from_millis(16));
        assert_eq!(
            events,
            vec![HostEvent::Frame {
                handle: b,
                now: Duration::from_millis(16)
            }]
        );
        assert_eq!(host.frames_requested(), 2);
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn timers_fire_in_due_order() {
        let mut host = ManualHost::new();
        let late = host.set_timeout(Duration::from_millis(30));
        let early = host.set_timeout(Duration::from_millis(10));

        let events = host.advance(Duration::from_millis(50));
        let handles: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                HostEvent::Timer { handle, .. } => Some(*handle),
                HostEvent::Frame { .. } => None,
            })
            .collect();
        assert_eq!(handles, vec![early, late]);
        assert_eq!(events[0].now(), Duration::from_millis(10));
    }

    #[test]
    fn timer_not_yet_due_stays_pending() {
        let mut host = ManualHost::new();
        host.set_timeout(Duration::from_millis(100));
        assert!(host.advance(Duration::from_millis(99)).is_empty());
        assert_eq!(host.pending_timers(), 1);
        assert_eq!(host.advance(Duration::from_millis(1)).len(), 1);
    }

    #[test]
    fn cleared_timer_never_fires() {
        let mut host = ManualHost::new();
        let t = host.set_timeout(Duration::from_millis(5));
        host.clear_timeout(t);
        host.clear_timeout(t);
        assert!(host.advance(Duration::from_millis(10)).is_empty());
    }

    #[test]
    fn navigations_are_recorded() {
        let mut host = ManualHost::new();
        host.navigate("/about");
        host.navigate("/contact");
        assert_eq!(host.navigations(), ["/about", "/contact"]);
    }
}
