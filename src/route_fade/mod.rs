//! Route content fade.
//!
//! Exactly one screen is rendered at a time. After a navigation the old
//! screen is held for a moment, then the new one is swapped in and fades in.
//! Every navigation bumps a transition id and every timer carries the id it
//! was scheduled under, so a timer from an older navigation never moves the
//! phase.
//!
//! Only pathname and search count as a route change; hash-only navigation
//! keeps the current screen.

use crate::config::RouteFadeConfig;
use crate::core::{PhaseChange, State, StateHistory};
use crate::host::{RouteKey, TimerHandle, TimerHost};
use crate::state_enum;
use std::time::Duration;

state_enum! {
    /// Phase of the routed content.
    pub enum RoutePhase {
        /// Content fully visible, nothing scheduled.
        Idle,
        /// First mount: hidden, then delayed by the hold and faded in.
        Appearing,
        /// Navigation seen; the previous screen is still shown.
        Pausing,
        /// New screen swapped in and fading in.
        FadingIn,
    }
    settled: [Idle]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerKind {
    Appear,
    Hold,
    FadeIn,
}

#[derive(Clone, Copy, Debug)]
struct ScheduledTimer {
    handle: TimerHandle,
    transition_id: u64,
    kind: TimerKind,
}

/// Sequences route content through hold and fade-in.
///
/// `C` is whatever the host renders for a route.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use themewipe::config::RouteFadeConfig;
/// use themewipe::host::{HostEvent, ManualHost, RouteKey};
/// use themewipe::route_fade::{RouteFadeCoordinator, RoutePhase};
///
/// fn pump(fade: &mut RouteFadeCoordinator<&'static str>, host: &mut ManualHost, ms: u64) {
///     for event in host.advance(Duration::from_millis(ms)) {
///         if let HostEvent::Timer { handle, now } = event {
///             fade.on_timer(handle, now, host);
///         }
///     }
/// }
///
/// let mut host = ManualHost::new();
/// let mut fade = RouteFadeCoordinator::new(&RouteFadeConfig::default());
/// fade.mount(RouteKey::new("/"), "home", Duration::ZERO, &mut host);
/// assert_eq!(fade.phase(), RoutePhase::Appearing);
///
/// pump(&mut fade, &mut host, 1000);
/// assert_eq!(fade.phase(), RoutePhase::Idle);
///
/// fade.on_location_change(RouteKey::new("/about"), "about", host.now(), &mut host);
/// assert_eq!(fade.phase(), RoutePhase::Pausing);
/// assert_eq!(fade.rendered(), Some(&"home"));
///
/// pump(&mut fade, &mut host, 500);
/// assert_eq!(fade.phase(), RoutePhase::FadingIn);
/// assert_eq!(fade.rendered(), Some(&"about"));
///
/// pump(&mut fade, &mut host, 500);
/// assert_eq!(fade.phase(), RoutePhase::Idle);
/// ```
#[derive(Debug)]
pub struct RouteFadeCoordinator<C> {
    config: RouteFadeConfig,
    reduced_motion: bool,
    phase: RoutePhase,
    transition_id: u64,
    /// Route key of the latest location seen.
    location_key: Option<RouteKey>,
    rendered: Option<(RouteKey, C)>,
    pending: Option<(RouteKey, C)>,
    timer: Option<ScheduledTimer>,
    history: StateHistory<RoutePhase>,
}

impl<C> RouteFadeCoordinator<C> {
    pub fn new(config: &RouteFadeConfig) -> Self {
        Self {
            config: config.clone(),
            reduced_motion: false,
            phase: RoutePhase::Idle,
            transition_id: 0,
            location_key: None,
            rendered: None,
            pending: None,
            timer: None,
            history: StateHistory::new(),
        }
    }

    pub fn phase(&self) -> RoutePhase {
        self.phase
    }

    pub fn transition_id(&self) -> u64 {
        self.transition_id
    }

    /// Content currently on screen.
    pub fn rendered(&self) -> Option<&C> {
        self.rendered.as_ref().map(|(_, content)| content)
    }

    pub fn rendered_key(&self) -> Option<&RouteKey> {
        self.rendered.as_ref().map(|(key, _)| key)
    }

    /// Route key of the most recent location, which may not be on screen yet.
    pub fn location_key(&self) -> Option<&RouteKey> {
        self.location_key.as_ref()
    }

    pub fn history(&self) -> &StateHistory<RoutePhase> {
        &self.history
    }

    pub fn is_mounted(&self) -> bool {
        self.rendered.is_some()
    }

    /// Switch reduced motion. Turning it on settles any running phase at
    /// once, landing held content first.
    pub fn set_reduced_motion(
        &mut self,
        reduced: bool,
        now: Duration,
        timers: &mut dyn TimerHost,
    ) {
        self.reduced_motion = reduced;
        if !reduced || self.phase == RoutePhase::Idle {
            return;
        }
        self.clear_timers(timers);
        if let Some(next) = self.pending.take() {
            self.rendered = Some(next);
        }
        self.enter(RoutePhase::Idle, now);
    }

    fn is_instant(&self) -> bool {
        self.reduced_motion || self.config.is_instant()
    }

    /// Show the first screen. Plays the appear fade unless motion is off.
    pub fn mount(&mut self, key: RouteKey, content: C, now: Duration, timers: &mut dyn TimerHost) {
        self.clear_timers(timers);
        self.location_key = Some(key.clone());
        self.rendered = Some((key, content));
        self.pending = None;

        if self.is_instant() {
            self.enter(RoutePhase::Idle, now);
            return;
        }

        self.transition_id += 1;
        self.enter(RoutePhase::Appearing, now);
        let delay = self.config.hold() + self.config.fade_in();
        self.schedule(TimerKind::Appear, delay, timers);
    }

    /// React to a new location. Mounts if nothing is on screen yet.
    pub fn on_location_change(
        &mut self,
        key: RouteKey,
        content: C,
        now: Duration,
        timers: &mut dyn TimerHost,
    ) -> RoutePhase {
        if self.rendered.is_none() {
            self.mount(key, content, now, timers);
            return self.phase;
        }

        if self.location_key.as_ref() == Some(&key) {
            self.clear_timers(timers);
            // A hash change mid-hold still owes the swap to this route.
            if self.pending.take().is_some() {
                self.rendered = Some((key, content));
            }
            self.enter(RoutePhase::Idle, now);
            return self.phase;
        }

        self.transition_id += 1;
        self.clear_timers(timers);
        self.location_key = Some(key.clone());
        tracing::debug!(transition_id = self.transition_id, route = %key, "route change");

        if self.is_instant() {
            self.pending = None;
            self.rendered = Some((key, content));
            self.enter(RoutePhase::Idle, now);
            return self.phase;
        }

        self.pending = Some((key, content));
        self.enter(RoutePhase::Pausing, now);
        self.schedule(TimerKind::Hold, self.config.hold(), timers);
        self.phase
    }

    /// Handle a fired timeout. Returns whether the handle was ours.
    pub fn on_timer(
        &mut self,
        handle: TimerHandle,
        now: Duration,
        timers: &mut dyn TimerHost,
    ) -> bool {
        let Some(timer) = self.timer.filter(|t| t.handle == handle) else {
            return false;
        };
        self.timer = None;
        if timer.transition_id != self.transition_id {
            tracing::trace!(
                stale = timer.transition_id,
                current = self.transition_id,
                "stale fade timer"
            );
            return true;
        }

        match timer.kind {
            TimerKind::Appear | TimerKind::FadeIn => self.enter(RoutePhase::Idle, now),
            TimerKind::Hold => {
                if let Some(next) = self.pending.take() {
                    self.rendered = Some(next);
                }
                self.enter(RoutePhase::FadingIn, now);
                self.schedule(TimerKind::FadeIn, self.config.fade_in(), timers);
            }
        }
        true
    }

    fn schedule(&mut self, kind: TimerKind, delay: Duration, timers: &mut dyn TimerHost) {
        self.timer = Some(ScheduledTimer {
            handle: timers.set_timeout(delay),
            transition_id: self.transition_id,
            kind,
        });
    }

    fn enter(&mut self, phase: RoutePhase, now: Duration) {
        if self.phase == phase {
            return;
        }
        tracing::debug!(
            from = self.phase.name(),
            to = phase.name(),
            transition_id = self.transition_id,
            "route phase"
        );
        self.history.record(PhaseChange {
            from: self.phase,
            to: phase,
            at: now,
            transition_id: self.transition_id,
        });
        self.phase = phase;
    }

    /// Cancel the pending timeout, if any. Safe to call repeatedly.
    pub fn clear_timers(&mut self, timers: &mut dyn TimerHost) {
        if let Some(timer) = self.timer.take() {
            timers.clear_timeout(timer.handle);
        }
    }

    pub fn teardown(&mut self, timers: &mut dyn TimerHost) {
        self.clear_timers(timers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostEvent, ManualHost};

    type Fade = RouteFadeCoordinator<&'static str>;

    fn pump(fade: &mut Fade, host: &mut ManualHost, ms: u64) {
        for event in host.advance(Duration::from_millis(ms)) {
            if let HostEvent::Timer { handle, now } = event {
                fade.on_timer(handle, now, host);
            }
        }
    }

    fn mounted_idle(host: &mut ManualHost) -> Fade {
        let mut fade = Fade::new(&RouteFadeConfig::default());
        fade.mount(RouteKey::new("/experience"), "experience", host.now(), host);
        pump(&mut fade, host, 1000);
        assert_eq!(fade.phase(), RoutePhase::Idle);
        fade
    }

    fn navigate(fade: &mut Fade, host: &mut ManualHost, href: &str, content: &'static str) {
        fade.on_location_change(RouteKey::new(href), content, host.now(), host);
    }

    #[test]
    fn first_mount_appears_then_settles() {
        let mut host = ManualHost::new();
        let mut fade = Fade::new(&RouteFadeConfig::default());
        fade.mount(RouteKey::new("/"), "home", Duration::ZERO, &mut host);
        assert_eq!(fade.phase(), RoutePhase::Appearing);
        assert_eq!(fade.rendered(), Some(&"home"));

        pump(&mut fade, &mut host, 999);
        assert_eq!(fade.phase(), RoutePhase::Appearing);
        pump(&mut fade, &mut host, 1);
        assert_eq!(fade.phase(), RoutePhase::Idle);
        assert!(fade.phase().is_settled());
    }

    #[test]
    fn reduced_motion_mount_is_idle() {
        let mut host = ManualHost::new();
        let mut fade = Fade::new(&RouteFadeConfig::default());
        fade.set_reduced_motion(true, Duration::ZERO, &mut host);
        fade.mount(RouteKey::new("/"), "home", Duration::ZERO, &mut host);
        assert_eq!(fade.phase(), RoutePhase::Idle);
        assert_eq!(host.timers_set(), 0);
    }

    #[test]
    fn hash_only_change_keeps_screen() {
        let mut host = ManualHost::new();
        let mut fade = mounted_idle(&mut host);
        let id = fade.transition_id();

        navigate(&mut fade, &mut host, "/experience#taarcom", "experience-again");
        assert_eq!(fade.phase(), RoutePhase::Idle);
        assert_eq!(fade.rendered(), Some(&"experience"));
        assert_eq!(fade.transition_id(), id);
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn navigation_holds_then_fades() {
        let mut host = ManualHost::new();
        let mut fade = mounted_idle(&mut host);

        navigate(&mut fade, &mut host, "/about", "about");
        assert_eq!(fade.phase(), RoutePhase::Pausing);
        assert_eq!(fade.rendered(), Some(&"experience"));

        pump(&mut fade, &mut host, 499);
        assert_eq!(fade.phase(), RoutePhase::Pausing);
        pump(&mut fade, &mut host, 1);
        assert_eq!(fade.phase(), RoutePhase::FadingIn);
        assert_eq!(fade.rendered(), Some(&"about"));
        assert_eq!(fade.rendered_key(), Some(&RouteKey::new("/about")));

        pump(&mut fade, &mut host, 500);
        assert_eq!(fade.phase(), RoutePhase::Idle);

        let path: Vec<_> = fade.history().get_path().into_iter().copied().collect();
        assert_eq!(
            path,
            vec![
                RoutePhase::Idle,
                RoutePhase::Appearing,
                RoutePhase::Idle,
                RoutePhase::Pausing,
                RoutePhase::FadingIn,
                RoutePhase::Idle,
            ]
        );
    }

    #[test]
    fn rapid_navigation_only_lands_latest() {
        let mut host = ManualHost::new();
        let mut fade = mounted_idle(&mut host);

        navigate(&mut fade, &mut host, "/about", "about");
        pump(&mut fade, &mut host, 300);
        navigate(&mut fade, &mut host, "/contact", "contact");
        assert_eq!(host.pending_timers(), 1);

        pump(&mut fade, &mut host, 300);
        assert_eq!(fade.phase(), RoutePhase::Pausing);
        assert_eq!(fade.rendered(), Some(&"experience"));

        pump(&mut fade, &mut host, 200);
        assert_eq!(fade.rendered(), Some(&"contact"));
        pump(&mut fade, &mut host, 500);
        assert_eq!(fade.phase(), RoutePhase::Idle);
    }

    #[test]
    fn navigation_during_appear_cancels_it() {
        let mut host = ManualHost::new();
        let mut fade = Fade::new(&RouteFadeConfig::default());
        fade.mount(RouteKey::new("/"), "home", Duration::ZERO, &mut host);
        navigate(&mut fade, &mut host, "/about", "about");
        assert_eq!(fade.phase(), RoutePhase::Pausing);
        assert_eq!(host.pending_timers(), 1);
    }

    #[test]
    fn stale_timer_handle_is_ignored() {
        let mut host = ManualHost::new();
        let mut fade = mounted_idle(&mut host);
        navigate(&mut fade, &mut host, "/about", "about");
        assert!(!fade.on_timer(TimerHandle(9999), host.now(), &mut host));
        assert_eq!(fade.phase(), RoutePhase::Pausing);
    }

    #[test]
    fn instant_config_swaps_immediately() {
        let mut host = ManualHost::new();
        let config = RouteFadeConfig {
            hold_ms: 0,
            fade_in_ms: 0,
        };
        let mut fade = Fade::new(&config);
        fade.mount(RouteKey::new("/"), "home", Duration::ZERO, &mut host);
        navigate(&mut fade, &mut host, "/about", "about");
        assert_eq!(fade.phase(), RoutePhase::Idle);
        assert_eq!(fade.rendered(), Some(&"about"));
        assert_eq!(host.timers_set(), 0);
    }

    #[test]
    fn hash_change_mid_hold_lands_the_route() {
        let mut host = ManualHost::new();
        let mut fade = mounted_idle(&mut host);
        navigate(&mut fade, &mut host, "/about", "about");
        navigate(&mut fade, &mut host, "/about#team", "about");
        assert_eq!(fade.phase(), RoutePhase::Idle);
        assert_eq!(fade.rendered(), Some(&"about"));
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn reduced_motion_settles_a_held_navigation() {
        let mut host = ManualHost::new();
        let mut fade = mounted_idle(&mut host);
        navigate(&mut fade, &mut host, "/about", "about");
        let id = fade.transition_id();

        fade.set_reduced_motion(true, host.now(), &mut host);
        assert_eq!(fade.phase(), RoutePhase::Idle);
        assert_eq!(fade.rendered(), Some(&"about"));
        assert_eq!(fade.transition_id(), id);
        assert_eq!(host.pending_timers(), 0);

        // Later navigations swap instantly.
        navigate(&mut fade, &mut host, "/contact", "contact");
        assert_eq!(fade.phase(), RoutePhase::Idle);
        assert_eq!(fade.rendered(), Some(&"contact"));
    }

    #[test]
    fn reduced_motion_cuts_appear_and_fade_short() {
        let mut host = ManualHost::new();
        let mut fade = Fade::new(&RouteFadeConfig::default());
        fade.mount(RouteKey::new("/"), "home", Duration::ZERO, &mut host);
        fade.set_reduced_motion(true, host.now(), &mut host);
        assert_eq!(fade.phase(), RoutePhase::Idle);
        assert_eq!(host.pending_timers(), 0);

        let mut fade = mounted_idle(&mut host);
        navigate(&mut fade, &mut host, "/about", "about");
        pump(&mut fade, &mut host, 500);
        assert_eq!(fade.phase(), RoutePhase::FadingIn);
        fade.set_reduced_motion(true, host.now(), &mut host);
        assert_eq!(fade.phase(), RoutePhase::Idle);
        assert_eq!(fade.rendered(), Some(&"about"));
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn turning_reduced_motion_off_changes_nothing() {
        let mut host = ManualHost::new();
        let mut fade = mounted_idle(&mut host);
        navigate(&mut fade, &mut host, "/about", "about");
        fade.set_reduced_motion(false, host.now(), &mut host);
        assert_eq!(fade.phase(), RoutePhase::Pausing);
        assert_eq!(host.pending_timers(), 1);
    }

    #[test]
    fn teardown_clears_timer() {
        let mut host = ManualHost::new();
        let mut fade = mounted_idle(&mut host);
        navigate(&mut fade, &mut host, "/about", "about");
        fade.teardown(&mut host);
        fade.teardown(&mut host);
        assert_eq!(host.pending_timers(), 0);
    }
}
