//! Banded wipe renderer.
//!
//! The renderer watches the store's pending change. When one appears it
//! resolves the new page color, then on every host frame redraws the band
//! mask and composites the color through it onto the overlay. When the sweep
//! reaches 100% it commits the request and clears the overlay.
//!
//! Each frame re-checks the store: if the request it is animating is no
//! longer pending, it stops without committing. Whenever animation is not
//! possible (reduced motion, no surface, color unresolved) the change is
//! committed on the spot and no frame is scheduled.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use themewipe::config::WipeConfig;
//! use themewipe::host::{HostEvent, ManualHost, Viewport};
//! use themewipe::palette::{Contrast, StaticTokenResolver, ThemeTokens};
//! use themewipe::store::TransitionStore;
//! use themewipe::wipe::{FrameOutcome, WipeRenderer};
//!
//! let mut host = ManualHost::new();
//! let mut store = TransitionStore::new(ThemeTokens::derive("ashbl", Contrast::Light));
//! let mut wipe = WipeRenderer::new(
//!     &WipeConfig::default(),
//!     StaticTokenResolver::site_default(),
//!     Viewport::new(64.0, 48.0),
//! );
//!
//! let id = store.request_change(ThemeTokens::derive("roylp", Contrast::Light));
//! wipe.sync(&mut store, &mut host);
//!
//! let mut outcome = FrameOutcome::Ignored;
//! while outcome != FrameOutcome::Committed(id) {
//!     for event in host.advance(Duration::from_millis(16)) {
//!         if let HostEvent::Frame { handle, now } = event {
//!             outcome = wipe.on_frame(handle, now, &mut store, &mut host);
//!         }
//!     }
//! }
//! assert_eq!(store.committed().page.as_str(), "bg-roylp");
//! assert!(wipe.overlay().unwrap().is_clear());
//! ```

mod bands;
mod easing;
mod surface;

pub use bands::{
    band_progress, band_stroke, AnimationFrameState, BandLayout, BandStroke, Point, SweepDirection,
};
pub use easing::CubicBezier;
pub use surface::{Surface, SurfaceError, MAX_SURFACE_PIXELS};

use crate::config::WipeConfig;
use crate::host::{FrameHandle, FrameScheduler, Viewport};
use crate::palette::{Rgba, TokenResolver};
use crate::store::{CommitOutcome, RequestId, TransitionStore};
use std::time::Duration;

/// Result of [`WipeRenderer::sync`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing pending, nothing running.
    Idle,
    /// Already animating the pending request.
    Unchanged,
    /// A sweep for this request started; frames are scheduled.
    Animating(RequestId),
    /// The request was committed without animation.
    CommittedInstantly(RequestId),
}

/// Result of [`WipeRenderer::on_frame`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The handle is not the one the renderer is waiting on.
    Ignored,
    /// A frame was drawn and the next one requested.
    Continuing,
    /// The request this sweep served is no longer pending; it stopped.
    Abandoned(RequestId),
    /// The sweep finished and its request was committed.
    Committed(RequestId),
}

/// Why a change skipped the animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InstantReason {
    ReducedMotion,
    NoSurface,
    Unresolved,
}

impl InstantReason {
    fn as_str(&self) -> &'static str {
        match self {
            Self::ReducedMotion => "reduced motion",
            Self::NoSurface => "surface unavailable",
            Self::Unresolved => "color unresolved",
        }
    }
}

#[derive(Clone, Debug)]
struct ActiveWipe {
    request_id: RequestId,
    color: Rgba,
    /// Host time of the first frame; progress counts from here.
    started_at: Option<Duration>,
    frame: FrameHandle,
}

#[derive(Clone, Debug)]
struct Surfaces {
    mask: Surface,
    overlay: Surface,
}

impl Surfaces {
    fn for_viewport(viewport: &Viewport, dpr_cap: f64) -> Result<Self, SurfaceError> {
        let scale = viewport.capped_pixel_ratio(dpr_cap);
        Ok(Self {
            mask: Surface::new(viewport.width, viewport.height, scale)?,
            overlay: Surface::new(viewport.width, viewport.height, scale)?,
        })
    }
}

/// Drives one banded sweep at a time.
pub struct WipeRenderer {
    config: WipeConfig,
    easing: CubicBezier,
    resolver: Box<dyn TokenResolver>,
    viewport: Viewport,
    surfaces: Option<Surfaces>,
    reduced_motion: bool,
    active: Option<ActiveWipe>,
    frame_state: Option<AnimationFrameState>,
}

impl WipeRenderer {
    /// Out-of-range settings are clamped, see [`WipeConfig::clamped`].
    pub fn new(
        config: &WipeConfig,
        resolver: impl TokenResolver + 'static,
        viewport: Viewport,
    ) -> Self {
        let config = config.clamped();
        let mut renderer = Self {
            easing: CubicBezier::from_points(config.easing),
            config,
            resolver: Box::new(resolver),
            viewport,
            surfaces: None,
            reduced_motion: false,
            active: None,
            frame_state: None,
        };
        renderer.rebuild_surfaces();
        renderer
    }

    fn rebuild_surfaces(&mut self) {
        self.surfaces = match Surfaces::for_viewport(&self.viewport, self.config.dpr_cap) {
            Ok(surfaces) => Some(surfaces),
            Err(err) => {
                tracing::warn!(error = %err, "wipe surface unavailable");
                None
            }
        };
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Request id of the running sweep.
    pub fn active_request(&self) -> Option<RequestId> {
        self.active.as_ref().map(|a| a.request_id)
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Progress of the last drawn frame.
    pub fn frame_state(&self) -> Option<&AnimationFrameState> {
        self.frame_state.as_ref()
    }

    /// The visible overlay, `None` when no surface could be created.
    pub fn overlay(&self) -> Option<&Surface> {
        self.surfaces.as_ref().map(|s| &s.overlay)
    }

    /// Bring the renderer in line with the store's pending change: start a
    /// sweep for a new request, stop one whose request went away.
    pub fn sync(
        &mut self,
        store: &mut TransitionStore,
        frames: &mut dyn FrameScheduler,
    ) -> SyncOutcome {
        let Some(pending) = store.pending() else {
            if let Some(active) = self.active.take() {
                self.stop(active, frames);
            }
            return SyncOutcome::Idle;
        };
        let request_id = pending.request_id;

        if let Some(active) = self.active.take() {
            if active.request_id == request_id {
                self.active = Some(active);
                return SyncOutcome::Unchanged;
            }
            tracing::debug!(
                abandoned = %active.request_id,
                request_id = %request_id,
                "wipe superseded"
            );
            self.stop(active, frames);
        }

        let color = match self.resolver.resolve(&pending.tokens.page) {
            Ok(color) => color,
            Err(err) => {
                tracing::warn!(request_id = %request_id, error = %err, "page color unresolved");
                return self.commit_instantly(request_id, InstantReason::Unresolved, store);
            }
        };
        if self.reduced_motion {
            return self.commit_instantly(request_id, InstantReason::ReducedMotion, store);
        }
        if self.surfaces.is_none() {
            return self.commit_instantly(request_id, InstantReason::NoSurface, store);
        }

        tracing::debug!(request_id = %request_id, color = %color, "wipe started");
        let start = self.start_state();
        self.draw(&start, color);
        self.active = Some(ActiveWipe {
            request_id,
            color,
            started_at: None,
            frame: frames.request_frame(),
        });
        SyncOutcome::Animating(request_id)
    }

    /// Advance the sweep for a host frame.
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        now: Duration,
        store: &mut TransitionStore,
        frames: &mut dyn FrameScheduler,
    ) -> FrameOutcome {
        let Some(mut active) = self.active.take() else {
            return FrameOutcome::Ignored;
        };
        if active.frame != handle {
            self.active = Some(active);
            return FrameOutcome::Ignored;
        }

        if store.active_request() != Some(active.request_id) {
            tracing::debug!(request_id = %active.request_id, "wipe abandoned");
            let request_id = active.request_id;
            self.stop(active, frames);
            return FrameOutcome::Abandoned(request_id);
        }

        let started = *active.started_at.get_or_insert(now);
        let elapsed = now.saturating_sub(started);
        let t = elapsed.as_secs_f64() / self.config.duration().as_secs_f64();

        if t >= 1.0 {
            let request_id = active.request_id;
            self.draw(&AnimationFrameState::complete(self.config.band_count), active.color);
            let outcome = store.commit(request_id);
            tracing::debug!(request_id = %request_id, ?outcome, "wipe finished");
            self.clear_overlay();
            return FrameOutcome::Committed(request_id);
        }

        let state = AnimationFrameState::at(t, &self.easing, self.config.band_count);
        tracing::trace!(
            request_id = %active.request_id,
            t,
            revealed = state.revealed_bands(),
            "wipe frame"
        );
        self.draw(&state, active.color);
        active.frame = frames.request_frame();
        self.active = Some(active);
        FrameOutcome::Continuing
    }

    /// Adopt a new viewport. A running sweep restarts from progress 0 at the
    /// new size; if the new size has no usable surface the change commits.
    pub fn resize(
        &mut self,
        viewport: Viewport,
        store: &mut TransitionStore,
        frames: &mut dyn FrameScheduler,
    ) {
        self.viewport = viewport;
        self.rebuild_surfaces();

        let Some(mut active) = self.active.take() else {
            return;
        };
        frames.cancel_frame(active.frame);

        if self.surfaces.is_none() {
            let request_id = active.request_id;
            self.commit_instantly(request_id, InstantReason::NoSurface, store);
            return;
        }

        tracing::debug!(
            request_id = %active.request_id,
            width = viewport.width,
            height = viewport.height,
            "wipe restarted after resize"
        );
        let start = self.start_state();
        self.draw(&start, active.color);
        active.started_at = None;
        active.frame = frames.request_frame();
        self.active = Some(active);
    }

    /// Switch reduced motion. Turning it on finishes a running sweep at once.
    pub fn set_reduced_motion(
        &mut self,
        reduced: bool,
        store: &mut TransitionStore,
        frames: &mut dyn FrameScheduler,
    ) {
        self.reduced_motion = reduced;
        if !reduced {
            return;
        }
        if let Some(active) = self.active.take() {
            let request_id = active.request_id;
            self.stop(active, frames);
            self.commit_instantly(request_id, InstantReason::ReducedMotion, store);
        }
    }

    /// Cancel the outstanding frame and clear the overlay.
    pub fn teardown(&mut self, frames: &mut dyn FrameScheduler) {
        if let Some(active) = self.active.take() {
            self.stop(active, frames);
        }
    }

    fn stop(&mut self, active: ActiveWipe, frames: &mut dyn FrameScheduler) {
        frames.cancel_frame(active.frame);
        self.clear_overlay();
    }

    fn commit_instantly(
        &mut self,
        request_id: RequestId,
        reason: InstantReason,
        store: &mut TransitionStore,
    ) -> SyncOutcome {
        let outcome = store.commit(request_id);
        if outcome == CommitOutcome::Committed {
            tracing::debug!(
                request_id = %request_id,
                reason = reason.as_str(),
                "theme committed without wipe"
            );
        }
        self.frame_state = Some(AnimationFrameState::complete(self.config.band_count));
        self.clear_overlay();
        SyncOutcome::CommittedInstantly(request_id)
    }

    fn start_state(&self) -> AnimationFrameState {
        AnimationFrameState::at(0.0, &self.easing, self.config.band_count)
    }

    fn clear_overlay(&mut self) {
        if let Some(surfaces) = self.surfaces.as_mut() {
            surfaces.mask.clear();
            surfaces.overlay.clear();
        }
    }

    /// Redraw the mask for `state` and composite `color` through it.
    fn draw(&mut self, state: &AnimationFrameState, color: Rgba) {
        let (width, height) = (self.viewport.width, self.viewport.height);
        let count = self.config.band_count;
        if let Some(Surfaces { mask, overlay }) = self.surfaces.as_mut() {
            mask.clear();
            for (index, &p) in state.bands.iter().enumerate() {
                if let Some(stroke) = band_stroke(index, count, p, width, height) {
                    mask.stroke_capsule(stroke.start, stroke.end, stroke.thickness);
                }
            }
            overlay.fill(color);
            overlay.keep_where(mask);
        }
        self.frame_state = Some(state.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_BAND_COUNT;
    use crate::host::ManualHost;
    use crate::palette::{ColorToken, Contrast, ResolveError, StaticTokenResolver, ThemeTokens};

    const STEP: Duration = Duration::from_millis(16);

    fn store() -> TransitionStore {
        TransitionStore::new(ThemeTokens::derive("ashbl", Contrast::Light))
    }

    fn renderer(viewport: Viewport) -> WipeRenderer {
        WipeRenderer::new(&WipeConfig::default(), StaticTokenResolver::site_default(), viewport)
    }

    fn about() -> ThemeTokens {
        ThemeTokens::derive("roylp", Contrast::Light)
    }

    /// Step the host once and feed every frame event to the renderer.
    fn pump(
        wipe: &mut WipeRenderer,
        store: &mut TransitionStore,
        host: &mut ManualHost,
        dt: Duration,
    ) -> Vec<FrameOutcome> {
        host.advance(dt)
            .into_iter()
            .filter_map(|event| match event {
                crate::host::HostEvent::Frame { handle, now } => {
                    Some(wipe.on_frame(handle, now, store, host))
                }
                crate::host::HostEvent::Timer { .. } => None,
            })
            .collect()
    }

    #[test]
    fn sweep_commits_after_duration() {
        let mut host = ManualHost::new();
        let mut store = store();
        let mut wipe = renderer(Viewport::new(80.0, 60.0));

        let id = store.request_change(about());
        assert_eq!(wipe.sync(&mut store, &mut host), SyncOutcome::Animating(id));
        assert_eq!(host.pending_frames(), 1);

        // First frame pins the start time.
        assert_eq!(pump(&mut wipe, &mut store, &mut host, STEP), vec![FrameOutcome::Continuing]);
        pump(&mut wipe, &mut store, &mut host, Duration::from_millis(650));
        let midway = wipe.frame_state().unwrap().clone();
        assert!(midway.eased > 0.0 && midway.eased < 1.0);
        assert!(!wipe.overlay().unwrap().is_clear());
        assert_eq!(store.committed().page.as_str(), "bg-ashbl");

        let outcomes = pump(&mut wipe, &mut store, &mut host, Duration::from_millis(650));
        assert_eq!(outcomes, vec![FrameOutcome::Committed(id)]);
        assert_eq!(store.committed(), &about());
        assert!(wipe.overlay().unwrap().is_clear());
        assert_eq!(host.pending_frames(), 0);
        assert!(!wipe.is_animating());
    }

    #[test]
    fn reduced_motion_commits_without_frames() {
        let mut host = ManualHost::new();
        let mut store = store();
        let mut wipe = renderer(Viewport::new(80.0, 60.0));
        wipe.set_reduced_motion(true, &mut store, &mut host);

        let id = store.request_change(about());
        assert_eq!(wipe.sync(&mut store, &mut host), SyncOutcome::CommittedInstantly(id));
        assert_eq!(store.committed(), &about());
        assert_eq!(host.frames_requested(), 0);
    }

    #[test]
    fn zero_area_viewport_commits_instantly() {
        let mut host = ManualHost::new();
        let mut store = store();
        let mut wipe = renderer(Viewport::new(0.0, 600.0));
        assert!(wipe.overlay().is_none());

        let id = store.request_change(about());
        assert_eq!(wipe.sync(&mut store, &mut host), SyncOutcome::CommittedInstantly(id));
        assert_eq!(host.frames_requested(), 0);
    }

    #[test]
    fn unresolved_color_commits_instantly() {
        let mut host = ManualHost::new();
        let mut store = store();
        let failing = |token: &ColorToken| -> Result<Rgba, ResolveError> {
            Err(ResolveError::UnknownToken(token.to_string()))
        };
        let mut wipe =
            WipeRenderer::new(&WipeConfig::default(), failing, Viewport::new(80.0, 60.0));

        let id = store.request_change(about());
        assert_eq!(wipe.sync(&mut store, &mut host), SyncOutcome::CommittedInstantly(id));
        assert_eq!(store.committed(), &about());
        assert_eq!(host.frames_requested(), 0);
    }

    #[test]
    fn superseded_sweep_never_commits_old_request() {
        let mut host = ManualHost::new();
        let mut store = store();
        let mut wipe = renderer(Viewport::new(80.0, 60.0));

        let first = store.request_change(about());
        wipe.sync(&mut store, &mut host);
        pump(&mut wipe, &mut store, &mut host, STEP);

        let second = store.request_change(ThemeTokens::derive("palbr", Contrast::Light));
        assert_eq!(wipe.sync(&mut store, &mut host), SyncOutcome::Animating(second));
        assert_eq!(host.pending_frames(), 1);

        let mut outcomes = Vec::new();
        for _ in 0..100 {
            outcomes.extend(pump(&mut wipe, &mut store, &mut host, STEP));
        }
        assert!(!outcomes.contains(&FrameOutcome::Committed(first)));
        assert!(outcomes.contains(&FrameOutcome::Committed(second)));
        assert_eq!(store.committed().page.as_str(), "bg-palbr");
    }

    #[test]
    fn frame_for_a_request_no_longer_pending_is_abandoned() {
        let mut host = ManualHost::new();
        let mut store = store();
        let mut wipe = renderer(Viewport::new(80.0, 60.0));

        let id = store.request_change(about());
        wipe.sync(&mut store, &mut host);
        // Someone else commits it out from under the sweep.
        store.commit(id);

        assert_eq!(
            pump(&mut wipe, &mut store, &mut host, STEP),
            vec![FrameOutcome::Abandoned(id)]
        );
        assert!(wipe.overlay().unwrap().is_clear());
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn stale_frame_handle_is_ignored() {
        let mut host = ManualHost::new();
        let mut store = store();
        let mut wipe = renderer(Viewport::new(80.0, 60.0));

        store.request_change(about());
        wipe.sync(&mut store, &mut host);
        assert_eq!(
            wipe.on_frame(FrameHandle(999), Duration::ZERO, &mut store, &mut host),
            FrameOutcome::Ignored
        );
        assert!(wipe.is_animating());
    }

    #[test]
    fn resize_restarts_progress() {
        let mut host = ManualHost::new();
        let mut store = store();
        let mut wipe = renderer(Viewport::new(80.0, 60.0));

        let id = store.request_change(about());
        wipe.sync(&mut store, &mut host);
        pump(&mut wipe, &mut store, &mut host, STEP);
        pump(&mut wipe, &mut store, &mut host, Duration::from_millis(800));
        assert!(wipe.frame_state().unwrap().t > 0.5);

        wipe.resize(Viewport::new(60.0, 80.0), &mut store, &mut host);
        assert_eq!(wipe.frame_state().unwrap().t, 0.0);
        assert_eq!(wipe.active_request(), Some(id));
        assert_eq!(host.pending_frames(), 1);

        pump(&mut wipe, &mut store, &mut host, STEP);
        let outcomes = pump(&mut wipe, &mut store, &mut host, Duration::from_millis(800));
        assert_eq!(outcomes, vec![FrameOutcome::Continuing]);
        assert!(store.is_transitioning());
    }

    #[test]
    fn resize_to_nothing_commits() {
        let mut host = ManualHost::new();
        let mut store = store();
        let mut wipe = renderer(Viewport::new(80.0, 60.0));

        store.request_change(about());
        wipe.sync(&mut store, &mut host);
        wipe.resize(Viewport::new(80.0, 0.0), &mut store, &mut host);

        assert_eq!(store.committed(), &about());
        assert_eq!(host.pending_frames(), 0);
        assert!(!wipe.is_animating());
    }

    #[test]
    fn complete_frame_covers_every_pixel() {
        let viewports = [
            Viewport::new(64.0, 48.0),
            Viewport::new(1.0, 800.0).with_device_pixel_ratio(2.0),
            Viewport::new(1280.0, 720.0),
            Viewport::new(390.0, 844.0).with_device_pixel_ratio(3.0),
            Viewport::new(10.0, 10.0),
            Viewport::new(300.0, 7.0).with_device_pixel_ratio(1.5),
        ];
        let color = Rgba::opaque(0x78, 0x51, 0xA9);

        for band_count in [1, 8, 24] {
            let config = WipeConfig {
                band_count,
                ..WipeConfig::default()
            };
            for viewport in viewports {
                let mut wipe =
                    WipeRenderer::new(&config, StaticTokenResolver::site_default(), viewport);
                wipe.draw(&AnimationFrameState::complete(band_count), color);

                let overlay = wipe.overlay().unwrap();
                assert_eq!(
                    overlay.coverage(),
                    1.0,
                    "{band_count} bands over {}x{} @{}",
                    viewport.width,
                    viewport.height,
                    viewport.device_pixel_ratio
                );
                assert_eq!(overlay.pixel(0, 0), Some(color));
            }
        }
    }

    #[test]
    fn unchecked_band_count_is_clamped() {
        let config = WipeConfig {
            band_count: usize::MAX,
            ..WipeConfig::default()
        };
        let viewport = Viewport::new(8.0, 8.0);
        let mut wipe = WipeRenderer::new(&config, StaticTokenResolver::site_default(), viewport);
        let mut store = store();
        let mut host = ManualHost::new();

        store.request_change(about());
        wipe.sync(&mut store, &mut host);
        pump(&mut wipe, &mut store, &mut host, STEP);
        assert_eq!(wipe.frame_state().unwrap().bands.len(), MAX_BAND_COUNT);
    }

    #[test]
    fn pixel_ratio_is_capped_for_surfaces() {
        let wipe = renderer(Viewport::new(50.0, 40.0).with_device_pixel_ratio(3.0));
        let overlay = wipe.overlay().unwrap();
        assert_eq!((overlay.width(), overlay.height()), (100, 80));
    }

    #[test]
    fn teardown_cancels_frame_and_clears_overlay() {
        let mut host = ManualHost::new();
        let mut store = store();
        let mut wipe = renderer(Viewport::new(80.0, 60.0));

        store.request_change(about());
        wipe.sync(&mut store, &mut host);
        pump(&mut wipe, &mut store, &mut host, STEP);
        pump(&mut wipe, &mut store, &mut host, Duration::from_millis(500));

        wipe.teardown(&mut host);
        assert_eq!(host.pending_frames(), 0);
        assert!(wipe.overlay().unwrap().is_clear());
        assert!(!wipe.is_animating());
    }
}
