//! Palette selector state.
//!
//! Tracks the entry order, whether the board is open, and the two windows
//! during which selections are ignored: the open guard right after opening
//! and the cool-down after a selection. Both are host timeouts whose handles
//! the selector owns.

pub mod layout;

pub use layout::{
    closed_ring_target, layout_targets, open_arc_target, stagger_delay, ArcGroup, DotTarget,
    Position, ScaledSizing,
};

use crate::config::SelectorConfig;
use crate::host::{RouteKey, Router, TimerHandle, TimerHost, Viewport};
use crate::palette::{PaletteCatalog, ThemeEntry};
use crate::store::{RequestId, TransitionStore};

/// Why a selection did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    Closed,
    OpenGuard,
    CoolingDown,
    OutOfRange,
}

/// Result of [`PaletteSelector::select`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    Ignored(IgnoreReason),
    /// The current entry was picked; the board closed.
    Closed,
    /// A new entry was picked: theme requested, navigation issued.
    Selected {
        request_id: RequestId,
        entry: ThemeEntry,
    },
}

/// Palette selector model.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use themewipe::config::SelectorConfig;
/// use themewipe::host::ManualHost;
/// use themewipe::palette::{Contrast, PaletteCatalog, ThemeTokens};
/// use themewipe::selector::{PaletteSelector, SelectOutcome};
/// use themewipe::store::TransitionStore;
///
/// let mut host = ManualHost::new();
/// let mut store = TransitionStore::new(ThemeTokens::derive("ashbl", Contrast::Light));
/// let mut selector =
///     PaletteSelector::new(&PaletteCatalog::site_default(), &SelectorConfig::default());
///
/// assert!(selector.open(&mut host));
/// for event in host.advance(Duration::from_millis(500)) {
///     if let themewipe::host::HostEvent::Timer { handle, .. } = event {
///         selector.on_timer(handle);
///     }
/// }
///
/// let outcome = selector.select(1, &mut store, &mut host);
/// assert!(matches!(outcome, SelectOutcome::Selected { .. }));
/// assert_eq!(selector.items()[0].id, "about");
/// assert_eq!(host.navigations(), ["/about"]);
/// ```
#[derive(Clone, Debug)]
pub struct PaletteSelector {
    config: SelectorConfig,
    items: Vec<ThemeEntry>,
    open: bool,
    reduced_motion: bool,
    guard_timer: Option<TimerHandle>,
    cooldown_timer: Option<TimerHandle>,
}

impl PaletteSelector {
    pub fn new(catalog: &PaletteCatalog, config: &SelectorConfig) -> Self {
        Self {
            config: config.clone(),
            items: catalog.entries().to_vec(),
            open: false,
            reduced_motion: false,
            guard_timer: None,
            cooldown_timer: None,
        }
    }

    /// Entries in display order; the first is the current theme.
    pub fn items(&self) -> &[ThemeEntry] {
        &self.items
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Inside the open guard.
    pub fn is_guarded(&self) -> bool {
        self.guard_timer.is_some()
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown_timer.is_some()
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// Open the board. Refused while already open or cooling down.
    pub fn open(&mut self, timers: &mut dyn TimerHost) -> bool {
        if self.open || self.is_cooling_down() {
            return false;
        }
        self.open = true;
        if !self.config.open_guard().is_zero() {
            self.guard_timer = Some(timers.set_timeout(self.config.open_guard()));
        }
        tracing::debug!("palette selector opened");
        true
    }

    pub fn close(&mut self, timers: &mut dyn TimerHost) {
        if let Some(handle) = self.guard_timer.take() {
            timers.clear_timeout(handle);
        }
        if self.open {
            self.open = false;
            tracing::debug!("palette selector closed");
        }
    }

    /// Pick the entry currently at `index`.
    ///
    /// A non-first entry moves to the front, its tokens are requested from
    /// the store, the router navigates to its route and the cool-down
    /// starts. Picking the first entry only closes the board.
    pub fn select<H>(
        &mut self,
        index: usize,
        store: &mut TransitionStore,
        host: &mut H,
    ) -> SelectOutcome
    where
        H: TimerHost + Router,
    {
        let reason = if !self.open {
            Some(IgnoreReason::Closed)
        } else if self.is_guarded() {
            Some(IgnoreReason::OpenGuard)
        } else if self.is_cooling_down() {
            Some(IgnoreReason::CoolingDown)
        } else if index >= self.items.len() {
            Some(IgnoreReason::OutOfRange)
        } else {
            None
        };
        if let Some(reason) = reason {
            tracing::trace!(index, ?reason, "selection ignored");
            return SelectOutcome::Ignored(reason);
        }

        if index == 0 {
            self.close(host);
            return SelectOutcome::Closed;
        }

        let entry = self.items.remove(index);
        self.items.insert(0, entry.clone());

        let request_id = store.request_change(entry.tokens.clone());
        self.start_cooldown(host);
        host.navigate(entry.route.as_str());
        self.close(host);

        tracing::debug!(entry = %entry.id, request_id = %request_id, "palette entry selected");
        SelectOutcome::Selected { request_id, entry }
    }

    fn start_cooldown(&mut self, timers: &mut dyn TimerHost) {
        if let Some(handle) = self.cooldown_timer.take() {
            timers.clear_timeout(handle);
        }
        if !self.config.cooldown().is_zero() {
            self.cooldown_timer = Some(timers.set_timeout(self.config.cooldown()));
        }
    }

    /// Move the entry owning `route` to the front. Returns whether the order
    /// changed.
    pub fn align_to_route(&mut self, route: &RouteKey) -> bool {
        let section = route.section();
        match self.items.iter().position(|e| e.route.section() == section) {
            Some(index) if index > 0 => {
                let entry = self.items.remove(index);
                tracing::trace!(entry = %entry.id, "selector aligned to route");
                self.items.insert(0, entry);
                true
            }
            _ => false,
        }
    }

    /// Handle a fired timeout. Returns whether the handle was one of ours.
    pub fn on_timer(&mut self, handle: TimerHandle) -> bool {
        if self.guard_timer == Some(handle) {
            self.guard_timer = None;
            true
        } else if self.cooldown_timer == Some(handle) {
            self.cooldown_timer = None;
            tracing::trace!("selection cool-down over");
            true
        } else {
            false
        }
    }

    /// Cancel every pending timeout. Safe to call repeatedly.
    pub fn clear_timers(&mut self, timers: &mut dyn TimerHost) {
        for handle in [self.guard_timer.take(), self.cooldown_timer.take()]
            .into_iter()
            .flatten()
        {
            timers.clear_timeout(handle);
        }
    }

    pub fn teardown(&mut self, timers: &mut dyn TimerHost) {
        self.clear_timers(timers);
        self.open = false;
    }

    /// Dot targets for the current order and board state.
    pub fn layout(&self, viewport: &Viewport) -> Vec<DotTarget> {
        let sizing = ScaledSizing::for_viewport(viewport, &self.config);
        layout_targets(self.items.len(), self.open, &sizing, self.reduced_motion)
    }

    pub fn sizing(&self, viewport: &Viewport) -> ScaledSizing {
        ScaledSizing::for_viewport(viewport, &self.config)
    }
}
