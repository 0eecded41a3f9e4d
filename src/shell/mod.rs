//! Imperative shell.
//!
//! [`TransitionShell`] owns the host and every component and routes host
//! events to whichever component holds the handle. Everything stateful lives
//! in the components; the shell only sequences calls between them.

use crate::config::{ConfigError, TransitionConfig};
use crate::host::{Host, HostEvent, Location, ManualHost, Viewport};
use crate::palette::{PaletteCatalog, ThemeTokens, TokenResolver};
use crate::route_fade::{RouteFadeCoordinator, RoutePhase};
use crate::selector::{DotTarget, PaletteSelector, ScaledSizing, SelectOutcome};
use crate::store::{RequestId, TransitionStore};
use crate::wipe::{FrameOutcome, SyncOutcome, WipeRenderer};
use std::time::Duration;

/// What a dispatched host event did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatched {
    Frame(FrameOutcome),
    SelectorTimer,
    RouteFadeTimer,
    /// No component held the handle.
    Unclaimed,
}

/// Wires the catalog, store, wipe renderer, selector and route fade to one
/// host.
pub struct TransitionShell<H: Host, C> {
    host: H,
    catalog: PaletteCatalog,
    store: TransitionStore,
    wipe: WipeRenderer,
    selector: PaletteSelector,
    route_fade: RouteFadeCoordinator<C>,
    location: Location,
    /// Host time of the latest event.
    clock: Duration,
}

impl<H: Host, C> TransitionShell<H, C> {
    /// Like [`TransitionShell::new`], but rejects a configuration that fails
    /// [`TransitionConfig::validate`].
    pub fn try_new(
        host: H,
        config: &TransitionConfig,
        catalog: PaletteCatalog,
        resolver: impl TokenResolver + 'static,
        viewport: Viewport,
        href: &str,
    ) -> Result<Self, ConfigError> {
        let config = config.clone().checked()?;
        Ok(Self::new(host, &config, catalog, resolver, viewport, href))
    }

    /// Build a shell for a page loaded at `href`. The committed theme starts
    /// as the theme of that route, or the first catalog entry.
    ///
    /// `config` is trusted: build it with [`TransitionConfigBuilder`] or
    /// [`TransitionConfig::from_json`], or call [`TransitionShell::try_new`].
    /// Wipe settings are clamped either way.
    ///
    /// [`TransitionConfigBuilder`]: crate::config::TransitionConfigBuilder
    pub fn new(
        host: H,
        config: &TransitionConfig,
        catalog: PaletteCatalog,
        resolver: impl TokenResolver + 'static,
        viewport: Viewport,
        href: &str,
    ) -> Self {
        let location = Location::parse(href);
        let route = location.route_key();
        let initial = catalog
            .entry_for_route(&route)
            .unwrap_or_else(|| catalog.first())
            .tokens
            .clone();

        let mut selector = PaletteSelector::new(&catalog, &config.selector);
        selector.align_to_route(&route);

        Self {
            host,
            store: TransitionStore::new(initial),
            wipe: WipeRenderer::new(&config.wipe, resolver, viewport),
            selector,
            route_fade: RouteFadeCoordinator::new(&config.route_fade),
            catalog,
            location,
            clock: Duration::ZERO,
        }
    }

    /// Show the first screen.
    pub fn mount(&mut self, content: C) {
        let key = self.location.route_key();
        self.route_fade.mount(key, content, self.clock, &mut self.host);
    }

    /// The host reported a new location.
    ///
    /// Re-aligns the selector, requests the route's theme unless it is
    /// already committed or on its way, and hands the content to the route
    /// fade.
    pub fn location_changed(&mut self, href: &str, content: C) -> RoutePhase {
        self.location = Location::parse(href);
        let route = self.location.route_key();
        self.selector.align_to_route(&route);

        let wanted = self
            .catalog
            .entry_for_route(&route)
            .filter(|entry| &entry.tokens != self.store.latest_target())
            .map(|entry| (entry.id.clone(), entry.tokens.clone()));
        if let Some((id, tokens)) = wanted {
            tracing::debug!(entry = %id, "route theme requested");
            self.request_theme(tokens);
        }

        self.route_fade
            .on_location_change(route, content, self.clock, &mut self.host)
    }

    /// Queue a theme change and start (or skip) its wipe.
    pub fn request_theme(&mut self, tokens: ThemeTokens) -> RequestId {
        let request_id = self.store.request_change(tokens);
        self.wipe.sync(&mut self.store, &mut self.host);
        request_id
    }

    pub fn open_selector(&mut self) -> bool {
        self.selector.open(&mut self.host)
    }

    pub fn close_selector(&mut self) {
        self.selector.close(&mut self.host);
    }

    /// Pick the selector entry at `index`.
    pub fn select(&mut self, index: usize) -> SelectOutcome {
        let outcome = self.selector.select(index, &mut self.store, &mut self.host);
        if let SelectOutcome::Selected { .. } = outcome {
            match self.wipe.sync(&mut self.store, &mut self.host) {
                SyncOutcome::Animating(id) => tracing::trace!(request_id = %id, "wipe running"),
                other => tracing::trace!(?other, "wipe sync"),
            }
        }
        outcome
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.wipe.resize(viewport, &mut self.store, &mut self.host);
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.wipe
            .set_reduced_motion(reduced, &mut self.store, &mut self.host);
        self.selector.set_reduced_motion(reduced);
        self.route_fade
            .set_reduced_motion(reduced, self.clock, &mut self.host);
    }

    /// Route one host event to its owner.
    pub fn dispatch(&mut self, event: HostEvent) -> Dispatched {
        self.clock = self.clock.max(event.now());
        match event {
            HostEvent::Frame { handle, now } => Dispatched::Frame(self.wipe.on_frame(
                handle,
                now,
                &mut self.store,
                &mut self.host,
            )),
            HostEvent::Timer { handle, now } => {
                if self.selector.on_timer(handle) {
                    Dispatched::SelectorTimer
                } else if self.route_fade.on_timer(handle, now, &mut self.host) {
                    Dispatched::RouteFadeTimer
                } else {
                    tracing::trace!(%handle, "unclaimed timer");
                    Dispatched::Unclaimed
                }
            }
        }
    }

    /// Cancel every frame and timer and clear the overlay.
    pub fn teardown(&mut self) {
        self.wipe.teardown(&mut self.host);
        self.selector.teardown(&mut self.host);
        self.route_fade.teardown(&mut self.host);
    }

    /// The theme the UI paints with.
    pub fn committed_theme(&self) -> &ThemeTokens {
        self.store.committed()
    }

    pub fn store(&self) -> &TransitionStore {
        &self.store
    }

    pub fn catalog(&self) -> &PaletteCatalog {
        &self.catalog
    }

    pub fn wipe(&self) -> &WipeRenderer {
        &self.wipe
    }

    pub fn selector(&self) -> &PaletteSelector {
        &self.selector
    }

    pub fn selector_layout(&self) -> Vec<DotTarget> {
        self.selector.layout(&self.wipe.viewport())
    }

    pub fn selector_sizing(&self) -> ScaledSizing {
        self.selector.sizing(&self.wipe.viewport())
    }

    pub fn route_fade(&self) -> &RouteFadeCoordinator<C> {
        &self.route_fade
    }

    pub fn route_phase(&self) -> RoutePhase {
        self.route_fade.phase()
    }

    pub fn rendered(&self) -> Option<&C> {
        self.route_fade.rendered()
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<C> TransitionShell<ManualHost, C> {
    /// Step the manual host by `dt` and dispatch everything that fired.
    pub fn advance(&mut self, dt: Duration) -> Vec<Dispatched> {
        self.host
            .advance(dt)
            .into_iter()
            .map(|event| self.dispatch(event))
            .collect()
    }

    /// Advance in `step` increments until `total` has elapsed.
    pub fn run_for(&mut self, total: Duration, step: Duration) -> Vec<Dispatched> {
        let step = step.max(Duration::from_millis(1));
        let mut elapsed = Duration::ZERO;
        let mut dispatched = Vec::new();
        while elapsed < total {
            let dt = step.min(total - elapsed);
            dispatched.extend(self.advance(dt));
            elapsed += dt;
        }
        dispatched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::StaticTokenResolver;

    const FRAME: Duration = Duration::from_millis(16);

    fn shell(href: &str) -> TransitionShell<ManualHost, String> {
        let mut shell = TransitionShell::new(
            ManualHost::new(),
            &TransitionConfig::default(),
            PaletteCatalog::site_default(),
            StaticTokenResolver::site_default(),
            Viewport::new(64.0, 48.0),
            href,
        );
        shell.mount(format!("page:{href}"));
        shell
    }

    #[test]
    fn try_new_rejects_invalid_config() {
        let mut config = TransitionConfig::default();
        config.wipe.band_count = usize::MAX;
        config.selector.open_visible_fraction = 0.0;

        let result: Result<TransitionShell<ManualHost, String>, _> = TransitionShell::try_new(
            ManualHost::new(),
            &config,
            PaletteCatalog::site_default(),
            StaticTokenResolver::site_default(),
            Viewport::new(64.0, 48.0),
            "/",
        );
        match result {
            Err(ConfigError::Invalid(violations)) => assert_eq!(violations.len(), 2),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("Expected the config to be rejected"),
        }
    }

    #[test]
    fn initial_theme_follows_route() {
        let shell = shell("/projects");
        assert_eq!(shell.committed_theme().page.as_str(), "bg-chrtr");
        assert_eq!(shell.selector().items()[0].id, "projects");

        let unknown = self::shell("/nowhere");
        assert_eq!(unknown.committed_theme().page.as_str(), "bg-ashbl");
    }

    #[test]
    fn location_change_requests_route_theme_once() {
        let mut shell = shell("/");
        shell.location_changed("/contact", "contact".into());
        assert_eq!(shell.store().active_request(), Some(RequestId(1)));

        // Same target again: no new request.
        shell.location_changed("/contact#form", "contact".into());
        assert_eq!(shell.store().active_request(), Some(RequestId(1)));

        shell.run_for(Duration::from_millis(1400), FRAME);
        assert_eq!(shell.committed_theme().page.as_str(), "bg-ghost");
    }

    #[test]
    fn selection_then_navigation_does_not_double_request() {
        let mut shell = shell("/");
        assert!(shell.open_selector());
        shell.advance(Duration::from_millis(500));

        let outcome = shell.select(1);
        let SelectOutcome::Selected { request_id, entry } = outcome else {
            panic!("Expected selection, got {outcome:?}");
        };
        assert_eq!(entry.id, "about");
        assert_eq!(shell.host().navigations(), ["/about"]);

        shell.location_changed("/about", "about".into());
        assert_eq!(shell.store().active_request(), Some(request_id));
        assert_eq!(shell.route_phase(), RoutePhase::Pausing);
    }

    #[test]
    fn unclaimed_timer_is_reported() {
        let mut shell = shell("/");
        let event = HostEvent::Timer {
            handle: crate::host::TimerHandle(4242),
            now: Duration::from_millis(1),
        };
        assert_eq!(shell.dispatch(event), Dispatched::Unclaimed);
    }

    #[test]
    fn teardown_leaves_nothing_scheduled() {
        let mut shell = shell("/");
        shell.advance(Duration::from_millis(1000));
        shell.open_selector();
        shell.location_changed("/services", "services".into());
        assert!(shell.host().pending_frames() + shell.host().pending_timers() > 0);

        shell.teardown();
        assert_eq!(shell.host().pending_frames(), 0);
        assert_eq!(shell.host().pending_timers(), 0);
        assert!(shell.wipe().overlay().unwrap().is_clear());
    }
}
