//! Themewipe: theme transitions for a single-page site
//!
//! Themewipe keeps a site's color theme and routed content in step during
//! navigation. A theme change is requested, revealed by a banded wipe, and
//! only then committed; routed content is held briefly and faded in.
//!
//! The crate is headless. Everything that touches the outside world (frame
//! callbacks, timeouts, navigation) goes through the traits in [`host`], and
//! every component reacts to the events the host feeds back.
//!
//! # Core Concepts
//!
//! - **Store**: One committed theme, at most one pending change, commits
//!   arbitrated by monotonically increasing request ids
//! - **Wipe**: Eased, herringbone band sweep that commits its request at 100%
//! - **Selector**: Ordered palette board with open guard and cool-down
//! - **Route fade**: Hold, swap and fade-in phases keyed by transition id
//! - **Shell**: Wires all of the above to one host
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use themewipe::config::TransitionConfig;
//! use themewipe::host::{ManualHost, Viewport};
//! use themewipe::palette::{PaletteCatalog, StaticTokenResolver};
//! use themewipe::shell::TransitionShell;
//!
//! let mut shell = TransitionShell::new(
//!     ManualHost::new(),
//!     &TransitionConfig::default(),
//!     PaletteCatalog::site_default(),
//!     StaticTokenResolver::site_default(),
//!     Viewport::new(96.0, 64.0),
//!     "/",
//! );
//! shell.mount("home");
//!
//! shell.location_changed("/about", "about");
//! assert_eq!(shell.committed_theme().page.as_str(), "bg-ashbl");
//!
//! shell.run_for(Duration::from_millis(1400), Duration::from_millis(16));
//! assert_eq!(shell.committed_theme().page.as_str(), "bg-roylp");
//! assert_eq!(shell.rendered(), Some(&"about"));
//! ```

mod macros;

pub mod config;
pub mod core;
pub mod host;
pub mod palette;
pub mod route_fade;
pub mod selector;
pub mod shell;
pub mod store;
pub mod wipe;

// Re-export commonly used types
pub use config::{TransitionConfig, TransitionConfigBuilder};
pub use core::{State, StateHistory};
pub use palette::{PaletteCatalog, ThemeTokens};
pub use route_fade::RoutePhase;
pub use shell::TransitionShell;
pub use store::{RequestId, TransitionStore};
