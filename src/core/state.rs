//! Core `State` trait for coordinator phases.
//!
//! Phase enums implement this trait so they can be named in logs and
//! recorded in a [`StateHistory`](super::StateHistory).

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for coordinator phases.
///
/// All methods are pure. A phase is a plain value describing where a
/// coordinator currently is.
///
/// # Example
///
/// ```rust
/// use themewipe::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Door {
///     Closed,
///     Opening,
///     Open,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Closed => "Closed",
///             Self::Opening => "Opening",
///             Self::Open => "Open",
///         }
///     }
///
///     fn is_settled(&self) -> bool {
///         !matches!(self, Self::Opening)
///     }
/// }
///
/// assert!(Door::Open.is_settled());
/// assert!(!Door::Opening.is_settled());
/// ```
pub trait State: Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> {
    /// Name used for display and logging.
    fn name(&self) -> &str;

    /// Whether the phase is at rest, i.e. no timer or animation is
    /// expected to move it on its own.
    ///
    /// Default implementation returns `false`.
    fn is_settled(&self) -> bool {
        false
    }
}
