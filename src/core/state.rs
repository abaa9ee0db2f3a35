//! State trait for entity state values.
//!
//! A state is an opaque, comparable token. The engine never orders states;
//! it only compares them for equality and hashes them as transition keys.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for the state values an entity moves between.
///
/// # Required Traits
///
/// - `Clone`: current states are copied out of the entity for lookups
/// - `Eq` + `Hash`: states are keys of the transition and callback tables
/// - `Debug`: states are debuggable for diagnostics
/// - `Serialize` + `Deserialize`: states can be exported alongside metrics
///
/// # Example
///
/// ```rust
/// use lockstep::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum SessionState {
///     Idle,
///     Active,
///     Closed,
/// }
///
/// impl State for SessionState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Active => "Active",
///             Self::Closed => "Closed",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Closed)
///     }
/// }
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// The engine does not stop dispatching in final states; this is a hint
    /// for callers deciding when to discard an entity.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}
