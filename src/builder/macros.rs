//! Macros for declaring states and event kinds.

/// Generate a `State` implementation for a simple enum.
///
/// # Example
///
/// ```
/// use lockstep::state_enum;
/// use lockstep::core::State;
///
/// state_enum! {
///     pub enum SessionState {
///         Idle,
///         Active,
///         Closed,
///     }
///     final: [Closed]
/// }
///
/// assert_eq!(SessionState::Active.name(), "Active");
/// assert!(SessionState::Closed.is_final());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }
        }
    };
}

/// Generate an `EventKind` implementation for a simple enum.
///
/// # Example
///
/// ```
/// use lockstep::event_enum;
/// use lockstep::core::EventKind;
///
/// event_enum! {
///     pub enum SessionEvent {
///         Start,
///         Stop,
///         Ping,
///     }
/// }
///
/// assert_eq!(SessionEvent::Ping.name(), "Ping");
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::EventKind for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
