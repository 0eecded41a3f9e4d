//! Macros for declaring phase enums.

/// Declare a fieldless phase enum and implement [`State`](crate::core::State) for it.
///
/// Variants listed under `settled:` report `is_settled() == true`.
///
/// # Example
///
/// ```
/// use themewipe::state_enum;
/// use themewipe::core::State;
///
/// state_enum! {
///     pub enum Blink {
///         Shown,
///         Hiding,
///         Hidden,
///     }
///     settled: [Shown, Hidden]
/// }
///
/// assert_eq!(Blink::Hiding.name(), "Hiding");
/// assert!(Blink::Hidden.is_settled());
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

        $(settled: [$($settled:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
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

            fn is_settled(&self) -> bool {
                match self {
                    $($(Self::$settled => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }
    };
}
