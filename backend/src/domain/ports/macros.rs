//! Macro for port error enums whose variants each carry a single message.
//!
//! Every variant gets a snake-case constructor accepting anything that
//! converts into a `String`, and the enum gets a `message` accessor so
//! callers can log the detail without matching on the variant.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { message: String } => $display:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($display)]
                $variant { message: String },
            )*
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = "Build the `" $variant "` variant."]
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant { message: message.into() }
                    }
                }
            )*

            /// Detail reported by the adapter.
            pub fn message(&self) -> &str {
                match self {
                    $( Self::$variant { message } => message, )*
                }
            }
        }
    };
}

pub(crate) use define_port_error;
