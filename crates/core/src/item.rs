//! Item type and status enums.
//!
//! Both enums are stored as upper-case TEXT in the database and travel as
//! the same upper-case strings over the wire (`"GAME"`, `"IN_PROGRESS"`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The canonical upper-case representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Invalid {} '{}'. Must be one of: {}",
                        $label,
                        other,
                        [$($text),+].join(", ")
                    ))),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

define_text_enum! {
    /// Which catalog an item belongs to. Immutable after creation.
    ItemType ("type") {
        Game = "GAME",
        Anime = "ANIME",
        Book = "BOOK",
    }
}

define_text_enum! {
    /// Tracking status of a backlog item.
    ///
    /// Any status may be set to any other status; no transition lattice is
    /// enforced.
    ItemStatus ("status") {
        Backlog = "BACKLOG",
        InProgress = "IN_PROGRESS",
        Completed = "COMPLETED",
        Dropped = "DROPPED",
    }
}
