//! Closed value sets shared by the entity records.
//!
//! When the `sea-orm` feature is enabled, every enum here can be used directly
//! as a SeaORM column and is stored as its lowercase string value.

#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error when parsing a string that is not a member of the value set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseValueError {
    kind: &'static str,
    invalid: String,
    allowed: &'static [&'static str],
}

impl fmt::Display for ParseValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {} '{}'. Valid values: {}",
            self.kind,
            self.invalid,
            self.allowed.join(", ")
        )
    }
}

impl std::error::Error for ParseValueError {}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:tt) {
            $( $(#[$vmeta:meta])* $variant:ident => $value:tt ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
        #[cfg_attr(
            feature = "sea-orm",
            derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
            sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
        )]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $value)]
                #[cfg_attr(feature = "sea-orm", sea_orm(string_value = $value))]
                $variant,
            )+
        }

        impl $name {
            const NAMES: &'static [&'static str] = &[$($value),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseValueError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok(Self::$variant),)+
                    _ => Err(ParseValueError {
                        kind: $kind,
                        invalid: s.to_string(),
                        allowed: Self::NAMES,
                    }),
                }
            }
        }
    };
}

string_enum! {
    /// Sex of a dog.
    Gender ("gender") {
        Male => "male",
        Female => "female",
    }
}

string_enum! {
    /// What a bathroom event consisted of.
    BathroomType ("type") {
        Pee => "pee",
        Poop => "poop",
        /// Counts towards both the pee and the poop series.
        Both => "both",
    }
}

string_enum! {
    /// Stool consistency. Only recorded for poop events.
    Consistency ("consistency") {
        Normal => "normal",
        Soft => "soft",
        Hard => "hard",
        Watery => "watery",
    }
}

string_enum! {
    /// Stool colour. Only recorded for poop events.
    StoolColor ("color") {
        Brown => "brown",
        Yellow => "yellow",
        Green => "green",
        Black => "black",
        Red => "red",
        Gray => "gray",
    }
}

string_enum! {
    FoodType ("foodType") {
        Dry => "dry",
        Wet => "wet",
        Treats => "treats",
        Supplements => "supplements",
    }
}

string_enum! {
    MealTime ("mealTime") {
        Breakfast => "breakfast",
        Lunch => "lunch",
        Dinner => "dinner",
        Snack => "snack",
    }
}

impl BathroomType {
    /// Poop and both events must carry consistency and colour.
    pub fn involves_poop(&self) -> bool {
        matches!(self, Self::Poop | Self::Both)
    }

    pub fn involves_pee(&self) -> bool {
        matches!(self, Self::Pee | Self::Both)
    }
}
