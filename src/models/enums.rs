//! Shared domain enums
//!
//! Every enum is a closed set of SCREAMING_SNAKE_CASE names. The same name
//! list drives request validation, the "must be one of" error message and
//! the TEXT column encoding.

use std::fmt;
use thiserror::Error;

/// A closed set of named values
pub trait Choice: Sized + Copy + 'static {
    const ALL: &'static [Self];
    const NAMES: &'static [&'static str];

    fn as_str(&self) -> &'static str;
}

#[derive(Debug, Error)]
#[error("unknown {kind} value '{value}'")]
pub struct UnknownChoice {
    kind: &'static str,
    value: String,
}

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl Choice for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];
            const NAMES: &'static [&'static str] = &[$($label),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(UnknownChoice {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let text = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
                Ok(text.parse()?)
            }
        }
    };
}

choice_enum! {
    /// Handset manufacturer
    Brand {
        Apple => "APPLE",
        Samsung => "SAMSUNG",
        Google => "GOOGLE",
        OnePlus => "ONEPLUS",
        Xiaomi => "XIAOMI",
        Oppo => "OPPO",
        Vivo => "VIVO",
        Realme => "REALME",
        Motorola => "MOTOROLA",
        Nokia => "NOKIA",
        Other => "OTHER",
    }
}

choice_enum! {
    /// Stock state of a mobile or accessory
    ItemStatus {
        InStock => "IN_STOCK",
        Sold => "SOLD",
        OutOfStock => "OUT_OF_STOCK",
        Reserved => "RESERVED",
    }
}

choice_enum! {
    /// Accessory category
    AccessoryType {
        Case => "CASE",
        Charger => "CHARGER",
        Cable => "CABLE",
        Earphones => "EARPHONES",
        ScreenGuard => "SCREEN_GUARD",
        PowerBank => "POWER_BANK",
        Other => "OTHER",
    }
}

choice_enum! {
    /// Kind of repair job
    ServiceType {
        ScreenReplacement => "SCREEN_REPLACEMENT",
        BatteryReplacement => "BATTERY_REPLACEMENT",
        ChargingPort => "CHARGING_PORT",
        Software => "SOFTWARE",
        WaterDamage => "WATER_DAMAGE",
        Other => "OTHER",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_round_trips<T: Choice + std::str::FromStr + PartialEq + fmt::Debug>() {
        assert_eq!(T::ALL.len(), T::NAMES.len());
        for (value, name) in T::ALL.iter().zip(T::NAMES) {
            assert_eq!(value.as_str(), *name);
            assert_eq!(name.parse::<T>().ok(), Some(*value));
        }
    }

    #[test]
    fn test_names_match_variants() {
        assert_round_trips::<Brand>();
        assert_round_trips::<ItemStatus>();
        assert_round_trips::<AccessoryType>();
        assert_round_trips::<ServiceType>();
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        assert!("apple".parse::<Brand>().is_err());
        assert!("BROKEN".parse::<ItemStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&AccessoryType::ScreenGuard).unwrap(),
            "\"SCREEN_GUARD\""
        );
        let status: ItemStatus = serde_json::from_str("\"IN_STOCK\"").unwrap();
        assert_eq!(status, ItemStatus::InStock);
    }
}
