use serde::{Deserialize, Serialize};
use std::fmt;

/// The dwelling categories used across the UK residential market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    Terraced,
    #[serde(rename = "Semi-Detached")]
    SemiDetached,
    Detached,
    #[serde(rename = "Flat/Apartment")]
    FlatApartment,
    Bungalow,
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PropertyType::Terraced => "Terraced",
            PropertyType::SemiDetached => "Semi-Detached",
            PropertyType::Detached => "Detached",
            PropertyType::FlatApartment => "Flat/Apartment",
            PropertyType::Bungalow => "Bungalow",
        };
        write!(f, "{}", label)
    }
}
