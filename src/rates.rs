// ♻️ Rate Table - fixed points-per-kilogram by material category
//
// The material set is closed and the rates are defined once. Historical
// transactions store their computed points, so editing a rate here never
// rewrites history.

use serde::{Deserialize, Serialize};

/// A recyclable material category accepted at drop-off.
///
/// Serialized with the lowercase keys used in persisted records and in the
/// redemption payload ("lawnwaste", "householdhazardouswaste", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Plastic,
    Metal,
    Paper,
    Glass,
    Aluminum,
    LawnWaste,
    Misc,
    FoodWaste,
    ElectronicWaste,
    UsedTires,
    UsedOil,
    CarBatteries,
    HouseholdBatteries,
    HouseholdHazardousWaste,
}

/// Every material kind, in menu order.
pub const ALL_MATERIALS: [MaterialKind; 14] = [
    MaterialKind::Plastic,
    MaterialKind::Metal,
    MaterialKind::Paper,
    MaterialKind::Glass,
    MaterialKind::Aluminum,
    MaterialKind::LawnWaste,
    MaterialKind::Misc,
    MaterialKind::FoodWaste,
    MaterialKind::ElectronicWaste,
    MaterialKind::UsedTires,
    MaterialKind::UsedOil,
    MaterialKind::CarBatteries,
    MaterialKind::HouseholdBatteries,
    MaterialKind::HouseholdHazardousWaste,
];

impl MaterialKind {
    /// Reward rate in points per kilogram. Always positive.
    pub fn rate(&self) -> f64 {
        match self {
            MaterialKind::Plastic => 0.07,
            MaterialKind::Metal => 0.09,
            MaterialKind::Paper => 0.07,
            MaterialKind::Glass => 0.25,
            MaterialKind::Aluminum => 0.1,
            MaterialKind::LawnWaste => 0.15,
            MaterialKind::Misc => 0.35,
            MaterialKind::FoodWaste => 0.4,
            MaterialKind::ElectronicWaste => 0.5,
            MaterialKind::UsedTires => 0.6,
            MaterialKind::UsedOil => 1.0,
            MaterialKind::CarBatteries => 0.8,
            MaterialKind::HouseholdBatteries => 1.2,
            MaterialKind::HouseholdHazardousWaste => 1.5,
        }
    }

    /// Stable storage key, matching the serde representation.
    pub fn key(&self) -> &'static str {
        match self {
            MaterialKind::Plastic => "plastic",
            MaterialKind::Metal => "metal",
            MaterialKind::Paper => "paper",
            MaterialKind::Glass => "glass",
            MaterialKind::Aluminum => "aluminum",
            MaterialKind::LawnWaste => "lawnwaste",
            MaterialKind::Misc => "misc",
            MaterialKind::FoodWaste => "foodwaste",
            MaterialKind::ElectronicWaste => "electronicwaste",
            MaterialKind::UsedTires => "usedtires",
            MaterialKind::UsedOil => "usedoil",
            MaterialKind::CarBatteries => "carbatteries",
            MaterialKind::HouseholdBatteries => "householdbatteries",
            MaterialKind::HouseholdHazardousWaste => "householdhazardouswaste",
        }
    }

    /// Human-facing label for menus and transaction summaries.
    pub fn label(&self) -> &'static str {
        match self {
            MaterialKind::Plastic => "Plastic",
            MaterialKind::Metal => "Metal",
            MaterialKind::Paper => "Paper/Cardboard",
            MaterialKind::Glass => "Glass",
            MaterialKind::Aluminum => "Aluminum",
            MaterialKind::LawnWaste => "Lawn/Yard Waste",
            MaterialKind::Misc => "Misc",
            MaterialKind::FoodWaste => "Food Waste",
            MaterialKind::ElectronicWaste => "Electronics Waste",
            MaterialKind::UsedTires => "Used Tires",
            MaterialKind::UsedOil => "Used Oil",
            MaterialKind::CarBatteries => "Batteries (Car)",
            MaterialKind::HouseholdBatteries => "Batteries (Household)",
            MaterialKind::HouseholdHazardousWaste => "Household Hazardous Waste",
        }
    }

    pub fn from_key(key: &str) -> Option<MaterialKind> {
        ALL_MATERIALS.iter().copied().find(|m| m.key() == key)
    }
}

/// Error for parsing a material key that is not in the closed set.
#[derive(Debug, Clone)]
pub struct UnknownMaterial(pub String);

impl std::fmt::Display for UnknownMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown material '{}'", self.0)
    }
}

impl std::error::Error for UnknownMaterial {}

impl std::str::FromStr for MaterialKind {
    type Err = UnknownMaterial;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MaterialKind::from_key(&s.to_lowercase()).ok_or_else(|| UnknownMaterial(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rates_positive() {
        for material in ALL_MATERIALS {
            assert!(material.rate() > 0.0, "{:?} has non-positive rate", material);
        }
    }

    #[test]
    fn test_reference_rates() {
        assert_eq!(MaterialKind::Plastic.rate(), 0.07);
        assert_eq!(MaterialKind::Glass.rate(), 0.25);
        assert_eq!(MaterialKind::UsedOil.rate(), 1.0);
        assert_eq!(MaterialKind::HouseholdHazardousWaste.rate(), 1.5);
    }

    #[test]
    fn test_key_roundtrip() {
        for material in ALL_MATERIALS {
            assert_eq!(MaterialKind::from_key(material.key()), Some(material));
        }
    }

    #[test]
    fn test_serde_uses_lowercase_keys() {
        let json = serde_json::to_string(&MaterialKind::HouseholdHazardousWaste).unwrap();
        assert_eq!(json, "\"householdhazardouswaste\"");

        let parsed: MaterialKind = serde_json::from_str("\"lawnwaste\"").unwrap();
        assert_eq!(parsed, MaterialKind::LawnWaste);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "plutonium".parse::<MaterialKind>().unwrap_err();
        assert!(err.to_string().contains("plutonium"));
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("Plastic".parse::<MaterialKind>().unwrap(), MaterialKind::Plastic);
    }
}
