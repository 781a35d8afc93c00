//! Catalog option types

use crate::core::ids::OptionId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk/ambition category tagging every round-two option
///
/// Declaration order is the canonical display order of the tier rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoldnessTier {
    SafeBet,
    WildCard,
    Moonshot,
    Jackpot,
}

impl BoldnessTier {
    /// All tiers in canonical order
    pub const ALL: [BoldnessTier; 4] = [
        BoldnessTier::SafeBet,
        BoldnessTier::WildCard,
        BoldnessTier::Moonshot,
        BoldnessTier::Jackpot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BoldnessTier::SafeBet => "safe_bet",
            BoldnessTier::WildCard => "wild_card",
            BoldnessTier::Moonshot => "moonshot",
            BoldnessTier::Jackpot => "jackpot",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BoldnessTier::SafeBet => "Safe Bet",
            BoldnessTier::WildCard => "Wild Card",
            BoldnessTier::Moonshot => "Moonshot",
            BoldnessTier::Jackpot => "Jackpot",
        }
    }

    /// Label shown to participants when a catalog entry does not provide one
    pub fn default_label(&self) -> &'static str {
        match self {
            BoldnessTier::SafeBet => "Incremental improvement",
            BoldnessTier::WildCard => "Adjacent experiment",
            BoldnessTier::Moonshot => "Transformational bet",
            BoldnessTier::Jackpot => "Breakthrough play",
        }
    }
}

impl fmt::Display for BoldnessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for BoldnessTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "safe_bet" => Ok(BoldnessTier::SafeBet),
            "wild_card" => Ok(BoldnessTier::WildCard),
            "moonshot" => Ok(BoldnessTier::Moonshot),
            "jackpot" => Ok(BoldnessTier::Jackpot),
            other => Err(format!(
                "Unknown boldness tier: {}. Valid: safe_bet, wild_card, moonshot, jackpot",
                other
            )),
        }
    }
}

/// A round-one option (a "pain point"); its id is also the round-two group id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOneOption {
    pub id: OptionId,
    pub title: String,
    pub description: String,
}

/// A round-two option (a "solution") belonging to one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTwoOption {
    pub id: OptionId,
    pub group_id: OptionId,
    pub title: String,
    pub description: String,
    pub boldness: BoldnessTier,
    /// Human label for the tier placement (e.g. "Breakthrough play")
    pub label: String,
}

/// A resolved catalog entry
///
/// Lookups return this closed variant so callers never have to guess which
/// round an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOption<'a> {
    RoundOne(&'a RoundOneOption),
    RoundTwo(&'a RoundTwoOption),
}

impl<'a> CatalogOption<'a> {
    pub fn id(&self) -> &'a OptionId {
        match self {
            CatalogOption::RoundOne(o) => &o.id,
            CatalogOption::RoundTwo(o) => &o.id,
        }
    }

    pub fn title(&self) -> &'a str {
        match self {
            CatalogOption::RoundOne(o) => &o.title,
            CatalogOption::RoundTwo(o) => &o.title,
        }
    }

    pub fn description(&self) -> &'a str {
        match self {
            CatalogOption::RoundOne(o) => &o.description,
            CatalogOption::RoundTwo(o) => &o.description,
        }
    }

    pub fn boldness(&self) -> Option<BoldnessTier> {
        match self {
            CatalogOption::RoundOne(_) => None,
            CatalogOption::RoundTwo(o) => Some(o.boldness),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_serde_is_snake_case() {
        let json = serde_json::to_string(&BoldnessTier::WildCard).unwrap();
        assert_eq!(json, "\"wild_card\"");
        let tier: BoldnessTier = serde_json::from_str("\"safe_bet\"").unwrap();
        assert_eq!(tier, BoldnessTier::SafeBet);
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!("moonshot".parse::<BoldnessTier>().ok(), Some(BoldnessTier::Moonshot));
        assert_eq!("Wild-Card".parse::<BoldnessTier>().ok(), Some(BoldnessTier::WildCard));
        assert!("yolo".parse::<BoldnessTier>().is_err());
    }

    #[test]
    fn test_all_is_in_declaration_order() {
        let mut sorted = BoldnessTier::ALL;
        sorted.sort();
        assert_eq!(sorted, BoldnessTier::ALL);
    }
}
