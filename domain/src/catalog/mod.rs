//! Option catalog
//!
//! A session votes over a fixed, two-level catalog:
//!
//! ```text
//! round one:  [pain point A]        [pain point B]        ...
//!                  │                     │
//! round two:  [solution A1..A4]     [solution B1..B4]     ...
//!             (each tagged with a BoldnessTier)
//! ```
//!
//! Catalogs arrive as a loosely-typed [`CatalogDefinition`] (config files,
//! facilitator input) and are validated exactly once into an
//! [`OptionCatalog`]. Everything downstream works against the validated
//! catalog and its [`OptionSet`] handles.

mod defaults;
pub mod option;

pub use defaults::default_definition;
pub use option::{BoldnessTier, CatalogOption, RoundOneOption, RoundTwoOption};

use crate::core::ids::OptionId;
use crate::session::vote::VotingRound;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Errors detected while validating a catalog definition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Catalog has no groups")]
    Empty,

    #[error("Duplicate option id: {0}")]
    DuplicateOption(String),

    #[error("Group {0} has no round-two options")]
    EmptyGroup(String),

    #[error("Option {option} declares group {declared} but is listed under {listed}")]
    GroupMismatch {
        option: String,
        declared: String,
        listed: String,
    },

    #[error("Option id must not be blank")]
    BlankId,
}

/// Raw round-two option as written in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDefinition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub boldness: BoldnessTier,
    /// Falls back to the tier's default label
    #[serde(default)]
    pub label: Option<String>,
    /// Optional explicit group; must match the enclosing group when present
    #[serde(default)]
    pub group_id: Option<String>,
}

/// Raw round-one option together with its round-two options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDefinition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub options: Vec<OptionDefinition>,
}

/// Unvalidated catalog
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogDefinition {
    pub groups: Vec<GroupDefinition>,
}

/// Validated two-level option catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionCatalog {
    round_one: Vec<RoundOneOption>,
    round_two: BTreeMap<OptionId, Vec<RoundTwoOption>>,
}

impl OptionCatalog {
    /// Validate a definition into a catalog
    pub fn from_definition(definition: &CatalogDefinition) -> Result<Self, CatalogError> {
        Self::validate(definition)?;
        Ok(Self::build(definition))
    }

    /// The built-in catalog
    pub fn default_catalog() -> Self {
        Self::build(&default_definition())
    }

    fn validate(definition: &CatalogDefinition) -> Result<(), CatalogError> {
        if definition.groups.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for group in &definition.groups {
            let group_id = group.id.trim();
            if group_id.is_empty() {
                return Err(CatalogError::BlankId);
            }
            if !seen.insert(group_id) {
                return Err(CatalogError::DuplicateOption(group_id.to_string()));
            }
            if group.options.is_empty() {
                return Err(CatalogError::EmptyGroup(group_id.to_string()));
            }

            for option in &group.options {
                let option_id = option.id.trim();
                if option_id.is_empty() {
                    return Err(CatalogError::BlankId);
                }
                if !seen.insert(option_id) {
                    return Err(CatalogError::DuplicateOption(option_id.to_string()));
                }
                if let Some(declared) = &option.group_id
                    && declared.trim() != group_id
                {
                    return Err(CatalogError::GroupMismatch {
                        option: option_id.to_string(),
                        declared: declared.clone(),
                        listed: group_id.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn build(definition: &CatalogDefinition) -> Self {
        let mut round_one = Vec::with_capacity(definition.groups.len());
        let mut round_two = BTreeMap::new();

        for group in &definition.groups {
            let group_key = OptionId::new(group.id.trim());
            let solutions = group
                .options
                .iter()
                .map(|option| RoundTwoOption {
                    id: OptionId::new(option.id.trim()),
                    group_id: group_key.clone(),
                    title: option.title.clone(),
                    description: option.description.clone(),
                    boldness: option.boldness,
                    label: option
                        .label
                        .clone()
                        .unwrap_or_else(|| option.boldness.default_label().to_string()),
                })
                .collect();

            round_one.push(RoundOneOption {
                id: group_key.clone(),
                title: group.title.clone(),
                description: group.description.clone(),
            });
            round_two.insert(group_key, solutions);
        }

        Self {
            round_one,
            round_two,
        }
    }

    /// Round-one options in presentation order
    pub fn round_one(&self) -> &[RoundOneOption] {
        &self.round_one
    }

    /// Round-two options of one group in presentation order
    pub fn group(&self, group_id: &OptionId) -> Option<&[RoundTwoOption]> {
        self.round_two.get(group_id).map(Vec::as_slice)
    }

    /// Groups in round-one order with their round-two options
    pub fn groups(&self) -> impl Iterator<Item = (&RoundOneOption, &[RoundTwoOption])> {
        self.round_one.iter().map(|group| {
            let options = self
                .round_two
                .get(&group.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            (group, options)
        })
    }

    /// Resolve any option id, round-one or round-two
    pub fn lookup(&self, id: &OptionId) -> Option<CatalogOption<'_>> {
        if let Some(option) = self.round_one.iter().find(|o| &o.id == id) {
            return Some(CatalogOption::RoundOne(option));
        }
        self.round_two
            .values()
            .flatten()
            .find(|o| &o.id == id)
            .map(CatalogOption::RoundTwo)
    }

    pub fn is_group(&self, id: &OptionId) -> bool {
        self.round_two.contains_key(id)
    }

    /// The options a participant may allocate chips to
    ///
    /// Round one ignores `group`; round two returns `None` for an unknown group.
    pub fn legal_options(&self, round: VotingRound, group: Option<&OptionId>) -> Option<OptionSet<'_>> {
        match round {
            VotingRound::Layer1 => Some(OptionSet {
                ids: self.round_one.iter().map(|o| &o.id).collect(),
            }),
            VotingRound::Layer2 => {
                let options = self.round_two.get(group?)?;
                Some(OptionSet {
                    ids: options.iter().map(|o| &o.id).collect(),
                })
            }
        }
    }

    /// Reword an option in place; returns `false` when the id is unknown
    pub fn update_text(&mut self, id: &OptionId, title: &str, description: &str) -> bool {
        if let Some(option) = self.round_one.iter_mut().find(|o| &o.id == id) {
            option.title = title.to_string();
            option.description = description.to_string();
            return true;
        }
        if let Some(option) = self
            .round_two
            .values_mut()
            .flatten()
            .find(|o| &o.id == id)
        {
            option.title = title.to_string();
            option.description = description.to_string();
            return true;
        }
        false
    }
}

impl Default for OptionCatalog {
    fn default() -> Self {
        Self::default_catalog()
    }
}

/// Ordered set of option ids legal for one round (and group)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSet<'a> {
    ids: Vec<&'a OptionId>,
}

impl<'a> OptionSet<'a> {
    pub fn contains(&self, id: &OptionId) -> bool {
        self.ids.iter().any(|candidate| *candidate == id)
    }

    /// Position in catalog order, used for deterministic tie-breaks
    pub fn position(&self, id: &OptionId) -> Option<usize> {
        self.ids.iter().position(|candidate| *candidate == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a OptionId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
