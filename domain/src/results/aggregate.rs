//! Results aggregation
//!
//! A pure function from (session, participants, votes) to [`SessionResults`].
//! Votes are folded in `(submitted_at, id)` order and every map in the output
//! is ordered, so the document only changes when the vote set does.

use super::department::aggregate_departments;
use super::types::{
    ChipTotals, DepartmentInsights, GroupResults, LayerResults, OptionResults, ResultsSummary,
    SessionResults, TierRollup,
};
use crate::catalog::{BoldnessTier, CatalogOption};
use crate::core::ids::{OptionId, ParticipantId};
use crate::core::percent::percentage;
use crate::session::entities::Session;
use crate::session::participant::Participant;
use crate::session::vote::{Vote, VotingRound};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Compute the full results document for `session`
///
/// Votes or participants belonging to other sessions are ignored. Chips on
/// ids the catalog does not list count toward vote totals but never appear
/// as options.
pub fn aggregate(session: &Session, participants: &[Participant], votes: &[Vote]) -> SessionResults {
    let mut ordered: Vec<&Vote> = votes
        .iter()
        .filter(|v| v.session_id == session.id)
        .collect();
    ordered.sort_by(|a, b| {
        a.submitted_at
            .cmp(&b.submitted_at)
            .then_with(|| a.id.cmp(&b.id))
    });

    let members: HashMap<&ParticipantId, &Participant> = participants
        .iter()
        .filter(|p| p.session_id == session.id)
        .map(|p| (&p.id, p))
        .collect();

    let round_one: Vec<&Vote> = ordered
        .iter()
        .copied()
        .filter(|v| v.round == VotingRound::Layer1)
        .collect();
    let round_two: Vec<&Vote> = ordered
        .iter()
        .copied()
        .filter(|v| v.round == VotingRound::Layer2)
        .collect();

    let catalog = &session.catalog;
    let layer1_options: Vec<CatalogOption<'_>> =
        catalog.round_one().iter().map(CatalogOption::RoundOne).collect();
    let layer1 = aggregate_layer(&layer1_options, &round_one);

    let mut layer2 = BTreeMap::new();
    let mut layer2_order: Vec<&OptionId> = Vec::new();
    for (group, options) in catalog.groups() {
        let group_votes: Vec<&Vote> = round_two
            .iter()
            .copied()
            .filter(|v| v.group_id.as_ref() == Some(&group.id))
            .collect();
        let group_options: Vec<CatalogOption<'_>> =
            options.iter().map(CatalogOption::RoundTwo).collect();
        layer2_order.extend(options.iter().map(|o| &o.id));

        let results = aggregate_layer(&group_options, &group_votes);
        let boldness = tier_rollup(&group_options, &group_votes, &results);
        layer2.insert(group.id.clone(), GroupResults { results, boldness });
    }

    let layer1_order: Vec<&OptionId> = catalog.round_one().iter().map(|o| &o.id).collect();
    let departments = DepartmentInsights {
        layer1: aggregate_departments(&round_one, &members, &layer1_order),
        layer2: aggregate_departments(&round_two, &members, &layer2_order),
    };

    let summary = ResultsSummary {
        total_participants: members.len() as u64,
        layer1_allocations: round_one.len() as u64,
        layer2_allocations: round_two.len() as u64,
        total_layer1_chips: round_one.iter().map(|v| v.total_chips).sum(),
        total_layer2_chips: round_two.iter().map(|v| v.total_chips).sum(),
    };

    SessionResults {
        session_id: session.id.clone(),
        summary,
        layer1,
        layer2,
        departments,
    }
}

fn aggregate_layer(options: &[CatalogOption<'_>], votes: &[&Vote]) -> LayerResults {
    let mut totals: HashMap<&OptionId, ChipTotals> =
        options.iter().map(|o| (o.id(), ChipTotals::default())).collect();

    for vote in votes {
        for (option, chips) in vote.allocations.iter() {
            if let Some(entry) = totals.get_mut(option) {
                entry.add(chips);
            }
        }
    }

    let options = options
        .iter()
        .map(|option| {
            let totals = totals.get(option.id()).copied().unwrap_or_default();
            let label = match option {
                CatalogOption::RoundTwo(o) => Some(o.label.clone()),
                CatalogOption::RoundOne(_) => None,
            };
            OptionResults {
                option_id: option.id().clone(),
                title: option.title().to_string(),
                description: option.description().to_string(),
                boldness: option.boldness(),
                label,
                totals,
                percentages: totals.percentages(),
            }
        })
        .collect();

    LayerResults {
        total_allocations: votes.len() as u64,
        total_chips: votes.iter().map(|v| v.total_chips).sum(),
        options,
    }
}

fn tier_rollup(
    options: &[CatalogOption<'_>],
    votes: &[&Vote],
    results: &LayerResults,
) -> Vec<TierRollup> {
    let group_chips: u64 = results.options.iter().map(|o| o.totals.total_chips).sum();

    BoldnessTier::ALL
        .iter()
        .map(|&tier| {
            let tier_options: HashSet<&OptionId> = options
                .iter()
                .filter(|o| o.boldness() == Some(tier))
                .map(|o| o.id())
                .collect();

            let total_chips: u64 = results
                .options
                .iter()
                .filter(|o| tier_options.contains(&o.option_id))
                .map(|o| o.totals.total_chips)
                .sum();

            let backers: HashSet<&ParticipantId> = votes
                .iter()
                .filter(|v| {
                    v.allocations
                        .iter()
                        .any(|(id, chips)| tier_options.contains(id) && !chips.is_empty())
                })
                .map(|v| &v.participant_id)
                .collect();

            TierRollup {
                tier,
                label: tier.display_name().to_string(),
                total_chips,
                share: percentage(total_chips, group_chips),
                participant_count: backers.len() as u64,
            }
        })
        .collect()
}
