//! Department breakdown
//!
//! For each round, votes are grouped by the submitting participant's
//! department. The top option is the true maximum of the per-option chip
//! totals accumulated over the department's votes; equal totals go to the
//! option listed first in the catalog.

use super::types::DepartmentStats;
use crate::core::ids::{OptionId, ParticipantId};
use crate::session::participant::Participant;
use crate::session::vote::Vote;
use std::collections::{BTreeMap, HashMap};

#[derive(Default)]
struct DepartmentAccumulator {
    total_chips: u64,
    total_participants: u64,
    option_chips: HashMap<OptionId, u64>,
}

/// Aggregate one round's votes by department
///
/// `order` lists the options eligible for "top option" in catalog order;
/// chips on other ids count toward totals only. Votes from unknown
/// participants or participants without a department are skipped.
pub fn aggregate_departments(
    votes: &[&Vote],
    participants: &HashMap<&ParticipantId, &Participant>,
    order: &[&OptionId],
) -> BTreeMap<String, DepartmentStats> {
    let mut departments: BTreeMap<String, DepartmentAccumulator> = BTreeMap::new();

    for vote in votes {
        let Some(participant) = participants.get(&vote.participant_id) else {
            continue;
        };
        let department = participant.department.trim();
        if department.is_empty() {
            continue;
        }

        let entry = departments.entry(department.to_string()).or_default();
        entry.total_participants += 1;
        for (option, chips) in vote.allocations.iter() {
            let delta = chips.total();
            entry.total_chips += delta;
            *entry.option_chips.entry(option.clone()).or_default() += delta;
        }
    }

    departments
        .into_iter()
        .map(|(name, acc)| {
            let mut top: Option<(&OptionId, u64)> = None;
            for option in order {
                let chips = acc.option_chips.get(*option).copied().unwrap_or(0);
                if chips == 0 {
                    continue;
                }
                if top.is_none_or(|(_, best)| chips > best) {
                    top = Some((option, chips));
                }
            }

            let stats = DepartmentStats {
                total_chips: acc.total_chips,
                total_participants: acc.total_participants,
                top_option_id: top.map(|(id, _)| id.clone()),
                top_option_chips: top.map(|(_, chips)| chips).unwrap_or(0),
            };
            (name, stats)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::{Allocation, ChipAllocation};
    use crate::core::ids::SessionId;
    use crate::session::vote::VotingRound;

    fn vote(participant: &Participant, entries: &[(&str, ChipAllocation)]) -> Vote {
        Vote::new(
            participant.session_id.clone(),
            participant.id.clone(),
            VotingRound::Layer1,
            None,
            Allocation::from_entries(
                entries
                    .iter()
                    .map(|(id, chips)| (OptionId::new(*id), *chips)),
            ),
        )
    }

    #[test]
    fn test_true_max_with_catalog_order_tie_break() {
        let session = SessionId::new("s");
        let alice = Participant::new(session.clone(), "Alice", "Training", "d1");
        let bob = Participant::new(session, "Bob", "Training", "d2");
        let x = OptionId::new("x");
        let y = OptionId::new("y");

        // Alice: X 6, Y 6 (tie inside one vote); Bob: Y 3, X 9.
        let votes = [
            vote(&alice, &[("y", ChipAllocation::new(2, 2, 2)), ("x", ChipAllocation::new(2, 2, 2))]),
            vote(&bob, &[("y", ChipAllocation::new(1, 1, 1)), ("x", ChipAllocation::new(3, 3, 3))]),
        ];
        let refs: Vec<&Vote> = votes.iter().collect();
        let lookup: HashMap<_, _> = [(&alice.id, &alice), (&bob.id, &bob)].into_iter().collect();

        let stats = aggregate_departments(&refs, &lookup, &[&x, &y]);
        let training = &stats["Training"];
        assert_eq!(training.total_participants, 2);
        assert_eq!(training.total_chips, 24);
        assert_eq!(training.top_option_id, Some(x));
        assert_eq!(training.top_option_chips, 15);
    }

    #[test]
    fn test_tie_goes_to_first_listed() {
        let session = SessionId::new("s");
        let alice = Participant::new(session, "Alice", "Safety North", "d1");
        let x = OptionId::new("x");
        let y = OptionId::new("y");

        let votes = [vote(
            &alice,
            &[("x", ChipAllocation::new(2, 2, 2)), ("y", ChipAllocation::new(2, 2, 2))],
        )];
        let refs: Vec<&Vote> = votes.iter().collect();
        let lookup: HashMap<_, _> = [(&alice.id, &alice)].into_iter().collect();

        let stats = aggregate_departments(&refs, &lookup, &[&y, &x]);
        assert_eq!(stats["Safety North"].top_option_id, Some(y));
    }

    #[test]
    fn test_skips_unknown_participants_and_blank_departments() {
        let session = SessionId::new("s");
        let blank = Participant::new(session.clone(), "Anon", "   ", "d1");
        let ghost = Participant::new(session, "Ghost", "Training", "d2");
        let x = OptionId::new("x");

        let votes = [
            vote(&blank, &[("x", ChipAllocation::new(4, 4, 4))]),
            vote(&ghost, &[("x", ChipAllocation::new(4, 4, 4))]),
        ];
        let refs: Vec<&Vote> = votes.iter().collect();
        let lookup: HashMap<_, _> = [(&blank.id, &blank)].into_iter().collect();

        assert!(aggregate_departments(&refs, &lookup, &[&x]).is_empty());
    }
}
