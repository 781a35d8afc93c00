//! Round-one routing
//!
//! Each participant is routed to the round-one option they backed most
//! heavily. Ties are broken by a uniform draw over the tied options, taken in
//! catalog order so that a fixed draw always selects the same option.

use super::Allocation;
use crate::catalog::OptionSet;
use crate::core::ids::OptionId;

/// Pick the option with the most chips in `allocation`
///
/// `draw` is consulted only on a tie and must return a value in `[0, 1)`;
/// the winner is the tied option at index `floor(draw * ties)`. Returns `None`
/// when the allocation places chips on no option of `order`.
pub fn routing_winner(
    allocation: &Allocation,
    order: &OptionSet<'_>,
    draw: impl FnOnce() -> f64,
) -> Option<OptionId> {
    let mut best: u64 = 0;
    let mut leaders: Vec<&OptionId> = Vec::new();

    for option in order.iter() {
        let Some(chips) = allocation.get(option) else {
            continue;
        };
        let total = chips.total();
        if total == 0 {
            continue;
        }
        if total > best {
            best = total;
            leaders.clear();
            leaders.push(option);
        } else if total == best {
            leaders.push(option);
        }
    }

    match leaders.len() {
        0 => None,
        1 => Some(leaders[0].clone()),
        n => {
            let roll = draw().clamp(0.0, 1.0);
            let index = ((roll * n as f64).floor() as usize).min(n - 1);
            Some(leaders[index].clone())
        }
    }
}
