//! LALR(1) state merging (spec.md §4.7).
//!
//! Building full canonical LR(1) and merging states with identical LR(0)
//! cores afterward is chosen over a direct LALR construction for clarity,
//! per spec.md §9 ("LALR via merge-after-build"): group states by core,
//! union each group's items, renumber deterministically by each group's
//! minimum old state index, and rewrite the transition relation over the
//! new numbering.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::collection::Collection;
use crate::item::{Lr0Item, Lr1Item};
use crate::symbol::Symbol;

fn core_of(state: &BTreeSet<Lr1Item>) -> BTreeSet<Lr0Item> {
    state.iter().map(|item| item.core().clone()).collect()
}

/// Merges a canonical LR(1) collection into its LALR(1) collection.
///
/// The pre-merge LR(1) numbering is never exposed past this function: per
/// the Open Question resolution in DESIGN.md, only the merged collection
/// is a valid return value for callers building LALR tables.
pub fn merge_lalr(lr1: &Collection<Lr1Item>) -> Collection<Lr1Item> {
    // Group old state indices by LR(0) core, keyed by the group's minimum
    // old index so the merged numbering is deterministic (spec.md §4.7.3).
    let mut groups: BTreeMap<BTreeSet<Lr0Item>, Vec<usize>> = BTreeMap::new();
    for (old_index, state) in lr1.states.iter().enumerate() {
        groups
            .entry(core_of(state))
            .or_default()
            .push(old_index);
    }

    // Order merged states by the minimum old index of their group so a
    // group's numbering reflects original discovery order.
    let mut ordered_groups: Vec<Vec<usize>> = groups.into_values().collect();
    ordered_groups.sort_by_key(|members| members[0]);

    let mut old_to_new: HashMap<usize, usize> = HashMap::new();
    let mut merged_states: Vec<BTreeSet<Lr1Item>> = Vec::with_capacity(ordered_groups.len());

    for (new_index, members) in ordered_groups.iter().enumerate() {
        let mut merged_items: BTreeSet<Lr1Item> = BTreeSet::new();
        for &old_index in members {
            merged_items.extend(lr1.states[old_index].iter().cloned());
        }
        merged_states.push(merged_items);
        for &old_index in members {
            old_to_new.insert(old_index, new_index);
        }
    }

    let mut merged_transitions: BTreeMap<(usize, Symbol), usize> = BTreeMap::new();
    for ((old_src, symbol), old_dst) in &lr1.transitions {
        let new_src = old_to_new[old_src];
        let new_dst = old_to_new[old_dst];
        if let Some(&existing) = merged_transitions.get(&(new_src, symbol.clone())) {
            debug_assert_eq!(
                existing, new_dst,
                "GOTO core-preservation invariant violated: merged transition disagrees"
            );
        }
        merged_transitions.insert((new_src, symbol.clone()), new_dst);
    }

    debug!(
        lr1_states = lr1.states.len(),
        lalr_states = merged_states.len(),
        "LALR merge complete"
    );

    Collection {
        states: merged_states,
        transitions: merged_transitions,
    }
}
