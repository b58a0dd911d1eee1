//! ACTION/GOTO table construction (spec.md §4.8) and the `ParseTables`
//! value the driver consumes.
//!
//! SLR gets its own builder because LR(0) items carry no lookahead at all
//! — the reduction set for a completed item has to come from FOLLOW. CLR
//! and LALR share one builder: once LALR merging (§4.7) has unioned the
//! item sets, a completed item's own carried lookahead is the entire
//! per-item contribution, and multiple items sharing a core but differing
//! only in lookahead each independently populate the same ACTION cell —
//! which *is* "the union of lookaheads across merged items with the same
//! core" the spec calls for, with no extra bookkeeping (spec.md §9).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::{debug, warn};

use crate::collection::Collection;
use crate::error::{GrammarError, Result};
use crate::first_follow::FollowSets;
use crate::grammar::{Grammar, Production};
use crate::item::{Lr0Item, Lr1Item};
use crate::symbol::Symbol;

/// An ACTION table entry (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(Symbol, Vec<Symbol>),
    Accept,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shift(state) => write!(f, "shift({state})"),
            Action::Reduce(head, rhs) => {
                write!(f, "reduce({head} ->")?;
                for sym in rhs {
                    write!(f, " {sym}")?;
                }
                write!(f, ")")
            }
            Action::Accept => write!(f, "accept"),
        }
    }
}

/// The parse tables produced by a table-builder variant, plus the
/// underlying canonical collection exposed for inspection (spec.md §6
/// `STATES`/`TRANSITIONS`).
#[derive(Debug, Clone)]
pub struct ParseTables<Item: Ord + Clone> {
    pub states: Vec<BTreeSet<Item>>,
    pub transitions: BTreeMap<(usize, Symbol), usize>,
    pub action: BTreeMap<(usize, Symbol), Action>,
    pub goto: BTreeMap<(usize, Symbol), usize>,
}

pub type SlrTables = ParseTables<Lr0Item>;
pub type ClrTables = ParseTables<Lr1Item>;
pub type LalrTables = ParseTables<Lr1Item>;

fn record_action(
    action: &mut BTreeMap<(usize, Symbol), Action>,
    state: usize,
    symbol: Symbol,
    candidate: Action,
) -> Result<()> {
    match action.get(&(state, symbol.clone())) {
        None => {
            action.insert((state, symbol), candidate);
            Ok(())
        }
        Some(existing) if *existing == candidate => Ok(()),
        Some(existing) => {
            warn!(state, %symbol, %existing, %candidate, "conflict detected");
            Err(GrammarError::Conflict {
                state,
                symbol,
                existing: existing.to_string(),
                candidate: candidate.to_string(),
            })
        }
    }
}

fn reduce_action(grammar: &Grammar, production_index: usize) -> Action {
    let Production { head, rhs } = grammar.production(production_index);
    Action::Reduce(head.clone(), rhs.clone())
}

/// Builds the SLR(1) ACTION/GOTO tables from the LR(0) collection and
/// FOLLOW sets (spec.md §4.8 "SLR(1): FOLLOW(A)").
pub fn build_slr_tables(
    grammar: &Grammar,
    collection: Collection<Lr0Item>,
    follow_sets: &FollowSets,
) -> Result<SlrTables> {
    let mut action: BTreeMap<(usize, Symbol), Action> = BTreeMap::new();
    let mut goto: BTreeMap<(usize, Symbol), usize> = BTreeMap::new();

    for (state_id, state) in collection.states.iter().enumerate() {
        for item in state {
            if item.is_reduce_item(grammar) {
                let head = item.head(grammar);
                if *head == *grammar.augmented_start() {
                    record_action(&mut action, state_id, Symbol::end_marker(), Action::Accept)?;
                    continue;
                }
                let follow = follow_sets.get(head).cloned().unwrap_or_default();
                let candidate = reduce_action(grammar, item.production);
                for lookahead in follow {
                    record_action(&mut action, state_id, lookahead, candidate.clone())?;
                }
            } else if let Some(symbol) = item.symbol_after_dot(grammar) {
                if let Some(&next) = collection.transitions.get(&(state_id, symbol.clone())) {
                    if symbol.is_nonterminal() {
                        goto.insert((state_id, symbol.clone()), next);
                    } else {
                        record_action(&mut action, state_id, symbol.clone(), Action::Shift(next))?;
                    }
                }
            }
        }
    }

    debug!(states = collection.states.len(), "SLR tables built");
    Ok(ParseTables {
        states: collection.states,
        transitions: collection.transitions,
        action,
        goto,
    })
}

/// Shared table builder for CLR(1) (canonical collection) and LALR(1)
/// (merged collection) — spec.md §4.8 "CLR(1)"/"LALR(1)".
pub fn build_lr1_tables(grammar: &Grammar, collection: Collection<Lr1Item>) -> Result<ParseTables<Lr1Item>> {
    let mut action: BTreeMap<(usize, Symbol), Action> = BTreeMap::new();
    let mut goto: BTreeMap<(usize, Symbol), usize> = BTreeMap::new();

    for (state_id, state) in collection.states.iter().enumerate() {
        for item in state {
            if item.is_reduce_item(grammar) {
                let head = item.head(grammar);
                if *head == *grammar.augmented_start() {
                    record_action(&mut action, state_id, Symbol::end_marker(), Action::Accept)?;
                    continue;
                }
                let candidate = reduce_action(grammar, item.core.production);
                record_action(&mut action, state_id, item.lookahead.clone(), candidate)?;
            } else if let Some(symbol) = item.symbol_after_dot(grammar) {
                if let Some(&next) = collection.transitions.get(&(state_id, symbol.clone())) {
                    if symbol.is_nonterminal() {
                        goto.insert((state_id, symbol.clone()), next);
                    } else {
                        record_action(&mut action, state_id, symbol.clone(), Action::Shift(next))?;
                    }
                }
            }
        }
    }

    debug!(states = collection.states.len(), "LR(1) tables built");
    Ok(ParseTables {
        states: collection.states,
        transitions: collection.transitions,
        action,
        goto,
    })
}
