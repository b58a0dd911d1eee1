//! Closure, GOTO, and the canonical-collection worklist scaffold
//! (spec.md §4.4–§4.6).
//!
//! LR(0) and LR(1) closure/goto differ in what they carry (lookahead), but
//! both enumerate the canonical collection with the same breadth-first
//! worklist: discover state 0, then repeatedly compute GOTO on every
//! symbol that appears after a dot in the current state, adding new
//! states as they're found. State identity is by item-set equality; since
//! items live in a `BTreeSet`, that equality is already canonical
//! (spec.md §9).

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use tracing::debug;

use crate::first_follow::{first_of_string, FirstSets};
use crate::grammar::Grammar;
use crate::item::{Lr0Item, Lr1Item};
use crate::symbol::Symbol;

/// The canonical collection of item sets plus the transition relation
/// discovered while building it (spec.md §3 "Transition relation").
#[derive(Debug, Clone)]
pub struct Collection<Item: Ord + Clone> {
    pub states: Vec<BTreeSet<Item>>,
    pub transitions: BTreeMap<(usize, Symbol), usize>,
}

/// Runs the shared BFS worklist given an already-closed initial state and
/// per-variant `closure`/`goto` functions.
fn build_collection<Item, C, G>(
    initial_state: BTreeSet<Item>,
    mut closure: C,
    mut goto: G,
    symbol_after_dot: impl Fn(&Item, &Grammar) -> Option<Symbol>,
    grammar: &Grammar,
) -> Collection<Item>
where
    Item: Ord + Clone + std::hash::Hash,
    C: FnMut(BTreeSet<Item>) -> BTreeSet<Item>,
    G: FnMut(&BTreeSet<Item>, &Symbol) -> BTreeSet<Item>,
{
    let state0 = closure(initial_state);
    let mut states = vec![state0.clone()];
    let mut index: HashMap<BTreeSet<Item>, usize> = HashMap::new();
    index.insert(state0, 0);

    let mut transitions: BTreeMap<(usize, Symbol), usize> = BTreeMap::new();
    let mut worklist: VecDeque<usize> = VecDeque::from([0]);

    while let Some(state_id) = worklist.pop_front() {
        let state = states[state_id].clone();

        // Sorting the successor-symbol set makes numbering reproducible
        // (spec.md §9 "Determinism of numbering").
        let mut symbols: BTreeSet<Symbol> = BTreeSet::new();
        for item in &state {
            if let Some(symbol) = symbol_after_dot(item, grammar) {
                symbols.insert(symbol);
            }
        }

        for symbol in symbols {
            let moved = goto(&state, &symbol);
            if moved.is_empty() {
                continue;
            }

            let next_id = if let Some(&existing) = index.get(&moved) {
                existing
            } else {
                let new_id = states.len();
                index.insert(moved.clone(), new_id);
                states.push(moved);
                worklist.push_back(new_id);
                new_id
            };
            transitions.insert((state_id, symbol), next_id);
        }
    }

    debug!(states = states.len(), "canonical collection built");
    Collection {
        states,
        transitions,
    }
}

/// LR(0) closure (spec.md §4.4): for every item with the dot before a
/// nonterminal `B`, add every `B -> γ` production at dot 0.
pub fn closure0(grammar: &Grammar, items: BTreeSet<Lr0Item>) -> BTreeSet<Lr0Item> {
    let mut result = items;
    loop {
        let mut additions = Vec::new();
        for item in &result {
            if let Some(symbol) = item.symbol_after_dot(grammar) {
                if symbol.is_nonterminal() {
                    for &prod_index in grammar.production_indices(symbol) {
                        let new_item = Lr0Item::initial(prod_index);
                        if !result.contains(&new_item) {
                            additions.push(new_item);
                        }
                    }
                }
            }
        }
        if additions.is_empty() {
            break;
        }
        result.extend(additions);
    }
    result
}

/// LR(0) GOTO (spec.md §4.4).
pub fn goto0(grammar: &Grammar, items: &BTreeSet<Lr0Item>, symbol: &Symbol) -> BTreeSet<Lr0Item> {
    let moved: BTreeSet<Lr0Item> = items
        .iter()
        .filter(|item| item.symbol_after_dot(grammar) == Some(symbol))
        .map(Lr0Item::advanced)
        .collect();
    closure0(grammar, moved)
}

/// Builds the canonical collection of LR(0) item sets (spec.md §4.6).
pub fn build_lr0_collection(grammar: &Grammar) -> Collection<Lr0Item> {
    let start_item = Lr0Item::initial(grammar.augmented_start_production());
    build_collection(
        BTreeSet::from([start_item]),
        |items| closure0(grammar, items),
        |items, symbol| goto0(grammar, items, symbol),
        |item, g| item.symbol_after_dot(g).cloned(),
        grammar,
    )
}

/// LR(1) closure (spec.md §4.5): for every item `(A, α, i, a)` with the
/// dot before nonterminal `B`, for every `B -> γ`, add `(B, γ, 0, b)` for
/// every `b` in `FIRST(α[i+1..] · a)`.
pub fn closure1(
    grammar: &Grammar,
    first_sets: &FirstSets,
    items: BTreeSet<Lr1Item>,
) -> BTreeSet<Lr1Item> {
    let mut result = items;
    loop {
        let mut additions = Vec::new();
        for item in &result {
            let Some(symbol) = item.symbol_after_dot(grammar) else {
                continue;
            };
            if !symbol.is_nonterminal() {
                continue;
            }

            let rhs = &grammar.production(item.core.production).rhs;
            let mut suffix: Vec<Symbol> = rhs[item.core.dot + 1..].to_vec();
            suffix.push(item.lookahead.clone());
            let lookaheads = first_of_string(first_sets, &suffix);

            for &prod_index in grammar.production_indices(symbol) {
                for lookahead in &lookaheads {
                    // `a` is always a terminal (spec.md §4.2), so ε never
                    // escapes into a lookahead set.
                    if lookahead.is_epsilon() {
                        continue;
                    }
                    let new_item = Lr1Item::initial(prod_index, lookahead.clone());
                    if !result.contains(&new_item) {
                        additions.push(new_item);
                    }
                }
            }
        }
        if additions.is_empty() {
            break;
        }
        result.extend(additions);
    }
    result
}

/// LR(1) GOTO (spec.md §4.5).
pub fn goto1(
    grammar: &Grammar,
    first_sets: &FirstSets,
    items: &BTreeSet<Lr1Item>,
    symbol: &Symbol,
) -> BTreeSet<Lr1Item> {
    let moved: BTreeSet<Lr1Item> = items
        .iter()
        .filter(|item| item.symbol_after_dot(grammar) == Some(symbol))
        .map(Lr1Item::advanced)
        .collect();
    closure1(grammar, first_sets, moved)
}

/// Builds the canonical collection of LR(1) item sets (spec.md §4.6),
/// used directly for CLR(1) and as the pre-merge input to LALR(1).
pub fn build_lr1_collection(grammar: &Grammar, first_sets: &FirstSets) -> Collection<Lr1Item> {
    let start_item = Lr1Item::initial(grammar.augmented_start_production(), Symbol::end_marker());
    build_collection(
        BTreeSet::from([start_item]),
        |items| closure1(grammar, first_sets, items),
        |items, symbol| goto1(grammar, first_sets, items, symbol),
        |item, g| item.symbol_after_dot(g).cloned(),
        grammar,
    )
}
