//! FIRST and FOLLOW set computation for context-free grammars (spec.md §4.2,
//! §4.3).
//!
//! Computed by fixed-point iteration over every production until no set
//! changes in a full pass. Per spec.md §9, this is the textbook worklist
//! algorithm rather than a per-symbol recursive formulation, so immediate
//! left recursion cannot cause non-termination or under-approximate FIRST:
//! a self-referential production simply contributes nothing new until its
//! own FIRST set has already absorbed what non-recursive alternatives gave
//! it, and the outer loop keeps iterating until that has happened.

use std::collections::{HashMap, HashSet};

use crate::grammar::Grammar;
use crate::symbol::Symbol;

/// FIRST(A) for every non-terminal `A`, plus FIRST(t) = {t} for every
/// terminal `t` encountered (populated lazily by [`first_of_string`]).
pub type FirstSets = HashMap<Symbol, HashSet<Symbol>>;

/// FOLLOW(A) for every non-terminal `A`.
pub type FollowSets = HashMap<Symbol, HashSet<Symbol>>;

/// Computes FIRST(A) for every non-terminal in the grammar by fixed-point
/// iteration (spec.md §4.2).
pub fn compute_first_sets(grammar: &Grammar) -> FirstSets {
    let mut first_sets: FirstSets = HashMap::new();

    for terminal in grammar.terminals() {
        first_sets.insert(terminal.clone(), HashSet::from([terminal.clone()]));
    }
    for nonterminal in grammar.nonterminals() {
        first_sets.entry(nonterminal.clone()).or_default();
    }

    let mut changed = true;
    while changed {
        changed = false;

        for production in grammar.productions() {
            let head = &production.head;
            let current = first_sets.get(head).cloned().unwrap_or_default();

            let rhs_first = first_of_string(&first_sets, &production.rhs);

            if !rhs_first.is_subset(&current) {
                let merged: HashSet<Symbol> = current.union(&rhs_first).cloned().collect();
                first_sets.insert(head.clone(), merged);
                changed = true;
            }
        }
    }

    first_sets
}

/// FIRST of a sequence of symbols (spec.md §4.2): accumulate
/// `FIRST(Xi) \ {ε}` while each prefix is nullable; if every `Xi` is
/// nullable, include ε. Symbols not yet present in `first_sets` (a
/// terminal encountered only inside a lookahead position) contribute
/// `{themselves}`.
pub fn first_of_string(first_sets: &FirstSets, symbols: &[Symbol]) -> HashSet<Symbol> {
    let mut result = HashSet::new();
    let mut nullable_prefix = true;

    for symbol in symbols {
        if !nullable_prefix {
            break;
        }

        let first_of_symbol = match first_sets.get(symbol) {
            Some(set) => set.clone(),
            None => HashSet::from([symbol.clone()]),
        };

        for sym in &first_of_symbol {
            if !sym.is_epsilon() {
                result.insert(sym.clone());
            }
        }

        nullable_prefix = first_of_symbol.contains(&Symbol::epsilon());
    }

    if nullable_prefix {
        result.insert(Symbol::epsilon());
    }

    result
}

/// Computes FOLLOW(A) for every non-terminal by fixed-point iteration
/// (spec.md §4.3). Used only by the SLR(1) table builder.
pub fn compute_follow_sets(grammar: &Grammar, first_sets: &FirstSets) -> FollowSets {
    let mut follow_sets: FollowSets = HashMap::new();

    for nonterminal in grammar.nonterminals() {
        follow_sets.entry(nonterminal.clone()).or_default();
    }
    follow_sets
        .entry(grammar.augmented_start().clone())
        .or_default()
        .insert(Symbol::end_marker());

    let mut changed = true;
    while changed {
        changed = false;

        for production in grammar.productions() {
            let head = &production.head;
            let rhs = &production.rhs;

            for (i, symbol) in rhs.iter().enumerate() {
                if !symbol.is_nonterminal() {
                    continue;
                }

                let current = follow_sets.get(symbol).cloned().unwrap_or_default();
                let mut additions = HashSet::new();

                let beta = &rhs[i + 1..];
                let first_beta = first_of_string(first_sets, beta);

                for sym in &first_beta {
                    if !sym.is_epsilon() {
                        additions.insert(sym.clone());
                    }
                }

                if beta.is_empty() || first_beta.contains(&Symbol::epsilon()) {
                    if let Some(follow_head) = follow_sets.get(head) {
                        additions.extend(follow_head.iter().cloned());
                    }
                }

                if !additions.is_subset(&current) {
                    let merged: HashSet<Symbol> = current.union(&additions).cloned().collect();
                    follow_sets.insert(symbol.clone(), merged);
                    changed = true;
                }
            }
        }
    }

    follow_sets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Symbol as Sym;

    fn sym(s: &str) -> Sym {
        Sym::new(s)
    }

    fn grammar() -> Grammar {
        // S' -> S
        // S  -> S + T | T
        // T  -> a
        Grammar::augment(
            vec![
                (sym("S"), vec![vec![sym("S"), sym("+"), sym("T")], vec![sym("T")]]),
                (sym("T"), vec![vec![sym("a")]]),
            ],
            sym("S"),
        )
        .unwrap()
    }

    #[test]
    fn first_of_simple_grammar() {
        let grammar = grammar();
        let first = compute_first_sets(&grammar);
        assert_eq!(first[&sym("T")], HashSet::from([sym("a")]));
        assert_eq!(first[&sym("S")], HashSet::from([sym("a")]));
    }

    #[test]
    fn follow_of_simple_grammar() {
        let grammar = grammar();
        let first = compute_first_sets(&grammar);
        let follow = compute_follow_sets(&grammar, &first);
        assert!(follow[&sym("S")].contains(&Symbol::end_marker()));
        assert!(follow[&sym("S")].contains(&sym("+")));
        assert!(follow[&sym("T")].contains(&Symbol::end_marker()));
        assert!(follow[&sym("T")].contains(&sym("+")));
    }

    #[test]
    fn immediate_left_recursion_does_not_hang_and_computes_correct_first() {
        // S' -> S
        // S  -> S a | b
        let grammar = Grammar::augment(
            vec![(sym("S"), vec![vec![sym("S"), sym("a")], vec![sym("b")]])],
            sym("S"),
        )
        .unwrap();
        let first = compute_first_sets(&grammar);
        assert_eq!(first[&sym("S")], HashSet::from([sym("b")]));
    }

    #[test]
    fn first_of_string_with_all_nullable_prefix_includes_epsilon() {
        // A -> ε, B -> ε
        let grammar = Grammar::augment(
            vec![
                (sym("S"), vec![vec![sym("A"), sym("B")]]),
                (sym("A"), vec![vec![]]),
                (sym("B"), vec![vec![]]),
            ],
            sym("S"),
        )
        .unwrap();
        let first = compute_first_sets(&grammar);
        assert!(first[&sym("S")].contains(&Symbol::epsilon()));
        let seq_first = first_of_string(&first, &[sym("A"), sym("B")]);
        assert!(seq_first.contains(&Symbol::epsilon()));
    }

    #[test]
    fn first_of_string_stops_at_first_non_nullable_symbol() {
        let grammar = grammar();
        let first = compute_first_sets(&grammar);
        let seq_first = first_of_string(&first, &[sym("T"), sym("+"), sym("T")]);
        assert_eq!(seq_first, HashSet::from([sym("a")]));
    }
}
