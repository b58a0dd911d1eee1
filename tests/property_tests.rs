//! Property-based checks for the invariants of spec.md §8 that hold for
//! any grammar satisfying §3, not just the worked examples. Grammars are
//! generated as random "chains" of binary operators over a single
//! terminal, which stays inside the SLR/LALR-expressible fragment while
//! still varying shape and depth.

use std::collections::BTreeSet;

use proptest::prelude::*;

use lr_tables::collection::{build_lr0_collection, closure0, goto0};
use lr_tables::{build_lalr, build_lr1_collection, compute_first_sets, drive, merge_lalr, Grammar, Symbol};

mod common;
use common::assert_rightmost_derivation;

fn sym(s: &str) -> Symbol {
    Symbol::new(s)
}

/// `S' -> S`, `S -> S <op> a | a`, parameterized by the operator symbol.
/// Left-recursive and unambiguous for any single operator symbol, unlike
/// the two-sided `S -> S op S` form which admits two parses per sentence.
fn chain_grammar(op: &str) -> Grammar {
    Grammar::augment(
        vec![(
            sym("S"),
            vec![vec![sym("S"), sym(op), sym("a")], vec![sym("a")]],
        )],
        sym("S"),
    )
    .unwrap()
}

fn chain_input(op: &str, operand_count: usize) -> Vec<Symbol> {
    let mut symbols = vec![sym("a")];
    for _ in 1..operand_count {
        symbols.push(sym(op));
        symbols.push(sym("a"));
    }
    symbols
}

proptest! {
    #[test]
    fn closure_is_idempotent_for_chain_grammars(op in "[+*/]") {
        let grammar = chain_grammar(&op);
        let start = BTreeSet::from([lr_tables::Lr0Item::initial(grammar.augmented_start_production())]);
        let once = closure0(&grammar, start);
        let twice = closure0(&grammar, once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn goto_result_is_always_closed(op in "[+*/]") {
        let grammar = chain_grammar(&op);
        let collection = build_lr0_collection(&grammar);
        for state in &collection.states {
            let mut symbols: BTreeSet<Symbol> = BTreeSet::new();
            for item in state {
                if let Some(symbol) = item.symbol_after_dot(&grammar) {
                    symbols.insert(symbol.clone());
                }
            }
            for symbol in symbols {
                let moved = goto0(&grammar, state, &symbol);
                prop_assert_eq!(closure0(&grammar, moved.clone()), moved);
            }
        }
    }

    #[test]
    fn lalr_cores_partition_the_lr1_cores_with_no_state_sharing_two_cores(op in "[+*/]") {
        let grammar = chain_grammar(&op);
        let first = compute_first_sets(&grammar);
        let lr1 = build_lr1_collection(&grammar, &first);
        let lalr = merge_lalr(&lr1);

        let mut seen = Vec::new();
        for state in &lalr.states {
            let core: BTreeSet<_> = state.iter().map(|item| item.core().clone()).collect();
            prop_assert!(!seen.contains(&core));
            seen.push(core);
        }
    }

    #[test]
    fn driver_is_deterministic_across_repeated_runs(op in "[+*/]", operand_count in 1usize..6) {
        let grammar = chain_grammar(&op);
        let tables = build_lalr(&grammar).unwrap();
        let input = chain_input(&op, operand_count);
        let first_run = drive(&tables, &input);
        let second_run = drive(&tables, &input);
        prop_assert_eq!(first_run.trace, second_run.trace);
        prop_assert!(first_run.accepted);
    }

    #[test]
    fn accepted_chains_reconstruct_to_a_rightmost_derivation(op in "[+*/]", operand_count in 1usize..6) {
        let grammar = chain_grammar(&op);
        let tables = build_lalr(&grammar).unwrap();
        let input = chain_input(&op, operand_count);
        let outcome = drive(&tables, &input);
        prop_assert!(outcome.accepted);
        assert_rightmost_derivation(&grammar, &outcome, &input);
    }
}
