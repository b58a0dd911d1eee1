//! Shared test helper: reconstructing a rightmost derivation from a
//! driver trace (spec.md §8 invariant 9).

use lr_tables::{Grammar, ParseOutcome, Symbol, TraceEvent};

/// Replays `outcome`'s `Reduce` events in reverse to rebuild the rightmost
/// derivation `S ⇒ ... ⇒ input` (spec.md §8 invariant 9): each reduce
/// popped `rhs` off the top of the parser's symbol stack and pushed
/// `head`, which is exactly a reverse rightmost-derivation step, and a
/// reduce's popped span is always the rightmost part of the stack (the
/// remaining input to its right is all-terminal), so undoing the reduces
/// from last to first and expanding `head` back into `rhs` at its
/// rightmost occurrence reconstructs a genuine rightmost derivation.
///
/// Panics if any reduce does not name an actual grammar production, if a
/// reduce's head does not occur in the form being expanded, or if the
/// fully-expanded derivation does not equal `input`.
pub fn assert_rightmost_derivation(grammar: &Grammar, outcome: &ParseOutcome, input: &[Symbol]) {
    assert!(outcome.accepted, "derivation check requires an accepted parse");

    let reduces: Vec<(Symbol, Vec<Symbol>)> = outcome
        .trace
        .iter()
        .filter_map(|event| match event {
            TraceEvent::Reduce { head, rhs } => Some((head.clone(), rhs.clone())),
            _ => None,
        })
        .collect();

    let mut form = vec![grammar.start_symbol().clone()];

    for (head, rhs) in reduces.iter().rev() {
        let is_real_production = grammar
            .production_indices(head)
            .iter()
            .any(|&index| grammar.production(index).rhs == *rhs);
        assert!(
            is_real_production,
            "reduce step `{head} -> {rhs:?}` is not a production of the grammar"
        );

        let position = form.iter().rposition(|symbol| symbol == head).unwrap_or_else(|| {
            panic!("derivation step expands `{head}` but it does not occur in `{form:?}`")
        });
        form.splice(position..=position, rhs.iter().cloned());
    }

    assert_eq!(
        form, input,
        "reconstructed rightmost derivation does not terminate at the parsed input"
    );
}
