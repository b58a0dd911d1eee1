//! Deterministic shift/reduce driver (spec.md §4.9).
//!
//! Runs a single parse against an already-built [`ParseTables`], producing
//! a trace of every shift, reduce, and accept — or the first failure. A
//! failed parse does not mutate or invalidate the tables: they're `&`
//! borrowed throughout and can drive another parse immediately after.

use tracing::trace;

use crate::symbol::Symbol;
use crate::tables::{Action, ParseTables};

/// One step recorded while driving a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Shift { state: usize, symbol: Symbol },
    Reduce { head: Symbol, rhs: Vec<Symbol> },
    Accept,
    Error { state: usize, symbol: Symbol, kind: DriverErrorKind },
}

/// Why the driver stopped short of accept (spec.md §4.9 "Error").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverErrorKind {
    /// No ACTION entry for this `(state, symbol)` pair.
    NoAction,
    /// A reduce popped to a state with no GOTO entry for the reduced head.
    NoGoto(Symbol),
}

/// The result of driving one input through the tables: whether it was
/// accepted, and the full trace leading up to either `Accept` or the
/// terminal `Error` event.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub accepted: bool,
    pub trace: Vec<TraceEvent>,
}

/// Drives `input` through `tables`, stopping at the first `Accept` or
/// error. `input` must not itself contain the end marker — it is appended
/// automatically (spec.md §4.9).
pub fn drive<Item: Ord + Clone>(tables: &ParseTables<Item>, input: &[Symbol]) -> ParseOutcome {
    let mut buffer: Vec<Symbol> = input.to_vec();
    buffer.push(Symbol::end_marker());

    let mut state_stack: Vec<usize> = vec![0];
    let mut cursor = 0;
    let mut trace_events = Vec::new();

    loop {
        let state = *state_stack.last().expect("state stack is never empty");
        let lookahead = &buffer[cursor];

        match tables.action.get(&(state, lookahead.clone())) {
            Some(Action::Shift(next)) => {
                trace!(state, %lookahead, next, "shift");
                trace_events.push(TraceEvent::Shift {
                    state: *next,
                    symbol: lookahead.clone(),
                });
                state_stack.push(*next);
                cursor += 1;
            }
            Some(Action::Reduce(head, rhs)) => {
                let head = head.clone();
                let rhs = rhs.clone();
                trace!(state, head = %head, len = rhs.len(), "reduce");
                for _ in 0..rhs.len() {
                    state_stack.pop();
                }
                let uncovered = *state_stack.last().expect("state stack is never empty");
                match tables.goto.get(&(uncovered, head.clone())) {
                    Some(&next) => {
                        state_stack.push(next);
                        trace_events.push(TraceEvent::Reduce { head, rhs });
                    }
                    None => {
                        let event = TraceEvent::Error {
                            state: uncovered,
                            symbol: head.clone(),
                            kind: DriverErrorKind::NoGoto(head),
                        };
                        trace_events.push(event);
                        return ParseOutcome {
                            accepted: false,
                            trace: trace_events,
                        };
                    }
                }
            }
            Some(Action::Accept) => {
                trace_events.push(TraceEvent::Accept);
                return ParseOutcome {
                    accepted: true,
                    trace: trace_events,
                };
            }
            None => {
                let event = TraceEvent::Error {
                    state,
                    symbol: lookahead.clone(),
                    kind: DriverErrorKind::NoAction,
                };
                trace_events.push(event);
                return ParseOutcome {
                    accepted: false,
                    trace: trace_events,
                };
            }
        }
    }
}

/// Convenience entry point for the single-character worked examples of
/// spec.md §8: tokenizes `input` one character per symbol before driving.
pub fn drive_str<Item: Ord + Clone>(tables: &ParseTables<Item>, input: &str) -> ParseOutcome {
    drive(tables, &crate::symbol::string_to_symbols(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::build_lr0_collection;
    use crate::first_follow::{compute_first_sets, compute_follow_sets};
    use crate::grammar::Grammar;
    use crate::symbol::Symbol as Sym;
    use crate::tables::build_slr_tables;

    fn sym(s: &str) -> Sym {
        Sym::new(s)
    }

    // S' -> S
    // S  -> S A | S B | a
    // A  -> S +
    // B  -> S -
    fn plus_minus_grammar() -> Grammar {
        Grammar::augment(
            vec![
                (
                    sym("S"),
                    vec![
                        vec![sym("S"), sym("A")],
                        vec![sym("S"), sym("B")],
                        vec![sym("a")],
                    ],
                ),
                (sym("A"), vec![vec![sym("S"), sym("+")]]),
                (sym("B"), vec![vec![sym("S"), sym("-")]]),
            ],
            sym("S"),
        )
        .unwrap()
    }

    fn build(grammar: &Grammar) -> crate::tables::SlrTables {
        let first = compute_first_sets(grammar);
        let follow = compute_follow_sets(grammar, &first);
        let collection = build_lr0_collection(grammar);
        build_slr_tables(grammar, collection, &follow).unwrap()
    }

    #[test]
    fn accepts_homogeneous_plus_sequence() {
        let grammar = plus_minus_grammar();
        let tables = build(&grammar);
        let outcome = drive_str(&tables, "aaaa+++");
        assert!(outcome.accepted);
        assert!(matches!(outcome.trace.last(), Some(TraceEvent::Accept)));

        let reduces: Vec<&TraceEvent> = outcome
            .trace
            .iter()
            .filter(|event| matches!(event, TraceEvent::Reduce { .. }))
            .collect();
        let s_from_a = reduces
            .iter()
            .filter(|event| matches!(event, TraceEvent::Reduce { head, rhs } if head.name() == "S" && rhs.len() == 1))
            .count();
        assert_eq!(s_from_a, 4);
    }

    #[test]
    fn rejects_empty_input() {
        let grammar = plus_minus_grammar();
        let tables = build(&grammar);
        let outcome = drive_str(&tables, "");
        assert!(!outcome.accepted);
    }

    #[test]
    fn rejects_input_with_unknown_terminal() {
        let grammar = plus_minus_grammar();
        let tables = build(&grammar);
        let outcome = drive_str(&tables, "b");
        assert!(!outcome.accepted);
        assert!(matches!(
            outcome.trace.last(),
            Some(TraceEvent::Error {
                kind: DriverErrorKind::NoAction,
                ..
            })
        ));
    }

    #[test]
    fn a_failed_parse_does_not_prevent_a_later_successful_one() {
        let grammar = plus_minus_grammar();
        let tables = build(&grammar);
        let rejected = drive_str(&tables, "b");
        assert!(!rejected.accepted);
        let accepted = drive_str(&tables, "a");
        assert!(accepted.accepted);
    }
}
