//! Error types for grammar construction.
//!
//! Construction errors (§7) are fatal: no partial [`crate::tables::ParseTables`]
//! is ever returned. Driver errors are a different thing entirely — they
//! terminate one parse, not the tables — and are represented as
//! [`crate::driver::TraceEvent::Error`] inside the driver's trace rather
//! than as a variant here.

use thiserror::Error;

use crate::symbol::Symbol;

/// Why a grammar failed the augmentation/reference invariants of spec.md §3.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedGrammarReason {
    #[error("grammar has no augmented start symbol S'")]
    MissingAugmentedStart,

    #[error("augmented start production must rewrite to exactly one symbol, got {0}")]
    AugmentedStartArity(usize),

    #[error("nonterminal `{0}` is referenced on a right-hand side but has no productions")]
    UnreferencedNonterminal(Symbol),

    #[error("reserved symbol `{0}` may not appear in a production's right-hand side")]
    ReservedSymbolInRhs(Symbol),
}

/// Errors raised while building a grammar or a parse table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("malformed grammar: {0}")]
    MalformedGrammar(#[from] MalformedGrammarReason),

    #[error("conflict in state {state} on symbol `{symbol}`: existing action {existing}, candidate action {candidate}")]
    Conflict {
        state: usize,
        symbol: Symbol,
        existing: String,
        candidate: String,
    },
}

/// Type alias for `Result`s returned by grammar/table construction.
pub type Result<T> = std::result::Result<T, GrammarError>;
