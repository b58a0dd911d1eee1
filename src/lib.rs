//! LR table construction for context-free grammars.
//!
//! Given an already-structured, augmented grammar, this crate computes
//! FIRST/FOLLOW sets, builds the canonical LR(0)/LR(1) item-set
//! collections, merges LR(1) states into LALR(1) by core, builds
//! ACTION/GOTO tables for the SLR(1), CLR(1), and LALR(1) variants with
//! conflict detection, and drives a deterministic shift/reduce parse
//! against the resulting tables.

pub mod collection;
pub mod driver;
pub mod error;
pub mod first_follow;
pub mod grammar;
pub mod item;
pub mod lalr;
pub mod symbol;
pub mod tables;

pub use collection::{build_lr0_collection, build_lr1_collection, Collection};
pub use driver::{drive, drive_str, DriverErrorKind, ParseOutcome, TraceEvent};
pub use error::{GrammarError, MalformedGrammarReason, Result};
pub use first_follow::{compute_first_sets, compute_follow_sets, FirstSets, FollowSets};
pub use grammar::{Grammar, Production};
pub use item::{Lr0Item, Lr1Item};
pub use lalr::merge_lalr;
pub use symbol::Symbol;
pub use tables::{Action, ClrTables, LalrTables, ParseTables, SlrTables};

/// Builds SLR(1) tables directly from a grammar (spec.md §4.8).
pub fn build_slr(grammar: &Grammar) -> Result<SlrTables> {
    let first = compute_first_sets(grammar);
    let follow = compute_follow_sets(grammar, &first);
    let collection = build_lr0_collection(grammar);
    tables::build_slr_tables(grammar, collection, &follow)
}

/// Builds CLR(1) tables from the full canonical LR(1) collection
/// (spec.md §4.8).
pub fn build_clr(grammar: &Grammar) -> Result<ClrTables> {
    let first = compute_first_sets(grammar);
    let collection = build_lr1_collection(grammar, &first);
    tables::build_lr1_tables(grammar, collection)
}

/// Builds LALR(1) tables by merging the canonical LR(1) collection before
/// handing it to the shared LR(1) table builder. The pre-merge LR(1)
/// numbering is never exposed to callers.
pub fn build_lalr(grammar: &Grammar) -> Result<LalrTables> {
    let first = compute_first_sets(grammar);
    let collection = build_lr1_collection(grammar, &first);
    let merged = merge_lalr(&collection);
    tables::build_lr1_tables(grammar, merged)
}
