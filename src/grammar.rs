//! Grammar model for context-free grammars (spec.md §3, §4.10).
//!
//! A [`Grammar`] is a mapping from non-terminal head to an ordered,
//! possibly-repeated sequence of [`Production`]s, each an ordered sequence
//! of [`Symbol`]s. The grammar is always *augmented*: it carries exactly
//! one production headed `S'` whose single right-hand-side symbol is the
//! user's start symbol.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::debug;

use crate::error::{GrammarError, MalformedGrammarReason, Result};
use crate::symbol::Symbol;

/// A production rule `head -> rhs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Production {
    pub head: Symbol,
    pub rhs: Vec<Symbol>,
}

impl Production {
    pub fn new(head: Symbol, rhs: Vec<Symbol>) -> Self {
        Self { head, rhs }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rhs.is_empty() {
            write!(f, "{} -> {}", self.head, crate::symbol::EPSILON)
        } else {
            write!(f, "{} -> ", self.head)?;
            for (i, sym) in self.rhs.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", sym)?;
            }
            Ok(())
        }
    }
}

/// An augmented context-free grammar.
///
/// Productions are stored in a flat, insertion-ordered vector plus an
/// index from head to the production indices for that head, preserving
/// the caller-supplied order (spec.md §3: "an ordered, possibly repeated
/// sequence of productions").
#[derive(Debug, Clone)]
pub struct Grammar {
    productions: Vec<Production>,
    by_head: HashMap<Symbol, Vec<usize>>,
    nonterminals: HashSet<Symbol>,
    terminals: HashSet<Symbol>,
    start_symbol: Symbol,
    augmented_start: Symbol,
}

impl Grammar {
    /// Builds an augmented grammar from a user grammar (head -> ordered
    /// list of RHS alternatives) plus the chosen start symbol, prepending
    /// the synthetic `S' -> start` production (spec.md §4.10).
    ///
    /// This is a pure data transform over an already-structured grammar
    /// value, not grammar-text parsing: the front-end that turns
    /// `A -> x | y z` source text into `rules` remains an external
    /// collaborator (spec.md §1).
    pub fn augment(mut rules: Vec<(Symbol, Vec<Vec<Symbol>>)>, start: Symbol) -> Result<Self> {
        let augmented_start = Symbol::augmented_start();
        rules.insert(0, (augmented_start, vec![vec![start]]));
        Self::from_rules(rules)
    }

    /// Builds a grammar from an already-augmented rule list, validating
    /// the invariants of spec.md §3: exactly one `S'` head with exactly
    /// one single-symbol production, every right-hand-side nonterminal
    /// has its own entry, and neither `$` nor `ε` appears in any RHS.
    pub fn from_rules(rules: Vec<(Symbol, Vec<Vec<Symbol>>)>) -> Result<Self> {
        let augmented_start = Symbol::augmented_start();

        let mut productions = Vec::new();
        let mut by_head: HashMap<Symbol, Vec<usize>> = HashMap::new();
        let mut nonterminals: HashSet<Symbol> = HashSet::new();
        let mut terminals: HashSet<Symbol> = HashSet::new();

        for (head, alternatives) in &rules {
            nonterminals.insert(head.clone());
            for rhs in alternatives {
                for sym in rhs {
                    if sym.is_end_marker() || sym.is_epsilon() {
                        return Err(GrammarError::MalformedGrammar(
                            MalformedGrammarReason::ReservedSymbolInRhs(sym.clone()),
                        ));
                    }
                    if sym.is_terminal() {
                        terminals.insert(sym.clone());
                    }
                }
                let index = productions.len();
                productions.push(Production::new(head.clone(), rhs.clone()));
                by_head.entry(head.clone()).or_default().push(index);
            }
        }

        let start_productions =
            by_head
                .get(&augmented_start)
                .ok_or(GrammarError::MalformedGrammar(
                    MalformedGrammarReason::MissingAugmentedStart,
                ))?;
        if start_productions.len() != 1 {
            return Err(GrammarError::MalformedGrammar(
                MalformedGrammarReason::AugmentedStartArity(start_productions.len()),
            ));
        }
        let start_rhs = &productions[start_productions[0]].rhs;
        if start_rhs.len() != 1 {
            return Err(GrammarError::MalformedGrammar(
                MalformedGrammarReason::AugmentedStartArity(start_rhs.len()),
            ));
        }
        let start_symbol = start_rhs[0].clone();

        // Every nonterminal referenced on a RHS must also be a head.
        for prod in &productions {
            for sym in &prod.rhs {
                if sym.is_nonterminal() && !by_head.contains_key(sym) {
                    return Err(GrammarError::MalformedGrammar(
                        MalformedGrammarReason::UnreferencedNonterminal(sym.clone()),
                    ));
                }
            }
        }

        debug!(
            productions = productions.len(),
            nonterminals = nonterminals.len(),
            terminals = terminals.len(),
            "grammar validated"
        );

        Ok(Self {
            productions,
            by_head,
            nonterminals,
            terminals,
            start_symbol,
            augmented_start,
        })
    }

    /// All productions in caller-supplied order.
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn production(&self, index: usize) -> &Production {
        &self.productions[index]
    }

    /// Indices (in `productions()` order) of the productions headed `nt`.
    pub fn production_indices(&self, nt: &Symbol) -> &[usize] {
        self.by_head.get(nt).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn nonterminals(&self) -> &HashSet<Symbol> {
        &self.nonterminals
    }

    pub fn terminals(&self) -> &HashSet<Symbol> {
        &self.terminals
    }

    /// The user's start symbol `S` (not the augmented `S'`).
    pub fn start_symbol(&self) -> &Symbol {
        &self.start_symbol
    }

    /// The synthetic augmented start symbol `S'`.
    pub fn augmented_start(&self) -> &Symbol {
        &self.augmented_start
    }

    /// The index of the sole `S' -> S` production.
    pub fn augmented_start_production(&self) -> usize {
        self.by_head[&self.augmented_start][0]
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for prod in &self.productions {
            writeln!(f, "{}", prod)?;
        }
        Ok(())
    }
}
