//! Symbol types and utilities for context-free grammars.
//!
//! This module defines the core [`Symbol`] type and the classifier that
//! all higher layers share: a symbol is a non-terminal iff its first
//! character is uppercase, or it is the augmented-start name `S'`.
//! Everything else is a terminal. `$` and `ε` are reserved sentinels that
//! never appear on a production's right-hand side.

use std::fmt;
use std::rc::Rc;

/// The end-of-input sentinel.
pub const END_MARKER: &str = "$";
/// The empty-string marker used inside FIRST sets.
pub const EPSILON: &str = "\u{03b5}";
/// The synthetic augmented start non-terminal.
pub const AUGMENTED_START: &str = "S'";

/// A symbol in a context-free grammar: an interned name plus the rules to
/// classify it.
///
/// # Grammar Conventions
/// - Nonterminals: first character uppercase, or the literal `S'`.
/// - Terminals: everything else (lowercase identifiers, punctuation, digits).
/// - Epsilon: the reserved name `ε`, used only inside FIRST sets.
/// - EndMarker: the reserved name `$`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Rc<str>);

impl Symbol {
    /// Interns `name` as a symbol. Cloning a `Symbol` is a refcount bump.
    pub fn new(name: impl AsRef<str>) -> Self {
        Symbol(Rc::from(name.as_ref()))
    }

    /// The end-of-input sentinel `$`.
    pub fn end_marker() -> Self {
        Symbol::new(END_MARKER)
    }

    /// The empty-string marker `ε`.
    pub fn epsilon() -> Self {
        Symbol::new(EPSILON)
    }

    /// The synthetic augmented start symbol `S'`.
    pub fn augmented_start() -> Self {
        Symbol::new(AUGMENTED_START)
    }

    /// The symbol's interned name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Checks if this symbol is a nonterminal.
    ///
    /// Total, constant-time: first-character-uppercase, or the literal
    /// augmented-start exception.
    pub fn is_nonterminal(&self) -> bool {
        self.0.as_ref() == AUGMENTED_START
            || self.0.chars().next().is_some_and(|c| c.is_uppercase())
    }

    /// Checks if this symbol is a terminal (everything that is not a
    /// nonterminal and not one of the two reserved sentinels).
    pub fn is_terminal(&self) -> bool {
        !self.is_nonterminal() && !self.is_epsilon() && !self.is_end_marker()
    }

    /// Checks if this symbol is epsilon (ε).
    pub fn is_epsilon(&self) -> bool {
        self.0.as_ref() == EPSILON
    }

    /// Checks if this symbol is the end marker ($).
    pub fn is_end_marker(&self) -> bool {
        self.0.as_ref() == END_MARKER
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Symbol::new(name)
    }
}

/// Converts a string into a vector of single-character terminal/nonterminal
/// symbols. Convenience for the single-character worked examples in
/// spec.md §8; multi-character terminals require pre-tokenization by the
/// caller (spec.md §6).
pub fn string_to_symbols(s: &str) -> Vec<Symbol> {
    s.chars().map(|c| Symbol::new(c.to_string())).collect()
}

/// Converts a slice of symbols back into a string, for single-character
/// symbols only.
pub fn symbols_to_string(symbols: &[Symbol]) -> String {
    symbols.iter().map(|s| s.to_string()).collect()
}
