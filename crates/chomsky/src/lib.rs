//! Chomsky normal form conversion and CYK recognition of context-free grammars.
//!
//! ```
//! use chomsky::{normalize, recognizes, Grammar};
//!
//! let grammar = Grammar::from_str("1 2 2\nS\na b\nS -> aSb\nS ->\n").unwrap();
//! let cnf = normalize(&grammar).unwrap();
//! assert!(recognizes(&cnf, "aabb"));
//! assert!(!recognizes(&cnf, "aab"));
//! ```

pub mod cyk;
pub mod grammar;
pub mod normalize;
pub mod symbol;
pub mod syntax;
pub mod types;

pub use crate::{
    cyk::{recognizes, Recognizer},
    grammar::{Grammar, GrammarDef, GrammarError},
    normalize::{normalize, CnfGrammar},
};
