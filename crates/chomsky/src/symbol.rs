//! Symbol identities and their allocator.

use crate::grammar::GrammarError;
use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TerminalID {
    raw: u16,
}
impl TerminalID {
    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    #[inline]
    pub const fn into_raw(self) -> u16 {
        self.raw
    }
}
impl fmt::Debug for TerminalID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T#{:03}", self.raw)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NonterminalID {
    raw: u16,
}
impl NonterminalID {
    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    #[inline]
    pub const fn into_raw(self) -> u16 {
        self.raw
    }
}
impl fmt::Debug for NonterminalID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N#{:03}", self.raw)
    }
}

/// A symbol occurring in the right-hand side of a rule.
///
/// The derived ordering puts every terminal before every nonterminal and
/// otherwise compares the raw ids; rule bodies are ordered with it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolID {
    T(TerminalID),
    N(NonterminalID),
}
impl SymbolID {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::T(..))
    }

    pub fn as_nonterminal(&self) -> Option<NonterminalID> {
        match self {
            Self::N(n) => Some(*n),
            Self::T(..) => None,
        }
    }
}
impl fmt::Debug for SymbolID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::T(t) => write!(f, "{:?}", t),
            Self::N(n) => write!(f, "{:?}", n),
        }
    }
}

/// The allocator of symbol ids used in a grammar.
///
/// Terminals and nonterminals are numbered by separate counters. Both only
/// grow; ids of deleted symbols are never handed out again, so an id always
/// refers to the symbol it was first issued for.
#[derive(Debug, Clone, Default)]
pub struct SymbolSpace {
    next_terminal: u16,
    next_nonterminal: u16,
}

impl SymbolSpace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh_terminal(&mut self) -> Result<TerminalID, GrammarError> {
        let id = TerminalID::from_raw(self.next_terminal);
        self.next_terminal = self
            .next_terminal
            .checked_add(1)
            .ok_or(GrammarError::SymbolSpaceExhausted)?;
        Ok(id)
    }

    pub fn fresh_nonterminal(&mut self) -> Result<NonterminalID, GrammarError> {
        let id = NonterminalID::from_raw(self.next_nonterminal);
        self.next_nonterminal = self
            .next_nonterminal
            .checked_add(1)
            .ok_or(GrammarError::SymbolSpaceExhausted)?;
        Ok(id)
    }
}
