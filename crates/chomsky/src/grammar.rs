//! Grammar types.

use crate::{
    symbol::{NonterminalID, SymbolID, SymbolSpace, TerminalID},
    syntax,
    types::Map,
};
use std::{fmt, fs, io, path::Path};

/// The right-hand side of a production rule.
///
/// Rules are ordered element-wise by symbol identity, and a rule that is a
/// prefix of another one is ordered first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rule {
    right: Vec<SymbolID>,
}

impl Rule {
    pub fn new<I>(right: I) -> Self
    where
        I: IntoIterator<Item = SymbolID>,
    {
        Self {
            right: right.into_iter().collect(),
        }
    }

    pub fn epsilon() -> Self {
        Self { right: vec![] }
    }

    pub fn right(&self) -> &[SymbolID] {
        &self.right[..]
    }

    pub(crate) fn right_mut(&mut self) -> &mut [SymbolID] {
        &mut self.right[..]
    }

    pub fn len(&self) -> usize {
        self.right.len()
    }

    pub fn is_epsilon(&self) -> bool {
        self.right.is_empty()
    }

    /// Return the right-hand side if this rule has the form `A -> B`.
    pub fn as_unit(&self) -> Option<NonterminalID> {
        match self.right() {
            [symbol] => symbol.as_nonterminal(),
            _ => None,
        }
    }

    // `"LHS -> R1 R2 R3"`
    pub fn display<'g>(&'g self, left: NonterminalID, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_with(move |f| {
            write!(f, "{} ->", g.display_nonterminal(left))?;
            if self.right.is_empty() {
                return f.write_str(" ε");
            }
            for symbol in &self.right {
                write!(f, " {}", g.display_symbol(*symbol))?;
            }
            Ok(())
        })
    }
}

/// How a nonterminal came into the grammar.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NonterminalKind {
    /// Declared in the grammar definition.
    Named(char),
    /// Stands for a single terminal inside a longer rule.
    Terminal(TerminalID),
    /// A link of a binarized rule chain.
    Fresh,
    /// The start symbol introduced when the language contains the empty word.
    Start,
}

#[derive(Debug, Clone)]
pub struct Nonterminal {
    pub(crate) kind: NonterminalKind,
    pub(crate) rules: Vec<Rule>,
}

impl Nonterminal {
    pub(crate) fn new(kind: NonterminalKind, rules: Vec<Rule>) -> Self {
        Self { kind, rules }
    }

    pub fn kind(&self) -> NonterminalKind {
        self.kind
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules[..]
    }
}

/// A context-free grammar over single-character terminals.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub(crate) symbols: SymbolSpace,
    pub(crate) terminals: Map<TerminalID, char>,
    pub(crate) nonterminals: Map<NonterminalID, Nonterminal>,
    pub(crate) start_symbol: NonterminalID,
}

impl Grammar {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Grammar, GrammarError> {
        let source = fs::read_to_string(path).map_err(GrammarError::IO)?;
        Self::from_str(&source)
    }

    pub fn from_str(source: &str) -> Result<Grammar, GrammarError> {
        let source = syntax::parse(source)?;
        Grammar::define(|g| define_grammar_from_syntax(g, source))
    }

    /// Define a grammar using the specified function.
    pub fn define<F>(f: F) -> Result<Self, GrammarError>
    where
        F: FnOnce(&mut GrammarDef) -> Result<(), GrammarError>,
    {
        let mut def = GrammarDef {
            symbols: SymbolSpace::new(),
            terminals: Map::default(),
            nonterminals: Map::default(),
            start: None,
        };
        f(&mut def)?;
        def.end()
    }

    pub fn start_symbol(&self) -> NonterminalID {
        self.start_symbol
    }

    pub fn terminals(&self) -> impl Iterator<Item = (TerminalID, char)> + '_ {
        self.terminals.iter().map(|(&id, &c)| (id, c))
    }

    pub fn nonterminals(&self) -> impl Iterator<Item = (NonterminalID, &Nonterminal)> + '_ {
        self.nonterminals.iter().map(|(&id, n)| (id, n))
    }

    pub fn nonterminal(&self, id: NonterminalID) -> Option<&Nonterminal> {
        self.nonterminals.get(&id)
    }

    /// Return the rules of the specified nonterminal, or an empty slice if it is unknown.
    pub fn rules(&self, id: NonterminalID) -> &[Rule] {
        match self.nonterminals.get(&id) {
            Some(n) => n.rules(),
            None => &[],
        }
    }

    pub fn num_rules(&self) -> usize {
        self.nonterminals.values().map(|n| n.rules.len()).sum()
    }

    /// Look up the terminal id of the specified character.
    pub fn terminal_of(&self, c: char) -> Option<TerminalID> {
        self.terminals
            .iter()
            .find_map(|(&id, &ch)| (ch == c).then_some(id))
    }

    /// The position of a nonterminal in the current dense numbering.
    ///
    /// Positions are invalidated by every pass that inserts or deletes nonterminals.
    pub(crate) fn position(&self, id: NonterminalID) -> Option<usize> {
        self.nonterminals.get_index_of(&id)
    }

    /// Return whether every rule is either `A -> a`, `A -> B C`, or `S -> ε`
    /// on a start symbol `S` that occurs in no right-hand side.
    pub fn is_cnf(&self) -> bool {
        let start_has_epsilon = self.rules(self.start_symbol).iter().any(Rule::is_epsilon);
        self.nonterminals.iter().all(|(&id, n)| {
            n.rules.iter().all(|rule| match rule.right() {
                [] => id == self.start_symbol,
                [SymbolID::T(..)] => true,
                [SymbolID::N(b), SymbolID::N(c)] => {
                    !start_has_epsilon || (*b != self.start_symbol && *c != self.start_symbol)
                }
                _ => false,
            })
        })
    }

    pub fn display_nonterminal(&self, id: NonterminalID) -> impl fmt::Display + '_ {
        display_with(move |f| match self.nonterminals.get(&id).map(|n| n.kind) {
            Some(NonterminalKind::Named(c)) => write!(f, "{}", c),
            Some(NonterminalKind::Terminal(t)) => match self.terminals.get(&t) {
                Some(c) => write!(f, "<{}>", c),
                None => write!(f, "<{:?}>", t),
            },
            Some(NonterminalKind::Start) => f.write_str("$start"),
            Some(NonterminalKind::Fresh) | None => write!(f, "{:?}", id),
        })
    }

    pub fn display_symbol(&self, symbol: SymbolID) -> impl fmt::Display + '_ {
        display_with(move |f| match symbol {
            SymbolID::T(t) => match self.terminals.get(&t) {
                Some(c) => write!(f, "{}", c),
                None => write!(f, "{:?}", t),
            },
            SymbolID::N(n) => write!(f, "{}", self.display_nonterminal(n)),
        })
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#### terminals: ")?;
        for (i, c) in self.terminals.values().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, "\n#### nonterminals: ")?;
        for (i, &id) in self.nonterminals.keys().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", self.display_nonterminal(id))?;
            if id == self.start_symbol {
                f.write_str(" (start)")?;
            }
        }
        writeln!(f, "\n#### rules:")?;
        for (&id, n) in &self.nonterminals {
            for rule in &n.rules {
                writeln!(f, "- {}", rule.display(id, self))?;
            }
        }
        Ok(())
    }
}

/// Turn a formatting closure into a `Display` value.
fn display_with<F>(f: F) -> impl fmt::Display
where
    F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result,
{
    struct DisplayWith<F>(F);
    impl<F> fmt::Display for DisplayWith<F>
    where
        F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result,
    {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            (self.0)(f)
        }
    }
    DisplayWith(f)
}

fn define_grammar_from_syntax(
    g: &mut GrammarDef,
    source: syntax::Source,
) -> Result<(), GrammarError> {
    for &c in &source.nonterminals {
        g.nonterminal(c)?;
    }
    for &c in &source.terminals {
        g.terminal(c)?;
    }
    for rule in &source.rules {
        g.rule_str(rule.left, &rule.body)?;
    }
    let start = g
        .symbol(source.start)
        .and_then(|s| s.as_nonterminal())
        .ok_or_else(|| GrammarError::MissingStartSymbol(source.start.to_string()))?;
    g.start_symbol(start)
}

/// The contextural values for building a `Grammar`.
#[derive(Debug)]
pub struct GrammarDef {
    symbols: SymbolSpace,
    terminals: Map<TerminalID, char>,
    nonterminals: Map<NonterminalID, Nonterminal>,
    start: Option<NonterminalID>,
}

impl GrammarDef {
    /// Declare a terminal symbol used in this grammar.
    pub fn terminal(&mut self, c: char) -> Result<TerminalID, GrammarError> {
        match self.symbol(c) {
            Some(SymbolID::T(..)) => return Err(GrammarError::DuplicateTerminal(c)),
            Some(SymbolID::N(..)) => return Err(GrammarError::AmbiguousSymbol(c)),
            None => (),
        }
        let id = self.symbols.fresh_terminal()?;
        self.terminals.insert(id, c);
        Ok(id)
    }

    /// Declare a nonterminal symbol used in this grammar.
    pub fn nonterminal(&mut self, c: char) -> Result<NonterminalID, GrammarError> {
        match self.symbol(c) {
            Some(SymbolID::N(..)) => return Err(GrammarError::DuplicateNonterminal(c)),
            Some(SymbolID::T(..)) => return Err(GrammarError::AmbiguousSymbol(c)),
            None => (),
        }
        let id = self.symbols.fresh_nonterminal()?;
        self.nonterminals
            .insert(id, Nonterminal::new(NonterminalKind::Named(c), vec![]));
        Ok(id)
    }

    /// Look up a declared symbol by its character.
    pub fn symbol(&self, c: char) -> Option<SymbolID> {
        let terminal = self
            .terminals
            .iter()
            .find_map(|(&id, &ch)| (ch == c).then_some(SymbolID::T(id)));
        terminal.or_else(|| {
            self.nonterminals.iter().find_map(|(&id, n)| {
                (n.kind == NonterminalKind::Named(c)).then_some(SymbolID::N(id))
            })
        })
    }

    /// Specify a production rule into this grammar.
    ///
    /// A rule identical to an already specified one is ignored.
    pub fn rule<I>(&mut self, left: NonterminalID, right: I) -> Result<(), GrammarError>
    where
        I: IntoIterator<Item = SymbolID>,
    {
        let rule = Rule::new(right);
        for &symbol in rule.right() {
            let declared = match symbol {
                SymbolID::T(t) => self.terminals.contains_key(&t),
                SymbolID::N(n) => self.nonterminals.contains_key(&n),
            };
            if !declared {
                return Err(GrammarError::UnknownSymbol {
                    left: format!("{:?}", left),
                    symbol: format!("{:?}", symbol),
                });
            }
        }
        let nonterminal =
            self.nonterminals
                .get_mut(&left)
                .ok_or_else(|| GrammarError::UnknownSymbol {
                    left: format!("{:?}", left),
                    symbol: format!("{:?}", left),
                })?;
        if nonterminal.rules.contains(&rule) {
            tracing::trace!("skip duplicated rule for {:?}: {:?}", left, rule);
            return Ok(());
        }
        nonterminal.rules.push(rule);
        Ok(())
    }

    /// Specify a production rule whose symbols are given by their characters.
    pub fn rule_str(&mut self, left: char, body: &str) -> Result<(), GrammarError> {
        let unknown = |symbol: char| GrammarError::UnknownSymbol {
            left: format!("`{}'", left),
            symbol: format!("`{}'", symbol),
        };
        let left_id = self
            .symbol(left)
            .and_then(|s| s.as_nonterminal())
            .ok_or_else(|| unknown(left))?;
        let mut right = Vec::with_capacity(body.len());
        for c in body.chars().filter(|c| !c.is_whitespace()) {
            right.push(self.symbol(c).ok_or_else(|| unknown(c))?);
        }
        self.rule(left_id, right)
    }

    /// Specify the start symbol for this grammar.
    pub fn start_symbol(&mut self, symbol: NonterminalID) -> Result<(), GrammarError> {
        if !self.nonterminals.contains_key(&symbol) {
            return Err(GrammarError::MissingStartSymbol(format!("{:?}", symbol)));
        }
        self.start.replace(symbol);
        Ok(())
    }

    fn end(self) -> Result<Grammar, GrammarError> {
        let start_symbol = self
            .start
            .ok_or_else(|| GrammarError::MissingStartSymbol("<unspecified>".into()))?;
        Ok(Grammar {
            symbols: self.symbols,
            terminals: self.terminals,
            nonterminals: self.nonterminals,
            start_symbol,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("IO error: {}", _0)]
    IO(io::Error),

    #[error("Syntax error at line {}: {}", line, msg)]
    Syntax { line: usize, msg: String },

    #[error("The nonterminal `{}' is declared twice", _0)]
    DuplicateNonterminal(char),

    #[error("The terminal `{}' is declared twice", _0)]
    DuplicateTerminal(char),

    #[error("The symbol `{}' is declared as both a terminal and a nonterminal", _0)]
    AmbiguousSymbol(char),

    #[error("The start symbol {} is not a declared nonterminal", _0)]
    MissingStartSymbol(String),

    #[error("A rule of {} references the undeclared symbol {}", left, symbol)]
    UnknownSymbol { left: String, symbol: String },

    #[error("No more symbol ids are available")]
    SymbolSpaceExhausted,
}

/// Grammars used in tests and benchmarks.
pub mod examples {
    use super::*;

    /// `S -> A B | ε`, `A -> a | ε`, `B -> b | ε`
    pub fn epsilon_rules(g: &mut GrammarDef) -> Result<(), GrammarError> {
        let s = g.nonterminal('S')?;
        g.nonterminal('A')?;
        g.nonterminal('B')?;
        g.terminal('a')?;
        g.terminal('b')?;
        g.start_symbol(s)?;

        g.rule_str('S', "AB")?;
        g.rule_str('S', "")?;
        g.rule_str('A', "a")?;
        g.rule_str('A', "")?;
        g.rule_str('B', "b")?;
        g.rule_str('B', "")?;
        Ok(())
    }

    /// `A -> B`, `B -> A | x`
    pub fn unit_cycle(g: &mut GrammarDef) -> Result<(), GrammarError> {
        let a = g.nonterminal('A')?;
        g.nonterminal('B')?;
        g.terminal('x')?;
        g.start_symbol(a)?;

        g.rule_str('A', "B")?;
        g.rule_str('B', "A")?;
        g.rule_str('B', "x")?;
        Ok(())
    }

    /// `S -> a b c d`
    pub fn long_rule(g: &mut GrammarDef) -> Result<(), GrammarError> {
        let s = g.nonterminal('S')?;
        for c in ['a', 'b', 'c', 'd'] {
            g.terminal(c)?;
        }
        g.start_symbol(s)?;

        g.rule_str('S', "abcd")?;
        Ok(())
    }

    /// `S -> A b`, `A -> a`
    pub fn mixed_rule(g: &mut GrammarDef) -> Result<(), GrammarError> {
        let s = g.nonterminal('S')?;
        g.nonterminal('A')?;
        g.terminal('a')?;
        g.terminal('b')?;
        g.start_symbol(s)?;

        g.rule_str('S', "Ab")?;
        g.rule_str('A', "a")?;
        Ok(())
    }

    /// Palindromes over `{a, b}`, including the empty word.
    pub fn palindromes(g: &mut GrammarDef) -> Result<(), GrammarError> {
        let s = g.nonterminal('S')?;
        g.terminal('a')?;
        g.terminal('b')?;
        g.start_symbol(s)?;

        g.rule_str('S', "aSa")?;
        g.rule_str('S', "bSb")?;
        g.rule_str('S', "a")?;
        g.rule_str('S', "b")?;
        g.rule_str('S', "")?;
        Ok(())
    }

    /// Balanced parentheses: `S -> ( S ) S | ε`
    pub fn balanced_parens(g: &mut GrammarDef) -> Result<(), GrammarError> {
        let s = g.nonterminal('S')?;
        g.terminal('(')?;
        g.terminal(')')?;
        g.start_symbol(s)?;

        g.rule_str('S', "(S)S")?;
        g.rule_str('S', "")?;
        Ok(())
    }

    /// Arithmetic expressions over a single operand `x`.
    pub fn arithmetic(g: &mut GrammarDef) -> Result<(), GrammarError> {
        let e = g.nonterminal('E')?;
        g.nonterminal('T')?;
        g.nonterminal('F')?;
        for c in ['x', '+', '*', '(', ')'] {
            g.terminal(c)?;
        }
        g.start_symbol(e)?;

        g.rule_str('E', "E+T")?;
        g.rule_str('E', "T")?;
        g.rule_str('T', "T*F")?;
        g.rule_str('T', "F")?;
        g.rule_str('F', "(E)")?;
        g.rule_str('F', "x")?;
        Ok(())
    }
}
