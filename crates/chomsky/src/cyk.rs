//! The Cocke-Younger-Kasami membership test.

use crate::{normalize::CnfGrammar, symbol::SymbolID, types::Map};
use bit_set::BitSet;

/// Return whether the grammar derives the specified word.
pub fn recognizes(grammar: &CnfGrammar, word: &str) -> bool {
    Recognizer::new(grammar).recognizes(word)
}

#[derive(Debug, Copy, Clone)]
struct BinaryRule {
    left: usize,
    first: usize,
    second: usize,
}

/// A membership tester prepared from a grammar in Chomsky normal form.
///
/// Nonterminals are referred to by their positions in the grammar, and each
/// cell of the parse table is a bit set over those positions.
#[derive(Debug)]
pub struct Recognizer {
    producers: Map<char, BitSet>,
    binary_rules: Vec<BinaryRule>,
    start: Option<usize>,
    accepts_empty: bool,
}

impl Recognizer {
    pub fn new(grammar: &CnfGrammar) -> Self {
        let g = grammar.as_grammar();
        let mut producers: Map<char, BitSet> = Map::default();
        let mut binary_rules = vec![];

        for (left, (_, n)) in g.nonterminals().enumerate() {
            for rule in n.rules() {
                match rule.right() {
                    [SymbolID::T(t)] => {
                        if let Some(&c) = g.terminals.get(t) {
                            producers.entry(c).or_default().insert(left);
                        }
                    }
                    [SymbolID::N(b), SymbolID::N(c)] => {
                        if let (Some(first), Some(second)) = (g.position(*b), g.position(*c)) {
                            binary_rules.push(BinaryRule {
                                left,
                                first,
                                second,
                            });
                        }
                    }
                    _ => (),
                }
            }
        }

        let start = g.position(g.start_symbol());
        let accepts_empty = g.rules(g.start_symbol()).iter().any(|rule| rule.is_epsilon());

        Self {
            producers,
            binary_rules,
            start,
            accepts_empty,
        }
    }

    pub fn recognizes(&self, word: &str) -> bool {
        let word: Vec<char> = word.chars().collect();
        let n = word.len();
        if n == 0 {
            return self.accepts_empty;
        }
        let Some(start) = self.start else {
            return false;
        };

        let mut table = ParseTable::new(n);
        for (i, c) in word.iter().enumerate() {
            match self.producers.get(c) {
                Some(producers) => *table.cell_mut(i, 1) = producers.clone(),
                None => {
                    tracing::trace!("no rule produces {:?} at {}", c, i);
                    return false;
                }
            }
        }

        for span in 2..=n {
            for i in 0..=n - span {
                let mut cell = BitSet::new();
                for split in 1..span {
                    let first = table.cell(i, split);
                    let second = table.cell(i + split, span - split);
                    if first.is_empty() || second.is_empty() {
                        continue;
                    }
                    for rule in &self.binary_rules {
                        if first.contains(rule.first) && second.contains(rule.second) {
                            cell.insert(rule.left);
                        }
                    }
                }
                *table.cell_mut(i, span) = cell;
            }
        }

        table.cell(0, n).contains(start)
    }

    /// Test each word in order.
    pub fn recognize_all<I>(&self, words: I) -> Vec<bool>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        words
            .into_iter()
            .map(|word| self.recognizes(word.as_ref()))
            .collect()
    }
}

/// The triangular table of the nonterminals deriving each substring.
///
/// The cell `(i, span)` holds the nonterminals deriving the `span` characters
/// starting at offset `i`; cells are stored row by row in increasing span.
#[derive(Debug)]
struct ParseTable {
    len: usize,
    cells: Vec<BitSet>,
}

impl ParseTable {
    fn new(len: usize) -> Self {
        Self {
            len,
            cells: vec![BitSet::new(); len * (len + 1) / 2],
        }
    }

    fn offset(&self, i: usize, span: usize) -> usize {
        debug_assert!(span >= 1 && i + span <= self.len);
        // number of cells in the rows of span 1..span-1
        let rows = span - 1;
        rows * (self.len + 1) - rows * (rows + 1) / 2 + i
    }

    fn cell(&self, i: usize, span: usize) -> &BitSet {
        &self.cells[self.offset(i, span)]
    }

    fn cell_mut(&mut self, i: usize, span: usize) -> &mut BitSet {
        let offset = self.offset(i, span);
        &mut self.cells[offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        grammar::{examples, Grammar, GrammarDef, GrammarError},
        normalize::normalize,
    };

    fn recognizer(define: fn(&mut GrammarDef) -> Result<(), GrammarError>) -> Recognizer {
        let grammar = Grammar::define(define).unwrap();
        Recognizer::new(&normalize(&grammar).unwrap())
    }

    #[test]
    fn table_offsets_are_dense() {
        let table = ParseTable::new(4);
        let mut seen = vec![];
        for span in 1..=4 {
            for i in 0..=4 - span {
                seen.push(table.offset(i, span));
            }
        }
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn epsilon_rules() {
        let r = recognizer(examples::epsilon_rules);
        assert_eq!(
            r.recognize_all(["", "a", "b", "ab", "ba", "aa", "abb"]),
            [true, true, true, true, false, false, false]
        );
    }

    #[test]
    fn unit_cycle() {
        let r = recognizer(examples::unit_cycle);
        assert!(r.recognizes("x"));
        assert!(!r.recognizes("xx"));
        assert!(!r.recognizes(""));
    }

    #[test]
    fn long_rule() {
        let r = recognizer(examples::long_rule);
        assert!(r.recognizes("abcd"));
        for word in ["abc", "bcd", "abdc", "dcba", "abcda", "", "a"] {
            assert!(!r.recognizes(word), "{:?}", word);
        }
    }

    #[test]
    fn mixed_rule() {
        let r = recognizer(examples::mixed_rule);
        assert!(r.recognizes("ab"));
        assert!(!r.recognizes("a"));
        assert!(!r.recognizes("ba"));
    }

    #[test]
    fn unknown_characters_are_rejected() {
        let r = recognizer(examples::palindromes);
        assert!(r.recognizes("abba"));
        assert!(!r.recognizes("abza"));
        assert!(!r.recognizes("🦀"));
    }

    #[test]
    fn arithmetic() {
        let r = recognizer(examples::arithmetic);
        assert_eq!(
            r.recognize_all(["x", "x+x*x", "(x+x)*x", "x+", "()", "((x))"]),
            [true, true, true, false, false, true]
        );
    }
}
