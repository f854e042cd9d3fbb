//! Replacement of terminals occurring in rules of length two or more.

use crate::{
    grammar::{Grammar, GrammarError, Nonterminal, NonterminalKind, Rule},
    symbol::{NonterminalID, SymbolID, TerminalID},
    types::Map,
};

/// Substitute every terminal inside a rule of length ≥ 2 with a fresh
/// nonterminal whose only rule produces that terminal.
///
/// One nonterminal is synthesized per distinct terminal. Rules of length one
/// keep their terminal.
pub(super) fn isolate_terminals(g: &mut Grammar) -> Result<(), GrammarError> {
    let mut wrappers: Map<TerminalID, NonterminalID> = Map::default();

    for n in g.nonterminals.values_mut() {
        for rule in &mut n.rules {
            if rule.len() < 2 {
                continue;
            }
            for symbol in rule.right_mut() {
                let SymbolID::T(t) = *symbol else {
                    continue;
                };
                let wrapper = match wrappers.get(&t) {
                    Some(&wrapper) => wrapper,
                    None => {
                        let wrapper = g.symbols.fresh_nonterminal()?;
                        wrappers.insert(t, wrapper);
                        wrapper
                    }
                };
                *symbol = SymbolID::N(wrapper);
            }
        }
    }

    tracing::debug!("isolated {} terminals", wrappers.len());
    for (t, wrapper) in wrappers {
        g.nonterminals.insert(
            wrapper,
            Nonterminal::new(NonterminalKind::Terminal(t), vec![Rule::new([SymbolID::T(t)])]),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    #[test]
    fn terminals_are_isolated_once() {
        let mut g = Grammar::define(|g| {
            let s = g.nonterminal('S')?;
            g.terminal('a')?;
            g.terminal('b')?;
            g.start_symbol(s)?;
            g.rule_str('S', "aSa")?;
            g.rule_str('S', "ab")?;
            g.rule_str('S', "b")
        })
        .unwrap();
        isolate_terminals(&mut g).unwrap();

        assert_eq!(g.nonterminals().count(), 3);
        for (id, n) in g.nonterminals() {
            for rule in n.rules() {
                if rule.len() >= 2 {
                    assert!(!rule.right().iter().any(SymbolID::is_terminal));
                } else if id == g.start_symbol() {
                    assert!(rule.right()[0].is_terminal());
                }
            }
        }
        let dumped = g.to_string();
        assert!(dumped.contains("- S -> <a> S <a>"), "{}", dumped);
        assert!(dumped.contains("- S -> <a> <b>"), "{}", dumped);
        assert!(dumped.contains("- S -> b"), "{}", dumped);
        assert!(dumped.contains("- <a> -> a"), "{}", dumped);
    }
}
