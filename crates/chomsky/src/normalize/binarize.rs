//! Splitting of rules longer than two symbols.

use crate::{
    grammar::{Grammar, GrammarError, Nonterminal, NonterminalKind, Rule},
    symbol::{NonterminalID, SymbolID},
};

/// Rewrite every rule `A -> X1 X2 ... Xk` with `k ≥ 3` into the chain
/// `A -> X1 N1`, `N1 -> X2 N2`, ..., `N(k-2) -> X(k-1) Xk`.
///
/// The links of a chain are private to the rule they were made from.
pub(super) fn binarize(g: &mut Grammar) -> Result<(), GrammarError> {
    let mut links: Vec<(NonterminalID, Rule)> = vec![];

    for n in g.nonterminals.values_mut() {
        for rule in &mut n.rules {
            let right = rule.right().to_vec();
            let k = right.len();
            if k < 3 {
                continue;
            }

            let mut ids = Vec::with_capacity(k - 2);
            for _ in 0..k - 2 {
                ids.push(g.symbols.fresh_nonterminal()?);
            }

            *rule = Rule::new([right[0], SymbolID::N(ids[0])]);
            for (i, &id) in ids.iter().enumerate() {
                let tail = match ids.get(i + 1) {
                    Some(&next) => SymbolID::N(next),
                    None => right[k - 1],
                };
                links.push((id, Rule::new([right[i + 1], tail])));
            }
        }
    }

    tracing::debug!("introduced {} chain links", links.len());
    for (id, rule) in links {
        g.nonterminals
            .insert(id, Nonterminal::new(NonterminalKind::Fresh, vec![rule]));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{examples, Grammar};

    #[test]
    fn long_rule_becomes_chain() {
        let mut g = Grammar::define(examples::long_rule).unwrap();
        binarize(&mut g).unwrap();

        assert_eq!(g.nonterminals().count(), 3);
        assert_eq!(g.num_rules(), 3);
        for (_, n) in g.nonterminals() {
            for rule in n.rules() {
                assert_eq!(rule.len(), 2);
            }
        }

        // walk the chain and collect the leading symbols.
        let mut word = String::new();
        let mut current = g.start_symbol();
        loop {
            let rule = &g.rules(current)[0];
            word.push_str(&g.display_symbol(rule.right()[0]).to_string());
            match rule.right()[1] {
                SymbolID::N(next) => current = next,
                last => {
                    word.push_str(&g.display_symbol(last).to_string());
                    break;
                }
            }
        }
        assert_eq!(word, "abcd");
    }

    #[test]
    fn short_rules_pass_through() {
        let mut g = Grammar::define(examples::mixed_rule).unwrap();
        binarize(&mut g).unwrap();
        assert_eq!(g.nonterminals().count(), 2);
        assert_eq!(g.num_rules(), 2);
    }
}
