//! Elimination of epsilon rules.

use super::closure::{closure, Closure};
use crate::{
    grammar::{Grammar, GrammarError, Nonterminal, NonterminalKind, Rule},
    symbol::SymbolID,
};

/// Remove every empty rule while preserving the language.
///
/// Expects every rule of length two to consist of nonterminals. For each such
/// rule `A -> B C`, `A -> C` is added when `B` is nullable and `A -> B` when
/// `C` is nullable; only the rules present before this pass are inspected.
/// If the start symbol is nullable, a new start symbol `S0` with the rules
/// `S0 -> S` and `S0 -> ε` replaces it.
pub(super) fn remove_epsilon_rules(g: &mut Grammar) -> Result<(), GrammarError> {
    let nullable = closure(g, Closure::Nullable);
    let is_nullable = |symbol: &SymbolID| {
        symbol
            .as_nonterminal()
            .and_then(|id| g.position(id))
            .map_or(false, |pos| nullable[pos])
    };

    let additions: Vec<Vec<Rule>> = g
        .nonterminals
        .iter()
        .map(|(&left, n)| {
            let mut added = vec![];
            for rule in &n.rules {
                let [b, c] = rule.right() else {
                    continue;
                };
                if is_nullable(b) {
                    added.push(*c);
                }
                if is_nullable(c) {
                    added.push(*b);
                }
            }
            added
                .into_iter()
                .filter(|symbol| *symbol != SymbolID::N(left))
                .map(|symbol| Rule::new([symbol]))
                .collect()
        })
        .collect();
    let start_nullable = g
        .position(g.start_symbol)
        .map_or(false, |pos| nullable[pos]);

    let mut num_added = 0;
    for (n, added) in g.nonterminals.values_mut().zip(additions) {
        for rule in added {
            if !n.rules.contains(&rule) {
                n.rules.push(rule);
                num_added += 1;
            }
        }
        n.rules.retain(|rule| !rule.is_epsilon());
    }
    tracing::debug!(
        "{} nullable nonterminals, {} rules added",
        nullable.iter().filter(|b| *b).count(),
        num_added
    );

    if start_nullable {
        let start = g.symbols.fresh_nonterminal()?;
        let rules = vec![Rule::new([SymbolID::N(g.start_symbol)]), Rule::epsilon()];
        g.nonterminals
            .insert(start, Nonterminal::new(NonterminalKind::Start, rules));
        g.start_symbol = start;
        tracing::debug!("the language contains the empty word; introduced a new start symbol");
    }

    Ok(())
}
