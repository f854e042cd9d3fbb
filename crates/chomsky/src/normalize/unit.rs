//! Elimination of unit rules `A -> B`.

use super::digraph::strongly_connected_components;
use crate::grammar::{Grammar, Rule};

/// Replace the unit rules by the rules they eventually lead to.
///
/// Nonterminals on a cycle of unit rules derive each other and end up with
/// the same rule set. The components of the unit graph are resolved in
/// reverse topological order, so the rule set of every component reachable
/// through a unit rule is final when it is merged. Merged rule sets are
/// sorted and deduplicated.
pub(super) fn remove_unit_rules(g: &mut Grammar) {
    let edges: Vec<Vec<usize>> = g
        .nonterminals
        .values()
        .map(|n| {
            n.rules
                .iter()
                .filter_map(Rule::as_unit)
                .filter_map(|id| g.position(id))
                .collect()
        })
        .collect();
    let own_rules: Vec<Vec<Rule>> = g
        .nonterminals
        .values()
        .map(|n| {
            n.rules
                .iter()
                .filter(|rule| rule.as_unit().is_none())
                .cloned()
                .collect()
        })
        .collect();

    let components = strongly_connected_components(&edges);
    let mut component_of = vec![0; edges.len()];
    for (c, members) in components.iter().enumerate() {
        for &m in members {
            component_of[m] = c;
        }
    }

    let mut resolved: Vec<Vec<Rule>> = Vec::with_capacity(components.len());
    for (c, members) in components.iter().enumerate() {
        let mut successors: Vec<usize> = members
            .iter()
            .flat_map(|&m| edges[m].iter().map(|&to| component_of[to]))
            .filter(|&d| d != c)
            .collect();
        successors.sort_unstable();
        successors.dedup();

        let mut rules: Vec<Rule> = members
            .iter()
            .flat_map(|&m| own_rules[m].iter().cloned())
            .collect();
        for d in successors {
            debug_assert!(d < c, "components must be visited in reverse topological order");
            rules.extend(resolved[d].iter().cloned());
        }
        rules.sort();
        rules.dedup();
        resolved.push(rules);
    }

    tracing::debug!(
        "{} unit graph components over {} nonterminals",
        components.len(),
        edges.len()
    );
    for (pos, n) in g.nonterminals.values_mut().enumerate() {
        n.rules = resolved[component_of[pos]].clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{grammar::examples, symbol::SymbolID};

    #[test]
    fn unit_cycle_shares_rules() {
        let mut g = Grammar::define(examples::unit_cycle).unwrap();
        remove_unit_rules(&mut g);

        let x = g.terminal_of('x').unwrap();
        for (_, n) in g.nonterminals() {
            assert_eq!(n.rules(), [Rule::new([SymbolID::T(x)])]);
        }
    }

    #[test]
    fn transitive_units_are_resolved() {
        // A -> B, B -> C, C -> c | A A, B -> b
        let mut g = Grammar::define(|g| {
            let a = g.nonterminal('A')?;
            g.nonterminal('B')?;
            g.nonterminal('C')?;
            g.terminal('b')?;
            g.terminal('c')?;
            g.start_symbol(a)?;
            g.rule_str('A', "B")?;
            g.rule_str('B', "C")?;
            g.rule_str('B', "b")?;
            g.rule_str('C', "c")?;
            g.rule_str('C', "AA")
        })
        .unwrap();
        remove_unit_rules(&mut g);

        let count = |c: char| {
            g.nonterminals()
                .find(|(id, _)| g.display_nonterminal(*id).to_string() == c.to_string())
                .map(|(_, n)| n.rules().len())
                .unwrap()
        };
        assert_eq!(count('A'), 3);
        assert_eq!(count('B'), 3);
        assert_eq!(count('C'), 2);
        assert!(g
            .nonterminals()
            .all(|(_, n)| n.rules().iter().all(|rule| rule.as_unit().is_none())));
    }
}
