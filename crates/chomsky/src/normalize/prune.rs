//! Removal of useless nonterminals.

use super::closure::{closure, Closure};
use crate::{
    grammar::Grammar,
    symbol::{NonterminalID, SymbolID},
    types::{Set, WorkList},
};
use bit_vec::BitVec;

/// Remove the nonterminals that derive no terminal string, along with every
/// rule mentioning them.
///
/// The start symbol is never removed. If it is not generating, it is left
/// without rules and the grammar describes the empty language.
pub(super) fn remove_nongenerating(g: &mut Grammar) {
    let generating = closure(g, Closure::Generating);
    if let Some(start) = g.position(g.start_symbol) {
        if !generating[start] {
            tracing::debug!("the start symbol generates no word; the language is empty");
        }
    }
    retain(g, &generating);
}

/// Remove the nonterminals that are not reachable from the start symbol.
pub(super) fn remove_unreachable(g: &mut Grammar) {
    let mut reachable = BitVec::from_elem(g.nonterminals.len(), false);
    let mut queue = WorkList::new(g.nonterminals.len());
    if let Some(start) = g.position(g.start_symbol) {
        queue.push(start);
    }
    while let Some(pos) = queue.pop() {
        if reachable[pos] {
            continue;
        }
        reachable.set(pos, true);

        let Some((_, n)) = g.nonterminals.get_index(pos) else {
            continue;
        };
        for symbol in n.rules.iter().flat_map(|rule| rule.right()) {
            if let Some(next) = symbol.as_nonterminal().and_then(|id| g.position(id)) {
                if !reachable[next] {
                    queue.push(next);
                }
            }
        }
    }
    retain(g, &reachable);
}

/// Keep the nonterminals whose positions are set in `keep` and the rules
/// that only mention kept nonterminals.
fn retain(g: &mut Grammar, keep: &BitVec) {
    let start = g.start_symbol;
    let alive: Set<NonterminalID> = g
        .nonterminals
        .keys()
        .enumerate()
        .filter_map(|(pos, &id)| keep[pos].then_some(id))
        .collect();

    let before = (g.nonterminals.len(), g.num_rules());
    g.nonterminals
        .retain(|id, _| *id == start || alive.contains(id));
    for (id, n) in g.nonterminals.iter_mut() {
        if !alive.contains(id) {
            n.rules.clear();
            continue;
        }
        n.rules.retain(|rule| {
            rule.right().iter().all(|symbol| match symbol {
                SymbolID::N(n) => alive.contains(n),
                SymbolID::T(..) => true,
            })
        });
    }

    tracing::trace!(
        "retain: {} -> {} nonterminals, {} -> {} rules",
        before.0,
        g.nonterminals.len(),
        before.1,
        g.num_rules()
    );
}
