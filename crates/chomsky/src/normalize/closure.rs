//! Fixed points of "derives something" properties over the nonterminal
//! dependency graph.

use crate::{grammar::Grammar, symbol::SymbolID, types::WorkList};
use bit_vec::BitVec;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) enum Closure {
    /// The nonterminal derives some terminal string.
    Generating,
    /// The nonterminal derives the empty string.
    Nullable,
}

/// Compute the set of nonterminal positions having the specified property.
///
/// Each rule keeps the number of its nonterminal occurrences that are not yet
/// known to have the property; the owner of a rule whose count drops to zero
/// is marked. A rule that can never be satisfied (one mentioning a terminal,
/// when computing nullables) is not tracked at all. Every nonterminal is
/// marked at most once, so the computation is linear in the grammar size and
/// terminates on cyclic grammars.
pub(super) fn closure(g: &Grammar, kind: Closure) -> BitVec {
    let len = g.nonterminals.len();
    let mut marked = BitVec::from_elem(len, false);

    let mut owners: Vec<usize> = vec![];
    let mut pending: Vec<usize> = vec![];
    let mut occurrences: Vec<Vec<usize>> = vec![vec![]; len];
    let mut queue = WorkList::new(len);

    for (owner, (_, n)) in g.nonterminals.iter().enumerate() {
        'rules: for rule in &n.rules {
            if kind == Closure::Nullable && rule.right().iter().any(SymbolID::is_terminal) {
                continue;
            }

            let mut positions = Vec::with_capacity(rule.len());
            for symbol in rule.right() {
                if let SymbolID::N(id) = symbol {
                    match g.position(*id) {
                        Some(pos) => positions.push(pos),
                        // the rule refers to a deleted nonterminal.
                        None => continue 'rules,
                    }
                }
            }

            let index = owners.len();
            owners.push(owner);
            pending.push(positions.len());
            for pos in positions {
                occurrences[pos].push(index);
            }
            if pending[index] == 0 {
                queue.push(owner);
            }
        }
    }

    while let Some(pos) = queue.pop() {
        if marked[pos] {
            continue;
        }
        marked.set(pos, true);
        for &index in &occurrences[pos] {
            pending[index] -= 1;
            if pending[index] == 0 && !marked[owners[index]] {
                queue.push(owners[index]);
            }
        }
    }

    marked
}
