//! Conversion of context-free grammars into Chomsky normal form.

mod binarize;
mod closure;
pub mod digraph;
mod epsilon;
mod isolate;
mod prune;
mod unit;

use crate::grammar::{Grammar, GrammarError};
use std::{fmt, ops::Deref};

/// A grammar in Chomsky normal form.
///
/// Every rule is `A -> a`, `A -> B C`, or `S -> ε` on the start symbol `S`,
/// which then occurs in no right-hand side. Values of this type are only
/// produced by [`normalize`].
#[derive(Debug, Clone)]
pub struct CnfGrammar {
    grammar: Grammar,
}

impl CnfGrammar {
    pub fn as_grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn into_grammar(self) -> Grammar {
        self.grammar
    }
}

impl Deref for CnfGrammar {
    type Target = Grammar;

    fn deref(&self) -> &Self::Target {
        &self.grammar
    }
}

impl fmt::Display for CnfGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.grammar, f)
    }
}

/// Convert the specified grammar into an equivalent grammar in Chomsky normal form.
///
/// The input grammar is left untouched; all rewriting happens on a copy.
pub fn normalize(grammar: &Grammar) -> Result<CnfGrammar, GrammarError> {
    let span = tracing::debug_span!("normalize");
    let _entered = span.enter();

    let mut g = grammar.clone();
    trace_stage("input", &g);

    prune::remove_nongenerating(&mut g);
    prune::remove_unreachable(&mut g);
    trace_stage("prune", &g);

    isolate::isolate_terminals(&mut g)?;
    trace_stage("isolate_terminals", &g);

    binarize::binarize(&mut g)?;
    trace_stage("binarize", &g);

    // Epsilon elimination produces unit rules from binary rules with a
    // nullable operand, so it has to run before the unit rules are removed.
    epsilon::remove_epsilon_rules(&mut g)?;
    trace_stage("remove_epsilon_rules", &g);

    unit::remove_unit_rules(&mut g);
    trace_stage("remove_unit_rules", &g);

    prune::remove_nongenerating(&mut g);
    prune::remove_unreachable(&mut g);
    trace_stage("prune", &g);

    debug_assert!(g.is_cnf(), "not in Chomsky normal form:\n{}", g);
    tracing::debug!(
        "normalized: {} nonterminals, {} rules",
        g.nonterminals.len(),
        g.num_rules()
    );

    Ok(CnfGrammar { grammar: g })
}

fn trace_stage(stage: &str, g: &Grammar) {
    tracing::trace!(
        "{}: {} nonterminals, {} rules\n{}",
        stage,
        g.nonterminals.len(),
        g.num_rules(),
        g
    );
}
