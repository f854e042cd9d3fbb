//! Randomized checks of the normalization against a direct derivation oracle.

use chomsky::{grammar::Grammar, normalize, symbol::SymbolID, GrammarDef, GrammarError, Recognizer};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashSet;

const NONTERMINALS: [char; 4] = ['S', 'A', 'B', 'C'];
const TERMINALS: [char; 2] = ['a', 'b'];

/// Generate a small grammar with arbitrary epsilon rules, unit rules, cycles
/// and useless symbols.
fn random_grammar(rng: &mut StdRng) -> Grammar {
    let num_nonterminals = rng.gen_range(1..=NONTERMINALS.len());
    let mut rules = vec![];
    for &left in &NONTERMINALS[..num_nonterminals] {
        for _ in 0..rng.gen_range(1..=3) {
            let len = rng.gen_range(0..=4);
            let body: String = (0..len)
                .map(|_| {
                    if rng.gen_bool(0.4) {
                        TERMINALS[rng.gen_range(0..TERMINALS.len())]
                    } else {
                        NONTERMINALS[rng.gen_range(0..num_nonterminals)]
                    }
                })
                .collect();
            rules.push((left, body));
        }
    }

    let define = |g: &mut GrammarDef| -> Result<(), GrammarError> {
        let start = g.nonterminal(NONTERMINALS[0])?;
        for &c in &NONTERMINALS[1..num_nonterminals] {
            g.nonterminal(c)?;
        }
        for &c in &TERMINALS {
            g.terminal(c)?;
        }
        for (left, body) in &rules {
            g.rule_str(*left, body)?;
        }
        g.start_symbol(start)
    };
    Grammar::define(define).unwrap()
}

enum Symbol {
    T(char),
    N(usize),
}

/// Compute the table `derives[a][i][j]` stating whether the nonterminal at
/// position `a` derives `word[i..j]`, without any normalization.
///
/// Cells are filled by increasing span length. A cell only depends on cells
/// of shorter spans and on cells of the same span itself (via epsilon and
/// unit derivations), so the latter are iterated to a fixed point.
fn derivation_table(grammar: &Grammar, word: &[char]) -> Vec<Vec<Vec<bool>>> {
    let ids: Vec<_> = grammar.nonterminals().map(|(id, _)| id).collect();
    let chars: Vec<_> = grammar.terminals().collect();
    let rules: Vec<(usize, Vec<Symbol>)> = grammar
        .nonterminals()
        .enumerate()
        .flat_map(|(a, (_, n))| n.rules().iter().map(move |rule| (a, rule)))
        .map(|(a, rule)| {
            let body = rule
                .right()
                .iter()
                .map(|symbol| match symbol {
                    SymbolID::T(t) => {
                        Symbol::T(chars.iter().find(|(id, _)| id == t).unwrap().1)
                    }
                    SymbolID::N(n) => Symbol::N(ids.iter().position(|id| id == n).unwrap()),
                })
                .collect();
            (a, body)
        })
        .collect();

    let n = word.len();
    let mut derives = vec![vec![vec![false; n + 1]; n + 1]; ids.len()];
    for len in 0..=n {
        for i in 0..=n - len {
            let j = i + len;
            loop {
                let mut changed = false;
                for (a, body) in &rules {
                    if !derives[*a][i][j] && matches_span(body, word, &derives, i, j) {
                        derives[*a][i][j] = true;
                        changed = true;
                    }
                }
                if !changed {
                    break;
                }
            }
        }
    }
    derives
}

fn matches_span(
    body: &[Symbol],
    word: &[char],
    derives: &[Vec<Vec<bool>>],
    i: usize,
    j: usize,
) -> bool {
    let mut ends = vec![false; j + 1];
    ends[i] = true;
    for symbol in body {
        let mut next = vec![false; j + 1];
        for p in (i..=j).filter(|&p| ends[p]) {
            match *symbol {
                Symbol::T(c) => {
                    if p < j && word[p] == c {
                        next[p + 1] = true;
                    }
                }
                Symbol::N(b) => {
                    for q in p..=j {
                        if derives[b][p][q] {
                            next[q] = true;
                        }
                    }
                }
            }
        }
        ends = next;
    }
    ends[j]
}

fn words_of_length(len: usize) -> impl Iterator<Item = Vec<char>> {
    (0..1usize << len).map(move |bits| {
        (0..len)
            .map(|k| TERMINALS[(bits >> k) & 1])
            .collect()
    })
}

#[test]
fn normalized_grammars_are_cnf() {
    let mut rng = StdRng::seed_from_u64(0xc4f);
    for _ in 0..200 {
        let grammar = random_grammar(&mut rng);
        let cnf = normalize(&grammar).unwrap();
        assert!(cnf.is_cnf(), "input:\n{}\noutput:\n{}", grammar, cnf);
        assert!(cnf.nonterminal(cnf.start_symbol()).is_some());
    }
}

#[test]
fn normalization_preserves_language() {
    const MAX_LEN: usize = 8;

    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..12 {
        let grammar = random_grammar(&mut rng);
        let cnf = normalize(&grammar).unwrap();
        let recognizer = Recognizer::new(&cnf);
        let start = grammar
            .nonterminals()
            .position(|(id, _)| id == grammar.start_symbol())
            .unwrap();

        // every shorter word occurs as a substring of some word of the maximum length.
        let mut checked = HashSet::new();
        for word in words_of_length(MAX_LEN) {
            let derives = derivation_table(&grammar, &word);
            for i in 0..=MAX_LEN {
                for j in i..=MAX_LEN {
                    let sub: String = word[i..j].iter().collect();
                    if !checked.insert(sub.clone()) {
                        continue;
                    }
                    assert_eq!(
                        recognizer.recognizes(&sub),
                        derives[start][i][j],
                        "word {:?}\ninput:\n{}\noutput:\n{}",
                        sub,
                        grammar,
                        cnf
                    );
                }
            }
        }
        assert_eq!(checked.len(), (1 << (MAX_LEN + 1)) - 1);
    }
}

#[test]
fn normalization_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(0x1de);
    for _ in 0..50 {
        let grammar = random_grammar(&mut rng);
        let once = normalize(&grammar).unwrap();
        let twice = normalize(once.as_grammar()).unwrap();
        assert!(twice.is_cnf());

        let (r1, r2) = (Recognizer::new(&once), Recognizer::new(&twice));
        for len in 0..=6 {
            for word in words_of_length(len) {
                let word: String = word.into_iter().collect();
                assert_eq!(r1.recognizes(&word), r2.recognizes(&word), "{:?}", word);
            }
        }
    }
}
