//! Syntax support for the textual grammar and word list formats.
//!
//! A grammar file looks like the following:
//!
//! ```text
//! 3 2 5
//! S A B
//! a b
//! S -> AB
//! S ->
//! A -> a
//! B -> b
//! B -> bB
//! S
//! ```
//!
//! The first line holds the number of nonterminals, terminals and rules,
//! followed by the declared nonterminals, the declared terminals and one line
//! per rule. An empty body denotes an epsilon rule. The last line names the
//! start symbol and may be omitted, in which case `S` is used.

use crate::grammar::GrammarError;
use std::iter::Peekable;

/// The start symbol used when a grammar file does not name one.
pub const DEFAULT_START: char = 'S';

#[derive(Debug)]
pub struct Source {
    pub nonterminals: Vec<char>,
    pub terminals: Vec<char>,
    pub rules: Vec<RuleSource>,
    pub start: char,
}

#[derive(Debug)]
pub struct RuleSource {
    pub left: char,
    pub body: String,
}

fn syntax_error(line: usize, msg: impl Into<String>) -> GrammarError {
    GrammarError::Syntax {
        line,
        msg: msg.into(),
    }
}

struct Lines<'a> {
    inner: Peekable<std::iter::Enumerate<std::str::Lines<'a>>>,
    last: usize,
}

impl<'a> Lines<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            inner: source.lines().enumerate().peekable(),
            last: 0,
        }
    }

    /// Fetch the next line, including blank ones.
    fn next_raw(&mut self) -> Option<(usize, &'a str)> {
        let (i, line) = self.inner.next()?;
        self.last = i + 1;
        Some((i + 1, line))
    }

    /// Fetch the next non-blank line.
    fn next_filled(&mut self) -> Option<(usize, &'a str)> {
        while let Some((line, text)) = self.next_raw() {
            if !text.trim().is_empty() {
                return Some((line, text));
            }
        }
        None
    }
}

pub fn parse(source: &str) -> Result<Source, GrammarError> {
    let span = tracing::trace_span!("parse");
    let _entered = span.enter();

    let mut lines = Lines::new(source);

    let (line, header) = lines
        .next_filled()
        .ok_or_else(|| syntax_error(1, "missing header line"))?;
    let counts = header
        .split_whitespace()
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| syntax_error(line, format!("invalid count `{}'", s)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let [num_nonterminals, num_terminals, num_rules] = counts[..] else {
        return Err(syntax_error(
            line,
            "the header must consist of three integers",
        ));
    };
    tracing::trace!(
        "header: {} nonterminals, {} terminals, {} rules",
        num_nonterminals,
        num_terminals,
        num_rules
    );

    let nonterminals = parse_symbols(&mut lines, num_nonterminals, "nonterminal")?;
    let terminals = parse_symbols(&mut lines, num_terminals, "terminal")?;

    let mut rules = vec![];
    for _ in 0..num_rules {
        let (line, text) = lines
            .next_filled()
            .ok_or_else(|| syntax_error(lines.last, "missing rule line"))?;
        rules.push(parse_rule(line, text)?);
    }

    let start = match lines.next_filled() {
        Some((line, text)) => single_char(line, text.trim(), "start symbol")?,
        None => DEFAULT_START,
    };

    if let Some((line, _)) = lines.next_filled() {
        return Err(syntax_error(line, "unexpected trailing line"));
    }

    Ok(Source {
        nonterminals,
        terminals,
        rules,
        start,
    })
}

fn parse_symbols(
    lines: &mut Lines<'_>,
    count: usize,
    what: &str,
) -> Result<Vec<char>, GrammarError> {
    if count == 0 {
        return Ok(vec![]);
    }
    let (line, text) = lines
        .next_filled()
        .ok_or_else(|| syntax_error(lines.last, format!("missing {} declarations", what)))?;
    let symbols = text
        .split_whitespace()
        .map(|token| single_char(line, token, what))
        .collect::<Result<Vec<_>, _>>()?;
    if symbols.len() != count {
        return Err(syntax_error(
            line,
            format!("expected {} {}s, found {}", count, what, symbols.len()),
        ));
    }
    Ok(symbols)
}

fn single_char(line: usize, token: &str, what: &str) -> Result<char, GrammarError> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(syntax_error(
            line,
            format!("a {} must be a single character, found `{}'", what, token),
        )),
    }
}

// `"A -> body"` or `"A - body"`
fn parse_rule(line: usize, text: &str) -> Result<RuleSource, GrammarError> {
    let text = text.trim_start();
    let mut chars = text.chars();
    let left = chars
        .next()
        .ok_or_else(|| syntax_error(line, "missing left-hand side"))?;
    let rest = chars.as_str().trim_start();
    let Some(rest) = rest.strip_prefix('-') else {
        return Err(syntax_error(line, "expected `->' after the left-hand side"));
    };
    let body = rest.strip_prefix('>').unwrap_or(rest);
    Ok(RuleSource {
        left,
        body: body.chars().filter(|c| !c.is_whitespace()).collect(),
    })
}

/// Parse a word list: a count followed by that many lines, one word per line.
pub fn parse_words(source: &str) -> Result<Vec<String>, GrammarError> {
    let mut lines = Lines::new(source);
    let (line, header) = lines
        .next_filled()
        .ok_or_else(|| syntax_error(1, "missing word count"))?;
    let count: usize = header
        .trim()
        .parse()
        .map_err(|_| syntax_error(line, format!("invalid word count `{}'", header.trim())))?;

    let mut words = vec![];
    for _ in 0..count {
        let (_, text) = lines.next_raw().ok_or_else(|| {
            syntax_error(
                lines.last,
                format!("expected {} words, found {}", count, words.len()),
            )
        })?;
        words.push(text.trim().to_owned());
    }
    Ok(words)
}
