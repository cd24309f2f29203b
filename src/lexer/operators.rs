use std::collections::{BTreeMap, HashSet};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref DEFAULT_OPERATORS: Vec<&'static str> = vec![
        "(", ")", "[", "]", "+", "-", "*", "/", "^", "%", "?", ":", ",", "<", "<=", ">", ">=",
        "==", "!=", "!", "&&", "||", ".",
    ];
}

/// The operator spellings a tokenizer accepts.
///
/// Keeps the first and last characters of every registered multi-character
/// operator so the lexer knows how greedily to consume operator runs.
#[derive(Debug, Clone)]
pub struct OperatorSet {
    operators: BTreeMap<String, bool>,
    prefixes: HashSet<char>,
    suffixes: HashSet<char>,
}

impl Default for OperatorSet {
    fn default() -> Self {
        let mut set = OperatorSet {
            operators: BTreeMap::new(),
            prefixes: HashSet::new(),
            suffixes: HashSet::new(),
        };
        set.update(DEFAULT_OPERATORS.iter().map(|op| (*op, true)));
        set
    }
}

impl OperatorSet {
    /// Merges `overrides` into the set and rebuilds the prefix/suffix indexes.
    ///
    /// `true` allows an operator, `false` disallows it. Disallowed entries stay
    /// registered, so their characters keep taking part in greedy matching.
    pub fn update<I, K>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (K, bool)>,
        K: Into<String>,
    {
        for (operator, allowed) in overrides {
            self.operators.insert(operator.into(), allowed);
        }

        self.prefixes.clear();
        self.suffixes.clear();
        for operator in self.operators.keys() {
            if operator.chars().count() > 1 {
                if let Some(first) = operator.chars().next() {
                    self.prefixes.insert(first);
                }
                if let Some(last) = operator.chars().last() {
                    self.suffixes.insert(last);
                }
            }
        }
    }

    pub fn is_allowed(&self, operator: &str) -> bool {
        self.operators.get(operator).copied().unwrap_or(false)
    }

    pub fn is_prefix(&self, c: char) -> bool {
        self.prefixes.contains(&c)
    }

    pub fn is_suffix(&self, c: char) -> bool {
        self.suffixes.contains(&c)
    }
}
