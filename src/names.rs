//! Variable name ledger: `foo`, `foo1`, `foo2`, ... per base name.
//!
//! A suffixed name can clash with another base (`foo` + `1` vs a type named
//! `Foo1`); such candidates are skipped so every name is issued once.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct NameLedger {
    used: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl NameLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, base: &str) -> String {
        loop {
            let count = self.used.entry(base.to_string()).or_insert(0);
            let candidate = match *count {
                0 => base.to_string(),
                n => format!("{base}{n}"),
            };
            *count += 1;
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}
