//! Value Strategy Registry: literal expressions for simple values.
//!
//! A type is simple when a strategy is registered under its name or when it
//! is an enum in the catalogue. Enums always render their first declared
//! member; every other kind draws from the [`ValueContext`] RNG.
//!
//! Timestamps come from a single "current generated instant" kept in the
//! context. Each timestamp request moves it by a random signed delta, so
//! dates across nested objects differ while staying reproducible per seed.
use std::fmt::Write;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::Catalog;
use crate::error::ErrorKind;
use crate::ir::{self, TypeDef};

const TEXT_LEN: usize = 5;
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Exclusive bound of the timestamp step, in milliseconds.
pub const MAX_INSTANT_STEP_MS: i64 = 1_000_000_000;

// ————————————————————————————————————————————————————————————————————————————
// CONTEXT
// ————————————————————————————————————————————————————————————————————————————

/// Random source and clock shared by every strategy of one generator.
pub struct ValueContext {
    rng: StdRng,
    instant: DateTime<Utc>,
}

impl ValueContext {
    pub fn new(seed: u64, start: DateTime<Utc>) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), instant: start }
    }

    /// Reproducible context: the clock starts at a fixed anchor.
    pub fn seeded(seed: u64) -> Self {
        Self::new(seed, anchor_instant())
    }

    /// Context seeded from the wall clock, starting at the current time.
    pub fn from_wall_clock() -> Self {
        let now = Utc::now();
        let seed = now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp()) as u64;
        Self::new(seed, now)
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn current_instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// Advance the clock by a random step in (-MAX, MAX) ms and return it.
    pub fn next_instant(&mut self) -> DateTime<Utc> {
        let step = self.rng.gen_range(-(MAX_INSTANT_STEP_MS - 1)..MAX_INSTANT_STEP_MS);
        self.instant = self
            .instant
            .checked_add_signed(TimeDelta::milliseconds(step))
            .unwrap_or(self.instant);
        self.instant
    }
}

pub fn anchor_instant() -> DateTime<Utc> {
    Utc.timestamp_opt(1_577_836_800, 0).single().unwrap_or_default() // 2020-01-01T00:00:00Z
}

// ————————————————————————————————————————————————————————————————————————————
// REGISTRY
// ————————————————————————————————————————————————————————————————————————————

pub trait ValueStrategy {
    fn literal(&self, ctx: &mut ValueContext) -> String;
}

impl<F> ValueStrategy for F
where
    F: Fn(&mut ValueContext) -> String,
{
    fn literal(&self, ctx: &mut ValueContext) -> String {
        self(ctx)
    }
}

pub struct Registry {
    strategies: IndexMap<String, Box<dyn ValueStrategy>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.strategies.keys()).finish()
    }
}

impl Registry {
    pub fn empty() -> Self {
        Self { strategies: IndexMap::new() }
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry
            .register("UUID", uuid_literal)
            .register("String", text_literal)
            .register("Integer", int_literal)
            .register("int", int_literal)
            .register("Long", long_literal)
            .register("long", long_literal)
            .register("Date", date_literal)
            .register("Boolean", bool_literal)
            .register("boolean", bool_literal)
            .register("Double", double_literal)
            .register("double", double_literal);
        registry
    }

    /// Add a simple kind, replacing any strategy already under `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        strategy: impl ValueStrategy + 'static,
    ) -> &mut Self {
        self.strategies.insert(name.into(), Box::new(strategy));
        self
    }

    pub fn is_simple(&self, name: &str, catalog: &Catalog) -> bool {
        self.strategy(name, catalog).is_some() || catalog.is_enum(name)
    }

    pub fn generate(
        &self,
        name: &str,
        catalog: &Catalog,
        ctx: &mut ValueContext,
    ) -> Result<String, ErrorKind> {
        if let Some(strategy) = self.strategy(name, catalog) {
            return Ok(strategy.literal(ctx));
        }
        match catalog.lookup(name)? {
            Some(TypeDef::Enum(def)) => match def.members.first() {
                Some(first) => Ok(format!("{}.{first}", def.name)),
                None => Err(ErrorKind::EmptyEnum(def.qualified_name())),
            },
            _ => Err(ErrorKind::UnsupportedType(name.to_string())),
        }
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.strategies.keys().map(String::as_str)
    }

    /// Exact name first. The simple-name fallback (`java.util.Date` → `Date`)
    /// only applies to names the catalogue does not define.
    fn strategy(&self, name: &str, catalog: &Catalog) -> Option<&dyn ValueStrategy> {
        if let Some(strategy) = self.strategies.get(name) {
            return Some(strategy.as_ref());
        }
        match catalog.lookup(name) {
            Ok(None) => self.strategies.get(ir::simple_name(name)).map(|s| s.as_ref()),
            _ => None,
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// BUILT-IN KINDS
// ————————————————————————————————————————————————————————————————————————————

fn uuid_literal(ctx: &mut ValueContext) -> String {
    let id = uuid::Builder::from_random_bytes(ctx.rng.r#gen()).into_uuid();
    format!("UUID.fromString({})", java_string(&id.to_string()))
}

fn text_literal(ctx: &mut ValueContext) -> String {
    let text = (0..TEXT_LEN)
        .map(|_| ALPHABET[ctx.rng.gen_range(0..ALPHABET.len())] as char)
        .collect::<String>();
    java_string(&text)
}

fn int_literal(ctx: &mut ValueContext) -> String {
    ctx.rng.gen_range(0..100).to_string()
}

fn long_literal(ctx: &mut ValueContext) -> String {
    format!("{}L", ctx.rng.gen_range(0..100))
}

fn date_literal(ctx: &mut ValueContext) -> String {
    let instant = ctx.next_instant();
    format!("isoDateStringToDate({})", java_string(&crate::date::to_iso_string(&instant)))
}

fn bool_literal(ctx: &mut ValueContext) -> String {
    ctx.rng.gen_bool(0.5).to_string()
}

fn double_literal(ctx: &mut ValueContext) -> String {
    format!("{:.2}d", ctx.rng.gen_range(0.0..100.0))
}

/// Quote and escape `s` as a Java string literal.
///
/// Control characters and everything outside printable ASCII become
/// `\uXXXX` escapes (UTF-16 units) unless they have a short form.
pub fn java_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            ' '..='~' => out.push(c),
            _ => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{:04X}", unit);
                }
            }
        }
    }
    out.push('"');
    out
}
