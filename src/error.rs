//! Error types for catalogue loading and generation.
//!
//! Generation failures are fatal: the first error aborts the run. While the
//! error unwinds through nested properties each level adds a [`Frame`], so the
//! final [`GenerationError`] carries a root-first trail to the failure point.
use std::fmt;
use thiserror::Error;

// ————————————————————————————————————————————————————————————————————————————
// GENERATION
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("unsupported type `{0}`")]
    UnsupportedType(String),

    #[error("no write method for property `{property}` of `{owner}`")]
    MissingWriter { owner: String, property: String },

    #[error("cannot find type parameter `{param}` of `{owner}`")]
    UnresolvableParameter { owner: String, param: String },

    #[error("malformed generic shape: {0}")]
    MalformedGeneric(String),

    #[error("enum `{0}` declares no members")]
    EmptyEnum(String),

    #[error("simple name `{name}` is ambiguous, candidates: {}", .candidates.join(", "))]
    AmbiguousType { name: String, candidates: Vec<String> },

    #[error("cyclic type graph: `{0}` is already being generated on this path")]
    Cycle(String),

    #[error("recursion limit of {0} nested values exceeded")]
    RecursionLimit(usize),
}

/// One level of the error trail: the property being generated on `owner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub owner: String,
    pub property: String,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.property)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe_trail(.trail))]
pub struct GenerationError {
    #[source]
    pub kind: ErrorKind,
    pub trail: Vec<Frame>, // root first
}

impl GenerationError {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, trail: Vec::new() }
    }

    /// Prepend the frame of the enclosing level.
    pub fn within(mut self, owner: impl Into<String>, property: impl Into<String>) -> Self {
        self.trail.insert(0, Frame { owner: owner.into(), property: property.into() });
        self
    }

    /// Property names from root to failure point.
    pub fn property_path(&self) -> Vec<&str> {
        self.trail.iter().map(|f| f.property.as_str()).collect()
    }
}

impl From<ErrorKind> for GenerationError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

fn describe_trail(trail: &[Frame]) -> String {
    if trail.is_empty() {
        return "generation failed".to_string();
    }
    let path = trail.iter().map(|f| format!("`{f}`")).collect::<Vec<_>>().join(" → ");
    format!("error when generating property {path}")
}

/// A failed top-level run: the error plus whatever had been emitted so far.
#[derive(Debug, Error)]
#[error("generating `{root}` failed")]
pub struct GenerationFailure {
    pub root: String,
    #[source]
    pub error: GenerationError,
    pub partial_output: String,
}

// ————————————————————————————————————————————————————————————————————————————
// CATALOGUE
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("at JSON path {path} → {message}")]
    Json { path: String, message: String },

    #[error("malformed type expression `{expr}`: {reason}")]
    TypeExpr { expr: String, reason: String },

    #[error("type entry has an empty name")]
    EmptyName,

    #[error("duplicate type `{0}`")]
    DuplicateType(String),

    #[error("type `{owner}` declares property `{property}` twice")]
    DuplicateProperty { owner: String, property: String },

    #[error("type `{0}` declares both properties and enum members")]
    AmbiguousKind(String),

    #[error("type `{owner}` declares generic parameter `{param}` twice")]
    DuplicateParam { owner: String, param: String },
}
