use serde::Deserialize;

/// Property names that are never generated (introspection artefacts).
pub const DEFAULT_IGNORED_PROPERTIES: &[&str] = &["class", "bytes", "declaringClass"];

pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Knobs for one generator instance.
///
/// May be embedded in a catalogue file under `settings`; CLI flags override.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "snake_case", deny_unknown_fields)]
pub struct Settings {
    /// Seed for values and timestamps. `None` seeds from the wall clock.
    pub seed: Option<u64>,
    /// Module scope composites must live in. `None` uses the root's module.
    pub scope: Option<String>,
    pub ignored_properties: Vec<String>,
    /// Maximum number of nested values on one recursion path.
    pub max_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            scope: None,
            ignored_properties: DEFAULT_IGNORED_PROPERTIES.iter().map(|s| s.to_string()).collect(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Settings {
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed), ..Self::default() }
    }

    pub fn is_ignored(&self, property: &str) -> bool {
        self.ignored_properties.iter().any(|p| p == property)
    }
}
