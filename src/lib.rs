//! Synthesize source code that constructs a fully-populated instance of a
//! type, for writing test fixtures without typing them by hand.
//!
//! ```rust,ignore
//! let catalog = fixture_gen::Catalog::from_json_str(&std::fs::read_to_string("types.json")?)?;
//! let source = fixture_gen::generate(&catalog, "pl.test.Home")?;
//! println!("{source}");
//! ```
pub mod catalog;
pub mod cli;
pub mod date;
pub mod describe;
pub mod emit;
pub mod error;
pub mod generator;
pub mod ir;
pub mod lower;
pub mod names;
pub mod path_de;
pub mod settings;
pub mod strategy;
pub mod type_expr;

pub use catalog::Catalog;
pub use error::{CatalogError, ErrorKind, GenerationError, GenerationFailure};
pub use generator::Generator;
pub use settings::Settings;
pub use strategy::{Registry, ValueContext, ValueStrategy};

/// Generate with the built-in value kinds and the catalogue's own settings.
pub fn generate(catalog: &Catalog, root: &str) -> Result<String, GenerationFailure> {
    let registry = Registry::default();
    let settings = catalog.settings().cloned().unwrap_or_default();
    Generator::new(catalog, &registry, settings).generate(root)
}
