//! Minimal CLI: catalogue → (fixture source | type listing)
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use crate::catalog::Catalog;
use crate::generator::Generator;
use crate::settings::Settings;
use crate::strategy::Registry;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate Java statements that build a fully-populated instance of a catalogue type
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate construction code for one root type
    Generate(GenerateOut),
    /// list catalogue types, or describe one with its type arguments applied
    Types(TypesOut),
}

#[derive(Args, Debug, Clone)]
struct CatalogSettings {
    /// One or more catalogue files. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    catalog: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    catalog_settings: CatalogSettings,

    /// root type, qualified (`pl.test.Home`) or by unique simple name
    #[arg(long, short)]
    root: String,

    /// seed for generated values (wall clock if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// module scope generated composites must belong to (root's module if omitted)
    #[arg(long)]
    scope: Option<String>,

    /// maximum nesting of generated objects
    #[arg(long)]
    max_depth: Option<usize>,

    /// extra property names to skip
    #[arg(long, num_args = 1..)]
    ignore: Vec<String>,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct TypesOut {
    #[command(flatten)]
    catalog_settings: CatalogSettings,

    /// type expression to describe, e.g. `Pair<Address, String>`
    #[arg(long)]
    describe: Option<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CatalogSettings {
    fn load(&self) -> Result<Catalog> {
        let source_paths = resolve_file_path_patterns(&self.catalog)?;
        let mut catalog = Catalog::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let bytes = std::fs::read(&source_path)
                .with_context(|| format!("failed to read catalogue file ({source_path_str})"))?;
            let part = Catalog::from_json_slice(&bytes)
                .with_context(|| format!("failed to load catalogue file ({source_path_str})"))?;
            tracing::debug!(path = %source_path_str, types = part.len(), "loaded catalogue");
            catalog
                .merge(part)
                .with_context(|| format!("failed to merge catalogue file ({source_path_str})"))?;
        }
        if catalog.is_empty() {
            tracing::warn!(patterns = ?self.catalog, "catalogue defines no types");
        }
        Ok(catalog)
    }
}

impl GenerateOut {
    fn settings(&self, catalog: &Catalog) -> Settings {
        let mut settings = catalog.settings().cloned().unwrap_or_default();
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if let Some(scope) = &self.scope {
            settings.scope = Some(scope.clone());
        }
        if let Some(max_depth) = self.max_depth {
            settings.max_depth = max_depth;
        }
        settings.ignored_properties.extend(self.ignore.iter().cloned());
        settings
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                let catalog = target.catalog_settings.load()?;
                let settings = target.settings(&catalog);
                let registry = Registry::default();
                let mut generator = Generator::new(&catalog, &registry, settings);
                tracing::debug!(settings = ?generator.settings(), "generator ready");
                match generator.generate(&target.root) {
                    Ok(source) => write_output(target.out.as_ref(), &source),
                    Err(failure) => {
                        // partial output helps locate the failing property
                        print!("{}", failure.partial_output);
                        Err(failure.into())
                    }
                }
            }
            Command::Types(target) => {
                let catalog = target.catalog_settings.load()?;
                match target.describe.as_ref() {
                    Some(expr) => {
                        let ty = crate::type_expr::parse(expr)?;
                        let text = crate::describe::describe(&catalog, &ty)
                            .with_context(|| format!("cannot describe `{expr}`"))?;
                        print!("{text}");
                    }
                    None => {
                        for def in catalog.iter() {
                            println!("{}", def.qualified_name());
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(out: Option<&PathBuf>, source: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, source)
                .with_context(|| format!("failed to write {}", out.display()))?;
        }
        None => print!("{source}"),
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_catalogue_settings() {
        let cli = CommandLineInterface::try_parse_from([
            "fixture-gen", "generate", "--catalog", "types.json", "--root", "Home",
            "--seed", "9", "--max-depth", "3", "--ignore", "secret", "token",
        ])
        .unwrap();
        let Command::Generate(target) = cli.cmd else {
            panic!("expected the generate subcommand");
        };
        let catalog = Catalog::from_json_str(r#"{ "settings": { "seed": 1, "scope": "pl" }, "types": [] }"#)
            .unwrap();
        let settings = target.settings(&catalog);
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.scope.as_deref(), Some("pl"));
        assert_eq!(settings.max_depth, 3);
        assert!(settings.is_ignored("class"));
        assert!(settings.is_ignored("secret"));
        assert!(settings.is_ignored("token"));
    }

    #[test]
    fn catalogue_is_required() {
        assert!(CommandLineInterface::try_parse_from(["fixture-gen", "generate", "--root", "Home"]).is_err());
    }

    #[test]
    fn empty_glob_is_an_error() {
        let err = resolve_file_path_patterns(["/definitely/not/here/*.json"]).unwrap_err();
        assert!(err.to_string().contains("matched no files"));
        let literal = resolve_file_path_patterns(["plain.json"]).unwrap();
        assert_eq!(literal, vec![PathBuf::from("plain.json")]);
    }
}
