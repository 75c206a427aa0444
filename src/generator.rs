//! Construction Generator: emits statements that build a populated instance
//! of a catalogue type.
//!
//! One [`Generator`] owns the value context (RNG + generated clock) and can
//! serve many top-level runs; the clock keeps advancing across them. Each run
//! gets a fresh name ledger and a fresh output.
//!
//! Policies worth knowing when reading the output:
//! - properties are visited sorted by name;
//! - every list/set property gets exactly one element;
//! - collection elements are generated without type arguments;
//! - a composite that is already on the current recursion path is rejected
//!   as a cycle instead of recursing forever.
use tracing::{debug, trace, warn};

use crate::catalog::Catalog;
use crate::emit::{EmissionSink, Printer};
use crate::error::{ErrorKind, GenerationError, GenerationFailure};
use crate::ir::{self, CompositeDef, Property, Ty, TypeDef};
use crate::lower::{self, Binding, CollectionKind, Shape};
use crate::names::NameLedger;
use crate::settings::Settings;
use crate::strategy::{Registry, ValueContext};

pub struct Generator<'a> {
    catalog: &'a Catalog,
    registry: &'a Registry,
    settings: Settings,
    values: ValueContext,
}

impl<'a> Generator<'a> {
    pub fn new(catalog: &'a Catalog, registry: &'a Registry, settings: Settings) -> Self {
        let values = match settings.seed {
            Some(seed) => ValueContext::seeded(seed),
            None => ValueContext::from_wall_clock(),
        };
        Self { catalog, registry, settings, values }
    }

    /// Replace the value context, e.g. to pin the starting instant.
    pub fn with_values(mut self, values: ValueContext) -> Self {
        self.values = values;
        self
    }

    pub fn values(&self) -> &ValueContext {
        &self.values
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Generate statements constructing `root`. On failure the text emitted
    /// up to the failure point travels with the error.
    pub fn generate(&mut self, root: &str) -> Result<String, GenerationFailure> {
        let mut printer = Printer::new();
        match self.generate_into(root, &mut printer) {
            Ok(var) => {
                debug!(root, var = %var, "generation finished");
                Ok(printer.into_string())
            }
            Err(error) => {
                warn!(root, error = %error, cause = %error.kind, "generation failed");
                Err(GenerationFailure {
                    root: root.to_string(),
                    error,
                    partial_output: printer.into_string(),
                })
            }
        }
    }

    /// Drive an arbitrary sink; returns the root variable name.
    pub fn generate_into(
        &mut self,
        root: &str,
        sink: &mut dyn EmissionSink,
    ) -> Result<String, GenerationError> {
        let scope = match &self.settings.scope {
            Some(scope) => scope.clone(),
            None => self.root_module(root)?,
        };
        debug!(root, scope = %scope, "generating");
        let mut run = Run {
            catalog: self.catalog,
            registry: self.registry,
            settings: &self.settings,
            values: &mut self.values,
            names: NameLedger::new(),
            sink,
            scope,
            path: Vec::new(),
        };
        run.emit_new_variable(root, &[])
    }

    fn root_module(&self, root: &str) -> Result<String, GenerationError> {
        match self.catalog.lookup(root)? {
            Some(def) => Ok(def.module().to_string()),
            None => Ok(ir::module_of(root).to_string()),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// ONE RUN
// ————————————————————————————————————————————————————————————————————————————

struct Run<'g> {
    catalog: &'g Catalog,
    registry: &'g Registry,
    settings: &'g Settings,
    values: &'g mut ValueContext,
    names: NameLedger,
    sink: &'g mut dyn EmissionSink,
    scope: String,
    path: Vec<String>, // composites being generated, outermost first
}

impl<'g> Run<'g> {
    /// Declare a new variable of type `raw<args>` and populate it.
    fn emit_new_variable(&mut self, raw: &str, args: &[Ty]) -> Result<String, GenerationError> {
        let simple = ir::simple_name(raw);
        let var = self.names.allocate(&ir::uncapitalize(simple));
        debug!(var = %var, ty = raw, "allocated variable");

        if self.registry.is_simple(raw, self.catalog) {
            let literal = self.registry.generate(raw, self.catalog, self.values)?;
            self.sink.declare_and_assign(simple, &var, &literal);
            return Ok(var);
        }

        let def = self.composite(raw)?;
        if !args.is_empty() && args.len() != def.params.len() {
            return Err(ErrorKind::MalformedGeneric(format!(
                "`{}` declares {} type parameter(s) but {} argument(s) were supplied",
                def.qualified_name(),
                def.params.len(),
                args.len(),
            ))
            .into());
        }

        let key = format!("{}{}", def.qualified_name(), type_args(args));
        if self.path.contains(&key) {
            return Err(ErrorKind::Cycle(key).into());
        }
        if self.path.len() >= self.settings.max_depth {
            return Err(ErrorKind::RecursionLimit(self.settings.max_depth).into());
        }

        let constructor = if args.is_empty() {
            format!("new {simple}()")
        } else {
            format!("new {simple}<>()")
        };
        let declared = format!("{simple}{}", type_args(args));
        self.sink.declare_and_assign(&declared, &var, &constructor);

        self.path.push(key);
        let mut properties = def.properties.iter().collect::<Vec<_>>();
        properties.sort_by(|a, b| a.name.cmp(&b.name));
        for property in properties {
            self.emit_property(&var, def, property, args)
                .map_err(|e| e.within(def.name.as_str(), property.name.as_str()))?;
        }
        self.path.pop();

        Ok(var)
    }

    fn emit_property(
        &mut self,
        owner_var: &str,
        owner: &CompositeDef,
        property: &Property,
        args: &[Ty],
    ) -> Result<(), GenerationError> {
        if self.settings.is_ignored(&property.name) {
            trace!(owner = %owner.name, property = %property.name, "ignored");
            return Ok(());
        }
        let writer = property.writer.as_deref().ok_or_else(|| ErrorKind::MissingWriter {
            owner: owner.qualified_name(),
            property: property.name.clone(),
        })?;
        trace!(owner = %owner.name, property = %property.name, ty = %property.ty, "property");

        // a parameter is never simple by declaration, even when bound to a simple kind
        let declared_param = matches!(property.ty, Ty::Param(_));
        let declared = self.catalog.resolve_in(&owner.module, &property.ty);
        let ty = Binding::new(owner, args).substitute(&declared)?;
        match lower::classify(ty, self.catalog, self.registry)? {
            Shape::Simple(name) if declared_param => {
                let nested = self.emit_new_variable(&name, &[])?;
                self.assign_nested(owner_var, writer, &nested);
            }
            Shape::Simple(name) => {
                let literal = self.registry.generate(&name, self.catalog, self.values)?;
                self.sink.call_method(owner_var, writer, &literal);
            }
            Shape::Collection { kind, element } => {
                let collection = self.names.allocate(&property.name);
                let element_raw = element.raw_name();
                let element_name = ir::simple_name(element_raw);

                self.sink.blank_line();
                match kind {
                    CollectionKind::List => self.sink.declare_empty_list(element_name, &collection),
                    CollectionKind::Set => self.sink.declare_empty_set(element_name, &collection),
                }

                let value = if self.registry.is_simple(element_raw, self.catalog) {
                    self.registry.generate(element_raw, self.catalog, self.values)?
                } else {
                    self.emit_new_variable(element_raw, &[])?
                };

                self.sink.append_to_collection(&collection, &value);
                self.sink.call_method(owner_var, writer, &collection);
                self.sink.blank_line();
            }
            Shape::Composite { raw, args } => {
                let nested = self.emit_new_variable(&raw, &args)?;
                self.assign_nested(owner_var, writer, &nested);
            }
        }
        Ok(())
    }

    fn assign_nested(&mut self, owner_var: &str, writer: &str, nested: &str) {
        self.sink.blank_line();
        self.sink.call_method(owner_var, writer, nested);
        self.sink.blank_line();
    }

    /// In-scope composite definition for `raw`, or `UnsupportedType`.
    fn composite(&self, raw: &str) -> Result<&'g CompositeDef, GenerationError> {
        let catalog: &'g Catalog = self.catalog;
        match catalog.lookup(raw)? {
            Some(TypeDef::Composite(def)) if in_scope(&def.module, &self.scope) => Ok(def),
            _ => Err(ErrorKind::UnsupportedType(raw.to_string()).into()),
        }
    }
}

/// `<A, B>` for non-empty `args`, nothing otherwise.
fn type_args(args: &[Ty]) -> String {
    if args.is_empty() {
        return String::new();
    }
    let args = args.iter().map(Ty::to_string).collect::<Vec<_>>();
    format!("<{}>", args.join(", "))
}

/// `module` is `scope` itself or nested beneath it. An empty scope admits all.
fn in_scope(module: &str, scope: &str) -> bool {
    scope.is_empty()
        || module == scope
        || module.strip_prefix(scope).is_some_and(|rest| rest.starts_with('.'))
}
