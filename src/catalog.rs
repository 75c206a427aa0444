//! Type catalogue: the adapter that turns a JSON description of types into
//! [`TypeDef`]s the generator can walk.
//!
//! Property type expressions are parsed here and every name that matches one
//! of the owning type's declared generic parameters becomes [`Ty::Param`].
//! Everything else stays a plain name; whether it is simple, an enum, an
//! in-scope composite or unsupported is only decided during generation.
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::error::{CatalogError, ErrorKind};
use crate::ir::{self, CompositeDef, EnumDef, Property, Ty, TypeDef};
use crate::settings::Settings;

// ————————————————————————————————————————————————————————————————————————————
// FILE FORMAT
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    settings: Option<Settings>,
    types: Vec<TypeEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TypeEntry {
    #[serde(default)]
    module: String,
    name: String,
    #[serde(default)]
    params: Vec<String>,
    #[serde(default)]
    properties: Option<Vec<PropertyEntry>>,
    #[serde(default, rename = "enum")]
    members: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PropertyEntry {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    /// absent → bean default, `null` → no accessor
    #[serde(default, deserialize_with = "explicit")]
    reader: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    writer: Option<Option<String>>,
}

fn explicit<'de, D>(de: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(de).map(Some)
}

// ————————————————————————————————————————————————————————————————————————————
// CATALOGUE
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    types: IndexMap<String, TypeDef>, // keyed by qualified name
    settings: Option<Settings>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_defs<I>(defs: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = TypeDef>,
    {
        let mut catalog = Self::new();
        for def in defs {
            catalog.insert(def)?;
        }
        Ok(catalog)
    }

    pub fn from_json_str(src: &str) -> Result<Self, CatalogError> {
        Self::from_file(crate::path_de::from_str_with_path(src)?)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, CatalogError> {
        Self::from_file(crate::path_de::from_slice_with_path(bytes)?)
    }

    fn from_file(file: CatalogFile) -> Result<Self, CatalogError> {
        let mut catalog = Self::from_defs(
            file.types.into_iter().map(lower_entry).collect::<Result<Vec<_>, _>>()?,
        )?;
        catalog.settings = file.settings;
        Ok(catalog)
    }

    pub fn insert(&mut self, def: TypeDef) -> Result<(), CatalogError> {
        if def.name().is_empty() {
            return Err(CatalogError::EmptyName);
        }
        let qualified = def.qualified_name();
        if let TypeDef::Composite(composite) = &def {
            for (i, param) in composite.params.iter().enumerate() {
                if composite.params[..i].contains(param) {
                    return Err(CatalogError::DuplicateParam {
                        owner: qualified,
                        param: param.clone(),
                    });
                }
            }
            for (i, property) in composite.properties.iter().enumerate() {
                if composite.properties[..i].iter().any(|p| p.name == property.name) {
                    return Err(CatalogError::DuplicateProperty {
                        owner: qualified,
                        property: property.name.clone(),
                    });
                }
            }
        }
        if self.types.contains_key(&qualified) {
            return Err(CatalogError::DuplicateType(qualified));
        }
        self.types.insert(qualified, def);
        Ok(())
    }

    /// Fold another catalogue in. Settings of the later catalogue win.
    pub fn merge(&mut self, other: Catalog) -> Result<(), CatalogError> {
        for def in other.types.into_values() {
            self.insert(def)?;
        }
        if other.settings.is_some() {
            self.settings = other.settings;
        }
        Ok(())
    }

    pub fn settings(&self) -> Option<&Settings> {
        self.settings.as_ref()
    }

    /// Find a type by qualified name, falling back to a unique simple name.
    pub fn lookup(&self, name: &str) -> Result<Option<&TypeDef>, ErrorKind> {
        if let Some(def) = self.types.get(name) {
            return Ok(Some(def));
        }
        let mut hits = self.types.values().filter(|def| def.name() == name);
        let Some(first) = hits.next() else {
            return Ok(None);
        };
        let rest = hits.collect::<Vec<_>>();
        if rest.is_empty() {
            return Ok(Some(first));
        }
        let candidates = std::iter::once(first)
            .chain(rest)
            .map(TypeDef::qualified_name)
            .collect();
        Err(ErrorKind::AmbiguousType { name: name.to_string(), candidates })
    }

    /// Qualify unqualified names in `ty` that `module` itself defines, so a
    /// same-module type wins over equally named types elsewhere.
    pub fn resolve_in(&self, module: &str, ty: &Ty) -> Ty {
        match ty {
            Ty::Named(name) => Ty::Named(self.local_name(module, name)),
            Ty::Parameterized { raw, args } => Ty::Parameterized {
                raw: self.local_name(module, raw),
                args: args.iter().map(|a| self.resolve_in(module, a)).collect(),
            },
            Ty::Param(_) => ty.clone(),
        }
    }

    fn local_name(&self, module: &str, name: &str) -> String {
        if !name.contains('.') {
            let qualified = ir::qualify(module, name);
            if self.types.contains_key(&qualified) {
                return qualified;
            }
        }
        name.to_string()
    }

    pub fn is_enum(&self, name: &str) -> bool {
        matches!(self.lookup(name), Ok(Some(TypeDef::Enum(_))))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn lower_entry(entry: TypeEntry) -> Result<TypeDef, CatalogError> {
    let TypeEntry { mut module, mut name, params, properties, members } = entry;
    if module.is_empty() && name.contains('.') {
        module = ir::module_of(&name).to_string();
        name = ir::simple_name(&name).to_string();
    }
    match (properties, members) {
        (Some(_), Some(_)) => Err(CatalogError::AmbiguousKind(ir::qualify(&module, &name))),
        (None, Some(members)) => Ok(TypeDef::Enum(EnumDef { name, module, members })),
        (properties, None) => {
            let properties = properties
                .unwrap_or_default()
                .into_iter()
                .map(|p| lower_property(p, &params))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TypeDef::Composite(CompositeDef { name, module, params, properties }))
        }
    }
}

fn lower_property(entry: PropertyEntry, params: &[String]) -> Result<Property, CatalogError> {
    let ty = bind_params(crate::type_expr::parse(&entry.ty)?, params);
    let mut property = Property::bean(entry.name, ty);
    if let Some(reader) = entry.reader {
        property.reader = reader;
    }
    if let Some(writer) = entry.writer {
        property.writer = writer;
    }
    Ok(property)
}

fn bind_params(ty: Ty, params: &[String]) -> Ty {
    match ty {
        Ty::Named(name) if params.contains(&name) => Ty::Param(name),
        Ty::Parameterized { raw, args } => Ty::Parameterized {
            raw,
            args: args.into_iter().map(|a| bind_params(a, params)).collect(),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn load(value: serde_json::Value) -> Result<Catalog, CatalogError> {
        Catalog::from_json_str(&value.to_string())
    }

    #[test]
    fn loads_composites_enums_and_params() {
        let catalog = load(json!({
            "settings": { "seed": 3 },
            "types": [
                { "module": "pl.test", "name": "Pair", "params": ["A", "B"],
                  "properties": [
                    { "name": "left", "type": "A" },
                    { "name": "rights", "type": "List<B>" },
                    { "name": "label", "type": "String", "writer": "label" },
                    { "name": "hash", "type": "int", "writer": null }
                  ] },
                { "name": "pl.test.AddressType", "enum": ["FLAT", "HOUSE"] }
            ]
        }))
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.settings().and_then(|s| s.seed), Some(3));

        let Some(TypeDef::Composite(pair)) = catalog.lookup("pl.test.Pair").unwrap() else {
            panic!("Pair should be a composite");
        };
        assert_eq!(pair.properties[0].ty, Ty::param("A"));
        assert_eq!(pair.properties[1].ty, Ty::parameterized("List", vec![Ty::param("B")]));
        assert_eq!(pair.properties[2].writer.as_deref(), Some("label"));
        assert_eq!(pair.properties[2].reader.as_deref(), Some("getLabel"));
        assert_eq!(pair.properties[3].writer, None);

        let Some(TypeDef::Enum(kind)) = catalog.lookup("AddressType").unwrap() else {
            panic!("AddressType should be an enum");
        };
        assert_eq!(kind.module, "pl.test");
        assert_eq!(kind.members, vec!["FLAT", "HOUSE"]);
        assert!(catalog.is_enum("pl.test.AddressType"));
    }

    #[test]
    fn simple_name_lookup_must_be_unique() {
        let catalog = load(json!({ "types": [
            { "module": "a", "name": "Item" },
            { "module": "b", "name": "Item" }
        ]}))
        .unwrap();
        assert!(catalog.lookup("a.Item").unwrap().is_some());
        assert!(catalog.lookup("Missing").unwrap().is_none());
        match catalog.lookup("Item") {
            Err(ErrorKind::AmbiguousType { candidates, .. }) => {
                assert_eq!(candidates, vec!["a.Item", "b.Item"]);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn same_module_names_resolve_first() {
        let catalog = load(json!({ "types": [
            { "module": "a", "name": "Item" },
            { "module": "b", "name": "Item" }
        ]}))
        .unwrap();
        let declared = Ty::parameterized("List", vec![Ty::named("Item"), Ty::param("T")]);
        assert_eq!(
            catalog.resolve_in("b", &declared),
            Ty::parameterized("List", vec![Ty::named("b.Item"), Ty::param("T")])
        );
        assert_eq!(catalog.resolve_in("c", &Ty::named("Item")), Ty::named("Item"));
        assert_eq!(catalog.resolve_in("b", &Ty::named("a.Item")), Ty::named("a.Item"));
    }

    #[test]
    fn rejects_structural_mistakes() {
        let dup_type = load(json!({ "types": [ { "name": "A" }, { "name": "A" } ] }));
        assert!(matches!(dup_type, Err(CatalogError::DuplicateType(name)) if name == "A"));

        let dup_prop = load(json!({ "types": [ { "name": "A", "properties": [
            { "name": "x", "type": "int" }, { "name": "x", "type": "long" }
        ] } ] }));
        assert!(matches!(dup_prop, Err(CatalogError::DuplicateProperty { .. })));

        let both = load(json!({ "types": [ { "name": "A", "properties": [], "enum": ["X"] } ] }));
        assert!(matches!(both, Err(CatalogError::AmbiguousKind(_))));

        let bad_expr = load(json!({ "types": [ { "name": "A", "properties": [
            { "name": "x", "type": "List<" }
        ] } ] }));
        assert!(matches!(bad_expr, Err(CatalogError::TypeExpr { .. })));

        let bad_json = load(json!({ "types": [ { "name": "A", "propertys": [] } ] }));
        assert!(matches!(bad_json, Err(CatalogError::Json { .. })));
    }

    #[test]
    fn merge_keeps_later_settings() {
        let mut first = load(json!({ "settings": { "seed": 1 }, "types": [ { "name": "A" } ] })).unwrap();
        let second = load(json!({ "settings": { "seed": 2 }, "types": [ { "name": "B" } ] })).unwrap();
        assert!(Catalog::new().is_empty());
        first.merge(second).unwrap();
        assert!(!first.is_empty());
        assert_eq!(first.len(), 2);
        assert_eq!(first.settings().and_then(|s| s.seed), Some(2));
    }
}
