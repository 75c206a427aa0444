//! Human-readable view of a catalogue type as the generator sees it:
//! declared generic parameters replaced by the supplied arguments.
use std::fmt::Write;

use crate::catalog::Catalog;
use crate::error::ErrorKind;
use crate::ir::{Ty, TypeDef};
use crate::lower::Binding;

/// `Pair<Foo, Bar>` →
/// ```text
/// pl.test.Pair<Foo, Bar>
///  * Foo first (getFirst/setFirst)
///  * Bar second (getSecond/setSecond)
/// ```
/// Without arguments, parameter references are shown as declared.
pub fn describe(catalog: &Catalog, ty: &Ty) -> Result<String, ErrorKind> {
    let (raw, args) = match ty {
        Ty::Parameterized { raw, args } => (raw.as_str(), args.as_slice()),
        other => (other.raw_name(), &[][..]),
    };
    let mut out = String::new();
    match catalog.lookup(raw)? {
        None => return Err(ErrorKind::UnsupportedType(raw.to_string())),
        Some(TypeDef::Enum(def)) => {
            let _ = writeln!(out, "{} = {}", def.qualified_name(), def.members.join(" | "));
        }
        Some(TypeDef::Composite(def)) => {
            if !args.is_empty() && args.len() != def.params.len() {
                return Err(ErrorKind::MalformedGeneric(format!(
                    "`{}` declares {} type parameter(s)",
                    def.qualified_name(),
                    def.params.len()
                )));
            }
            let shown = if args.is_empty() {
                def.params.clone()
            } else {
                args.iter().map(Ty::to_string).collect()
            };
            let header = match shown.is_empty() {
                true => def.qualified_name(),
                false => format!("{}<{}>", def.qualified_name(), shown.join(", ")),
            };
            let _ = writeln!(out, "{header}");
            let binding = Binding::new(def, args);
            for property in &def.properties {
                let resolved = if args.is_empty() {
                    property.ty.clone()
                } else {
                    binding.substitute(&property.ty)?
                };
                let access = match (&property.reader, &property.writer) {
                    (Some(reader), Some(writer)) => format!(" ({reader}/{writer})"),
                    (Some(reader), None) => format!(" ({reader}, read-only)"),
                    (None, Some(writer)) => format!(" ({writer})"),
                    (None, None) => " (read-only)".to_string(),
                };
                let _ = writeln!(out, " * {resolved} {}{access}", property.name);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> Catalog {
        Catalog::from_json_str(
            &json!({ "types": [
                { "module": "pl.test", "name": "Pair", "params": ["T", "U"],
                  "properties": [
                    { "name": "first", "type": "T" },
                    { "name": "rest", "type": "List<U>" },
                    { "name": "hash", "type": "int", "writer": null }
                  ] },
                { "module": "pl.test", "name": "Color", "enum": ["RED", "GREEN"] }
            ]})
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn substitutes_arguments() {
        let ty = crate::type_expr::parse("Pair<Foo, pl.test.Bar>").unwrap();
        assert_eq!(
            describe(&catalog(), &ty).unwrap(),
            "pl.test.Pair<Foo, Bar>\n * Foo first (getFirst/setFirst)\n * List<Bar> rest (getRest/setRest)\n * int hash (getHash, read-only)\n"
        );
    }

    #[test]
    fn raw_generic_shows_parameters() {
        let out = describe(&catalog(), &Ty::named("Pair")).unwrap();
        assert!(out.starts_with("pl.test.Pair<T, U>\n * T first (getFirst/setFirst)\n"), "{out}");
    }

    #[test]
    fn enums_and_unknowns() {
        assert_eq!(describe(&catalog(), &Ty::named("Color")).unwrap(), "pl.test.Color = RED | GREEN\n");
        assert_eq!(
            describe(&catalog(), &Ty::named("Nope")),
            Err(ErrorKind::UnsupportedType("Nope".into()))
        );
    }
}
