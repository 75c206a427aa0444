//! Property classification: declared type + generic binding → [`Shape`].
//!
//! The generator never inspects a [`Ty`] directly. It substitutes the
//! enclosing binding first, then matches on the closed three-way shape
//! decided here.
use crate::catalog::Catalog;
use crate::error::ErrorKind;
use crate::ir::{self, CompositeDef, Ty};
use crate::strategy::Registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    List,
    Set,
}

impl CollectionKind {
    pub fn of(name: &str) -> Option<Self> {
        match ir::simple_name(name) {
            "List" => Some(CollectionKind::List),
            "Set" => Some(CollectionKind::Set),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Registered simple kind or catalogue enum.
    Simple(String),
    Collection { kind: CollectionKind, element: Ty },
    Composite { raw: String, args: Vec<Ty> },
}

/// Declared generic parameters of `owner` bound positionally to `args`.
#[derive(Debug, Clone, Copy)]
pub struct Binding<'a> {
    owner: &'a CompositeDef,
    args: &'a [Ty],
}

impl<'a> Binding<'a> {
    pub fn new(owner: &'a CompositeDef, args: &'a [Ty]) -> Self {
        Self { owner, args }
    }

    pub fn resolve(&self, param: &str) -> Result<&'a Ty, ErrorKind> {
        self.owner
            .param_index(param)
            .and_then(|i| self.args.get(i))
            .ok_or_else(|| ErrorKind::UnresolvableParameter {
                owner: self.owner.qualified_name(),
                param: param.to_string(),
            })
    }

    /// Replace every parameter reference in `ty` with its bound argument.
    pub fn substitute(&self, ty: &Ty) -> Result<Ty, ErrorKind> {
        match ty {
            Ty::Named(_) => Ok(ty.clone()),
            Ty::Param(param) => self.resolve(param).cloned(),
            Ty::Parameterized { raw, args } => Ok(Ty::Parameterized {
                raw: raw.clone(),
                args: args.iter().map(|a| self.substitute(a)).collect::<Result<_, _>>()?,
            }),
        }
    }
}

pub fn classify(ty: Ty, catalog: &Catalog, registry: &Registry) -> Result<Shape, ErrorKind> {
    match ty {
        Ty::Param(param) => Err(ErrorKind::MalformedGeneric(format!(
            "type parameter `{param}` has no binding here"
        ))),
        Ty::Parameterized { raw, mut args } => match CollectionKind::of(&raw) {
            Some(kind) => match (args.pop(), args.is_empty()) {
                (Some(element), true) => Ok(Shape::Collection { kind, element }),
                _ => Err(ErrorKind::MalformedGeneric(format!(
                    "`{raw}` takes exactly one element type"
                ))),
            },
            None => Ok(Shape::Composite { raw, args }),
        },
        Ty::Named(name) => {
            if CollectionKind::of(&name).is_some() {
                Err(ErrorKind::MalformedGeneric(format!("`{name}` is missing its element type")))
            } else if registry.is_simple(&name, catalog) {
                Ok(Shape::Simple(name))
            } else {
                Ok(Shape::Composite { raw: name, args: Vec::new() })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{EnumDef, Property, TypeDef};

    fn pair() -> CompositeDef {
        CompositeDef {
            name: "Pair".into(),
            module: "pl.test".into(),
            params: vec!["T".into(), "U".into()],
            properties: vec![
                Property::bean("left", Ty::param("T")),
                Property::bean("right", Ty::param("U")),
            ],
        }
    }

    #[test]
    fn substitution_is_positional() {
        let owner = pair();
        let args = [Ty::named("Foo"), Ty::named("Bar")];
        let binding = Binding::new(&owner, &args);
        assert_eq!(binding.substitute(&Ty::param("T")).unwrap(), Ty::named("Foo"));
        assert_eq!(binding.substitute(&Ty::param("U")).unwrap(), Ty::named("Bar"));
        assert_eq!(
            binding
                .substitute(&Ty::parameterized("Box", vec![Ty::param("U"), Ty::named("T2")]))
                .unwrap(),
            Ty::parameterized("Box", vec![Ty::named("Bar"), Ty::named("T2")])
        );
    }

    #[test]
    fn unknown_or_unbound_parameters_fail() {
        let owner = pair();
        let args = [Ty::named("Foo")];
        let binding = Binding::new(&owner, &args);
        let missing = ErrorKind::UnresolvableParameter {
            owner: "pl.test.Pair".into(),
            param: "V".into(),
        };
        assert_eq!(binding.substitute(&Ty::param("V")), Err(missing));
        assert!(matches!(
            binding.substitute(&Ty::param("U")),
            Err(ErrorKind::UnresolvableParameter { param, .. }) if param == "U"
        ));
    }

    #[test]
    fn classification() {
        let catalog = Catalog::from_defs([TypeDef::Enum(EnumDef {
            name: "Color".into(),
            module: "pl.test".into(),
            members: vec!["RED".into()],
        })])
        .unwrap();
        let registry = Registry::default();
        let shape = |ty| classify(ty, &catalog, &registry);

        assert_eq!(shape(Ty::named("String")).unwrap(), Shape::Simple("String".into()));
        assert_eq!(shape(Ty::named("Color")).unwrap(), Shape::Simple("Color".into()));
        assert_eq!(
            shape(Ty::parameterized("java.util.Set", vec![Ty::named("Color")])).unwrap(),
            Shape::Collection { kind: CollectionKind::Set, element: Ty::named("Color") }
        );
        assert_eq!(
            shape(Ty::parameterized("Pair", vec![Ty::named("A"), Ty::named("B")])).unwrap(),
            Shape::Composite { raw: "Pair".into(), args: vec![Ty::named("A"), Ty::named("B")] }
        );
        assert_eq!(
            shape(Ty::named("Address")).unwrap(),
            Shape::Composite { raw: "Address".into(), args: vec![] }
        );
        for bad in [
            Ty::named("List"),
            Ty::parameterized("List", vec![Ty::named("A"), Ty::named("B")]),
            Ty::param("T"),
        ] {
            assert!(matches!(shape(bad), Err(ErrorKind::MalformedGeneric(_))));
        }
    }
}
