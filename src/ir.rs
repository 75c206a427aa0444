// Strongly-typed type model for generation. No serde_json::Value here.

use std::fmt;

/// A type as written in a property declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    Named(String),           // concrete type, simple or composite (decided by `lower`)
    Parameterized {
        raw: String,
        args: Vec<Ty>,
    },
    Param(String),           // generic parameter of the enclosing type
}

impl Ty {
    pub fn named(name: impl Into<String>) -> Self {
        Ty::Named(name.into())
    }

    pub fn param(name: impl Into<String>) -> Self {
        Ty::Param(name.into())
    }

    pub fn parameterized(raw: impl Into<String>, args: Vec<Ty>) -> Self {
        Ty::Parameterized { raw: raw.into(), args }
    }

    /// Name of the raw type, or the parameter name for `Param`.
    pub fn raw_name(&self) -> &str {
        match self {
            Ty::Named(name) | Ty::Param(name) => name,
            Ty::Parameterized { raw, .. } => raw,
        }
    }
}

/// Renders with simple names only, the way the type is spelled in generated code.
impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Named(name) | Ty::Param(name) => f.write_str(simple_name(name)),
            Ty::Parameterized { raw, args } => {
                f.write_str(simple_name(raw))?;
                f.write_str("<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub ty: Ty,
    pub reader: Option<String>,
    pub writer: Option<String>, // None → read-only, fatal when generated
}

impl Property {
    /// Property with JavaBean accessor names (`getX` / `setX`).
    pub fn bean(name: impl Into<String>, ty: Ty) -> Self {
        let name = name.into();
        let reader = Some(format!("get{}", capitalize(&name)));
        let writer = Some(format!("set{}", capitalize(&name)));
        Property { name, ty, reader, writer }
    }

    pub fn read_only(mut self) -> Self {
        self.writer = None;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeDef {
    pub name: String,
    pub module: String,
    pub params: Vec<String>,   // declared generic parameters, in order
    pub properties: Vec<Property>,
}

impl CompositeDef {
    pub fn qualified_name(&self) -> String {
        qualify(&self.module, &self.name)
    }

    pub fn param_index(&self, param: &str) -> Option<usize> {
        self.params.iter().position(|p| p == param)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    pub name: String,
    pub module: String,
    pub members: Vec<String>,  // declaration order
}

impl EnumDef {
    pub fn qualified_name(&self) -> String {
        qualify(&self.module, &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDef {
    Composite(CompositeDef),
    Enum(EnumDef),
}

impl TypeDef {
    pub fn name(&self) -> &str {
        match self {
            TypeDef::Composite(c) => &c.name,
            TypeDef::Enum(e) => &e.name,
        }
    }

    pub fn module(&self) -> &str {
        match self {
            TypeDef::Composite(c) => &c.module,
            TypeDef::Enum(e) => &e.module,
        }
    }

    pub fn qualified_name(&self) -> String {
        qualify(self.module(), self.name())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// NAME HELPERS
// ————————————————————————————————————————————————————————————————————————————

pub fn qualify(module: &str, name: &str) -> String {
    if module.is_empty() {
        name.to_string()
    } else {
        format!("{module}.{name}")
    }
}

/// `a.b.Foo` → `Foo`
pub fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// `a.b.Foo` → `a.b`; empty for unqualified names.
pub fn module_of(name: &str) -> &str {
    name.rsplit_once('.').map(|(module, _)| module).unwrap_or("")
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn uncapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
