//! Type expressions as written in catalogue files: `Name` or `Name<Arg, ...>`.
//!
//! Names are kept exactly as written; deciding whether `T` is a generic
//! parameter or a concrete type is up to the catalogue.
use crate::error::CatalogError;
use crate::ir::Ty;

pub fn parse(src: &str) -> Result<Ty, CatalogError> {
    let mut parser = Parser { src, pos: 0 };
    let ty = parser.ty()?;
    parser.skip_ws();
    if parser.pos != src.len() {
        return Err(parser.fail(format!("unexpected trailing input at offset {}", parser.pos)));
    }
    Ok(ty)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn ty(&mut self) -> Result<Ty, CatalogError> {
        let name = self.ident()?;
        if !self.eat('<') {
            return Ok(Ty::Named(name));
        }
        let mut args = vec![self.ty()?];
        while self.eat(',') {
            args.push(self.ty()?);
        }
        if !self.eat('>') {
            return Err(self.fail(format!("expected `,` or `>` at offset {}", self.pos)));
        }
        Ok(Ty::Parameterized { raw: name, args })
    }

    fn ident(&mut self) -> Result<String, CatalogError> {
        self.skip_ws();
        let rest = &self.src[self.pos..];
        let len = rest
            .char_indices()
            .find(|&(i, c)| !is_ident_char(c, i == 0))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.fail(format!("expected a type name at offset {}", self.pos)));
        }
        let name = &rest[..len];
        if name.ends_with('.') || name.contains("..") {
            return Err(self.fail(format!("bad qualified name `{name}`")));
        }
        self.pos += len;
        Ok(name.to_string())
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.src[self.pos..].starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        let rest = &self.src[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn fail(&self, reason: String) -> CatalogError {
        CatalogError::TypeExpr { expr: self.src.to_string(), reason }
    }
}

fn is_ident_char(c: char, first: bool) -> bool {
    if first {
        c.is_alphabetic() || c == '_' || c == '$'
    } else {
        c.is_alphanumeric() || c == '_' || c == '$' || c == '.'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_and_qualified_names() {
        assert_eq!(parse("String").unwrap(), Ty::named("String"));
        assert_eq!(parse("  pl.test.Address ").unwrap(), Ty::named("pl.test.Address"));
    }

    #[test]
    fn nested_arguments() {
        let ty = parse("Pair<Address, List<T>>").unwrap();
        assert_eq!(
            ty,
            Ty::parameterized(
                "Pair",
                vec![Ty::named("Address"), Ty::parameterized("List", vec![Ty::named("T")])],
            )
        );
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["", "List<", "List<>", "Map<A,>", "A B", "a..B", "Foo.", "<T>"] {
            assert!(
                matches!(parse(bad), Err(CatalogError::TypeExpr { .. })),
                "`{bad}` should not parse"
            );
        }
    }
}
