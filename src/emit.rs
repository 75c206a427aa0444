//! Emission sink: append-only statement log and its text rendering.
//!
//! The generator only ever appends. The single piece of state a sink keeps
//! about what came before is whether the last thing written was a blank line,
//! so that back-to-back separators collapse into one.

/// Number of spaces per indentation level.
const INDENT_WIDTH: usize = 4;

pub trait EmissionSink {
    fn declare_and_assign(&mut self, type_name: &str, var: &str, value: &str);
    fn declare_empty_list(&mut self, element_type: &str, var: &str);
    fn declare_empty_set(&mut self, element_type: &str, var: &str);
    fn append_to_collection(&mut self, collection: &str, value: &str);
    fn call_method(&mut self, owner: &str, method: &str, arg: &str);
    /// Idempotent: a second consecutive call is a no-op.
    fn blank_line(&mut self);
    fn render(&self) -> String;
}

/// Java-flavoured statements: `final T v = e;`, `v.add(e);`, `o.m(a);`
#[derive(Debug, Default, Clone)]
pub struct Printer {
    output: String,
    blank_printed: bool,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_string(self) -> String {
        self.output
    }

    fn statement(&mut self, text: std::fmt::Arguments<'_>) {
        use std::fmt::Write;
        self.blank_printed = false;
        let _ = writeln!(self.output, "{:indent$}{text};", "", indent = INDENT_WIDTH);
    }
}

impl EmissionSink for Printer {
    fn declare_and_assign(&mut self, type_name: &str, var: &str, value: &str) {
        self.statement(format_args!("final {type_name} {var} = {value}"));
    }

    fn declare_empty_list(&mut self, element_type: &str, var: &str) {
        self.declare_and_assign(&format!("List<{element_type}>"), var, "new ArrayList<>()");
    }

    fn declare_empty_set(&mut self, element_type: &str, var: &str) {
        self.declare_and_assign(&format!("Set<{element_type}>"), var, "new HashSet<>()");
    }

    fn append_to_collection(&mut self, collection: &str, value: &str) {
        self.statement(format_args!("{collection}.add({value})"));
    }

    fn call_method(&mut self, owner: &str, method: &str, arg: &str) {
        self.statement(format_args!("{owner}.{method}({arg})"));
    }

    fn blank_line(&mut self) {
        if !self.blank_printed {
            self.output.push('\n');
        }
        self.blank_printed = true;
    }

    fn render(&self) -> String {
        self.output.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_are_indented_and_terminated() {
        let mut p = Printer::new();
        p.declare_and_assign("Home", "home", "new Home()");
        p.declare_empty_list("String", "tags");
        p.declare_empty_set("Address", "addresses");
        p.append_to_collection("tags", "\"abcde\"");
        p.call_method("home", "setTags", "tags");
        assert_eq!(
            p.render(),
            concat!(
                "    final Home home = new Home();\n",
                "    final List<String> tags = new ArrayList<>();\n",
                "    final Set<Address> addresses = new HashSet<>();\n",
                "    tags.add(\"abcde\");\n",
                "    home.setTags(tags);\n",
            )
        );
    }

    #[test]
    fn consecutive_blank_lines_collapse() {
        let mut p = Printer::new();
        p.call_method("a", "setB", "b");
        p.blank_line();
        p.blank_line();
        p.call_method("a", "setC", "c");
        p.blank_line();
        assert_eq!(p.render(), "    a.setB(b);\n\n    a.setC(c);\n\n");
        assert_eq!(p.clone().into_string(), p.render());
    }
}
