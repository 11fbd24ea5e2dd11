//! Renders schemas as TypeScript-like type expressions.

use crate::interpret::Interpreter;
use crate::schema::Literal;
use std::rc::Rc;

/// The interpretation that renders a schema as a type expression, such as
/// `{ id: number; tags?: Array<string> }`.
///
/// Recursive nodes render as their identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct Describe;

impl Interpreter for Describe {
    const ID: &'static str = "describe";
    type Output = String;

    fn literal(&self, values: &[Literal]) -> String {
        alternatives(values.iter().map(Literal::to_string).collect())
    }

    fn string(&self) -> String {
        "string".to_owned()
    }

    fn number(&self) -> String {
        "number".to_owned()
    }

    fn boolean(&self) -> String {
        "boolean".to_owned()
    }

    fn unknown_array(&self) -> String {
        "Array<unknown>".to_owned()
    }

    fn unknown_record(&self) -> String {
        "Record<string, unknown>".to_owned()
    }

    fn nullable(&self, inner: String) -> String {
        format!("{} | null", inner)
    }

    fn object(&self, fields: Vec<(String, String)>) -> String {
        members(fields, ": ")
    }

    fn partial(&self, fields: Vec<(String, String)>) -> String {
        members(fields, "?: ")
    }

    fn record(&self, codomain: String) -> String {
        format!("Record<string, {}>", codomain)
    }

    fn tuple(&self, components: Vec<String>) -> String {
        format!("[{}]", components.join(", "))
    }

    fn array(&self, item: String) -> String {
        format!("Array<{}>", item)
    }

    fn intersection(&self, left: String, right: String) -> String {
        format!("{} & {}", group(left), group(right))
    }

    fn tagged_union(&self, discriminator: &str, members: Vec<(String, String)>) -> String {
        alternatives(
            members
                .into_iter()
                .map(|(tag, member)| {
                    format!(
                        "{{ {}: {} }} & {}",
                        discriminator,
                        Literal::from(tag),
                        group(member)
                    )
                })
                .collect(),
        )
    }

    fn union(&self, members: Vec<String>) -> String {
        alternatives(members)
    }

    fn recursive(&self, id: &str, _factory: Rc<dyn Fn() -> String>) -> String {
        id.to_owned()
    }
}

fn alternatives(options: Vec<String>) -> String {
    if options.is_empty() {
        return "never".to_owned();
    }

    options.join(" | ")
}

fn members(fields: Vec<(String, String)>, separator: &str) -> String {
    if fields.is_empty() {
        return "{}".to_owned();
    }

    let fields: Vec<_> = fields
        .into_iter()
        .map(|(key, ty)| format!("{}{}{}", key, separator, ty))
        .collect();

    format!("{{ {} }}", fields.join("; "))
}

// Parenthesizes `ty` if it has a `|` outside of any brackets.
fn group(ty: String) -> String {
    let mut depth = 0;
    for c in ty.chars() {
        match c {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth -= 1,
            '|' if depth == 0 => return format!("({})", ty),
            _ => {}
        }
    }

    ty
}
