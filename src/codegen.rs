//! GraphQL SDL emission from the IR.
//!
//! A flat projection: one `scalar` line per scalar, one `type` block per
//! compound type, then `Query` and `Mutation`. Empty root blocks are skipped
//! since GraphQL rejects a type without fields.
use crate::ir::{GqlAttribute, GqlOperation, GqlSpec};
use crate::translate::ScalarTag;

pub struct Codegen {
    out: String,
    timestamp: bool,
}

impl Codegen {
    pub fn new() -> Self {
        Self { out: String::new(), timestamp: true }
    }

    /// Leaves out the generation time so output is byte-for-byte reproducible.
    pub fn without_timestamp(mut self) -> Self {
        self.timestamp = false;
        self
    }

    pub fn emit(&mut self, spec: &GqlSpec) {
        if self.timestamp {
            let at = spec.generation_time.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
            self.line(&format!("# Code generated by oas2gql at {at}. DO NOT EDIT."));
        } else {
            self.line("# Code generated by oas2gql. DO NOT EDIT.");
        }

        if !spec.scalars.is_empty() {
            self.blank();
            for scalar in &spec.scalars {
                self.line(&format!("scalar {}", scalar.name));
            }
        }

        for ty in &spec.types {
            self.blank();
            self.line(&format!("type {} {{", ty.name));
            for attr in &ty.attributes {
                self.line(&format!("  {}", field(attr)));
            }
            self.line("}");
        }

        self.emit_root("Query", &spec.queries);
        self.emit_root("Mutation", &spec.mutations);
    }

    fn emit_root(&mut self, name: &str, operations: &[GqlOperation]) {
        if operations.is_empty() {
            return;
        }
        self.blank();
        self.line(&format!("type {name} {{"));
        for op in operations {
            self.line(&format!("  # {}", op.origin));
            self.line(&format!("  {}", operation(op)));
        }
        self.line("}");
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }
}

impl Default for Codegen {
    fn default() -> Self {
        Self::new()
    }
}

fn field(attr: &GqlAttribute) -> String {
    let mut out = format!("{}: {}", attr.name, attr.ty);
    if attr.required {
        out.push('!');
    }
    push_hints(&mut out, &attr.hints);
    out
}

fn operation(op: &GqlOperation) -> String {
    let mut out = op.name.clone();
    if !op.parameters.is_empty() {
        let params = op.parameters.iter().map(field).collect::<Vec<_>>();
        out.push('(');
        out.push_str(&params.join(", "));
        out.push(')');
    }
    out.push_str(": ");
    // no-content responses still need a type in SDL
    if op.return_type.is_empty() {
        out.push_str(ScalarTag::Boolean.as_str());
    } else {
        out.push_str(&op.return_type);
    }
    push_hints(&mut out, &op.hints);
    out
}

fn push_hints(out: &mut String, hints: &[String]) {
    for hint in hints {
        out.push(' ');
        out.push_str(hint);
    }
}

/// Convenience: render with defaults.
pub fn render(spec: &GqlSpec, timestamp: bool) -> String {
    let mut cg = if timestamp { Codegen::new() } else { Codegen::new().without_timestamp() };
    cg.emit(spec);
    cg.into_string()
}
