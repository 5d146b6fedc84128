use std::fmt::{self, Display, Write as _};

use itertools::Itertools;
use serde_json::Value;

use crate::reserved::is_valid_identifier;

const INDENT: &str = "  ";

/// A literal value usable as a TypeScript type (`"available"`, `42`, `true`).
#[derive(Debug, Clone, PartialEq)]
pub enum TsLiteral {
  String(String),
  Number(serde_json::Number),
  Boolean(bool),
}

impl TsLiteral {
  /// Converts an `enum`/`const` value into a literal type. `null` maps to the `null` type,
  /// arrays and objects have no literal form and map to `any`.
  pub fn type_from_value(value: &Value) -> TsType {
    match value {
      Value::String(s) => TsType::Literal(Self::String(s.clone())),
      Value::Number(n) => TsType::Literal(Self::Number(n.clone())),
      Value::Bool(b) => TsType::Literal(Self::Boolean(*b)),
      Value::Null => TsType::Null,
      Value::Array(_) | Value::Object(_) => TsType::Any,
    }
  }
}

impl Display for TsLiteral {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::String(s) => f.write_str(&quote(s)),
      Self::Number(n) => write!(f, "{n}"),
      Self::Boolean(b) => write!(f, "{b}"),
    }
  }
}

/// Structured TypeScript type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
  Any,
  Null,
  Boolean,
  Number,
  String,
  /// Reference to another generated declaration by identifier.
  Named(String),
  Literal(TsLiteral),
  Array(Box<TsType>),
  Union(Vec<TsType>),
  Intersection(Vec<TsType>),
  Object(ObjectType),
}

impl TsType {
  pub fn named(ident: impl Into<String>) -> Self {
    Self::Named(ident.into())
  }

  pub fn array(items: TsType) -> Self {
    Self::Array(Box::new(items))
  }

  /// Builds a union, keeping member order and duplicates. Nested unions are flattened,
  /// a single member collapses to itself and an empty member list is `any`.
  pub fn union(members: impl IntoIterator<Item = TsType>) -> Self {
    let flat: Vec<TsType> = members
      .into_iter()
      .flat_map(|member| match member {
        Self::Union(inner) => inner,
        other => vec![other],
      })
      .collect();
    Self::collapse(flat, Self::Union)
  }

  /// Builds an intersection with the same flattening rules as [`TsType::union`].
  pub fn intersection(members: impl IntoIterator<Item = TsType>) -> Self {
    let flat: Vec<TsType> = members
      .into_iter()
      .flat_map(|member| match member {
        Self::Intersection(inner) => inner,
        other => vec![other],
      })
      .collect();
    Self::collapse(flat, Self::Intersection)
  }

  fn collapse(mut members: Vec<TsType>, wrap: fn(Vec<TsType>) -> TsType) -> Self {
    match members.len() {
      0 => Self::Any,
      1 => members.remove(0),
      _ => wrap(members),
    }
  }

  /// Widens the type with an explicit `null` variant.
  #[must_use]
  pub fn nullable(self) -> Self {
    match self {
      Self::Null => Self::Null,
      Self::Union(mut members) => {
        if !members.contains(&Self::Null) {
          members.push(Self::Null);
        }
        Self::Union(members)
      }
      other => Self::Union(vec![other, Self::Null]),
    }
  }

  pub fn is_nullable(&self) -> bool {
    match self {
      Self::Null => true,
      Self::Union(members) => members.contains(&Self::Null),
      _ => false,
    }
  }

  /// Identifiers of every named type this expression refers to, in first-seen order.
  pub fn referenced_names(&self) -> Vec<&str> {
    let mut names = Vec::new();
    self.collect_names(&mut names);
    names.into_iter().unique().collect()
  }

  fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
    match self {
      Self::Named(name) => names.push(name),
      Self::Array(inner) => inner.collect_names(names),
      Self::Union(members) | Self::Intersection(members) => {
        for member in members {
          member.collect_names(names);
        }
      }
      Self::Object(object) => {
        for field in &object.fields {
          field.ty.collect_names(names);
        }
        if let Some(index) = &object.index_signature {
          index.collect_names(names);
        }
      }
      Self::Any | Self::Null | Self::Boolean | Self::Number | Self::String | Self::Literal(_) => {}
    }
  }

  /// Renders the type, indenting nested object bodies relative to `depth`.
  pub fn render(&self, depth: usize) -> String {
    let mut out = String::new();
    self.write_to(&mut out, depth);
    out
  }

  fn write_to(&self, out: &mut String, depth: usize) {
    match self {
      Self::Any => out.push_str("any"),
      Self::Null => out.push_str("null"),
      Self::Boolean => out.push_str("boolean"),
      Self::Number => out.push_str("number"),
      Self::String => out.push_str("string"),
      Self::Named(name) => out.push_str(name),
      Self::Literal(literal) => {
        let _ = write!(out, "{literal}");
      }
      Self::Array(inner) => {
        if matches!(**inner, Self::Union(_) | Self::Intersection(_)) {
          out.push('(');
          inner.write_to(out, depth);
          out.push(')');
        } else {
          inner.write_to(out, depth);
        }
        out.push_str("[]");
      }
      Self::Union(members) => {
        for (i, member) in members.iter().enumerate() {
          if i > 0 {
            out.push_str(" | ");
          }
          member.write_to(out, depth);
        }
      }
      Self::Intersection(members) => {
        for (i, member) in members.iter().enumerate() {
          if i > 0 {
            out.push_str(" & ");
          }
          if matches!(member, Self::Union(_)) {
            out.push('(');
            member.write_to(out, depth);
            out.push(')');
          } else {
            member.write_to(out, depth);
          }
        }
      }
      Self::Object(object) => object.write_to(out, depth),
    }
  }
}

impl Display for TsType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.render(0))
  }
}

/// A structural record type: named fields plus an optional `[key: string]` index signature.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectType {
  pub fields: Vec<TsField>,
  pub index_signature: Option<Box<TsType>>,
}

impl ObjectType {
  pub fn field(&self, name: &str) -> Option<&TsField> {
    self.fields.iter().find(|field| field.name == name)
  }

  fn write_to(&self, out: &mut String, depth: usize) {
    if self.fields.is_empty() && self.index_signature.is_none() {
      out.push_str("{}");
      return;
    }

    let inner = INDENT.repeat(depth + 1);
    out.push_str("{\n");
    for field in &self.fields {
      if let Some(docs) = &field.docs {
        for line in jsdoc_lines(docs, false) {
          let _ = writeln!(out, "{inner}{line}");
        }
      }
      let _ = write!(
        out,
        "{inner}{}{}: ",
        property_key(&field.name),
        if field.optional { "?" } else { "" }
      );
      field.ty.write_to(out, depth + 1);
      out.push_str(";\n");
    }
    if let Some(index) = &self.index_signature {
      let _ = write!(out, "{inner}[key: string]: ");
      index.write_to(out, depth + 1);
      out.push_str(";\n");
    }
    out.push_str(&INDENT.repeat(depth));
    out.push('}');
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TsField {
  pub name: String,
  pub ty: TsType,
  pub optional: bool,
  pub docs: Option<String>,
}

/// Documentation carried over from the source schema.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Documentation {
  pub summary: Option<String>,
  pub description: Option<String>,
  pub deprecated: bool,
}

impl Documentation {
  pub fn is_empty(&self) -> bool {
    self.summary.is_none() && self.description.is_none() && !self.deprecated
  }

  /// Lines of a `/** ... */` block, or nothing when there is no documentation.
  pub fn to_jsdoc(&self) -> Vec<String> {
    if self.is_empty() {
      return Vec::new();
    }

    let mut text = [self.summary.as_deref(), self.description.as_deref()]
      .into_iter()
      .flatten()
      .join("\n\n");
    if self.deprecated {
      if !text.is_empty() {
        text.push('\n');
      }
      text.push_str("@deprecated");
    }
    jsdoc_lines(&text, true)
  }
}

/// Where a generated declaration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeOrigin {
  Schema { name: String },
  /// A pointer outside `components.schemas`, declared on first use.
  Pointer { reference: String },
  Operation { method: String, path: String },
}

/// The unit of output: an identifier bound to a type expression.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedType {
  pub name: String,
  pub ty: TsType,
  pub docs: Documentation,
  pub origin: TypeOrigin,
}

impl GeneratedType {
  /// Renders the declaration as `export type Name = ...;` preceded by its JSDoc block.
  pub fn to_declaration(&self) -> String {
    let mut out = String::new();
    for line in self.docs.to_jsdoc() {
      let _ = writeln!(out, "{line}");
    }
    let _ = write!(out, "export type {} = {};", self.name, self.ty.render(0));
    out
  }
}

fn quote(s: &str) -> String {
  serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}

fn property_key(name: &str) -> String {
  if is_valid_identifier(name) {
    name.to_string()
  } else {
    quote(name)
  }
}

fn jsdoc_lines(text: &str, force_block: bool) -> Vec<String> {
  let text = text.replace("*/", "*\\/");
  let lines: Vec<&str> = text.trim().lines().collect();

  if lines.len() == 1 && !force_block {
    return vec![format!("/** {} */", lines[0])];
  }

  let mut out = Vec::with_capacity(lines.len() + 2);
  out.push("/**".to_string());
  out.extend(lines.iter().map(|line| {
    if line.is_empty() {
      " *".to_string()
    } else {
      format!(" * {line}")
    }
  }));
  out.push(" */".to_string());
  out
}
