use indexmap::IndexMap;
use serde_json::{Map, Value};
use strum::Display;

use crate::{
  generator::{ast::Documentation, primitives::SchemaType},
  utils::refs::ref_path_of,
};

/// A schema node, discriminated once when it is read from the document.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
  Reference(Reference),
  Composite(Composite),
  Inline(InlineSchema),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
  pub ref_path: String,
  pub meta: SchemaMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CompositeKind {
  #[strum(to_string = "oneOf")]
  OneOf,
  #[strum(to_string = "anyOf")]
  AnyOf,
  #[strum(to_string = "allOf")]
  AllOf,
}

impl CompositeKind {
  /// Lookup order when a schema carries more than one combinator.
  const PRIORITY: [Self; 3] = [Self::OneOf, Self::AnyOf, Self::AllOf];

  pub fn is_union(self) -> bool {
    matches!(self, Self::OneOf | Self::AnyOf)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
  pub kind: CompositeKind,
  pub variants: Vec<SchemaNode>,
  pub meta: SchemaMeta,
}

/// The value of a `type` keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
  Known(SchemaType),
  Unknown(String),
}

impl TypeTag {
  fn parse(tag: &str) -> Self {
    SchemaType::from_tag(tag).map_or_else(|| Self::Unknown(tag.to_string()), Self::Known)
  }

  pub fn known(&self) -> Option<SchemaType> {
    match self {
      Self::Known(schema_type) => Some(*schema_type),
      Self::Unknown(_) => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
  Allowed(bool),
  Schema(Box<SchemaNode>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InlineSchema {
  pub schema_type: Option<TypeTag>,
  pub enum_values: Vec<Value>,
  pub items: Option<Box<SchemaNode>>,
  pub properties: IndexMap<String, SchemaNode>,
  pub required: Vec<String>,
  pub additional_properties: Option<AdditionalProperties>,
  pub meta: SchemaMeta,
}

impl InlineSchema {
  pub fn known_type(&self) -> Option<SchemaType> {
    self.schema_type.as_ref().and_then(TypeTag::known)
  }

  pub fn is_required(&self, property: &str) -> bool {
    self.required.iter().any(|name| name == property)
  }

  /// An unknown type tag counts as absent, so `items` alone still implies an array.
  pub fn is_array(&self) -> bool {
    match self.known_type() {
      Some(SchemaType::Array) => true,
      Some(_) => false,
      None => self.items.is_some(),
    }
  }

  /// Whether the schema describes a record: `type: object` with a shape, or a schema without a
  /// known type that declares properties.
  pub fn is_object(&self) -> bool {
    let has_shape = !self.properties.is_empty() || self.additional_properties.is_some();
    match self.known_type() {
      Some(SchemaType::Object) | None => has_shape,
      Some(_) => false,
    }
  }
}

/// Keywords shared by every node kind: nullability, documentation and passthrough extensions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaMeta {
  pub nullable: bool,
  pub title: Option<String>,
  pub description: Option<String>,
  pub deprecated: bool,
  pub extensions: IndexMap<String, Value>,
}

impl SchemaMeta {
  fn from_object(object: &Map<String, Value>) -> Self {
    let text = |key: &str| {
      object
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(String::from)
    };
    let flag = |key: &str| object.get(key).and_then(Value::as_bool).unwrap_or(false);

    Self {
      nullable: flag("nullable"),
      title: text("title"),
      description: text("description"),
      deprecated: flag("deprecated"),
      extensions: object
        .iter()
        .filter(|(key, _)| key.starts_with("x-"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect(),
    }
  }

  pub fn documentation(&self) -> Documentation {
    Documentation {
      summary: self.title.clone(),
      description: self.description.clone(),
      deprecated: self.deprecated,
    }
  }
}

impl SchemaNode {
  pub fn meta(&self) -> &SchemaMeta {
    match self {
      Self::Reference(reference) => &reference.meta,
      Self::Composite(composite) => &composite.meta,
      Self::Inline(inline) => &inline.meta,
    }
  }

  pub fn is_nullable(&self) -> bool {
    self.meta().nullable
  }

  fn from_object(object: &Map<String, Value>) -> Self {
    let mut meta = SchemaMeta::from_object(object);

    for kind in CompositeKind::PRIORITY {
      if let Some(Value::Array(children)) = object.get(&kind.to_string()) {
        return Self::Composite(Composite {
          kind,
          variants: children.iter().map(Self::from).collect(),
          meta,
        });
      }
    }

    let schema_type = match object.get("type") {
      Some(Value::String(tag)) => Some(TypeTag::parse(tag)),
      Some(Value::Array(tags)) => {
        let tags: Vec<&str> = tags.iter().filter_map(Value::as_str).collect();
        if tags.contains(&"null") {
          meta.nullable = true;
        }
        tags.into_iter().find(|tag| *tag != "null").map(TypeTag::parse)
      }
      _ => None,
    };

    let enum_values = match (object.get("enum"), object.get("const")) {
      (Some(Value::Array(values)), _) => values.clone(),
      (None, Some(value)) => vec![value.clone()],
      _ => Vec::new(),
    };

    let properties: IndexMap<String, SchemaNode> = object
      .get("properties")
      .and_then(Value::as_object)
      .map(|props| props.iter().map(|(name, node)| (name.clone(), Self::from(node))).collect())
      .unwrap_or_default();

    let required: Vec<String> = object
      .get("required")
      .and_then(Value::as_array)
      .map(|names| names.iter().filter_map(Value::as_str).map(String::from).collect())
      .unwrap_or_default();

    let additional_properties = match object.get("additionalProperties") {
      Some(Value::Bool(allowed)) => Some(AdditionalProperties::Allowed(*allowed)),
      Some(node @ Value::Object(_)) => Some(AdditionalProperties::Schema(Box::new(Self::from(node)))),
      _ => None,
    };

    Self::Inline(InlineSchema {
      schema_type,
      enum_values,
      items: object.get("items").map(|items| Box::new(Self::from(items))),
      properties,
      required,
      additional_properties,
      meta,
    })
  }
}

impl From<&Value> for SchemaNode {
  fn from(value: &Value) -> Self {
    if let Some(ref_path) = ref_path_of(value) {
      let meta = value.as_object().map(SchemaMeta::from_object).unwrap_or_default();
      return Self::Reference(Reference {
        ref_path: ref_path.to_string(),
        meta,
      });
    }

    match value {
      Value::Object(object) => Self::from_object(object),
      _ => Self::Inline(InlineSchema::default()),
    }
  }
}
