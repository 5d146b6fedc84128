use indexmap::IndexMap;
use serde_json::Value;

use crate::{
  generator::{
    ast::{GeneratedType, ObjectType, TsField, TsLiteral, TsType, TypeOrigin},
    document::Document,
    metrics::GenerationWarning,
    naming::NameIndex,
    primitives::primitive_ts_type,
    schema::{AdditionalProperties, InlineSchema, SchemaNode, TypeTag},
  },
  reserved::{escape_keyword, to_type_identifier},
  utils::refs::{component_name, parse_ref_path},
};

/// A pointer outside `components.schemas` that gets a declaration of its own.
#[derive(Debug, Clone)]
struct HoistedPointer<'a> {
  reference: String,
  identifier: String,
  target: &'a Value,
}

/// Turns schema nodes into TypeScript type expressions.
///
/// Every reference resolves to a named type. References to `components.schemas` entries use the
/// schema's identifier. Any other pointer is hoisted: the first use reserves an identifier from its
/// last segment and queues a declaration, drained with [`TypeResolver::take_hoisted`]. Recursive
/// and shared pointers are therefore synthesized once and always terminate.
pub struct TypeResolver<'a> {
  document: &'a Document,
  names: &'a mut NameIndex,
  hoisted: IndexMap<Vec<String>, HoistedPointer<'a>>,
  next_hoisted: usize,
  context: String,
  warnings: Vec<GenerationWarning>,
}

impl<'a> TypeResolver<'a> {
  pub fn new(document: &'a Document, names: &'a mut NameIndex) -> Self {
    Self {
      document,
      names,
      hoisted: IndexMap::new(),
      next_hoisted: 0,
      context: String::from("document"),
      warnings: Vec::new(),
    }
  }

  /// Sets the label used in warnings raised from now on (`schema 'Pet'`, `get /pets`).
  pub fn set_context(&mut self, context: impl Into<String>) {
    self.context = context.into();
  }

  pub fn document(&self) -> &'a Document {
    self.document
  }

  pub fn context(&self) -> &str {
    &self.context
  }

  pub fn warn(&mut self, warning: GenerationWarning) {
    self.warnings.push(warning);
  }

  pub fn take_warnings(&mut self) -> Vec<GenerationWarning> {
    std::mem::take(&mut self.warnings)
  }

  /// The identifier declared for the component schema `name`.
  pub fn schema_identifier(&self, name: &str) -> String {
    self
      .names
      .schema_identifier(name)
      .map_or_else(|| to_type_identifier(name), String::from)
  }

  /// Synthesizes the declaration body of the component schema `name`.
  pub fn resolve_component(&mut self, name: &str, node: &SchemaNode) -> TsType {
    self.set_context(format!("schema '{name}'"));
    self.resolve(node)
  }

  /// Synthesizes a schema given as a raw JSON value.
  pub fn resolve_value(&mut self, value: &Value) -> TsType {
    self.resolve(&SchemaNode::from(value))
  }

  pub fn resolve(&mut self, node: &SchemaNode) -> TsType {
    let base = match node {
      SchemaNode::Reference(reference) => self.resolve_reference(&reference.ref_path),
      SchemaNode::Composite(composite) => {
        let members: Vec<TsType> = composite.variants.iter().map(|variant| self.resolve(variant)).collect();
        if composite.kind.is_union() {
          TsType::union(members)
        } else {
          TsType::intersection(members)
        }
      }
      SchemaNode::Inline(schema) => self.resolve_inline(schema),
    };

    if node.is_nullable() { base.nullable() } else { base }
  }

  /// Declarations for every pointer hoisted since the last call, in first-use order. Pointers
  /// first reached while synthesizing these are drained in the same call.
  pub fn take_hoisted(&mut self) -> Vec<GeneratedType> {
    let mut types = Vec::new();
    while let Some(pointer) = self.hoisted.get_index(self.next_hoisted).map(|(_, pointer)| pointer.clone()) {
      self.next_hoisted += 1;
      self.set_context(format!("pointer '{}'", pointer.reference));

      let node = SchemaNode::from(pointer.target);
      let ty = match self.document.follow(pointer.target) {
        Err(reference) if self.document.resolve_ref(&reference).is_some() => {
          self.warnings.push(GenerationWarning::CyclicReference {
            reference,
            context: self.context.clone(),
          });
          TsType::Any
        }
        _ => self.resolve(&node),
      };

      types.push(GeneratedType {
        name: pointer.identifier,
        ty,
        docs: node.meta().documentation(),
        origin: TypeOrigin::Pointer {
          reference: pointer.reference,
        },
      });
    }
    types
  }

  fn resolve_reference(&mut self, ref_path: &str) -> TsType {
    let path = parse_ref_path(ref_path);

    if let Some(schema_name) = component_name(&path, "schemas") {
      return match self.names.schema_identifier(schema_name) {
        Some(ident) => TsType::named(ident),
        None => self.unresolved(ref_path),
      };
    }

    if let Some(pointer) = self.hoisted.get(&path) {
      return TsType::named(pointer.identifier.as_str());
    }

    let (Some(segment), Some(target)) = (path.last(), self.document.resolve(&path)) else {
      return self.unresolved(ref_path);
    };

    let identifier = self.names.reserve(ref_path, segment);
    let ty = TsType::named(identifier.as_str());
    self.hoisted.insert(
      path,
      HoistedPointer {
        reference: ref_path.to_string(),
        identifier,
        target,
      },
    );
    ty
  }

  fn unresolved(&mut self, ref_path: &str) -> TsType {
    self.warnings.push(GenerationWarning::UnresolvedReference {
      reference: ref_path.to_string(),
      context: self.context.clone(),
    });
    TsType::Any
  }

  fn resolve_inline(&mut self, schema: &InlineSchema) -> TsType {
    if let Some(TypeTag::Unknown(tag)) = &schema.schema_type {
      self.warnings.push(GenerationWarning::UnknownTypeTag {
        tag: tag.clone(),
        context: self.context.clone(),
      });
    }

    if !schema.enum_values.is_empty() {
      return TsType::union(schema.enum_values.iter().map(TsLiteral::type_from_value));
    }

    if schema.is_array() {
      let items = match &schema.items {
        Some(items) => self.resolve(items),
        None => TsType::Any,
      };
      return TsType::array(items);
    }

    if schema.is_object() {
      return TsType::Object(self.resolve_object(schema));
    }

    primitive_ts_type(schema.known_type())
  }

  fn resolve_object(&mut self, schema: &InlineSchema) -> ObjectType {
    let mut fields = Vec::with_capacity(schema.properties.len());
    for (name, property) in &schema.properties {
      fields.push(TsField {
        name: escape_keyword(name),
        ty: self.resolve(property),
        optional: !schema.is_required(name),
        docs: property.meta().description.clone(),
      });
    }

    let index_signature = match &schema.additional_properties {
      Some(AdditionalProperties::Allowed(true)) => Some(Box::new(TsType::Any)),
      Some(AdditionalProperties::Schema(node)) => Some(Box::new(self.resolve(node))),
      Some(AdditionalProperties::Allowed(false)) | None => None,
    };

    ObjectType {
      fields,
      index_signature,
    }
  }
}
