use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};

use crate::{
  generator::schema::SchemaNode,
  utils::refs::{parse_ref_path, ref_path_of},
};

/// Conditions under which no types can be generated at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
  #[error("OpenAPI document root must be a JSON object")]
  NotAnObject,
  #[error("OpenAPI document has no `components` object")]
  MissingComponents,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Info {
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub version: String,
  #[serde(default)]
  pub description: Option<String>,
}

/// HTTP methods an OpenAPI path item can carry, in generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum HttpMethod {
  Get,
  Put,
  Post,
  Delete,
  Options,
  Head,
  Patch,
  Trace,
}

/// An operation under one method of a path item.
///
/// Parameters, request body and responses may be `$ref`s into `components`, so they are kept
/// as raw values and resolved through [`Document::follow`] when types are extracted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Operation {
  pub operation_id: Option<String>,
  pub summary: Option<String>,
  pub description: Option<String>,
  pub deprecated: bool,
  pub parameters: Vec<Value>,
  pub request_body: Option<Value>,
  pub responses: IndexMap<String, Value>,
}

impl Operation {
  fn from_object(object: &Map<String, Value>) -> Self {
    let text = |key: &str| object.get(key).and_then(Value::as_str).map(String::from);

    Self {
      operation_id: text("operationId").filter(|id| !id.trim().is_empty()),
      summary: text("summary"),
      description: text("description"),
      deprecated: object.get("deprecated").and_then(Value::as_bool).unwrap_or(false),
      parameters: parameter_list(object),
      request_body: object.get("requestBody").cloned(),
      responses: object
        .get("responses")
        .and_then(Value::as_object)
        .map(|responses| {
          responses
            .iter()
            .map(|(status, response)| (status.clone(), response.clone()))
            .collect()
        })
        .unwrap_or_default(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathItem {
  /// Parameters shared by every operation of the path.
  pub parameters: Vec<Value>,
  /// Operations in [`HttpMethod`] order.
  pub operations: Vec<(HttpMethod, Operation)>,
}

impl PathItem {
  fn from_object(object: &Map<String, Value>) -> Self {
    let operations = HttpMethod::iter()
      .filter_map(|method| {
        object
          .get(method.as_ref())
          .and_then(Value::as_object)
          .map(|operation| (method, Operation::from_object(operation)))
      })
      .collect();

    Self {
      parameters: parameter_list(object),
      operations,
    }
  }
}

fn parameter_list(object: &Map<String, Value>) -> Vec<Value> {
  object
    .get("parameters")
    .and_then(Value::as_array)
    .cloned()
    .unwrap_or_default()
}

/// Upper bound on `$ref` hops followed by [`Document::follow`].
const MAX_REF_HOPS: usize = 32;

/// A decoded OpenAPI 3 document, read-only for the duration of a generation run.
#[derive(Debug, Clone)]
pub struct Document {
  root: Value,
  info: Info,
  schemas: IndexMap<String, SchemaNode>,
  paths: IndexMap<String, PathItem>,
}

impl Document {
  /// Builds the document model from an already-parsed JSON value.
  ///
  /// Unknown or malformed fields are tolerated. The only hard failures are a root that is not an
  /// object and a missing `components` object, since no schema can be generated without it.
  pub fn from_value(root: Value) -> Result<Self, DocumentError> {
    let object = root.as_object().ok_or(DocumentError::NotAnObject)?;
    let components = object
      .get("components")
      .and_then(Value::as_object)
      .ok_or(DocumentError::MissingComponents)?;

    let info = object
      .get("info")
      .cloned()
      .and_then(|info| serde_json::from_value(info).ok())
      .unwrap_or_default();

    let schemas = components
      .get("schemas")
      .and_then(Value::as_object)
      .map(|schemas| {
        schemas
          .iter()
          .map(|(name, node)| (name.clone(), SchemaNode::from(node)))
          .collect()
      })
      .unwrap_or_default();

    let paths = object
      .get("paths")
      .and_then(Value::as_object)
      .map(|paths| {
        paths
          .iter()
          .filter_map(|(path, item)| item.as_object().map(|item| (path.clone(), PathItem::from_object(item))))
          .collect()
      })
      .unwrap_or_default();

    Ok(Self {
      root,
      info,
      schemas,
      paths,
    })
  }

  pub fn info(&self) -> &Info {
    &self.info
  }

  /// `components.schemas` in declared order.
  pub fn schemas(&self) -> &IndexMap<String, SchemaNode> {
    &self.schemas
  }

  pub fn schema(&self, name: &str) -> Option<&SchemaNode> {
    self.schemas.get(name)
  }

  /// Path items in declared order.
  pub fn paths(&self) -> &IndexMap<String, PathItem> {
    &self.paths
  }

  /// Looks up `path` segment by segment. Array segments must be decimal indices.
  pub fn resolve(&self, path: &[String]) -> Option<&Value> {
    path.iter().try_fold(&self.root, |node, segment| match node {
      Value::Object(object) => object.get(segment),
      Value::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
      _ => None,
    })
  }

  pub fn resolve_ref(&self, ref_path: &str) -> Option<&Value> {
    self.resolve(&parse_ref_path(ref_path))
  }

  /// Follows `$ref` chains until a non-reference value is reached.
  ///
  /// Returns `Err` with the first reference that could not be resolved, or that loops back
  /// onto an earlier hop.
  pub fn follow<'a>(&'a self, value: &'a Value) -> Result<&'a Value, String> {
    let mut current = value;
    let mut seen = HashSet::new();

    while let Some(ref_path) = ref_path_of(current) {
      if !seen.insert(ref_path) || seen.len() > MAX_REF_HOPS {
        return Err(ref_path.to_string());
      }
      current = self.resolve_ref(ref_path).ok_or_else(|| ref_path.to_string())?;
    }

    Ok(current)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn petstore() -> Document {
    Document::from_value(json!({
      "openapi": "3.0.3",
      "info": { "title": "Petstore", "version": "1.0.0" },
      "paths": {
        "/pets": {
          "parameters": [{ "$ref": "#/components/parameters/Limit" }],
          "post": { "operationId": "createPet", "responses": {} },
          "get": { "operationId": "listPets", "responses": { "200": { "description": "ok" } } },
          "summary": "not an operation"
        }
      },
      "components": {
        "schemas": {
          "Zebra": { "type": "string" },
          "Aardvark": { "type": "integer" }
        },
        "parameters": {
          "Limit": { "name": "limit", "in": "query" },
          "Alias": { "$ref": "#/components/parameters/Limit" },
          "Loop": { "$ref": "#/components/parameters/Loop" }
        }
      }
    }))
    .unwrap()
  }

  #[test]
  fn test_missing_components_is_an_error() {
    let result = Document::from_value(json!({ "openapi": "3.0.0", "paths": {} }));
    assert_eq!(result.unwrap_err(), DocumentError::MissingComponents);
  }

  #[test]
  fn test_non_object_root_is_an_error() {
    let result = Document::from_value(json!(["openapi"]));
    assert_eq!(result.unwrap_err(), DocumentError::NotAnObject);
  }

  #[test]
  fn test_empty_components_is_accepted() {
    let document = Document::from_value(json!({ "components": {} })).unwrap();
    assert!(document.schemas().is_empty());
    assert!(document.paths().is_empty());
    assert_eq!(document.info(), &Info::default());
  }

  #[test]
  fn test_schemas_keep_declared_order() {
    let document = petstore();
    let names: Vec<&String> = document.schemas().keys().collect();
    assert_eq!(names, vec!["Zebra", "Aardvark"]);
  }

  #[test]
  fn test_operations_follow_method_order() {
    let document = petstore();
    let item = &document.paths()["/pets"];
    let methods: Vec<HttpMethod> = item.operations.iter().map(|(method, _)| *method).collect();
    assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Post]);
    assert_eq!(item.parameters.len(), 1);
    assert_eq!(item.operations[0].1.operation_id.as_deref(), Some("listPets"));
  }

  #[test]
  fn test_resolve() {
    let document = petstore();
    assert_eq!(
      document.resolve_ref("#/components/schemas/Zebra"),
      Some(&json!({ "type": "string" }))
    );
    assert_eq!(document.resolve_ref("#/components/schemas/Missing"), None);
    assert_eq!(document.resolve_ref("#/info/title/deeper"), None);
    assert_eq!(
      document.resolve_ref("#/paths/~1pets/parameters/0"),
      Some(&json!({ "$ref": "#/components/parameters/Limit" }))
    );
  }

  #[test]
  fn test_follow_reference_chains() {
    let document = petstore();
    let alias = json!({ "$ref": "#/components/parameters/Alias" });
    assert_eq!(
      document.follow(&alias),
      Ok(&json!({ "name": "limit", "in": "query" }))
    );

    let missing = json!({ "$ref": "#/components/parameters/Offset" });
    assert_eq!(document.follow(&missing), Err("#/components/parameters/Offset".to_string()));

    let looping = json!({ "$ref": "#/components/parameters/Loop" });
    assert_eq!(document.follow(&looping), Err("#/components/parameters/Loop".to_string()));
  }

  #[test]
  fn test_info_is_lenient() {
    let document = Document::from_value(json!({ "info": { "title": 5 }, "components": {} })).unwrap();
    assert_eq!(document.info(), &Info::default());
  }
}
