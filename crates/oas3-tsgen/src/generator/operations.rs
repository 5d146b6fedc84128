use indexmap::IndexMap;
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::{
  generator::{
    ast::{Documentation, GeneratedType, ObjectType, TsField, TsType, TypeOrigin},
    document::{HttpMethod, Operation},
    metrics::GenerationWarning,
    naming::{NameIndex, operation_base_name, status_suffix},
    type_resolver::TypeResolver,
  },
  reserved::escape_keyword,
  utils::refs::{is_json_media_type, parse_ref_path},
};

/// Parameter placement, in the order parameter groups are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ParameterIn {
  Path,
  Query,
  Header,
  Cookie,
}

impl ParameterIn {
  /// Identifier suffix and documentation label of the record grouping this placement.
  fn group(self) -> (&'static str, &'static str) {
    match self {
      Self::Path => ("PathParams", "Path parameters"),
      Self::Query => ("QueryParams", "Query parameters"),
      Self::Header => ("HeaderParams", "Header parameters"),
      Self::Cookie => ("CookieParams", "Cookie parameters"),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterType {
  pub name: String,
  pub location: ParameterIn,
  pub required: bool,
  pub ty: TsType,
  pub docs: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseType {
  pub status: String,
  /// `None` when the response declares no JSON content.
  pub ty: Option<TsType>,
}

/// Types extracted from one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationTypes {
  pub method: HttpMethod,
  pub path: String,
  pub base_name: String,
  pub docs: Documentation,
  pub parameters: Vec<ParameterType>,
  pub request_body: Option<TsType>,
  pub responses: Vec<ResponseType>,
}

impl OperationTypes {
  pub fn label(&self) -> String {
    format!("{} {}", self.method, self.path)
  }

  /// Flattens the operation into named declarations: one record per parameter placement, the
  /// request body, then one declaration per response status with JSON content.
  pub fn generated_types(&self, names: &mut NameIndex) -> Vec<GeneratedType> {
    let source = self.label();
    let mut types = Vec::new();
    let mut push = |names: &mut NameIndex, suffix: String, what: String, ty: TsType| {
      types.push(GeneratedType {
        name: names.reserve(&source, &format!("{}{suffix}", self.base_name)),
        ty,
        docs: Documentation {
          summary: Some(format!("{what} of `{} {}`", self.method.as_ref().to_uppercase(), self.path)),
          description: self.docs.summary.clone(),
          deprecated: self.docs.deprecated,
        },
        origin: TypeOrigin::Operation {
          method: self.method.to_string(),
          path: self.path.clone(),
        },
      });
    };

    for location in ParameterIn::iter() {
      let fields: Vec<TsField> = self
        .parameters
        .iter()
        .filter(|parameter| parameter.location == location)
        .map(|parameter| TsField {
          name: escape_keyword(&parameter.name),
          ty: parameter.ty.clone(),
          optional: !parameter.required,
          docs: parameter.docs.clone(),
        })
        .collect();

      if !fields.is_empty() {
        let ty = TsType::Object(ObjectType {
          fields,
          index_signature: None,
        });
        let (suffix, what) = location.group();
        push(names, suffix.to_string(), what.to_string(), ty);
      }
    }

    if let Some(body) = &self.request_body {
      push(names, "RequestBody".to_string(), "Request body".to_string(), body.clone());
    }

    for response in &self.responses {
      if let Some(ty) = &response.ty {
        push(
          names,
          format!("Response{}", status_suffix(&response.status)),
          format!("Response {}", response.status),
          ty.clone(),
        );
      }
    }

    types
  }
}

/// Returns the first media type object whose key looks like JSON, in declared order.
///
/// When several JSON-compatible entries exist the first one wins; no content negotiation happens.
pub fn select_json_media(content: &Map<String, Value>) -> Option<&Value> {
  content
    .iter()
    .find(|(media_type, _)| is_json_media_type(media_type))
    .map(|(_, media)| media)
}

/// Extracts parameter, request body and response types from operations.
pub struct OperationConverter<'r, 'a> {
  resolver: &'r mut TypeResolver<'a>,
}

impl<'r, 'a> OperationConverter<'r, 'a> {
  pub fn new(resolver: &'r mut TypeResolver<'a>) -> Self {
    Self { resolver }
  }

  /// Converts `operation`, merging in the parameters declared on its path item.
  /// Operation-level parameters override path-level ones with the same name and placement.
  pub fn convert_operation(
    &mut self,
    method: HttpMethod,
    path: &str,
    shared_parameters: &[Value],
    operation: &Operation,
  ) -> OperationTypes {
    self.resolver.set_context(format!("{method} {path}"));

    let mut parameters: IndexMap<(String, ParameterIn), ParameterType> = IndexMap::new();
    for raw in shared_parameters.iter().chain(&operation.parameters) {
      if let Some(parameter) = self.convert_parameter(raw) {
        parameters.insert((parameter.name.clone(), parameter.location), parameter);
      }
    }

    let request_body = operation
      .request_body
      .as_ref()
      .and_then(|raw| self.convert_content_holder(raw));

    let responses = operation
      .responses
      .iter()
      .map(|(status, raw)| ResponseType {
        status: status.clone(),
        ty: self.convert_content_holder(raw),
      })
      .collect();

    OperationTypes {
      method,
      path: path.to_string(),
      base_name: operation_base_name(method, path, operation.operation_id.as_deref()),
      docs: Documentation {
        summary: operation.summary.clone(),
        description: operation.description.clone(),
        deprecated: operation.deprecated,
      },
      parameters: parameters.into_values().collect(),
      request_body,
      responses,
    }
  }

  fn convert_parameter(&mut self, raw: &Value) -> Option<ParameterType> {
    let document = self.resolver.document();
    let resolved = match document.follow(raw) {
      Ok(resolved) => resolved,
      Err(reference) => {
        self.unresolved(&reference);
        let name = parse_ref_path(&reference).pop().unwrap_or(reference);
        return Some(ParameterType {
          name,
          location: ParameterIn::Query,
          required: false,
          ty: TsType::Any,
          docs: None,
        });
      }
    };

    let Some(object) = resolved.as_object() else {
      self.skip("parameter is not an object");
      return None;
    };
    let Some(name) = object.get("name").and_then(Value::as_str) else {
      self.skip("missing `name`");
      return None;
    };
    let location_tag = object.get("in").and_then(Value::as_str).unwrap_or_default();
    let Ok(location) = location_tag.parse::<ParameterIn>() else {
      self.skip(&format!("unknown location '{location_tag}' for '{name}'"));
      return None;
    };

    let ty = match (object.get("schema"), object.get("content").and_then(Value::as_object)) {
      (Some(schema), _) => self.resolver.resolve_value(schema),
      (None, Some(content)) => select_json_media(content).map_or(TsType::Any, |media| self.media_type(media)),
      (None, None) => TsType::Any,
    };

    Some(ParameterType {
      name: name.to_string(),
      location,
      required: location == ParameterIn::Path || object.get("required").and_then(Value::as_bool).unwrap_or(false),
      ty,
      docs: object.get("description").and_then(Value::as_str).map(String::from),
    })
  }

  /// Request bodies and responses: follow the `$ref`, then pick the JSON entry of `content`.
  fn convert_content_holder(&mut self, raw: &Value) -> Option<TsType> {
    let document = self.resolver.document();
    let resolved = match document.follow(raw) {
      Ok(resolved) => resolved,
      Err(reference) => {
        self.unresolved(&reference);
        return None;
      }
    };

    let content = resolved.get("content")?.as_object()?;
    let media = select_json_media(content)?;
    Some(self.media_type(media))
  }

  fn media_type(&mut self, media: &Value) -> TsType {
    match media.get("schema") {
      Some(schema) => self.resolver.resolve_value(schema),
      None => TsType::Any,
    }
  }

  fn unresolved(&mut self, reference: &str) {
    let context = self.resolver.context().to_string();
    self.resolver.warn(GenerationWarning::UnresolvedReference {
      reference: reference.to_string(),
      context,
    });
  }

  fn skip(&mut self, reason: &str) {
    let context = self.resolver.context().to_string();
    self.resolver.warn(GenerationWarning::SkippedParameter {
      context,
      reason: reason.to_string(),
    });
  }
}
