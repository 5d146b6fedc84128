use strum::{Display, EnumIter, EnumString};

use crate::generator::ast::TsType;

/// The closed set of OpenAPI `type` tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum SchemaType {
  Array,
  Boolean,
  Integer,
  Number,
  Object,
  String,
}

impl SchemaType {
  /// Parses a type tag. Tags outside the closed set yield `None`.
  pub fn from_tag(tag: &str) -> Option<Self> {
    tag.parse().ok()
  }

  /// Fallback TypeScript type for the tag, used when a schema carries no structural information.
  pub fn to_ts_type(self) -> TsType {
    match self {
      Self::Array => TsType::array(TsType::Any),
      Self::Boolean => TsType::Boolean,
      Self::Integer | Self::Number => TsType::Number,
      Self::Object => TsType::Any,
      Self::String => TsType::String,
    }
  }
}

/// Maps an optional type tag to a TypeScript type; an absent tag is `any`.
pub fn primitive_ts_type(schema_type: Option<SchemaType>) -> TsType {
  schema_type.map_or(TsType::Any, SchemaType::to_ts_type)
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn test_mapping_table() {
    let rendered: Vec<(String, String)> = SchemaType::iter()
      .map(|t| (t.to_string(), t.to_ts_type().to_string()))
      .collect();

    assert_eq!(
      rendered,
      vec![
        ("array".to_string(), "any[]".to_string()),
        ("boolean".to_string(), "boolean".to_string()),
        ("integer".to_string(), "number".to_string()),
        ("number".to_string(), "number".to_string()),
        ("object".to_string(), "any".to_string()),
        ("string".to_string(), "string".to_string()),
      ]
    );
  }

  #[test]
  fn test_unknown_or_absent_tag_is_any() {
    assert_eq!(SchemaType::from_tag("file"), None);
    assert_eq!(SchemaType::from_tag("String"), None);
    assert_eq!(SchemaType::from_tag(""), None);
    assert_eq!(primitive_ts_type(SchemaType::from_tag("file")), TsType::Any);
    assert_eq!(primitive_ts_type(None), TsType::Any);
  }

  #[test]
  fn test_known_tags_parse() {
    for schema_type in SchemaType::iter() {
      assert_eq!(SchemaType::from_tag(&schema_type.to_string()), Some(schema_type));
    }
  }
}
