use strum::Display;

use crate::generator::ast::{GeneratedType, TypeOrigin};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub types_generated: usize,
  pub schema_types_generated: usize,
  pub pointer_types_generated: usize,
  pub operation_types_generated: usize,
  pub operations_converted: usize,
  pub warnings: Vec<GenerationWarning>,
}

impl GenerationStats {
  pub fn record_type(&mut self, generated: &GeneratedType) {
    self.types_generated += 1;
    match generated.origin {
      TypeOrigin::Schema { .. } => self.schema_types_generated += 1,
      TypeOrigin::Pointer { .. } => self.pointer_types_generated += 1,
      TypeOrigin::Operation { .. } => self.operation_types_generated += 1,
    }
  }

  pub fn record_types(&mut self, types: &[GeneratedType]) {
    for generated in types {
      self.record_type(generated);
    }
  }

  pub fn record_operation(&mut self) {
    self.operations_converted += 1;
  }

  pub fn record_warning(&mut self, warning: GenerationWarning) {
    self.warnings.push(warning);
  }

  pub fn record_warnings(&mut self, warnings: impl IntoIterator<Item = GenerationWarning>) {
    self.warnings.extend(warnings);
  }
}

/// Non-fatal conditions met while generating. Each one degrades output locally instead of
/// aborting the run.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "Unresolved reference '{reference}' in {context}, using `any`")]
  UnresolvedReference { reference: String, context: String },
  /// A pointer whose target is a `$ref` chain looping back on itself.
  #[strum(to_string = "Cyclic reference '{reference}' in {context}, using `any`")]
  CyclicReference { reference: String, context: String },
  #[strum(to_string = "Unknown type '{tag}' in {context}, using `any`")]
  UnknownTypeTag { tag: String, context: String },
  #[strum(to_string = "Name '{source}' collides with '{identifier}', renamed to '{renamed_to}'")]
  NameCollision {
    source: String,
    identifier: String,
    renamed_to: String,
  },
  #[strum(to_string = "Skipped parameter in {context}: {reason}")]
  SkippedParameter { context: String, reason: String },
}

impl GenerationWarning {
  pub fn is_skipped_item(&self) -> bool {
    matches!(self, Self::SkippedParameter { .. })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::generator::ast::{Documentation, TsType};

  #[test]
  fn test_warning_messages() {
    let warning = GenerationWarning::UnresolvedReference {
      reference: "#/components/schemas/Missing".to_string(),
      context: "schema 'Pet'".to_string(),
    };
    assert_eq!(
      warning.to_string(),
      "Unresolved reference '#/components/schemas/Missing' in schema 'Pet', using `any`"
    );
    assert!(!warning.is_skipped_item());

    let skipped = GenerationWarning::SkippedParameter {
      context: "get /pets".to_string(),
      reason: "missing `name`".to_string(),
    };
    assert_eq!(skipped.to_string(), "Skipped parameter in get /pets: missing `name`");
    assert!(skipped.is_skipped_item());
  }

  #[test]
  fn test_record_types_by_origin() {
    let make = |origin| GeneratedType {
      name: "T".to_string(),
      ty: TsType::Any,
      docs: Documentation::default(),
      origin,
    };
    let types = vec![
      make(TypeOrigin::Schema { name: "Pet".to_string() }),
      make(TypeOrigin::Operation {
        method: "get".to_string(),
        path: "/pets".to_string(),
      }),
      make(TypeOrigin::Schema { name: "Tag".to_string() }),
      make(TypeOrigin::Pointer {
        reference: "#/definitions/Node".to_string(),
      }),
    ];

    let mut stats = GenerationStats::default();
    stats.record_types(&types);
    stats.record_operation();

    assert_eq!(stats.types_generated, 4);
    assert_eq!(stats.schema_types_generated, 2);
    assert_eq!(stats.pointer_types_generated, 1);
    assert_eq!(stats.operation_types_generated, 1);
    assert_eq!(stats.operations_converted, 1);
  }
}
