//! Orchestration for the OpenAPI to TypeScript generation pipeline.
//!
//! ```no_run
//! use oas3_tsgen::generator::orchestrator::Orchestrator;
//!
//! # fn example() -> anyhow::Result<()> {
//! let spec_json = std::fs::read_to_string("openapi.json")?;
//! let orchestrator = Orchestrator::from_value(serde_json::from_str(&spec_json)?)?;
//! let output = orchestrator.generate_with_header("openapi.json");
//!
//! println!("Generated {} types with {} warnings", output.stats.types_generated, output.stats.warnings.len());
//! std::fs::write("api.ts", output.code)?;
//! # Ok(())
//! # }
//! ```

use serde_json::Value;

use crate::generator::{
  ast::{GeneratedType, TypeOrigin},
  codegen::TypeScriptEmitter,
  document::{Document, DocumentError},
  metrics::GenerationStats,
  naming::NameIndex,
  operations::{OperationConverter, OperationTypes},
  type_resolver::TypeResolver,
};

/// Runs the generation pipeline over one document.
pub struct Orchestrator {
  document: Document,
}

/// Metadata about the OpenAPI document used for the generated file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeMetadata {
  pub title: String,
  pub version: String,
  pub description: Option<String>,
}

/// Structured result of a run, before any text is rendered.
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
  /// Component schemas in declared order, then declarations hoisted from other pointers in first-use
  /// order, then operation types in path and method order.
  pub types: Vec<GeneratedType>,
  pub operations: Vec<OperationTypes>,
  pub stats: GenerationStats,
}

#[derive(Debug, Clone)]
pub struct GeneratedFinalOutput {
  pub code: String,
  pub stats: GenerationStats,
}

impl Orchestrator {
  pub fn new(document: Document) -> Self {
    Self { document }
  }

  /// Builds the document model from parsed JSON and wraps it.
  pub fn from_value(root: Value) -> Result<Self, DocumentError> {
    Document::from_value(root).map(Self::new)
  }

  pub fn document(&self) -> &Document {
    &self.document
  }

  pub fn metadata(&self) -> CodeMetadata {
    let info = self.document.info();
    CodeMetadata {
      title: info.title.clone(),
      version: info.version.clone(),
      description: info.description.clone(),
    }
  }

  /// Generates every declaration of the document.
  ///
  /// Schema identifiers are reserved first, then pointer declarations as they are reached, then
  /// operation types. An operation type can never take the name of a component schema. Problems met along the way are collected in
  /// [`GenerationStats::warnings`] and never abort the run.
  pub fn generate(&self) -> GeneratedOutput {
    let mut stats = GenerationStats::default();
    let mut names = NameIndex::for_schemas(self.document.schemas().keys());
    stats.record_warnings(names.take_collisions());

    let (mut types, operations) = {
      let mut resolver = TypeResolver::new(&self.document, &mut names);

      let mut types: Vec<GeneratedType> = self
        .document
        .schemas()
        .iter()
        .map(|(name, node)| GeneratedType {
          ty: resolver.resolve_component(name, node),
          name: resolver.schema_identifier(name),
          docs: node.meta().documentation(),
          origin: TypeOrigin::Schema { name: name.clone() },
        })
        .collect();
      types.extend(resolver.take_hoisted());

      let operations: Vec<OperationTypes> = {
        let mut converter = OperationConverter::new(&mut resolver);
        self
          .document
          .paths()
          .iter()
          .flat_map(|(path, item)| {
            item
              .operations
              .iter()
              .map(move |(method, operation)| (path, item, *method, operation))
          })
          .map(|(path, item, method, operation)| converter.convert_operation(method, path, &item.parameters, operation))
          .collect()
      };
      types.extend(resolver.take_hoisted());

      stats.record_warnings(resolver.take_warnings());
      (types, operations)
    };

    for operation in &operations {
      types.extend(operation.generated_types(&mut names));
      stats.record_operation();
    }
    stats.record_warnings(names.take_collisions());
    stats.record_types(&types);

    GeneratedOutput {
      types,
      operations,
      stats,
    }
  }

  /// Generates TypeScript source without a file header.
  pub fn generate_code(&self) -> GeneratedFinalOutput {
    let GeneratedOutput { types, stats, .. } = self.generate();
    GeneratedFinalOutput {
      code: TypeScriptEmitter::render_declarations(&types),
      stats,
    }
  }

  /// Generates TypeScript source preceded by the auto-generated file header.
  pub fn generate_with_header(&self, source_path: &str) -> GeneratedFinalOutput {
    let GeneratedOutput { types, stats, .. } = self.generate();
    let metadata = self.metadata();
    GeneratedFinalOutput {
      code: TypeScriptEmitter::new(&metadata, source_path).emit(&types),
      stats,
    }
  }
}
