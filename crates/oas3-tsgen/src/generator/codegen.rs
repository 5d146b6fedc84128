use itertools::Itertools;

use crate::generator::{ast::GeneratedType, orchestrator::CodeMetadata};

/// Renders generated declarations as a TypeScript module.
pub struct TypeScriptEmitter<'a> {
  metadata: &'a CodeMetadata,
  source_path: &'a str,
}

impl<'a> TypeScriptEmitter<'a> {
  pub fn new(metadata: &'a CodeMetadata, source_path: &'a str) -> Self {
    Self { metadata, source_path }
  }

  /// Header comment followed by every declaration.
  pub fn emit(&self, types: &[GeneratedType]) -> String {
    let header = self.header();
    if types.is_empty() {
      return header;
    }
    format!("{header}\n{}", Self::render_declarations(types))
  }

  /// Declarations in order, separated by blank lines, with a trailing newline.
  pub fn render_declarations(types: &[GeneratedType]) -> String {
    if types.is_empty() {
      return String::new();
    }
    let mut code = types.iter().map(GeneratedType::to_declaration).join("\n\n");
    code.push('\n');
    code
  }

  fn header(&self) -> String {
    let description = self
      .metadata
      .description
      .as_deref()
      .map(str::trim)
      .filter(|description| !description.is_empty())
      .unwrap_or("No description provided");

    let entries = [
      "AUTO-GENERATED CODE - DO NOT EDIT!".to_string(),
      String::new(),
      self.metadata.title.clone(),
      format!("Source: {}", self.source_path),
      format!("Version: {}", self.metadata.version),
      "Generated by `oas3-tsgen`".to_string(),
      String::new(),
      description.to_string(),
    ];

    let body = entries.iter().flat_map(|entry| comment_lines(entry)).join("\n");
    format!("/**\n{body}\n */\n/* eslint-disable */\n")
  }
}

/// Lines of one header entry, with `*/` escaped so document text cannot close the comment.
fn comment_lines(text: &str) -> Vec<String> {
  let text = text.replace("*/", "*\\/");
  if text.is_empty() {
    return vec![" *".to_string()];
  }
  text
    .lines()
    .map(|line| if line.is_empty() { " *".to_string() } else { format!(" * {line}") })
    .collect()
}
