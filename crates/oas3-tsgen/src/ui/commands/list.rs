use std::path::Path;

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};
use oas3_tsgen::{
  generator::{document::Document, naming::operation_base_name},
  utils::spec::SpecLoader,
};

use crate::ui::{Colors, colors::IntoComfyColor, term_width};

/// Operations in generation order: base name, uppercase method, path.
fn operation_rows(document: &Document) -> Vec<(String, String, String)> {
  document
    .paths()
    .iter()
    .flat_map(|(path, item)| {
      item.operations.iter().map(move |(method, operation)| {
        (
          operation_base_name(*method, path, operation.operation_id.as_deref()),
          method.as_ref().to_uppercase(),
          path.clone(),
        )
      })
    })
    .collect()
}

pub async fn list_operations(input: &Path, colors: &Colors) -> anyhow::Result<()> {
  let document = SpecLoader::open(input).await?.parse()?;

  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  row.add_cell(Cell::new("TYPE PREFIX").fg(IntoComfyColor::into(colors.label())));
  row.add_cell(Cell::new("METHOD").fg(IntoComfyColor::into(colors.label())));
  row.add_cell(Cell::new("PATH").fg(IntoComfyColor::into(colors.label())));
  table.set_header(row);

  for (base_name, method, path) in operation_rows(&document) {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(base_name)
        .fg(IntoComfyColor::into(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(
      Cell::new(method)
        .fg(IntoComfyColor::into(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(path).fg(IntoComfyColor::into(colors.primary())));
    table.add_row(row);
  }

  println!("{table}");

  Ok(())
}
