use std::collections::HashSet;

use indexmap::IndexMap;
use inflections::Inflect;
use itertools::Itertools;

use crate::{
  generator::{document::HttpMethod, metrics::GenerationWarning},
  reserved::to_type_identifier,
};

/// Returns `base_name` when free, otherwise the first `base_name{N}` (N >= 2) not in `used_names`.
pub(crate) fn ensure_unique(base_name: &str, used_names: &HashSet<String>) -> String {
  if !used_names.contains(base_name) {
    return base_name.to_string();
  }
  let mut i = 2;
  loop {
    let new_name = format!("{base_name}{i}");
    if !used_names.contains(&new_name) {
      return new_name;
    }
    i += 1;
  }
}

/// Assigns every generated declaration a unique identifier.
///
/// Sanitization can map distinct source names to one identifier (`Pet.Id` and `PetId`). The first
/// name in declaration order keeps the identifier; later ones get a numeric suffix and a
/// [`GenerationWarning::NameCollision`] is recorded.
#[derive(Debug, Default)]
pub struct NameIndex {
  schemas: IndexMap<String, String>,
  used: HashSet<String>,
  collisions: Vec<GenerationWarning>,
}

impl NameIndex {
  /// Reserves identifiers for `components.schemas` names, in the order given.
  pub fn for_schemas<'a>(names: impl IntoIterator<Item = &'a String>) -> Self {
    let mut index = Self::default();
    for name in names {
      let ident = index.reserve(name, &to_type_identifier(name));
      index.schemas.insert(name.clone(), ident);
    }
    index
  }

  /// The identifier assigned to a component schema, if the schema exists.
  pub fn schema_identifier(&self, schema_name: &str) -> Option<&str> {
    self.schemas.get(schema_name).map(String::as_str)
  }

  /// Claims `candidate` (sanitized) for the declaration named `source` and returns the identifier
  /// actually assigned.
  pub fn reserve(&mut self, source: &str, candidate: &str) -> String {
    let sanitized = to_type_identifier(candidate);
    let ident = ensure_unique(&sanitized, &self.used);
    if ident != sanitized {
      self.collisions.push(GenerationWarning::NameCollision {
        source: source.to_string(),
        identifier: sanitized,
        renamed_to: ident.clone(),
      });
    }
    self.used.insert(ident.clone());
    ident
  }

  pub fn take_collisions(&mut self) -> Vec<GenerationWarning> {
    std::mem::take(&mut self.collisions)
  }
}

/// PascalCase base name for the declarations of one operation.
///
/// Uses the `operationId` when present, otherwise the method followed by the path segments, with
/// templated segments (`{petId}`) read as `By PetId`.
pub fn operation_base_name(method: HttpMethod, path: &str, operation_id: Option<&str>) -> String {
  let words = match operation_id {
    Some(id) => split_words(id),
    None => {
      let segments = path.split('/').filter(|segment| !segment.is_empty()).map(|segment| {
        match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
          Some(param) => format!("by {}", split_words(param)),
          None => split_words(segment),
        }
      });
      std::iter::once(method.to_string()).chain(segments).join(" ")
    }
  };

  to_type_identifier(&words.to_snake_case().to_pascal_case())
}

/// Suffix for a response status key: `200` stays as is, `default` becomes `Default`.
pub fn status_suffix(status: &str) -> String {
  let mut chars = status.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

fn split_words(raw: &str) -> String {
  raw
    .split(|c: char| !c.is_ascii_alphanumeric())
    .filter(|word| !word.is_empty())
    .join(" ")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ensure_unique() {
    let used: HashSet<String> = ["Pet".to_string(), "Pet2".to_string()].into_iter().collect();
    assert_eq!(ensure_unique("Dog", &used), "Dog");
    assert_eq!(ensure_unique("Pet", &used), "Pet3");
  }

  #[test]
  fn test_schema_identifiers() {
    let names = vec!["Pet".to_string(), "pet_status".to_string(), "class".to_string()];
    let mut index = NameIndex::for_schemas(&names);
    assert_eq!(index.schema_identifier("Pet"), Some("Pet"));
    assert_eq!(index.schema_identifier("pet_status"), Some("petstatus"));
    assert_eq!(index.schema_identifier("class"), Some("_class"));
    assert_eq!(index.schema_identifier("Missing"), None);
    assert!(index.take_collisions().is_empty());
  }

  #[test]
  fn test_colliding_schema_names_are_suffixed() {
    let names = vec!["PetId".to_string(), "Pet.Id".to_string(), "Pet_Id".to_string()];
    let mut index = NameIndex::for_schemas(&names);
    assert_eq!(index.schema_identifier("PetId"), Some("PetId"));
    assert_eq!(index.schema_identifier("Pet.Id"), Some("PetId2"));
    assert_eq!(index.schema_identifier("Pet_Id"), Some("PetId3"));

    let collisions = index.take_collisions();
    assert_eq!(collisions.len(), 2);
    assert_eq!(
      collisions[0],
      GenerationWarning::NameCollision {
        source: "Pet.Id".to_string(),
        identifier: "PetId".to_string(),
        renamed_to: "PetId2".to_string(),
      }
    );
    assert!(index.take_collisions().is_empty());
  }

  #[test]
  fn test_reserve_after_schemas() {
    let names = vec!["ListPetsResponse200".to_string()];
    let mut index = NameIndex::for_schemas(&names);
    assert_eq!(index.reserve("get /pets", "ListPetsResponse200"), "ListPetsResponse2002");
    assert_eq!(index.reserve("get /pets", "ListPetsQueryParams"), "ListPetsQueryParams");
  }

  #[test]
  fn test_operation_base_name_from_operation_id() {
    assert_eq!(operation_base_name(HttpMethod::Get, "/pets", Some("listPets")), "ListPets");
    assert_eq!(
      operation_base_name(HttpMethod::Get, "/pets", Some("pets.list_all")),
      "PetsListAll"
    );
  }

  #[test]
  fn test_operation_base_name_from_path() {
    assert_eq!(
      operation_base_name(HttpMethod::Get, "/pets/{petId}", None),
      "GetPetsByPetId"
    );
    assert_eq!(operation_base_name(HttpMethod::Delete, "/", None), "Delete");
    assert_eq!(
      operation_base_name(HttpMethod::Post, "/store/order-items", None),
      "PostStoreOrderItems"
    );
  }

  #[test]
  fn test_status_suffix() {
    assert_eq!(status_suffix("200"), "200");
    assert_eq!(status_suffix("default"), "Default");
    assert_eq!(status_suffix("4XX"), "4XX");
  }
}
