use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;

static RESERVED_KEYWORDS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "export",
    "extends",
    "finally",
    "for",
    "function",
    "if",
    "import",
    "in",
    "instanceof",
    "new",
    "return",
    "super",
    "switch",
    "this",
    "throw",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
    // TypeScript strict-mode and literal additions
    "enum",
    "interface",
    "let",
    "package",
    "private",
    "protected",
    "public",
    "static",
    "implements",
    "await",
    "null",
    "true",
    "false",
  ]
  .into_iter()
  .collect()
});

static VALID_IDENTIFIER_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("bad regex"));

pub fn is_reserved_keyword(name: &str) -> bool {
  RESERVED_KEYWORDS.contains(name)
}

/// Prefixes `name` with `_` when it is a reserved word. Everything else is returned unchanged.
pub fn escape_keyword(name: &str) -> String {
  if is_reserved_keyword(name) {
    format!("_{name}")
  } else {
    name.to_string()
  }
}

/// Whether `name` can be written as a bare property key in TypeScript.
pub fn is_valid_identifier(name: &str) -> bool {
  VALID_IDENTIFIER_RE.is_match(name)
}

/// Converts a schema name into a TypeScript type identifier.
///
/// # Rules:
/// 1. Periods and underscores are removed, not replaced (`Pet.Id` and `Pet_Id` both become `PetId`).
/// 2. Any other character that cannot appear in an identifier is removed.
/// 3. If the result starts with a digit, it's prefixed with `_`.
/// 4. If the result is empty, it becomes `Unnamed`.
/// 5. If the result is a reserved word, it's prefixed with `_`.
///
/// Applying it to its own output is a no-op.
pub fn to_type_identifier(name: &str) -> String {
  let mut ident: String = name
    .chars()
    .filter(|c| c.is_ascii_alphanumeric() || *c == '$')
    .collect();

  if ident.is_empty() {
    return "Unnamed".to_string();
  }

  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, '_');
    return ident;
  }

  escape_keyword(&ident)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_every_keyword_is_escaped() {
    for keyword in RESERVED_KEYWORDS.iter() {
      assert_eq!(escape_keyword(keyword), format!("_{keyword}"));
      assert_eq!(to_type_identifier(keyword), format!("_{keyword}"));
    }
  }

  #[test]
  fn test_escape_keyword_identity_for_non_keywords() {
    for name in ["Pet", "petId", "x-rate-limit", "Default", "classes", "_class"] {
      assert_eq!(escape_keyword(name), name);
    }
  }

  #[test]
  fn test_type_identifier_strips_periods_and_underscores() {
    assert_eq!(to_type_identifier("Pet.Id"), "PetId");
    assert_eq!(to_type_identifier("pet_id"), "petid");
    assert_eq!(to_type_identifier("v1.Pet_Status"), "v1PetStatus");
    assert_eq!(to_type_identifier("Pet.Id"), to_type_identifier("PetId"));
  }

  #[test]
  fn test_type_identifier_edge_cases() {
    assert_eq!(to_type_identifier("Foo-Bar Baz"), "FooBarBaz");
    assert_eq!(to_type_identifier("123Response"), "_123Response");
    assert_eq!(to_type_identifier(""), "Unnamed");
    assert_eq!(to_type_identifier("..__"), "Unnamed");
    assert_eq!(to_type_identifier("_delete"), "_delete");
  }

  #[test]
  fn test_sanitization_is_idempotent() {
    for name in [
      "Pet.Id", "class", "_class", "123abc", "", "Foo-Bar", "a_b.c", "yield", "$ref", "Ünïcode",
    ] {
      let once = to_type_identifier(name);
      assert_eq!(to_type_identifier(&once), once, "not idempotent for {name:?}");
      let escaped = escape_keyword(name);
      assert_eq!(escape_keyword(&escaped), escaped, "not idempotent for {name:?}");
    }
  }

  #[test]
  fn test_valid_identifier() {
    assert!(is_valid_identifier("petId"));
    assert!(is_valid_identifier("$meta"));
    assert!(is_valid_identifier("_private"));
    assert!(!is_valid_identifier("x-rate-limit"));
    assert!(!is_valid_identifier("1st"));
    assert!(!is_valid_identifier(""));
  }
}
