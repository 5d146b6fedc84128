use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use serde_json::Value;

static JSON_MEDIA_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"application/.*json").expect("bad regex"));

/// Returns `true` when `value` is a JSON reference object, i.e. it carries a string `$ref` field.
///
/// Every place that needs to tell references apart from inline objects goes through this check.
pub fn is_reference(value: &Value) -> bool {
  ref_path_of(value).is_some()
}

/// The `$ref` string of a reference object, or `None` for anything else.
pub fn ref_path_of(value: &Value) -> Option<&str> {
  value.as_object()?.get("$ref")?.as_str()
}

/// Parses a `$ref` string into the segments of its path.
///
/// `#/components/schemas/Pet` becomes `["components", "schemas", "Pet"]`. The leading fragment
/// marker is stripped, each segment is percent-decoded and JSON-pointer unescaped (`~1` is `/`,
/// `~0` is `~`). An empty reference yields an empty path. Parsing never fails: a path that does
/// not exist simply resolves to nothing when it is looked up.
pub fn parse_ref_path(ref_path: &str) -> Vec<String> {
  let fragment = ref_path.strip_prefix('#').unwrap_or(ref_path);
  let fragment = fragment.strip_prefix('/').unwrap_or(fragment);

  if fragment.is_empty() {
    return Vec::new();
  }

  fragment.split('/').map(decode_segment).collect()
}

fn decode_segment(segment: &str) -> String {
  let decoded = percent_decode_str(segment).decode_utf8_lossy();
  decoded.replace("~1", "/").replace("~0", "~")
}

/// Returns the component name when `path` points at `components/<kind>/<name>`.
pub fn component_name<'a>(path: &'a [String], kind: &str) -> Option<&'a str> {
  match path {
    [components, k, name] if components == "components" && k == kind => Some(name.as_str()),
    _ => None,
  }
}

/// Media types of the form `application/...json...` (`application/json`, `application/vnd.api+json`,
/// `application/json; charset=utf-8`). This is a plain pattern match, not content negotiation.
pub fn is_json_media_type(media_type: &str) -> bool {
  JSON_MEDIA_TYPE_RE.is_match(media_type)
}
