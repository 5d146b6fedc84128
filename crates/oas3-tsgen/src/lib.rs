//! Generates TypeScript type declarations from OpenAPI 3 documents.
//!
//! The [`generator`] module is pure: it takes an already-parsed JSON document and produces
//! ordered [`generator::ast::GeneratedType`] declarations. Loading from disk lives in
//! [`utils::spec`].

pub mod generator;
pub mod reserved;
pub mod utils;

#[cfg(test)]
mod tests;
