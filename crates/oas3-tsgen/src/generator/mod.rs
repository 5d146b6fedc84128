pub mod ast;
pub mod codegen;
pub mod document;
pub mod metrics;
pub mod naming;
pub mod operations;
pub mod orchestrator;
pub mod primitives;
pub mod schema;
pub mod type_resolver;
