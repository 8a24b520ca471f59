//! TypeScript interface generation from serializer field descriptors.
//!
//! `serts-typegen` turns an already-extracted set of schema descriptors (one per
//! serializer, each an ordered list of typed fields) into one TypeScript
//! interface file per schema plus an index that re-exports them all.
//!
//! # Architecture
//!
//! ```text
//! Descriptors          Resolution             Output
//! ────────────     ──────────────────     ──────────────────
//! SchemaDescriptor ─> SchemaGraph ───────┬─> interface files (emit::interface)
//!   FieldDescriptor   (imports, cycles)  └─> index file      (emit::index)
//!        │
//!        └──> mapper ─> ir::Type (TypeScript type text)
//! ```
//!
//! The engine performs no I/O. Problems with individual fields or schemas are
//! collected in a [`Report`] next to the output; only a structurally invalid
//! descriptor set fails the whole run.
//!
//! # Example
//!
//! ```
//! use serts_typegen::{FieldDescriptor, PrimitiveType, SchemaDescriptor, TypeScriptOptions, translate};
//!
//! let schemas = vec![
//!     SchemaDescriptor::new("User", &["blog"], vec![
//!         FieldDescriptor::primitive("id", PrimitiveType::Integer),
//!         FieldDescriptor::choice("tag", &["a", "b"]),
//!     ]),
//!     SchemaDescriptor::new("Post", &["blog"], vec![
//!         FieldDescriptor::primitive("id", PrimitiveType::Integer),
//!         FieldDescriptor::nested("author", "User"),
//!     ]),
//! ];
//!
//! let translation = translate(&schemas, &TypeScriptOptions::bare()).unwrap();
//! assert_eq!(translation.files[0].path, "blog/Post.ts");
//! assert!(translation.files[0].contents.contains("import type { User } from './User';"));
//! assert!(translation.report.is_empty());
//! ```

pub mod descriptor;
pub mod diagnostics;
pub mod emit;
pub mod graph;
pub mod ir;
pub mod mapper;
pub mod options;
pub mod paths;
pub mod translate;

pub use descriptor::{
    DescriptorDocument, FieldDescriptor, FieldKind, PrimitiveType, SchemaDescriptor,
    strip_name_suffix,
};
pub use diagnostics::{Diagnostic, DiagnosticKind, Report, Severity};
pub use graph::{Cycle, ImportRequirement, SchemaGraph};
pub use ir::{Type, UnknownStyle};
pub use options::{OptionalStyle, TypeScriptOptions};
pub use translate::{OutputFile, TranslateError, Translation, translate};
