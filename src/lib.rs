//! Observed-Schema Engine
//!
//! Infers a structural model of an XML vocabulary purely from example
//! documents (no formal grammar is available or trusted), then validates new
//! documents against the inferred model, diffs two models deterministically,
//! and turns the diffs into coverage reports and actionable checklists.
//!
//! ## Pipeline
//!
//! ```text
//! samples -> walker -> accumulator -> ObservedSchema -> store (snapshot)
//!                                          |
//!                 +------------------------+------------------------+
//!                 v                        v                        v
//!            validator                delta engine             coverage
//!       (schema x document)        (schema x schema)           reporter
//!                 |                        |
//!                 v                        v
//!         ValidationReport       checklist / coverage plan
//! ```
//!
//! The engine consumes parsed element trees; archive unpacking and XML
//! parsing belong to outer layers. Accumulation is a commutative monoid under
//! profile union, so the same sample set produces an identical schema in any
//! merge order. That is the reproducibility guarantee every downstream diff
//! relies on.

pub mod accumulate;
pub mod category;
pub mod checklist;
pub mod checksum;
pub mod config;
pub mod corpus;
pub mod coverage;
pub mod delta;
pub mod element;
pub mod error;
pub mod schema;
pub mod store;
pub mod validate;
pub mod walker;

pub use accumulate::SchemaBuilder;
pub use category::{Category, CategoryMatcher};
pub use checklist::{render_checklist, CoveragePlan, PlanItem};
pub use checksum::Checksum;
pub use config::EngineConfig;
pub use coverage::{coverage, coverage_of_corpus, CoverageReport, CoverageStat};
pub use delta::{SchemaDelta, TagChanges, ValueChange};
pub use element::{Element, Sample};
pub use error::{Result, SchemaError};
pub use schema::{AttrValues, ElementProfile, ObservedSchema, DEFAULT_VALUE_CAP};
pub use store::{load_snapshot, save_snapshot, SchemaStore};
pub use validate::{validate, Finding, FindingKind, Severity, ValidateOptions, ValidationReport};
pub use walker::{walk, walk_with_depth, Visit, Walk};
