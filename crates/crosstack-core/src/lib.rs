//! Crosstack definition model
//!
//! This crate provides the build-time definition model for crosstack:
//! deployable units ("stacks") declaring keyed tables and functions, and the
//! one-shot synthesis step that turns an app of stacks into per-stack
//! deployment artifacts.
//!
//! The model exists to make one coupling decision explicit: a consuming
//! stack references a table either through a typed [`TableHandle`] obtained
//! from the producing stack (which synthesis turns into an export/import
//! pair between the two artifacts) or through a plain name string (which
//! leaves both artifacts self-contained).
//!
//! ```text
//! ┌──────────────┐   TableHandle    ┌──────────────┐
//! │   producer   │ ───────────────▶ │   consumer   │   coupled artifacts
//! └──────────────┘  export/import   └──────────────┘
//!
//! ┌──────────────┐    "Users"       ┌──────────────┐
//! │   producer   │ ───────────────▶ │   consumer   │   independent artifacts
//! └──────────────┘   name string    └──────────────┘
//! ```

pub mod app;
pub mod artifact;
pub mod error;
pub mod resource;
pub mod stack;

mod synth;

// Re-exports
pub use app::App;
pub use artifact::{Export, GrantDecl, Import, ResourceDecl, StackArtifact};
pub use error::{Result, SynthError};
pub use resource::{
    AccessMode, EnvValue, FunctionSpec, Grant, KeyAttribute, KeyType, TableAttributes,
    TableHandle, TableRef, TableSpec,
};
pub use stack::Stack;
pub use synth::auto_export_name;
