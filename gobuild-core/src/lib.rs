//! # Gobuild Core Library
//!
//! Decides how Go toolchain commands must be invoked for the file being
//! edited (single file, whole directory, or inside a module), runs them off
//! the host task and reports the results back through an [`EditorHost`].

pub mod classifier;
pub mod dispatcher;
pub mod editor;
pub mod error;
pub mod models;
pub mod playground;
pub mod runner;
pub mod services;

pub use classifier::{ImportOrigin, ProjectContext, ProjectModeClassifier, SourceFile};
pub use dispatcher::{CommandOutcome, Dispatcher};
pub use editor::{Cursor, EditorHost};
pub use error::CommandError;
pub use models::{Invocation, ModuleCheck, PaletteCommand, Settings};
