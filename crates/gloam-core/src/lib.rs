//! Core types for Gloam: narrative nodes, the unlock graph, and the world model.
//!
//! This crate defines the data a story session runs on. It is independent of
//! the command interpreter — you can construct a [`World`] programmatically or
//! deserialize a [`ContentPack`] from JSON.

/// Story content packs and their validation.
pub mod content;
/// Error types used throughout the crate.
pub mod error;
/// Narrative node types and identifiers.
pub mod node;
/// The world model that owns the node graph and session state.
pub mod world;

/// Re-export content types.
pub use content::ContentPack;
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export node types.
pub use node::{Node, NodeId, NodeKind};
/// Re-export world model types.
pub use world::{World, WorldSnapshot};
