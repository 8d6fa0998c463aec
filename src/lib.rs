//! Client for a locally hosted DreamLayer image-generation backend, plus a
//! disc-cover compositor.
//!
//! Modules:
//! - `client`: model listing, txt2img generation, image download, cover prompts.
//! - `compositor`: ring-masked compositing of generated art onto a disc template.
//! - `models`: request/response types and cover styles.
//! - `config`: endpoint and compositing settings.
//! - `logger`: colored console logger for the `log` facade.
//! - `error`: crate error type and `Result` alias.
pub mod client;
pub mod compositor;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;

pub use client::{DreamLayerClient, ImageClient, ModelClient};
pub use compositor::{CompositorOptions, DiscCompositor, ImageSource};
pub use config::DreamLayerConfig;
pub use error::{DreamLayerError, Result};
pub use models::*;
