pub mod common;
pub mod cover;
pub mod generation;

pub use common::*;
pub use cover::*;
pub use generation::*;
