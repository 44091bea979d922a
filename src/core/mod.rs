//! Cross-cutting plumbing shared by every pipeline phase.

pub mod dispatch;
pub mod error;
pub mod logging;
