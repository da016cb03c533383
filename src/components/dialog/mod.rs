//! Modal forms for editing graph elements.

mod edge;
mod host;
mod node;

pub use host::{DialogLayer, ModalHost};
