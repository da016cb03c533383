mod component;
mod layout;
mod port;
mod render;
mod state;

pub use component::{OntologyGraphCanvas, SharedGraph};
pub use state::GraphCanvasState;
