//! Graph-state controller.
//!
//! Search, highlighting and edit reconciliation, all expressed against the
//! [`GraphPort`] contract so the canvas engine stays swappable.

mod controller;
mod element;
mod highlight;
mod port;
mod reconcile;
mod search;
mod style;
#[cfg(test)]
pub(crate) mod testing;

pub use controller::GraphController;
pub use element::{Attributes, EdgeElement, ElementKind, ElementPatch, ElementSet, GraphElement, NodeElement};
pub use port::{GraphEvent, GraphPort, LayoutConfig, RejectReason, Rejection, RenderSummary};
pub use reconcile::{DialogHost, DialogOutcome, EdgeForm, EdgeFormResult, NodeForm, run_edit_loop};
pub use search::{SearchMode, SearchOutcome};
pub use style::{ResolvedStyle, StyleSheet};
