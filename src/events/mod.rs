//! Event handling module
//!
//! Change event model and forward payload construction.

pub mod change;

pub use change::{
    ChangeEvent, DEFAULT_MARKER_FIELD, Document, EventMetadata, ForwardPayload, ID_FIELD,
    IdPrecedence,
};
