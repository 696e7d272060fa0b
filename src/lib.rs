//! Core library for the JSON Form Editor.
//! Loads a flat JSON object, renders each top-level key/value pair as an
//! editable form row, and writes edits back with the original JSON type of
//! every field preserved.

mod binder;
mod doc;
mod gui;
pub mod statics;
mod value;

pub use binder::{BindError, FieldBinding, FieldControl, bind_object};
pub use doc::{LineEnding, LoadedDoc, write_atomic};
pub use gui::run_gui;
pub use value::{DocNumber, DocValue};
