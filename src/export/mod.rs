//! Static export of the front-end.
//!
//! [`ExportSettings`] is the build configuration: packaging mode and image
//! pipeline. [`export`] turns a [`Site`](crate::ui::Site) into a directory of
//! files that any static host can serve.

mod pipeline;
mod settings;

pub use pipeline::{ExportReport, export};
pub use settings::{ExportMode, ExportSettings, ImageSettings};
