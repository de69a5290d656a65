//! Front-end page shell.
//!
//! Pages are rendered to plain HTML strings so they can be written straight
//! to disk by the static export.
//!
//! # Structure
//!
//! - [`layout`]: Document shell and escaping helpers
//! - [`pages`]: Home and 404 pages
//! - [`site`]: Route table
//! - [`widget`]: Chat widget mount boundary

pub mod layout;
pub mod pages;
pub mod site;
pub mod widget;

pub use pages::{HomePage, NotFoundPage, Page, Rendering};
pub use site::{Route, Site};
pub use widget::{ChatWidget, TwinWidget};
