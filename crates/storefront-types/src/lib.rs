//! Data model shared by the storefront client crates.

pub mod catalog;
pub mod item;
mod lenient;
pub mod session;
pub mod view;

pub use catalog::{CatalogQuery, CatalogResult};
pub use item::{Item, ItemFields, ItemId, ValidationError};
pub use session::Session;
pub use view::View;
