//! Tablature documents and their on-disk store.
//!
//! - [`model`]: [`TabData`] as posted by the editor and the [`SavedTab`] listing summary.
//! - [`store`]: [`TabStore`], one pretty-printed JSON file per saved tablature.

pub mod model;
pub mod store;

pub use model::{SavedTab, TabData};
pub use store::TabStore;
