//! Dental-lab materials list driven by a simulated scroll session.
//!
//! The catalog stands in for the lab's materials endpoint; the session plays
//! the part of the list view, rendering rows into a software viewport and
//! scrolling until the trigger has paged through every result.

pub mod catalog;
pub mod session;
pub mod settings;

pub use catalog::{Category, Material, MaterialCatalog};
pub use session::ScrollSession;
pub use settings::DemoSettings;
