//! Calendar event reconciliation
//!
//! Write path: provider → [`normalizer`] → [`reconciler`].
//! Read path: [`query`] over the same store.

pub mod normalizer;
pub mod ports;
pub mod query;
pub mod reconciler;
pub mod service;
pub mod window;
