#![doc(test(attr(deny(warnings))))]

//! Listing Core implements the listing-creation wizard of a real-estate site:
//! the draft model, per-step validation, eager media upload, payload
//! assembly, price and address formatting, and map-marker clustering.

pub mod address;
pub mod api;
pub mod cli;
pub mod config;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod localized;
pub mod map;
pub mod utils;
pub mod wizard;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Listing Core tracing initialized.");
    });
}
