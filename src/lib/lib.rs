#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Delivers `wp_mail`-style calls through the Mailgun HTTP API

pub mod domain;
pub mod infrastructure;
