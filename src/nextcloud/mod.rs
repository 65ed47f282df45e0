//! WebDAV file store (Nextcloud) holding avatar and facial images.

pub mod client;
pub mod error;
pub mod paths;

pub use client::{ArmazenamentoArquivos, NextcloudClient};
pub use error::NextcloudError;
