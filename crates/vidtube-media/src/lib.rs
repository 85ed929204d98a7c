//! Hosted media store adapter.
//!
//! This crate provides:
//! - Signed multipart upload of local files with bounded retry
//! - Best-effort deletion of remote assets by URL
//! - Asset kind classification from file extensions

pub mod asset;
pub mod client;
pub mod error;

pub use asset::{derive_public_id, AssetKind, DeleteOutcome, UploadedAsset};
pub use client::{MediaClient, MediaConfig};
pub use error::{MediaError, MediaResult};
