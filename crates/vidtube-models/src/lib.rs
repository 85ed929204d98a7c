//! Shared data models for the VidTube backend.
//!
//! This crate provides Serde-serializable types for:
//! - Video and tweet documents
//! - The public owner projection joined into listings
//! - Paginated listing results

pub mod page;
pub mod tweet;
pub mod user;
pub mod video;

// Re-export common types
pub use page::VideoPage;
pub use tweet::Tweet;
pub use user::OwnerProfile;
pub use video::{Video, VideoWithOwner};
