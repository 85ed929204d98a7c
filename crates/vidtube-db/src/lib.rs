//! MongoDB access layer.
//!
//! This crate provides:
//! - Typed repositories for videos and tweets
//! - The filtered/joined/sorted/paginated video listing pipeline
//! - Connection management and readiness probing

pub mod client;
pub mod error;
pub mod listing;
pub mod sorting;
pub mod tweet_repo;
pub mod video_repo;

pub use client::{Db, MongoConfig};
pub use error::{parse_object_id, DbError, DbResult};
pub use listing::VideoListQuery;
pub use sorting::{SortConfig, SortDirection};
pub use tweet_repo::TweetRepository;
pub use video_repo::VideoRepository;
