//! Public owner projection.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// The small public subset of a user document projected into listing joins.
///
/// User records are owned by the identity subsystem; this service never
/// writes them and only reads these four fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerProfile {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar: String,
}
