//! The authenticated staff identity.

use serde::{Deserialize, Serialize};

use crate::types::lenient;
use crate::types::{Role, UserId};

/// The locally held record of who is logged in.
///
/// Serializes in the same shape the login endpoint returns, so the
/// persisted record and the wire payload are interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "id")]
    pub user_id: UserId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(rename = "name", default, deserialize_with = "lenient::text")]
    pub display_name: String,
    pub role: Role,
}
