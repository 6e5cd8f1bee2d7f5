use serde::{Deserialize, Serialize};

use crate::types::{lenient_timestamp_opt, Timestamp, UserId};

/// A user surfaced by `/api/friends/discover` or listed by `/api/friends/friends`.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkUser {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub job_preference: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub origin_country: Option<String>,
    #[serde(default)]
    pub is_friend: bool,
    #[serde(default)]
    pub has_pending_request: bool,
    #[serde(default)]
    pub request_sent_by_me: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendRequestStatus {
    Pending,
    Accepted,
    Rejected,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FriendRequest {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub receiver_name: String,
    pub status: FriendRequestStatus,
    #[serde(default, with = "lenient_timestamp_opt")]
    pub created_at: Option<Timestamp>,
}

/// Body of `POST /api/friends/request`.
#[derive(Debug, Clone, Serialize)]
pub struct FriendRequestCreate {
    pub receiver_id: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_does_not_fail_the_list() {
        let json = r#"[
            {"id": "r1", "sender_id": "1", "receiver_id": "2", "status": "pending"},
            {"id": "r2", "sender_id": "3", "receiver_id": "2", "status": "blocked"}
        ]"#;
        let requests: Vec<FriendRequest> = serde_json::from_str(json).unwrap();
        assert_eq!(requests[0].status, FriendRequestStatus::Pending);
        assert_eq!(requests[1].status, FriendRequestStatus::Unknown);
    }
}
