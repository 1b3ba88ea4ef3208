use serde::{Deserialize, Deserializer, Serialize};

use crate::models::Decision;
use crate::validate::{self, ValidationError};

// -- Generic --

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub mode: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// -- Registration --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrationRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl RegistrationRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::username(&self.username)?;
        validate::password(&self.password)?;
        validate::email(&self.email)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfirmRegistrationRequest {
    pub email: String,
    /// Older clients send the code as a JSON number.
    #[serde(deserialize_with = "code_from_text_or_number")]
    pub code: String,
}

impl ConfirmRegistrationRequest {
    /// The code itself is judged by the core, so a malformed one is just
    /// another wrong code.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::email(&self.email)
    }
}

fn code_from_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

// -- Sessions --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub auth: bool,
    pub token: String,
    pub username: String,
}

// -- Delivery agent --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AcknowledgeDeliveryRequest {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AcknowledgeDeliveryResponse {
    pub status: String,
    pub acknowledged: usize,
}

// -- Presence --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PresenceUpdateRequest {
    pub status: String,
    pub game: String,
}

impl PresenceUpdateRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::presence(&self.status, &self.game)
    }
}

// -- Friends --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FriendRequestRequest {
    pub to: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RespondFriendRequest {
    pub from: String,
    pub decision: Decision,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FriendsResponse {
    pub friends: Vec<String>,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    pub to: String,
    pub content: String,
}

impl SendMessageRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::content(&self.content)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    /// Cursor: only messages with a larger id are returned.
    #[serde(default)]
    pub after: i64,
}
