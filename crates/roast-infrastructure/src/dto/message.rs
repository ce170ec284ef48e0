//! Message DTOs.

use super::{format_timestamp, parse_timestamp};
use roast_core::error::RoastError;
use roast_core::session::{Message, RoastTier, Sender};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderDTO {
    User,
    Ai,
}

impl From<SenderDTO> for Sender {
    fn from(dto: SenderDTO) -> Self {
        match dto {
            SenderDTO::User => Sender::User,
            SenderDTO::Ai => Sender::Ai,
        }
    }
}

impl From<Sender> for SenderDTO {
    fn from(sender: Sender) -> Self {
        match sender {
            Sender::User => SenderDTO::User,
            Sender::Ai => SenderDTO::Ai,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoastTierDTO {
    Mild,
    Medium,
    Nuclear,
}

impl From<RoastTierDTO> for RoastTier {
    fn from(dto: RoastTierDTO) -> Self {
        match dto {
            RoastTierDTO::Mild => RoastTier::Mild,
            RoastTierDTO::Medium => RoastTier::Medium,
            RoastTierDTO::Nuclear => RoastTier::Nuclear,
        }
    }
}

impl From<RoastTier> for RoastTierDTO {
    fn from(tier: RoastTier) -> Self {
        match tier {
            RoastTier::Mild => RoastTierDTO::Mild,
            RoastTier::Medium => RoastTierDTO::Medium,
            RoastTier::Nuclear => RoastTierDTO::Nuclear,
        }
    }
}

/// One stored transcript entry. Annotation fields are omitted when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDTO {
    pub id: String,
    pub content: String,
    pub sender: SenderDTO,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roast_tier: Option<RoastTierDTO>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_paywall_response: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_task: bool,
}

impl From<&Message> for MessageDTO {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.clone(),
            content: message.content.clone(),
            sender: message.sender.into(),
            timestamp: format_timestamp(&message.timestamp),
            roast_tier: message.roast_tier.map(Into::into),
            is_paywall_response: message.is_paywall_response,
            task_id: message.task_id.clone(),
            is_task: message.is_task,
        }
    }
}

impl TryFrom<MessageDTO> for Message {
    type Error = RoastError;

    fn try_from(dto: MessageDTO) -> Result<Self, Self::Error> {
        Ok(Message {
            id: dto.id,
            content: dto.content,
            sender: dto.sender.into(),
            timestamp: parse_timestamp(&dto.timestamp)?,
            roast_tier: dto.roast_tier.map(Into::into),
            is_paywall_response: dto.is_paywall_response,
            task_id: dto.task_id,
            is_task: dto.is_task,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_wire_shape() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let message = Message::ai("nice try", at)
            .with_tier(RoastTier::Nuclear)
            .as_paywall_response();
        let json = serde_json::to_value(MessageDTO::from(&message)).unwrap();

        assert_eq!(json["sender"], "ai");
        assert_eq!(json["timestamp"], "2024-03-01T12:00:00.000Z");
        assert_eq!(json["roastTier"], "nuclear");
        assert_eq!(json["isPaywallResponse"], true);
        assert!(json.get("taskId").is_none());
        assert!(json.get("isTask").is_none());
    }

    #[test]
    fn test_minimal_record_decodes() {
        let dto: MessageDTO = serde_json::from_str(
            r#"{"id":"msg_1","content":"hi","sender":"user","timestamp":"2024-03-01T12:00:00Z"}"#,
        )
        .unwrap();
        let message = Message::try_from(dto).unwrap();
        assert!(message.is_from_user());
        assert!(message.roast_tier.is_none());
        assert!(!message.is_task);
    }

    #[test]
    fn test_bad_timestamp_is_error() {
        let dto = MessageDTO {
            id: "msg_1".to_string(),
            content: "hi".to_string(),
            sender: SenderDTO::User,
            timestamp: "yesterday".to_string(),
            roast_tier: None,
            is_paywall_response: false,
            task_id: None,
            is_task: false,
        };
        assert!(Message::try_from(dto).unwrap_err().is_serialization());
    }
}
