//! Session DTO.

use super::message::RoastTierDTO;
use super::{format_timestamp, parse_timestamp};
use roast_core::error::RoastError;
use roast_core::session::Session;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stored form of [`Session`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDTO {
    pub id: String,
    pub username: String,
    pub message_count: u32,
    pub has_hit_paywall: bool,
    pub has_confessed: bool,
    pub has_paid: bool,
    pub current_tier: RoastTierDTO,
    pub session_started: String,
    pub last_activity: String,
    #[serde(default)]
    pub personal_info: BTreeMap<String, String>,
    #[serde(default)]
    pub completed_tasks: Vec<String>,
}

impl From<&Session> for SessionDTO {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            username: session.username.clone(),
            message_count: session.message_count,
            has_hit_paywall: session.has_hit_paywall,
            has_confessed: session.has_confessed,
            has_paid: session.has_paid,
            current_tier: session.current_tier.into(),
            session_started: format_timestamp(&session.session_started),
            last_activity: format_timestamp(&session.last_activity),
            personal_info: session.personal_info.clone(),
            completed_tasks: session.completed_tasks.iter().cloned().collect(),
        }
    }
}

impl TryFrom<SessionDTO> for Session {
    type Error = RoastError;

    fn try_from(dto: SessionDTO) -> Result<Self, Self::Error> {
        Ok(Session {
            id: dto.id,
            username: dto.username,
            message_count: dto.message_count,
            has_hit_paywall: dto.has_hit_paywall,
            has_confessed: dto.has_confessed,
            has_paid: dto.has_paid,
            current_tier: dto.current_tier.into(),
            session_started: parse_timestamp(&dto.session_started)?,
            last_activity: parse_timestamp(&dto.last_activity)?,
            personal_info: dto.personal_info,
            completed_tasks: dto.completed_tasks.into_iter().collect(),
        })
    }
}
