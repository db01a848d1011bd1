//! Support-ticket text for the Telegram risk-control channel.

use serde::{Deserialize, Serialize};

use crate::review::domain::KycRecord;
use crate::taxonomy;

const TICKET_HEADER: &str = "Juan365";

/// Editable ticket form state. `tags` holds the reviewer handles to ping,
/// in the order they were toggled on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDraft {
    pub member_id: String,
    pub name: String,
    pub reason: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Default for TicketDraft {
    fn default() -> Self {
        Self {
            member_id: String::new(),
            name: String::new(),
            reason: taxonomy::default_remark().to_string(),
            tags: Vec::new(),
        }
    }
}

impl TicketDraft {
    /// Seed the draft from the current review record, mirroring how the
    /// ticket form pre-fills from the extraction result.
    pub fn from_record(record: &KycRecord) -> Self {
        let reason = if record.remark_normalized.is_empty() {
            taxonomy::default_remark().to_string()
        } else {
            record.remark_normalized.clone()
        };
        Self {
            member_id: record.member_id.clone().unwrap_or_default(),
            name: record.name.clone().unwrap_or_default(),
            reason,
            tags: Vec::new(),
        }
    }

    /// Toggle a reviewer handle on or off the tag list.
    pub fn toggle_tag(&mut self, handle: &str) {
        if let Some(position) = self.tags.iter().position(|tag| tag == handle) {
            self.tags.remove(position);
        } else {
            self.tags.push(handle.to_string());
        }
    }

    /// Render the ticket text ready to paste into the channel.
    pub fn render(&self) -> String {
        let mut text = format!(
            "{TICKET_HEADER}\n\nMember ID : {}\nName : {}\n\nReason : {}",
            self.member_id, self.name, self.reason
        );
        if !self.tags.is_empty() {
            text.push_str("\n\n");
            text.push_str(&self.tags.join("\n"));
        }
        text
    }
}
