//! Legacy helpdesk adapter (ACL)
//!
//! Legacy records carry a stored priority but usually no severity or impact,
//! free-text categories, and a status vocabulary that predates the agent
//! workflow.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{AuditAction, AuditLog, Reply, ReplyType, Ticket, TicketRecord};
use crate::domain::services::PriorityCalculator;
use crate::domain::value_objects::{
    Impact, MainCategory, Priority, ReplyId, Service, Severity, SubCategory, TicketId, TicketNumber,
    TicketStatus, UserId,
};
use crate::error::{require_text, TicketError, TicketResult};

/// Service recorded when a legacy ticket has none
pub const UNKNOWN_SERVICE: &str = "Unknown Service";

/// Ticket as exported by the legacy helpdesk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTicketRecord {
    pub id: String,
    pub number: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub impact: Option<String>,
    pub main_category: String,
    #[serde(default)]
    pub sub_category: Option<String>,
    pub title: String,
    pub description: String,
    pub status: String,
    pub created_by: String,
    #[serde(default)]
    pub assigned_agent: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub last_reply_by: Option<String>,
    #[serde(default)]
    pub last_reply_at: Option<String>,
    pub last_updated_at: String,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub bcc: Vec<String>,
    #[serde(default)]
    pub service: String,
}

/// Reply as exported by the legacy helpdesk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyReplyRecord {
    pub id: String,
    pub ticket_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: String,
    #[serde(rename = "type")]
    pub reply_type: String,
}

/// Legacy helpdesk adapter
#[derive(Debug, Default, Clone, Copy)]
pub struct LegacyTicketAdapter;

impl LegacyTicketAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Parse a JSON array of legacy tickets. Any bad record rejects the batch.
    pub fn import_tickets_json(&self, json: &str) -> TicketResult<Vec<Ticket>> {
        let records: Vec<LegacyTicketRecord> = serde_json::from_str(json)
            .map_err(|e| TicketError::validation(format!("malformed legacy export: {e}")))?;
        records.into_iter().map(|record| self.translate_ticket(record)).collect()
    }

    pub fn translate_ticket(&self, record: LegacyTicketRecord) -> TicketResult<Ticket> {
        require_text("title", &record.title)?;
        require_text("description", &record.description)?;

        let number: TicketNumber = record.number.parse()?;
        let status = TicketStatus::from_legacy(&record.status).ok_or_else(|| {
            TicketError::validation(format!("{}: unknown status {:?}", record.number, record.status))
        })?;
        let (severity, impact) = self.triage(&record)?;

        let main_category = MainCategory::from_label(&record.main_category).unwrap_or_else(|| {
            tracing::warn!(
                ticket = %number,
                category = %record.main_category,
                "Unknown legacy category, filing as Uncategorized"
            );
            MainCategory::Uncategorized
        });
        let sub_category = record.sub_category.as_deref().and_then(|label| {
            let parsed = SubCategory::parse_for(main_category, label);
            if parsed.is_none() {
                tracing::debug!(ticket = %number, sub_category = %label, "Dropping sub-category outside {}", main_category);
            }
            parsed
        });

        let service = if record.service.trim().is_empty() {
            tracing::warn!(ticket = %number, "Legacy ticket has no service");
            Service::new(UNKNOWN_SERVICE)?
        } else {
            Service::new(record.service)?
        };

        let created_by = UserId::new(record.created_by);
        let created_at = parse_timestamp("createdAt", &record.created_at)?;
        let updated_at = parse_timestamp("updatedAt", &record.updated_at)?;
        let last_updated_at = parse_timestamp("lastUpdatedAt", &record.last_updated_at)?;
        let last_reply_at = non_blank(record.last_reply_at)
            .map(|at| parse_timestamp("lastReplyAt", &at))
            .transpose()?;

        let mut audit_log = AuditLog::new();
        audit_log.record(created_at, &created_by, AuditAction::TicketCreated, format!("Ticket {} created", number));

        let ticket = Ticket::from(TicketRecord {
            id: TicketId::from_string(record.id),
            number,
            title: record.title.trim().to_string(),
            description: record.description,
            severity,
            impact,
            priority: PriorityCalculator::calculate(severity, impact),
            main_category,
            sub_category,
            status,
            created_by,
            assigned_agent: non_blank(record.assigned_agent).map(UserId::new),
            service,
            cc: record.cc.into_iter().map(UserId::new).collect(),
            bcc: record.bcc.into_iter().map(UserId::new).collect(),
            attachments: vec![],
            close_reason: None,
            merged_into: None,
            created_at,
            updated_at,
            last_updated_at,
            last_reply_at,
            last_reply_by: non_blank(record.last_reply_by).map(UserId::new),
            closed_at: (status == TicketStatus::Closed).then_some(updated_at),
            audit_log,
        });

        Ok(ticket)
    }

    pub fn translate_reply(&self, record: LegacyReplyRecord) -> TicketResult<Reply> {
        require_text("reply content", &record.content)?;
        let reply_type = ReplyType::from_label(&record.reply_type).ok_or_else(|| {
            TicketError::validation(format!("unknown reply type {:?}", record.reply_type))
        })?;
        Ok(Reply::restore(
            ReplyId::from_string(record.id),
            TicketId::from_string(record.ticket_id),
            UserId::new(record.user_id),
            record.content,
            reply_type,
            parse_timestamp("createdAt", &record.created_at)?,
        ))
    }

    /// Severity and impact, falling back to the pair that reproduces the
    /// stored priority.
    fn triage(&self, record: &LegacyTicketRecord) -> TicketResult<(Severity, Impact)> {
        let severity = record.severity.as_deref().map(str::parse::<Severity>).transpose()?;
        let impact = record.impact.as_deref().map(str::parse::<Impact>).transpose()?;
        if let (Some(severity), Some(impact)) = (severity, impact) {
            return Ok((severity, impact));
        }

        let priority = match record.priority.as_deref() {
            Some(label) => label.parse::<Priority>()?,
            None => {
                tracing::warn!(ticket = %record.number, "Legacy ticket has no triage data, assuming Medium");
                Priority::Medium
            }
        };
        let (fallback_severity, fallback_impact) = Self::triage_for(priority);
        Ok((severity.unwrap_or(fallback_severity), impact.unwrap_or(fallback_impact)))
    }

    fn triage_for(priority: Priority) -> (Severity, Impact) {
        match priority {
            Priority::Low => (Severity::Low, Impact::Individual),
            Priority::Medium => (Severity::Medium, Impact::Department),
            Priority::High => (Severity::High, Impact::MultipleDepartments),
            Priority::Urgent => (Severity::Critical, Impact::EntireOrganization),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.fff]` taken as UTC.
fn parse_timestamp(field: &str, value: &str) -> TicketResult<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(at.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| TicketError::validation(format!("{field}: invalid timestamp {value:?}")))
}
