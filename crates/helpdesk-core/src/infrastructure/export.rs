//! CSV export of ticket lists

use csv::Writer;

use crate::application::dto::{category_label, CsvExport, ExportRange};
use crate::domain::aggregates::Ticket;
use crate::ports::inbound::UseCaseError;

pub const HEADERS: [&str; 10] = [
    "Ticket #",
    "Priority",
    "Category",
    "Title",
    "Description",
    "Status",
    "Created By",
    "Assigned Agent",
    "Date Created",
    "Service",
];

const UNASSIGNED: &str = "Unassigned";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writes already-filtered tickets as RFC 4180 CSV
pub struct CsvExporter {
    file_stem: String,
}

impl CsvExporter {
    pub fn new(file_stem: impl Into<String>) -> Self {
        Self { file_stem: file_stem.into() }
    }

    pub fn file_name(&self, range: &ExportRange) -> String {
        format!("{}{}.csv", self.file_stem, range.file_suffix())
    }

    pub fn export<'a, I>(&self, tickets: I, range: &ExportRange) -> Result<CsvExport, UseCaseError>
    where
        I: IntoIterator<Item = &'a Ticket>,
    {
        let mut writer = Writer::from_writer(Vec::new());
        writer
            .write_record(HEADERS)
            .map_err(|e| UseCaseError::Export(format!("Failed to write CSV headers: {}", e)))?;

        let mut row_count = 0;
        for ticket in tickets {
            writer
                .write_record(Self::row(ticket))
                .map_err(|e| UseCaseError::Export(format!("Failed to write CSV row: {}", e)))?;
            row_count += 1;
        }

        writer
            .flush()
            .map_err(|e| UseCaseError::Export(format!("Failed to flush CSV writer: {}", e)))?;
        let bytes = writer
            .into_inner()
            .map_err(|e| UseCaseError::Export(format!("Failed to get CSV output: {}", e)))?;
        let content = String::from_utf8(bytes)
            .map_err(|e| UseCaseError::Export(format!("CSV output is not UTF-8: {}", e)))?;

        Ok(CsvExport { file_name: self.file_name(range), content, row_count })
    }

    fn row(ticket: &Ticket) -> [String; 10] {
        [
            ticket.number().to_string(),
            ticket.priority().to_string(),
            category_label(ticket),
            ticket.title().to_string(),
            ticket.description().to_string(),
            ticket.status().to_string(),
            ticket.created_by().to_string(),
            ticket
                .assigned_agent()
                .map(|agent| agent.to_string())
                .unwrap_or_else(|| UNASSIGNED.to_string()),
            ticket.created_at().format(DATE_FORMAT).to_string(),
            ticket.service().to_string(),
        ]
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new("tickets_export")
    }
}
