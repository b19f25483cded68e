//! Engine configuration and the known-issues board

use arc_swap::ArcSwap;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::error::{require_text, TicketError, TicketResult};

/// Tunables of the ticket engine
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Quiet period after which an open ticket is overdue
    pub overdue_after_days: i64,
    /// Age after which editing a closed ticket raises a warning
    pub stale_closed_after_days: i64,
    /// CSV file name before the date-range suffix
    pub export_file_stem: String,
    /// Banner entries loaded at startup
    pub known_issues: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            overdue_after_days: 3,
            stale_closed_after_days: 30,
            export_file_stem: "tickets_export".to_string(),
            known_issues: vec![],
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_days("overdue_after_days", self.overdue_after_days)?;
        check_days("stale_closed_after_days", self.stale_closed_after_days)?;
        let stem = self.export_file_stem.trim();
        if stem.is_empty() || stem.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "export_file_stem must be a bare file name, got {:?}",
                self.export_file_stem
            )));
        }
        Ok(())
    }

    pub fn overdue_after(&self) -> Duration {
        Duration::try_days(self.overdue_after_days).unwrap_or(Duration::MAX)
    }

    pub fn stale_closed_after(&self) -> Duration {
        Duration::try_days(self.stale_closed_after_days).unwrap_or(Duration::MAX)
    }
}

/// Longest threshold accepted, ten years
pub const MAX_THRESHOLD_DAYS: i64 = 3650;

fn check_days(field: &str, days: i64) -> Result<(), ConfigError> {
    if !(1..=MAX_THRESHOLD_DAYS).contains(&days) {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between 1 and {MAX_THRESHOLD_DAYS}, got {days}"
        )));
    }
    Ok(())
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Process-wide list of known issues shown above every ticket list.
///
/// Readers take a snapshot; writers swap in a new list without blocking them.
pub struct KnownIssues {
    issues: ArcSwap<Vec<String>>,
    version: AtomicU64,
}

impl KnownIssues {
    pub fn new() -> Self {
        Self::with_issues(vec![])
    }

    pub fn with_issues(issues: Vec<String>) -> Self {
        Self {
            issues: ArcSwap::from_pointee(clean(issues)),
            version: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_issues(config.known_issues.clone())
    }

    pub fn snapshot(&self) -> Arc<Vec<String>> {
        self.issues.load_full()
    }

    /// Bumped on every change
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.issues.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.load().is_empty()
    }

    pub fn add(&self, issue: &str) -> TicketResult<()> {
        require_text("known issue", issue)?;
        let issue = issue.trim().to_string();
        self.issues.rcu(|current| {
            let mut next = (**current).clone();
            next.push(issue.clone());
            next
        });
        self.version.fetch_add(1, Ordering::Release);
        tracing::info!("Known issue added: {}", issue);
        Ok(())
    }

    pub fn remove(&self, index: usize) -> TicketResult<String> {
        let mut removed = None;
        self.issues.rcu(|current| {
            let mut next = (**current).clone();
            removed = (index < next.len()).then(|| next.remove(index));
            next
        });
        let removed = removed.ok_or_else(|| {
            TicketError::validation(format!("known issue index {index} out of bounds"))
        })?;
        self.version.fetch_add(1, Ordering::Release);
        tracing::info!("Known issue removed: {}", removed);
        Ok(removed)
    }

    pub fn replace(&self, issues: Vec<String>) {
        self.issues.store(Arc::new(clean(issues)));
        self.version.fetch_add(1, Ordering::Release);
    }
}

impl Default for KnownIssues {
    fn default() -> Self {
        Self::new()
    }
}

fn clean(issues: Vec<String>) -> Vec<String> {
    issues
        .into_iter()
        .map(|issue| issue.trim().to_string())
        .filter(|issue| !issue.is_empty())
        .collect()
}
