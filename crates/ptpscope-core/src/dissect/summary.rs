use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::protocols::ptp::MessageType;

use super::chain::{Outcome, RecordDissection};

/// Counters gathered over one dissection run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DissectSummary {
    /// Record headers read, skipped records included.
    pub records_read: u64,
    /// Records rejected by the reader (captured length above original).
    pub records_skipped: u64,
    /// Records whose chain ended without a decoder error.
    pub records_decoded: u64,
    pub records_failed: u64,
    /// Records handed to the sink.
    pub records_reported: u64,
    pub ptp_messages: u64,
    /// PTP messages per type name.
    pub message_types: BTreeMap<String, u64>,
    /// Failed records per error kind.
    pub failures: BTreeMap<String, u64>,
    /// Set when the file ended in the middle of a record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated_file: Option<String>,
}

impl DissectSummary {
    pub(crate) fn record_skipped(&mut self) {
        self.records_read += 1;
        self.records_skipped += 1;
    }

    pub(crate) fn record(&mut self, dissection: &RecordDissection<'_>) {
        self.records_read += 1;

        match &dissection.outcome {
            Outcome::Failed { error, .. } => {
                self.records_failed += 1;
                *self.failures.entry(error.kind().to_string()).or_default() += 1;
            }
            Outcome::Complete | Outcome::Stopped { .. } => self.records_decoded += 1,
        }

        if let Some(ptp) = &dissection.ptp {
            self.ptp_messages += 1;
            let name = match dissection.ptp_message_type() {
                Some(kind) => kind.name().to_string(),
                None => format!("Unknown({:#x})", ptp.header.message_type),
            };
            *self.message_types.entry(name).or_default() += 1;
        }
    }

    pub fn ptp_message_count(&self, kind: MessageType) -> u64 {
        self.message_types.get(kind.name()).copied().unwrap_or(0)
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated_file.is_some()
    }
}

impl fmt::Display for DissectSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records read, {} fully decoded",
            self.records_read, self.records_decoded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::DissectSummary;

    #[test]
    fn display_reports_read_and_decoded() {
        let summary = DissectSummary {
            records_read: 2,
            records_decoded: 1,
            records_failed: 1,
            ..DissectSummary::default()
        };
        assert_eq!(summary.to_string(), "2 records read, 1 fully decoded");
        assert!(!summary.is_truncated());
    }

    #[test]
    fn skipped_records_count_as_read() {
        let mut summary = DissectSummary::default();
        summary.record_skipped();
        assert_eq!(summary.records_read, 1);
        assert_eq!(summary.records_skipped, 1);
        assert_eq!(summary.records_decoded, 0);
    }
}
