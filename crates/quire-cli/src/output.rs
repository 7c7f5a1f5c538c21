//! Output renderers and formatting helpers for CLI commands.

use std::io::Write;
use std::sync::PoisonError;

use anyhow::anyhow;
use quire_core::FileRecord;
use quire_telemetry::SharedWriter;

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};

const FINGERPRINT_WIDTH: usize = 12;

pub(crate) fn render_cache_records(
    records: &[FileRecord],
    format: OutputFormat,
    output: &SharedWriter,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(records)
                .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
            write_output(output, &text)
        }
        OutputFormat::Table => {
            let mut lines = Vec::with_capacity(records.len() + 2);
            lines.push(format!(
                "{:<12} {:>6} {:<9} {:<20} PATH",
                "FINGERPRINT", "ERRORS", "HIGHEST", "ANALYZED"
            ));
            for record in records {
                lines.push(format!(
                    "{:<12} {:>6} {:<9} {:<20} {}",
                    short_fingerprint(record.fingerprint.as_str()),
                    record.error_count(),
                    record
                        .highest_severity()
                        .map_or("-", quire_core::Severity::as_str),
                    record.last_analyzed.format("%Y-%m-%d %H:%M:%S").to_string(),
                    record.path().display()
                ));
            }
            lines.push(format!("{} cached file(s)", records.len()));
            write_output(output, &lines.join("\n"))
        }
    }
}

pub(crate) fn write_output(output: &SharedWriter, text: &str) -> CliResult<()> {
    let mut sink = output.lock().unwrap_or_else(PoisonError::into_inner);
    writeln!(sink, "{text}")
        .and_then(|()| sink.flush())
        .map_err(|err| CliError::failure(anyhow!("failed to write output: {err}")))
}

#[must_use]
pub(crate) fn short_fingerprint(fingerprint: &str) -> &str {
    fingerprint
        .get(..FINGERPRINT_WIDTH)
        .unwrap_or(fingerprint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_core::{ErrorRecord, Fingerprint, Severity};
    use quire_test_support::capture::SharedBuffer;
    use std::sync::{Arc, Mutex};

    fn shared(buffer: &SharedBuffer) -> SharedWriter {
        let sink: Box<dyn Write + Send> = Box::new(buffer.clone());
        Arc::new(Mutex::new(sink))
    }

    fn records() -> Vec<FileRecord> {
        vec![
            FileRecord::new("src/a.rs", Fingerprint::of_bytes(b"a"), Vec::new()),
            FileRecord::new(
                "src/b.rs",
                Fingerprint::of_bytes(b"b"),
                vec![
                    ErrorRecord::new(Severity::Warning, "W1", Vec::<String>::new()),
                    ErrorRecord::new(Severity::Critical, "C1", Vec::<String>::new()),
                ],
            ),
        ]
    }

    #[test]
    fn short_fingerprint_truncates_long_values() {
        assert_eq!(short_fingerprint("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_fingerprint("abc"), "abc");
    }

    #[test]
    fn table_lists_each_record_with_highest_severity() {
        let buffer = SharedBuffer::new();
        render_cache_records(&records(), OutputFormat::Table, &shared(&buffer))
            .expect("render table");

        let lines = buffer.lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("FINGERPRINT"));
        assert!(lines[1].ends_with("src/a.rs"));
        assert!(lines[1].contains(" - "));
        assert!(lines[2].contains("critical"));
        assert!(lines[2].ends_with("src/b.rs"));
        assert_eq!(lines[3], "2 cached file(s)");
    }

    #[test]
    fn json_output_round_trips_records() {
        let buffer = SharedBuffer::new();
        let expected = records();
        render_cache_records(&expected, OutputFormat::Json, &shared(&buffer)).expect("render json");

        let parsed: Vec<FileRecord> =
            serde_json::from_str(&buffer.contents()).expect("valid json");
        assert_eq!(parsed, expected);
    }
}
