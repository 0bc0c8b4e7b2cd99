//! Exporting command history to portable files

use std::io::Write;

use chrono::NaiveDate;

use super::store::CommandRecord;
use crate::error::Result;

/// Default download name for a database snapshot, e.g. `voice_commands_2026-10-16.sqlite`
pub fn snapshot_file_name(date: NaiveDate) -> String {
    format!("voice_commands_{}.sqlite", date.format("%Y-%m-%d"))
}

pub fn csv_file_name(date: NaiveDate) -> String {
    format!("voice_commands_{}.csv", date.format("%Y-%m-%d"))
}

/// Write history rows as CSV: `id,timestamp,command,succeeded,response`
pub fn write_csv<W: Write>(records: &[CommandRecord], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["id", "timestamp", "command", "succeeded", "response"])?;
    for r in records {
        writer.write_record([
            r.id.to_string(),
            r.timestamp.clone(),
            r.command.clone(),
            r.succeeded.to_string(),
            r.response.clone().unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(snapshot_file_name(date), "voice_commands_2026-10-16.sqlite");
        assert_eq!(csv_file_name(date), "voice_commands_2026-10-16.csv");
    }

    #[test]
    fn test_csv_quotes_embedded_quotes() {
        let records = vec![CommandRecord {
            id: 7,
            command: "banana".to_string(),
            timestamp: "2026-10-16T09:00:00.000Z".to_string(),
            succeeded: false,
            response: Some("Sorry, I didn't understand: \"banana\"".to_string()),
        }];
        let mut buf = Vec::new();
        write_csv(&records, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("id,timestamp,command,succeeded,response"));
        assert_eq!(
            lines.next(),
            Some("7,2026-10-16T09:00:00.000Z,banana,false,\"Sorry, I didn't understand: \"\"banana\"\"\"")
        );
    }
}
