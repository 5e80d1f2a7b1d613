//! CSV export of registrations.

use chrono::{DateTime, Local, TimeZone, Utc};
use registration_store::RegistrationRecord;

/// Column headers, in output order.
pub const CSV_HEADERS: [&str; 7] = [
    "Full Name",
    "Class",
    "City",
    "State",
    "Phone Number",
    "Question",
    "Submitted At",
];

/// Attachment file name for exports.
pub const EXPORT_FILE_NAME: &str = "registrations.csv";

/// Render a timestamp as `M/D/YYYY, h:mm:ss AM` in the given zone.
pub fn format_submitted_at<Tz: TimeZone>(submitted_at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    submitted_at
        .with_timezone(tz)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}

/// Render records as a complete CSV document, one row per record in the
/// given order, with timestamps in server-local time.
pub fn render_csv(records: &[RegistrationRecord]) -> Result<Vec<u8>, csv::Error> {
    render_csv_in(records, &Local)
}

fn render_csv_in<Tz: TimeZone>(
    records: &[RegistrationRecord],
    tz: &Tz,
) -> Result<Vec<u8>, csv::Error>
where
    Tz::Offset: std::fmt::Display,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;

    for record in records {
        writer.write_record([
            record.full_name.as_str(),
            record.class_name.as_str(),
            record.city.as_str(),
            record.state.as_str(),
            record.phone_number.as_str(),
            record.question.as_str(),
            format_submitted_at(record.submitted_at, tz).as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use registration_store::{ClassName, NewRegistration};

    fn record(full_name: &str, question: &str, submitted_at: DateTime<Utc>) -> RegistrationRecord {
        RegistrationRecord::with_submitted_at(
            NewRegistration {
                full_name: full_name.into(),
                class_name: ClassName::Tenth,
                city: "Pune".into(),
                state: "MH".into(),
                phone_number: "9876543210".into(),
                question: question.into(),
            },
            submitted_at,
        )
    }

    #[test]
    fn test_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2025, 3, 7, 14, 5, 9).unwrap();
        assert_eq!(format_submitted_at(at, &Utc), "3/7/2025, 2:05:09 PM");

        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        assert_eq!(format_submitted_at(at, &ist), "3/7/2025, 7:35:09 PM");

        let midnight = Utc.with_ymd_and_hms(2025, 12, 25, 0, 0, 0).unwrap();
        assert_eq!(format_submitted_at(midnight, &Utc), "12/25/2025, 12:00:00 AM");
    }

    #[test]
    fn test_render_rows_in_order() {
        let at = Utc.with_ymd_and_hms(2025, 3, 7, 14, 5, 9).unwrap();
        let records = vec![record("John Doe", "", at), record("Asha Patel", "Fees?", at)];

        let csv = String::from_utf8(render_csv_in(&records, &Utc).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Full Name,Class,City,State,Phone Number,Question,Submitted At"
        );
        assert_eq!(lines[1], "John Doe,10th,Pune,MH,9876543210,,\"3/7/2025, 2:05:09 PM\"");
        assert_eq!(
            lines[2],
            "Asha Patel,10th,Pune,MH,9876543210,Fees?,\"3/7/2025, 2:05:09 PM\""
        );
    }

    #[test]
    fn test_render_quotes_special_characters() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        let records = vec![record("Doe, John", "Is \"math\" included?", at)];

        let csv = String::from_utf8(render_csv_in(&records, &Utc).unwrap()).unwrap();
        let row = csv.lines().nth(1).unwrap();

        assert!(row.starts_with("\"Doe, John\",10th,"));
        assert!(row.contains("\"Is \"\"math\"\" included?\""));
    }

    #[test]
    fn test_render_empty_has_header_only() {
        let csv = String::from_utf8(render_csv(&[]).unwrap()).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
