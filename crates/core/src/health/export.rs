use std::io::Write;
use std::path::Path;

use super::overview::OverviewRow;
use crate::error::Result;

/// Write the overview table as CSV.
///
/// Header: `Name,Generation,Blood Type` followed by one column per entry of
/// `conditions`; a member's cell is `Yes` when it has that condition and
/// empty otherwise.
///
/// # Errors
/// Returns an error if writing to `writer` fails.
pub fn export_csv<W: Write>(rows: &[OverviewRow], conditions: &[&str], writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);

    let mut header = vec!["Name", "Generation", "Blood Type"];
    header.extend_from_slice(conditions);
    out.write_record(&header)?;

    for row in rows {
        let mut record = Vec::with_capacity(3 + conditions.len());
        record.push(row.full_name.clone());
        record.push(row.generation.to_string());
        record.push(row.blood_type.clone().unwrap_or_default());
        for condition in conditions {
            let cell = if row.has_condition(condition) { "Yes" } else { "" };
            record.push(cell.to_string());
        }
        out.write_record(&record)?;
    }

    out.flush()?;
    Ok(())
}

/// Write the overview table to a CSV file. See [`export_csv`].
pub fn export_csv_file<P: AsRef<Path>>(rows: &[OverviewRow], conditions: &[&str], path: P) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    export_csv(rows, conditions, file)?;
    log::debug!(
        "Exported {} overview rows to '{}'",
        rows.len(),
        path.as_ref().display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, generation: u32, blood_type: Option<&str>, conditions: &[&str]) -> OverviewRow {
        OverviewRow {
            id: name.to_lowercase(),
            full_name: name.to_string(),
            generation,
            blood_type: blood_type.map(str::to_string),
            conditions: conditions.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_export_layout() {
        let rows = vec![
            row("Ada Marsh", 1, Some("A+"), &["diabetes"]),
            row("Ben", 2, None, &["asthma", "diabetes"]),
        ];
        let mut buf = Vec::new();
        export_csv(&rows, &["diabetes", "asthma"], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name,Generation,Blood Type,diabetes,asthma");
        assert_eq!(lines[1], "Ada Marsh,1,A+,Yes,");
        assert_eq!(lines[2], "Ben,2,,Yes,Yes");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_export_quotes_commas() {
        let rows = vec![row("Smith, Jr.", 3, None, &[])];
        let mut buf = Vec::new();
        export_csv(&rows, &[], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().nth(1), Some("\"Smith, Jr.\",3,"));
    }
}
