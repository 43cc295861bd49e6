//! # Salon Export
//!
//! Writes the appointment list as CSV for spreadsheets.
//!
//! Blank fields are written as placeholder text (`Sin fecha`, `Desconocido`, ...)
//! so every cell in the sheet has a value.

use salon_core::appointment::or_placeholder;
use salon_core::constants::{
    PLACEHOLDER_CATEGORY, PLACEHOLDER_DATE, PLACEHOLDER_ID, PLACEHOLDER_NAME,
    PLACEHOLDER_SERVICE, PLACEHOLDER_TIME,
};
use salon_core::Appointment;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column titles of the exported sheet.
pub const HEADER: [&str; 6] = ["ID", "Nombre", "Categoría", "Servicio", "Fecha", "Hora"];

/// Default file name used by the CLI.
pub const DEFAULT_EXPORT_FILE: &str = "turnos.csv";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// Writes `records` as CSV to `writer`, header first.
pub fn write_csv<W: Write>(records: &[Appointment], writer: W) -> ExportResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER)?;

    for record in records {
        // Id 0 is never assigned, so it only appears in hand-edited documents.
        let id = if record.id == 0 {
            PLACEHOLDER_ID.to_string()
        } else {
            record.id.to_string()
        };
        csv_writer.write_record([
            id.as_str(),
            or_placeholder(&record.client_name, PLACEHOLDER_NAME),
            or_placeholder(&record.category, PLACEHOLDER_CATEGORY),
            or_placeholder(&record.service, PLACEHOLDER_SERVICE),
            or_placeholder(&record.date, PLACEHOLDER_DATE),
            or_placeholder(&record.time, PLACEHOLDER_TIME),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes `records` as CSV to the file at `path`, replacing it.
///
/// # Errors
///
/// Returns `ExportError::Io` if the file cannot be created or written.
pub fn export_csv(records: &[Appointment], path: &Path) -> ExportResult<()> {
    let file = File::create(path)?;
    write_csv(records, file)?;
    tracing::info!("exported {} appointments to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn record(id: u32, name: &str, date: &str) -> Appointment {
        Appointment {
            id,
            client_name: name.into(),
            category: "Uñas".into(),
            service: "Manicura".into(),
            date: date.into(),
            time: "11:00".into(),
        }
    }

    fn render(records: &[Appointment]) -> String {
        let mut buffer = Vec::new();
        write_csv(records, &mut buffer).expect("write to memory");
        String::from_utf8(buffer).expect("utf-8 output")
    }

    #[test]
    fn writes_header_and_rows() {
        let out = render(&[record(1, "Ana Gomez", "2026-03-05")]);
        assert_eq!(
            out,
            "ID,Nombre,Categoría,Servicio,Fecha,Hora\n1,Ana Gomez,Uñas,Manicura,2026-03-05,11:00\n"
        );
    }

    #[test]
    fn blank_fields_become_placeholders() {
        let out = render(&[record(0, "", "")]);
        let row = out.lines().nth(1).expect("one data row");
        assert_eq!(row, "Sin ID,Desconocido,Uñas,Manicura,Sin fecha,11:00");
    }

    #[test]
    fn empty_list_writes_only_the_header() {
        assert_eq!(render(&[]), "ID,Nombre,Categoría,Servicio,Fecha,Hora\n");
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let out = render(&[record(2, "Gomez, Ana", "2026-03-05")]);
        assert!(out.contains("\"Gomez, Ana\""));
    }

    #[test]
    fn export_writes_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join(DEFAULT_EXPORT_FILE);

        export_csv(&[record(1, "Ana Gomez", "2026-03-05")], &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn export_to_missing_directory_is_an_io_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("missing").join("turnos.csv");

        let err = export_csv(&[], &path).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
