//! Appointment document storage.
//!
//! All appointments live in one JSON document, an ordered array of objects:
//!
//! ```json
//! [
//!   {
//!     "id": 1,
//!     "nombre": "Ana Gomez",
//!     "categoria": "Uñas",
//!     "servicio": "Manicura",
//!     "fecha": "2026-03-05",
//!     "hora": "11:00"
//!   }
//! ]
//! ```
//!
//! Every operation reads the whole document, changes it in memory and writes the
//! whole document back. There is no caching and no locking: a second process
//! writing between a load and a save will have its change overwritten.
//!
//! ## Older documents
//!
//! Documents written by earlier versions of the booking tool may contain records
//! with missing keys, a `cliente` key instead of `nombre`, or positional arrays
//! `[cliente, fecha, hora, servicio]`. These are accepted at load time and
//! normalised into [`Appointment`] values; the next save writes them back in the
//! current shape.

use crate::appointment::Appointment;
use crate::{SalonError, SalonResult};
use chrono::NaiveDate;
use salon_types::TimeSlot;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reads and writes the appointment document.
#[derive(Clone, Debug)]
pub struct AppointmentStore {
    path: PathBuf,
}

impl AppointmentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every appointment in document order.
    ///
    /// A missing document is an empty store. A document that cannot be read or
    /// parsed is also treated as empty, with a warning logged.
    pub fn load(&self) -> Vec<Appointment> {
        match self.try_load() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    "treating appointments file {} as empty: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Like [`load`](Self::load) but surfaces read and parse failures.
    ///
    /// # Errors
    ///
    /// Returns `SalonError::FileRead` if the document exists but cannot be read, or
    /// `SalonError::Deserialization` if it is not a JSON array.
    pub fn try_load(&self) -> SalonResult<Vec<Appointment>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SalonError::FileRead(e)),
        };
        decode_document(&contents)
    }

    /// Writes `records` as the complete new document.
    ///
    /// # Errors
    ///
    /// Returns `SalonError::Serialization` if encoding fails or `SalonError::FileWrite`
    /// if the document (or its parent directory) cannot be written.
    pub fn save(&self, records: &[Appointment]) -> SalonResult<()> {
        let wire: Vec<RecordOut<'_>> = records.iter().map(RecordOut::from).collect();
        let json = serde_json::to_string_pretty(&wire).map_err(SalonError::Serialization)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(SalonError::FileWrite)?;
        }
        fs::write(&self.path, json).map_err(SalonError::FileWrite)?;

        tracing::debug!(
            "saved {} appointments to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}

// ============================================================================
// Query helpers
// ============================================================================

/// Id for the next appointment: one more than the highest id in use, 1 when empty.
///
/// # Errors
///
/// Returns `SalonError::InvalidInput` when the highest id in use is `u32::MAX`.
pub fn next_id(records: &[Appointment]) -> SalonResult<u32> {
    records
        .iter()
        .map(|r| r.id)
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| SalonError::InvalidInput("appointment id space exhausted".into()))
}

/// First appointment whose client name equals `name` exactly.
pub fn find_by_name<'a>(records: &'a [Appointment], name: &str) -> Option<&'a Appointment> {
    records.iter().find(|r| r.client_name == name)
}

/// Index of the first appointment whose client name equals `name` exactly.
pub fn position_by_name(records: &[Appointment], name: &str) -> Option<usize> {
    records.iter().position(|r| r.client_name == name)
}

/// Every appointment whose client name contains `fragment`, ignoring case.
pub fn find_all_by_name_substring<'a>(
    records: &'a [Appointment],
    fragment: &str,
) -> Vec<&'a Appointment> {
    let needle = fragment.to_lowercase();
    records
        .iter()
        .filter(|r| r.client_name.to_lowercase().contains(&needle))
        .collect()
}

/// Number of appointments for `category` at `date` and `time`.
pub fn count_matching(
    records: &[Appointment],
    category: &str,
    date: NaiveDate,
    time: TimeSlot,
) -> usize {
    records
        .iter()
        .filter(|r| r.category == category && r.occupies(date, time))
        .count()
}

// ============================================================================
// Wire types (internal)
// ============================================================================

/// Shape written by [`AppointmentStore::save`].
#[derive(Serialize)]
struct RecordOut<'a> {
    id: u32,
    nombre: &'a str,
    categoria: &'a str,
    servicio: &'a str,
    fecha: &'a str,
    hora: &'a str,
}

impl<'a> From<&'a Appointment> for RecordOut<'a> {
    fn from(a: &'a Appointment) -> Self {
        Self {
            id: a.id,
            nombre: &a.client_name,
            categoria: &a.category,
            servicio: &a.service,
            fecha: &a.date,
            hora: &a.time,
        }
    }
}

/// Tolerant object shape: every key optional, any JSON type, unknown keys ignored.
#[derive(Debug, Default, Deserialize)]
struct RecordWire {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, alias = "cliente")]
    nombre: Option<Value>,
    #[serde(default)]
    categoria: Option<Value>,
    #[serde(default)]
    servicio: Option<Value>,
    #[serde(default)]
    fecha: Option<Value>,
    #[serde(default)]
    hora: Option<Value>,
}

/// Positional is tried first: a derived struct would also accept a JSON array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredRecord {
    Positional(Vec<Value>),
    Object(RecordWire),
}

impl StoredRecord {
    fn into_wire(self) -> RecordWire {
        match self {
            StoredRecord::Object(wire) => wire,
            StoredRecord::Positional(mut fields) => {
                fields.resize(4, Value::Null);
                let mut fields = fields.into_iter();
                let mut next = || fields.next();
                let (nombre, fecha, hora, servicio) = (next(), next(), next(), next());
                RecordWire {
                    id: None,
                    nombre,
                    categoria: None,
                    servicio,
                    fecha,
                    hora,
                }
            }
        }
    }
}

fn wire_id(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Text of a stored field. Numbers and booleans keep their JSON spelling so the
/// value survives the next save; null, lists and objects become empty.
fn wire_text(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Decode a whole document into normalised appointments.
fn decode_document(json_text: &str) -> SalonResult<Vec<Appointment>> {
    let mut deserializer = serde_json::Deserializer::from_str(json_text);
    let entries: Vec<Value> =
        serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
            let path = err.path().to_string();
            let source = err.into_inner();
            SalonError::Deserialization {
                what: "appointments file",
                reason: format!("schema mismatch at {path}: {source}"),
            }
        })?;

    let mut wires = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<StoredRecord>(entry) {
            Ok(record) => wires.push(record.into_wire()),
            Err(e) => tracing::warn!("skipping unreadable appointment at index {}: {}", index, e),
        }
    }

    Ok(normalise(wires))
}

/// Convert tolerant records into strict appointments, making ids unique.
///
/// Records keep their id when it is a valid number not already taken by an earlier
/// record. Others get fresh ids above the highest valid id in the document, or the
/// lowest unused id once `u32::MAX` is in use.
fn normalise(wires: Vec<RecordWire>) -> Vec<Appointment> {
    let mut taken = HashSet::new();
    let kept: Vec<Option<u32>> = wires
        .iter()
        .map(|w| w.id.as_ref().and_then(wire_id).filter(|id| taken.insert(*id)))
        .collect();
    let mut above = taken.iter().max().copied().unwrap_or(0);
    let mut lowest_free = 1u32;

    wires
        .into_iter()
        .zip(kept)
        .map(|(wire, kept)| {
            let name = wire_text(wire.nombre);
            let id = match kept {
                Some(id) => id,
                None => {
                    let fresh = match above.checked_add(1) {
                        Some(id) => {
                            above = id;
                            id
                        }
                        None => {
                            while taken.contains(&lowest_free) {
                                lowest_free += 1;
                            }
                            lowest_free
                        }
                    };
                    taken.insert(fresh);
                    tracing::warn!(
                        "appointment for '{}' had id {:?}; reassigned id {}",
                        name,
                        wire.id,
                        fresh
                    );
                    fresh
                }
            };

            Appointment {
                id,
                client_name: name,
                category: wire_text(wire.categoria),
                service: wire_text(wire.servicio),
                date: wire_text(wire.fecha),
                time: wire_text(wire.hora),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn appointment(id: u32, name: &str) -> Appointment {
        Appointment {
            id,
            client_name: name.into(),
            category: "Uñas".into(),
            service: "Manicura".into(),
            date: "2026-03-05".into(),
            time: "11:00".into(),
        }
    }

    fn store_in(temp_dir: &TempDir) -> AppointmentStore {
        AppointmentStore::new(temp_dir.path().join("clientes.json"))
    }

    #[test]
    fn missing_document_loads_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        assert!(store_in(&temp_dir).load().is_empty());
    }

    #[test]
    fn save_then_load_preserves_order_and_fields() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = store_in(&temp_dir);
        let records = vec![appointment(7, "Zoe Vidal"), appointment(2, "Ana Gomez")];

        store.save(&records).expect("save should succeed");
        assert_eq!(store.load(), records);
    }

    #[test]
    fn saved_document_uses_spanish_keys() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = store_in(&temp_dir);
        store
            .save(&[appointment(1, "Ana Gomez")])
            .expect("save should succeed");

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        let first = &value[0];
        assert_eq!(first["id"], 1);
        assert_eq!(first["nombre"], "Ana Gomez");
        assert_eq!(first["categoria"], "Uñas");
        assert_eq!(first["servicio"], "Manicura");
        assert_eq!(first["fecha"], "2026-03-05");
        assert_eq!(first["hora"], "11:00");
        assert!(raw.contains("Uñas"), "non-ASCII text should be written as-is");
    }

    #[test]
    fn malformed_document_loads_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = store_in(&temp_dir);
        fs::write(store.path(), "{ not json").unwrap();

        assert!(store.load().is_empty());
        assert!(matches!(
            store.try_load(),
            Err(SalonError::Deserialization { .. })
        ));
    }

    #[test]
    fn save_fails_when_destination_is_not_writable() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        // A directory where the document should be makes the write fail.
        let path = temp_dir.path().join("clientes.json");
        fs::create_dir(&path).unwrap();

        let err = AppointmentStore::new(&path)
            .save(&[appointment(1, "Ana Gomez")])
            .expect_err("save should fail");
        assert!(matches!(err, SalonError::FileWrite(_)));
    }

    #[test]
    fn legacy_records_are_normalised() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = store_in(&temp_dir);
        fs::write(
            store.path(),
            r#"[
                {"nombre": "Ana Gomez", "categoria": "Uñas", "servicio": "Manicura",
                 "fecha": "2026-03-05", "hora": "11:00", "id": 4},
                {"cliente": "Luis Perez", "fecha": "2026-03-06", "hora": "12:00"},
                ["Marta Diaz", "2026-03-07", "13:00", "Peinado"],
                {"nombre": "Eva Ruiz", "id": 4},
                "garbage"
            ]"#,
        )
        .unwrap();

        let records = store.load();
        assert_eq!(records.len(), 4, "unreadable entries are skipped");

        assert_eq!(records[0].id, 4);
        assert_eq!(records[0].client_name, "Ana Gomez");

        assert_eq!(records[1].client_name, "Luis Perez");
        assert_eq!(records[1].category, "");
        assert_eq!(records[1].time, "12:00");

        assert_eq!(records[2].client_name, "Marta Diaz");
        assert_eq!(records[2].date, "2026-03-07");
        assert_eq!(records[2].time, "13:00");
        assert_eq!(records[2].service, "Peinado");

        let ids: HashSet<u32> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 4, "ids must be unique after normalisation");
        assert!(records[1..].iter().all(|r| r.id > 4));
    }

    #[test]
    fn next_id_is_max_plus_one() {
        assert_eq!(next_id(&[]).unwrap(), 1);
        assert_eq!(
            next_id(&[appointment(3, "Ana Gomez"), appointment(9, "Luis Perez")]).unwrap(),
            10
        );
    }

    #[test]
    fn next_id_never_reuses_the_maximum() {
        let err = next_id(&[appointment(u32::MAX, "Ana Gomez")]).unwrap_err();
        assert!(matches!(err, SalonError::InvalidInput(_)));
    }

    #[test]
    fn reassigned_ids_stay_unique_when_the_maximum_is_taken() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = store_in(&temp_dir);
        fs::write(
            store.path(),
            format!(
                r#"[
                    {{"id": {max}, "nombre": "Ana Gomez"}},
                    {{"nombre": "Luis Perez"}},
                    {{"id": 1, "nombre": "Eva Ruiz"}},
                    {{"id": {max}, "nombre": "Marta Diaz"}}
                ]"#,
                max = u32::MAX
            ),
        )
        .unwrap();

        let records = store.load();
        let ids: Vec<u32> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![u32::MAX, 2, 1, 3]);
    }

    #[test]
    fn mistyped_fields_survive_a_save() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = store_in(&temp_dir);
        fs::write(
            store.path(),
            r#"[
                {"id": 1, "nombre": "Ana Gomez", "categoria": "Uñas", "servicio": "Manicura",
                 "fecha": "2026-03-05", "hora": "11:00"},
                {"id": 2, "nombre": "Luis Perez", "categoria": "Cabello", "servicio": null,
                 "fecha": "2026-03-05", "hora": 1100},
                ["Marta Diaz", 20260307]
            ]"#,
        )
        .unwrap();

        let records = store.load();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].client_name, "Luis Perez");
        assert_eq!(records[1].time, "1100");
        assert_eq!(records[1].service, "");
        assert_eq!(records[2].date, "20260307");
        assert_eq!(records[2].time, "");

        store.save(&records).expect("save should succeed");
        assert_eq!(store.load(), records);
    }

    #[test]
    fn name_queries() {
        let records = vec![
            appointment(1, "Ana Gomez"),
            appointment(2, "Mariana Lopez"),
            appointment(3, "Ana Gomez"),
        ];

        assert_eq!(find_by_name(&records, "Ana Gomez").map(|r| r.id), Some(1));
        assert_eq!(find_by_name(&records, "ana gomez"), None);
        assert_eq!(position_by_name(&records, "Mariana Lopez"), Some(1));

        let ids: Vec<u32> = find_all_by_name_substring(&records, "ANA")
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(find_all_by_name_substring(&records, "pedro").is_empty());
    }

    #[test]
    fn count_matching_requires_category_date_and_time() {
        let mut other_category = appointment(2, "Luis Perez");
        other_category.category = "Cabello".into();
        let records = vec![appointment(1, "Ana Gomez"), other_category];

        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        let slot = TimeSlot::parse("11:00").unwrap();
        assert_eq!(count_matching(&records, "Uñas", date, slot), 1);
        assert_eq!(count_matching(&records, "Cabello", date, slot), 1);
        assert_eq!(count_matching(&records, "Facial", date, slot), 0);
        assert_eq!(
            count_matching(&records, "Uñas", date, TimeSlot::parse("11:30").unwrap()),
            0
        );
    }
}
