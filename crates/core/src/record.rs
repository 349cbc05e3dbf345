//! The professor record document model.
//!
//! Records are JSON documents with three required string fields plus any
//! free-form fields the caller supplies. The schema is enforced at creation
//! time only; extras are persisted verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DomainError, DomainResult};
use crate::id::RecordId;

/// Field names that carry meaning for the record model.
pub const ID_FIELD: &str = "id";
const REQUIRED_FIELDS: [&str; 3] = ["name", "title", "department"];

/// A persisted professor record.
///
/// `extra` flattens into the document, so round-tripping through JSON keeps
/// caller-supplied fields intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessorRecord {
    pub id: RecordId,
    pub name: String,
    pub title: String,
    pub department: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProfessorRecord {
    /// The record as a raw JSON document (the storage representation).
    pub fn to_document(&self) -> Value {
        serde_json::to_value(self).expect("record serialization is infallible")
    }
}

/// A validated create payload: required fields present, no id.
///
/// Any client-supplied `id` is stripped here rather than trusted; the
/// allocator is the only source of ids.
#[derive(Debug, Clone)]
pub struct RecordDraft {
    fields: Map<String, Value>,
    stripped_client_id: bool,
}

impl RecordDraft {
    pub fn from_fields(mut fields: Map<String, Value>) -> DomainResult<Self> {
        if fields.is_empty() {
            return Err(DomainError::validation("no data provided"));
        }

        let stripped_client_id = fields.remove(ID_FIELD).is_some();

        for field in REQUIRED_FIELDS {
            match fields.get(field) {
                Some(Value::String(s)) if !s.trim().is_empty() => {}
                Some(_) => {
                    return Err(DomainError::validation(format!(
                        "field '{field}' must be a non-empty string"
                    )));
                }
                None => {
                    return Err(DomainError::validation(format!(
                        "missing required field '{field}'"
                    )));
                }
            }
        }

        Ok(Self {
            fields,
            stripped_client_id,
        })
    }

    /// Whether the caller tried to pick its own id.
    pub fn stripped_client_id(&self) -> bool {
        self.stripped_client_id
    }

    /// Bind the allocated id, producing the record to persist.
    pub fn into_record(self, id: RecordId) -> ProfessorRecord {
        let mut fields = self.fields;
        fields.insert(ID_FIELD.to_string(), Value::from(id.as_i64()));
        serde_json::from_value(Value::Object(fields))
            .expect("draft validation guarantees a decodable record")
    }
}

/// A validated partial update: non-empty, id untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPatch {
    fields: Map<String, Value>,
}

impl RecordPatch {
    pub fn from_fields(fields: Map<String, Value>) -> DomainResult<Self> {
        if fields.is_empty() {
            return Err(DomainError::validation("no update data provided"));
        }
        if fields.contains_key(ID_FIELD) {
            return Err(DomainError::validation("record id is immutable"));
        }
        // Keep required fields type-stable so merged documents always decode.
        for field in REQUIRED_FIELDS {
            if let Some(value) = fields.get(field) {
                match value {
                    Value::String(s) if !s.trim().is_empty() => {}
                    _ => {
                        return Err(DomainError::validation(format!(
                            "field '{field}' must be a non-empty string"
                        )));
                    }
                }
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Shallow-merge the patch into a record, field by field.
    ///
    /// Each given key overwrites the top-level field of the document;
    /// nested values are replaced wholesale, never deep-merged.
    pub fn apply_to(&self, record: &ProfessorRecord) -> ProfessorRecord {
        let mut doc = match record.to_document() {
            Value::Object(map) => map,
            _ => unreachable!("records serialize to JSON objects"),
        };
        for (key, value) in &self.fields {
            doc.insert(key.clone(), value.clone());
        }
        serde_json::from_value(Value::Object(doc))
            .expect("patch validation keeps required fields decodable")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payloads are objects"),
        }
    }

    fn sample_record() -> ProfessorRecord {
        RecordDraft::from_fields(fields(json!({
            "name": "Dr. Smith",
            "title": "Professor",
            "department": "Computer Science",
        })))
        .unwrap()
        .into_record(RecordId::new(1))
    }

    #[test]
    fn empty_create_payload_is_rejected() {
        let err = RecordDraft::from_fields(Map::new()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let err = RecordDraft::from_fields(fields(json!({
            "name": "Dr. X",
            "title": "Lecturer",
        })))
        .unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("missing required field 'department'")
        );
    }

    #[test]
    fn client_supplied_id_is_stripped_on_create() {
        let draft = RecordDraft::from_fields(fields(json!({
            "id": 99,
            "name": "Dr. X",
            "title": "Lecturer",
            "department": "Physics",
        })))
        .unwrap();
        assert!(draft.stripped_client_id());

        let record = draft.into_record(RecordId::new(1));
        assert_eq!(record.id, RecordId::new(1));
    }

    #[test]
    fn extra_fields_survive_the_round_trip() {
        let record = RecordDraft::from_fields(fields(json!({
            "name": "Dr. X",
            "title": "Lecturer",
            "department": "Physics",
            "office": "B-204",
            "tenured": false,
        })))
        .unwrap()
        .into_record(RecordId::new(7));

        let doc = record.to_document();
        assert_eq!(doc["id"], json!(7));
        assert_eq!(doc["office"], json!("B-204"));
        assert_eq!(doc["tenured"], json!(false));

        let decoded: ProfessorRecord = serde_json::from_value(doc).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn empty_patch_is_rejected() {
        let err = RecordPatch::from_fields(Map::new()).unwrap_err();
        assert_eq!(err, DomainError::validation("no update data provided"));
    }

    #[test]
    fn patch_may_not_touch_the_id() {
        let err = RecordPatch::from_fields(fields(json!({"id": 5}))).unwrap_err();
        assert_eq!(err, DomainError::validation("record id is immutable"));
    }

    #[test]
    fn patch_keeps_required_fields_typed() {
        let err = RecordPatch::from_fields(fields(json!({"name": 42}))).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn patch_merges_only_the_given_fields() {
        let record = sample_record();
        let patch = RecordPatch::from_fields(fields(json!({
            "title": "Full Professor",
        })))
        .unwrap();

        let merged = patch.apply_to(&record);
        assert_eq!(merged.id, record.id);
        assert_eq!(merged.name, "Dr. Smith");
        assert_eq!(merged.title, "Full Professor");
        assert_eq!(merged.department, "Computer Science");
    }

    #[test]
    fn patch_can_add_and_overwrite_free_form_fields() {
        let record = sample_record();
        let patch = RecordPatch::from_fields(fields(json!({
            "office": "C-110",
        })))
        .unwrap();

        let merged = patch.apply_to(&record);
        assert_eq!(merged.extra["office"], json!("C-110"));

        let patch = RecordPatch::from_fields(fields(json!({
            "office": "C-111",
        })))
        .unwrap();
        let merged = patch.apply_to(&merged);
        assert_eq!(merged.extra["office"], json!("C-111"));
    }
}
