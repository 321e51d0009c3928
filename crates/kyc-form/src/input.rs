//! # Form Input Files
//!
//! Loads pre-filled form values from YAML or JSON. The document is a
//! mapping of field names to strings or booleans; numbers are taken as
//! their text form and `null` leaves a field unset. The reserved key
//! `documents` holds a list of attachment descriptors.
//!
//! ```yaml
//! firstName: Amina
//! isPep: false
//! documents:
//!   - name: passport.pdf
//!     mime_type: application/pdf
//!     size_bytes: 482113
//! ```
//!
//! Names are not checked here; [`FormInput::apply_to`] routes every value
//! through the form store, which rejects names outside the active schema.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use kyc_core::KycError;

use crate::documents::UploadedDocument;
use crate::form::KycForm;
use crate::store::StoreError;
use crate::value::{FieldValue, FormValues};

/// Key that carries attachments instead of a field value.
pub const DOCUMENTS_KEY: &str = "documents";

/// Errors loading or applying a form input file.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse form input: {0}")]
    Parse(String),

    #[error("form input must be a mapping of field names to values")]
    NotAMapping,

    #[error("field {field:?}: {reason}")]
    UnsupportedValue { field: String, reason: String },

    #[error("invalid {DOCUMENTS_KEY} list: {0}")]
    Documents(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Field values and attachments read from an input file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub fields: FormValues,
    pub documents: Vec<UploadedDocument>,
}

impl FormInput {
    /// Read a YAML or JSON file.
    pub fn from_path(path: &Path) -> Result<Self, InputError> {
        let content = std::fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse YAML text. JSON is accepted as well, being a YAML subset.
    pub fn from_yaml_str(content: &str) -> Result<Self, InputError> {
        let value: Value =
            serde_yaml::from_str(content).map_err(|e| InputError::Parse(e.to_string()))?;
        Self::from_json_value(value)
    }

    /// Parse JSON text.
    pub fn from_json_str(content: &str) -> Result<Self, InputError> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| InputError::Parse(e.to_string()))?;
        Self::from_json_value(value)
    }

    /// Convert an already-parsed document.
    pub fn from_json_value(value: Value) -> Result<Self, InputError> {
        let Value::Object(map) = value else {
            return Err(InputError::NotAMapping);
        };

        let mut input = Self::default();
        for (name, raw) in map {
            if name == DOCUMENTS_KEY {
                input.documents = serde_json::from_value(raw)
                    .map_err(|e| InputError::Documents(e.to_string()))?;
                continue;
            }
            if let Some(value) = field_value(&name, raw)? {
                input.fields.insert(name, value);
            }
        }
        Ok(input)
    }

    /// Write every value into `form` and append the attachments.
    ///
    /// All or nothing: if any name is not declared by the active schema,
    /// `form` is left untouched.
    pub fn apply_to(&self, form: &mut KycForm) -> Result<(), InputError> {
        let schema = form.schema();
        if let Some(name) = self.fields.iter().map(|(n, _)| n).find(|n| !schema.contains(n)) {
            return Err(StoreError::UnknownField {
                field: name.to_string(),
                client_type: form.client_type(),
            }
            .into());
        }
        for (name, value) in self.fields.iter() {
            form.set_field(name, value.clone())?;
        }
        form.add_documents(self.documents.iter().cloned());
        Ok(())
    }
}

impl From<InputError> for KycError {
    fn from(err: InputError) -> Self {
        match err {
            InputError::Io { source, .. } => KycError::Io(source),
            other => KycError::Parse(other.to_string()),
        }
    }
}

fn field_value(name: &str, raw: Value) -> Result<Option<FieldValue>, InputError> {
    match raw {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(FieldValue::Bool(b))),
        Value::String(s) => Ok(Some(FieldValue::Text(s))),
        Value::Number(n) => Ok(Some(FieldValue::Text(n.to_string()))),
        Value::Array(_) | Value::Object(_) => Err(InputError::UnsupportedValue {
            field: name.to_string(),
            reason: "expected a string or boolean".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kyc_core::ClientType;

    #[test]
    fn test_yaml_values_and_documents() {
        let input = FormInput::from_yaml_str(
            "firstName: Amina\nisPep: false\npostalCode: 44000\nmiddleName: null\n\
             documents:\n  - name: passport.pdf\n    mime_type: application/pdf\n    size_bytes: 1024\n",
        )
        .unwrap();
        assert_eq!(input.fields.get("firstName"), Some(&FieldValue::from("Amina")));
        assert_eq!(input.fields.get("isPep"), Some(&FieldValue::Bool(false)));
        assert_eq!(input.fields.get("postalCode"), Some(&FieldValue::from("44000")));
        assert_eq!(input.fields.get("middleName"), None);
        assert_eq!(input.documents.len(), 1);
        assert_eq!(input.documents[0].mime_type, "application/pdf");
        assert_eq!(input.documents[0].size_bytes, Some(1024));
    }

    #[test]
    fn test_json_accepted() {
        let input = FormInput::from_json_str(r#"{"legalName": "Indus Trading Ltd"}"#).unwrap();
        assert_eq!(input.fields.len(), 1);
        assert!(input.documents.is_empty());
    }

    #[test]
    fn test_non_mapping_rejected() {
        let err = FormInput::from_yaml_str("- a\n- b\n").unwrap_err();
        assert!(matches!(err, InputError::NotAMapping));
    }

    #[test]
    fn test_nested_value_rejected() {
        let err = FormInput::from_json_str(r#"{"address": {"line1": "x"}}"#).unwrap_err();
        match err {
            InputError::UnsupportedValue { field, .. } => assert_eq!(field, "address"),
            other => panic!("expected UnsupportedValue, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_documents_rejected() {
        let err = FormInput::from_json_str(r#"{"documents": "passport.pdf"}"#).unwrap_err();
        assert!(matches!(err, InputError::Documents(_)));
    }

    #[test]
    fn test_apply_rejects_field_of_other_type() {
        let input = FormInput::from_json_str(r#"{"legalName": "Indus Trading Ltd"}"#).unwrap();
        let mut form = KycForm::new(ClientType::Individual);
        let err = input.apply_to(&mut form).unwrap_err();
        assert!(matches!(err, InputError::Store(StoreError::UnknownField { .. })));
    }

    #[test]
    fn test_apply_rejected_file_leaves_form_untouched() {
        // "city" sorts before "legalName"; neither may be written.
        let input = FormInput::from_yaml_str(
            "city: Lahore\nlegalName: Indus Trading Ltd\nfirstName: Amina\n\
             documents:\n  - name: passport.pdf\n    mime_type: application/pdf\n",
        )
        .unwrap();
        let mut form = KycForm::new(ClientType::Individual);
        form.set_field("lastName", "Qureshi").unwrap();

        let err = input.apply_to(&mut form).unwrap_err();
        match err {
            InputError::Store(StoreError::UnknownField { field, client_type }) => {
                assert_eq!(field, "legalName");
                assert_eq!(client_type, ClientType::Individual);
            }
            other => panic!("expected UnknownField, got {other:?}"),
        }
        assert_eq!(form.values().len(), 1);
        assert_eq!(form.get("city"), None);
        assert!(form.documents().is_empty());
    }

    #[test]
    fn test_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.yaml");
        std::fs::write(&path, "firstName: Amina\n").unwrap();
        let input = FormInput::from_path(&path).unwrap();
        assert_eq!(input.fields.len(), 1);

        let missing = FormInput::from_path(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(missing, InputError::Io { .. }));
        assert!(matches!(KycError::from(missing), KycError::Io(_)));
    }
}
