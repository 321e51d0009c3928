//! # Form State Store
//!
//! Holds the live values of the form for the active client type.
//!
//! Writes never validate: error messages are produced only when the
//! validator is run explicitly, so typing does not flash errors. The one
//! check a write does perform is that the field exists in the active
//! schema. That check, together with discarding values on every client
//! type switch, is what keeps Entity fields out of Individual payloads and
//! vice versa.

use serde::Serialize;
use thiserror::Error;

use kyc_core::ClientType;

use crate::schema::FormSchema;
use crate::value::{FieldValue, FormValues};

/// Errors from store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The field is not declared by the active client type's schema.
    #[error("field {field:?} is not part of the {client_type} form")]
    UnknownField {
        /// The rejected field name.
        field: String,
        /// The active client type.
        client_type: ClientType,
    },
}

/// Immutable copy of the form values at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot {
    /// Client type the values belong to.
    pub client_type: ClientType,
    /// The values.
    pub values: FormValues,
}

impl FormSnapshot {
    /// The schema of the snapshot's client type.
    pub fn schema(&self) -> &'static FormSchema {
        FormSchema::for_client(self.client_type)
    }
}

/// Live values for the active client type.
#[derive(Debug, Clone)]
pub struct FormStore {
    client_type: ClientType,
    values: FormValues,
}

impl FormStore {
    /// An empty store for the given client type.
    pub fn new(client_type: ClientType) -> Self {
        Self {
            client_type,
            values: FormValues::new(),
        }
    }

    /// The active client type.
    pub fn client_type(&self) -> ClientType {
        self.client_type
    }

    /// The active schema.
    pub fn schema(&self) -> &'static FormSchema {
        FormSchema::for_client(self.client_type)
    }

    /// Current values.
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Current value of one field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Replace the value of a field.
    pub fn set_field(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), StoreError> {
        self.require_declared(name)?;
        self.values.insert(name, value.into());
        Ok(())
    }

    /// Remove the value of a field, returning what was there.
    pub fn clear_field(&mut self, name: &str) -> Result<Option<FieldValue>, StoreError> {
        self.require_declared(name)?;
        Ok(self.values.remove(name))
    }

    /// Clear all values of the active client type.
    pub fn reset(&mut self) {
        self.values.clear();
    }

    /// Activate another client type, discarding every current value.
    ///
    /// Returns `true` if the type changed. Selecting the already-active
    /// type keeps the values.
    pub fn switch_client_type(&mut self, client_type: ClientType) -> bool {
        if client_type == self.client_type {
            return false;
        }
        self.client_type = client_type;
        self.reset();
        true
    }

    /// Immutable copy of the current values.
    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            client_type: self.client_type,
            values: self.values.clone(),
        }
    }

    fn require_declared(&self, name: &str) -> Result<(), StoreError> {
        if self.schema().contains(name) {
            Ok(())
        } else {
            Err(StoreError::UnknownField {
                field: name.to_string(),
                client_type: self.client_type,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_field_replaces_value() {
        let mut store = FormStore::new(ClientType::Individual);
        store.set_field("firstName", "Am").unwrap();
        store.set_field("firstName", "Amina").unwrap();
        assert_eq!(store.get("firstName"), Some(&FieldValue::from("Amina")));
        assert_eq!(store.values().len(), 1);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut store = FormStore::new(ClientType::Individual);
        let err = store.set_field("legalName", "Acme Ltd").unwrap_err();
        assert_eq!(
            err,
            StoreError::UnknownField {
                field: "legalName".to_string(),
                client_type: ClientType::Individual,
            }
        );
        assert!(store.values().is_empty());
    }

    #[test]
    fn test_clear_field() {
        let mut store = FormStore::new(ClientType::Entity);
        store.set_field("legalName", "Acme Ltd").unwrap();
        let old = store.clear_field("legalName").unwrap();
        assert_eq!(old, Some(FieldValue::from("Acme Ltd")));
        assert!(store.get("legalName").is_none());
    }

    #[test]
    fn test_switch_discards_values() {
        let mut store = FormStore::new(ClientType::Entity);
        store.set_field("legalName", "Acme Ltd").unwrap();
        store.set_field("email", "ops@acme.test").unwrap();
        assert!(store.switch_client_type(ClientType::Individual));
        assert_eq!(store.client_type(), ClientType::Individual);
        assert!(store.values().is_empty());
    }

    #[test]
    fn test_switch_to_same_type_keeps_values() {
        let mut store = FormStore::new(ClientType::Individual);
        store.set_field("city", "Karachi").unwrap();
        assert!(!store.switch_client_type(ClientType::Individual));
        assert_eq!(store.values().len(), 1);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut store = FormStore::new(ClientType::Individual);
        store.set_field("city", "Karachi").unwrap();
        let snap = store.snapshot();
        store.set_field("city", "Lahore").unwrap();
        assert_eq!(snap.values.get("city"), Some(&FieldValue::from("Karachi")));
        assert_eq!(snap.client_type, ClientType::Individual);
    }
}
