//! # KYC Form
//!
//! One onboarding form: the value store for the active client type plus
//! the attachment list. Switching client type discards values but keeps
//! attachments, which are not tied to either schema.

use chrono::NaiveDate;

use kyc_core::{ClientType, Timestamp};

use crate::documents::{DocumentAdvisory, DocumentError, DocumentList, UploadedDocument};
use crate::record::{ClientRecord, RecordError};
use crate::resolve::{required_fields, visible_fields};
use crate::schema::{FieldSchema, FormSchema};
use crate::store::{FormSnapshot, FormStore, StoreError};
use crate::validate::{validate_on, ValidationReport};
use crate::value::{FieldValue, FormValues};

/// Form values and attachments for one client.
#[derive(Debug, Clone)]
pub struct KycForm {
    store: FormStore,
    documents: DocumentList,
}

impl KycForm {
    pub fn new(client_type: ClientType) -> Self {
        Self {
            store: FormStore::new(client_type),
            documents: DocumentList::new(),
        }
    }

    pub fn client_type(&self) -> ClientType {
        self.store.client_type()
    }

    pub fn schema(&self) -> &'static FormSchema {
        self.store.schema()
    }

    pub fn values(&self) -> &FormValues {
        self.store.values()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.store.get(name)
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), StoreError> {
        self.store.set_field(name, value)
    }

    pub fn clear_field(&mut self, name: &str) -> Result<Option<FieldValue>, StoreError> {
        self.store.clear_field(name)
    }

    /// Clear the values of the active type. Attachments stay.
    pub fn reset(&mut self) {
        self.store.reset();
    }

    /// Activate another client type; see [`FormStore::switch_client_type`].
    pub fn switch_client_type(&mut self, client_type: ClientType) -> bool {
        self.store.switch_client_type(client_type)
    }

    /// Clear values and attachments, keeping the client type.
    pub fn clear(&mut self) {
        self.store.reset();
        self.documents.clear();
    }

    // ── Attachments ─────────────────────────────────────────────────

    pub fn documents(&self) -> &DocumentList {
        &self.documents
    }

    pub fn add_documents(&mut self, files: impl IntoIterator<Item = UploadedDocument>) {
        self.documents.add(files);
    }

    pub fn remove_document(&mut self, index: usize) -> Result<UploadedDocument, DocumentError> {
        self.documents.remove(index)
    }

    pub fn document_advisories(&self) -> Vec<DocumentAdvisory> {
        self.documents.advisories()
    }

    // ── Evaluation ──────────────────────────────────────────────────

    /// Fields currently required, in declaration order.
    pub fn required_fields(&self) -> Vec<&'static FieldSchema> {
        required_fields(self.schema(), self.values())
    }

    /// Fields currently shown, in declaration order.
    pub fn visible_fields(&self) -> Vec<&'static FieldSchema> {
        visible_fields(self.schema(), self.values())
    }

    pub fn validate(&self) -> ValidationReport {
        self.validate_on(Timestamp::today())
    }

    pub fn validate_on(&self, today: NaiveDate) -> ValidationReport {
        validate_on(self.schema(), self.values(), today)
    }

    pub fn snapshot(&self) -> FormSnapshot {
        self.store.snapshot()
    }

    /// Validate and build the submission payload.
    pub fn build_record(&self) -> Result<ClientRecord, RecordError> {
        self.build_record_on(Timestamp::today())
    }

    pub fn build_record_on(&self, today: NaiveDate) -> Result<ClientRecord, RecordError> {
        ClientRecord::from_snapshot_on(&self.snapshot(), today)
    }
}
