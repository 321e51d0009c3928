//! # kyc-form — KYC Onboarding Form Engine
//!
//! Everything the onboarding screen needs short of the network: declared
//! field schemas for Individual and Entity clients, the live value store,
//! conditional field resolution, ordered validation, the document
//! attachment list, and the typed `ClientRecord` payload.
//!
//! ## Key Design Principles
//!
//! 1. **Schema as data.** Each client type has one static field table.
//!    Labels, sections, kinds, requiredness and format constraints all
//!    live there; the validator and resolver only interpret it.
//!
//! 2. **Type isolation.** The store only accepts names declared by the
//!    active schema, and switching type discards every value. A payload
//!    can never mix Individual and Entity fields.
//!
//! 3. **No short-circuit.** Validation walks every field in declaration
//!    order and reports at most one error per field, so the same values
//!    always yield the same error list.
//!
//! 4. **Records are validated by construction.** `ClientRecord` can only
//!    be built from values that pass validation.
//!
//! ## Crate Policy
//!
//! - Depends only on `kyc-core` within the workspace.
//! - No I/O beyond reading input files in [`input`].
//! - No `unsafe` code.

pub mod choices;
pub mod documents;
pub mod form;
pub mod input;
pub mod record;
pub mod resolve;
pub mod schema;
pub mod store;
pub mod validate;
pub mod value;

pub use documents::{
    DocumentAdvisory, DocumentError, DocumentList, UploadedDocument, ADVISED_MAX_BYTES,
    ADVISED_MIME_TYPES,
};
pub use form::KycForm;
pub use input::{FormInput, InputError};
pub use record::{ClientRecord, EntityRecord, IndividualRecord, RecordError};
pub use resolve::{is_visible, required_fields, resolve_required, visible_fields};
pub use schema::{
    FieldFormat, FieldKind, FieldSchema, FormSchema, Requirement, Section, ENTITY_SCHEMA,
    INDIVIDUAL_SCHEMA,
};
pub use store::{FormSnapshot, FormStore, StoreError};
pub use validate::{validate, validate_on, ValidationError, ValidationReport};
pub use value::{FieldValue, FormValues};
