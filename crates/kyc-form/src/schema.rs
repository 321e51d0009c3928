//! # Field Schema
//!
//! Declarative field tables for the two onboarding forms. A schema is pure
//! data: it says which fields exist, in which order they are validated,
//! what kind of value each holds, when each is required, and which format
//! constraints apply. Interpretation lives in [`crate::resolve`] and
//! [`crate::validate`].
//!
//! ## Ordering
//!
//! Declaration order is validation order. Error lists are therefore stable
//! across runs and follow the tab layout of the form.
//!
//! ## Conditional fields
//!
//! A [`Requirement::RequiredWhen`] field names a boolean field of the same
//! schema. It is required (and shown) only while that boolean is `true`.
//! `schema_integrity()` checks that every such dependency exists and is a
//! boolean.

use serde::Serialize;

use kyc_core::ClientType;

use crate::choices::{
    EntityFundsSource, EntityType, FatcaClassification, FatcaStatus, Gender, HeadcountBand,
    IdType, IncomeBand, PersonalFundsSource, RevenueBand,
};

// ─── Field building blocks ───────────────────────────────────────────

/// The kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "options")]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Calendar date, entered as `YYYY-MM-DD`.
    Date,
    /// Checkbox or switch. Defaults to `false` when unset.
    Boolean,
    /// One of a fixed set of wire values.
    Choice(&'static [&'static str]),
}

/// When a field must carry a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "rule", content = "field")]
pub enum Requirement {
    /// May be left empty.
    Optional,
    /// Must be non-empty.
    Required,
    /// Must be non-empty while the named boolean field is `true`.
    RequiredWhen(&'static str),
    /// Boolean that must be `true` (consents).
    MustAccept,
}

/// Format constraint applied to a present value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "format", content = "value")]
pub enum FieldFormat {
    /// Looks like an email address.
    Email,
    /// At least this many characters after trimming.
    MinLength(usize),
    /// Date on or before today.
    NotInFuture,
    /// Date on or after today.
    NotInPast,
}

/// Form tab a field is rendered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Personal,
    Contact,
    Identification,
    Employment,
    Risk,
    Tax,
    Consent,
    Legal,
    Business,
    Ownership,
}

impl Section {
    /// Tab title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Personal => "Personal Information",
            Self::Contact => "Contact Details",
            Self::Identification => "Identification",
            Self::Employment => "Employment & Income",
            Self::Risk => "Risk Assessment",
            Self::Tax => "Tax Information",
            Self::Consent => "Declarations & Consent",
            Self::Legal => "Legal Information",
            Self::Business => "Business Profile",
            Self::Ownership => "Ownership Structure",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Declaration of one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
    /// Field name as used in form values and on the wire.
    pub name: &'static str,
    /// Human-readable label, used in error messages.
    pub label: &'static str,
    /// Tab the field belongs to.
    pub section: Section,
    /// Value kind.
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Requiredness rule.
    #[serde(flatten)]
    pub requirement: Requirement,
    /// Format constraints, checked in order.
    pub formats: &'static [FieldFormat],
}

impl FieldSchema {
    const fn new(name: &'static str, label: &'static str, section: Section, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            section,
            kind,
            requirement: Requirement::Optional,
            formats: &[],
        }
    }

    const fn text(name: &'static str, label: &'static str, section: Section) -> Self {
        Self::new(name, label, section, FieldKind::Text)
    }

    const fn date(name: &'static str, label: &'static str, section: Section) -> Self {
        Self::new(name, label, section, FieldKind::Date)
    }

    const fn flag(name: &'static str, label: &'static str, section: Section) -> Self {
        Self::new(name, label, section, FieldKind::Boolean)
    }

    const fn choice(
        name: &'static str,
        label: &'static str,
        section: Section,
        options: &'static [&'static str],
    ) -> Self {
        Self::new(name, label, section, FieldKind::Choice(options))
    }

    const fn required(self) -> Self {
        Self {
            requirement: Requirement::Required,
            ..self
        }
    }

    const fn required_when(self, flag: &'static str) -> Self {
        Self {
            requirement: Requirement::RequiredWhen(flag),
            ..self
        }
    }

    const fn must_accept(self) -> Self {
        Self {
            requirement: Requirement::MustAccept,
            ..self
        }
    }

    const fn with(self, formats: &'static [FieldFormat]) -> Self {
        Self { formats, ..self }
    }

    /// The field whose value controls this field's requiredness and
    /// visibility, if any.
    pub fn depends_on(&self) -> Option<&'static str> {
        match self.requirement {
            Requirement::RequiredWhen(flag) => Some(flag),
            _ => None,
        }
    }

    /// Whether the field is required regardless of other values.
    pub fn is_statically_required(&self) -> bool {
        matches!(
            self.requirement,
            Requirement::Required | Requirement::MustAccept
        )
    }
}

// ─── Schemas ─────────────────────────────────────────────────────────

/// The ordered field table for one client type.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    /// Client type this schema describes.
    pub client_type: ClientType,
    /// Fields in validation order.
    pub fields: &'static [FieldSchema],
}

impl FormSchema {
    /// The schema for a client type.
    pub fn for_client(client_type: ClientType) -> &'static FormSchema {
        match client_type {
            ClientType::Individual => &INDIVIDUAL_SCHEMA,
            ClientType::Entity => &ENTITY_SCHEMA,
        }
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&'static FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether the schema declares a field with this name.
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|f| f.name)
    }

    /// Fields whose requiredness depends on `name`.
    pub fn dependents_of(&self, name: &str) -> Vec<&'static FieldSchema> {
        self.fields
            .iter()
            .filter(|f| f.depends_on() == Some(name))
            .collect()
    }

    /// Structural problems with the schema: duplicate names, and
    /// conditional fields whose controlling field is missing or not a
    /// boolean. Empty for well-formed schemas.
    pub fn schema_integrity(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                problems.push(format!("duplicate field name {:?}", field.name));
            }
            if let Some(flag) = field.depends_on() {
                match self.field(flag) {
                    None => problems.push(format!(
                        "{:?} depends on undeclared field {flag:?}",
                        field.name
                    )),
                    Some(dep) if dep.kind != FieldKind::Boolean => problems.push(format!(
                        "{:?} depends on non-boolean field {flag:?}",
                        field.name
                    )),
                    Some(_) => {}
                }
            }
        }
        problems
    }
}

/// Field table for natural persons.
pub static INDIVIDUAL_SCHEMA: FormSchema = FormSchema {
    client_type: ClientType::Individual,
    fields: &INDIVIDUAL_FIELDS,
};

/// Field table for legal entities.
pub static ENTITY_SCHEMA: FormSchema = FormSchema {
    client_type: ClientType::Entity,
    fields: &ENTITY_FIELDS,
};

use FieldFormat::{Email, MinLength, NotInFuture, NotInPast};
use Section::*;

static INDIVIDUAL_FIELDS: [FieldSchema; 29] = [
    FieldSchema::text("firstName", "First name", Personal).required().with(&[MinLength(2)]),
    FieldSchema::text("middleName", "Middle name", Personal),
    FieldSchema::text("lastName", "Last name", Personal).required().with(&[MinLength(2)]),
    FieldSchema::date("dateOfBirth", "Date of birth", Personal).required().with(&[NotInFuture]),
    FieldSchema::text("nationality", "Nationality", Personal).required(),
    FieldSchema::choice("gender", "Gender", Personal, Gender::OPTIONS).required(),
    FieldSchema::text("email", "Email", Contact).required().with(&[Email]),
    FieldSchema::text("phone", "Phone number", Contact).required().with(&[MinLength(10)]),
    FieldSchema::text("address", "Address", Contact).required().with(&[MinLength(5)]),
    FieldSchema::text("city", "City", Contact).required(),
    FieldSchema::text("postalCode", "Postal code", Contact).required(),
    FieldSchema::text("country", "Country", Contact).required(),
    FieldSchema::choice("idType", "ID type", Identification, IdType::OPTIONS).required(),
    FieldSchema::text("idNumber", "ID number", Identification).required().with(&[MinLength(5)]),
    FieldSchema::date("idIssueDate", "ID issue date", Identification).with(&[NotInFuture]),
    FieldSchema::date("idExpiryDate", "ID expiry date", Identification).required().with(&[NotInPast]),
    FieldSchema::text("occupation", "Occupation", Employment).required(),
    FieldSchema::text("employer", "Employer", Employment),
    FieldSchema::choice("annualIncome", "Annual income", Employment, IncomeBand::OPTIONS).required(),
    FieldSchema::choice("sourceOfFunds", "Source of funds", Employment, PersonalFundsSource::OPTIONS).required(),
    FieldSchema::flag("isPep", "Politically exposed person", Risk),
    FieldSchema::text("pepDetails", "PEP details", Risk).required_when("isPep"),
    FieldSchema::flag("hasHighRiskCountryExposure", "High-risk country exposure", Risk),
    FieldSchema::text("highRiskCountryDetails", "High-risk country details", Risk)
        .required_when("hasHighRiskCountryExposure"),
    FieldSchema::text("taxResidency", "Tax residency", Tax).required(),
    FieldSchema::text("taxId", "Tax ID", Tax),
    FieldSchema::choice("fatcaStatus", "FATCA status", Tax, FatcaStatus::OPTIONS).required(),
    FieldSchema::flag("dataProcessingConsent", "Data processing consent", Consent).must_accept(),
    FieldSchema::flag("termsAccepted", "Terms and conditions", Consent).must_accept(),
];

static ENTITY_FIELDS: [FieldSchema; 28] = [
    FieldSchema::text("legalName", "Legal name", Legal).required().with(&[MinLength(2)]),
    FieldSchema::text("tradingName", "Trading name", Legal),
    FieldSchema::text("registrationNumber", "Registration number", Legal).required().with(&[MinLength(3)]),
    FieldSchema::date("incorporationDate", "Incorporation date", Legal).required().with(&[NotInFuture]),
    FieldSchema::text("incorporationCountry", "Country of incorporation", Legal).required(),
    FieldSchema::choice("entityType", "Entity type", Legal, EntityType::OPTIONS).required(),
    FieldSchema::text("email", "Email", Contact).required().with(&[Email]),
    FieldSchema::text("phone", "Phone number", Contact).required().with(&[MinLength(10)]),
    FieldSchema::text("registeredAddress", "Registered address", Contact).required().with(&[MinLength(5)]),
    FieldSchema::text("city", "City", Contact).required(),
    FieldSchema::text("postalCode", "Postal code", Contact).required(),
    FieldSchema::text("country", "Country", Contact).required(),
    FieldSchema::text("website", "Website", Contact),
    FieldSchema::text("industry", "Industry", Business).required(),
    FieldSchema::text("businessDescription", "Business description", Business).required().with(&[MinLength(20)]),
    FieldSchema::choice("annualRevenue", "Annual revenue", Business, RevenueBand::OPTIONS).required(),
    FieldSchema::choice("numberOfEmployees", "Number of employees", Business, HeadcountBand::OPTIONS).required(),
    FieldSchema::text("ultimateBeneficialOwners", "Ultimate beneficial owners", Ownership).required().with(&[MinLength(2)]),
    FieldSchema::flag("politicallyExposedOwnership", "Politically exposed ownership", Ownership),
    FieldSchema::text("pepOwnershipDetails", "PEP ownership details", Ownership)
        .required_when("politicallyExposedOwnership"),
    FieldSchema::flag("operatesInHighRiskCountries", "Operates in high-risk countries", Risk),
    FieldSchema::text("highRiskCountryDetails", "High-risk country details", Risk)
        .required_when("operatesInHighRiskCountries"),
    FieldSchema::choice("sourceOfFunds", "Source of funds", Risk, EntityFundsSource::OPTIONS).required(),
    FieldSchema::text("taxResidency", "Tax residency", Tax).required(),
    FieldSchema::text("taxId", "Tax ID", Tax).required(),
    FieldSchema::choice("fatcaClassification", "FATCA classification", Tax, FatcaClassification::OPTIONS).required(),
    FieldSchema::flag("dataProcessingConsent", "Data processing consent", Consent).must_accept(),
    FieldSchema::flag("termsAccepted", "Terms and conditions", Consent).must_accept(),
];
