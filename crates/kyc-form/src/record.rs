//! # Client Record
//!
//! The submission payload: a tagged union of the Individual and Entity
//! shapes, each a typed struct grouped by form tab. A record can only be
//! built from a snapshot that passes validation, so holding a
//! `ClientRecord` means holding submittable data.
//!
//! Conditional detail fields are carried only while their controlling
//! flag is on. Text is trimmed. Optional text left blank becomes `None`.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use kyc_core::{ClientType, KycError, Timestamp};

use crate::choices::{
    EntityFundsSource, EntityType, FatcaClassification, FatcaStatus, Gender, HeadcountBand,
    IdType, IncomeBand, PersonalFundsSource, RevenueBand,
};
use crate::store::FormSnapshot;
use crate::validate::{validate_on, ValidationReport};
use crate::value::FormValues;

/// Errors building a record from form values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The values do not pass validation.
    #[error("form is not submittable:\n{0}")]
    Invalid(ValidationReport),

    /// A validated field could not be read into its typed slot.
    #[error("field {field:?}: {reason}")]
    Field {
        /// Offending field.
        field: String,
        /// What went wrong.
        reason: String,
    },
}

impl From<RecordError> for KycError {
    fn from(err: RecordError) -> Self {
        KycError::Validation(err.to_string())
    }
}

// ─── Shared sections ─────────────────────────────────────────────────

/// Declarations shared by both record shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consent {
    pub data_processing_consent: bool,
    pub terms_accepted: bool,
}

// ─── Individual ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub nationality: String,
    pub gender: Gender,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identification {
    pub id_type: IdType,
    pub id_number: String,
    pub id_issue_date: Option<NaiveDate>,
    pub id_expiry_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmploymentDetails {
    pub occupation: String,
    pub employer: Option<String>,
    pub annual_income: IncomeBand,
    pub source_of_funds: PersonalFundsSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualRisk {
    pub is_pep: bool,
    pub pep_details: Option<String>,
    pub has_high_risk_country_exposure: bool,
    pub high_risk_country_details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualTax {
    pub tax_residency: String,
    pub tax_id: Option<String>,
    pub fatca_status: FatcaStatus,
}

/// KYC payload for a natural person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualRecord {
    pub personal: PersonalDetails,
    pub contact: ContactDetails,
    pub identification: Identification,
    pub employment: EmploymentDetails,
    pub risk: IndividualRisk,
    pub tax: IndividualTax,
    pub consent: Consent,
}

// ─── Entity ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalDetails {
    pub legal_name: String,
    pub trading_name: Option<String>,
    pub registration_number: String,
    pub incorporation_date: NaiveDate,
    pub incorporation_country: String,
    pub entity_type: EntityType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityContactDetails {
    pub email: String,
    pub phone: String,
    pub registered_address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    pub industry: String,
    pub business_description: String,
    pub annual_revenue: RevenueBand,
    pub number_of_employees: HeadcountBand,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipStructure {
    pub ultimate_beneficial_owners: String,
    pub politically_exposed_ownership: bool,
    pub pep_ownership_details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRisk {
    pub operates_in_high_risk_countries: bool,
    pub high_risk_country_details: Option<String>,
    pub source_of_funds: EntityFundsSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityTax {
    pub tax_residency: String,
    pub tax_id: String,
    pub fatca_classification: FatcaClassification,
}

/// KYB payload for a legal entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    pub legal: LegalDetails,
    pub contact: EntityContactDetails,
    pub business: BusinessProfile,
    pub ownership: OwnershipStructure,
    pub risk: EntityRisk,
    pub tax: EntityTax,
    pub consent: Consent,
}

// ─── Client Record ───────────────────────────────────────────────────

/// Submission payload for exactly one client type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "clientType", rename_all = "snake_case")]
pub enum ClientRecord {
    Individual(IndividualRecord),
    Entity(EntityRecord),
}

impl ClientRecord {
    /// Build a record from a snapshot, validating against today's UTC date.
    pub fn from_snapshot(snapshot: &FormSnapshot) -> Result<Self, RecordError> {
        Self::from_snapshot_on(snapshot, Timestamp::today())
    }

    /// Build a record from a snapshot, validating date bounds against `today`.
    pub fn from_snapshot_on(snapshot: &FormSnapshot, today: NaiveDate) -> Result<Self, RecordError> {
        let report = validate_on(snapshot.schema(), &snapshot.values, today);
        if !report.is_valid() {
            return Err(RecordError::Invalid(report));
        }
        let r = Reader(&snapshot.values);
        match snapshot.client_type {
            ClientType::Individual => r.individual().map(Self::Individual),
            ClientType::Entity => r.entity().map(Self::Entity),
        }
    }

    /// The record's client type.
    pub fn client_type(&self) -> ClientType {
        match self {
            Self::Individual(_) => ClientType::Individual,
            Self::Entity(_) => ClientType::Entity,
        }
    }

    /// Name to show in confirmations and logs.
    pub fn display_name(&self) -> String {
        match self {
            Self::Individual(r) => format!("{} {}", r.personal.first_name, r.personal.last_name),
            Self::Entity(r) => r.legal.legal_name.clone(),
        }
    }
}

/// Typed reads over validated values.
struct Reader<'a>(&'a FormValues);

impl Reader<'_> {
    fn individual(&self) -> Result<IndividualRecord, RecordError> {
        Ok(IndividualRecord {
            personal: PersonalDetails {
                first_name: self.text("firstName")?,
                middle_name: self.opt_text("middleName"),
                last_name: self.text("lastName")?,
                date_of_birth: self.date("dateOfBirth")?,
                nationality: self.text("nationality")?,
                gender: self.choice("gender")?,
            },
            contact: ContactDetails {
                email: self.text("email")?,
                phone: self.text("phone")?,
                address: self.text("address")?,
                city: self.text("city")?,
                postal_code: self.text("postalCode")?,
                country: self.text("country")?,
            },
            identification: Identification {
                id_type: self.choice("idType")?,
                id_number: self.text("idNumber")?,
                id_issue_date: self.opt_date("idIssueDate"),
                id_expiry_date: self.date("idExpiryDate")?,
            },
            employment: EmploymentDetails {
                occupation: self.text("occupation")?,
                employer: self.opt_text("employer"),
                annual_income: self.choice("annualIncome")?,
                source_of_funds: self.choice("sourceOfFunds")?,
            },
            risk: IndividualRisk {
                is_pep: self.flag("isPep"),
                pep_details: self.detail("isPep", "pepDetails"),
                has_high_risk_country_exposure: self.flag("hasHighRiskCountryExposure"),
                high_risk_country_details: self
                    .detail("hasHighRiskCountryExposure", "highRiskCountryDetails"),
            },
            tax: IndividualTax {
                tax_residency: self.text("taxResidency")?,
                tax_id: self.opt_text("taxId"),
                fatca_status: self.choice("fatcaStatus")?,
            },
            consent: self.consent(),
        })
    }

    fn entity(&self) -> Result<EntityRecord, RecordError> {
        Ok(EntityRecord {
            legal: LegalDetails {
                legal_name: self.text("legalName")?,
                trading_name: self.opt_text("tradingName"),
                registration_number: self.text("registrationNumber")?,
                incorporation_date: self.date("incorporationDate")?,
                incorporation_country: self.text("incorporationCountry")?,
                entity_type: self.choice("entityType")?,
            },
            contact: EntityContactDetails {
                email: self.text("email")?,
                phone: self.text("phone")?,
                registered_address: self.text("registeredAddress")?,
                city: self.text("city")?,
                postal_code: self.text("postalCode")?,
                country: self.text("country")?,
                website: self.opt_text("website"),
            },
            business: BusinessProfile {
                industry: self.text("industry")?,
                business_description: self.text("businessDescription")?,
                annual_revenue: self.choice("annualRevenue")?,
                number_of_employees: self.choice("numberOfEmployees")?,
            },
            ownership: OwnershipStructure {
                ultimate_beneficial_owners: self.text("ultimateBeneficialOwners")?,
                politically_exposed_ownership: self.flag("politicallyExposedOwnership"),
                pep_ownership_details: self
                    .detail("politicallyExposedOwnership", "pepOwnershipDetails"),
            },
            risk: EntityRisk {
                operates_in_high_risk_countries: self.flag("operatesInHighRiskCountries"),
                high_risk_country_details: self
                    .detail("operatesInHighRiskCountries", "highRiskCountryDetails"),
                source_of_funds: self.choice("sourceOfFunds")?,
            },
            tax: EntityTax {
                tax_residency: self.text("taxResidency")?,
                tax_id: self.text("taxId")?,
                fatca_classification: self.choice("fatcaClassification")?,
            },
            consent: self.consent(),
        })
    }

    fn consent(&self) -> Consent {
        Consent {
            data_processing_consent: self.flag("dataProcessingConsent"),
            terms_accepted: self.flag("termsAccepted"),
        }
    }

    fn text(&self, name: &str) -> Result<String, RecordError> {
        self.opt_text(name).ok_or_else(|| field_error(name, "missing text value"))
    }

    fn opt_text(&self, name: &str) -> Option<String> {
        self.0
            .present(name)
            .and_then(|v| v.as_text())
            .map(|s| s.trim().to_string())
    }

    fn flag(&self, name: &str) -> bool {
        self.0.is_true(name)
    }

    fn detail(&self, flag: &str, name: &str) -> Option<String> {
        if self.flag(flag) {
            self.opt_text(name)
        } else {
            None
        }
    }

    fn date(&self, name: &str) -> Result<NaiveDate, RecordError> {
        self.opt_date(name).ok_or_else(|| field_error(name, "missing date value"))
    }

    fn opt_date(&self, name: &str) -> Option<NaiveDate> {
        self.0.present(name).and_then(|v| v.as_date())
    }

    fn choice<T>(&self, name: &str) -> Result<T, RecordError>
    where
        T: FromStr<Err = KycError>,
    {
        let raw = self.text(name)?;
        raw.parse().map_err(|e: KycError| field_error(name, &e.to_string()))
    }
}

fn field_error(field: &str, reason: &str) -> RecordError {
    RecordError::Field {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldValue;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    fn entity_values() -> FormValues {
        [
            ("legalName", FieldValue::from(" Indus Trading Ltd ")),
            ("registrationNumber", FieldValue::from("0123456")),
            ("incorporationDate", FieldValue::from("2015-09-30")),
            ("incorporationCountry", FieldValue::from("Pakistan")),
            ("entityType", FieldValue::from("corporation")),
            ("email", FieldValue::from("compliance@indus.example")),
            ("phone", FieldValue::from("+922135000000")),
            ("registeredAddress", FieldValue::from("Plot 7, Clifton")),
            ("city", FieldValue::from("Karachi")),
            ("postalCode", FieldValue::from("75600")),
            ("country", FieldValue::from("Pakistan")),
            ("website", FieldValue::from("")),
            ("industry", FieldValue::from("Wholesale trade")),
            (
                "businessDescription",
                FieldValue::from("Import and distribution of textile machinery."),
            ),
            ("annualRevenue", FieldValue::from("10m_50m")),
            ("numberOfEmployees", FieldValue::from("51_200")),
            ("ultimateBeneficialOwners", FieldValue::from("S. Malik (60%), R. Malik (40%)")),
            ("politicallyExposedOwnership", FieldValue::Bool(false)),
            ("pepOwnershipDetails", FieldValue::from("stale note")),
            ("operatesInHighRiskCountries", FieldValue::Bool(true)),
            ("highRiskCountryDetails", FieldValue::from("Supplier in Iran (dormant)")),
            ("sourceOfFunds", FieldValue::from("operating_revenue")),
            ("taxResidency", FieldValue::from("Pakistan")),
            ("taxId", FieldValue::from("1234567")),
            ("fatcaClassification", FieldValue::from("active_nffe")),
            ("dataProcessingConsent", FieldValue::Bool(true)),
            ("termsAccepted", FieldValue::Bool(true)),
        ]
        .into_iter()
        .collect()
    }

    fn snapshot(client_type: ClientType, values: FormValues) -> FormSnapshot {
        FormSnapshot {
            client_type,
            values,
        }
    }

    #[test]
    fn test_entity_record_built_from_valid_values() {
        let record =
            ClientRecord::from_snapshot_on(&snapshot(ClientType::Entity, entity_values()), today())
                .unwrap();
        let ClientRecord::Entity(r) = &record else {
            panic!("expected entity record, got {record:?}");
        };
        assert_eq!(r.legal.legal_name, "Indus Trading Ltd");
        assert_eq!(r.legal.entity_type, EntityType::Corporation);
        assert_eq!(r.contact.website, None);
        assert_eq!(r.ownership.pep_ownership_details, None);
        assert_eq!(
            r.risk.high_risk_country_details.as_deref(),
            Some("Supplier in Iran (dormant)")
        );
        assert_eq!(record.client_type(), ClientType::Entity);
        assert_eq!(record.display_name(), "Indus Trading Ltd");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut values = entity_values();
        values.insert("termsAccepted", FieldValue::Bool(false));
        let err = ClientRecord::from_snapshot_on(&snapshot(ClientType::Entity, values), today())
            .unwrap_err();
        match err {
            RecordError::Invalid(report) => assert_eq!(report.field_names(), vec!["termsAccepted"]),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_entity_values_do_not_form_individual_record() {
        let err =
            ClientRecord::from_snapshot_on(&snapshot(ClientType::Individual, entity_values()), today())
                .unwrap_err();
        assert!(matches!(err, RecordError::Invalid(_)));
    }

    #[test]
    fn test_record_error_converts_to_validation() {
        let err = ClientRecord::from_snapshot_on(
            &snapshot(ClientType::Entity, FormValues::new()),
            today(),
        )
        .unwrap_err();
        let top = KycError::from(err);
        assert!(matches!(top, KycError::Validation(ref m) if m.contains("legalName")));
    }

    #[test]
    fn test_payload_is_tagged() {
        let record =
            ClientRecord::from_snapshot_on(&snapshot(ClientType::Entity, entity_values()), today())
                .unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["clientType"], "entity");
        assert_eq!(json["legal"]["registrationNumber"], "0123456");
        assert_eq!(json["legal"]["incorporationDate"], "2015-09-30");
        assert_eq!(json["business"]["numberOfEmployees"], "51_200");
        assert!(json.get("personal").is_none());
    }
}
