//! # Validator
//!
//! Maps a schema and the current form values to an ordered list of field
//! errors.
//!
//! ## Algorithm
//!
//! For each field in declaration order:
//!
//! 1. Resolve effective requiredness through [`crate::resolve`].
//! 2. Consents must be `true`, otherwise "`<label>` must be accepted".
//! 3. A required field with no value yields "`<label>` is required".
//! 4. A present value is checked against the field kind, then against each
//!    format constraint. The first failure is reported.
//!
//! Every field is checked; one field failing never hides another. At most
//! one error is produced per field. Hidden conditional fields are skipped
//! even when they still hold stale text.
//!
//! Date bounds are evaluated against an explicit `today` in
//! [`validate_on`]; [`validate`] uses the current UTC date.

use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use kyc_core::{ClientType, Timestamp};

use crate::resolve::{is_visible, resolve_required};
use crate::schema::{FieldFormat, FieldKind, FieldSchema, FormSchema, Requirement};
use crate::value::{FieldValue, FormValues};

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// A problem with one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Name of the offending field.
    pub field: String,
    /// User-facing message.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}: {}", self.field, self.message)
    }
}

/// Outcome of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Client type that was validated.
    pub client_type: ClientType,
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// Whether submission is permitted.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether there are no errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors in schema order.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// The error for a field, if any.
    pub fn error_for(&self, field: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// Names of the failing fields, in schema order.
    pub fn field_names(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }

    /// Consume the report, returning the errors.
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

/// Validate `values` against `schema` using today's UTC date.
pub fn validate(schema: &FormSchema, values: &FormValues) -> ValidationReport {
    validate_on(schema, values, Timestamp::today())
}

/// Validate `values` against `schema`, evaluating date bounds against `today`.
pub fn validate_on(schema: &FormSchema, values: &FormValues, today: NaiveDate) -> ValidationReport {
    let errors = schema
        .fields
        .iter()
        .filter_map(|field| {
            check_field(field, values, today).map(|message| ValidationError {
                field: field.name.to_string(),
                message: format!("{} {message}", field.label),
            })
        })
        .collect();

    ValidationReport {
        client_type: schema.client_type,
        errors,
    }
}

/// The message tail for the first failing check of `field`, if any.
fn check_field(field: &FieldSchema, values: &FormValues, today: NaiveDate) -> Option<String> {
    if field.requirement == Requirement::MustAccept {
        return (!values.is_true(field.name)).then(|| "must be accepted".to_string());
    }

    let Some(value) = values.present(field.name) else {
        return resolve_required(field, values).then(|| "is required".to_string());
    };

    if !is_visible(field, values) {
        return None;
    }

    match check_kind(field.kind, value) {
        Ok(checked) => field
            .formats
            .iter()
            .find_map(|format| check_format(*format, &checked, today)),
        Err(message) => Some(message),
    }
}

/// A value that has passed its kind check.
enum Checked<'a> {
    Text(&'a str),
    Date(NaiveDate),
    Bool,
}

fn check_kind(kind: FieldKind, value: &FieldValue) -> Result<Checked<'_>, String> {
    match kind {
        FieldKind::Text => value
            .as_text()
            .map(|s| Checked::Text(s.trim()))
            .ok_or_else(|| "must be text".to_string()),
        FieldKind::Boolean => value
            .as_bool()
            .map(|_| Checked::Bool)
            .ok_or_else(|| "must be true or false".to_string()),
        FieldKind::Date => value
            .as_date()
            .map(Checked::Date)
            .ok_or_else(|| "must be a valid date (YYYY-MM-DD)".to_string()),
        FieldKind::Choice(options) => match value.as_text().map(str::trim) {
            Some(s) if options.contains(&s) => Ok(Checked::Text(s)),
            _ => Err(format!("must be one of: {}", options.join(", "))),
        },
    }
}

fn check_format(format: FieldFormat, value: &Checked<'_>, today: NaiveDate) -> Option<String> {
    match (format, value) {
        (FieldFormat::Email, Checked::Text(s)) => {
            (!is_email(s)).then(|| "must be a valid email address".to_string())
        }
        (FieldFormat::MinLength(min), Checked::Text(s)) => (s.chars().count() < min)
            .then(|| format!("must be at least {min} characters")),
        (FieldFormat::NotInFuture, Checked::Date(d)) => {
            (*d > today).then(|| "cannot be in the future".to_string())
        }
        (FieldFormat::NotInPast, Checked::Date(d)) => {
            (*d < today).then(|| "cannot be in the past".to_string())
        }
        _ => None,
    }
}

fn is_email(s: &str) -> bool {
    static EMAIL: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(EMAIL_PATTERN))
        .as_ref()
        .map(|re| re.is_match(s))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ENTITY_SCHEMA, INDIVIDUAL_SCHEMA};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    fn valid_individual() -> FormValues {
        [
            ("firstName", FieldValue::from("Amina")),
            ("lastName", FieldValue::from("Qureshi")),
            ("dateOfBirth", FieldValue::from("1988-02-14")),
            ("nationality", FieldValue::from("Pakistani")),
            ("gender", FieldValue::from("female")),
            ("email", FieldValue::from("amina@example.com")),
            ("phone", FieldValue::from("+923001234567")),
            ("address", FieldValue::from("12 Mall Road")),
            ("city", FieldValue::from("Lahore")),
            ("postalCode", FieldValue::from("54000")),
            ("country", FieldValue::from("Pakistan")),
            ("idType", FieldValue::from("passport")),
            ("idNumber", FieldValue::from("AB1234567")),
            ("idExpiryDate", FieldValue::from("2030-01-01")),
            ("occupation", FieldValue::from("Engineer")),
            ("annualIncome", FieldValue::from("50k_100k")),
            ("sourceOfFunds", FieldValue::from("employment")),
            ("taxResidency", FieldValue::from("Pakistan")),
            ("fatcaStatus", FieldValue::from("non_us_person")),
            ("dataProcessingConsent", FieldValue::Bool(true)),
            ("termsAccepted", FieldValue::Bool(true)),
        ]
        .into_iter()
        .collect()
    }

    fn run(values: &FormValues) -> ValidationReport {
        validate_on(&INDIVIDUAL_SCHEMA, values, today())
    }

    #[test]
    fn test_valid_individual_passes() {
        let report = run(&valid_individual());
        assert!(report.is_valid(), "unexpected errors:\n{report}");
    }

    #[test]
    fn test_empty_form_reports_every_required_field_in_order() {
        let report = run(&FormValues::new());
        let expected: Vec<&str> = INDIVIDUAL_SCHEMA
            .fields
            .iter()
            .filter(|f| f.is_statically_required())
            .map(|f| f.name)
            .collect();
        assert_eq!(report.field_names(), expected);
    }

    #[test]
    fn test_required_message_uses_label() {
        let mut values = valid_individual();
        values.remove("firstName");
        let report = run(&values);
        assert_eq!(report.len(), 1);
        assert_eq!(report.errors()[0].field, "firstName");
        assert_eq!(report.errors()[0].message, "First name is required");
    }

    #[test]
    fn test_blank_text_counts_as_missing() {
        let mut values = valid_individual();
        values.insert("city", FieldValue::from("   "));
        let report = run(&values);
        assert_eq!(report.error_for("city").unwrap().message, "City is required");
    }

    #[test]
    fn test_pep_details_required_only_when_pep() {
        let mut values = valid_individual();
        values.insert("isPep", FieldValue::Bool(true));
        values.insert("pepDetails", FieldValue::from(""));
        let report = run(&values);
        assert_eq!(report.field_names(), vec!["pepDetails"]);

        values.insert("isPep", FieldValue::Bool(false));
        assert!(run(&values).is_valid());
    }

    #[test]
    fn test_hidden_conditional_with_stale_text_is_ignored() {
        let mut values = valid_individual();
        values.insert("highRiskCountryDetails", FieldValue::from("x"));
        assert!(run(&values).is_valid());
    }

    #[test]
    fn test_consent_must_be_true() {
        let mut values = valid_individual();
        values.insert("termsAccepted", FieldValue::Bool(false));
        let report = run(&values);
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.errors()[0],
            ValidationError {
                field: "termsAccepted".to_string(),
                message: "Terms and conditions must be accepted".to_string(),
            }
        );

        values.remove("termsAccepted");
        assert_eq!(run(&values).field_names(), vec!["termsAccepted"]);
    }

    #[test]
    fn test_email_format() {
        let mut values = valid_individual();
        values.insert("email", FieldValue::from("amina@example"));
        let report = run(&values);
        assert_eq!(
            report.error_for("email").unwrap().message,
            "Email must be a valid email address"
        );
    }

    #[test]
    fn test_min_length_counts_trimmed_chars() {
        let mut values = valid_individual();
        values.insert("firstName", FieldValue::from(" A "));
        let report = run(&values);
        assert_eq!(
            report.error_for("firstName").unwrap().message,
            "First name must be at least 2 characters"
        );
        values.insert("firstName", FieldValue::from("Żo"));
        assert!(run(&values).is_valid());
    }

    #[test]
    fn test_birth_date_cannot_be_future() {
        let mut values = valid_individual();
        values.insert("dateOfBirth", FieldValue::from("2026-06-02"));
        assert_eq!(
            run(&values).error_for("dateOfBirth").unwrap().message,
            "Date of birth cannot be in the future"
        );
        values.insert("dateOfBirth", FieldValue::from("2026-06-01"));
        assert!(run(&values).is_valid());
    }

    #[test]
    fn test_expiry_date_cannot_be_past() {
        let mut values = valid_individual();
        values.insert(
            "idExpiryDate",
            FieldValue::Date(NaiveDate::from_ymd_opt(2026, 5, 31).unwrap()),
        );
        assert_eq!(
            run(&values).error_for("idExpiryDate").unwrap().message,
            "ID expiry date cannot be in the past"
        );
    }

    #[test]
    fn test_malformed_date() {
        let mut values = valid_individual();
        values.insert("dateOfBirth", FieldValue::from("14/02/1988"));
        assert_eq!(
            run(&values).error_for("dateOfBirth").unwrap().message,
            "Date of birth must be a valid date (YYYY-MM-DD)"
        );
    }

    #[test]
    fn test_choice_outside_options() {
        let mut values = valid_individual();
        values.insert("idType", FieldValue::from("library_card"));
        assert_eq!(
            run(&values).error_for("idType").unwrap().message,
            "ID type must be one of: passport, national_id, drivers_license"
        );
    }

    #[test]
    fn test_wrong_value_kind() {
        let mut values = valid_individual();
        values.insert("isPep", FieldValue::from("yes"));
        values.insert("occupation", FieldValue::Bool(true));
        let report = run(&values);
        assert_eq!(report.field_names(), vec!["occupation", "isPep"]);
        assert_eq!(
            report.error_for("isPep").unwrap().message,
            "Politically exposed person must be true or false"
        );
    }

    #[test]
    fn test_optional_field_format_checked_when_present() {
        let mut values = valid_individual();
        values.insert("idIssueDate", FieldValue::from("2027-01-01"));
        assert_eq!(run(&values).field_names(), vec!["idIssueDate"]);
    }

    #[test]
    fn test_entity_conditional_requirements() {
        let mut values = FormValues::new();
        values.insert("politicallyExposedOwnership", FieldValue::Bool(true));
        values.insert("operatesInHighRiskCountries", FieldValue::Bool(true));
        let report = validate_on(&ENTITY_SCHEMA, &values, today());
        assert!(report.error_for("pepOwnershipDetails").is_some());
        assert!(report.error_for("highRiskCountryDetails").is_some());
        assert_eq!(report.client_type, ClientType::Entity);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let mut values = valid_individual();
        values.remove("email");
        values.insert("isPep", FieldValue::Bool(true));
        assert_eq!(run(&values), run(&values));
    }

    #[test]
    fn test_report_display() {
        let mut values = valid_individual();
        values.remove("city");
        values.remove("country");
        let text = run(&values).to_string();
        assert_eq!(text, "  city: City is required\n  country: Country is required");
    }
}
