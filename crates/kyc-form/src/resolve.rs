//! # Conditional Field Resolver
//!
//! Computes effective requiredness and visibility from the current values.
//! Nothing is cached: every call reads the controlling field afresh, so a
//! toggle between two validation passes is always observed.

use crate::schema::{FieldSchema, FormSchema, Requirement};
use crate::value::FormValues;

/// Whether `field` must carry a value given the current `values`.
pub fn resolve_required(field: &FieldSchema, values: &FormValues) -> bool {
    match field.requirement {
        Requirement::Optional => false,
        Requirement::Required | Requirement::MustAccept => true,
        Requirement::RequiredWhen(flag) => values.is_true(flag),
    }
}

/// Whether `field` is shown given the current `values`.
///
/// Conditional detail fields are shown only while their controlling
/// boolean is on; everything else is always shown.
pub fn is_visible(field: &FieldSchema, values: &FormValues) -> bool {
    match field.requirement {
        Requirement::RequiredWhen(flag) => values.is_true(flag),
        _ => true,
    }
}

/// Fields currently required, in schema order.
pub fn required_fields(schema: &FormSchema, values: &FormValues) -> Vec<&'static FieldSchema> {
    schema
        .fields
        .iter()
        .filter(|f| resolve_required(f, values))
        .collect()
}

/// Fields currently shown, in schema order.
pub fn visible_fields(schema: &FormSchema, values: &FormValues) -> Vec<&'static FieldSchema> {
    schema
        .fields
        .iter()
        .filter(|f| is_visible(f, values))
        .collect()
}
