//! # Schema Subcommand
//!
//! Prints the declared fields of a client type, grouped by form tab.
//!
//! ```bash
//! kyc schema individual
//! kyc schema entity --json
//! ```

use anyhow::Result;
use clap::Args;

use kyc_core::ClientType;
use kyc_form::{FieldFormat, FieldKind, FieldSchema, FormSchema, Requirement};

/// Arguments for the schema subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Client type: individual or entity.
    pub client_type: ClientType,

    /// Emit the field table as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the schema subcommand.
pub fn run_schema(args: &SchemaArgs) -> Result<u8> {
    let schema = FormSchema::for_client(args.client_type);
    if args.json {
        println!("{}", serde_json::to_string_pretty(schema)?);
    } else {
        print!("{}", render_schema(schema));
    }
    Ok(0)
}

/// Plain-text field table.
pub fn render_schema(schema: &FormSchema) -> String {
    let mut out = format!("{} fields ({}):\n", schema.client_type, schema.fields.len());
    let mut section = None;
    for field in schema.fields {
        if section != Some(field.section) {
            section = Some(field.section);
            out.push_str(&format!("\n{}\n", field.section.title()));
        }
        out.push_str(&format!(
            "  {:<28} {:<10} {:<28} {}\n",
            field.name,
            kind_name(field.kind),
            requirement_text(field),
            formats_text(field.formats),
        ));
    }
    out
}

fn kind_name(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text => "text",
        FieldKind::Date => "date",
        FieldKind::Boolean => "boolean",
        FieldKind::Choice(_) => "choice",
    }
}

fn requirement_text(field: &FieldSchema) -> String {
    match field.requirement {
        Requirement::Optional => "optional".to_string(),
        Requirement::Required => "required".to_string(),
        Requirement::RequiredWhen(dep) => format!("required when {dep}"),
        Requirement::MustAccept => "must accept".to_string(),
    }
}

fn formats_text(formats: &[FieldFormat]) -> String {
    formats
        .iter()
        .map(|f| match f {
            FieldFormat::Email => "email".to_string(),
            FieldFormat::MinLength(n) => format!("min {n}"),
            FieldFormat::NotInFuture => "not in future".to_string(),
            FieldFormat::NotInPast => "not in past".to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use kyc_form::{ENTITY_SCHEMA, INDIVIDUAL_SCHEMA};

    #[test]
    fn test_renders_every_field_under_its_section() {
        let text = render_schema(&INDIVIDUAL_SCHEMA);
        assert!(text.starts_with("individual fields (29):"));
        for field in INDIVIDUAL_SCHEMA.fields {
            assert!(text.contains(field.name), "missing {}", field.name);
        }
        assert!(text.contains("required when isPep"));
        assert!(text.contains("not in past"));
    }

    #[test]
    fn test_json_lists_choice_options() {
        let json = serde_json::to_value(&ENTITY_SCHEMA).unwrap();
        assert_eq!(json["clientType"], "entity");
        let entity_type = json["fields"]
            .as_array()
            .unwrap()
            .iter()
            .find(|f| f["name"] == "entityType")
            .unwrap();
        assert_eq!(entity_type["kind"], "choice");
        assert!(entity_type["options"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("llc")));
    }

    #[test]
    fn test_json_carries_rules_and_formats() {
        let json = serde_json::to_value(&INDIVIDUAL_SCHEMA).unwrap();
        let fields = json["fields"].as_array().unwrap();
        assert_eq!(fields.len(), INDIVIDUAL_SCHEMA.fields.len());

        let first_name = &fields[0];
        assert_eq!(first_name["name"], "firstName");
        assert_eq!(first_name["section"], "personal");
        assert_eq!(first_name["kind"], "text");
        assert_eq!(first_name["rule"], "required");
        assert_eq!(
            first_name["formats"],
            serde_json::json!([{ "format": "min_length", "value": 2 }])
        );

        let pep_details = fields
            .iter()
            .find(|f| f["rule"] == "required_when")
            .unwrap();
        assert_eq!(pep_details["field"], "isPep");
    }
}
