//! Markdown rendering of parsed abapGit metadata.

use super::metadata::{
    ClassRecord, DataElementRecord, FunctionGroupRecord, FunctionParameter, ParsedMetadata, StructureRecord,
};
use super::{ExtractedObject, ObjectType};

/// Renders a structure as a heading plus field table
pub fn structure_to_markdown(record: &StructureRecord) -> String {
    let description = if record.description.is_empty() {
        "N/A"
    } else {
        record.description.as_str()
    };

    let mut md = String::new();
    md.push_str(&format!("### Structure: {}\n", record.name));
    md.push_str(&format!("**Description:** {}\n", description));
    md.push_str(&format!("**Type:** {}\n\n", record.table_class));
    md.push_str("| Pos | Field Name | Data Element | Data Type | Length |\n");
    md.push_str("|-----|-----------|-------------|-----------|--------|\n");
    for field in &record.fields {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            field.position,
            field.field_name,
            field.data_element,
            field.data_type.as_deref().unwrap_or(""),
            field.length.as_deref().unwrap_or("")
        ));
    }
    md
}

/// Renders a data element with its type and labels
pub fn data_element_to_markdown(record: &DataElementRecord) -> String {
    format!(
        "### Data Element: {}\n**Description:** {}\n**Data Type:** {}, Length: {}, Decimals: {}\n**Labels:** Short: \"{}\", Medium: \"{}\", Long: \"{}\"\n",
        record.name,
        record.description,
        record.data_type,
        record.length,
        record.decimals,
        record.labels.short,
        record.labels.medium,
        record.labels.long
    )
}

fn write_parameters(md: &mut String, heading: &str, parameters: &[FunctionParameter]) {
    if parameters.is_empty() {
        return;
    }
    md.push_str(&format!("**{}:**\n", heading));
    for parameter in parameters {
        md.push_str(&format!(
            "- {} TYPE {} - {}\n",
            parameter.name, parameter.type_name, parameter.description
        ));
    }
}

/// Renders a function group with the interface of every function module
pub fn function_group_to_markdown(record: &FunctionGroupRecord) -> String {
    let mut md = String::new();
    md.push_str(&format!("### Function Group: {}\n", record.name));
    md.push_str(&format!("**Includes:** {}\n\n", record.includes.join(", ")));
    for function in &record.functions {
        md.push_str(&format!("#### FM: {}\n", function.name));
        md.push_str(&format!("**Description:** {}\n", function.description));
        write_parameters(&mut md, "IMPORTING", &function.importing);
        write_parameters(&mut md, "EXPORTING", &function.exporting);
        write_parameters(&mut md, "CHANGING", &function.changing);
        write_parameters(&mut md, "TABLES", &function.tables);
        if !function.exceptions.is_empty() {
            md.push_str(&format!("**EXCEPTIONS:** {}\n", function.exceptions.join(", ")));
        }
        md.push('\n');
    }
    md
}

/// Renders a class with superclass and interfaces when known
pub fn class_to_markdown(record: &ClassRecord) -> String {
    let mut md = String::new();
    md.push_str(&format!("### Class: {}\n", record.name));
    md.push_str(&format!("**Description:** {}\n", record.description));
    if let Some(superclass) = &record.superclass {
        md.push_str(&format!("**Superclass:** {}\n", superclass));
    }
    if !record.interfaces.is_empty() {
        md.push_str(&format!("**Interfaces:** {}\n", record.interfaces.join(", ")));
    }
    md
}

/// Renders any parsed record
pub fn metadata_to_markdown(metadata: &ParsedMetadata) -> String {
    match metadata {
        ParsedMetadata::Structure(record) => structure_to_markdown(record),
        ParsedMetadata::DataElement(record) => data_element_to_markdown(record),
        ParsedMetadata::FunctionGroup(record) => function_group_to_markdown(record),
        ParsedMetadata::Class(record) => class_to_markdown(record),
    }
}

const SECTIONS: [(ObjectType, &str); 4] = [
    (ObjectType::Tabl, "## Data Dictionary - Structures & Tables\n"),
    (ObjectType::Dtel, "## Data Dictionary - Data Elements\n"),
    (ObjectType::Fugr, "## Function Groups\n"),
    (ObjectType::Clas, "## Classes\n"),
];

/// Builds the metadata context for a set of objects.
///
/// Sections appear in a fixed order (structures, data elements, function
/// groups, classes) and only for kinds that have at least one parsed record.
/// Returns an empty string when nothing was parsed.
pub fn build_metadata_context(objects: &[ExtractedObject]) -> String {
    let mut parts: Vec<String> = Vec::new();

    for (object_type, heading) in SECTIONS {
        let records: Vec<&ParsedMetadata> = objects
            .iter()
            .filter(|object| object.object_type == object_type)
            .filter_map(|object| object.parsed_metadata.as_ref())
            .collect();
        if records.is_empty() {
            continue;
        }
        parts.push(heading.to_string());
        for record in records {
            parts.push(metadata_to_markdown(record));
            parts.push(String::new());
        }
    }

    parts.join("\n")
}
