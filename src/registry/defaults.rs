// file: src/registry/defaults.rs
// description: built-in field and section definitions loaded at startup
// reference: labels used by the ticketing export the formatter targets

use crate::models::{
    FieldDefinition, FieldMap, SECTION_ACTION_RECOMMENDATION, SECTION_GENERAL,
    SECTION_INCIDENT_INFO, SectionDefinition, SectionMap,
};

/// Render order for the general block. Matched fields outside this list follow in registry order.
pub const CANONICAL_FIELD_ORDER: [&str; 8] = [
    "category",
    "subCategories",
    "deviceAction",
    "severity",
    "dateOfIssue",
    "startTime",
    "endTime",
    "destinationPort",
];

pub fn default_fields() -> FieldMap {
    let mut fields = FieldMap::new();

    fields.insert(
        "category".to_string(),
        FieldDefinition::new(&["Category", "Incident Category"], "Category", 1),
    );
    fields.insert(
        "subCategories".to_string(),
        FieldDefinition::new(
            &["Sub Categories", "Sub Category", "Subcategory"],
            "Sub Categories",
            2,
        ),
    );
    fields.insert(
        "deviceAction".to_string(),
        FieldDefinition::new(&["Device Action", "Action Taken"], "Device Action", 3),
    );
    fields.insert(
        "severity".to_string(),
        FieldDefinition::new(&["Severity", "Risk Level"], "Severity", 4),
    );
    fields.insert(
        "dateOfIssue".to_string(),
        FieldDefinition::new(&["Date of Issue", "Issue Date"], "Date of Issue", 5),
    );
    fields.insert(
        "startTime".to_string(),
        FieldDefinition::new(&["Start Time", "First Seen"], "Start Time", 6),
    );
    fields.insert(
        "endTime".to_string(),
        FieldDefinition::new(&["End Time", "Last Seen"], "End Time", 7),
    );
    fields.insert(
        "destinationPort".to_string(),
        FieldDefinition::new(
            &["Destination Port", "Dest Port", "Dst Port"],
            "Destination Port",
            8,
        ),
    );
    fields.insert(
        "sourceIp".to_string(),
        FieldDefinition::new(&["Source IP", "Src IP", "Attacker IP"], "Source IP", 9),
    );
    fields.insert(
        "destinationIp".to_string(),
        FieldDefinition::new(
            &["Destination IP", "Dest IP", "Dst IP", "Target IP"],
            "Destination IP",
            10,
        ),
    );
    fields.insert(
        "sourcePort".to_string(),
        FieldDefinition::new(&["Source Port", "Src Port"], "Source Port", 11),
    );
    fields.insert(
        "hostname".to_string(),
        FieldDefinition::new(&["Hostname", "Host Name", "Device Name"], "Hostname", 12),
    );
    fields.insert(
        "username".to_string(),
        FieldDefinition::new(&["Username", "User Name", "Account Name"], "Username", 13),
    );
    fields.insert(
        "protocol".to_string(),
        FieldDefinition::new(&["Protocol"], "Protocol", 14),
    );

    fields
}

pub fn default_sections() -> SectionMap {
    let mut sections = SectionMap::new();

    sections.insert(
        SECTION_GENERAL.to_string(),
        SectionDefinition::new("Incident General Information"),
    );
    sections.insert(
        SECTION_INCIDENT_INFO.to_string(),
        SectionDefinition::new("Incident Information"),
    );
    sections.insert(
        SECTION_ACTION_RECOMMENDATION.to_string(),
        SectionDefinition::new("Action & Recommendation"),
    );

    sections
}
