//! Response schema declared to the backend. Mirrors `GenerationResult`.

use serde_json::{json, Value};

/// Fields the backend must always return.
pub const REQUIRED_FIELDS: [&str; 4] = ["subject", "emailBody", "coverLetter", "skillAlignment"];

/// Builds the structured-output schema (OpenAPI subset, as accepted by
/// Gemini `generationConfig.responseSchema`).
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "subject": { "type": "STRING" },
            "emailBody": { "type": "STRING" },
            "coverLetter": { "type": "STRING" },
            "salaryNote": { "type": "STRING" },
            "cvAnalysis": { "type": "STRING" },
            "skillAlignment": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "label": { "type": "STRING" },
                        "score": { "type": "INTEGER" }
                    },
                    "required": ["label", "score"]
                }
            }
        },
        "required": REQUIRED_FIELDS,
        "propertyOrdering": [
            "subject", "emailBody", "coverLetter", "salaryNote", "cvAnalysis", "skillAlignment"
        ]
    })
}
