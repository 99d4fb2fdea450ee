//! Body-part symptom analysis.

use crate::error::SchemaError;
use crate::record::ExtractedRecord;
use crate::schema::{FieldDescriptor as F, Schema};
use crate::urgency::Urgency;

pub fn prompt(body_part: &str, symptoms: &str) -> String {
    format!(
        "\
As an experienced physician, analyze these symptoms for the {body_part}:

Patient-reported symptoms: {symptoms}

Provide a structured analysis with numbered, bold headings and a bulleted list under each:

1. **Possible Causes:**
   - Most likely causes based on the symptoms and body area
2. **Urgency Level:**
   - Low, Medium or High, with a one-line reason
3. **Recommendations:**
   - Immediate self-care steps
4. **Home Remedies:**
   - Safe remedies and what to avoid
5. **Warning Signs:**
   - Symptoms that require immediate medical attention
6. **When to See a Doctor:**
   - Scenarios and timeline for consultation, and which specialist
7. **Follow-up Care:**
   - Monitoring, recovery expectations and prevention

Leave a blank line between sections. Emphasize that a professional medical consultation is needed for an accurate diagnosis.
",
        body_part = body_part.trim(),
        symptoms = symptoms.trim()
    )
}

pub fn schema() -> Result<Schema, SchemaError> {
    Schema::new(vec![
        F::bullets(
            "cause",
            &[
                "Multiple factors could contribute to these symptoms",
                "Proper medical evaluation needed for accurate diagnosis",
                "Consider recent activities or changes in routine",
            ],
        )
        .keyed("possible_causes"),
        F::bullets(
            "recommend",
            &[
                "Rest and monitor symptoms closely",
                "Stay hydrated and maintain good nutrition",
                "Avoid strenuous activities until symptoms improve",
            ],
        )
        .keyed("recommendations"),
        F::bullets(
            "home remed",
            &[
                "Apply appropriate hot/cold therapy as suitable",
                "Get adequate rest and sleep",
                "Maintain proper posture and ergonomics",
            ],
        )
        .keyed("home_remedies"),
        F::bullets(
            "warning sign",
            &[
                "Severe or worsening pain",
                "Signs of infection (fever, swelling)",
                "Difficulty with normal activities",
            ],
        )
        .keyed("warning_signs"),
        F::bullets(
            "see a doctor",
            &["Consult a healthcare provider if symptoms persist for more than 2-3 days or worsen"],
        )
        .keyed("when_to_see_doctor"),
        F::bullets(
            "follow",
            &[
                "Monitor symptoms daily",
                "Keep a symptom diary",
                "Schedule follow-up if needed",
            ],
        )
        .keyed("follow_up_care"),
    ])
}

/// Urgency of an analysis, or [`Urgency::UNASSESSED`] when the response
/// yielded none of the schema's fields.
pub fn urgency(text: &str, record: &ExtractedRecord) -> Urgency {
    if record.fallback_keys().len() == record.len() {
        return Urgency::UNASSESSED;
    }
    Urgency::classify(text)
}
