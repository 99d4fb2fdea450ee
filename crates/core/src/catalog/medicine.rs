//! Medicine information lookup.

use super::in_section;
use crate::error::SchemaError;
use crate::schema::{FieldDescriptor as F, Schema};

/// Prompt asking for the labeled medicine sheet read by [`schema`].
pub fn prompt(medicine: &str) -> String {
    format!(
        "\
Provide comprehensive medicine information for: {medicine}

Please provide detailed information in the following format with bullet points and bold headings:

**BASIC INFORMATION:**
• Brand Name: [name]
• Generic Name: [generic]
• Chemical Formula: [formula]
• Molecular Weight: [weight]
• Active Ingredient: [ingredient]
• Strength: [strength]

**MECHANISM OF ACTION:**
• [Detailed explanation of how the medicine works]

**DOSAGE GUIDELINES:**
• Adults: [dosage]
• Children: [dosage]
• Elderly: [dosage]
• Maximum Daily: [max dose]
• Frequency: [frequency]

**FOOD INTERACTIONS:**
• Take with food: [Yes/No]
• Timing: [timing instructions]
• Restrictions: [list restrictions]
• Recommendations: [list recommendations]

**CONTRAINDICATIONS:**
• Medical Conditions: [list conditions]
• Drug Interactions: [list medications]
• Allergies: [list allergies]
• Warnings: [list warnings]

**SIDE EFFECTS:**
• Common: [list common side effects]
• Serious: [list serious side effects]
• Rare: [list rare side effects]

**ALTERNATIVES:**
• Generic: [list generic alternatives]
• Branded: [list branded alternatives]
• Natural: [list natural alternatives]

**STORAGE:**
• Temperature: [storage temperature]
• Conditions: [storage conditions]
• Expiry: [expiry information]

**CONSULTATION NEEDED:**
• Pharmacist: [when to consult pharmacist]
• Doctor: [when to consult doctor]
• Emergency: [emergency situations]

Please provide accurate, detailed medical information with proper formatting.
",
        medicine = medicine.trim()
    )
}

/// Schema for the medicine sheet. The brand name falls back to the name
/// the user searched for.
pub fn schema(medicine: &str) -> Result<Schema, SchemaError> {
    let mut fields = in_section(
        "BASIC INFORMATION",
        vec![
            F::value("Brand Name", medicine.trim()).keyed("name"),
            F::value("Generic Name", "Not specified").keyed("generic_name"),
            F::value("Chemical Formula", "Not specified").keyed("chemical_formula"),
            F::value("Molecular Weight", "Not specified").keyed("molecular_weight"),
            F::value("Active Ingredient", "Not specified").keyed("active_ingredient"),
            F::value("Strength", "Not specified").keyed("strength"),
        ],
    );

    fields.push(
        F::section(
            "MECHANISM OF ACTION",
            "Please consult healthcare provider for detailed mechanism information.",
        )
        .keyed("mechanism_of_action"),
    );

    fields.extend(in_section(
        "DOSAGE GUIDELINES",
        vec![
            F::value("Adults", "Follow doctor's prescription").keyed("dosage_adults"),
            F::value("Children", "Consult pediatrician").keyed("dosage_children"),
            F::value("Elderly", "May require dose adjustment").keyed("dosage_elderly"),
            F::value("Maximum Daily", "As prescribed").keyed("dosage_max_daily"),
            F::value("Frequency", "As directed").keyed("dosage_frequency"),
        ],
    ));

    fields.extend(in_section(
        "FOOD INTERACTIONS",
        vec![
            F::value("Take with food", "Check medication label").keyed("food_with_food"),
            F::value("Timing", "Follow label instructions").keyed("food_timing"),
            F::list("Restrictions", &["Consult healthcare provider"]).keyed("food_restrictions"),
            F::list("Recommendations", &["Follow prescribed guidelines"])
                .keyed("food_recommendations"),
        ],
    ));

    fields.extend(in_section(
        "CONTRAINDICATIONS",
        vec![
            F::list("Medical Conditions", &["Inform doctor of all conditions"])
                .keyed("contraindicated_conditions"),
            F::list("Drug Interactions", &["Inform doctor of all medications"])
                .keyed("drug_interactions"),
            F::list("Allergies", &["Check for drug allergies"]).keyed("allergies"),
            F::list("Warnings", &["Follow safety guidelines"]).keyed("warnings"),
        ],
    ));

    fields.extend(in_section(
        "SIDE EFFECTS",
        vec![
            F::list("Common", &["Varies by individual"]).keyed("side_effects_common"),
            F::list("Serious", &["Contact healthcare provider"]).keyed("side_effects_serious"),
            F::list("Rare", &["Report unusual symptoms"]).keyed("side_effects_rare"),
        ],
    ));

    fields.extend(in_section(
        "ALTERNATIVES",
        vec![
            F::list("Generic", &["Consult pharmacist"]).keyed("alternatives_generic"),
            F::list("Branded", &["Ask about alternatives"]).keyed("alternatives_branded"),
            F::list("Natural", &["Discuss with doctor"]).keyed("alternatives_natural"),
        ],
    ));

    fields.extend(in_section(
        "STORAGE",
        vec![
            F::value("Temperature", "Room temperature").keyed("storage_temperature"),
            F::list("Conditions", &["Keep in original container"]).keyed("storage_conditions"),
            F::value("Expiry", "Check expiration date").keyed("storage_expiry"),
        ],
    ));

    fields.extend(in_section(
        "CONSULTATION NEEDED",
        vec![
            F::list("Pharmacist", &["Drug interactions", "Proper dosing"])
                .keyed("consult_pharmacist"),
            F::list("Doctor", &["Treatment monitoring", "Dose adjustments"])
                .keyed("consult_doctor"),
            F::list("Emergency", &["Severe reactions", "Overdose symptoms"])
                .keyed("consult_emergency"),
        ],
    ));

    Schema::new(fields)
}
