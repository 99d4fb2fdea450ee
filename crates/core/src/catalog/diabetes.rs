//! Diabetes care plan: pipe-delimited tables plus an emergency and
//! follow-up plan.

use serde::Deserialize;

use crate::error::SchemaError;
use crate::schema::{FieldDescriptor as F, Schema};
use crate::table::{Column, TableSpec};

/// Patient details the plan prompt is built from. Every field is optional
/// except the name and diabetes type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiabetesProfile {
    pub full_name: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub diabetes_type: String,
    pub hba1c: Option<f64>,
    pub fasting_sugar: Option<f64>,
    pub post_meal_sugar: Option<f64>,
    pub current_medications: Option<String>,
    pub allergies: Vec<String>,
    pub activity_level: Option<String>,
    pub diet_preferences: Option<String>,
    pub symptoms: Vec<String>,
}

impl DiabetesProfile {
    /// Body mass index, when both height and weight are known.
    pub fn bmi(&self) -> Option<f64> {
        let height_m = self.height_cm? / 100.0;
        let weight = self.weight_kg?;
        (height_m > 0.0).then(|| weight / (height_m * height_m))
    }
}

/// WHO adult BMI category.
pub fn bmi_category(bmi: f64) -> &'static str {
    match bmi {
        b if b < 18.5 => "Underweight",
        b if b < 25.0 => "Normal weight",
        b if b < 30.0 => "Overweight",
        _ => "Obese",
    }
}

fn or_unspecified<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "Not specified".to_string())
}

fn join_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

pub fn prompt(profile: &DiabetesProfile) -> String {
    let bmi = profile
        .bmi()
        .map(|bmi| format!("{bmi:.1} ({})", bmi_category(bmi)))
        .unwrap_or_else(|| "Not calculated".to_string());

    format!(
        "\
You are a diabetes specialist. Provide a comprehensive diabetes assessment in EXACTLY the format specified below.

PATIENT PROFILE:
Name: {name}
Age: {age} | Gender: {gender}
BMI: {bmi}
Diabetes Type: {diabetes_type}
HbA1c Level: {hba1c}%
Fasting Blood Sugar: {fasting} mg/dL | Post-Meal Blood Sugar: {post_meal} mg/dL
Current Medications: {medications}
Allergies: {allergies}
Activity Level: {activity}
Diet Preferences: {diet}
Frequent Symptoms: {symptoms}

PROVIDE YOUR RESPONSE IN EXACTLY THIS FORMAT:

**SECTION 1: DIABETES MEDICATIONS**
MED-1: [Medicine Name] | [Exact Dosage] | [Frequency] | [Timing] | [Duration] | [Category] | [Price in ₹]

**SECTION 2: DIABETES VITAL MONITORING**
VITAL-1: [Vital Sign] | [Frequency] | [Timing] | [Target Range] | [Importance] | [Notes]

**SECTION 3: DIABETES LABORATORY TESTS**
LAB-1: [Test Name] | [Priority] | [Reason] | [Preparation] | [Cost in ₹] | [Normal Range]

**SECTION 4: DIABETIC DIET PLAN**
MEAL-1: [Meal Name] | [Time] | [Food Items] | [Calories] | [Water] | [Nutrients] | [Notes]

**SECTION 5: DIABETES SUPPLEMENTS**
SUPP-1: [Supplement Name] | [Dosage] | [Timing] | [Benefits] | [Brand] | [Price in ₹] | [Warnings]

**SECTION 6: AYURVEDIC DIABETES TREATMENT**
AYUR-1: [Treatment Name] | [Herbs] | [Preparation] | [Dosage] | [Timing] | [Benefits] | [Duration]

**SECTION 7: DIABETES EMERGENCY PLAN**
WARNING-SIGNS: [Sign 1] | [Sign 2] | [Sign 3] | [Sign 4] | [Sign 5]
SEEK-HELP: [When 1] | [When 2] | [When 3] | [When 4] | [When 5]
EMERGENCY-CONTACTS: Emergency: 108 | Ambulance: 102 | Diabetes Helpline: [number]
FIRST-AID: [Step 1] | [Step 2] | [Step 3] | [Step 4] | [Step 5]

**SECTION 8: DIABETES FOLLOW-UP PLAN**
NEXT-APPOINTMENT: [Timeline and recommendations]
MONITORING-SCHEDULE: [Schedule 1] | [Schedule 2] | [Schedule 3] | [Schedule 4]
LIFESTYLE-CHANGES: [Change 1] | [Change 2] | [Change 3] | [Change 4]
EXPECTED-IMPROVEMENT: [Timeline and expectations]

Give five rows per table (three for the ayurvedic treatment), use the pipe (|) separators exactly, \
and consider the diabetes type, HbA1c level, allergies and current medications.
",
        name = profile.full_name.trim(),
        age = or_unspecified(&profile.age),
        gender = or_unspecified(&profile.gender),
        diabetes_type = profile.diabetes_type.trim(),
        hba1c = or_unspecified(&profile.hba1c),
        fasting = or_unspecified(&profile.fasting_sugar),
        post_meal = or_unspecified(&profile.post_meal_sugar),
        medications = or_unspecified(&profile.current_medications),
        allergies = join_or(&profile.allergies, "None"),
        activity = or_unspecified(&profile.activity_level),
        diet = or_unspecified(&profile.diet_preferences),
        symptoms = join_or(&profile.symptoms, "None reported"),
    )
}

/// Emergency and follow-up plan fields.
pub fn schema() -> Result<Schema, SchemaError> {
    Schema::new(vec![
        F::pipe_list(
            "WARNING-SIGNS",
            &[
                "Blood sugar below 70 mg/dL (hypoglycemia)",
                "Blood sugar above 300 mg/dL (hyperglycemia)",
                "Ketones in urine with nausea/vomiting",
                "Severe dehydration or confusion",
                "Chest pain or difficulty breathing",
            ],
        )
        .keyed("warning_signs"),
        F::pipe_list(
            "SEEK-HELP",
            &[
                "Blood sugar remains high despite medication",
                "Frequent hypoglycemic episodes",
                "Signs of diabetic ketoacidosis",
                "Foot wounds that won't heal",
                "Sudden vision changes or eye problems",
            ],
        )
        .keyed("when_to_seek_help"),
        F::pipe_list(
            "EMERGENCY-CONTACTS",
            &["Emergency Services: 108", "Ambulance: 102"],
        )
        .keyed("emergency_contacts"),
        F::pipe_list(
            "FIRST-AID",
            &[
                "For low blood sugar: Give 15g fast-acting carbs",
                "Check blood sugar every 15 minutes",
                "For high blood sugar: Ensure hydration",
                "Never give insulin without medical guidance",
                "Call emergency services if unconscious",
            ],
        )
        .keyed("first_aid_steps"),
        F::token(
            "NEXT-APPOINTMENT",
            "Schedule follow-up with endocrinologist within 3 months or as recommended by healthcare provider",
        )
        .keyed("next_appointment"),
        F::pipe_list(
            "MONITORING-SCHEDULE",
            &[
                "Daily blood sugar monitoring (fasting & post-meal)",
                "Weekly weight and blood pressure check",
                "Monthly HbA1c tracking",
                "Quarterly comprehensive diabetes review",
            ],
        )
        .keyed("monitoring_schedule"),
        F::pipe_list(
            "LIFESTYLE-CHANGES",
            &[
                "Follow diabetic diet plan consistently",
                "Exercise 150 minutes per week minimum",
                "Take medications at prescribed times",
                "Monitor blood sugar as recommended",
            ],
        )
        .keyed("lifestyle_changes"),
        F::token(
            "EXPECTED-IMPROVEMENT",
            "With proper diabetes management, expect gradual improvement in blood sugar control over 3-6 months",
        )
        .keyed("expected_improvement"),
    ])
}

fn table(
    name: &str,
    section: &str,
    prefix: &str,
    row_label: &str,
    min_rows: usize,
    columns: &[(&str, &str)],
) -> TableSpec {
    TableSpec {
        name: name.to_string(),
        section: section.to_string(),
        prefix: prefix.to_string(),
        columns: columns
            .iter()
            .map(|(column, fallback)| Column::new(column, fallback))
            .collect(),
        row_label: row_label.to_string(),
        min_rows,
        max_rows: 8,
    }
}

/// The six plan tables, in the order the prompt asks for them.
pub fn tables() -> Vec<TableSpec> {
    vec![
        table(
            "medications",
            "DIABETES MEDICATIONS",
            "MED-",
            "Diabetes Medicine",
            5,
            &[
                ("name", "Diabetes medication"),
                ("dosage", "As prescribed"),
                ("frequency", "As directed"),
                ("timing", "As instructed"),
                ("duration", "As recommended"),
                ("category", "Diabetes medication"),
                ("price", "₹50-500"),
            ],
        ),
        table(
            "vital_monitoring",
            "DIABETES VITAL MONITORING",
            "VITAL-",
            "Blood Sugar Check",
            5,
            &[
                ("vital", "Blood sugar monitoring"),
                ("frequency", "Daily"),
                ("timing", "Morning/Evening"),
                ("target_range", "80-130 mg/dL fasting"),
                ("importance", "High"),
                ("notes", "Monitor regularly"),
            ],
        ),
        table(
            "lab_tests",
            "DIABETES LABORATORY TESTS",
            "LAB-",
            "Diabetes Test",
            5,
            &[
                ("test", "Diabetes laboratory test"),
                ("priority", "High"),
                ("reason", "Diabetes monitoring"),
                ("preparation", "Fasting required"),
                ("cost", "₹200-800"),
                ("normal_range", "Reference range varies"),
            ],
        ),
        table(
            "diet_plan",
            "DIABETIC DIET PLAN",
            "MEAL-",
            "Diabetic Meal",
            5,
            &[
                ("meal", "Diabetic meal"),
                ("time", "Regular timing"),
                ("items", "Low GI diabetic foods"),
                ("calories", "300"),
                ("water", "200ml"),
                ("nutrients", "Balanced diabetic nutrients"),
                ("notes", "Monitor blood sugar after meals"),
            ],
        ),
        table(
            "supplements",
            "DIABETES SUPPLEMENTS",
            "SUPP-",
            "Diabetes Supplement",
            4,
            &[
                ("name", "Diabetes supplement"),
                ("dosage", "As recommended"),
                ("timing", "As directed"),
                ("benefits", "Diabetes support"),
                ("brand", "Consult pharmacist"),
                ("price", "₹200-800"),
                ("warnings", "Monitor blood sugar levels"),
            ],
        ),
        table(
            "ayurvedic_treatment",
            "AYURVEDIC DIABETES TREATMENT",
            "AYUR-",
            "Ayurvedic Treatment",
            3,
            &[
                ("treatment", "Ayurvedic diabetes treatment"),
                ("herbs", "Natural diabetes herbs"),
                ("preparation", "Traditional methods"),
                ("dosage", "As recommended"),
                ("timing", "Regular intervals"),
                ("benefits", "Natural diabetes management"),
                ("duration", "4-8 weeks"),
            ],
        ),
    ]
}
