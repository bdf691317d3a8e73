//! Prompt templates and the patient-context turn.
//!
//! Optional fields follow one rule everywhere: an empty location or a size
//! that is not a positive number is "unspecified" and its phrase is left
//! out entirely.

use crate::Message;

/// Instruction turn sent at the head of every request.
pub const SYSTEM_INSTRUCTION: &str = "You are a medical expert specializing in brain tumors. \
Provide clear, accurate, and specific information about brain tumors. \
Always base your responses on current medical research and guidelines. \
If you're unsure about something, acknowledge the limitations of your knowledge.";

/// Structured hint about the patient's tumor, injected as a system turn.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientContext {
    pub tumor_type: String,
    pub location: Option<String>,
    /// Size as reported by the caller; no unit is assumed.
    pub size: Option<f64>,
}

impl PatientContext {
    pub fn new(tumor_type: impl Into<String>) -> Self {
        Self {
            tumor_type: tumor_type.into(),
            location: None,
            size: None,
        }
    }

    /// Build from raw caller input where `""` and `0` mean "unspecified".
    pub fn from_parts(tumor_type: impl Into<String>, location: &str, size: f64) -> Self {
        Self::new(tumor_type).with_location(location).with_size(size)
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        let location = location.into();
        self.location = (!location.trim().is_empty()).then_some(location);
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = is_specified_size(size).then_some(size);
        self
    }

    /// Natural-language description used as the context turn.
    pub fn describe(&self) -> String {
        format!(
            "Patient Context: The patient has a {} tumor{}{}",
            self.tumor_type,
            location_phrase(self.location.as_deref()),
            size_phrase(self.size),
        )
    }

    pub fn to_message(&self) -> Message {
        Message::system(self.describe())
    }
}

fn is_specified_size(size: f64) -> bool {
    size.is_finite() && size > 0.0
}

fn location_phrase(location: Option<&str>) -> String {
    match location {
        Some(loc) if !loc.trim().is_empty() => format!(" in the {loc} region"),
        _ => String::new(),
    }
}

fn size_phrase(size: Option<f64>) -> String {
    match size {
        Some(size) if is_specified_size(size) => format!(" of size {size}"),
        _ => String::new(),
    }
}

/// Comprehensive overview of one tumor type.
pub fn tumor_info_prompt(tumor_type: &str, location: &str, size: f64) -> String {
    format!(
        "Please provide detailed information about {tumor_type} brain tumors{}{}. Include:\n\
         1. Detailed description and characteristics\n\
         2. Common symptoms and warning signs\n\
         3. Treatment options and approaches\n\
         4. Prognosis and survival rates\n\
         5. Risk factors and prevention\n\
         Keep the response medically accurate and cite sources where possible.",
        location_phrase(Some(location)),
        size_phrase(Some(size)),
    )
}

pub fn treatment_prompt(tumor_type: &str) -> String {
    format!(
        "As a medical expert, provide detailed treatment options for {tumor_type} brain tumors.\n\
         Include:\n\
         1. Surgical options and techniques\n\
         2. Radiation therapy approaches\n\
         3. Chemotherapy protocols\n\
         4. Targeted therapies\n\
         5. Clinical trials\n\
         6. Rehabilitation and follow-up care\n\
         Base your response on current medical research and guidelines."
    )
}

pub fn symptoms_prompt(tumor_type: &str, location: &str) -> String {
    format!(
        "As a medical expert, describe the symptoms of {tumor_type} brain tumors{}:\n\
         1. Common symptoms\n\
         2. Location-specific symptoms\n\
         3. Early warning signs\n\
         4. Progressive symptoms\n\
         5. Emergency symptoms\n\
         Include both general and specific symptoms based on current medical literature.",
        location_phrase(Some(location)),
    )
}

pub fn visualization_prompt(tumor_type: &str) -> String {
    format!(
        "Provide visualization data for {tumor_type} tumors: typical size ranges, \
         common locations in the brain, age distribution at diagnosis, and \
         survival rates by grade. Present each as a short labelled list of values."
    )
}
