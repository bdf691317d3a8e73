use serde::{Deserialize, Serialize};

/// Reference pages fetched before every exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferencesConfig {
    pub sources: Vec<String>,
    /// Per-source fetch timeout.
    pub fetch_timeout_secs: u64,
}

impl Default for ReferencesConfig {
    fn default() -> Self {
        Self {
            sources: vec![
                "https://www.cancer.gov/types/brain".into(),
                "https://www.mayoclinic.org/diseases-conditions/brain-tumor/symptoms-causes/"
                    .into(),
                "https://www.cancer.org/cancer/brain-spinal-cord-tumors-adults/".into(),
                "https://www.hopkinsmedicine.org/health/conditions-and-diseases/brain-tumor"
                    .into(),
                "https://www.aans.org/en/Patients/Neurosurgical-Conditions-and-Treatments/Brain-Tumors"
                    .into(),
            ],
            fetch_timeout_secs: 10,
        }
    }
}
