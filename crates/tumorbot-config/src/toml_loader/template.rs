//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# tumorbot configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.
# The API key is read from the environment, never from this file.

[provider]
# model = "command-r-plus"
# max_tokens = 1000            # 1-4096
# temperature = 0.3            # 0.0-1.0
# api_base = "https://api.cohere.com/v2/chat"
# api_key_env = "COHERE_API_KEY"
# request_timeout_secs = 120   # unset = no timeout on the chat call

[references]
# fetch_timeout_secs = 10      # 1-120
# sources = [
#   "https://www.cancer.gov/types/brain",
#   "https://www.mayoclinic.org/diseases-conditions/brain-tumor/symptoms-causes/",
#   "https://www.cancer.org/cancer/brain-spinal-cord-tumors-adults/",
#   "https://www.hopkinsmedicine.org/health/conditions-and-diseases/brain-tumor",
#   "https://www.aans.org/en/Patients/Neurosurgical-Conditions-and-Treatments/Brain-Tumors",
# ]

[session]
# history_limit = 10           # 2-200
# idle_ttl_secs = 1800         # 60-86400

[logging]
# level = "info"               # trace, debug, info, warn, error
"##
    .to_string()
}
