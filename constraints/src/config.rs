/// Where the rules live and how much of them the engine will accept
#[derive(Debug, Clone)]
pub struct ConstraintsConfig {
    /// Rule file, relative to the project root
    pub rules_path: String,

    /// Maximum rule file size in bytes
    /// Real usage: ~2KB, Limit: 5MB
    pub max_rules_file_bytes: usize,
}

pub const DEFAULT_RULES_PATH: &str = "constraints.pro";

impl Default for ConstraintsConfig {
    fn default() -> Self {
        Self {
            rules_path: DEFAULT_RULES_PATH.to_string(),
            max_rules_file_bytes: 5 * 1024 * 1024, // 5 MB
        }
    }
}

impl ConstraintsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules_path(mut self, rules_path: impl Into<String>) -> Self {
        self.rules_path = rules_path.into();
        self
    }
}
