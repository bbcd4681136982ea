use std::fmt::Display;

/// Fixed id of the singleton system metrics document
pub const METRICS_DOC_ID: &str = "current";

/// Named collections in the document store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Users,
    Items,
    Interactions,
    Recommendations,
    SystemMetrics,
    PipelineStages,
    Algorithms,
    UserPreferences,
}

impl Collection {
    pub const ALL: [Collection; 8] = [
        Collection::Users,
        Collection::Items,
        Collection::Interactions,
        Collection::Recommendations,
        Collection::SystemMetrics,
        Collection::PipelineStages,
        Collection::Algorithms,
        Collection::UserPreferences,
    ];

    /// Store key of the collection
    pub const fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Items => "items",
            Collection::Interactions => "interactions",
            Collection::Recommendations => "recommendations",
            Collection::SystemMetrics => "system_metrics",
            Collection::PipelineStages => "pipeline_stages",
            Collection::Algorithms => "algorithms",
            Collection::UserPreferences => "user_preferences",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
