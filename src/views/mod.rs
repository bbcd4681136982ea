use serde::{Deserialize, Serialize};

pub mod controls;
pub mod table;
pub mod widgets;

pub use controls::{PageButton, PaginationControls, SearchBox, UserFilter};
pub use table::{Cell, Column, Table, TableRow};
pub use widgets::{MetricCard, PipelineStageView, RecommendationCard, StatBar};

pub const DASHBOARD_TITLE: &str = "Recommendation System Dashboard";

/// The five navigable dashboard views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewName {
    #[default]
    Overview,
    Users,
    Items,
    Interactions,
    Recommendations,
}

impl ViewName {
    pub const ALL: [ViewName; 5] = [
        ViewName::Overview,
        ViewName::Users,
        ViewName::Items,
        ViewName::Interactions,
        ViewName::Recommendations,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ViewName::Overview => "overview",
            ViewName::Users => "users",
            ViewName::Items => "items",
            ViewName::Interactions => "interactions",
            ViewName::Recommendations => "recommendations",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            ViewName::Overview => "Overview",
            ViewName::Users => "Users",
            ViewName::Items => "Items",
            ViewName::Interactions => "Interactions",
            ViewName::Recommendations => "Recommendations",
        }
    }

    /// Path of the view's endpoint
    pub fn path(&self) -> String {
        format!("/api/v1/views/{}", self.as_str())
    }
}

/// Color family of a badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Neutral,
    Info,
    Success,
    Warning,
    Danger,
    Accent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tab {
    pub id: ViewName,
    pub label: &'static str,
    pub path: String,
    pub active: bool,
}

/// Dashboard shell: title and tab bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub title: &'static str,
    pub active: ViewName,
    pub tabs: Vec<Tab>,
}

impl Dashboard {
    pub fn new(active: ViewName) -> Self {
        let tabs = ViewName::ALL
            .iter()
            .map(|view| Tab {
                id: *view,
                label: view.label(),
                path: view.path(),
                active: *view == active,
            })
            .collect();

        Self {
            title: DASHBOARD_TITLE,
            active,
            tabs,
        }
    }
}
