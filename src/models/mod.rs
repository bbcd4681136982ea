pub mod interaction;
pub mod item;
pub mod metrics;
pub mod pipeline;
pub mod recommendation;
pub mod user;

pub use interaction::{Interaction, InteractionType, InteractionUpdate};
pub use item::{Item, ItemUpdate};
pub use metrics::SystemMetrics;
pub use pipeline::{PipelineStage, StageStatus};
pub use recommendation::{Recommendation, RecommendationUpdate};
pub use user::{User, UserUpdate};
