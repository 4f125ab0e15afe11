pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::AdminConfig;

pub use adapters::{console::LogNavigator, http::HttpCatalogGateway};
pub use crate::core::editor::ShopEditor;
pub use crate::core::mutation::{run_mutation, MutationIntent, MutationOutcome, MutationPipeline};
pub use crate::core::notifications::NotificationCenter;
pub use crate::core::schedule::{has_conflict, validate_schedule, ScheduleReport};
pub use domain::model::{
    AggregateKind, CategoryDraft, Destination, MutationKind, Notification, OpeningSchedule,
    OpeningWindow, ProductDraft, Severity, ShopDraft, WindowEdit,
};
pub use utils::error::{AdminError, Result};
