pub mod editor;
pub mod mutation;
pub mod notifications;
pub mod schedule;

pub use crate::domain::model::{Destination, Notification, OpeningSchedule, OpeningWindow};
pub use crate::domain::ports::{BusyFlag, CatalogGateway, Navigator, Notifier};
pub use crate::utils::error::Result;
