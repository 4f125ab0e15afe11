use crate::domain::model::{CategoryDraft, Destination, Notification, ProductDraft, ShopDraft};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Replaces the currently displayed notification.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Performs a route change.
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: &Destination);
}

/// Busy indicator owned by the presentation layer.
pub trait BusyFlag: Send + Sync {
    fn set_busy(&self, busy: bool);
}

impl BusyFlag for AtomicBool {
    fn set_busy(&self, busy: bool) {
        self.store(busy, Ordering::SeqCst);
    }
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

impl<T: Navigator + ?Sized> Navigator for &T {
    fn navigate(&self, destination: &Destination) {
        (**self).navigate(destination)
    }
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

impl<T: Navigator + ?Sized> Navigator for Arc<T> {
    fn navigate(&self, destination: &Destination) {
        (**self).navigate(destination)
    }
}

impl<T: BusyFlag + ?Sized> BusyFlag for Arc<T> {
    fn set_busy(&self, busy: bool) {
        (**self).set_busy(busy)
    }
}

/// Remote data service for the three aggregates.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    async fn create_shop(&self, shop: &ShopDraft) -> Result<()>;
    async fn update_shop(&self, shop: &ShopDraft) -> Result<()>;
    async fn delete_shop(&self, id: i64) -> Result<()>;

    async fn create_product(&self, product: &ProductDraft) -> Result<()>;
    async fn update_product(&self, product: &ProductDraft) -> Result<()>;
    async fn delete_product(&self, id: i64) -> Result<()>;

    async fn create_category(&self, category: &CategoryDraft) -> Result<()>;
    async fn update_category(&self, category: &CategoryDraft) -> Result<()>;
    async fn delete_category(&self, id: i64) -> Result<()>;
}
