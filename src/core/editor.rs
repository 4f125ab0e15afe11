use crate::core::mutation::{MutationIntent, MutationOutcome, MutationPipeline};
use crate::domain::model::{
    AggregateKind, MutationKind, Notification, OpeningWindow, ShopDraft, WindowEdit,
};
use crate::domain::ports::{BusyFlag, CatalogGateway, Navigator, Notifier};
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::Validate;

/// In-memory editing session for one shop and its opening hours.
///
/// Every edit is validated before it is committed. A rejected edit leaves the
/// draft untouched and raises a validation notification.
pub struct ShopEditor<N: Notifier> {
    draft: ShopDraft,
    notifier: N,
}

impl<N: Notifier> ShopEditor<N> {
    pub fn new_shop(notifier: N) -> Self {
        Self::edit(ShopDraft::default(), notifier)
    }

    pub fn edit(draft: ShopDraft, notifier: N) -> Self {
        Self { draft, notifier }
    }

    pub fn draft(&self) -> &ShopDraft {
        &self.draft
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_in_vacations(&mut self, in_vacations: bool) {
        self.draft.in_vacations = in_vacations;
    }

    /// Appends the default window (Monday 09:00 to 18:00) and returns its
    /// position. Overlaps it may create are caught on the next edit or on
    /// submit.
    pub fn add_window(&mut self) -> usize {
        self.draft.opening_hours.push(OpeningWindow::default());
        self.draft.opening_hours.len() - 1
    }

    pub fn remove_window(&mut self, index: usize) -> Result<OpeningWindow> {
        self.draft
            .opening_hours
            .remove(index)
            .map_err(|err| self.reject(err))
    }

    pub fn edit_window(&mut self, index: usize, edit: WindowEdit) -> Result<()> {
        match self.draft.opening_hours.apply_edit(index, edit) {
            Ok(()) => Ok(()),
            Err(err) => Err(self.reject(err)),
        }
    }

    fn reject(&self, err: AdminError) -> AdminError {
        tracing::warn!(error = %err, "shop edit rejected");
        self.notifier.notify(Notification::from_validation(&err));
        err
    }

    /// Validates the whole draft, then creates or updates it through the
    /// pipeline. Validation failures are surfaced here and never reach the
    /// pipeline.
    pub async fn submit<P, R, G>(
        &self,
        pipeline: &MutationPipeline<P, R>,
        gateway: &G,
        busy: Option<&dyn BusyFlag>,
    ) -> Result<MutationOutcome>
    where
        P: Notifier,
        R: Navigator,
        G: CatalogGateway + ?Sized,
    {
        if let Err(err) = self.draft.validate() {
            return Err(self.reject(err));
        }

        let outcome = match self.draft.id {
            None => {
                let mut intent = MutationIntent::new("Shop created successfully", "/")
                    .labelled(AggregateKind::Shop, MutationKind::Create);
                intent.busy = busy;
                pipeline.run(gateway.create_shop(&self.draft), intent).await
            }
            Some(id) => {
                let mut intent =
                    MutationIntent::new("Shop updated successfully", format!("/shop/{}", id))
                        .labelled(AggregateKind::Shop, MutationKind::Update);
                intent.busy = busy;
                pipeline.run(gateway.update_shop(&self.draft), intent).await
            }
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notifications::NotificationCenter;
    use crate::domain::model::{Destination, Severity};
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn add_then_edit_window() {
        let mut editor = ShopEditor::new_shop(NotificationCenter::default());
        let first = editor.add_window();
        editor.edit_window(first, WindowEdit::ClosesAt(t(12, 0))).unwrap();

        let second = editor.add_window();
        editor.edit_window(second, WindowEdit::OpensAt(t(12, 0))).unwrap();

        let windows = editor.draft().opening_hours.windows();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].closes_at, t(12, 0));
        assert_eq!(windows[1].opens_at, t(12, 0));
    }

    #[test]
    fn rejected_edit_notifies_and_keeps_draft() {
        let center = NotificationCenter::default();
        let mut editor = ShopEditor::new_shop(center.clone());
        editor.add_window();
        let before = editor.draft().clone();

        let err = editor
            .edit_window(0, WindowEdit::ClosesAt(t(9, 0)))
            .unwrap_err();
        assert!(matches!(err, AdminError::MalformedWindow { .. }));
        assert_eq!(editor.draft(), &before);

        let shown = center.current();
        assert_eq!(shown.severity, Severity::Error);
        assert_eq!(shown.message, "Closing time must be after opening time");
    }

    #[test]
    fn removing_missing_window_is_reported() {
        let center = NotificationCenter::default();
        let mut editor = ShopEditor::new_shop(center.clone());
        assert!(editor.remove_window(2).is_err());
        assert!(center.current().visible);
    }

    #[test]
    fn submit_blocks_conflicting_schedule_before_pipeline() {
        struct NeverCalled;

        #[async_trait::async_trait]
        impl CatalogGateway for NeverCalled {
            async fn create_shop(&self, _: &ShopDraft) -> Result<()> {
                panic!("gateway must not be reached")
            }
            async fn update_shop(&self, _: &ShopDraft) -> Result<()> {
                panic!("gateway must not be reached")
            }
            async fn delete_shop(&self, _: i64) -> Result<()> {
                unreachable!()
            }
            async fn create_product(&self, _: &crate::domain::model::ProductDraft) -> Result<()> {
                unreachable!()
            }
            async fn update_product(&self, _: &crate::domain::model::ProductDraft) -> Result<()> {
                unreachable!()
            }
            async fn delete_product(&self, _: i64) -> Result<()> {
                unreachable!()
            }
            async fn create_category(&self, _: &crate::domain::model::CategoryDraft) -> Result<()> {
                unreachable!()
            }
            async fn update_category(&self, _: &crate::domain::model::CategoryDraft) -> Result<()> {
                unreachable!()
            }
            async fn delete_category(&self, _: i64) -> Result<()> {
                unreachable!()
            }
        }

        struct NoNav;
        impl Navigator for NoNav {
            fn navigate(&self, destination: &Destination) {
                panic!("unexpected navigation to {}", destination)
            }
        }

        let center = NotificationCenter::default();
        let mut editor = ShopEditor::new_shop(center.clone());
        editor.set_name("Fromagerie");
        editor.add_window();
        editor.add_window();

        let pipeline = MutationPipeline::new(center.clone(), NoNav);
        let result = tokio_test::block_on(editor.submit(&pipeline, &NeverCalled, None));

        assert!(matches!(result, Err(AdminError::ScheduleConflict { day: 1, .. })));
        assert_eq!(
            center.current().message,
            "Opening hours overlap on the same day"
        );
    }
}
