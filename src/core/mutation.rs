//! The one orchestration every create, update and delete goes through.
//!
//! Per invocation: Idle -> Busy -> (Succeeded | Failed) -> Idle. The busy flag
//! is raised before the action is first polled and lowered as the very last
//! step on both paths. Lowering is tied to a drop guard, so a pipeline future
//! dropped before settlement still leaves the flag cleared.

use std::future::Future;

use crate::domain::model::{AggregateKind, Destination, MutationKind, Notification};
use crate::domain::ports::{BusyFlag, Navigator, Notifier};
use crate::utils::error::{AdminError, Result};

pub const DEFAULT_FALLBACK_ERROR: &str = "An error occurred during the operation";

/// Per-submit parameters: what to say and where to go on success.
pub struct MutationIntent<'a> {
    pub success_message: String,
    pub destination: Destination,
    pub busy: Option<&'a dyn BusyFlag>,
    pub aggregate: Option<AggregateKind>,
    pub kind: Option<MutationKind>,
}

impl<'a> MutationIntent<'a> {
    pub fn new(success_message: impl Into<String>, destination: impl Into<Destination>) -> Self {
        Self {
            success_message: success_message.into(),
            destination: destination.into(),
            busy: None,
            aggregate: None,
            kind: None,
        }
    }

    pub fn with_busy(mut self, busy: &'a dyn BusyFlag) -> Self {
        self.busy = Some(busy);
        self
    }

    pub fn labelled(mut self, aggregate: AggregateKind, kind: MutationKind) -> Self {
        self.aggregate = Some(aggregate);
        self.kind = Some(kind);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Succeeded,
    Failed { message: String },
}

impl MutationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, MutationOutcome::Succeeded)
    }

    /// Turns a failed outcome into an error carrying the message that was
    /// already shown to the user.
    pub fn into_result(self) -> Result<()> {
        match self {
            MutationOutcome::Succeeded => Ok(()),
            MutationOutcome::Failed { message } => Err(AdminError::MutationFailed { message }),
        }
    }
}

struct BusyGuard<'a> {
    flag: Option<&'a dyn BusyFlag>,
}

impl<'a> BusyGuard<'a> {
    fn engage(flag: Option<&'a dyn BusyFlag>) -> Self {
        if let Some(flag) = flag {
            flag.set_busy(true);
        }
        Self { flag }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if let Some(flag) = self.flag.take() {
            flag.set_busy(false);
        }
    }
}

/// Reusable pipeline bound to one notifier and one navigator.
pub struct MutationPipeline<N: Notifier, R: Navigator> {
    notifier: N,
    navigator: R,
    fallback_error_message: String,
}

impl<N: Notifier, R: Navigator> MutationPipeline<N, R> {
    pub fn new(notifier: N, navigator: R) -> Self {
        Self {
            notifier,
            navigator,
            fallback_error_message: DEFAULT_FALLBACK_ERROR.to_string(),
        }
    }

    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_error_message = message.into();
        self
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn navigator(&self) -> &R {
        &self.navigator
    }

    pub async fn run<T, F>(&self, action: F, intent: MutationIntent<'_>) -> MutationOutcome
    where
        F: Future<Output = Result<T>>,
    {
        execute(
            action,
            &intent,
            &self.notifier,
            &self.navigator,
            &self.fallback_error_message,
        )
        .await
    }
}

/// Free-standing form of [`MutationPipeline::run`] with the generic fallback
/// error message.
pub async fn run_mutation<T, F>(
    action: F,
    success_message: &str,
    destination: &Destination,
    notifier: &dyn Notifier,
    navigator: &dyn Navigator,
    busy: Option<&dyn BusyFlag>,
) -> MutationOutcome
where
    F: Future<Output = Result<T>>,
{
    let intent = MutationIntent {
        success_message: success_message.to_string(),
        destination: destination.clone(),
        busy,
        aggregate: None,
        kind: None,
    };
    execute(action, &intent, notifier, navigator, DEFAULT_FALLBACK_ERROR).await
}

async fn execute<T, F>(
    action: F,
    intent: &MutationIntent<'_>,
    notifier: &(impl Notifier + ?Sized),
    navigator: &(impl Navigator + ?Sized),
    fallback_error_message: &str,
) -> MutationOutcome
where
    F: Future<Output = Result<T>>,
{
    let aggregate = intent.aggregate.map(|a| a.as_str()).unwrap_or("-");
    let kind = intent.kind.map(|k| k.as_str()).unwrap_or("-");

    let busy = BusyGuard::engage(intent.busy);
    tracing::debug!(aggregate, kind, "mutation dispatched");

    let outcome = match action.await {
        Ok(_) => {
            navigator.navigate(&intent.destination);
            notifier.notify(Notification::success(intent.success_message.clone()));
            tracing::info!(
                aggregate,
                kind,
                destination = %intent.destination,
                "mutation succeeded"
            );
            MutationOutcome::Succeeded
        }
        Err(err) => {
            let message = err
                .server_message()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(fallback_error_message)
                .to_string();
            tracing::error!(aggregate, kind, error = %err, "mutation failed");
            notifier.notify(Notification::error(message.clone()));
            MutationOutcome::Failed { message }
        }
    };

    drop(busy);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Severity;
    use crate::utils::error::AdminError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl Notifier for Recorder {
        fn notify(&self, n: Notification) {
            self.events
                .lock()
                .unwrap()
                .push(format!("notify:{:?}:{}", n.severity, n.message));
        }
    }

    impl Navigator for Recorder {
        fn navigate(&self, destination: &Destination) {
            self.events
                .lock()
                .unwrap()
                .push(format!("navigate:{}", destination));
        }
    }

    impl BusyFlag for Recorder {
        fn set_busy(&self, busy: bool) {
            self.events.lock().unwrap().push(format!("busy:{}", busy));
        }
    }

    #[tokio::test]
    async fn success_path_order() {
        let rec = Recorder::default();
        let outcome = run_mutation(
            async { Ok::<_, AdminError>(()) },
            "Saved",
            &Destination::from("/list"),
            &rec,
            &rec,
            Some(&rec as &dyn BusyFlag),
        )
        .await;

        assert_eq!(outcome, MutationOutcome::Succeeded);
        assert_eq!(
            rec.events(),
            vec![
                "busy:true".to_string(),
                "navigate:/list".to_string(),
                format!("notify:{:?}:Saved", Severity::Success),
                "busy:false".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn failure_uses_server_message() {
        let rec = Recorder::default();
        let outcome = run_mutation(
            async {
                Err::<(), _>(AdminError::ActionRejected {
                    status: 400,
                    message: Some("Name already used".to_string()),
                })
            },
            "Saved",
            &Destination::from("/list"),
            &rec,
            &rec,
            Some(&rec as &dyn BusyFlag),
        )
        .await;

        assert_eq!(
            outcome,
            MutationOutcome::Failed {
                message: "Name already used".to_string()
            }
        );
        assert_eq!(
            rec.events(),
            vec![
                "busy:true".to_string(),
                format!("notify:{:?}:Name already used", Severity::Error),
                "busy:false".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn failure_without_message_falls_back() {
        let rec = Recorder::default();
        let pipeline = MutationPipeline::new(&rec, &rec).with_fallback_message("Oops");
        let outcome = pipeline
            .run(
                async {
                    Err::<(), _>(AdminError::ActionRejected {
                        status: 500,
                        message: Some("   ".to_string()),
                    })
                },
                MutationIntent::new("Saved", "/"),
            )
            .await;

        assert_eq!(
            outcome,
            MutationOutcome::Failed {
                message: "Oops".to_string()
            }
        );
        assert!(!rec.events().iter().any(|e| e.starts_with("navigate")));
    }

    #[tokio::test]
    async fn busy_is_true_while_action_runs() {
        let rec = Recorder::default();
        let flag = AtomicBool::new(false);
        let observed = AtomicBool::new(false);

        let pipeline = MutationPipeline::new(&rec, &rec);
        pipeline
            .run(
                async {
                    observed.store(flag.load(Ordering::SeqCst), Ordering::SeqCst);
                    Ok::<_, AdminError>(())
                },
                MutationIntent::new("Deleted", "/").with_busy(&flag),
            )
            .await;

        assert!(observed.load(Ordering::SeqCst));
        assert!(!flag.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn dropped_pipeline_future_clears_busy() {
        let rec = Recorder::default();
        let flag = AtomicBool::new(false);
        let pipeline = MutationPipeline::new(&rec, &rec);

        let pending = pipeline.run(
            std::future::pending::<Result<()>>(),
            MutationIntent::new("never", "/").with_busy(&flag),
        );
        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(20), pending).await;

        assert!(timed_out.is_err());
        assert!(!flag.load(Ordering::SeqCst));
        assert!(rec.events().is_empty());
    }

    #[test]
    fn failed_outcome_becomes_remote_error() {
        assert!(MutationOutcome::Succeeded.into_result().is_ok());

        let err = MutationOutcome::Failed {
            message: "Name already used".to_string(),
        }
        .into_result()
        .unwrap_err();
        assert!(matches!(err, AdminError::MutationFailed { ref message } if message == "Name already used"));
        assert_eq!(err.severity(), crate::utils::error::ErrorSeverity::Medium);
        assert_eq!(err.user_friendly_message(), "Name already used");
    }
}
