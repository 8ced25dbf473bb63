//! Form submission module.
//!
//! A `SubmitHandler` runs one submission per call:
//! 1. mark the form as loading,
//! 2. stop if any field already carries an error,
//! 3. stop if a field is blank, marking the first blank field as required,
//! 4. await the caller's callback with the form state,
//! 5. hand a callback failure to the error hook,
//! 6. run the completion hook and clear the loading flag.
//!
//! Step 6 runs exactly once for every call that got past step 1, including
//! when the submit future is dropped early or the callback panics. A call made
//! while another one is still in flight is turned away before step 1 and
//! leaves the form alone.

mod error;

pub use error::{ErrorResponse, SubmitError};

use crate::controller::{FormController, Readiness};
use crate::state::{FieldError, FormState};
use log::*;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;

type ErrorHook = Arc<dyn Fn(FieldError) + Send + Sync>;
type CompleteHook = Arc<dyn Fn() + Send + Sync>;

/// Specifying how a submission ended.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The callback ran and succeeded.
    Submitted,
    /// A field already carried an error; nothing was sent.
    Blocked { key: String },
    /// A field was blank and was marked as required; nothing was sent.
    MissingValue { key: String },
    /// The callback failed with this error.
    Failed(FieldError),
    /// Another submission was still running; this call did nothing.
    InFlight,
}

/// Runs the completion hook and clears the loading flag when dropped.
///
struct Completion<'a> {
    controller: &'a FormController,
    on_complete: Option<&'a CompleteHook>,
}

impl Drop for Completion<'_> {
    fn drop(&mut self) {
        if let Some(on_complete) = self.on_complete {
            on_complete();
        }
        self.controller.finish_submission();
    }
}

/// Reusable submit action bound to a form.
///
pub struct SubmitHandler<F> {
    controller: FormController,
    callback: Arc<F>,
    on_error: Option<ErrorHook>,
    on_complete: Option<CompleteHook>,
}

impl<F> Clone for SubmitHandler<F> {
    fn clone(&self) -> Self {
        SubmitHandler {
            controller: self.controller.clone(),
            callback: Arc::clone(&self.callback),
            on_error: self.on_error.clone(),
            on_complete: self.on_complete.clone(),
        }
    }
}

impl<F, Fut> SubmitHandler<F>
where
    F: Fn(FormState) -> Fut,
    Fut: Future<Output = Result<(), SubmitError>>,
{
    pub(crate) fn new(controller: FormController, callback: F) -> Self {
        SubmitHandler {
            controller,
            callback: Arc::new(callback),
            on_error: None,
            on_complete: None,
        }
    }

    /// Set the hook that receives the user-facing error when the callback
    /// fails.
    ///
    pub fn on_error(mut self, hook: impl Fn(FieldError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(hook));
        self
    }

    /// Set the hook that runs at the end of every submission, whatever the
    /// result.
    ///
    pub fn on_complete(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Arc::new(hook));
        self
    }

    /// Run one submission. Never fails; the outcome says how it ended.
    ///
    pub async fn submit(&self) -> SubmitOutcome {
        if !self.controller.begin_submission() {
            debug!("Submission already in flight, ignoring submit request.");
            return SubmitOutcome::InFlight;
        }

        let _completion = Completion {
            controller: &self.controller,
            on_complete: self.on_complete.as_ref(),
        };
        self.run().await
    }

    async fn run(&self) -> SubmitOutcome {
        let form = match self.controller.check_submission() {
            Readiness::Blocked(key) => {
                info!("Submission blocked by invalid field '{}'", key);
                return SubmitOutcome::Blocked { key };
            }
            Readiness::MissingValue(key) => {
                info!("Submission stopped, field '{}' is required", key);
                return SubmitOutcome::MissingValue { key };
            }
            Readiness::Ready(form) => form,
        };

        debug!("Submitting form with {} fields...", form.len());
        match (self.callback)(form).await {
            Ok(()) => {
                debug!("Form submitted.");
                SubmitOutcome::Submitted
            }
            Err(e) => {
                let error = e.to_field_error();
                warn!("Form submission failed: {} ({})", error, e);
                if let Some(on_error) = &self.on_error {
                    on_error(error.clone());
                }
                SubmitOutcome::Failed(error)
            }
        }
    }
}

impl<F, Fut> SubmitHandler<F>
where
    F: Fn(FormState) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), SubmitError>> + Send + 'static,
{
    /// Run one submission as a tokio task.
    ///
    pub fn spawn(&self) -> JoinHandle<SubmitOutcome> {
        let handler = self.clone();
        tokio::spawn(async move { handler.submit().await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldSpec, FormSchema};
    use crate::state::{FieldValue, FormSnapshot};
    use crate::validation::REQUIRED_FIELD;
    use httpmock::MockServer;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn login_form() -> FormController {
        FormController::new(
            FormSchema::new()
                .field("email", FieldSpec::email())
                .field("password", FieldSpec::password())
                .field("pin", FieldSpec::number(4)),
        )
        .unwrap()
    }

    fn fill(controller: &FormController) {
        controller.change("email", "neo@matrix.io").unwrap();
        controller.change("password", "redpill").unwrap();
        controller.change("pin", "1999").unwrap();
    }

    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let hook_count = Arc::clone(&count);
        (count, move || {
            hook_count.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn error_sink() -> (Arc<Mutex<Vec<FieldError>>>, impl Fn(FieldError) + Send + Sync + 'static) {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&errors);
        (errors, move |error: FieldError| {
            sink.lock().unwrap().push(error);
        })
    }

    #[tokio::test]
    async fn test_blank_field_gets_required_error() {
        let controller = login_form();
        controller.change("email", "neo@matrix.io").unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let callback_calls = Arc::clone(&calls);
        let (completed, on_complete) = counter();

        let handler = controller
            .handle_on_submit(move |_form: FormState| {
                callback_calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<(), SubmitError>(()) }
            })
            .on_complete(on_complete);

        let outcome = handler.submit().await;

        assert_eq!(
            outcome,
            SubmitOutcome::MissingValue {
                key: "password".to_string()
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(completed.load(Ordering::SeqCst), 1);
        let form = controller.form();
        assert_eq!(form.error("password"), Some(&FieldError::new(REQUIRED_FIELD)));
        assert!(form.error("pin").is_none());
        assert!(controller.disabled());
        assert!(!controller.loading());
    }

    #[tokio::test]
    async fn test_standing_error_blocks_submission() {
        let controller = login_form();
        controller.change("pin", "12345").unwrap();
        let before = controller.form();
        let (completed, on_complete) = counter();
        let (errors, on_error) = error_sink();

        let handler = controller
            .handle_on_submit(|_form: FormState| async {
                Err::<(), SubmitError>(SubmitError::new("should not run"))
            })
            .on_error(on_error)
            .on_complete(on_complete);

        assert_eq!(
            handler.submit().await,
            SubmitOutcome::Blocked {
                key: "pin".to_string()
            }
        );
        assert_eq!(controller.form(), before);
        assert!(errors.lock().unwrap().is_empty());
        assert_eq!(completed.load(Ordering::SeqCst), 1);
        assert!(!controller.loading());
    }

    #[tokio::test]
    async fn test_valid_form_is_submitted_once() {
        let controller = login_form();
        fill(&controller);
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let observed = controller.clone();
        let (completed, on_complete) = counter();

        let handler = controller
            .handle_on_submit(move |form: FormState| {
                sink.lock().unwrap().push((form, observed.loading()));
                async { Ok::<(), SubmitError>(()) }
            })
            .on_complete(on_complete);

        assert_eq!(handler.submit().await, SubmitOutcome::Submitted);

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        let (form, loading_during_call) = &received[0];
        assert_eq!(form, &controller.form());
        assert_eq!(form.value("pin"), Some(&FieldValue::from("1999")));
        assert!(*loading_during_call);
        assert_eq!(completed.load(Ordering::SeqCst), 1);
        assert!(!controller.loading());
    }

    #[tokio::test]
    async fn test_loading_transitions_are_observed() {
        let controller = login_form();
        fill(&controller);
        let loading = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&loading);
        controller.subscribe(move |snapshot: &FormSnapshot| {
            sink.lock().unwrap().push(snapshot.loading);
        });

        let handler =
            controller.handle_on_submit(|_form: FormState| async { Ok::<(), SubmitError>(()) });
        handler.submit().await;

        assert_eq!(*loading.lock().unwrap(), vec![true, false]);
    }

    #[tokio::test]
    async fn test_callback_failure_reaches_error_hook() {
        let controller = login_form();
        fill(&controller);
        let (errors, on_error) = error_sink();
        let (completed, on_complete) = counter();

        let handler = controller
            .handle_on_submit(|_form: FormState| async {
                Err::<(), SubmitError>(
                    SubmitError::new("Request failed").with_response("server down"),
                )
            })
            .on_error(on_error)
            .on_complete(on_complete);

        let outcome = handler.submit().await;

        assert_eq!(outcome, SubmitOutcome::Failed(FieldError::new("server down")));
        assert_eq!(
            *errors.lock().unwrap(),
            vec![FieldError::new("server down")]
        );
        assert_eq!(completed.load(Ordering::SeqCst), 1);
        assert!(!controller.loading());
        assert!(!controller.disabled());
    }

    #[tokio::test]
    async fn test_failure_without_error_hook_is_contained() {
        let controller = login_form();
        fill(&controller);
        let handler = controller.handle_on_submit(|_form: FormState| async {
            Err::<(), SubmitError>(anyhow::anyhow!("socket closed").into())
        });

        assert_eq!(
            handler.submit().await,
            SubmitOutcome::Failed(FieldError::new("socket closed"))
        );
        assert!(!controller.loading());
    }

    #[tokio::test]
    async fn test_handler_is_reusable() {
        let controller = login_form();
        let calls = Arc::new(AtomicUsize::new(0));
        let callback_calls = Arc::clone(&calls);
        let (completed, on_complete) = counter();
        let handler = controller
            .handle_on_submit(move |_form: FormState| {
                callback_calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<(), SubmitError>(()) }
            })
            .on_complete(on_complete);

        assert!(matches!(
            handler.submit().await,
            SubmitOutcome::MissingValue { .. }
        ));
        fill(&controller);
        assert_eq!(handler.submit().await, SubmitOutcome::Submitted);
        assert_eq!(handler.clone().submit().await, SubmitOutcome::Submitted);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(completed.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_ignored() {
        let controller = login_form();
        fill(&controller);
        let release = Arc::new(Notify::new());
        let gate = Arc::clone(&release);
        let calls = Arc::new(AtomicUsize::new(0));
        let callback_calls = Arc::clone(&calls);
        let (completed, on_complete) = counter();

        let handler = controller
            .handle_on_submit(move |_form: FormState| {
                callback_calls.fetch_add(1, Ordering::SeqCst);
                let gate = Arc::clone(&gate);
                async move {
                    gate.notified().await;
                    Ok::<(), SubmitError>(())
                }
            })
            .on_complete(on_complete);

        let first = handler.spawn();
        while calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert!(controller.loading());

        assert_eq!(handler.submit().await, SubmitOutcome::InFlight);
        assert_eq!(completed.load(Ordering::SeqCst), 0);
        assert!(controller.loading());

        release.notify_one();
        assert_eq!(first.await.unwrap(), SubmitOutcome::Submitted);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(completed.load(Ordering::SeqCst), 1);
        assert!(!controller.loading());
    }

    #[tokio::test]
    async fn test_abandoned_submit_still_completes() {
        let controller = login_form();
        fill(&controller);
        let (completed, on_complete) = counter();

        let slow = controller
            .handle_on_submit(|_form: FormState| async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok::<(), SubmitError>(())
            })
            .on_complete(on_complete);

        let timed_out = tokio::time::timeout(Duration::from_millis(20), slow.submit()).await;
        assert!(timed_out.is_err());
        assert!(!controller.loading());
        assert_eq!(completed.load(Ordering::SeqCst), 1);

        let quick =
            controller.handle_on_submit(|_form: FormState| async { Ok::<(), SubmitError>(()) });
        assert_eq!(quick.submit().await, SubmitOutcome::Submitted);
        assert_eq!(completed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panicking_callback_releases_form() {
        let controller = login_form();
        fill(&controller);
        let (completed, on_complete) = counter();

        let handler = controller
            .handle_on_submit(|form: FormState| async move {
                if !form.is_empty() {
                    panic!("callback crashed");
                }
                Ok::<(), SubmitError>(())
            })
            .on_complete(on_complete);

        assert!(handler.spawn().await.is_err());
        assert!(!controller.loading());
        assert_eq!(completed.load(Ordering::SeqCst), 1);

        let quick =
            controller.handle_on_submit(|_form: FormState| async { Ok::<(), SubmitError>(()) });
        assert_eq!(quick.submit().await, SubmitOutcome::Submitted);
    }

    #[tokio::test]
    async fn test_http_failure_message_reaches_error_hook() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST").path("/login");
                then.status(401)
                    .json_body(json!({"message": "Wrong e-mail or password"}));
            })
            .await;

        let controller = login_form();
        fill(&controller);
        let (errors, on_error) = error_sink();
        let client = reqwest::Client::new();
        let url = server.url("/login");

        let handler = controller
            .handle_on_submit(move |form: FormState| {
                let client = client.clone();
                let url = url.clone();
                async move {
                    let response = client.post(&url).json(&form).send().await?;
                    if !response.status().is_success() {
                        return Err(SubmitError::from_response(response).await);
                    }
                    Ok::<(), SubmitError>(())
                }
            })
            .on_error(on_error);

        let outcome = handler.submit().await;
        mock.assert_async().await;

        assert_eq!(
            outcome,
            SubmitOutcome::Failed(FieldError::new("Wrong e-mail or password"))
        );
        assert_eq!(errors.lock().unwrap().len(), 1);
    }
}
