//! Form controller module.
//!
//! `FormController` owns the form state and the loading flag, runs the
//! validation rules on every change, and tells subscribed observers about
//! every new state. It is cheap to clone; clones share the same form.
//!
//! The state lock is never held while observers run or while a submit
//! callback is awaited, so observers and callbacks may call back into the
//! controller.

mod observer;

pub use observer::{FormObserver, Subscription};

use crate::config::FormSchema;
use crate::error::FormitaResult;
use crate::state::{FieldError, FieldState, FieldType, FieldValue, FormError, FormSnapshot, FormState};
use crate::submit::{SubmitError, SubmitHandler};
use crate::validation::{validate_field, REQUIRED_FIELD};
use log::*;
use std::collections::HashSet;
use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct Inner {
    form: FormState,
    loading: bool,
}

impl Inner {
    fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            form: self.form.clone(),
            loading: self.loading,
            disabled: self.form.has_errors(),
        }
    }
}

struct Shared {
    inner: Mutex<Inner>,
    observers: Mutex<Vec<(Subscription, Arc<dyn FormObserver>)>>,
    next_subscription: AtomicU64,
}

/// Result of the pre-submission checks.
///
pub(crate) enum Readiness {
    /// A field already carries an error.
    Blocked(String),
    /// A field was blank and now carries the required-field error.
    MissingValue(String),
    /// Every field is valid and filled in.
    Ready(FormState),
}

/// Oversees form state, change validation and submission bookkeeping.
///
#[derive(Clone)]
pub struct FormController {
    shared: Arc<Shared>,
}

impl FormController {
    /// Build a form from its schema. Every field starts with its declared
    /// value, or empty text, and no error.
    ///
    pub fn new(schema: FormSchema) -> Result<FormController, FormError> {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(schema.len());
        for (key, spec) in schema.iter() {
            if !seen.insert(key) {
                return Err(FormError::DuplicateField {
                    key: key.to_string(),
                });
            }
            if spec.field_type == FieldType::Number && spec.limit.is_none() {
                return Err(FormError::MissingLimit {
                    key: key.to_string(),
                });
            }
            let value = spec.value.clone().unwrap_or_default();
            fields.push((
                key.to_string(),
                FieldState::new(spec.field_type, value, spec.limit),
            ));
        }
        debug!("Initialized form with {} fields", fields.len());

        Ok(FormController {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    form: FormState::from_entries(fields),
                    loading: false,
                }),
                observers: Mutex::new(vec![]),
                next_subscription: AtomicU64::new(0),
            }),
        })
    }

    /// Load a schema file and build a form from it.
    ///
    pub fn from_schema_file(path: impl AsRef<Path>) -> FormitaResult<FormController> {
        let schema = FormSchema::load(path)?;
        Ok(FormController::new(schema)?)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.shared
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn observers(&self) -> MutexGuard<'_, Vec<(Subscription, Arc<dyn FormObserver>)>> {
        self.shared
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, snapshot: &FormSnapshot) {
        let observers: Vec<Arc<dyn FormObserver>> = self
            .observers()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer.notify(snapshot);
        }
    }

    /// Apply a mutation under the lock, then notify observers.
    ///
    fn update<R>(&self, apply: impl FnOnce(&mut Inner) -> R) -> R {
        let (result, snapshot) = {
            let mut inner = self.lock();
            let result = apply(&mut inner);
            (result, inner.snapshot())
        };
        self.notify(&snapshot);
        result
    }

    /// Get a copy of the full state as observers see it.
    ///
    pub fn snapshot(&self) -> FormSnapshot {
        self.lock().snapshot()
    }

    /// Get a copy of the form state.
    ///
    pub fn form(&self) -> FormState {
        self.lock().form.clone()
    }

    /// Get a copy of one field's state.
    ///
    pub fn field(&self, key: &str) -> Option<FieldState> {
        self.lock().form.get(key).cloned()
    }

    /// Return true while a submission is in flight.
    ///
    pub fn loading(&self) -> bool {
        self.lock().loading
    }

    /// Return true while any field carries an error.
    ///
    pub fn disabled(&self) -> bool {
        self.lock().form.has_errors()
    }

    /// Register an observer. It is called after every state change until
    /// unsubscribed.
    ///
    pub fn subscribe(&self, observer: impl FormObserver + 'static) -> Subscription {
        let subscription = Subscription(
            self.shared
                .next_subscription
                .fetch_add(1, Ordering::Relaxed),
        );
        self.observers().push((subscription, Arc::new(observer)));
        subscription
    }

    /// Remove an observer. Returns false if it was not subscribed.
    ///
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut observers = self.observers();
        let before = observers.len();
        observers.retain(|(s, _)| *s != subscription);
        observers.len() != before
    }

    /// Return a change handler bound to `key`.
    ///
    pub fn handle_change(&self, key: &str) -> Result<ChangeHandler, FormError> {
        if !self.lock().form.contains_key(key) {
            return Err(FormError::UnknownField {
                key: key.to_string(),
            });
        }
        Ok(ChangeHandler {
            controller: self.clone(),
            key: key.to_string(),
        })
    }

    /// Validate and store a new value for `key` in one step.
    ///
    pub fn change(
        &self,
        key: &str,
        input: impl Into<FieldValue>,
    ) -> Result<Option<FieldError>, FormError> {
        Ok(self.handle_change(key)?.call(input))
    }

    /// Return a submit handler that runs `callback` with the form state once
    /// every field is valid and filled in.
    ///
    pub fn handle_on_submit<F, Fut>(&self, callback: F) -> SubmitHandler<F>
    where
        F: Fn(FormState) -> Fut,
        Fut: Future<Output = Result<(), SubmitError>>,
    {
        SubmitHandler::new(self.clone(), callback)
    }

    fn apply_change(&self, key: &str, value: FieldValue) -> Option<FieldError> {
        self.update(|inner| {
            let field = inner.form.get_mut(key)?;
            let error = validate_field(field.field_type, field.limit, &value);
            trace!("Field '{}' changed, error: {:?}", key, error);
            field.set(value, error.clone());
            error
        })
    }

    /// Mark a submission as started. Returns false if one is already in
    /// flight.
    ///
    pub(crate) fn begin_submission(&self) -> bool {
        let snapshot = {
            let mut inner = self.lock();
            if inner.loading {
                return false;
            }
            inner.loading = true;
            inner.snapshot()
        };
        self.notify(&snapshot);
        true
    }

    pub(crate) fn finish_submission(&self) {
        self.update(|inner| inner.loading = false);
    }

    /// Check the form before handing it to a submit callback.
    ///
    /// A standing error wins over a blank value. Only the first blank field,
    /// in declaration order, gets the required-field error.
    ///
    pub(crate) fn check_submission(&self) -> Readiness {
        let (blank, snapshot) = {
            let mut inner = self.lock();
            if let Some(key) = inner.form.first_error() {
                return Readiness::Blocked(key.to_string());
            }
            let blank = match inner.form.first_blank() {
                Some(key) => key.to_string(),
                None => return Readiness::Ready(inner.form.clone()),
            };
            if let Some(field) = inner.form.get_mut(&blank) {
                field.error = Some(FieldError::new(REQUIRED_FIELD));
            }
            (blank, inner.snapshot())
        };
        self.notify(&snapshot);
        Readiness::MissingValue(blank)
    }
}

/// Change handler bound to one field.
///
/// Each call reads the field's current state, so a handler stays valid for
/// the life of the form.
///
#[derive(Clone)]
pub struct ChangeHandler {
    controller: FormController,
    key: String,
}

impl ChangeHandler {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Validate `input`, store it together with the resulting error, and
    /// return the error.
    ///
    pub fn call(&self, input: impl Into<FieldValue>) -> Option<FieldError> {
        self.controller.apply_change(&self.key, input.into())
    }
}
