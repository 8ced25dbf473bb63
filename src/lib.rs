//! Form-state engine.
//!
//! Describe the fields of a form, get a controller that keeps each field's
//! value and error, validates on every change, and runs submissions that are
//! held back while any field is invalid or blank.
//!
//! ```no_run
//! use formita::{FieldSpec, FormController, FormSchema, FormState, SubmitError};
//!
//! # async fn run() -> formita::FormitaResult<()> {
//! let form = FormController::new(
//!     FormSchema::new()
//!         .field("email", FieldSpec::email())
//!         .field("password", FieldSpec::password())
//!         .field("pin", FieldSpec::number(4)),
//! )?;
//!
//! form.change("email", "neo@matrix.io")?;
//! form.change("password", "redpill")?;
//! form.change("pin", "1999")?;
//!
//! let submit = form
//!     .handle_on_submit(|data: FormState| async move {
//!         println!("{} fields sent", data.len());
//!         Ok::<(), SubmitError>(())
//!     })
//!     .on_error(|error| eprintln!("{}", error));
//! submit.submit().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod logger;
pub mod state;
pub mod submit;
pub mod utils;
pub mod validation;

pub use config::{FieldSpec, FormSchema, SchemaError};
pub use controller::{ChangeHandler, FormController, FormObserver, Subscription};
pub use error::{FormitaError, FormitaResult};
pub use state::{FieldError, FieldState, FieldType, FieldValue, FormError, FormSnapshot, FormState};
pub use submit::{ErrorResponse, SubmitError, SubmitHandler, SubmitOutcome};
pub use validation::{validate, validate_field, CredentialType};
