//! # udyam-core: Domain Core for Udyam Registration
//!
//! This crate holds everything about MSME registration that does not touch
//! the network: the identifier newtypes, the static multi-step form schema,
//! the field validator, and the two-step registration workflow. The HTTP
//! service (`udyam-api`) and the CLI (`udyam-cli`) both sit on top of it.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `Aadhaar`, `Otp`, `Pan`,
//!    `Pincode` validate at construction and at deserialization. A `Pan`
//!    that exists is always uppercase and well-formed.
//!
//! 2. **One schema, two consumers.** The [`schema::FormSchema`] served to
//!    clients is the same value the [`validate::FormValidator`] compiles its
//!    patterns from. There is no second copy of the rules.
//!
//! 3. **Pure workflow.** [`workflow::StepProcessor`] maps step input to an
//!    outcome or a [`StepError`]. Sequencing between steps is tracked by the
//!    caller through [`workflow::WorkflowStage`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `udyam-*` crates (this is the leaf of the DAG).
//! - No I/O and no `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod schema;
pub mod validate;
pub mod workflow;

// Re-export primary types for ergonomic imports.
pub use error::{
    FieldError, FieldErrorKind, SchemaError, StepError, TransitionError, ValidationError,
};
pub use identity::{Aadhaar, Otp, Pan, Pincode, RegistrationId, SubmissionId};
pub use schema::{FieldDescriptor, FormSchema, FormState, StepDescriptor};
pub use validate::{FieldRule, FormValidator};
pub use workflow::{StepProcessor, WorkflowStage};
