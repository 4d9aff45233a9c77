//! # Route Modules
//!
//! Each module exposes a `router()` returning `Router<AppState>`; they are
//! merged in [`crate::app`].
//!
//! | Path | Module |
//! |---|---|
//! | `GET /api/test` | [`health`] |
//! | `GET /api/form-schema` | [`schema`] |
//! | `POST /api/validate-step1`, `POST /api/validate-step2`, `POST /api/submit-form` | [`registration`] |
//! | `GET /api/pincode/{pin}` | [`pincode`] |

pub mod health;
pub mod pincode;
pub mod registration;
pub mod schema;
