//! # Identifier Newtypes
//!
//! Domain-primitive newtypes for the identifiers collected by the
//! registration wizard. Each type validates at construction and again at
//! deserialization, so an invalid value cannot be smuggled in through JSON.
//!
//! ## Formats
//!
//! - Aadhaar: UIDAI national identity number, 12 digits
//! - OTP: 6 digits
//! - PAN: Income Tax Department permanent account number, `AAAAA9999A`
//! - PIN code: India Post postal index number, 6 digits
//!
//! [`SubmissionId`] and [`RegistrationId`] are random UUIDv4 values and are
//! always valid by construction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Implement `Deserialize` for string newtypes by routing the raw string
/// through the type's `new()` constructor.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

// ---------------------------------------------------------------------------
// Form identifiers
// ---------------------------------------------------------------------------

/// Aadhaar number (12 digits).
///
/// `Debug` masks all but the last four digits so the value never lands in
/// logs in full.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Aadhaar(String);

impl_validating_deserialize!(Aadhaar);

impl Aadhaar {
    /// Create an Aadhaar number, validating the 12-digit format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAadhaar`] if the string is not
    /// exactly 12 ASCII digits.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !is_digits(&s, 12) {
            return Err(ValidationError::InvalidAadhaar(s));
        }
        Ok(Self(s))
    }

    /// Access the Aadhaar number.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Masked form with only the last four digits visible.
    pub fn masked(&self) -> String {
        format!("XXXXXXXX{}", &self.0[8..])
    }
}

impl std::fmt::Debug for Aadhaar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Aadhaar").field(&self.masked()).finish()
    }
}

/// One-time password (6 digits).
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Otp(String);

impl_validating_deserialize!(Otp);

impl Otp {
    /// Create an OTP, validating the 6-digit format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidOtp`] if the string is not exactly
    /// 6 ASCII digits.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !is_digits(&s, 6) {
            return Err(ValidationError::InvalidOtp(s));
        }
        Ok(Self(s))
    }

    /// Access the OTP digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Otp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Otp([REDACTED])")
    }
}

/// Permanent Account Number.
///
/// # Validation
///
/// - Surrounding whitespace is trimmed and the value is uppercased first
/// - Then it must be 5 letters, 4 digits, 1 letter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Pan(String);

impl_validating_deserialize!(Pan);

impl Pan {
    /// Create a PAN, normalizing case before validating the format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPan`] if the normalized value does
    /// not match `AAAAA9999A`.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let upper = Self::normalize(&raw);
        let bytes = upper.as_bytes();

        let well_formed = bytes.len() == 10
            && bytes[..5].iter().all(u8::is_ascii_uppercase)
            && bytes[5..9].iter().all(u8::is_ascii_digit)
            && bytes[9].is_ascii_uppercase();
        if !well_formed {
            return Err(ValidationError::InvalidPan(raw));
        }
        Ok(Self(upper))
    }

    /// Trim and uppercase a raw PAN the way [`Pan::new`] does.
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_ascii_uppercase()
    }

    /// Access the PAN in canonical uppercase form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Pan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Postal Index Number (6 digits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Pincode(String);

impl_validating_deserialize!(Pincode);

impl Pincode {
    /// Create a PIN code, validating the 6-digit format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPincode`] if the string is not
    /// exactly 6 ASCII digits.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !is_digits(&s, 6) {
            return Err(ValidationError::InvalidPincode(s));
        }
        Ok(Self(s))
    }

    /// Access the PIN code digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Pincode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Generated identifiers
// ---------------------------------------------------------------------------

/// Identifier minted when step 1 is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(String);

impl SubmissionId {
    /// Generate a new random submission identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an identifier presented by a client.
    pub fn from_client(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Udyam registration number returned on completion: `UDYAM-` followed by
/// 32 uppercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationId(String);

impl RegistrationId {
    /// Prefix shared by every registration number.
    pub const PREFIX: &'static str = "UDYAM-";

    /// Generate a new random registration number.
    pub fn new() -> Self {
        let hex = Uuid::new_v4().simple().to_string().to_ascii_uppercase();
        Self(format!("{}{hex}", Self::PREFIX))
    }

    /// Access the registration number.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RegistrationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
