//! Request validation gate.
//!
//! Request DTOs deserialize every checked field as `Option<String>` so a
//! missing field lands here instead of in the deserializer, and the client
//! gets a 422 envelope with one message per offending field.
//!
//! ```rust,ignore
//! let mut v = Validator::new("/register");
//! let email = v.email("email", form.email.as_deref());
//! v.finish()?;
//! let email = email.expect("present after finish");
//! ```

use std::collections::BTreeMap;
use std::str::FromStr;

use axum::extract::{FromRequest, Request};
use rust_decimal::Decimal;

use gerai_core::{Email, PhoneNumber, VerificationCode};

use crate::error::ApiError;

/// JSON body extractor that answers malformed bodies with the standard
/// envelope instead of axum's plain-text rejection.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::Validation {
                errors: BTreeMap::from([("body".to_owned(), rejection.to_string())]),
                redirect: "/",
            }),
        }
    }
}

/// Accumulates field-level validation failures for one request.
pub struct Validator {
    errors: BTreeMap<String, String>,
    redirect: &'static str,
}

impl Validator {
    /// Start a validation pass; `redirect` is the route hint included in the
    /// 422 envelope when the pass fails.
    #[must_use]
    pub fn new(redirect: &'static str) -> Self {
        Self {
            errors: BTreeMap::new(),
            redirect,
        }
    }

    fn fail(&mut self, field: &str, message: impl Into<String>) {
        // First failure per field wins
        self.errors
            .entry(field.to_owned())
            .or_insert_with(|| message.into());
    }

    /// The field must be present and non-empty.
    pub fn required<'a>(&mut self, field: &str, value: Option<&'a str>) -> Option<&'a str> {
        match value {
            Some(v) if !v.trim().is_empty() => Some(v),
            _ => {
                self.fail(field, format!("The {field} field is required."));
                None
            }
        }
    }

    /// The field must be present and a structurally valid email address.
    pub fn email(&mut self, field: &str, value: Option<&str>) -> Option<Email> {
        let v = self.required(field, value)?;
        match Email::parse(v) {
            Ok(email) => Some(email),
            Err(e) => {
                self.fail(field, format!("The {field} field must be a valid email: {e}."));
                None
            }
        }
    }

    /// The field must be present and a phone number of 10-15 digits.
    pub fn phone(&mut self, field: &str, value: Option<&str>) -> Option<PhoneNumber> {
        let v = self.required(field, value)?;
        match PhoneNumber::parse(v) {
            Ok(phone) => Some(phone),
            Err(e) => {
                self.fail(field, format!("The {field} field is invalid: {e}."));
                None
            }
        }
    }

    /// The field must be present and a six-digit verification code.
    pub fn code(&mut self, field: &str, value: Option<&str>) -> Option<VerificationCode> {
        let v = self.required(field, value)?;
        match VerificationCode::parse(v) {
            Ok(code) => Some(code),
            Err(e) => {
                self.fail(field, format!("The {field} field is invalid: {e}."));
                None
            }
        }
    }

    /// The field must be present and a decimal number.
    pub fn decimal(&mut self, field: &str, value: Option<&str>) -> Option<Decimal> {
        let v = self.required(field, value)?;
        match Decimal::from_str(v) {
            Ok(d) => Some(d),
            Err(_) => {
                self.fail(field, format!("The {field} field must be a number."));
                None
            }
        }
    }

    /// The field must be present and a whole number.
    pub fn integer(&mut self, field: &str, value: Option<&str>) -> Option<i32> {
        let v = self.required(field, value)?;
        match v.parse::<i32>() {
            Ok(n) => Some(n),
            Err(_) => {
                self.fail(field, format!("The {field} field must be a whole number."));
                None
            }
        }
    }

    /// The field must be present and literally equal to `other` (e.g.
    /// `confirm_password` equals `password`).
    pub fn same<'a>(
        &mut self,
        field: &str,
        value: Option<&'a str>,
        other_field: &str,
        other: Option<&str>,
    ) -> Option<&'a str> {
        let v = self.required(field, value)?;
        if Some(v) == other {
            Some(v)
        } else {
            self.fail(
                field,
                format!("The {field} field must match the {other_field} field."),
            );
            None
        }
    }

    /// Conditional-required: validated with `check` only when present,
    /// ignored when absent.
    pub fn sometimes<'a, T, F>(
        &mut self,
        field: &str,
        value: Option<&'a str>,
        check: F,
    ) -> Option<T>
    where
        F: FnOnce(&mut Self, &str, Option<&'a str>) -> Option<T>,
    {
        value.and_then(|v| check(self, field, Some(v)))
    }

    /// Finish the pass: `Ok(())` when every rule held, otherwise the 422
    /// field-map rejection.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` listing every offending field.
    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation {
                errors: self.errors,
                redirect: self.redirect,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors_of(v: Validator) -> BTreeMap<String, String> {
        match v.finish() {
            Err(ApiError::Validation { errors, .. }) => errors,
            Err(other) => panic!("expected validation error, got {other:?}"),
            Ok(()) => BTreeMap::new(),
        }
    }

    #[test]
    fn test_required_missing_and_empty() {
        let mut v = Validator::new("/register");
        assert!(v.required("email", None).is_none());
        assert!(v.required("name", Some("  ")).is_none());
        let errors = errors_of(v);
        assert_eq!(errors.len(), 2);
        assert!(errors["email"].contains("required"));
    }

    #[test]
    fn test_required_present() {
        let mut v = Validator::new("/register");
        assert_eq!(v.required("email", Some("a@b.com")), Some("a@b.com"));
        assert!(v.finish().is_ok());
    }

    #[test]
    fn test_email_parses() {
        let mut v = Validator::new("/register");
        let email = v.email("email", Some("a@b.com")).expect("valid email");
        assert_eq!(email.as_str(), "a@b.com");
        assert!(v.finish().is_ok());
    }

    #[test]
    fn test_email_format() {
        let mut v = Validator::new("/register");
        assert!(v.email("email", Some("not-an-email")).is_none());
        let errors = errors_of(v);
        assert!(errors.contains_key("email"));
    }

    #[test]
    fn test_code_shape() {
        let mut v = Validator::new("/verify-email");
        let code = v.code("code", Some("123456")).expect("valid code");
        assert_eq!(code.as_str(), "123456");
        assert!(v.code("code2", Some("12x456")).is_none());
        let errors = errors_of(v);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("code2"));
    }

    #[test]
    fn test_phone_digit_range() {
        let mut v = Validator::new("/register");
        assert!(v.phone("phone_number", Some("12345")).is_none());
        assert!(v.phone("other_number", Some("+6281234567890")).is_some());
        let errors = errors_of(v);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("phone_number"));
    }

    #[test]
    fn test_decimal() {
        let mut v = Validator::new("/product/create");
        assert_eq!(
            v.decimal("price", Some("12500.50")),
            Some(Decimal::new(1_250_050, 2))
        );
        assert!(v.decimal("price", Some("free")).is_none());
    }

    #[test]
    fn test_integer() {
        let mut v = Validator::new("/product/create");
        assert_eq!(v.integer("quantity", Some("3")), Some(3));
        assert!(v.integer("quantity", Some("3.5")).is_none());
    }

    #[test]
    fn test_same_mismatch() {
        let mut v = Validator::new("/add-password");
        assert!(
            v.same("confirm_password", Some("abc"), "password", Some("xyz"))
                .is_none()
        );
        let errors = errors_of(v);
        assert!(errors["confirm_password"].contains("must match"));
    }

    #[test]
    fn test_same_match() {
        let mut v = Validator::new("/add-password");
        assert_eq!(
            v.same("confirm_password", Some("abc"), "password", Some("abc")),
            Some("abc")
        );
        assert!(v.finish().is_ok());
    }

    #[test]
    fn test_sometimes_absent_is_ok() {
        let mut v = Validator::new("/update-address");
        assert!(v.sometimes("city", None, Validator::required).is_none());
        assert!(v.finish().is_ok());
    }

    #[test]
    fn test_sometimes_present_is_checked() {
        let mut v = Validator::new("/update-address");
        assert!(v.sometimes("email", Some("nope"), Validator::email).is_none());
        let errors = errors_of(v);
        assert!(errors.contains_key("email"));
    }

    #[test]
    fn test_first_failure_per_field_wins() {
        let mut v = Validator::new("/register");
        v.required("email", None);
        v.email("email", None);
        let errors = errors_of(v);
        assert_eq!(errors.len(), 1);
        assert!(errors["email"].contains("required"));
    }
}
