//! Form validation performed before any network call.
//!
//! Each form type turns raw user input into the SDK request body, or a
//! [`ValidationError`] that the front end shows inline next to the form.

use std::str::FromStr;

use dshop_sdk::objects::{LoginRequest, ProductPayload, RegisterRequest};
use rust_decimal::Decimal;
use thiserror::Error;

/// Minimum accepted password length on registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Input errors caught client-side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Passwords don't match!")]
    PasswordMismatch,

    #[error("Password should be at least {min} characters long")]
    PasswordTooShort { min: usize },

    #[error("{field} must be a number")]
    InvalidNumber { field: &'static str },

    #[error("{0} cannot be negative")]
    Negative(&'static str),

    #[error("quantity must be at least 1")]
    QuantityTooLow,
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_owned())
}

/// Login form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        let email = required(&self.email, "email")?;
        if self.password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }
        Ok(LoginRequest {
            email,
            password: self.password.clone(),
        })
    }
}

/// Registration form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        let full_name = required(&self.full_name, "full name")?;
        let email = required(&self.email, "email")?;
        if self.password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(RegisterRequest {
            full_name,
            email,
            password: self.password.clone(),
        })
    }

    /// The credentials to log in with once the account exists.
    pub fn login_form(&self) -> LoginForm {
        LoginForm {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// Admin product form input. Numbers arrive as text, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub title: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    pub sku: String,
    pub image_url: String,
}

impl ProductForm {
    pub fn validate(&self) -> Result<ProductPayload, ValidationError> {
        let title = required(&self.title, "title")?;
        let description = required(&self.description, "description")?;

        let price = Decimal::from_str(required(&self.price, "price")?.as_str())
            .map_err(|_| ValidationError::InvalidNumber { field: "price" })?;
        if price < Decimal::ZERO {
            return Err(ValidationError::Negative("price"));
        }

        let stock = match self.stock.trim() {
            "" => 0,
            raw => raw
                .parse::<i32>()
                .map_err(|_| ValidationError::InvalidNumber { field: "stock" })?,
        };
        if stock < 0 {
            return Err(ValidationError::Negative("stock"));
        }

        Ok(ProductPayload {
            title,
            description,
            price,
            stock,
            sku: optional(&self.sku),
            image_url: optional(&self.image_url),
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_form() -> RegisterForm {
        RegisterForm {
            full_name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        }
    }

    #[test]
    fn test_login_requires_fields() {
        let form = LoginForm {
            email: "  ".into(),
            password: "x".into(),
        };
        assert_eq!(form.validate(), Err(ValidationError::MissingField("email")));

        let form = LoginForm {
            email: "a@b.c".into(),
            password: String::new(),
        };
        assert_eq!(
            form.validate(),
            Err(ValidationError::MissingField("password"))
        );
    }

    #[test]
    fn test_register_password_rules() {
        let mut form = register_form();
        form.confirm_password = "secret2".into();
        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));

        let mut form = register_form();
        form.password = "abc".into();
        form.confirm_password = "abc".into();
        assert_eq!(
            form.validate(),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
        assert_eq!(
            ValidationError::PasswordTooShort { min: 6 }.to_string(),
            "Password should be at least 6 characters long"
        );
    }

    #[test]
    fn test_register_ok_trims_email() {
        let mut form = register_form();
        form.email = " asha@example.com ".into();
        let req = form.validate().unwrap();
        assert_eq!(req.email, "asha@example.com");
        assert_eq!(req.full_name, "Asha Rao");
    }

    #[test]
    fn test_product_form() {
        let form = ProductForm {
            title: "Lamp".into(),
            description: "Desk lamp".into(),
            price: "899.50".into(),
            stock: "".into(),
            sku: " LMP-1 ".into(),
            image_url: "".into(),
        };
        let payload = form.validate().unwrap();
        assert_eq!(payload.price, Decimal::new(89950, 2));
        assert_eq!(payload.stock, 0);
        assert_eq!(payload.sku.as_deref(), Some("LMP-1"));
        assert!(payload.image_url.is_none());

        let bad = ProductForm {
            price: "-1".into(),
            ..form.clone()
        };
        assert_eq!(bad.validate(), Err(ValidationError::Negative("price")));

        let bad = ProductForm {
            price: "cheap".into(),
            ..form
        };
        assert_eq!(
            bad.validate(),
            Err(ValidationError::InvalidNumber { field: "price" })
        );
    }

    #[test]
    fn test_product_form_accepts_negative_zero_price() {
        let form = ProductForm {
            title: "Sample".into(),
            description: "Free sample".into(),
            price: "-0".into(),
            ..Default::default()
        };
        let payload = form.validate().unwrap();
        assert_eq!(payload.price, Decimal::ZERO);
    }
}
