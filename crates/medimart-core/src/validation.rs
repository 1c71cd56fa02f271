//! # Validation Module
//!
//! Input validation for the forms that feed the stores.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Mobile frontend                                              │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: medimart-client commands / auth service                      │
//! │  └── THIS MODULE: rejects bad input before any network call            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Remote API                                                   │
//! │  └── responseCode != 1 for anything it refuses                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use medimart_core::validation::{validate_contact_info, ContactKind};
//!
//! assert_eq!(validate_contact_info("9876543210").unwrap(), ContactKind::Phone);
//! assert!(validate_contact_info("not-a-contact").is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MAX_ADDRESS_LEN: usize = 500;
pub const MAX_SEARCH_LEN: usize = 100;
pub const MAX_LINE_QUANTITY: i64 = 999;

/// What kind of contact the reset wizard was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Email,
    Phone,
}

// =============================================================================
// Identity Validators
// =============================================================================

/// Validates an email address.
///
/// ## Rules
/// - Exactly one `@` with a non-empty local part
/// - Domain contains a dot that is neither first nor last
/// - No whitespace
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@example.com".to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    match domain.rfind('.') {
        Some(dot) if dot > 0 && dot < domain.len() - 1 => Ok(()),
        _ => Err(invalid()),
    }
}

/// Validates an Indian mobile number.
///
/// ## Rules
/// - Optional `+91` / `91` / `0` prefix, spaces and hyphens ignored
/// - Exactly 10 digits remaining, first digit 6-9
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let digits: String = phone
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();

    if digits.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let national = digits
        .strip_prefix("+91")
        .or_else(|| (digits.len() == 12).then(|| digits.strip_prefix("91")).flatten())
        .or_else(|| (digits.len() == 11).then(|| digits.strip_prefix('0')).flatten())
        .unwrap_or(&digits);

    let valid = national.len() == 10
        && national.chars().all(|c| c.is_ascii_digit())
        && matches!(national.chars().next(), Some('6'..='9'));

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must be a 10-digit mobile number".to_string(),
        })
    }
}

/// Validates the contact field of the forgot-password wizard.
///
/// Accepts either an email or a phone number and reports which one it was.
pub fn validate_contact_info(contact: &str) -> ValidationResult<ContactKind> {
    let contact = contact.trim();

    if contact.is_empty() {
        return Err(ValidationError::Required {
            field: "email or phone".to_string(),
        });
    }

    if contact.contains('@') {
        validate_email(contact).map(|_| ContactKind::Email)
    } else {
        validate_phone(contact).map(|_| ContactKind::Phone)
    }
}

/// Validates a one-time password: 4 to 6 ASCII digits.
pub fn validate_otp(otp: &str) -> ValidationResult<()> {
    let otp = otp.trim();

    if otp.is_empty() {
        return Err(ValidationError::Required {
            field: "otp".to_string(),
        });
    }

    if !(4..=6).contains(&otp.len()) || !otp.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "otp".to_string(),
            reason: "must be 4 to 6 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a password's length.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }
    if len > MAX_PASSWORD_LEN {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: MAX_PASSWORD_LEN,
        });
    }

    Ok(())
}

/// Validates a person's display name for signup.
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// Checkout / Listing Validators
// =============================================================================

/// Validates a delivery address and returns it trimmed.
pub fn validate_delivery_address(address: &str) -> ValidationResult<String> {
    let address = address.trim();

    if address.is_empty() {
        return Err(ValidationError::Required {
            field: "delivery address".to_string(),
        });
    }

    if address.chars().count() > MAX_ADDRESS_LEN {
        return Err(ValidationError::TooLong {
            field: "delivery address".to_string(),
            max: MAX_ADDRESS_LEN,
        });
    }

    Ok(address.to_string())
}

/// Validates the quantity a cart line would end up with.
pub fn validate_line_quantity(quantity: i64) -> ValidationResult<()> {
    if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }
    Ok(())
}

/// Validates an order search query.
///
/// ## Rules
/// - Can be empty (matches everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
