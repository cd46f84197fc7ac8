//! Nested form controls for the gateway console.
//!
//! This crate provides the composite form-control engine the console's
//! configuration widgets are built on, plus the two concrete controls that
//! use it: the broker security configuration and the phone-number input.
//!
//! A composite control exposes itself to a host form as one atomic
//! value/validator pair while managing a set of named field buffers
//! internally. A discriminant field selects which of the remaining fields
//! are active; inactive fields keep their buffered input but are excluded
//! from validation and from the propagated value.
//!
//! # Example
//!
//! ```rust
//! use gateway_forms::security::{BrokerSecurityType, SecurityConfigControl, fields};
//!
//! let mut control = SecurityConfigControl::new(false);
//! control.set_type(BrokerSecurityType::Basic);
//! control.set_field(fields::USERNAME, "admin");
//! control.set_field(fields::PASSWORD, "changeme");
//! assert!(control.is_valid());
//! ```

pub mod control;
pub mod field;
pub mod phone;
pub mod security;
pub mod validators;
pub mod value;

// Re-export commonly used types at the crate root
pub use control::{CompositeControl, CompositeControlBuilder, CompositeInvalid, SubModeOptions};
pub use phone::{PhoneInputControl, PhoneInputOptions, PhoneInvalid, PhoneNumberParser};
pub use security::{BrokerSecurityType, ModeType, SecurityConfig, SecurityConfigControl};
pub use validators::{FieldError, Validator};
pub use value::{CompositeValue, FieldValue};
