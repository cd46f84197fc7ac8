//! Phone-number input control.
//!
//! Responsibilities:
//! - Buffer a country selection plus a phone-number string on behalf of a
//!   host form.
//! - Keep the two in sync: a parsed number pulls the country selector along,
//!   and a country switch rewrites the number's calling-code prefix.
//! - Propagate the number only while it is valid, `None` otherwise.
//!
//! Does NOT handle:
//! - Actual phone-number parsing or formatting. That is an external
//!   collaborator injected through [`PhoneNumberParser`].
//! - Country metadata (flags, display names) for the selector widget.

use thiserror::Error;

/// What a parser learned about a phone-number string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPhoneNumber {
    /// ISO 3166-1 alpha-2 country code, when the number identifies one.
    pub country: Option<String>,
    /// Whether the number is valid for its region.
    pub valid: bool,
    /// Whether the number is possible (right length) for its region.
    pub possible: bool,
}

/// Dialing metadata for a country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryDialInfo {
    /// An example number shown as the input placeholder.
    pub example_number: String,
    /// The calling code with leading `+`, e.g. `+1`.
    pub calling_code: String,
}

/// External phone-number parsing collaborator.
#[cfg_attr(test, mockall::automock)]
pub trait PhoneNumberParser {
    /// Parses a number string, returning `None` when it is unparseable.
    fn parse(&self, number: &str) -> Option<ParsedPhoneNumber>;

    /// Dialing metadata for an ISO country code, `None` when unknown.
    fn dial_info(&self, country: &str) -> Option<CountryDialInfo>;
}

/// Validation failure of the phone control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PhoneInvalid {
    /// The control is required and the buffer is empty.
    #[error("phone number is required")]
    Required,
    /// The buffer does not look like an E.164 number.
    #[error("phone number does not match the expected pattern")]
    Pattern,
    /// The parser rejected the number as invalid or impossible.
    #[error("phone number is not a valid number")]
    Number,
}

/// Construction-time options for [`PhoneInputControl`].
#[derive(Debug, Clone)]
pub struct PhoneInputOptions {
    /// Country preselected when a written value carries no country hint.
    pub default_country: String,
    /// Whether an empty buffer fails validation.
    pub required: bool,
}

impl Default for PhoneInputOptions {
    fn default() -> Self {
        Self {
            default_country: "US".to_string(),
            required: true,
        }
    }
}

/// Change callback invoked with the propagated number, `None` while invalid.
pub type PhoneChangeListener = Box<dyn FnMut(Option<&str>)>;

/// Nested phone-number control in the same value/validator idiom as the
/// composite control: writes in are silent, only genuine edits propagate.
pub struct PhoneInputControl<P> {
    parser: P,
    options: PhoneInputOptions,
    country: String,
    number: String,
    calling_code: String,
    placeholder: String,
    disabled: bool,
    on_change: Option<PhoneChangeListener>,
}

impl<P: std::fmt::Debug> std::fmt::Debug for PhoneInputControl<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhoneInputControl")
            .field("parser", &self.parser)
            .field("country", &self.country)
            .field("number", &self.number)
            .field("calling_code", &self.calling_code)
            .field("disabled", &self.disabled)
            .field("has_listener", &self.on_change.is_some())
            .finish()
    }
}

impl<P: PhoneNumberParser> PhoneInputControl<P> {
    /// Builds the control around an injected parser.
    pub fn new(parser: P, options: PhoneInputOptions) -> Self {
        let mut control = Self {
            parser,
            options,
            country: String::new(),
            number: String::new(),
            calling_code: String::new(),
            placeholder: String::new(),
            disabled: false,
            on_change: None,
        };
        let default_country = control.options.default_country.clone();
        control.switch_country_data(&default_country);
        control
    }

    /// The selected ISO country code.
    pub fn country(&self) -> &str {
        &self.country
    }

    /// The buffered number string.
    pub fn number(&self) -> &str {
        &self.number
    }

    /// The example number for the selected country.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// The calling code (with `+`) for the selected country.
    pub fn calling_code(&self) -> &str {
        &self.calling_code
    }

    /// The propagated value: the buffered number while valid, else `None`.
    pub fn value(&self) -> Option<&str> {
        (self.validate().is_ok() && !self.number.is_empty()).then_some(self.number.as_str())
    }

    /// Registers the host form's change callback.
    pub fn register_on_change(&mut self, listener: impl FnMut(Option<&str>) + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    /// Drops the registered change listener.
    pub fn clear_on_change(&mut self) {
        self.on_change = None;
    }

    /// Enables or disables the control. Silent; a disabled control
    /// validates as passing and ignores edits.
    pub fn set_disabled(&mut self, disabled: bool) {
        tracing::debug!(disabled, "phone control disabled state changed");
        self.disabled = disabled;
    }

    /// Accepts an externally supplied number from the host form.
    ///
    /// The country selector follows the parsed number when it identifies a
    /// country, otherwise falls back to the configured default. Silent for
    /// non-empty writes; an empty write propagates `None` so the host model
    /// does not keep a stale number.
    pub fn write_value(&mut self, number: Option<String>) {
        let number = number.unwrap_or_default();
        let country = if number.is_empty() {
            self.options.default_country.clone()
        } else {
            self.parser
                .parse(&number)
                .and_then(|parsed| parsed.country)
                .unwrap_or_else(|| self.options.default_country.clone())
        };
        tracing::debug!(country = %country, "external phone number written");
        self.switch_country_data(&country);
        self.country = country;
        self.number = number;
        if self.number.is_empty() {
            self.notify();
        }
    }

    /// Applies a number edit.
    ///
    /// Propagates the number when valid, `None` otherwise. When the parsed
    /// number identifies a different country than the selector shows, the
    /// selector follows the number.
    pub fn set_number(&mut self, number: impl Into<String>) {
        if self.disabled {
            return;
        }
        let number = number.into();
        if self.number == number {
            return;
        }
        self.number = number;

        if let Some(country) = self
            .parser
            .parse(&self.number)
            .and_then(|parsed| parsed.country)
            .filter(|c| *c != self.country)
        {
            tracing::debug!(country = %country, "country follows parsed number");
            self.switch_country_data(&country);
            self.country = country;
        }
        self.notify();
    }

    /// Applies a country selection.
    ///
    /// When the buffered number starts with the previous calling code, the
    /// prefix is rewritten to the new country's calling code.
    pub fn set_country(&mut self, country: impl Into<String>) {
        if self.disabled {
            return;
        }
        let country = country.into();
        if self.country == country {
            return;
        }
        let old_code = self.calling_code.clone();
        self.switch_country_data(&country);
        self.country = country;

        if !old_code.is_empty()
            && old_code != self.calling_code
            && self.number.starts_with(&old_code)
        {
            self.number = format!(
                "{}{}",
                self.calling_code,
                &self.number[old_code.len()..]
            );
            self.notify();
        }
    }

    /// Seeds an empty buffer with the calling code, as the input widget does
    /// on focus. Silent: a bare calling code is not a propagatable number.
    pub fn focus(&mut self) {
        if self.number.is_empty() {
            self.number = self.calling_code.clone();
        }
    }

    /// Validates the buffered number.
    pub fn validate(&self) -> Result<(), PhoneInvalid> {
        if self.disabled {
            return Ok(());
        }
        if self.number.is_empty() {
            return if self.options.required {
                Err(PhoneInvalid::Required)
            } else {
                Ok(())
            };
        }
        if !matches_phone_pattern(&self.number) {
            return Err(PhoneInvalid::Pattern);
        }
        match self.parser.parse(&self.number) {
            Some(parsed) if parsed.valid && parsed.possible => Ok(()),
            _ => Err(PhoneInvalid::Number),
        }
    }

    /// Convenience wrapper over [`PhoneInputControl::validate`].
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    fn switch_country_data(&mut self, country: &str) {
        match self.parser.dial_info(country) {
            Some(info) => {
                self.placeholder = info.example_number;
                self.calling_code = info.calling_code;
            }
            None => {
                tracing::debug!(country, "no dial info for country");
                self.placeholder.clear();
                self.calling_code.clear();
            }
        }
    }

    fn notify(&mut self) {
        let value = (self.validate().is_ok() && !self.number.is_empty())
            .then(|| self.number.clone());
        if let Some(listener) = self.on_change.as_mut() {
            listener(value.as_deref());
        }
    }
}

/// E.164 shape: `+`, a non-zero digit, then 1 to 14 more digits.
pub fn matches_phone_pattern(number: &str) -> bool {
    let Some(rest) = number.strip_prefix('+') else {
        return false;
    };
    let mut chars = rest.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    ('1'..='9').contains(&first)
        && (1..=14).contains(&chars.clone().count())
        && chars.all(|c| c.is_ascii_digit())
}
