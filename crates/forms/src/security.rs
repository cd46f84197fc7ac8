//! Broker security-configuration control.
//!
//! Responsibilities:
//! - Define the broker security modes and the certificate sub-mode.
//! - Wire the composite engine with the security field set and its
//!   per-mode enablement map.
//! - Provide a typed, secret-aware view of the propagated configuration.
//!
//! Does NOT handle:
//! - Rendering, i18n labels, or dialog plumbing (hosting UI concerns).
//! - Establishing broker connections with the credentials.
//!
//! Invariants:
//! - Passwords in the typed view use `secrecy::SecretString` to prevent
//!   accidental logging. Serialization still includes them; secrecy is for
//!   runtime safety, not persistence safety.
//! - Wire field names match the connector configuration JSON the gateway
//!   consumes (`pathToCACert` etc.).

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::control::{CompositeControl, CompositeInvalid};
use crate::validators::{FieldError, Validator};
use crate::value::{CompositeValue, FieldValue};

/// Wire names of the security form fields.
pub mod fields {
    /// The discriminant: which security mode is selected.
    pub const TYPE: &str = "type";
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
    pub const CA_CERT: &str = "pathToCACert";
    pub const PRIVATE_KEY: &str = "pathToPrivateKey";
    pub const CLIENT_CERT: &str = "pathToClientCert";
    /// Extended certificate sub-mode; only registered when the extended
    /// certificates model is enabled.
    pub const MODE: &str = "mode";
}

/// Security mode for connecting to a broker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrokerSecurityType {
    /// No credentials.
    #[default]
    #[serde(rename = "anonymous")]
    Anonymous,
    /// Username/password credentials.
    #[serde(rename = "basic")]
    Basic,
    /// X.509 certificate chain.
    #[serde(rename = "certificates")]
    Certificates,
}

impl BrokerSecurityType {
    /// All modes, in selector order.
    pub const ALL: [Self; 3] = [Self::Anonymous, Self::Basic, Self::Certificates];

    /// The wire tag carried in the `type` field.
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Basic => "basic",
            Self::Certificates => "certificates",
        }
    }
}

/// Certificate sub-mode in the extended certificates model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeType {
    #[default]
    #[serde(rename = "None")]
    None,
    #[serde(rename = "TLS")]
    Tls,
}

impl ModeType {
    /// All sub-modes, in selector order.
    pub const ALL: [Self; 2] = [Self::None, Self::Tls];

    /// The wire tag carried in the `mode` field.
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Tls => "TLS",
        }
    }
}

/// Serialization helpers for `SecretString` fields.
mod secret_string {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize as DeserializeTrait, Serialize as SerializeTrait};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        secret.expose_secret().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SecretString::new(s.into()))
    }
}

/// Serialization helpers for `Option<SecretString>` fields.
mod opt_secret_string {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize as DeserializeTrait, Serialize as SerializeTrait};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(secret: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        secret
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(s.map(|s| SecretString::new(s.into())))
    }
}

/// Typed view of a propagated security configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SecurityConfig {
    #[serde(rename = "anonymous")]
    Anonymous,
    #[serde(rename = "basic")]
    Basic {
        username: String,
        #[serde(with = "secret_string")]
        password: SecretString,
    },
    #[serde(rename = "certificates")]
    Certificates {
        #[serde(rename = "pathToCACert")]
        path_to_ca_cert: String,
        #[serde(rename = "pathToPrivateKey")]
        path_to_private_key: String,
        #[serde(rename = "pathToClientCert")]
        path_to_client_cert: String,
        /// Present only for the extended certificates model.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mode: Option<ModeType>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        #[serde(
            default,
            with = "opt_secret_string",
            skip_serializing_if = "Option::is_none"
        )]
        password: Option<SecretString>,
    },
}

/// Nested security-configuration control.
///
/// The `type` discriminant selects which credential fields are active:
/// anonymous needs none, basic needs username/password, certificates needs
/// the three certificate paths. With the extended certificates model the
/// certificate mode also activates username, password, and the `mode`
/// sub-mode field, seeding `mode` to [`ModeType::None`] when it is empty.
#[derive(Debug)]
pub struct SecurityConfigControl {
    inner: CompositeControl,
    extend_certificates: bool,
}

impl SecurityConfigControl {
    /// Builds the control, with or without the extended certificates model.
    pub fn new(extend_certificates: bool) -> Self {
        let mut builder =
            CompositeControl::builder(fields::TYPE, BrokerSecurityType::Anonymous.as_tag())
                .text_field(
                    fields::USERNAME,
                    [Validator::Required, Validator::NoLeadTrailSpaces],
                )
                .text_field(fields::PASSWORD, [Validator::NoLeadTrailSpaces])
                .text_field(fields::CA_CERT, [Validator::NoLeadTrailSpaces])
                .text_field(fields::PRIVATE_KEY, [Validator::NoLeadTrailSpaces])
                .text_field(fields::CLIENT_CERT, [Validator::NoLeadTrailSpaces])
                .field_set(
                    BrokerSecurityType::Basic.as_tag(),
                    [fields::USERNAME, fields::PASSWORD],
                );

        let certificate_fields: Vec<&str> = if extend_certificates {
            vec![
                fields::CA_CERT,
                fields::PRIVATE_KEY,
                fields::CLIENT_CERT,
                fields::USERNAME,
                fields::PASSWORD,
                fields::MODE,
            ]
        } else {
            vec![fields::CA_CERT, fields::PRIVATE_KEY, fields::CLIENT_CERT]
        };
        builder = builder.field_set(BrokerSecurityType::Certificates.as_tag(), certificate_fields);

        if extend_certificates {
            builder = builder.text_field(fields::MODE, []).sub_mode(
                fields::MODE,
                ModeType::None.as_tag(),
                BrokerSecurityType::Certificates.as_tag(),
            );
        }

        Self {
            inner: builder.build(),
            extend_certificates,
        }
    }

    /// Whether the extended certificates model is active.
    pub fn extend_certificates(&self) -> bool {
        self.extend_certificates
    }

    /// The currently selected security mode.
    pub fn security_type(&self) -> BrokerSecurityType {
        match self.inner.discriminant_tag() {
            "basic" => BrokerSecurityType::Basic,
            "certificates" => BrokerSecurityType::Certificates,
            _ => BrokerSecurityType::Anonymous,
        }
    }

    /// Selects a security mode, as the mode selector widget would.
    pub fn set_type(&mut self, security_type: BrokerSecurityType) {
        self.inner.set_field(fields::TYPE, security_type.as_tag());
    }

    /// Accepts an externally supplied configuration from the host form.
    pub fn write_value(&mut self, value: Option<CompositeValue>) {
        self.inner.write_value(value);
    }

    /// Applies a single field edit.
    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.inner.set_field(name, value);
    }

    /// Registers the host form's change callback.
    pub fn register_on_change(&mut self, listener: impl FnMut(&CompositeValue) + 'static) {
        self.inner.register_on_change(listener);
    }

    /// Drops the registered change listener.
    pub fn clear_on_change(&mut self) {
        self.inner.clear_on_change();
    }

    /// Enables or disables the whole control.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.inner.set_disabled(disabled);
    }

    /// Aggregate pass/fail over the active credential fields.
    pub fn validate(&self) -> Result<(), CompositeInvalid> {
        self.inner.validate()
    }

    /// Convenience wrapper over [`SecurityConfigControl::validate`].
    pub fn is_valid(&self) -> bool {
        self.inner.is_valid()
    }

    /// Per-field violations, for diagnostics.
    pub fn field_errors(&self) -> std::collections::BTreeMap<String, Vec<FieldError>> {
        self.inner.field_errors()
    }

    /// The propagated configuration (active fields only).
    pub fn value(&self) -> CompositeValue {
        self.inner.value()
    }

    /// The full edit buffer, including inactive fields.
    pub fn raw_value(&self) -> CompositeValue {
        self.inner.raw_value()
    }

    /// Whether a field is currently active.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.inner.is_enabled(name)
    }

    /// Typed view of the propagated configuration.
    pub fn security_config(&self) -> Result<SecurityConfig, serde_json::Error> {
        serde_json::from_value(serde_json::to_value(self.value())?)
    }
}

impl Default for SecurityConfigControl {
    fn default() -> Self {
        Self::new(false)
    }
}
