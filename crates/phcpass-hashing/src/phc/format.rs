//! PHC record model, grammar and text conversion.

use std::fmt::{self, Write as _};
use std::str::FromStr;
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD as B64;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::{FormatError, Segment};

/// Anchored PHC grammar.
///
/// The optional version group is tried before the parameter group, so a
/// segment like `v=19,m=1` or `v=abc` only matches as a parameter list.
static FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^",
        r"\$([a-z0-9-]{1,32})",
        r"(?:\$v=([0-9]+))?",
        r"(?:\$([a-z0-9-]+=[a-zA-Z0-9/+.-]+(?:,[a-z0-9-]+=[a-zA-Z0-9/+.-]+)*))?",
        r"(?:\$([a-zA-Z0-9/+.-]+)(?:\$([a-zA-Z0-9/+.-]+))?)?",
        r"$",
    ))
    .expect("PHC grammar is a valid regex")
});

/// One `name=value` entry of the parameter segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhcParam {
    name: String,
    value: String,
}

impl PhcParam {
    /// Creates a parameter, checking both parts against the grammar.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Result<Self, FormatError> {
        let name = name.into();
        let value = value.into();

        if name.is_empty() || !name.chars().all(is_id_char) {
            return Err(FormatError::InvalidField {
                field: "param name",
                value: name,
            });
        }
        if value.is_empty() || !value.chars().all(is_value_char) {
            return Err(FormatError::InvalidField {
                field: "param value",
                value,
            });
        }

        Ok(Self { name, value })
    }

    /// Creates a parameter from an unsigned integer, which is always valid.
    pub(crate) fn from_uint(name: &'static str, value: u64) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter value, as written in the string.
    pub fn value(&self) -> &str {
        &self.value
    }

    fn reads_as_version(&self) -> bool {
        self.name == "v" && is_version(&self.value)
    }
}

/// Parsed form of one PHC string.
///
/// Built with [`PhcRecord::new`] and the `with_*` methods, or parsed with
/// [`decode`]. A hash can only be attached together with a salt, and empty
/// binaries are stored as absent, so every record encodes to a string that
/// decodes back to an equal record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhcRecord {
    id: String,
    version: Option<String>,
    params: Vec<PhcParam>,
    salt: Option<Vec<u8>>,
    hash: Option<Vec<u8>>,
}

impl PhcRecord {
    /// Starts a record for the given algorithm identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, FormatError> {
        let id = id.into();
        if id.is_empty() || id.len() > 32 || !id.chars().all(is_id_char) {
            return Err(FormatError::InvalidField { field: "id", value: id });
        }

        Ok(Self {
            id,
            version: None,
            params: Vec::new(),
            salt: None,
            hash: None,
        })
    }

    /// Sets the version. Must be decimal digits.
    pub fn with_version(mut self, version: impl Into<String>) -> Result<Self, FormatError> {
        let version = version.into();
        if !is_version(&version) {
            return Err(FormatError::InvalidField {
                field: "version",
                value: version,
            });
        }
        self.version = Some(version);
        Ok(self)
    }

    /// Appends one parameter after checking it.
    pub fn with_param(
        self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, FormatError> {
        let param = PhcParam::new(name, value)?;
        self.with_params([param])
    }

    /// Appends already-built parameters, keeping their order.
    ///
    /// A versionless record cannot hold a lone `v=<digits>` parameter, which
    /// would decode back as the version. Add any following parameters in the
    /// same call, e.g. `v=19,m=1`.
    pub fn with_params(
        mut self,
        params: impl IntoIterator<Item = PhcParam>,
    ) -> Result<Self, FormatError> {
        self.params.extend(params);
        if let (None, [lone]) = (&self.version, self.params.as_slice()) {
            if lone.reads_as_version() {
                return Err(FormatError::InvalidField {
                    field: "leading param",
                    value: format!("v={}", lone.value),
                });
            }
        }
        Ok(self)
    }

    /// Sets the salt and clears any hash.
    pub fn with_salt(mut self, salt: impl Into<Vec<u8>>) -> Self {
        self.salt = non_empty(salt.into());
        self.hash = None;
        self
    }

    /// Sets both salt and hash. The hash is dropped if the salt is empty.
    pub fn with_salt_and_hash(mut self, salt: impl Into<Vec<u8>>, hash: impl Into<Vec<u8>>) -> Self {
        self.salt = non_empty(salt.into());
        self.hash = self.salt.as_ref().and_then(|_| non_empty(hash.into()));
        self
    }

    /// Algorithm identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Version, if present.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Parameters in wire order.
    pub fn params(&self) -> &[PhcParam] {
        &self.params
    }

    /// Value of the first parameter named `name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Decoded salt bytes, if present.
    pub fn salt(&self) -> Option<&[u8]> {
        self.salt.as_deref()
    }

    /// Decoded hash bytes, if present.
    pub fn hash(&self) -> Option<&[u8]> {
        self.hash.as_deref()
    }
}

/// Parses a PHC string.
pub fn decode(text: &str) -> Result<PhcRecord, FormatError> {
    let caps = FORMAT
        .captures(text)
        .ok_or_else(|| FormatError::Malformed(text.to_string()))?;

    let params = caps
        .get(3)
        .map(|m| {
            m.as_str()
                .split(',')
                .filter_map(|pair| pair.split_once('='))
                .map(|(name, value)| PhcParam {
                    name: name.to_string(),
                    value: value.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    let (salt, hash) = match caps.get(4) {
        Some(salt) => {
            let salt = decode_segment(Segment::Salt, salt.as_str())?;
            let hash = caps
                .get(5)
                .map(|hash| decode_segment(Segment::Hash, hash.as_str()))
                .transpose()?;
            (Some(salt), hash)
        }
        None => (None, None),
    };

    Ok(PhcRecord {
        id: caps[1].to_string(),
        version: caps.get(2).map(|m| m.as_str().to_string()),
        params,
        salt,
        hash,
    })
}

/// Serializes a record. Same as its `Display` output.
pub fn encode(record: &PhcRecord) -> String {
    record.to_string()
}

fn decode_segment(segment: Segment, text: &str) -> Result<Vec<u8>, FormatError> {
    B64.decode(text)
        .map_err(|source| FormatError::Encoding { segment, source })
}

fn non_empty(bytes: Vec<u8>) -> Option<Vec<u8>> {
    (!bytes.is_empty()).then_some(bytes)
}

fn is_version(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

fn is_value_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | '+' | '.' | '-')
}

impl fmt::Display for PhcRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.id)?;

        if let Some(version) = self.version.as_deref().filter(|v| !v.is_empty()) {
            write!(f, "$v={version}")?;
        }

        if !self.params.is_empty() {
            f.write_char('$')?;
            for (i, param) in self.params.iter().enumerate() {
                if i > 0 {
                    f.write_char(',')?;
                }
                write!(f, "{}={}", param.name, param.value)?;
            }
        }

        if let Some(salt) = self.salt.as_deref().filter(|s| !s.is_empty()) {
            write!(f, "${}", B64.encode(salt))?;

            if let Some(hash) = self.hash.as_deref().filter(|h| !h.is_empty()) {
                write!(f, "${}", B64.encode(hash))?;
            }
        }

        Ok(())
    }
}

impl FromStr for PhcRecord {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

impl Serialize for PhcRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PhcRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        decode(&text).map_err(serde::de::Error::custom)
    }
}
