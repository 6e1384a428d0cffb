//! Argon2id password hashing and verification over PHC strings.

use std::fmt;
use std::sync::Arc;

use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use phcpass_core::config::hasher::HasherConfig;

use super::error::{HashError, KdfError, SaltError, VerifyError};
use super::kdf::{Argon2idKdf, KeyDerivation};
use super::params::{Parameters, key_length_for};
use super::salt::{OsSaltGenerator, SaltGenerator};
use crate::phc::{self, PhcRecord};

/// Hash-and-verify contract shared by password hashers.
pub trait PasswordHasher: Send + Sync {
    /// Hashes `password` with a fresh salt and returns the PHC string.
    fn hash(&self, password: &str) -> Result<String, HashError>;

    /// Checks `password` against a PHC string.
    ///
    /// Returns `Ok(false)` on a wrong password. Errors are reserved for
    /// malformed or unsupported input.
    fn is_same(&self, password: &str, encoded: &str) -> Result<bool, VerifyError>;
}

/// Password hasher producing `$argon2id$v=19$m=..,t=..,p=..$salt$hash` strings.
///
/// Immutable after construction; clones share the salt generator and KDF.
#[derive(Clone)]
pub struct Argon2idHasher {
    params: Parameters,
    salt: Arc<dyn SaltGenerator>,
    kdf: Arc<dyn KeyDerivation>,
}

impl Argon2idHasher {
    /// Creates a hasher from configuration, using the OS salt generator.
    pub fn new(config: &HasherConfig) -> Self {
        Self::builder()
            .with_parameters(Parameters::from(config))
            .with_salt_generator(OsSaltGenerator::new(config.salt_length))
            .build()
    }

    /// Starts a builder with default parameters.
    pub fn builder() -> Argon2idHasherBuilder {
        Argon2idHasherBuilder::default()
    }

    /// Parameters used for new hashes.
    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Derives a hash for `password` against a known salt and assembles the
    /// record. The salt is copied into the record.
    pub fn derive_with_salt(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &Parameters,
    ) -> Result<PhcRecord, HashError> {
        derive_with_salt(self.kdf.as_ref(), password, salt, params)
    }

    /// Decodes a PHC string and binds its parameters.
    ///
    /// Checks the algorithm id, the version and the `m, t, p` schema; the key
    /// length is taken from the decoded hash.
    pub fn decode(&self, encoded: &str) -> Result<(PhcRecord, Parameters), VerifyError> {
        let record = phc::decode(encoded)?;

        let expected_id = self.kdf.algorithm_id();
        if record.id() != expected_id {
            warn!(found = %record.id(), expected = %expected_id, "Unsupported hashing function");
            return Err(VerifyError::UnsupportedAlgorithm {
                found: record.id().to_string(),
            });
        }

        let expected_version = self.kdf.version().to_string();
        if record.version() != Some(expected_version.as_str()) {
            let found = record.version().unwrap_or_default().to_string();
            warn!(found = %found, expected = %expected_version, "Unsupported version");
            return Err(VerifyError::UnsupportedVersion {
                found,
                expected: expected_version,
            });
        }

        let mut params = Parameters::from_pairs(record.params(), 0)?;
        params.key_length = key_length_for(record.hash().unwrap_or_default())?;

        if record.salt().is_none() {
            return Err(VerifyError::MissingSalt);
        }
        if record.hash().is_none() {
            return Err(VerifyError::MissingHash);
        }

        Ok((record, params))
    }

    /// Whether `encoded` was produced with parameters other than the ones
    /// this hasher uses for new hashes.
    pub fn needs_rehash(&self, encoded: &str) -> Result<bool, VerifyError> {
        let (_, params) = self.decode(encoded)?;
        Ok(params != self.params)
    }
}

impl PasswordHasher for Argon2idHasher {
    fn hash(&self, password: &str) -> Result<String, HashError> {
        let salt = self.salt.generate()?;

        debug!(
            algorithm = %self.kdf.algorithm_id(),
            m = self.params.memory,
            t = self.params.time,
            p = self.params.parallelism,
            salt_len = salt.len(),
            "Hashing password"
        );

        let record = self.derive_with_salt(password.as_bytes(), &salt, &self.params)?;
        Ok(record.to_string())
    }

    fn is_same(&self, password: &str, encoded: &str) -> Result<bool, VerifyError> {
        let (record, params) = self.decode(encoded)?;
        let salt = record.salt().ok_or(VerifyError::MissingSalt)?;
        let expected = record.hash().ok_or(VerifyError::MissingHash)?;

        debug!(
            m = params.memory,
            t = params.time,
            p = params.parallelism,
            key_length = params.key_length,
            "Verifying password"
        );

        let derived = self.derive_with_salt(password.as_bytes(), salt, &params)?;
        Ok(constant_time_eq(
            derived.hash().unwrap_or_default(),
            expected,
        ))
    }
}

impl Default for Argon2idHasher {
    fn default() -> Self {
        Self::new(&HasherConfig::default())
    }
}

impl fmt::Debug for Argon2idHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argon2idHasher")
            .field("algorithm", &self.kdf.algorithm_id())
            .field("version", &self.kdf.version())
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Argon2idHasher`].
#[derive(Default)]
pub struct Argon2idHasherBuilder {
    params: Parameters,
    salt: Option<Arc<dyn SaltGenerator>>,
    kdf: Option<Arc<dyn KeyDerivation>>,
}

impl Argon2idHasherBuilder {
    /// Sets the parameters used for new hashes.
    pub fn with_parameters(mut self, params: Parameters) -> Self {
        self.params = params;
        self
    }

    /// Replaces the default 16-byte OS salt generator.
    pub fn with_salt_generator(mut self, generator: impl SaltGenerator + 'static) -> Self {
        self.salt = Some(Arc::new(generator));
        self
    }

    /// Replaces the Argon2id key derivation.
    pub fn with_kdf(mut self, kdf: impl KeyDerivation + 'static) -> Self {
        self.kdf = Some(Arc::new(kdf));
        self
    }

    /// Builds the hasher.
    pub fn build(self) -> Argon2idHasher {
        Argon2idHasher {
            params: self.params,
            salt: self
                .salt
                .unwrap_or_else(|| Arc::new(OsSaltGenerator::default())),
            kdf: self.kdf.unwrap_or_else(|| Arc::new(Argon2idKdf)),
        }
    }
}

/// Runs `kdf` against a known salt and assembles the resulting record.
///
/// The salt is copied before derivation, so the record never aliases the
/// caller's buffer. An empty salt or an empty derived hash is an error, as
/// neither can be written to a PHC string.
pub fn derive_with_salt<K>(
    kdf: &K,
    password: &[u8],
    salt: &[u8],
    params: &Parameters,
) -> Result<PhcRecord, HashError>
where
    K: KeyDerivation + ?Sized,
{
    if salt.is_empty() {
        return Err(SaltError::new("empty salt").into());
    }

    let salt = salt.to_vec();
    let hash = kdf.derive(password, &salt, params)?;
    if hash.is_empty() {
        return Err(KdfError::Other(format!("{} produced an empty hash", kdf.algorithm_id())).into());
    }

    Ok(PhcRecord::new(kdf.algorithm_id())?
        .with_version(kdf.version().to_string())?
        .with_params(params.to_pairs())?
        .with_salt_and_hash(salt, hash))
}

/// Length-exact comparison whose timing does not depend on where the
/// inputs first differ.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::error::ValidationError;
    use crate::phc::FormatError;

    const SMALL: Parameters = Parameters {
        memory: 256,
        time: 2,
        parallelism: 1,
        key_length: 32,
    };

    fn fixed_salt(salt: &'static [u8]) -> impl Fn() -> Result<Vec<u8>, SaltError> + Send + Sync {
        move || Ok(salt.to_vec())
    }

    fn small_hasher() -> Argon2idHasher {
        Argon2idHasher::builder().with_parameters(SMALL).build()
    }

    #[test]
    fn test_hash_format() {
        let encoded = small_hasher().hash("password").unwrap();
        assert!(encoded.starts_with("$argon2id$v=19$m=256,t=2,p=1$"));

        let record = phc::decode(&encoded).unwrap();
        assert_eq!(record.salt().unwrap().len(), 16);
        assert_eq!(record.hash().unwrap().len(), 32);
    }

    #[test]
    fn test_hash_uses_fresh_salt() {
        let hasher = small_hasher();
        assert_ne!(hasher.hash("password").unwrap(), hasher.hash("password").unwrap());
    }

    #[test]
    fn test_hash_is_deterministic_with_fixed_salt() {
        let hasher = Argon2idHasher::builder()
            .with_parameters(SMALL)
            .with_salt_generator(fixed_salt(b"somesalt"))
            .build();
        assert_eq!(
            hasher.hash("password").unwrap(),
            "$argon2id$v=19$m=256,t=2,p=1$c29tZXNhbHQ$nf65EOgLrQMR/uIPnA4rEsF5h7TKyQwu9U1bMCHGi/4"
        );
        assert_eq!(hasher.hash("password").unwrap(), hasher.hash("password").unwrap());
    }

    #[test]
    fn test_is_same() {
        let hasher = small_hasher();
        let encoded = hasher.hash("password").unwrap();

        assert!(hasher.is_same("password", &encoded).unwrap());
        assert!(!hasher.is_same("", &encoded).unwrap());
        assert!(!hasher.is_same("pwouet", &encoded).unwrap());
        assert!(!hasher.is_same("passwore", &encoded).unwrap());
    }

    #[test]
    fn test_salt_sensitivity() {
        let a = small_hasher()
            .derive_with_salt(b"password", b"somesalt", &SMALL)
            .unwrap();
        let b = small_hasher()
            .derive_with_salt(b"password", b"somesalu", &SMALL)
            .unwrap();
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn test_verify_uses_encoded_parameters() {
        let producer = Argon2idHasher::builder()
            .with_parameters(Parameters {
                memory: 512,
                time: 3,
                parallelism: 2,
                key_length: 24,
            })
            .build();
        let encoded = producer.hash("password").unwrap();

        let verifier = small_hasher();
        let (_, params) = verifier.decode(&encoded).unwrap();
        assert_eq!(
            params,
            Parameters {
                memory: 512,
                time: 3,
                parallelism: 2,
                key_length: 24,
            }
        );
        assert!(verifier.is_same("password", &encoded).unwrap());
        assert!(verifier.needs_rehash(&encoded).unwrap());
        assert!(!producer.needs_rehash(&encoded).unwrap());
    }

    #[test]
    fn test_unsupported_algorithm() {
        let err = small_hasher()
            .is_same("password", "$other$v=19$m=256,t=2,p=1$c29tZXNhbHQ$AAAAAAAAAAAAAAAAAAAAAA")
            .unwrap_err();
        assert!(matches!(err, VerifyError::UnsupportedAlgorithm { ref found } if found == "other"));
    }

    #[test]
    fn test_unsupported_version() {
        let err = small_hasher()
            .is_same("password", "$argon2id$v=16$m=256,t=2,p=1$c29tZXNhbHQ$AAAAAAAAAAAAAAAAAAAAAA")
            .unwrap_err();
        assert!(matches!(
            err,
            VerifyError::UnsupportedVersion { ref found, ref expected } if found == "16" && expected == "19"
        ));

        let err = small_hasher()
            .is_same("password", "$argon2id$m=256,t=2,p=1$c29tZXNhbHQ$AAAAAAAAAAAAAAAAAAAAAA")
            .unwrap_err();
        assert!(matches!(err, VerifyError::UnsupportedVersion { ref found, .. } if found.is_empty()));
    }

    #[test]
    fn test_params_out_of_order() {
        let err = small_hasher()
            .is_same("password", "$argon2id$v=19$t=2,m=256,p=1$c29tZXNhbHQ$AAAAAAAAAAAAAAAAAAAAAA")
            .unwrap_err();
        assert!(matches!(
            err,
            VerifyError::Validation(ValidationError::ParamOrder { .. })
        ));
    }

    #[test]
    fn test_malformed_input() {
        let err = small_hasher().is_same("password", "not a hash").unwrap_err();
        assert!(matches!(err, VerifyError::Format(FormatError::Malformed(_))));
    }

    #[test]
    fn test_missing_hash_is_rejected() {
        let hasher = small_hasher();
        let err = hasher
            .is_same("password", "$argon2id$v=19$m=256,t=2,p=1$c29tZXNhbHQ")
            .unwrap_err();
        assert!(matches!(err, VerifyError::MissingHash));

        let err = hasher
            .is_same("password", "$argon2id$v=19$m=256,t=2,p=1")
            .unwrap_err();
        assert!(matches!(err, VerifyError::MissingSalt));
    }

    #[test]
    fn test_salt_generation_failure() {
        let hasher = Argon2idHasher::builder()
            .with_parameters(SMALL)
            .with_salt_generator(|| -> Result<Vec<u8>, SaltError> {
                Err(SaltError::new("entropy unavailable"))
            })
            .build();
        assert!(matches!(
            hasher.hash("password"),
            Err(HashError::SaltGeneration(_))
        ));
    }

    #[test]
    fn test_derivation_failure() {
        let hasher = Argon2idHasher::builder()
            .with_parameters(SMALL)
            .with_salt_generator(fixed_salt(b"abc"))
            .build();
        assert!(matches!(
            hasher.hash("password"),
            Err(HashError::Derivation(KdfError::Argon2(_)))
        ));
    }

    /// Accepts any input and returns a fixed-length key of zeros.
    struct LenientKdf;

    impl KeyDerivation for LenientKdf {
        fn algorithm_id(&self) -> &str {
            "argon2id"
        }

        fn version(&self) -> u32 {
            19
        }

        fn derive(
            &self,
            _password: &[u8],
            _salt: &[u8],
            params: &Parameters,
        ) -> Result<Vec<u8>, KdfError> {
            Ok(vec![0; params.key_length as usize])
        }
    }

    #[test]
    fn test_empty_salt_is_rejected() {
        let hasher = Argon2idHasher::builder()
            .with_kdf(LenientKdf)
            .with_salt_generator(fixed_salt(b""))
            .build();
        assert!(matches!(
            hasher.hash("password"),
            Err(HashError::SaltGeneration(_))
        ));
    }

    #[test]
    fn test_empty_hash_is_rejected() {
        let hasher = Argon2idHasher::builder()
            .with_parameters(Parameters {
                key_length: 0,
                ..SMALL
            })
            .with_kdf(LenientKdf)
            .with_salt_generator(fixed_salt(b"somesalt"))
            .build();
        assert!(matches!(
            hasher.hash("password"),
            Err(HashError::Derivation(KdfError::Other(_)))
        ));

        let encoded = Argon2idHasher::builder()
            .with_kdf(LenientKdf)
            .with_salt_generator(fixed_salt(b"somesalt"))
            .build()
            .hash("password")
            .unwrap();
        assert!(encoded.ends_with("$c29tZXNhbHQ$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"));
    }

    #[test]
    fn test_decode_reports_param_count() {
        let err = small_hasher()
            .decode("$argon2id$v=19$t=2,m=256$c29tZXNhbHQ$AAAAAAAAAAAAAAAAAAAAAA")
            .unwrap_err();
        assert!(matches!(
            err,
            VerifyError::Validation(ValidationError::ParamCount { found: 2 })
        ));
    }

    #[test]
    fn test_derive_with_salt_copies_salt() {
        let mut salt = b"somesalt".to_vec();
        let record = small_hasher()
            .derive_with_salt(b"password", &salt, &SMALL)
            .unwrap();
        salt[0] = b'X';
        assert_eq!(record.salt(), Some(&b"somesalt"[..]));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_hasher_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<Argon2idHasher>();
    }
}
