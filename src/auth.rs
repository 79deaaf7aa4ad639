//! Authentication gate in front of the calculator
//!
//! The calculator only needs a yes/no answer. `CredentialStore` compares
//! BLAKE2b-512 hex digests of the username and password against a
//! provisioned file, so no plain credentials live in the binary or on disk.
//! The digests match `hashlib.blake2b(value).hexdigest()`, so existing
//! credential files load unchanged.

use crate::error::{CalcError, CalcResult};
use blake2::{Blake2b512, Digest};
use csv::{ReaderBuilder, Trim};
use log::{info, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Boolean authorization provider
pub trait Authenticator: Send + Sync {
    fn authorize(&self, username: &str, password: &str) -> bool;
}

/// Gate that lets every request through
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAccess;

impl Authenticator for OpenAccess {
    fn authorize(&self, _username: &str, _password: &str) -> bool {
        true
    }
}

pub const DIGEST_LEN: usize = 64;

type CredentialDigest = [u8; DIGEST_LEN];

fn hash(value: &str) -> CredentialDigest {
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&Blake2b512::digest(value.as_bytes()));
    out
}

/// Lowercase hex BLAKE2b-512 digest of a credential
pub fn digest(value: &str) -> String {
    hex::encode(hash(value))
}

fn digests_equal(a: &CredentialDigest, b: &CredentialDigest) -> bool {
    // Constant time: no early exit on the first differing byte
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[derive(Debug, serde::Deserialize)]
struct CredentialRow {
    username_digest: String,
    password_digest: String,
}

/// Digest pairs of the users allowed in
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    entries: Vec<(CredentialDigest, CredentialDigest)>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user by plain credentials; only digests are kept
    pub fn with_user(mut self, username: &str, password: &str) -> Self {
        self.entries.push((hash(username), hash(password)));
        self
    }

    /// Load `username_digest,password_digest` rows from a CSV file
    pub fn load<P: AsRef<Path>>(path: P) -> CalcResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| CalcError::DataIntegrity(format!("{}: {}", path.display(), e)))?;
        let store = Self::from_reader(file)?;
        info!("loaded {} credential entries from {}", store.len(), path.display());
        Ok(store)
    }

    pub fn from_reader<R: Read>(reader: R) -> CalcResult<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let mut entries = Vec::new();

        for result in csv_reader.deserialize() {
            let row: CredentialRow = result
                .map_err(|e| CalcError::DataIntegrity(format!("credentials: {}", e)))?;
            let user = parse_digest(&row.username_digest)?;
            let pass = parse_digest(&row.password_digest)?;
            entries.push((user, pass));
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_digest(text: &str) -> CalcResult<CredentialDigest> {
    let mut out = [0u8; DIGEST_LEN];
    hex::decode_to_slice(text, &mut out).map_err(|e| {
        CalcError::DataIntegrity(format!(
            "credentials: bad digest {:?}: {} (expected {} hex characters)",
            text,
            e,
            DIGEST_LEN * 2
        ))
    })?;
    Ok(out)
}

impl Authenticator for CredentialStore {
    fn authorize(&self, username: &str, password: &str) -> bool {
        let user = hash(username);
        let pass = hash(password);
        let granted = self
            .entries
            .iter()
            .fold(false, |found, (u, p)| found | (digests_equal(u, &user) & digests_equal(p, &pass)));
        if !granted {
            warn!("rejected login attempt");
        }
        granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_accepts_only_registered_pair() {
        let store = CredentialStore::new().with_user("actuary", "s3cret");
        assert!(store.authorize("actuary", "s3cret"));
        assert!(!store.authorize("actuary", "wrong"));
        assert!(!store.authorize("someone", "s3cret"));
        assert!(!store.authorize("", ""));
    }

    #[test]
    fn test_empty_store_rejects_everyone() {
        let store = CredentialStore::new();
        assert!(store.is_empty());
        assert!(!store.authorize("actuary", "s3cret"));
    }

    #[test]
    fn test_load_digest_file() {
        let csv = format!(
            "username_digest,password_digest\n{},{}\n",
            digest("actuary"),
            digest("s3cret")
        );
        let store = CredentialStore::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.authorize("actuary", "s3cret"));
    }

    #[test]
    fn test_bad_digest_is_rejected() {
        let csv = "username_digest,password_digest\nnot-hex,abc\n";
        assert!(matches!(
            CredentialStore::from_reader(csv.as_bytes()),
            Err(CalcError::DataIntegrity(_))
        ));
    }

    const ACTUARY_DIGEST: &str = "0502782d47bede0d9d7e8c2a7fe334b6d4abf37b658e9af9f3d2ded39ab68999a5f81c94f511b46d2066ea633ed2396236f3eff2a32a6a39fb58bf0bb86cac28";
    const S3CRET_DIGEST: &str = "f2a9557604e45102a4ced3fbf8528ef42f7d9cab8d505974c12a16c14e27b5753d4536feada3a6cb8135a9b86dacc9de7497f2bf7fbc38cda0d83a6c568f6bce";

    #[test]
    fn test_digest_is_blake2b_512_hex() {
        let d = digest("actuary");
        assert_eq!(d.len(), 128);
        assert_eq!(d, ACTUARY_DIGEST);
        assert_eq!(digest("s3cret"), S3CRET_DIGEST);
    }

    #[test]
    fn test_loads_provisioned_blake2b_digest_file() {
        let csv = format!(
            "username_digest,password_digest\n\
             568622d8836e4856d75132f68bc2cdb16ee788ad6b72f74bc264f9757d8a54ded1c02cf2bb37b59420bc9f43dcd297b9a828d5f673d9a977b68b724650b1442a,\
             db1bc89118ae73eea00e2de5868a96cd25a80c3eb6cd62639a921ba5abfc1b6bee91783fc1a1167dc3e14966c56a23237eb635dfb4529f3ddbe533c9b8d609f4\n\
             {},{}\n",
            ACTUARY_DIGEST, S3CRET_DIGEST
        );
        let store = CredentialStore::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.authorize("actuary", "s3cret"));
        assert!(!store.authorize("actuary", "wrong"));
    }

    #[test]
    fn test_short_digest_is_rejected() {
        let csv = format!("username_digest,password_digest\n{},{}\n", &ACTUARY_DIGEST[..64], S3CRET_DIGEST);
        assert!(matches!(
            CredentialStore::from_reader(csv.as_bytes()),
            Err(CalcError::DataIntegrity(_))
        ));
    }
}
