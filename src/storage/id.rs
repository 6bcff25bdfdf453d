use uuid::Uuid;

/// Turns locations into stable, opaque identifiers for use in URLs.
///
/// The location is salted with a secret before hashing into a name-based
/// (v5) UUID, so a client cannot compute a track's ID from a known path.
/// This is obfuscation, not access control.
#[derive(Debug, Clone)]
pub struct IdDeriver {
    secret: String,
}

impl IdDeriver {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    pub fn derive(&self, location: &str) -> String {
        let data = format!("{}:{}", location, self.secret);
        Uuid::new_v5(&Uuid::NAMESPACE_URL, data.as_bytes()).to_string()
    }
}
