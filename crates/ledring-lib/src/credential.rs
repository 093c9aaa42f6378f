//! Group id resolution — override, environment, secret file, placeholder.
//!
//! The group id scopes every remote call. It is resolved once, on first use,
//! and frozen for the life of the resolver: later changes to the environment
//! or to the secret file are not observed.

use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Environment variable consulted when no override is configured.
pub const GROUP_ID_ENV: &str = "LEDRING_GROUP_ID";

/// Value used when no source yields a group id.
pub const PLACEHOLDER_GROUP_ID: &str = "unconfigured-group";

/// Default candidate secret files, relative to the working directory.
pub fn default_secret_paths() -> Vec<PathBuf> {
    vec![PathBuf::from("secret.txt"), PathBuf::from("../secret.txt")]
}

/// Where the resolved group id came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Override,
    Environment,
    File(PathBuf),
    Placeholder,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Override => write!(f, "config override"),
            CredentialSource::Environment => write!(f, "environment ({GROUP_ID_ENV})"),
            CredentialSource::File(p) => write!(f, "file ({})", p.display()),
            CredentialSource::Placeholder => write!(f, "placeholder"),
        }
    }
}

/// A resolved group id and its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub group_id: String,
    pub source: CredentialSource,
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Resolves the group id once and caches it.
pub struct CredentialResolver {
    override_value: Option<String>,
    env_var: String,
    env_lookup: EnvLookup,
    secret_paths: Vec<PathBuf>,
    resolved: OnceLock<Credential>,
}

impl fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("override_value", &self.override_value.is_some())
            .field("env_var", &self.env_var)
            .field("secret_paths", &self.secret_paths)
            .field("resolved", &self.resolved.get().map(|c| &c.source))
            .finish()
    }
}

impl CredentialResolver {
    /// Resolver reading the process environment and the given secret files.
    ///
    /// An empty or whitespace-only override counts as unset.
    pub fn new(override_value: Option<String>, secret_paths: Vec<PathBuf>) -> Self {
        Self {
            override_value,
            env_var: GROUP_ID_ENV.to_string(),
            env_lookup: Box::new(|name| std::env::var(name).ok()),
            secret_paths,
            resolved: OnceLock::new(),
        }
    }

    /// Replace the environment lookup (tests avoid touching the real env).
    pub fn with_env_lookup(
        mut self,
        lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.env_lookup = Box::new(lookup);
        self
    }

    /// Resolver that always yields `group_id`.
    pub fn fixed(group_id: impl Into<String>) -> Self {
        Self::new(Some(group_id.into()), Vec::new()).with_env_lookup(|_| None)
    }

    /// The group id, resolving it on first call.
    pub fn group_id(&self) -> &str {
        &self.credential().group_id
    }

    /// The resolved credential, including where it came from.
    ///
    /// Concurrent first callers block on a single resolution.
    pub fn credential(&self) -> &Credential {
        self.resolved.get_or_init(|| {
            let credential = self.resolve_uncached();
            log::info!("group id resolved from {}", credential.source);
            credential
        })
    }

    fn resolve_uncached(&self) -> Credential {
        if let Some(value) = self.override_value.as_deref().and_then(non_empty) {
            return Credential {
                group_id: value,
                source: CredentialSource::Override,
            };
        }
        if let Some(value) = (self.env_lookup)(&self.env_var).as_deref().and_then(non_empty) {
            return Credential {
                group_id: value,
                source: CredentialSource::Environment,
            };
        }
        for path in &self.secret_paths {
            match std::fs::read_to_string(path) {
                Ok(contents) => {
                    if let Some(value) = non_empty(&contents) {
                        return Credential {
                            group_id: value,
                            source: CredentialSource::File(path.clone()),
                        };
                    }
                    log::debug!("secret file {} is empty, skipping", path.display());
                }
                Err(e) => log::debug!("secret file {} unavailable: {e}", path.display()),
            }
        }
        log::warn!("no group id configured, using placeholder");
        Credential {
            group_id: PLACEHOLDER_GROUP_ID.to_string(),
            source: CredentialSource::Placeholder,
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
