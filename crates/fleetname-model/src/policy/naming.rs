use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// How the name of an instance is chosen.
///
/// Exactly one policy is active per naming request:
/// - `Explicit`: use the literal name, no allocation happens.
/// - `Prefix`: allocate the lowest free `prefix + n` (n >= 1) across the whole fleet.
/// - `GroupPrefix`: read the instance's scaling group tag and allocate with it as the prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NamingPolicy {
    /// Use this exact name.
    Explicit(String),
    /// Allocate `prefix + n`.
    Prefix(String),
    /// Allocate with the group tag value as the prefix.
    GroupPrefix,
}

/// Payload-free discriminant of [`NamingPolicy`], used for metrics labels and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    Explicit,
    Prefix,
    GroupPrefix,
}

impl PolicyKind {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            PolicyKind::Explicit => "explicit",
            PolicyKind::Prefix => "prefix",
            PolicyKind::GroupPrefix => "group_prefix",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

impl NamingPolicy {
    /// Build a policy from the three mutually exclusive selectors a caller can provide.
    ///
    /// Inputs are trimmed and empty strings count as "not provided".
    /// Providing none is [`ModelError::NoPolicySelected`], providing several is
    /// [`ModelError::ConflictingPolicies`].
    ///
    /// # Examples
    /// ```
    /// use fleetname_model::{ModelError, NamingPolicy};
    ///
    /// let policy = NamingPolicy::from_selectors(None, Some(" worker- "), false).unwrap();
    /// assert_eq!(policy, NamingPolicy::Prefix("worker-".into()));
    ///
    /// let err = NamingPolicy::from_selectors(Some(""), None, false).unwrap_err();
    /// assert!(matches!(err, ModelError::NoPolicySelected));
    /// ```
    pub fn from_selectors(
        name: Option<&str>,
        prefix: Option<&str>,
        from_group: bool,
    ) -> ModelResult<Self> {
        let name = name.map(str::trim).filter(|s| !s.is_empty());
        let prefix = prefix.map(str::trim).filter(|s| !s.is_empty());

        let mut chosen = Vec::with_capacity(3);
        if let Some(n) = name {
            chosen.push(NamingPolicy::Explicit(n.to_string()));
        }
        if let Some(p) = prefix {
            chosen.push(NamingPolicy::Prefix(p.to_string()));
        }
        if from_group {
            chosen.push(NamingPolicy::GroupPrefix);
        }

        match chosen.len() {
            0 => Err(ModelError::NoPolicySelected),
            1 => Ok(chosen.remove(0)),
            _ => {
                let kinds: Vec<&str> = chosen.iter().map(|p| p.kind().as_label()).collect();
                Err(ModelError::ConflictingPolicies(kinds.join(", ")))
            }
        }
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            NamingPolicy::Explicit(_) => PolicyKind::Explicit,
            NamingPolicy::Prefix(_) => PolicyKind::Prefix,
            NamingPolicy::GroupPrefix => PolicyKind::GroupPrefix,
        }
    }
}
