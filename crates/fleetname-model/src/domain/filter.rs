use serde::{Deserialize, Serialize};

use crate::{Instance, InstanceId};

/// Single exact-match predicate over an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Predicate {
    /// Instance identifier equals the value.
    InstanceId(InstanceId),
    /// Tag `key` is present and equals `value`.
    Tag { key: String, value: String },
}

impl Predicate {
    pub fn matches(&self, instance: &Instance) -> bool {
        match self {
            Predicate::InstanceId(id) => instance.id == *id,
            Predicate::Tag { key, value } => instance.tag(key) == Some(value.as_str()),
        }
    }
}

/// Conjunction of [`Predicate`]s used when listing instances.
///
/// An empty filter selects the whole visible fleet.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(pub Vec<Predicate>);

impl Filter {
    /// Filter matching every instance.
    pub fn all() -> Self {
        Self(Vec::new())
    }

    /// Filter matching a single instance by identifier.
    pub fn instance_id(id: impl Into<InstanceId>) -> Self {
        Self(vec![Predicate::InstanceId(id.into())])
    }

    /// Add a tag equality predicate.
    pub fn and_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push(Predicate::Tag {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if every predicate holds for the instance.
    ///
    /// # Examples
    /// ```
    /// use fleetname_model::{Filter, GROUP_TAG, Instance};
    ///
    /// let web = Instance::new("i-1").with_tag(GROUP_TAG, "web-");
    /// assert!(Filter::all().and_tag(GROUP_TAG, "web-").matches(&web));
    /// assert!(!Filter::instance_id("i-2").matches(&web));
    /// ```
    pub fn matches(&self, instance: &Instance) -> bool {
        self.0.iter().all(|p| p.matches(instance))
    }
}
