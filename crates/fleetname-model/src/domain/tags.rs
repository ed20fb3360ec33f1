use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{GROUP_TAG, NAME_TAG};

/// Tags attached to an instance, keyed by tag key.
///
/// Keys are unique within an instance. Ordering carries no meaning, the [`BTreeMap`]
/// only keeps serialized output stable.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(pub BTreeMap<String, String>);

impl Tags {
    /// Create an empty tag set.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns `true` if no tags are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert or overwrite a tag.
    ///
    /// Returns `self` for chaining.
    ///
    /// # Examples
    /// ```
    /// use fleetname_model::{NAME_TAG, Tags};
    ///
    /// let mut tags = Tags::new();
    /// tags.insert(NAME_TAG, "").insert("team", "infra");
    /// assert_eq!(tags.get(NAME_TAG), Some(""));
    /// assert_eq!(tags.name(), None);
    /// ```
    pub fn insert<K, V>(&mut self, key: K, val: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.insert(key.into(), val.into());
        self
    }

    /// Get the raw value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    /// Get the value for a key, treating an empty value as absent.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Current instance name, if one is set.
    pub fn name(&self) -> Option<&str> {
        self.non_empty(NAME_TAG)
    }

    /// Scaling group the instance belongs to, if any.
    pub fn group(&self) -> Option<&str> {
        self.non_empty(GROUP_TAG)
    }

    /// Iterate through all tags as `(&str, &str)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Tags
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::Tags;
    use crate::{GROUP_TAG, NAME_TAG};

    #[test]
    fn insert_overwrites_existing_key() {
        let mut tags = Tags::new();
        tags.insert(NAME_TAG, "worker-1").insert(NAME_TAG, "worker-2");

        assert_eq!(tags.get(NAME_TAG), Some("worker-2"));
        assert_eq!(tags.iter().count(), 1);
    }

    #[test]
    fn empty_values_are_treated_as_absent() {
        let tags: Tags = [(NAME_TAG, ""), (GROUP_TAG, "")].into_iter().collect();

        assert_eq!(tags.get(NAME_TAG), Some(""));
        assert!(tags.name().is_none());
        assert!(tags.group().is_none());
    }

    #[test]
    fn name_and_group_read_well_known_keys() {
        let tags: Tags = [(NAME_TAG, "web-3"), (GROUP_TAG, "web-")].into_iter().collect();

        assert_eq!(tags.name(), Some("web-3"));
        assert_eq!(tags.group(), Some("web-"));
    }

    #[test]
    fn serializes_as_plain_object() {
        let tags: Tags = [("b", "2"), ("a", "1")].into_iter().collect();
        let json = serde_json::to_string(&tags).unwrap();

        assert_eq!(json, r#"{"a":"1","b":"2"}"#);
    }
}
