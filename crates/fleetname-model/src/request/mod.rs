use serde::{Deserialize, Serialize};

use crate::{
    DEFAULT_RETRIES, InstanceId,
    error::{ModelError, ModelResult},
    policy::{NamingPolicy, SettleWindow},
};

/// Everything the engine needs to name one instance.
///
/// Fields cover:
/// - the target (`instance_id`)
/// - how the name is chosen (`policy`)
/// - guard against renaming (`overwrite`)
/// - allocation loop tuning (`retries`, `settle`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamingRequest {
    /// Directory identifier of the instance to name.
    pub instance_id: InstanceId,
    /// Naming policy to apply.
    pub policy: NamingPolicy,
    /// Allow replacing a name the instance already carries.
    #[serde(default)]
    pub overwrite: bool,
    /// Failed attempts (collisions, verification misses, directory errors) tolerated before giving up.
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Wait window between writing a candidate and verifying it.
    #[serde(default)]
    pub settle: SettleWindow,
}

fn default_retries() -> u32 {
    DEFAULT_RETRIES
}

impl NamingRequest {
    /// Request with default retry budget and settle window.
    ///
    /// # Examples
    /// ```
    /// use fleetname_model::{DEFAULT_RETRIES, NamingPolicy, NamingRequest};
    ///
    /// let req = NamingRequest::new("i-0abc", NamingPolicy::GroupPrefix).with_retries(3);
    /// assert_eq!(req.retries, 3);
    /// assert_ne!(req.retries, DEFAULT_RETRIES);
    /// assert!(req.validate().is_ok());
    /// ```
    pub fn new(instance_id: impl Into<InstanceId>, policy: NamingPolicy) -> Self {
        Self {
            instance_id: instance_id.into().trim().to_string(),
            policy,
            overwrite: false,
            retries: DEFAULT_RETRIES,
            settle: SettleWindow::default(),
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_settle(mut self, settle: SettleWindow) -> Self {
        self.settle = settle;
        self
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.instance_id.trim().is_empty() {
            return Err(ModelError::EmptyInstanceId);
        }
        if let NamingPolicy::Explicit(name) | NamingPolicy::Prefix(name) = &self.policy {
            if name.trim().is_empty() {
                return Err(ModelError::Invalid(format!(
                    "{} policy requires a non-empty value",
                    self.policy.kind()
                )));
            }
        }
        self.settle.validate()
    }
}
