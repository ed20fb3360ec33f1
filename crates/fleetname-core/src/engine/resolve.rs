use tracing::debug;

use fleetname_model::{GROUP_TAG, Instance, NamingPolicy};

use crate::error::CoreError;

/// What the policy resolver decided for an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Name is final; write it once, no allocation.
    Final(String),
    /// Run the allocation loop under this prefix.
    Allocate { prefix: String },
}

/// Turn a policy into a final name or an allocation prefix.
///
/// Read-only. An instance that already carries a non-empty name is rejected with
/// [`CoreError::AlreadyNamed`] unless `overwrite` is set, whatever the policy.
pub fn resolve(
    instance: &Instance,
    policy: &NamingPolicy,
    overwrite: bool,
) -> Result<Resolution, CoreError> {
    if let Some(existing) = instance.tags.name() {
        if !overwrite {
            return Err(CoreError::AlreadyNamed {
                instance_id: instance.id.clone(),
                name: existing.to_string(),
            });
        }
        debug!(instance = %instance.id, existing, "overwriting existing name");
    }

    match policy {
        NamingPolicy::Explicit(name) => Ok(Resolution::Final(name.trim().to_string())),
        NamingPolicy::Prefix(prefix) => Ok(Resolution::Allocate {
            prefix: prefix.clone(),
        }),
        NamingPolicy::GroupPrefix => match instance.tags.group() {
            Some(group) => {
                debug!(instance = %instance.id, group, "resolved group prefix");
                Ok(Resolution::Allocate {
                    prefix: group.to_string(),
                })
            }
            None => Err(CoreError::NoGroupAttached {
                instance_id: instance.id.clone(),
                tag: GROUP_TAG,
            }),
        },
    }
}
