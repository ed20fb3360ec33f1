mod domain;
pub use domain::{DEFAULT_RETRIES, GROUP_TAG, NAME_TAG};
pub use domain::{Filter, Instance, InstanceId, Predicate, Tags};

mod error;
pub use error::{ModelError, ModelResult};

mod policy;
pub use policy::{NamingPolicy, PolicyKind, SettleWindow};

mod request;
pub use request::NamingRequest;
