mod tags;
pub use tags::Tags;

mod instance;
pub use instance::Instance;

mod filter;
pub use filter::{Filter, Predicate};

mod constants;
pub use constants::{DEFAULT_RETRIES, GROUP_TAG, NAME_TAG};

/// Opaque identifier of an instance in the directory (e.g. `i-0abc123`).
pub type InstanceId = String;
