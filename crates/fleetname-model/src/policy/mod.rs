mod naming;
pub use naming::{NamingPolicy, PolicyKind};

mod settle;
pub use settle::SettleWindow;
