//! Cache policy: which modes exist and what each one does per entry state

pub mod mode;
pub mod resolver;

pub use mode::CacheMode;
pub use resolver::{resolve, ActionPlan, EntryState, StoreWrite};
