pub mod entity_ops;
pub mod repository;
pub mod store;

pub use repository::{EntityHistory, EntityRepository, NewDef};
pub use store::MemoryStore;
