pub mod audit;
pub mod dataset;
pub mod def;
pub mod entity;
pub mod property_map;
pub mod tri;

pub use audit::{Audit, AuditAction};
pub use dataset::{Dataset, Property};
pub use def::{Def, LABEL_KEY};
pub use entity::{Actor, Entity};
pub use property_map::PropertyMap;
pub use tri::Tri;
