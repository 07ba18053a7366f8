pub mod cell;
pub mod dates;
pub mod model;
pub mod registry;
pub mod roles;

pub use cell::Cell;
pub use model::{NormalizedFile, Row, StoreRef, UploadedFile};
pub use registry::{Registry, RegistryError, StoreAlias, Template};
pub use roles::ColumnRole;
