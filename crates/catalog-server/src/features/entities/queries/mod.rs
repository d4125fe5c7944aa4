pub mod exists;
pub mod get;
pub mod list;

pub use exists::EntityExistsQuery;
pub use get::GetEntityQuery;
pub use list::ListEntitiesQuery;
