pub mod create;
pub mod delete;
pub mod update;

pub use create::CreateEntityCommand;
pub use delete::DeleteEntityCommand;
pub use update::UpdateEntityCommand;
