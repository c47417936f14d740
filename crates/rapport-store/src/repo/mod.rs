pub mod actions;
pub mod calls;
pub mod relationships;
pub mod users;

pub use actions::{ActionNew, ActionsRepo};
pub use calls::{CallNew, CallsRepo};
pub use relationships::{RelationshipNew, RelationshipsRepo};
pub use users::UsersRepo;
