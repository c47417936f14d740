pub mod action;
pub mod call;
pub mod email;
pub mod ids;
pub mod relationship;
pub mod user;

pub use action::{Action, ActionState, ActionType, Lane};
pub use call::CallEvent;
pub use email::normalize_email;
pub use ids::{ActionId, CallId, RelationshipId, UserId};
pub use relationship::{Cadence, Relationship, Tier};
pub use user::User;
