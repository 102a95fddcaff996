mod auth;
mod checkins;

pub use auth::{AuthCommands, AuthLoginArgs};
pub use checkins::CheckinsArgs;
