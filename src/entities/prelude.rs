pub use super::logs::Entity as Logs;
pub use super::users::Entity as Users;
