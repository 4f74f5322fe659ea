pub use super::admin_sessions::Entity as AdminSessions;
pub use super::admin_users::Entity as AdminUsers;
pub use super::books::Entity as Books;
pub use super::words::Entity as Words;
