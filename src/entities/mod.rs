pub mod prelude;

pub mod admin_sessions;
pub mod admin_users;
pub mod books;
pub mod words;
