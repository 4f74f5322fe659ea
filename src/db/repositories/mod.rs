pub mod admin;
pub mod book;
pub mod session;
pub mod word;
