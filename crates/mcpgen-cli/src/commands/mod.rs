pub mod command;
pub mod generate;
pub mod guide;
pub mod preview;
pub mod schema;
pub mod tools;
pub mod validate;
