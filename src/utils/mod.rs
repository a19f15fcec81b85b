pub mod dsn;
pub mod setting;
