pub mod lifetime;
pub mod retention;
