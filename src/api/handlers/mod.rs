pub mod cast_members;
pub mod categories;
pub mod genres;
pub mod health;
pub mod input;
pub mod types;
pub mod videos;

pub use input::FormInput;
pub use types::*;
