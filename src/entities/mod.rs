pub mod prelude;

pub mod behaviors;

pub mod cast_members;
pub mod categories;
pub mod genres;
pub mod videos;

pub mod category_genre;
pub mod category_video;
pub mod genre_video;
