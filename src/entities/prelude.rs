pub use super::cast_members::Entity as CastMembers;
pub use super::categories::Entity as Categories;
pub use super::category_genre::Entity as CategoryGenre;
pub use super::category_video::Entity as CategoryVideo;
pub use super::genre_video::Entity as GenreVideo;
pub use super::genres::Entity as Genres;
pub use super::videos::Entity as Videos;
