pub use super::directors::Entity as Directors;
pub use super::movies::Entity as Movies;
pub use super::users::Entity as Users;
