pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, RegisterInput, normalize_email};
pub use auth_service_impl::SeaOrmAuthService;

pub mod director_service;
pub mod director_service_impl;
pub use director_service::{DirectorError, DirectorService};
pub use director_service_impl::SeaOrmDirectorService;

pub mod movie_service;
pub mod movie_service_impl;
pub use movie_service::{MovieError, MovieService};
pub use movie_service_impl::SeaOrmMovieService;

pub mod filter;
pub mod permissions;
pub use permissions::can_modify;
