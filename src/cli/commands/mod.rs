mod catalog;
mod seed;
mod users;

pub use catalog::{cmd_list_directors, cmd_list_movies};
pub use seed::cmd_seed;
pub use users::{cmd_create_user, cmd_list_users, cmd_promote};
