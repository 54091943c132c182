//! Typed wrappers over the request pipeline, one per backend area.

pub mod auth;
pub mod catalogs;
pub mod events;
pub mod guests;
pub mod users;

pub use auth::{AuthService, LoginResponse};
pub use catalogs::CatalogsService;
pub use events::EventsService;
pub use guests::GuestsService;
pub use users::UsersService;
