//! Wire types of the EventDesk backend.

pub mod catalog;
pub mod event;
pub mod guest;
pub mod page;
pub mod user;

pub use catalog::{Addon, CatalogData, CatalogElement, CatalogKind, EventGroup, GuestType, Package};
pub use event::{
    CalendarEvent, CalendarRange, CreateEventPayload, EventDto, EventListItem, EventStats,
    EventsQuery, Slug, UpdateEventPayload,
};
pub use guest::{Assistance, Guest, GuestPayload};
pub use page::{Page, SortOrder, TableQuery};
pub use user::{CreateUserData, Person, SelectClient, UpdateUserData, User};
