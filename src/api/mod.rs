//! API Layer
//!
//! The wire codec, the typed error taxonomy, and one remote client per
//! domain. Clients return decoded DTOs or classified errors; they never
//! retry, never de-duplicate in-flight calls, and never touch the local
//! store. Conversion and caching belong to the sync layer.

mod client;
mod error;
mod event_api;
mod identity_api;
mod notification_api;
mod outing_api;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use event_api::{EventApi, EventClient, EventDto, LocationDto, OrganizerDto, TicketTypeDto};
pub use identity_api::{IdentityApi, IdentityClient, IdentityDto, SignupRequest};
pub use notification_api::{NotificationApi, NotificationClient, NotificationDto};
pub use outing_api::{
    ActivityDto, DebtDto, NewActivity, NewOuting, OutingApi, OutingClient, OutingDto,
};
