//! Guests of a single event.

use crate::error::{ClientError, ClientResult};
use crate::http::{ApiClient, ApiRequest};
use crate::models::{Guest, Page, TableQuery};
use crate::validation::GuestForm;

#[derive(Clone)]
pub struct GuestsService {
    api: ApiClient,
}

impl GuestsService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Guest table of an event's dashboard.
    pub async fn page(&self, event_id: &str, query: &TableQuery) -> ClientResult<Page<Guest>> {
        let request =
            ApiRequest::get(format!("/api/event/dashboard-table/{}", event_id)).query(query)?;
        self.api.send_json(request).await
    }

    pub async fn get(&self, event_id: &str, guest_id: &str) -> ClientResult<Guest> {
        self.api
            .get_json(&format!("/api/event/{}/guest/{}", event_id, guest_id))
            .await
    }

    pub async fn create(&self, event_id: &str, guest: &GuestForm) -> ClientResult<Guest> {
        guest.validate().map_err(ClientError::Validation)?;
        self.api
            .post_json(&format!("/api/event/{}/guest", event_id), Some(guest))
            .await
    }

    pub async fn update(
        &self,
        event_id: &str,
        guest_id: &str,
        guest: &GuestForm,
    ) -> ClientResult<Guest> {
        guest.validate().map_err(ClientError::Validation)?;
        self.api
            .put_json(
                &format!("/api/event/{}/guest/{}", event_id, guest_id),
                Some(guest),
            )
            .await
    }

    pub async fn delete(&self, event_id: &str, guest_id: &str) -> ClientResult<String> {
        self.api
            .delete_text(&format!("/api/event/{}/guest/{}", event_id, guest_id))
            .await
    }
}
