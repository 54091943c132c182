//! Events, their dashboard statistics and the calendar.

use crate::error::ClientResult;
use crate::http::{ApiClient, ApiRequest};
use crate::models::{
    CalendarEvent, CalendarRange, CreateEventPayload, EventDto, EventListItem, EventStats,
    EventsQuery, Page, UpdateEventPayload,
};

#[derive(Clone)]
pub struct EventsService {
    api: ApiClient,
}

impl EventsService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn create(&self, payload: &CreateEventPayload) -> ClientResult<EventDto> {
        self.api.post_json("/api/event/create", Some(payload)).await
    }

    /// One page of the events table.
    pub async fn page(&self, query: &EventsQuery) -> ClientResult<Page<EventDto>> {
        let request = ApiRequest::get("/api/event/datatable").query(query)?;
        self.api.send_json(request).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<EventDto> {
        self.api.get_json(&format!("/api/event/get/{}", id)).await
    }

    pub async fn update(&self, payload: &UpdateEventPayload) -> ClientResult<EventDto> {
        self.api.put_json("/api/event/update", Some(payload)).await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<String> {
        self.api.delete_text(&format!("/api/event/{}", id)).await
    }

    /// Compact list used by event pickers.
    pub async fn list(&self) -> ClientResult<Vec<EventListItem>> {
        self.api.get_json("/api/event/list").await
    }

    /// Events falling inside `range`, both ends inclusive.
    pub async fn calendar(&self, range: CalendarRange) -> ClientResult<Vec<CalendarEvent>> {
        let request = ApiRequest::get("/api/event/calendar").query(&range)?;
        self.api.send_json(request).await
    }

    pub async fn stats(&self, id: &str) -> ClientResult<EventStats> {
        self.api
            .get_json(&format!("/api/event/dashboard-stats/{}", id))
            .await
    }
}
