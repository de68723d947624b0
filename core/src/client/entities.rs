//! `/entities` endpoints. Register and update send multipart forms.

use super::{parse_ack, parse_json, WintenderClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ApiAck, Entity, EntityForm, ListParams, Page};

impl WintenderClient {
    pub fn build_list_entities(&self, params: &ListParams) -> HttpRequest {
        self.list("/entities/list", params)
    }

    pub fn build_register_entity(&self, form: &EntityForm) -> HttpRequest {
        self.multipart(HttpMethod::Post, "/entities/register", form.to_multipart())
    }

    pub fn build_update_entity(&self, id: i64, form: &EntityForm) -> HttpRequest {
        self.multipart(HttpMethod::Put, &format!("/entities/update/{id}"), form.to_multipart())
    }

    pub fn parse_list_entities(&self, response: HttpResponse) -> Result<Page<Entity>, ApiError> {
        parse_json(response)
    }

    pub fn parse_register_entity(&self, response: HttpResponse) -> Result<ApiAck<Entity>, ApiError> {
        parse_ack(response)
    }

    pub fn parse_update_entity(&self, response: HttpResponse) -> Result<ApiAck<Entity>, ApiError> {
        parse_ack(response)
    }
}
