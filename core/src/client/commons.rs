//! `/commons` endpoints: platform settings and captured system errors.

use super::{parse_ack, parse_json, WintenderClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ApiAck, ListParams, Page, Settings, SystemError};

impl WintenderClient {
    pub fn build_get_settings(&self) -> HttpRequest {
        self.bodiless(HttpMethod::Get, "/commons/setting")
    }

    pub fn build_update_settings(&self, settings: &Settings) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Put, "/commons/setting", settings)
    }

    pub fn build_list_system_errors(&self, params: &ListParams) -> HttpRequest {
        self.list("/commons/errors", params)
    }

    pub fn parse_get_settings(&self, response: HttpResponse) -> Result<Settings, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_settings(&self, response: HttpResponse) -> Result<ApiAck<Settings>, ApiError> {
        parse_ack(response)
    }

    pub fn parse_list_system_errors(&self, response: HttpResponse) -> Result<Page<SystemError>, ApiError> {
        parse_json(response)
    }
}
