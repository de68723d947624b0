//! `/users/user` endpoints.

use super::{parse_json, WintenderClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ListParams, Page, User};

impl WintenderClient {
    pub fn build_list_users(&self, params: &ListParams) -> HttpRequest {
        self.list("/users/user/list", params)
    }

    pub fn build_view_user(&self, id: i64) -> HttpRequest {
        self.bodiless(HttpMethod::Get, &format!("/users/user/view/{id}"))
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<Page<User>, ApiError> {
        parse_json(response)
    }

    pub fn parse_view_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        parse_json(response)
    }
}
