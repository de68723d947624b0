//! `/ai/chat` endpoints.

use super::{parse_ack, parse_json, WintenderClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ApiAck, ChatMessage, ChatPrompt};

impl WintenderClient {
    pub fn build_list_chat(&self) -> HttpRequest {
        self.bodiless(HttpMethod::Get, "/ai/chat")
    }

    pub fn build_send_chat(&self, prompt: &ChatPrompt) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "/ai/chat", prompt)
    }

    pub fn build_delete_chat(&self, id: i64) -> HttpRequest {
        self.bodiless(HttpMethod::Delete, &format!("/ai/chat/{id}"))
    }

    pub fn parse_list_chat(&self, response: HttpResponse) -> Result<Vec<ChatMessage>, ApiError> {
        parse_json(response)
    }

    pub fn parse_send_chat(&self, response: HttpResponse) -> Result<ApiAck<ChatMessage>, ApiError> {
        parse_ack(response)
    }

    pub fn parse_delete_chat(&self, response: HttpResponse) -> Result<ApiAck, ApiError> {
        parse_ack(response)
    }
}
