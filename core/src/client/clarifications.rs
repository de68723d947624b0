//! `/tenders/clarification/{id}` endpoints.
//!
//! GET and POST address a tender id; PUT addresses a clarification id.

use super::{parse_ack, parse_json, WintenderClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ApiAck, Clarification, ClarificationAnswer, ClarificationQuestion};

impl WintenderClient {
    pub fn build_list_clarifications(&self, tender_id: i64) -> HttpRequest {
        self.bodiless(HttpMethod::Get, &format!("/tenders/clarification/{tender_id}"))
    }

    pub fn build_ask_clarification(
        &self,
        tender_id: i64,
        input: &ClarificationQuestion,
    ) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, &format!("/tenders/clarification/{tender_id}"), input)
    }

    pub fn build_answer_clarification(
        &self,
        clarification_id: i64,
        input: &ClarificationAnswer,
    ) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Put, &format!("/tenders/clarification/{clarification_id}"), input)
    }

    pub fn parse_list_clarifications(&self, response: HttpResponse) -> Result<Vec<Clarification>, ApiError> {
        parse_json(response)
    }

    pub fn parse_ask_clarification(&self, response: HttpResponse) -> Result<ApiAck<Clarification>, ApiError> {
        parse_ack(response)
    }

    pub fn parse_answer_clarification(&self, response: HttpResponse) -> Result<ApiAck<Clarification>, ApiError> {
        parse_ack(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_uses_put_on_clarification_id() {
        let client = WintenderClient::new("http://h");
        let req = client
            .build_answer_clarification(
                9,
                &ClarificationAnswer {
                    answer: "Yes, extended".to_string(),
                },
            )
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://h/tenders/clarification/9");
    }

    #[test]
    fn list_parses_answered_flag() {
        let client = WintenderClient::new("http://h");
        let list = client
            .parse_list_clarifications(HttpResponse::new(
                200,
                r#"[{"id":1,"tenderId":5,"question":"Deadline?","answer":" "},
                    {"id":2,"tenderId":5,"question":"Bond?","answer":"2%"}]"#,
            ))
            .unwrap();
        assert!(!list[0].is_answered());
        assert!(list[1].is_answered());
    }
}
