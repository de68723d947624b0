//! `/reports` endpoints.

use super::{parse_json, WintenderClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ActuatorHealth, StatisticsSummary};

impl WintenderClient {
    pub fn build_statistics_summary(&self) -> HttpRequest {
        self.bodiless(HttpMethod::Get, "/reports/statistics/summary")
    }

    pub fn build_actuator(&self) -> HttpRequest {
        self.bodiless(HttpMethod::Get, "/reports/server/actuator")
    }

    pub fn parse_statistics_summary(&self, response: HttpResponse) -> Result<StatisticsSummary, ApiError> {
        parse_json(response)
    }

    pub fn parse_actuator(&self, response: HttpResponse) -> Result<ActuatorHealth, ApiError> {
        parse_json(response)
    }
}
