//! Queries and mutations used by the dashboard screens.
//!
//! # Design
//! `Dashboard` is the one place where the pieces meet: it builds a request
//! with [`WintenderClient`], attaches the bearer token from the
//! [`AppContext`], runs it through the [`Transport`] and parses the result.
//! Reads go through the [`QueryCache`]; writes are returned as [`Mutation`]s
//! that invalidate the affected resource on success.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::client::WintenderClient;
use crate::config::DashboardConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::mutation::Mutation;
use crate::notify::Notifier;
use crate::query::{CacheKey, QueryCache, Resource};
use crate::session::AppContext;
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    ActuatorHealth, ApiAck, ChatMessage, ChatPrompt, Clarification, ClarificationAnswer, ClarificationQuestion,
    Entity, EntityForm, ListParams, Page, Settings, StatisticsSummary, SystemError, User,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefetchIntervals {
    pub lists: Duration,
    pub health: Duration,
}

impl From<&DashboardConfig> for RefetchIntervals {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            lists: config.list_refetch_interval,
            health: config.health_refetch_interval,
        }
    }
}

impl Default for RefetchIntervals {
    fn default() -> Self {
        Self::from(&DashboardConfig::default())
    }
}

pub struct Dashboard<T: Transport> {
    client: WintenderClient,
    transport: T,
    context: AppContext,
    cache: QueryCache,
    notifier: Arc<dyn Notifier>,
    intervals: RefetchIntervals,
}

impl Dashboard<UreqTransport> {
    pub fn from_config(config: &DashboardConfig, context: AppContext, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(
            WintenderClient::new(&config.api_base_url),
            UreqTransport::new(config.request_timeout),
            context,
            notifier,
        )
        .with_intervals(RefetchIntervals::from(config))
    }
}

impl<T: Transport> Dashboard<T> {
    pub fn new(client: WintenderClient, transport: T, context: AppContext, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            transport,
            context,
            cache: QueryCache::new(),
            notifier,
            intervals: RefetchIntervals::default(),
        }
    }

    pub fn with_intervals(mut self, intervals: RefetchIntervals) -> Self {
        self.intervals = intervals;
        self
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let request = match self.context.token() {
            Some(token) => request.with_bearer(&token),
            None => request,
        };
        let start = Instant::now();
        tracing::debug!(method = request.method.as_str(), url = %request.url, "dispatching request");
        let response = self.transport.execute(&request)?;
        tracing::info!(
            method = request.method.as_str(),
            url = %request.url,
            status = response.status,
            duration_ms = start.elapsed().as_millis() as u64,
            "api call"
        );
        Ok(response)
    }

    fn mutation<'a, I, O, F>(&'a self, invalidates: &'a [Resource], mut operation: F) -> Mutation<'a, I, O>
    where
        O: crate::mutation::ServerMessage,
        F: FnMut(I) -> Result<O, ApiError> + 'a,
    {
        Mutation::new(self.context.clone(), self.notifier.as_ref(), move |input| {
            let output = operation(input)?;
            for resource in invalidates {
                self.cache.invalidate_resource(*resource);
            }
            Ok(output)
        })
    }

    /// Drop the cached entry so the next read goes to the server.
    pub fn refetch(&self, key: &CacheKey) {
        self.cache.invalidate(key);
    }

    // -- queries ------------------------------------------------------------

    pub fn users(&self, params: &ListParams) -> Result<Arc<Page<User>>, ApiError> {
        let key = CacheKey::with_params(Resource::Users, params.clone());
        self.cache.fetch(&key, Some(self.intervals.lists), || {
            let response = self.send(self.client.build_list_users(params))?;
            self.client.parse_list_users(response)
        })
    }

    pub fn user(&self, id: i64) -> Result<Arc<User>, ApiError> {
        let key = CacheKey::with_id(Resource::User, id);
        self.cache.fetch(&key, None, || {
            let response = self.send(self.client.build_view_user(id))?;
            self.client.parse_view_user(response)
        })
    }

    pub fn entities(&self, params: &ListParams) -> Result<Arc<Page<Entity>>, ApiError> {
        let key = CacheKey::with_params(Resource::Entities, params.clone());
        self.cache.fetch(&key, Some(self.intervals.lists), || {
            let response = self.send(self.client.build_list_entities(params))?;
            self.client.parse_list_entities(response)
        })
    }

    pub fn system_errors(&self, params: &ListParams) -> Result<Arc<Page<SystemError>>, ApiError> {
        let key = CacheKey::with_params(Resource::SystemErrors, params.clone());
        self.cache.fetch(&key, Some(self.intervals.lists), || {
            let response = self.send(self.client.build_list_system_errors(params))?;
            self.client.parse_list_system_errors(response)
        })
    }

    pub fn chat_history(&self) -> Result<Arc<Vec<ChatMessage>>, ApiError> {
        let key = CacheKey::new(Resource::Chat);
        self.cache.fetch(&key, Some(self.intervals.lists), || {
            let response = self.send(self.client.build_list_chat())?;
            self.client.parse_list_chat(response)
        })
    }

    pub fn clarifications(&self, tender_id: i64) -> Result<Arc<Vec<Clarification>>, ApiError> {
        let key = CacheKey::with_id(Resource::Clarifications, tender_id);
        self.cache.fetch(&key, None, || {
            let response = self.send(self.client.build_list_clarifications(tender_id))?;
            self.client.parse_list_clarifications(response)
        })
    }

    pub fn statistics_summary(&self) -> Result<Arc<StatisticsSummary>, ApiError> {
        let key = CacheKey::new(Resource::StatisticsSummary);
        self.cache.fetch(&key, Some(self.intervals.health), || {
            let response = self.send(self.client.build_statistics_summary())?;
            self.client.parse_statistics_summary(response)
        })
    }

    pub fn actuator(&self) -> Result<Arc<ActuatorHealth>, ApiError> {
        let key = CacheKey::new(Resource::Actuator);
        self.cache.fetch(&key, Some(self.intervals.health), || {
            let response = self.send(self.client.build_actuator())?;
            self.client.parse_actuator(response)
        })
    }

    pub fn settings(&self) -> Result<Arc<Settings>, ApiError> {
        let key = CacheKey::new(Resource::Settings);
        self.cache.fetch(&key, None, || {
            let response = self.send(self.client.build_get_settings())?;
            self.client.parse_get_settings(response)
        })
    }

    // -- mutations ----------------------------------------------------------

    pub fn send_chat(&self) -> Mutation<'_, ChatPrompt, ApiAck<ChatMessage>> {
        self.mutation(&[Resource::Chat], move |prompt: ChatPrompt| {
            let response = self.send(self.client.build_send_chat(&prompt)?)?;
            self.client.parse_send_chat(response)
        })
    }

    pub fn delete_chat(&self) -> Mutation<'_, i64, ApiAck> {
        self.mutation(&[Resource::Chat], move |id: i64| {
            let response = self.send(self.client.build_delete_chat(id))?;
            self.client.parse_delete_chat(response)
        })
    }

    pub fn ask_clarification(&self) -> Mutation<'_, (i64, ClarificationQuestion), ApiAck<Clarification>> {
        self.mutation(
            &[Resource::Clarifications],
            move |(tender_id, question): (i64, ClarificationQuestion)| {
                let response = self.send(self.client.build_ask_clarification(tender_id, &question)?)?;
                self.client.parse_ask_clarification(response)
            },
        )
    }

    pub fn answer_clarification(&self) -> Mutation<'_, (i64, ClarificationAnswer), ApiAck<Clarification>> {
        self.mutation(
            &[Resource::Clarifications],
            move |(clarification_id, answer): (i64, ClarificationAnswer)| {
                let response = self.send(self.client.build_answer_clarification(clarification_id, &answer)?)?;
                self.client.parse_answer_clarification(response)
            },
        )
    }

    pub fn register_entity(&self) -> Mutation<'_, EntityForm, ApiAck<Entity>> {
        self.mutation(
            &[Resource::Entities, Resource::StatisticsSummary],
            move |form: EntityForm| {
                let response = self.send(self.client.build_register_entity(&form))?;
                self.client.parse_register_entity(response)
            },
        )
    }

    pub fn update_entity(&self) -> Mutation<'_, (i64, EntityForm), ApiAck<Entity>> {
        self.mutation(&[Resource::Entities], move |(id, form): (i64, EntityForm)| {
            let response = self.send(self.client.build_update_entity(id, &form))?;
            self.client.parse_update_entity(response)
        })
    }

    pub fn update_settings(&self) -> Mutation<'_, Settings, ApiAck<Settings>> {
        self.mutation(&[Resource::Settings], move |settings: Settings| {
            let response = self.send(self.client.build_update_settings(&settings)?)?;
            self.client.parse_update_settings(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::http::HttpMethod;
    use crate::notify::RecordingNotifier;
    use crate::session::SessionUser;

    /// Replays canned responses and records every request it sees.
    #[derive(Default)]
    struct ScriptedTransport {
        responses: Mutex<Vec<HttpResponse>>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn with(responses: Vec<HttpResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().rev().collect()),
                seen: Mutex::default(),
            }
        }

        fn seen(&self) -> Vec<HttpRequest> {
            self.seen.lock().clone()
        }
    }

    impl Transport for ScriptedTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.lock().push(request.clone());
            self.responses
                .lock()
                .pop()
                .ok_or_else(|| ApiError::Transport("no scripted response".to_string()))
        }
    }

    const PAGE: &str = r#"{"content":[{"id":1,"email":"a@x.et"}],"totalElements":1,"totalPages":1,"number":0,"size":10}"#;
    const ENTITY_PAGE: &str =
        r#"{"content":[{"id":1,"name":"Abay"}],"totalElements":1,"totalPages":1,"number":0,"size":10}"#;

    fn dashboard(
        transport: &ScriptedTransport,
        notifier: Arc<RecordingNotifier>,
    ) -> Dashboard<&ScriptedTransport> {
        let context = AppContext::new();
        context
            .set_session(
                SessionUser {
                    id: 1,
                    email: None,
                    full_name: None,
                    role: Some("ADMIN".to_string()),
                },
                "secret",
            )
            .unwrap();
        Dashboard::new(WintenderClient::new("http://h"), transport, context, notifier)
    }

    #[test]
    fn queries_attach_bearer_and_cache() {
        let transport = ScriptedTransport::with(vec![HttpResponse::new(200, PAGE)]);
        let dash = dashboard(&transport, Arc::new(RecordingNotifier::new()));

        let params = ListParams::default().page(0);
        let first = dash.users(&params).unwrap();
        let second = dash.users(&params).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let seen = transport.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].header("authorization"), Some("Bearer secret"));
        assert_eq!(seen[0].url, "http://h/users/user/list?page=0");
    }

    #[test]
    fn refetch_goes_back_to_server() {
        let transport = ScriptedTransport::with(vec![HttpResponse::new(200, "{}"), HttpResponse::new(200, r#"{"a":1}"#)]);
        let dash = dashboard(&transport, Arc::new(RecordingNotifier::new()));

        assert!(dash.settings().unwrap().values.is_empty());
        dash.refetch(&CacheKey::new(Resource::Settings));
        assert_eq!(dash.settings().unwrap().values["a"], 1);
        assert_eq!(transport.seen().len(), 2);
    }

    #[test]
    fn query_failure_leaves_session_alone() {
        let transport = ScriptedTransport::with(vec![HttpResponse::new(401, "")]);
        let dash = dashboard(&transport, Arc::new(RecordingNotifier::new()));
        assert_eq!(dash.actuator().unwrap_err().status(), Some(401));
        assert!(dash.context().is_authenticated());
    }

    #[test]
    fn successful_mutation_invalidates_resource() {
        let transport = ScriptedTransport::with(vec![
            HttpResponse::new(200, ENTITY_PAGE),
            HttpResponse::new(201, r#"{"message":"Entity registered"}"#),
        ]);
        let notifier = Arc::new(RecordingNotifier::new());
        let dash = dashboard(&transport, notifier.clone());

        assert_eq!(dash.entities(&ListParams::default()).unwrap().content[0].name, "Abay");
        assert_eq!(dash.cache().len(), 1);

        dash.register_entity()
            .mutate(EntityForm {
                name: "Abay".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert!(dash.cache().is_empty());
        assert_eq!(notifier.last().unwrap().message, "Entity registered");
        assert_eq!(transport.seen()[1].method, HttpMethod::Post);
    }

    #[test]
    fn unauthorized_mutation_signs_out() {
        let transport = ScriptedTransport::with(vec![HttpResponse::new(401, "")]);
        let notifier = Arc::new(RecordingNotifier::new());
        let dash = dashboard(&transport, notifier.clone());

        let mut delete = dash.delete_chat();
        assert!(delete.mutate(5).is_err());
        assert_eq!(notifier.last().unwrap().message, "Unauthorized...");
        assert!(!dash.context().is_authenticated());
    }

    #[test]
    fn failed_mutation_keeps_cache() {
        let transport = ScriptedTransport::with(vec![
            HttpResponse::new(200, "{}"),
            HttpResponse::new(400, r#"{"message":"vat must be numeric"}"#),
        ]);
        let notifier = Arc::new(RecordingNotifier::new());
        let dash = dashboard(&transport, notifier.clone());

        dash.settings().unwrap();
        let err = dash.update_settings().mutate(Settings::default()).unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(notifier.last().unwrap().message, "vat must be numeric");
        assert!(dash.cache().contains(&CacheKey::new(Resource::Settings)));
    }
}
