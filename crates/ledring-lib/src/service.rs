//! Light service facade — domain operations mapped onto remote paths.
//!
//! No decision logic lives here: each operation is one [`RemoteClient::call`],
//! and errors (including retry exhaustion) propagate unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::{ApiError, RemoteClient};
use crate::error::Result;
use crate::light::LightsResponse;
use crate::transport::{HttpTransport, Method};
use crate::wait::Sleeper;

// ── Trait ──

/// The four operations the controller needs from the light service.
pub trait LightService {
    fn get_all(&self) -> Result<LightsResponse>;
    /// Zero or one lights, wrapped in the same envelope as [`get_all`](Self::get_all).
    fn get_one(&self, id: u32) -> Result<LightsResponse>;
    fn set_one(&self, id: u32, color: &str, on: bool) -> Result<Value>;
    fn delete_one(&self, id: u32) -> Result<()>;
}

impl<T: LightService + ?Sized> LightService for &T {
    fn get_all(&self) -> Result<LightsResponse> {
        (**self).get_all()
    }
    fn get_one(&self, id: u32) -> Result<LightsResponse> {
        (**self).get_one(id)
    }
    fn set_one(&self, id: u32, color: &str, on: bool) -> Result<Value> {
        (**self).set_one(id, color, on)
    }
    fn delete_one(&self, id: u32) -> Result<()> {
        (**self).delete_one(id)
    }
}

// ── Endpoints ──

/// Name of the power field in the set-light body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateField {
    On,
    State,
}

impl StateField {
    pub fn as_str(self) -> &'static str {
        match self {
            StateField::On => "on",
            StateField::State => "state",
        }
    }
}

/// Remote paths and body shape. `{id}` in a path is replaced by the light id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub lights_path: String,
    pub light_path: String,
    pub set_path: String,
    pub delete_path: String,
    pub set_method: Method,
    pub state_field: StateField,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            lights_path: "getLights".into(),
            light_path: "getLight?id={id}".into(),
            set_path: "setLight".into(),
            delete_path: "deleteLight?id={id}".into(),
            set_method: Method::Put,
            state_field: StateField::On,
        }
    }
}

fn with_id(template: &str, id: u32) -> String {
    template.replace("{id}", &id.to_string())
}

// ── Remote implementation ──

/// [`LightService`] backed by a [`RemoteClient`].
pub struct RemoteLightService<T, W> {
    client: RemoteClient<T, W>,
    endpoints: Endpoints,
}

impl<T: HttpTransport, W: Sleeper> RemoteLightService<T, W> {
    pub fn new(client: RemoteClient<T, W>, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    fn fetch(&self, path: &str) -> Result<LightsResponse> {
        let body = self.client.call(path, Method::Get, None)?;
        serde_json::from_value(body)
            .map_err(|e| ApiError::Parse(format!("{path}: {e}")).into())
    }

    /// The JSON body sent by [`set_one`](LightService::set_one).
    pub fn set_body(&self, id: u32, color: &str, on: bool) -> Value {
        let mut body = Map::new();
        body.insert("id".into(), Value::from(id));
        body.insert("color".into(), Value::from(color));
        body.insert(self.endpoints.state_field.as_str().into(), Value::from(on));
        Value::Object(body)
    }
}

impl<T: HttpTransport, W: Sleeper> LightService for RemoteLightService<T, W> {
    fn get_all(&self) -> Result<LightsResponse> {
        self.fetch(&self.endpoints.lights_path)
    }

    fn get_one(&self, id: u32) -> Result<LightsResponse> {
        self.fetch(&with_id(&self.endpoints.light_path, id))
    }

    fn set_one(&self, id: u32, color: &str, on: bool) -> Result<Value> {
        let body = self.set_body(id, color, on);
        self.client
            .call(&self.endpoints.set_path, self.endpoints.set_method, Some(&body))
    }

    fn delete_one(&self, id: u32) -> Result<()> {
        self.client
            .call(&with_id(&self.endpoints.delete_path, id), Method::Delete, None)?;
        Ok(())
    }
}

// ── Mock service for testing ──

/// In-memory light service for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use crate::error::LedringError;
    use crate::light::Light;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;
    use std::time::Duration;

    /// One observable interaction, in the order it happened.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Event {
        GetAll,
        GetOne(u32),
        Set { id: u32, color: String, on: bool },
        Delete(u32),
        Sleep(Duration),
    }

    impl Event {
        pub fn set(id: u32, color: &str, on: bool) -> Self {
            Event::Set {
                id,
                color: color.to_string(),
                on,
            }
        }
    }

    /// Ordered log shared between the mock service and a recording sleeper.
    pub type Journal = Rc<RefCell<Vec<Event>>>;

    pub fn journal() -> Journal {
        Rc::new(RefCell::new(Vec::new()))
    }

    /// Serves a fixed light list and records every call.
    pub struct MockLightService {
        /// Returned by `get_all`.
        pub lights: RefCell<Vec<Light>>,
        /// Returned by `get_one`; ids not present yield an empty list.
        pub single: RefCell<HashMap<u32, Vec<Light>>>,
        /// If set, the Nth `set_one` call (0-based) fails.
        pub fail_set_at: Cell<Option<usize>>,
        journal: Journal,
        set_calls: Cell<usize>,
    }

    impl MockLightService {
        pub fn new(journal: Journal) -> Self {
            Self {
                lights: RefCell::new(Vec::new()),
                single: RefCell::new(HashMap::new()),
                fail_set_at: Cell::new(None),
                journal,
                set_calls: Cell::new(0),
            }
        }

        pub fn with_lights(journal: Journal, lights: Vec<Light>) -> Self {
            let svc = Self::new(journal);
            *svc.lights.borrow_mut() = lights;
            svc
        }

        pub fn events(&self) -> Vec<Event> {
            self.journal.borrow().clone()
        }

        /// Only the `Set` events, as `(id, color, on)`.
        pub fn sets(&self) -> Vec<(u32, String, bool)> {
            self.journal
                .borrow()
                .iter()
                .filter_map(|e| match e {
                    Event::Set { id, color, on } => Some((*id, color.clone(), *on)),
                    _ => None,
                })
                .collect()
        }
    }

    impl LightService for MockLightService {
        fn get_all(&self) -> Result<LightsResponse> {
            self.journal.borrow_mut().push(Event::GetAll);
            Ok(LightsResponse {
                lights: self.lights.borrow().clone(),
            })
        }

        fn get_one(&self, id: u32) -> Result<LightsResponse> {
            self.journal.borrow_mut().push(Event::GetOne(id));
            Ok(LightsResponse {
                lights: self.single.borrow().get(&id).cloned().unwrap_or_default(),
            })
        }

        fn set_one(&self, id: u32, color: &str, on: bool) -> Result<Value> {
            let n = self.set_calls.get();
            self.set_calls.set(n + 1);
            self.journal.borrow_mut().push(Event::set(id, color, on));
            if self.fail_set_at.get() == Some(n) {
                return Err(LedringError::Api(ApiError::Status {
                    method: Method::Put,
                    path: "setLight".into(),
                    status: 503,
                }));
            }
            Ok(Value::Object(Map::new()))
        }

        fn delete_one(&self, id: u32) -> Result<()> {
            self.journal.borrow_mut().push(Event::Delete(id));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::CredentialResolver;
    use crate::error::LedringError;
    use crate::retry::RetryConfig;
    use crate::transport::HttpResponse;
    use crate::transport::mock::MockTransport;
    use crate::wait::mock::RecordingSleeper;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn service<'a>(
        t: &'a MockTransport,
        s: &'a RecordingSleeper,
        endpoints: Endpoints,
    ) -> RemoteLightService<&'a MockTransport, &'a RecordingSleeper> {
        let retry = RetryConfig {
            pacing: Duration::ZERO,
            base_backoff: Duration::from_millis(1),
            max_retries: 1,
        };
        let client = RemoteClient::new(t, s, Arc::new(CredentialResolver::fixed("g")), retry);
        RemoteLightService::new(client, endpoints)
    }

    #[test]
    fn get_all_hits_collection_path() {
        let t = MockTransport::new();
        let s = RecordingSleeper::new();
        t.push_json(&json!({"lights": [{"id": 1, "color": "#000000", "on": false}]}));

        let resp = service(&t, &s, Endpoints::default()).get_all().unwrap();
        assert_eq!(resp.lights.len(), 1);
        let reqs = t.requests.borrow();
        assert_eq!(reqs[0].method, Method::Get);
        assert_eq!(reqs[0].path, "getLights");
    }

    #[test]
    fn get_one_substitutes_id() {
        let t = MockTransport::new();
        let s = RecordingSleeper::new();
        t.push_json(&json!({"lights": []}));

        let resp = service(&t, &s, Endpoints::default()).get_one(42).unwrap();
        assert!(resp.lights.is_empty());
        assert_eq!(t.requests.borrow()[0].path, "getLight?id=42");
    }

    #[test]
    fn set_one_sends_body_with_on_field() {
        let t = MockTransport::new();
        let s = RecordingSleeper::new();
        service(&t, &s, Endpoints::default())
            .set_one(21, "#00ff00", true)
            .unwrap();

        let reqs = t.requests.borrow();
        assert_eq!(reqs[0].method, Method::Put);
        assert_eq!(reqs[0].path, "setLight");
        let body: Value = serde_json::from_slice(reqs[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(body, json!({"id": 21, "color": "#00ff00", "on": true}));
    }

    #[test]
    fn set_one_honours_state_field_and_method() {
        let t = MockTransport::new();
        let s = RecordingSleeper::new();
        let endpoints = Endpoints {
            set_method: Method::Post,
            state_field: StateField::State,
            ..Endpoints::default()
        };
        service(&t, &s, endpoints)
            .set_one(21, "#000000", false)
            .unwrap();

        let reqs = t.requests.borrow();
        assert_eq!(reqs[0].method, Method::Post);
        let body: Value = serde_json::from_slice(reqs[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(body, json!({"id": 21, "color": "#000000", "state": false}));
    }

    #[test]
    fn delete_one_discards_body() {
        let t = MockTransport::new();
        let s = RecordingSleeper::new();
        t.push_json(&json!({"deleted": 1}));
        service(&t, &s, Endpoints::default()).delete_one(7).unwrap();
        let reqs = t.requests.borrow();
        assert_eq!(reqs[0].method, Method::Delete);
        assert_eq!(reqs[0].path, "deleteLight?id=7");
    }

    #[test]
    fn wrong_envelope_is_parse_error() {
        let t = MockTransport::new();
        let s = RecordingSleeper::new();
        t.push_json(&json!({"items": []}));
        let err = service(&t, &s, Endpoints::default()).get_all().unwrap_err();
        assert!(matches!(err, LedringError::Api(ApiError::Parse(_))));
    }

    #[test]
    fn client_errors_propagate_unchanged() {
        let t = MockTransport::new();
        let s = RecordingSleeper::new();
        t.push(HttpResponse::new(401, ""));
        let err = service(&t, &s, Endpoints::default())
            .set_one(1, "#000000", false)
            .unwrap_err();
        assert!(matches!(
            err,
            LedringError::Api(ApiError::Status { status: 401, .. })
        ));
        assert_eq!(t.request_count(), 1);
    }

    #[test]
    fn state_field_serde() {
        let f: StateField = serde_json::from_str("\"state\"").unwrap();
        assert_eq!(f, StateField::State);
        assert_eq!(serde_json::to_string(&StateField::On).unwrap(), "\"on\"");
    }
}
