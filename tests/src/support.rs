use async_trait::async_trait;
use galaxy::{
    Credentials, Error, HttpClient, RequestData, ResponseData, RunnerConfiguration, Session,
    Variant,
};
use hyper::{
    service::{make_service_fn, service_fn},
    Body, Request, Response, Server,
};
use std::{
    collections::HashMap,
    convert::Infallible,
    io,
    net::SocketAddr,
    sync::{Arc, Mutex},
};
use tokio::sync::oneshot;

pub const BASE_URL: &str = "http://joe:pw@localhost:27018/galaxy";
pub const SESSION_COOKIE: &str = "JSESSIONID=galaxy-session";

/// Answers every request in memory and remembers what it was asked.
#[derive(Debug)]
pub struct MockHttpClient {
    fail_at: Option<usize>,
    default_status: u16,
    status_at: HashMap<usize, u16>,
    set_cookie: Option<String>,
    requests: Mutex<Vec<RequestData>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            fail_at: None,
            default_status: 200,
            status_at: HashMap::new(),
            set_cookie: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// The request with this zero-based index gets no response.
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::new()
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.default_status = status;
        self
    }

    pub fn with_status_at(mut self, index: usize, status: u16) -> Self {
        self.status_at.insert(index, status);
        self
    }

    pub fn with_session_cookie<S: Into<String>>(mut self, set_cookie: S) -> Self {
        self.set_cookie = Some(set_cookie.into());
        self
    }

    pub fn requests(&self) -> Vec<RequestData> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn make_request(&self, request_data: &RequestData) -> Result<ResponseData, Error> {
        let index = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request_data.clone());
            requests.len() - 1
        };

        if self.fail_at == Some(index) {
            let error = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
            return Err(error.into());
        }

        let mut headers = HashMap::new();
        headers.insert(
            String::from("content-type"),
            String::from("application/json"),
        );
        if index == 0 {
            if let Some(set_cookie) = &self.set_cookie {
                headers.insert(String::from("set-cookie"), set_cookie.clone());
            }
        }

        Ok(ResponseData {
            status_code: *self.status_at.get(&index).unwrap_or(&self.default_status),
            headers,
            body: format!(r#"{{"ok":1,"call":{}}}"#, index),
        })
    }
}

pub fn configuration(variant: Variant, client: &Arc<MockHttpClient>) -> RunnerConfiguration {
    let mut configuration = RunnerConfiguration::new(variant);
    configuration.set_http_client(client.clone());
    configuration
}

pub fn session() -> Session {
    Session::new(&Credentials::from_url(BASE_URL).unwrap())
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path_and_query: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// A database stand-in on a local port. The first response hands out a session cookie.
pub struct FakeBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl FakeBackend {
    pub fn start() -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        let make_service = make_service_fn(move |_| {
            let recorded = recorded.clone();

            async move {
                Ok::<_, Infallible>(service_fn(move |request: Request<Body>| {
                    let recorded = recorded.clone();

                    async move {
                        let method = request.method().to_string();
                        let path_and_query = request
                            .uri()
                            .path_and_query()
                            .map(|path_and_query| path_and_query.to_string())
                            .unwrap_or_default();
                        let headers = request
                            .headers()
                            .iter()
                            .filter_map(|(key, value)| {
                                value
                                    .to_str()
                                    .ok()
                                    .map(|value| (key.to_string(), value.to_string()))
                            })
                            .collect();
                        let body = hyper::body::to_bytes(request.into_body()).await?;

                        let number = {
                            let mut recorded = recorded.lock().unwrap();
                            recorded.push(RecordedRequest {
                                method,
                                path_and_query,
                                headers,
                                body: String::from_utf8_lossy(&body).into(),
                            });
                            recorded.len()
                        };

                        let mut builder =
                            Response::builder().header("content-type", "application/json");
                        if number == 1 {
                            builder = builder.header(
                                "set-cookie",
                                format!("{}; Path=/; HttpOnly", SESSION_COOKIE),
                            );
                        }
                        let response =
                            builder.body(Body::from(format!(r#"{{"ok":1,"n":{}}}"#, number)))?;

                        Ok::<_, Box<dyn std::error::Error + Send + Sync>>(response)
                    }
                }))
            }
        });

        let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make_service);
        let addr = server.local_addr();
        let (shutdown, shutdown_signal) = oneshot::channel::<()>();

        tokio::spawn(server.with_graceful_shutdown(async {
            let _ = shutdown_signal.await;
        }));

        Self {
            addr,
            requests,
            shutdown: Some(shutdown),
        }
    }

    pub fn base_url(&self, userinfo: &str) -> String {
        format!("http://{}{}/galaxy", userinfo, self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// A local address nothing listens on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/galaxy", addr)
}
