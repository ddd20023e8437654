use crate::{Credentials, RequestData, ResponseData};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, warn};

const AUTHORIZATION: &str = "authorization";
const COOKIE: &str = "cookie";
const SET_COOKIE: &str = "set-cookie";
const REDACTED: &str = "<redacted>";

/// Per-run connection state: base URL, basic auth and the session cookie the service hands
/// out on the first response.
#[derive(Debug, Clone)]
pub struct Session {
    base_url: String,
    authorization: Option<String>,
    cookie: Option<String>,
    responses_seen: usize,
}

impl Session {
    pub fn new(credentials: &Credentials) -> Self {
        let authorization = credentials.user.as_ref().map(|user| {
            let password = credentials.password.as_deref().unwrap_or_default();
            format!("Basic {}", STANDARD.encode(format!("{}:{}", user, password)))
        });

        Self {
            base_url: credentials.base_url.clone(),
            authorization,
            cookie: None,
            responses_seen: 0,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Attaches authorization and, once captured, the session cookie.
    pub fn decorate(&self, request_data: &mut RequestData) {
        if let Some(authorization) = &self.authorization {
            request_data
                .headers
                .insert(String::from(AUTHORIZATION), authorization.clone());
        }
        if let Some(cookie) = &self.cookie {
            request_data
                .headers
                .insert(String::from(COOKIE), cookie.clone());
        }
    }

    /// Captures the session cookie from the first response of the run.
    pub fn observe(&mut self, response_data: &ResponseData) {
        self.responses_seen += 1;
        if self.responses_seen > 1 {
            return;
        }

        match response_data.headers.get(SET_COOKIE) {
            Some(set_cookie) => {
                let cookie = set_cookie.split(';').next().unwrap_or_default().trim();
                if !cookie.is_empty() {
                    debug!(cookie, "captured session cookie");
                    self.cookie = Some(String::from(cookie));
                }
            }
            None => warn!("first response carried no session cookie"),
        }
    }

    /// Masks secrets before a request is written anywhere persistent.
    pub fn redact(request_data: &mut RequestData) {
        for header in [AUTHORIZATION, COOKIE] {
            if let Some(value) = request_data.headers.get_mut(header) {
                *value = String::from(REDACTED);
            }
        }
    }

    /// Masks the session cookie the service handed out.
    pub fn redact_response(response_data: &mut ResponseData) {
        if let Some(value) = response_data.headers.get_mut(SET_COOKIE) {
            *value = String::from(REDACTED);
        }
    }
}
