use crate::error::Error;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::{collections::HashMap, env};

pub const DEFAULT_SERVICE_NAME: &str = "timeseriesdatabase";

lazy_static! {
    static ref BASE_URL_REGEX: Regex = Regex::new(
        r"^(?P<scheme>[a-zA-Z][a-zA-Z0-9+.\-]*)://(?:(?P<userinfo>[^/?#]*)@)?(?P<rest>[^/?#@][^?#]*)$"
    )
    .unwrap();
}

/// Where the database service is and who to talk to it as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Base URL without userinfo and without a trailing slash.
    pub base_url: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    /// Splits `user:password@` out of a base URL.
    pub fn from_url<S: AsRef<str>>(url: S) -> Result<Self, Error> {
        let url = url.as_ref().trim();
        let captures = BASE_URL_REGEX
            .captures(url)
            .ok_or_else(|| Error::InvalidBaseUrl(String::from(url)))?;

        let (user, password) = match captures.name("userinfo") {
            Some(userinfo) => match userinfo.as_str().split_once(':') {
                Some((user, password)) => (Some(String::from(user)), Some(String::from(password))),
                None => (Some(String::from(userinfo.as_str())), None),
            },
            None => (None, None),
        };

        Ok(Self {
            base_url: format!(
                "{}://{}",
                &captures["scheme"],
                captures["rest"].trim_end_matches('/')
            ),
            user,
            password,
        })
    }

    /// Resolves credentials from an explicit base URL or a service binding.
    pub fn resolve(settings: &EnvironmentSettings) -> Result<Self, Error> {
        if let Some(base_url) = settings.base_url.as_ref().filter(|url| !url.is_empty()) {
            return Self::from_url(base_url);
        }

        let vcap_services = settings.vcap_services.as_ref().ok_or_else(|| {
            Error::NotConfigured(String::from("neither BASE_URL nor VCAP_SERVICES is set"))
        })?;
        let service_name = settings
            .service_name
            .as_deref()
            .unwrap_or(DEFAULT_SERVICE_NAME);

        let mut services: HashMap<String, Vec<ServiceBinding>> =
            serde_json::from_str(vcap_services)?;
        let binding = services
            .remove(service_name)
            .and_then(|bindings| bindings.into_iter().next())
            .ok_or_else(|| {
                Error::NotConfigured(format!("no '{}' service in VCAP_SERVICES", service_name))
            })?;

        Self::from_url(binding.credentials.base_url(settings.use_ssl)?)
    }
}

/// The environment variables credentials are resolved from.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentSettings {
    pub base_url: Option<String>,
    pub vcap_services: Option<String>,
    pub service_name: Option<String>,
    pub use_ssl: bool,
}

impl EnvironmentSettings {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("BASE_URL").ok(),
            vcap_services: env::var("VCAP_SERVICES").ok(),
            service_name: env::var("SERVICE_NAME").ok(),
            use_ssl: env::var("USE_SSL")
                .map(|value| value.eq_ignore_ascii_case("true") || value == "1")
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ServiceBinding {
    credentials: ServiceCredentials,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceCredentials {
    rest_url: Option<String>,
    rest_url_ssl: Option<String>,
    host: Option<String>,
    port: Option<Port>,
    db: Option<String>,
    username: Option<String>,
    password: Option<String>,
    #[serde(default)]
    ssl: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Port {
    Number(u16),
    Text(String),
}

impl ServiceCredentials {
    fn base_url(&self, use_ssl: bool) -> Result<String, Error> {
        let use_ssl = use_ssl || self.ssl;
        let rest_url = if use_ssl {
            self.rest_url_ssl.as_ref()
        } else {
            self.rest_url.as_ref()
        };

        if let Some(rest_url) = rest_url {
            return Ok(rest_url.clone());
        }

        let host = self.host.as_ref().ok_or_else(|| {
            Error::NotConfigured(String::from("service credentials have no REST URL or host"))
        })?;

        let mut url = String::from(if use_ssl { "https://" } else { "http://" });
        if let Some(username) = &self.username {
            url.push_str(username);
            if let Some(password) = &self.password {
                url.push(':');
                url.push_str(password);
            }
            url.push('@');
        }
        url.push_str(host);
        match &self.port {
            Some(Port::Number(port)) => url.push_str(&format!(":{}", port)),
            Some(Port::Text(port)) if !port.is_empty() => url.push_str(&format!(":{}", port)),
            _ => {}
        }
        if let Some(db) = &self.db {
            url.push('/');
            url.push_str(db);
        }

        Ok(url)
    }
}
