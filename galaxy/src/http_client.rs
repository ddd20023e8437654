use crate::{error::Error, util, RequestData, ResponseData};
use async_trait::async_trait;
use hyper::{body, client::HttpConnector, Body, Client, Request};
use hyper_tls::HttpsConnector;
use std::fmt::Debug;

/// Transport used by the runner. An `Err` means no response was received.
#[async_trait]
pub trait HttpClient: Debug {
    async fn make_request(&self, request_data: &RequestData) -> Result<ResponseData, Error>;
}

#[derive(Debug)]
pub struct HyperHttpClient {
    client: Client<HttpsConnector<HttpConnector>>,
}

impl HyperHttpClient {
    pub fn new() -> Self {
        Self {
            client: Client::builder().build(HttpsConnector::new()),
        }
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn make_request(&self, request_data: &RequestData) -> Result<ResponseData, Error> {
        let mut request_builder = Request::builder()
            .uri(request_data.uri.as_str())
            .method(request_data.method.as_str());

        if let Some(headers_mut) = request_builder.headers_mut() {
            util::put_headers(
                headers_mut,
                request_data
                    .headers
                    .iter()
                    .filter(|(header_name, _)| header_name.as_str() != "host"),
            )?;
        }

        let request: Request<Body> = request_builder.body(request_data.body.clone().into())?;

        let response = self.client.request(request).await?;

        let status_code = response.status().as_u16();
        let headers = util::extract_headers(response.headers());
        let body = body::to_bytes(response.into_body()).await?;
        let body: String = String::from_utf8_lossy(&body).into();

        Ok(ResponseData {
            status_code,
            body,
            headers,
        })
    }
}

impl Default for HyperHttpClient {
    fn default() -> Self {
        Self::new()
    }
}
