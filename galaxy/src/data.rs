use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct InteractionData {
    pub interaction_number: usize,
    pub request_data: RequestData,
    pub response_data: ResponseData,
}

/// A request as it goes over the wire: `uri` is the absolute URL.
#[derive(Debug, Clone, Default)]
pub struct RequestData {
    pub uri: String,
    pub method: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

#[derive(Debug, Clone, Default)]
pub struct ResponseData {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}
