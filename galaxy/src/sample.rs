//! Sample data inserted by the demo run.

use serde::Serialize;
use serde_json::Value;

pub const COLLECTION: &str = "mycollection";
pub const TABLE: &str = "mytable";
pub const COLLECTION_TO_JOIN: &str = "collectionJoin";
pub const TABLE_TO_JOIN: &str = "tableJoin";

/// A city document. Serializes with `country_code` under the `code` key.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct SampleRecord {
    pub name: &'static str,
    pub population: u64,
    pub longitude: f64,
    pub latitude: f64,
    #[serde(rename = "code")]
    pub country_code: u32,
}

impl SampleRecord {
    pub fn to_json(&self) -> Value {
        serde_json::json!(self)
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecord {
    pub country_code: u32,
    pub country: &'static str,
}

pub const KANSAS_CITY: SampleRecord = SampleRecord {
    name: "Kansas City",
    population: 467007,
    longitude: 39.0997,
    latitude: 94.5783,
    country_code: 1,
};

pub const SEATTLE: SampleRecord = SampleRecord {
    name: "Seattle",
    population: 652405,
    longitude: 47.6097,
    latitude: 122.3331,
    country_code: 1,
};

pub const NEW_YORK: SampleRecord = SampleRecord {
    name: "New York",
    population: 8406000,
    longitude: 40.7127,
    latitude: 74.0059,
    country_code: 1,
};

pub const LONDON: SampleRecord = SampleRecord {
    name: "London",
    population: 8308000,
    longitude: 51.5072,
    latitude: 0.1275,
    country_code: 44,
};

pub const TOKYO: SampleRecord = SampleRecord {
    name: "Tokyo",
    population: 13350000,
    longitude: 35.6833,
    latitude: -139.6833,
    country_code: 81,
};

pub const MADRID: SampleRecord = SampleRecord {
    name: "Madrid",
    population: 3165000,
    longitude: 40.4001,
    latitude: 3.7167,
    country_code: 34,
};

pub const MELBOURNE: SampleRecord = SampleRecord {
    name: "Melbourne",
    population: 4087000,
    longitude: -37.8136,
    latitude: -144.9631,
    country_code: 61,
};

pub const SYDNEY: SampleRecord = SampleRecord {
    name: "Sydney",
    population: 4293000,
    longitude: -33.8651,
    latitude: -151.2094,
    country_code: 61,
};

/// Cities inserted by the "insert multiple documents" steps.
pub const BATCH_CITIES: [SampleRecord; 6] = [SEATTLE, NEW_YORK, LONDON, TOKYO, MADRID, MELBOURNE];

pub const COUNTRIES: [CountryRecord; 5] = [
    CountryRecord {
        country_code: 1,
        country: "United States of America",
    },
    CountryRecord {
        country_code: 44,
        country: "United Kingdom",
    },
    CountryRecord {
        country_code: 81,
        country: "Japan",
    },
    CountryRecord {
        country_code: 34,
        country: "Spain",
    },
    CountryRecord {
        country_code: 61,
        country: "Australia",
    },
];
