//! The fixed sequence of requests the demo issues.

use crate::{
    request_builder::{
        Method, QueryParam, RequestDescriptor, COMMAND_RESOURCE, JOIN_RESOURCE, SQL_RESOURCE,
    },
    sample::{
        BATCH_CITIES, COLLECTION, COLLECTION_TO_JOIN, COUNTRIES, KANSAS_CITY, SYDNEY, TABLE,
        TABLE_TO_JOIN,
    },
};
use serde_json::{json, Map, Value};
use std::{fmt, str::FromStr};

/// Which part of the operation catalog a run covers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Variant {
    /// Every operation, joins, transactions and catalog included.
    Full,
    /// Collections and tables only: no joins, transactions or catalog, and updates use PUT.
    Basic,
}

impl Default for Variant {
    fn default() -> Self {
        Variant::Full
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Variant::Full),
            "basic" => Ok(Variant::Basic),
            other => Err(format!("unknown variant '{}'", other)),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StepGroup {
    Core,
    Join,
    Transaction,
    Catalog,
    /// The Seattle update; the basic variant sends it as PUT.
    Update,
    /// Teardown of the resources only the join steps create.
    JoinTeardown,
}

impl StepGroup {
    fn included_in(self, variant: Variant) -> bool {
        match variant {
            Variant::Full => true,
            Variant::Basic => matches!(self, StepGroup::Core | StepGroup::Update),
        }
    }
}

#[derive(Clone)]
pub struct Step {
    headings: &'static [&'static str],
    label: &'static str,
    group: StepGroup,
    method_override: Option<Method>,
    build: fn() -> RequestDescriptor,
}

impl Step {
    fn new(
        headings: &'static [&'static str],
        label: &'static str,
        group: StepGroup,
        build: fn() -> RequestDescriptor,
    ) -> Self {
        Self {
            headings,
            label,
            group,
            method_override: None,
            build,
        }
    }

    /// Section headings printed before this step's log line. A leading `\n` marks a blank
    /// line before the heading.
    pub fn headings(&self) -> &'static [&'static str] {
        self.headings
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn group(&self) -> StepGroup {
        self.group
    }

    /// A fresh descriptor for this step.
    pub fn request(&self) -> RequestDescriptor {
        let mut descriptor = (self.build)();
        if let Some(method) = self.method_override {
            descriptor.method = method;
        }
        descriptor
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("label", &self.label)
            .field("group", &self.group)
            .field("request", &self.request())
            .finish()
    }
}

/// The ordered steps of one run.
pub fn steps(variant: Variant) -> Vec<Step> {
    catalog()
        .into_iter()
        .filter(|step| step.group.included_in(variant))
        .map(|mut step| {
            if variant == Variant::Basic && step.group == StepGroup::Update {
                step.method_override = Some(Method::Put);
            }
            step
        })
        .collect()
}

fn create_resource(name: &str) -> RequestDescriptor {
    RequestDescriptor::new(Method::Post, "").with_body(json!({ "name": name }))
}

fn create_table(name: &str, columns: Value) -> RequestDescriptor {
    RequestDescriptor::new(Method::Post, "").with_body(json!({ "name": name, "columns": columns }))
}

fn insert(resource: &str, body: Value) -> RequestDescriptor {
    RequestDescriptor::new(Method::Post, resource).with_body(body)
}

fn command(value: Value) -> RequestDescriptor {
    RequestDescriptor::new(Method::Get, COMMAND_RESOURCE).with_json_param("query", value)
}

fn sql(statement: &str) -> RequestDescriptor {
    RequestDescriptor::new(Method::Get, SQL_RESOURCE)
        .with_json_param("query", json!({ "$sql": statement }))
}

fn filtered(method: Method, filter: Value) -> RequestDescriptor {
    RequestDescriptor::new(method, COLLECTION).with_json_param("query", filter)
}

fn drop_resource(name: &str) -> RequestDescriptor {
    RequestDescriptor::new(Method::Delete, name)
}

fn city_columns() -> Value {
    json!([
        {"name": "name", "type": "varchar(50)"},
        {"name": "population", "type": "int"},
        {"name": "longitude", "type": "Decimal(8,4)"},
        {"name": "latitude", "type": "Decimal(8,4)"},
        {"name": "code", "type": "int"}
    ])
}

fn country_columns() -> Value {
    json!([
        {"name": "countryCode", "type": "int"},
        {"name": "country", "type": "varchar(50)"}
    ])
}

fn batch_cities() -> Value {
    Value::Array(BATCH_CITIES.iter().map(|city| city.to_json()).collect())
}

fn countries() -> Value {
    json!(COUNTRIES)
}

/// `left` holds cities, `right` holds countries; rows match on `left.code = right.countryCode`.
pub fn join_query(left: &str, right: &str) -> Value {
    let mut collections = Map::new();
    collections.insert(
        String::from(left),
        json!({"$project": {"name": 1, "population": 1, "longitude": 1, "latitude": 1}}),
    );
    collections.insert(
        String::from(right),
        json!({"$project": {"countryCode": 1, "country": 1}}),
    );

    let mut condition = Map::new();
    condition.insert(
        format!("{}.code", left),
        Value::String(format!("{}.countryCode", right)),
    );

    json!({ "$collections": collections, "$condition": condition })
}

fn join(left: &str, right: &str) -> RequestDescriptor {
    RequestDescriptor::new(Method::Get, JOIN_RESOURCE)
        .with_json_param("query", join_query(left, right))
}

fn catalog() -> Vec<Step> {
    use StepGroup::*;

    vec![
        Step::new(
            &["1 Data Structures", "1.1 Create a collection"],
            "Create collection",
            Core,
            || create_resource(COLLECTION),
        ),
        Step::new(&["1.2 Create a table"], "Create table", Core, || {
            create_table(TABLE, city_columns())
        }),
        Step::new(
            &["\n2 Inserts", "2.1 Insert a single document"],
            "Create document",
            Core,
            || insert(COLLECTION, KANSAS_CITY.to_json()),
        ),
        Step::new(&[], "Create document", Core, || {
            insert(TABLE, KANSAS_CITY.to_json())
        }),
        Step::new(
            &["2.2 Insert multiple documents"],
            "Create multiple documents",
            Core,
            || insert(COLLECTION, batch_cities()),
        ),
        Step::new(&[], "Create multiple documents", Core, || {
            insert(TABLE, batch_cities())
        }),
        Step::new(
            &[
                "\n3 Queries",
                "3.1 Find documents in a collection that match a query condition",
            ],
            "List documents",
            Core,
            || {
                RequestDescriptor::new(Method::Get, COLLECTION)
                    .with_json_param("query", json!({"population": {"$gt": 8000000}, "code": 1}))
                    .with_json_param("fields", json!({"_id": 0}))
            },
        ),
        Step::new(
            &["3.2 Find all documents in a collection"],
            "List documents",
            Core,
            || RequestDescriptor::new(Method::Get, COLLECTION),
        ),
        Step::new(
            &["3.3 Count documents in a collection"],
            "Count documents",
            Core,
            || command(json!({"count": COLLECTION, "query": {"longitude": {"$lt": 40}}})),
        ),
        Step::new(
            &["3.4 Order documents in a collection"],
            "Sorted documents",
            Core,
            || {
                RequestDescriptor::new(Method::Get, COLLECTION)
                    .with_json_param("sort", json!({"population": 1}))
            },
        ),
        Step::new(
            &["3.5 Find distinct fields in a collection"],
            "Distinct documents",
            Core,
            || {
                command(json!({
                    "distinct": COLLECTION,
                    "key": "code",
                    "query": {"longitude": {"$gt": 40}}
                }))
            },
        ),
        Step::new(&["3.6 Joins"], "Create collection", Join, || {
            create_resource(COLLECTION_TO_JOIN)
        }),
        Step::new(&[], "Create multiple documents", Join, || {
            insert(COLLECTION_TO_JOIN, countries())
        }),
        Step::new(&[], "Create table", Join, || {
            create_table(TABLE_TO_JOIN, country_columns())
        }),
        Step::new(&[], "Create multiple documents", Join, || {
            insert(TABLE_TO_JOIN, countries())
        }),
        Step::new(&[], "Collection - Collection Join", Join, || {
            join(COLLECTION, COLLECTION_TO_JOIN)
        }),
        Step::new(&[], "Collection - Table Join", Join, || {
            join(TABLE, COLLECTION_TO_JOIN)
        }),
        Step::new(&[], "Table - Table Join", Join, || {
            join(TABLE, TABLE_TO_JOIN)
        }),
        Step::new(
            &["3.7 Modifying batch size"],
            "Batch documents",
            Core,
            || {
                RequestDescriptor::new(Method::Get, COLLECTION)
                    .with_param(QueryParam::new("batchSize", 2.to_string()))
            },
        ),
        Step::new(
            &["3.8 Find with projection clause"],
            "Projection documents",
            Core,
            || {
                RequestDescriptor::new(Method::Get, COLLECTION)
                    .with_json_param("fields", json!({"name": 1, "code": 1, "_id": 0}))
                    .with_json_param("query", json!({"population": {"$gt": 8000000}}))
            },
        ),
        Step::new(
            &["\n4 Update documents in a collection"],
            "Update document",
            Update,
            || {
                filtered(Method::Post, json!({"name": "Seattle"}))
                    .with_body(json!({"$set": {"code": 999}}))
            },
        ),
        Step::new(
            &["\n5 Delete documents in a collection"],
            "Delete document",
            Core,
            || filtered(Method::Delete, json!({"name": "Tokyo"})),
        ),
        Step::new(&["\n6 SQL passthrough"], "SQL Create", Core, || {
            sql("create table if not exists town (name varchar(255), countryCode int)")
        }),
        Step::new(&[], "SQL Insert", Core, || {
            sql("insert into town values ('Manhattan', 1)")
        }),
        Step::new(&[], "SQL Select", Core, || sql("select * from town")),
        Step::new(&[], "SQL Drop Table", Core, || sql("drop table town")),
        Step::new(&["\n7 Transactions"], "Transaction Enable", Transaction, || {
            command(json!({"transaction": "enable"}))
        }),
        Step::new(&[], "Create document", Transaction, || {
            insert(COLLECTION, SYDNEY.to_json())
        }),
        Step::new(&[], "Update document", Transaction, || {
            filtered(Method::Post, json!({"name": "Seattle"}))
                .with_body(json!({"$set": {"code": 998}}))
        }),
        Step::new(&[], "Transaction commit", Transaction, || {
            command(json!({"transaction": "commit"}))
        }),
        Step::new(&[], "Delete document", Transaction, || {
            filtered(Method::Delete, json!({"name": "Sydney"}))
        }),
        Step::new(&[], "Transaction Rollback", Transaction, || {
            command(json!({"transaction": "rollback"}))
        }),
        Step::new(&[], "Transaction Status", Transaction, || {
            command(json!({"transaction": "status"}))
        }),
        Step::new(&[], "Transaction disable", Transaction, || {
            command(json!({"transaction": "disable"}))
        }),
        Step::new(
            &["\n8 Catalog", "\n8.1 Collections + relational tables"],
            "Catalog",
            Catalog,
            || {
                RequestDescriptor::new(Method::Get, "")
                    .with_json_param("options", json!({"includeRelational": true}))
            },
        ),
        Step::new(
            &["\n8.2 Collections + relational tables + system tables"],
            "Catalog",
            Catalog,
            || {
                RequestDescriptor::new(Method::Get, "").with_json_param(
                    "options",
                    json!({"includeRelational": true, "includeSystem": true}),
                )
            },
        ),
        Step::new(&["\n9 Commands", "\n9.1 collStats"], "collStats", Core, || {
            command(json!({ "collStats": COLLECTION }))
        }),
        Step::new(&["\n9.2 dbStats"], "dbStats", Core, || {
            command(json!({"dbStats": 1}))
        }),
        Step::new(
            &["\n10 List all collections in a database"],
            "List all collections",
            Core,
            || RequestDescriptor::new(Method::Get, ""),
        ),
        Step::new(&["\n11 Drop a collection"], "Delete collection", Core, || {
            drop_resource(COLLECTION)
        }),
        Step::new(&[], "Delete Table", Core, || drop_resource(TABLE)),
        Step::new(&[], "Delete Collection", JoinTeardown, || {
            drop_resource(COLLECTION_TO_JOIN)
        }),
        Step::new(&[], "Delete Table", JoinTeardown, || {
            drop_resource(TABLE_TO_JOIN)
        }),
    ]
}
