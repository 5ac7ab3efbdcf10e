//! Shared fixtures for integration tests.

#![allow(dead_code)]

use formstate::prelude::*;
use serde_json::{Value, json};
use simplelog::{Config, LevelFilter, TestLogger};

pub fn init_logger() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}

pub fn values() -> Value {
    json!({
        "username": "horace",
        "email": "H@race.com",
        "password": "xxxx",
        "samePassword": "xxxxx",
        "quantity": 99,
        "seniority": "",
        "accomplishment": [
            { "name": "Ate lunch", "id": "1" },
            { "name": "Made a div", "id": "2" },
        ],
    })
}

pub fn schema() -> Schema {
    Schema::new()
        .field(
            "username",
            Rules::new()
                .rule("required", rules::required())
                .rule("minLength", rules::min_length(3)),
        )
        .field(
            "email",
            Rules::new()
                .rule("required", rules::required())
                .rule("email", rules::email()),
        )
        .field("password", Rules::new().rule("required", rules::required()))
        .field(
            "samePassword",
            Rules::new()
                .rule("required", rules::required())
                .rule("matches", rules::same_as("password")),
        )
        .field("quantity", Rules::new().rule("required", rules::required()))
        .field("seniority", Rules::new().rule("required", rules::required()))
        .field(
            "accomplishment",
            Rules::new().rule(
                "custom",
                rules::custom("The answer is div", |value| {
                    value
                        .as_array()
                        .is_some_and(|items| items.iter().any(|item| item["id"] == "2"))
                }),
            ),
        )
}

pub fn validation() -> Validation {
    init_logger();
    Validation::with_values(schema(), values()).expect("fixture values match the schema")
}

pub fn field(form: &Form, name: &str) -> FieldState {
    form.field(name)
        .unwrap_or_else(|| panic!("fixture form has no field '{name}'"))
}
