//! OpenAPI description of the gateway.

use axum::{routing::get, Json, Router};
use refbook_core::limits;
use serde_json::{json, Value};

use crate::params::{max_length_message, BLANK_MESSAGE, DATE_FORMAT_MESSAGE, REQUIRED_MESSAGE};
use crate::AppState;

/// OpenAPI routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi))
}

async fn openapi() -> Json<Value> {
    Json(document())
}

fn date_parameter() -> Value {
    json!({
        "name": "date",
        "in": "query",
        "required": false,
        "description": "Effective date in YYYY-MM-DD form. When given, only catalogs \
                        with a version effective on or before this date are returned.",
        "schema": { "type": "string", "format": "date" },
    })
}

fn version_parameter() -> Value {
    json!({
        "name": "version",
        "in": "query",
        "required": false,
        "description": "Catalog version label. When omitted, the current version is used: \
                        the version with the latest effective date not after today.",
        "schema": { "type": "string", "maxLength": limits::VERSION_LABEL },
    })
}

fn id_parameter() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "description": "Catalog id.",
        "schema": { "type": "integer" },
    })
}

fn field_errors_response(example: Value) -> Value {
    json!({
        "description": "Invalid query parameters, keyed by parameter name.",
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/FieldErrors" },
                "example": example,
            }
        }
    })
}

fn ok_response(schema: &str, example: Value) -> Value {
    json!({
        "description": "OK",
        "content": {
            "application/json": {
                "schema": { "$ref": format!("#/components/schemas/{schema}") },
                "example": example,
            }
        }
    })
}

/// Build the OpenAPI 3 document.
pub fn document() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Refbook API",
            "description": "Versioned reference-book catalog.",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": {
            "/refbooks/": refbooks_path(),
            "/refbooks/{id}/elements/": elements_path(),
            "/refbooks/{id}/check_element/": check_element_path(),
            "/refbooks/overview/": overview_path(),
            "/health": {
                "get": {
                    "operationId": "health",
                    "summary": "Health check",
                    "responses": { "200": { "description": "OK" } },
                }
            },
        },
        "components": { "schemas": schemas() },
    })
}

fn refbooks_path() -> Value {
    let ok = json!({
        "refbooks": [
            { "id": 1, "code": "MS1", "name": "Medical specialties" },
            { "id": 2, "code": "ICD-10", "name": "ICD-10" },
        ]
    });
    json!({
        "get": {
            "operationId": "listRefbooks",
            "summary": "List catalogs",
            "parameters": [date_parameter()],
            "responses": {
                "200": ok_response("RefbookList", ok),
                "400": field_errors_response(json!({ "date": [DATE_FORMAT_MESSAGE] })),
            }
        }
    })
}

fn elements_path() -> Value {
    let ok = json!({
        "elements": [
            { "code": "J00", "value": "Acute nasopharyngitis" },
            { "code": "J01", "value": "Acute sinusitis" },
        ]
    });
    let bad = json!({ "version": [max_length_message(limits::VERSION_LABEL)] });
    json!({
        "get": {
            "operationId": "listElements",
            "summary": "List entries of a catalog version",
            "parameters": [id_parameter(), version_parameter()],
            "responses": {
                "200": ok_response("ElementList", ok),
                "400": field_errors_response(bad),
            }
        }
    })
}

fn check_element_path() -> Value {
    let code = json!({
        "name": "code",
        "in": "query",
        "required": true,
        "description": "Entry code.",
        "schema": { "type": "string", "maxLength": limits::ENTRY_CODE },
    });
    let value = json!({
        "name": "value",
        "in": "query",
        "required": true,
        "description": "Entry value.",
        "schema": { "type": "string", "maxLength": limits::ENTRY_VALUE },
    });
    let bad = json!({ "code": [REQUIRED_MESSAGE], "value": [BLANK_MESSAGE] });
    json!({
        "get": {
            "operationId": "checkElement",
            "summary": "Check that an entry exists in a catalog version",
            "parameters": [id_parameter(), code, value, version_parameter()],
            "responses": {
                "200": ok_response("CheckElement", json!({ "exists": true })),
                "400": field_errors_response(bad),
            }
        }
    })
}

fn overview_path() -> Value {
    let ok = json!({
        "refbooks": [{
            "id": 1,
            "code": "MS1",
            "name": "Medical specialties",
            "current_version": "2.0",
            "version_date": "2024-01-01",
        }]
    });
    json!({
        "get": {
            "operationId": "refbookOverview",
            "summary": "List catalogs with their current version",
            "parameters": [date_parameter()],
            "responses": {
                "200": ok_response("Overview", ok),
                "400": field_errors_response(json!({ "date": [DATE_FORMAT_MESSAGE] })),
            }
        }
    })
}

fn array_of(reference: &str) -> Value {
    json!({
        "type": "array",
        "items": { "$ref": format!("#/components/schemas/{reference}") },
    })
}

fn schemas() -> Value {
    let refbook = json!({
        "type": "object",
        "required": ["id", "code", "name"],
        "properties": {
            "id": { "type": "integer" },
            "code": { "type": "string", "maxLength": limits::CATALOG_CODE },
            "name": { "type": "string", "maxLength": limits::CATALOG_NAME },
        }
    });
    let element = json!({
        "type": "object",
        "required": ["code", "value"],
        "properties": {
            "code": { "type": "string", "maxLength": limits::ENTRY_CODE },
            "value": { "type": "string", "maxLength": limits::ENTRY_VALUE },
        }
    });
    let overview_item = json!({
        "type": "object",
        "required": ["id", "code", "name", "current_version", "version_date"],
        "properties": {
            "id": { "type": "integer" },
            "code": { "type": "string" },
            "name": { "type": "string" },
            "current_version": { "type": "string", "nullable": true },
            "version_date": { "type": "string", "format": "date", "nullable": true },
        }
    });
    let field_errors = json!({
        "type": "object",
        "additionalProperties": { "type": "array", "items": { "type": "string" } },
    });

    json!({
        "Refbook": refbook,
        "RefbookList": {
            "type": "object",
            "required": ["refbooks"],
            "properties": { "refbooks": array_of("Refbook") },
        },
        "Element": element,
        "ElementList": {
            "type": "object",
            "required": ["elements"],
            "properties": { "elements": array_of("Element") },
        },
        "CheckElement": {
            "type": "object",
            "required": ["exists"],
            "properties": { "exists": { "type": "boolean" } },
        },
        "OverviewItem": overview_item,
        "Overview": {
            "type": "object",
            "required": ["refbooks"],
            "properties": { "refbooks": array_of("OverviewItem") },
        },
        "FieldErrors": field_errors,
    })
}
