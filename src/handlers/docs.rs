use axum::{
    response::{Html, IntoResponse},
    Json,
};
use once_cell::sync::Lazy;
use serde_json::{json, Value};

/// OpenAPI 3 description of the routes served locally. Anything else under
/// `/api` is forwarded to the legacy API and documented there.
static OPENAPI: Lazy<Value> = Lazy::new(|| {
    let error = json!({
        "type": "object",
        "properties": { "error": {} },
        "required": ["error"]
    });
    let reminder = json!({
        "type": "object",
        "properties": {
            "id": { "type": "integer" },
            "active": { "type": "boolean" },
            "author": { "type": "integer" },
            "mentions": { "type": "array", "items": { "type": "integer" } },
            "content": { "type": "string", "maxLength": 1500 },
            "expiration": { "type": "string", "format": "date-time" },
            "channel_id": { "type": "integer" },
            "jump_url": { "type": "string", "maxLength": 88 },
            "failures": { "type": "integer" }
        }
    });
    let reminder_id = json!({
        "name": "reminder_id", "in": "path", "required": true,
        "schema": { "type": "integer" }
    });
    let name = json!({
        "name": "name", "in": "query", "required": true,
        "schema": { "type": "string", "maxLength": 96 }
    });
    let not_found = json!({
        "description": "Not found",
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/ErrorMessage" } } }
    });

    json!({
        "openapi": "3.0.2",
        "info": { "title": "bot-api", "version": env!("CARGO_PKG_VERSION") },
        "components": {
            "schemas": { "ErrorMessage": error, "Reminder": reminder },
            "securitySchemes": { "token": { "type": "http", "scheme": "bearer" } }
        },
        "security": [{ "token": [] }],
        "paths": {
            "/": {
                "get": { "summary": "Health check", "responses": { "200": { "description": "OK" } } }
            },
            "/api/bot/reminders": {
                "get": {
                    "summary": "List reminders",
                    "parameters": [
                        { "name": "author__id", "in": "query", "schema": { "type": "integer" } },
                        { "name": "active", "in": "query", "schema": { "type": "boolean" } }
                    ],
                    "responses": { "200": { "description": "OK" }, "404": not_found }
                },
                "post": {
                    "summary": "Create a reminder",
                    "responses": {
                        "201": { "description": "Created" },
                        "400": { "description": "Invalid body" },
                        "404": not_found
                    }
                }
            },
            "/api/bot/reminders/{reminder_id}": {
                "parameters": [reminder_id],
                "get": { "summary": "Fetch a reminder", "responses": { "200": { "description": "OK" }, "404": not_found } },
                "patch": {
                    "summary": "Update a reminder",
                    "responses": {
                        "200": { "description": "OK" },
                        "400": { "description": "Invalid body" },
                        "404": not_found
                    }
                },
                "delete": { "summary": "Delete a reminder", "responses": { "204": { "description": "Deleted" }, "404": not_found } }
            },
            "/api/bot/off-topic-channel-names": {
                "get": {
                    "summary": "List or rotate off-topic channel names",
                    "parameters": [{ "name": "random_items", "in": "query", "schema": { "type": "integer" } }],
                    "responses": { "200": { "description": "OK" }, "400": { "description": "Invalid random_items" } }
                },
                "post": {
                    "summary": "Add an off-topic channel name",
                    "parameters": [name],
                    "responses": {
                        "201": { "description": "Created" },
                        "400": { "description": "Invalid name" },
                        "409": { "description": "Name already exists" }
                    }
                },
                "delete": {
                    "summary": "Delete an off-topic channel name",
                    "parameters": [name],
                    "responses": { "204": { "description": "Deleted" }, "404": not_found }
                }
            }
        }
    })
});

const DOCS_PAGE: &str = r##"<!DOCTYPE html>
<html>
<head>
<title>bot-api - Swagger UI</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
<div id="swagger-ui"></div>
<script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
<script>
SwaggerUIBundle({ url: "/openapi.json", dom_id: "#swagger-ui" });
</script>
</body>
</html>
"##;

/// GET /openapi.json - machine readable API description
pub async fn openapi_json() -> impl IntoResponse {
    Json(OPENAPI.clone())
}

/// GET /docs - interactive API documentation
pub async fn docs_page() -> Html<&'static str> {
    Html(DOCS_PAGE)
}
