#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use menu_api::auth::{generate_jwt, Claims};
use menu_api::database::{Menu, MenuOption, MemoryStore};
use menu_api::{app, AppState};

pub const JWT_SECRET: &str = "integration-test-secret";

/// Seeded in-memory service plus the ids tests need to address it.
pub struct TestApp {
    pub state: AppState,
    pub owner: Uuid,
    pub stranger: Uuid,
    pub category_mains: Uuid,
    pub category_sides: Uuid,
    pub menus: Vec<Menu>,
    pub options: Vec<MenuOption>,
}

impl TestApp {
    pub fn seeded() -> Result<Self> {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let category_mains = Uuid::new_v4();
        let category_sides = Uuid::new_v4();

        let menus = vec![
            menu("Burger", Decimal::new(850, 2), category_mains, Some(owner), 4),
            menu("Salad", Decimal::new(600, 2), category_sides, Some(owner), 3),
            menu("Tacos", Decimal::new(925, 2), category_mains, Some(stranger), 2),
            menu("Pasta", Decimal::new(1200, 2), category_mains, Some(owner), 1),
        ];
        let burger = menus[0].id;
        let options = vec![
            option("Extra cheese", Some(burger), true, 3, Some(owner)),
            option("Bun", Some(burger), false, 1, Some(owner)),
            option("Sauce", Some(burger), true, 2, Some(stranger)),
            option("Orphan", None, false, 1, None),
        ];

        let state = AppState::new(
            Arc::new(MemoryStore::with_records(menus.clone())?),
            Arc::new(MemoryStore::with_records(options.clone())?),
        )
        .with_jwt_secret(JWT_SECRET);

        Ok(Self {
            state,
            owner,
            stranger,
            category_mains,
            category_sides,
            menus,
            options,
        })
    }

    pub fn router(&self) -> Router {
        app(self.state.clone())
    }

    pub fn menu(&self, name: &str) -> &Menu {
        self.menus.iter().find(|m| m.name == name).expect("seeded menu")
    }

    pub fn option(&self, name: &str) -> &MenuOption {
        self.options.iter().find(|o| o.name == name).expect("seeded option")
    }
}

fn menu(name: &str, price: Decimal, category: Uuid, user_id: Option<Uuid>, age_days: i64) -> Menu {
    let created = Utc::now() - Duration::days(age_days);
    Menu {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: Some(format!("{} of the day", name)),
        price,
        category_id: Some(category),
        user_id,
        created_at: created,
        updated_at: created,
    }
}

fn option(name: &str, menu_id: Option<Uuid>, multiple: bool, max_selection: i32, user_id: Option<Uuid>) -> MenuOption {
    MenuOption {
        id: Uuid::new_v4(),
        name: name.to_string(),
        menu_id,
        multiple_selection: multiple,
        max_selection,
        required: false,
        is_active: true,
        user_id,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn token_for(user_id: Uuid) -> String {
    generate_jwt(&Claims::new(user_id, 1), JWT_SECRET).expect("token")
}

/// Build a request with an optional JSON body and bearer token.
pub fn request(method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("request")
}

/// Drive one request through the router and decode the JSON response.
pub async fn send(router: Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = router.oneshot(request).await.context("router call failed")?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let payload = serde_json::from_slice(&bytes)
        .with_context(|| format!("non-JSON response body: {}", String::from_utf8_lossy(&bytes)))?;
    Ok((status, payload))
}

pub fn names(payload: &Value) -> Vec<String> {
    payload["data"]
        .as_array()
        .map(|items| items.iter().filter_map(|i| i["name"].as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}
