use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use super::error::ApiError;
use super::query::{BookQuery, ReportQuery};
use super::AppState;
use crate::app::Bookstore;
use crate::entity::{Entity, EntityId};
use crate::models::{Author, Book, BookSearch, Customer, Order};
use crate::store::EntityStore;

type Body<T> = Result<Json<T>, JsonRejection>;
type Id = Result<Path<EntityId>, PathRejection>;

/// Routes the generic CRUD handlers to the store for `T`.
pub trait StoreAccess<T: Entity> {
    fn store(&self) -> &EntityStore<T>;
}

impl StoreAccess<Book> for Bookstore {
    fn store(&self) -> &EntityStore<Book> {
        &self.books
    }
}

impl StoreAccess<Author> for Bookstore {
    fn store(&self) -> &EntityStore<Author> {
        &self.authors
    }
}

impl StoreAccess<Customer> for Bookstore {
    fn store(&self) -> &EntityStore<Customer> {
        &self.customers
    }
}

pub async fn ping() -> &'static str {
    "pong"
}

pub async fn list_entities<T>(State(state): State<AppState>) -> Result<Json<Vec<T>>, ApiError>
where
    T: Entity,
    Bookstore: StoreAccess<T>,
{
    let ctx = state.request_context();
    Ok(Json(StoreAccess::<T>::store(&state.app).list(&ctx)?))
}

pub async fn get_entity<T>(
    State(state): State<AppState>,
    id: Id,
) -> Result<Json<T>, ApiError>
where
    T: Entity,
    Bookstore: StoreAccess<T>,
{
    let Path(id) = id?;
    let ctx = state.request_context();
    Ok(Json(StoreAccess::<T>::store(&state.app).get(&ctx, id)?))
}

pub async fn create_entity<T>(
    State(state): State<AppState>,
    body: Body<T>,
) -> Result<impl IntoResponse, ApiError>
where
    T: Entity,
    Bookstore: StoreAccess<T>,
{
    let Json(entity) = body?;
    let ctx = state.request_context();
    let created = StoreAccess::<T>::store(&state.app).create(&ctx, entity)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_entity<T>(
    State(state): State<AppState>,
    id: Id,
    body: Body<T>,
) -> Result<Json<T>, ApiError>
where
    T: Entity,
    Bookstore: StoreAccess<T>,
{
    let Path(id) = id?;
    let Json(entity) = body?;
    let ctx = state.request_context();
    Ok(Json(StoreAccess::<T>::store(&state.app).update(&ctx, id, entity)?))
}

pub async fn delete_entity<T>(
    State(state): State<AppState>,
    id: Id,
) -> Result<StatusCode, ApiError>
where
    T: Entity,
    Bookstore: StoreAccess<T>,
{
    let Path(id) = id?;
    let ctx = state.request_context();
    StoreAccess::<T>::store(&state.app).delete(&ctx, id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn search_books(
    State(state): State<AppState>,
    query: Result<Query<BookQuery>, QueryRejection>,
) -> Result<Json<Vec<Book>>, ApiError> {
    let Query(query) = query?;
    let search = BookSearch::from(query);
    let ctx = state.request_context();
    Ok(Json(state.app.books.search(&ctx, &search)?))
}

pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, ApiError> {
    let ctx = state.request_context();
    Ok(Json(state.app.order_service.list_orders(&ctx)?))
}

pub async fn get_order(State(state): State<AppState>, id: Id) -> Result<Json<Order>, ApiError> {
    let Path(id) = id?;
    let ctx = state.request_context();
    Ok(Json(state.app.order_service.get_order(&ctx, id)?))
}

pub async fn create_order(
    State(state): State<AppState>,
    body: Body<Order>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(draft) = body?;
    let ctx = state.request_context();
    let order = state.app.order_service.create_order(&ctx, draft)?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn update_order(
    State(state): State<AppState>,
    id: Id,
    body: Body<Order>,
) -> Result<Json<Order>, ApiError> {
    let Path(id) = id?;
    let Json(draft) = body?;
    let ctx = state.request_context();
    Ok(Json(state.app.order_service.update_order(&ctx, id, draft)?))
}

pub async fn delete_order(
    State(state): State<AppState>,
    id: Id,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    let ctx = state.request_context();
    state.app.order_service.delete_order(&ctx, id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn sales_reports(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let (start, end) = query.range_ending_today()?;
    let ctx = state.request_context();
    let reports = state.app.reports.generated_between(&ctx, start, end)?;
    Ok(Json(json!({ "reports": reports })))
}
