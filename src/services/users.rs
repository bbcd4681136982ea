use chrono::Utc;
use serde_json::Value;

use crate::{
    db::{decode_all, to_fields, Collection, Direction, DocumentStore, Query},
    error::AppResult,
    models::{User, UserUpdate},
    services::sort_newest_first,
};

pub const LOAD_FAILURE: &str = "Failed to load users";

/// Full snapshot of the users collection, newest registration first
pub async fn load_users(store: &dyn DocumentStore) -> AppResult<Vec<User>> {
    let documents = store.list_documents(Collection::Users).await?;
    let mut users: Vec<User> = decode_all(documents)?;
    sort_newest_first(&mut users, |user| user.registration_date);

    tracing::debug!(count = users.len(), store = store.name(), "Loaded users");
    Ok(users)
}

pub async fn get_user(store: &dyn DocumentStore, id: &str) -> AppResult<Option<User>> {
    store
        .get_document(Collection::Users, id)
        .await?
        .map(|doc| doc.decode())
        .transpose()
}

/// Users ordered by registration date, newest first
///
/// Users without a registration date are not returned.
pub async fn get_users(store: &dyn DocumentStore, limit: Option<usize>) -> AppResult<Vec<User>> {
    let query = Query::new()
        .order_by("registrationDate", Direction::Descending)
        .limit(limit);
    decode_all(store.run_query(Collection::Users, &query).await?)
}

pub async fn get_users_by_preference(store: &dyn DocumentStore, preference: &str) -> AppResult<Vec<User>> {
    let query = Query::new().where_array_contains("preferences", preference);
    decode_all(store.run_query(Collection::Users, &query).await?)
}

/// Stores a new user and returns its id
///
/// The given `id` is ignored. The registration date defaults to now.
pub async fn create_user(store: &dyn DocumentStore, user: &User) -> AppResult<String> {
    let now = Utc::now();
    let user = User {
        registration_date: user.registration_date.or(Some(now)),
        created_at: Some(now),
        updated_at: Some(now),
        ..user.clone()
    };

    let id = store.create_document(Collection::Users, to_fields(&user)?).await?;
    tracing::info!(user_id = %id, "Created user");
    Ok(id)
}

pub async fn update_user(store: &dyn DocumentStore, id: &str, update: &UserUpdate) -> AppResult<()> {
    let mut fields = to_fields(update)?;
    fields.insert("updatedAt".to_string(), Value::String(Utc::now().to_rfc3339()));
    store.update_document(Collection::Users, id, fields).await
}

pub async fn delete_user(store: &dyn DocumentStore, id: &str) -> AppResult<()> {
    store.delete_document(Collection::Users, id).await?;
    tracing::info!(user_id = %id, "Deleted user");
    Ok(())
}
