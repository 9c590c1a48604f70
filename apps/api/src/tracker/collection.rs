use chrono::{DateTime, NaiveDate, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::tracker::store::{DocumentRow, SortOrder};

/// A record type stored in the document table under its own collection name.
///
/// Implement this to get list/create/get/update/delete routes from the
/// generic handlers in `tracker::handlers`.
pub trait Collection: Serialize + DeserializeOwned + Send + Sync + 'static {
    const NAME: &'static str;
    const ORDER: SortOrder;

    /// Request body accepted by `POST`.
    type Create: DeserializeOwned + Send + 'static;
    /// Request body accepted by `PUT`; absent fields are left untouched.
    type Patch: Serialize + DeserializeOwned + Send + 'static;

    fn from_create(input: Self::Create, today: NaiveDate) -> Result<Self, AppError>;

    /// Field checks and derived values, run after create and after every patch.
    fn normalize(&mut self) -> Result<(), AppError> {
        Ok(())
    }

    /// Bookkeeping applied on every update (e.g. a last-modified date).
    fn touch(&mut self, _today: NaiveDate) {}
}

/// A stored record as returned to clients: the body plus storage metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document<T> {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub body: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<T: DeserializeOwned> TryFrom<DocumentRow> for Document<T> {
    type Error = AppError;

    fn try_from(row: DocumentRow) -> Result<Self, AppError> {
        Ok(Document {
            id: row.id,
            user_id: row.user_id,
            body: serde_json::from_value(row.body)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Applies a patch to a record: top-level fields present in the patch replace
/// the record's, then the result is re-validated.
pub fn apply_patch<C: Collection>(
    current: &C,
    patch: C::Patch,
    today: NaiveDate,
) -> Result<C, AppError> {
    let mut body = serde_json::to_value(current)?;
    let patch = serde_json::to_value(patch)?;
    merge_top_level(&mut body, patch);

    let mut updated: C = serde_json::from_value(body)
        .map_err(|e| AppError::Validation(format!("Invalid update: {e}")))?;
    updated.touch(today);
    updated.normalize()?;
    Ok(updated)
}

fn merge_top_level(target: &mut Value, patch: Value) {
    if let (Value::Object(target), Value::Object(patch)) = (target, patch) {
        for (key, value) in patch {
            target.insert(key, value);
        }
    }
}

pub fn require_text(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}
