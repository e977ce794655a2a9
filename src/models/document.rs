use serde::{Deserialize, Serialize};

/// One metadata row per uploaded document. Rows are written once by the
/// upload handler and never updated or deleted.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Document {
    pub id: i64,
    pub document_name: String,
    pub document_revision: String,
    pub document_code: String,
    pub department: String,
    pub document_type: String,
    pub file_path: String,
    pub revision_date: String,
}
