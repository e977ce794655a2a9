use crate::{config::Config, db::Db, errors::ApiError, models::document::Document, storage};
use actix_files::NamedFile;
use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionType};
use actix_web::{web, HttpRequest, HttpResponse};
use futures_util::TryStreamExt as _;
use std::io::Write;
use std::path::Path;

/// Text fields of the upload form. Fields the client omits stay empty and
/// are stored as empty strings.
#[derive(Default)]
struct UploadFields {
    document_name: String,
    document_revision: String,
    document_code: String,
    department: String,
    document_type: String,
    revision_date: String,
}

struct UploadedFile {
    original_name: String,
    data: Vec<u8>,
}

pub async fn upload(
    cfg: web::Data<Config>,
    db: web::Data<Db>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let mut fields = UploadFields::default();
    let mut file: Option<UploadedFile> = None;

    while let Some(mut field) = payload.try_next().await.map_err(|e| {
        log::error!("multipart parse error: {e}");
        ApiError::Upload(e.to_string())
    })? {
        let name = field.name().unwrap_or("").to_string();
        if name == "documentFile" {
            let original_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename().map(|s| s.to_string()))
                .unwrap_or_else(|| "upload.bin".into());
            let data = read_file_field(&mut field, cfg.max_upload_size).await?;
            file = Some(UploadedFile {
                original_name,
                data,
            });
        } else {
            let text = read_text_field(&mut field).await?;
            match name.as_str() {
                "documentName" => fields.document_name = text,
                "documentRevision" => fields.document_revision = text,
                "documentCode" => fields.document_code = text,
                "documentDepartment" => fields.department = text,
                "documentType" => fields.document_type = text,
                "revisionDate" => fields.revision_date = text,
                _ => {}
            }
        }
    }

    let file = file.ok_or_else(|| {
        log::error!("upload request without a documentFile part");
        ApiError::Upload("missing documentFile field".into())
    })?;

    let uploads_dir = Path::new(&cfg.uploads_dir);
    storage::ensure_upload_dir(uploads_dir).map_err(|e| {
        log::error!("cannot create upload directory: {e}");
        ApiError::Upload(e.to_string())
    })?;

    let stored_name =
        storage::destination_filename(&file.original_name, Some(&fields.document_name));
    let dest = uploads_dir.join(&stored_name);
    let mut f = std::fs::File::create(&dest).map_err(|e| {
        log::error!("file write error at {}: {e}", dest.display());
        ApiError::Upload(e.to_string())
    })?;
    f.write_all(&file.data).map_err(|e| {
        log::error!("file write error at {}: {e}", dest.display());
        ApiError::Upload(e.to_string())
    })?;

    // The file is on disk from here on. An insert failure below leaves it
    // behind with no row pointing at it; there is no rollback.
    let file_path = dest.to_string_lossy().to_string();
    sqlx::query(
        "INSERT INTO documents (document_name, document_revision, document_code, department, document_type, file_path, revision_date) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&fields.document_name)
    .bind(&fields.document_revision)
    .bind(&fields.document_code)
    .bind(&fields.department)
    .bind(&fields.document_type)
    .bind(&file_path)
    .bind(&fields.revision_date)
    .execute(&db.0)
    .await
    .map_err(|e| ApiError::db("Failed to save document metadata", e))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "File uploaded and metadata saved successfully",
        "file": {
            "original_name": file.original_name,
            "stored_name": stored_name,
            "path": file_path,
            "size_bytes": file.data.len(),
        }
    })))
}

async fn read_file_field(
    field: &mut actix_multipart::Field,
    max_size: usize,
) -> Result<Vec<u8>, ApiError> {
    let mut data: Vec<u8> = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(|e| {
        log::error!("upload read error: {e}");
        ApiError::Upload(e.to_string())
    })? {
        data.extend_from_slice(&chunk);
        if data.len() > max_size {
            log::error!("upload rejected: exceeds {max_size} byte limit");
            return Err(ApiError::Upload("file exceeds size limit".into()));
        }
    }
    Ok(data)
}

async fn read_text_field(field: &mut actix_multipart::Field) -> Result<String, ApiError> {
    let mut data: Vec<u8> = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(|e| {
        log::error!("upload read error: {e}");
        ApiError::Upload(e.to_string())
    })? {
        data.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&data).into_owned())
}

pub async fn list_by_department(
    db: web::Data<Db>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let department = path.into_inner();
    let rows: Vec<Document> =
        sqlx::query_as("SELECT * FROM documents WHERE department = ? ORDER BY id")
            .bind(&department)
            .fetch_all(&db.0)
            .await
            .map_err(|e| ApiError::db("Failed to retrieve documents", e))?;
    Ok(HttpResponse::Ok().json(rows))
}

// Matched against document_name, which carries no uniqueness constraint:
// when several rows share a name, only the oldest row is served.
pub async fn fetch_document(
    cfg: web::Data<Config>,
    db: web::Data<Db>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let filename = path.into_inner();
    let doc: Option<Document> =
        sqlx::query_as("SELECT * FROM documents WHERE document_name = ? ORDER BY id LIMIT 1")
            .bind(&filename)
            .fetch_optional(&db.0)
            .await
            .map_err(|e| ApiError::db("Failed to retrieve document", e))?;
    let doc = doc.ok_or(ApiError::NotFound("Document not found"))?;

    let p = storage::resolve_stored_path(Path::new(&cfg.uploads_dir), &doc.file_path);
    if !p.exists() {
        log::error!("file missing on disk: {}", p.display());
        return Err(ApiError::NotFound("File not found"));
    }

    let named = NamedFile::open_async(&p)
        .await
        .map_err(|e| {
            log::error!("file open error at {}: {e}", p.display());
            ApiError::Stream(e.to_string())
        })?
        .set_content_disposition(ContentDisposition {
            disposition: DispositionType::Inline,
            parameters: vec![],
        });
    Ok(named.into_response(&req))
}
