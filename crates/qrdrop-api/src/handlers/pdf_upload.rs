use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::{extract_pdf_field, rejected_multipart};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Extension, Json,
};
use qrdrop_core::PublishResponse;
use qrdrop_infra::RequestId;
use std::sync::Arc;
use tracing::Instrument;

#[utoipa::path(
    post,
    path = "/upload",
    tag = "upload",
    request_body(
        content = inline(Object),
        content_type = "multipart/form-data",
        description = "One file part named `pdf` declared as `application/pdf`"
    ),
    responses(
        (status = 200, description = "Document stamped and stored", body = PublishResponse),
        (status = 400, description = "No file, or the file is not declared as a PDF", body = String, content_type = "text/plain"),
        (status = 413, description = "File too large", body = String, content_type = "text/plain"),
        (status = 500, description = "Processing or storage failure", body = String, content_type = "text/plain")
    )
)]
pub async fn upload_pdf(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PublishResponse>, HttpAppError> {
    let span = tracing::info_span!("publish", request_id = %request_id.0);

    async move {
        let upload = match multipart {
            Ok(multipart) => extract_pdf_field(multipart).await?,
            Err(rejection) => rejected_multipart(rejection),
        };
        let response = state.publisher.publish(upload).await?;
        Ok::<_, HttpAppError>(Json(response))
    }
    .instrument(span)
    .await
}
