use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::models::EnrolledSubject;
use crate::{Context, Error};

/// Enrolls a student in an existing subject. Only the subject is checked;
/// the student id is written as given and repeated calls add repeated rows.
pub async fn enroll_student(
    Extension(ctx): Extension<Context>,
    payload: Result<Json<EnrollStudent>, JsonRejection>,
) -> Result<String, Error> {
    let Json(body) = payload.map_err(|err| Error::from(err).context("Error al matricular"))?;
    let subject = ctx
        .store
        .find_subject(body.materia_id)
        .await
        .map_err(|err| Error::internal("DatabaseError", "Error al buscar la materia", err))?;

    let subject = subject.ok_or_else(|| Error::NotFound {
        message: format!("Materia {} no encontrada", body.materia_id),
    })?;

    ctx.store
        .insert_enrollment(body.usuario_id, subject.id)
        .await
        .map_err(|err| Error::internal("DatabaseError", "Error al matricular", err))?;

    log::info!(
        "Student {} enrolled in subject {}",
        body.usuario_id,
        subject.id
    );
    Ok(format!("Matriculado en {}", subject.nombre))
}

pub async fn list_enrolled_subjects(
    Extension(ctx): Extension<Context>,
    Path(usuario_id): Path<i64>,
) -> Result<Json<Vec<EnrolledSubject>>, Error> {
    let subjects = ctx
        .store
        .list_active_enrollments(usuario_id)
        .await
        .map_err(|err| {
            Error::internal("DatabaseError", "Error al obtener materias matriculadas", err)
        })?;
    Ok(Json(subjects))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollStudent {
    usuario_id: i64,
    materia_id: i64,
}
