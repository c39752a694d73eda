//! Read-only lookups over careers and subjects.

use axum::extract::{Path, Query};
use axum::{Extension, Json};

use crate::models::{Career, Pagination, Subject};
use crate::{Context, Error};

pub async fn list_careers(
    Extension(ctx): Extension<Context>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Career>>, Error> {
    let careers = ctx
        .store
        .list_careers(page)
        .await
        .map_err(|err| Error::internal("DatabaseError", "Error al obtener carreras", err))?;
    Ok(Json(careers))
}

pub async fn list_years(
    Extension(ctx): Extension<Context>,
    Path(carrera_id): Path<i64>,
) -> Result<Json<Vec<i64>>, Error> {
    let years = ctx
        .store
        .list_years(carrera_id)
        .await
        .map_err(|err| Error::internal("DatabaseError", "Error al obtener años", err))?;
    Ok(Json(years))
}

pub async fn list_subjects(
    Extension(ctx): Extension<Context>,
    Path((carrera_id, anio)): Path<(i64, i64)>,
) -> Result<Json<Vec<Subject>>, Error> {
    let subjects = ctx
        .store
        .list_subjects(carrera_id, anio)
        .await
        .map_err(|err| Error::internal("DatabaseError", "Error al obtener materias", err))?;
    Ok(Json(subjects))
}
