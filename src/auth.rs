use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::err::Success;
use crate::models::{NewStudent, Student};
use crate::{proceeds, Context, Error, Payload};

pub async fn register_student(
    Extension(ctx): Extension<Context>,
    payload: Result<Json<CreateStudent>, JsonRejection>,
) -> Result<(StatusCode, Json<Success<CreatedStudent>>), Error> {
    let Json(student) =
        payload.map_err(|err| Error::from(err).context("Error al registrar usuario"))?;
    let password_hash = ctx
        .hasher
        .hash(&student.password)
        .await
        .map_err(|err| err.context("Error al hashear la contraseña"))?;

    let user_id = ctx
        .store
        .insert_student(NewStudent {
            nombre: student.nombre,
            apellido: student.apellido,
            dni: student.dni,
            email: student.email,
            password_hash,
            role: None,
        })
        .await
        .map_err(|err| Error::internal("DatabaseError", "Error al registrar usuario", err))?;

    log::info!("Registered student {}", user_id);
    Ok((
        StatusCode::CREATED,
        Json(Success::of(CreatedStudent {
            message: "Usuario registrado con éxito",
            user_id,
        })),
    ))
}

/// Unknown email and wrong password answer identically. A deactivated
/// account is refused before its password is looked at.
pub async fn login_student(
    Extension(ctx): Extension<Context>,
    payload: Result<Json<LoginStudent>, JsonRejection>,
) -> Payload<LoggedInStudent> {
    let Json(login) =
        payload.map_err(|err| Error::from(err).context("Error al iniciar sesión"))?;
    let student = ctx
        .store
        .find_student_by_email(&login.email)
        .await
        .map_err(|err| Error::internal("DatabaseError", "Error al iniciar sesión", err))?;

    let student = if let Some(student) = student {
        student
    } else {
        return Err(Error::bad_credentials());
    };

    if !student.is_active() {
        return Err(Error::deactivated());
    }

    let matches = ctx
        .hasher
        .verify(&login.password, &student.password)
        .await
        .map_err(|err| err.context("Error al comparar contraseñas"))?;
    if !matches {
        return Err(Error::bad_credentials());
    }

    proceeds(LoggedInStudent {
        role: student.role.clone(),
        user: student,
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedStudent {
    message: &'static str,
    user_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoggedInStudent {
    role: Option<String>,
    user: Student,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginStudent {
    email: String,
    password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudent {
    pub nombre: String,
    pub apellido: String,
    pub dni: String,
    pub email: String,
    pub password: String,
}
