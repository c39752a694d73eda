use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    pub id: i64,
    pub nombre: String,
    pub apellido: String,
    pub dni: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub activo: i64,
    pub role: Option<String>,
}

impl Student {
    pub fn is_active(&self) -> bool {
        self.activo != 0
    }
}

/// Row about to be inserted into `estudiantes`; always created active.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub nombre: String,
    pub apellido: String,
    pub dni: String,
    pub email: String,
    pub password_hash: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Career {
    pub id: i64,
    pub nombre: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subject {
    pub id: i64,
    pub nombre: String,
    pub carrera_id: i64,
    pub anio: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EnrolledSubject {
    pub id: i64,
    pub nombre: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default = "Pagination::default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl Pagination {
    fn default_limit() -> i64 {
        10
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: Self::default_limit(),
            offset: 0,
        }
    }
}
