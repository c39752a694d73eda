//! Data access: every query the server issues goes through [`Store`].
//!
//! [`MySqlStore`] is the production implementation. Queries use `?`
//! placeholders with bound parameters; nothing is interpolated.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};

use crate::config::Config;
use crate::models::{Career, EnrolledSubject, NewStudent, Pagination, Student, Subject};

/// Status written on enrollment and matched when listing.
pub const ACTIVE_ENROLLMENT: &str = "activa";

pub const RECONNECT_DELAY: Duration = Duration::from_secs(2);

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_student_by_email(&self, email: &str) -> Result<Option<Student>, sqlx::Error>;

    /// Returns the generated id.
    async fn insert_student(&self, student: NewStudent) -> Result<i64, sqlx::Error>;

    async fn list_careers(&self, page: Pagination) -> Result<Vec<Career>, sqlx::Error>;

    /// Distinct years of a career's subjects, ascending.
    async fn list_years(&self, carrera_id: i64) -> Result<Vec<i64>, sqlx::Error>;

    async fn list_subjects(&self, carrera_id: i64, anio: i64) -> Result<Vec<Subject>, sqlx::Error>;

    async fn find_subject(&self, materia_id: i64) -> Result<Option<Subject>, sqlx::Error>;

    /// No uniqueness check: enrolling twice yields two rows.
    async fn insert_enrollment(&self, estudiante_id: i64, materia_id: i64)
        -> Result<(), sqlx::Error>;

    async fn list_active_enrollments(
        &self,
        estudiante_id: i64,
    ) -> Result<Vec<EnrolledSubject>, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for MySqlStore {
    async fn find_student_by_email(&self, email: &str) -> Result<Option<Student>, sqlx::Error> {
        sqlx::query_as::<_, Student>(
            "SELECT id, nombre, apellido, dni, email, password, activo, role \
             FROM estudiantes WHERE email = ? LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn insert_student(&self, student: NewStudent) -> Result<i64, sqlx::Error> {
        let res = sqlx::query(
            "INSERT INTO estudiantes (nombre, apellido, dni, email, password, activo, role) \
             VALUES (?, ?, ?, ?, ?, 1, ?)",
        )
        .bind(student.nombre)
        .bind(student.apellido)
        .bind(student.dni)
        .bind(student.email)
        .bind(student.password_hash)
        .bind(student.role)
        .execute(&self.pool)
        .await?;
        Ok(res.last_insert_id() as i64)
    }

    async fn list_careers(&self, page: Pagination) -> Result<Vec<Career>, sqlx::Error> {
        sqlx::query_as::<_, Career>("SELECT id, nombre FROM carreras ORDER BY id LIMIT ? OFFSET ?")
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await
    }

    async fn list_years(&self, carrera_id: i64) -> Result<Vec<i64>, sqlx::Error> {
        let years: Vec<(i64,)> = sqlx::query_as(
            "SELECT DISTINCT anio FROM materias WHERE carrera_id = ? ORDER BY anio ASC",
        )
        .bind(carrera_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(years.into_iter().map(|(anio,)| anio).collect())
    }

    async fn list_subjects(&self, carrera_id: i64, anio: i64) -> Result<Vec<Subject>, sqlx::Error> {
        sqlx::query_as::<_, Subject>(
            "SELECT id, nombre, carrera_id, anio FROM materias WHERE carrera_id = ? AND anio = ?",
        )
        .bind(carrera_id)
        .bind(anio)
        .fetch_all(&self.pool)
        .await
    }

    async fn find_subject(&self, materia_id: i64) -> Result<Option<Subject>, sqlx::Error> {
        sqlx::query_as::<_, Subject>(
            "SELECT id, nombre, carrera_id, anio FROM materias WHERE id = ? LIMIT 1",
        )
        .bind(materia_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn insert_enrollment(
        &self,
        estudiante_id: i64,
        materia_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO inscripciones (estudiante_id, materia_id, estado) VALUES (?, ?, ?)")
            .bind(estudiante_id)
            .bind(materia_id)
            .bind(ACTIVE_ENROLLMENT)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_active_enrollments(
        &self,
        estudiante_id: i64,
    ) -> Result<Vec<EnrolledSubject>, sqlx::Error> {
        sqlx::query_as::<_, EnrolledSubject>(
            "SELECT m.id, m.nombre FROM inscripciones i \
             JOIN materias m ON m.id = i.materia_id \
             WHERE i.estudiante_id = ? AND i.estado = ?",
        )
        .bind(estudiante_id)
        .bind(ACTIVE_ENROLLMENT)
        .fetch_all(&self.pool)
        .await
    }
}

/// Errors after which a fresh connection attempt makes sense.
pub fn is_connection_loss(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut
    )
}

/// Opens the pool, retrying every [`RECONNECT_DELAY`] for as long as the
/// server is unreachable. Any other failure (bad credentials, unknown
/// schema) is returned to the caller.
pub async fn connect(config: &Config) -> anyhow::Result<MySqlPool> {
    let options = connect_options(config);
    loop {
        let attempt = MySqlPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect_with(options.clone())
            .await;
        match attempt {
            Ok(pool) => {
                log::info!(
                    "Connected to MySQL at {}:{}",
                    config.db_host,
                    config.db_port
                );
                return Ok(pool);
            }
            Err(err) if is_connection_loss(&err) => {
                log::error!(
                    "Could not reach MySQL ({}), retrying in {}s",
                    err,
                    RECONNECT_DELAY.as_secs()
                );
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
            Err(err) => return Err(err.into()),
        }
    }
}

fn connect_options(config: &Config) -> MySqlConnectOptions {
    let options = MySqlConnectOptions::new()
        .host(&config.db_host)
        .port(config.db_port)
        .username(&config.db_user)
        .password(&config.db_password);
    match &config.db_database {
        Some(database) => options.database(database),
        None => options,
    }
}
