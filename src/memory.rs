//! In-memory [`Store`] for handler tests. Mirrors the MySQL schema closely
//! enough: unique `estudiantes.email`, auto-increment ids, no constraint on
//! enrollments.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::db::{Store, ACTIVE_ENROLLMENT};
use crate::models::{Career, EnrolledSubject, NewStudent, Pagination, Student, Subject};

#[derive(Debug, Clone)]
pub struct Enrollment {
    pub estudiante_id: i64,
    pub materia_id: i64,
    pub estado: String,
}

#[derive(Debug, Default)]
struct Tables {
    estudiantes: Vec<Student>,
    carreras: Vec<Career>,
    materias: Vec<Subject>,
    inscripciones: Vec<Enrollment>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    broken: bool,
}

impl MemoryStore {
    /// Every query fails as if the server had gone away.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn add_career(&self, id: i64, nombre: &str) {
        self.tables.lock().unwrap().carreras.push(Career {
            id,
            nombre: nombre.to_string(),
        });
    }

    pub fn add_subject(&self, id: i64, nombre: &str, carrera_id: i64, anio: i64) {
        self.tables.lock().unwrap().materias.push(Subject {
            id,
            nombre: nombre.to_string(),
            carrera_id,
            anio,
        });
    }

    pub fn set_active(&self, email: &str, activo: bool) {
        let mut tables = self.tables.lock().unwrap();
        for student in tables.estudiantes.iter_mut().filter(|s| s.email == email) {
            student.activo = activo as i64;
        }
    }

    pub fn set_estado(&self, estudiante_id: i64, materia_id: i64, estado: &str) {
        let mut tables = self.tables.lock().unwrap();
        for row in tables
            .inscripciones
            .iter_mut()
            .filter(|r| r.estudiante_id == estudiante_id && r.materia_id == materia_id)
        {
            row.estado = estado.to_string();
        }
    }

    pub fn student_count(&self) -> usize {
        self.tables.lock().unwrap().estudiantes.len()
    }

    pub fn enrollments(&self) -> Vec<Enrollment> {
        self.tables.lock().unwrap().inscripciones.clone()
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.broken {
            return Err(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection lost",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_student_by_email(&self, email: &str) -> Result<Option<Student>, sqlx::Error> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.estudiantes.iter().find(|s| s.email == email).cloned())
    }

    async fn insert_student(&self, student: NewStudent) -> Result<i64, sqlx::Error> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.estudiantes.iter().any(|s| s.email == student.email) {
            return Err(sqlx::Error::Protocol(format!(
                "Duplicate entry '{}' for key 'email'",
                student.email
            )));
        }
        let id = tables.estudiantes.len() as i64 + 1;
        tables.estudiantes.push(Student {
            id,
            nombre: student.nombre,
            apellido: student.apellido,
            dni: student.dni,
            email: student.email,
            password: student.password_hash,
            activo: 1,
            role: student.role,
        });
        Ok(id)
    }

    async fn list_careers(&self, page: Pagination) -> Result<Vec<Career>, sqlx::Error> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut careers = tables.carreras.clone();
        careers.sort_by_key(|c| c.id);
        Ok(careers
            .into_iter()
            .skip(page.offset.max(0) as usize)
            .take(page.limit.max(0) as usize)
            .collect())
    }

    async fn list_years(&self, carrera_id: i64) -> Result<Vec<i64>, sqlx::Error> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut years: Vec<i64> = tables
            .materias
            .iter()
            .filter(|m| m.carrera_id == carrera_id)
            .map(|m| m.anio)
            .collect();
        years.sort_unstable();
        years.dedup();
        Ok(years)
    }

    async fn list_subjects(&self, carrera_id: i64, anio: i64) -> Result<Vec<Subject>, sqlx::Error> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .materias
            .iter()
            .filter(|m| m.carrera_id == carrera_id && m.anio == anio)
            .cloned()
            .collect())
    }

    async fn find_subject(&self, materia_id: i64) -> Result<Option<Subject>, sqlx::Error> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.materias.iter().find(|m| m.id == materia_id).cloned())
    }

    async fn insert_enrollment(
        &self,
        estudiante_id: i64,
        materia_id: i64,
    ) -> Result<(), sqlx::Error> {
        self.check()?;
        self.tables.lock().unwrap().inscripciones.push(Enrollment {
            estudiante_id,
            materia_id,
            estado: ACTIVE_ENROLLMENT.to_string(),
        });
        Ok(())
    }

    async fn list_active_enrollments(
        &self,
        estudiante_id: i64,
    ) -> Result<Vec<EnrolledSubject>, sqlx::Error> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .inscripciones
            .iter()
            .filter(|i| i.estudiante_id == estudiante_id && i.estado == ACTIVE_ENROLLMENT)
            .filter_map(|i| tables.materias.iter().find(|m| m.id == i.materia_id))
            .map(|m| EnrolledSubject {
                id: m.id,
                nombre: m.nombre.clone(),
            })
            .collect())
    }
}
