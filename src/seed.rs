use crate::db::Store;
use crate::hash::Hasher;
use crate::models::NewStudent;

pub const ADMIN_EMAIL: &str = "admin@admin.com";
pub const ADMIN_PASSWORD: &str = "1234";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created,
    AlreadyPresent,
    Failed,
}

/// Makes sure the default administrator exists. Failures are logged and
/// reported, never propagated: the server starts regardless.
pub async fn ensure_admin(store: &dyn Store, hasher: &Hasher) -> SeedOutcome {
    match store.find_student_by_email(ADMIN_EMAIL).await {
        Ok(Some(_)) => {
            log::info!("Admin user already exists");
            return SeedOutcome::AlreadyPresent;
        }
        Ok(None) => {}
        Err(err) => {
            log::error!("Could not check for the admin user: {}", err);
            return SeedOutcome::Failed;
        }
    }

    let password_hash = match hasher.hash(ADMIN_PASSWORD).await {
        Ok(hash) => hash,
        Err(err) => {
            log::error!("Could not hash the admin password: {:?}", err);
            return SeedOutcome::Failed;
        }
    };

    let admin = NewStudent {
        nombre: "Admin".to_string(),
        apellido: "Admin".to_string(),
        dni: "00000000".to_string(),
        email: ADMIN_EMAIL.to_string(),
        password_hash,
        role: Some("admin".to_string()),
    };
    match store.insert_student(admin).await {
        Ok(id) => {
            log::info!("Created default admin user (id {})", id);
            SeedOutcome::Created
        }
        Err(err) => {
            log::error!("Could not create the admin user: {}", err);
            SeedOutcome::Failed
        }
    }
}
