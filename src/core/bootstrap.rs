use uuid::Uuid;

use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;

/// Creates or repairs the configured admin account at startup. Without it a
/// fresh deployment has no way to reach the admin surface.
pub(crate) async fn ensure_superuser(state: &AppState) -> anyhow::Result<()> {
    let admin = state.settings().admin();
    if admin.first_superuser_password.is_empty() {
        tracing::warn!("FIRST_SUPERUSER_PASSWORD not configured; skipping superuser creation");
        return Ok(());
    }

    let email = &admin.first_superuser_email;
    let user = repositories::users::find_by_email(state.db(), email).await?;
    let now = primitive_now_utc();

    if let Some(user) = user {
        let mut needs_update = false;
        let verified =
            security::verify_password(&admin.first_superuser_password, &user.hashed_password)
                .unwrap_or(false);

        let hashed_password = if verified {
            None
        } else {
            needs_update = true;
            Some(security::hash_password(&admin.first_superuser_password)?)
        };

        let role = if user.role != UserRole::Admin {
            needs_update = true;
            Some(UserRole::Admin)
        } else {
            None
        };

        let is_active = if user.is_active {
            None
        } else {
            needs_update = true;
            Some(true)
        };

        if needs_update {
            sqlx::query(
                "UPDATE users
                 SET hashed_password = COALESCE($1, hashed_password),
                     role = COALESCE($2, role),
                     is_active = COALESCE($3, is_active),
                     updated_at = $4
                 WHERE id = $5",
            )
            .bind(hashed_password)
            .bind(role)
            .bind(is_active)
            .bind(now)
            .bind(&user.id)
            .execute(state.db())
            .await?;

            tracing::info!("Updated default superuser {email}");
        } else {
            tracing::info!("Default superuser already up to date");
        }

        return Ok(());
    }

    let hashed_password = security::hash_password(&admin.first_superuser_password)?;

    repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            id: &Uuid::new_v4().to_string(),
            email,
            hashed_password,
            first_name: "Platform",
            last_name: "Admin",
            role: UserRole::Admin,
            is_active: true,
            created_at: now,
            updated_at: now,
        },
    )
    .await?;

    tracing::info!("Created default superuser {email}");
    Ok(())
}
