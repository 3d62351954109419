use chrono::{Duration, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use agora_types::errors::{ApplicationError, DbError};

/// Populates an empty database with development fixtures: one admin, a few
/// members, their posts, and reports in every lifecycle state. Honors the
/// one-report-per-(post, reporter) constraint.
pub async fn seed_demo_data(pool: &PgPool) -> Result<bool, ApplicationError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

    if count > 0 {
        return Ok(false);
    }

    tracing::info!("Seeding demo data");
    let mut tx = pool.begin().await.map_err(DbError::Database)?;

    let admin = insert_user(&mut tx, "Alex Moreau", "admin@agora.community", "admin").await?;
    let mina = insert_user(&mut tx, "Mina Kovacs", "mina@example.com", "user").await?;
    let theo = insert_user(&mut tx, "Theo Lindqvist", "theo@example.com", "user").await?;
    let sam = insert_user(&mut tx, "Sam Okafor", "sam@example.com", "user").await?;

    let giveaway = insert_post(&mut tx, mina, "Free crypto giveaway, click fast").await?;
    let crochet = insert_post(&mut tx, theo, "My first crochet patterns").await?;
    let rant = insert_post(&mut tx, sam, "Why the mods are ruining this place").await?;

    // Open reports.
    insert_report(
        &mut tx,
        giveaway,
        theo,
        "spam",
        Some("Repeated advertising for the same scheme"),
        None,
    )
    .await?;
    insert_report(&mut tx, rant, mina, "inappropriate", None, None).await?;
    insert_report(
        &mut tx,
        rant,
        theo,
        "harassment",
        Some("Keeps calling out individual moderators"),
        None,
    )
    .await?;

    // Decided reports, with the decision fields set together.
    insert_report(
        &mut tx,
        giveaway,
        sam,
        "fake",
        Some("This is a known scam"),
        Some(Decision {
            admin_id: admin,
            status: "resolved",
            note: "Post removed, author warned",
            days_ago: 2,
        }),
    )
    .await?;
    insert_report(
        &mut tx,
        crochet,
        sam,
        "other",
        None,
        Some(Decision {
            admin_id: admin,
            status: "rejected",
            note: "No violation found",
            days_ago: 1,
        }),
    )
    .await?;

    tx.commit()
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

    Ok(true)
}

struct Decision {
    admin_id: Uuid,
    status: &'static str,
    note: &'static str,
    days_ago: i64,
}

async fn insert_user(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
    email: &str,
    role: &str,
) -> Result<Uuid, ApplicationError> {
    let id = Uuid::new_v4();

    sqlx::query("INSERT INTO users (id, name, email, role) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(role)
        .execute(&mut *tx.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

    Ok(id)
}

async fn insert_post(
    tx: &mut Transaction<'_, Postgres>,
    author_user_id: Uuid,
    title: &str,
) -> Result<Uuid, ApplicationError> {
    let id = Uuid::new_v4();

    sqlx::query("INSERT INTO posts (id, author_user_id, title) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(author_user_id)
        .bind(title)
        .execute(&mut *tx.as_mut())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

    Ok(id)
}

async fn insert_report(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
    reporter_user_id: Uuid,
    reason: &str,
    description: Option<&str>,
    decision: Option<Decision>,
) -> Result<Uuid, ApplicationError> {
    let id = Uuid::new_v4();
    let created_at = Utc::now() - Duration::days(7);

    let (status, admin_note, resolved_at, resolved_by) = match &decision {
        Some(d) => (
            d.status,
            Some(d.note),
            Some(Utc::now() - Duration::days(d.days_ago)),
            Some(d.admin_id),
        ),
        None => ("pending", None, None, None),
    };

    sqlx::query(
        r#"
        INSERT INTO reports
            (id, post_id, reporter_user_id, reason, description, status,
             admin_note, resolved_at, resolved_by, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(id)
    .bind(post_id)
    .bind(reporter_user_id)
    .bind(reason)
    .bind(description)
    .bind(status)
    .bind(admin_note)
    .bind(resolved_at)
    .bind(resolved_by)
    .bind(created_at)
    .bind(resolved_at.unwrap_or(created_at))
    .execute(&mut *tx.as_mut())
    .await
    .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

    Ok(id)
}
