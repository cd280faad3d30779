use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::debug;

use estimate_core::{
    CONTACT_SOURCE, ConstructionType, ContactInfo, ContactSubmission, CostBreakdown,
    ESTIMATE_SOURCE, EstimateRecord, EstimateRepository, InquiryKind, NewEstimateSubmission,
    ProjectEstimate, ProjectType, Region, RepositoryError, STATUS_NEW, StoredContact,
    StoredEstimate, Timeline,
};

use crate::decimal::{decimal_to_text, get_decimal};

const ESTIMATE_ID_PREFIX: &str = "est_";
const CONTACT_ID_PREFIX: &str = "contact_";

const ESTIMATE_COLUMNS: &str = "id, project_type, location, region, square_footage, stories,
    construction_type, special_requirements, timeline,
    contact_name, contact_email, contact_phone, contact_company,
    price, price_low, price_high,
    cost_materials, cost_labor, cost_permits, cost_management,
    timeline_weeks, source, status, created_at";

const CONTACT_COLUMNS: &str =
    "id, kind, name, email, phone, company, project_type, message, source, status, created_at";

/// Primary store: one row per estimate and per contact submission.
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = if database_url.contains(":memory:") {
            // Each connection to an in-memory database sees its own empty copy.
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };
        let pool = options
            .connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn db_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

fn get<'r, T>(row: &'r sqlx::sqlite::SqliteRow, column: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column)
        .map_err(|e| RepositoryError::Database(format!("Failed to get {}: {}", column, e)))
}

/// `"est_12"` → `12`. Anything else cannot exist in this store.
fn parse_id(id: &str, prefix: &str) -> Result<i64, RepositoryError> {
    id.strip_prefix(prefix)
        .and_then(|n| n.parse().ok())
        .ok_or(RepositoryError::NotFound)
}

fn row_to_stored_estimate(row: &sqlx::sqlite::SqliteRow) -> Result<StoredEstimate, RepositoryError> {
    let id: i64 = get(row, "id")?;
    let project_type: Option<String> = get(row, "project_type")?;
    let region: Option<String> = get(row, "region")?;
    let construction_type: String = get(row, "construction_type")?;
    let timeline: Option<String> = get(row, "timeline")?;
    let square_footage: i64 = get(row, "square_footage")?;
    let stories: i64 = get(row, "stories")?;
    let timeline_weeks: i64 = get(row, "timeline_weeks")?;

    let construction_type = ConstructionType::parse(&construction_type).ok_or_else(|| {
        RepositoryError::Database(format!("Invalid construction type: {}", construction_type))
    })?;
    let timeline = timeline
        .map(|t| {
            Timeline::parse(&t)
                .ok_or_else(|| RepositoryError::Database(format!("Invalid timeline: {}", t)))
        })
        .transpose()?;

    let record = EstimateRecord {
        project_type: project_type.map(|p| ProjectType::parse(&p)),
        location: get(row, "location")?,
        region: region.as_deref().and_then(Region::parse),
        square_footage: to_u32(square_footage, "square_footage")?,
        stories: to_u32(stories, "stories")?,
        construction_type,
        special_requirements: get(row, "special_requirements")?,
        timeline,
        contact: ContactInfo {
            name: get(row, "contact_name")?,
            email: get(row, "contact_email")?,
            phone: get(row, "contact_phone")?,
            company: get(row, "contact_company")?,
        },
    };

    let estimate = ProjectEstimate {
        price: get_decimal(row, "price")?,
        low: get_decimal(row, "price_low")?,
        high: get_decimal(row, "price_high")?,
        breakdown: CostBreakdown {
            materials: get_decimal(row, "cost_materials")?,
            labor: get_decimal(row, "cost_labor")?,
            permits: get_decimal(row, "cost_permits")?,
            management: get_decimal(row, "cost_management")?,
        },
        timeline_weeks: to_u32(timeline_weeks, "timeline_weeks")?,
    };

    Ok(StoredEstimate {
        id: format!("{ESTIMATE_ID_PREFIX}{id}"),
        record,
        estimate,
        source: get(row, "source")?,
        status: get(row, "status")?,
        synced: true,
        created_at: get::<DateTime<Utc>>(row, "created_at")?,
    })
}

fn row_to_stored_contact(row: &sqlx::sqlite::SqliteRow) -> Result<StoredContact, RepositoryError> {
    let id: i64 = get(row, "id")?;
    let kind: String = get(row, "kind")?;
    let kind = InquiryKind::parse(&kind)
        .ok_or_else(|| RepositoryError::Database(format!("Invalid inquiry kind: {}", kind)))?;

    Ok(StoredContact {
        id: format!("{CONTACT_ID_PREFIX}{id}"),
        submission: ContactSubmission {
            kind,
            name: get(row, "name")?,
            email: get(row, "email")?,
            phone: get(row, "phone")?,
            company: get(row, "company")?,
            project_type: get(row, "project_type")?,
            message: get(row, "message")?,
        },
        source: get(row, "source")?,
        status: get(row, "status")?,
        synced: true,
        created_at: get::<DateTime<Utc>>(row, "created_at")?,
    })
}

fn to_u32(value: i64, column: &str) -> Result<u32, RepositoryError> {
    u32::try_from(value)
        .map_err(|_| RepositoryError::Database(format!("{} out of range: {}", column, value)))
}

impl SqliteRepository {
    async fn get_contact(&self, id: i64) -> Result<StoredContact, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .ok_or(RepositoryError::NotFound)?;

        row_to_stored_contact(&row)
    }
}

#[async_trait]
impl EstimateRepository for SqliteRepository {
    fn backend_name(&self) -> &str {
        "sqlite"
    }

    async fn save_estimate(
        &self,
        submission: NewEstimateSubmission,
    ) -> Result<StoredEstimate, RepositoryError> {
        let NewEstimateSubmission { record, estimate } = submission;
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO estimates (
                project_type, location, region, square_footage, stories,
                construction_type, special_requirements, timeline,
                contact_name, contact_email, contact_phone, contact_company,
                price, price_low, price_high,
                cost_materials, cost_labor, cost_permits, cost_management,
                timeline_weeks, source, status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(record.project_type.as_ref().map(|p| p.as_str().to_string()))
        .bind(&record.location)
        .bind(record.region.map(|r| r.as_str()))
        .bind(i64::from(record.square_footage))
        .bind(i64::from(record.stories))
        .bind(record.construction_type.as_str())
        .bind(&record.special_requirements)
        .bind(record.timeline.map(|t| t.as_str()))
        .bind(&record.contact.name)
        .bind(&record.contact.email)
        .bind(&record.contact.phone)
        .bind(&record.contact.company)
        .bind(decimal_to_text(estimate.price))
        .bind(decimal_to_text(estimate.low))
        .bind(decimal_to_text(estimate.high))
        .bind(decimal_to_text(estimate.breakdown.materials))
        .bind(decimal_to_text(estimate.breakdown.labor))
        .bind(decimal_to_text(estimate.breakdown.permits))
        .bind(decimal_to_text(estimate.breakdown.management))
        .bind(i64::from(estimate.timeline_weeks))
        .bind(ESTIMATE_SOURCE)
        .bind(STATUS_NEW)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        let id = format!("{ESTIMATE_ID_PREFIX}{}", result.last_insert_rowid());
        debug!(%id, "inserted estimate row");
        self.get_estimate(&id).await
    }

    async fn get_estimate(&self, id: &str) -> Result<StoredEstimate, RepositoryError> {
        let id = parse_id(id, ESTIMATE_ID_PREFIX)?;
        let row = sqlx::query(&format!("SELECT {ESTIMATE_COLUMNS} FROM estimates WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .ok_or(RepositoryError::NotFound)?;

        row_to_stored_estimate(&row)
    }

    async fn list_estimates(&self) -> Result<Vec<StoredEstimate>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {ESTIMATE_COLUMNS} FROM estimates ORDER BY id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(row_to_stored_estimate).collect()
    }

    async fn save_contact(
        &self,
        submission: ContactSubmission,
    ) -> Result<StoredContact, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO contacts (
                kind, name, email, phone, company, project_type, message,
                source, status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(submission.kind.as_str())
        .bind(&submission.name)
        .bind(&submission.email)
        .bind(&submission.phone)
        .bind(&submission.company)
        .bind(&submission.project_type)
        .bind(&submission.message)
        .bind(CONTACT_SOURCE)
        .bind(STATUS_NEW)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        let id = result.last_insert_rowid();
        debug!(id, "inserted contact row");
        self.get_contact(id).await
    }

    async fn list_contacts(&self) -> Result<Vec<StoredContact>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(row_to_stored_contact).collect()
    }
}
