//! Shared SQLite fixture for the integration tests

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use dispensation_core::application::ReportService;
use dispensation_core::domain::JOB_TYPE;
use dispensation_core::port::time_provider::FixedTimeProvider;
use dispensation_infra_sqlite::{create_pool, run_migrations, SqliteDispensationRepository};
use sqlx::SqlitePool;
use std::sync::Arc;

pub const STATUS_FOR_APPROVAL: i64 = 1;
pub const STATUS_APPROVED: i64 = 2;
pub const TYPE_EXTENSION: i64 = 1;
pub const TYPE_DISPENSATION: i64 = 2;

/// Frozen "now" used by every test
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

pub fn sqlite_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub struct JobSpec {
    pub id: i64,
    pub job_type: &'static str,
    pub status_id: i64,
    pub title: &'static str,
    pub created_at: String,
    pub deleted_at: Option<String>,
    pub archived_at: Option<String>,
}

impl JobSpec {
    /// A live job of the right type, created an hour ago, awaiting approval
    pub fn new(id: i64) -> Self {
        Self {
            id,
            job_type: JOB_TYPE,
            status_id: STATUS_FOR_APPROVAL,
            title: "Flag extension request",
            created_at: sqlite_time(now() - Duration::hours(1)),
            deleted_at: None,
            archived_at: None,
        }
    }
}

pub struct Store {
    pub pool: SqlitePool,
}

impl Store {
    pub async fn new() -> Self {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        for sql in [
            "INSERT INTO job_importances (id, name) VALUES (1, 'High')",
            "INSERT INTO departments (id, name) VALUES (1, 'Marine')",
            "INSERT INTO ports (id, name) VALUES (1, 'Piraeus')",
            "INSERT INTO job_statuses (id, name, label) VALUES (1, 'For Approval', 'for_approval')",
            "INSERT INTO job_statuses (id, name, label) VALUES (2, 'Approved', 'approved')",
            "INSERT INTO flag_extension_dispensation_types (id, name) VALUES (1, 'Extension')",
            "INSERT INTO flag_extension_dispensation_types (id, name) VALUES (2, 'Dispensation')",
        ] {
            sqlx::query(sql).execute(&pool).await.unwrap();
        }

        Self { pool }
    }

    pub async fn vessel(&self, id: i64, email: Option<&str>, name: &str, active: Option<&str>) {
        sqlx::query("INSERT INTO vessels (id, email, name, active) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(email)
            .bind(name)
            .bind(active)
            .execute(&self.pool)
            .await
            .unwrap();
    }

    pub async fn job(&self, spec: JobSpec) -> i64 {
        sqlx::query(
            "INSERT INTO jobs (id, type, importance_id, main_department_id, port_id, status_id, \
             title, due_date, created_at, deleted_at, archived_at) \
             VALUES (?, ?, 1, 1, 1, ?, ?, '2026-11-30', ?, ?, ?)",
        )
        .bind(spec.id)
        .bind(spec.job_type)
        .bind(spec.status_id)
        .bind(spec.title)
        .bind(&spec.created_at)
        .bind(&spec.deleted_at)
        .bind(&spec.archived_at)
        .execute(&self.pool)
        .await
        .unwrap();
        spec.id
    }

    pub async fn attach_vessel(&self, job_id: i64, vessel_id: i64) {
        sqlx::query("INSERT INTO job_vessels (job_id, vessel_id) VALUES (?, ?)")
            .bind(job_id)
            .bind(vessel_id)
            .execute(&self.pool)
            .await
            .unwrap();
    }

    pub async fn flag_extension(&self, job_id: i64, type_id: i64, requested_on: &str) {
        sqlx::query(
            "INSERT INTO job_vessel_flag_extensions (job_id, type_id, requested_on) VALUES (?, ?, ?)",
        )
        .bind(job_id)
        .bind(type_id)
        .bind(requested_on)
        .execute(&self.pool)
        .await
        .unwrap();
    }

    /// Active vessel 1 + a fully linked job
    pub async fn matching_job(&self, id: i64) -> i64 {
        self.job(JobSpec::new(id)).await;
        self.attach_vessel(id, 1).await;
        self.flag_extension(id, TYPE_EXTENSION, "2026-10-18").await;
        id
    }

    pub fn service(&self) -> ReportService {
        ReportService::new(
            Arc::new(SqliteDispensationRepository::new(self.pool.clone())),
            Arc::new(FixedTimeProvider(now())),
        )
    }
}
