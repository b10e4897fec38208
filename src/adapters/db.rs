//! Postgres implementations of the store and lookup ports.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::config::db::DbConfig;
use crate::core::oid::TailCandidate;
use crate::domain::model::NewVehicle;
use crate::domain::ports::{PointLookup, VehicleStore};
use crate::utils::error::Result;

/// How the JSON `client` field of the `point` table is compared against
/// a tail candidate. The backend has stored `client` both as a number
/// and as a string over its lifetime, so the operator chooses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ClientMatch {
    Numeric,
    Text,
}

pub async fn connect(config: &DbConfig) -> Result<PgPool> {
    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.name)
        .username(&config.user)
        .password(&config.password);

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    Ok(pool)
}

pub struct PgVehicleStore {
    pool: PgPool,
}

impl PgVehicleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleStore for PgVehicleStore {
    async fn insert_vehicle(&self, vehicle: &NewVehicle) -> Result<()> {
        // Each insert is its own statement so one bad row cannot poison
        // the rest of the batch.
        sqlx::query(
            "insert into vehicle (imei, oid, license_plate_number, provider_id, moderation_status) \
             values ($1, $2, $3, $4, $5)",
        )
        .bind(&vehicle.imei)
        .bind(vehicle.oid as i64)
        .bind(&vehicle.license_plate_number)
        .bind(vehicle.provider_id)
        .bind(vehicle.moderation_status.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

pub struct PgPointLookup {
    pool: PgPool,
    match_as: ClientMatch,
}

impl PgPointLookup {
    pub fn new(pool: PgPool, match_as: ClientMatch) -> Self {
        Self { pool, match_as }
    }
}

#[async_trait]
impl PointLookup for PgPointLookup {
    async fn matches(&self, tail: &TailCandidate) -> Result<bool> {
        let row = match self.match_as {
            ClientMatch::Numeric => {
                sqlx::query("select 1 from point where (point->>'client')::bigint = $1 limit 1")
                    .bind(tail.value as i64)
                    .fetch_optional(&self.pool)
                    .await?
            }
            ClientMatch::Text => {
                sqlx::query("select 1 from point where point->>'client' = $1 limit 1")
                    .bind(&tail.text)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };
        Ok(row.is_some())
    }
}
