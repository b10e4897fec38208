use crate::core::oid::TailCandidate;
use crate::domain::model::NewVehicle;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Write side of the bulk import. Implemented over Postgres in
/// production and over a Vec in tests.
#[async_trait]
pub trait VehicleStore: Send + Sync {
    async fn insert_vehicle(&self, vehicle: &NewVehicle) -> Result<()>;
}

/// Answers whether a tail candidate matches the `client` field of any
/// `point` record.
#[async_trait]
pub trait PointLookup: Send + Sync {
    async fn matches(&self, tail: &TailCandidate) -> Result<bool>;
}
