use serde::Serialize;

/// Moderation workflow state of a vehicle record. Freshly imported
/// vehicles always start out `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Rejected => "rejected",
        }
    }
}

/// Row inserted into the `vehicle` table by the bulk import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVehicle {
    pub imei: String,
    pub oid: u64,
    pub license_plate_number: String,
    pub provider_id: i32,
    pub moderation_status: ModerationStatus,
}

/// One line of the check-imei report. `client_tail` is empty when no
/// tail of the IMEI matched a point record.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TailMatch {
    #[serde(rename = "IMEI")]
    pub imei: String,
    pub client_tail: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Header row the vehicle export endpoint is contractually required to
/// produce. Column names are in the backend's reporting language.
pub const EXPORT_HEADERS: [&str; 6] = [
    "ID",
    "IMEI",
    "OID",
    "Название",
    "ID провайдера",
    "Статус модерации",
];
