//! Directory entities — the supporting records around a case.
//!
//! Hospitals, police stations, volunteers, documents, FIRs, addresses, and
//! contacts are plain CRUD rows with no business rules of their own; they
//! exist so cases can reference real-world parties and paperwork.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Audit stamp ─────────────────────────────────────────────────────────────

/// Creation/update audit fields shared by every directory entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Audit {
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub created_by: Option<Uuid>,
  pub updated_by: Option<Uuid>,
}

// ─── Hospital ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hospital {
  pub id:   Uuid,
  pub name: String,
  /// `government` or `private`.
  pub hospital_type: Option<String>,
  pub address_id:    Option<Uuid>,
  pub active:        bool,
  #[serde(flatten)]
  pub audit: Audit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewHospital {
  pub name:          String,
  pub hospital_type: Option<String>,
  pub address_id:    Option<Uuid>,
  #[serde(default = "default_true")]
  pub active: bool,
}

// ─── PoliceStation ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoliceStation {
  pub id:         Uuid,
  pub name:       String,
  pub phone_no:   Option<String>,
  pub address_id: Option<Uuid>,
  #[serde(flatten)]
  pub audit: Audit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPoliceStation {
  pub name:       String,
  pub phone_no:   Option<String>,
  pub address_id: Option<Uuid>,
}

// ─── Volunteer ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volunteer {
  pub id:        Uuid,
  pub full_name: String,
  pub age:       Option<i32>,
  pub gender:    Option<String>,
  pub volunteer_group: Option<String>,
  pub assigned_region: Option<String>,
  pub search_start_date: Option<NaiveDate>,
  pub search_end_date:   Option<NaiveDate>,
  pub blood_group: Option<String>,
  pub emergency_contact_name:  Option<String>,
  pub emergency_contact_phone: Option<String>,
  pub active: bool,
  #[serde(flatten)]
  pub audit: Audit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewVolunteer {
  pub full_name: String,
  pub age:       Option<i32>,
  pub gender:    Option<String>,
  pub volunteer_group: Option<String>,
  pub assigned_region: Option<String>,
  pub search_start_date: Option<NaiveDate>,
  pub search_end_date:   Option<NaiveDate>,
  pub blood_group: Option<String>,
  pub emergency_contact_name:  Option<String>,
  pub emergency_contact_phone: Option<String>,
  #[serde(default = "default_true")]
  pub active: bool,
}

// ─── Document ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
  pub id: Uuid,
  pub person_id:     Option<Uuid>,
  pub fir_id:        Option<Uuid>,
  pub document_type: Option<String>,
  pub description:   Option<String>,
  /// Storage path of the uploaded file; upload handling itself is the
  /// caller's concern.
  pub file_path: Option<String>,
  #[serde(flatten)]
  pub audit: Audit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDocument {
  pub person_id:     Option<Uuid>,
  pub fir_id:        Option<Uuid>,
  pub document_type: Option<String>,
  pub description:   Option<String>,
  pub file_path:     Option<String>,
}

// ─── FIR ─────────────────────────────────────────────────────────────────────

/// A first-information report filed for a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fir {
  pub id:         Uuid,
  pub fir_number: Option<String>,
  /// Free-form status: open, closed, in progress, …
  pub case_status: Option<String>,
  pub investigation_officer_name: Option<String>,
  pub police_station_id: Option<Uuid>,
  pub person_id:         Option<Uuid>,
  #[serde(flatten)]
  pub audit: Audit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewFir {
  pub fir_number:  Option<String>,
  pub case_status: Option<String>,
  pub investigation_officer_name: Option<String>,
  pub police_station_id: Option<Uuid>,
  pub person_id:         Option<Uuid>,
}

// ─── Address ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
  pub id: Uuid,
  /// permanent, current, last_found, body_found, …
  pub address_type: Option<String>,
  pub street:   Option<String>,
  pub city:     Option<String>,
  pub district: Option<String>,
  pub state:    Option<String>,
  pub pincode:  Option<String>,
  pub country:  Option<String>,
  pub landmark: Option<String>,
  pub latitude:  Option<f64>,
  pub longitude: Option<f64>,
  pub person_id: Option<Uuid>,
  #[serde(flatten)]
  pub audit: Audit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAddress {
  pub address_type: Option<String>,
  pub street:   Option<String>,
  pub city:     Option<String>,
  pub district: Option<String>,
  pub state:    Option<String>,
  pub pincode:  Option<String>,
  pub country:  Option<String>,
  pub landmark: Option<String>,
  pub latitude:  Option<f64>,
  pub longitude: Option<f64>,
  pub person_id: Option<Uuid>,
}

// ─── Contact ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
  pub id: Uuid,
  pub phone_no: Option<String>,
  pub email:    Option<String>,
  /// personal, emergency, referral, …
  pub contact_type: Option<String>,
  pub person_name:  Option<String>,
  pub is_primary:   bool,
  pub person_id:         Option<Uuid>,
  pub hospital_id:       Option<Uuid>,
  pub police_station_id: Option<Uuid>,
  pub volunteer_id:      Option<Uuid>,
  #[serde(flatten)]
  pub audit: Audit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewContact {
  pub phone_no: Option<String>,
  pub email:    Option<String>,
  pub contact_type: Option<String>,
  pub person_name:  Option<String>,
  #[serde(default)]
  pub is_primary: bool,
  pub person_id:         Option<Uuid>,
  pub hospital_id:       Option<Uuid>,
  pub police_station_id: Option<Uuid>,
  pub volunteer_id:      Option<Uuid>,
}

fn default_true() -> bool {
  true
}
