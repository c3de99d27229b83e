//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings, dates as ISO dates, and
//! UUIDs as hyphenated lowercase strings. Enums are stored as their
//! snake_case discriminants. `match_parameters` and the known-languages
//! list are compact JSON.

use chrono::{DateTime, NaiveDate, Utc};
use reunite_core::{
  case::{ApproveStatus, CaseKind, CaseRecord, CaseStatus},
  directory::Audit,
  matching::{MatchRecord, MatchType, PartnerKind},
  user::{User, UserRole, UserStatus},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Primitives ──────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String {
  id.hyphenated().to_string()
}

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Ok(Uuid::parse_str(s)?)
}

pub fn encode_opt_uuid(id: Option<Uuid>) -> Option<String> {
  id.map(encode_uuid)
}

pub fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String {
  d.format("%Y-%m-%d").to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enum discriminants ──────────────────────────────────────────────────────

pub fn encode_case_kind(k: CaseKind) -> &'static str {
  match k {
    CaseKind::MissingPerson => "missing_person",
    CaseKind::UnidentifiedPerson => "unidentified_person",
    CaseKind::UnidentifiedBody => "unidentified_body",
  }
}

pub fn decode_case_kind(s: &str) -> Result<CaseKind> {
  match s {
    "missing_person" => Ok(CaseKind::MissingPerson),
    "unidentified_person" => Ok(CaseKind::UnidentifiedPerson),
    "unidentified_body" => Ok(CaseKind::UnidentifiedBody),
    other => Err(unknown("case kind", other)),
  }
}

pub fn encode_case_status(s: CaseStatus) -> &'static str {
  match s {
    CaseStatus::Pending => "pending",
    CaseStatus::Matched => "matched",
    CaseStatus::Resolved => "resolved",
  }
}

pub fn decode_case_status(s: &str) -> Result<CaseStatus> {
  match s {
    "pending" => Ok(CaseStatus::Pending),
    "matched" => Ok(CaseStatus::Matched),
    "resolved" => Ok(CaseStatus::Resolved),
    other => Err(unknown("case status", other)),
  }
}

pub fn encode_approve_status(s: ApproveStatus) -> &'static str {
  match s {
    ApproveStatus::Pending => "pending",
    ApproveStatus::Approved => "approved",
    ApproveStatus::Rejected => "rejected",
    ApproveStatus::Suspended => "suspended",
    ApproveStatus::OnHold => "on_hold",
    ApproveStatus::Archived => "archived",
  }
}

pub fn decode_approve_status(s: &str) -> Result<ApproveStatus> {
  match s {
    "pending" => Ok(ApproveStatus::Pending),
    "approved" => Ok(ApproveStatus::Approved),
    "rejected" => Ok(ApproveStatus::Rejected),
    "suspended" => Ok(ApproveStatus::Suspended),
    "on_hold" => Ok(ApproveStatus::OnHold),
    "archived" => Ok(ApproveStatus::Archived),
    other => Err(unknown("approve status", other)),
  }
}

pub fn encode_match_type(t: MatchType) -> &'static str {
  t.as_str()
}

pub fn decode_match_type(s: &str) -> Result<MatchType> {
  match s {
    "potential" => Ok(MatchType::Potential),
    "matched" => Ok(MatchType::Matched),
    "rejected" => Ok(MatchType::Rejected),
    "confirmed" => Ok(MatchType::Confirmed),
    other => Err(unknown("match type", other)),
  }
}

pub fn encode_partner_kind(k: PartnerKind) -> &'static str {
  match k {
    PartnerKind::UnidentifiedPerson => "unidentified_person",
    PartnerKind::UnidentifiedBody => "unidentified_body",
  }
}

pub fn decode_partner_kind(s: &str) -> Result<PartnerKind> {
  match s {
    "unidentified_person" => Ok(PartnerKind::UnidentifiedPerson),
    "unidentified_body" => Ok(PartnerKind::UnidentifiedBody),
    other => Err(unknown("partner kind", other)),
  }
}

pub fn encode_user_role(r: UserRole) -> &'static str {
  match r {
    UserRole::Admin => "admin",
    UserRole::Police => "police",
    UserRole::Hospital => "hospital",
    UserRole::Family => "family",
    UserRole::Volunteer => "volunteer",
    UserRole::Reporting => "reporting",
  }
}

pub fn decode_user_role(s: &str) -> Result<UserRole> {
  match s {
    "admin" => Ok(UserRole::Admin),
    "police" => Ok(UserRole::Police),
    "hospital" => Ok(UserRole::Hospital),
    "family" => Ok(UserRole::Family),
    "volunteer" => Ok(UserRole::Volunteer),
    "reporting" => Ok(UserRole::Reporting),
    other => Err(unknown("user role", other)),
  }
}

pub fn encode_user_status(s: UserStatus) -> &'static str {
  match s {
    UserStatus::Pending => "pending",
    UserStatus::Approved => "approved",
    UserStatus::Rejected => "rejected",
    UserStatus::Hold => "hold",
  }
}

pub fn decode_user_status(s: &str) -> Result<UserStatus> {
  match s {
    "pending" => Ok(UserStatus::Pending),
    "approved" => Ok(UserStatus::Approved),
    "rejected" => Ok(UserStatus::Rejected),
    "hold" => Ok(UserStatus::Hold),
    other => Err(unknown("user status", other)),
  }
}

fn unknown(what: &'static str, value: &str) -> Error {
  Error::UnknownDiscriminant { what, value: value.to_string() }
}

// ─── Audit columns ───────────────────────────────────────────────────────────

pub fn decode_audit(
  created_at: String,
  updated_at: String,
  created_by: Option<String>,
  updated_by: Option<String>,
) -> Result<Audit> {
  Ok(Audit {
    created_at: decode_dt(&created_at)?,
    updated_at: decode_dt(&updated_at)?,
    created_by: decode_opt_uuid(created_by)?,
    updated_by: decode_opt_uuid(updated_by)?,
  })
}

// ─── Case rows ───────────────────────────────────────────────────────────────

/// Column list matching [`RawCase`] field order; every case SELECT uses it.
pub const CASE_COLUMNS: &str = "id, case_id, kind, full_name, gender, age, \
   age_range, height, height_range, weight, blood_group, complexion, \
   hair_color, hair_type, eye_color, birth_mark, distinctive_mark, city, \
   district, state, country, pincode, reported_date, approve_status, \
   case_status, match_with, matched_person_id, matched_case_id, hospital_id, \
   deleted, created_at, updated_at, created_by, updated_by";

/// Raw strings read directly from a `cases` row.
pub struct RawCase {
  pub id:      String,
  pub case_id: Option<String>,
  pub kind:    String,
  pub full_name: Option<String>,
  pub gender:           Option<String>,
  pub age:              Option<i32>,
  pub age_range:        Option<String>,
  pub height:           Option<i32>,
  pub height_range:     Option<String>,
  pub weight:           Option<i32>,
  pub blood_group:      Option<String>,
  pub complexion:       Option<String>,
  pub hair_color:       Option<String>,
  pub hair_type:        Option<String>,
  pub eye_color:        Option<String>,
  pub birth_mark:       Option<String>,
  pub distinctive_mark: Option<String>,
  pub city:     Option<String>,
  pub district: Option<String>,
  pub state:    Option<String>,
  pub country:  Option<String>,
  pub pincode:  Option<String>,
  pub reported_date:  String,
  pub approve_status: String,
  pub case_status:    String,
  pub match_with:        Option<String>,
  pub matched_person_id: Option<String>,
  pub matched_case_id:   Option<String>,
  pub hospital_id:       Option<String>,
  pub deleted:    bool,
  pub created_at: String,
  pub updated_at: String,
  pub created_by: Option<String>,
  pub updated_by: Option<String>,
}

/// Read a [`RawCase`] from a row selected with [`CASE_COLUMNS`].
pub fn read_case(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawCase> {
  Ok(RawCase {
    id: row.get(0)?,
    case_id: row.get(1)?,
    kind: row.get(2)?,
    full_name: row.get(3)?,
    gender: row.get(4)?,
    age: row.get(5)?,
    age_range: row.get(6)?,
    height: row.get(7)?,
    height_range: row.get(8)?,
    weight: row.get(9)?,
    blood_group: row.get(10)?,
    complexion: row.get(11)?,
    hair_color: row.get(12)?,
    hair_type: row.get(13)?,
    eye_color: row.get(14)?,
    birth_mark: row.get(15)?,
    distinctive_mark: row.get(16)?,
    city: row.get(17)?,
    district: row.get(18)?,
    state: row.get(19)?,
    country: row.get(20)?,
    pincode: row.get(21)?,
    reported_date: row.get(22)?,
    approve_status: row.get(23)?,
    case_status: row.get(24)?,
    match_with: row.get(25)?,
    matched_person_id: row.get(26)?,
    matched_case_id: row.get(27)?,
    hospital_id: row.get(28)?,
    deleted: row.get(29)?,
    created_at: row.get(30)?,
    updated_at: row.get(31)?,
    created_by: row.get(32)?,
    updated_by: row.get(33)?,
  })
}

impl RawCase {
  pub fn into_case(self) -> Result<CaseRecord> {
    Ok(CaseRecord {
      id: decode_uuid(&self.id)?,
      case_id: self.case_id,
      kind: decode_case_kind(&self.kind)?,
      full_name: self.full_name,
      gender: self.gender,
      age: self.age,
      age_range: self.age_range,
      height: self.height,
      height_range: self.height_range,
      weight: self.weight,
      blood_group: self.blood_group,
      complexion: self.complexion,
      hair_color: self.hair_color,
      hair_type: self.hair_type,
      eye_color: self.eye_color,
      birth_mark: self.birth_mark,
      distinctive_mark: self.distinctive_mark,
      city: self.city,
      district: self.district,
      state: self.state,
      country: self.country,
      pincode: self.pincode,
      reported_date: decode_date(&self.reported_date)?,
      approve_status: decode_approve_status(&self.approve_status)?,
      case_status: decode_case_status(&self.case_status)?,
      match_with: self.match_with.as_deref().map(decode_case_kind).transpose()?,
      matched_person_id: decode_opt_uuid(self.matched_person_id)?,
      matched_case_id: self.matched_case_id,
      hospital_id: decode_opt_uuid(self.hospital_id)?,
      deleted: self.deleted,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      created_by: decode_opt_uuid(self.created_by)?,
      updated_by: decode_opt_uuid(self.updated_by)?,
    })
  }
}

// ─── Match rows ──────────────────────────────────────────────────────────────

/// Column list matching [`RawMatch`] field order.
pub const MATCH_COLUMNS: &str = "id, match_id, missing_person_id, partner_id, \
   partner_kind, match_type, score, match_parameters, reject_reason, \
   unreject_reason, confirmation_note, unconfirm_reason, match_with, \
   is_viewed, created_at, updated_at, created_by, updated_by";

/// Raw strings read directly from a `matches` row.
pub struct RawMatch {
  pub id:       String,
  pub match_id: String,
  pub missing_person_id: String,
  pub partner_id:        String,
  pub partner_kind:      String,
  pub match_type: String,
  pub score:      i64,
  pub match_parameters: String,
  pub reject_reason:     Option<String>,
  pub unreject_reason:   Option<String>,
  pub confirmation_note: Option<String>,
  pub unconfirm_reason:  Option<String>,
  pub match_with: Option<String>,
  pub is_viewed:  bool,
  pub created_at: String,
  pub updated_at: String,
  pub created_by: Option<String>,
  pub updated_by: Option<String>,
}

/// Read a [`RawMatch`] from a row selected with [`MATCH_COLUMNS`].
pub fn read_match(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawMatch> {
  Ok(RawMatch {
    id: row.get(0)?,
    match_id: row.get(1)?,
    missing_person_id: row.get(2)?,
    partner_id: row.get(3)?,
    partner_kind: row.get(4)?,
    match_type: row.get(5)?,
    score: row.get(6)?,
    match_parameters: row.get(7)?,
    reject_reason: row.get(8)?,
    unreject_reason: row.get(9)?,
    confirmation_note: row.get(10)?,
    unconfirm_reason: row.get(11)?,
    match_with: row.get(12)?,
    is_viewed: row.get(13)?,
    created_at: row.get(14)?,
    updated_at: row.get(15)?,
    created_by: row.get(16)?,
    updated_by: row.get(17)?,
  })
}

impl RawMatch {
  pub fn into_match(self) -> Result<MatchRecord> {
    Ok(MatchRecord {
      id: decode_uuid(&self.id)?,
      match_id: self.match_id,
      missing_person_id: decode_uuid(&self.missing_person_id)?,
      partner_id: decode_uuid(&self.partner_id)?,
      partner_kind: decode_partner_kind(&self.partner_kind)?,
      match_type: decode_match_type(&self.match_type)?,
      score: self.score.clamp(0, 100) as u8,
      match_parameters: serde_json::from_str(&self.match_parameters)?,
      reject_reason: self.reject_reason,
      unreject_reason: self.unreject_reason,
      confirmation_note: self.confirmation_note,
      unconfirm_reason: self.unconfirm_reason,
      match_with: self.match_with.as_deref().map(decode_case_kind).transpose()?,
      is_viewed: self.is_viewed,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      created_by: decode_opt_uuid(self.created_by)?,
      updated_by: decode_opt_uuid(self.updated_by)?,
    })
  }
}

// ─── User rows ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "id, first_name, last_name, email, phone_no, \
   role, status, password_hash, created_at, updated_at";

pub struct RawUser {
  pub id:         String,
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub phone_no:   Option<String>,
  pub role:       String,
  pub status:     String,
  pub password_hash: String,
  pub created_at: String,
  pub updated_at: String,
}

pub fn read_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    id: row.get(0)?,
    first_name: row.get(1)?,
    last_name: row.get(2)?,
    email: row.get(3)?,
    phone_no: row.get(4)?,
    role: row.get(5)?,
    status: row.get(6)?,
    password_hash: row.get(7)?,
    created_at: row.get(8)?,
    updated_at: row.get(9)?,
  })
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id: decode_uuid(&self.id)?,
      first_name: self.first_name,
      last_name: self.last_name,
      email: self.email,
      phone_no: self.phone_no,
      role: decode_user_role(&self.role)?,
      status: decode_user_status(&self.status)?,
      password_hash: self.password_hash,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

// ─── Directory rows ──────────────────────────────────────────────────────────

use reunite_core::directory::{
  Address, Contact, Document, Fir, Hospital, PoliceStation, Volunteer,
};

pub const HOSPITAL_COLUMNS: &str = "id, name, hospital_type, address_id, \
   active, created_at, updated_at, created_by, updated_by";

pub struct RawHospital {
  pub id:   String,
  pub name: String,
  pub hospital_type: Option<String>,
  pub address_id:    Option<String>,
  pub active:        bool,
  pub created_at: String,
  pub updated_at: String,
  pub created_by: Option<String>,
  pub updated_by: Option<String>,
}

pub fn read_hospital(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawHospital> {
  Ok(RawHospital {
    id: row.get(0)?,
    name: row.get(1)?,
    hospital_type: row.get(2)?,
    address_id: row.get(3)?,
    active: row.get(4)?,
    created_at: row.get(5)?,
    updated_at: row.get(6)?,
    created_by: row.get(7)?,
    updated_by: row.get(8)?,
  })
}

impl RawHospital {
  pub fn into_hospital(self) -> Result<Hospital> {
    Ok(Hospital {
      id: decode_uuid(&self.id)?,
      name: self.name,
      hospital_type: self.hospital_type,
      address_id: decode_opt_uuid(self.address_id)?,
      active: self.active,
      audit: decode_audit(
        self.created_at,
        self.updated_at,
        self.created_by,
        self.updated_by,
      )?,
    })
  }
}

pub const POLICE_STATION_COLUMNS: &str = "id, name, phone_no, address_id, \
   created_at, updated_at, created_by, updated_by";

pub struct RawPoliceStation {
  pub id:         String,
  pub name:       String,
  pub phone_no:   Option<String>,
  pub address_id: Option<String>,
  pub created_at: String,
  pub updated_at: String,
  pub created_by: Option<String>,
  pub updated_by: Option<String>,
}

pub fn read_police_station(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<RawPoliceStation> {
  Ok(RawPoliceStation {
    id: row.get(0)?,
    name: row.get(1)?,
    phone_no: row.get(2)?,
    address_id: row.get(3)?,
    created_at: row.get(4)?,
    updated_at: row.get(5)?,
    created_by: row.get(6)?,
    updated_by: row.get(7)?,
  })
}

impl RawPoliceStation {
  pub fn into_police_station(self) -> Result<PoliceStation> {
    Ok(PoliceStation {
      id: decode_uuid(&self.id)?,
      name: self.name,
      phone_no: self.phone_no,
      address_id: decode_opt_uuid(self.address_id)?,
      audit: decode_audit(
        self.created_at,
        self.updated_at,
        self.created_by,
        self.updated_by,
      )?,
    })
  }
}

pub const VOLUNTEER_COLUMNS: &str = "id, full_name, age, gender, \
   volunteer_group, assigned_region, search_start_date, search_end_date, \
   blood_group, emergency_contact_name, emergency_contact_phone, active, \
   created_at, updated_at, created_by, updated_by";

pub struct RawVolunteer {
  pub id:        String,
  pub full_name: String,
  pub age:       Option<i32>,
  pub gender:    Option<String>,
  pub volunteer_group: Option<String>,
  pub assigned_region: Option<String>,
  pub search_start_date: Option<String>,
  pub search_end_date:   Option<String>,
  pub blood_group: Option<String>,
  pub emergency_contact_name:  Option<String>,
  pub emergency_contact_phone: Option<String>,
  pub active:     bool,
  pub created_at: String,
  pub updated_at: String,
  pub created_by: Option<String>,
  pub updated_by: Option<String>,
}

pub fn read_volunteer(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawVolunteer> {
  Ok(RawVolunteer {
    id: row.get(0)?,
    full_name: row.get(1)?,
    age: row.get(2)?,
    gender: row.get(3)?,
    volunteer_group: row.get(4)?,
    assigned_region: row.get(5)?,
    search_start_date: row.get(6)?,
    search_end_date: row.get(7)?,
    blood_group: row.get(8)?,
    emergency_contact_name: row.get(9)?,
    emergency_contact_phone: row.get(10)?,
    active: row.get(11)?,
    created_at: row.get(12)?,
    updated_at: row.get(13)?,
    created_by: row.get(14)?,
    updated_by: row.get(15)?,
  })
}

impl RawVolunteer {
  pub fn into_volunteer(self) -> Result<Volunteer> {
    Ok(Volunteer {
      id: decode_uuid(&self.id)?,
      full_name: self.full_name,
      age: self.age,
      gender: self.gender,
      volunteer_group: self.volunteer_group,
      assigned_region: self.assigned_region,
      search_start_date: self
        .search_start_date
        .as_deref()
        .map(decode_date)
        .transpose()?,
      search_end_date: self
        .search_end_date
        .as_deref()
        .map(decode_date)
        .transpose()?,
      blood_group: self.blood_group,
      emergency_contact_name: self.emergency_contact_name,
      emergency_contact_phone: self.emergency_contact_phone,
      active: self.active,
      audit: decode_audit(
        self.created_at,
        self.updated_at,
        self.created_by,
        self.updated_by,
      )?,
    })
  }
}

pub const DOCUMENT_COLUMNS: &str = "id, person_id, fir_id, document_type, \
   description, file_path, created_at, updated_at, created_by, updated_by";

pub struct RawDocument {
  pub id:        String,
  pub person_id: Option<String>,
  pub fir_id:    Option<String>,
  pub document_type: Option<String>,
  pub description:   Option<String>,
  pub file_path:     Option<String>,
  pub created_at: String,
  pub updated_at: String,
  pub created_by: Option<String>,
  pub updated_by: Option<String>,
}

pub fn read_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawDocument> {
  Ok(RawDocument {
    id: row.get(0)?,
    person_id: row.get(1)?,
    fir_id: row.get(2)?,
    document_type: row.get(3)?,
    description: row.get(4)?,
    file_path: row.get(5)?,
    created_at: row.get(6)?,
    updated_at: row.get(7)?,
    created_by: row.get(8)?,
    updated_by: row.get(9)?,
  })
}

impl RawDocument {
  pub fn into_document(self) -> Result<Document> {
    Ok(Document {
      id: decode_uuid(&self.id)?,
      person_id: decode_opt_uuid(self.person_id)?,
      fir_id: decode_opt_uuid(self.fir_id)?,
      document_type: self.document_type,
      description: self.description,
      file_path: self.file_path,
      audit: decode_audit(
        self.created_at,
        self.updated_at,
        self.created_by,
        self.updated_by,
      )?,
    })
  }
}

pub const FIR_COLUMNS: &str = "id, fir_number, case_status, \
   investigation_officer_name, police_station_id, person_id, created_at, \
   updated_at, created_by, updated_by";

pub struct RawFir {
  pub id:          String,
  pub fir_number:  Option<String>,
  pub case_status: Option<String>,
  pub investigation_officer_name: Option<String>,
  pub police_station_id: Option<String>,
  pub person_id:         Option<String>,
  pub created_at: String,
  pub updated_at: String,
  pub created_by: Option<String>,
  pub updated_by: Option<String>,
}

pub fn read_fir(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawFir> {
  Ok(RawFir {
    id: row.get(0)?,
    fir_number: row.get(1)?,
    case_status: row.get(2)?,
    investigation_officer_name: row.get(3)?,
    police_station_id: row.get(4)?,
    person_id: row.get(5)?,
    created_at: row.get(6)?,
    updated_at: row.get(7)?,
    created_by: row.get(8)?,
    updated_by: row.get(9)?,
  })
}

impl RawFir {
  pub fn into_fir(self) -> Result<Fir> {
    Ok(Fir {
      id: decode_uuid(&self.id)?,
      fir_number: self.fir_number,
      case_status: self.case_status,
      investigation_officer_name: self.investigation_officer_name,
      police_station_id: decode_opt_uuid(self.police_station_id)?,
      person_id: decode_opt_uuid(self.person_id)?,
      audit: decode_audit(
        self.created_at,
        self.updated_at,
        self.created_by,
        self.updated_by,
      )?,
    })
  }
}

pub const ADDRESS_COLUMNS: &str = "id, address_type, street, city, district, \
   state, pincode, country, landmark, latitude, longitude, person_id, \
   created_at, updated_at, created_by, updated_by";

pub struct RawAddress {
  pub id:           String,
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
  pub person_id: Option<String>,
  pub created_at: String,
  pub updated_at: String,
  pub created_by: Option<String>,
  pub updated_by: Option<String>,
}

pub fn read_address(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawAddress> {
  Ok(RawAddress {
    id: row.get(0)?,
    address_type: row.get(1)?,
    street: row.get(2)?,
    city: row.get(3)?,
    district: row.get(4)?,
    state: row.get(5)?,
    pincode: row.get(6)?,
    country: row.get(7)?,
    landmark: row.get(8)?,
    latitude: row.get(9)?,
    longitude: row.get(10)?,
    person_id: row.get(11)?,
    created_at: row.get(12)?,
    updated_at: row.get(13)?,
    created_by: row.get(14)?,
    updated_by: row.get(15)?,
  })
}

impl RawAddress {
  pub fn into_address(self) -> Result<Address> {
    Ok(Address {
      id: decode_uuid(&self.id)?,
      address_type: self.address_type,
      street: self.street,
      city: self.city,
      district: self.district,
      state: self.state,
      pincode: self.pincode,
      country: self.country,
      landmark: self.landmark,
      latitude: self.latitude,
      longitude: self.longitude,
      person_id: decode_opt_uuid(self.person_id)?,
      audit: decode_audit(
        self.created_at,
        self.updated_at,
        self.created_by,
        self.updated_by,
      )?,
    })
  }
}

pub const CONTACT_COLUMNS: &str = "id, phone_no, email, contact_type, \
   person_name, is_primary, person_id, hospital_id, police_station_id, \
   volunteer_id, created_at, updated_at, created_by, updated_by";

pub struct RawContact {
  pub id:       String,
  pub phone_no: Option<String>,
  pub email:    Option<String>,
  pub contact_type: Option<String>,
  pub person_name:  Option<String>,
  pub is_primary:   bool,
  pub person_id:         Option<String>,
  pub hospital_id:       Option<String>,
  pub police_station_id: Option<String>,
  pub volunteer_id:      Option<String>,
  pub created_at: String,
  pub updated_at: String,
  pub created_by: Option<String>,
  pub updated_by: Option<String>,
}

pub fn read_contact(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawContact> {
  Ok(RawContact {
    id: row.get(0)?,
    phone_no: row.get(1)?,
    email: row.get(2)?,
    contact_type: row.get(3)?,
    person_name: row.get(4)?,
    is_primary: row.get(5)?,
    person_id: row.get(6)?,
    hospital_id: row.get(7)?,
    police_station_id: row.get(8)?,
    volunteer_id: row.get(9)?,
    created_at: row.get(10)?,
    updated_at: row.get(11)?,
    created_by: row.get(12)?,
    updated_by: row.get(13)?,
  })
}

impl RawContact {
  pub fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      id: decode_uuid(&self.id)?,
      phone_no: self.phone_no,
      email: self.email,
      contact_type: self.contact_type,
      person_name: self.person_name,
      is_primary: self.is_primary,
      person_id: decode_opt_uuid(self.person_id)?,
      hospital_id: decode_opt_uuid(self.hospital_id)?,
      police_station_id: decode_opt_uuid(self.police_station_id)?,
      volunteer_id: decode_opt_uuid(self.volunteer_id)?,
      audit: decode_audit(
        self.created_at,
        self.updated_at,
        self.created_by,
        self.updated_by,
      )?,
    })
  }
}
