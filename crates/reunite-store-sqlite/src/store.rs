//! [`SqliteStore`] — the SQLite implementation of the store traits.
//!
//! The wrapped connection is serialized, so multi-statement writes wrapped
//! in a transaction inside one `call` closure are atomic and free of
//! interleaving with other writers.

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use reunite_core::{
  case::{
    AdditionalInfo, ApproveStatus, CaseKind, CaseRecord, CaseStatus,
    CaseUpdate, NewCase,
  },
  directory::{
    Address, Audit, Contact, Document, Fir, Hospital, NewAddress, NewContact,
    NewDocument, NewFir, NewHospital, NewPoliceStation, NewVolunteer,
    PoliceStation, Volunteer,
  },
  idgen,
  matching::{MatchRecord, NewMatch, PartnerKind},
  store::{
    CaseQuery, CaseResolution, CaseStore, ConfirmApply, DirectoryStore,
    MatchStore, UserStore,
  },
  user::{NewUser, User, UserStatus},
};

use crate::{
  Error, Result,
  encode::{
    ADDRESS_COLUMNS, CASE_COLUMNS, CONTACT_COLUMNS, DOCUMENT_COLUMNS,
    FIR_COLUMNS, HOSPITAL_COLUMNS, MATCH_COLUMNS, POLICE_STATION_COLUMNS,
    RawAddress, RawCase, RawContact, RawDocument, RawFir, RawHospital,
    RawMatch, RawPoliceStation, RawUser, RawVolunteer, USER_COLUMNS,
    VOLUNTEER_COLUMNS, encode_approve_status, encode_case_kind,
    encode_case_status, encode_date, encode_dt, encode_match_type,
    encode_opt_uuid, encode_partner_kind, encode_user_role,
    encode_user_status, encode_uuid, read_address, read_case, read_contact,
    read_document, read_fir, read_hospital, read_match, read_police_station,
    read_user, read_volunteer,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Reunite store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row helpers ─────────────────────────────────────────────────────────────

/// Insert a fully-built case row. Callers have already allocated `case_id`.
fn insert_case_row(
  conn: &rusqlite::Connection,
  case: &CaseRecord,
) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO cases (
       id, case_id, kind, full_name, gender, age, age_range, height,
       height_range, weight, blood_group, complexion, hair_color, hair_type,
       eye_color, birth_mark, distinctive_mark, city, district, state,
       country, pincode, reported_date, approve_status, case_status,
       match_with, matched_person_id, matched_case_id, hospital_id, deleted,
       created_at, updated_at, created_by, updated_by
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
       ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28,
       ?29, ?30, ?31, ?32, ?33, ?34)",
    rusqlite::params![
      encode_uuid(case.id),
      case.case_id,
      encode_case_kind(case.kind),
      case.full_name,
      case.gender,
      case.age,
      case.age_range,
      case.height,
      case.height_range,
      case.weight,
      case.blood_group,
      case.complexion,
      case.hair_color,
      case.hair_type,
      case.eye_color,
      case.birth_mark,
      case.distinctive_mark,
      case.city,
      case.district,
      case.state,
      case.country,
      case.pincode,
      encode_date(case.reported_date),
      encode_approve_status(case.approve_status),
      encode_case_status(case.case_status),
      case.match_with.map(encode_case_kind),
      encode_opt_uuid(case.matched_person_id),
      case.matched_case_id,
      encode_opt_uuid(case.hospital_id),
      case.deleted,
      encode_dt(case.created_at),
      encode_dt(case.updated_at),
      encode_opt_uuid(case.created_by),
      encode_opt_uuid(case.updated_by),
    ],
  )?;
  Ok(())
}

/// Rewrite the intake-editable columns of a case row.
fn update_case_row(
  conn: &rusqlite::Connection,
  case: &CaseRecord,
) -> rusqlite::Result<usize> {
  conn.execute(
    "UPDATE cases SET
       full_name = ?2, gender = ?3, age = ?4, age_range = ?5, height = ?6,
       height_range = ?7, weight = ?8, blood_group = ?9, complexion = ?10,
       hair_color = ?11, hair_type = ?12, eye_color = ?13, birth_mark = ?14,
       distinctive_mark = ?15, city = ?16, district = ?17, state = ?18,
       country = ?19, pincode = ?20, hospital_id = ?21, updated_at = ?22,
       updated_by = ?23
     WHERE id = ?1",
    rusqlite::params![
      encode_uuid(case.id),
      case.full_name,
      case.gender,
      case.age,
      case.age_range,
      case.height,
      case.height_range,
      case.weight,
      case.blood_group,
      case.complexion,
      case.hair_color,
      case.hair_type,
      case.eye_color,
      case.birth_mark,
      case.distinctive_mark,
      case.city,
      case.district,
      case.state,
      case.country,
      case.pincode,
      encode_opt_uuid(case.hospital_id),
      encode_dt(case.updated_at),
      encode_opt_uuid(case.updated_by),
    ],
  )
}

/// Rewrite the mutable lifecycle columns of a match row.
fn update_match_row(
  conn: &rusqlite::Connection,
  m: &MatchRecord,
  updated_at: &str,
) -> rusqlite::Result<usize> {
  conn.execute(
    "UPDATE matches SET
       match_type = ?2, reject_reason = ?3, unreject_reason = ?4,
       confirmation_note = ?5, unconfirm_reason = ?6, match_with = ?7,
       is_viewed = ?8, updated_at = ?9, updated_by = ?10
     WHERE id = ?1",
    rusqlite::params![
      encode_uuid(m.id),
      encode_match_type(m.match_type),
      m.reject_reason,
      m.unreject_reason,
      m.confirmation_note,
      m.unconfirm_reason,
      m.match_with.map(encode_case_kind),
      m.is_viewed,
      updated_at,
      encode_opt_uuid(m.updated_by),
    ],
  )
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

// ─── CaseStore impl ──────────────────────────────────────────────────────────

impl CaseStore for SqliteStore {
  type Error = Error;

  async fn create_case(&self, input: NewCase) -> Result<CaseRecord> {
    let now = Utc::now();
    let city = input
      .city
      .as_deref()
      .map(str::trim)
      .filter(|c| !c.is_empty())
      .map(str::to_owned);

    let case = CaseRecord {
      id: Uuid::new_v4(),
      case_id: None,
      kind: input.kind,
      full_name: input.full_name,
      gender: input.gender,
      age: input.age,
      age_range: input.age_range,
      height: input.height,
      height_range: input.height_range,
      weight: input.weight,
      blood_group: input.blood_group,
      complexion: input.complexion,
      hair_color: input.hair_color,
      hair_type: input.hair_type,
      eye_color: input.eye_color,
      birth_mark: input.birth_mark,
      distinctive_mark: input.distinctive_mark,
      city,
      district: input.district,
      state: input.state,
      country: input.country,
      pincode: input.pincode,
      reported_date: input.reported_date.unwrap_or_else(|| now.date_naive()),
      approve_status: ApproveStatus::default(),
      case_status: CaseStatus::default(),
      match_with: None,
      matched_person_id: None,
      matched_case_id: None,
      hospital_id: input.hospital_id,
      deleted: false,
      created_at: now,
      updated_at: now,
      created_by: input.created_by,
      updated_by: input.created_by,
    };

    // Case-id allocation and the insert share one transaction, so two
    // concurrent intakes for the same (kind, city, month) cannot both
    // observe the same sequence number.
    let stored = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let kind_str = encode_case_kind(case.kind);
        let ym = case.reported_date.format("%Y-%m").to_string();

        let mut allocated = None;
        for _ in 0..5 {
          let count: i64 = tx.query_row(
            "SELECT COUNT(*) FROM cases
             WHERE kind = ?1 AND city IS ?2 AND substr(reported_date, 1, 7) = ?3",
            rusqlite::params![kind_str, case.city, ym],
            |r| r.get(0),
          )?;
          let candidate = idgen::case_id(
            case.kind,
            case.reported_date,
            case.city.as_deref(),
            (count + 1) as u32,
          );
          let taken: bool = tx
            .query_row(
              "SELECT 1 FROM cases WHERE case_id = ?1",
              rusqlite::params![candidate],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
          if !taken {
            allocated = Some(candidate);
            break;
          }
        }

        let case_id = allocated.unwrap_or_else(|| {
          idgen::fallback_case_id(
            case.kind,
            case.reported_date,
            case.city.as_deref(),
          )
        });
        let mut case = case;
        case.case_id = Some(case_id);

        insert_case_row(&tx, &case)?;
        tx.commit()?;
        Ok(case)
      })
      .await?;

    Ok(stored)
  }

  async fn get_case(&self, id: Uuid) -> Result<Option<CaseRecord>> {
    let id_str = encode_uuid(id);
    let sql = format!("SELECT {CASE_COLUMNS} FROM cases WHERE id = ?1");

    let raw: Option<RawCase> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], |row| read_case(row))
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCase::into_case).transpose()
  }

  async fn list_cases(&self, query: &CaseQuery) -> Result<Vec<CaseRecord>> {
    let mut conds: Vec<String> = vec!["deleted = 0".into()];
    let mut params: Vec<String> = Vec::new();

    if let Some(kind) = query.kind {
      params.push(encode_case_kind(kind).to_owned());
      conds.push(format!("kind = ?{}", params.len()));
    }
    if let Some(status) = query.case_status {
      params.push(encode_case_status(status).to_owned());
      conds.push(format!("case_status = ?{}", params.len()));
    }
    if let Some(status) = query.approve_status {
      params.push(encode_approve_status(status).to_owned());
      conds.push(format!("approve_status = ?{}", params.len()));
    }
    if let Some(city) = &query.city {
      params.push(city.clone());
      conds.push(format!("city = ?{}", params.len()));
    }

    let limit = query.limit.unwrap_or(100) as i64;
    let offset = query.offset.unwrap_or(0) as i64;
    let sql = format!(
      "SELECT {CASE_COLUMNS} FROM cases WHERE {} \
       ORDER BY created_at DESC LIMIT {limit} OFFSET {offset}",
      conds.join(" AND "),
    );

    let raws: Vec<RawCase> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), |row| {
            read_case(row)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCase::into_case).collect()
  }

  async fn update_case(
    &self,
    id: Uuid,
    update: CaseUpdate,
  ) -> Result<Option<CaseRecord>> {
    let Some(mut case) = self.get_case(id).await? else {
      return Ok(None);
    };
    if case.deleted {
      return Ok(None);
    }

    macro_rules! apply {
      ($($field:ident),* $(,)?) => {
        $(if let Some(v) = update.$field { case.$field = Some(v); })*
      };
    }
    apply!(
      full_name, gender, age, age_range, height, height_range, weight,
      blood_group, complexion, hair_color, hair_type, eye_color, birth_mark,
      distinctive_mark, city, district, state, country, pincode, hospital_id,
    );
    case.updated_by = update.updated_by;
    case.updated_at = Utc::now();

    let written = case.clone();
    self
      .conn
      .call(move |conn| {
        update_case_row(conn, &written)?;
        Ok(())
      })
      .await?;

    Ok(Some(case))
  }

  async fn soft_delete_case(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let now = encode_dt(Utc::now());
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE cases SET deleted = 1, updated_at = ?2 \
           WHERE id = ?1 AND deleted = 0",
          rusqlite::params![id_str, now],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  async fn set_approve_status(
    &self,
    id: Uuid,
    status: ApproveStatus,
    acting: Option<Uuid>,
  ) -> Result<bool> {
    let id_str = encode_uuid(id);
    let status_str = encode_approve_status(status);
    let acting_str = encode_opt_uuid(acting);
    let now = encode_dt(Utc::now());
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE cases SET approve_status = ?2, updated_by = ?3, \
           updated_at = ?4 WHERE id = ?1 AND deleted = 0",
          rusqlite::params![id_str, status_str, acting_str, now],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  async fn eligible_candidates(
    &self,
    kind: CaseKind,
    exclude: &[Uuid],
  ) -> Result<Vec<CaseRecord>> {
    let mut sql = format!(
      "SELECT {CASE_COLUMNS} FROM cases \
       WHERE kind = ?1 AND approve_status = 'approved' \
         AND case_status IN ('pending', 'matched') AND deleted = 0",
    );
    let mut params: Vec<String> = vec![encode_case_kind(kind).to_owned()];
    if !exclude.is_empty() {
      let placeholders: Vec<String> = (0..exclude.len())
        .map(|i| format!("?{}", i + 2))
        .collect();
      sql.push_str(&format!(" AND id NOT IN ({})", placeholders.join(", ")));
      params.extend(exclude.iter().copied().map(encode_uuid));
    }

    let raws: Vec<RawCase> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), |row| {
            read_case(row)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCase::into_case).collect()
  }

  async fn additional_info(&self, case: Uuid) -> Result<Option<AdditionalInfo>> {
    let id_str = encode_uuid(case);

    let raw: Option<(AdditionalInfo, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT caste, subcaste, marital_status, religion, \
               mother_tongue, other_known_languages, education_details, \
               occupation_details, id_type, id_no \
               FROM additional_info WHERE case_id = ?1",
              rusqlite::params![id_str],
              |row| {
                let languages: String = row.get(5)?;
                Ok((
                  AdditionalInfo {
                    caste: row.get(0)?,
                    subcaste: row.get(1)?,
                    marital_status: row.get(2)?,
                    religion: row.get(3)?,
                    mother_tongue: row.get(4)?,
                    other_known_languages: Vec::new(),
                    education_details: row.get(6)?,
                    occupation_details: row.get(7)?,
                    id_type: row.get(8)?,
                    id_no: row.get(9)?,
                  },
                  languages,
                ))
              },
            )
            .optional()?,
        )
      })
      .await?;

    match raw {
      Some((mut info, languages)) => {
        info.other_known_languages = serde_json::from_str(&languages)?;
        Ok(Some(info))
      }
      None => Ok(None),
    }
  }

  async fn upsert_additional_info(
    &self,
    case: Uuid,
    info: AdditionalInfo,
  ) -> Result<()> {
    let id_str = encode_uuid(case);
    let languages = serde_json::to_string(&info.other_known_languages)?;
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO additional_info (
             case_id, caste, subcaste, marital_status, religion,
             mother_tongue, other_known_languages, education_details,
             occupation_details, id_type, id_no
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
           ON CONFLICT (case_id) DO UPDATE SET
             caste = ?2, subcaste = ?3, marital_status = ?4, religion = ?5,
             mother_tongue = ?6, other_known_languages = ?7,
             education_details = ?8, occupation_details = ?9, id_type = ?10,
             id_no = ?11",
          rusqlite::params![
            id_str,
            info.caste,
            info.subcaste,
            info.marital_status,
            info.religion,
            info.mother_tongue,
            languages,
            info.education_details,
            info.occupation_details,
            info.id_type,
            info.id_no,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── MatchStore impl ─────────────────────────────────────────────────────────

impl MatchStore for SqliteStore {
  type Error = Error;

  async fn try_insert_match(
    &self,
    input: NewMatch,
  ) -> Result<Option<MatchRecord>> {
    let now = Utc::now();
    let record = MatchRecord {
      id: Uuid::new_v4(),
      match_id: idgen::match_id(now.date_naive()),
      missing_person_id: input.missing_person_id,
      partner_id: input.partner_id,
      partner_kind: input.partner_kind,
      match_type: input.match_type,
      score: input.score,
      match_parameters: input.match_parameters,
      reject_reason: None,
      unreject_reason: None,
      confirmation_note: None,
      unconfirm_reason: None,
      match_with: None,
      is_viewed: false,
      created_at: now,
      updated_at: now,
      created_by: input.created_by,
      updated_by: input.created_by,
    };
    let params_json = serde_json::to_string(&record.match_parameters)?;

    enum Outcome {
      Inserted(String),
      PairExists,
      IdExhausted,
    }

    let mp_str = encode_uuid(record.missing_person_id);
    let partner_str = encode_uuid(record.partner_id);
    let outcome = self
      .conn
      .call({
        let record = record.clone();
        move |conn| {
          let pair_exists = |conn: &rusqlite::Connection| {
            conn
              .query_row(
                "SELECT 1 FROM matches \
                 WHERE missing_person_id = ?1 AND partner_id = ?2",
                rusqlite::params![mp_str, partner_str],
                |_| Ok(true),
              )
              .optional()
              .map(|r| r.unwrap_or(false))
          };

          if pair_exists(conn)? {
            return Ok(Outcome::PairExists);
          }

          let mut match_id = record.match_id.clone();
          for _ in 0..3 {
            let inserted = conn.execute(
              "INSERT INTO matches (
                 id, match_id, missing_person_id, partner_id, partner_kind,
                 match_type, score, match_parameters, is_viewed, created_at,
                 updated_at, created_by, updated_by
               ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
              rusqlite::params![
                encode_uuid(record.id),
                match_id,
                mp_str,
                partner_str,
                encode_partner_kind(record.partner_kind),
                encode_match_type(record.match_type),
                record.score as i64,
                params_json,
                record.is_viewed,
                encode_dt(record.created_at),
                encode_dt(record.updated_at),
                encode_opt_uuid(record.created_by),
                encode_opt_uuid(record.updated_by),
              ],
            );
            match inserted {
              Ok(_) => return Ok(Outcome::Inserted(match_id)),
              Err(e) if is_constraint_violation(&e) => {
                // Either the pair was raced in by a concurrent sweep, or the
                // random match-id collided; tell the two apart and retry the
                // latter with a fresh id.
                if pair_exists(conn)? {
                  return Ok(Outcome::PairExists);
                }
                match_id = idgen::match_id(record.created_at.date_naive());
              }
              Err(e) => return Err(e.into()),
            }
          }
          Ok(Outcome::IdExhausted)
        }
      })
      .await?;

    match outcome {
      Outcome::Inserted(match_id) => {
        Ok(Some(MatchRecord { match_id, ..record }))
      }
      Outcome::PairExists => Ok(None),
      Outcome::IdExhausted => Err(Error::MatchIdExhausted),
    }
  }

  async fn matches_for_anchor(
    &self,
    partner_kind: PartnerKind,
    anchor: Uuid,
    anchor_is_missing_person: bool,
  ) -> Result<Vec<MatchRecord>> {
    let side = if anchor_is_missing_person {
      "missing_person_id"
    } else {
      "partner_id"
    };
    let sql = format!(
      "SELECT {MATCH_COLUMNS} FROM matches \
       WHERE partner_kind = ?1 AND {side} = ?2",
    );
    let kind_str = encode_partner_kind(partner_kind);
    let anchor_str = encode_uuid(anchor);

    let raws: Vec<RawMatch> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![kind_str, anchor_str], |row| {
            read_match(row)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMatch::into_match).collect()
  }

  async fn find_match(
    &self,
    partner_kind: PartnerKind,
    anchor: Uuid,
    anchor_is_missing_person: bool,
    match_id: &str,
  ) -> Result<Option<MatchRecord>> {
    let side = if anchor_is_missing_person {
      "missing_person_id"
    } else {
      "partner_id"
    };
    let sql = format!(
      "SELECT {MATCH_COLUMNS} FROM matches \
       WHERE match_id = ?1 AND partner_kind = ?2 AND {side} = ?3",
    );
    let match_id = match_id.to_owned();
    let kind_str = encode_partner_kind(partner_kind);
    let anchor_str = encode_uuid(anchor);

    let raw: Option<RawMatch> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &sql,
              rusqlite::params![match_id, kind_str, anchor_str],
              |row| read_match(row),
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMatch::into_match).transpose()
  }

  async fn find_match_by_pair(
    &self,
    partner_kind: PartnerKind,
    anchor: Uuid,
    anchor_is_missing_person: bool,
    other: Uuid,
  ) -> Result<Option<MatchRecord>> {
    let (mp, partner) = if anchor_is_missing_person {
      (anchor, other)
    } else {
      (other, anchor)
    };
    let sql = format!(
      "SELECT {MATCH_COLUMNS} FROM matches \
       WHERE partner_kind = ?1 AND missing_person_id = ?2 AND partner_id = ?3",
    );
    let kind_str = encode_partner_kind(partner_kind);
    let mp_str = encode_uuid(mp);
    let partner_str = encode_uuid(partner);

    let raw: Option<RawMatch> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &sql,
              rusqlite::params![kind_str, mp_str, partner_str],
              |row| read_match(row),
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMatch::into_match).transpose()
  }

  fn save_match(
    &self,
    record: &MatchRecord,
  ) -> impl std::future::Future<Output = Result<()>> + Send + '_ {
    let record = record.clone();
    let now = encode_dt(Utc::now());
    async move {
      self
        .conn
        .call(move |conn| {
          update_match_row(conn, &record, &now)?;
          Ok(())
        })
        .await?;
      Ok(())
    }
  }

  fn apply_confirmation(
    &self,
    record: &MatchRecord,
    left: CaseResolution,
    right: CaseResolution,
    acting: Option<Uuid>,
  ) -> impl std::future::Future<Output = Result<ConfirmApply>> + Send + '_ {
    let record = record.clone();
    let now = encode_dt(Utc::now());
    let acting_str = encode_opt_uuid(acting);

    async move {
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // The engine checked this too, but only the in-transaction check
        // closes the window against a concurrent confirmation through a
        // different pairing.
        for res in [&left, &right] {
          let (status, display): (String, Option<String>) = tx.query_row(
            "SELECT case_status, case_id FROM cases WHERE id = ?1",
            rusqlite::params![encode_uuid(res.case)],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )?;
          if status == "resolved" {
            return Ok(ConfirmApply::AlreadyResolved {
              case_id: display.unwrap_or_else(|| encode_uuid(res.case)),
            });
          }
        }

        update_match_row(&tx, &record, &now)?;

        for res in [left, right] {
          tx.execute(
            "UPDATE cases SET case_status = 'resolved', match_with = ?2, \
             matched_person_id = ?3, matched_case_id = ?4, updated_by = ?5, \
             updated_at = ?6 WHERE id = ?1",
            rusqlite::params![
              encode_uuid(res.case),
              encode_case_kind(res.match_with),
              encode_uuid(res.matched_person_id),
              res.matched_case_id,
              acting_str,
              now,
            ],
          )?;
        }

        tx.commit()?;
        Ok(ConfirmApply::Applied)
      })
      .await?;

    Ok(outcome)
    }
  }

  fn apply_unconfirmation(
    &self,
    record: &MatchRecord,
    left_case: Uuid,
    right_case: Uuid,
    acting: Option<Uuid>,
  ) -> impl std::future::Future<Output = Result<()>> + Send + '_ {
    let record = record.clone();
    let now = encode_dt(Utc::now());
    let acting_str = encode_opt_uuid(acting);

    async move {
      self
        .conn
        .call(move |conn| {
          let tx = conn.transaction()?;
          update_match_row(&tx, &record, &now)?;
          for case in [left_case, right_case] {
            tx.execute(
              "UPDATE cases SET case_status = 'pending', match_with = NULL, \
               matched_person_id = NULL, matched_case_id = NULL, \
               updated_by = ?2, updated_at = ?3 WHERE id = ?1",
              rusqlite::params![encode_uuid(case), acting_str, now],
            )?;
          }
          tx.commit()?;
          Ok(())
        })
        .await?;
      Ok(())
    }
  }

  async fn mark_viewed(
    &self,
    match_id: &str,
    acting: Option<Uuid>,
  ) -> Result<bool> {
    let match_id = match_id.to_owned();
    let acting_str = encode_opt_uuid(acting);
    let now = encode_dt(Utc::now());
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE matches SET is_viewed = 1, updated_by = ?2, \
           updated_at = ?3 WHERE match_id = ?1",
          rusqlite::params![match_id, acting_str, now],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }
}

// ─── DirectoryStore impl ─────────────────────────────────────────────────────

fn new_audit(acting: Option<Uuid>) -> Audit {
  let now = Utc::now();
  Audit {
    created_at: now,
    updated_at: now,
    created_by: acting,
    updated_by: acting,
  }
}

impl DirectoryStore for SqliteStore {
  type Error = Error;

  // ── Hospitals ─────────────────────────────────────────────────────────────

  async fn create_hospital(
    &self,
    input: NewHospital,
    acting: Option<Uuid>,
  ) -> Result<Hospital> {
    let hospital = Hospital {
      id: Uuid::new_v4(),
      name: input.name,
      hospital_type: input.hospital_type,
      address_id: input.address_id,
      active: input.active,
      audit: new_audit(acting),
    };
    let stored = hospital.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO hospitals (id, name, hospital_type, address_id, \
           active, created_at, updated_at, created_by, updated_by) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            encode_uuid(stored.id),
            stored.name,
            stored.hospital_type,
            encode_opt_uuid(stored.address_id),
            stored.active,
            encode_dt(stored.audit.created_at),
            encode_dt(stored.audit.updated_at),
            encode_opt_uuid(stored.audit.created_by),
            encode_opt_uuid(stored.audit.updated_by),
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(hospital)
  }

  async fn get_hospital(&self, id: Uuid) -> Result<Option<Hospital>> {
    let id_str = encode_uuid(id);
    let sql = format!("SELECT {HOSPITAL_COLUMNS} FROM hospitals WHERE id = ?1");
    let raw: Option<RawHospital> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], |row| {
              read_hospital(row)
            })
            .optional()?,
        )
      })
      .await?;
    raw.map(RawHospital::into_hospital).transpose()
  }

  async fn list_hospitals(&self) -> Result<Vec<Hospital>> {
    let sql =
      format!("SELECT {HOSPITAL_COLUMNS} FROM hospitals ORDER BY name");
    let raws: Vec<RawHospital> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| read_hospital(row))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawHospital::into_hospital).collect()
  }

  async fn delete_hospital(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM hospitals WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  // ── Police stations ───────────────────────────────────────────────────────

  async fn create_police_station(
    &self,
    input: NewPoliceStation,
    acting: Option<Uuid>,
  ) -> Result<PoliceStation> {
    let station = PoliceStation {
      id: Uuid::new_v4(),
      name: input.name,
      phone_no: input.phone_no,
      address_id: input.address_id,
      audit: new_audit(acting),
    };
    let stored = station.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO police_stations (id, name, phone_no, address_id, \
           created_at, updated_at, created_by, updated_by) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            encode_uuid(stored.id),
            stored.name,
            stored.phone_no,
            encode_opt_uuid(stored.address_id),
            encode_dt(stored.audit.created_at),
            encode_dt(stored.audit.updated_at),
            encode_opt_uuid(stored.audit.created_by),
            encode_opt_uuid(stored.audit.updated_by),
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(station)
  }

  async fn get_police_station(&self, id: Uuid) -> Result<Option<PoliceStation>> {
    let id_str = encode_uuid(id);
    let sql = format!(
      "SELECT {POLICE_STATION_COLUMNS} FROM police_stations WHERE id = ?1"
    );
    let raw: Option<RawPoliceStation> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], |row| {
              read_police_station(row)
            })
            .optional()?,
        )
      })
      .await?;
    raw.map(RawPoliceStation::into_police_station).transpose()
  }

  async fn list_police_stations(&self) -> Result<Vec<PoliceStation>> {
    let sql = format!(
      "SELECT {POLICE_STATION_COLUMNS} FROM police_stations ORDER BY name"
    );
    let raws: Vec<RawPoliceStation> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| read_police_station(row))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws
      .into_iter()
      .map(RawPoliceStation::into_police_station)
      .collect()
  }

  async fn delete_police_station(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM police_stations WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  // ── Volunteers ────────────────────────────────────────────────────────────

  async fn create_volunteer(
    &self,
    input: NewVolunteer,
    acting: Option<Uuid>,
  ) -> Result<Volunteer> {
    let volunteer = Volunteer {
      id: Uuid::new_v4(),
      full_name: input.full_name,
      age: input.age,
      gender: input.gender,
      volunteer_group: input.volunteer_group,
      assigned_region: input.assigned_region,
      search_start_date: input.search_start_date,
      search_end_date: input.search_end_date,
      blood_group: input.blood_group,
      emergency_contact_name: input.emergency_contact_name,
      emergency_contact_phone: input.emergency_contact_phone,
      active: input.active,
      audit: new_audit(acting),
    };
    let stored = volunteer.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO volunteers (id, full_name, age, gender, \
           volunteer_group, assigned_region, search_start_date, \
           search_end_date, blood_group, emergency_contact_name, \
           emergency_contact_phone, active, created_at, updated_at, \
           created_by, updated_by) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, \
           ?14, ?15, ?16)",
          rusqlite::params![
            encode_uuid(stored.id),
            stored.full_name,
            stored.age,
            stored.gender,
            stored.volunteer_group,
            stored.assigned_region,
            stored.search_start_date.map(encode_date),
            stored.search_end_date.map(encode_date),
            stored.blood_group,
            stored.emergency_contact_name,
            stored.emergency_contact_phone,
            stored.active,
            encode_dt(stored.audit.created_at),
            encode_dt(stored.audit.updated_at),
            encode_opt_uuid(stored.audit.created_by),
            encode_opt_uuid(stored.audit.updated_by),
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(volunteer)
  }

  async fn get_volunteer(&self, id: Uuid) -> Result<Option<Volunteer>> {
    let id_str = encode_uuid(id);
    let sql =
      format!("SELECT {VOLUNTEER_COLUMNS} FROM volunteers WHERE id = ?1");
    let raw: Option<RawVolunteer> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], |row| {
              read_volunteer(row)
            })
            .optional()?,
        )
      })
      .await?;
    raw.map(RawVolunteer::into_volunteer).transpose()
  }

  async fn list_volunteers(&self) -> Result<Vec<Volunteer>> {
    let sql =
      format!("SELECT {VOLUNTEER_COLUMNS} FROM volunteers ORDER BY full_name");
    let raws: Vec<RawVolunteer> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| read_volunteer(row))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawVolunteer::into_volunteer).collect()
  }

  async fn delete_volunteer(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM volunteers WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  // ── Documents ─────────────────────────────────────────────────────────────

  async fn create_document(
    &self,
    input: NewDocument,
    acting: Option<Uuid>,
  ) -> Result<Document> {
    let document = Document {
      id: Uuid::new_v4(),
      person_id: input.person_id,
      fir_id: input.fir_id,
      document_type: input.document_type,
      description: input.description,
      file_path: input.file_path,
      audit: new_audit(acting),
    };
    let stored = document.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (id, person_id, fir_id, document_type, \
           description, file_path, created_at, updated_at, created_by, \
           updated_by) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            encode_uuid(stored.id),
            encode_opt_uuid(stored.person_id),
            encode_opt_uuid(stored.fir_id),
            stored.document_type,
            stored.description,
            stored.file_path,
            encode_dt(stored.audit.created_at),
            encode_dt(stored.audit.updated_at),
            encode_opt_uuid(stored.audit.created_by),
            encode_opt_uuid(stored.audit.updated_by),
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(document)
  }

  async fn get_document(&self, id: Uuid) -> Result<Option<Document>> {
    let id_str = encode_uuid(id);
    let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1");
    let raw: Option<RawDocument> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], |row| {
              read_document(row)
            })
            .optional()?,
        )
      })
      .await?;
    raw.map(RawDocument::into_document).transpose()
  }

  async fn list_documents(&self, person: Option<Uuid>) -> Result<Vec<Document>> {
    let person_str = encode_opt_uuid(person);
    let sql = match &person_str {
      Some(_) => format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE person_id = ?1 \
         ORDER BY created_at DESC"
      ),
      None => format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY created_at DESC"
      ),
    };
    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = match person_str {
          Some(p) => stmt
            .query_map(rusqlite::params![p], |row| read_document(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], |row| read_document(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawDocument::into_document).collect()
  }

  async fn delete_document(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM documents WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  // ── FIRs ──────────────────────────────────────────────────────────────────

  async fn create_fir(
    &self,
    input: NewFir,
    acting: Option<Uuid>,
  ) -> Result<Fir> {
    let fir = Fir {
      id: Uuid::new_v4(),
      fir_number: input.fir_number,
      case_status: input.case_status,
      investigation_officer_name: input.investigation_officer_name,
      police_station_id: input.police_station_id,
      person_id: input.person_id,
      audit: new_audit(acting),
    };
    let stored = fir.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO firs (id, fir_number, case_status, \
           investigation_officer_name, police_station_id, person_id, \
           created_at, updated_at, created_by, updated_by) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            encode_uuid(stored.id),
            stored.fir_number,
            stored.case_status,
            stored.investigation_officer_name,
            encode_opt_uuid(stored.police_station_id),
            encode_opt_uuid(stored.person_id),
            encode_dt(stored.audit.created_at),
            encode_dt(stored.audit.updated_at),
            encode_opt_uuid(stored.audit.created_by),
            encode_opt_uuid(stored.audit.updated_by),
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(fir)
  }

  async fn get_fir(&self, id: Uuid) -> Result<Option<Fir>> {
    let id_str = encode_uuid(id);
    let sql = format!("SELECT {FIR_COLUMNS} FROM firs WHERE id = ?1");
    let raw: Option<RawFir> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], |row| read_fir(row))
            .optional()?,
        )
      })
      .await?;
    raw.map(RawFir::into_fir).transpose()
  }

  async fn list_firs(&self, person: Option<Uuid>) -> Result<Vec<Fir>> {
    let person_str = encode_opt_uuid(person);
    let sql = match &person_str {
      Some(_) => format!(
        "SELECT {FIR_COLUMNS} FROM firs WHERE person_id = ?1 \
         ORDER BY created_at DESC"
      ),
      None => {
        format!("SELECT {FIR_COLUMNS} FROM firs ORDER BY created_at DESC")
      }
    };
    let raws: Vec<RawFir> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = match person_str {
          Some(p) => stmt
            .query_map(rusqlite::params![p], |row| read_fir(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], |row| read_fir(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawFir::into_fir).collect()
  }

  async fn delete_fir(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .execute("DELETE FROM firs WHERE id = ?1", rusqlite::params![
              id_str
            ])?,
        )
      })
      .await?;
    Ok(changed > 0)
  }

  // ── Addresses ─────────────────────────────────────────────────────────────

  async fn create_address(
    &self,
    input: NewAddress,
    acting: Option<Uuid>,
  ) -> Result<Address> {
    let address = Address {
      id: Uuid::new_v4(),
      address_type: input.address_type,
      street: input.street,
      city: input.city,
      district: input.district,
      state: input.state,
      pincode: input.pincode,
      country: input.country,
      landmark: input.landmark,
      latitude: input.latitude,
      longitude: input.longitude,
      person_id: input.person_id,
      audit: new_audit(acting),
    };
    let stored = address.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO addresses (id, address_type, street, city, district, \
           state, pincode, country, landmark, latitude, longitude, \
           person_id, created_at, updated_at, created_by, updated_by) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, \
           ?14, ?15, ?16)",
          rusqlite::params![
            encode_uuid(stored.id),
            stored.address_type,
            stored.street,
            stored.city,
            stored.district,
            stored.state,
            stored.pincode,
            stored.country,
            stored.landmark,
            stored.latitude,
            stored.longitude,
            encode_opt_uuid(stored.person_id),
            encode_dt(stored.audit.created_at),
            encode_dt(stored.audit.updated_at),
            encode_opt_uuid(stored.audit.created_by),
            encode_opt_uuid(stored.audit.updated_by),
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(address)
  }

  async fn get_address(&self, id: Uuid) -> Result<Option<Address>> {
    let id_str = encode_uuid(id);
    let sql = format!("SELECT {ADDRESS_COLUMNS} FROM addresses WHERE id = ?1");
    let raw: Option<RawAddress> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], |row| {
              read_address(row)
            })
            .optional()?,
        )
      })
      .await?;
    raw.map(RawAddress::into_address).transpose()
  }

  async fn list_addresses(&self, person: Option<Uuid>) -> Result<Vec<Address>> {
    let person_str = encode_opt_uuid(person);
    let sql = match &person_str {
      Some(_) => format!(
        "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE person_id = ?1 \
         ORDER BY created_at DESC"
      ),
      None => format!(
        "SELECT {ADDRESS_COLUMNS} FROM addresses ORDER BY created_at DESC"
      ),
    };
    let raws: Vec<RawAddress> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = match person_str {
          Some(p) => stmt
            .query_map(rusqlite::params![p], |row| read_address(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], |row| read_address(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawAddress::into_address).collect()
  }

  async fn delete_address(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM addresses WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  // ── Contacts ──────────────────────────────────────────────────────────────

  async fn create_contact(
    &self,
    input: NewContact,
    acting: Option<Uuid>,
  ) -> Result<Contact> {
    let contact = Contact {
      id: Uuid::new_v4(),
      phone_no: input.phone_no,
      email: input.email,
      contact_type: input.contact_type,
      person_name: input.person_name,
      is_primary: input.is_primary,
      person_id: input.person_id,
      hospital_id: input.hospital_id,
      police_station_id: input.police_station_id,
      volunteer_id: input.volunteer_id,
      audit: new_audit(acting),
    };
    let stored = contact.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contacts (id, phone_no, email, contact_type, \
           person_name, is_primary, person_id, hospital_id, \
           police_station_id, volunteer_id, created_at, updated_at, \
           created_by, updated_by) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
          rusqlite::params![
            encode_uuid(stored.id),
            stored.phone_no,
            stored.email,
            stored.contact_type,
            stored.person_name,
            stored.is_primary,
            encode_opt_uuid(stored.person_id),
            encode_opt_uuid(stored.hospital_id),
            encode_opt_uuid(stored.police_station_id),
            encode_opt_uuid(stored.volunteer_id),
            encode_dt(stored.audit.created_at),
            encode_dt(stored.audit.updated_at),
            encode_opt_uuid(stored.audit.created_by),
            encode_opt_uuid(stored.audit.updated_by),
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(contact)
  }

  async fn get_contact(&self, id: Uuid) -> Result<Option<Contact>> {
    let id_str = encode_uuid(id);
    let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1");
    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], |row| {
              read_contact(row)
            })
            .optional()?,
        )
      })
      .await?;
    raw.map(RawContact::into_contact).transpose()
  }

  async fn list_contacts(&self, person: Option<Uuid>) -> Result<Vec<Contact>> {
    let person_str = encode_opt_uuid(person);
    let sql = match &person_str {
      Some(_) => format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts WHERE person_id = ?1 \
         ORDER BY created_at DESC"
      ),
      None => format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY created_at DESC"
      ),
    };
    let raws: Vec<RawContact> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = match person_str {
          Some(p) => stmt
            .query_map(rusqlite::params![p], |row| read_contact(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], |row| read_contact(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawContact::into_contact).collect()
  }

  async fn delete_contact(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM contacts WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }
}

// ─── UserStore impl ──────────────────────────────────────────────────────────

impl UserStore for SqliteStore {
  type Error = Error;

  async fn create_user(&self, input: NewUser) -> Result<Option<User>> {
    let now = Utc::now();
    let user = User {
      id: Uuid::new_v4(),
      first_name: input.first_name,
      last_name: input.last_name,
      email: input.email,
      phone_no: input.phone_no,
      role: input.role,
      status: input.status,
      password_hash: input.password_hash,
      created_at: now,
      updated_at: now,
    };
    let stored = user.clone();
    let created = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO users (id, first_name, last_name, email, phone_no, \
           role, status, password_hash, created_at, updated_at) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            encode_uuid(stored.id),
            stored.first_name,
            stored.last_name,
            stored.email,
            stored.phone_no,
            encode_user_role(stored.role),
            encode_user_status(stored.status),
            stored.password_hash,
            encode_dt(stored.created_at),
            encode_dt(stored.updated_at),
          ],
        );
        match inserted {
          Ok(_) => Ok(true),
          // Unique email already registered.
          Err(e) if is_constraint_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;
    Ok(created.then_some(user))
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], |row| read_user(row))
            .optional()?,
        )
      })
      .await?;
    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
    let email = email.to_owned();
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1");
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![email], |row| read_user(row))
            .optional()?,
        )
      })
      .await?;
    raw.map(RawUser::into_user).transpose()
  }

  async fn list_users(&self, status: Option<UserStatus>) -> Result<Vec<User>> {
    let status_str = status.map(encode_user_status).map(str::to_owned);
    let sql = match &status_str {
      Some(_) => format!(
        "SELECT {USER_COLUMNS} FROM users WHERE status = ?1 \
         ORDER BY created_at"
      ),
      None => format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at"),
    };
    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = match status_str {
          Some(s) => stmt
            .query_map(rusqlite::params![s], |row| read_user(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], |row| read_user(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn set_user_status(
    &self,
    id: Uuid,
    status: UserStatus,
  ) -> Result<bool> {
    let id_str = encode_uuid(id);
    let status_str = encode_user_status(status);
    let now = encode_dt(Utc::now());
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users SET status = ?2, updated_at = ?3 WHERE id = ?1",
          rusqlite::params![id_str, status_str, now],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }
}
