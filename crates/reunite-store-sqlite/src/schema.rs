//! SQL schema for the Reunite SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS cases (
    id                TEXT PRIMARY KEY,
    case_id           TEXT UNIQUE,
    kind              TEXT NOT NULL,   -- 'missing_person' | 'unidentified_person' | 'unidentified_body'
    full_name         TEXT,
    gender            TEXT,
    age               INTEGER,
    age_range         TEXT,            -- 'min-max'
    height            INTEGER,         -- cm
    height_range      TEXT,            -- 'min-max'
    weight            INTEGER,         -- grams
    blood_group       TEXT,
    complexion        TEXT,
    hair_color        TEXT,
    hair_type         TEXT,
    eye_color         TEXT,
    birth_mark        TEXT,
    distinctive_mark  TEXT,
    city              TEXT,            -- trimmed at intake; feeds the case-id location code
    district          TEXT,
    state             TEXT,
    country           TEXT,
    pincode           TEXT,
    reported_date     TEXT NOT NULL,   -- ISO date
    approve_status    TEXT NOT NULL DEFAULT 'pending',
    case_status       TEXT NOT NULL DEFAULT 'pending',
    match_with        TEXT,
    matched_person_id TEXT,
    matched_case_id   TEXT,
    hospital_id       TEXT,
    deleted           INTEGER NOT NULL DEFAULT 0,
    created_at        TEXT NOT NULL,
    updated_at        TEXT NOT NULL,
    created_by        TEXT,
    updated_by        TEXT
);

-- The missing-person side is always stored on the left, so one table and
-- one uniqueness key serve every sweep direction.
CREATE TABLE IF NOT EXISTS matches (
    id                TEXT PRIMARY KEY,
    match_id          TEXT NOT NULL UNIQUE,
    missing_person_id TEXT NOT NULL REFERENCES cases(id),
    partner_id        TEXT NOT NULL REFERENCES cases(id),
    partner_kind      TEXT NOT NULL,   -- 'unidentified_person' | 'unidentified_body'
    match_type        TEXT NOT NULL,   -- 'potential' | 'matched' | 'rejected' | 'confirmed'
    score             INTEGER NOT NULL,
    match_parameters  TEXT NOT NULL DEFAULT '{}',
    reject_reason     TEXT,
    unreject_reason   TEXT,
    confirmation_note TEXT,
    unconfirm_reason  TEXT,
    match_with        TEXT,
    is_viewed         INTEGER NOT NULL DEFAULT 0,
    created_at        TEXT NOT NULL,
    updated_at        TEXT NOT NULL,
    created_by        TEXT,
    updated_by        TEXT,
    UNIQUE (missing_person_id, partner_id)
);

CREATE TABLE IF NOT EXISTS additional_info (
    case_id               TEXT PRIMARY KEY REFERENCES cases(id),
    caste                 TEXT,
    subcaste              TEXT,
    marital_status        TEXT,
    religion              TEXT,
    mother_tongue         TEXT,
    other_known_languages TEXT NOT NULL DEFAULT '[]',
    education_details     TEXT,
    occupation_details    TEXT,
    id_type               TEXT,
    id_no                 TEXT
);

CREATE TABLE IF NOT EXISTS users (
    id            TEXT PRIMARY KEY,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    phone_no      TEXT,
    role          TEXT NOT NULL,
    status        TEXT NOT NULL DEFAULT 'pending',
    password_hash TEXT NOT NULL,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS hospitals (
    id            TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    hospital_type TEXT,
    address_id    TEXT,
    active        INTEGER NOT NULL DEFAULT 1,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    created_by    TEXT,
    updated_by    TEXT
);

CREATE TABLE IF NOT EXISTS police_stations (
    id         TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    phone_no   TEXT,
    address_id TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    created_by TEXT,
    updated_by TEXT
);

CREATE TABLE IF NOT EXISTS volunteers (
    id                      TEXT PRIMARY KEY,
    full_name               TEXT NOT NULL,
    age                     INTEGER,
    gender                  TEXT,
    volunteer_group         TEXT,
    assigned_region         TEXT,
    search_start_date       TEXT,
    search_end_date         TEXT,
    blood_group             TEXT,
    emergency_contact_name  TEXT,
    emergency_contact_phone TEXT,
    active                  INTEGER NOT NULL DEFAULT 1,
    created_at              TEXT NOT NULL,
    updated_at              TEXT NOT NULL,
    created_by              TEXT,
    updated_by              TEXT
);

CREATE TABLE IF NOT EXISTS documents (
    id            TEXT PRIMARY KEY,
    person_id     TEXT REFERENCES cases(id),
    fir_id        TEXT,
    document_type TEXT,
    description   TEXT,
    file_path     TEXT,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    created_by    TEXT,
    updated_by    TEXT
);

CREATE TABLE IF NOT EXISTS firs (
    id                         TEXT PRIMARY KEY,
    fir_number                 TEXT,
    case_status                TEXT,
    investigation_officer_name TEXT,
    police_station_id          TEXT,
    person_id                  TEXT REFERENCES cases(id),
    created_at                 TEXT NOT NULL,
    updated_at                 TEXT NOT NULL,
    created_by                 TEXT,
    updated_by                 TEXT
);

CREATE TABLE IF NOT EXISTS addresses (
    id           TEXT PRIMARY KEY,
    address_type TEXT,
    street       TEXT,
    city         TEXT,
    district     TEXT,
    state        TEXT,
    pincode      TEXT,
    country      TEXT,
    landmark     TEXT,
    latitude     REAL,
    longitude    REAL,
    person_id    TEXT REFERENCES cases(id),
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL,
    created_by   TEXT,
    updated_by   TEXT
);

CREATE TABLE IF NOT EXISTS contacts (
    id                TEXT PRIMARY KEY,
    phone_no          TEXT,
    email             TEXT,
    contact_type      TEXT,
    person_name       TEXT,
    is_primary        INTEGER NOT NULL DEFAULT 0,
    person_id         TEXT REFERENCES cases(id),
    hospital_id       TEXT,
    police_station_id TEXT,
    volunteer_id      TEXT,
    created_at        TEXT NOT NULL,
    updated_at        TEXT NOT NULL,
    created_by        TEXT,
    updated_by        TEXT
);

CREATE INDEX IF NOT EXISTS cases_kind_idx     ON cases(kind);
CREATE INDEX IF NOT EXISTS cases_pool_idx     ON cases(kind, approve_status, case_status, deleted);
CREATE INDEX IF NOT EXISTS cases_intake_idx   ON cases(kind, city, reported_date);
CREATE INDEX IF NOT EXISTS matches_mp_idx     ON matches(missing_person_id, partner_kind);
CREATE INDEX IF NOT EXISTS matches_partner_idx ON matches(partner_id, partner_kind);
CREATE INDEX IF NOT EXISTS documents_person_idx ON documents(person_id);
CREATE INDEX IF NOT EXISTS firs_person_idx      ON firs(person_id);
CREATE INDEX IF NOT EXISTS addresses_person_idx ON addresses(person_id);
CREATE INDEX IF NOT EXISTS contacts_person_idx  ON contacts(person_id);

PRAGMA user_version = 1;
";
