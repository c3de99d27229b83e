//! The compatibility scorer — a pure, rule-based similarity function.
//!
//! Additive point buckets over independent biometric signals, clamped to
//! 100, with two hard vetoes: gender and age bracket. A mismatch on either
//! makes the pairing physically impossible, so the score is forced to 0 no
//! matter what else agrees. Malformed range strings are a scoring veto (or
//! a skipped rule, for height), never an error.
//!
//! The missing-person side always supplies the exact age and the partner
//! side the bucketed range, regardless of which side anchored the sweep.

use serde::{Deserialize, Serialize};

use crate::case::{AdditionalInfo, CaseRecord};

/// Matches at or above this score are created as `matched` rather than
/// `potential`.
pub const AUTO_MATCH_THRESHOLD: u8 = 70;

/// Matches at or above this score are surfaced in the `newly_matched`
/// bucket of a sweep response.
pub const DISPLAY_THRESHOLD: u8 = 50;

/// Toggles for the scorer. `extended` folds in the AdditionalInfo bonus
/// terms; off by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringOptions {
  pub extended: bool,
}

// ─── Scoring ─────────────────────────────────────────────────────────────────

/// Score a (missing person, partner) pair. Returns 0..=100; 0 means the
/// pair is incompatible and must not be recorded.
pub fn score(mp: &CaseRecord, partner: &CaseRecord) -> u8 {
  score_with(mp, partner, None, None, ScoringOptions::default())
}

/// Full-control variant used by the engine: optional AdditionalInfo rows
/// for the extended bonus terms.
pub fn score_with(
  mp: &CaseRecord,
  partner: &CaseRecord,
  mp_info: Option<&AdditionalInfo>,
  partner_info: Option<&AdditionalInfo>,
  options: ScoringOptions,
) -> u8 {
  let mut total: i32 = 0;

  // Gender gate: a disagreement between two known genders is a hard veto.
  match (&mp.gender, &partner.gender) {
    (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => {
      if a.to_lowercase() != b.to_lowercase() {
        return 0;
      }
      total += 25;
    }
    _ => {}
  }

  // Age gate: the exact age must fall inside the partner's bucketed range.
  // Absence on either side, or an unparseable range, vetoes the pair; the
  // age comparison is mandatory, not optional.
  match (mp.age, partner.age_range.as_deref()) {
    (Some(age), Some(range)) => match parse_range(range) {
      Some((min, max)) if min <= age && age <= max => total += 30,
      _ => return 0,
    },
    _ => return 0,
  }

  if eq_ci(&mp.blood_group, &partner.blood_group) {
    total += 25;
  }
  if eq_ci(&mp.complexion, &partner.complexion) {
    total += 25;
  }
  if eq_ci(&mp.hair_color, &partner.hair_color) {
    total += 25;
  }
  if eq_ci(&mp.hair_type, &partner.hair_type) {
    total += 25;
  }
  if eq_ci(&mp.eye_color, &partner.eye_color) {
    total += 25;
  }

  total += height_points(mp, partner);
  total += weight_points(mp, partner);

  if eq_ci(&mp.birth_mark, &partner.birth_mark) {
    total += 25;
  }
  if eq_ci(&mp.distinctive_mark, &partner.distinctive_mark) {
    total += 25;
  }

  let mut score = total as f64;
  if options.extended
    && let (Some(a), Some(b)) = (mp_info, partner_info)
  {
    score += extended_bonus(a, b);
  }

  score.min(100.0) as u8
}

/// Height comparison. Range-vs-range is preferred whenever both sides carry
/// a range; the exact-height fallback only applies when at least one range
/// is absent.
fn height_points(mp: &CaseRecord, partner: &CaseRecord) -> i32 {
  if let (Some(mr), Some(pr)) =
    (mp.height_range.as_deref(), partner.height_range.as_deref())
  {
    let (Some((mp_min, mp_max)), Some((p_min, p_max))) =
      (parse_range(mr), parse_range(pr))
    else {
      return 0;
    };
    if mp_min <= p_max && mp_max >= p_min {
      25
    } else if mp_min - 5 <= p_max && mp_max + 5 >= p_min {
      15
    } else if mp_min - 10 <= p_max && mp_max + 10 >= p_min {
      5
    } else {
      0
    }
  } else if let (Some(mh), Some(ph)) = (mp.height, partner.height) {
    match (mh - ph).abs() {
      0..=5 => 25,
      6..=10 => 15,
      11..=20 => 5,
      _ => 0,
    }
  } else {
    0
  }
}

/// Weight comparison in grams.
fn weight_points(mp: &CaseRecord, partner: &CaseRecord) -> i32 {
  let (Some(mw), Some(pw)) = (mp.weight, partner.weight) else {
    return 0;
  };
  match (mw - pw).abs() {
    0..=500 => 20,
    501..=1000 => 10,
    _ => 0,
  }
}

/// Bonus terms from the demographic supplement. Small fractional weights;
/// only applied when both sides have a supplement row.
fn extended_bonus(a: &AdditionalInfo, b: &AdditionalInfo) -> f64 {
  let mut bonus = 0.0;
  if eq_ci(&a.caste, &b.caste) {
    bonus += 5.0;
  }
  if eq_ci(&a.subcaste, &b.subcaste) {
    bonus += 5.0;
  }
  if eq_ci(&a.marital_status, &b.marital_status) {
    bonus += 5.0;
  }
  if eq_ci(&a.religion, &b.religion) {
    bonus += 5.0;
  }
  if eq_ci(&a.mother_tongue, &b.mother_tongue) {
    bonus += 5.0;
  }
  if languages_intersect(&a.other_known_languages, &b.other_known_languages) {
    bonus += 2.5;
  }
  if eq_ci(&a.education_details, &b.education_details) {
    bonus += 1.5;
  }
  if eq_ci(&a.occupation_details, &b.occupation_details) {
    bonus += 1.5;
  }
  bonus
}

fn languages_intersect(a: &[String], b: &[String]) -> bool {
  a.iter()
    .any(|la| b.iter().any(|lb| la.eq_ignore_ascii_case(lb)))
}

/// Case-insensitive equality over optional strings; empty strings count as
/// absent.
fn eq_ci(a: &Option<String>, b: &Option<String>) -> bool {
  match (a, b) {
    (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => {
      a.to_lowercase() == b.to_lowercase()
    }
    _ => false,
  }
}

/// Parse a `"min-max"` bucket string. Anything else is `None`.
fn parse_range(s: &str) -> Option<(i32, i32)> {
  let (min, max) = s.split_once('-')?;
  Some((min.trim().parse().ok()?, max.trim().parse().ok()?))
}

// ─── MatchParameters ─────────────────────────────────────────────────────────

/// Structured snapshot of the comparison inputs, captured once at match
/// creation for audit and explainability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchParameters {
  pub gender_match: bool,
  pub age_match:    AgeSnapshot,
  pub height_match: HeightSnapshot,
  pub weight_match: WeightSnapshot,
  pub complexion_match:  bool,
  pub hair_color_match:  bool,
  pub eye_color_match:   bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeSnapshot {
  pub mp_age:            Option<i32>,
  pub partner_age:       Option<i32>,
  pub partner_age_range: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeightSnapshot {
  pub mp_height:            Option<i32>,
  pub partner_height:       Option<i32>,
  pub mp_height_range:      Option<String>,
  pub partner_height_range: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightSnapshot {
  pub mp_weight:      Option<i32>,
  pub partner_weight: Option<i32>,
  pub difference:     Option<i32>,
}

impl MatchParameters {
  /// Capture the snapshot for a (missing person, partner) pair.
  pub fn capture(mp: &CaseRecord, partner: &CaseRecord) -> Self {
    Self {
      gender_match: mp.gender == partner.gender,
      age_match: AgeSnapshot {
        mp_age:            mp.age,
        partner_age:       partner.age,
        partner_age_range: partner.age_range.clone(),
      },
      height_match: HeightSnapshot {
        mp_height:            mp.height,
        partner_height:       partner.height,
        mp_height_range:      mp.height_range.clone(),
        partner_height_range: partner.height_range.clone(),
      },
      weight_match: WeightSnapshot {
        mp_weight:      mp.weight,
        partner_weight: partner.weight,
        difference:     match (mp.weight, partner.weight) {
          (Some(a), Some(b)) => Some((a - b).abs()),
          _ => None,
        },
      },
      complexion_match: mp.complexion == partner.complexion,
      hair_color_match: mp.hair_color == partner.hair_color,
      eye_color_match:  mp.eye_color == partner.eye_color,
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::case::{ApproveStatus, CaseKind, CaseStatus};

  fn blank(kind: CaseKind) -> CaseRecord {
    CaseRecord {
      id: Uuid::new_v4(),
      case_id: None,
      kind,
      full_name: None,
      gender: None,
      age: None,
      age_range: None,
      height: None,
      height_range: None,
      weight: None,
      blood_group: None,
      complexion: None,
      hair_color: None,
      hair_type: None,
      eye_color: None,
      birth_mark: None,
      distinctive_mark: None,
      city: None,
      district: None,
      state: None,
      country: None,
      pincode: None,
      reported_date: Utc::now().date_naive(),
      approve_status: ApproveStatus::Approved,
      case_status: CaseStatus::Pending,
      match_with: None,
      matched_person_id: None,
      matched_case_id: None,
      hospital_id: None,
      deleted: false,
      created_at: Utc::now(),
      updated_at: Utc::now(),
      created_by: None,
      updated_by: None,
    }
  }

  /// A pair that passes both vetoes: male, age 30 inside "25-35".
  fn base_pair() -> (CaseRecord, CaseRecord) {
    let mut mp = blank(CaseKind::MissingPerson);
    mp.gender = Some("male".into());
    mp.age = Some(30);
    let mut up = blank(CaseKind::UnidentifiedPerson);
    up.gender = Some("male".into());
    up.age_range = Some("25-35".into());
    (mp, up)
  }

  #[test]
  fn gender_mismatch_vetoes_everything() {
    let (mut mp, mut up) = base_pair();
    mp.gender = Some("female".into());
    up.gender = Some("Male".into());
    // Stack every other signal in favour; the veto must still win.
    mp.blood_group = Some("O+".into());
    up.blood_group = Some("O+".into());
    mp.birth_mark = Some("scar".into());
    up.birth_mark = Some("scar".into());
    assert_eq!(score(&mp, &up), 0);
  }

  #[test]
  fn gender_comparison_is_case_insensitive() {
    let (mut mp, up) = base_pair();
    mp.gender = Some("MALE".into());
    assert_eq!(score(&mp, &up), 55); // gender 25 + age 30
  }

  #[test]
  fn missing_age_vetoes() {
    let (mut mp, up) = base_pair();
    mp.age = None;
    assert_eq!(score(&mp, &up), 0);
  }

  #[test]
  fn missing_age_range_vetoes() {
    let (mp, mut up) = base_pair();
    up.age_range = None;
    assert_eq!(score(&mp, &up), 0);
  }

  #[test]
  fn age_outside_range_vetoes() {
    let (mut mp, up) = base_pair();
    mp.age = Some(40);
    assert_eq!(score(&mp, &up), 0);
  }

  #[test]
  fn unparseable_age_range_vetoes() {
    let (mp, mut up) = base_pair();
    up.age_range = Some("25 to 35".into());
    assert_eq!(score(&mp, &up), 0);
  }

  #[test]
  fn age_range_bounds_are_inclusive() {
    let (mut mp, up) = base_pair();
    mp.age = Some(25);
    assert_eq!(score(&mp, &up), 55);
    mp.age = Some(35);
    assert_eq!(score(&mp, &up), 55);
  }

  #[test]
  fn worked_example_clamps_to_100() {
    // gender +25, age +30, blood group +25, height diff 3 → +25 = 105 → 100.
    let (mut mp, mut up) = base_pair();
    mp.blood_group = Some("O+".into());
    up.blood_group = Some("o+".into());
    mp.height = Some(175);
    up.height = Some(178);
    assert_eq!(score(&mp, &up), 100);
  }

  #[test]
  fn height_range_overlap_tiers() {
    let (mut mp, mut up) = base_pair();
    mp.height_range = Some("161-170".into());
    up.height_range = Some("165-175".into());
    assert_eq!(score(&mp, &up), 80); // 55 + overlap 25

    up.height_range = Some("173-180".into());
    assert_eq!(score(&mp, &up), 70); // within 5 of overlap → 15

    up.height_range = Some("178-185".into());
    assert_eq!(score(&mp, &up), 60); // within 10 → 5

    up.height_range = Some("185-195".into());
    assert_eq!(score(&mp, &up), 55); // no credit
  }

  #[test]
  fn unparseable_height_range_scores_nothing_without_fallback() {
    // Both sides carry ranges, one malformed: no points, and no fallback to
    // the exact heights even though both are present.
    let (mut mp, mut up) = base_pair();
    mp.height_range = Some("<150".into());
    up.height_range = Some("150-160".into());
    mp.height = Some(150);
    up.height = Some(152);
    assert_eq!(score(&mp, &up), 55);
  }

  #[test]
  fn exact_height_fallback_tiers() {
    let (mut mp, mut up) = base_pair();
    mp.height = Some(170);
    up.height = Some(180);
    assert_eq!(score(&mp, &up), 70); // diff 10 → 15
    up.height = Some(188);
    assert_eq!(score(&mp, &up), 60); // diff 18 → 5
    up.height = Some(195);
    assert_eq!(score(&mp, &up), 55);
  }

  #[test]
  fn weight_tiers_in_grams() {
    let (mut mp, mut up) = base_pair();
    mp.weight = Some(60_000);
    up.weight = Some(60_400);
    assert_eq!(score(&mp, &up), 75); // diff 400 → 20
    up.weight = Some(60_900);
    assert_eq!(score(&mp, &up), 65); // diff 900 → 10
    up.weight = Some(62_000);
    assert_eq!(score(&mp, &up), 55);
  }

  #[test]
  fn marks_match_case_insensitively() {
    let (mut mp, mut up) = base_pair();
    mp.birth_mark = Some("Mole on left cheek".into());
    up.birth_mark = Some("mole on LEFT cheek".into());
    mp.distinctive_mark = Some("tattoo".into());
    up.distinctive_mark = Some("Tattoo".into());
    // 55 + 25 + 25 = 105, clamped.
    assert_eq!(score(&mp, &up), 100);
  }

  #[test]
  fn empty_strings_do_not_match() {
    let (mut mp, mut up) = base_pair();
    mp.blood_group = Some(String::new());
    up.blood_group = Some(String::new());
    assert_eq!(score(&mp, &up), 55);
  }

  #[test]
  fn score_is_always_bounded() {
    // Everything agrees: raw total would be 25+30+25*7+25+20 far above 100.
    let (mut mp, mut up) = base_pair();
    let setters: [fn(&mut CaseRecord, &str); 7] = [
      |c, v| c.blood_group = Some(v.into()),
      |c, v| c.complexion = Some(v.into()),
      |c, v| c.hair_color = Some(v.into()),
      |c, v| c.hair_type = Some(v.into()),
      |c, v| c.eye_color = Some(v.into()),
      |c, v| c.birth_mark = Some(v.into()),
      |c, v| c.distinctive_mark = Some(v.into()),
    ];
    for setter in setters {
      setter(&mut mp, "same");
      setter(&mut up, "same");
    }
    mp.height = Some(170);
    up.height = Some(170);
    mp.weight = Some(70_000);
    up.weight = Some(70_000);
    assert_eq!(score(&mp, &up), 100);
  }

  #[test]
  fn extended_bonus_requires_opt_in_and_both_rows() {
    let (mp, up) = base_pair();
    let info = AdditionalInfo {
      caste: Some("open".into()),
      religion: Some("hindu".into()),
      other_known_languages: vec!["hindi".into(), "english".into()],
      ..Default::default()
    };

    // Off by default.
    assert_eq!(
      score_with(&mp, &up, Some(&info), Some(&info), ScoringOptions::default()),
      55
    );

    // Enabled: caste 5 + religion 5 + languages 2.5, truncated into the total.
    let opts = ScoringOptions { extended: true };
    assert_eq!(score_with(&mp, &up, Some(&info), Some(&info), opts), 67);

    // Enabled but one side missing: no bonus.
    assert_eq!(score_with(&mp, &up, Some(&info), None, opts), 55);
  }

  #[test]
  fn snapshot_captures_comparison_inputs() {
    let (mut mp, mut up) = base_pair();
    mp.weight = Some(61_000);
    up.weight = Some(60_250);
    let params = MatchParameters::capture(&mp, &up);
    assert!(params.gender_match);
    assert_eq!(params.age_match.mp_age, Some(30));
    assert_eq!(params.age_match.partner_age_range.as_deref(), Some("25-35"));
    assert_eq!(params.weight_match.difference, Some(750));
  }
}
