//! The match engine: discovery sweep and lifecycle transitions.
//!
//! One engine serves all three sweep directions (MP→UP, MP→UB, UP→MP); the
//! direction only decides which side of a stored pair the anchor sits on
//! and which kind fills the candidate pool. Match rows always keep the
//! missing person on the left, so the MP→UP and UP→MP directions read and
//! write the same history.

use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  case::{CaseKind, CaseRecord},
  error::{Error, Result},
  matching::{
    CategorizedMatches, MatchDirection, MatchEntry, MatchRecord, MatchType,
    NewMatch,
  },
  score::{
    AUTO_MATCH_THRESHOLD, DISPLAY_THRESHOLD, MatchParameters, ScoringOptions,
    score_with,
  },
  store::{CaseResolution, CaseStore, ConfirmApply, MatchStore},
};

/// The match engine, borrowing a store for the duration of one operation.
pub struct MatchEngine<'a, S> {
  store:     &'a S,
  direction: MatchDirection,
  options:   ScoringOptions,
}

impl<'a, S, E> MatchEngine<'a, S>
where
  S: CaseStore<Error = E> + MatchStore<Error = E>,
  E: std::error::Error + Send + Sync + 'static,
{
  pub fn new(
    store: &'a S,
    direction: MatchDirection,
    options: ScoringOptions,
  ) -> Self {
    Self { store, direction, options }
  }

  // ── Discovery sweep ───────────────────────────────────────────────────────

  /// Find, score, and record candidates for `anchor_id`, and categorize the
  /// anchor's existing history.
  ///
  /// Candidates already present in the history (any state) are excluded
  /// before scoring, so re-running the sweep never duplicates a pair or
  /// recomputes its score.
  pub async fn discover(
    &self,
    anchor_id: Uuid,
    acting: Option<Uuid>,
  ) -> Result<CategorizedMatches> {
    let anchor = self.require_anchor(anchor_id).await?;
    let partner_kind = self.direction.partner_kind();
    let anchor_is_mp = self.direction.anchor_is_missing_person();

    // History first: it doubles as the exclusion set for the candidate
    // pool, which is what makes the sweep idempotent across repeated reads.
    let history = self
      .store
      .matches_for_anchor(partner_kind, anchor_id, anchor_is_mp)
      .await
      .map_err(Error::store)?;
    let exclude: Vec<Uuid> =
      history.iter().map(|m| m.other_side(anchor_id)).collect();

    let candidates = self
      .store
      .eligible_candidates(self.direction.candidate_kind(), &exclude)
      .await
      .map_err(Error::store)?;

    let anchor_info = if self.options.extended {
      self
        .store
        .additional_info(anchor_id)
        .await
        .map_err(Error::store)?
    } else {
      None
    };

    let mut newly_matched = Vec::new();
    for candidate in candidates {
      let candidate_info = if self.options.extended {
        self
          .store
          .additional_info(candidate.id)
          .await
          .map_err(Error::store)?
      } else {
        None
      };

      // The scorer always sees (missing person, partner).
      let (mp, partner, mp_info, partner_info) = if anchor_is_mp {
        (&anchor, &candidate, anchor_info.as_ref(), candidate_info.as_ref())
      } else {
        (&candidate, &anchor, candidate_info.as_ref(), anchor_info.as_ref())
      };

      let score = score_with(mp, partner, mp_info, partner_info, self.options);
      if score == 0 {
        continue;
      }

      let input = NewMatch {
        missing_person_id: mp.id,
        partner_id: partner.id,
        partner_kind,
        match_type: if score >= AUTO_MATCH_THRESHOLD {
          MatchType::Matched
        } else {
          MatchType::Potential
        },
        score,
        match_parameters: MatchParameters::capture(mp, partner),
        created_by: acting,
      };

      // `None` means a concurrent sweep recorded this pair first; it will
      // show up in the history buckets of the next read.
      let Some(record) = self
        .store
        .try_insert_match(input)
        .await
        .map_err(Error::store)?
      else {
        debug!(candidate = %candidate.id, "pair already recorded, skipping");
        continue;
      };

      if score >= DISPLAY_THRESHOLD {
        newly_matched.push(MatchEntry {
          person: candidate,
          score,
          match_id: record.match_id,
          match_type: None,
          created_at: None,
          is_viewed: false,
          reject_reason: None,
          confirmation_note: None,
        });
      }
    }
    newly_matched.sort_by(|a, b| b.score.cmp(&a.score));

    info!(
      anchor = %anchor_id,
      new = newly_matched.len(),
      history = history.len(),
      "discovery sweep complete"
    );

    self.categorize(anchor, anchor_id, history, newly_matched).await
  }

  /// Sort the anchor's pre-existing history into the display buckets.
  async fn categorize(
    &self,
    anchor: CaseRecord,
    anchor_id: Uuid,
    history: Vec<MatchRecord>,
    newly_matched: Vec<MatchEntry>,
  ) -> Result<CategorizedMatches> {
    let mut previously_matched = Vec::new();
    let mut viewed = Vec::new();
    let mut rejected = Vec::new();
    let mut confirmed = Vec::new();

    for m in history {
      let Some(other) = self
        .store
        .get_case(m.other_side(anchor_id))
        .await
        .map_err(Error::store)?
      else {
        continue;
      };

      // Records can be edited after a match is recorded; drop pairs whose
      // genders no longer agree.
      if let (Some(a), Some(b)) = (&anchor.gender, &other.gender)
        && !a.is_empty()
        && !b.is_empty()
        && a.to_lowercase() != b.to_lowercase()
      {
        continue;
      }

      let mut entry = MatchEntry {
        person: other,
        score: m.score,
        match_id: m.match_id,
        match_type: Some(m.match_type),
        created_at: Some(m.created_at),
        is_viewed: m.is_viewed,
        reject_reason: None,
        confirmation_note: None,
      };

      if m.is_viewed {
        viewed.push(entry);
      } else {
        match m.match_type {
          MatchType::Matched => previously_matched.push(entry),
          MatchType::Rejected => {
            entry.reject_reason = m.reject_reason;
            rejected.push(entry);
          }
          MatchType::Confirmed => {
            entry.confirmation_note = m.confirmation_note;
            confirmed.push(entry);
          }
          // Unviewed potentials are not surfaced.
          MatchType::Potential => {}
        }
      }
    }

    for bucket in [
      &mut previously_matched,
      &mut viewed,
      &mut rejected,
      &mut confirmed,
    ] {
      bucket.sort_by(|a, b| b.score.cmp(&a.score));
    }

    Ok(CategorizedMatches {
      newly_matched,
      previously_matched,
      viewed,
      rejected,
      confirmed,
      anchor,
    })
  }

  // ── Lifecycle transitions ─────────────────────────────────────────────────

  /// Reject a match. Refused from `rejected` or `confirmed`.
  pub async fn reject(
    &self,
    anchor_id: Uuid,
    match_id: &str,
    reject_reason: &str,
    acting: Option<Uuid>,
  ) -> Result<()> {
    if reject_reason.trim().is_empty() {
      return Err(Error::MissingField { field: "reject_reason" });
    }

    let mut m = self.require_match(anchor_id, match_id).await?;
    if m.match_type.is_terminal() {
      return Err(Error::AlreadyTerminal(m.match_type));
    }

    m.match_type = MatchType::Rejected;
    m.reject_reason = Some(reject_reason.to_string());
    m.is_viewed = false;
    m.updated_by = acting;
    self.store.save_match(&m).await.map_err(Error::store)?;

    info!(match_id, "match rejected");
    Ok(())
  }

  /// Revert a rejected match to `matched` or `potential`.
  pub async fn unreject(
    &self,
    anchor_id: Uuid,
    match_id: &str,
    new_status: &str,
    unreject_reason: &str,
    acting: Option<Uuid>,
  ) -> Result<MatchType> {
    let target = MatchType::revert_target(new_status)?;
    if unreject_reason.trim().is_empty() {
      return Err(Error::MissingField { field: "unreject_reason" });
    }

    let mut m = self.require_match(anchor_id, match_id).await?;
    if m.match_type != MatchType::Rejected {
      return Err(Error::NotRejected(m.match_type));
    }

    m.match_type = target;
    m.reject_reason = None;
    m.unreject_reason = Some(unreject_reason.to_string());
    m.is_viewed = true;
    m.updated_by = acting;
    self.store.save_match(&m).await.map_err(Error::store)?;

    info!(match_id, status = %target, "match unrejected");
    Ok(target)
  }

  /// Confirm a match: the terminal positive outcome. Marks both linked
  /// cases resolved with reciprocal cross-references, atomically.
  pub async fn confirm(
    &self,
    anchor_id: Uuid,
    match_id: &str,
    confirmation_note: Option<String>,
    acting: Option<Uuid>,
  ) -> Result<()> {
    let mut m = self.require_match(anchor_id, match_id).await?;
    if m.match_type.is_terminal() {
      return Err(Error::AlreadyTerminal(m.match_type));
    }

    let mp = self.require_case(m.missing_person_id).await?;
    let partner = self.require_case(m.partner_id).await?;

    // Friendly pre-check; the store re-checks inside the transaction that
    // applies the writes, which is what actually closes the race.
    for side in [&mp, &partner] {
      if side.case_status == crate::case::CaseStatus::Resolved {
        return Err(Error::CaseAlreadyResolved { case_id: display_id(side) });
      }
    }

    let partner_case_kind = m.partner_kind.case_kind();
    m.match_type = MatchType::Confirmed;
    m.confirmation_note = Some(confirmation_note.unwrap_or_default());
    m.match_with = Some(partner_case_kind);
    m.is_viewed = false;
    m.updated_by = acting;

    let left = CaseResolution {
      case: mp.id,
      match_with: partner_case_kind,
      matched_person_id: partner.id,
      matched_case_id: partner.case_id.clone(),
    };
    let right = CaseResolution {
      case: partner.id,
      match_with: CaseKind::MissingPerson,
      matched_person_id: mp.id,
      matched_case_id: mp.case_id.clone(),
    };

    match self
      .store
      .apply_confirmation(&m, left, right, acting)
      .await
      .map_err(Error::store)?
    {
      ConfirmApply::Applied => {
        info!(match_id, mp = %mp.id, partner = %partner.id, "match confirmed");
        Ok(())
      }
      ConfirmApply::AlreadyResolved { case_id } => {
        Err(Error::CaseAlreadyResolved { case_id })
      }
    }
  }

  /// Undo a confirmation. The match is addressed by the partner's case id
  /// rather than the match id; both cases revert to pending with their
  /// cross-references cleared, atomically.
  pub async fn unconfirm(
    &self,
    anchor_id: Uuid,
    matched_person_id: Uuid,
    new_status: &str,
    unconfirm_reason: &str,
    acting: Option<Uuid>,
  ) -> Result<MatchType> {
    let target = MatchType::revert_target(new_status)?;
    if unconfirm_reason.trim().is_empty() {
      return Err(Error::MissingField { field: "unconfirm_reason" });
    }

    let mut m = self
      .store
      .find_match_by_pair(
        self.direction.partner_kind(),
        anchor_id,
        self.direction.anchor_is_missing_person(),
        matched_person_id,
      )
      .await
      .map_err(Error::store)?
      .ok_or(Error::MatchNotFound)?;

    if m.match_type != MatchType::Confirmed {
      return Err(Error::NotConfirmed(m.match_type));
    }

    m.match_type = target;
    m.confirmation_note = None;
    m.unconfirm_reason = Some(unconfirm_reason.to_string());
    m.is_viewed = true;
    m.updated_by = acting;

    self
      .store
      .apply_unconfirmation(&m, m.missing_person_id, m.partner_id, acting)
      .await
      .map_err(Error::store)?;

    info!(match_id = %m.match_id, status = %target, "match unconfirmed");
    Ok(target)
  }

  // ── Lookups ───────────────────────────────────────────────────────────────

  /// The anchor must exist with this direction's kind, approved and not
  /// soft-deleted; anything else reads as not-found to the caller.
  async fn require_anchor(&self, id: Uuid) -> Result<CaseRecord> {
    let case = self
      .store
      .get_case(id)
      .await
      .map_err(Error::store)?
      .filter(|c| c.kind == self.direction.anchor_kind() && c.is_matchable())
      .ok_or(Error::CaseNotFound(id))?;
    Ok(case)
  }

  async fn require_case(&self, id: Uuid) -> Result<CaseRecord> {
    self
      .store
      .get_case(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::CaseNotFound(id))
  }

  async fn require_match(
    &self,
    anchor_id: Uuid,
    match_id: &str,
  ) -> Result<MatchRecord> {
    self
      .store
      .find_match(
        self.direction.partner_kind(),
        anchor_id,
        self.direction.anchor_is_missing_person(),
        match_id,
      )
      .await
      .map_err(Error::store)?
      .ok_or(Error::MatchNotFound)
  }
}

/// Mark a match viewed by its global match id, unscoped to any anchor.
pub async fn mark_viewed<S>(
  store: &S,
  match_id: &str,
  acting: Option<Uuid>,
) -> Result<()>
where
  S: MatchStore,
{
  if store
    .mark_viewed(match_id, acting)
    .await
    .map_err(Error::store)?
  {
    Ok(())
  } else {
    Err(Error::MatchNotFound)
  }
}

fn display_id(case: &CaseRecord) -> String {
  case.case_id.clone().unwrap_or_else(|| case.id.to_string())
}
