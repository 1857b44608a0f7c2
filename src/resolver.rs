//! Conflict resolution over the pooled candidate tags.
//!
//! Candidates from all strategies are reconciled here:
//! 1. identical-kind candidates on exactly equal spans are duplicates, not
//!    conflicts — the best one silently survives
//! 2. person detections reducing to the same normalized name on overlapping
//!    spans collapse to a single tag, whichever heuristic produced them
//! 3. `Label` tags always coexist and never enter conflict clusters
//! 4. everything else is clustered by span overlap; each cluster resolves to
//!    one winner by confidence, then strategy priority, then earliest start,
//!    then shortest span — a total order, so resolution cannot stall
//!
//! Losing candidates stay in the recorded `Conflict` for observability.

use std::collections::BTreeMap;

use crate::types::{CandidateTag, Conflict, Span, TagKind};

/// What resolution produced: the surviving tags (ordered by span start) and
/// the conflict records.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionOutcome {
    pub kept: Vec<CandidateTag>,
    pub conflicts: Vec<Conflict>,
}

/// Resolve the pooled candidates. `priority_of` maps strategy id → tie-break
/// rank; unknown sources rank lowest.
pub fn resolve(
    mut candidates: Vec<CandidateTag>,
    priority_of: &BTreeMap<String, i32>,
) -> ResolutionOutcome {
    // deterministic working order regardless of strategy emission order
    candidates.sort_by(|a, b| base_order(a).cmp(&base_order(b)));

    // 1. exact duplicates — same kind, same span, same value (two distinct
    //    category labels may legitimately anchor to one span)
    let mut deduped: Vec<CandidateTag> = Vec::new();
    for tag in candidates {
        match deduped
            .iter_mut()
            .find(|t| t.kind == tag.kind && t.span == tag.span && t.value == tag.value)
        {
            Some(existing) => {
                if beats(&tag, existing, priority_of) {
                    *existing = tag;
                }
            }
            None => deduped.push(tag),
        }
    }

    // 2. person-name dedup across heuristics
    let mut merged: Vec<CandidateTag> = Vec::new();
    for tag in deduped {
        if tag.kind == TagKind::Person {
            let name = normalized_name(&tag);
            if let Some(existing) = merged.iter_mut().find(|t| {
                t.kind == TagKind::Person
                    && t.span.overlaps(&tag.span)
                    && normalized_name(t) == name
            }) {
                if beats(&tag, existing, priority_of) {
                    *existing = tag;
                }
                continue;
            }
        }
        merged.push(tag);
    }

    // 3. labels coexist unconditionally
    let (labels, rest): (Vec<CandidateTag>, Vec<CandidateTag>) =
        merged.into_iter().partition(|t| t.kind == TagKind::Label);

    // 4. cluster the rest by span overlap
    let mut kept: Vec<CandidateTag> = labels;
    let mut conflicts: Vec<Conflict> = Vec::new();
    for cluster in clusters_by_overlap(rest) {
        if cluster.len() == 1 {
            kept.extend(cluster);
            continue;
        }
        let span = cluster
            .iter()
            .skip(1)
            .fold(cluster[0].span, |acc, t| acc.union(&t.span));
        let winner = cluster
            .iter()
            .max_by(|a, b| winner_order(a, b, priority_of))
            .cloned();
        if let Some(w) = &winner {
            kept.push(w.clone());
        }
        // winner is None only for an empty cluster, which cannot occur; the
        // record shape still allows it so the assembler can exclude rather
        // than guess
        conflicts.push(Conflict {
            span,
            tags: cluster,
            resolved: winner,
        });
    }

    kept.sort_by(|a, b| base_order(a).cmp(&base_order(b)));
    ResolutionOutcome { kept, conflicts }
}

fn base_order(tag: &CandidateTag) -> (Span, TagKind, &str, &str) {
    (tag.span, tag.kind, tag.source.as_str(), tag.display_text.as_str())
}

/// Total-order winner comparison: confidence, strategy priority, earliest
/// span start, shortest span, then stable identity fields.
fn winner_order(
    a: &CandidateTag,
    b: &CandidateTag,
    priority_of: &BTreeMap<String, i32>,
) -> std::cmp::Ordering {
    let rank = |t: &CandidateTag| priority_of.get(&t.source).copied().unwrap_or(i32::MIN);
    a.confidence
        .total_cmp(&b.confidence)
        .then_with(|| rank(a).cmp(&rank(b)))
        .then_with(|| b.span.start.cmp(&a.span.start))
        .then_with(|| b.span.len().cmp(&a.span.len()))
        .then_with(|| b.source.cmp(&a.source))
        .then_with(|| b.display_text.cmp(&a.display_text))
}

fn beats(a: &CandidateTag, b: &CandidateTag, priority_of: &BTreeMap<String, i32>) -> bool {
    winner_order(a, b, priority_of) == std::cmp::Ordering::Greater
}

fn normalized_name(tag: &CandidateTag) -> String {
    let lower = tag.display_text.to_lowercase();
    lower
        .strip_suffix("'s")
        .or_else(|| lower.strip_suffix("’s"))
        .unwrap_or(&lower)
        .to_string()
}

/// Group tags into overlap clusters. Input must be sorted by span start.
fn clusters_by_overlap(tags: Vec<CandidateTag>) -> Vec<Vec<CandidateTag>> {
    let mut clusters: Vec<Vec<CandidateTag>> = Vec::new();
    let mut current: Vec<CandidateTag> = Vec::new();
    let mut current_end = 0usize;

    for tag in tags {
        if current.is_empty() || tag.span.start < current_end {
            current_end = current_end.max(tag.span.end);
            current.push(tag);
        } else {
            clusters.push(std::mem::take(&mut current));
            current_end = tag.span.end;
            current.push(tag);
        }
    }
    if !current.is_empty() {
        clusters.push(current);
    }
    clusters
}
