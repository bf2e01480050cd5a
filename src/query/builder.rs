//! Composes the aggregate episode query from an [`EpisodeFilter`].
//!
//! All user-supplied values are bound, including the exact-count thresholds
//! in `all` mode; no filter text is ever interpolated into the SQL.

use sqlx::{Postgres, QueryBuilder};

use super::filter::{EpisodeFilter, MatchMode};

const BASE_SELECT: &str = "SELECT p.painting_id, p.title, e.episode_id, e.episode_number, e.season, e.air_date, \
     array_agg(DISTINCT c.color) AS colors, \
     array_agg(DISTINCT f.feature_name) AS features \
     FROM paintings p \
     JOIN episodes e ON e.painting_id = p.painting_id \
     LEFT JOIN colors c ON c.painting_id = p.painting_id \
     LEFT JOIN painting_features pf ON pf.painting_id = p.painting_id \
     LEFT JOIN features f ON f.feature_id = pf.feature_id \
     WHERE 1=1";

const GROUP_ORDER: &str = " GROUP BY p.painting_id, p.title, e.episode_id, e.episode_number, e.season, e.air_date \
     ORDER BY e.season, e.episode_number";

/// Month of the stored epoch value, compared against the requested set. The
/// 0 placeholder means "air date not yet known" and must never match a month
/// (TO_TIMESTAMP(0) would otherwise read as January 1970). Callers close the
/// guard with `))`.
const MONTH_TEST: &str =
    "(e.air_date <> 0 AND EXTRACT(MONTH FROM TO_TIMESTAMP(e.air_date))::int = ANY(";

pub fn build_episode_query(filter: &EpisodeFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(BASE_SELECT);
    match filter.match_mode {
        MatchMode::All => push_all_predicates(&mut qb, filter),
        MatchMode::Any => push_any_predicates(&mut qb, filter),
    }
    qb.push(GROUP_ORDER);
    qb
}

/// `all` mode: each non-empty filter contributes an independent AND clause.
/// Colors and features use exact-count subqueries ("has every requested
/// value"); months are single-valued per episode, so membership in the
/// requested set is the right test even here.
fn push_all_predicates(qb: &mut QueryBuilder<'static, Postgres>, filter: &EpisodeFilter) {
    if !filter.colors.is_empty() {
        qb.push(
            " AND p.painting_id IN (SELECT painting_id FROM colors WHERE color = ANY(",
        )
        .push_bind(filter.colors.clone())
        .push(") GROUP BY painting_id HAVING COUNT(DISTINCT color) = ")
        .push_bind(filter.colors.len() as i64)
        .push(")");
    }

    if !filter.features.is_empty() {
        qb.push(
            " AND p.painting_id IN (SELECT pf2.painting_id \
             FROM painting_features pf2 \
             JOIN features f2 ON f2.feature_id = pf2.feature_id \
             WHERE f2.feature_name = ANY(",
        )
        .push_bind(filter.features.clone())
        .push(") AND pf2.value = TRUE GROUP BY pf2.painting_id HAVING COUNT(DISTINCT f2.feature_name) = ")
        .push_bind(filter.features.len() as i64)
        .push(")");
    }

    if !filter.months.is_empty() {
        qb.push(" AND ")
            .push(MONTH_TEST)
            .push_bind(filter.months.clone())
            .push("))");
    }
}

/// `any` mode: the non-empty filters become row-level tests OR-ed together.
fn push_any_predicates(qb: &mut QueryBuilder<'static, Postgres>, filter: &EpisodeFilter) {
    if filter.is_empty() {
        return;
    }
    qb.push(" AND (");
    let mut first = true;

    if !filter.colors.is_empty() {
        qb.push("c.color = ANY(")
            .push_bind(filter.colors.clone())
            .push(")");
        first = false;
    }

    if !filter.features.is_empty() {
        if !first {
            qb.push(" OR ");
        }
        qb.push("(f.feature_name = ANY(")
            .push_bind(filter.features.clone())
            .push(") AND pf.value = TRUE)");
        first = false;
    }

    if !filter.months.is_empty() {
        if !first {
            qb.push(" OR ");
        }
        qb.push(MONTH_TEST)
            .push_bind(filter.months.clone())
            .push("))");
    }

    qb.push(")");
}
