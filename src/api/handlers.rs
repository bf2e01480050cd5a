// HTTP request handlers for API endpoints

use actix_web::{web, HttpResponse, Result};

use crate::api::models::*;
use crate::query::filter::EpisodeFilter;
use crate::query;
use crate::store::Db;

/// Health check endpoint
pub async fn health_check(db: web::Data<Db>) -> Result<HttpResponse> {
    let db_status = match sqlx::query_scalar::<_, bool>("SELECT true")
        .fetch_one(&db.pool)
        .await
    {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        database: db_status.to_string(),
    }))
}

/// GET /api/episodes — filter episodes by color, feature, and air-date month.
pub async fn get_episodes(
    params: web::Query<EpisodesParams>,
    db: web::Data<Db>,
) -> Result<HttpResponse> {
    let filter = match EpisodeFilter::from_raw(
        params.colors.as_deref(),
        params.features.as_deref(),
        params.month.as_deref(),
        params.match_type.as_deref(),
    ) {
        Ok(f) => f,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ErrorBody {
                error: e.to_string(),
            }));
        }
    };

    tracing::info!(
        colors = ?filter.colors,
        features = ?filter.features,
        months = ?filter.months,
        match_mode = filter.match_mode.as_str(),
        "episode query"
    );

    match query::fetch_episodes(&db.pool, &filter).await {
        Ok(hits) => Ok(HttpResponse::Ok().json(EpisodesResponse::new(&filter, hits))),
        Err(e) => {
            // Log the real failure; the caller only sees a generic body.
            tracing::error!(error = %e, "episode query failed");
            Ok(HttpResponse::InternalServerError().json(ErrorBody {
                error: "Internal server error".to_string(),
            }))
        }
    }
}
