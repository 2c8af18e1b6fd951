use actix_web::http::header::ContentType;
use actix_web::{web, HttpRequest, HttpResponse};
use tracing::info;

use crate::render;
use crate::state::AppState;

/// Client address: first X-Forwarded-For entry, then X-Real-IP, then the peer.
pub fn client_ip(req: &HttpRequest) -> String {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    if let Some(forwarded) = header("X-Forwarded-For") {
        if let Some(first) = forwarded.split(',').map(str::trim).find(|s| !s.is_empty()) {
            return first.to_string();
        }
    }

    if let Some(real_ip) = header("X-Real-IP") {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// GET /
///
/// Quiz page, annotated with the visitor's region.
pub async fn index(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let ip = client_ip(&req);
    let location = state.locator.locate(&ip).await;

    info!(
        ip = %location.ip,
        city = %location.city,
        region = %location.region,
        country = %location.country,
        org = %location.org,
        error = ?location.error,
        "Visitor location"
    );

    let body = render::index_page(
        location.region_or(render::UNKNOWN_REGION),
        state.questions.all(),
        &state.bounds,
    );
    HttpResponse::Ok().content_type(ContentType::html()).body(body)
}

/// GET /desc_answer
pub async fn desc_answer(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render::desc_answer_page(&state.bounds))
}

/// GET /health
pub async fn health() -> &'static str {
    "OK"
}
