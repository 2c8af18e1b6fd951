/// HTTP handlers for the values-match service
use actix_web::web;

pub mod pages;
pub mod questions;
pub mod rank;

pub use pages::{client_ip, desc_answer, health, index};
pub use questions::{list_questions, QuestionsQuery, QuestionsResponse};
pub use rank::{rank, MatchView, OutputFormat, RankParams, RankResponse};

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/desc_answer", web::get().to(desc_answer))
        .route("/health", web::get().to(health))
        .route("/api/rank", web::get().to(rank))
        .route("/api/questions", web::get().to(list_questions));
}
