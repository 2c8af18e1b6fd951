use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Question;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuestionsQuery {
    /// Random subset size; omitted means the whole bank
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub count: usize,
    pub questions: Vec<Question>,
}

/// GET /api/questions
pub async fn list_questions(
    query: web::Query<QuestionsQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let questions = match query.count {
        Some(count) => state.questions.sample(count, &mut rand::thread_rng())?,
        None => state.questions.all().to_vec(),
    };

    Ok(HttpResponse::Ok().json(QuestionsResponse {
        count: questions.len(),
        questions,
    }))
}
