use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::services::translation_service::{language_name, supported_codes, TranslationService};

#[derive(Debug, Deserialize)]
pub struct TranslateInput {
    pub text: Option<String>,
    pub target_language: Option<String>,
}

/// Translates text into a target language, e.g. 'ur' for Urdu. The target
/// code is checked against the known set before any upstream call.
pub async fn translate(input: web::Json<TranslateInput>) -> impl Responder {
    let input = input.into_inner();

    let (text, target) = match (input.text, input.target_language) {
        (Some(text), Some(target)) if !text.is_empty() && !target.is_empty() => (text, target),
        _ => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Both 'text' and 'target_language' fields are required."
            }))
        }
    };

    if language_name(&target).is_none() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!(
                "Invalid target_language code. Please use one of: {:?}",
                supported_codes()
            )
        }));
    }

    let service = match TranslationService::new() {
        Ok(service) => service,
        Err(err) => {
            eprintln!("Translation service unavailable: {}", err);
            return HttpResponse::InternalServerError().body("Translation service unavailable");
        }
    };

    match service.translate(&text, &target).await {
        Ok(translation) => HttpResponse::Ok().json(translation),
        Err(details) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Translation service failed.",
            "details": details,
        })),
    }
}
