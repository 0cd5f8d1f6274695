use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::picker::get_state,
        handlers::picker::update_list,
        handlers::picker::update_settings,
        handlers::picker::draw,
        handlers::picker::reset,
        handlers::picker::get_history,
        handlers::picker::get_winner,
        handlers::picker::clear_history,
    ),
    components(
        schemas(
            Winner,
            Settings,
            DrawState,
            CelebrationCue,
            UpdateListRequest,
            CandidateListResponse,
            UpdateSettingsRequest,
            DrawResponse,
            ClearHistoryQuery,
            ClearHistoryResponse,
            PickerSnapshot,
            ApiError,
        )
    ),
    tags(
        (name = "picker", description = "Lucky spin picker API"),
    ),
    info(
        title = "Lucky Spin API",
        version = "0.1.0",
        description = "Random prize picker backend: candidate list, animated draw, winner history"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_picker_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/picker/state", "/picker/draw", "/picker/history", "/picker/history/{id}"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
