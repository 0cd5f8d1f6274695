use crate::models::*;
use crate::services::DrawService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/picker/state",
    tag = "picker",
    responses(
        (status = 200, description = "获取抽奖页面状态成功", body = PickerSnapshot)
    )
)]
/// 获取完整状态（列表、设置、当前抽奖状态、历史、彩带特效），前端轮询使用
pub async fn get_state(service: web::Data<DrawService>) -> Result<HttpResponse> {
    let snapshot = service.snapshot().await;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": snapshot })))
}

#[utoipa::path(
    put,
    path = "/picker/list",
    tag = "picker",
    request_body = UpdateListRequest,
    responses(
        (status = 200, description = "更新候选列表成功", body = CandidateListResponse),
        (status = 409, description = "抽奖进行中，列表被锁定")
    )
)]
/// 用多行文本替换候选列表（每行一项，空行忽略）
pub async fn update_list(
    service: web::Data<DrawService>,
    request: web::Json<UpdateListRequest>,
) -> Result<HttpResponse> {
    match service.set_raw_text(&request.text).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/picker/settings",
    tag = "picker",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "更新设置成功", body = Settings)
    )
)]
/// 修改设置（只修改提供的字段）
pub async fn update_settings(
    service: web::Data<DrawService>,
    request: web::Json<UpdateSettingsRequest>,
) -> Result<HttpResponse> {
    let settings = service.update_settings(&request).await;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": settings })))
}

#[utoipa::path(
    post,
    path = "/picker/draw",
    tag = "picker",
    responses(
        (status = 200, description = "抽奖请求已处理；列表为空或已有抽奖进行中时 started=false", body = DrawResponse)
    )
)]
/// 开始一轮抽奖:
/// 1. 动画期间每 40ms 随机显示一个名称，共 12 帧
/// 2. 最后一帧后重新随机抽出中奖项
/// 3. 结果通过 `/picker/state` 获取
pub async fn draw(service: web::Data<DrawService>) -> Result<HttpResponse> {
    let response = service.draw().await;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": response })))
}

#[utoipa::path(
    post,
    path = "/picker/reset",
    tag = "picker",
    responses(
        (status = 200, description = "已复位", body = DrawState)
    )
)]
/// 取消进行中的动画或清除当前展示结果
pub async fn reset(service: web::Data<DrawService>) -> Result<HttpResponse> {
    let state = service.reset().await;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": state })))
}

#[utoipa::path(
    get,
    path = "/picker/history",
    tag = "picker",
    responses(
        (status = 200, description = "获取中奖历史成功", body = [Winner])
    )
)]
/// 中奖历史（最新在前）
pub async fn get_history(service: web::Data<DrawService>) -> Result<HttpResponse> {
    let history = service.history().await;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": history })))
}

#[utoipa::path(
    get,
    path = "/picker/history/{id}",
    tag = "picker",
    params(
        ("id" = String, Path, description = "中奖记录ID")
    ),
    responses(
        (status = 200, description = "获取中奖记录成功", body = Winner),
        (status = 404, description = "记录不存在")
    )
)]
/// 按 id 获取单条中奖记录（用于等待较晚返回的祝贺语）
pub async fn get_winner(
    service: web::Data<DrawService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.find_winner(&path.into_inner()).await {
        Ok(winner) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": winner }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/picker/history",
    tag = "picker",
    params(
        ("confirm" = Option<bool>, Query, description = "用户是否确认清空 (默认 false)")
    ),
    responses(
        (status = 200, description = "未确认时 cleared=false 且不做修改", body = ClearHistoryResponse)
    )
)]
/// 清空中奖历史，需前端弹窗确认后传 confirm=true
pub async fn clear_history(
    service: web::Data<DrawService>,
    query: web::Query<ClearHistoryQuery>,
) -> Result<HttpResponse> {
    let response = service.clear_history(query.confirm).await;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": response })))
}

/// 路由配置
pub fn picker_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/picker")
            .route("/state", web::get().to(get_state))
            .route("/list", web::put().to(update_list))
            .route("/settings", web::put().to(update_settings))
            .route("/draw", web::post().to(draw))
            .route("/reset", web::post().to(reset))
            .route("/history", web::get().to(get_history))
            .route("/history", web::delete().to(clear_history))
            .route("/history/{id}", web::get().to(get_winner)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::DisabledCelebrations;
    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;

    fn service() -> DrawService {
        DrawService::new(
            Settings {
                remove_after_pick: true,
                sound_enabled: true,
                auto_ai: false,
            },
            Arc::new(DisabledCelebrations),
            Duration::from_secs(10),
        )
    }

    #[actix_web::test]
    async fn test_list_draw_and_state() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service()))
                .service(web::scope("/api/v1").configure(picker_config)),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/api/v1/picker/list")
            .set_json(json!({ "text": " Mug \n\nBear\nMug" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["candidates"], json!(["Mug", "Bear", "Mug"]));
        assert_eq!(body["data"]["count"], 3);

        let req = test::TestRequest::post()
            .uri("/api/v1/picker/draw")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["started"], true);
        assert_eq!(body["data"]["state"]["status"], "shuffling");

        let req = test::TestRequest::post()
            .uri("/api/v1/picker/draw")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["started"], false);

        let req = test::TestRequest::put()
            .uri("/api/v1/picker/list")
            .set_json(json!({ "text": "Other" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::post()
            .uri("/api/v1/picker/reset")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["status"], "idle");

        let req = test::TestRequest::get()
            .uri("/api/v1/picker/state")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["raw_text"], " Mug \n\nBear\nMug");
        assert_eq!(body["data"]["settings"]["auto_ai"], false);
        assert_eq!(body["data"]["history"], json!([]));
    }

    #[actix_web::test]
    async fn test_settings_and_history_endpoints() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service()))
                .service(web::scope("/api/v1").configure(picker_config)),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/api/v1/picker/settings")
            .set_json(json!({ "remove_after_pick": false }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["remove_after_pick"], false);
        assert_eq!(body["data"]["sound_enabled"], true);

        let req = test::TestRequest::delete()
            .uri("/api/v1/picker/history")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["cleared"], false);

        let req = test::TestRequest::delete()
            .uri("/api/v1/picker/history?confirm=true")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["cleared"], true);
        assert_eq!(body["data"]["history_len"], 0);

        let req = test::TestRequest::get()
            .uri("/api/v1/picker/history/unknown")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
