use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;
use std::time::Duration;

use lucky_spin::{
    config::Config,
    external::{CelebrationProvider, DisabledCelebrations, GeminiService},
    handlers,
    middlewares::create_cors,
    services::DrawService,
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 祝贺语服务：未配置 API key 时直接使用兜底文案
    let celebrations: Arc<dyn CelebrationProvider> = match GeminiService::new(config.gemini.clone())
    {
        Ok(gemini) if gemini.is_enabled() => {
            log::info!("Gemini celebrations enabled, model {}", config.gemini.model);
            Arc::new(gemini)
        }
        Ok(_) => {
            log::warn!("Gemini API key not set, celebrations use fallback messages");
            Arc::new(DisabledCelebrations)
        }
        Err(e) => {
            log::error!("Failed to build Gemini client: {e}");
            Arc::new(DisabledCelebrations)
        }
    };

    let draw_service = DrawService::new(
        config.picker.settings(),
        celebrations,
        Duration::from_secs(config.gemini.timeout_secs),
    );

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(draw_service.clone()))
            .configure(swagger_config)
            .service(web::scope("/api/v1").configure(handlers::picker_config))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
