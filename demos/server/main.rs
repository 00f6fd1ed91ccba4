use actix_web::{
    cookie::Cookie,
    http::StatusCode,
    middleware::Logger as ActixLogger,
    web, App, HttpRequest, HttpResponse, HttpResponseBuilder, HttpServer, Responder,
};
use chrono::Local;
use justflash::{setup_logger, FlashConfig, SessionData};
use log::{error, info, trace, warn};
use serde_json::{json, Value};
use std::{
    env as stdenv,
    path::Path,
    process::id as process_id,
    sync::atomic::{AtomicU64, Ordering},
};

mod cors;
use crate::cors::*;
mod env;
use crate::env::*;
mod kv_store;
use crate::kv_store::KVStore;

const SESSION_COOKIE: &str = "sid";

struct AppState {
    sessions: KVStore,
    flash: FlashConfig,
    next_id: AtomicU64,
}

impl AppState {
    fn new_session_id(&self) -> String {
        let seq = self.next_id.fetch_add(1, Ordering::Relaxed);
        let now = Local::now().timestamp_nanos_opt().unwrap_or_default();
        format!("{:x}-{:x}-{:x}", process_id(), now, seq)
    }

    async fn load(&self, req: &HttpRequest) -> (String, SessionData) {
        let sid = match req.cookie(SESSION_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => {
                let sid = self.new_session_id();
                trace!("new session {}", sid);
                sid
            }
        };
        let session = self.sessions.load(&sid).await;
        (sid, session)
    }
}

fn with_session(status: StatusCode, sid: String, body: Value) -> HttpResponse {
    HttpResponseBuilder::new(status)
        .cookie(
            Cookie::build(SESSION_COOKIE, sid)
                .path("/")
                .http_only(true)
                .finish(),
        )
        .json(body)
}

async fn health() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

/// Shows the messages for this request, consuming what was queued before.
async fn get_messages(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    let (sid, mut session) = state.load(&req).await;
    let messages = state.flash.open(&mut session).into_messages();
    state.sessions.save(&sid, session).await;
    with_session(StatusCode::OK, sid, json!({ "messages": messages }))
}

/// Queues the JSON body under `key` for the next request.
async fn queue_message(
    req: HttpRequest,
    state: web::Data<AppState>,
    key: web::Path<String>,
    body: web::Json<Value>,
) -> impl Responder {
    let key = key.into_inner();
    let (sid, mut session) = state.load(&req).await;
    let messages = {
        let mut flash = state.flash.open(&mut session);
        flash.add_message(&key, body.into_inner());
        flash.into_messages()
    };
    state.sessions.save(&sid, session).await;
    info!("flash queued under '{}' for session {}", key, sid);
    with_session(
        StatusCode::ACCEPTED,
        sid,
        json!({ "queued": key, "messages": messages }),
    )
}

/// Adds the JSON body under `key` for this request only.
async fn show_message_now(
    req: HttpRequest,
    state: web::Data<AppState>,
    key: web::Path<String>,
    body: web::Json<Value>,
) -> impl Responder {
    let key = key.into_inner();
    let (sid, mut session) = state.load(&req).await;
    let messages = {
        let mut flash = state.flash.open(&mut session);
        flash.add_message_now(&key, body.into_inner());
        flash.into_messages()
    };
    state.sessions.save(&sid, session).await;
    with_session(StatusCode::OK, sid, json!({ "messages": messages }))
}

async fn clear_message(
    req: HttpRequest,
    state: web::Data<AppState>,
    key: web::Path<String>,
) -> impl Responder {
    let key = key.into_inner();
    let (sid, mut session) = state.load(&req).await;
    let messages = {
        let mut flash = state.flash.open(&mut session);
        if !flash.has_message(&key) {
            warn!("no flash under '{}' to clear", key);
        }
        flash.clear_message(&key);
        flash.into_messages()
    };
    state.sessions.save(&sid, session).await;
    with_session(StatusCode::OK, sid, json!({ "messages": messages }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    setup_logger();
    load_env_file();

    let this_script_name = Path::new(&stdenv::args().next().unwrap_or_default())
        .file_name()
        .unwrap_or_default()
        .to_str()
        .unwrap_or_default()
        .to_owned();
    info!("{} PID: {}", this_script_name, process_id());

    let target_port = load_env_var("PORT", "8081");
    let target_host = load_env_var("HOST", "127.0.0.1");
    let target_server = format!("{}:{}", target_host, target_port);

    let cors_origins = load_cors_origins("CORS_ORIGINS");
    info!("Allowed cors_origins: {:?}", cors_origins);

    let state = web::Data::new(AppState {
        sessions: KVStore::new(),
        flash: FlashConfig::from_env(),
        next_id: AtomicU64::new(0),
    });
    info!("flash storage key: {}", state.flash.storage_key);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(ActixLogger::default())
            .wrap(build_cors(&cors_origins))
            .configure(|cfg| {
                cfg.route("/health", web::get().to(health))
                    .route("/messages", web::get().to(get_messages))
                    .route("/messages/{key}", web::post().to(queue_message))
                    .route("/messages/{key}", web::delete().to(clear_message))
                    .route("/messages/{key}/now", web::post().to(show_message_now));
            })
    })
    .bind(&target_server)?
    .run();

    info!("Server running at http://{}", target_server);

    if let Err(e) = server.await {
        error!("Server stopped with error: {:?}", e);
        return Err(e);
    }
    info!("Worker stopped with PID: {}", process_id());
    Ok(())
}
