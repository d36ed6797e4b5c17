mod chat_payload;
mod handlers;

use std::sync::{Arc, OnceLock};

use advisor::{
    ChatService, EmbeddingService, GenerationService, KnowledgeBase, Retriever, Settings,
};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

pub struct AppState {
    pub chat: ChatService,
}

static APP_STATE: OnceLock<AppState> = OnceLock::new();

pub fn app_state() -> &'static AppState {
    APP_STATE.get().expect("state initialized before serving")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let embedder = Arc::new(EmbeddingService::new(&settings));
    let knowledge_base = match KnowledgeBase::build(&settings.pdf_path, &embedder).await {
        Ok(kb) => {
            println!("Policy handbook indexed: {} pages", kb.page_count());
            Arc::new(kb)
        }
        Err(e) => {
            eprintln!("Failed to initialize knowledge base: {}", e);
            std::process::exit(1);
        }
    };

    let retriever = Arc::new(Retriever::new(embedder, knowledge_base));
    let generation = Arc::new(GenerationService::new(&settings));
    APP_STATE
        .set(AppState {
            chat: ChatService::new(retriever, generation),
        })
        .map_err(|_| anyhow::anyhow!("app state already initialized"))?;

    let app = Router::new()
        .route("/chat", post(handlers::chat))
        .route("/suggestions", get(handlers::suggestions))
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    println!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
