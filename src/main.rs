use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    error_handling::HandleErrorLayer,
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    http::Method,
    routing::{get, post},
    BoxError, Router,
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tokio::sync::Mutex;
use tower::{buffer::BufferLayer, limit::RateLimitLayer, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};
use tracing_subscriber::EnvFilter;

use crate::{
    app::{
        env::{AssetSinkKind, Envy},
        errors::DefaultApiError,
        util::reqwest::ReqwestFetcher,
    },
    memes::{
        apis::openai::client::OpenAiClient,
        service::MemeGenerator,
        sinks::{
            backblaze::b2::{B2Config, B2},
            local::{LocalStorage, PUBLIC_IMAGES_PATH},
            AssetSink,
        },
    },
};

mod app;
mod auth;
mod meme_soldiers;
mod memes;
mod users;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub envy: Arc<Envy>,
    pub meme_generator: MemeGenerator,
}

#[tokio::main]
async fn main() {
    // tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // environment
    let app_env = env::var("APP_ENV").unwrap_or("development".to_string());
    let _ = dotenvy::from_filename(format!(".env.{}", app_env));
    let envy = match envy::from_env::<Envy>() {
        Ok(config) => config,
        Err(e) => panic!("{:#?}", e),
    };

    let port = envy.port.to_owned().unwrap_or(8000);

    let pool = PgPoolOptions::new()
        .max_connections(50)
        .idle_timeout(Some(Duration::from_secs(60)))
        .connect(&envy.database_url)
        .await
        .expect("failed to connect to database");

    tracing::info!("connected to db");

    let client = reqwest::Client::new();
    let sink = match build_asset_sink(&envy, &client).await {
        Ok(sink) => sink,
        Err(e) => panic!("failed to configure asset sink: {}", e),
    };

    let state = AppState {
        pool,
        meme_generator: build_meme_generator(&envy, client, sink),
        envy: Arc::new(envy),
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(%e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

async fn build_asset_sink(envy: &Envy, client: &reqwest::Client) -> Result<AssetSink, String> {
    match envy.asset_sink_kind() {
        AssetSinkKind::Local => {
            let root = envy.meme_storage_path();
            if let Err(e) = tokio::fs::create_dir_all(root).await {
                return Err(format!("failed to create {}: {}", root, e));
            }

            tracing::info!(%root, "storing memes on local disk");
            Ok(AssetSink::Local(LocalStorage::new(root)))
        }
        AssetSinkKind::Backblaze => {
            let (key_id, app_key, bucket_id) = envy
                .backblaze_credentials()
                .map_err(|missing| format!("{} is required for the backblaze sink", missing))?;

            let mut b2 = B2::new(B2Config { key_id, app_key }, bucket_id, client.clone());
            b2.login().await?;

            tracing::info!("logged in to backblaze");
            Ok(AssetSink::Backblaze(Arc::new(Mutex::new(b2))))
        }
        AssetSinkKind::Passthrough => {
            tracing::info!("passing generated image urls through");
            Ok(AssetSink::PassThrough)
        }
    }
}

fn build_meme_generator(envy: &Envy, client: reqwest::Client, sink: AssetSink) -> MemeGenerator {
    let openai = Arc::new(OpenAiClient::new(
        client.clone(),
        &envy.openai_api_key,
        envy.text_model(),
    ));

    MemeGenerator {
        text_generator: openai.clone(),
        image_generator: openai,
        fetcher: Arc::new(ReqwestFetcher::new(client)),
        sink,
        image_model: envy.image_model().to_string(),
        timeout: Duration::from_secs(envy.ai_timeout_secs()),
    }
}

fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::POST, Method::GET]);

    let images = ServeDir::new(state.envy.meme_storage_path());

    Router::new()
        .route("/", get(app::controller::get_root))
        // auth
        .route(
            "/auth/nonce/:wallet_address",
            get(auth::controller::get_wallet_nonce),
        )
        .route("/auth/verify", post(auth::controller::verify_wallet))
        // users
        .route("/users/me", get(users::controller::get_user_from_request))
        // memes
        .route("/meme/generate", post(memes::controller::generate_meme))
        .route(
            "/meme/generate_test",
            post(memes::controller::generate_meme_test),
        )
        // meme soldiers
        .route(
            "/meme/soldiers",
            get(meme_soldiers::controller::get_meme_soldiers),
        )
        .route(
            "/meme/soldiers/:id",
            get(meme_soldiers::controller::get_meme_soldier_by_id),
        )
        .route(
            "/meme/mint/:id",
            post(meme_soldiers::controller::mint_meme_soldier),
        )
        // static
        .nest_service(PUBLIC_IMAGES_PATH, images)
        // layers
        .layer(cors)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(|err: BoxError| async move {
                    tracing::error!(%err);
                    DefaultApiError::InternalServerError.value()
                }))
                .layer(BufferLayer::new(1024))
                .layer(RateLimitLayer::new(5, Duration::from_secs(1))),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use bytes::Bytes;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{auth::jwt::util::sign_jwt, memes::service::tests as fakes, users::models::user::User};

    fn envy(storage: &str) -> Envy {
        Envy {
            app_env: "test".to_string(),
            port: None,
            database_url: "postgres://localhost/meme_warriors_test".to_string(),
            jwt_secret: "secret".to_string(),
            openai_api_key: "sk-test".to_string(),
            openai_text_model: None,
            openai_image_model: None,
            ai_timeout_secs: Some(5),
            asset_sink: None,
            meme_storage_path: Some(storage.to_string()),
            backblaze_key_id: None,
            backblaze_app_key: None,
            backblaze_bucket_id: None,
        }
    }

    fn state(storage: &str, meme_generator: MemeGenerator) -> AppState {
        let envy = envy(storage);

        AppState {
            pool: PgPoolOptions::new()
                .connect_lazy(&envy.database_url)
                .unwrap(),
            envy: Arc::new(envy),
            meme_generator,
        }
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_bytes(res: axum::response::Response) -> Bytes {
        hyper::body::to_bytes(res.into_body()).await.unwrap()
    }

    async fn body_json(res: axum::response::Response) -> Value {
        serde_json::from_slice(&body_bytes(res).await).unwrap()
    }

    #[tokio::test]
    async fn root_reports_online() {
        let dir = tempfile::tempdir().unwrap();
        let generator = fakes::generator(None, vec![], None, AssetSink::PassThrough);
        let app = create_router(state(dir.path().to_str().unwrap(), generator));

        let res = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await["status"], "online");
    }

    #[tokio::test]
    async fn generate_test_returns_both_items() {
        let dir = tempfile::tempdir().unwrap();
        let generator = fakes::generator(None, vec![], None, AssetSink::PassThrough);
        let app = create_router(state(dir.path().to_str().unwrap(), generator));

        let res = app
            .oneshot(post_json(
                "/meme/generate_test",
                json!({ "prompt": "Hot dog, taco" }),
            ))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["items"][0]["prompt"], "Hot dog");
        assert_eq!(body["items"][1]["prompt"], "taco");
        assert_eq!(body["items"][0]["name"], "Captain Crunch");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn generate_test_rejects_short_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let generator = fakes::generator(None, vec![], None, AssetSink::PassThrough);
        let app = create_router(state(dir.path().to_str().unwrap(), generator));

        let res = app
            .oneshot(post_json("/meme/generate_test", json!({ "prompt": "cat" })))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn generate_test_surfaces_total_failure() {
        let dir = tempfile::tempdir().unwrap();
        let generator = fakes::generator(None, vec!["Hot dog"], None, AssetSink::PassThrough);
        let app = create_router(state(dir.path().to_str().unwrap(), generator));

        let res = app
            .oneshot(post_json("/meme/generate_test", json!({ "prompt": "Hot dog" })))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let message = body_json(res).await["message"].as_str().unwrap().to_string();
        assert!(message.starts_with("Failed to generate any images."));
    }

    #[tokio::test]
    async fn locally_stored_image_is_served_back() {
        let dir = tempfile::tempdir().unwrap();
        let fetched = fakes::png_fixture(300, 200);
        let generator = fakes::generator(
            None,
            vec![],
            Some(fetched.clone()),
            AssetSink::Local(LocalStorage::new(dir.path())),
        );
        let app = create_router(state(dir.path().to_str().unwrap(), generator));

        let res = app
            .clone()
            .oneshot(post_json("/meme/generate_test", json!({ "prompt": "Hot dog" })))
            .await
            .unwrap();
        let body = body_json(res).await;
        let image_url = body["items"][0]["image_url"].as_str().unwrap().to_string();
        let coin_icon_url = body["items"][0]["coin_icon_url"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(image_url.starts_with("/images/"));

        let res = app
            .clone()
            .oneshot(Request::get(image_url.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_bytes(res).await, fetched);

        let res = app
            .oneshot(Request::get(coin_icon_url.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let coin = image::load_from_memory(&body_bytes(res).await).unwrap();
        assert_eq!((coin.width(), coin.height()), (256, 256));
    }

    #[tokio::test]
    async fn generate_requires_valid_token() {
        let dir = tempfile::tempdir().unwrap();
        let generator = fakes::generator(None, vec![], None, AssetSink::PassThrough);
        let app = create_router(state(dir.path().to_str().unwrap(), generator));

        let token = sign_jwt(&User::new("0xabc"), "not-the-secret").unwrap();
        let mut req = post_json("/meme/generate", json!({ "prompt": "Hot dog, taco" }));
        req.headers_mut().insert(
            AUTHORIZATION,
            ["Bearer ", &token].concat().parse().unwrap(),
        );

        let res = app.oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(res).await["message"], "Invalid token.");
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized_json() {
        let dir = tempfile::tempdir().unwrap();
        let generator = fakes::generator(None, vec![], None, AssetSink::PassThrough);
        let app = create_router(state(dir.path().to_str().unwrap(), generator));

        let res = app
            .oneshot(post_json("/meme/generate", json!({ "prompt": "Hot dog, taco" })))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(res).await;
        assert_eq!(body["code"], 401);
        assert_eq!(body["message"], "Missing or invalid authorization header.");
    }
}
