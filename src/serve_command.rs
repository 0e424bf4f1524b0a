use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use log::{debug, info, warn};

use crate::config::BackendConfig;
use crate::notifier::SlackNotifier;
use crate::pipeline::TodayPipeline;
use crate::slash_command::SlashCommand;

/// slash commandを受け付けた直後に返す文言。
pub const ACKNOWLEDGEMENT: &str = "Fetching your activity...";

/// slash commandを受け付けるサーバーを起動するサブコマンド。
#[derive(Debug, clap::Args)]
pub struct ServeArgs {
    #[clap(long, default_value = "0.0.0.0", help = "Address to listen on")]
    host: String,

    #[clap(
        short = 'p',
        long,
        env = "PORT",
        default_value = "8080",
        help = "Port to listen on"
    )]
    port: u16,

    #[clap(flatten)]
    backend: BackendConfig,
}

/// ハンドラー間で共有する状態。
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<TodayPipeline>,
}

impl AppState {
    /// 新しい`AppState`を返す。
    pub fn new(pipeline: TodayPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

/// `serve`サブコマンドの処理を行う。
///
/// Ctrl-Cを受け取るまでリクエストを処理する。
pub async fn serve_command(args: ServeArgs) -> Result<()> {
    let client = args.backend.http_client()?;
    let notifier = Arc::new(SlackNotifier::new(client.clone()));
    let pipeline = TodayPipeline::from_config(&args.backend, client, notifier);

    let address = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on {}...", address);

    axum::serve(listener, router(AppState::new(pipeline)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    info!("Server stopped.");

    Ok(())
}

/// ルーティングを作成する。
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/slack/today", post(today))
        .with_state(state)
}

async fn root() -> &'static str {
    "hi ^-^"
}

/// `today`コマンドを受け付ける。
///
/// 集計は別タスクで行い、すぐにレスポンスを返す。
async fn today(
    State(state): State<AppState>,
    form: Result<Form<SlashCommand>, FormRejection>,
) -> Response {
    let Form(command) = match form {
        Ok(form) => form,
        Err(rejection) => {
            warn!("Failed to parse form: {}", rejection);
            return (StatusCode::BAD_REQUEST, "Failed to parse form").into_response();
        }
    };
    info!(
        "Received {} from {} ({})",
        command.command, command.user_name, command.user_id
    );
    debug!(
        "command text {:?} in #{} of {}",
        command.text, command.channel_name, command.team_domain
    );

    state.pipeline.spawn(command);

    (StatusCode::OK, ACKNOWLEDGEMENT).into_response()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header::CONTENT_TYPE, Request, StatusCode},
    };
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    use super::{router, AppState, ACKNOWLEDGEMENT};
    use crate::airtable::MockRecordStore;
    use crate::hackatime::MockTimeSource;
    use crate::notifier::MockNotifier;
    use crate::pipeline::TodayPipeline;
    use crate::report::ReportRenderer;

    /// ユーザーが見つからないpipelineを作成し、通知内容をチャネルに流す。
    fn state() -> (AppState, mpsc::UnboundedReceiver<(String, String)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut store = MockRecordStore::new();
        store
            .expect_find_user_by_external_id()
            .returning(|_| Ok(None));
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().returning(move |url, text| {
            let _ = tx.send((url.to_string(), text.to_string()));
        });
        let pipeline = TodayPipeline::new(
            Arc::new(store),
            Arc::new(MockTimeSource::new()),
            Arc::new(notifier),
            ReportRenderer::default(),
        );

        (AppState::new(pipeline), rx)
    }

    async fn body_string(body: Body) -> String {
        let bytes = to_bytes(body, usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_root() {
        let (state, _rx) = state();

        let response = router(state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response.into_body()).await, "hi ^-^");
    }

    /// すぐに受付の文言を返し、結果は別タスクから通知される。
    #[tokio::test]
    async fn test_today() {
        let (state, mut rx) = state();
        let body = "token=t&team_id=T1&user_id=U123&user_name=shiba&command=%2Ftoday&text=\
                    &response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2FT1%2F123";

        let response = router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/slack/today")
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response.into_body()).await, ACKNOWLEDGEMENT);
        let (url, text) = rx.recv().await.unwrap();
        assert_eq!(url, "https://hooks.slack.com/commands/T1/123");
        assert_eq!(text, "User not found in Airtable");
    }

    /// フォームとして解釈できない場合は400を返し、集計は行わない。
    #[tokio::test]
    async fn test_today_bad_form() {
        let (state, mut rx) = state();

        let response = router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/slack/today")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"user_id":"U123"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response.into_body()).await, "Failed to parse form");
        assert!(rx.try_recv().is_err());
    }
}
