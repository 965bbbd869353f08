use crate::api::ApiClient;
use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::controller::{PlaybackController, PlayerCommand};
use crate::models::{Country, SearchPage, Station};
use crate::player::{PlaybackPhase, PlaybackState};
use crate::query::{ActiveFilter, FilterState, RawFilter};
use crate::radio_browser::RadioBrowserClient;
use crate::sessions::{session_cookie, session_from_cookie_header, SessionStore};
use crate::ui::{self, Chrome, ListingView, Nav, StationView, PLACEHOLDER_LOGO};
use anyhow::{Context, Result};
use axum::extract::{Path, RawQuery, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

const SITE_CSS: &str = include_str!("../assets/site.css");
const PLACEHOLDER_SVG: &str = include_str!("../assets/placeholder-radio.svg");

const PUBLIC_LISTING_CACHE: &str = "public, s-maxage=60, stale-while-revalidate=120";
const SESSION_CACHE: &str = "private, no-store";

const LISTING_ERROR: &str = "No se pudieron cargar las estaciones. Intente más tarde.";
const GENRES_ERROR: &str = "No se pudieron cargar los géneros. Intente más tarde.";

#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    api: ApiClient,
    radio_browser: RadioBrowserClient,
    catalog: Arc<Catalog>,
    player: PlaybackController,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let timeout = config.request_timeout();
        let api = ApiClient::new(&config.api_base_url, timeout)?;
        let radio_browser = RadioBrowserClient::new(&config.radio_browser_url, timeout)?;
        let catalog = Arc::new(Catalog::new(api.clone(), config.catalog_ttl()));
        let sessions = Arc::new(SessionStore::new(config.session_idle()));
        let player = PlaybackController::new(sessions, api.clone(), radio_browser.clone());
        Ok(Self {
            config: Arc::new(config),
            api,
            radio_browser,
            catalog,
            player,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(listing))
        .route("/generos", get(genres))
        .route("/radio/{uuid}", get(station))
        .route("/player/play", post(play))
        .route("/player/pause", post(pause))
        .route("/player/toggle", post(toggle))
        .route("/player/estado", get(player_status))
        .route("/assets/site.css", get(site_css))
        .route("/images/placeholder-radio.svg", get(placeholder_logo))
        .fallback(not_found)
        .with_state(state)
}

pub async fn serve(state: AppState) -> Result<()> {
    let addr = state.config.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, api = %state.config.api_base_url, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(session_from_cookie_header)
        .map(str::to_string)
}

/// Per-request data shared by every HTML page.
struct PageContext {
    countries: Option<Vec<Country>>,
    player: PlaybackState,
    has_session: bool,
    here: String,
}

impl PageContext {
    async fn load(state: &AppState, headers: &HeaderMap, uri: &Uri) -> Self {
        let session = session_id(headers);
        let (countries, player) = tokio::join!(
            state.catalog.countries(),
            state.player.state(session.as_deref())
        );
        Self {
            countries: countries.ok(),
            player,
            has_session: session.is_some(),
            here: uri
                .path_and_query()
                .map(|p| p.as_str().to_string())
                .unwrap_or_else(|| "/".to_string()),
        }
    }

    fn chrome<'a>(&'a self, config: &'a AppConfig, nav: Nav<'a>, search: &'a str) -> Chrome<'a> {
        Chrome {
            config,
            countries: self.countries.as_deref(),
            nav,
            player: &self.player,
            search,
            here: &self.here,
        }
    }
}

async fn listing(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let filter = FilterState::from_raw(RawFilter::from_query(query.as_deref().unwrap_or("")));
    let (ctx, result) = tokio::join!(
        PageContext::load(&state, &headers, &uri),
        state.api.search(&filter)
    );
    let (page, error) = match result {
        Ok(page) => (page, None),
        Err(e) => {
            warn!(error = %format!("{e:#}"), "station search failed");
            (SearchPage::default(), Some(LISTING_ERROR))
        }
    };

    let country_name = match filter.active() {
        ActiveFilter::Country(_) => page.stations.first().map(|s| s.country.as_str()),
        _ => None,
    };
    let title = filter.title(country_name);
    let chrome = ctx.chrome(
        &state.config,
        Nav::from(filter.active()),
        filter.query.as_deref().unwrap_or(""),
    );
    let html = ui::listing_page(
        &chrome,
        &ListingView {
            filter: &filter,
            title: &title,
            page: &page,
            error,
        },
    );
    let cache = if ctx.has_session {
        SESSION_CACHE
    } else {
        PUBLIC_LISTING_CACHE
    };
    ([(CACHE_CONTROL, cache)], Html(html)).into_response()
}

async fn genres(State(state): State<AppState>, headers: HeaderMap, uri: Uri) -> Response {
    let (ctx, result) = tokio::join!(
        PageContext::load(&state, &headers, &uri),
        state.catalog.genres()
    );
    let (genres, error) = match result {
        Ok(g) => (g, None),
        Err(_) => (vec![], Some(GENRES_ERROR)),
    };
    let chrome = ctx.chrome(&state.config, Nav::Genres, "");
    Html(ui::genres_page(&chrome, &genres, error)).into_response()
}

async fn station(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let (ctx, result) = tokio::join!(
        PageContext::load(&state, &headers, &uri),
        state.api.station(&uuid)
    );
    let station = match result {
        Ok(Some(station)) => station,
        Ok(None) => return not_found_response(&state, &ctx),
        Err(e) => {
            warn!(stationuuid = %uuid, error = %format!("{e:#}"), "station fetch failed");
            return not_found_response(&state, &ctx);
        }
    };

    let (logo, recommended) = tokio::join!(
        resolve_logo(&state, &station),
        state.api.recommended(&station)
    );
    let recommended = recommended.unwrap_or_else(|e| {
        warn!(stationuuid = %station.uuid, error = %format!("{e:#}"), "recommended fetch failed");
        vec![]
    });

    let chrome = ctx.chrome(&state.config, Nav::None, "");
    Html(ui::station_page(
        &chrome,
        &StationView {
            station: &station,
            logo: &logo,
            recommended: &recommended,
        },
    ))
    .into_response()
}

/// Station logo, else the Radio Browser favicon, else the placeholder.
async fn resolve_logo(state: &AppState, station: &Station) -> String {
    if let Some(logo) = station.logo() {
        return logo.to_string();
    }
    match state.radio_browser.favicon(&station.uuid).await {
        Ok(Some(favicon)) => favicon,
        Ok(None) => PLACEHOLDER_LOGO.to_string(),
        Err(e) => {
            warn!(stationuuid = %station.uuid, error = %format!("{e:#}"), "favicon lookup failed");
            PLACEHOLDER_LOGO.to_string()
        }
    }
}

async fn not_found(State(state): State<AppState>, headers: HeaderMap, uri: Uri) -> Response {
    let ctx = PageContext::load(&state, &headers, &uri).await;
    not_found_response(&state, &ctx)
}

fn not_found_response(state: &AppState, ctx: &PageContext) -> Response {
    let chrome = ctx.chrome(&state.config, Nav::None, "");
    (StatusCode::NOT_FOUND, Html(ui::not_found_page(&chrome))).into_response()
}

#[derive(Debug, Default, Deserialize)]
struct PlayerForm {
    #[serde(default)]
    uuid: Option<String>,
    #[serde(default)]
    volver: Option<String>,
}

impl PlayerForm {
    fn uuid(&self) -> Option<String> {
        self.uuid
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
    }

    /// Local path to go back to. Anything that could leave the site is `/`.
    fn return_path(&self) -> &str {
        match self.volver.as_deref() {
            Some(p)
                if p.starts_with('/')
                    && !p.starts_with("//")
                    && !p.contains('\\')
                    && !p.chars().any(char::is_control) =>
            {
                p
            }
            _ => "/",
        }
    }
}

async fn play(State(state): State<AppState>, headers: HeaderMap, Form(form): Form<PlayerForm>) -> Response {
    match form.uuid() {
        Some(uuid) => player_action(&state, &headers, &form, PlayerCommand::Play(uuid)).await,
        None => Redirect::to(form.return_path()).into_response(),
    }
}

async fn pause(State(state): State<AppState>, headers: HeaderMap, Form(form): Form<PlayerForm>) -> Response {
    player_action(&state, &headers, &form, PlayerCommand::Pause).await
}

async fn toggle(State(state): State<AppState>, headers: HeaderMap, Form(form): Form<PlayerForm>) -> Response {
    match form.uuid() {
        Some(uuid) => player_action(&state, &headers, &form, PlayerCommand::Toggle(uuid)).await,
        None => Redirect::to(form.return_path()).into_response(),
    }
}

async fn player_action(state: &AppState, headers: &HeaderMap, form: &PlayerForm, cmd: PlayerCommand) -> Response {
    let session = session_id(headers);
    let id = state.player.handle(session.as_deref(), cmd).await;
    (
        [(SET_COOKIE, session_cookie(&id))],
        Redirect::to(form.return_path()),
    )
        .into_response()
}

#[derive(Debug, Serialize)]
struct PlayerStatus<'a> {
    phase: PlaybackPhase,
    playing: bool,
    station: Option<&'a Station>,
    stream_url: Option<&'a str>,
    error: Option<&'a str>,
}

async fn player_status(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = session_id(&headers);
    let st = state.player.state(session.as_deref()).await;
    let status = PlayerStatus {
        phase: st.phase(),
        playing: st.is_playing(),
        station: st.current_station(),
        stream_url: st.current().map(|np| np.stream_url.as_str()),
        error: st.error(),
    };
    ([(CACHE_CONTROL, SESSION_CACHE)], Json(status)).into_response()
}

async fn site_css() -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/css; charset=utf-8"), (CACHE_CONTROL, "public, max-age=86400")],
        SITE_CSS,
    )
}

async fn placeholder_logo() -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "image/svg+xml"), (CACHE_CONTROL, "public, max-age=86400")],
        PLACEHOLDER_SVG,
    )
}
