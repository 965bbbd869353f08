use crate::api::ApiClient;
use crate::models::Station;
use crate::player::{AudioCommand, PlaybackState};
use crate::radio_browser::{parse_stream_url, RadioBrowserClient};
use crate::sessions::SessionStore;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    Play(String),
    Pause,
    Toggle(String),
}

/// Applies listener actions to the session's playback state. Network work
/// (station lookup, stream resolution) happens outside the session lock;
/// the transition itself is applied in one step.
#[derive(Clone)]
pub struct PlaybackController {
    sessions: Arc<SessionStore>,
    api: ApiClient,
    radio_browser: RadioBrowserClient,
}

impl PlaybackController {
    pub fn new(sessions: Arc<SessionStore>, api: ApiClient, radio_browser: RadioBrowserClient) -> Self {
        Self {
            sessions,
            api,
            radio_browser,
        }
    }

    pub async fn state(&self, session: Option<&str>) -> PlaybackState {
        match session {
            Some(id) => self.sessions.snapshot(id).await.unwrap_or_default(),
            None => PlaybackState::default(),
        }
    }

    /// Returns the session id the command was applied to.
    pub async fn handle(&self, session: Option<&str>, cmd: PlayerCommand) -> String {
        let current = self.state(session).await;
        let (id, cmds) = match cmd {
            PlayerCommand::Pause => self.sessions.update(session, |st| st.pause_station()).await,
            PlayerCommand::Toggle(uuid) if current.is_station_playing(&uuid) => {
                self.sessions.update(session, |st| st.pause_station()).await
            }
            PlayerCommand::Play(uuid) | PlayerCommand::Toggle(uuid) => {
                self.play(session, &current, &uuid).await
            }
        };
        if !cmds.is_empty() {
            debug!(session = %id, ?cmds, "audio transport commands");
        }
        id
    }

    async fn play(
        &self,
        session: Option<&str>,
        current: &PlaybackState,
        uuid: &str,
    ) -> (String, Vec<AudioCommand>) {
        if let (Some(station), Some(url)) = (current.current_station(), current.stream_for(uuid)) {
            let station = station.clone();
            return self.sessions.update(session, |st| st.play_station(station, url)).await;
        }

        let station = match self.api.station(uuid).await {
            Ok(Some(station)) => station,
            Ok(None) => {
                warn!(stationuuid = %uuid, "play requested for unknown station");
                let (id, ()) = self
                    .sessions
                    .update(session, |st| st.report("La estación no existe."))
                    .await;
                return (id, vec![]);
            }
            Err(e) => {
                warn!(stationuuid = %uuid, error = %format!("{e:#}"), "station lookup failed");
                let (id, ()) = self
                    .sessions
                    .update(session, |st| {
                        st.report("No se pudo cargar la estación. Intente más tarde.")
                    })
                    .await;
                return (id, vec![]);
            }
        };

        match self.resolve_stream(&station).await {
            Ok(url) => {
                info!(stationuuid = %station.uuid, %url, "starting playback");
                self.sessions.update(session, |st| st.play_station(station, url)).await
            }
            Err(e) => {
                warn!(stationuuid = %station.uuid, error = %format!("{e:#}"), "stream resolution failed");
                let msg = format!("No se pudo reproducir {}.", station.name);
                self.sessions.update(session, |st| st.fail(station, msg)).await
            }
        }
    }

    async fn resolve_stream(&self, station: &Station) -> Result<Url> {
        if let Some(url) = station.stream_url() {
            match parse_stream_url(url) {
                Ok(url) => return Ok(url),
                Err(e) => debug!(stationuuid = %station.uuid, error = %e, "unusable stream field"),
            }
        }
        self.radio_browser
            .resolve_station_url(&station.uuid)
            .await
            .with_context(|| format!("No stream for station {}", station.uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn controller(server: &MockServer) -> PlaybackController {
        let api = ApiClient::new(&format!("{}/api", server.uri()), Duration::from_secs(5)).unwrap();
        let rb = RadioBrowserClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        PlaybackController::new(Arc::new(SessionStore::new(Duration::from_secs(60))), api, rb)
    }

    async fn mount_station(server: &MockServer, uuid: &str, body: serde_json::Value, times: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/api/radio/{uuid}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(times)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn toggle_plays_pauses_and_resumes_without_refetch() {
        let server = MockServer::start().await;
        mount_station(
            &server,
            "a",
            json!({"uuid": "a", "nombre": "A", "url_resolved": "https://a.example/live"}),
            1,
        )
        .await;
        let ctl = controller(&server).await;

        let id = ctl.handle(None, PlayerCommand::Toggle("a".into())).await;
        assert!(ctl.state(Some(&id)).await.is_station_playing("a"));

        ctl.handle(Some(&id), PlayerCommand::Toggle("a".into())).await;
        let st = ctl.state(Some(&id)).await;
        assert!(!st.is_station_playing("a"));
        assert_eq!(st.current_station().unwrap().uuid, "a");

        ctl.handle(Some(&id), PlayerCommand::Toggle("a".into())).await;
        assert!(ctl.state(Some(&id)).await.is_station_playing("a"));
    }

    #[tokio::test]
    async fn playing_b_stops_a() {
        let server = MockServer::start().await;
        mount_station(&server, "a", json!({"uuid": "a", "nombre": "A", "url": "http://a.example/"}), 1).await;
        mount_station(&server, "b", json!({"uuid": "b", "nombre": "B", "url": "http://b.example/"}), 1).await;
        let ctl = controller(&server).await;

        let id = ctl.handle(None, PlayerCommand::Play("a".into())).await;
        let same = ctl.handle(Some(&id), PlayerCommand::Play("b".into())).await;
        assert_eq!(id, same);
        let st = ctl.state(Some(&id)).await;
        assert!(st.is_station_playing("b"));
        assert!(!st.is_station_playing("a"));
    }

    #[tokio::test]
    async fn falls_back_to_radio_browser_stream() {
        let server = MockServer::start().await;
        mount_station(&server, "c", json!({"uuid": "c", "nombre": "C"}), 1).await;
        Mock::given(method("GET"))
            .and(path("/json/url/c"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"url": "https://c.example/live"})))
            .mount(&server)
            .await;
        let ctl = controller(&server).await;

        let id = ctl.handle(None, PlayerCommand::Play("c".into())).await;
        let st = ctl.state(Some(&id)).await;
        assert_eq!(st.current().unwrap().stream_url, "https://c.example/live");
    }

    #[tokio::test]
    async fn unresolvable_stream_is_reported() {
        let server = MockServer::start().await;
        mount_station(&server, "d", json!({"uuid": "d", "nombre": "D"}), 1).await;
        Mock::given(method("GET"))
            .and(path("/json/url/d"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let ctl = controller(&server).await;

        let id = ctl.handle(None, PlayerCommand::Play("d".into())).await;
        let st = ctl.state(Some(&id)).await;
        assert!(!st.is_playing());
        assert_eq!(st.error(), Some("No se pudo reproducir D."));
    }

    #[tokio::test]
    async fn unknown_station_sets_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/radio/zzz"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let ctl = controller(&server).await;

        let id = ctl.handle(None, PlayerCommand::Play("zzz".into())).await;
        let st = ctl.state(Some(&id)).await;
        assert!(st.current_station().is_none());
        assert_eq!(st.error(), Some("La estación no existe."));
    }

    #[tokio::test]
    async fn pause_without_session_is_harmless() {
        let server = MockServer::start().await;
        let ctl = controller(&server).await;
        let id = ctl.handle(None, PlayerCommand::Pause).await;
        assert!(!ctl.state(Some(&id)).await.is_playing());
    }
}
