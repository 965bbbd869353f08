use crate::models::Station;
use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackPhase {
    Stopped,
    Paused,
    Playing,
}

/// What the audio transport has to do after a transition, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCommand {
    /// Drop the current source before anything else is loaded.
    Teardown,
    Load { url: Url },
    SetPause(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub station: Station,
    pub stream_url: String,
}

/// Which station is selected and whether it is audible.
///
/// `playing` is only ever true while `current` is set, and the only way to
/// change either is through the transition methods below.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackState {
    current: Option<NowPlaying>,
    playing: bool,
    error: Option<String>,
}

impl PlaybackState {
    pub fn current(&self) -> Option<&NowPlaying> {
        self.current.as_ref()
    }

    pub fn current_station(&self) -> Option<&Station> {
        self.current.as_ref().map(|np| &np.station)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> PlaybackPhase {
        match (&self.current, self.playing) {
            (None, _) => PlaybackPhase::Stopped,
            (Some(_), false) => PlaybackPhase::Paused,
            (Some(_), true) => PlaybackPhase::Playing,
        }
    }

    pub fn is_station_playing(&self, uuid: &str) -> bool {
        self.playing && self.current_station().is_some_and(|s| s.uuid == uuid)
    }

    /// Stream already resolved for `uuid`, if it is the selected station.
    pub fn stream_for(&self, uuid: &str) -> Option<Url> {
        self.current
            .as_ref()
            .filter(|np| np.station.uuid == uuid)
            .and_then(|np| Url::parse(&np.stream_url).ok())
    }

    pub fn play_station(&mut self, station: Station, stream_url: Url) -> Vec<AudioCommand> {
        self.error = None;
        let mut cmds = Vec::new();
        match &self.current {
            Some(np) if np.station.uuid == station.uuid && np.stream_url == stream_url.as_str() => {
                if !self.playing {
                    cmds.push(AudioCommand::SetPause(false));
                }
            }
            Some(_) => {
                cmds.push(AudioCommand::Teardown);
                cmds.push(AudioCommand::Load { url: stream_url.clone() });
            }
            None => cmds.push(AudioCommand::Load { url: stream_url.clone() }),
        }
        self.current = Some(NowPlaying {
            station,
            stream_url: stream_url.into(),
        });
        self.playing = true;
        cmds
    }

    pub fn pause_station(&mut self) -> Vec<AudioCommand> {
        if !self.playing {
            return vec![];
        }
        self.playing = false;
        vec![AudioCommand::SetPause(true)]
    }

    /// The transport could not start `station`. Whatever was playing is
    /// silenced; the station stays selected so the listener can retry.
    pub fn fail(&mut self, station: Station, message: impl Into<String>) -> Vec<AudioCommand> {
        let mut cmds = Vec::new();
        let same = self.current_station().is_some_and(|s| s.uuid == station.uuid);
        if self.current.is_some() {
            cmds.push(AudioCommand::Teardown);
        }
        if !same {
            self.current = None;
        }
        self.playing = false;
        self.error = Some(message.into());
        cmds
    }

    /// Failure that is not tied to a station, e.g. an unknown UUID.
    pub fn report(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}
