use super::{attr, country_href, text, PLACEHOLDER_LOGO};
use crate::config::AppConfig;
use crate::models::Country;
use crate::player::{PlaybackPhase, PlaybackState};
use crate::query::ActiveFilter;
use std::fmt::Write;

/// Highlighted navigation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav<'a> {
    Popular,
    Genres,
    Country(&'a str),
    None,
}

impl<'a> From<ActiveFilter<'a>> for Nav<'a> {
    fn from(f: ActiveFilter<'a>) -> Self {
        match f {
            ActiveFilter::Search(_) => Nav::None,
            ActiveFilter::Country(code) => Nav::Country(code),
            ActiveFilter::Genre(_) => Nav::Genres,
            ActiveFilter::Popular => Nav::Popular,
        }
    }
}

pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub canonical: Option<String>,
    pub image: Option<String>,
}

/// Everything around the page body: header, search box and player bar.
pub struct Chrome<'a> {
    pub config: &'a AppConfig,
    /// `None` when the country list could not be loaded.
    pub countries: Option<&'a [Country]>,
    pub nav: Nav<'a>,
    pub player: &'a PlaybackState,
    pub search: &'a str,
    /// Local path the player forms return to.
    pub here: &'a str,
}

pub fn page(chrome: &Chrome<'_>, meta: &PageMeta, body: &str) -> String {
    let site = &chrome.config.site_name;
    let mut out = String::with_capacity(body.len() + 4096);
    out.push_str("<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n");
    out.push_str("<meta charset=\"UTF-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    let _ = writeln!(out, "<title>{} - {}</title>", text(&meta.title), text(site));
    let _ = writeln!(out, "<meta name=\"description\" content=\"{}\">", attr(&meta.description));
    let _ = writeln!(out, "<meta property=\"og:title\" content=\"{} - {}\">", attr(&meta.title), attr(site));
    let _ = writeln!(out, "<meta property=\"og:description\" content=\"{}\">", attr(&meta.description));
    if let Some(canonical) = &meta.canonical {
        let _ = writeln!(out, "<link rel=\"canonical\" href=\"{}\">", attr(canonical));
        let _ = writeln!(out, "<meta property=\"og:url\" content=\"{}\">", attr(canonical));
    }
    if let Some(image) = &meta.image {
        let _ = writeln!(out, "<meta property=\"og:image\" content=\"{}\">", attr(image));
    }
    out.push_str("<link rel=\"stylesheet\" href=\"/assets/site.css\">\n</head>\n<body>\n");

    header(&mut out, chrome);
    out.push_str("<main class=\"container\">\n<div class=\"main-content\">\n");
    search_form(&mut out, chrome.search);
    out.push_str(body);
    out.push_str("</div>\n</main>\n");
    player_bar(&mut out, chrome);
    out.push_str("</body>\n</html>\n");
    out
}

fn nav_class(active: bool) -> &'static str {
    if active {
        "nav-link active"
    } else {
        "nav-link"
    }
}

fn header(out: &mut String, chrome: &Chrome<'_>) {
    out.push_str("<header class=\"main-header\">\n<nav class=\"container\">\n");
    let _ = writeln!(out, "<a href=\"/\" class=\"logo\">{}</a>", text(&chrome.config.site_name));
    out.push_str("<ul class=\"nav-links\">\n");
    let _ = writeln!(
        out,
        "<li><a href=\"/\" class=\"{}\">Populares</a></li>",
        nav_class(chrome.nav == Nav::Popular)
    );
    let _ = writeln!(
        out,
        "<li><a href=\"/generos\" class=\"{}\">Géneros</a></li>",
        nav_class(chrome.nav == Nav::Genres)
    );
    out.push_str("<li class=\"dropdown\"><span class=\"nav-link\">Países</span>\n<ul class=\"dropdown-menu\">\n");
    match chrome.countries {
        Some(countries) => {
            for c in countries {
                let _ = writeln!(
                    out,
                    "<li><a href=\"{}\" class=\"{}\">{}</a></li>",
                    attr(&country_href(&c.code)),
                    nav_class(chrome.nav == Nav::Country(&c.code)),
                    text(&c.name)
                );
            }
        }
        None => out.push_str("<li><span class=\"nav-link disabled\">Error al cargar</span></li>\n"),
    }
    out.push_str("</ul>\n</li>\n</ul>\n</nav>\n</header>\n");
}

fn search_form(out: &mut String, value: &str) {
    let _ = writeln!(
        out,
        "<form id=\"search-form\" class=\"search-form\" action=\"/\" method=\"get\">\
         <input type=\"text\" id=\"search-input\" name=\"query\" \
         placeholder=\"Buscar radios, países o géneros...\" value=\"{}\" required>\
         <input type=\"hidden\" name=\"pagina\" value=\"1\">\
         <button type=\"submit\" id=\"search-button\">Buscar</button>{}</form>",
        attr(value),
        if value.is_empty() {
            ""
        } else {
            "<a href=\"/\" id=\"clear-search-button\">&times;</a>"
        }
    );
}

/// Hidden inputs every player form carries.
pub(super) fn player_inputs(out: &mut String, uuid: &str, here: &str) {
    let _ = write!(
        out,
        "<input type=\"hidden\" name=\"uuid\" value=\"{}\"><input type=\"hidden\" name=\"volver\" value=\"{}\">",
        attr(uuid),
        attr(here)
    );
}

fn player_bar(out: &mut String, chrome: &Chrome<'_>) {
    let player = chrome.player;
    let phase = player.phase();
    let class = match phase {
        PlaybackPhase::Stopped => "stopped",
        PlaybackPhase::Paused => "paused",
        PlaybackPhase::Playing => "playing",
    };
    let flag = if player.error().is_some() { " has-error" } else { "" };
    let _ = writeln!(out, "<div id=\"player-bar\" class=\"player-bar {class}{flag}\">");
    if let Some(np) = player.current() {
        let st = &np.station;
        let _ = writeln!(
            out,
            "<img src=\"{}\" alt=\"{}\" class=\"player-logo\">\
             <div class=\"player-info\"><strong>{}</strong><span>{}</span></div>",
            attr(st.logo().unwrap_or(PLACEHOLDER_LOGO)),
            attr(&st.name),
            text(&st.name),
            text(&st.country)
        );
        let autoplay = if phase == PlaybackPhase::Playing { " autoplay" } else { "" };
        let _ = writeln!(
            out,
            "<audio id=\"player-audio\" src=\"{}\" preload=\"none\"{autoplay}></audio>",
            attr(&np.stream_url)
        );
        let (label, icon) = if phase == PlaybackPhase::Playing {
            ("Pausar", "&#10074;&#10074;")
        } else {
            ("Reproducir", "&#9654;")
        };
        out.push_str("<form method=\"post\" action=\"/player/toggle\">");
        player_inputs(out, &st.uuid, chrome.here);
        let _ = writeln!(
            out,
            "<button type=\"submit\" class=\"btn-play\" aria-label=\"{label}\">{icon}</button></form>"
        );
    }
    if let Some(err) = player.error() {
        let _ = writeln!(out, "<p class=\"player-error\">{}</p>", text(err));
    }
    out.push_str("</div>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::station;
    use url::Url;

    fn chrome<'a>(config: &'a AppConfig, countries: Option<&'a [Country]>, player: &'a PlaybackState, nav: Nav<'a>) -> Chrome<'a> {
        Chrome {
            config,
            countries,
            nav,
            player,
            search: "",
            here: "/",
        }
    }

    fn meta() -> PageMeta {
        PageMeta {
            title: "Radios <Populares>".to_string(),
            description: "desc".to_string(),
            canonical: None,
            image: None,
        }
    }

    #[test]
    fn nav_follows_active_filter() {
        assert_eq!(Nav::from(ActiveFilter::Search("x")), Nav::None);
        assert_eq!(Nav::from(ActiveFilter::Country("AR")), Nav::Country("AR"));
        assert_eq!(Nav::from(ActiveFilter::Genre("rock")), Nav::Genres);
        assert_eq!(Nav::from(ActiveFilter::Popular), Nav::Popular);
    }

    #[test]
    fn highlights_selected_country() {
        let cfg = AppConfig::default();
        let countries = vec![
            Country { code: "AR".into(), name: "Argentina".into() },
            Country { code: "CL".into(), name: "Chile".into() },
        ];
        let player = PlaybackState::default();
        let html = page(&chrome(&cfg, Some(countries.as_slice()), &player, Nav::Country("CL")), &meta(), "");
        assert!(html.contains("<a href=\"/?pais=CL\" class=\"nav-link active\">Chile</a>"));
        assert!(html.contains("<a href=\"/?pais=AR\" class=\"nav-link\">Argentina</a>"));
        assert!(html.contains("<title>Radios &lt;Populares&gt; - TuRadio.lat</title>"));
    }

    #[test]
    fn shows_country_error_entry() {
        let cfg = AppConfig::default();
        let player = PlaybackState::default();
        let html = page(&chrome(&cfg, None, &player, Nav::Popular), &meta(), "");
        assert!(html.contains("Error al cargar"));
        assert!(!html.contains("<audio"));
    }

    #[test]
    fn player_bar_autoplays_only_while_playing() {
        let cfg = AppConfig::default();
        let mut player = PlaybackState::default();
        player.play_station(station("a", "Radio A"), Url::parse("https://a.example/live").unwrap());
        let html = page(&chrome(&cfg, Some(&[][..]), &player, Nav::Popular), &meta(), "");
        assert!(html.contains("src=\"https://a.example/live\" preload=\"none\" autoplay"));
        assert!(html.contains("aria-label=\"Pausar\""));

        player.pause_station();
        let html = page(&chrome(&cfg, Some(&[][..]), &player, Nav::Popular), &meta(), "");
        assert!(!html.contains("autoplay"));
        assert!(html.contains("Radio A"));
        assert!(html.contains("aria-label=\"Reproducir\""));
    }
}
