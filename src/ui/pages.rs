use super::cards::{pagination, station_grid};
use super::layout::{page, player_inputs, Chrome, PageMeta};
use super::{attr, excerpt_chars, genre_href, text};
use crate::models::{Genre, SearchPage, Station};
use crate::pagination::paginate;
use crate::query::FilterState;
use std::fmt::Write;

pub struct ListingView<'a> {
    pub filter: &'a FilterState,
    pub title: &'a str,
    pub page: &'a SearchPage,
    pub error: Option<&'a str>,
}

pub fn listing_page(chrome: &Chrome<'_>, view: &ListingView<'_>) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h2 id=\"page-title\">{}</h2>", text(view.title));
    body.push_str("<div id=\"page-container\">\n");
    let stations = &view.page.stations;
    if let Some(err) = view.error {
        let _ = writeln!(body, "<div class=\"no-stations-message error\"><p>{}</p></div>", text(err));
    } else if stations.is_empty() {
        body.push_str(
            "<div class=\"no-stations-message\"><p>No se encontraron estaciones para esta selección.</p></div>\n",
        );
    } else {
        let total = view.page.total_stations;
        let _ = writeln!(
            body,
            "<p id=\"radio-count-info\">Mostrando {} de {total} {} en total.</p>",
            stations.len(),
            if total == 1 { "radio" } else { "radios" }
        );
        station_grid(&mut body, stations, chrome.player, chrome.here, false);
    }
    body.push_str("</div>\n");

    if let Some(p) = paginate(view.filter, view.page.current_page, view.page.total_pages) {
        pagination(&mut body, &p);
    }

    let meta = PageMeta {
        title: view.title.to_string(),
        description: format!(
            "Escucha {} en vivo. Las mejores estaciones de radio de Latinoamérica en un solo lugar.",
            view.title
        ),
        canonical: None,
        image: None,
    };
    page(chrome, &meta, &body)
}

pub fn genres_page(chrome: &Chrome<'_>, genres: &[Genre], error: Option<&str>) -> String {
    let mut body = String::from("<h2 id=\"page-title\">Buscar por Género</h2>\n");
    if let Some(err) = error {
        let _ = writeln!(body, "<div class=\"no-stations-message error\"><p>{}</p></div>", text(err));
    } else if !genres.is_empty() {
        body.push_str("<div class=\"tags-container\">\n");
        for g in genres {
            let _ = writeln!(
                body,
                "<a href=\"{}\" class=\"tag-btn\">{} <span>{}</span></a>",
                attr(&genre_href(&g.name)),
                text(&g.name),
                g.stationcount
            );
        }
        body.push_str("</div>\n");
    }
    let meta = PageMeta {
        title: "Buscar por Género".to_string(),
        description: "Encuentra radios de Latinoamérica por género. Cumbia, Rock, Pop, Reggaetón, Folklore y más."
            .to_string(),
        canonical: Some(chrome.config.absolute("/generos")),
        image: None,
    };
    page(chrome, &meta, &body)
}

pub struct StationView<'a> {
    pub station: &'a Station,
    /// Logo after fallback resolution; a local path or an absolute URL.
    pub logo: &'a str,
    pub recommended: &'a [Station],
}

pub fn station_page(chrome: &Chrome<'_>, view: &StationView<'_>) -> String {
    let st = view.station;
    let playing = chrome.player.is_station_playing(&st.uuid);
    let mut body = String::from("<div class=\"station-info-page\">\n<div class=\"station-info-header\">\n");
    let _ = writeln!(
        body,
        "<img src=\"{}\" alt=\"{}\" class=\"station-logo\">",
        attr(view.logo),
        attr(&st.name)
    );
    let _ = write!(
        body,
        "<div class=\"station-info-header-text\"><h1>{}</h1><p>{}</p>",
        text(&st.name),
        text(&st.country)
    );
    body.push_str("<form method=\"post\" action=\"/player/toggle\">");
    player_inputs(&mut body, &st.uuid, chrome.here);
    let label = if playing { "Pausar" } else { "Escuchar Ahora" };
    let _ = writeln!(
        body,
        "<button type=\"submit\" class=\"btn-play primary-play-btn{}\" aria-label=\"{label}\"><span>{label}</span></button></form></div>\n</div>",
        if playing { " is-playing" } else { "" }
    );

    body.push_str("<div class=\"station-info-body\"><div class=\"station-info-details\">\n");
    body.push_str("<h3>Detalles de la Estación</h3>\n");
    let _ = writeln!(
        body,
        "<ul><li><strong>País:</strong> {}</li><li><strong>Popularidad:</strong> {} votos</li></ul>",
        text(&st.country),
        st.votes
    );

    let paragraphs = st.paragraphs();
    if !paragraphs.is_empty() {
        let _ = writeln!(body, "<h3>Sobre {}</h3>", text(&st.name));
        body.push_str("<div class=\"station-info-description\">");
        for p in paragraphs {
            let _ = write!(body, "<p>{}</p>", text(p));
        }
        body.push_str("</div>\n");
    }

    body.push_str("<h3>Géneros</h3>\n<div class=\"station-info-tags\">");
    let genres = st.genre_list();
    if genres.is_empty() {
        body.push_str("<p class=\"muted\">No hay géneros específicos.</p>");
    }
    for g in genres {
        let _ = write!(
            body,
            "<a href=\"{}\" class=\"tag-btn\">{}</a>",
            attr(&genre_href(g)),
            text(g)
        );
    }
    body.push_str("</div>\n</div></div>\n</div>\n");

    if !view.recommended.is_empty() {
        let _ = writeln!(
            body,
            "<section id=\"recommended-section\"><h2 id=\"page-title\">Radios Recomendadas de {}</h2>",
            text(&st.country)
        );
        station_grid(&mut body, view.recommended, chrome.player, chrome.here, true);
        body.push_str("</section>\n");
    }

    let description = if st.description.trim().is_empty() {
        format!(
            "Escucha {} ({}) en vivo. La mejor radio online en {}.",
            st.name, st.country, chrome.config.site_name
        )
    } else {
        excerpt_chars(st.description.trim(), 155)
    };
    let image = if view.logo.starts_with("http") {
        view.logo.to_string()
    } else {
        chrome.config.absolute(view.logo)
    };
    let meta = PageMeta {
        title: format!("{} - {}", st.name, st.country),
        description,
        canonical: Some(chrome.config.absolute(&super::station_href(&st.uuid))),
        image: Some(image),
    };
    page(chrome, &meta, &body)
}

pub fn not_found_page(chrome: &Chrome<'_>) -> String {
    let body = "<h2 id=\"page-title\">Página no encontrada</h2>\n\
                <div class=\"no-stations-message\"><p>La página que buscas no existe. \
                <a href=\"/\">Volver al inicio</a></p></div>\n";
    let meta = PageMeta {
        title: "Página no encontrada".to_string(),
        description: "La página que buscas no existe.".to_string(),
        canonical: None,
        image: None,
    };
    page(chrome, &meta, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::station;
    use crate::player::PlaybackState;
    use crate::ui::Nav;

    fn chrome<'a>(config: &'a AppConfig, player: &'a PlaybackState) -> Chrome<'a> {
        Chrome {
            config,
            countries: Some(&[][..]),
            nav: Nav::Popular,
            player,
            search: "",
            here: "/",
        }
    }

    #[test]
    fn listing_shows_count_and_pagination() {
        let cfg = AppConfig::default();
        let player = PlaybackState::default();
        let filter = FilterState::default();
        let page = SearchPage {
            stations: vec![station("a", "A"), station("b", "B")],
            total_stations: 41,
            total_pages: 3,
            current_page: 1,
        };
        let html = listing_page(
            &chrome(&cfg, &player),
            &ListingView { filter: &filter, title: "Radios Populares", page: &page, error: None },
        );
        assert!(html.contains("Mostrando 2 de 41 radios en total."));
        assert!(html.contains("pagination-container"));
        assert!(html.contains("<h2 id=\"page-title\">Radios Populares</h2>"));
    }

    #[test]
    fn listing_error_replaces_results() {
        let cfg = AppConfig::default();
        let player = PlaybackState::default();
        let filter = FilterState::default();
        let page = SearchPage::default();
        let html = listing_page(
            &chrome(&cfg, &player),
            &ListingView { filter: &filter, title: "Radios Populares", page: &page, error: Some("falló") },
        );
        assert!(html.contains("falló"));
        assert!(!html.contains("No se encontraron"));
        assert!(!html.contains("pagination-container"));
    }

    #[test]
    fn singular_count() {
        let cfg = AppConfig::default();
        let player = PlaybackState::default();
        let filter = FilterState::default();
        let page = SearchPage {
            stations: vec![station("a", "A")],
            total_stations: 1,
            ..SearchPage::default()
        };
        let html = listing_page(
            &chrome(&cfg, &player),
            &ListingView { filter: &filter, title: "t", page: &page, error: None },
        );
        assert!(html.contains("Mostrando 1 de 1 radio en total."));
    }

    #[test]
    fn station_page_renders_description_and_genres() {
        let cfg = AppConfig::default();
        let player = PlaybackState::default();
        let mut st = station("u1", "Radio Uno");
        st.genres = "rock, pop".to_string();
        st.description = "Primera.\n\nSegunda <b>.".to_string();
        let rec = vec![station("u2", "Dos")];
        let html = station_page(
            &chrome(&cfg, &player),
            &StationView { station: &st, logo: "/images/placeholder-radio.svg", recommended: &rec },
        );
        assert!(html.contains("<p>Primera.</p><p>Segunda &lt;b&gt;.</p>"));
        assert!(html.contains("<a href=\"/?genero=rock\" class=\"tag-btn\">rock</a>"));
        assert!(html.contains("Radios Recomendadas de Argentina"));
        assert!(html.contains("<meta name=\"description\" content=\"Primera.\n\nSegunda &lt;b&gt;....\">"));
        assert!(html.contains("<link rel=\"canonical\" href=\"https://turadio.lat/radio/u1\">"));
        assert!(html.contains("content=\"https://turadio.lat/images/placeholder-radio.svg\""));
        assert!(html.contains("Escuchar Ahora"));
    }

    #[test]
    fn station_page_without_genres() {
        let cfg = AppConfig::default();
        let player = PlaybackState::default();
        let st = station("u1", "Radio Uno");
        let html = station_page(
            &chrome(&cfg, &player),
            &StationView { station: &st, logo: "https://img.example/u1.png", recommended: &[] },
        );
        assert!(html.contains("No hay géneros específicos."));
        assert!(!html.contains("recommended-section"));
        assert!(html.contains("Escucha Radio Uno (Argentina) en vivo."));
    }

    #[test]
    fn genres_link_to_listing() {
        let cfg = AppConfig::default();
        let player = PlaybackState::default();
        let genres = vec![Genre { name: "música latina".into(), stationcount: 7 }];
        let html = genres_page(&chrome(&cfg, &player), &genres, None);
        assert!(html.contains("href=\"/?genero=m%C3%BAsica%20latina\""));
        assert!(html.contains("<span>7</span>"));
    }
}
