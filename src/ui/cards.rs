use super::layout::player_inputs;
use super::{attr, station_href, text, PLACEHOLDER_LOGO};
use crate::models::Station;
use crate::pagination::Pagination;
use crate::player::PlaybackState;
use std::fmt::Write;

pub(super) fn station_card(out: &mut String, st: &Station, player: &PlaybackState, here: &str, small: bool) {
    let playing = player.is_station_playing(&st.uuid);
    let mut class = String::from("station-card");
    if small {
        class.push_str(" small-card");
    }
    if playing {
        class.push_str(" is-playing");
    }
    let href = station_href(&st.uuid);
    let _ = write!(
        out,
        "<div class=\"{class}\">\
         <a href=\"{}\" class=\"station-info-link\">\
         <img src=\"{}\" alt=\"{}\" class=\"station-logo\" \
         onerror=\"this.onerror=null;this.src='{PLACEHOLDER_LOGO}'\">\
         <h3 class=\"station-name\" title=\"{}\">{}</h3></a>\
         <p class=\"station-meta\">{}</p>",
        attr(&href),
        attr(st.logo().unwrap_or(PLACEHOLDER_LOGO)),
        attr(&st.name),
        attr(&st.name),
        text(&st.name),
        text(&st.country),
    );
    out.push_str("<form method=\"post\" action=\"/player/toggle\">");
    player_inputs(out, &st.uuid, here);
    let icon = if playing { "&#10074;&#10074;" } else { "&#9654;" };
    let _ = writeln!(
        out,
        "<button type=\"submit\" class=\"btn-play\" aria-label=\"Reproducir {}\">{icon}</button></form></div>",
        attr(&st.name)
    );
}

pub(super) fn station_grid(out: &mut String, stations: &[Station], player: &PlaybackState, here: &str, small: bool) {
    if small {
        out.push_str("<div id=\"stations-container\" class=\"recommended-grid\">\n");
    } else {
        out.push_str("<div id=\"stations-container\">\n");
    }
    for st in stations {
        station_card(out, st, player, here, small);
    }
    out.push_str("</div>\n");
}

pub(super) fn pagination(out: &mut String, p: &Pagination) {
    out.push_str("<div class=\"pagination-container\">\n");
    let _ = writeln!(
        out,
        "<a href=\"{}\" class=\"pagination-btn{}\" aria-label=\"Página {}\">&laquo; Anterior</a>",
        attr(&p.previous.href),
        if p.previous.disabled { " disabled" } else { "" },
        p.previous.page
    );
    for link in &p.pages {
        let _ = writeln!(
            out,
            "<a href=\"{}\" class=\"pagination-btn{}\">{}</a>",
            attr(&link.href),
            if link.current { " active" } else { "" },
            link.page
        );
    }
    let _ = writeln!(
        out,
        "<a href=\"{}\" class=\"pagination-btn{}\" aria-label=\"Página {}\">Siguiente &raquo;</a>",
        attr(&p.next.href),
        if p.next.disabled { " disabled" } else { "" },
        p.next.page
    );
    out.push_str("</div>\n");
}
