mod cards;
mod layout;
mod pages;

pub use layout::{Chrome, Nav};
pub use pages::{genres_page, listing_page, not_found_page, station_page, ListingView, StationView};

pub const PLACEHOLDER_LOGO: &str = "/images/placeholder-radio.svg";

/// Escapes text placed between tags.
fn text(s: &str) -> String {
    htmlescape::encode_minimal(s)
}

/// Escapes a double-quoted attribute value. Quotes are entity-encoded by
/// the minimal set, which keeps URLs readable.
fn attr(s: &str) -> String {
    htmlescape::encode_minimal(s)
}

fn station_href(uuid: &str) -> String {
    format!("/radio/{}", urlencoding::encode(uuid))
}

fn genre_href(genre: &str) -> String {
    format!("/?genero={}", urlencoding::encode(genre))
}

fn country_href(code: &str) -> String {
    format!("/?pais={}", urlencoding::encode(code))
}

/// First `max` characters of `s` followed by `...`, cut or not.
fn excerpt_chars(s: &str, max: usize) -> String {
    let taken: String = s.chars().take(max).collect();
    format!("{taken}...")
}
