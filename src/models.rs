use serde::{Deserialize, Deserializer, Serialize};

/// One station as served by the directory API.
///
/// Fields come back as `null`, missing, or `""` depending on the record;
/// they are normalised to their default here so the rest of the crate only
/// checks `is_empty()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub uuid: String,
    #[serde(rename = "nombre", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "pais", default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(rename = "pais_code", default, deserialize_with = "null_as_default")]
    pub country_code: String,
    #[serde(rename = "generos", default, deserialize_with = "null_as_default")]
    pub genres: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub logo: String,
    #[serde(rename = "popularidad", default, deserialize_with = "null_as_default")]
    pub votes: u64,
    #[serde(
        rename = "descripcionGenerada",
        default,
        deserialize_with = "null_as_default"
    )]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url_resolved: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

impl Station {
    pub fn logo(&self) -> Option<&str> {
        non_empty(&self.logo)
    }

    /// Stream address carried by the record itself, if any.
    pub fn stream_url(&self) -> Option<&str> {
        non_empty(&self.url_resolved).or_else(|| non_empty(&self.url))
    }

    pub fn genre_list(&self) -> Vec<&str> {
        self.genres
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .collect()
    }

    /// Non-blank lines of the generated description.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.description
            .lines()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub name: String,
    #[serde(default)]
    pub stationcount: u64,
}

/// Response of `/radio/buscar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(rename = "radios", default, deserialize_with = "null_as_default")]
    pub stations: Vec<Station>,
    #[serde(rename = "totalRadios", default, deserialize_with = "null_as_default")]
    pub total_stations: u64,
    #[serde(rename = "totalPaginas", default, deserialize_with = "null_as_default")]
    pub total_pages: u32,
    #[serde(rename = "paginaActual", default = "first_page")]
    pub current_page: u32,
}

impl Default for SearchPage {
    fn default() -> Self {
        Self {
            stations: vec![],
            total_stations: 0,
            total_pages: 1,
            current_page: 1,
        }
    }
}

fn first_page() -> u32 {
    1
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

#[cfg(test)]
pub(crate) fn station(uuid: &str, name: &str) -> Station {
    Station {
        uuid: uuid.to_string(),
        name: name.to_string(),
        country: "Argentina".to_string(),
        country_code: "AR".to_string(),
        genres: String::new(),
        logo: String::new(),
        votes: 0,
        description: String::new(),
        url_resolved: String::new(),
        url: String::new(),
    }
}
