use url::form_urlencoded;

/// Stations per listing page requested from the API.
pub const PAGE_SIZE: u32 = 20;

/// Query parameters as they arrive on `/`, before any cleaning.
#[derive(Debug, Clone, Default)]
pub struct RawFilter {
    pub query: Option<String>,
    pub pais: Option<String>,
    pub genero: Option<String>,
    pub pagina: Option<String>,
}

impl RawFilter {
    /// Never fails: unknown keys are ignored and the first occurrence of a
    /// repeated key wins.
    pub fn from_query(q: &str) -> Self {
        let mut raw = Self::default();
        for (key, value) in form_urlencoded::parse(q.as_bytes()) {
            let slot = match &*key {
                "query" => &mut raw.query,
                "pais" => &mut raw.pais,
                "genero" => &mut raw.genero,
                "pagina" => &mut raw.pagina,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        raw
    }
}

/// Cleaned listing filters. Rebuilt from the URL on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub query: Option<String>,
    pub country: Option<String>,
    pub genre: Option<String>,
    pub page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            query: None,
            country: None,
            genre: None,
            page: 1,
        }
    }
}

/// The one filter that decides the page title and the highlighted
/// navigation entry. Precedence: search, country, genre, popular.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveFilter<'a> {
    Search(&'a str),
    Country(&'a str),
    Genre(&'a str),
    Popular,
}

impl FilterState {
    pub fn from_raw(raw: RawFilter) -> Self {
        Self {
            query: clean(raw.query),
            country: clean(raw.pais),
            genre: clean(raw.genero),
            page: parse_page(raw.pagina.as_deref()),
        }
    }

    pub fn active(&self) -> ActiveFilter<'_> {
        if let Some(q) = self.query.as_deref() {
            ActiveFilter::Search(q)
        } else if let Some(c) = self.country.as_deref() {
            ActiveFilter::Country(c)
        } else if let Some(g) = self.genre.as_deref() {
            ActiveFilter::Genre(g)
        } else {
            ActiveFilter::Popular
        }
    }

    /// Query string for `/radio/buscar`. Only the winning filter is sent.
    pub fn outbound_query(&self, limit: u32) -> String {
        let mut ser = form_urlencoded::Serializer::new(String::new());
        ser.append_pair("limite", &limit.to_string())
            .append_pair("pagina", &self.page.to_string());
        match self.active() {
            ActiveFilter::Search(q) => {
                ser.append_pair("query", q);
            }
            ActiveFilter::Country(c) => {
                ser.append_pair("pais", c);
            }
            ActiveFilter::Genre(g) => {
                ser.append_pair("genero", g);
            }
            ActiveFilter::Popular => {}
        }
        ser.finish()
    }

    /// Listing link for `page`, keeping every filter that is set.
    pub fn page_href(&self, page: u32) -> String {
        let mut ser = form_urlencoded::Serializer::new(String::new());
        for (key, value) in [
            ("query", &self.query),
            ("pais", &self.country),
            ("genero", &self.genre),
        ] {
            if let Some(v) = value {
                ser.append_pair(key, v);
            }
        }
        ser.append_pair("pagina", &page.to_string());
        format!("/?{}", ser.finish())
    }

    /// Heading for the listing. `country_name` is the display name of the
    /// country when the API returned at least one station for it.
    pub fn title(&self, country_name: Option<&str>) -> String {
        match self.active() {
            ActiveFilter::Search(q) => format!("Resultados para: \"{q}\""),
            ActiveFilter::Country(code) => {
                let name = country_name.map(str::trim).filter(|n| !n.is_empty());
                format!("Radios de {}", name.unwrap_or(code))
            }
            ActiveFilter::Genre(g) => format!("Radios de {g}"),
            ActiveFilter::Popular => "Radios Populares".to_string(),
        }
    }
}

fn clean(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Leading decimal digits of the raw value; anything unusable is page 1.
pub fn parse_page(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else { return 1 };
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<u32>().ok().filter(|p| *p >= 1).unwrap_or(1)
}
