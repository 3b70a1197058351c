use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Stream,
    Rent,
    Search,
}

/// A "where to watch" search link for one provider. These are plain search
/// URLs, not availability claims.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchLink {
    pub provider: String,
    pub link: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
    pub logo: String,
}

impl WatchLink {
    fn new(provider: &str, link: String, kind: LinkKind, logo: &str) -> Self {
        Self {
            provider: provider.to_string(),
            link,
            kind,
            logo: logo.to_string(),
        }
    }
}

/// Builds the fixed provider catalog for one title. Pure and deterministic:
/// same title and year in, byte-identical links out. Rental/search engines
/// that understand free text get the year folded into the query, the others
/// search by title alone.
pub fn watch_links(title: &str, year: Option<&str>) -> Vec<WatchLink> {
    let with_year = match year {
        Some(y) if !y.trim().is_empty() => format!("{title} {y}"),
        _ => title.to_string(),
    };
    let search_query = urlencoding::encode(&with_year).into_owned();
    let title_only = urlencoding::encode(title);

    vec![
        WatchLink::new(
            "Netflix",
            format!("https://www.netflix.com/search?q={title_only}"),
            LinkKind::Stream,
            "https://images.justwatch.com/icon/207360008/s100/netflix.webp",
        ),
        WatchLink::new(
            "Amazon Prime",
            format!("https://www.amazon.com/s?k={search_query}&i=instant-video"),
            LinkKind::Stream,
            "https://images.justwatch.com/icon/52449861/s100/amazonprimevideo.webp",
        ),
        WatchLink::new(
            "Disney+",
            format!("https://www.disneyplus.com/search?q={title_only}"),
            LinkKind::Stream,
            "https://images.justwatch.com/icon/147638351/s100/disneyplus.webp",
        ),
        WatchLink::new(
            "Hulu",
            format!("https://www.hulu.com/search?q={title_only}"),
            LinkKind::Stream,
            "https://images.justwatch.com/icon/116305230/s100/hulu.webp",
        ),
        WatchLink::new(
            "Apple TV",
            format!("https://tv.apple.com/search?term={title_only}"),
            LinkKind::Stream,
            "https://images.justwatch.com/icon/190848813/s100/appletvplus.webp",
        ),
        WatchLink::new(
            "Google Play",
            format!("https://play.google.com/store/search?q={search_query}&c=movies"),
            LinkKind::Rent,
            "https://images.justwatch.com/icon/169478387/s100/googleplaymovies.webp",
        ),
        WatchLink::new(
            "YouTube",
            format!("https://www.youtube.com/results?search_query={search_query}+full+movie"),
            LinkKind::Rent,
            "https://images.justwatch.com/icon/59562423/s100/youtube.webp",
        ),
        WatchLink::new(
            "JustWatch",
            format!("https://www.justwatch.com/us/search?q={title_only}"),
            LinkKind::Search,
            "https://www.justwatch.com/appassets/img/JustWatch-logo-large.webp",
        ),
    ]
}
