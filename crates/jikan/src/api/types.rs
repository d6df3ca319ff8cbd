//! Jikan API v4 response types.
//!
//! Fields the API may omit or null out are `Option`, so a sparse record still
//! decodes. Unknown fields are ignored.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Response of `GET /anime?q=..`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Vec<AnimeItem>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl SearchResponse {
    /// Whether another page exists; false when the pagination block is missing
    pub fn has_next_page(&self) -> bool {
        self.pagination
            .as_ref()
            .map(Pagination::has_next_page)
            .unwrap_or(false)
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub last_visible_page: Option<u32>,
    pub has_next_page: Option<bool>,
    pub current_page: Option<u32>,
    #[serde(default)]
    pub items: Option<PaginationItems>,
}

impl Pagination {
    pub fn has_next_page(&self) -> bool {
        self.has_next_page.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationItems {
    pub count: Option<u32>,
    pub total: Option<u32>,
    pub per_page: Option<u32>,
}

/// One search result row as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeItem {
    pub mal_id: u32,
    pub title: String,
    #[serde(default)]
    pub images: Option<AnimeImages>,
    #[serde(default)]
    pub synopsis: Option<String>,
}

impl AnimeItem {
    pub fn image_url(&self) -> Option<&str> {
        self.images.as_ref().and_then(AnimeImages::jpg_url)
    }
}

/// Anime images
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimeImages {
    #[serde(default)]
    pub jpg: Option<ImageSet>,
    #[serde(default)]
    pub webp: Option<ImageSet>,
}

impl AnimeImages {
    pub fn jpg_url(&self) -> Option<&str> {
        self.jpg.as_ref().and_then(|set| set.image_url.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageSet {
    pub image_url: Option<String>,
    pub small_image_url: Option<String>,
    pub large_image_url: Option<String>,
}

/// Full anime record from `GET /anime/{id}/full`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimeDetail {
    pub mal_id: Option<u32>,
    pub url: Option<String>,
    pub images: Option<DetailImages>,

    // Titles
    pub title: Option<String>,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,

    // Type and status
    #[serde(rename = "type")]
    pub anime_type: Option<String>,
    pub source: Option<String>,
    pub episodes: Option<u32>,
    pub status: Option<String>,

    // Dates
    pub aired: Option<Aired>,
    pub duration: Option<String>,
    pub rating: Option<String>,
    pub season: Option<String>,
    pub year: Option<u32>,

    // Scores and rankings
    pub score: Option<f64>,
    pub rank: Option<u32>,
    pub popularity: Option<u32>,

    pub synopsis: Option<String>,

    // Null-tolerant lists
    pub studios: Option<Vec<MalEntity>>,
    pub genres: Option<Vec<MalEntity>>,
}

impl AnimeDetail {
    pub fn image_url(&self) -> Option<&str> {
        self.images
            .as_ref()
            .and_then(|images| images.jpg.as_ref())
            .and_then(|jpg| jpg.image_url.as_deref())
    }

    /// Human-readable airing period, e.g. "Oct 3, 2002 to Feb 8, 2007"
    pub fn aired_string(&self) -> Option<&str> {
        self.aired.as_ref().and_then(|aired| aired.string.as_deref())
    }

    pub fn studio_names(&self) -> Vec<&str> {
        entity_names(self.studios.as_deref())
    }

    pub fn genre_names(&self) -> Vec<&str> {
        entity_names(self.genres.as_deref())
    }
}

fn entity_names(entities: Option<&[MalEntity]>) -> Vec<&str> {
    entities
        .unwrap_or_default()
        .iter()
        .filter_map(|entity| entity.name.as_deref())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailImages {
    pub jpg: Option<DetailImageSet>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailImageSet {
    pub image_url: Option<String>,
}

/// Aired dates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Aired {
    pub from: Option<String>,
    pub to: Option<String>,
    pub string: Option<String>,
}

/// MAL entity (genre, studio, producer, etc.)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MalEntity {
    pub mal_id: Option<u32>,
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Detail body, normally wrapped in `{ "data": ... }`
///
/// A bare record is only accepted when there is no `data` key, so a
/// malformed wrapped record is a decode error rather than an empty detail.
#[derive(Debug, Clone)]
pub enum DetailEnvelope {
    Wrapped { data: AnimeDetail },
    Bare(AnimeDetail),
}

impl<'de> Deserialize<'de> for DetailEnvelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut value = serde_json::Value::deserialize(deserializer)?;
        match value.get_mut("data").map(serde_json::Value::take) {
            Some(data) => serde_json::from_value(data)
                .map(|data| DetailEnvelope::Wrapped { data })
                .map_err(de::Error::custom),
            None => serde_json::from_value(value)
                .map(DetailEnvelope::Bare)
                .map_err(de::Error::custom),
        }
    }
}

impl DetailEnvelope {
    pub fn into_inner(self) -> AnimeDetail {
        match self {
            DetailEnvelope::Wrapped { data } => data,
            DetailEnvelope::Bare(detail) => detail,
        }
    }
}

/// Error response from Jikan API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JikanError {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl JikanError {
    /// Best message from an error body, if it parses
    pub fn message_from_body(body: &str) -> Option<String> {
        let parsed: JikanError = serde_json::from_str(body).ok()?;
        parsed.message.or(parsed.error).filter(|m| !m.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_with_pagination() {
        let body = r#"{
            "pagination": {"last_visible_page": 40, "has_next_page": true, "current_page": 1,
                           "items": {"count": 1, "total": 480, "per_page": 12}},
            "data": [{"mal_id": 20, "title": "Naruto",
                      "images": {"jpg": {"image_url": "https://cdn/20.jpg"}},
                      "synopsis": "Ninja.", "score": 8.0}]
        }"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert!(response.has_next_page());
        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0].image_url(), Some("https://cdn/20.jpg"));
        assert_eq!(response.data[0].synopsis.as_deref(), Some("Ninja."));
    }

    #[test]
    fn test_search_response_without_pagination() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"data": [{"mal_id": 1, "title": "Bebop"}]}"#).unwrap();
        assert!(!response.has_next_page());
        assert_eq!(response.data[0].image_url(), None);
        assert_eq!(response.data[0].synopsis, None);
    }

    #[test]
    fn test_null_has_next_page_is_false() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"data": [], "pagination": {"has_next_page": null}}"#).unwrap();
        assert!(!response.has_next_page());
    }

    #[test]
    fn test_item_with_empty_images() {
        let item: AnimeItem =
            serde_json::from_str(r#"{"mal_id": 5, "title": "X", "images": {"jpg": {}}}"#).unwrap();
        assert_eq!(item.image_url(), None);
    }

    #[test]
    fn test_detail_envelope_unwraps_data() {
        let body = r#"{"data": {"mal_id": 42, "title": "Hellsing", "type": "TV", "episodes": 13,
                       "score": 7.4, "aired": {"string": "Oct 11, 2001 to Jan 17, 2002"},
                       "studios": [{"mal_id": 7, "type": "anime", "name": "Gonzo", "url": "u"}],
                       "genres": [{"name": "Action"}, {"name": "Horror"}], "themes": []}}"#;
        let detail = serde_json::from_str::<DetailEnvelope>(body).unwrap().into_inner();
        assert_eq!(detail.mal_id, Some(42));
        assert_eq!(detail.anime_type.as_deref(), Some("TV"));
        assert_eq!(detail.aired_string(), Some("Oct 11, 2001 to Jan 17, 2002"));
        assert_eq!(detail.studio_names(), vec!["Gonzo"]);
        assert_eq!(detail.genre_names(), vec!["Action", "Horror"]);
        assert_eq!(detail.rating, None);
    }

    #[test]
    fn test_detail_envelope_accepts_bare_record() {
        let detail = serde_json::from_str::<DetailEnvelope>(r#"{"title": "Monster", "episodes": null}"#)
            .unwrap()
            .into_inner();
        assert_eq!(detail.title.as_deref(), Some("Monster"));
        assert_eq!(detail.episodes, None);
        assert!(detail.studio_names().is_empty());
    }

    #[test]
    fn test_detail_envelope_rejects_malformed_data() {
        let body = r#"{"data": {"title": "Hellsing", "episodes": "thirteen"}}"#;
        assert!(serde_json::from_str::<DetailEnvelope>(body).is_err());
        assert!(serde_json::from_str::<DetailEnvelope>(r#"{"data": "nope"}"#).is_err());
        assert!(serde_json::from_str::<DetailEnvelope>(r#""nope""#).is_err());
    }

    #[test]
    fn test_jikan_error_message() {
        let body = r#"{"status": 404, "type": "BadResponseException", "message": "Resource does not exist"}"#;
        assert_eq!(
            JikanError::message_from_body(body).as_deref(),
            Some("Resource does not exist")
        );
        assert_eq!(JikanError::message_from_body("<html>"), None);
    }
}
