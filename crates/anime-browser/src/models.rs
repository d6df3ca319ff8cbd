//! View models built from Jikan responses.

use jikan::api::AnimeItem;
use serde::Serialize;

pub use jikan::api::AnimeDetail;

/// One search result row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimeSummary {
    pub id: u32,
    pub title: String,
    /// Empty when the API sent no image
    pub image_url: String,
    pub synopsis: Option<String>,
}

impl From<AnimeItem> for AnimeSummary {
    fn from(item: AnimeItem) -> Self {
        let image_url = item.image_url().unwrap_or_default().to_string();
        Self {
            id: item.mal_id,
            title: item.title,
            image_url,
            synopsis: item.synopsis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(json: &str) -> AnimeItem {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_summary_from_full_item() {
        let summary = AnimeSummary::from(item(
            r#"{"mal_id": 20, "title": "Naruto", "images": {"jpg": {"image_url": "https://cdn/20.jpg"}}, "synopsis": "Ninja."}"#,
        ));
        assert_eq!(
            summary,
            AnimeSummary {
                id: 20,
                title: "Naruto".to_string(),
                image_url: "https://cdn/20.jpg".to_string(),
                synopsis: Some("Ninja.".to_string()),
            }
        );
    }

    #[test]
    fn test_summary_without_images_or_synopsis() {
        let summary = AnimeSummary::from(item(r#"{"mal_id": 1, "title": "Cowboy Bebop", "synopsis": null}"#));
        assert_eq!(summary.image_url, "");
        assert_eq!(summary.synopsis, None);
    }
}
