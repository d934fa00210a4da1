//! JSON response schema of the remote catalog and its mapping to the model.

use serde::Deserialize;

use super::{CatalogError, Images, Item, ItemDetail, Trailer};

#[derive(Debug, Deserialize)]
struct ListResponse {
    data: Option<Vec<WireItem>>,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    data: Option<WireItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireItem {
    mal_id: Option<u32>,
    title: Option<String>,
    synopsis: Option<String>,
    score: Option<f64>,
    episodes: Option<u32>,
    genres: Vec<WireGenre>,
    images: Option<WireImageSet>,
    trailer: Option<WireTrailer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireGenre {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireImageSet {
    jpg: Option<WireImages>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireImages {
    image_url: Option<String>,
    large_image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireTrailer {
    youtube_id: Option<String>,
    url: Option<String>,
    images: Option<WireImages>,
}

impl WireItem {
    fn into_item(self) -> Option<Item> {
        let id = self.mal_id?;
        let images = self.images.and_then(|set| set.jpg).unwrap_or_default();
        Some(Item {
            id,
            title: self.title.unwrap_or_default(),
            synopsis: self.synopsis,
            score: self.score,
            genres: self.genres.into_iter().filter_map(|g| g.name).collect(),
            episodes: self.episodes,
            images: Images {
                image_url: images.image_url,
                large_image_url: images.large_image_url,
            },
            trailer: self.trailer.map(|trailer| Trailer {
                youtube_id: trailer.youtube_id,
                url: trailer.url,
                large_image_url: trailer.images.and_then(|i| i.large_image_url),
            }),
        })
    }
}

/// Decode a list response. A body without `data` is an empty list;
/// entries without an id are skipped.
pub fn decode_list(body: &str) -> Result<Vec<Item>, CatalogError> {
    let response: ListResponse = serde_json::from_str(body)?;
    let entries = response.data.unwrap_or_default();
    let total = entries.len();
    let items: Vec<Item> = entries.into_iter().filter_map(WireItem::into_item).collect();
    if items.len() < total {
        tracing::warn!(skipped = total - items.len(), "list entries without an id were skipped");
    }
    Ok(items)
}

/// Decode a detail response. A body without `data` (or without an id) is
/// an error.
pub fn decode_detail(body: &str) -> Result<ItemDetail, CatalogError> {
    let response: DetailResponse = serde_json::from_str(body)?;
    response
        .data
        .and_then(WireItem::into_item)
        .map(ItemDetail::new)
        .ok_or(CatalogError::MissingDetail)
}
