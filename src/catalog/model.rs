//! Read-only catalog value objects.

/// One catalog entry, as listed and as shown on its detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: u32,
    pub title: String,
    pub synopsis: Option<String>,
    pub score: Option<f64>,
    pub genres: Vec<String>,
    pub episodes: Option<u32>,
    pub images: Images,
    pub trailer: Option<Trailer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Images {
    pub image_url: Option<String>,
    pub large_image_url: Option<String>,
}

/// Reference to a promotional video.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trailer {
    pub youtube_id: Option<String>,
    pub url: Option<String>,
    pub large_image_url: Option<String>,
}

/// The detail page payload for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDetail {
    pub item: Item,
}

/// What the top of a detail page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeroMedia {
    Video { youtube_id: String },
    Image { url: String },
    Placeholder,
}

impl Item {
    /// A bare item with only an id and a title.
    pub fn new(id: u32, title: impl Into<String>) -> Self {
        Item {
            id,
            title: title.into(),
            synopsis: None,
            score: None,
            genres: Vec::new(),
            episodes: None,
            images: Images::default(),
            trailer: None,
        }
    }

    pub fn primary_genre(&self) -> Option<&str> {
        self.genres.first().map(String::as_str)
    }

    /// Score with one decimal place, `0.0` when unrated.
    pub fn score_label(&self) -> String {
        format!("{:.1}", self.score.unwrap_or(0.0))
    }

    pub fn poster_url(&self) -> Option<&str> {
        self.images
            .large_image_url
            .as_deref()
            .or(self.images.image_url.as_deref())
    }
}

impl ItemDetail {
    pub fn new(item: Item) -> Self {
        ItemDetail { item }
    }

    pub fn id(&self) -> u32 {
        self.item.id
    }

    /// Trailer video first, then the trailer still, then the poster.
    pub fn hero_media(&self) -> HeroMedia {
        let trailer = self.item.trailer.as_ref();
        if let Some(youtube_id) = trailer.and_then(|t| t.youtube_id.clone()) {
            return HeroMedia::Video { youtube_id };
        }
        if let Some(url) = trailer.and_then(|t| t.large_image_url.clone()) {
            return HeroMedia::Image { url };
        }
        match self.item.images.large_image_url.clone() {
            Some(url) => HeroMedia::Image { url },
            None => HeroMedia::Placeholder,
        }
    }
}
