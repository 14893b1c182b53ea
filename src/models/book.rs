use serde::{Deserialize, Serialize};

use super::Author;
use crate::entity::{Entity, EntityId, Timestamp};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Entity)]
#[entity(kind = "book", collection = "books")]
#[serde(default)]
pub struct Book {
    pub id: EntityId,
    #[entity(required)]
    pub title: String,
    pub author: Author,
    pub genres: Vec<String>,
    pub published_at: Timestamp,
    #[entity(non_negative)]
    pub price: f64,
    pub stock: u32,
}

/// Book search criteria. Every criterion is optional and all given ones must match.
///
/// Text criteria are case-insensitive substring matches. Numeric bounds are
/// inclusive, and a bound of zero means "no bound" (so a minimum price of 0
/// cannot be expressed, which is harmless). Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookSearch {
    pub title: String,
    /// Matches the author's first name, last name, or "first last".
    pub author: String,
    /// The book must carry at least one of these genres (exact, case-insensitive).
    pub genres: Vec<String>,
    pub min_price: f64,
    pub max_price: f64,
    pub min_stock: u32,
    pub max_stock: u32,
    pub published_after: Option<Timestamp>,
    pub published_before: Option<Timestamp>,
}

impl BookSearch {
    pub fn matches(&self, book: &Book) -> bool {
        self.matches_title(book)
            && self.matches_author(book)
            && self.matches_genres(book)
            && self.matches_price(book)
            && self.matches_stock(book)
            && self.matches_published(book)
    }

    fn matches_title(&self, book: &Book) -> bool {
        self.title.is_empty() || contains_ignore_case(&book.title, &self.title)
    }

    fn matches_author(&self, book: &Book) -> bool {
        if self.author.is_empty() {
            return true;
        }
        contains_ignore_case(&book.author.first_name, &self.author)
            || contains_ignore_case(&book.author.last_name, &self.author)
            || contains_ignore_case(&book.author.full_name(), &self.author)
    }

    fn matches_genres(&self, book: &Book) -> bool {
        self.genres.is_empty()
            || self.genres.iter().any(|wanted| {
                let wanted = wanted.trim().to_lowercase();
                book.genres
                    .iter()
                    .any(|genre| genre.to_lowercase() == wanted)
            })
    }

    fn matches_price(&self, book: &Book) -> bool {
        (self.min_price == 0.0 || book.price >= self.min_price)
            && (self.max_price == 0.0 || book.price <= self.max_price)
    }

    fn matches_stock(&self, book: &Book) -> bool {
        (self.min_stock == 0 || book.stock >= self.min_stock)
            && (self.max_stock == 0 || book.stock <= self.max_stock)
    }

    fn matches_published(&self, book: &Book) -> bool {
        self.published_after
            .map_or(true, |after| book.published_at >= after)
            && self
                .published_before
                .map_or(true, |before| book.published_at <= before)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
