//! Webhook payload accepted by the ingestion endpoint and the CLI.
//!
//! The wire format is loose (content generators send ids as numbers and prices
//! as strings), so every field deserializes as optional and
//! [`ReceivePostPayload::validate`] turns it into a [`NewPost`] before anything
//! reaches storage.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::{models::DEFAULT_CATEGORY, slug::slugify, PostStatus};

/// Fields every ingestion payload must carry with a non-blank value.
pub const REQUIRED_FIELDS: [&str; 3] = ["id", "title", "content"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceivePostPayload {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "de_opt_price")]
    pub price: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub affiliate_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("{0}")]
    InvalidStatus(String),
    #[error("title `{0}` does not produce a usable slug")]
    EmptySlug(String),
    #[error("price `{0}` is not a finite number")]
    InvalidPrice(String),
}

/// A validated post ready to be written by a store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub id: String,
    pub title: String,
    pub content: String,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub affiliate_url: Option<String>,
    pub category: String,
    pub status: PostStatus,
}

impl NewPost {
    /// Slug derived from the title. Stores always recompute it here rather than
    /// trusting a caller-supplied value.
    pub fn slug(&self) -> String {
        slugify(&self.title)
    }

    /// Price written to the mirrored product row.
    pub fn product_price(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }

    /// Affiliate link written to the mirrored product row. Empty keeps the
    /// product out of listings.
    pub fn product_affiliate_url(&self) -> &str {
        self.affiliate_url.as_deref().unwrap_or("")
    }
}

impl ReceivePostPayload {
    pub fn validate(self) -> Result<NewPost, ValidationError> {
        let id = non_blank(self.id);
        let title = non_blank(self.title);
        let content = non_blank(self.content);

        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .iter()
            .zip([id.is_none(), title.is_none(), content.is_none()])
            .filter_map(|(field, absent)| absent.then_some(*field))
            .collect();

        let (Some(id), Some(title), Some(content)) = (id, title, content) else {
            return Err(ValidationError::MissingFields(missing));
        };

        if slugify(&title).is_empty() {
            return Err(ValidationError::EmptySlug(title));
        }

        if let Some(price) = self.price.filter(|price| !price.is_finite()) {
            return Err(ValidationError::InvalidPrice(price.to_string()));
        }

        let status = match non_blank(self.status) {
            Some(raw) => raw
                .parse::<PostStatus>()
                .map_err(ValidationError::InvalidStatus)?,
            None => PostStatus::default(),
        };

        Ok(NewPost {
            id: id.trim().to_string(),
            title,
            content,
            price: self.price,
            image_url: non_blank(self.image_url),
            affiliate_url: non_blank(self.affiliate_url),
            category: non_blank(self.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            status,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
}

fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
        Scalar::Text(text) => text,
        Scalar::Int(number) => number.to_string(),
        Scalar::Float(number) => number.to_string(),
    }))
}

fn de_opt_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Scalar::Int(number)) => Ok(Some(number as f64)),
        Some(Scalar::Float(number)) => Ok(Some(number)),
        Some(Scalar::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Scalar::Text(text)) => text
            .trim()
            .replace(',', ".")
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid price `{text}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ReceivePostPayload {
        serde_json::from_str(json).expect("parse payload")
    }

    #[test]
    fn missing_content_is_reported() {
        let err = parse(r#"{"id":"x","title":"T"}"#)
            .validate()
            .expect_err("content missing");
        assert_eq!(err, ValidationError::MissingFields(vec!["content"]));
    }

    #[test]
    fn blank_fields_count_as_missing_in_declared_order() {
        let err = parse(r#"{"id":"  ","content":""}"#)
            .validate()
            .expect_err("all missing");
        assert_eq!(err, ValidationError::MissingFields(vec!["id", "title", "content"]));
        assert_eq!(err.to_string(), "missing required fields: id, title, content");
    }

    #[test]
    fn numeric_id_and_string_price_are_accepted() {
        let post = parse(r#"{"id":42,"title":"Mouse","content":"ok","price":"199,90"}"#)
            .validate()
            .expect("valid payload");
        assert_eq!(post.id, "42");
        assert_eq!(post.price, Some(199.9));
    }

    #[test]
    fn unparsable_price_fails_deserialization() {
        let result = serde_json::from_str::<ReceivePostPayload>(
            r#"{"id":"1","title":"Mouse","content":"ok","price":"cheap"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn optional_fields_get_defaults() {
        let post = parse(
            r#"{"id":"p2","title":"Keyboard","content":"body","image_url":"","affiliate_url":null}"#,
        )
        .validate()
        .expect("valid payload");
        assert_eq!(post.category, DEFAULT_CATEGORY);
        assert_eq!(post.status, PostStatus::Published);
        assert_eq!(post.image_url, None);
        assert_eq!(post.product_affiliate_url(), "");
        assert_eq!(post.product_price(), 0.0);
        assert_eq!(post.slug(), "keyboard");
    }

    #[test]
    fn explicit_draft_status_is_kept() {
        let post = parse(r#"{"id":"d","title":"Draft","content":"x","status":"draft"}"#)
            .validate()
            .expect("valid payload");
        assert_eq!(post.status, PostStatus::Draft);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = parse(r#"{"id":"d","title":"Draft","content":"x","status":"archived"}"#)
            .validate()
            .expect_err("bad status");
        assert!(matches!(err, ValidationError::InvalidStatus(_)));
    }

    #[test]
    fn non_finite_prices_are_rejected() {
        for raw in [r#""NaN""#, r#""inf""#, r#""-infinity""#, r#""1e999""#] {
            let json = format!(r#"{{"id":"p","title":"Mouse","content":"x","price":{raw}}}"#);
            let err = parse(&json).validate().expect_err("non-finite price");
            assert!(matches!(err, ValidationError::InvalidPrice(_)), "{raw}: {err:?}");
        }

        let mut payload = parse(r#"{"id":"p","title":"Mouse","content":"x"}"#);
        payload.price = Some(f64::INFINITY);
        assert_eq!(
            payload.validate().expect_err("infinite price"),
            ValidationError::InvalidPrice("inf".to_string())
        );
    }

    #[test]
    fn title_without_slug_characters_is_rejected() {
        let err = parse(r#"{"id":"1","title":"???","content":"x"}"#)
            .validate()
            .expect_err("empty slug");
        assert_eq!(err, ValidationError::EmptySlug("???".to_string()));
    }
}
