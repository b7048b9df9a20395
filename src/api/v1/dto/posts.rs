/*
 * Responsibility
 * - Posts の request DTO
 * - author は body からは受け取らない (AuthCtx の subject を使う)
 */
use serde::Deserialize;

use crate::repos::store::PostContent;

#[derive(Debug, Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub content: String,
}

impl PostRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is required");
        }
        if self.content.trim().is_empty() {
            return Err("content is required");
        }
        Ok(())
    }

    pub fn into_content(self) -> PostContent {
        PostContent {
            title: self.title.trim().to_owned(),
            content: self.content.trim().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_and_content_are_required() {
        let ok = PostRequest {
            title: "hello".into(),
            content: "world".into(),
        };
        assert!(ok.validate().is_ok());

        let no_title = PostRequest {
            title: " ".into(),
            content: "world".into(),
        };
        assert_eq!(no_title.validate(), Err("title is required"));

        let no_content = PostRequest {
            title: "hello".into(),
            content: String::new(),
        };
        assert_eq!(no_content.validate(), Err("content is required"));
    }
}
