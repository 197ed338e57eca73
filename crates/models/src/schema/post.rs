use serde::Deserialize;
use validator::Validate;

use super::{not_blank, required, Schema, ValidationFailure};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    #[validate(required, custom = "not_blank", length(max = 10000))]
    pub content: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Post body. The trip comes from the route and the author from the session.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub content: String,
    pub images: Vec<String>,
}

impl Schema for NewPost {
    type Input = PostInput;

    fn from_input(input: PostInput) -> Result<Self, ValidationFailure> {
        Ok(NewPost { content: required("content", input.content)?, images: input.images })
    }
}
