use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::post::Model as PostModel,
    errors::ServiceError,
    repositories::{
        post_repository::{NewPost, PostPatch},
        PageRequest, PostRepository,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePostInput {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePostInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
}

#[derive(Clone)]
pub struct PostService {
    posts: PostRepository,
}

impl PostService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            posts: PostRepository::new(db),
        }
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, author: Uuid, input: CreatePostInput) -> Result<PostModel, ServiceError> {
        input.validate()?;

        let post = self
            .posts
            .create(NewPost {
                title: input.title,
                content: input.content,
                image: input.image,
                user_id: author,
            })
            .await?;

        info!(post_id = %post.id, "post created");
        Ok(post)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, input: UpdatePostInput) -> Result<PostModel, ServiceError> {
        self.posts
            .update_by_id(
                id,
                PostPatch {
                    title: input.title,
                    content: input.content,
                    image: input.image,
                },
            )
            .await
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: Uuid) -> Result<PostModel, ServiceError> {
        self.posts.find_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn list(&self, page: PageRequest) -> Result<Vec<PostModel>, ServiceError> {
        self.posts.find_paged(page).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.posts.delete_by_id(id).await?;
        info!(post_id = %id, "post deleted");
        Ok(())
    }
}
