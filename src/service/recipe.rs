//! Recipe counters that move together with a row elsewhere: likes and comments.

use crate::entity::{Entity, RelationBatch, Row};
use crate::error::AppError;
use crate::model::{Comment, Recipe, UserLikedRecipe};
use crate::service::executor::{execute, expect_rows, fetch_optional};
use crate::service::CrudService;
use crate::sql::{delete_by_id, delete_relation, increment, insert, relation_insert, select_by_id};
use sqlx::SqlitePool;

pub struct RecipeService;

impl RecipeService {
    pub async fn view_recipe(pool: &SqlitePool, recipe_id: &str) -> Result<(), AppError> {
        CrudService::increment::<Recipe>(pool, recipe_id, "views", 1).await
    }

    /// Records the like and bumps `recipes.likes` in one transaction.
    pub async fn like_recipe(pool: &SqlitePool, user_id: &str, recipe_id: &str) -> Result<(), AppError> {
        if user_id.is_empty() {
            return Err(AppError::Validation("user_id is required".into()));
        }
        let like = UserLikedRecipe {
            user_id: user_id.to_string(),
            recipe_id: recipe_id.to_string(),
        };
        let link = relation_insert(user_id, &RelationBatch::from_rows(&[like]))?;
        let bump = increment::<Recipe>(recipe_id, "likes", 1)?;

        let mut tx = pool.begin().await?;
        let affected = execute(&mut *tx, &bump)
            .await
            .map_err(AppError::execution("like", Recipe::TABLE))?;
        if affected == 0 {
            return Err(AppError::NotFound {
                table: Recipe::TABLE,
                id: recipe_id.to_string(),
            });
        }
        let affected = execute(&mut *tx, &link).await.map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("user {} already likes recipe {}", user_id, recipe_id))
            }
            other => AppError::execution("like", UserLikedRecipe::TABLE)(other),
        })?;
        expect_rows(UserLikedRecipe::TABLE, 1, affected)?;
        tx.commit().await?;
        tracing::debug!(user_id, recipe_id, "recipe liked");
        Ok(())
    }

    /// Removes the like and lowers `recipes.likes` in one transaction.
    pub async fn unlike_recipe(pool: &SqlitePool, user_id: &str, recipe_id: &str) -> Result<(), AppError> {
        let unlink = delete_relation::<UserLikedRecipe>(user_id, recipe_id)?;
        let lower = increment::<Recipe>(recipe_id, "likes", -1)?;

        let mut tx = pool.begin().await?;
        let affected = execute(&mut *tx, &unlink)
            .await
            .map_err(AppError::execution("unlike", UserLikedRecipe::TABLE))?;
        if affected == 0 {
            return Err(AppError::NotFound {
                table: UserLikedRecipe::TABLE,
                id: format!("{}/{}", user_id, recipe_id),
            });
        }
        let affected = execute(&mut *tx, &lower)
            .await
            .map_err(AppError::execution("unlike", Recipe::TABLE))?;
        expect_rows(Recipe::TABLE, 1, affected)?;
        tx.commit().await?;
        tracing::debug!(user_id, recipe_id, "recipe unliked");
        Ok(())
    }

    /// Inserts the comment and bumps `recipes.comments` in one transaction.
    pub async fn add_comment(pool: &SqlitePool, comment: Comment) -> Result<String, AppError> {
        if comment.recipe_id.is_empty() {
            return Err(AppError::Validation("recipe_id is required".into()));
        }
        let built = insert(&comment)?;
        let bump = increment::<Recipe>(&comment.recipe_id, "comments", 1)?;

        let mut tx = pool.begin().await?;
        let affected = execute(&mut *tx, &bump)
            .await
            .map_err(AppError::execution("comment", Recipe::TABLE))?;
        if affected == 0 {
            return Err(AppError::NotFound {
                table: Recipe::TABLE,
                id: comment.recipe_id,
            });
        }
        let affected = execute(&mut *tx, &built.query)
            .await
            .map_err(AppError::execution("insert", Comment::TABLE))?;
        expect_rows(Comment::TABLE, 1, affected)?;
        tx.commit().await?;
        Ok(built.id)
    }

    /// Deletes the comment and lowers its recipe's `comments` count in one transaction.
    /// A recipe that is already gone leaves nothing to adjust.
    pub async fn remove_comment(pool: &SqlitePool, comment_id: &str) -> Result<String, AppError> {
        let mut tx = pool.begin().await?;
        let comment: Comment = fetch_optional(&mut *tx, &select_by_id(Comment::TABLE, comment_id))
            .await
            .map_err(AppError::execution("get", Comment::TABLE))?
            .ok_or_else(|| AppError::NotFound {
                table: Comment::TABLE,
                id: comment_id.to_string(),
            })?;
        execute(&mut *tx, &delete_by_id(Comment::TABLE, comment.id()))
            .await
            .map_err(AppError::execution("delete", Comment::TABLE))?;
        if !comment.recipe_id.is_empty() {
            let lower = increment::<Recipe>(&comment.recipe_id, "comments", -1)?;
            execute(&mut *tx, &lower)
                .await
                .map_err(AppError::execution("comment", Recipe::TABLE))?;
        }
        tx.commit().await?;
        Ok(comment_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;
    use crate::store::Store;

    async fn seeded() -> (Store, String, String) {
        let store = Store::in_memory().await.unwrap();
        let user_id = CrudService::create(
            store.pool(),
            &User {
                name: "Bo".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let recipe_id = CrudService::create(
            store.pool(),
            &Recipe {
                name: "Risotto".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        (store, user_id, recipe_id)
    }

    #[tokio::test]
    async fn like_then_unlike_moves_counter() {
        let (store, user_id, recipe_id) = seeded().await;
        let pool = store.pool();
        RecipeService::like_recipe(pool, &user_id, &recipe_id).await.unwrap();
        let recipe: Recipe = CrudService::get(pool, &recipe_id).await.unwrap();
        assert_eq!(recipe.likes, 1);
        let likes: Vec<UserLikedRecipe> = CrudService::list_relations(pool, &user_id).await.unwrap();
        assert_eq!(likes.len(), 1);
        assert_eq!(likes[0].recipe_id, recipe_id);

        RecipeService::unlike_recipe(pool, &user_id, &recipe_id).await.unwrap();
        let recipe: Recipe = CrudService::get(pool, &recipe_id).await.unwrap();
        assert_eq!(recipe.likes, 0);
    }

    #[tokio::test]
    async fn duplicate_like_conflicts_without_double_counting() {
        let (store, user_id, recipe_id) = seeded().await;
        let pool = store.pool();
        RecipeService::like_recipe(pool, &user_id, &recipe_id).await.unwrap();
        let err = RecipeService::like_recipe(pool, &user_id, &recipe_id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        let recipe: Recipe = CrudService::get(pool, &recipe_id).await.unwrap();
        assert_eq!(recipe.likes, 1);
    }

    #[tokio::test]
    async fn unlike_without_like_is_not_found() {
        let (store, user_id, recipe_id) = seeded().await;
        let err = RecipeService::unlike_recipe(store.pool(), &user_id, &recipe_id)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn liking_missing_recipe_is_not_found() {
        let (store, user_id, _) = seeded().await;
        let err = RecipeService::like_recipe(store.pool(), &user_id, "missing")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn comments_move_recipe_counter() {
        let (store, user_id, recipe_id) = seeded().await;
        let pool = store.pool();
        let comment_id = RecipeService::add_comment(
            pool,
            Comment {
                recipe_id: recipe_id.clone(),
                user_id,
                comment: "Creamy".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let recipe: Recipe = CrudService::get(pool, &recipe_id).await.unwrap();
        assert_eq!(recipe.comments, 1);

        RecipeService::remove_comment(pool, &comment_id).await.unwrap();
        let recipe: Recipe = CrudService::get(pool, &recipe_id).await.unwrap();
        assert_eq!(recipe.comments, 0);
        assert!(RecipeService::remove_comment(pool, &comment_id)
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn comment_update_cannot_move_it_to_another_recipe() {
        let (store, user_id, first) = seeded().await;
        let pool = store.pool();
        let second = CrudService::create(
            pool,
            &Recipe {
                name: "Gnocchi".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let comment_id = RecipeService::add_comment(
            pool,
            Comment {
                recipe_id: first.clone(),
                user_id,
                comment: "Creamy".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let mut comment: Comment = CrudService::get(pool, &comment_id).await.unwrap();
        comment.recipe_id = second.clone();
        comment.comment = "Very creamy".into();
        CrudService::update(pool, &comment).await.unwrap();
        let stored: Comment = CrudService::get(pool, &comment_id).await.unwrap();
        assert_eq!(stored.recipe_id, first);
        assert_eq!(stored.comment, "Very creamy");

        RecipeService::remove_comment(pool, &comment_id).await.unwrap();
        let a: Recipe = CrudService::get(pool, &first).await.unwrap();
        let b: Recipe = CrudService::get(pool, &second).await.unwrap();
        assert_eq!(a.comments, 0);
        assert_eq!(b.comments, 0);
    }

    #[tokio::test]
    async fn views_accumulate() {
        let (store, _, recipe_id) = seeded().await;
        let pool = store.pool();
        RecipeService::view_recipe(pool, &recipe_id).await.unwrap();
        RecipeService::view_recipe(pool, &recipe_id).await.unwrap();
        let recipe: Recipe = CrudService::get(pool, &recipe_id).await.unwrap();
        assert_eq!(recipe.views, 2);
    }
}
