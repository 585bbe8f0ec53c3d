//! User creation and lookup.

use tracing::info;

use folderhub_core::error::AppError;
use folderhub_core::result::AppResult;
use folderhub_core::types::UserId;
use folderhub_database::repositories::{FolderRepository, UserRepository};
use folderhub_entity::folder::{CreateFolder, Folder};
use folderhub_entity::user::{CreateUser, User};

use crate::context::{ServiceContext, commit};
use crate::naming::NameRules;
use crate::retry::with_retry;

/// Creates users and looks them up.
#[derive(Debug, Clone)]
pub struct UserService {
    ctx: ServiceContext,
    rules: NameRules,
    home_folder_name: String,
    user_repo: UserRepository,
}

impl UserService {
    /// Creates a new user service. Every new user gets a home folder
    /// named `home_folder_name`.
    pub fn new(ctx: ServiceContext, rules: NameRules, home_folder_name: impl Into<String>) -> Self {
        Self {
            ctx,
            rules,
            home_folder_name: home_folder_name.into(),
            user_repo: UserRepository::new(),
        }
    }

    /// Creates a user together with its home folder, atomically.
    pub async fn create_user(&self, username: &str, credential: &str) -> AppResult<(User, Folder)> {
        self.rules.validate("Username", username)?;
        self.rules.validate("Home folder name", &self.home_folder_name)?;

        with_retry(&self.ctx.retry, "create_user", move || {
            self.try_create_user(username, credential)
        })
        .await
    }

    async fn try_create_user(&self, username: &str, credential: &str) -> AppResult<(User, Folder)> {
        let mut tx = self.ctx.begin().await?;

        if self.user_repo.exists_by_username(&mut tx, username).await? {
            return Err(AppError::conflict(format!(
                "Username '{username}' is already taken"
            )));
        }

        let now = self.ctx.now();
        let user = self
            .user_repo
            .create(
                &mut tx,
                &CreateUser {
                    username: username.to_string(),
                    credential: credential.to_string(),
                },
                now,
            )
            .await?;
        let home = FolderRepository::new()
            .create(
                &mut tx,
                &CreateFolder {
                    owner_id: user.id,
                    parent_id: None,
                    name: self.home_folder_name.clone(),
                },
                now,
            )
            .await?;
        commit(tx).await?;

        info!(
            user_id = %user.id,
            username = %user.username,
            home_folder_id = %home.id,
            "User created"
        );
        Ok((user, home))
    }

    /// Looks up a user by id.
    pub async fn find_by_id(&self, user_id: UserId) -> AppResult<User> {
        let mut conn = self.ctx.db.acquire().await?;
        self.user_repo
            .find_by_id(&mut conn, user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }

    /// Looks up a user by username, ignoring case.
    pub async fn find_by_username(&self, username: &str) -> AppResult<User> {
        let mut conn = self.ctx.db.acquire().await?;
        self.user_repo
            .find_by_username(&mut conn, username)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User '{username}' not found")))
    }

    /// Whether a username is taken, ignoring case.
    pub async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let mut conn = self.ctx.db.acquire().await?;
        self.user_repo.exists_by_username(&mut conn, username).await
    }
}
