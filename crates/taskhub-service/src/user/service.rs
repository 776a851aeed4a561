//! Account registration, sign-in, and the current user's own profile.

use std::sync::Arc;

use tracing::{info, warn};

use taskhub_auth::jwt::JwtEncoder;
use taskhub_auth::password::PasswordHasher;
use taskhub_core::context::{Principal, RequestContext, ROLE_ID_USER, SYSTEM_USER_ID};
use taskhub_core::error::{AppError, ErrorKind};
use taskhub_core::result::AppResult;
use taskhub_core::traits::clock::Clock;
use taskhub_entity::record::FilterParam;
use taskhub_entity::user::{
    ChangePasswordParam, CreateUserParam, UpdateUserParam, User, UserLoginRequest,
    UserLoginResponse, UserParam,
};

use crate::entity::EntityService;
use crate::policy::UserPolicy;

/// User accounts: the generic operations plus the credential flows.
#[derive(Debug, Clone)]
pub struct UserService {
    /// Generic user operations.
    users: EntityService<User, UserPolicy>,
    /// Password hasher.
    hasher: PasswordHasher,
    /// Access token issuer.
    encoder: JwtEncoder,
    /// Token issue time source.
    clock: Arc<dyn Clock>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: EntityService<User, UserPolicy>,
        hasher: PasswordHasher,
        encoder: JwtEncoder,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            encoder,
            clock,
        }
    }

    /// The generic, policy-checked user operations.
    pub fn users(&self) -> &EntityService<User, UserPolicy> {
        &self.users
    }

    /// Self-registration. No principal is required.
    pub async fn register(&self, ctx: &RequestContext, mut param: CreateUserParam) -> AppResult<User> {
        if param.email.trim().is_empty() {
            return Err(AppError::validation("Email is required"));
        }
        if param.password.is_empty() {
            return Err(AppError::validation("Password is required"));
        }
        if param.password != param.confirm_password {
            return Err(AppError::validation("Password does not match"));
        }

        // Soft-deleted accounts keep their email reserved.
        match self.users.store().get(ctx, &UserParam::by_email(&param.email)).await {
            Ok(_) => return Err(AppError::conflict("Email already exists")),
            Err(e) if e.is(ErrorKind::RecordNotFound) => {}
            Err(e) => return Err(e),
        }

        param.password = self.hasher.hash_password(&param.password)?;
        param.confirm_password.clear();
        param.role_id = Some(ROLE_ID_USER);
        param.created_by = Some(SYSTEM_USER_ID.to_string());

        let user = self.users.store().create(ctx, &param).await?;
        info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Verifies credentials and issues an access token.
    pub async fn sign_in(
        &self,
        ctx: &RequestContext,
        request: UserLoginRequest,
    ) -> AppResult<UserLoginResponse> {
        if request.email.is_empty() {
            return Err(AppError::bad_request("Email is required"));
        }
        if request.password.is_empty() {
            return Err(AppError::bad_request("Password is required"));
        }

        let mut filter = UserParam::by_email(&request.email);
        filter.query_option.is_active = true;
        let user = self.users.store().get(ctx, &filter).await.map_err(|e| {
            if e.is(ErrorKind::RecordNotFound) {
                AppError::not_found("Email not found")
            } else {
                e
            }
        })?;

        if !self.hasher.verify_password(&request.password, &user.password)? {
            warn!(user_id = user.id, "Sign-in with wrong password");
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        info!(user_id = user.id, "User signed in");
        self.login_response(&user)
    }

    /// Issues a fresh token for the current principal, picking up role changes.
    pub async fn refresh_token(&self, ctx: &RequestContext) -> AppResult<UserLoginResponse> {
        let user = self.profile(ctx).await?;
        self.login_response(&user)
    }

    /// The current user's account.
    pub async fn profile(&self, ctx: &RequestContext) -> AppResult<User> {
        let principal = *ctx.principal()?;
        self.users.get(ctx, UserParam::by_id(principal.user_id)).await
    }

    /// Updates the current user's own account and returns it.
    ///
    /// Role and password cannot be changed through this path.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        mut update: UpdateUserParam,
    ) -> AppResult<User> {
        let principal = *ctx.principal()?;
        update.role_id = None;
        update.password = None;

        self.users
            .update(ctx, update, UserParam::by_id(principal.user_id))
            .await?;
        info!(user_id = principal.user_id, "Profile updated");
        self.profile(ctx).await
    }

    /// Soft-deletes the current user's account.
    pub async fn delete_self(&self, ctx: &RequestContext) -> AppResult<()> {
        let principal = *ctx.principal()?;
        self.users
            .delete(ctx, UserParam::by_id(principal.user_id))
            .await?;
        info!(user_id = principal.user_id, "Account deleted by owner");
        Ok(())
    }

    /// Changes the current user's password after checking the old one.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        param: ChangePasswordParam,
    ) -> AppResult<()> {
        if param.new_password.is_empty() {
            return Err(AppError::validation("New password is required"));
        }
        if param.new_password != param.confirm_password {
            return Err(AppError::validation("Password does not match"));
        }

        let user = self.profile(ctx).await?;
        if !self.hasher.verify_password(&param.old_password, &user.password)? {
            return Err(AppError::unauthorized("Current password is incorrect"));
        }

        let update = UpdateUserParam {
            password: Some(self.hasher.hash_password(&param.new_password)?),
            ..Default::default()
        };
        self.users
            .update(ctx, update, UserParam::by_id(user.id))
            .await?;

        info!(user_id = user.id, "Password changed");
        Ok(())
    }

    fn login_response(&self, user: &User) -> AppResult<UserLoginResponse> {
        let principal = Principal::new(user.id, user.role_id);
        let token = self
            .encoder
            .generate_access_token(&principal, self.clock.now())?;

        Ok(UserLoginResponse {
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            access_token: token.token,
        })
    }
}
