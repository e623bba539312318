/// 认证服务
///
/// 邮箱密码登录，并按配置的管理员邮箱列表判定身份
use std::sync::Arc;
use tracing::info;

use crate::error::AuthError;
use crate::infrastructure::CatalogBackend;
use crate::models::{AuthContext, Session};

pub struct AuthService<B: CatalogBackend> {
    backend: Arc<B>,
    admin_emails: Vec<String>,
}

impl<B: CatalogBackend> AuthService<B> {
    pub fn new(backend: Arc<B>, admin_emails: Vec<String>) -> Self {
        Self {
            backend,
            admin_emails,
        }
    }

    /// 登录并返回认证上下文
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthContext, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let session = self.backend.sign_in(email.trim(), password).await?;
        let auth = self.classify(session);
        info!("✓ 登录成功: {}", auth.describe());
        Ok(auth)
    }

    /// 已有会话（如配置中的 access token）直接判定身份
    pub fn classify(&self, session: Session) -> AuthContext {
        let is_admin = self
            .admin_emails
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(&session.email));
        if is_admin {
            AuthContext::Admin(session)
        } else {
            AuthContext::Authenticated(session)
        }
    }
}
