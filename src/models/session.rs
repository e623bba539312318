//! 会话与认证上下文
//!
//! 认证状态以显式参数的形式传给需要它的服务，不存在全局会话

use serde::Deserialize;

/// 已登录会话
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub email: String,
}

impl Session {
    pub fn new(access_token: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            email: email.into(),
        }
    }
}

/// 认证上下文：匿名 / 已登录 / 管理员
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthContext {
    #[default]
    Anonymous,
    Authenticated(Session),
    Admin(Session),
}

impl AuthContext {
    /// 管理员会话（非管理员返回 None）
    pub fn admin_session(&self) -> Option<&Session> {
        match self {
            AuthContext::Admin(session) => Some(session),
            _ => None,
        }
    }

    /// 当前会话（匿名返回 None）
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthContext::Anonymous => None,
            AuthContext::Authenticated(session) | AuthContext::Admin(session) => Some(session),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, AuthContext::Admin(_))
    }

    /// 用于日志显示的身份描述
    pub fn describe(&self) -> String {
        match self {
            AuthContext::Anonymous => "匿名".to_string(),
            AuthContext::Authenticated(s) => format!("用户 {}", s.email),
            AuthContext::Admin(s) => format!("管理员 {}", s.email),
        }
    }
}
