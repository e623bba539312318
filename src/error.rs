use thiserror::Error;

/// 后端调用错误
///
/// 由 `CatalogBackend` 的实现产生，查询层直接向上传递
#[derive(Debug, Error)]
pub enum BackendError {
    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 后端返回错误响应
    #[error("后端返回错误响应 ({endpoint}): status={status}, code={code:?}, message={message}")]
    BadResponse {
        endpoint: String,
        status: u16,
        code: Option<String>,
        message: String,
    },
    /// 违反数据库约束（非空、外键、唯一等）
    #[error("违反约束 ({code}): {message}")]
    ConstraintViolation { code: String, message: String },
    /// 记录不存在
    #[error("记录不存在: {table} id={id}")]
    NotFound { table: String, id: String },
    /// 未认证或权限不足
    #[error("无权访问 ({endpoint}): {message}")]
    Unauthorized { endpoint: String, message: String },
    /// JSON 解析失败
    #[error("JSON解析失败 ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 题目写入错误
#[derive(Debug, Error)]
pub enum MutationError {
    /// 当前会话不是管理员
    #[error("需要管理员权限")]
    Unauthorized,
    /// 必填字段为空
    #[error("必填字段为空: {field}")]
    MissingField { field: &'static str },
    /// 分类名称无法解析为已知分类
    #[error("分类 '{name}' 不存在")]
    UnknownCategory { name: String },
    /// 违反数据库约束
    #[error("违反约束 ({code}): {message}")]
    ConstraintViolation { code: String, message: String },
    /// 题目不存在
    #[error("题目不存在: {id}")]
    NotFound { id: String },
    /// 传输或后端错误
    #[error("传输错误: {0}")]
    Transport(#[source] BackendError),
}

impl From<BackendError> for MutationError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::ConstraintViolation { code, message } => {
                MutationError::ConstraintViolation { code, message }
            }
            BackendError::NotFound { id, .. } => MutationError::NotFound { id },
            BackendError::Unauthorized { .. } => MutationError::Unauthorized,
            other => MutationError::Transport(other),
        }
    }
}

/// CSV 导入错误
///
/// 只有导致整个文件无法处理的错误才会出现在这里，单行错误记录在导入报告中
#[derive(Debug, Error)]
pub enum ImportError {
    /// 当前会话不是管理员
    #[error("需要管理员权限")]
    Unauthorized,
    /// 读取文件失败
    #[error("无法读取CSV文件 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// CSV 解析失败（仅带引号模式）
    #[error("CSV解析失败: {0}")]
    Parse(#[from] csv::Error),
    /// 无法获取分类列表
    #[error("无法获取分类列表: {0}")]
    CategoryLookup(#[source] BackendError),
}

/// 认证错误
#[derive(Debug, Error)]
pub enum AuthError {
    /// 邮箱或密码为空
    #[error("邮箱和密码不能为空")]
    MissingCredentials,
    /// 登录被拒绝
    #[error("登录失败: {message}")]
    SignInRejected { message: String },
    /// 登录请求失败
    #[error("登录请求失败: {0}")]
    Request(#[source] BackendError),
}

impl From<BackendError> for AuthError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unauthorized { message, .. } => AuthError::SignInRejected { message },
            BackendError::BadResponse {
                status: 400,
                message,
                ..
            } => AuthError::SignInRejected { message },
            other => AuthError::Request(other),
        }
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置值无效
    #[error("配置项 {field} 无效: {value}")]
    InvalidValue { field: &'static str, value: String },
}

// ========== 便捷构造函数 ==========

impl BackendError {
    /// 创建网络请求失败错误
    pub fn request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        BackendError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }

    /// 创建 JSON 解析错误
    pub fn json_parse_failed(endpoint: impl Into<String>, source: serde_json::Error) -> Self {
        BackendError::JsonParseFailed {
            endpoint: endpoint.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_maps_to_mutation_reason() {
        let err: MutationError = BackendError::ConstraintViolation {
            code: "23502".to_string(),
            message: "null value in column \"title\"".to_string(),
        }
        .into();
        assert!(matches!(err, MutationError::ConstraintViolation { ref code, .. } if code == "23502"));

        let err: MutationError = BackendError::NotFound {
            table: "questions".to_string(),
            id: "42".to_string(),
        }
        .into();
        assert!(matches!(err, MutationError::NotFound { ref id } if id == "42"));

        let err: MutationError = BackendError::BadResponse {
            endpoint: "questions".to_string(),
            status: 500,
            code: None,
            message: "boom".to_string(),
        }
        .into();
        assert!(matches!(err, MutationError::Transport(_)));
    }

    #[test]
    fn test_rejected_sign_in_is_not_a_transport_error() {
        let err: AuthError = BackendError::BadResponse {
            endpoint: "auth/v1/token".to_string(),
            status: 400,
            code: Some("invalid_grant".to_string()),
            message: "Invalid login credentials".to_string(),
        }
        .into();
        assert!(matches!(err, AuthError::SignInRejected { .. }));
    }
}
