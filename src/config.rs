use crate::error::ConfigError;
use crate::services::csv_importer::CsvDialect;
use serde::Deserialize;
use std::path::Path;

/// 默认配置文件名（当前目录）
pub const DEFAULT_CONFIG_FILE: &str = "catalog.toml";

/// 程序配置
///
/// 加载顺序：默认值 → TOML 配置文件 → 环境变量
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 托管存储地址
    pub backend_url: String,
    /// 匿名访问 key
    pub anon_key: String,
    /// 已有会话的 access token（设置后跳过登录）
    pub access_token: Option<String>,
    /// 登录邮箱
    pub user_email: Option<String>,
    /// 登录密码
    pub user_password: Option<String>,
    /// 管理员邮箱列表
    pub admin_emails: Vec<String>,
    /// 浏览页面地址，用于生成带 `search` 参数的分享链接
    pub site_url: String,
    /// 输出日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// CSV 解析方式
    pub csv_dialect: CsvDialect,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:54321".to_string(),
            anon_key: String::new(),
            access_token: None,
            user_email: None,
            user_password: None,
            admin_emails: Vec::new(),
            site_url: "http://localhost:8080/".to_string(),
            output_log_file: "import_log.txt".to_string(),
            verbose_logging: false,
            csv_dialect: CsvDialect::Naive,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// 只从环境变量加载
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// 加载配置文件（不存在时使用默认值）并应用环境变量
    ///
    /// 显式指定的文件不存在时报错，默认文件不存在时忽略
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// 从 TOML 文件加载
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
            path: origin.to_string(),
            source,
        })
    }

    /// 应用环境变量覆盖
    ///
    /// `lookup` 返回变量值，便于测试时替换真实环境
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CATALOG_BACKEND_URL") {
            self.backend_url = v;
        }
        if let Some(v) = lookup("CATALOG_ANON_KEY") {
            self.anon_key = v;
        }
        if let Some(v) = lookup("CATALOG_ACCESS_TOKEN") {
            self.access_token = Some(v).filter(|s| !s.is_empty());
        }
        if let Some(v) = lookup("CATALOG_USER_EMAIL") {
            self.user_email = Some(v).filter(|s| !s.is_empty());
        }
        if let Some(v) = lookup("CATALOG_USER_PASSWORD") {
            self.user_password = Some(v).filter(|s| !s.is_empty());
        }
        if let Some(v) = lookup("CATALOG_ADMIN_EMAILS") {
            self.admin_emails = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(v) = lookup("CATALOG_SITE_URL") {
            self.site_url = v;
        }
        if let Some(v) = lookup("OUTPUT_LOG_FILE") {
            self.output_log_file = v;
        }
        if let Some(v) = lookup("VERBOSE_LOGGING") {
            self.verbose_logging = parse_var("VERBOSE_LOGGING", &v, "bool")?;
        }
        if let Some(v) = lookup("CSV_DIALECT") {
            self.csv_dialect = match v.as_str() {
                "naive" => CsvDialect::Naive,
                "quoted" => CsvDialect::Quoted,
                _ => {
                    return Err(ConfigError::EnvVarParseFailed {
                        var_name: "CSV_DIALECT".to_string(),
                        value: v,
                        expected_type: "naive | quoted".to_string(),
                    })
                }
            };
        }
        if let Some(v) = lookup("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", &v, "u64")?;
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.backend_url.starts_with("http://") || self.backend_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "backend_url",
                value: self.backend_url.clone(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(
    var_name: &str,
    value: &str,
    expected_type: &str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::EnvVarParseFailed {
        var_name: var_name.to_string(),
        value: value.to_string(),
        expected_type: expected_type.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_toml_then_env_overrides() {
        let config = Config::from_toml_str(
            r#"
            backend_url = "https://demo.supabase.co"
            anon_key = "anon"
            admin_emails = ["root@example.com"]
            csv_dialect = "quoted"
            "#,
            "catalog.toml",
        )
        .unwrap();
        assert_eq!(config.csv_dialect, CsvDialect::Quoted);
        assert_eq!(config.request_timeout_secs, 30);

        let config = config
            .with_overrides(env(&[
                ("CATALOG_ADMIN_EMAILS", "a@example.com, b@example.com"),
                ("REQUEST_TIMEOUT_SECS", "5"),
            ]))
            .unwrap();
        assert_eq!(config.backend_url, "https://demo.supabase.co");
        assert_eq!(config.admin_emails.len(), 2);
        assert_eq!(config.admin_emails[1], "b@example.com");
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_bad_env_value_is_reported() {
        let err = Config::default()
            .with_overrides(env(&[("VERBOSE_LOGGING", "sometimes")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarParseFailed { ref var_name, .. } if var_name == "VERBOSE_LOGGING"));
    }

    #[test]
    fn test_backend_url_must_be_http() {
        let err = Config::default()
            .with_overrides(env(&[("CATALOG_BACKEND_URL", "localhost:54321")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "backend_url", .. }));
    }

    #[test]
    fn test_invalid_toml_reports_origin() {
        let err = Config::from_toml_str("backend_url = [", "broken.toml").unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }
}
