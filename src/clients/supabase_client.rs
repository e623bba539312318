/// 托管存储 REST 客户端
///
/// 通过 PostgREST 风格的接口读写 `categories` / `questions` 两张表，
/// 通过密码模式的 token 接口登录
use crate::config::Config;
use crate::error::BackendError;
use crate::infrastructure::CatalogBackend;
use crate::models::question::deserialize_opt_id;
use crate::models::{Category, NewQuestion, Question, QuestionRecord, Session};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// 题目查询时附带分类名称
const QUESTION_SELECT: &str = "*,categories(name)";

/// 托管存储客户端
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| BackendError::request_failed("client", e))?;

        Ok(Self {
            http,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
        })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// 构建请求，未登录时使用匿名 key 作为 Bearer token
    fn request(&self, method: Method, url: &str, token: Option<&str>) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token.unwrap_or(&self.anon_key))
            .header("Accept", "application/json")
    }

    /// 发送请求并解析 JSON 响应
    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        builder: RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = builder
            .send()
            .await
            .map_err(|e| BackendError::request_failed(endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::request_failed(endpoint, e))?;

        debug!("{} 响应: status={}, 长度={}", endpoint, status, body.len());

        if !status.is_success() {
            let err = classify_error(endpoint, status.as_u16(), &body);
            warn!("后端请求失败: {}", err);
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| BackendError::json_parse_failed(endpoint, e))
    }

    /// 取写入接口返回的第一行
    fn first_row(
        endpoint: &str,
        id: Option<&str>,
        rows: Vec<QuestionRecord>,
    ) -> Result<Question, BackendError> {
        match (rows.into_iter().next(), id) {
            (Some(row), _) => Ok(row.into_question()),
            (None, Some(id)) => Err(BackendError::NotFound {
                table: "questions".to_string(),
                id: id.to_string(),
            }),
            (None, None) => Err(BackendError::BadResponse {
                endpoint: endpoint.to_string(),
                status: 200,
                code: None,
                message: "写入成功但没有返回记录".to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CategoryIdRow {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    category_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    user: Option<TokenUser>,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    #[serde(default)]
    email: Option<String>,
}

/// 错误响应体
///
/// PostgREST 使用 `code`/`message`，认证接口使用 `error`/`error_description`/`msg`
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

/// 将非 2xx 响应归类为具体的后端错误
///
/// - `23xxx`：违反约束
/// - 401 / 403 / `42501`：无权访问
/// - 其他：错误响应
pub fn classify_error(endpoint: &str, status: u16, body: &str) -> BackendError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    let code = parsed.code.as_ref().map(|c| match c {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    });
    let message = parsed
        .message
        .or(parsed.error_description)
        .or(parsed.msg)
        .or(parsed.error)
        .unwrap_or_else(|| body.trim().to_string());

    match code.as_deref() {
        Some(c) if c.starts_with("23") => BackendError::ConstraintViolation {
            code: c.to_string(),
            message,
        },
        Some("42501") | Some("PGRST301") => BackendError::Unauthorized {
            endpoint: endpoint.to_string(),
            message,
        },
        _ if status == 401 || status == 403 => BackendError::Unauthorized {
            endpoint: endpoint.to_string(),
            message,
        },
        _ => BackendError::BadResponse {
            endpoint: endpoint.to_string(),
            status,
            code,
            message,
        },
    }
}

#[async_trait]
impl CatalogBackend for SupabaseClient {
    async fn fetch_categories(&self) -> Result<Vec<Category>, BackendError> {
        let url = self.rest_url("categories");
        let builder = self
            .request(Method::GET, &url, None)
            .query(&[("select", "id,name,logo_url")]);

        self.send_json("categories", builder).await
    }

    async fn fetch_question_category_ids(&self) -> Result<Vec<String>, BackendError> {
        let url = self.rest_url("questions");
        let builder = self
            .request(Method::GET, &url, None)
            .query(&[("select", "category_id")]);

        let rows: Vec<CategoryIdRow> = self.send_json("questions", builder).await?;
        Ok(rows.into_iter().filter_map(|r| r.category_id).collect())
    }

    async fn fetch_questions(
        &self,
        category_id: Option<&str>,
    ) -> Result<Vec<Question>, BackendError> {
        let url = self.rest_url("questions");
        let mut builder = self
            .request(Method::GET, &url, None)
            .query(&[("select", QUESTION_SELECT)]);
        if let Some(id) = category_id {
            builder = builder.query(&[("category_id", format!("eq.{}", id))]);
        }

        let rows: Vec<QuestionRecord> = self.send_json("questions", builder).await?;
        Ok(rows.into_iter().map(QuestionRecord::into_question).collect())
    }

    async fn fetch_question(&self, id: &str) -> Result<Option<Question>, BackendError> {
        let url = self.rest_url("questions");
        let builder = self
            .request(Method::GET, &url, None)
            .query(&[("select", QUESTION_SELECT.to_string()), ("id", format!("eq.{}", id))]);

        let rows: Vec<QuestionRecord> = self.send_json("questions", builder).await?;
        Ok(rows.into_iter().next().map(QuestionRecord::into_question))
    }

    async fn insert_question(
        &self,
        session: &Session,
        question: &NewQuestion,
    ) -> Result<Question, BackendError> {
        let url = self.rest_url("questions");
        let builder = self
            .request(Method::POST, &url, Some(&session.access_token))
            .header("Prefer", "return=representation")
            .query(&[("select", QUESTION_SELECT)])
            .json(question);

        debug!("新建题目: {}", question.title);
        let rows: Vec<QuestionRecord> = self.send_json("questions", builder).await?;
        Self::first_row("questions", None, rows)
    }

    async fn update_question(
        &self,
        session: &Session,
        id: &str,
        question: &NewQuestion,
    ) -> Result<Question, BackendError> {
        let url = self.rest_url("questions");
        let builder = self
            .request(Method::PATCH, &url, Some(&session.access_token))
            .header("Prefer", "return=representation")
            .query(&[("select", QUESTION_SELECT.to_string()), ("id", format!("eq.{}", id))])
            .json(question);

        debug!("更新题目 {}: {}", id, question.title);
        let rows: Vec<QuestionRecord> = self.send_json("questions", builder).await?;
        Self::first_row("questions", Some(id), rows)
    }

    async fn delete_question(&self, session: &Session, id: &str) -> Result<(), BackendError> {
        let url = self.rest_url("questions");
        let builder = self
            .request(Method::DELETE, &url, Some(&session.access_token))
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{}", id))]);

        debug!("删除题目: {}", id);
        let rows: Vec<Value> = self.send_json("questions", builder).await?;
        if rows.is_empty() {
            return Err(BackendError::NotFound {
                table: "questions".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let url = self.auth_url("token");
        let builder = self
            .request(Method::POST, &url, None)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));

        let token: TokenResponse = self.send_json("auth/v1/token", builder).await?;
        let email = token
            .user
            .and_then(|u| u.email)
            .unwrap_or_else(|| email.to_string());

        Ok(Session::new(token.access_token, email))
    }
}
