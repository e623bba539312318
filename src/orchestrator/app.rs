//! 应用主结构 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：创建后端客户端、建立会话、输出启动信息
//! 2. **命令分发**：把每个命令交给查询 / 写入 / 导入流程
//! 3. **缓存失效**：写入成功后统一让查询缓存失效
//! 4. **结果输出**：返回渲染好的终端文本，由 `main` 打印

use anyhow::{anyhow, bail, Context, Result};
use reqwest::Url;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::cli::{Command, DraftArgs};
use crate::clients::SupabaseClient;
use crate::config::Config;
use crate::infrastructure::{CatalogBackend, QueryCache};
use crate::models::{load_csv_file, AuthContext, QuestionDraft, Session};
use crate::presentation::{
    parse_site_url, render_admin_table, render_category_grid, render_import_report,
    render_question_card, render_question_list, search_query, share_link,
};
use crate::services::{
    filter_questions, AdminService, AuthService, CatalogQuery, CsvDialect, ImportLogWriter,
    SubmitOutcome,
};
use crate::utils::logging::{init_log_file, log_startup, print_import_stats};
use crate::workflow::ImportFlow;

/// 应用主结构
pub struct App<B: CatalogBackend> {
    config: Config,
    auth: AuthContext,
    site: Url,
    query: CatalogQuery<B>,
    admin: AdminService<B>,
    auth_service: AuthService<B>,
}

impl App<SupabaseClient> {
    /// 连接托管存储并初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        let client = SupabaseClient::new(&config).context("创建后端客户端失败")?;
        Self::with_backend(config, Arc::new(client)).await
    }
}

impl<B: CatalogBackend> App<B> {
    /// 使用给定后端初始化
    pub async fn with_backend(config: Config, backend: Arc<B>) -> Result<Self> {
        let site = parse_site_url(&config.site_url)?;
        let cache = Arc::new(QueryCache::new());
        let auth_service = AuthService::new(Arc::clone(&backend), config.admin_emails.clone());
        let auth = establish_session(&config, &auth_service).await?;

        log_startup(&config.backend_url, &auth.describe());

        Ok(Self {
            query: CatalogQuery::new(Arc::clone(&backend), cache),
            admin: AdminService::new(backend),
            auth_service,
            auth,
            site,
            config,
        })
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn query(&self) -> &CatalogQuery<B> {
        &self.query
    }

    /// 执行一条命令，返回要输出的文本
    pub async fn run(&mut self, command: Command) -> Result<String> {
        match command {
            Command::Categories => self.categories().await,
            Command::List {
                category,
                search,
                link,
                expand,
            } => {
                let search = search.or_else(|| link.as_ref().and_then(search_query));
                self.list(category.as_deref(), search.as_deref(), expand)
                    .await
            }
            Command::Show { id } => self.show(&id).await,
            Command::Table => self.table().await,
            Command::Import { file, quoted } => self.import(&file, quoted).await,
            Command::Add(fields) => self.submit(None, fields).await,
            Command::Edit { id, fields } => self.submit(Some(&id), fields).await,
            Command::Delete { id, yes } => self.delete(&id, yes).await,
            Command::Login { email, password } => self.login(email, password).await,
        }
    }

    async fn categories(&self) -> Result<String> {
        let categories = self
            .query
            .cached_categories()
            .await
            .context("Failed to load categories")?;
        Ok(render_category_grid(&categories, None))
    }

    /// 题目列表；指定分类时在列表上方显示分类列表并标出选中的分类
    async fn list(
        &self,
        category: Option<&str>,
        search: Option<&str>,
        expand: bool,
    ) -> Result<String> {
        let category_id = match category {
            Some(name) => {
                let lookup = self
                    .query
                    .category_lookup()
                    .await
                    .context("Failed to load categories")?;
                let id = lookup.resolve(name).ok_or_else(|| {
                    anyhow!(
                        "分类 '{}' 不存在，可用分类: {}",
                        name,
                        lookup.names().join(", ")
                    )
                })?;
                Some(id.to_string())
            }
            None => None,
        };

        let questions = self
            .query
            .cached_questions(category_id.as_deref())
            .await
            .context("Failed to load questions")?;

        let mut output = String::new();
        if let Some(id) = category_id.as_deref() {
            let categories = self
                .query
                .cached_categories()
                .await
                .context("Failed to load categories")?;
            output.push_str(&render_category_grid(&categories, Some(id)));
            output.push('\n');
        }

        let search = search.unwrap_or_default();
        let questions = filter_questions(questions, search);
        output.push_str(&render_question_list(&questions, expand));

        if !search.trim().is_empty() {
            output.push_str(&format!("\n🔗 {}\n", share_link(&self.site, search)));
        }
        Ok(output)
    }

    async fn show(&self, id: &str) -> Result<String> {
        let question = self
            .query
            .get_question(id)
            .await
            .context("Failed to load question")?
            .ok_or_else(|| anyhow!("题目不存在: {}", id))?;
        Ok(render_question_card(&question, true))
    }

    async fn table(&self) -> Result<String> {
        let questions = self
            .query
            .cached_questions(None)
            .await
            .context("Failed to load questions")?;
        Ok(render_admin_table(&questions))
    }

    async fn import(&self, file: &Path, quoted: bool) -> Result<String> {
        let dialect = if quoted {
            CsvDialect::Quoted
        } else {
            self.config.csv_dialect
        };
        let text = load_csv_file(file).await?;

        let log_file = &self.config.output_log_file;
        if let Err(e) = init_log_file(log_file, &file.display().to_string()) {
            warn!("⚠️ 无法初始化日志文件 {}: {}", log_file, e);
        }

        let flow = ImportFlow::new(self.query.clone(), self.admin.clone())
            .with_log_writer(ImportLogWriter::new(log_file.clone()));
        let report = flow
            .run(&self.auth, &text, dialect)
            .await
            .context("Failed to process CSV file")?;

        print_import_stats(&report, log_file);
        Ok(render_import_report(&report))
    }

    async fn submit(&self, editing: Option<&str>, fields: DraftArgs) -> Result<String> {
        let base = match editing {
            Some(id) => {
                let existing = self
                    .query
                    .get_question(id)
                    .await
                    .context("Failed to load question")?
                    .ok_or_else(|| anyhow!("题目不存在: {}", id))?;
                QuestionDraft::from_question(&existing)
            }
            None => QuestionDraft::default(),
        };
        let draft = fields.apply(base).await?;

        let lookup = self
            .query
            .category_lookup()
            .await
            .context("Failed to load categories")?;
        let outcome = self
            .admin
            .submit_draft(&self.auth, draft, &lookup, editing)
            .await?;
        self.query.invalidate().await;

        let heading = match &outcome {
            SubmitOutcome::Created(_) => "Question added",
            SubmitOutcome::Updated(_) => "Question updated",
        };
        Ok(format!(
            "{}\n\n{}",
            heading,
            render_question_card(outcome.question(), true)
        ))
    }

    async fn delete(&self, id: &str, confirmed: bool) -> Result<String> {
        if !confirmed {
            bail!("删除题目 {} 需要加上 --yes 确认", id);
        }
        self.admin.delete_question(&self.auth, id).await?;
        self.query.invalidate().await;
        Ok(format!("Question deleted: {}\n", id))
    }

    async fn login(&mut self, email: Option<String>, password: Option<String>) -> Result<String> {
        let email = email
            .or_else(|| self.config.user_email.clone())
            .unwrap_or_default();
        let password = password
            .or_else(|| self.config.user_password.clone())
            .unwrap_or_default();

        self.auth = self.auth_service.sign_in(&email, &password).await?;
        let token = self
            .auth
            .session()
            .map(|s| s.access_token.clone())
            .unwrap_or_default();

        Ok(format!(
            "Signed in as {}\nexport CATALOG_ACCESS_TOKEN={}\nexport CATALOG_USER_EMAIL={}\n",
            self.auth.describe(),
            token,
            email.trim()
        ))
    }
}

/// 建立会话
///
/// - 配置了 access token：直接使用，不再登录
/// - 配置了邮箱和密码：登录，失败时启动失败
/// - 都没有：匿名
async fn establish_session<B: CatalogBackend>(
    config: &Config,
    auth_service: &AuthService<B>,
) -> Result<AuthContext> {
    if let Some(token) = &config.access_token {
        let email = config.user_email.clone().unwrap_or_default();
        if email.is_empty() {
            warn!("⚠️ 设置了 access token 但没有设置邮箱，无法判定管理员身份");
        }
        return Ok(auth_service.classify(Session::new(token.clone(), email)));
    }

    match (&config.user_email, &config.user_password) {
        (Some(email), Some(password)) => {
            info!("🔑 正在登录: {}", email);
            auth_service
                .sign_in(email, password)
                .await
                .context("登录失败")
        }
        _ => Ok(AuthContext::Anonymous),
    }
}
