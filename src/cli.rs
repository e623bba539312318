//! 命令行定义

use clap::{Args, Parser, Subcommand};
use reqwest::Url;
use std::path::PathBuf;

use crate::error::ImportError;
use crate::models::{load_text_file, Difficulty, QuestionDraft};

#[derive(Parser, Debug)]
#[command(name = "question_catalog")]
#[command(author, version, about = "Interview question catalog and admin tool")]
#[command(long_about = r#"
Browse an interview-question catalog and manage it as an admin.

Configuration is loaded from (later wins):
1. built-in defaults
2. ./catalog.toml or --config <path>
3. CATALOG_* environment variables

Example:
  question_catalog categories
  question_catalog list --category React --search hooks --expand
  question_catalog import questions.csv
  question_catalog delete q-42 --yes
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List categories with their question counts
    Categories,

    /// List questions
    List {
        /// Only questions in this category (display name)
        #[arg(short, long, value_name = "NAME")]
        category: Option<String>,

        /// Case-insensitive search over title, description and answer
        #[arg(short, long, value_name = "QUERY")]
        search: Option<String>,

        /// Open a shared link; its search term is used when --search is not given
        #[arg(long, value_name = "URL")]
        link: Option<Url>,

        /// Show answers
        #[arg(short, long)]
        expand: bool,
    },

    /// Show one question with its answer
    Show { id: String },

    /// Admin table of all questions
    Table,

    /// Bulk import questions from a CSV file
    Import {
        file: PathBuf,

        /// Parse quoted fields instead of splitting on every comma
        #[arg(long)]
        quoted: bool,
    },

    /// Create a question
    Add(DraftArgs),

    /// Edit a question; omitted fields keep their current value
    Edit {
        id: String,

        #[command(flatten)]
        fields: DraftArgs,
    },

    /// Delete a question
    Delete {
        id: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Sign in and print the session token
    Login {
        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        password: Option<String>,
    },
}

/// 表单字段
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Answer text, may contain ``` fenced code blocks
    #[arg(long, conflicts_with = "answer_file")]
    pub answer: Option<String>,

    /// Read the answer from a file
    #[arg(long, value_name = "PATH")]
    pub answer_file: Option<PathBuf>,

    /// Category display name (must already exist)
    #[arg(long)]
    pub category: Option<String>,

    /// Easy, Medium or Hard
    #[arg(long)]
    pub difficulty: Option<String>,

    #[arg(long, conflicts_with = "code_file")]
    pub code_example: Option<String>,

    /// Read the code example from a file
    #[arg(long, value_name = "PATH")]
    pub code_file: Option<PathBuf>,
}

impl DraftArgs {
    /// 把命令行给出的字段覆盖到草稿上
    pub async fn apply(self, mut draft: QuestionDraft) -> Result<QuestionDraft, ImportError> {
        if let Some(v) = self.title {
            draft.title = v;
        }
        if let Some(v) = self.description {
            draft.description = v;
        }
        if let Some(path) = self.answer_file {
            draft.answer = load_text_file(&path).await?;
        } else if let Some(v) = self.answer {
            draft.answer = v;
        }
        if let Some(v) = self.category {
            draft.category = v;
        }
        if let Some(v) = self.difficulty {
            draft.difficulty = Difficulty::parse(&v);
        }
        if let Some(path) = self.code_file {
            draft.code_example = Some(load_text_file(&path).await?);
        } else if let Some(v) = self.code_example {
            draft.code_example = Some(v);
        }
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_with_flags() {
        let cli = Cli::parse_from([
            "question_catalog",
            "-vv",
            "list",
            "--category",
            "React",
            "--search",
            "hooks",
            "--expand",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.command,
            Command::List {
                category: Some("React".to_string()),
                search: Some("hooks".to_string()),
                link: None,
                expand: true,
            }
        );
    }

    #[test]
    fn test_parse_edit_fields() {
        let cli = Cli::parse_from([
            "question_catalog",
            "edit",
            "q-3",
            "--title",
            "New title",
            "--difficulty",
            "Hard",
        ]);
        let Command::Edit { id, fields } = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(id, "q-3");
        assert_eq!(fields.title.as_deref(), Some("New title"));
        assert!(fields.answer.is_none());
    }

    #[tokio::test]
    async fn test_apply_keeps_unset_fields() {
        let base = QuestionDraft {
            title: "Old".to_string(),
            description: "Desc".to_string(),
            answer: "Ans".to_string(),
            category: "CSS".to_string(),
            difficulty: Difficulty::Easy,
            code_example: None,
        };
        let args = DraftArgs {
            title: Some("New".to_string()),
            difficulty: Some("Hard".to_string()),
            ..Default::default()
        };

        let draft = args.apply(base).await.unwrap();
        assert_eq!(draft.title, "New");
        assert_eq!(draft.description, "Desc");
        assert_eq!(draft.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_answer_and_answer_file_conflict() {
        let result = Cli::try_parse_from([
            "question_catalog",
            "add",
            "--answer",
            "x",
            "--answer-file",
            "a.md",
        ]);
        assert!(result.is_err());
    }
}
