//! Command execution handlers
//!
//! Config-only commands are plain functions over [`Config`] returning the
//! message to print; [`dispatch`] loads the file, runs the handler and
//! saves. Commands that touch the database connect through
//! [`PostgresExecutor`] and open the result grid.

use crate::clipboard::Clipboard;
use crate::commands::cli::{Cli, Command, ListKind};
use crate::config::{Config, ConnectionProfile};
use crate::db::postgres::PostgresExecutor;
use crate::db::{DbType, QueryExecutor, QueryResults};
use crate::error::{CommandError, ConfigError, Result};
use crate::grid::GridViewer;
use crate::keymap::KeyMap;
use crate::sql::{format_sql, FormatOptions};
use crate::ui::spinner::Spinner;
use crate::ui::terminal;
use crate::ui::theme::{content_style, Theme};
use std::path::Path;

const DEFAULT_EDITOR: &str = "vim";
const ITEM_MARKER: &str = "◆";

/// Run a parsed command line
pub async fn dispatch(cli: Cli) -> Result<()> {
    let path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let mut config = Config::load(&path)?;
    log::debug!("loaded config from {}", path.display());

    match cli.command {
        Command::Init {
            name,
            db_type,
            conn_string,
        } => {
            let db_type = DbType::parse(&db_type)
                .ok_or_else(|| CommandError::UnsupportedDbType(db_type.clone()))?;
            let executor = PostgresExecutor::connect(&conn_string).await?;
            executor.ping().await?;
            let message = init_connection(&mut config, &name, db_type, &conn_string);
            config.save(&path)?;
            println!("{message}");
        }
        Command::Switch { name } => {
            let message = switch_connection(&mut config, &name)?;
            config.save(&path)?;
            println!("{message}");
        }
        Command::Add { name, sql } => {
            let message = add_query(&mut config, &name, &sql)?;
            config.save(&path)?;
            println!("{message}");
        }
        Command::Remove { selector } => {
            let message = remove_query(&mut config, &selector)?;
            config.save(&path)?;
            println!("{message}");
        }
        Command::Run { selector, edit } => {
            let (name, mut sql) = {
                let (name, query) = config
                    .current()?
                    .find_query(&selector)
                    .ok_or_else(|| ConfigError::QueryNotFound(selector.clone()))?;
                (name.to_string(), query.sql.clone())
            };
            if edit && let Some(edited) = edit_sql(&name, &sql).await? {
                config.current_mut()?.add_query(&name, &edited);
                config.save(&path)?;
                sql = edited;
            }
            let results = fetch(&connect(config.current()?).await?, &sql).await?;
            browse(&config, results, Some((name.as_str(), sql.as_str()))).await?;
        }
        Command::Explore { table: None, .. } => {
            println!("No table specified. Available tables:");
            print_tables(&config).await?;
        }
        Command::Explore {
            table: Some(table),
            limit,
        } => {
            let sql = explore_sql(&table, limit.unwrap_or(config.settings.row_limit))?;
            let results = fetch(&connect(config.current()?).await?, &sql).await?;
            browse(&config, results, Some((table.as_str(), sql.as_str()))).await?;
        }
        Command::List { kind } => match kind {
            ListKind::Queries => println!("{}", render_query_listing(&config, &Theme::default())?),
            ListKind::Connections => println!("{}", render_connection_listing(&config)),
            ListKind::Tables => print_tables(&config).await?,
        },
        Command::Status => {
            let theme = Theme::default();
            let profile = config.current()?;
            println!(
                "{} {}/{}",
                content_style(theme.query_title).apply("✓ Now using:"),
                profile.db_type.name(),
                config.current_connection
            );
        }
        Command::Edit => open_editor(&path).await?,
    }

    Ok(())
}

/// Store a connection (keeping its saved queries) and make it current
pub fn init_connection(
    config: &mut Config,
    name: &str,
    db_type: DbType,
    conn_string: &str,
) -> String {
    let profile = config
        .connections
        .entry(name.to_string())
        .or_insert_with(|| ConnectionProfile::new(db_type, conn_string));
    profile.db_type = db_type;
    profile.conn_string = conn_string.to_string();
    config.current_connection = name.to_string();
    format!("connected to: {}/{}", db_type.name(), name)
}

pub fn switch_connection(config: &mut Config, name: &str) -> Result<String> {
    config.switch(name)?;
    let profile = config.current()?;
    Ok(format!("connected to: {}/{}", profile.db_type.name(), name))
}

pub fn add_query(config: &mut Config, name: &str, sql: &str) -> Result<String> {
    if name.trim().is_empty() {
        return Err(CommandError::InvalidArgument("query name is empty".to_string()).into());
    }
    let id = config.current_mut()?.add_query(name, sql);
    Ok(format!("saved query {id}/{name}"))
}

pub fn remove_query(config: &mut Config, selector: &str) -> Result<String> {
    let name = config.current_mut()?.remove_query(selector)?;
    Ok(format!("removed query {name}"))
}

/// `SELECT * FROM <table> LIMIT <n>`, rejecting anything that is not a
/// plain, optionally schema-qualified, identifier
pub fn explore_sql(table: &str, limit: usize) -> Result<String> {
    let valid = !table.is_empty()
        && !table.starts_with('.')
        && !table.ends_with('.')
        && table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if !valid {
        return Err(CommandError::InvalidArgument(format!("invalid table name '{table}'")).into());
    }
    Ok(format!("SELECT * FROM {table} LIMIT {limit}"))
}

/// Saved queries of the current connection, ordered by id, each as a
/// `◆ id/name` title over the highlighted SQL
pub fn render_query_listing(config: &Config, theme: &Theme) -> Result<String> {
    let profile = config.current()?;
    let mut queries: Vec<_> = profile.queries.iter().collect();
    queries.sort_by_key(|(_, q)| q.id);

    let options = FormatOptions::with_width(config.settings.format_width);
    let title = content_style(theme.query_title);
    let blocks: Vec<String> = queries
        .into_iter()
        .map(|(name, query)| {
            let heading = title.apply(format!("{ITEM_MARKER} {}/{}", query.id, name));
            let body = format_sql(&query.sql, &options).to_ansi(theme, "  ");
            format!("{heading}\n{body}")
        })
        .collect();
    Ok(blocks.join("\n\n"))
}

/// `◆ name (conn string)` per connection, current one marked with `*`
pub fn render_connection_listing(config: &Config) -> String {
    config
        .connections
        .iter()
        .map(|(name, profile)| {
            let marker = if *name == config.current_connection {
                "*"
            } else {
                " "
            };
            format!("{marker}{ITEM_MARKER} {name} ({})", profile.conn_string)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

async fn connect(profile: &ConnectionProfile) -> Result<PostgresExecutor> {
    match profile.db_type {
        DbType::Postgres => Ok(PostgresExecutor::connect(&profile.conn_string).await?),
    }
}

/// Execute `sql` with the spinner running
pub async fn fetch<E: QueryExecutor>(executor: &E, sql: &str) -> Result<QueryResults> {
    let spinner = Spinner::start();
    let result = executor.execute(sql).await;
    spinner.stop().await;
    Ok(result?)
}

async fn print_tables(config: &Config) -> Result<()> {
    let profile = config.current()?;
    let results = fetch(&connect(profile).await?, profile.db_type.list_tables_sql()).await?;
    for row in &results.rows {
        if let Some(cell) = row.values.first() {
            println!("{ITEM_MARKER} {}", cell.display_string());
        }
    }
    Ok(())
}

/// Open the result grid until the user quits
async fn browse(config: &Config, results: QueryResults, query: Option<(&str, &str)>) -> Result<()> {
    let (keymap, warnings) = KeyMap::from_config(&config.keybindings);
    for warning in &warnings {
        log::warn!("{warning}");
        eprintln!("warning: {warning}");
    }

    let elapsed = results.execution_time;
    let mut viewer =
        GridViewer::new(results, elapsed).with_format_width(config.settings.format_width);
    if let Some((name, sql)) = query {
        viewer = viewer.with_query(name, sql);
    }
    terminal::run(viewer, &keymap, &Clipboard::new()).await
}

fn editor_command() -> String {
    std::env::var("EDITOR")
        .ok()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

async fn open_editor(path: &Path) -> Result<()> {
    let editor = editor_command();
    let status = tokio::process::Command::new(&editor)
        .arg(path)
        .status()
        .await
        .map_err(|e| CommandError::EditorFailed(format!("{editor}: {e}")))?;
    if !status.success() {
        return Err(CommandError::EditorFailed(format!("{editor} exited with {status}")).into());
    }
    Ok(())
}

/// Let the user edit `sql` in `$EDITOR`; `None` when unchanged or emptied
async fn edit_sql(name: &str, sql: &str) -> Result<Option<String>> {
    let path = std::env::temp_dir().join(format!("pam-{}-{name}.sql", std::process::id()));
    tokio::fs::write(&path, sql).await?;
    let edited = match open_editor(&path).await {
        Ok(()) => tokio::fs::read_to_string(&path).await,
        Err(e) => {
            let _ = tokio::fs::remove_file(&path).await;
            return Err(e);
        }
    };
    let _ = tokio::fs::remove_file(&path).await;

    let edited = edited?.trim().to_string();
    Ok((!edited.is_empty() && edited != sql.trim()).then_some(edited))
}
