use std::fs;
use std::io::{self, Read};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::ExampleAction;
use crate::advisor::{server, Advisor};
use crate::cache::SqliteCache;
use crate::codec;
use crate::config::{AdvisorConfig, AppConfig};
use crate::error::{PromptMakerError, Result};
use crate::model::{
    add_example, add_item, remove_example, remove_item, set_field, update_example, ExampleUpdate,
    ListField, PromptSpec,
};
use crate::render::render;
use crate::session::PromptSession;
use crate::templates::{find_template, templates};

fn open_session(state_dir: Option<PathBuf>, token: Option<&str>) -> Result<PromptSession<SqliteCache>> {
    let config = AppConfig::resolve(state_dir);
    let cache = SqliteCache::open(&config.state_dir)?;
    Ok(PromptSession::open(cache, token))
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Runtime::new()?)
}

/// Load a spec from a `.json`, `.yaml` or `.yml` file
fn read_spec_file(path: &Path) -> Result<PromptSpec> {
    let raw = fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        Ok(serde_yaml::from_str(&raw)?)
    } else {
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Accept either a bare token or a URL with `?s=<token>`
fn token_arg(raw: &str) -> &str {
    if raw.contains('?') || raw.contains('=') {
        codec::token_from_url(raw).unwrap_or(raw)
    } else {
        raw
    }
}

fn print_spec(spec: &PromptSpec, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(spec)?);
    } else {
        println!("{}", render(spec));
    }
    Ok(())
}

pub fn handle_show(
    state_dir: Option<PathBuf>,
    token: Option<String>,
    file: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    if let Some(path) = file {
        return print_spec(&read_spec_file(&path)?, json);
    }
    if let Some(token) = token {
        if let Some(spec) = codec::decode(Some(token_arg(&token))) {
            return print_spec(&spec, json);
        }
        debug!("share token unreadable, showing current prompt");
    }

    let session = open_session(state_dir, None)?;
    print_spec(session.spec(), json)
}

pub fn handle_share(state_dir: Option<PathBuf>, base_url: Option<String>, token_only: bool) -> Result<()> {
    let session = open_session(state_dir, None)?;
    if token_only {
        println!("{}", session.token());
        return Ok(());
    }
    let base = base_url.unwrap_or_else(|| AppConfig::default().share_base_url);
    println!("{}", session.share_url(&base));
    Ok(())
}

pub fn handle_load(state_dir: Option<PathBuf>, token: String) -> Result<()> {
    let spec = codec::try_decode(token_arg(&token)).map_err(|_| PromptMakerError::InvalidToken)?;
    let mut session = open_session(state_dir, None)?;
    session.replace(spec);
    println!("Loaded shared prompt");
    Ok(())
}

pub fn handle_reset(state_dir: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::resolve(state_dir);
    let cache = SqliteCache::open(&config.state_dir)?;
    cache.clear()?;
    let session = PromptSession::open(cache, None);
    debug!(origin = ?session.origin(), "cache cleared");
    println!("Reset prompt to defaults");
    Ok(())
}

pub fn handle_set(state_dir: Option<PathBuf>, field: String, value: String) -> Result<()> {
    let mut session = open_session(state_dir, None)?;
    session.update(|spec| set_field(spec, &field, &value))?;
    println!("Updated {}", field);
    Ok(())
}

pub fn handle_add(state_dir: Option<PathBuf>, field: String, item: String) -> Result<()> {
    let list: ListField = field.parse()?;
    let mut session = open_session(state_dir, None)?;
    let before = list.get(session.spec()).len();
    session.update(|spec| Ok(list.with(spec, add_item(list.get(spec), &item))))?;

    if list.get(session.spec()).len() == before {
        println!("Skipped '{}' (blank or already in {})", item.trim(), field);
    } else {
        println!("Added to {}: {}", field, item.trim());
    }
    Ok(())
}

pub fn handle_remove(state_dir: Option<PathBuf>, field: String, item: String) -> Result<()> {
    let list: ListField = field.parse()?;
    let mut session = open_session(state_dir, None)?;
    let before = list.get(session.spec()).len();
    session.update(|spec| Ok(list.with(spec, remove_item(list.get(spec), &item))))?;

    if list.get(session.spec()).len() == before {
        println!("'{}' not found in {}", item.trim(), field);
    } else {
        println!("Removed from {}: {}", field, item.trim());
    }
    Ok(())
}

/// CLI positions are 1-based
fn zero_based(index: usize, len: usize) -> Result<usize> {
    index
        .checked_sub(1)
        .ok_or(PromptMakerError::ExampleOutOfRange { index, len })
}

pub fn handle_example(state_dir: Option<PathBuf>, action: ExampleAction) -> Result<()> {
    let mut session = open_session(state_dir, None)?;

    match action {
        ExampleAction::Add {
            title,
            input,
            output,
            stdin,
        } => {
            let input = if stdin {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Some(content)
            } else {
                input
            };
            session.update(|spec| {
                let examples = add_example(&spec.examples);
                let last = examples.len() - 1;
                let examples = update_example(
                    &examples,
                    last,
                    ExampleUpdate {
                        title,
                        input,
                        output,
                    },
                )?;
                Ok(PromptSpec {
                    examples,
                    ..spec.clone()
                })
            })?;
            println!("Added example {}", session.spec().examples.len());
        }
        ExampleAction::Remove { index } => {
            let len = session.spec().examples.len();
            let position = zero_based(index, len)?;
            session.update(|spec| {
                Ok(PromptSpec {
                    examples: remove_example(&spec.examples, position)?,
                    ..spec.clone()
                })
            })?;
            println!("Removed example {}", index);
        }
        ExampleAction::Update {
            index,
            title,
            input,
            output,
        } => {
            let len = session.spec().examples.len();
            let position = zero_based(index, len)?;
            session.update(|spec| {
                Ok(PromptSpec {
                    examples: update_example(
                        &spec.examples,
                        position,
                        ExampleUpdate {
                            title,
                            input,
                            output,
                        },
                    )?,
                    ..spec.clone()
                })
            })?;
            println!("Updated example {}", index);
        }
        ExampleAction::List => {
            let examples = &session.spec().examples;
            if examples.is_empty() {
                println!("No examples yet.");
            }
            for (i, example) in examples.iter().enumerate() {
                let title = match example.title.trim() {
                    "" => format!("Example {}", i + 1),
                    title => title.to_string(),
                };
                let marker = if example.is_active() { "" } else { " (no input)" };
                println!("{}. {}{}", i + 1, title, marker);
            }
        }
    }

    Ok(())
}

pub fn handle_templates(json: bool) -> Result<()> {
    let all = templates();
    if json {
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }
    for template in &all {
        println!("{:<20} {} - {}", template.id, template.name, template.description);
    }
    Ok(())
}

pub fn handle_apply(state_dir: Option<PathBuf>, id: String) -> Result<()> {
    let template = find_template(&id)?;
    let mut session = open_session(state_dir, None)?;
    session.apply_patch(&template.seed);
    println!("Applied template '{}' ({})", template.name, template.seed.keys().join(", "));
    Ok(())
}

pub fn handle_improve(state_dir: Option<PathBuf>, endpoint: Option<String>, dry_run: bool) -> Result<()> {
    let config = AdvisorConfig::from_env();
    let advisor = match endpoint {
        Some(url) => Advisor::remote(&url, &config)?,
        None => Advisor::from_config(&config)?,
    };

    let mut session = open_session(state_dir, None)?;
    let suggestion = runtime()?.block_on(advisor.suggest(session.spec()));

    let Some(patch) = suggestion else {
        println!("No suggestion available");
        return Ok(());
    };

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&patch)?);
        return Ok(());
    }

    session.apply_patch(&patch);
    println!("Applied suggestion ({})", patch.keys().join(", "));
    Ok(())
}

pub fn handle_export(state_dir: Option<PathBuf>, output: PathBuf) -> Result<()> {
    let session = open_session(state_dir, None)?;
    session.export(&output)?;
    println!("Wrote {}", output.display());
    Ok(())
}

pub fn handle_schema() -> Result<()> {
    let schema = schemars::schema_for!(PromptSpec);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

pub fn handle_serve(addr: SocketAddr) -> Result<()> {
    let config = AdvisorConfig::from_env();
    let advisor = Advisor::from_config(&config)?;
    info!(advisor_enabled = config.is_enabled(), "starting server");
    runtime()?.block_on(server::serve(addr, advisor))
}
