//! Command dispatch and handlers

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use serde_json::Value;
use tracing::debug;

use crate::application::{ApplicationError, IoResultExt};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::render;
use crate::config::{self, Settings};
use crate::domain::{build_forest, Item, ItemId, StoreError, TreeStore};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::SelectionItem;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(None)?;
    let container = ServiceContainer::new(settings);
    let data_file = cli
        .file
        .clone()
        .unwrap_or_else(|| container.settings.data_file.clone());
    debug!("dataset: {}", data_file.display());

    match &cli.command {
        Some(Commands::Init { force }) => _init(&container, &data_file, *force),
        Some(Commands::Show) => _show(&container, &data_file, cli.json),
        Some(Commands::Get { id }) => _get(&container, &data_file, id, cli.json),
        Some(Commands::Children { id }) => _children(&container, &data_file, id, cli.json),
        Some(Commands::Descendants { id }) => _descendants(&container, &data_file, id, cli.json),
        Some(Commands::Ancestors { id }) => _ancestors(&container, &data_file, id, cli.json),
        Some(Commands::Tree) => _tree(&container, &data_file),
        Some(Commands::Stats) => _stats(&container, &data_file),
        Some(Commands::Check) => _check(&container, &data_file),
        Some(Commands::Add {
            id,
            parent,
            label,
            fields,
        }) => _add(&container, &data_file, id.as_deref(), parent.as_deref(), label, fields),
        Some(Commands::Update {
            id,
            parent,
            root,
            label,
            fields,
        }) => _update(
            &container,
            &data_file,
            id,
            parent.as_deref(),
            *root,
            label.as_deref(),
            fields,
        ),
        Some(Commands::Remove { id }) => _remove(&container, &data_file, id),
        Some(Commands::Select) => _select(&container, &data_file),
        Some(Commands::Config { command }) => _config(&container, command),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Ok(()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|source| ApplicationError::Serialize { source })?;
    output::info(&json);
    Ok(())
}

fn print_items(items: &[Item], json: bool) -> CliResult<()> {
    if json {
        print_json(&items)
    } else {
        for item in items {
            output::info(&render::item_line(item));
        }
        Ok(())
    }
}

/// Warn on stderr when a looked-up id has no record; list commands still
/// print their (empty) result so scripted callers see consistent output.
fn warn_if_unknown(store: &TreeStore, id: &ItemId) {
    if !store.contains(id) {
        output::warning(&format!("item {} not found", id));
    }
}

fn _init(container: &ServiceContainer, data_file: &Path, force: bool) -> CliResult<()> {
    container.datasets.init(data_file, force)?;
    output::success(&format!("wrote starter dataset to {}", data_file.display()));
    Ok(())
}

fn _show(container: &ServiceContainer, data_file: &Path, json: bool) -> CliResult<()> {
    let store = container.datasets.load(data_file)?;
    if store.is_empty() {
        output::warning("dataset is empty");
    }
    print_items(&store.get_all(), json)
}

fn _get(container: &ServiceContainer, data_file: &Path, raw_id: &str, json: bool) -> CliResult<()> {
    let store = container.datasets.load(data_file)?;
    let id = ItemId::parse_arg(raw_id);

    match store.get_item(&id) {
        Some(item) if json => print_json(&item),
        Some(item) => {
            output::info(&render::item_line(&item));
            Ok(())
        }
        None => Err(StoreError::NotFound(id).into()),
    }
}

fn _children(
    container: &ServiceContainer,
    data_file: &Path,
    raw_id: &str,
    json: bool,
) -> CliResult<()> {
    let store = container.datasets.load(data_file)?;
    let id = ItemId::parse_arg(raw_id);
    warn_if_unknown(&store, &id);
    print_items(&store.get_children(&id), json)
}

fn _descendants(
    container: &ServiceContainer,
    data_file: &Path,
    raw_id: &str,
    json: bool,
) -> CliResult<()> {
    let store = container.datasets.load(data_file)?;
    let id = ItemId::parse_arg(raw_id);
    warn_if_unknown(&store, &id);
    print_items(&store.get_all_children(&id), json)
}

fn _ancestors(
    container: &ServiceContainer,
    data_file: &Path,
    raw_id: &str,
    json: bool,
) -> CliResult<()> {
    let store = container.datasets.load(data_file)?;
    let id = ItemId::parse_arg(raw_id);
    warn_if_unknown(&store, &id);
    print_items(&store.get_all_parents(&id), json)
}

fn _tree(container: &ServiceContainer, data_file: &Path) -> CliResult<()> {
    let store = container.datasets.load(data_file)?;
    if store.is_empty() {
        output::warning("dataset is empty");
        return Ok(());
    }
    for rendered in render::forest(&store, container.settings.sort_siblings) {
        output::info(&rendered);
    }
    Ok(())
}

fn _stats(container: &ServiceContainer, data_file: &Path) -> CliResult<()> {
    let store = container.datasets.load(data_file)?;
    let forest = build_forest(&store);
    let leaves: usize = forest.iter().map(|tree| tree.leaf_items().len()).sum();
    let depth = forest.iter().map(|tree| tree.depth()).max().unwrap_or(0);

    output::header("Dataset");
    output::detail(&format!("file:    {}", data_file.display()));
    output::detail(&format!("records: {}", store.len()));
    output::detail(&format!("roots:   {}", forest.len()));
    output::detail(&format!("leaves:  {}", leaves));
    output::detail(&format!("depth:   {}", depth));
    Ok(())
}

fn _check(container: &ServiceContainer, data_file: &Path) -> CliResult<()> {
    let store = container.datasets.load(data_file)?;
    output::success(&format!(
        "dataset OK: {} records, ids unique, no cycles",
        store.len()
    ));
    Ok(())
}

fn _add(
    container: &ServiceContainer,
    data_file: &Path,
    raw_id: Option<&str>,
    raw_parent: Option<&str>,
    label: &str,
    fields: &[String],
) -> CliResult<()> {
    let mut store = container.datasets.load(data_file)?;

    let id = match raw_id {
        Some(raw) => ItemId::parse_arg(raw),
        None => ItemId::generate(),
    };
    let parent_id = raw_parent.map(ItemId::parse_arg);

    let mut item = Item::new(id.clone(), parent_id, label);
    for field in fields {
        let (key, value) = parse_field(field)?;
        item.extra.insert(key, value);
    }

    store.add_item(item)?;
    container.datasets.save(data_file, &store)?;
    output::success(&format!("added {}", id));
    Ok(())
}

fn _update(
    container: &ServiceContainer,
    data_file: &Path,
    raw_id: &str,
    raw_parent: Option<&str>,
    root: bool,
    label: Option<&str>,
    fields: &[String],
) -> CliResult<()> {
    if raw_parent.is_none() && !root && label.is_none() && fields.is_empty() {
        return Err(CliError::InvalidArgs(
            "nothing to update: pass --parent, --root, --label or --field".to_string(),
        ));
    }

    let mut store = container.datasets.load(data_file)?;
    let id = ItemId::parse_arg(raw_id);

    let mut item = match store.get_item(&id) {
        Some(existing) => existing,
        None => return Err(StoreError::NotFound(id).into()),
    };
    if root {
        item.parent_id = None;
    } else if let Some(raw) = raw_parent {
        item.parent_id = Some(ItemId::parse_arg(raw));
    }
    if let Some(new_label) = label {
        item.label = new_label.to_string();
    }
    for field in fields {
        let (key, value) = parse_field(field)?;
        item.extra.insert(key, value);
    }

    store.update_item(item)?;
    container.datasets.save(data_file, &store)?;
    output::success(&format!("updated {}", id));
    Ok(())
}

fn _remove(container: &ServiceContainer, data_file: &Path, raw_id: &str) -> CliResult<()> {
    let mut store = container.datasets.load(data_file)?;
    let id = ItemId::parse_arg(raw_id);

    let before = store.len();
    store.remove_item(&id)?;
    let removed = before - store.len();

    container.datasets.save(data_file, &store)?;
    output::success(&format!(
        "removed {} ({} record{})",
        id,
        removed,
        if removed == 1 { "" } else { "s" }
    ));
    Ok(())
}

fn _select(container: &ServiceContainer, data_file: &Path) -> CliResult<()> {
    let store = container.datasets.load(data_file)?;
    let items: Vec<SelectionItem> = store
        .get_all()
        .iter()
        .map(|item| SelectionItem {
            display: render::item_line(item),
            // the Display form round-trips through ItemId::parse_arg
            value: item.id.to_string(),
        })
        .collect();

    let selected = container
        .selector
        .select_one(&items, "item> ")
        .map_err(CliError::Selection)?;

    if let Some(choice) = selected {
        let id = ItemId::parse_arg(&choice.value);
        output::header("Ancestors");
        for item in store.get_all_parents(&id) {
            output::detail(&render::item_line(&item));
        }
    }
    Ok(())
}

fn _config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                config::global_config_path().ok_or_else(|| {
                    CliError::InvalidArgs("cannot determine global config directory".to_string())
                })?
            } else {
                config::local_config_path(Path::new("."))
            };
            if container.fs.exists(&path) {
                return Err(CliError::InvalidArgs(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            container
                .fs
                .ensure_parent(&path)
                .with_path_context("create config directory", &path)?;
            container
                .fs
                .write(&path, &Settings::template())
                .with_path_context("write config", &path)?;
            output::success(&format!("wrote {}", path.display()));
            Ok(())
        }
        ConfigCommands::Path => {
            if let Some(global) = config::global_config_path() {
                output::detail(&format!("global: {}", global.display()));
            }
            output::detail(&format!(
                "local:  {}",
                config::local_config_path(Path::new(".")).display()
            ));
            Ok(())
        }
    }
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

/// Parse `KEY=VALUE` into an extra field. The value is taken as JSON when it
/// parses as such (numbers, booleans, arrays, objects), else as a string.
fn parse_field(raw: &str) -> CliResult<(String, Value)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => {
            let parsed =
                serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
            Ok((key.to_string(), parsed))
        }
        _ => Err(CliError::InvalidArgs(format!(
            "expected KEY=VALUE, got '{raw}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_json_values_when_parsing_field_then_typed() {
        assert_eq!(parse_field("n=3").unwrap(), ("n".to_string(), json!(3)));
        assert_eq!(
            parse_field("flag=true").unwrap(),
            ("flag".to_string(), json!(true))
        );
        assert_eq!(
            parse_field("name=plain text").unwrap(),
            ("name".to_string(), json!("plain text"))
        );
        assert_eq!(
            parse_field("v=\"3\"").unwrap(),
            ("v".to_string(), json!("3"))
        );
    }

    #[test]
    fn given_malformed_field_when_parsing_then_usage_error() {
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }
}
