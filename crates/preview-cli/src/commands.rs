//! Subcommand implementations
//!
//! Each command writes its report to the given writer so the binary and the
//! tests share one code path.

use crate::config::PreviewConfig;
use anyhow::Context;
use preview_client::{ApiClient, HttpTransport, InProcessTransport, Transport};
use preview_mock::{Method, MockMode, MockServer, NavTree, OperationKey, ScenarioState, TreeNode};
use preview_renderer::{FsSource, ScreenModel, ScreenSession, SpecLoader};
use preview_spec::{Role, ScreenSpec};
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Run the HTTP mock server until Ctrl-C
///
/// # Errors
/// Fails if the listener cannot be bound.
pub async fn serve(config: &PreviewConfig) -> anyhow::Result<()> {
    let server = Arc::new(MockServer::new(&config.mock));
    let spec_dir = config.spec_dir();
    let spec_dir = if spec_dir.is_dir() {
        Some(spec_dir)
    } else {
        tracing::warn!(dir = %spec_dir.display(), "spec directory missing, /spec disabled");
        None
    };

    preview_mock::serve(server, config.addr, spec_dir, shutdown_signal())
        .await
        .with_context(|| format!("serving on {}", config.addr))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown requested"),
        Err(e) => {
            tracing::warn!(error = %e, "ctrl-c handler unavailable, running until killed");
            std::future::pending::<()>().await;
        }
    }
}

/// Load and validate a spec document
///
/// `path` is either a file on disk or a public path resolved against the
/// configured public root.
///
/// # Errors
/// Fails if the document cannot be fetched, parsed or validated.
pub async fn validate(
    config: &PreviewConfig,
    path: &str,
    out: &mut impl Write,
) -> anyhow::Result<ScreenSpec> {
    let spec = load_spec(config, path).await?;
    writeln!(
        out,
        "valid: {} \"{}\" ({} columns, {} fields, {} actions)",
        spec.id,
        spec.title,
        spec.table.columns.len(),
        spec.create_form.fields.len(),
        spec.actions.len()
    )?;
    Ok(spec)
}

async fn load_spec(config: &PreviewConfig, path: &str) -> anyhow::Result<ScreenSpec> {
    let on_disk = Path::new(path);
    let spec = if on_disk.is_file() {
        let root = on_disk.parent().unwrap_or_else(|| Path::new("."));
        let name = on_disk
            .file_name()
            .and_then(|n| n.to_str())
            .context("spec file name is not valid UTF-8")?;
        SpecLoader::new(FsSource::new(root)).load(name).await
    } else {
        SpecLoader::new(FsSource::new(&config.public_dir))
            .load(path)
            .await
    };
    spec.with_context(|| format!("loading {path}"))
}

/// Print the navigation tree, or one level of it
///
/// # Errors
/// Fails only if writing to `out` fails.
pub fn tree(parent: Option<&str>, out: &mut impl Write) -> anyhow::Result<()> {
    let tree = NavTree::new();
    match parent {
        Some(parent) => {
            for node in tree.children(Some(parent)) {
                write_node(out, &node, 0)?;
            }
        }
        None => {
            for root in tree.children(None) {
                write_subtree(&tree, out, &root, 0)?;
            }
        }
    }
    Ok(())
}

fn write_subtree(
    tree: &NavTree,
    out: &mut impl Write,
    node: &TreeNode,
    depth: usize,
) -> anyhow::Result<()> {
    write_node(out, node, depth)?;
    if !node.is_leaf {
        for child in tree.children(Some(&node.id)) {
            write_subtree(tree, out, &child, depth + 1)?;
        }
    }
    Ok(())
}

fn write_node(out: &mut impl Write, node: &TreeNode, depth: usize) -> anyhow::Result<()> {
    let indent = "  ".repeat(depth);
    match &node.screen_spec_path {
        Some(path) => writeln!(out, "{indent}{} [{}] -> {path}", node.title, node.id)?,
        None => writeln!(out, "{indent}{} [{}]", node.title, node.id)?,
    }
    Ok(())
}

/// Parse a `KEY=mode` scenario override
///
/// # Errors
/// Describes the malformed input.
pub fn parse_mode_override(raw: &str) -> Result<(OperationKey, MockMode), String> {
    let (key, mode) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=mode, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("missing operation key in '{raw}'"));
    }
    let mode = MockMode::ALL
        .into_iter()
        .find(|m| m.as_str() == mode)
        .ok_or_else(|| {
            let allowed: Vec<&str> = MockMode::ALL.iter().map(MockMode::as_str).collect();
            format!("unknown mode '{mode}', expected one of: {}", allowed.join(", "))
        })?;
    Ok((OperationKey::new(key), mode))
}

/// Arguments of the `request` command
#[derive(Debug, Clone, PartialEq)]
pub struct RequestArgs {
    /// Method
    pub method: Method,
    /// Path plus query string
    pub url: String,
    /// JSON body
    pub body: Option<Value>,
    /// Scenario overrides applied before the request
    pub modes: Vec<(OperationKey, MockMode)>,
    /// Role applied before the request
    pub role: Option<Role>,
    /// Running server to target instead of an in-process one
    pub base_url: Option<String>,
    /// Also print the activity log
    pub show_log: bool,
}

impl RequestArgs {
    /// Create arguments for `method url`
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            modes: Vec::new(),
            role: None,
            base_url: None,
            show_log: false,
        }
    }
}

/// Issue one API request and print the response body
///
/// # Errors
/// Fails on non-2xx responses, aborts and transport failures.
pub async fn request(
    config: &PreviewConfig,
    args: &RequestArgs,
    out: &mut impl Write,
) -> anyhow::Result<Value> {
    let transport: Arc<dyn Transport> = match &args.base_url {
        Some(base) => Arc::new(HttpTransport::new(base.as_str())?),
        None => {
            let server = Arc::new(MockServer::new(&config.mock));
            if let Some(role) = args.role {
                server.scenarios().set_role(role);
            }
            for (key, mode) in &args.modes {
                server.scenarios().set_mode(key.clone(), *mode);
            }
            Arc::new(InProcessTransport::new(server))
        }
    };
    let client = ApiClient::new(transport, config.client.clone());
    if args.base_url.is_some() {
        apply_remote_overrides(&client, args).await?;
    }

    let result = client
        .fetch::<Value>(args.method, &args.url, args.body.as_ref())
        .await;

    if args.show_log {
        for item in client.log().items().iter().rev() {
            writeln!(out, "[{}] {} {}", item.timestamp.to_rfc3339(), item.kind, item.message)?;
        }
    }

    let body = result.with_context(|| format!("{} {}", args.method, args.url))?;
    writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
    Ok(body)
}

async fn apply_remote_overrides(client: &ApiClient, args: &RequestArgs) -> anyhow::Result<()> {
    if let Some(role) = args.role {
        let body = serde_json::json!({ "role": role });
        let _: Value = client
            .fetch(Method::Put, "/__role", Some(&body))
            .await
            .context("setting role")?;
    }
    if args.modes.is_empty() {
        return Ok(());
    }

    // PUT replaces the whole mapping, so merge into the current one first.
    let current: ScenarioState = client
        .fetch(Method::Get, "/__scenario", None)
        .await
        .context("reading scenarios")?;
    let next = args
        .modes
        .iter()
        .cloned()
        .fold(current, |state, (key, mode)| state.with_mode(key, mode));
    let body = serde_json::to_value(&next)?;
    let _: Value = client
        .fetch(Method::Put, "/__scenario", Some(&body))
        .await
        .context("replacing scenarios")?;
    Ok(())
}

/// Load a spec, list its data as the given role and print the table
///
/// # Errors
/// Fails if the spec cannot be loaded or the listing fails.
pub async fn preview(
    config: &PreviewConfig,
    spec_path: &str,
    role: Role,
    query: Option<&str>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let spec = load_spec(config, spec_path).await?;
    let server = Arc::new(MockServer::new(&config.mock));
    server.scenarios().set_role(role);
    let client = ApiClient::new(
        Arc::new(InProcessTransport::new(server)),
        config.client.clone(),
    );

    let mut session = ScreenSession::open(ScreenModel::new(spec), client, role);
    session.refresh().await?;
    if let Some(query) = query {
        session.set_query(query);
    }

    let model = session.model();
    writeln!(out, "{} ({role})", model.spec().title)?;
    writeln!(
        out,
        "{}: {} | {}: {}",
        model.create_label(),
        enabled(model.can_create(role)),
        model.delete_label(),
        enabled(model.can_delete(role))
    )?;

    let rows = session.visible_rows();
    let mut lines = vec![model.headers().iter().map(ToString::to_string).collect()];
    lines.extend(model.table(&rows));
    write_table(out, &lines)?;
    Ok(())
}

fn enabled(flag: bool) -> &'static str {
    if flag {
        "enabled"
    } else {
        "disabled"
    }
}

fn write_table(out: &mut impl Write, lines: &[Vec<String>]) -> anyhow::Result<()> {
    let columns = lines.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            lines
                .iter()
                .filter_map(|line| line.get(i))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    for line in lines {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        writeln!(out, "{}", cells.join("  ").trim_end())?;
    }
    Ok(())
}
