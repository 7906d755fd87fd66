use std::fs;
use std::path::PathBuf;

use serde_json::Value;
use serde_json::json;
use tracing::info;

use agent_gui_annotate::annotate_session;
use agent_gui_core::AxNode;
use agent_gui_core::UiElement;
use agent_gui_core::build_ui_map;
use agent_gui_process::resolve;
use agent_gui_process::system_snapshot;
use agent_gui_process::visible_applications;
use agent_gui_session::ResolvedTarget;
use agent_gui_session::Selector;
use agent_gui_session::SessionError;
use agent_gui_session::SessionStore;
use agent_gui_session::clear_all_sessions;
use agent_gui_session::menu_bar_from_tree;
use agent_gui_session::resolve_target;

use crate::commands::OutputFormat;
use crate::commands::ScrollDirection;
use crate::config::Config;
use crate::platform;

pub type HandlerResult = Result<(), Box<dyn std::error::Error>>;

pub struct HandlerContext {
    pub config: Config,
    pub session: Option<String>,
    pub format: OutputFormat,
}

impl HandlerContext {
    pub fn new(config: Config, session: Option<String>, format: OutputFormat) -> Self {
        Self {
            config,
            session,
            format,
        }
    }

    fn open_store(&self, create_if_needed: bool) -> Result<SessionStore, SessionError> {
        SessionStore::open(
            &self.config.sessions_root,
            self.session.as_deref(),
            create_if_needed,
        )
    }

    /// Print either the JSON value or the plain-text rendering, depending on
    /// the requested format.
    fn emit(&self, value: Value, text: &str) {
        match self.format {
            OutputFormat::Json => println!("{:#}", value),
            OutputFormat::Text => {
                if !text.is_empty() {
                    println!("{}", text);
                }
            }
        }
    }
}

fn format_element(el: &UiElement) -> String {
    let label = el.best_label().unwrap_or_else(|| "-".to_string());
    let marker = if el.is_actionable { "" } else { "  (inert)" };
    format!(
        "{:<5} {:<18} {:<30} ({:.0},{:.0} {:.0}x{:.0}){}",
        el.id, el.role, label, el.frame.x, el.frame.y, el.frame.width, el.frame.height, marker
    )
}

fn format_target(target: &ResolvedTarget) -> String {
    match &target.element {
        Some(el) => format!(
            "{} ({}) at ({:.0},{:.0})",
            el.id,
            el.best_label().unwrap_or_else(|| el.role.clone()),
            target.point.x,
            target.point.y
        ),
        None => format!("point ({:.0},{:.0})", target.point.x, target.point.y),
    }
}

fn target_json(target: &ResolvedTarget) -> Value {
    json!({
        "element": target.element,
        "point": { "x": target.point.x, "y": target.point.y },
    })
}

/// Resolve a raw CLI target. Coordinate selectors never touch the session,
/// so `click 120,45` works even before any capture exists.
fn resolve_cli_target(ctx: &HandlerContext, raw: &str) -> Result<ResolvedTarget, SessionError> {
    let selector = Selector::parse(raw);
    if let Selector::Coordinates(point) = selector {
        return Ok(ResolvedTarget {
            element: None,
            point,
        });
    }
    let store = ctx.open_store(false)?;
    resolve_target(&store, &selector)
}

pub fn handle_capture(
    ctx: &HandlerContext,
    app: Option<String>,
    tree_file: Option<PathBuf>,
    screenshot: Option<PathBuf>,
    window_title: Option<String>,
    annotate: bool,
) -> HandlerResult {
    let store = ctx.open_store(true)?;

    let application_name = match &app {
        Some(identifier) => {
            let snapshot = system_snapshot();
            Some(resolve(identifier, &snapshot)?.name.clone())
        }
        None => None,
    };

    let tree = match &tree_file {
        Some(path) => {
            let raw = fs::read_to_string(path)?;
            serde_json::from_str::<AxNode>(&raw)?
        }
        None => platform::capture_tree(application_name.as_deref())?,
    };

    let mut data = store.load()?.unwrap_or_default();
    data.ui_map = build_ui_map(&tree);
    if application_name.is_some() {
        data.application_name = application_name.clone();
    }
    if window_title.is_some() {
        data.window_title = window_title.clone();
    }
    if tree.frame.width > 0.0 && tree.frame.height > 0.0 {
        data.window_bounds = Some(tree.frame);
    }
    // A re-capture replaces the whole snapshot, so a tree without a menu bar
    // clears any previously recorded one.
    data.menu_bar = menu_bar_from_tree(&tree);
    data.touch();
    store.save(&data)?;

    if let Some(source) = &screenshot {
        store.update_screenshot(source, application_name.as_deref(), window_title.as_deref())?;
    }

    let annotated = if annotate {
        Some(annotate_session(&store)?)
    } else {
        None
    };

    // Screenshot and annotation writes update the snapshot behind this
    // handle; report from what actually landed on disk.
    let data = store.load()?.unwrap_or(data);
    let actionable = data.ui_map.values().filter(|el| el.is_actionable).count();
    info!(
        session_id = %store.id(),
        elements = data.ui_map.len(),
        actionable,
        "Captured session"
    );

    ctx.emit(
        json!({
            "sessionId": store.id().as_str(),
            "elementCount": data.ui_map.len(),
            "actionableCount": actionable,
            "screenshot": data.screenshot_path,
            "annotated": annotated.as_ref().map(|p| p.display().to_string()),
        }),
        &format!(
            "Captured session {}: {} elements ({} actionable)",
            store.id(),
            data.ui_map.len(),
            actionable
        ),
    );
    Ok(())
}

pub fn handle_apps(ctx: &HandlerContext) -> HandlerResult {
    let apps = visible_applications(system_snapshot());

    let mut lines = Vec::with_capacity(apps.len());
    for app in &apps {
        lines.push(format!("{:<8} {}", app.pid, app.name));
    }
    ctx.emit(
        json!({ "applications": apps }),
        &if lines.is_empty() {
            "No applications with visible windows.".to_string()
        } else {
            lines.join("\n")
        },
    );
    Ok(())
}

pub fn handle_elements(ctx: &HandlerContext, actionable_only: bool) -> HandlerResult {
    let store = ctx.open_store(false)?;
    let elements: Vec<UiElement> = match store.load()? {
        Some(data) => data
            .ui_map
            .into_values()
            .filter(|el| !actionable_only || el.is_actionable)
            .collect(),
        None => Vec::new(),
    };

    let text = if elements.is_empty() {
        format!("No elements in session {}. Run 'capture' first.", store.id())
    } else {
        elements
            .iter()
            .map(format_element)
            .collect::<Vec<_>>()
            .join("\n")
    };
    ctx.emit(
        json!({ "sessionId": store.id().as_str(), "elements": elements }),
        &text,
    );
    Ok(())
}

pub fn handle_find(ctx: &HandlerContext, query: String) -> HandlerResult {
    let store = ctx.open_store(false)?;
    let matches = store.find_elements(&query)?;

    let text = if matches.is_empty() {
        format!("No elements matched {:?}.", query)
    } else {
        matches
            .iter()
            .map(format_element)
            .collect::<Vec<_>>()
            .join("\n")
    };
    ctx.emit(json!({ "query": query, "matches": matches }), &text);
    Ok(())
}

pub fn handle_resolve(ctx: &HandlerContext, app: String) -> HandlerResult {
    let snapshot = system_snapshot();
    let process = resolve(&app, &snapshot)?;

    ctx.emit(
        json!({ "identifier": app, "process": process }),
        &format!(
            "{} (pid {}{})",
            process.name,
            process.pid,
            process
                .bundle_id
                .as_deref()
                .map(|b| format!(", {}", b))
                .unwrap_or_default()
        ),
    );
    Ok(())
}

pub fn handle_annotate(ctx: &HandlerContext) -> HandlerResult {
    let store = ctx.open_store(false)?;
    let path = annotate_session(&store)?;
    ctx.emit(
        json!({
            "sessionId": store.id().as_str(),
            "annotated": path.display().to_string(),
        }),
        &format!("Annotated screenshot written to {}", path.display()),
    );
    Ok(())
}

pub fn handle_click(ctx: &HandlerContext, raw_target: String, dry_run: bool) -> HandlerResult {
    let target = resolve_cli_target(ctx, &raw_target)?;
    if !dry_run {
        platform::send_click(target.point)?;
    }
    ctx.emit(
        json!({ "target": target_json(&target), "dryRun": dry_run }),
        &format!(
            "{} {}",
            if dry_run { "Resolved" } else { "Clicked" },
            format_target(&target)
        ),
    );
    Ok(())
}

pub fn handle_type(
    ctx: &HandlerContext,
    raw_target: String,
    text: String,
    dry_run: bool,
) -> HandlerResult {
    let target = resolve_cli_target(ctx, &raw_target)?;
    if !dry_run {
        platform::send_click(target.point)?;
        platform::send_text(&text)?;
    }
    ctx.emit(
        json!({
            "target": target_json(&target),
            "text": text,
            "dryRun": dry_run,
        }),
        &format!(
            "{} {:?} into {}",
            if dry_run { "Would type" } else { "Typed" },
            text,
            format_target(&target)
        ),
    );
    Ok(())
}

pub fn handle_scroll(
    ctx: &HandlerContext,
    raw_target: String,
    direction: ScrollDirection,
    amount: u16,
    dry_run: bool,
) -> HandlerResult {
    let target = resolve_cli_target(ctx, &raw_target)?;
    if !dry_run {
        platform::send_scroll(target.point, direction, amount)?;
    }
    ctx.emit(
        json!({
            "target": target_json(&target),
            "direction": direction.as_str(),
            "amount": amount,
            "dryRun": dry_run,
        }),
        &format!(
            "{} {} {} ticks at {}",
            if dry_run { "Would scroll" } else { "Scrolled" },
            direction.as_str(),
            amount,
            format_target(&target)
        ),
    );
    Ok(())
}

pub fn handle_clean(ctx: &HandlerContext, all: bool) -> HandlerResult {
    if all {
        let removed = clear_all_sessions(&ctx.config.sessions_root)?;
        ctx.emit(
            json!({ "removed": removed }),
            &format!("Removed {} session(s).", removed),
        );
        return Ok(());
    }

    match ctx.open_store(false) {
        Ok(store) => {
            store.clear()?;
            ctx.emit(
                json!({ "sessionId": store.id().as_str(), "removed": 1 }),
                &format!("Cleared session {}.", store.id()),
            );
        }
        // Nothing to clean is a normal outcome, not a failure.
        Err(SessionError::NoSession) => {
            ctx.emit(json!({ "removed": 0 }), "No sessions to clean.");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
