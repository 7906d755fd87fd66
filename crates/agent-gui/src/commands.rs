use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
pub use clap_complete::Shell;

const LONG_ABOUT: &str = r#"agent-gui enables AI agents to interact with GUI applications.

WORKFLOW:
    1. Capture an application's UI into a session
    2. List elements to see their IDs
    3. Interact using click, type, scroll with element IDs
    4. Re-capture after the screen changes
    5. Clean the session when done

ELEMENT IDS:
    Element IDs encode the control kind in their first letter:
    B=button, T=text field/area, C=checkbox, L=link, S=slider,
    R=radio button, M=menu/menu item, G=everything else. Numbering
    is per-kind and dense: B1, B2, T1, G1, ...

    IDs are assigned per capture. Always use the latest capture's IDs.

EXAMPLES:
    # Capture a snapshot exported by the platform helper
    agent-gui capture --app Finder --tree-file tree.json --screenshot shot.png
    agent-gui elements --actionable
    agent-gui click B1
    agent-gui type T1 "hello"
    agent-gui clean

    # Resolve a loosely spelled application name
    agent-gui resolve Finderr"#;

#[derive(Parser)]
#[command(name = "agent-gui")]
#[command(author, version)]
#[command(about = "CLI tool for AI agents to interact with GUI applications")]
#[command(long_about = LONG_ABOUT)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Session ID to use (default: uses the most recent session)
    #[arg(short, long, global = true)]
    pub session: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Output as JSON (shorthand for --format json)
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Returns the effective output format, considering --json shorthand.
    pub fn effective_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Capture an application's UI state into a session
    #[command(long_about = r#"Capture an application's UI state into a session.

Builds the element map from an accessibility tree snapshot, stores the
screenshot alongside it, and prints the session ID. Without --session,
writes into the most recent session, creating one if none exists.

The accessibility tree and screenshot are produced by the platform
capture helper; pass them with --tree-file and --screenshot. Window
bounds are taken from the tree's root node.

EXAMPLES:
    agent-gui capture --tree-file tree.json
    agent-gui capture --app Safari --tree-file tree.json --screenshot shot.png
    agent-gui capture --tree-file tree.json --annotate
    agent-gui capture -s my-run --tree-file tree.json"#)]
    Capture {
        /// Application name, bundle identifier, or PID:<n> to record
        #[arg(long)]
        app: Option<String>,

        /// Accessibility tree snapshot (JSON) from the platform helper
        #[arg(long)]
        tree_file: Option<PathBuf>,

        /// Screenshot image to store with the session
        #[arg(long)]
        screenshot: Option<PathBuf>,

        /// Window title to record with the capture
        #[arg(long)]
        window_title: Option<String>,

        /// Also render the annotated screenshot immediately
        #[arg(short = 'a', long)]
        annotate: bool,
    },

    /// List running applications with visible windows
    Apps,

    /// List elements in the current session's map
    #[command(long_about = r#"List elements in the current session's map.

Prints one line per element in ID order: the ID, role, best label, and
frame. Use --actionable to hide structural elements.

EXAMPLES:
    agent-gui elements
    agent-gui elements --actionable
    agent-gui elements --json"#)]
    Elements {
        /// Only show elements that accept interaction
        #[arg(long)]
        actionable: bool,
    },

    /// Find elements matching a text query
    #[command(long_about = r#"Find elements matching a text query.

Case-insensitive substring search across each element's title, label,
value, and role. An empty result is not an error.

EXAMPLES:
    agent-gui find Save
    agent-gui find "text field"
    agent-gui find submit --json"#)]
    Find {
        /// Text to search for
        query: String,
    },

    /// Resolve an application identifier to one running process
    #[command(long_about = r#"Resolve an application identifier to one running process.

Accepts a name, a bundle identifier, or PID:<n>. Matching is
case-insensitive and runs exact, then prefix, then fuzzy (small typos
tolerated). Browser helper processes lose to their parent browser.

EXAMPLES:
    agent-gui resolve Finder
    agent-gui resolve com.apple.Safari
    agent-gui resolve PID:1234
    agent-gui resolve Finderr      # typo still resolves"#)]
    Resolve {
        /// Application name, bundle identifier, or PID:<n>
        app: String,
    },

    /// Render the annotated screenshot for the current session
    #[command(long_about = r#"Render the annotated screenshot for the current session.

Draws a translucent highlight and an ID badge over every actionable
element of the stored screenshot and writes annotated.png next to it.
Requires a prior capture with a screenshot.

EXAMPLES:
    agent-gui annotate
    agent-gui annotate -s my-run"#)]
    Annotate,

    /// Click a target element or point
    #[command(long_about = r#"Click a target element or point.

TARGETS:
    B3          Element ID from the current session
    "Save"      Text query; the lowest-ID match wins
    120,45      Absolute screen coordinates

EXAMPLES:
    agent-gui click B1
    agent-gui click "Save As"
    agent-gui click 120,45
    agent-gui click B1 --dry-run   # resolve only, no input"#)]
    Click {
        /// Element ID, text query, or x,y coordinates
        target: String,

        /// Resolve the target and print it without clicking
        #[arg(long)]
        dry_run: bool,
    },

    /// Type text into a target element
    #[command(name = "type")]
    Type {
        /// Element ID, text query, or x,y coordinates
        target: String,

        /// Text to type
        text: String,

        /// Resolve the target and print it without typing
        #[arg(long)]
        dry_run: bool,
    },

    /// Scroll at a target element or point
    Scroll {
        /// Element ID, text query, or x,y coordinates
        target: String,

        /// Scroll direction
        #[arg(value_enum, default_value = "down")]
        direction: ScrollDirection,

        /// Number of scroll ticks
        #[arg(short, long, default_value = "3")]
        amount: u16,

        /// Resolve the target and print it without scrolling
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove stored session state
    #[command(long_about = r#"Remove stored session state.

Deletes the current session's directory: screenshot, annotated image,
and element map. Use --all to remove every session under the root.
Cleaning a session that was never captured is a no-op.

EXAMPLES:
    agent-gui clean
    agent-gui clean -s my-run
    agent-gui clean --all"#)]
    Clean {
        /// Remove all sessions, not just the current one
        #[arg(long)]
        all: bool,
    },

    /// Generate shell completion scripts
    #[command(
        long_about = r#"Generate shell completion scripts for bash, zsh, fish, powershell, or elvish.

INSTALLATION:
    # Bash - add to ~/.bashrc
    source <(agent-gui completions bash)

    # Zsh - add to ~/.zshrc
    source <(agent-gui completions zsh)

    # Fish - run once
    agent-gui completions fish > ~/.config/fish/completions/agent-gui.fish

EXAMPLES:
    agent-gui completions bash
    agent-gui completions zsh > /usr/local/share/zsh/site-functions/_agent-gui"#
    )]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ScrollDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            ScrollDirection::Up => "up",
            ScrollDirection::Down => "down",
            ScrollDirection::Left => "left",
            ScrollDirection::Right => "right",
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
