//! One-time client setup.
//!
//! Registers this server in the Claude Desktop configuration file so the
//! client launches it with the `start` command.

use std::fs;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde_json::{Map, Value, json};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "claude_desktop_config.json";

/// Key under `mcpServers` that this server is registered as.
pub const SERVER_KEY: &str = "neon";

#[derive(Error, Diagnostic, Debug)]
pub enum InitError {
    #[error("Could not determine the Claude configuration directory")]
    #[diagnostic(
        code(neon_mcp::init::no_config_dir),
        help("Set HOME (or APPDATA on Windows).")
    )]
    NoConfigDir,

    #[error("Could not determine the path of this executable")]
    #[diagnostic(
        code(neon_mcp::init::no_executable),
        help("Pass --executable-path explicitly.")
    )]
    NoExecutable {
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to access {}", path.display())]
    #[diagnostic(code(neon_mcp::init::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Existing config {} is not valid JSON", path.display())]
    #[diagnostic(
        code(neon_mcp::init::invalid_json),
        help("Fix or remove the file and run init again.")
    )]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Existing config {} must be a JSON object", path.display())]
    #[diagnostic(code(neon_mcp::init::not_an_object))]
    NotAnObject { path: PathBuf },
}

/// Claude Desktop's configuration directory for a platform.
fn config_dir_for(
    os: &str,
    home: Option<PathBuf>,
    appdata: Option<PathBuf>,
    xdg_config_home: Option<PathBuf>,
) -> Option<PathBuf> {
    match os {
        "macos" => home.map(|h| h.join("Library/Application Support/Claude")),
        "windows" => appdata.map(|a| a.join("Claude")),
        _ => xdg_config_home
            .or_else(|| home.map(|h| h.join(".config")))
            .map(|c| c.join("Claude")),
    }
}

pub fn claude_config_path() -> Result<PathBuf, InitError> {
    let var = |name: &str| std::env::var_os(name).map(PathBuf::from);
    config_dir_for(
        std::env::consts::OS,
        var("HOME"),
        var("APPDATA"),
        var("XDG_CONFIG_HOME"),
    )
    .map(|dir| dir.join(CONFIG_FILE_NAME))
    .ok_or(InitError::NoConfigDir)
}

/// The `mcpServers` entry that launches this server.
pub fn server_entry(executable: &Path, api_key: &str) -> Value {
    json!({
        "command": executable.to_string_lossy(),
        "args": ["start", api_key],
    })
}

/// Add or replace this server's entry in the config at `path`, keeping
/// everything else in the file.
pub fn write_client_config(path: &Path, executable: &Path, api_key: &str) -> Result<(), InitError> {
    let io_err = |source: std::io::Error| InitError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut config = if path.exists() {
        let raw = fs::read_to_string(path).map_err(io_err)?;
        if raw.trim().is_empty() {
            Map::new()
        } else {
            match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    return Err(InitError::NotAnObject {
                        path: path.to_path_buf(),
                    });
                }
                Err(source) => {
                    return Err(InitError::InvalidJson {
                        path: path.to_path_buf(),
                        source,
                    });
                }
            }
        }
    } else {
        Map::new()
    };

    let servers = config
        .entry("mcpServers")
        .or_insert_with(|| Value::Object(Map::new()));
    if !servers.is_object() {
        *servers = Value::Object(Map::new());
    }
    if let Value::Object(servers) = servers {
        servers.insert(SERVER_KEY.to_string(), server_entry(executable, api_key));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let content = serde_json::to_string_pretty(&Value::Object(config)).map_err(|source| {
        InitError::InvalidJson {
            path: path.to_path_buf(),
            source,
        }
    })?;
    fs::write(path, content).map_err(io_err)
}

/// Register the server with Claude Desktop. Returns the file written.
pub fn handle_init(api_key: &str, executable_path: Option<PathBuf>) -> Result<PathBuf, InitError> {
    let executable = match executable_path {
        Some(path) => path,
        None => std::env::current_exe().map_err(|source| InitError::NoExecutable { source })?,
    };

    let path = claude_config_path()?;
    write_client_config(&path, &executable, api_key)?;
    Ok(path)
}
