//! Reads a network description from disk.
//!
//! Files ending in `.json` are the serde form of [`NetworkConfig`]. Anything
//! else is the line-oriented properties format:
//!
//! ```text
//! # global parameters
//! seed = 12345
//! draw_budget = 100000
//! start_offset = 2.0
//!
//! queue.1.servers = 1
//! queue.1.capacity = 5          # negative or absent: unbounded
//! queue.1.arrival_min = 2.0
//! queue.1.arrival_max = 4.0
//! queue.1.service_min = 1.0
//! queue.1.service_max = 2.0
//! queue.1.route.2 = 0.8
//! queue.1.route.exit = 0.2
//! ```
//!
//! Declared queue ids may be sparse; they are sorted and renumbered densely,
//! and the declared id becomes the queue's display name.

use qnet_core::{ConfigError, NetworkConfig, QueueConfig, QueueId, RouteTarget, TimeRange};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("queue {queue}: missing required key `{key}`")]
    Missing { queue: u64, key: &'static str },

    #[error("line {line}: route from queue {queue} to undeclared queue {target}")]
    UndeclaredQueue { line: usize, queue: u64, target: u64 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub fn load_file(path: &Path) -> Result<NetworkConfig, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    debug!(path = %path.display(), is_json, "Loading configuration");
    if is_json {
        parse_json(&text)
    } else {
        parse_properties(&text)
    }
}

pub fn parse_json(text: &str) -> Result<NetworkConfig, LoadError> {
    let config: NetworkConfig = serde_json::from_str(text)?;
    config.validate()?;
    Ok(config)
}

#[derive(Debug, Clone, Copy)]
enum Destination {
    Queue(u64),
    Exit,
}

#[derive(Debug, Default)]
struct QueueDraft {
    name: Option<String>,
    /// Declared value and its line.
    capacity: Option<(i64, usize)>,
    servers: Option<u32>,
    service_min: Option<f64>,
    service_max: Option<f64>,
    arrival_min: Option<f64>,
    arrival_max: Option<f64>,
    routes: Vec<(Destination, f64, usize)>,
}

pub fn parse_properties(text: &str) -> Result<NetworkConfig, LoadError> {
    let mut config = NetworkConfig::new(Vec::new());
    let mut drafts: BTreeMap<u64, QueueDraft> = BTreeMap::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        let Some((key, value)) = content.split_once('=') else {
            return Err(syntax(line, format!("expected `key = value`, got `{}`", content)));
        };
        let (key, value) = (key.trim(), value.trim());

        match key {
            "seed" => config.seed = number(line, key, value)?,
            "horizon" => config.horizon = Some(number(line, key, value)?),
            "draw_budget" => config.draw_budget = Some(number(line, key, value)?),
            "start_offset" => config.start_offset = number(line, key, value)?,
            _ => parse_queue_key(line, key, value, &mut drafts)?,
        }
    }

    let positions: BTreeMap<u64, QueueId> = drafts
        .keys()
        .enumerate()
        .map(|(pos, id)| (*id, pos as QueueId))
        .collect();

    for (id, draft) in drafts {
        config.queues.push(build_queue(id, draft, &positions)?);
    }
    config.validate()?;
    Ok(config)
}

fn parse_queue_key(
    line: usize,
    key: &str,
    value: &str,
    drafts: &mut BTreeMap<u64, QueueDraft>,
) -> Result<(), LoadError> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.len() < 3 || parts[0] != "queue" {
        return Err(syntax(line, format!("unknown key `{}`", key)));
    }
    let id: u64 = number(line, "queue id", parts[1])?;
    let draft = drafts.entry(id).or_default();

    match parts[2..] {
        ["name"] => draft.name = Some(value.to_string()),
        ["capacity"] => draft.capacity = Some((number(line, key, value)?, line)),
        ["servers"] => draft.servers = Some(number(line, key, value)?),
        ["service_min"] => draft.service_min = Some(number(line, key, value)?),
        ["service_max"] => draft.service_max = Some(number(line, key, value)?),
        ["arrival_min"] => draft.arrival_min = Some(number(line, key, value)?),
        ["arrival_max"] => draft.arrival_max = Some(number(line, key, value)?),
        ["route", dest] => {
            let destination = if dest.eq_ignore_ascii_case("exit") {
                Destination::Exit
            } else {
                Destination::Queue(number(line, "route destination", dest)?)
            };
            let probability: f64 = number(line, key, value)?;
            draft.routes.push((destination, probability, line));
        }
        _ => return Err(syntax(line, format!("unknown key `{}`", key))),
    }
    Ok(())
}

fn build_queue(
    id: u64,
    draft: QueueDraft,
    positions: &BTreeMap<u64, QueueId>,
) -> Result<QueueConfig, LoadError> {
    let service_min = draft.service_min.ok_or(LoadError::Missing {
        queue: id,
        key: "service_min",
    })?;
    let service_max = draft.service_max.ok_or(LoadError::Missing {
        queue: id,
        key: "service_max",
    })?;

    let mut queue = QueueConfig::new(draft.servers.unwrap_or(1), TimeRange::new(service_min, service_max));
    queue.name = Some(draft.name.unwrap_or_else(|| id.to_string()));
    queue.capacity = match draft.capacity {
        Some((c, line)) if c >= 0 => Some(
            u32::try_from(c)
                .map_err(|_| syntax(line, format!("capacity {} is larger than {}", c, u32::MAX)))?,
        ),
        _ => None,
    };
    if let (Some(min), Some(max)) = (draft.arrival_min, draft.arrival_max) {
        queue.arrival = Some(TimeRange::new(min, max));
    }

    for (destination, probability, line) in draft.routes {
        let target = match destination {
            Destination::Exit => RouteTarget::Exit,
            Destination::Queue(dest) => match positions.get(&dest) {
                Some(pos) => RouteTarget::Queue(*pos),
                None => {
                    return Err(LoadError::UndeclaredQueue {
                        line,
                        queue: id,
                        target: dest,
                    })
                }
            },
        };
        queue = queue.with_route(target, probability);
    }
    Ok(queue)
}

fn number<T: FromStr>(line: usize, key: &str, value: &str) -> Result<T, LoadError> {
    value
        .parse()
        .map_err(|_| syntax(line, format!("invalid value `{}` for `{}`", value, key)))
}

fn syntax(line: usize, message: String) -> LoadError {
    LoadError::Syntax { line, message }
}
