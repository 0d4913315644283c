use std::collections::{BTreeSet, HashMap};

use regex::Regex;
use tracing::{debug, info};

/// Separator between multiple stream URLs of one channel.
pub const URL_DELIMITER: &str = "#@";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelEntry {
    pub name: String,
    /// Empty when the metadata line had no usable `group-title`.
    pub group: String,
    pub urls: String,
}

impl ChannelEntry {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            urls: String::new(),
        }
    }

    /// Appends a stream URL; existing URLs are never replaced.
    pub fn push_url(&mut self, url: &str) {
        if !self.urls.is_empty() {
            self.urls.push_str(URL_DELIMITER);
        }
        self.urls.push_str(url);
    }

    pub fn has_urls(&self) -> bool {
        !self.urls.is_empty()
    }
}

/// Channels keyed by display name plus the distinct group labels seen while indexing.
#[derive(Debug, Clone, Default)]
pub struct PlaylistIndex {
    channels: HashMap<String, ChannelEntry>,
    // first-insertion order of names, used for deterministic emission
    order: Vec<String>,
    groups: BTreeSet<String>,
}

impl PlaylistIndex {
    pub fn channel(&self, name: &str) -> Option<&ChannelEntry> {
        self.channels.get(name)
    }

    /// Channels in the order their name was first seen.
    pub fn channels(&self) -> impl Iterator<Item = &ChannelEntry> {
        self.order.iter().filter_map(|name| self.channels.get(name))
    }

    /// Group labels, sorted ascending by codepoint.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(String::as_str)
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Starts a fresh entry for `name`, replacing any earlier one. The name keeps
    /// its first-seen position.
    fn replace(&mut self, name: &str, group: String) {
        let entry = ChannelEntry::new(name, group);
        if self.channels.insert(name.to_string(), entry).is_none() {
            self.order.push(name.to_string());
        }
    }

    fn entry_mut(&mut self, name: &str) -> &mut ChannelEntry {
        if !self.channels.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.channels
            .entry(name.to_string())
            .or_insert_with(|| ChannelEntry::new(name, ""))
    }
}

/// Single-pass scanner turning playlist lines into a [`PlaylistIndex`].
pub struct Indexer {
    extinf: Regex,
    stream_url: Regex,
    group_title: Regex,
}

impl Default for Indexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Indexer {
    pub fn new() -> Self {
        Self {
            extinf: Regex::new(r"^#EXTINF").expect("static pattern"),
            stream_url: Regex::new(r"^http").expect("static pattern"),
            group_title: Regex::new(r#"group-title=['"]*([^,"']+)['"]*"#).expect("static pattern"),
        }
    }

    /// Extracts the `group-title` value from the attribute part of an `#EXTINF` line.
    pub fn group_of<'a>(&self, attributes: &'a str) -> Option<&'a str> {
        self.group_title
            .captures(attributes)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    pub fn index<S: AsRef<str>>(&self, lines: &[S]) -> PlaylistIndex {
        let mut index = PlaylistIndex::default();
        // channel announced by the last #EXTINF and still waiting for its first URL
        let mut pending: Option<String> = None;
        // channel that took the previous URL line; further URLs before the next #EXTINF join it
        let mut current: Option<String> = None;

        for line in lines {
            let line = line.as_ref();

            if self.extinf.is_match(line) {
                current = None;
                pending = None;

                let Some((attributes, name)) = line.split_once(',') else {
                    debug!("Skipping metadata line without display name: {}", line);
                    continue;
                };

                let group = match self.group_of(attributes) {
                    Some(group) => {
                        index.groups.insert(group.to_string());
                        group.to_string()
                    }
                    None => String::new(),
                };
                if name.is_empty() {
                    debug!("Skipping metadata line with empty display name: {}", line);
                    continue;
                }
                index.replace(name, group);
                pending = Some(name.to_string());
            } else if self.stream_url.is_match(line) {
                match pending.take().or_else(|| current.take()) {
                    Some(name) => {
                        index.entry_mut(&name).push_url(line);
                        current = Some(name);
                    }
                    None => debug!("Skipping stream URL without preceding metadata: {}", line),
                }
            }
        }

        info!(
            "Indexed {} channels in {} groups",
            index.len(),
            index.groups.len()
        );
        index
    }
}

pub fn index_lines<S: AsRef<str>>(lines: &[S]) -> PlaylistIndex {
    Indexer::new().index(lines)
}
