use std::fmt::Write;

use serde::Deserialize;

use crate::error::{ConvertError, Result};
use crate::playlist::{ChannelEntry, PlaylistIndex};

/// Token closing a section header line.
pub const GENRE_MARKER: &str = "#genre#";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct EmitOptions {
    /// Section name for channels without a known group. Such channels are dropped when unset.
    #[serde(default)]
    pub ungrouped_section: Option<String>,
}

impl EmitOptions {
    pub fn validate(&self) -> Result<()> {
        match &self.ungrouped_section {
            Some(name) if name.trim().is_empty() => Err(ConvertError::Config(
                "ungrouped_section must not be blank".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Renders the index as `<group>,#genre#` sections followed by `<name>,<urls>` lines.
///
/// Groups come out in ascending order; channels keep the order in which their name
/// first appeared. Channels that never got a URL are left out.
pub fn to_text(index: &PlaylistIndex, options: &EmitOptions) -> String {
    let mut out = String::new();

    for group in index.groups() {
        write_section(
            &mut out,
            group,
            index.channels().filter(|tv| tv.group == group),
        );
    }

    if let Some(section) = &options.ungrouped_section {
        write_section(
            &mut out,
            section,
            index.channels().filter(|tv| !index.has_group(&tv.group)),
        );
    }

    out
}

fn write_section<'a>(
    out: &mut String,
    title: &str,
    channels: impl Iterator<Item = &'a ChannelEntry>,
) {
    // writing into a String cannot fail
    let _ = writeln!(out, "{},{}", title, GENRE_MARKER);
    for tv in channels.filter(|tv| tv.has_urls()) {
        let _ = writeln!(out, "{},{}", tv.name, tv.urls);
    }
}
