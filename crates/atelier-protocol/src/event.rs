//! Inbound vocabulary: everything the host may report back.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;
use crate::error::ProtocolError;

/// One entry of a `directoryListing` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSummary {
    pub id: String,
    pub name: String,
    pub image: String,
    pub status: String,
    pub healthy: bool,
}

/// One registry hit from a `searchContainers` request.
///
/// `verified` and `source` default when absent; older hosts only report the
/// first four fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub description: String,
    pub stars: u32,
    pub official: bool,
    #[serde(default)]
    pub verified: bool,
    /// Registry the hit came from, e.g. "dockerhub".
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSummary {
    pub name: String,
    pub version: String,
    pub author: String,
    pub description: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInfo {
    pub version: String,
    pub release_notes: String,
    pub download_url: String,
}

/// One event from the host process, tagged with its wire `type`.
///
/// Log-stream events (`buildLog`, `runLog`, `installProgress`, ...) arrive
/// repeatedly until their terminal event (`buildComplete`, `runComplete`,
/// `installComplete`); everything else is a one-shot response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum HostEvent {
    BuildLog {
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    BuildComplete {
        success: bool,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        output_file: Option<String>,
    },
    RunLog {
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    RunComplete {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        exit_code: Option<i32>,
    },
    FileSaved {
        success: bool,
        message: String,
    },
    FileContent {
        success: bool,
        content: String,
        path: String,
    },
    DirectoryListing {
        success: bool,
        path: String,
        files: Vec<DirEntry>,
    },
    SystemInfo {
        os: String,
        architecture: String,
        cpu: String,
        cores: u32,
        ram: String,
    },
    ContainerList {
        success: bool,
        containers: Vec<ContainerSummary>,
    },
    ContainerSearchResults {
        success: bool,
        results: Vec<SearchResult>,
    },
    ContainerLogs {
        success: bool,
        logs: String,
    },
    ContainerStarted {
        success: bool,
    },
    ContainerStopped {
        success: bool,
    },
    ImagePulled {
        success: bool,
    },
    DockerfileGenerated {
        content: String,
    },
    PluginList {
        success: bool,
        plugins: Vec<PluginSummary>,
    },
    PluginGenerated {
        success: bool,
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    UpdateCheck {
        success: bool,
        update_available: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        update_info: Option<UpdateInfo>,
    },
    UpdateProgress {
        progress: u32,
    },
    UpdateDownloaded {
        success: bool,
        message: String,
    },
    InstallProgress {
        progress: u32,
        message: String,
    },
    InstallComplete {
        message: String,
    },
}

/// Dispatch key: the kind of a [`HostEvent`], detached from any payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    BuildLog,
    BuildComplete,
    RunLog,
    RunComplete,
    FileSaved,
    FileContent,
    DirectoryListing,
    SystemInfo,
    ContainerList,
    ContainerSearchResults,
    ContainerLogs,
    ContainerStarted,
    ContainerStopped,
    ImagePulled,
    DockerfileGenerated,
    PluginList,
    PluginGenerated,
    UpdateCheck,
    UpdateProgress,
    UpdateDownloaded,
    InstallProgress,
    InstallComplete,
}

impl EventKind {
    pub const ALL: [EventKind; 22] = [
        EventKind::BuildLog,
        EventKind::BuildComplete,
        EventKind::RunLog,
        EventKind::RunComplete,
        EventKind::FileSaved,
        EventKind::FileContent,
        EventKind::DirectoryListing,
        EventKind::SystemInfo,
        EventKind::ContainerList,
        EventKind::ContainerSearchResults,
        EventKind::ContainerLogs,
        EventKind::ContainerStarted,
        EventKind::ContainerStopped,
        EventKind::ImagePulled,
        EventKind::DockerfileGenerated,
        EventKind::PluginList,
        EventKind::PluginGenerated,
        EventKind::UpdateCheck,
        EventKind::UpdateProgress,
        EventKind::UpdateDownloaded,
        EventKind::InstallProgress,
        EventKind::InstallComplete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::BuildLog => "buildLog",
            EventKind::BuildComplete => "buildComplete",
            EventKind::RunLog => "runLog",
            EventKind::RunComplete => "runComplete",
            EventKind::FileSaved => "fileSaved",
            EventKind::FileContent => "fileContent",
            EventKind::DirectoryListing => "directoryListing",
            EventKind::SystemInfo => "systemInfo",
            EventKind::ContainerList => "containerList",
            EventKind::ContainerSearchResults => "containerSearchResults",
            EventKind::ContainerLogs => "containerLogs",
            EventKind::ContainerStarted => "containerStarted",
            EventKind::ContainerStopped => "containerStopped",
            EventKind::ImagePulled => "imagePulled",
            EventKind::DockerfileGenerated => "dockerfileGenerated",
            EventKind::PluginList => "pluginList",
            EventKind::PluginGenerated => "pluginGenerated",
            EventKind::UpdateCheck => "updateCheck",
            EventKind::UpdateProgress => "updateProgress",
            EventKind::UpdateDownloaded => "updateDownloaded",
            EventKind::InstallProgress => "installProgress",
            EventKind::InstallComplete => "installComplete",
        }
    }

    /// Map a wire tag back to its kind. `None` means the tag is outside the
    /// recognized vocabulary.
    pub fn from_wire(kind: &str) -> Option<Self> {
        EventKind::ALL.iter().copied().find(|k| k.as_str() == kind)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl HostEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            HostEvent::BuildLog { .. } => EventKind::BuildLog,
            HostEvent::BuildComplete { .. } => EventKind::BuildComplete,
            HostEvent::RunLog { .. } => EventKind::RunLog,
            HostEvent::RunComplete { .. } => EventKind::RunComplete,
            HostEvent::FileSaved { .. } => EventKind::FileSaved,
            HostEvent::FileContent { .. } => EventKind::FileContent,
            HostEvent::DirectoryListing { .. } => EventKind::DirectoryListing,
            HostEvent::SystemInfo { .. } => EventKind::SystemInfo,
            HostEvent::ContainerList { .. } => EventKind::ContainerList,
            HostEvent::ContainerSearchResults { .. } => EventKind::ContainerSearchResults,
            HostEvent::ContainerLogs { .. } => EventKind::ContainerLogs,
            HostEvent::ContainerStarted { .. } => EventKind::ContainerStarted,
            HostEvent::ContainerStopped { .. } => EventKind::ContainerStopped,
            HostEvent::ImagePulled { .. } => EventKind::ImagePulled,
            HostEvent::DockerfileGenerated { .. } => EventKind::DockerfileGenerated,
            HostEvent::PluginList { .. } => EventKind::PluginList,
            HostEvent::PluginGenerated { .. } => EventKind::PluginGenerated,
            HostEvent::UpdateCheck { .. } => EventKind::UpdateCheck,
            HostEvent::UpdateProgress { .. } => EventKind::UpdateProgress,
            HostEvent::UpdateDownloaded { .. } => EventKind::UpdateDownloaded,
            HostEvent::InstallProgress { .. } => EventKind::InstallProgress,
            HostEvent::InstallComplete { .. } => EventKind::InstallComplete,
        }
    }

    /// Decode one inbound frame into a typed event, validating the payload
    /// shape for its kind.
    pub fn from_frame(raw: &str) -> Result<Self, ProtocolError> {
        let envelope = Envelope::from_json(raw)?;
        let kind = EventKind::from_wire(&envelope.kind).ok_or_else(|| {
            ProtocolError::UnrecognizedKind {
                kind: envelope.kind.clone(),
            }
        })?;
        let value = serde_json::json!({
            "type": envelope.kind,
            "data": envelope.normalized_data(),
        });
        serde_json::from_value(value).map_err(|source| ProtocolError::InvalidPayload {
            kind: kind.as_str().to_string(),
            source,
        })
    }

    pub fn to_frame(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Serialize)
    }
}
