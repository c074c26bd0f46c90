//! Outbound vocabulary: everything the UI side may ask the host to do.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// One request to the host process, tagged with its wire `type` and carrying
/// its payload as `data`.
///
/// Variants group into the host's service areas: build/run, workspace file
/// operations, system inventory, container management, plugins, and the
/// updater/toolchain installer. The host answers, where it answers at all,
/// with separate [`crate::HostEvent`] frames; nothing at this layer waits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Request {
    #[serde(rename_all = "camelCase")]
    Build {
        source_file: String,
        output_file: String,
        flags: Vec<String>,
    },
    Run {
        path: String,
    },
    GetSystemInfo {},
    OpenFile {
        path: String,
    },
    SaveFile {
        path: String,
        content: String,
    },
    ListDirectory {
        path: String,
    },
    CreateDirectory {
        path: String,
    },
    DeleteFile {
        path: String,
    },
    ListContainers {},
    SearchContainers {
        query: String,
    },
    StartContainer {
        id: String,
    },
    StopContainer {
        id: String,
    },
    RestartContainer {
        id: String,
    },
    RemoveContainer {
        id: String,
        force: bool,
    },
    #[serde(rename_all = "camelCase")]
    PullImage {
        image_name: String,
        tag: String,
    },
    #[serde(rename_all = "camelCase")]
    GenerateDockerfile {
        base_image: String,
        app_type: String,
    },
    GenerateDockerCompose {
        services: Vec<String>,
    },
    GetContainerLogs {
        id: String,
        lines: u32,
    },
    CheckDockerHealth {},
    CleanDockerImages {},
    ListPlugins {},
    GeneratePlugin {
        name: String,
        code: String,
    },
    CheckUpdates {},
    DownloadUpdate {},
    AutoInstall {},
}

impl Request {
    /// Encode to the wire frame sent over the transport.
    pub fn to_frame(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Serialize)
    }

    /// The wire tag, mainly for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Request::Build { .. } => "build",
            Request::Run { .. } => "run",
            Request::GetSystemInfo {} => "getSystemInfo",
            Request::OpenFile { .. } => "openFile",
            Request::SaveFile { .. } => "saveFile",
            Request::ListDirectory { .. } => "listDirectory",
            Request::CreateDirectory { .. } => "createDirectory",
            Request::DeleteFile { .. } => "deleteFile",
            Request::ListContainers {} => "listContainers",
            Request::SearchContainers { .. } => "searchContainers",
            Request::StartContainer { .. } => "startContainer",
            Request::StopContainer { .. } => "stopContainer",
            Request::RestartContainer { .. } => "restartContainer",
            Request::RemoveContainer { .. } => "removeContainer",
            Request::PullImage { .. } => "pullImage",
            Request::GenerateDockerfile { .. } => "generateDockerfile",
            Request::GenerateDockerCompose { .. } => "generateDockerCompose",
            Request::GetContainerLogs { .. } => "getContainerLogs",
            Request::CheckDockerHealth {} => "checkDockerHealth",
            Request::CleanDockerImages {} => "cleanDockerImages",
            Request::ListPlugins {} => "listPlugins",
            Request::GeneratePlugin { .. } => "generatePlugin",
            Request::CheckUpdates {} => "checkUpdates",
            Request::DownloadUpdate {} => "downloadUpdate",
            Request::AutoInstall {} => "autoInstall",
        }
    }
}
