//! Named request wrappers: call-site sugar over [`Bridge::send`].
//!
//! One method per outbound request kind, each a mechanical `send` with a
//! fixed kind and shaped payload. No protocol logic lives here.

use atelier_protocol::Request;

use crate::bridge::Bridge;
use crate::error::BridgeError;

impl Bridge {
    pub fn build(
        &self,
        source_file: impl Into<String>,
        output_file: impl Into<String>,
        flags: Vec<String>,
    ) -> Result<(), BridgeError> {
        self.send(&Request::Build {
            source_file: source_file.into(),
            output_file: output_file.into(),
            flags,
        })
    }

    pub fn run(&self, path: impl Into<String>) -> Result<(), BridgeError> {
        self.send(&Request::Run { path: path.into() })
    }

    pub fn get_system_info(&self) -> Result<(), BridgeError> {
        self.send(&Request::GetSystemInfo {})
    }

    pub fn open_file(&self, path: impl Into<String>) -> Result<(), BridgeError> {
        self.send(&Request::OpenFile { path: path.into() })
    }

    pub fn save_file(
        &self,
        path: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<(), BridgeError> {
        self.send(&Request::SaveFile {
            path: path.into(),
            content: content.into(),
        })
    }

    pub fn list_directory(&self, path: impl Into<String>) -> Result<(), BridgeError> {
        self.send(&Request::ListDirectory { path: path.into() })
    }

    pub fn create_directory(&self, path: impl Into<String>) -> Result<(), BridgeError> {
        self.send(&Request::CreateDirectory { path: path.into() })
    }

    pub fn delete_file(&self, path: impl Into<String>) -> Result<(), BridgeError> {
        self.send(&Request::DeleteFile { path: path.into() })
    }

    pub fn list_containers(&self) -> Result<(), BridgeError> {
        self.send(&Request::ListContainers {})
    }

    pub fn search_containers(&self, query: impl Into<String>) -> Result<(), BridgeError> {
        self.send(&Request::SearchContainers {
            query: query.into(),
        })
    }

    pub fn start_container(&self, id: impl Into<String>) -> Result<(), BridgeError> {
        self.send(&Request::StartContainer { id: id.into() })
    }

    pub fn stop_container(&self, id: impl Into<String>) -> Result<(), BridgeError> {
        self.send(&Request::StopContainer { id: id.into() })
    }

    pub fn restart_container(&self, id: impl Into<String>) -> Result<(), BridgeError> {
        self.send(&Request::RestartContainer { id: id.into() })
    }

    pub fn remove_container(&self, id: impl Into<String>, force: bool) -> Result<(), BridgeError> {
        self.send(&Request::RemoveContainer {
            id: id.into(),
            force,
        })
    }

    pub fn pull_image(
        &self,
        image_name: impl Into<String>,
        tag: impl Into<String>,
    ) -> Result<(), BridgeError> {
        self.send(&Request::PullImage {
            image_name: image_name.into(),
            tag: tag.into(),
        })
    }

    pub fn generate_dockerfile(
        &self,
        base_image: impl Into<String>,
        app_type: impl Into<String>,
    ) -> Result<(), BridgeError> {
        self.send(&Request::GenerateDockerfile {
            base_image: base_image.into(),
            app_type: app_type.into(),
        })
    }

    pub fn generate_docker_compose(&self, services: Vec<String>) -> Result<(), BridgeError> {
        self.send(&Request::GenerateDockerCompose { services })
    }

    pub fn get_container_logs(
        &self,
        id: impl Into<String>,
        lines: u32,
    ) -> Result<(), BridgeError> {
        self.send(&Request::GetContainerLogs {
            id: id.into(),
            lines,
        })
    }

    pub fn check_docker_health(&self) -> Result<(), BridgeError> {
        self.send(&Request::CheckDockerHealth {})
    }

    pub fn clean_docker_images(&self) -> Result<(), BridgeError> {
        self.send(&Request::CleanDockerImages {})
    }

    pub fn list_plugins(&self) -> Result<(), BridgeError> {
        self.send(&Request::ListPlugins {})
    }

    pub fn generate_plugin(
        &self,
        name: impl Into<String>,
        code: impl Into<String>,
    ) -> Result<(), BridgeError> {
        self.send(&Request::GeneratePlugin {
            name: name.into(),
            code: code.into(),
        })
    }

    pub fn check_updates(&self) -> Result<(), BridgeError> {
        self.send(&Request::CheckUpdates {})
    }

    pub fn download_update(&self) -> Result<(), BridgeError> {
        self.send(&Request::DownloadUpdate {})
    }

    pub fn auto_install(&self) -> Result<(), BridgeError> {
        self.send(&Request::AutoInstall {})
    }
}
