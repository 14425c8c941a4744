//! Daemon lifecycle
//!
//! `Quill::init` is all-or-nothing: if any step fails, everything registered
//! before it is torn down again and the error is returned. `shutdown` stops
//! the reader tasks and the service within bounded time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::actions::{ActionDispatcher, ActionSignalHandler, CommandDispatcher};
use crate::context::{AppConfig, AppConfigExt, BackgroundTasks, LifecycleError};
use crate::debug_log::DiagnosticLog;
use crate::input::{DeviceId, DeviceReader, spawn_reader};
use crate::service::{InputService, ServiceHandle};
use crate::status::{FileStatusPublisher, StatusPublisher, StatusSignalHandler};

/// Longest wait for each background task during shutdown
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// External collaborators the daemon reports to
pub struct QuillHooks {
    pub dispatcher: Arc<dyn ActionDispatcher>,
    pub status: Arc<dyn StatusPublisher>,
    pub diagnostic_log: Option<DiagnosticLog>,
}

impl QuillHooks {
    /// Command dispatcher, file status directory and diagnostic log from config
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            dispatcher: Arc::new(CommandDispatcher::new(config.action_commands.clone())),
            status: Arc::new(FileStatusPublisher::new(&config.status_directory)),
            diagnostic_log: Some(DiagnosticLog::open(&config.diagnostic_log)),
        }
    }
}

pub struct Quill {
    handle: ServiceHandle,
    status: Arc<dyn StatusPublisher>,
    tasks: BackgroundTasks,
    shutdown: Arc<AtomicBool>,
}

impl Quill {
    pub async fn init(config: AppConfig, hooks: QuillHooks) -> Result<Self, LifecycleError> {
        config.validate()?;

        hooks.status.register()?;

        let readers = match open_devices(&config) {
            Ok(readers) => readers,
            Err(e) => {
                hooks.status.unregister();
                return Err(e);
            }
        };

        Ok(Self::launch(&config, hooks, readers))
    }

    fn launch(config: &AppConfig, hooks: QuillHooks, readers: Vec<DeviceReader>) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let (mut service, handle) = InputService::new(config, shutdown.clone());

        service.set_status_handler(StatusSignalHandler::new(hooks.status.clone()));
        service.add_signal_handler(Box::new(ActionSignalHandler::new(hooks.dispatcher)));
        if let Some(mut log) = hooks.diagnostic_log {
            log.write(
                crate::input::now(),
                &format!("Writing daemon started ({} devices)", readers.len()),
            );
            service.add_signal_handler(Box::new(log));
        }

        let poll_interval = Duration::from_millis(config.poll_interval_ms);
        let mut tasks = BackgroundTasks {
            service: Some(tokio::spawn(service.run())),
            readers: Vec::with_capacity(readers.len()),
        };
        for reader in readers {
            tasks.readers.push(spawn_reader(
                reader,
                handle.event_sender(),
                shutdown.clone(),
                poll_interval,
            ));
        }

        tracing::info!(devices = tasks.readers.len(), "Quill started");

        Self {
            handle,
            status: hooks.status,
            tasks,
            shutdown,
        }
    }

    pub fn handle(&self) -> &ServiceHandle {
        &self.handle
    }

    pub fn device_count(&self) -> usize {
        self.tasks.readers.len()
    }

    /// Resolves once the service loop exits (shutdown or fatal error)
    pub async fn wait(&mut self) {
        if let Some(service) = self.tasks.service.as_mut() {
            let _ = service.await;
            self.tasks.service = None;
        }
    }

    pub async fn shutdown(mut self) {
        tracing::info!("Quill shutting down");
        self.shutdown.store(true, Ordering::SeqCst);
        self.handle.shutdown().await;
        self.tasks.join_all(SHUTDOWN_TIMEOUT).await;
        self.status.unregister();
    }
}

impl Drop for Quill {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.tasks.abort_all();
    }
}

/// Open every configured device. Optional devices that fail are skipped.
fn open_devices(config: &AppConfig) -> Result<Vec<DeviceReader>, LifecycleError> {
    let mut readers = Vec::with_capacity(config.devices.len());
    for (index, device) in config.devices.iter().enumerate() {
        match DeviceReader::open(DeviceId(index), &device.path, device.role) {
            Ok(reader) => readers.push(reader),
            Err(e) if device.optional => {
                tracing::warn!(path = %device.path, error = %e, "Optional input device unavailable");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(readers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::RecordingDispatcher;
    use crate::input::{CharClass, InputEvent, SourceEvent};
    use crate::status::{MemoryStatusPublisher, StatusRecord};
    use quill_types::DeviceConfig;

    fn hooks(status: Arc<MemoryStatusPublisher>) -> QuillHooks {
        QuillHooks {
            dispatcher: Arc::new(RecordingDispatcher::default()),
            status,
            diagnostic_log: None,
        }
    }

    #[tokio::test]
    async fn test_missing_required_device_rolls_back() {
        let status = Arc::new(MemoryStatusPublisher::new());
        let config = AppConfig {
            devices: vec![DeviceConfig::buttons("/nonexistent/quill/event0")],
            ..Default::default()
        };

        let result = Quill::init(config, hooks(status.clone())).await;
        assert!(matches!(result, Err(LifecycleError::Device(_))));
        assert!(!status.is_registered());
    }

    #[tokio::test]
    async fn test_invalid_config_registers_nothing() {
        let status = Arc::new(MemoryStatusPublisher::new());
        let config = AppConfig {
            poll_interval_ms: 500,
            ..Default::default()
        };

        let result = Quill::init(config, hooks(status.clone())).await;
        assert!(matches!(result, Err(LifecycleError::Config(_))));
        assert!(!status.is_registered());
    }

    #[tokio::test]
    async fn test_optional_devices_are_skipped() {
        let status = Arc::new(MemoryStatusPublisher::new());
        let config = AppConfig {
            devices: vec![DeviceConfig::keyboard("/nonexistent/quill/event2")],
            ..Default::default()
        };

        let quill = Quill::init(config, hooks(status.clone())).await.unwrap();
        assert_eq!(quill.device_count(), 0);
        assert!(status.is_registered());
        assert_eq!(status.get(StatusRecord::WritingMode).as_deref(), Some("off"));

        quill
            .handle()
            .send_event(SourceEvent {
                device: DeviceId(0),
                event: InputEvent::Keystroke {
                    timestamp: crate::input::now(),
                    class: CharClass::Alphanumeric,
                },
            })
            .await
            .unwrap();
        quill.handle().sync().await.unwrap();
        assert_eq!(quill.handle().snapshot().await.keystrokes_total, 1);

        let handle = quill.handle().clone();
        quill.shutdown().await;
        assert!(!handle.is_running());
        assert!(!status.is_registered());
    }
}
