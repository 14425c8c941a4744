//! Input device reader tasks
//!
//! Each device gets one lightweight task that waits on its descriptor with a
//! bounded timeout, decodes frames and forwards classified events into the
//! single service channel. A device error ends only that reader.

use std::fs::File;
use std::io::Read;
use std::os::fd::OwnedFd;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use quill_types::DeviceRole;
use rustix::fs::{Mode, OFlags};
use tokio::io::unix::AsyncFd;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::decode::{FrameLayout, RawFrame};
use super::error::DeviceError;
use super::{DeviceId, SourceEvent};

/// Frames pulled per read call
const FRAMES_PER_READ: usize = 64;

pub struct DeviceReader {
    id: DeviceId,
    path: PathBuf,
    role: DeviceRole,
    fd: AsyncFd<File>,
    layout: FrameLayout,
}

impl DeviceReader {
    /// Open an evdev node in non-blocking mode.
    pub fn open(id: DeviceId, path: impl AsRef<Path>, role: DeviceRole) -> Result<Self, DeviceError> {
        let path = path.as_ref().to_path_buf();
        let fd = rustix::fs::open(
            path.as_path(),
            OFlags::RDONLY | OFlags::NONBLOCK | OFlags::CLOEXEC,
            Mode::empty(),
        )
        .map_err(|e| DeviceError::Open {
            path: path.clone(),
            source: e.into(),
        })?;
        Self::from_fd(id, path, role, fd, FrameLayout::native())
    }

    /// Wrap an already-open non-blocking descriptor.
    pub fn from_fd(
        id: DeviceId,
        path: PathBuf,
        role: DeviceRole,
        fd: OwnedFd,
        layout: FrameLayout,
    ) -> Result<Self, DeviceError> {
        let fd = AsyncFd::try_new(File::from(fd)).map_err(|e| DeviceError::Open {
            path: path.clone(),
            source: e.into(),
        })?;
        Ok(Self {
            id,
            path,
            role,
            fd,
            layout,
        })
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn role(&self) -> DeviceRole {
        self.role
    }

    /// Read until shutdown, the device goes away, or the service stops listening.
    ///
    /// Waits are bounded by `poll_interval` so the shutdown flag is seen
    /// within one interval.
    pub async fn run(
        self,
        tx: mpsc::Sender<SourceEvent>,
        shutdown: Arc<AtomicBool>,
        poll_interval: Duration,
    ) -> Result<(), DeviceError> {
        let frame_size = self.layout.frame_size();
        let mut buf = vec![0u8; frame_size * FRAMES_PER_READ];

        tracing::info!(
            device = %self.id,
            path = %self.path.display(),
            role = ?self.role,
            "Monitoring input device"
        );

        while !shutdown.load(Ordering::SeqCst) {
            let mut guard = match tokio::time::timeout(poll_interval, self.fd.readable()).await {
                Err(_elapsed) => continue,
                Ok(Ok(guard)) => guard,
                Ok(Err(source)) => {
                    return Err(DeviceError::Read {
                        path: self.path.clone(),
                        source,
                    });
                }
            };

            let read = guard.try_io(|inner| {
                let mut file: &File = inner.get_ref();
                file.read(&mut buf)
            });

            let n = match read {
                Err(_would_block) => continue,
                Ok(Ok(0)) => {
                    tracing::warn!(device = %self.id, path = %self.path.display(), "Input device closed");
                    return Ok(());
                }
                Ok(Ok(n)) => n,
                Ok(Err(source)) => {
                    return Err(DeviceError::Read {
                        path: self.path.clone(),
                        source,
                    });
                }
            };

            if n % frame_size != 0 {
                tracing::debug!(device = %self.id, bytes = n, "Discarding partial input frame");
            }

            for chunk in buf[..n].chunks_exact(frame_size) {
                let frame = match RawFrame::decode(chunk, self.layout) {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::debug!(device = %self.id, error = %e, "Dropping malformed frame");
                        continue;
                    }
                };
                let Some(event) = frame.classify(self.role) else {
                    tracing::trace!(device = %self.id, ?frame, "Ignoring frame");
                    continue;
                };
                if tx
                    .send(SourceEvent {
                        device: self.id,
                        event,
                    })
                    .await
                    .is_err()
                {
                    // service is gone
                    return Ok(());
                }
            }
        }

        tracing::debug!(device = %self.id, "Input reader stopping");
        Ok(())
    }
}

/// Spawn a reader task. Errors are logged; they never reach the service.
pub fn spawn_reader(
    reader: DeviceReader,
    tx: mpsc::Sender<SourceEvent>,
    shutdown: Arc<AtomicBool>,
    poll_interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let id = reader.id();
        if let Err(e) = reader.run(tx, shutdown, poll_interval).await {
            tracing::warn!(device = %id, error = %e, "Input device lost; continuing without it");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::codes::{EV_KEY, KEY_HOME, KEY_PAGEUP, KEY_SPACE, VALUE_DOWN, VALUE_UP};
    use crate::input::{CharClass, InputEvent, KeyTransition, LogicalButton};
    use std::io::Write;
    use std::os::unix::net::UnixStream;

    fn frame(code: u16, value: i32) -> RawFrame {
        RawFrame {
            secs: 1_700_000_000,
            usecs: 0,
            kind: EV_KEY,
            code,
            value,
        }
    }

    fn socket_reader(id: usize, role: DeviceRole) -> (UnixStream, DeviceReader) {
        let (writer, reader_end) = UnixStream::pair().unwrap();
        reader_end.set_nonblocking(true).unwrap();
        let reader = DeviceReader::from_fd(
            DeviceId(id),
            PathBuf::from("test-socket"),
            role,
            OwnedFd::from(reader_end),
            FrameLayout::Wide,
        )
        .unwrap();
        (writer, reader)
    }

    async fn read_all(reader: DeviceReader) -> Vec<SourceEvent> {
        let (tx, mut rx) = mpsc::channel(16);
        let shutdown = Arc::new(AtomicBool::new(false));
        let result = reader.run(tx, shutdown, Duration::from_millis(20)).await;
        assert!(result.is_ok());

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn forwards_button_events() {
        let (mut writer, reader) = socket_reader(3, DeviceRole::Buttons);

        let mut bytes = Vec::new();
        bytes.extend(frame(KEY_PAGEUP, VALUE_DOWN).encode(FrameLayout::Wide));
        // EV_SYN is ignored
        bytes.extend(
            RawFrame {
                kind: 0,
                ..frame(0, 0)
            }
            .encode(FrameLayout::Wide),
        );
        bytes.extend(frame(KEY_SPACE, VALUE_DOWN).encode(FrameLayout::Wide));
        writer.write_all(&bytes).unwrap();
        drop(writer);

        let events = read_all(reader).await;
        // Space is not a body button
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].device, DeviceId(3));
        assert!(matches!(
            events[0].event,
            InputEvent::Button {
                button: LogicalButton::PageLeft,
                transition: KeyTransition::Down,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn keyboard_home_is_a_keystroke() {
        let (mut writer, reader) = socket_reader(2, DeviceRole::Keyboard);

        let mut bytes = Vec::new();
        bytes.extend(frame(KEY_HOME, VALUE_DOWN).encode(FrameLayout::Wide));
        bytes.extend(frame(KEY_HOME, VALUE_UP).encode(FrameLayout::Wide));
        bytes.extend(frame(KEY_PAGEUP, VALUE_DOWN).encode(FrameLayout::Wide));
        writer.write_all(&bytes).unwrap();
        drop(writer);

        let events = read_all(reader).await;
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| matches!(
            e.event,
            InputEvent::Keystroke {
                class: CharClass::Other,
                ..
            }
        )));
    }

    #[tokio::test]
    async fn stops_on_shutdown_flag() {
        let (_writer, reader) = socket_reader(0, DeviceRole::Buttons);

        let (tx, _rx) = mpsc::channel(8);
        let shutdown = Arc::new(AtomicBool::new(false));
        let handle = spawn_reader(reader, tx, Arc::clone(&shutdown), Duration::from_millis(10));
        shutdown.store(true, Ordering::SeqCst);

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("reader should observe shutdown within one interval")
            .unwrap();
    }

    #[test]
    fn missing_device_reports_path() {
        let err = DeviceReader::open(DeviceId(0), "/nonexistent/quill/event9", DeviceRole::Buttons)
            .err()
            .unwrap();
        assert!(err.to_string().contains("/nonexistent/quill/event9"));
    }
}
