use crate::runtime::RuntimeMessage;
use rvdash_core::{LineClassifier, LineFramer, PanelId, ProcessArgs, RvdashError};
use std::{process::Stdio, sync::Arc};
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    process::{Child, Command},
    sync::mpsc,
};
use tracing::{debug, info, warn};

const READ_CHUNK_BYTES: usize = 4096;

/// Which consumer a child's lines feed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Monitor,
    Panel(PanelId),
}

/// A spawned child whose stdout and stderr are framed independently and
/// forwarded to the runtime.
///
/// Monitor output is forwarded as raw lines. Attack output is classified
/// first and forwarded as one message per event, in line order per stream.
/// Nothing is restarted: when the child exits its streams simply end.
#[derive(Debug)]
pub struct ProcessEventSource {
    program: String,
    pid: Option<u32>,
}

impl ProcessEventSource {
    pub fn monitor(
        program: &str,
        args: &ProcessArgs,
        tx: mpsc::Sender<RuntimeMessage>,
    ) -> Result<Self, RvdashError> {
        Self::spawn(program, args, LineSink::Monitor { tx })
    }

    pub fn attack(
        program: &str,
        args: &ProcessArgs,
        panel: PanelId,
        classifier: Arc<LineClassifier>,
        tx: mpsc::Sender<RuntimeMessage>,
    ) -> Result<Self, RvdashError> {
        Self::spawn(
            program,
            args,
            LineSink::Panel {
                panel,
                classifier,
                tx,
            },
        )
    }

    fn spawn(program: &str, args: &ProcessArgs, sink: LineSink) -> Result<Self, RvdashError> {
        let argv = args.to_argv();
        let mut child = Command::new(program)
            .args(&argv)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RvdashError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or_else(|| RvdashError::MissingPipe {
            program: program.to_string(),
            stream: "stdout",
        })?;
        let stderr = child.stderr.take().ok_or_else(|| RvdashError::MissingPipe {
            program: program.to_string(),
            stream: "stderr",
        })?;

        let pid = child.id();
        info!(program, pid, route = ?sink.route(), args = ?argv, "process_spawned");

        tokio::spawn(pump_stream(stdout, sink.clone()));
        tokio::spawn(pump_stream(stderr, sink.clone()));
        tokio::spawn(watch_exit(child, program.to_string(), sink));

        Ok(Self {
            program: program.to_string(),
            pid,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }
}

#[derive(Clone)]
enum LineSink {
    Monitor {
        tx: mpsc::Sender<RuntimeMessage>,
    },
    Panel {
        panel: PanelId,
        classifier: Arc<LineClassifier>,
        tx: mpsc::Sender<RuntimeMessage>,
    },
}

impl LineSink {
    fn route(&self) -> Route {
        match self {
            LineSink::Monitor { .. } => Route::Monitor,
            LineSink::Panel { panel, .. } => Route::Panel(*panel),
        }
    }

    fn tx(&self) -> &mpsc::Sender<RuntimeMessage> {
        match self {
            LineSink::Monitor { tx } | LineSink::Panel { tx, .. } => tx,
        }
    }

    /// Returns false once the runtime has gone away.
    async fn deliver(&self, line: String) -> bool {
        match self {
            LineSink::Monitor { tx } => tx.send(RuntimeMessage::MonitorLine(line)).await.is_ok(),
            LineSink::Panel {
                panel,
                classifier,
                tx,
            } => {
                for event in classifier.classify(&line) {
                    let message = RuntimeMessage::Panel {
                        panel: *panel,
                        event,
                    };
                    if tx.send(message).await.is_err() {
                        return false;
                    }
                }
                true
            }
        }
    }
}

async fn pump_stream<R>(mut reader: R, sink: LineSink)
where
    R: AsyncRead + Unpin,
{
    let mut framer = LineFramer::new();
    let mut buf = vec![0u8; READ_CHUNK_BYTES];
    loop {
        let read = match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) => {
                warn!(route = ?sink.route(), "stream_read_failed: {err}");
                break;
            }
        };
        for line in framer.push_chunk(&buf[..read]) {
            if !sink.deliver(line).await {
                return;
            }
        }
    }
    if let Some(line) = framer.finish() {
        let _ = sink.deliver(line).await;
    }
    debug!(route = ?sink.route(), "stream_closed");
}

async fn watch_exit(mut child: Child, program: String, sink: LineSink) {
    let code = match child.wait().await {
        Ok(status) => status.code(),
        Err(err) => {
            warn!(program = %program, "process_wait_failed: {err}");
            None
        }
    };
    info!(program = %program, ?code, route = ?sink.route(), "process_exited");
    let _ = sink
        .tx()
        .send(RuntimeMessage::Exited {
            route: sink.route(),
            program,
            code,
        })
        .await;
}
