//! Cooperative drain loop
//!
//! While a writer is attached and the emitting thread is inside a tokio
//! runtime, accepted events are pushed onto the stream's [`Channel`]. The
//! drain task registers a one-shot consumer, writes the event that consumer
//! receives, yields to the runtime, then registers again. When the writer
//! stops, for any reason, every event still queued is written in order before
//! the stream returns to direct writes.

use super::{
    channel::Channel,
    error::{LoggerError, Result},
    stream::LogStream,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{oneshot, Notify};
use tokio::task::JoinHandle;

/// State of the attached writer. The in-flight slot holds the event handed to
/// the registered consumer until the drain task writes it.
struct WriterState {
    epoch: u64,
    wake: Arc<Notify>,
    signal_wake: Arc<Notify>,
    in_flight: Arc<Mutex<Option<String>>>,
}

pub(crate) struct WriteQueue {
    pub(crate) channel: Channel<String>,
    writer: Option<WriterState>,
    epochs: u64,
}

impl WriteQueue {
    pub(crate) fn new() -> Self {
        Self {
            channel: Channel::new(),
            writer: None,
            epochs: 0,
        }
    }

    #[inline]
    pub(crate) fn is_active(&self) -> bool {
        self.writer.is_some()
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.writer.as_ref().is_some_and(|w| w.epoch == epoch)
    }

    /// Take every event the writer has not written yet, oldest first
    fn take_backlog(&mut self) -> Vec<String> {
        let in_flight = self
            .writer
            .as_ref()
            .and_then(|writer| writer.in_flight.lock().take());
        in_flight.into_iter().chain(self.channel.drain_pending()).collect()
    }
}

impl LogStream {
    /// Attach a drain task on the current tokio runtime.
    ///
    /// From here until the writer stops, emissions made from inside the
    /// runtime only enqueue. Fails if called outside a runtime or while another
    /// writer is attached.
    pub fn start_writer(self: &Arc<Self>) -> Result<WriterHandle> {
        let runtime = Handle::try_current().map_err(|_| LoggerError::NoRuntime)?;

        let (epoch, wake, signal_wake) = {
            let mut queue = self.queue.lock();
            if queue.is_active() {
                return Err(LoggerError::WriterAlreadyRunning);
            }
            queue.epochs += 1;
            let wake = Arc::new(Notify::new());
            let signal_wake = Arc::new(Notify::new());
            queue.writer = Some(WriterState {
                epoch: queue.epochs,
                wake: Arc::clone(&wake),
                signal_wake: Arc::clone(&signal_wake),
                in_flight: Arc::new(Mutex::new(None)),
            });
            (queue.epochs, wake, signal_wake)
        };

        let (stop_tx, stop_rx) = oneshot::channel();
        let drain = Drain {
            stream: Arc::clone(self),
            epoch,
            wake,
            signal_wake,
        };
        let task = runtime.spawn(drain.run(stop_rx));

        Ok(WriterHandle {
            stop: Some(stop_tx),
            task: Some(task),
        })
    }

    pub fn is_writer_active(&self) -> bool {
        self.queue.lock().is_active()
    }

    /// Events accepted but not yet handed to the drain loop
    pub fn pending_events(&self) -> usize {
        self.queue.lock().channel.pending_len()
    }

    /// Detach the writer and synchronously write every event it has not
    /// written yet, in order. Returns the number of events flushed.
    pub fn shutdown(&self) -> usize {
        self.release_writer(None)
    }

    /// Queue the line for the drain loop, or write it now.
    ///
    /// A line is queued only while a writer is attached and the calling thread
    /// is inside a tokio runtime. Otherwise nothing is driving the loop from
    /// here: whatever the writer still holds is written first, then the line,
    /// all under the queue lock so order is kept.
    pub(super) fn dispatch(&self, line: String) {
        let mut queue = self.queue.lock();
        if !queue.is_active() {
            drop(queue);
            self.safe_write(&line);
            return;
        }
        if Handle::try_current().is_ok() {
            queue.channel.push(line);
            return;
        }

        for queued in queue.take_backlog() {
            self.safe_write(&queued);
        }
        self.safe_write(&line);
    }

    /// Wake an idle drain loop so it applies pending signal requests
    pub(super) fn wake_writer(&self) {
        if let Some(writer) = self.queue.lock().writer.as_ref() {
            writer.signal_wake.notify_one();
        }
    }

    /// Register the drain loop's consumer. Returns `false` once `epoch` is no
    /// longer the attached writer.
    fn register_writer(&self, epoch: u64) -> bool {
        let mut queue = self.queue.lock();
        let (wake, in_flight) = match queue.writer.as_ref() {
            Some(writer) if writer.epoch == epoch => {
                (Arc::clone(&writer.wake), Arc::clone(&writer.in_flight))
            }
            _ => return false,
        };
        queue.channel.register(Box::new(move |line| {
            *in_flight.lock() = Some(line);
            wake.notify_one();
        }));
        true
    }

    /// Write the event handed to the consumer. Returns `false` once `epoch` is
    /// no longer the attached writer.
    fn write_in_flight(&self, epoch: u64) -> bool {
        let queue = self.queue.lock();
        let Some(writer) = queue.writer.as_ref().filter(|w| w.epoch == epoch) else {
            return false;
        };
        let line = writer.in_flight.lock().take();
        if let Some(line) = line {
            self.safe_write(&line);
        }
        true
    }

    /// Stop the writer (`None` means whichever is attached) and flush
    fn release_writer(&self, epoch: Option<u64>) -> usize {
        let mut queue = self.queue.lock();
        if let Some(epoch) = epoch {
            if !queue.is_current(epoch) {
                return 0;
            }
        }
        if !queue.is_active() {
            return 0;
        }

        queue.channel.clear_waiting();
        let remaining = queue.take_backlog();
        let Some(writer) = queue.writer.take() else {
            return 0;
        };

        // Writes happen under the queue lock so nothing emitted after the
        // writer detaches can overtake them.
        for line in &remaining {
            self.safe_write(line);
        }
        writer.wake.notify_one();

        let flushed = remaining.len();
        self.metrics.record_flushed(flushed as u64);
        flushed
    }
}

/// The drain task's state. Dropping it, including when the runtime drops the
/// task, releases the writer and flushes what is left.
struct Drain {
    stream: Arc<LogStream>,
    epoch: u64,
    wake: Arc<Notify>,
    signal_wake: Arc<Notify>,
}

impl Drain {
    async fn run(self, mut stop: oneshot::Receiver<()>) {
        loop {
            if !self.stream.register_writer(self.epoch) {
                break;
            }

            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop => return,
                    _ = self.wake.notified() => break,
                    _ = self.signal_wake.notified() => self.stream.process_signals(),
                }
            }

            if !self.stream.write_in_flight(self.epoch) {
                break;
            }
            self.stream.process_signals();
            tokio::task::yield_now().await;
        }
    }
}

impl Drop for Drain {
    fn drop(&mut self) {
        self.stream.release_writer(Some(self.epoch));
    }
}

/// Handle to a running drain task
///
/// Dropping the handle asks the task to stop; the task flushes pending events
/// the next time it runs, or when the runtime shuts down.
pub struct WriterHandle {
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl WriterHandle {
    /// Stop the drain loop and wait until every pending event is written
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            task.await
                .map_err(|e| LoggerError::writer_task(e.to_string()))?;
        }
        Ok(())
    }
}

impl Drop for WriterHandle {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::ReopenTarget;
    use std::io::{self, Write};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn messages(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().clone())
                .unwrap()
                .lines()
                .map(|line| {
                    let value: serde_json::Value = serde_json::from_str(line).unwrap();
                    value["message"].as_str().unwrap().to_string()
                })
                .collect()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured() -> (Arc<LogStream>, SharedBuf) {
        let buf = SharedBuf::default();
        let stream = LogStream::builder()
            .output(ReopenTarget::handle(buf.clone()))
            .build();
        (stream, buf)
    }

    #[test]
    fn test_start_writer_requires_runtime() {
        let (stream, _) = captured();
        assert!(matches!(stream.start_writer(), Err(LoggerError::NoRuntime)));
    }

    #[tokio::test]
    async fn test_second_writer_is_rejected() {
        let (stream, _) = captured();
        let writer = stream.start_writer().unwrap();
        assert!(matches!(
            stream.start_writer(),
            Err(LoggerError::WriterAlreadyRunning)
        ));
        writer.shutdown().await.unwrap();
        assert!(!stream.is_writer_active());
    }

    #[tokio::test]
    async fn test_emit_enqueues_while_writer_attached() {
        let (stream, buf) = captured();
        let writer = stream.start_writer().unwrap();

        assert!(stream.info("one"));
        assert!(stream.info("two"));
        // The drain task has not run yet on this current-thread runtime
        assert_eq!(stream.pending_events(), 2);
        assert!(buf.messages().is_empty());

        while stream.metrics().written() < 2 {
            tokio::task::yield_now().await;
        }
        assert_eq!(buf.messages(), vec!["one", "two"]);
        writer.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_sync_shutdown_flushes_in_order() {
        let (stream, buf) = captured();
        let _writer = stream.start_writer().unwrap();

        for i in 0..10 {
            stream.info(format!("event {}", i));
        }
        assert_eq!(stream.shutdown(), 10);
        assert!(!stream.is_writer_active());

        let expected: Vec<String> = (0..10).map(|i| format!("event {}", i)).collect();
        assert_eq!(buf.messages(), expected);

        // Direct writes resume after shutdown
        stream.info("after");
        assert_eq!(buf.messages().last().map(String::as_str), Some("after"));
    }

    #[tokio::test]
    async fn test_writer_can_restart() {
        let (stream, buf) = captured();
        stream.start_writer().unwrap().shutdown().await.unwrap();

        let writer = stream.start_writer().unwrap();
        stream.info("second run");
        writer.shutdown().await.unwrap();
        assert_eq!(buf.messages(), vec!["second run"]);
    }

    #[test]
    fn test_emit_after_block_on_writes_through() {
        let (stream, buf) = captured();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let writer = runtime.block_on(async {
            let writer = stream.start_writer().unwrap();
            assert!(stream.info("queued inside"));
            writer
        });
        // Nothing drives the drain task once block_on has returned
        assert_eq!(stream.pending_events(), 1);

        assert!(stream.info("after block_on"));
        assert_eq!(stream.pending_events(), 0);
        assert_eq!(buf.messages(), vec!["queued inside", "after block_on"]);
        assert!(stream.is_writer_active());

        runtime.block_on(writer.shutdown()).unwrap();
        assert_eq!(buf.messages().len(), 2);
    }

    #[test]
    fn test_runtime_without_time_driver() {
        let (stream, buf) = captured();
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

        runtime.block_on(async {
            let writer = stream.start_writer().unwrap();
            for i in 0..3 {
                stream.info(format!("event {}", i));
            }
            for _ in 0..100 {
                if stream.metrics().written() == 3 {
                    break;
                }
                tokio::task::yield_now().await;
            }
            assert!(stream.is_writer_active());
            writer.shutdown().await.unwrap();
        });

        assert_eq!(buf.messages(), vec!["event 0", "event 1", "event 2"]);
        assert_eq!(stream.metrics().flushed_on_shutdown(), 0);
    }

    #[tokio::test]
    async fn test_signal_request_wakes_idle_writer() {
        let (stream, _) = captured();
        let writer = stream.start_writer().unwrap();
        tokio::task::yield_now().await;

        stream.request_toggle_debug();
        for _ in 0..100 {
            if stream.level() == crate::core::LogLevel::Debug {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(stream.level(), crate::core::LogLevel::Debug);
        writer.shutdown().await.unwrap();
    }
}
