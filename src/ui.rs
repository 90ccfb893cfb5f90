use std::thread;

use tokio::sync::{mpsc, oneshot};

use crate::error::{Error, Result};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Single-threaded executor all fragment, surface and orientation calls
/// are serialised onto.
#[derive(Clone)]
pub struct UiThread {
    jobs: mpsc::UnboundedSender<Job>,
}

impl UiThread {
    pub fn spawn(name: &str) -> Result<Self> {
        let (jobs, mut rx) = mpsc::unbounded_channel::<Job>();
        let thread_name = name.to_string();
        thread::Builder::new().name(thread_name.clone()).spawn(move || {
            while let Some(job) = rx.blocking_recv() {
                job();
            }
            log::debug!("{} stopped", thread_name);
        })?;
        Ok(Self { jobs })
    }

    /// Runs `f` on the UI thread and returns its result.
    pub async fn run<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.jobs
            .send(Box::new(move || {
                let _ = tx.send(f());
            }))
            .map_err(|_| Error::UiThreadGone)?;
        rx.await.map_err(|_| Error::UiThreadGone)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn runs_jobs_on_the_named_thread() {
        let ui = UiThread::spawn("camera-preview-ui-test").unwrap();
        let name = ui
            .run(|| Ok(thread::current().name().map(str::to_string)))
            .await
            .unwrap();
        assert_eq!(name.as_deref(), Some("camera-preview-ui-test"));
    }

    #[tokio::test]
    async fn propagates_job_errors() {
        let ui = UiThread::spawn("camera-preview-ui-test").unwrap();
        let err = ui.run(|| Err::<(), _>(Error::NotRunning)).await.unwrap_err();
        assert!(matches!(err, Error::NotRunning));
    }

    #[tokio::test]
    async fn preserves_submission_order() {
        let ui = UiThread::spawn("camera-preview-ui-test").unwrap();
        let order = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let calls: Vec<_> = (0..5)
            .map(|i| {
                let order = order.clone();
                ui.run(move || {
                    order.lock().unwrap().push(i);
                    Ok(())
                })
            })
            .collect();
        for call in calls {
            call.await.unwrap();
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }
}
