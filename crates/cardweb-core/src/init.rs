//! Page-ready tasks
//!
//! Every page lists its load-time work (select population, first table page)
//! as named tasks. They run once, one after another, in registration order.
//! A failing task is logged and reported; the tasks after it still run.

use crate::error::{ClientError, ClientResult, ErrorContext, ErrorLogger};
use crate::feedback::{Feedback, Notification};
use std::future::Future;
use std::pin::Pin;

type InitTask<'a> = Pin<Box<dyn Future<Output = ClientResult<()>> + Send + 'a>>;

/// Ordered init tasks of one page
#[derive(Default)]
pub struct InitSequence<'a> {
    tasks: Vec<(&'static str, InitTask<'a>)>,
}

/// What happened while a page initialised
#[derive(Debug, Default)]
pub struct InitReport {
    pub completed: Vec<&'static str>,
    pub failed: Vec<(&'static str, ClientError)>,
    pub feedback: Feedback,
}

impl InitReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

impl<'a> InitSequence<'a> {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Queue a task; it does not start until [`InitSequence::run`]
    pub fn then<F>(mut self, name: &'static str, task: F) -> Self
    where
        F: Future<Output = ClientResult<()>> + Send + 'a,
    {
        self.tasks.push((name, Box::pin(task)));
        self
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run every task in order
    pub async fn run(self, logger: &dyn ErrorLogger) -> InitReport {
        let mut report = InitReport::default();
        for (name, task) in self.tasks {
            match task.await {
                Ok(()) => report.completed.push(name),
                Err(error) => {
                    logger.log_error(&error, &ErrorContext::new(format!("init:{}", name)));
                    report.feedback.push_notification(Notification::from_error(&error));
                    report.failed.push((name, error));
                }
            }
        }
        report
    }
}
