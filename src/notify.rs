//! Transient user notifications.
//!
//! The engine never renders UI itself; user-visible outcomes go through an
//! injected [`Notifier`] sink. The default sink forwards to the log, hosts
//! with a toast system supply their own.

use std::cell::RefCell;
use std::rc::Rc;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient, dismissable user notification
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub detail: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            detail: detail.into(),
        }
    }

    pub fn error(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            detail: detail.into(),
        }
    }
}

/// Sink consuming user-visible notices
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

/// Default sink forwarding notices to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => log::info!("{}: {}", notice.title, notice.detail),
            NoticeLevel::Error => log::warn!("{}: {}", notice.title, notice.detail),
        }
    }
}

/// Recording sink for tests and embedders that render notices themselves.
///
/// Clones share the recorded list.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    notices: Rc<RefCell<Vec<Notice>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.borrow().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.notices.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.notices.borrow_mut().clear();
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&mut self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}
