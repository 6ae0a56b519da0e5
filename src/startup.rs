//! Mount requests that arrive while the document is still parsing.
//!
//! The browser entry mounts on `DOMContentLoaded`. A page script may call
//! `mountWithConfig` or `unmount` before that; the latest such request wins
//! and is applied once the document is ready.

use crate::config::ThemeConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Mount(ThemeConfig),
    Unmount,
}

#[derive(Debug)]
pub struct Startup {
    ready: bool,
    pending: Option<Request>,
}

impl Startup {
    /// A document still in `loading` starts with a default mount queued.
    pub fn new(loading: bool) -> Self {
        Self {
            ready: !loading,
            pending: loading.then(|| Request::Mount(ThemeConfig::default())),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Returns the request to apply now, or `None` if it was queued.
    pub fn request(&mut self, request: Request) -> Option<Request> {
        if self.ready {
            Some(request)
        } else {
            self.pending = Some(request);
            None
        }
    }

    /// Marks the document ready and hands back the queued request, once.
    pub fn document_ready(&mut self) -> Option<Request> {
        self.ready = true;
        self.pending.take()
    }
}

impl Default for Startup {
    fn default() -> Self {
        Self::new(false)
    }
}
