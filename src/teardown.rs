use crate::host::{DomEvent, EventTarget, Host};
use std::rc::Rc;

/// Undo steps collected while a behavior mounts. Disposing runs them newest
/// first.
#[derive(Default)]
pub struct Teardown {
    steps: Vec<Box<dyn FnOnce()>>,
}

impl Teardown {
    pub fn push(&mut self, step: impl FnOnce() + 'static) {
        self.steps.push(Box::new(step));
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn dispose(self) {
        for step in self.steps.into_iter().rev() {
            step();
        }
    }

    /// Attach a listener and remember to detach it.
    pub fn listen<H: Host>(
        &mut self,
        host: &Rc<H>,
        target: EventTarget<H::Element>,
        event: &str,
        handler: impl Fn(&DomEvent<H::Element>) + 'static,
    ) {
        let id = host.listen(target, event, Rc::new(handler));
        let host = host.clone();
        self.push(move || host.unlisten(id));
    }
}

impl std::fmt::Debug for Teardown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Teardown").field("steps", &self.steps.len()).finish()
    }
}
