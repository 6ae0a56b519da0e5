use crate::config::{Labels, ThemeConfig};
use crate::constants::{CODE_WRAPPER_CLASS, CODE_WRAPPER_STYLE, COPY_BUTTON_CLASS, COPY_BUTTON_STYLE};
use crate::host::{EventTarget, Host, HostError, TimerId};
use crate::teardown::Teardown;
use std::cell::Cell;
use std::rc::Rc;

struct CopyButton<H: Host> {
    host: Rc<H>,
    button: H::Element,
    code: H::Element,
    labels: Labels,
    feedback_ms: u32,
    // pending revert to the idle label; replaced by every new result
    revert: Cell<Option<TimerId>>,
    // set on teardown; a clipboard result arriving later is dropped
    disposed: Cell<bool>,
}

impl<H: Host> CopyButton<H> {
    fn copy(self: &Rc<Self>) {
        let text = self.host.text_content(&self.code);
        let this = self.clone();
        self.host.write_text(
            text,
            Box::new(move |result: Result<(), HostError>| {
                if this.disposed.get() {
                    log::debug!("[copy] result after teardown ignored");
                    return;
                }
                match result {
                    Ok(()) => this.show_feedback(&this.labels.copy_success),
                    Err(e) => {
                        log::error!("[copy] clipboard write failed: {}", e);
                        this.show_feedback(&this.labels.copy_error);
                    }
                }
            }),
        );
    }

    fn show_feedback(self: &Rc<Self>, label: &str) {
        self.host.set_text(&self.button, label);
        self.cancel_revert();
        let this = self.clone();
        let id = self.host.set_timeout(
            self.feedback_ms,
            Box::new(move || {
                this.revert.set(None);
                this.host.set_text(&this.button, &this.labels.copy_idle);
            }),
        );
        self.revert.set(Some(id));
    }

    fn dispose(&self) {
        self.disposed.set(true);
        self.cancel_revert();
    }

    fn cancel_revert(&self) {
        if let Some(id) = self.revert.take() {
            self.host.clear_timeout(id);
        }
    }
}

pub fn mount<H: Host>(host: &Rc<H>, config: &ThemeConfig) -> Teardown {
    let mut teardown = Teardown::default();
    let mut wired = 0usize;
    for code in host.query_all(&config.selectors.code_blocks) {
        if wire_block(host, config, code, &mut teardown) {
            wired += 1;
        }
    }
    log::debug!("[copy] wired {} code blocks", wired);
    teardown
}

fn wire_block<H: Host>(
    host: &Rc<H>,
    config: &ThemeConfig,
    code: H::Element,
    teardown: &mut Teardown,
) -> bool {
    let Some(pre) = host.parent(&code) else {
        return false;
    };
    let (Some(wrapper), Some(button)) = (host.create_element("div"), host.create_element("button"))
    else {
        return false;
    };

    host.add_class(&wrapper, CODE_WRAPPER_CLASS);
    for (prop, value) in CODE_WRAPPER_STYLE {
        host.set_style(&wrapper, prop, value);
    }
    if !host.insert_before(&pre, &wrapper) {
        return false;
    }
    host.append_child(&wrapper, &pre);

    host.add_class(&button, COPY_BUTTON_CLASS);
    host.set_attribute(&button, "type", "button");
    host.set_text(&button, &config.labels.copy_idle);
    for (prop, value) in COPY_BUTTON_STYLE {
        host.set_style(&button, prop, value);
    }
    host.append_child(&wrapper, &button);

    {
        let h = host.clone();
        let (wrapper, button, pre) = (wrapper.clone(), button.clone(), pre.clone());
        teardown.push(move || {
            h.remove(&button);
            h.insert_before(&wrapper, &pre);
            h.remove(&wrapper);
        });
    }

    let copy = Rc::new(CopyButton {
        host: host.clone(),
        button: button.clone(),
        code,
        labels: config.labels.clone(),
        feedback_ms: config.copy_feedback_ms,
        revert: Cell::new(None),
        disposed: Cell::new(false),
    });
    {
        let c = copy.clone();
        teardown.push(move || c.dispose());
    }

    let h = host.clone();
    let b = button.clone();
    teardown.listen(host, EventTarget::Element(wrapper.clone()), "mouseenter", move |_| {
        h.set_style(&b, "opacity", "1");
    });
    let h = host.clone();
    let b = button.clone();
    teardown.listen(host, EventTarget::Element(wrapper), "mouseleave", move |_| {
        h.set_style(&b, "opacity", "0");
    });
    teardown.listen(host, EventTarget::Element(button), "click", move |_| {
        copy.copy();
    });
    true
}
