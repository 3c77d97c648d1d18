use std::collections::HashMap;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use tably_client::render::RenderBinder;
use tably_client::toggle::{ReactionCounts, ReactionKind, ToggleKey, ToggleKind, ToggleState};

pub const TOAST_VISIBLE_MS: i32 = 4000;

/// Applies toggle state to the server-rendered buttons. Caches the last
/// rendered state per key, so re-rendering an unchanged state touches no DOM.
pub struct DomBinder {
    last: HashMap<ToggleKey, ToggleState>,
}

impl DomBinder {
    pub fn new() -> Self {
        DomBinder {
            last: HashMap::new(),
        }
    }

    fn lookup(&self, key: &ToggleKey) -> Option<Element> {
        let selector = format!(
            "[data-toggle-kind=\"{}\"][data-toggle-id=\"{}\"]",
            key.kind.as_attr(),
            attr_escape(&key.id)
        );
        document().query_selector(&selector).ok().flatten()
    }

    fn apply_button(element: &Element, on: bool, active_class: &str, idle_class: &str, on_label: &str, off_label: &str) {
        let classes = element.class_list();
        if on {
            let _ = classes.remove_1(idle_class);
            let _ = classes.add_1(active_class);
            element.set_text_content(Some(on_label));
        } else {
            let _ = classes.remove_1(active_class);
            let _ = classes.add_1(idle_class);
            element.set_text_content(Some(off_label));
        }
    }

    fn apply_reaction_button(element: &Element, state: ToggleState) {
        match state {
            ToggleState::Reacted(kind) => {
                element.set_text_content(Some(&format!("{} {}", kind.emoji(), kind.label())));
            }
            _ => element.set_text_content(Some("表情")),
        }
    }
}

impl Default for DomBinder {
    fn default() -> Self {
        DomBinder::new()
    }
}

impl RenderBinder for DomBinder {
    fn render(&mut self, key: &ToggleKey, state: ToggleState) {
        if self.last.get(key) == Some(&state) {
            return;
        }
        self.last.insert(key.clone(), state);

        let element = match self.lookup(key) {
            Some(element) => element,
            None => return,
        };

        match key.kind {
            ToggleKind::RestaurantFavorite | ToggleKind::PostFavorite => Self::apply_button(
                &element,
                state == ToggleState::On,
                "btn-danger",
                "btn-outline-danger",
                "取消收藏",
                "收藏",
            ),
            ToggleKind::Follow => Self::apply_button(
                &element,
                state == ToggleState::On,
                "btn-primary",
                "btn-outline-primary",
                "取消追蹤",
                "追蹤",
            ),
            ToggleKind::Reaction => Self::apply_reaction_button(&element, state),
        }
    }

    fn render_counts(&mut self, key: &ToggleKey, counts: &ReactionCounts, total: u64) {
        let document = document();

        let id = attr_escape(&key.id);
        for kind in ReactionKind::ALL {
            let selector = format!(
                "[data-toggle-id=\"{}\"][data-reaction-count=\"{}\"]",
                id,
                kind.as_str()
            );
            if let Ok(Some(badge)) = document.query_selector(&selector) {
                let count = counts.get(&kind).copied().unwrap_or(0);
                badge.set_text_content(Some(&count.to_string()));
            }
        }

        let selector = format!("[data-toggle-id=\"{}\"][data-reaction-total]", id);
        if let Ok(Some(summary)) = document.query_selector(&selector) {
            summary.set_text_content(Some(&format!("{} 人反應", total)));
            let display = if total > 0 { "" } else { "display: none" };
            let _ = summary.set_attribute("style", display);
        }
    }

    fn notify(&mut self, message: &str) {
        let document = document();
        let body = match document.body() {
            Some(body) => body,
            None => return,
        };

        let toast = match document.create_element("div") {
            Ok(toast) => toast,
            Err(_) => return,
        };
        let _ = toast.class_list().add_1("toggle-toast");
        toast.set_text_content(Some(message));
        let _ = body.append_child(&toast);

        let toast0 = toast.clone();
        let dismiss = Closure::<dyn FnMut()>::new(move || {
            toast0.remove();
        });

        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                dismiss.as_ref().unchecked_ref(),
                TOAST_VISIBLE_MS,
            );
        }
        dismiss.forget();
    }
}

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

// Ids come from page attributes and may contain anything; inside a quoted
// attribute selector only the quote and the backslash need escaping.
fn attr_escape(id: &str) -> String {
    id.replace('\\', "\\\\").replace('"', "\\\"")
}
